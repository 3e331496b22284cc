//! Message catalogs stored as flat JSON objects (`{"msgid": "msgstr"}`).

use std::collections::HashMap;
use std::path::Path;

use margin_core::{AppError, AppResult, MessageCatalog};
use serde_json::Value;
use tracing::info;

/// Parses a catalog from JSON text.
pub fn parse_message_catalog(source: &str) -> AppResult<MessageCatalog> {
    let value: Value = serde_json::from_str(source)
        .map_err(|error| AppError::Validation(format!("invalid message catalog: {error}")))?;

    let Value::Object(entries) = value else {
        return Err(AppError::Validation(
            "message catalog must be a JSON object".to_owned(),
        ));
    };

    let mut messages = HashMap::with_capacity(entries.len());
    for (msgid, msgstr) in entries {
        let Value::String(msgstr) = msgstr else {
            return Err(AppError::Validation(format!(
                "message catalog entry '{msgid}' must be a string"
            )));
        };
        messages.insert(msgid, msgstr);
    }

    Ok(MessageCatalog::new(messages))
}

/// Loads a catalog from a JSON file.
pub async fn load_message_catalog(path: &Path) -> AppResult<MessageCatalog> {
    let source = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to read message catalog '{}': {error}",
            path.display()
        ))
    })?;

    let catalog = parse_message_catalog(&source)?;
    info!(
        path = %path.display(),
        messages = catalog.len(),
        "loaded message catalog"
    );

    Ok(catalog)
}
