use std::collections::HashMap;

/// Port for translating user-facing message ids.
///
/// Message ids are the English source strings. Implementations return the
/// translated text, or the id itself when no translation is known.
pub trait Translator: Send + Sync {
    /// Translates a single message id.
    fn translate(&self, msgid: &str) -> String;
}

/// Translator that renders every message in its source language.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceLanguage;

impl Translator for SourceLanguage {
    fn translate(&self, msgid: &str) -> String {
        msgid.to_owned()
    }
}

/// Translator backed by an in-memory message catalog.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Creates a catalog from `msgid -> msgstr` pairs.
    #[must_use]
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Returns the number of translated messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns whether the catalog holds no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .filter(|msgstr| !msgstr.is_empty())
            .cloned()
            .unwrap_or_else(|| msgid.to_owned())
    }
}
