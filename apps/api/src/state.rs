use margin_application::{GroupService, NipsaService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub group_service: GroupService,
    pub nipsa_service: NipsaService,
}

/// Authority of the API client making the request.
///
/// Inserted as a request extension by the client authentication layer;
/// requests without it act in the default authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAuthority(pub String);
