//! Application services and ports.

#![forbid(unsafe_code)]

mod group_ports;
mod group_service;
mod nipsa_ports;
mod nipsa_service;

pub use group_ports::{GroupRecord, GroupRepository, NewGroup};
pub use group_service::GroupService;
pub use nipsa_ports::{NipsaRepository, UserAccount, UserDirectory};
pub use nipsa_service::{
    NIPSA_INDEX_PATH, NipsaError, NipsaService, RedirectInstruction, UserNotFoundError,
};
