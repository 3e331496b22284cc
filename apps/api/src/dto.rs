mod common;
mod groups;
mod nipsa;

pub use common::HealthResponse;
pub use groups::GroupResponse;
pub use nipsa::{NipsaAddRequest, NipsaIndexResponse, NipsaRemoveRequest};
