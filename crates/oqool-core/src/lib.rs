//! Oqool Core: error taxonomy, response envelope and request context
//!
//! Shared vocabulary for the classifier, the key authority and the command API.

pub mod context;
pub mod data_model;
pub mod error;

pub use context::RequestContext;
pub use data_model::ApiResponse;
pub use error::{OqoolError, OqoolResult};

/// Version of the Oqool service
pub const OQOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
