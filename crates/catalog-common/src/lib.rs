//! Types shared by every catalog assistant crate: the configuration and
//! top-level error taxonomy, the runtime credentials, and
//! session/request identifiers.

pub mod credentials;
pub mod errors;
pub mod id;

pub use credentials::Credentials;
pub use errors::{CatalogError, ConfigError};
pub use id::{RequestId, SessionId};

pub type Result<T> = std::result::Result<T, CatalogError>;
