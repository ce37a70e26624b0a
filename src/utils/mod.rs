pub mod config;
pub mod error;

pub use config::{ClientSettings, CredentialSet, LoggingConfig};
pub use error::GrvtError;
