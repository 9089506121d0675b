//! acc-core - Core types and traits for the Autodesk Construction Cloud toolkit.
//!
//! This crate holds everything that does not talk to the network: validated
//! identifiers, token and credential types, client configuration, the
//! unified error type, and the JSON payload types shared by the client,
//! the stores and the CLI.

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use credentials::Credentials;
pub use error::{
    ApiError, ApiErrorCode, AuthError, Error, InvalidInputError, StorageError, TransportError,
};
pub use models::ListOptions;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::CredentialSink;
pub use types::{ApiUrl, CostContainerId, HubId, ProjectId, Region};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
