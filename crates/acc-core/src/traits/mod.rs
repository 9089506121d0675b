//! Core traits.

mod credential_sink;

pub use credential_sink::CredentialSink;
