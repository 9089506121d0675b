//! acc-store - Local persistence for the ACC client toolkit.
//!
//! Two stores live in the user's data directory:
//!
//! - [`CredentialStore`]: the credential blob, written back by the session
//!   whenever tokens are refreshed or invalidated.
//! - [`PhaseStore`]: per-project phase tracking, a local annotation that
//!   ACC itself does not store.

pub mod credentials;
mod fs;
pub mod memory;
pub mod phases;

pub use credentials::CredentialStore;
pub use memory::MemoryCredentialStore;
pub use phases::{PhaseEntry, PhaseExport, PhaseRecord, PhaseStore};
