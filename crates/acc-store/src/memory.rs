//! In-memory credential sink.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use acc_core::{CredentialSink, Credentials, Result};

/// A [`CredentialSink`] that keeps credentials in memory. Clones share state,
/// so a test can hand one clone to a session and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    credentials: Option<Credentials>,
    saves: usize,
    clears: usize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds the given credentials.
    pub fn with(credentials: Credentials) -> Self {
        let store = Self::default();
        store.lock().credentials = Some(credentials);
        store
    }

    /// The currently stored credentials.
    pub fn current(&self) -> Option<Credentials> {
        self.lock().credentials.clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Number of `clear` calls so far.
    pub fn clear_count(&self) -> usize {
        self.lock().clears
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CredentialSink for MemoryCredentialStore {
    async fn save(&self, credentials: &Credentials) -> Result<()> {
        let mut state = self.lock();
        state.credentials = Some(credentials.clone());
        state.saves += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.lock();
        state.credentials = None;
        state.clears += 1;
        Ok(())
    }
}
