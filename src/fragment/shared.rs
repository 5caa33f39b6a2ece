//! Thread-safe handle for ingesting fragments from concurrent producers.
//!
//! [`SharedReassembler`] serialises every [`ingest`](SharedReassembler::ingest)
//! behind one mutex. [`finalize`](SharedReassembler::finalize) takes the same
//! lock, so it observes a state no ingest is halfway through.

#[cfg(not(loom))]
use std::sync::{Arc, Mutex, MutexGuard};

#[cfg(loom)]
use loom::sync::{Arc, Mutex, MutexGuard};

use super::{Fragment, FragmentIndex, IngestStatus, Reassembler, ReassemblyError};

/// Cloneable, lock-protected [`Reassembler`].
#[derive(Clone)]
pub struct SharedReassembler {
    inner: Arc<Mutex<Reassembler>>,
}

impl std::fmt::Debug for SharedReassembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedReassembler").finish_non_exhaustive()
    }
}

impl SharedReassembler {
    /// Wrap an existing session.
    #[must_use]
    pub fn new(reassembler: Reassembler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(reassembler)),
        }
    }

    /// Start a session shared between producers.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::InvalidConfiguration`] under the same
    /// conditions as [`Reassembler::begin`].
    pub fn begin(expected_count: Option<usize>) -> Result<Self, ReassemblyError> {
        Reassembler::begin(expected_count).map(Self::new)
    }

    /// Start a shared session with an explicit fragment ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::InvalidConfiguration`] under the same
    /// conditions as [`Reassembler::with_limit`].
    pub fn with_limit(
        expected_count: Option<usize>,
        max_fragments: usize,
    ) -> Result<Self, ReassemblyError> {
        Reassembler::with_limit(expected_count, max_fragments).map(Self::new)
    }

    // Every mutation is a single slot write, so a panicking holder cannot
    // leave the table half-updated.
    fn lock(&self) -> MutexGuard<'_, Reassembler> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Record a fragment while holding the session lock.
    pub fn ingest(&self, fragment: Fragment) -> IngestStatus { self.lock().ingest(fragment) }

    /// Reassemble under the session lock.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::IncompleteReassembly`] when fragments are
    /// still missing.
    pub fn finalize(&self) -> Result<Vec<u8>, ReassemblyError> { self.lock().finalize() }

    /// Number of distinct indices received so far.
    #[must_use]
    pub fn received_count(&self) -> usize { self.lock().received_count() }

    /// Indices in the expected range that have not arrived, ascending.
    #[must_use]
    pub fn missing_indices(&self) -> Vec<FragmentIndex> { self.lock().missing_indices() }

    /// Recover the session once every other handle has been dropped.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other clones are still alive.
    #[cfg(not(loom))]
    pub fn into_inner(self) -> Result<Reassembler, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex
                .into_inner()
                .unwrap_or_else(std::sync::PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }
}
