//! Error and status types emitted by the fragmentation layer.
//!
//! Configuration problems are shared by both directions and surface through
//! [`ConfigError`]. Reassembly gaps are reported with the exact indices that
//! never arrived so callers can decide whether to keep waiting.

use thiserror::Error;

use super::FragmentIndex;

/// Outcome of feeding a fragment into a [`Reassembler`](crate::fragment::Reassembler).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestStatus {
    /// The fragment filled a previously empty slot.
    Accepted,
    /// The slot was already filled; the new payload replaced the old one.
    Duplicate,
    /// The index lies beyond a fixed expected count, or beyond the fragment
    /// ceiling of a provisional session, and was discarded.
    OutOfRange,
}

/// Invalid caller-supplied configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Fragments must carry at least one byte.
    #[error("chunk size must be positive")]
    ZeroChunkSize,
    /// The declared fragment count exceeds the receiver's fragment ceiling.
    #[error("expected fragment count {count} exceeds the limit of {limit}")]
    ExpectedCountTooLarge { count: usize, limit: usize },
}

/// Errors produced while splitting a byte sequence into fragments.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The fragmenter was configured with unusable settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// The fragment index cannot advance because it would overflow `u32`.
    #[error("fragment index overflow after {last}")]
    IndexOverflow { last: FragmentIndex },
}

/// Errors produced by a reassembly session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// The session was configured with unusable settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// One or more fragments in the expected range never arrived.
    #[error("reassembly incomplete: missing fragments {}", format_indices(.missing_indices))]
    IncompleteReassembly { missing_indices: Vec<FragmentIndex> },
}

impl ReassemblyError {
    /// Indices reported missing, or an empty slice for other errors.
    #[must_use]
    pub fn missing_indices(&self) -> &[FragmentIndex] {
        match self {
            Self::IncompleteReassembly { missing_indices } => missing_indices,
            Self::InvalidConfiguration(_) => &[],
        }
    }
}

fn format_indices(indices: &[FragmentIndex]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
