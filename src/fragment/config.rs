//! Configuration consumed by fragmentation and reassembly.

use std::num::NonZeroUsize;

use super::{ConfigError, FragmentIndex, Reassembler, ReassemblyError};

/// Payload bytes per fragment when the caller does not choose a size.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(5).expect("five is non-zero");

/// Largest fragment count a reassembler accepts unless configured otherwise.
pub const DEFAULT_MAX_FRAGMENTS: usize = 1 << 20;

/// Settings shared by a [`Fragmenter`](crate::fragment::Fragmenter) and the
/// [`Reassembler`](crate::fragment::Reassembler) receiving its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentationConfig {
    /// Maximum number of payload bytes carried by a single fragment.
    pub chunk_size: NonZeroUsize,
    /// Whether the receiver learns the fragment count up front.
    ///
    /// When `false` the receiver runs in provisional mode and infers the
    /// count from the highest index it has seen. That mode cannot tell a
    /// missing tail from a short stream and is intended for exploration only.
    pub announce_count: bool,
    /// Ceiling on the fragment count a receiver will track.
    ///
    /// Bounds both an announced count and how far a provisional session may
    /// extend. Values beyond the addressable index space are clamped.
    pub max_fragments: usize,
}

impl FragmentationConfig {
    /// Build a configuration from a raw chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroChunkSize`] when `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, ConfigError> {
        let chunk_size = NonZeroUsize::new(chunk_size).ok_or(ConfigError::ZeroChunkSize)?;
        Ok(Self {
            chunk_size,
            announce_count: true,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
        })
    }

    /// Replace the receiver's fragment ceiling.
    #[must_use]
    pub const fn with_max_fragments(mut self, max_fragments: usize) -> Self {
        self.max_fragments = max_fragments;
        self
    }

    /// Switch the receiver to provisional mode.
    #[must_use]
    pub const fn provisional(mut self) -> Self {
        self.announce_count = false;
        self
    }

    /// Expected count to hand to [`Reassembler::begin`](crate::fragment::Reassembler::begin)
    /// for a stream of `fragment_count` fragments.
    #[must_use]
    pub const fn expected_count(&self, fragment_count: usize) -> Option<usize> {
        if self.announce_count {
            Some(fragment_count)
        } else {
            None
        }
    }

    /// Start a receiving session for a stream of `fragment_count` fragments.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::InvalidConfiguration`] when the announced
    /// count exceeds [`max_fragments`](Self::max_fragments).
    pub fn reassembler(&self, fragment_count: usize) -> Result<Reassembler, ReassemblyError> {
        Reassembler::with_limit(self.expected_count(fragment_count), self.max_fragments)
    }
}

impl Default for FragmentationConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            announce_count: true,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
        }
    }
}

/// Clamp a fragment ceiling to the number of addressable indices.
pub(crate) fn clamp_fragment_limit(limit: usize) -> usize {
    usize::try_from(FragmentIndex::CAPACITY).map_or(limit, |capacity| limit.min(capacity))
}

/// Reject fragment counts above `limit`.
pub(crate) fn check_expected_count(count: usize, limit: usize) -> Result<usize, ConfigError> {
    if count > limit {
        return Err(ConfigError::ExpectedCountTooLarge { count, limit });
    }
    Ok(count)
}
