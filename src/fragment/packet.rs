//! A single numbered slice of an original byte stream.

use bytes::Bytes;

use super::FragmentIndex;

/// Immutable fragment of a byte stream.
///
/// The payload is a reference-counted [`Bytes`] view, so cloning a fragment
/// (for example to simulate duplicate delivery) never copies payload bytes.
///
/// # Examples
///
/// ```
/// use packet_reassembly::fragment::{Fragment, FragmentIndex};
/// let fragment = Fragment::new(FragmentIndex::new(1), "WORLD");
/// assert_eq!(fragment.sequence_index().get(), 1);
/// assert_eq!(fragment.len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fragment {
    sequence_index: FragmentIndex,
    payload: Bytes,
}

impl Fragment {
    /// Construct a fragment from its index and payload.
    #[must_use]
    pub fn new(sequence_index: FragmentIndex, payload: impl Into<Bytes>) -> Self {
        Self {
            sequence_index,
            payload: payload.into(),
        }
    }

    /// Position of this fragment in the original stream.
    #[must_use]
    pub const fn sequence_index(&self) -> FragmentIndex { self.sequence_index }

    /// Borrow the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Number of payload bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.payload.len() }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.payload.is_empty() }

    /// Consume the fragment, returning its components.
    #[must_use]
    pub fn into_parts(self) -> (FragmentIndex, Bytes) { (self.sequence_index, self.payload) }
}
