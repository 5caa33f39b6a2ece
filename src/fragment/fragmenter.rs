//! Outbound helper that splits a byte stream into numbered fragments.
//!
//! [`Fragmenter`] walks its input in fixed strides, tagging each slice with a
//! dense [`FragmentIndex`]. The resulting [`FragmentSet`] upholds the layout
//! invariants the reassembler relies on: indices run `0..N` without gaps, and
//! every fragment except the last carries exactly `chunk_size` bytes.

use std::num::NonZeroUsize;

use bytes::Bytes;

use super::{ConfigError, Fragment, FragmentIndex, FragmentationConfig, FragmentationError};

/// Split `bytes` into fragments of at most `chunk_size` bytes.
///
/// Empty input yields an empty [`FragmentSet`].
///
/// # Examples
///
/// ```
/// use packet_reassembly::fragment::fragment;
/// let set = fragment("HELLOWORLD!", 5).expect("positive chunk size");
/// let payloads: Vec<&[u8]> = set.iter().map(|f| f.payload()).collect();
/// assert_eq!(payloads, vec![&b"HELLO"[..], &b"WORLD"[..], &b"!"[..]]);
/// ```
///
/// # Errors
///
/// Returns [`FragmentationError::InvalidConfiguration`] when `chunk_size` is
/// zero, or [`FragmentationError::IndexOverflow`] if the input needs more
/// fragments than a `u32` index can address.
pub fn fragment(
    bytes: impl Into<Bytes>,
    chunk_size: usize,
) -> Result<FragmentSet, FragmentationError> {
    let chunk_size = NonZeroUsize::new(chunk_size).ok_or(ConfigError::ZeroChunkSize)?;
    Fragmenter::new(chunk_size).fragment(bytes)
}

/// Splits byte streams into fixed-size fragments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragmenter {
    chunk_size: NonZeroUsize,
}

impl Fragmenter {
    /// Create a fragmenter that caps fragment payloads at `chunk_size` bytes.
    #[must_use]
    pub const fn new(chunk_size: NonZeroUsize) -> Self { Self { chunk_size } }

    /// Create a fragmenter using the chunk size from `config`.
    #[must_use]
    pub const fn from_config(config: &FragmentationConfig) -> Self { Self::new(config.chunk_size) }

    /// Return the fragment payload size in bytes.
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize { self.chunk_size }

    /// Split `bytes` into fragments.
    ///
    /// Payloads share the input buffer; no bytes are copied once `bytes` is
    /// converted into [`Bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::IndexOverflow`] if more than
    /// `u32::MAX + 1` fragments are required.
    pub fn fragment(&self, bytes: impl Into<Bytes>) -> Result<FragmentSet, FragmentationError> {
        let payload: Bytes = bytes.into();
        let max = self.chunk_size.get();
        let total = payload.len();

        let mut fragments = Vec::with_capacity(total.div_ceil(max));
        let mut index = FragmentIndex::zero();
        let mut offset = 0usize;

        while offset < total {
            let end = (offset + max).min(total);
            fragments.push(Fragment::new(index, payload.slice(offset..end)));

            if end == total {
                break;
            }

            offset = end;
            index = index
                .checked_increment()
                .ok_or(FragmentationError::IndexOverflow { last: index })?;
        }

        Ok(FragmentSet {
            chunk_size: self.chunk_size,
            payload_len: total,
            fragments,
        })
    }
}

impl Default for Fragmenter {
    fn default() -> Self { Self::from_config(&FragmentationConfig::default()) }
}

/// Ordered collection of fragments produced from a single byte stream.
///
/// `fragments()[i].sequence_index() == i` holds for every position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentSet {
    chunk_size: NonZeroUsize,
    payload_len: usize,
    fragments: Vec<Fragment>,
}

impl FragmentSet {
    /// Return the fragments as a slice, ordered by sequence index.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] { self.fragments.as_slice() }

    /// Look up the fragment carrying `index`.
    #[must_use]
    pub fn get(&self, index: FragmentIndex) -> Option<&Fragment> { self.fragments.get(index.slot()) }

    /// Number of fragments in the set.
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Whether the source stream was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.fragments.is_empty() }

    /// Total payload bytes across all fragments.
    #[must_use]
    pub const fn payload_len(&self) -> usize { self.payload_len }

    /// Chunk size the set was produced with.
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize { self.chunk_size }

    /// Iterate over the fragments in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> { self.fragments.iter() }

    /// Consume the set, returning all fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<Fragment> { self.fragments }
}

impl IntoIterator for FragmentSet {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}

impl<'a> IntoIterator for &'a FragmentSet {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.iter() }
}
