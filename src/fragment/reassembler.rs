//! Inbound helper that stitches fragments back into the original stream.
//!
//! [`Reassembler`] mirrors the outbound [`Fragmenter`](crate::fragment::Fragmenter).
//! Fragments may arrive in any order and any number of times; each payload
//! lands in a dense slot addressed by its sequence index, with the latest
//! delivery winning. Completeness is only judged when [`Reassembler::finalize`]
//! scans the expected index range, so arrival order never affects the result.
//!
//! Sessions either declare the fragment count up front or run in provisional
//! mode, where the count is inferred as one past the highest index seen.
//! Provisional sessions cannot distinguish a lost tail from a short stream
//! and should be reserved for exploratory use.
//!
//! Every session carries a fragment ceiling. A fixed count above it is
//! rejected at [`Reassembler::begin`], and a provisional session discards
//! indices at or beyond it rather than extending its count.

use std::collections::BTreeMap;

use bytes::Bytes;

use super::{
    DEFAULT_MAX_FRAGMENTS,
    Fragment,
    FragmentIndex,
    IngestStatus,
    ReassemblyError,
    config::{check_expected_count, clamp_fragment_limit},
};

/// Payload storage keyed by slot.
///
/// Fixed sessions preallocate one slot per expected fragment. Provisional
/// sessions only learn their extent from the indices they receive, so they
/// store payloads sparsely.
#[derive(Debug)]
enum Slots {
    Dense(Vec<Option<Bytes>>),
    Sparse(BTreeMap<usize, Bytes>),
}

#[derive(Debug)]
struct SlotTable {
    slots: Slots,
    filled: usize,
}

impl SlotTable {
    fn dense(len: usize) -> Self {
        Self {
            slots: Slots::Dense(vec![None; len]),
            filled: 0,
        }
    }

    fn sparse() -> Self {
        Self {
            slots: Slots::Sparse(BTreeMap::new()),
            filled: 0,
        }
    }

    fn get(&self, slot: usize) -> Option<&Bytes> {
        match &self.slots {
            Slots::Dense(slots) => slots.get(slot).and_then(Option::as_ref),
            Slots::Sparse(slots) => slots.get(&slot),
        }
    }

    /// Store `payload` at `slot`, returning whether the slot was already filled.
    ///
    /// Dense callers must have checked `slot` against the table length.
    fn store(&mut self, slot: usize, payload: Bytes) -> bool {
        let previous = match &mut self.slots {
            Slots::Dense(slots) => slots[slot].replace(payload),
            Slots::Sparse(slots) => slots.insert(slot, payload),
        };
        if previous.is_none() {
            self.filled += 1;
        }
        previous.is_some()
    }

    fn missing(&self, upto: usize) -> Vec<FragmentIndex> {
        (0..upto)
            .filter(|&slot| self.get(slot).is_none())
            .filter_map(|slot| FragmentIndex::try_from(slot).ok())
            .collect()
    }
}

/// How the session learns its total fragment count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExpectedCount {
    Fixed(usize),
    Provisional,
}

/// Order-independent reassembly session for a single byte stream.
///
/// # Examples
///
/// ```
/// use packet_reassembly::fragment::{Reassembler, fragment};
///
/// let set = fragment("HELLOWORLD", 5).expect("positive chunk size");
/// let mut session = Reassembler::begin(Some(set.len())).expect("valid count");
/// for piece in set.into_iter().rev() {
///     session.ingest(piece);
/// }
/// assert_eq!(session.finalize().expect("complete"), b"HELLOWORLD");
/// ```
#[derive(Debug)]
pub struct Reassembler {
    expected: ExpectedCount,
    table: SlotTable,
    high_water: Option<FragmentIndex>,
    max_fragments: usize,
}

impl Reassembler {
    /// Start a session limited to [`DEFAULT_MAX_FRAGMENTS`] fragments.
    ///
    /// `Some(n)` fixes the fragment count; `n == 0` describes an empty
    /// stream. `None` starts a provisional session.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::InvalidConfiguration`] when `expected_count`
    /// exceeds [`DEFAULT_MAX_FRAGMENTS`].
    pub fn begin(expected_count: Option<usize>) -> Result<Self, ReassemblyError> {
        Self::with_limit(expected_count, DEFAULT_MAX_FRAGMENTS)
    }

    /// Start a session tracking at most `max_fragments` fragments.
    ///
    /// The ceiling is clamped to the addressable index space. A fixed session
    /// preallocates one slot per expected fragment, so raising the ceiling
    /// raises the memory a caller-supplied count may claim.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::InvalidConfiguration`] when `expected_count`
    /// exceeds `max_fragments`.
    pub fn with_limit(
        expected_count: Option<usize>,
        max_fragments: usize,
    ) -> Result<Self, ReassemblyError> {
        let max_fragments = clamp_fragment_limit(max_fragments);
        let expected = Self::validate(expected_count, max_fragments)?;
        Ok(Self::with_expected(expected, max_fragments))
    }

    /// Discard all received fragments and start a new session.
    ///
    /// On error the current session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::InvalidConfiguration`] when `expected_count`
    /// exceeds the session's fragment ceiling, which is kept across resets.
    pub fn reset(&mut self, expected_count: Option<usize>) -> Result<(), ReassemblyError> {
        let expected = Self::validate(expected_count, self.max_fragments)?;
        *self = Self::with_expected(expected, self.max_fragments);
        Ok(())
    }

    fn validate(
        expected_count: Option<usize>,
        max_fragments: usize,
    ) -> Result<ExpectedCount, ReassemblyError> {
        match expected_count {
            Some(count) => Ok(ExpectedCount::Fixed(check_expected_count(
                count,
                max_fragments,
            )?)),
            None => Ok(ExpectedCount::Provisional),
        }
    }

    fn with_expected(expected: ExpectedCount, max_fragments: usize) -> Self {
        let table = match expected {
            ExpectedCount::Fixed(count) => SlotTable::dense(count),
            ExpectedCount::Provisional => SlotTable::sparse(),
        };
        Self {
            expected,
            table,
            high_water: None,
            max_fragments,
        }
    }

    /// Record a fragment, replacing any payload previously stored for its index.
    ///
    /// Repeated delivery of the same fragment leaves the session unchanged.
    /// Deliveries carrying different bytes for an already filled index are
    /// treated as retransmissions and overwrite the earlier payload.
    ///
    /// Indices at or beyond the expected count (fixed mode) or the fragment
    /// ceiling (provisional mode) are discarded as
    /// [`IngestStatus::OutOfRange`].
    pub fn ingest(&mut self, fragment: Fragment) -> IngestStatus {
        let (index, payload) = fragment.into_parts();
        let slot = index.slot();

        let limit = match self.expected {
            ExpectedCount::Fixed(count) => count,
            ExpectedCount::Provisional => self.max_fragments,
        };
        if slot >= limit {
            return IngestStatus::OutOfRange;
        }

        self.high_water = self.high_water.max(Some(index));
        if self.table.store(slot, payload) {
            IngestStatus::Duplicate
        } else {
            IngestStatus::Accepted
        }
    }

    /// Concatenate the payloads for every expected index in order.
    ///
    /// The session stays usable afterwards: callers may ingest late fragments
    /// and finalize again.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::IncompleteReassembly`] listing every index in
    /// the expected range that has not been ingested, in ascending order.
    pub fn finalize(&self) -> Result<Vec<u8>, ReassemblyError> {
        let expected = self.expected_count();

        let mut assembled = Vec::new();
        for slot in 0..expected {
            let Some(payload) = self.table.get(slot) else {
                return Err(ReassemblyError::IncompleteReassembly {
                    missing_indices: self.table.missing(expected),
                });
            };
            assembled.extend_from_slice(payload);
        }
        Ok(assembled)
    }

    /// Number of fragments the session currently expects.
    ///
    /// In provisional mode this is one past the highest index seen.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        match self.expected {
            ExpectedCount::Fixed(count) => count,
            ExpectedCount::Provisional => self.high_water.map_or(0, |index| index.slot() + 1),
        }
    }

    /// Largest fragment count this session will track.
    #[must_use]
    pub const fn max_fragments(&self) -> usize { self.max_fragments }

    /// Number of distinct indices received so far.
    #[must_use]
    pub const fn received_count(&self) -> usize { self.table.filled }

    /// Highest index accepted so far.
    #[must_use]
    pub const fn high_water(&self) -> Option<FragmentIndex> { self.high_water }

    /// Whether the session infers its fragment count.
    #[must_use]
    pub const fn is_provisional(&self) -> bool {
        matches!(self.expected, ExpectedCount::Provisional)
    }

    /// Whether every expected index has been received.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.received_count() == self.expected_count() }

    /// Indices in the expected range that have not arrived, ascending.
    #[must_use]
    pub fn missing_indices(&self) -> Vec<FragmentIndex> {
        self.table.missing(self.expected_count())
    }
}
