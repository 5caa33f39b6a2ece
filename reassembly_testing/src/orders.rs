//! Deterministic delivery orders and ingest helpers.

use packet_reassembly::{FragmentIndex, FragmentSet, Reassembler, ReassemblyError};

/// Positions `0..len` in reverse.
#[must_use]
pub fn reversed(len: usize) -> Vec<usize> { (0..len).rev().collect() }

/// Odd positions first, then even ones.
#[must_use]
pub fn interleaved(len: usize) -> Vec<usize> {
    (0..len)
        .filter(|i| i % 2 == 1)
        .chain((0..len).filter(|i| i % 2 == 0))
        .collect()
}

/// Ingest the fragments of `set` at the given positions, in that order.
///
/// # Panics
///
/// Panics if a position lies outside `set`.
pub fn ingest_in_order(session: &mut Reassembler, set: &FragmentSet, order: &[usize]) {
    for &position in order {
        let fragment = set
            .fragments()
            .get(position)
            .unwrap_or_else(|| panic!("position {position} outside fragment set"));
        session.ingest(fragment.clone());
    }
}

/// Ingest every fragment of `set` except those at `withheld`, in index order.
pub fn ingest_withholding(session: &mut Reassembler, set: &FragmentSet, withheld: &[FragmentIndex]) {
    for fragment in set.iter().filter(|f| !withheld.contains(&f.sequence_index())) {
        session.ingest(fragment.clone());
    }
}

/// Reassemble `set` in a fresh fixed-count session fed in `order`.
///
/// # Errors
///
/// Propagates the session's [`ReassemblyError`].
pub fn reassemble_in_order(set: &FragmentSet, order: &[usize]) -> Result<Vec<u8>, ReassemblyError> {
    let mut session = Reassembler::begin(Some(set.len()))?;
    ingest_in_order(&mut session, set, order);
    session.finalize()
}
