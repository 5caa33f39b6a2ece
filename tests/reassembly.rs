#![cfg(not(loom))]
//! Integration tests for fragmentation followed by out-of-order reassembly.
//!
//! Delivery orders are always explicit: fixed permutations from
//! `reassembly_testing` or shuffles drawn from a deterministic proptest
//! runner.

use packet_reassembly::{FragmentIndex, FragmentSet, Reassembler, ReassemblyError, fragment};
use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any},
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestCaseError, TestRng, TestRunner},
};
use reassembly_testing::{
    ingest_in_order,
    ingest_withholding,
    interleaved,
    reassemble_in_order,
    reversed,
};
use rstest::rstest;

fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}

/// Payload, chunk size and a shuffled delivery order covering every fragment.
fn shuffled_case() -> impl Strategy<Value = (Vec<u8>, usize, Vec<usize>)> {
    (vec(any::<u8>(), 0..512), 1usize..64).prop_flat_map(|(payload, chunk)| {
        let count = payload.len().div_ceil(chunk);
        let order = Just((0..count).collect::<Vec<_>>()).prop_shuffle();
        (Just(payload), Just(chunk), order)
    })
}

fn split(payload: &[u8], chunk: usize) -> FragmentSet {
    fragment(payload.to_vec(), chunk).expect("positive chunk size")
}

#[test]
fn hello_world_scenario_reassembles_from_reverse_order() {
    let set = split(b"HELLOWORLD", 5);
    let payloads: Vec<&[u8]> = set.iter().map(|f| f.payload()).collect();
    assert_eq!(payloads, vec![&b"HELLO"[..], &b"WORLD"[..]]);

    let assembled = reassemble_in_order(&set, &[1, 0]).expect("complete");
    assert_eq!(assembled, b"HELLOWORLD");
}

#[test]
fn hello_world_bang_scenario_reports_withheld_tail() {
    let set = split(b"HELLOWORLD!", 5);
    assert_eq!(set.len(), 3);
    assert_eq!(
        set.get(FragmentIndex::new(2)).map(|f| f.payload()),
        Some(&b"!"[..])
    );

    let mut session = Reassembler::begin(Some(set.len())).expect("valid count");
    ingest_withholding(&mut session, &set, &[FragmentIndex::new(2)]);
    assert_eq!(
        session.finalize(),
        Err(ReassemblyError::IncompleteReassembly {
            missing_indices: vec![FragmentIndex::new(2)],
        })
    );
}

#[rstest]
#[case::reversed(reversed(26))]
#[case::interleaved(interleaved(26))]
#[case::in_order((0..26).collect())]
fn fixed_permutations_restore_the_stream(#[case] order: Vec<usize>) {
    let payload: Vec<u8> = (b'a'..=b'z').collect();
    let set = split(&payload, 1);
    assert_eq!(reassemble_in_order(&set, &order).expect("complete"), payload);
}

#[test]
fn empty_stream_needs_no_fragments() {
    let set = split(b"", 5);
    assert!(set.is_empty());
    assert_eq!(reassemble_in_order(&set, &[]).expect("empty"), Vec::<u8>::new());
}

#[test]
fn any_permutation_round_trips() {
    let mut runner = deterministic_runner(128);
    runner
        .run(&shuffled_case(), |(payload, chunk, order)| {
            let set = split(&payload, chunk);
            let assembled = reassemble_in_order(&set, &order)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            if assembled != payload {
                return Err(TestCaseError::fail("reassembled bytes differ"));
            }
            Ok(())
        })
        .expect("round trip holds for every permutation");
}

#[test]
fn withheld_indices_are_reported_exactly() {
    let mut runner = deterministic_runner(64);
    let strategy = (vec(any::<u8>(), 1..256), 1usize..16, vec(any::<bool>(), 256));
    runner
        .run(&strategy, |(payload, chunk, withhold_mask)| {
            let set = split(&payload, chunk);
            let withheld: Vec<FragmentIndex> = set
                .iter()
                .map(|f| f.sequence_index())
                .filter(|index| withhold_mask[index.slot()])
                .collect();

            let mut session = Reassembler::begin(Some(set.len()))
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            ingest_withholding(&mut session, &set, &withheld);

            match session.finalize() {
                Ok(bytes) if withheld.is_empty() && bytes == payload => Ok(()),
                Err(ReassemblyError::IncompleteReassembly { missing_indices })
                    if missing_indices == withheld =>
                {
                    Ok(())
                }
                other => Err(TestCaseError::fail(format!(
                    "unexpected outcome {other:?} for withheld {withheld:?}"
                ))),
            }
        })
        .expect("gap report matches withheld indices");
}

#[test]
fn duplicate_heavy_delivery_matches_single_delivery() {
    let mut runner = deterministic_runner(64);
    let strategy = (vec(any::<u8>(), 1..128), 1usize..8, 1usize..4);
    runner
        .run(&strategy, |(payload, chunk, repeats)| {
            let set = split(&payload, chunk);
            let order: Vec<usize> = reversed(set.len())
                .into_iter()
                .flat_map(|position| std::iter::repeat_n(position, repeats))
                .collect();

            let mut session = Reassembler::begin(Some(set.len()))
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            ingest_in_order(&mut session, &set, &order);
            if session.received_count() != set.len() {
                return Err(TestCaseError::fail("duplicates changed received count"));
            }
            let assembled = session
                .finalize()
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            if assembled != payload {
                return Err(TestCaseError::fail("duplicates changed the payload"));
            }
            Ok(())
        })
        .expect("duplicate delivery is idempotent");
}
