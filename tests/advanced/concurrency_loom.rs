#![cfg(all(feature = "advanced-tests", loom))]
//! Concurrency tests for the shared reassembler using loom.
//!
//! `loom` explores interleavings of concurrent ingests to ensure the slot
//! table and received count stay consistent and `finalize` never observes a
//! torn update.

use loom::{model, thread};
use packet_reassembly::{FragmentIndex, IngestStatus, SharedReassembler, fragment};

#[test]
fn concurrent_ingests_complete_the_stream() {
    model(|| {
        let set = fragment("HELLOWORLD", 5).expect("positive chunk size");
        let shared = SharedReassembler::begin(Some(set.len())).expect("valid count");
        let mut fragments = set.into_fragments().into_iter();
        let first = fragments.next().expect("first fragment");
        let second = fragments.next().expect("second fragment");

        let h1 = shared.clone();
        let h2 = shared.clone();
        let t1 = thread::spawn(move || h1.ingest(first));
        let t2 = thread::spawn(move || h2.ingest(second));

        assert_eq!(t1.join().expect("first ingest panicked"), IngestStatus::Accepted);
        assert_eq!(t2.join().expect("second ingest panicked"), IngestStatus::Accepted);
        assert_eq!(shared.finalize().expect("complete"), b"HELLOWORLD");
    });
}

#[test]
fn racing_duplicates_count_once() {
    model(|| {
        let set = fragment("ab", 1).expect("positive chunk size");
        let shared = SharedReassembler::begin(Some(set.len())).expect("valid count");
        let copy = set.get(FragmentIndex::zero()).cloned().expect("fragment 0");

        let h1 = shared.clone();
        let h2 = shared.clone();
        let a = copy.clone();
        let t1 = thread::spawn(move || h1.ingest(a));
        let t2 = thread::spawn(move || h2.ingest(copy));

        let mut statuses = vec![
            t1.join().expect("first ingest panicked"),
            t2.join().expect("second ingest panicked"),
        ];
        statuses.sort_by_key(|status| *status == IngestStatus::Duplicate);
        assert_eq!(statuses, vec![IngestStatus::Accepted, IngestStatus::Duplicate]);
        assert_eq!(shared.received_count(), 1);
        assert_eq!(shared.missing_indices(), vec![FragmentIndex::new(1)]);
    });
}
