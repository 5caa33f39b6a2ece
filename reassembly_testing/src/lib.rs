//! Utilities for driving a [`Reassembler`](packet_reassembly::Reassembler)
//! with explicit, deterministic delivery orders during tests.
//!
//! ```rust
//! use packet_reassembly::{Reassembler, fragment};
//! use reassembly_testing::{ingest_in_order, reversed};
//!
//! let set = fragment("HELLOWORLD", 5).expect("positive chunk size");
//! let mut session = Reassembler::begin(Some(set.len())).expect("valid count");
//! ingest_in_order(&mut session, &set, &reversed(set.len()));
//! assert_eq!(session.finalize().expect("complete"), b"HELLOWORLD");
//! ```

pub mod logging;
pub mod orders;

pub use logging::{LoggerHandle, logger};
pub use orders::{
    ingest_in_order,
    ingest_withholding,
    interleaved,
    reassemble_in_order,
    reversed,
};
