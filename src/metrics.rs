//! Metric helpers for the delivery simulator and the CLI.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! every helper compiles to a no-op. The reassembly engine itself records
//! nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking fragments handed to a reassembler.
pub const FRAGMENTS_DELIVERED: &str = "reassembly_fragments_delivered_total";
/// Name of the counter tracking fragments the simulator dropped.
pub const FRAGMENTS_DROPPED: &str = "reassembly_fragments_dropped_total";
/// Name of the counter tracking extra copies the simulator injected.
pub const FRAGMENTS_DUPLICATED: &str = "reassembly_fragments_duplicated_total";
/// Name of the counter tracking finalize outcomes.
pub const REASSEMBLY_OUTCOMES: &str = "reassembly_outcomes_total";

/// Result of a finalize call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every expected fragment was present.
    Complete,
    /// At least one fragment was missing.
    Incomplete,
}

impl Outcome {
    /// Label value recorded for this outcome.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Complete => "complete",
            Outcome::Incomplete => "incomplete",
        }
    }
}

/// Record fragments handed to a reassembler.
pub fn inc_delivered(count: u64) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_DELIVERED).increment(count);
    #[cfg(not(feature = "metrics"))]
    let _ = count;
}

/// Record fragments lost in transit.
pub fn inc_dropped(count: u64) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_DROPPED).increment(count);
    #[cfg(not(feature = "metrics"))]
    let _ = count;
}

/// Record duplicate copies injected in transit.
pub fn inc_duplicated(count: u64) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_DUPLICATED).increment(count);
    #[cfg(not(feature = "metrics"))]
    let _ = count;
}

/// Record the outcome of a finalize call.
pub fn inc_outcome(outcome: Outcome) {
    #[cfg(feature = "metrics")]
    counter!(REASSEMBLY_OUTCOMES, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}
