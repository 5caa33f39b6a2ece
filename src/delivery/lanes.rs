//! Concurrent ingestion over several delivery lanes.

use std::num::NonZeroUsize;

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use crate::{
    fragment::{Fragment, IngestStatus, SharedReassembler},
    metrics,
};

/// Errors raised while driving delivery lanes.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A lane task panicked or was cancelled before finishing.
    #[error("delivery lane failed: {0}")]
    Lane(#[from] JoinError),
}

/// Tally of ingest results across all lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneReport {
    /// Fragments that filled an empty slot.
    pub accepted: usize,
    /// Fragments that replaced an existing payload.
    pub duplicates: usize,
    /// Fragments discarded as beyond the expected count.
    pub out_of_range: usize,
}

impl LaneReport {
    fn record(&mut self, status: IngestStatus) {
        match status {
            IngestStatus::Accepted => self.accepted += 1,
            IngestStatus::Duplicate => self.duplicates += 1,
            IngestStatus::OutOfRange => self.out_of_range += 1,
        }
    }

    fn merge(&mut self, other: Self) {
        self.accepted += other.accepted;
        self.duplicates += other.duplicates;
        self.out_of_range += other.out_of_range;
    }

    /// Total fragments ingested.
    #[must_use]
    pub const fn total(&self) -> usize { self.accepted + self.duplicates + self.out_of_range }
}

/// Ingest `fragments` through `lanes` concurrent tasks.
///
/// Fragments are dealt round-robin, preserving their relative order within
/// each lane. The future resolves only after every lane has finished, so a
/// subsequent [`SharedReassembler::finalize`] sees all ingests.
///
/// # Errors
///
/// Returns [`DeliveryError::Lane`] if any lane task fails. The remaining lanes
/// still run to completion before the error is returned.
pub async fn deliver_concurrently(
    fragments: Vec<Fragment>,
    lanes: NonZeroUsize,
    reassembler: &SharedReassembler,
) -> Result<LaneReport, DeliveryError> {
    let mut buckets: Vec<Vec<Fragment>> = (0..lanes.get()).map(|_| Vec::new()).collect();
    for (position, fragment) in fragments.into_iter().enumerate() {
        buckets[position % lanes.get()].push(fragment);
    }

    let mut tasks = JoinSet::new();
    for (lane, bucket) in buckets.into_iter().enumerate() {
        let handle = reassembler.clone();
        tasks.spawn(async move {
            let mut report = LaneReport::default();
            for fragment in bucket {
                report.record(handle.ingest(fragment));
                tokio::task::yield_now().await;
            }
            debug!(lane, ingested = report.total(), "delivery lane finished");
            report
        });
    }

    let mut report = LaneReport::default();
    let mut failure = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(lane) => report.merge(lane),
            Err(err) => {
                error!(error = %err, "delivery lane failed");
                failure.get_or_insert(err);
            }
        }
    }

    if let Some(err) = failure {
        return Err(err.into());
    }
    metrics::inc_delivered(report.total() as u64);
    Ok(report)
}
