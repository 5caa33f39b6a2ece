//! Reordering, loss and duplication applied to a fragment set.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::{
    fragment::{Fragment, FragmentIndex, FragmentSet},
    metrics,
};

/// Describes how a [`FragmentSet`] is mangled on its way to the receiver.
///
/// The default plan shuffles with a random seed and neither drops nor
/// duplicates anything.
///
/// # Examples
///
/// ```
/// use packet_reassembly::{
///     delivery::DeliveryPlan,
///     fragment::{FragmentIndex, fragment},
/// };
///
/// let set = fragment("HELLOWORLD!", 5).expect("positive chunk size");
/// let delivery = DeliveryPlan::new()
///     .seed(7)
///     .drop_index(FragmentIndex::new(2))
///     .deliver(&set);
/// assert_eq!(delivery.sent().len(), 3);
/// assert_eq!(delivery.arrived().len(), 2);
/// assert_eq!(delivery.dropped(), &[FragmentIndex::new(2)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryPlan {
    seed: Option<u64>,
    shuffled: bool,
    dropped: BTreeSet<FragmentIndex>,
    duplicated: BTreeSet<FragmentIndex>,
}

impl DeliveryPlan {
    /// Create a plan that shuffles fragments with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: None,
            shuffled: true,
            dropped: BTreeSet::new(),
            duplicated: BTreeSet::new(),
        }
    }

    /// Create a plan that keeps the original send order.
    #[must_use]
    pub fn in_order() -> Self { Self::new().shuffled(false) }

    /// Fix the shuffle seed so repeated runs send in the same order.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable shuffling.
    #[must_use]
    pub fn shuffled(mut self, shuffled: bool) -> Self {
        self.shuffled = shuffled;
        self
    }

    /// Lose the fragment carrying `index`.
    #[must_use]
    pub fn drop_index(mut self, index: FragmentIndex) -> Self {
        self.dropped.insert(index);
        self
    }

    /// Deliver the fragment carrying `index` twice.
    #[must_use]
    pub fn duplicate_index(mut self, index: FragmentIndex) -> Self {
        self.duplicated.insert(index);
        self
    }

    /// Apply the plan to `set`.
    ///
    /// Indices named by the plan that do not exist in `set` are ignored.
    /// A dropped index is never duplicated.
    #[must_use]
    pub fn deliver(&self, set: &FragmentSet) -> Delivery {
        let mut sent = set.fragments().to_vec();
        if self.shuffled {
            let mut rng = self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
            rng.shuffle(&mut sent);
        }

        for index in self.dropped.iter().chain(&self.duplicated) {
            if set.get(*index).is_none() {
                warn!(%index, fragments = set.len(), "plan names unknown fragment index");
            }
        }

        let mut arrived = Vec::with_capacity(sent.len() + self.duplicated.len());
        let mut dropped = Vec::new();
        let mut duplicated = Vec::new();
        for fragment in &sent {
            let index = fragment.sequence_index();
            if self.dropped.contains(&index) {
                debug!(%index, "fragment lost in transit");
                dropped.push(index);
                continue;
            }
            arrived.push(fragment.clone());
            if self.duplicated.contains(&index) {
                debug!(%index, "fragment duplicated in transit");
                arrived.push(fragment.clone());
                duplicated.push(index);
            }
        }
        dropped.sort_unstable();
        duplicated.sort_unstable();

        metrics::inc_dropped(dropped.len() as u64);
        metrics::inc_duplicated(duplicated.len() as u64);
        info!(
            sent = sent.len(),
            arrived = arrived.len(),
            dropped = dropped.len(),
            duplicated = duplicated.len(),
            "simulated delivery"
        );

        Delivery {
            sent,
            arrived,
            dropped,
            duplicated,
        }
    }
}

impl Default for DeliveryPlan {
    fn default() -> Self { Self::new() }
}

/// Fragments as seen by each end of a simulated delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    sent: Vec<Fragment>,
    arrived: Vec<Fragment>,
    dropped: Vec<FragmentIndex>,
    duplicated: Vec<FragmentIndex>,
}

impl Delivery {
    /// Every fragment in the order the sender emitted them.
    #[must_use]
    pub fn sent(&self) -> &[Fragment] { &self.sent }

    /// Fragments in the order the receiver sees them.
    #[must_use]
    pub fn arrived(&self) -> &[Fragment] { &self.arrived }

    /// Indices lost in transit, ascending.
    #[must_use]
    pub fn dropped(&self) -> &[FragmentIndex] { &self.dropped }

    /// Indices delivered twice, ascending.
    #[must_use]
    pub fn duplicated(&self) -> &[FragmentIndex] { &self.duplicated }

    /// Consume the delivery, returning the arrived fragments.
    #[must_use]
    pub fn into_arrived(self) -> Vec<Fragment> { self.arrived }
}
