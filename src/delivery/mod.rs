//! Simulated unreliable delivery between a fragmenter and a reassembler.
//!
//! Real transports reorder, lose and repeat packets. [`DeliveryPlan`]
//! reproduces those effects deterministically (given a seed) so the
//! reassembly engine can be exercised end to end, and [`deliver_concurrently`]
//! fans the surviving fragments out over parallel tasks that share one
//! [`SharedReassembler`](crate::fragment::SharedReassembler).

mod lanes;
mod plan;

pub use lanes::{DeliveryError, LaneReport, deliver_concurrently};
pub use plan::{Delivery, DeliveryPlan};
