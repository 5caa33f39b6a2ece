#![doc(html_root_url = "https://docs.rs/packet-reassembly/latest")]
//! Public API for the `packet_reassembly` library.
//!
//! The [`fragment`] module holds the engine: a fragmenter that numbers
//! fixed-size slices of a byte stream and a reassembler that rebuilds the
//! stream from slices delivered in any order, or reports exactly which
//! indices never arrived. The remaining modules are collaborators used by
//! the `packet-sim` binary: reading the source, simulating lossy delivery
//! and rendering results.

pub mod delivery;
pub mod fragment;
pub mod metrics;
pub mod report;
pub mod source;

pub use fragment::{
    ConfigError,
    DEFAULT_CHUNK_SIZE,
    DEFAULT_MAX_FRAGMENTS,
    Fragment,
    FragmentIndex,
    FragmentSet,
    FragmentationConfig,
    FragmentationError,
    Fragmenter,
    IngestStatus,
    Reassembler,
    ReassemblyError,
    SharedReassembler,
    fragment,
};
