//! Fragmentation and order-independent reassembly of byte streams.
//!
//! This module collects the engine types: the outbound [`Fragmenter`], the
//! inbound [`Reassembler`] and the value types passed between them. Each
//! sub-module focuses on a single concept to keep the code small and easy to
//! audit. Nothing in here performs I/O or logs; failures are returned to the
//! caller as typed errors.

pub mod config;
pub mod error;
pub mod fragmenter;
pub mod index;
pub mod packet;
pub mod reassembler;
pub mod shared;

pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_FRAGMENTS, FragmentationConfig};
pub use error::{ConfigError, FragmentationError, IngestStatus, ReassemblyError};
pub use fragmenter::{FragmentSet, Fragmenter, fragment};
pub use index::FragmentIndex;
pub use packet::Fragment;
pub use reassembler::Reassembler;
pub use shared::SharedReassembler;
