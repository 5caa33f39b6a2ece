//! Command line interface for the `packet-sim` binary.
//!
//! Kept free of crate types so the build script can render a man page from
//! the same definition.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;

/// Command line arguments for the `packet-sim` binary.
#[derive(Debug, Parser)]
#[command(
    name = "packet-sim",
    version,
    about = "Break a file into numbered packets, deliver them out of order and reassemble them"
)]
pub struct Cli {
    /// File to send. Prompted for on stdin when omitted.
    pub path: Option<PathBuf>,

    /// Payload bytes per packet.
    // Same value as `packet_reassembly::DEFAULT_CHUNK_SIZE`, which the build
    // script cannot see.
    #[arg(short, long, default_value_t = 5)]
    pub chunk_size: usize,

    /// Seed for the send-order shuffle.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Keep the original send order instead of shuffling.
    #[arg(long)]
    pub in_order: bool,

    /// Packet index to lose in transit. May be repeated.
    #[arg(long = "drop", value_name = "INDEX")]
    pub drops: Vec<u32>,

    /// Packet index to deliver twice. May be repeated.
    #[arg(long = "duplicate", value_name = "INDEX")]
    pub duplicates: Vec<u32>,

    /// Number of concurrent delivery lanes.
    #[arg(short, long, default_value = "1")]
    pub lanes: NonZeroUsize,

    /// Do not tell the receiver how many packets to expect.
    #[arg(long)]
    pub provisional: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use packet_reassembly::DEFAULT_CHUNK_SIZE;

    use super::Cli;

    #[test]
    fn defaults_match_library_chunk_size() {
        let cli = Cli::parse_from(["packet-sim", "message.txt"]);
        assert_eq!(cli.chunk_size, DEFAULT_CHUNK_SIZE.get());
        assert_eq!(cli.lanes.get(), 1);
        assert!(cli.drops.is_empty());
        assert!(!cli.provisional);
        assert_eq!(
            cli.path.as_deref(),
            Some(std::path::Path::new("message.txt"))
        );
    }

    #[test]
    fn parses_repeated_drop_and_duplicate_options() {
        let cli = Cli::parse_from([
            "packet-sim",
            "--drop",
            "2",
            "--drop",
            "5",
            "--duplicate",
            "1",
            "--seed",
            "9",
            "--lanes",
            "4",
        ]);
        assert_eq!(cli.drops, vec![2, 5]);
        assert_eq!(cli.duplicates, vec![1]);
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.lanes.get(), 4);
        assert!(cli.path.is_none());
    }

    #[test]
    fn rejects_zero_lanes() {
        assert!(Cli::try_parse_from(["packet-sim", "--lanes", "0"]).is_err());
    }
}
