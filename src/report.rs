//! Human-readable rendering of fragments and reassembly results.

use std::fmt;

use crate::fragment::{Fragment, FragmentIndex};

/// Display adapter printing one fragment as `Packet #n: 'payload'`.
///
/// Payload bytes that are not valid UTF-8 are shown with replacement
/// characters.
///
/// # Examples
///
/// ```
/// use packet_reassembly::{
///     fragment::{Fragment, FragmentIndex},
///     report::PacketLine,
/// };
/// let fragment = Fragment::new(FragmentIndex::new(2), "!");
/// assert_eq!(PacketLine::new("Sent ", &fragment).to_string(), "  Sent Packet #2: '!'");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PacketLine<'a> {
    label: &'a str,
    fragment: &'a Fragment,
}

impl<'a> PacketLine<'a> {
    /// Prefix `fragment` with `label` (for example `"Sent "`).
    #[must_use]
    pub const fn new(label: &'a str, fragment: &'a Fragment) -> Self { Self { label, fragment } }
}

impl fmt::Display for PacketLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {}Packet #{}: '{}'",
            self.label,
            self.fragment.sequence_index(),
            String::from_utf8_lossy(self.fragment.payload())
        )
    }
}

/// Render the gap report for an incomplete reassembly.
#[must_use]
pub fn missing_line(missing: &[FragmentIndex]) -> String {
    let packets = missing
        .iter()
        .map(|index| format!("#{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if missing.len() == 1 { "packet" } else { "packets" };
    format!("Missing {noun} {packets} -- message incomplete")
}

/// Comparison of the reconstructed stream with the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The streams are byte-identical.
    Match,
    /// The streams differ.
    Mismatch,
}

impl Verdict {
    /// Compare `original` with `reconstructed`.
    #[must_use]
    pub fn compare(original: &[u8], reconstructed: &[u8]) -> Self {
        if original == reconstructed {
            Self::Match
        } else {
            Self::Mismatch
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => f.write_str("Success: reconstructed message matches original."),
            Self::Mismatch => f.write_str("Warning: reconstructed message differs from original."),
        }
    }
}
