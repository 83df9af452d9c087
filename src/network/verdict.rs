//! Filtering verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The filtering decision attached to a communication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Verdict {
    #[default]
    Undecided = 0,
    Accept = 1,
    /// Reject so the local application sees the failure.
    Block = 2,
    /// Discard silently.
    Drop = 3,
}

impl Verdict {
    /// Fail-closed default for traffic in `direction`.
    pub fn fail_closed(direction: super::Direction) -> Self {
        match direction {
            super::Direction::Inbound => Verdict::Drop,
            super::Direction::Outbound => Verdict::Block,
        }
    }

    pub fn is_decided(self) -> bool {
        self != Verdict::Undecided
    }

    pub fn denies(self) -> bool {
        matches!(self, Verdict::Block | Verdict::Drop)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Undecided => "<Undecided>",
            Verdict::Accept => "Accept",
            Verdict::Block => "Block",
            Verdict::Drop => "Drop",
        })
    }
}
