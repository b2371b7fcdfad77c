// Pack/pick position bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-indexed position of a pick within the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickPosition {
    pub pack: usize,
    pub pick: usize,
}

impl PickPosition {
    /// Walk the fixed pack sizes against the number of picks already made.
    ///
    /// Once every pack is exhausted the pack number runs one past the last
    /// pack and the pick number counts the overflow.
    pub fn from_picks_made(pack_sizes: &[usize], picks_made: usize) -> Self {
        let mut remaining = picks_made;
        let mut pack = 0;
        while let Some(&size) = pack_sizes.get(pack) {
            if remaining < size {
                break;
            }
            remaining -= size;
            pack += 1;
        }
        Self {
            pack: pack + 1,
            pick: remaining + 1,
        }
    }
}

impl fmt::Display for PickPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}p{}", self.pack, self.pick)
    }
}

/// Direction packs travel between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassDirection {
    /// Seat i passes to seat i + 1.
    Left,
    /// Seat i passes to seat i - 1.
    Right,
}

impl PassDirection {
    /// Even counts of unopened packs pass left, odd counts pass right.
    pub fn for_unopened(remaining: usize) -> Self {
        if remaining % 2 == 0 {
            PassDirection::Left
        } else {
            PassDirection::Right
        }
    }

    /// Seat that receives the pack passed by `seat` at a table of `seats`.
    pub fn target(self, seat: usize, seats: usize) -> usize {
        match self {
            PassDirection::Left => (seat + 1) % seats,
            PassDirection::Right => (seat + seats - 1) % seats,
        }
    }
}
