pub mod bot;
pub mod pick;
pub mod seen;
pub mod state;

use thiserror::Error;

use crate::deck::DeckError;

pub use pick::{PassDirection, PickPosition};
pub use state::{DraftSession, Seat, SeatSpec};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("a draft needs at least one seat")]
    NoSeats,

    #[error("{packs} seats' worth of packs dealt to a table of {seats}")]
    SeatCountMismatch { seats: usize, packs: usize },

    #[error("seat {seat} was dealt {got} packs, expected {expected}")]
    PackCountMismatch {
        seat: usize,
        expected: usize,
        got: usize,
    },

    #[error("no human seat in this draft")]
    NoHumanSeat,

    #[error("card index {index} out of range for a pack of {len}")]
    CardIndexOutOfRange { index: usize, len: usize },

    #[error("the draft is already complete")]
    DraftComplete,

    #[error("a deck arrangement needs exactly 16 buckets, got {got}")]
    BadArrangement { got: usize },

    #[error("deck construction failed: {0}")]
    DeckConstruction(#[from] DeckError),
}
