//! Engine for a two-board cooperative minesweeper.
//!
//! Each player owns a private [`Board`]; both share one pool of lives and one score,
//! held by the [`GameSession`] that owns the boards. Boards report what a move did
//! and the session applies every change to the shared counters.

use serde::{Deserialize, Serialize};

pub use activation::*;
pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use preset::*;
pub use session::*;
pub use shared::*;
pub use snapshot::*;
pub use types::*;

mod activation;
mod board;
mod cell;
mod error;
mod generator;
mod layout;
mod preset;
mod session;
mod shared;
mod snapshot;
mod types;

/// Classification of the cell targeted by a reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    MineHit,
    /// Zero-adjacency cell, the reveal flood-filled outward from it
    EmptyOpened,
    NumberOpened(u8),
    SpecialOpened {
        kind: SpecialKind,
        already_used: bool,
    },
}

impl RevealOutcome {
    pub const fn is_mine_hit(self) -> bool {
        matches!(self, Self::MineHit)
    }
}

/// Transition made by a flag toggle, and whether the cell holds a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOutcome {
    Flagged { mine: bool },
    Unflagged { mine: bool },
}

impl FlagOutcome {
    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged { .. })
    }

    pub const fn is_mine(self) -> bool {
        match self {
            Self::Flagged { mine } | Self::Unflagged { mine } => mine,
        }
    }
}
