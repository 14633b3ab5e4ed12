use thiserror::Error;

use crate::{BoardId, CellCount, GameState};

/// A preset or layout that cannot produce a valid board.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Too many mines and special cells: {requested} requested, board only has {capacity}")]
    TooManyCells {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Preset must start with at least one life")]
    NoLives,
    #[error("Layout size does not match the preset")]
    LayoutMismatch,
    #[error("Unknown preset name")]
    UnknownPreset,
    #[error("Layout coordinates out of range")]
    InvalidCoords,
    #[error("Layout places two contents on the same cell")]
    OverlappingContent,
}

/// Why a reveal, flag or turn change had no effect.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
    #[error("Cell is flagged")]
    Flagged,
    #[error("Game is not running ({0:?}), no new moves are accepted")]
    NotRunning(GameState),
    #[error("It is {expected:?}'s turn, not {requested:?}'s")]
    WrongTurn {
        expected: BoardId,
        requested: BoardId,
    },
}

pub type Result<T, E = MoveError> = core::result::Result<T, E>;
