use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// Identifier linking a question cell to question data owned by the host.
pub type QuestionId = u32;

/// Fixed content of a cell, decided when the board is laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    /// Safe cell with no adjacent mines
    #[default]
    Empty,
    Mine,
    Question,
    Surprise,
    /// Safe cell with 1 to 8 adjacent mines
    Number(u8),
}

impl CellContent {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn special_kind(self) -> Option<SpecialKind> {
        match self {
            Self::Question => Some(SpecialKind::Question),
            Self::Surprise => Some(SpecialKind::Surprise),
            _ => None,
        }
    }
}

/// The two kinds of cells that carry a one-time activation effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    Question,
    Surprise,
}

impl From<SpecialKind> for CellContent {
    fn from(kind: SpecialKind) -> Self {
        match kind {
            SpecialKind::Question => CellContent::Question,
            SpecialKind::Surprise => CellContent::Surprise,
        }
    }
}

/// What the owning player currently sees of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// A single board cell. Content never changes after layout; only visibility and
/// the `used` flag are mutated, and only by the owning board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    content: CellContent,
    visibility: Visibility,
    used: bool,
    question_id: Option<QuestionId>,
}

impl Cell {
    pub(crate) const fn new(
        coords: Coord2,
        content: CellContent,
        question_id: Option<QuestionId>,
    ) -> Self {
        Self {
            coords,
            content,
            visibility: Visibility::Hidden,
            used: false,
            question_id,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn row(&self) -> Coord {
        self.coords.0
    }

    pub const fn col(&self) -> Coord {
        self.coords.1
    }

    pub const fn content(&self) -> CellContent {
        self.content
    }

    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether a question/surprise cell already fired its activation.
    pub const fn is_used(&self) -> bool {
        self.used
    }

    pub const fn question_id(&self) -> Option<QuestionId> {
        self.question_id
    }

    pub const fn is_mine(&self) -> bool {
        self.content.is_mine()
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.visibility, Visibility::Flagged)
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// Marks a special cell used, returning whether it had been used before.
    pub(crate) fn mark_used(&mut self) -> bool {
        core::mem::replace(&mut self.used, true)
    }
}
