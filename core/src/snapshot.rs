use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a front end may show for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed { content: CellContent, used: bool },
    /// Unrevealed mine, only shown once the game is over
    Mine,
    /// Flag on a safe cell, only shown once the game is over
    IncorrectFlag,
}

/// Player-visible state of a board. Hidden content stays masked while the game runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub mines_left: isize,
    pub safe_cells_remaining: CellCount,
    pub cells: Array2<CellView>,
}

impl BoardSnapshot {
    pub fn capture(board: &Board, game_over: bool) -> Self {
        let cells = Array2::from_shape_fn(board.size().to_nd_index(), |(row, col)| {
            let cell = board.cell_at((row as Coord, col as Coord));
            match (cell.visibility(), cell.is_mine(), game_over) {
                (Visibility::Revealed, _, _) => CellView::Revealed {
                    content: cell.content(),
                    used: cell.is_used(),
                },
                (Visibility::Hidden, true, true) => CellView::Mine,
                (Visibility::Hidden, _, _) => CellView::Hidden,
                (Visibility::Flagged, false, true) => CellView::IncorrectFlag,
                (Visibility::Flagged, _, _) => CellView::Flagged,
            }
        });

        Self {
            size: board.size(),
            mines_left: board.mines_left(),
            safe_cells_remaining: board.safe_cells_remaining(),
            cells,
        }
    }
}

/// Everything a front end needs to redraw both boards and the shared counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub preset: Preset,
    pub generation: u32,
    pub lives: Points,
    pub score: Points,
    pub state: GameState,
    pub turn: BoardId,
    pub players: [Option<String>; 2],
    pub boards: [BoardSnapshot; 2],
}

impl SessionSnapshot {
    pub fn capture<G: ActivationGateway, L: LayoutGenerator>(session: &GameSession<G, L>) -> Self {
        let game_over = session.state().is_finished();
        let board = |id| BoardSnapshot::capture(session.board(id), game_over);
        let player = |id| session.player_name(id).map(str::to_owned);

        Self {
            preset: *session.preset(),
            generation: session.generation(),
            lives: session.lives(),
            score: session.score(),
            state: session.state(),
            turn: session.turn(),
            players: [player(BoardId::A), player(BoardId::B)],
            boards: [board(BoardId::A), board(BoardId::B)],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
