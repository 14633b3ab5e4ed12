use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// A special cell opened during a reveal, in the order it was opened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialOpened {
    pub coords: Coord2,
    pub kind: SpecialKind,
    pub question_id: Option<QuestionId>,
    pub already_used: bool,
}

/// Everything a single reveal call changed on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealReport {
    /// Classification of the targeted cell
    pub outcome: RevealOutcome,
    /// Every cell that became revealed, starting with the target
    pub opened: Vec<Coord2>,
    /// Special cells among `opened`
    pub specials: Vec<SpecialOpened>,
}

/// One player's private grid.
///
/// The board owns visibility and the one-shot `used` flags. It never touches shared
/// lives or score: every change is reported back as a [`RevealReport`] or
/// [`FlagOutcome`] for the session to apply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    layout: BoardLayout,
    cells: Array2<Cell>,
    safe_cells_remaining: CellCount,
    flag_count: CellCount,
}

impl Board {
    pub fn new(layout: BoardLayout) -> Self {
        let cells = Array2::from_shape_fn(layout.size().to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            Cell::new(coords, layout[coords], layout.question_id(coords))
        });
        Self {
            safe_cells_remaining: layout.safe_cell_count(),
            flag_count: 0,
            layout,
            cells,
        }
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn total_questions(&self) -> CellCount {
        self.layout.question_count()
    }

    pub fn total_surprises(&self) -> CellCount {
        self.layout.surprise_count()
    }

    /// Non-mine cells that have not been revealed yet; zero means the board is cleared.
    pub fn safe_cells_remaining(&self) -> CellCount {
        self.safe_cells_remaining
    }

    pub fn is_cleared(&self) -> bool {
        self.safe_cells_remaining == 0
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Mines not yet covered by a flag, negative when there are more flags than mines.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flag_count as isize)
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.layout
            .validate_coords(coords)
            .ok()
            .map(|coords| &self.cells[coords.to_nd_index()])
    }

    /// # Panics
    ///
    /// If `coords` is out of range.
    pub fn cell_at(&self, coords: Coord2) -> &Cell {
        &self.cells[coords.to_nd_index()]
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Reveals a hidden cell, flood-filling outward from cells with no adjacent mines.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.layout.validate_coords(coords)?;

        match self.cells[coords.to_nd_index()].visibility() {
            Visibility::Revealed => return Err(MoveError::AlreadyRevealed),
            Visibility::Flagged => return Err(MoveError::Flagged),
            Visibility::Hidden => {}
        }

        let mut report = RevealReport {
            outcome: RevealOutcome::EmptyOpened,
            opened: Vec::new(),
            specials: Vec::new(),
        };
        report.outcome = self.open_cell(coords, &mut report);

        if report.outcome == RevealOutcome::EmptyOpened {
            let mut to_visit: VecDeque<_> = self.hidden_neighbors(coords).collect();
            log::trace!(
                "Starting flood-fill from {:?}, initial neighbors: {:?}",
                coords,
                to_visit
            );

            while let Some(visit_coords) = to_visit.pop_front() {
                // revealed and flagged cells are never reopened, which also stops cycles
                if !matches!(
                    self.cells[visit_coords.to_nd_index()].visibility(),
                    Visibility::Hidden
                ) {
                    continue;
                }

                let outcome = self.open_cell(visit_coords, &mut report);
                debug_assert_ne!(outcome, RevealOutcome::MineHit);
                log::trace!("Flood opened cell at {:?}: {:?}", visit_coords, outcome);

                if outcome == RevealOutcome::EmptyOpened {
                    to_visit.extend(self.hidden_neighbors(visit_coords));
                }
            }
        }

        log::debug!(
            "Revealed {:?}: {:?}, {} cells opened, {} safe cells remaining",
            coords,
            report.outcome,
            report.opened.len(),
            self.safe_cells_remaining
        );
        Ok(report)
    }

    /// Switches a hidden cell to flagged or a flagged cell back to hidden.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];
        let mine = cell.is_mine();

        match cell.visibility() {
            Visibility::Hidden => {
                cell.set_visibility(Visibility::Flagged);
                self.flag_count += 1;
                Ok(FlagOutcome::Flagged { mine })
            }
            Visibility::Flagged => {
                cell.set_visibility(Visibility::Hidden);
                self.flag_count -= 1;
                Ok(FlagOutcome::Unflagged { mine })
            }
            Visibility::Revealed => Err(MoveError::AlreadyRevealed),
        }
    }

    /// Reveals exactly one hidden cell and classifies it.
    fn open_cell(&mut self, coords: Coord2, report: &mut RevealReport) -> RevealOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.set_visibility(Visibility::Revealed);
        report.opened.push(coords);

        if !cell.is_mine() {
            self.safe_cells_remaining -= 1;
        }

        match cell.content() {
            CellContent::Mine => RevealOutcome::MineHit,
            CellContent::Empty => RevealOutcome::EmptyOpened,
            CellContent::Number(count) => RevealOutcome::NumberOpened(count),
            CellContent::Question => open_special(cell, SpecialKind::Question, report),
            CellContent::Surprise => open_special(cell, SpecialKind::Surprise, report),
        }
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| matches!(self.cells[pos.to_nd_index()].visibility(), Visibility::Hidden))
    }

    /// Puts a revealed cell back to hidden, keeping the safe-cell counter consistent.
    #[cfg(test)]
    pub(crate) fn conceal(&mut self, coords: Coord2) {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_revealed() {
            cell.set_visibility(Visibility::Hidden);
            if !cell.is_mine() {
                self.safe_cells_remaining += 1;
            }
        }
    }
}

/// Fires the one-shot `used` flag of a special cell and records it.
fn open_special(cell: &mut Cell, kind: SpecialKind, report: &mut RevealReport) -> RevealOutcome {
    let already_used = cell.mark_used();
    report.specials.push(SpecialOpened {
        coords: cell.coords(),
        kind,
        question_id: cell.question_id(),
        already_used,
    });
    RevealOutcome::SpecialOpened { kind, already_used }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::new(BoardLayout::from_coords(size, mines, &[], &[]).unwrap())
    }

    #[test]
    fn reveal_mine_reports_hit_without_touching_safe_count() {
        let mut board = board((2, 2), &[(0, 0)]);

        let report = board.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::MineHit);
        assert_eq!(report.opened, vec![(0, 0)]);
        assert_eq!(board.safe_cells_remaining(), 3);
        assert!(board.cell_at((0, 0)).is_revealed());
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region_and_fringe() {
        let mut board = board((3, 3), &[(2, 2)]);

        let report = board.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::EmptyOpened);
        assert_eq!(report.opened.len(), 8);
        assert!(board.cell_at((1, 1)).is_revealed());
        assert_eq!(board.cell_at((1, 1)).content(), CellContent::Number(1));
        assert!(!board.cell_at((2, 2)).is_revealed());
        assert!(board.is_cleared());
    }

    #[test]
    fn flood_fill_stops_at_numbers() {
        // column 2 is a wall of mines, column 1 is numbered
        let mut board = board((3, 5), &[(0, 2), (1, 2), (2, 2)]);

        board.reveal((1, 0)).unwrap();

        for row in 0..3 {
            assert!(board.cell_at((row, 0)).is_revealed());
            assert!(board.cell_at((row, 1)).is_revealed());
            assert!(!board.cell_at((row, 2)).is_revealed());
            assert!(!board.cell_at((row, 3)).is_revealed());
            assert!(!board.cell_at((row, 4)).is_revealed());
        }
        assert_eq!(board.safe_cells_remaining(), 6);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut board = board((3, 3), &[]);
        board.toggle_flag((1, 1)).unwrap();

        let report = board.reveal((0, 0)).unwrap();

        assert_eq!(report.opened.len(), 8);
        assert!(board.cell_at((1, 1)).is_flagged());
        assert_eq!(board.safe_cells_remaining(), 1);
    }

    #[test]
    fn reveal_number_does_not_cascade() {
        let mut board = board((3, 3), &[(0, 0)]);

        let report = board.reveal((1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::NumberOpened(1));
        assert_eq!(report.opened, vec![(1, 1)]);
        assert_eq!(board.safe_cells_remaining(), 7);
    }

    #[test]
    fn rejects_revealed_flagged_and_out_of_range() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 1)).unwrap();

        assert_eq!(board.reveal((1, 1)), Err(MoveError::AlreadyRevealed));
        assert_eq!(board.reveal((0, 1)), Err(MoveError::Flagged));
        assert_eq!(board.reveal((2, 0)), Err(MoveError::InvalidCoords));
        assert_eq!(board.safe_cells_remaining(), 2);
    }

    #[test]
    fn special_cell_is_marked_used_once() {
        let layout = BoardLayout::from_coords((2, 2), &[(1, 1)], &[(0, 0)], &[]).unwrap();
        let mut board = Board::new(layout);

        let first = board.reveal((0, 0)).unwrap();
        assert_eq!(
            first.outcome,
            RevealOutcome::SpecialOpened {
                kind: SpecialKind::Question,
                already_used: false
            }
        );
        assert_eq!(first.specials[0].question_id, Some(0));
        assert!(board.cell_at((0, 0)).is_used());

        board.conceal((0, 0));
        let second = board.reveal((0, 0)).unwrap();
        assert_eq!(
            second.outcome,
            RevealOutcome::SpecialOpened {
                kind: SpecialKind::Question,
                already_used: true
            }
        );
    }

    #[test]
    fn cascade_reports_special_cells_on_fringe() {
        let layout = BoardLayout::from_coords((1, 4), &[], &[], &[(0, 2)]).unwrap();
        let mut board = Board::new(layout);

        let report = board.reveal((0, 0)).unwrap();

        // the surprise cell stops expansion, so (0, 3) stays hidden
        assert_eq!(report.opened, vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(report.specials.len(), 1);
        assert_eq!(report.specials[0].kind, SpecialKind::Surprise);
        assert!(!report.specials[0].already_used);
        assert!(!board.cell_at((0, 3)).is_revealed());
    }

    #[test]
    fn toggle_flag_round_trip() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.toggle_flag((0, 0)), Ok(FlagOutcome::Flagged { mine: true }));
        assert_eq!(board.mines_left(), 0);
        assert_eq!(board.toggle_flag((0, 0)), Ok(FlagOutcome::Unflagged { mine: true }));
        assert_eq!(board.toggle_flag((1, 1)), Ok(FlagOutcome::Flagged { mine: false }));
        assert_eq!(board.flag_count(), 1);
    }

    #[test]
    fn cannot_flag_revealed_cell() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.reveal((1, 1)).unwrap();

        assert_eq!(board.toggle_flag((1, 1)), Err(MoveError::AlreadyRevealed));
        assert_eq!(board.toggle_flag((5, 5)), Err(MoveError::InvalidCoords));
    }

    #[test]
    fn cell_lookup_is_bounds_checked() {
        let board = board((2, 3), &[(1, 2)]);

        assert_eq!(board.cell((1, 2)).map(Cell::content), Some(CellContent::Mine));
        assert_eq!(board.cell((0, 0)).map(Cell::coords), Some((0, 0)));
        assert!(board.cell((2, 0)).is_none());
        assert!(board.cell((0, 3)).is_none());
    }

    #[test]
    fn large_open_board_clears_without_recursion() {
        let mut board = board((255, 255), &[]);

        let report = board.reveal((127, 127)).unwrap();

        assert_eq!(report.opened.len(), 255 * 255);
        assert!(board.is_cleared());
    }
}
