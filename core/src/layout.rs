use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable content of one board: where the mines and special cells are, and the
/// adjacency number of every other cell.
///
/// Serialised as a [`LayoutConfig`]; deserialised layouts are rebuilt through
/// [`BoardLayout::from_coords`], so stored numbers and counts always match the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutConfig", into = "LayoutConfig")]
pub struct BoardLayout {
    contents: Array2<CellContent>,
    /// Question cells in id order, `questions[id]` is the cell holding `id`
    questions: Vec<Coord2>,
    mine_count: CellCount,
    surprise_count: CellCount,
}

impl BoardLayout {
    /// Builds a layout from explicit coordinates. Question ids follow the order of
    /// `questions`.
    pub fn from_coords(
        size: Coord2,
        mines: &[Coord2],
        questions: &[Coord2],
        surprises: &[Coord2],
    ) -> Result<Self, ConfigError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(ConfigError::EmptyBoard);
        }

        let mut contents: Array2<CellContent> = Array2::default(size.to_nd_index());
        let placements = [
            (CellContent::Mine, mines),
            (CellContent::Question, questions),
            (CellContent::Surprise, surprises),
        ];

        for (content, coords_list) in placements {
            for &coords in coords_list {
                if coords.0 >= size.0 || coords.1 >= size.1 {
                    return Err(ConfigError::InvalidCoords);
                }
                let cell = &mut contents[coords.to_nd_index()];
                if *cell != CellContent::Empty {
                    return Err(ConfigError::OverlappingContent);
                }
                *cell = content;
            }
        }

        Ok(Self::from_placed(contents, questions.to_vec()))
    }

    /// Finishes a grid holding only `Empty`, `Mine`, `Question` and `Surprise` by
    /// numbering every empty cell that touches a mine.
    pub(crate) fn from_placed(mut contents: Array2<CellContent>, questions: Vec<Coord2>) -> Self {
        let (rows, cols) = grid_size(&contents);
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if contents[coords.to_nd_index()] != CellContent::Empty {
                    continue;
                }
                let adjacent = count_adjacent_mines(&contents, coords);
                if adjacent > 0 {
                    contents[coords.to_nd_index()] = CellContent::Number(adjacent);
                }
            }
        }

        let mut mine_count = 0;
        let mut surprise_count = 0;
        for content in contents.iter() {
            match content {
                CellContent::Mine => mine_count += 1,
                CellContent::Surprise => surprise_count += 1,
                _ => {}
            }
        }

        Self {
            contents,
            questions,
            mine_count,
            surprise_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(MoveError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.contents)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn question_count(&self) -> CellCount {
        // distinct in-range cells, bounded by the cell count
        self.questions.len() as CellCount
    }

    pub fn surprise_count(&self) -> CellCount {
        self.surprise_count
    }

    pub fn content(&self, coords: Coord2) -> CellContent {
        self[coords]
    }

    /// Id of the question stored at `coords`, if that cell is a question cell.
    pub fn question_id(&self, coords: Coord2) -> Option<QuestionId> {
        self.questions
            .iter()
            .position(|&pos| pos == coords)
            .map(|id| id as QuestionId)
    }

    pub fn question_coords(&self) -> &[Coord2] {
        &self.questions
    }

    /// Counts mines around `coords` directly from the grid, ignoring stored numbers.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        count_adjacent_mines(&self.contents, coords)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.contents.iter_neighbors(coords)
    }

    pub fn iter_contents(&self) -> impl Iterator<Item = (Coord2, CellContent)> + '_ {
        self.contents
            .indexed_iter()
            .map(|((row, col), &content)| ((row as Coord, col as Coord), content))
    }
}

impl Index<Coord2> for BoardLayout {
    type Output = CellContent;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.contents[coords.to_nd_index()]
    }
}

/// Unvalidated wire form of a [`BoardLayout`]: the grid size and where each kind of
/// content sits. Numbers are always recomputed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub rows: Coord,
    pub cols: Coord,
    #[serde(default)]
    pub mines: Vec<Coord2>,
    /// In question id order
    #[serde(default)]
    pub questions: Vec<Coord2>,
    #[serde(default)]
    pub surprises: Vec<Coord2>,
}

impl TryFrom<LayoutConfig> for BoardLayout {
    type Error = ConfigError;

    fn try_from(config: LayoutConfig) -> Result<Self, Self::Error> {
        BoardLayout::from_coords(
            (config.rows, config.cols),
            &config.mines,
            &config.questions,
            &config.surprises,
        )
    }
}

impl From<BoardLayout> for LayoutConfig {
    fn from(layout: BoardLayout) -> Self {
        let (rows, cols) = layout.size();
        let of_kind = |kind: CellContent| {
            layout
                .iter_contents()
                .filter(|&(_, content)| content == kind)
                .map(|(coords, _)| coords)
                .collect()
        };
        Self {
            rows,
            cols,
            mines: of_kind(CellContent::Mine),
            surprises: of_kind(CellContent::Surprise),
            questions: layout.questions,
        }
    }
}

fn count_adjacent_mines(contents: &Array2<CellContent>, coords: Coord2) -> u8 {
    // at most eight neighbours
    contents
        .iter_neighbors(coords)
        .filter(|&pos| contents[pos.to_nd_index()].is_mine())
        .count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_count_adjacent_mines() {
        let layout = BoardLayout::from_coords((3, 3), &[(0, 0), (0, 2)], &[], &[]).unwrap();

        assert_eq!(layout.content((0, 1)), CellContent::Number(2));
        assert_eq!(layout.content((1, 1)), CellContent::Number(2));
        assert_eq!(layout.content((1, 0)), CellContent::Number(1));
        assert_eq!(layout.content((2, 1)), CellContent::Empty);
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
    }

    #[test]
    fn special_cells_keep_content_next_to_mines() {
        let layout = BoardLayout::from_coords((2, 2), &[(0, 0)], &[(0, 1)], &[(1, 0)]).unwrap();

        assert_eq!(layout.content((0, 1)), CellContent::Question);
        assert_eq!(layout.content((1, 0)), CellContent::Surprise);
        assert_eq!(layout.content((1, 1)), CellContent::Number(1));
        assert_eq!(layout.adjacent_mine_count((0, 1)), 1);
    }

    #[test]
    fn question_ids_follow_input_order() {
        let layout = BoardLayout::from_coords((3, 3), &[], &[(2, 2), (0, 0)], &[]).unwrap();

        assert_eq!(layout.question_id((2, 2)), Some(0));
        assert_eq!(layout.question_id((0, 0)), Some(1));
        assert_eq!(layout.question_id((1, 1)), None);
        assert_eq!(layout.question_count(), 2);
    }

    #[test]
    fn rejects_overlap_and_out_of_range() {
        assert_eq!(
            BoardLayout::from_coords((3, 3), &[(1, 1)], &[(1, 1)], &[]),
            Err(ConfigError::OverlappingContent)
        );
        assert_eq!(
            BoardLayout::from_coords((3, 3), &[(3, 0)], &[], &[]),
            Err(ConfigError::InvalidCoords)
        );
        assert_eq!(
            BoardLayout::from_coords((0, 3), &[], &[], &[]),
            Err(ConfigError::EmptyBoard)
        );
    }

    #[test]
    fn json_layout_is_rebuilt_from_coordinates() {
        let layout: BoardLayout = serde_json::from_str(
            r#"{"rows":2,"cols":3,"mines":[[0,0]],"questions":[[1,2],[0,2]],"surprises":[[1,1]]}"#,
        )
        .unwrap();

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 5);
        assert_eq!(layout.content((0, 1)), CellContent::Number(1));
        assert_eq!(layout.question_id((0, 2)), Some(1));
        assert_eq!(layout.surprise_count(), 1);

        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(serde_json::from_str::<BoardLayout>(&json).unwrap(), layout);
    }

    #[test]
    fn tampered_json_layout_is_rejected() {
        // field-level counts are not part of the wire form
        let mine_count = serde_json::from_str::<BoardLayout>(
            r#"{"rows":2,"cols":2,"mines":[[0,0]],"mine_count":9}"#,
        )
        .unwrap();
        assert_eq!(mine_count.mine_count(), 1);
        assert_eq!(mine_count.safe_cell_count(), 3);

        for json in [
            r#"{"rows":2,"cols":2,"mines":[[2,0]]}"#,
            r#"{"rows":2,"cols":2,"mines":[[0,0]],"questions":[[0,0]]}"#,
            r#"{"rows":0,"cols":2}"#,
        ] {
            assert!(serde_json::from_str::<BoardLayout>(json).is_err(), "{json}");
        }
    }
}
