use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;

/// Purely random placement: mines first, then question cells, then surprise cells,
/// each chosen uniformly among the cells still empty.
#[derive(Clone, Debug)]
pub struct RandomLayoutGenerator {
    seed: u64,
    rng: SmallRng,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(&mut self, preset: &Preset) -> BoardLayout {
        let size = preset.size();
        let cols = usize::from(size.1);
        let mut contents: Array2<CellContent> = Array2::default(size.to_nd_index());
        let mut free_cells = usize::from(preset.total_cells());
        let mut questions = Vec::with_capacity(preset.questions().into());

        let passes = [
            (CellContent::Mine, preset.mines()),
            (CellContent::Question, preset.questions()),
            (CellContent::Surprise, preset.surprises()),
        ];

        let cells = contents
            .as_slice_mut()
            .expect("freshly allocated grids use standard layout");
        for (content, count) in passes {
            let mut placed = 0;
            while placed < count {
                if free_cells == 0 {
                    log::warn!(
                        "Board full, placed {} of {} {:?} cells",
                        placed,
                        count,
                        content
                    );
                    break;
                }

                // pick the n-th still empty cell
                let mut place = self.rng.random_range(0..free_cells);
                let Some(index) = cells.iter().position(|&cell| {
                    if cell != CellContent::Empty {
                        return false;
                    }
                    if place == 0 {
                        return true;
                    }
                    place -= 1;
                    false
                }) else {
                    break;
                };

                cells[index] = content;
                if content == CellContent::Question {
                    questions.push(((index / cols) as Coord, (index % cols) as Coord));
                }
                placed += 1;
                free_cells -= 1;
            }
        }

        let layout = BoardLayout::from_placed(contents, questions);
        log::debug!(
            "Generated {}x{} layout: {} mines, {} questions, {} surprises",
            size.0,
            size.1,
            layout.mine_count(),
            layout.question_count(),
            layout.surprise_count()
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(layout: &BoardLayout, wanted: CellContent) -> usize {
        layout
            .iter_contents()
            .filter(|&(_, content)| content == wanted)
            .count()
    }

    #[test]
    fn places_exact_counts_for_every_preset() {
        let mut generator = RandomLayoutGenerator::new(7);
        for (name, preset) in Preset::ALL {
            let layout = generator.generate(&preset);

            assert_eq!(layout.size(), preset.size(), "{name}");
            assert_eq!(count(&layout, CellContent::Mine), usize::from(preset.mines()), "{name}");
            assert_eq!(
                count(&layout, CellContent::Question),
                usize::from(preset.questions()),
                "{name}"
            );
            assert_eq!(
                count(&layout, CellContent::Surprise),
                usize::from(preset.surprises()),
                "{name}"
            );
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = RandomLayoutGenerator::new(42).generate(&Preset::MEDIUM);
        let b = RandomLayoutGenerator::new(42).generate(&Preset::MEDIUM);
        assert_eq!(a, b);
    }

    #[test]
    fn entropy_seed_replays() {
        let mut generator = RandomLayoutGenerator::from_entropy();
        let seed = generator.seed();
        let first = generator.generate(&Preset::EASY);

        assert_eq!(generator.seed(), seed);
        assert_eq!(RandomLayoutGenerator::new(seed).generate(&Preset::EASY), first);
    }

    #[test]
    fn consecutive_boards_differ() {
        let mut generator = RandomLayoutGenerator::new(3);
        let a = generator.generate(&Preset::HARD);
        let b = generator.generate(&Preset::HARD);
        assert_ne!(a, b);
    }

    #[test]
    fn completely_full_board() {
        let preset = Preset::new((2, 3), 3, 2, 1, 1, 1).unwrap();
        let layout = RandomLayoutGenerator::new(0).generate(&preset);

        assert_eq!(count(&layout, CellContent::Empty), 0);
        assert_eq!(layout.mine_count(), 3);
        assert_eq!(layout.question_count(), 2);
        assert_eq!(layout.surprise_count(), 1);
    }

    #[test]
    fn question_ids_point_at_question_cells() {
        let layout = RandomLayoutGenerator::new(11).generate(&Preset::EASY);

        for (id, &coords) in layout.question_coords().iter().enumerate() {
            assert_eq!(layout.content(coords), CellContent::Question);
            assert_eq!(layout.question_id(coords), Some(id as QuestionId));
        }
    }
}
