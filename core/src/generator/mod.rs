use std::collections::VecDeque;

use crate::*;
pub use random::*;

mod random;

/// Produces the content layout for a fresh board.
pub trait LayoutGenerator {
    /// `preset` has already been validated, so its content always fits.
    fn generate(&mut self, preset: &Preset) -> BoardLayout;
}

/// Hands out prepared layouts in order, then falls back to `fallback`.
///
/// Hosts use this to replay scripted boards; tests use it to pin content.
#[derive(Clone, Debug)]
pub struct FixedLayouts<G> {
    layouts: VecDeque<BoardLayout>,
    fallback: G,
}

impl<G: LayoutGenerator> FixedLayouts<G> {
    pub fn new(layouts: impl IntoIterator<Item = BoardLayout>, fallback: G) -> Self {
        Self {
            layouts: layouts.into_iter().collect(),
            fallback,
        }
    }
}

impl<G: LayoutGenerator> LayoutGenerator for FixedLayouts<G> {
    fn generate(&mut self, preset: &Preset) -> BoardLayout {
        match self.layouts.pop_front() {
            Some(layout) => layout,
            None => self.fallback.generate(preset),
        }
    }
}
