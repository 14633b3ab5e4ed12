use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::*;

/// A [`GameSession`] that several input threads can drive.
///
/// Every call takes the one session lock for its whole duration, so a move, its
/// flood fill, the shared-counter updates and the state check are atomic with
/// respect to every other move. Clones share the same session.
#[derive(Debug)]
pub struct SharedSession<G = NoEffect, L = RandomLayoutGenerator> {
    inner: Arc<Mutex<GameSession<G, L>>>,
}

impl<G, L> Clone for SharedSession<G, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: ActivationGateway, L: LayoutGenerator> SharedSession<G, L> {
    pub fn new(session: GameSession<G, L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameSession<G, L>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reveal(&self, board: BoardId, coords: Coord2) -> Result<RevealMove<G::Effect>> {
        self.lock().reveal(board, coords)
    }

    pub fn toggle_flag(&self, board: BoardId, coords: Coord2) -> Result<FlagMove> {
        self.lock().toggle_flag(board, coords)
    }

    pub fn end_turn(&self) -> Result<BoardId> {
        self.lock().end_turn()
    }

    pub fn restart(&self) -> Result<(), ConfigError> {
        self.lock().restart()
    }

    pub fn start(&self, preset: Preset) -> Result<(), ConfigError> {
        self.lock().start(preset)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.lock())
    }

    /// Runs `f` with the session locked, for reads that must see one consistent state.
    pub fn with<R>(&self, f: impl FnOnce(&GameSession<G, L>) -> R) -> R {
        f(&self.lock())
    }
}
