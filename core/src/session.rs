use serde::{Deserialize, Serialize};

use crate::*;

/// Which player's board a move targets. Player A always moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardId {
    A,
    B,
}

impl BoardId {
    pub const ALL: [BoardId; 2] = [BoardId::A, BoardId::B];

    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Valid transitions:
/// - Running -> Won
/// - Running -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Running,
    /// Every safe cell on both boards is revealed
    Won,
    /// Shared lives ran out
    Lost,
}

impl GameState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// When the turn passes to the other player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPolicy {
    /// After every accepted reveal or flag toggle
    #[default]
    EveryMove,
    /// After every accepted reveal; flag toggles keep the turn
    RevealOnly,
    /// Only through [`GameSession::end_turn`]
    Manual,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub turn_policy: TurnPolicy,
    /// Score gained for flagging a mine
    pub flag_reward: u16,
    /// Score lost for flagging a safe cell
    pub flag_penalty: u16,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            turn_policy: TurnPolicy::default(),
            flag_reward: 10,
            flag_penalty: 10,
        }
    }
}

/// What happened to one first-time or repeat special cell during a reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation<E> {
    /// Cost was paid and the gateway ran
    Triggered { special: SpecialOpened, effect: E },
    /// Not enough score; the cell is used up regardless
    Unaffordable { special: SpecialOpened },
    /// Cell had already fired before
    AlreadyUsed { special: SpecialOpened },
}

/// Result of an accepted reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealMove<E> {
    pub board: BoardId,
    pub report: RevealReport,
    pub lives_delta: Points,
    pub score_delta: Points,
    pub activations: Vec<Activation<E>>,
    pub state: GameState,
    /// Whose turn it is after the move
    pub turn: BoardId,
}

impl<E> RevealMove<E> {
    pub fn outcome(&self) -> RevealOutcome {
        self.report.outcome
    }
}

/// Result of an accepted flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagMove {
    pub board: BoardId,
    pub coords: Coord2,
    pub outcome: FlagOutcome,
    pub score_delta: Points,
    pub state: GameState,
    pub turn: BoardId,
}

/// A cooperative game from start to finish, restartable with fresh boards.
///
/// The session is the only owner of both boards and the only writer of the shared
/// lives and score. Every move is checked against the game state and the turn
/// before it reaches a board.
#[derive(Debug)]
pub struct GameSession<G = NoEffect, L = RandomLayoutGenerator> {
    preset: Preset,
    options: SessionOptions,
    boards: [Board; 2],
    players: [Option<String>; 2],
    lives: Points,
    score: Points,
    state: GameState,
    turn: BoardId,
    generation: u32,
    gateway: G,
    generator: L,
}

impl GameSession {
    /// Starts a session with randomly seeded boards and no activation effects.
    pub fn new(preset: Preset) -> Result<Self, ConfigError> {
        Self::with_parts(
            preset,
            SessionOptions::default(),
            RandomLayoutGenerator::from_entropy(),
            NoEffect,
        )
    }

    /// Starts a session whose boards, including those after restarts, follow `seed`.
    pub fn with_seed(preset: Preset, seed: u64) -> Result<Self, ConfigError> {
        Self::with_parts(
            preset,
            SessionOptions::default(),
            RandomLayoutGenerator::new(seed),
            NoEffect,
        )
    }
}

impl<G: ActivationGateway, L: LayoutGenerator> GameSession<G, L> {
    pub fn with_parts(
        preset: Preset,
        options: SessionOptions,
        mut generator: L,
        gateway: G,
    ) -> Result<Self, ConfigError> {
        preset.validate()?;
        let boards = generate_boards(&preset, &mut generator)?;
        let mut session = Self {
            preset,
            options,
            boards,
            players: [None, None],
            lives: Points::from(preset.starting_lives()),
            score: 0,
            state: GameState::Running,
            turn: BoardId::A,
            generation: 0,
            gateway,
            generator,
        };
        session.update_state();
        log::debug!("Started {} session", preset);
        Ok(session)
    }

    /// Replaces the preset and starts over.
    pub fn start(&mut self, preset: Preset) -> Result<(), ConfigError> {
        preset.validate()?;
        let boards = generate_boards(&preset, &mut self.generator)?;
        self.preset = preset;
        self.reset(boards);
        Ok(())
    }

    /// Discards both boards and all shared counters, then deals fresh boards from the
    /// same preset.
    ///
    /// Random generators never fail here; a [`FixedLayouts`] generator can hand out a
    /// layout of the wrong size, which leaves the session untouched.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let boards = generate_boards(&self.preset, &mut self.generator)?;
        self.reset(boards);
        Ok(())
    }

    fn reset(&mut self, boards: [Board; 2]) {
        self.boards = boards;
        self.lives = Points::from(self.preset.starting_lives());
        self.score = 0;
        self.state = GameState::Running;
        self.turn = BoardId::A;
        self.generation = self.generation.wrapping_add(1);
        self.update_state();
        log::debug!(
            "Restarted {} session, generation {}",
            self.preset,
            self.generation
        );
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn board(&self, board: BoardId) -> &Board {
        &self.boards[board.index()]
    }

    pub fn boards(&self) -> impl Iterator<Item = (BoardId, &Board)> {
        BoardId::ALL.into_iter().zip(self.boards.iter())
    }

    pub fn lives(&self) -> Points {
        self.lives
    }

    pub fn score(&self) -> Points {
        self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn turn(&self) -> BoardId {
        self.turn
    }

    /// Bumped by every restart, so hosts can tell fresh boards from old ones.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn player_name(&self, board: BoardId) -> Option<&str> {
        self.players[board.index()].as_deref()
    }

    pub fn set_player_name(&mut self, board: BoardId, name: impl Into<String>) {
        self.players[board.index()] = Some(name.into());
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Reveals a cell on the board whose turn it is and applies the shared effects.
    pub fn reveal(&mut self, board: BoardId, coords: Coord2) -> Result<RevealMove<G::Effect>> {
        self.check_move(board)?;
        let report = self.boards[board.index()].reveal(coords)?;

        let lives_delta = if report.outcome.is_mine_hit() { -1 } else { 0 };
        self.lives = self.lives.saturating_add(lives_delta);

        let score_before = self.score;
        let activations = report
            .specials
            .iter()
            .map(|&special| self.activate(special))
            .collect();
        let score_delta = self.score.saturating_sub(score_before);

        self.update_state();
        if self.options.turn_policy != TurnPolicy::Manual {
            self.advance_turn();
        }

        Ok(RevealMove {
            board,
            report,
            lives_delta,
            score_delta,
            activations,
            state: self.state,
            turn: self.turn,
        })
    }

    /// Toggles a flag on the board whose turn it is. Only hidden-to-flagged changes
    /// score; clearing a flag never refunds it.
    pub fn toggle_flag(&mut self, board: BoardId, coords: Coord2) -> Result<FlagMove> {
        self.check_move(board)?;
        let outcome = self.boards[board.index()].toggle_flag(coords)?;

        let reward = match outcome {
            FlagOutcome::Flagged { mine: true } => Points::from(self.options.flag_reward),
            FlagOutcome::Flagged { mine: false } => -Points::from(self.options.flag_penalty),
            FlagOutcome::Unflagged { .. } => 0,
        };
        // score saturates, so the reported delta is what was actually applied
        let score_before = self.score;
        self.score = self.score.saturating_add(reward);
        let score_delta = self.score - score_before;
        log::debug!(
            "{:?} flag at {:?}: {:?}, score {:+}",
            board,
            coords,
            outcome,
            score_delta
        );

        self.update_state();
        if self.options.turn_policy == TurnPolicy::EveryMove {
            self.advance_turn();
        }

        Ok(FlagMove {
            board,
            coords,
            outcome,
            score_delta,
            state: self.state,
            turn: self.turn,
        })
    }

    /// Passes the turn to the other player.
    pub fn end_turn(&mut self) -> Result<BoardId> {
        self.check_running()?;
        self.advance_turn();
        Ok(self.turn)
    }

    fn activate(&mut self, special: SpecialOpened) -> Activation<G::Effect> {
        if special.already_used {
            log::debug!("{:?} cell at {:?} already used", special.kind, special.coords);
            return Activation::AlreadyUsed { special };
        }

        let cost = Points::from(self.preset.activation_cost());
        if self.score < cost {
            log::warn!(
                "Skipping {:?} cell at {:?}: score {} below activation cost {}",
                special.kind,
                special.coords,
                self.score,
                cost
            );
            return Activation::Unaffordable { special };
        }

        self.score = self.score.saturating_sub(cost);
        log::debug!(
            "Activating {:?} cell at {:?} for {} points",
            special.kind,
            special.coords,
            cost
        );
        let effect = self.gateway.activate(special.kind, special.question_id);
        Activation::Triggered { special, effect }
    }

    fn check_running(&self) -> Result<()> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(MoveError::NotRunning(self.state))
        }
    }

    fn check_move(&self, board: BoardId) -> Result<()> {
        self.check_running()?;
        if board == self.turn {
            Ok(())
        } else {
            Err(MoveError::WrongTurn {
                expected: self.turn,
                requested: board,
            })
        }
    }

    fn advance_turn(&mut self) {
        if self.state.is_running() {
            self.turn = self.turn.other();
            log::debug!("Turn passes to {:?}", self.turn);
        }
    }

    /// Loss takes priority over a simultaneous win.
    fn update_state(&mut self) {
        if !self.state.is_running() {
            return;
        }

        if self.lives <= 0 {
            self.state = GameState::Lost;
        } else if self.boards.iter().all(Board::is_cleared) {
            self.state = GameState::Won;
        }

        if self.state.is_finished() {
            log::debug!(
                "Session ended: {:?}, lives {}, score {}",
                self.state,
                self.lives,
                self.score
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self, board: BoardId) -> &mut Board {
        &mut self.boards[board.index()]
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: Points) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: Points) {
        self.lives = lives;
    }
}

fn generate_boards<L: LayoutGenerator>(
    preset: &Preset,
    generator: &mut L,
) -> Result<[Board; 2], ConfigError> {
    let mut deal = || {
        let layout = generator.generate(preset);
        if layout.size() == preset.size() {
            Ok(Board::new(layout))
        } else {
            Err(ConfigError::LayoutMismatch)
        }
    };
    Ok([deal()?, deal()?])
}
