use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions, content counts and shared-resource rules for one session.
///
/// Built-in presets are [`Preset::EASY`], [`Preset::MEDIUM`] and [`Preset::HARD`].
/// Custom presets go through [`Preset::new`], which rejects any preset whose mines
/// and special cells would not fit on the board. Deserialised presets are validated
/// the same way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PresetConfig", into = "PresetConfig")]
pub struct Preset {
    size: Coord2,
    mines: CellCount,
    questions: CellCount,
    surprises: CellCount,
    starting_lives: u16,
    activation_cost: u16,
}

impl Preset {
    pub const EASY: Preset = Preset::new_unchecked((9, 9), 10, 6, 2, 10, 5);
    pub const MEDIUM: Preset = Preset::new_unchecked((13, 13), 26, 7, 3, 8, 8);
    pub const HARD: Preset = Preset::new_unchecked((16, 16), 44, 11, 4, 6, 12);

    pub const ALL: [(&'static str, Preset); 3] = [
        ("easy", Preset::EASY),
        ("medium", Preset::MEDIUM),
        ("hard", Preset::HARD),
    ];

    const fn new_unchecked(
        size: Coord2,
        mines: CellCount,
        questions: CellCount,
        surprises: CellCount,
        starting_lives: u16,
        activation_cost: u16,
    ) -> Self {
        Self {
            size,
            mines,
            questions,
            surprises,
            starting_lives,
            activation_cost,
        }
    }

    pub fn new(
        size: Coord2,
        mines: CellCount,
        questions: CellCount,
        surprises: CellCount,
        starting_lives: u16,
        activation_cost: u16,
    ) -> Result<Self, ConfigError> {
        let preset = Self::new_unchecked(
            size,
            mines,
            questions,
            surprises,
            starting_lives,
            activation_cost,
        );
        preset.validate()?;
        Ok(preset)
    }

    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
            .map(|&(_, preset)| preset)
            .ok_or(ConfigError::UnknownPreset)
    }

    /// Name of the built-in preset this equals, if any.
    pub fn name(&self) -> Option<&'static str> {
        Self::ALL
            .iter()
            .find(|(_, preset)| preset == self)
            .map(|&(name, _)| name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (rows, cols) = self.size;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard);
        }

        let requested = u32::from(self.mines) + u32::from(self.questions) + u32::from(self.surprises);
        let capacity = self.total_cells();
        if requested > u32::from(capacity) {
            return Err(ConfigError::TooManyCells {
                requested: requested.try_into().unwrap_or(CellCount::MAX),
                capacity,
            });
        }

        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn questions(&self) -> CellCount {
        self.questions
    }

    pub const fn surprises(&self) -> CellCount {
        self.surprises
    }

    pub const fn starting_lives(&self) -> u16 {
        self.starting_lives
    }

    pub const fn activation_cost(&self) -> u16 {
        self.activation_cost
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::EASY
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(s)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "custom {}x{} ({} mines)",
                self.size.0, self.size.1, self.mines
            ),
        }
    }
}

/// Unvalidated wire form of a [`Preset`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    #[serde(default)]
    pub questions: CellCount,
    #[serde(default)]
    pub surprises: CellCount,
    pub starting_lives: u16,
    pub activation_cost: u16,
}

impl TryFrom<PresetConfig> for Preset {
    type Error = ConfigError;

    fn try_from(config: PresetConfig) -> Result<Self, Self::Error> {
        Preset::new(
            (config.rows, config.cols),
            config.mines,
            config.questions,
            config.surprises,
            config.starting_lives,
            config.activation_cost,
        )
    }
}

impl From<Preset> for PresetConfig {
    fn from(preset: Preset) -> Self {
        Self {
            rows: preset.rows(),
            cols: preset.cols(),
            mines: preset.mines,
            questions: preset.questions,
            surprises: preset.surprises,
            starting_lives: preset.starting_lives,
            activation_cost: preset.activation_cost,
        }
    }
}
