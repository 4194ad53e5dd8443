use anyhow::{Context, Result};
use cooldown_agents::Difficulty;
use cooldown_core::{load_json, Board, Color, EconomyConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a game needs besides the layout. Missing JSON fields keep
/// their defaults, and command-line flags override whatever the file says.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub ai: AiSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub rating: f64,
    pub color: Color,
    /// Fixed seed for reproducible games; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            rating: Difficulty::default().rating,
            color: Color::Black,
            seed: None,
        }
    }
}

impl AiSettings {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_rating(self.rating)
    }
}

impl GameConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        load_json(path).with_context(|| format!("loading config {}", path.display()))
    }
}

/// Reads a layout file, or the standard position when none is given.
/// Layouts from files must fill both home ranks of each color.
pub fn load_layout(path: Option<&Path>) -> Result<Board> {
    let Some(path) = path else {
        return Ok(Board::standard());
    };
    let board: Board =
        load_json(path).with_context(|| format!("loading layout {}", path.display()))?;
    board
        .validate_home_ranks()
        .with_context(|| format!("layout {} is incomplete", path.display()))?;
    Ok(board)
}
