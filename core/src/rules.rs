use alloc::string::{String, ToString};
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count of a game, plus the label best times are filed under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub label: String,
    pub size: Coord,
    pub mines: CellCount,
}

impl Difficulty {
    pub const BEGINNER: &'static str = "Beginner";
    pub const MEDIUM: &'static str = "Medium";
    pub const EXPERT: &'static str = "Expert";

    /// Validated difficulty, there must be at least one cell and one of them must stay safe.
    pub fn new(label: impl Into<String>, size: Coord, mines: CellCount) -> Result<Self> {
        let difficulty = Self {
            label: label.into(),
            size,
            mines,
        };
        difficulty.validate()?;
        Ok(difficulty)
    }

    pub fn beginner() -> Self {
        Self {
            label: Self::BEGINNER.to_string(),
            size: 4,
            mines: 2,
        }
    }

    pub fn medium() -> Self {
        Self {
            label: Self::MEDIUM.to_string(),
            size: 8,
            mines: 14,
        }
    }

    pub fn expert() -> Self {
        Self {
            label: Self::EXPERT.to_string(),
            size: 12,
            mines: 32,
        }
    }

    pub fn presets() -> [Self; 3] {
        [Self::beginner(), Self::medium(), Self::expert()]
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    /// Safe cells that must be revealed to win.
    pub const fn win_threshold(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            log::warn!("Rejected difficulty {:?}: empty board", self.label);
            return Err(GameError::EmptyBoard);
        }
        if self.mines >= self.total_cells() {
            log::warn!(
                "Rejected difficulty {:?}: {} mines do not fit {} cells with a safe first click",
                self.label,
                self.mines,
                self.total_cells()
            );
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Budgets and effect timings shared by every game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Mine hits absorbed by the shield before the game is lost.
    pub lives: u8,
    pub hints: u8,
    pub safe_clicks: u8,
    pub tick_period_ms: u64,
    pub shield_flash_ms: u64,
    pub safe_click_flash_ms: u64,
    pub hint_flash_ms: u64,
    /// Flag a mine once its shield flash is over, if a flag is left.
    pub flag_shielded_mine: bool,
}

impl Rules {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let rules: Self =
            toml::from_str(source).map_err(|err| GameError::InvalidRules(err.to_string()))?;
        if rules.tick_period_ms == 0 {
            return Err(GameError::InvalidRules("tick_period_ms must be positive".to_string()));
        }
        Ok(rules)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| GameError::InvalidRules(err.to_string()))
    }

    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub const fn shield_flash(&self) -> Duration {
        Duration::from_millis(self.shield_flash_ms)
    }

    pub const fn safe_click_flash(&self) -> Duration {
        Duration::from_millis(self.safe_click_flash_ms)
    }

    pub const fn hint_flash(&self) -> Duration {
        Duration::from_millis(self.hint_flash_ms)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            lives: 3,
            hints: 3,
            safe_clicks: 3,
            tick_period_ms: 1000,
            shield_flash_ms: 1000,
            safe_click_flash_ms: 1500,
            hint_flash_ms: 1000,
            flag_shielded_mine: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for preset in Difficulty::presets() {
            preset.validate().unwrap();
        }
        assert_eq!(Difficulty::beginner().win_threshold(), 14);
        assert_eq!(Difficulty::medium().win_threshold(), 50);
        assert_eq!(Difficulty::expert().win_threshold(), 112);
    }

    #[test]
    fn difficulty_rejects_full_and_empty_boards() {
        assert_eq!(Difficulty::new("Custom", 0, 0), Err(GameError::EmptyBoard));
        assert_eq!(Difficulty::new("Custom", 3, 9), Err(GameError::TooManyMines));
        assert_eq!(Difficulty::new("Custom", 3, 8).unwrap().win_threshold(), 1);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let rules = Rules::from_toml_str("lives = 1\nhint_flash_ms = 250\n").unwrap();

        assert_eq!(rules.lives, 1);
        assert_eq!(rules.hint_flash(), Duration::from_millis(250));
        assert_eq!(rules.safe_clicks, 3);
        assert_eq!(rules.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(matches!(
            Rules::from_toml_str("lives = \"many\""),
            Err(GameError::InvalidRules(_))
        ));
        assert!(matches!(
            Rules::from_toml_str("tick_period_ms = 0"),
            Err(GameError::InvalidRules(_))
        ));
    }

    #[test]
    fn rules_survive_toml_round_trip() {
        let rules = Rules {
            flag_shielded_mine: true,
            ..Rules::default()
        };

        let text = rules.to_toml_string().unwrap();

        assert_eq!(Rules::from_toml_str(&text).unwrap(), rules);
    }
}
