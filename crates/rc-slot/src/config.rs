//! Slot engine configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Upper bound on either board dimension
const MAX_BOARD_DIMENSION: u8 = 16;

/// Slot configuration
///
/// Every field has a default, so partial JSON/YAML documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Board height
    pub rows: u8,
    /// Board width (one reel per column)
    pub columns: u8,

    /// Rejection-sampling budget for board generation
    pub max_generation_attempts: usize,
    /// Smallest pattern multiplier a generated board may contain
    pub min_multiplier: f64,
    /// Fewest wins a generated board must contain
    pub min_win_count: usize,

    /// Delay between a winning spin and the return to idle (ms)
    pub celebration_delay_ms: f64,
    /// Capacity of the recent-spins history
    pub recent_spins_capacity: usize,

    /// Coins granted by "new game"
    pub starting_coins: u64,
    /// Coins granted by "sandbox"
    pub sandbox_coins: u64,
    /// Bet used when the shell does not pick one
    pub default_bet: u64,

    /// Modifiers with an unknown target fail instead of being skipped
    pub strict_modifiers: bool,
}

impl SlotConfig {
    /// Standard 3×5 board, no win constraints
    pub fn standard() -> Self {
        Self {
            rows: 3,
            columns: 5,
            max_generation_attempts: 1000,
            min_multiplier: 0.0,
            min_win_count: 0,
            celebration_delay_ms: 3000.0,
            recent_spins_capacity: 10,
            starting_coins: 1000,
            sandbox_coins: 1_000_000,
            default_bet: 10,
            strict_modifiers: cfg!(debug_assertions),
        }
    }

    /// Every board carries at least one win
    pub fn generous() -> Self {
        Self {
            min_multiplier: 1.0,
            min_win_count: 1,
            ..Self::standard()
        }
    }

    /// Total board positions
    pub fn total_positions(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Check ranges
    pub fn validate(&self) -> SlotResult<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SlotError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.rows, self.columns
            )));
        }
        if self.rows > MAX_BOARD_DIMENSION || self.columns > MAX_BOARD_DIMENSION {
            return Err(SlotError::InvalidConfig(format!(
                "board dimensions are capped at {MAX_BOARD_DIMENSION}, got {}x{}",
                self.rows, self.columns
            )));
        }
        if self.max_generation_attempts == 0 {
            return Err(SlotError::InvalidConfig(
                "max_generation_attempts must be at least 1".into(),
            ));
        }
        if !self.min_multiplier.is_finite() || self.min_multiplier < 0.0 {
            return Err(SlotError::InvalidConfig(format!(
                "min_multiplier must be a non-negative number, got {}",
                self.min_multiplier
            )));
        }
        if !self.celebration_delay_ms.is_finite() || self.celebration_delay_ms < 0.0 {
            return Err(SlotError::InvalidConfig(format!(
                "celebration_delay_ms must be non-negative, got {}",
                self.celebration_delay_ms
            )));
        }
        if self.recent_spins_capacity == 0 {
            return Err(SlotError::InvalidConfig(
                "recent_spins_capacity must be at least 1".into(),
            ));
        }
        if self.default_bet == 0 {
            return Err(SlotError::InvalidConfig("default_bet must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SlotError::Parse(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: Self = serde_yml::from_str(yaml)
            .map_err(|e| SlotError::Parse(format!("Invalid config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> SlotResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::Parse(e.to_string()))
    }
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config() {
        let config = SlotConfig::standard();
        assert_eq!(config.total_positions(), 15);
        assert_eq!(config.max_generation_attempts, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SlotConfig::from_json(r#"{ "rows": 4, "min_win_count": 2 }"#).unwrap();
        assert_eq!(config.rows, 4);
        assert_eq!(config.columns, 5);
        assert_eq!(config.min_win_count, 2);
        assert_eq!(config.celebration_delay_ms, 3000.0);
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "columns: 6\ncelebration_delay_ms: 1500\nstrict_modifiers: false\n";
        let config = SlotConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.columns, 6);
        assert_eq!(config.celebration_delay_ms, 1500.0);
        assert!(!config.strict_modifiers);
    }

    #[test]
    fn test_validation_rejects_empty_board() {
        let result = SlotConfig::from_json(r#"{ "rows": 0 }"#);
        assert!(matches!(result, Err(SlotError::InvalidConfig(_))));

        let config = SlotConfig {
            max_generation_attempts: 0,
            ..SlotConfig::standard()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slot.yml");
        fs::write(&path, "rows: 3\ncolumns: 3\n").unwrap();

        let config = SlotConfig::load(&path).unwrap();
        assert_eq!(config.columns, 3);
    }

    #[test]
    fn test_json_export_round_trip() {
        let config = SlotConfig::generous();
        let json = config.to_json().unwrap();
        assert_eq!(SlotConfig::from_json(&json).unwrap(), config);
    }
}
