//! Stage Taxonomy: Enums for game elements
//!
//! Classifies the phases of the spin lifecycle. The persisted snapshot stores
//! the phase under its upper-case name (`"IDLE"`, `"GAMEOVER"`, ...).

use serde::{Deserialize, Serialize};

/// Phase of the spin state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, no session running
    #[default]
    #[serde(rename = "MENU")]
    Menu,
    /// Waiting for a spin request
    #[serde(rename = "IDLE")]
    Idle,
    /// Bet taken, reels in motion
    #[serde(rename = "SPINNING")]
    Spinning,
    /// All reels stopped, result being resolved
    #[serde(rename = "EVALUATING")]
    Evaluating,
    /// Win presentation; returns to idle after the celebration delay
    #[serde(rename = "CELEBRATING")]
    Celebrating,
    /// Out of coins
    #[serde(rename = "GAMEOVER")]
    GameOver,
}

impl GamePhase {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Menu => "MENU",
            Self::Idle => "IDLE",
            Self::Spinning => "SPINNING",
            Self::Evaluating => "EVALUATING",
            Self::Celebrating => "CELEBRATING",
            Self::GameOver => "GAMEOVER",
        }
    }

    /// A spin has been paid for and not yet resolved
    pub fn is_spin_in_flight(&self) -> bool {
        matches!(self, Self::Spinning | Self::Evaluating)
    }

    /// Phases in which a session is running (game over may be raised from these)
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Menu | Self::GameOver)
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_serializes_upper_case() {
        let json = serde_json::to_string(&GamePhase::GameOver).unwrap();
        assert_eq!(json, "\"GAMEOVER\"");

        let phase: GamePhase = serde_json::from_str("\"CELEBRATING\"").unwrap();
        assert_eq!(phase, GamePhase::Celebrating);
    }

    #[test]
    fn test_phase_flags() {
        assert!(GamePhase::Spinning.is_spin_in_flight());
        assert!(GamePhase::Evaluating.is_spin_in_flight());
        assert!(!GamePhase::Celebrating.is_spin_in_flight());
        assert!(GamePhase::Idle.is_active());
        assert!(!GamePhase::Menu.is_active());
        assert!(!GamePhase::GameOver.is_active());
    }
}
