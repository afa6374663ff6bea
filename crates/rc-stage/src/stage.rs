//! Stage: The core enum defining every notification the slot core emits
//!
//! A Stage is NOT an animation, NOT a sound cue.
//! A Stage is the SEMANTIC MEANING of a moment in the spin lifecycle.

use serde::{Deserialize, Serialize};

/// Canonical spin stage
///
/// Presentation layers respond to stages, never to core internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Bet accepted, reels start spinning
    SpinStart {
        /// Coins staked on this spin
        bet: u64,
    },

    /// A reel reported its final glyphs
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Glyph ids on this reel (top to bottom)
        #[serde(default)]
        glyphs: Vec<u32>,
    },

    /// All reels stopped, wins being evaluated
    EvaluateWins,

    /// Spin resolved (celebration may still be running)
    SpinEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// One pattern matched on the board
    WinDetected {
        /// Pattern name
        pattern: String,
        /// Number of glyphs in the match
        glyph_count: u8,
        /// Coin value of this match before the session multiplier
        total_value: f64,
    },

    /// Spin payout resolved
    PayoutCalculated {
        /// Coins credited for the spin
        total_payout: u64,
        /// Number of matched patterns
        win_count: u8,
        /// Full-board jackpot hit
        #[serde(default)]
        is_jackpot: bool,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // ECONOMY
    // ═══════════════════════════════════════════════════════════════════════
    /// Coins credited to the player
    CoinsAdded {
        amount: u64,
        balance: u64,
    },

    /// Coins taken from the player
    CoinsDeducted {
        amount: u64,
        balance: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // SESSION
    // ═══════════════════════════════════════════════════════════════════════
    /// Session ended with an empty purse
    GameOver {
        total_spins: u64,
        largest_win: u64,
    },
}

impl Stage {
    /// Get the stage category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd => StageCategory::SpinLifecycle,

            Stage::WinDetected { .. } | Stage::PayoutCalculated { .. } => {
                StageCategory::WinLifecycle
            }

            Stage::CoinsAdded { .. } | Stage::CoinsDeducted { .. } => StageCategory::Economy,

            Stage::GameOver { .. } => StageCategory::Session,
        }
    }

    /// Get a simple string name for this stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd => "spin_end",
            Stage::WinDetected { .. } => "win_detected",
            Stage::PayoutCalculated { .. } => "payout_calculated",
            Stage::CoinsAdded { .. } => "coins_added",
            Stage::CoinsDeducted { .. } => "coins_deducted",
            Stage::GameOver { .. } => "game_over",
        }
    }
}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    WinLifecycle,
    Economy,
    Session,
}

impl StageCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SpinLifecycle => "Spin Lifecycle",
            Self::WinLifecycle => "Win Lifecycle",
            Self::Economy => "Economy",
            Self::Session => "Session",
        }
    }
}
