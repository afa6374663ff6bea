//! Game state snapshot
//!
//! The persisted layout is camelCase JSON:
//! `{currentState, playerStats, currentMultiplier, currentSpinResult, canSpin, recentSpins}`.

use serde::{Deserialize, Serialize};

use rc_slot::SpinResult;
use rc_stage::GamePhase;

/// Player statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub coins: u64,
    pub total_spins: u64,
    /// Spins with at least one win
    pub total_wins: u64,
    /// Largest single-spin payout
    pub largest_win: u64,
}

impl PlayerStats {
    /// Fresh stats with a coin balance
    pub fn with_coins(coins: u64) -> Self {
        Self {
            coins,
            ..Self::default()
        }
    }

    /// Winning spins as a percentage of all spins
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.total_wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Full state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub current_state: GamePhase,
    pub player_stats: PlayerStats,
    /// Session multiplier applied to every spin payout
    pub current_multiplier: f64,
    pub current_spin_result: Option<SpinResult>,
    pub can_spin: bool,
    /// Winning spins, newest first
    pub recent_spins: Vec<SpinResult>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_state: GamePhase::Menu,
            player_stats: PlayerStats::default(),
            current_multiplier: 1.0,
            current_spin_result: None,
            can_spin: false,
            recent_spins: Vec::new(),
        }
    }
}

impl GameState {
    /// A fresh session in IDLE
    pub fn fresh(coins: u64) -> Self {
        Self {
            current_state: GamePhase::Idle,
            player_stats: PlayerStats::with_coins(coins),
            can_spin: true,
            ..Self::default()
        }
    }

    /// Prepend to the recent-spins history, dropping the oldest past `capacity`
    pub fn push_recent(&mut self, result: SpinResult, capacity: usize) {
        self.recent_spins.insert(0, result);
        self.recent_spins.truncate(capacity);
    }

    /// Repair a snapshot loaded from storage.
    ///
    /// A spin cannot be resumed across a restart: a persisted SPINNING,
    /// EVALUATING or CELEBRATING phase comes back as IDLE and ready to spin.
    pub fn recovered(mut self, recent_capacity: usize) -> Self {
        if matches!(
            self.current_state,
            GamePhase::Spinning | GamePhase::Evaluating | GamePhase::Celebrating
        ) {
            log::info!("Recovering interrupted {} phase to IDLE", self.current_state);
            self.current_state = GamePhase::Idle;
        }
        self.can_spin = self.current_state == GamePhase::Idle;
        if !self.current_multiplier.is_finite() || self.current_multiplier < 0.0 {
            self.current_multiplier = 1.0;
        }
        self.recent_spins.truncate(recent_capacity);
        self
    }
}
