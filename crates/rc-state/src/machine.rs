//! Spin state machine
//!
//! ```text
//!  MENU ──new_game/sandbox──> IDLE ──start_spin──> SPINNING ──reels/end_spin──> EVALUATING
//!                              ^  ^                                                 │
//!                              │  └──────────────── no wins ────────────────────────┤
//!                              │                                                    │ wins
//!                              └──── advance(celebration delay) ──── CELEBRATING <──┘
//!
//!  any active phase ──trigger_game_over──> GAMEOVER ──return_to_menu──> MENU
//! ```
//!
//! The machine is single-threaded and cooperative: time only moves when the
//! shell calls [`SpinMachine::advance`]. Every mutation publishes a snapshot
//! and writes it to the store; write failures are logged and never surface.

use chrono::Utc;
use crossbeam_channel::Receiver;

use rc_slot::{
    EconomyContext, GlyphKind, Modifier, ModifierOutcome, SlotConfig, SlotEngine, SpinResult,
    apply_modifier,
};
use rc_stage::{GamePhase, Stage, StageEvent, StagePayload};

use crate::bus::{GameNotification, NotificationBus};
use crate::error::StateResult;
use crate::game_state::{GameState, PlayerStats};
use crate::high_scores::{HighScoreEntry, HighScoreTable};
use crate::reels::ReelStopCollector;
use crate::storage::{GAME_STATE_KEY, HIGH_SCORES_KEY, KeyValueStore};

/// Smallest stake a spin accepts
pub const MIN_BET: u64 = 1;

/// Owns the game state and drives the spin lifecycle
pub struct SpinMachine<S: KeyValueStore> {
    config: SlotConfig,
    engine: SlotEngine,
    state: GameState,
    bus: NotificationBus,
    store: S,
    high_scores: HighScoreTable,
    /// Session clock (ms)
    clock_ms: f64,
    /// Clock time at which the running celebration ends
    celebration_due_ms: Option<f64>,
    reels: Option<ReelStopCollector>,
    current_bet: u64,
    quit: bool,
}

impl<S: KeyValueStore> SpinMachine<S> {
    /// Fresh machine in MENU; the store is written to but not read
    pub fn new(config: SlotConfig, store: S) -> StateResult<Self> {
        let engine = SlotEngine::new(config.clone())?;
        Ok(Self {
            config,
            engine,
            state: GameState::default(),
            bus: NotificationBus::new(),
            store,
            high_scores: HighScoreTable::new(),
            clock_ms: 0.0,
            celebration_due_ms: None,
            reels: None,
            current_bet: 0,
            quit: false,
        })
    }

    /// Machine resumed from the store.
    ///
    /// Missing or corrupt entries fall back to defaults with a warning. An
    /// interrupted spin comes back as IDLE.
    pub fn restore(config: SlotConfig, store: S) -> StateResult<Self> {
        let mut machine = Self::new(config, store)?;

        if let Some(json) = machine.read_key(GAME_STATE_KEY) {
            match serde_json::from_str::<GameState>(&json) {
                Ok(state) => machine.state = state.recovered(machine.config.recent_spins_capacity),
                Err(e) => log::warn!("Corrupt game state in store, using defaults: {e}"),
            }
        }
        if let Some(json) = machine.read_key(HIGH_SCORES_KEY) {
            match HighScoreTable::from_json(&json) {
                Ok(table) => machine.high_scores = table,
                Err(e) => log::warn!("Corrupt high-score table in store, starting empty: {e}"),
            }
        }

        log::info!(
            "Restored session: {} with {} coins",
            machine.state.current_state,
            machine.state.player_stats.coins
        );
        Ok(machine)
    }

    /// Seed the board RNG for reproducible sessions
    pub fn seed(&mut self, seed: u64) {
        self.engine.seed(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // READ ACCESS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Copy of the full state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.current_state
    }

    pub fn stats(&self) -> PlayerStats {
        self.state.player_stats
    }

    pub fn current_multiplier(&self) -> f64 {
        self.state.current_multiplier
    }

    pub fn can_spin(&self) -> bool {
        self.state.can_spin
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Time left before a running celebration returns to IDLE
    pub fn celebration_remaining_ms(&self) -> Option<f64> {
        self.celebration_due_ms
            .map(|due| (due - self.clock_ms).max(0.0))
    }

    /// Reels that have not reported for the spin in flight
    pub fn reels_outstanding(&self) -> usize {
        self.reels.as_ref().map_or(0, ReelStopCollector::outstanding)
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Receive every snapshot and stage event from now on
    pub fn subscribe(&mut self) -> Receiver<GameNotification> {
        self.bus.subscribe()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MENU COMMANDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a session with the standard balance.
    ///
    /// Resets the game state wholesale, cancelling any spin or celebration.
    /// Charm mutations to the economy are kept.
    pub fn new_game(&mut self) {
        self.reset(self.config.starting_coins);
    }

    /// Start a session with the sandbox balance
    pub fn sandbox(&mut self) {
        self.reset(self.config.sandbox_coins);
    }

    pub fn show_high_scores(&self) -> Vec<HighScoreEntry> {
        self.high_scores.entries().to_vec()
    }

    /// Submit the session's largest win under `name`; returns the 0-based rank
    pub fn record_high_score(&mut self, name: &str) -> Option<usize> {
        let score = self.state.player_stats.largest_win;
        let rank = self.high_scores.submit(name, score, Utc::now());
        match rank {
            Some(rank) => {
                log::info!("High score #{} for {name}: {score}", rank + 1);
                self.persist_high_scores();
            }
            None => log::debug!("Score {score} for {name} did not place"),
        }
        rank
    }

    /// Flush everything and publish a final snapshot
    pub fn quit(&mut self) {
        log::info!("Quitting from {}", self.state.current_state);
        self.quit = true;
        self.persist_high_scores();
        self.commit();
    }

    /// GAMEOVER → MENU
    pub fn return_to_menu(&mut self) -> bool {
        if self.state.current_state != GamePhase::GameOver {
            log::debug!("Return to menu refused in {}", self.state.current_state);
            return false;
        }
        self.set_phase(GamePhase::Menu);
        self.state.can_spin = false;
        self.commit();
        true
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Take the bet and plan the board the reels should stop on.
    ///
    /// Returns the planned columns (left to right, top to bottom), or `None`
    /// when refused: outside IDLE, spin disabled, bet below [`MIN_BET`] or
    /// above the balance. A refusal changes nothing.
    pub fn start_spin(
        &mut self,
        economy: &EconomyContext,
        bet: u64,
    ) -> StateResult<Option<Vec<Vec<GlyphKind>>>> {
        let coins = self.state.player_stats.coins;
        if self.state.current_state != GamePhase::Idle
            || !self.state.can_spin
            || bet < MIN_BET
            || coins < bet
        {
            log::debug!(
                "Spin refused: phase {}, can_spin {}, bet {bet}, coins {coins}",
                self.state.current_state,
                self.state.can_spin
            );
            return Ok(None);
        }

        // Plan first so a broken catalog leaves the state untouched
        let planned = self.engine.plan_board(economy)?;
        let columns = planned.board.to_columns();

        let stats = &mut self.state.player_stats;
        stats.coins -= bet;
        stats.total_spins += 1;
        let (balance, spin_id) = (stats.coins, stats.total_spins);

        self.state.can_spin = false;
        self.current_bet = bet;
        self.reels = Some(ReelStopCollector::new(
            self.config.columns as usize,
            self.config.rows as usize,
        ));
        self.set_phase(GamePhase::Spinning);

        self.emit(StageEvent::with_payload(
            Stage::CoinsDeducted {
                amount: bet,
                balance,
            },
            self.clock_ms,
            StagePayload::new().spin_id(spin_id),
        ));
        self.emit(StageEvent::with_payload(
            Stage::SpinStart { bet },
            self.clock_ms,
            StagePayload::with_win(0.0, Some(bet as f64))
                .multiplier(self.state.current_multiplier)
                .spin_id(spin_id),
        ));
        self.commit();

        Ok(Some(columns))
    }

    /// A reel reported its final glyphs.
    ///
    /// Reports may arrive in any order. Duplicate, out-of-range or
    /// wrong-height reports and reports outside SPINNING are ignored. When the
    /// last reel reports, the board is resolved against `economy` and the spin
    /// ends; the result is returned.
    pub fn reel_stopped(
        &mut self,
        economy: &EconomyContext,
        reel_index: usize,
        glyphs: Vec<GlyphKind>,
    ) -> StateResult<Option<SpinResult>> {
        if self.state.current_state != GamePhase::Spinning {
            log::warn!(
                "Reel {reel_index} report ignored in {}",
                self.state.current_state
            );
            return Ok(None);
        }
        let Some(collector) = self.reels.as_mut() else {
            log::warn!("Reel {reel_index} report ignored: no reels in motion");
            return Ok(None);
        };

        let ids: Vec<u32> = glyphs.iter().map(|g| g.id()).collect();
        match collector.report(reel_index, glyphs) {
            Ok(outstanding) => {
                log::debug!("Reel {reel_index} stopped, {outstanding} outstanding");
            }
            Err(rejection) => {
                log::warn!("Reel report ignored: {rejection}");
                return Ok(None);
            }
        }
        self.emit(StageEvent::new(
            Stage::ReelStop {
                reel_index: reel_index.min(u8::MAX as usize) as u8,
                glyphs: ids,
            },
            self.clock_ms,
        ));

        if !self.reels.as_ref().is_some_and(ReelStopCollector::is_complete) {
            return Ok(None);
        }
        let Some(columns) = self.reels.take().and_then(ReelStopCollector::finish) else {
            return Ok(None);
        };

        let result =
            self.engine
                .resolve_columns(economy, columns, self.state.current_multiplier)?;
        self.end_spin(result.clone());
        Ok(Some(result))
    }

    /// Resolve the spin in flight with `result`.
    ///
    /// Refused outside SPINNING. With no wins the machine returns to IDLE
    /// immediately; otherwise the payout is credited once and CELEBRATING
    /// runs until the celebration delay has elapsed on the session clock.
    pub fn end_spin(&mut self, result: SpinResult) -> bool {
        if self.state.current_state != GamePhase::Spinning {
            log::debug!("End spin refused in {}", self.state.current_state);
            return false;
        }
        self.reels = None;

        self.set_phase(GamePhase::Evaluating);
        self.state.current_spin_result = Some(result.clone());
        self.emit(StageEvent::new(Stage::EvaluateWins, self.clock_ms));
        self.commit();

        for event in result.win_stages(self.clock_ms, self.current_bet) {
            self.emit(event);
        }

        if result.is_win() {
            let stats = &mut self.state.player_stats;
            stats.coins = stats.coins.saturating_add(result.total_payout);
            stats.total_wins += 1;
            stats.largest_win = stats.largest_win.max(result.total_payout);
            let balance = stats.coins;

            if result.total_payout > 0 {
                self.emit(StageEvent::with_payload(
                    Stage::CoinsAdded {
                        amount: result.total_payout,
                        balance,
                    },
                    self.clock_ms,
                    StagePayload::with_win(result.total_payout as f64, Some(self.current_bet as f64)),
                ));
            }

            self.state
                .push_recent(result, self.config.recent_spins_capacity);
            self.celebration_due_ms = Some(self.clock_ms + self.config.celebration_delay_ms);
            self.set_phase(GamePhase::Celebrating);
        } else {
            self.set_phase(GamePhase::Idle);
            self.state.can_spin = true;
        }

        self.emit(StageEvent::new(Stage::SpinEnd, self.clock_ms));
        self.commit();
        true
    }

    /// Move the session clock forward, finishing a due celebration
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.clock_ms += delta_ms;
        }

        let due = self
            .celebration_due_ms
            .is_some_and(|due| self.clock_ms >= due);
        if due && self.state.current_state == GamePhase::Celebrating {
            self.celebration_due_ms = None;
            self.set_phase(GamePhase::Idle);
            self.state.can_spin = true;
            self.commit();
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CHARMS & GAME OVER
    // ═══════════════════════════════════════════════════════════════════════════

    /// Apply a charm.
    ///
    /// Catalog charms mutate `economy`; the global-multiplier charm shifts the
    /// session multiplier, clamped at zero. Unknown targets are errors when
    /// either the config or the economy asks for strict modifiers.
    pub fn apply_modifier(
        &mut self,
        economy: &mut EconomyContext,
        modifier: &Modifier,
    ) -> StateResult<ModifierOutcome> {
        let caller_policy = economy.strict_modifiers;
        economy.strict_modifiers |= self.config.strict_modifiers;
        let applied = apply_modifier(economy, modifier);
        economy.strict_modifiers = caller_policy;

        let outcome = applied?;
        if let ModifierOutcome::SessionMultiplier(delta) = outcome {
            let multiplier = (self.state.current_multiplier + delta).max(0.0);
            log::info!(
                "Session multiplier {} -> {multiplier}",
                self.state.current_multiplier
            );
            self.state.current_multiplier = multiplier;
            self.commit();
        }
        Ok(outcome)
    }

    /// Balance cannot cover [`MIN_BET`] and no spin is in flight
    pub fn is_out_of_coins(&self) -> bool {
        let phase = self.state.current_state;
        phase.is_active()
            && !phase.is_spin_in_flight()
            && self.state.player_stats.coins < MIN_BET
    }

    /// End the session. Refused outside an active phase or mid-spin.
    pub fn trigger_game_over(&mut self) -> bool {
        let phase = self.state.current_state;
        if !phase.is_active() || phase.is_spin_in_flight() {
            log::debug!("Game over refused in {phase}");
            return false;
        }

        self.celebration_due_ms = None;
        self.state.can_spin = false;
        self.set_phase(GamePhase::GameOver);

        let stats = self.state.player_stats;
        self.emit(StageEvent::new(
            Stage::GameOver {
                total_spins: stats.total_spins,
                largest_win: stats.largest_win,
            },
            self.clock_ms,
        ));
        self.commit();
        true
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNALS
    // ═══════════════════════════════════════════════════════════════════════════

    fn reset(&mut self, coins: u64) {
        log::info!("New session with {coins} coins");
        if self.state.current_state.is_spin_in_flight() || self.celebration_due_ms.is_some() {
            log::debug!("Reset cancels {} phase", self.state.current_state);
            self.emit(StageEvent::new(Stage::SpinEnd, self.clock_ms).with_tag("cancelled"));
        }
        self.celebration_due_ms = None;
        self.reels = None;
        self.current_bet = 0;
        self.quit = false;

        let previous = self.state.current_state;
        self.state = GameState::fresh(coins);
        log::debug!("Phase {previous} -> {}", self.state.current_state);
        self.commit();
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::debug!("Phase {} -> {phase}", self.state.current_state);
        self.state.current_state = phase;
    }

    fn emit(&mut self, event: StageEvent) {
        self.bus.publish_stage(event);
    }

    /// Publish a snapshot and write it through
    fn commit(&mut self) {
        self.bus.publish_snapshot(&self.state);
        match serde_json::to_string(&self.state) {
            Ok(json) => self.write_key(GAME_STATE_KEY, &json),
            Err(e) => log::warn!("Failed to serialize game state: {e}"),
        }
    }

    fn persist_high_scores(&mut self) {
        match self.high_scores.to_json() {
            Ok(json) => self.write_key(HIGH_SCORES_KEY, &json),
            Err(e) => log::warn!("Failed to serialize high scores: {e}"),
        }
    }

    fn write_key(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("Failed to persist {key}: {e}");
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read {key}, using defaults: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use crate::storage::MemoryStore;
    use rc_slot::{Board, Glyph, GlyphCatalog, GlyphKind::*, PatternCatalog, SlotError};

    fn machine() -> SpinMachine<MemoryStore> {
        let mut machine = SpinMachine::new(SlotConfig::standard(), MemoryStore::new()).unwrap();
        machine.seed(7);
        machine
    }

    fn losing_result() -> SpinResult {
        let board = Board::from_rows(vec![
            vec![Cherry, Lemon, Cherry, Lemon, Cherry],
            vec![Orange, Plum, Orange, Plum, Orange],
            vec![Lemon, Cherry, Lemon, Cherry, Lemon],
        ])
        .unwrap();
        SpinResult::resolve(board, &EconomyContext::standard(), 1.0)
    }

    fn winning_result() -> SpinResult {
        let board = Board::from_rows(vec![
            vec![Seven, Seven, Seven, Cherry, Lemon],
            vec![Orange, Plum, Orange, Plum, Orange],
            vec![Lemon, Cherry, Lemon, Cherry, Bell],
        ])
        .unwrap();
        SpinResult::resolve(board, &EconomyContext::standard(), 1.0)
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> StateResult<Option<String>> {
            Err(StateError::InvalidKey(key.to_string()))
        }

        fn set(&mut self, key: &str, _value: &str) -> StateResult<()> {
            Err(StateError::InvalidKey(key.to_string()))
        }

        fn remove(&mut self, _key: &str) -> StateResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_starts_in_menu() {
        let mut machine = machine();
        assert_eq!(machine.phase(), GamePhase::Menu);
        assert!(!machine.can_spin());

        let economy = EconomyContext::standard();
        assert_eq!(machine.start_spin(&economy, 10).unwrap(), None);
        assert_eq!(machine.snapshot(), GameState::default());
    }

    #[test]
    fn test_new_game_and_sandbox_balances() {
        let mut machine = machine();
        machine.new_game();
        assert_eq!(machine.phase(), GamePhase::Idle);
        assert_eq!(machine.stats(), PlayerStats::with_coins(1000));
        assert!(machine.can_spin());

        machine.sandbox();
        assert_eq!(machine.stats().coins, 1_000_000);
    }

    #[test]
    fn test_start_spin_deducts_and_locks() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();

        let columns = machine.start_spin(&economy, 10).unwrap().unwrap();
        assert_eq!(columns.len(), 5);
        assert!(columns.iter().all(|c| c.len() == 3));

        assert_eq!(machine.phase(), GamePhase::Spinning);
        assert_eq!(machine.stats().coins, 990);
        assert_eq!(machine.stats().total_spins, 1);
        assert!(!machine.can_spin());
        assert_eq!(machine.reels_outstanding(), 5);

        let before = machine.snapshot();
        assert_eq!(machine.start_spin(&economy, 10).unwrap(), None);
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn test_insufficient_coins_refused() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();

        let before = machine.snapshot();
        assert_eq!(machine.start_spin(&economy, 1001).unwrap(), None);
        assert_eq!(machine.start_spin(&economy, 0).unwrap(), None);
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn test_losing_spin_skips_celebration() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();
        machine.start_spin(&economy, 10).unwrap();

        let events = machine.subscribe();
        assert!(machine.end_spin(losing_result()));

        assert_eq!(machine.phase(), GamePhase::Idle);
        assert!(machine.can_spin());
        assert_eq!(machine.stats().coins, 990);
        assert_eq!(machine.stats().total_wins, 0);
        assert!(machine.snapshot().recent_spins.is_empty());
        assert_eq!(machine.celebration_remaining_ms(), None);

        let phases: Vec<GamePhase> = events
            .try_iter()
            .filter_map(|n| n.as_snapshot().map(|s| s.current_state))
            .collect();
        assert_eq!(phases, vec![GamePhase::Evaluating, GamePhase::Idle]);
    }

    #[test]
    fn test_winning_spin_celebrates_then_idles() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();
        machine.start_spin(&economy, 10).unwrap();

        let result = winning_result();
        assert_eq!(result.total_payout, 75);
        assert!(machine.end_spin(result.clone()));

        assert_eq!(machine.phase(), GamePhase::Celebrating);
        assert_eq!(machine.stats().coins, 990 + 75);
        assert_eq!(machine.stats().total_wins, 1);
        assert_eq!(machine.stats().largest_win, 75);
        assert_eq!(machine.snapshot().recent_spins, vec![result.clone()]);
        assert_eq!(machine.snapshot().current_spin_result, Some(result.clone()));

        // Celebration cannot be interrupted by a spin request or a second resolution
        assert_eq!(machine.start_spin(&economy, 10).unwrap(), None);
        assert!(!machine.end_spin(result));
        assert_eq!(machine.stats().coins, 1065);

        machine.advance(2999.0);
        assert_eq!(machine.phase(), GamePhase::Celebrating);
        assert_eq!(machine.celebration_remaining_ms(), Some(1.0));
        machine.advance(1.0);
        assert_eq!(machine.phase(), GamePhase::Idle);
        assert!(machine.can_spin());
    }

    #[test]
    fn test_end_spin_outside_spinning_refused() {
        let mut machine = machine();
        machine.new_game();
        let before = machine.snapshot();
        assert!(!machine.end_spin(winning_result()));
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn test_reset_cancels_celebration() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();
        machine.start_spin(&economy, 10).unwrap();
        machine.end_spin(winning_result());

        let events = machine.subscribe();
        machine.new_game();
        assert_eq!(machine.phase(), GamePhase::Idle);
        assert_eq!(machine.celebration_remaining_ms(), None);
        assert_eq!(machine.stats(), PlayerStats::with_coins(1000));

        let cancelled: Vec<StageEvent> = events
            .try_iter()
            .filter_map(|n| n.as_stage().cloned())
            .collect();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].stage, Stage::SpinEnd);
        assert_eq!(cancelled[0].tags, vec!["cancelled".to_string()]);

        // Nothing in flight, nothing to cancel
        machine.new_game();
        assert!(events.try_iter().all(|n| n.as_stage().is_none()));
    }

    #[test]
    fn test_game_over_flow() {
        let config = SlotConfig {
            starting_coins: 10,
            ..SlotConfig::standard()
        };
        let mut machine = SpinMachine::new(config, MemoryStore::new()).unwrap();
        let economy = EconomyContext::standard();

        assert!(!machine.trigger_game_over());
        machine.new_game();
        machine.start_spin(&economy, 10).unwrap();
        assert!(!machine.is_out_of_coins());
        assert!(!machine.trigger_game_over());

        machine.end_spin(losing_result());
        assert!(machine.is_out_of_coins());

        let events = machine.subscribe();
        assert!(machine.trigger_game_over());
        assert_eq!(machine.phase(), GamePhase::GameOver);
        assert!(!machine.is_out_of_coins());
        assert!(events.try_iter().any(|n| matches!(
            n.as_stage().map(|e| &e.stage),
            Some(Stage::GameOver { total_spins: 1, .. })
        )));

        assert_eq!(machine.start_spin(&economy, 1).unwrap(), None);
        assert!(machine.return_to_menu());
        assert_eq!(machine.phase(), GamePhase::Menu);
        assert!(!machine.return_to_menu());
    }

    #[test]
    fn test_global_multiplier_charm() {
        let mut machine = machine();
        let mut economy = EconomyContext::standard();
        machine.new_game();

        let outcome = machine
            .apply_modifier(&mut economy, &Modifier::GlobalMultiplier { delta: 0.5 })
            .unwrap();
        assert_eq!(outcome, ModifierOutcome::SessionMultiplier(0.5));
        assert_eq!(machine.current_multiplier(), 1.5);

        machine
            .apply_modifier(&mut economy, &Modifier::GlobalMultiplier { delta: -4.0 })
            .unwrap();
        assert_eq!(machine.current_multiplier(), 0.0);
        assert_eq!(economy, EconomyContext::standard());
    }

    #[test]
    fn test_config_strict_modifiers_enforced() {
        let bell_only = || {
            let glyphs = GlyphCatalog::new(vec![Glyph::new(Bell, 10.0, 5.0)]).unwrap();
            EconomyContext::new(glyphs, PatternCatalog::standard()).unwrap()
        };
        let charm = Modifier::Payout {
            glyph: Seven,
            delta: 5.0,
        };

        let strict = SlotConfig {
            strict_modifiers: true,
            ..SlotConfig::standard()
        };
        let mut machine = SpinMachine::new(strict, MemoryStore::new()).unwrap();
        let mut economy = bell_only();
        assert!(matches!(
            machine.apply_modifier(&mut economy, &charm),
            Err(StateError::Slot(SlotError::UnknownGlyph(Seven)))
        ));
        // Caller's own policy is left as it was
        assert!(!economy.strict_modifiers);

        let lenient = SlotConfig {
            strict_modifiers: false,
            ..SlotConfig::standard()
        };
        let mut machine = SpinMachine::new(lenient, MemoryStore::new()).unwrap();
        assert_eq!(
            machine.apply_modifier(&mut economy, &charm).unwrap(),
            ModifierOutcome::Skipped
        );

        let mut strict_economy = bell_only().with_strict_modifiers(true);
        assert!(machine.apply_modifier(&mut strict_economy, &charm).is_err());
    }

    #[test]
    fn test_catalog_charm_survives_new_game() {
        let mut machine = machine();
        let mut economy = EconomyContext::standard();
        machine.new_game();
        machine
            .apply_modifier(
                &mut economy,
                &Modifier::Payout {
                    glyph: Seven,
                    delta: 5.0,
                },
            )
            .unwrap();

        machine.new_game();
        assert_eq!(economy.glyphs.payout_of(Seven), 30.0);
        assert_eq!(machine.current_multiplier(), 1.0);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut machine = machine();
        machine.new_game();

        let json = machine.store().get(GAME_STATE_KEY).unwrap().unwrap();
        let stored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(stored, machine.snapshot());
    }

    #[test]
    fn test_store_failures_are_swallowed() {
        let mut machine = SpinMachine::new(SlotConfig::standard(), BrokenStore).unwrap();
        let economy = EconomyContext::standard();
        machine.new_game();
        assert!(machine.start_spin(&economy, 10).unwrap().is_some());
        machine.quit();
        assert!(machine.has_quit());

        let restored = SpinMachine::restore(SlotConfig::standard(), BrokenStore).unwrap();
        assert_eq!(restored.snapshot(), GameState::default());
    }

    #[test]
    fn test_high_score_records_largest_win() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();
        machine.start_spin(&economy, 10).unwrap();
        machine.end_spin(winning_result());

        assert_eq!(machine.record_high_score("ana"), Some(0));
        let scores = machine.show_high_scores();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 75);
        assert!(machine.store().get(HIGH_SCORES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_reel_reports_outside_spin_ignored() {
        let mut machine = machine();
        let economy = EconomyContext::standard();
        machine.new_game();
        assert_eq!(
            machine.reel_stopped(&economy, 0, vec![Bell; 3]).unwrap(),
            None
        );
        assert_eq!(machine.phase(), GamePhase::Idle);
    }
}
