//! Slot engine: plans boards and resolves stopped reels

use rand::prelude::*;

use crate::board::Board;
use crate::config::SlotConfig;
use crate::economy::EconomyContext;
use crate::error::{SlotError, SlotResult};
use crate::generator::{BoardGenerator, GeneratedBoard};
use crate::glyphs::GlyphKind;
use crate::spin::SpinResult;

/// Slot Engine
///
/// Owns the RNG and the generator derived from [`SlotConfig`]. Economy state
/// lives outside so the same engine can play against any catalog set.
pub struct SlotEngine {
    config: SlotConfig,
    generator: BoardGenerator,
    rng: StdRng,
    boards_planned: u64,
}

impl SlotEngine {
    /// Create from a validated config, seeded from the OS
    pub fn new(config: SlotConfig) -> SlotResult<Self> {
        config.validate()?;
        Ok(Self {
            generator: BoardGenerator::from_config(&config),
            config,
            rng: StdRng::from_os_rng(),
            boards_planned: 0,
        })
    }

    /// Create with a fixed seed
    pub fn with_seed(config: SlotConfig, seed: u64) -> SlotResult<Self> {
        let mut engine = Self::new(config)?;
        engine.seed(seed);
        Ok(engine)
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Boards generated so far
    pub fn boards_planned(&self) -> u64 {
        self.boards_planned
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generate the board the reels should stop on
    pub fn plan_board(&mut self, economy: &EconomyContext) -> SlotResult<GeneratedBoard> {
        let generated = self.generator.generate(economy, &mut self.rng)?;
        self.boards_planned += 1;
        log::debug!(
            "Planned board #{} after {} attempt(s), {} win(s)",
            self.boards_planned,
            generated.attempts,
            generated.matches.len()
        );
        Ok(generated)
    }

    /// Resolve a column-major board reported by the reels
    pub fn resolve_columns(
        &self,
        economy: &EconomyContext,
        columns: Vec<Vec<GlyphKind>>,
        session_multiplier: f64,
    ) -> SlotResult<SpinResult> {
        let board = Board::from_columns(columns)?;
        if board.rows() != self.config.rows as usize || board.columns() != self.config.columns as usize {
            return Err(SlotError::InvalidBoard(format!(
                "expected {}x{}, got {}x{}",
                self.config.rows,
                self.config.columns,
                board.rows(),
                board.columns()
            )));
        }
        Ok(SpinResult::resolve(board, economy, session_multiplier))
    }

    /// Plan and resolve in one step
    pub fn spin(&mut self, economy: &EconomyContext, session_multiplier: f64) -> SlotResult<SpinResult> {
        let generated = self.plan_board(economy)?;
        // Detection already ran on the generated board; resolve from a clean copy
        let columns = generated.board.to_columns();
        self.resolve_columns(economy, columns, session_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::GlyphKind::*;

    #[test]
    fn test_engine_creation() {
        let engine = SlotEngine::new(SlotConfig::standard()).unwrap();
        assert_eq!(engine.boards_planned(), 0);
        assert_eq!(engine.config().columns, 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SlotConfig {
            rows: 0,
            ..SlotConfig::standard()
        };
        assert!(matches!(SlotEngine::new(config), Err(SlotError::InvalidConfig(_))));
    }

    #[test]
    fn test_seeded_spins_repeat() {
        let economy = EconomyContext::standard();
        let mut a = SlotEngine::with_seed(SlotConfig::standard(), 12345).unwrap();
        let mut b = SlotEngine::with_seed(SlotConfig::standard(), 12345).unwrap();

        for _ in 0..5 {
            assert_eq!(a.spin(&economy, 1.0).unwrap(), b.spin(&economy, 1.0).unwrap());
        }
        assert_eq!(a.boards_planned(), 5);
    }

    #[test]
    fn test_resolve_columns_transposes() {
        let engine = SlotEngine::new(SlotConfig::standard()).unwrap();
        let columns = vec![
            vec![Seven, Orange, Lemon],
            vec![Seven, Plum, Cherry],
            vec![Seven, Orange, Lemon],
            vec![Cherry, Plum, Cherry],
            vec![Lemon, Orange, Bell],
        ];
        let result = engine
            .resolve_columns(&EconomyContext::standard(), columns, 1.0)
            .unwrap();

        assert_eq!(result.board.glyph_at(0, 2), Some(Seven));
        assert_eq!(result.wins.len(), 1);
        assert_eq!(result.total_payout, 75);
    }

    #[test]
    fn test_resolve_columns_wrong_size() {
        let engine = SlotEngine::new(SlotConfig::standard()).unwrap();
        let columns = vec![vec![Bell, Bell, Bell]; 4];
        assert!(matches!(
            engine.resolve_columns(&EconomyContext::standard(), columns, 1.0),
            Err(SlotError::InvalidBoard(_))
        ));
    }
}
