//! Constrained board generation by rejection sampling

use rand::Rng;

use crate::board::Board;
use crate::config::SlotConfig;
use crate::detector::{PatternMatch, detect_wins};
use crate::economy::EconomyContext;
use crate::error::SlotResult;
use crate::glyphs::GlyphKind;
use crate::retry::{ExhaustionPolicy, retry_bounded};
use crate::sampler::WeightedSampler;

/// A generated board with its detection already applied
#[derive(Debug, Clone)]
pub struct GeneratedBoard {
    pub board: Board,
    pub matches: Vec<PatternMatch>,
    /// Candidates drawn, including the returned one
    pub attempts: usize,
    /// The board meets both thresholds
    pub satisfied: bool,
}

/// Draws whole boards until the win constraints hold.
///
/// When the retry budget runs out the last candidate is returned as-is, so
/// generation always terminates but may violate very strict thresholds.
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    rows: usize,
    columns: usize,
    max_attempts: usize,
    /// Every detected win must carry at least this multiplier
    min_multiplier: f64,
    /// At least this many wins
    min_win_count: usize,
}

impl BoardGenerator {
    pub fn new(rows: usize, columns: usize, max_attempts: usize) -> Self {
        Self {
            rows,
            columns,
            max_attempts,
            min_multiplier: 0.0,
            min_win_count: 0,
        }
    }

    pub fn from_config(config: &SlotConfig) -> Self {
        Self::new(
            config.rows as usize,
            config.columns as usize,
            config.max_generation_attempts,
        )
        .with_thresholds(config.min_multiplier, config.min_win_count)
    }

    /// Builder: acceptance thresholds
    pub fn with_thresholds(mut self, min_multiplier: f64, min_win_count: usize) -> Self {
        self.min_multiplier = min_multiplier;
        self.min_win_count = min_win_count;
        self
    }

    /// Does a detection result pass both thresholds
    ///
    /// The smallest multiplier of an empty win list counts as +∞.
    pub fn accepts(&self, matches: &[PatternMatch]) -> bool {
        let min_multiplier = matches
            .iter()
            .map(|m| m.multiplier)
            .fold(f64::INFINITY, f64::min);
        min_multiplier >= self.min_multiplier && matches.len() >= self.min_win_count
    }

    /// Generate one board
    ///
    /// Fails only on a broken glyph catalog; an exhausted budget is logged
    /// and degrades to the last candidate.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        economy: &EconomyContext,
        rng: &mut R,
    ) -> SlotResult<GeneratedBoard> {
        let sampler = economy.glyphs.sampler()?;

        let outcome = retry_bounded(
            self.max_attempts,
            ExhaustionPolicy::ReturnLast,
            |_| {
                let mut board = self.draw_board(&sampler, &mut *rng)?;
                let matches = detect_wins(&mut board, &economy.patterns);
                Ok((board, matches))
            },
            |(_, matches)| self.accepts(matches),
        )?;

        if !outcome.accepted {
            log::warn!(
                "Board generation exhausted {} attempts (min multiplier {}, min wins {}); using last candidate",
                outcome.attempts,
                self.min_multiplier,
                self.min_win_count
            );
        }

        let (board, matches) = outcome.value;
        Ok(GeneratedBoard {
            board,
            matches,
            attempts: outcome.attempts,
            satisfied: outcome.accepted,
        })
    }

    /// Fill every cell independently
    fn draw_board<R: Rng + ?Sized>(
        &self,
        sampler: &WeightedSampler<GlyphKind>,
        rng: &mut R,
    ) -> SlotResult<Board> {
        let mut rows = Vec::with_capacity(self.rows);
        for _ in 0..self.rows {
            let mut row = Vec::with_capacity(self.columns);
            for _ in 0..self.columns {
                row.push(sampler.sample(&mut *rng));
            }
            rows.push(row);
        }
        Board::from_rows(rows)
    }
}
