//! Payout calculation
//!
//! One canonical rule: a win is worth the sum over its matched cells of
//! `payout_value × pattern multiplier`. `base_value` (floored mean cell payout)
//! is for display only and never feeds the coin total.

use serde::{Deserialize, Serialize};

use crate::board::{Board, GlyphInstance};
use crate::detector::PatternMatch;
use crate::glyphs::GlyphCatalog;
use crate::patterns::PatternKind;

/// One pattern match with its computed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Win {
    /// Matched instances, row-major
    pub glyphs: Vec<GlyphInstance>,
    pub combination_type: PatternKind,
    /// Floored mean payout of the matched cells (display only)
    pub base_value: u64,
    pub multiplier: f64,
    /// Authoritative coin value before the session multiplier
    pub total_value: f64,
}

impl Win {
    /// Full-board jackpot match
    pub fn is_jackpot(&self) -> bool {
        self.combination_type == PatternKind::Jackpot
    }

    /// Matched (row, column) positions; coordinates past 255 saturate
    pub fn positions(&self) -> Vec<(u8, u8)> {
        self.glyphs
            .iter()
            .map(|g| (saturate_u8(g.row), saturate_u8(g.column)))
            .collect()
    }
}

pub(crate) fn saturate_u8(n: usize) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}

/// Value one match against the current glyph payouts
pub fn calculate_win(board: &Board, matched: &PatternMatch, glyphs: &GlyphCatalog) -> Win {
    let instances: Vec<GlyphInstance> = matched
        .cells
        .iter()
        .filter_map(|&(r, c)| board.get(r, c).cloned())
        .collect();

    let payouts: Vec<f64> = instances.iter().map(|g| glyphs.payout_of(g.glyph)).collect();
    let sum: f64 = payouts.iter().sum();
    let base_value = if payouts.is_empty() {
        0
    } else {
        (sum / payouts.len() as f64).max(0.0).floor() as u64
    };

    Win {
        glyphs: instances,
        combination_type: matched.pattern,
        base_value,
        multiplier: matched.multiplier,
        total_value: payouts.iter().map(|p| p * matched.multiplier).sum(),
    }
}

/// Value every match, preserving detection order
pub fn calculate_wins(board: &Board, matches: &[PatternMatch], glyphs: &GlyphCatalog) -> Vec<Win> {
    matches
        .iter()
        .map(|m| calculate_win(board, m, glyphs))
        .collect()
}

/// Coins paid for a spin: summed win values times the session multiplier, floored
pub fn spin_payout(wins: &[Win], session_multiplier: f64) -> u64 {
    let sum: f64 = wins.iter().map(|w| w.total_value).sum();
    (sum * session_multiplier).max(0.0).floor() as u64
}
