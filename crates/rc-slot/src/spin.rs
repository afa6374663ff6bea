//! Spin result and win stage generation

use serde::{Deserialize, Serialize};

use rc_stage::{Stage, StageEvent, StagePayload};

use crate::board::Board;
use crate::detector::detect_wins;
use crate::economy::EconomyContext;
use crate::payout::{Win, calculate_wins, saturate_u8, spin_payout};

/// Complete outcome of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    /// Final board with winning cells flagged
    pub board: Board,
    /// One entry per matched pattern, detection order
    pub wins: Vec<Win>,
    /// Coins credited, session multiplier included
    pub total_payout: u64,
    /// Full-board jackpot among the wins
    pub is_jackpot: bool,
}

impl SpinResult {
    /// Detect and value a freshly stopped board
    pub fn resolve(mut board: Board, economy: &EconomyContext, session_multiplier: f64) -> Self {
        let matches = detect_wins(&mut board, &economy.patterns);
        let wins = calculate_wins(&board, &matches, &economy.glyphs);
        let total_payout = spin_payout(&wins, session_multiplier);
        let is_jackpot = wins.iter().any(Win::is_jackpot);

        Self {
            board,
            wins,
            total_payout,
            is_jackpot,
        }
    }

    /// A losing spin on `board`
    pub fn losing(board: Board) -> Self {
        Self {
            board,
            wins: Vec::new(),
            total_payout: 0,
            is_jackpot: false,
        }
    }

    /// At least one pattern matched
    pub fn is_win(&self) -> bool {
        !self.wins.is_empty()
    }

    /// Win presentation stages: one `WinDetected` per match, then `PayoutCalculated`
    pub fn win_stages(&self, timestamp_ms: f64, bet: u64) -> Vec<StageEvent> {
        let mut events = Vec::with_capacity(self.wins.len() + 1);

        for win in &self.wins {
            events.push(StageEvent::with_payload(
                Stage::WinDetected {
                    pattern: win.combination_type.display_name().to_string(),
                    glyph_count: saturate_u8(win.glyphs.len()),
                    total_value: win.total_value,
                },
                timestamp_ms,
                StagePayload::with_win(win.total_value, Some(bet as f64))
                    .multiplier(win.multiplier)
                    .positions(win.positions()),
            ));
        }

        let payout = StageEvent::with_payload(
            Stage::PayoutCalculated {
                total_payout: self.total_payout,
                win_count: saturate_u8(self.wins.len()),
                is_jackpot: self.is_jackpot,
            },
            timestamp_ms,
            StagePayload::with_win(self.total_payout as f64, Some(bet as f64))
                .reel_grid(self.board.to_id_columns()),
        );
        events.push(if self.is_jackpot {
            payout.with_tag("jackpot")
        } else {
            payout
        });

        events
    }
}
