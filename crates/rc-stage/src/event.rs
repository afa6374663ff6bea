//! StageEvent: A stage occurrence with metadata
//!
//! Wraps a Stage with a session timestamp, payload, and tags.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Timestamp in milliseconds on the session clock
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,

    /// Custom tags for filtering/routing
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
            tags: Vec::new(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    // ═══ WIN DATA ═══
    /// Total win amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<f64>,

    /// Bet amount (for ratio calculations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<f64>,

    /// Win-to-bet ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_ratio: Option<f64>,

    /// Multiplier in effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,

    // ═══ BOARD DATA ═══
    /// Board positions (row, column) involved in the stage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<(u8, u8)>,

    /// Full board as glyph ids, column-major (reels × rows)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel_grid: Option<Vec<Vec<u32>>>,

    // ═══ SESSION ═══
    /// Spin sequence number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<u64>,
}

impl StagePayload {
    /// Create empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with win data
    pub fn with_win(win_amount: f64, bet_amount: Option<f64>) -> Self {
        let win_ratio = bet_amount.map(|bet| if bet > 0.0 { win_amount / bet } else { 0.0 });

        Self {
            win_amount: Some(win_amount),
            bet_amount,
            win_ratio,
            ..Default::default()
        }
    }

    /// Builder: set multiplier
    pub fn multiplier(mut self, mult: f64) -> Self {
        self.multiplier = Some(mult);
        self
    }

    /// Builder: set board positions
    pub fn positions(mut self, positions: Vec<(u8, u8)>) -> Self {
        self.positions = positions;
        self
    }

    /// Builder: set column-major board
    pub fn reel_grid(mut self, grid: Vec<Vec<u32>>) -> Self {
        self.reel_grid = Some(grid);
        self
    }

    /// Builder: set spin id
    pub fn spin_id(mut self, id: u64) -> Self {
        self.spin_id = Some(id);
        self
    }
}
