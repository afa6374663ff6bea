//! Error types for the slot core

use thiserror::Error;

use crate::glyphs::GlyphKind;
use crate::patterns::{PatternGroup, PatternKind};

/// Slot core error type
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Glyph catalog is empty")]
    EmptyCatalog,

    #[error("Total rarity weight must be positive, got {0}")]
    NonPositiveWeight(f64),

    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Retry budget exhausted after {attempts} attempts")]
    RetryBudgetExhausted { attempts: usize },

    #[error("Unknown glyph: {0}")]
    UnknownGlyph(GlyphKind),

    #[error("Unknown pattern: {0}")]
    UnknownPattern(PatternKind),

    #[error("No patterns in group: {0}")]
    UnknownGroup(PatternGroup),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
