//! # rc-slot: ReelCharm Slot Core
//!
//! Resolves a fixed-grid spin: draws glyphs by rarity weight, rejection-samples
//! a board against win constraints, matches geometric patterns and converts the
//! matches into a coin payout. Charms mutate the economy between spins.
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine
//!     │
//!     ├── SlotConfig (board size, retry budget, thresholds)
//!     ├── BoardGenerator ── WeightedSampler ── GlyphCatalog
//!     │        └── retry_bounded (cap + exhaustion policy)
//!     └── detect_wins ── PatternCatalog
//!           │
//!           v
//!     calculate_wins → SpinResult
//!
//! EconomyContext { GlyphCatalog, PatternCatalog } ←── apply_modifier(Modifier)
//! ```

pub mod board;
pub mod charms;
pub mod config;
pub mod detector;
pub mod economy;
pub mod engine;
pub mod error;
pub mod generator;
pub mod glyphs;
pub mod patterns;
pub mod payout;
pub mod retry;
pub mod sampler;
pub mod spin;

pub use board::*;
pub use charms::*;
pub use config::*;
pub use detector::*;
pub use economy::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use glyphs::*;
pub use patterns::*;
pub use payout::*;
pub use retry::*;
pub use sampler::*;
pub use spin::*;
