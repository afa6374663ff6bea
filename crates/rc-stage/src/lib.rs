//! # rc-stage: ReelCharm Stage Vocabulary
//!
//! Defines the notifications the slot core emits while it resolves a spin.
//! Renderers, audio and HUD layers never inspect core internals, only STAGES.
//!
//! ## Philosophy
//!
//! Every spin passes through the same semantic phases:
//! - Coins deducted → Spin starts → Reels stop → Wins detected → Payout credited
//!
//! This crate defines those stages plus the game-phase taxonomy they refer to.

pub mod event;
pub mod stage;
pub mod taxonomy;

pub use event::*;
pub use stage::*;
pub use taxonomy::*;
