//! Charms: runtime modifiers of the economy
//!
//! A closed set of variants dispatched through [`apply_modifier`]. Mutations are
//! permanent; there is no undo log.

use serde::{Deserialize, Serialize};

use crate::economy::EconomyContext;
use crate::error::{SlotError, SlotResult};
use crate::glyphs::GlyphKind;
use crate::patterns::{PatternGroup, PatternKind};

/// A runtime modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modifier {
    /// Shift one glyph's rarity weight
    RarityWeight { glyph: GlyphKind, delta: f64 },
    /// Shift one glyph's payout value
    Payout { glyph: GlyphKind, delta: f64 },
    /// Shift one pattern's multiplier
    PatternMultiplier { pattern: PatternKind, delta: f64 },
    /// Shift the multiplier of every pattern in a group
    GroupMultiplier { group: PatternGroup, delta: f64 },
    /// Shift the session multiplier (owned by the state machine)
    GlobalMultiplier { delta: f64 },
}

impl Modifier {
    /// Human-readable summary
    pub fn description(&self) -> String {
        match self {
            Modifier::RarityWeight { glyph, delta } => {
                format!("{delta:+} rarity weight for {glyph}")
            }
            Modifier::Payout { glyph, delta } => format!("{delta:+} payout for {glyph}"),
            Modifier::PatternMultiplier { pattern, delta } => {
                format!("{delta:+} multiplier for {pattern}")
            }
            Modifier::GroupMultiplier { group, delta } => {
                format!("{delta:+} multiplier for all {group} patterns")
            }
            Modifier::GlobalMultiplier { delta } => format!("{delta:+} global multiplier"),
        }
    }

    pub fn delta(&self) -> f64 {
        match self {
            Modifier::RarityWeight { delta, .. }
            | Modifier::Payout { delta, .. }
            | Modifier::PatternMultiplier { delta, .. }
            | Modifier::GroupMultiplier { delta, .. }
            | Modifier::GlobalMultiplier { delta } => *delta,
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

/// What [`apply_modifier`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierOutcome {
    /// A catalog entry changed
    Applied,
    /// Unknown target under the lenient policy; nothing changed
    Skipped,
    /// Not a catalog change: the caller owns the session multiplier and
    /// should shift it by this delta
    SessionMultiplier(f64),
}

/// Apply a modifier to the economy in place.
///
/// Values are clamped at zero. A weight change that would leave the catalog
/// with no positive total weight is reverted and reported as an error.
pub fn apply_modifier(economy: &mut EconomyContext, modifier: &Modifier) -> SlotResult<ModifierOutcome> {
    let outcome = match *modifier {
        Modifier::RarityWeight { glyph, delta } => {
            let Some(entry) = economy.glyphs.get_mut(glyph) else {
                return unknown_target(economy, SlotError::UnknownGlyph(glyph));
            };
            let previous = entry.rarity_weight;
            entry.rarity_weight = (previous + delta).max(0.0);

            if let Err(err) = economy.glyphs.validate() {
                if let Some(entry) = economy.glyphs.get_mut(glyph) {
                    entry.rarity_weight = previous;
                }
                return Err(err);
            }
            ModifierOutcome::Applied
        }
        Modifier::Payout { glyph, delta } => {
            let Some(entry) = economy.glyphs.get_mut(glyph) else {
                return unknown_target(economy, SlotError::UnknownGlyph(glyph));
            };
            entry.payout_value = (entry.payout_value + delta).max(0.0);
            ModifierOutcome::Applied
        }
        Modifier::PatternMultiplier { pattern, delta } => {
            let Some(entry) = economy.patterns.get_mut(pattern) else {
                return unknown_target(economy, SlotError::UnknownPattern(pattern));
            };
            entry.multiplier = (entry.multiplier + delta).max(0.0);
            ModifierOutcome::Applied
        }
        Modifier::GroupMultiplier { group, delta } => {
            let mut touched = 0usize;
            for entry in economy.patterns.group_mut(group) {
                entry.multiplier = (entry.multiplier + delta).max(0.0);
                touched += 1;
            }
            if touched == 0 {
                return unknown_target(economy, SlotError::UnknownGroup(group));
            }
            ModifierOutcome::Applied
        }
        Modifier::GlobalMultiplier { delta } => return Ok(ModifierOutcome::SessionMultiplier(delta)),
    };

    log::info!("Charm applied: {}", modifier.description());
    Ok(outcome)
}

fn unknown_target(economy: &EconomyContext, err: SlotError) -> SlotResult<ModifierOutcome> {
    if economy.strict_modifiers {
        Err(err)
    } else {
        log::warn!("Charm skipped: {err}");
        Ok(ModifierOutcome::Skipped)
    }
}
