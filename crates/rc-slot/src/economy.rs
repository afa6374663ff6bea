//! Economy context: the catalogs a session plays against

use serde::{Deserialize, Serialize};

use crate::error::SlotResult;
use crate::glyphs::GlyphCatalog;
use crate::patterns::PatternCatalog;

/// Owns the glyph and pattern catalogs.
///
/// Passed explicitly to the generator and the state machine so tests can run
/// against isolated, repeatable economies. Charm mutations persist for the
/// lifetime of the value; only [`EconomyContext::restore_defaults`] undoes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyContext {
    pub glyphs: GlyphCatalog,
    pub patterns: PatternCatalog,
    /// Unknown charm targets are errors instead of skipped
    #[serde(default)]
    pub strict_modifiers: bool,
}

impl EconomyContext {
    /// Build and validate
    pub fn new(glyphs: GlyphCatalog, patterns: PatternCatalog) -> SlotResult<Self> {
        glyphs.validate()?;
        Ok(Self {
            glyphs,
            patterns,
            strict_modifiers: false,
        })
    }

    /// Standard glyph and pattern tables
    pub fn standard() -> Self {
        Self {
            glyphs: GlyphCatalog::standard(),
            patterns: PatternCatalog::standard(),
            strict_modifiers: false,
        }
    }

    /// Builder: strict modifier policy
    pub fn with_strict_modifiers(mut self, strict: bool) -> Self {
        self.strict_modifiers = strict;
        self
    }

    /// Discard every charm mutation
    pub fn restore_defaults(&mut self) {
        log::info!("Restoring default glyph and pattern catalogs");
        self.glyphs = GlyphCatalog::standard();
        self.patterns = PatternCatalog::standard();
    }
}

impl Default for EconomyContext {
    fn default() -> Self {
        Self::standard()
    }
}
