//! Glyph definitions and the glyph catalog

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::sampler::WeightedSampler;

/// Glyph identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GlyphKind {
    Cherry = 1,
    Lemon = 2,
    Orange = 3,
    Plum = 4,
    Bell = 5,
    Bar = 6,
    Seven = 7,
    Diamond = 8,
}

impl GlyphKind {
    /// All glyph kinds, cheapest first
    pub const ALL: [GlyphKind; 8] = [
        GlyphKind::Cherry,
        GlyphKind::Lemon,
        GlyphKind::Orange,
        GlyphKind::Plum,
        GlyphKind::Bell,
        GlyphKind::Bar,
        GlyphKind::Seven,
        GlyphKind::Diamond,
    ];

    /// Numeric id used on the notification wire
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Reverse of [`GlyphKind::id`]
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.id() == id)
    }

    /// Default display name
    pub fn display_name(self) -> &'static str {
        match self {
            GlyphKind::Cherry => "Cherry",
            GlyphKind::Lemon => "Lemon",
            GlyphKind::Orange => "Orange",
            GlyphKind::Plum => "Plum",
            GlyphKind::Bell => "Bell",
            GlyphKind::Bar => "Bar",
            GlyphKind::Seven => "Seven",
            GlyphKind::Diamond => "Diamond",
        }
    }
}

impl std::fmt::Display for GlyphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A glyph definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glyph {
    /// Identity
    pub kind: GlyphKind,
    /// Display name
    pub name: String,
    /// Coins paid per matched cell, before the pattern multiplier
    pub payout_value: f64,
    /// Relative draw probability
    pub rarity_weight: f64,
}

impl Glyph {
    pub fn new(kind: GlyphKind, payout_value: f64, rarity_weight: f64) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            payout_value,
            rarity_weight,
        }
    }
}

/// Table of glyph definitions
///
/// Created once at start-up; charms mutate entries in place afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphCatalog {
    glyphs: Vec<Glyph>,
}

impl GlyphCatalog {
    /// Build a catalog, rejecting empty or weightless tables
    pub fn new(glyphs: Vec<Glyph>) -> SlotResult<Self> {
        let catalog = Self { glyphs };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Standard eight-glyph table: common fruit down to the rare diamond
    pub fn standard() -> Self {
        Self {
            glyphs: vec![
                Glyph::new(GlyphKind::Cherry, 2.0, 30.0),
                Glyph::new(GlyphKind::Lemon, 3.0, 25.0),
                Glyph::new(GlyphKind::Orange, 4.0, 20.0),
                Glyph::new(GlyphKind::Plum, 5.0, 15.0),
                Glyph::new(GlyphKind::Bell, 10.0, 10.0),
                Glyph::new(GlyphKind::Bar, 15.0, 6.0),
                Glyph::new(GlyphKind::Seven, 25.0, 3.0),
                Glyph::new(GlyphKind::Diamond, 50.0, 1.0),
            ],
        }
    }

    /// Empty catalog or a non-positive total weight is a configuration error
    pub fn validate(&self) -> SlotResult<()> {
        if self.glyphs.is_empty() {
            return Err(SlotError::EmptyCatalog);
        }
        let total = self.total_weight();
        if !(total > 0.0 && total.is_finite()) {
            return Err(SlotError::NonPositiveWeight(total));
        }
        Ok(())
    }

    /// Get glyph by kind
    pub fn get(&self, kind: GlyphKind) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.kind == kind)
    }

    /// Get glyph by kind (mutable)
    pub fn get_mut(&mut self, kind: GlyphKind) -> Option<&mut Glyph> {
        self.glyphs.iter_mut().find(|g| g.kind == kind)
    }

    /// Payout value of a glyph, 0 when absent
    pub fn payout_of(&self, kind: GlyphKind) -> f64 {
        self.get(kind).map(|g| g.payout_value).unwrap_or(0.0)
    }

    /// Sum of all rarity weights
    pub fn total_weight(&self) -> f64 {
        self.glyphs.iter().map(|g| g.rarity_weight).sum()
    }

    /// Iterate glyph definitions in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Sampler over the current weights
    pub fn sampler(&self) -> SlotResult<WeightedSampler<GlyphKind>> {
        if self.glyphs.is_empty() {
            return Err(SlotError::EmptyCatalog);
        }
        WeightedSampler::new(self.glyphs.iter().map(|g| (g.kind, g.rarity_weight)))
    }
}

impl Default for GlyphCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = GlyphCatalog::standard();
        assert_eq!(catalog.len(), GlyphKind::ALL.len());
        assert_eq!(catalog.total_weight(), 110.0);
        assert_eq!(catalog.payout_of(GlyphKind::Diamond), 50.0);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(GlyphCatalog::new(Vec::new()), Err(SlotError::EmptyCatalog)));
    }

    #[test]
    fn test_zero_weight_catalog_rejected() {
        let glyphs = vec![
            Glyph::new(GlyphKind::Cherry, 2.0, 0.0),
            Glyph::new(GlyphKind::Lemon, 3.0, 0.0),
        ];
        assert!(matches!(
            GlyphCatalog::new(glyphs),
            Err(SlotError::NonPositiveWeight(_))
        ));
    }

    #[test]
    fn test_glyph_id_round_trip() {
        for kind in GlyphKind::ALL {
            assert_eq!(GlyphKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(GlyphKind::from_id(0), None);
    }
}
