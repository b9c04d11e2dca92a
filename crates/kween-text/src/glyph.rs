//! Glyph units and the glyph renderer

use crate::catalog::{AssetId, GlyphCatalog};

/// One rendered character
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphUnit {
    /// Character drawn with its glyph image, scaled to `height`
    Image { ch: char, asset: AssetId, height: f32 },
    /// Character drawn as plain text at `height` point size
    Fallback { ch: char, height: f32 },
}

impl GlyphUnit {
    /// The character this unit stands for
    pub fn ch(&self) -> char {
        match self {
            Self::Image { ch, .. } | Self::Fallback { ch, .. } => *ch,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            Self::Image { height, .. } | Self::Fallback { height, .. } => *height,
        }
    }

    pub fn asset(&self) -> Option<&AssetId> {
        match self {
            Self::Image { asset, .. } => Some(asset),
            Self::Fallback { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Replace an image glyph with a text fallback of the same size.
    ///
    /// Fallbacks are returned unchanged; they never re-resolve.
    pub fn demote(self) -> Self {
        match self {
            Self::Image { ch, height, .. } => Self::Fallback { ch, height },
            fallback => fallback,
        }
    }
}

/// A non-empty run of glyph units
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    units: Vec<GlyphUnit>,
}

impl Word {
    /// Wrap units into a word; `None` if there are none
    pub fn new(units: Vec<GlyphUnit>) -> Option<Self> {
        if units.is_empty() {
            None
        } else {
            Some(Self { units })
        }
    }

    pub fn units(&self) -> &[GlyphUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The characters of the word
    pub fn text(&self) -> String {
        self.units.iter().map(GlyphUnit::ch).collect()
    }

    /// Demote every image glyph for which `failed` returns true
    pub fn demote_where(self, mut failed: impl FnMut(&AssetId) -> bool) -> Self {
        let units = self
            .units
            .into_iter()
            .map(|unit| match unit.asset() {
                Some(asset) if failed(asset) => unit.demote(),
                _ => unit,
            })
            .collect();
        Self { units }
    }
}

/// Resolves characters against a catalog
#[derive(Debug, Clone, Copy)]
pub struct GlyphRenderer<'a> {
    catalog: &'a GlyphCatalog,
}

impl<'a> GlyphRenderer<'a> {
    pub fn new(catalog: &'a GlyphCatalog) -> Self {
        Self { catalog }
    }

    /// Render one character at the given glyph height
    pub fn render(&self, ch: char, height: f32) -> GlyphUnit {
        match self.catalog.resolve(ch) {
            Some(asset) => GlyphUnit::Image {
                ch,
                asset: asset.clone(),
                height,
            },
            None => GlyphUnit::Fallback { ch, height },
        }
    }

    /// Render every character of a word
    pub fn render_word(&self, word: &str, height: f32) -> Option<Word> {
        Word::new(word.chars().map(|c| self.render(c, height)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mapped_character() {
        let catalog = GlyphCatalog::standard();
        let unit = GlyphRenderer::new(&catalog).render('k', 50.0);
        assert_eq!(
            unit,
            GlyphUnit::Image { ch: 'k', asset: AssetId::new("K.png"), height: 50.0 }
        );
    }

    #[test]
    fn test_render_fallback_keeps_character() {
        let catalog = GlyphCatalog::standard();
        let renderer = GlyphRenderer::new(&catalog);
        for c in ['3', '?', '&'] {
            assert_eq!(renderer.render(c, 20.0), GlyphUnit::Fallback { ch: c, height: 20.0 });
        }
    }

    #[test]
    fn test_demote() {
        let image = GlyphUnit::Image { ch: 'A', asset: AssetId::new("A.png"), height: 30.0 };
        let fallback = image.demote();
        assert_eq!(fallback, GlyphUnit::Fallback { ch: 'A', height: 30.0 });
        assert_eq!(fallback.clone().demote(), fallback);
    }

    #[test]
    fn test_empty_word() {
        let catalog = GlyphCatalog::standard();
        assert!(GlyphRenderer::new(&catalog).render_word("", 10.0).is_none());
    }

    #[test]
    fn test_demote_where() {
        let catalog = GlyphCatalog::standard();
        let word = GlyphRenderer::new(&catalog).render_word("ALL", 10.0).unwrap();
        let word = word.demote_where(|asset| asset.as_str() == "L.png");
        let fallbacks: Vec<bool> = word.units().iter().map(GlyphUnit::is_fallback).collect();
        assert_eq!(fallbacks, [false, true, true]);
        assert_eq!(word.text(), "ALL");
    }
}
