//! Glyph catalog
//!
//! Maps characters to glyph image assets. Lookup is case-folded: a
//! lowercase letter resolves to the asset registered for its uppercase
//! form. Only Latin letters may carry an asset.

use std::collections::HashMap;
use std::fmt;

use crate::{Result, TextError};

/// Identifier of a glyph image asset (a file name relative to the asset root)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Immutable character -> asset table
#[derive(Debug, Clone, Default)]
pub struct GlyphCatalog {
    glyphs: HashMap<char, AssetId>,
}

impl GlyphCatalog {
    /// The full A-Z table, one `X.png` asset per letter
    pub fn standard() -> Self {
        let glyphs = ('A'..='Z')
            .map(|c| (c, AssetId::new(format!("{c}.png"))))
            .collect();
        Self { glyphs }
    }

    /// Build a catalog from explicit entries.
    ///
    /// Keys are folded to uppercase; anything that is not an ASCII letter is
    /// rejected.
    pub fn from_entries<I, A>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, A)>,
        A: Into<AssetId>,
    {
        let mut glyphs = HashMap::new();
        for (c, asset) in entries {
            if !c.is_ascii_alphabetic() {
                return Err(TextError::UnsupportedGlyph(c));
            }
            glyphs.insert(c.to_ascii_uppercase(), asset.into());
        }
        Ok(Self { glyphs })
    }

    /// Resolve a character to its asset
    pub fn resolve(&self, c: char) -> Option<&AssetId> {
        self.glyphs.get(&c.to_ascii_uppercase())
    }

    /// Whether a character has a glyph image
    pub fn contains(&self, c: char) -> bool {
        self.resolve(c).is_some()
    }

    /// Number of registered (uppercase) glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// All distinct assets, sorted
    pub fn assets(&self) -> Vec<&AssetId> {
        let mut assets: Vec<_> = self.glyphs.values().collect();
        assets.sort();
        assets.dedup();
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_covers_alphabet() {
        let catalog = GlyphCatalog::standard();
        assert_eq!(catalog.len(), 26);
        assert_eq!(catalog.resolve('A').map(AssetId::as_str), Some("A.png"));
        assert_eq!(catalog.resolve('Z').map(AssetId::as_str), Some("Z.png"));
    }

    #[test]
    fn test_lowercase_folds_to_uppercase_asset() {
        let catalog = GlyphCatalog::standard();
        assert_eq!(catalog.resolve('q'), catalog.resolve('Q'));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let catalog = GlyphCatalog::standard();
        for c in ('A'..='Z').chain('a'..='z') {
            assert_eq!(catalog.resolve(c), catalog.resolve(c));
        }
    }

    #[test]
    fn test_unmapped_characters() {
        let catalog = GlyphCatalog::standard();
        for c in ['1', '!', ' ', 'é', '中'] {
            assert!(!catalog.contains(c), "{c:?} should be unmapped");
        }
    }

    #[test]
    fn test_from_entries_rejects_non_letters() {
        let err = GlyphCatalog::from_entries([('A', "A.png"), ('7', "7.png")]).unwrap_err();
        assert!(matches!(err, TextError::UnsupportedGlyph('7')));
    }

    #[test]
    fn test_from_entries_folds_keys() {
        let catalog = GlyphCatalog::from_entries([('h', "h.png")]).unwrap();
        assert_eq!(catalog.resolve('H').map(AssetId::as_str), Some("h.png"));
        assert_eq!(catalog.assets().len(), 1);
    }
}
