//! Element-type colours.

use crate::model::ElementType;

/// Colour used for types the palette does not list.
pub const FALLBACK_COLOR: &str = "#BDC3C7";

/// Mapping from element type to overlay colour.
///
/// Immutable once built and carried inside [`RenderOptions`](super::RenderOptions),
/// so every component sees the same table without reaching for global state.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<(ElementType, String)>,
    fallback: String,
}

impl Palette {
    /// Create a palette with no entries; every type gets `fallback`.
    pub fn empty(fallback: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Set or replace the colour of one type.
    pub fn with_color(mut self, kind: ElementType, color: impl Into<String>) -> Self {
        let color = color.into();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, existing)) => *existing = color,
            None => self.entries.push((kind, color)),
        }
        self
    }

    /// Colour for a type; unknown types resolve to the fallback, never an error.
    pub fn color_for(&self, kind: &ElementType) -> &str {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, color)| color.as_str())
            .unwrap_or(&self.fallback)
    }

    /// Fallback colour.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Entries in legend order.
    pub fn entries(&self) -> impl Iterator<Item = (&ElementType, &str)> {
        self.entries.iter().map(|(k, c)| (k, c.as_str()))
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = [
            "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
        ];

        ElementType::KNOWN
            .into_iter()
            .zip(colors)
            .fold(Palette::empty(FALLBACK_COLOR), |palette, (kind, color)| {
                palette.with_color(kind, color)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colors() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(&ElementType::SectionHeader), "#FF6B6B");
        assert_eq!(palette.color_for(&ElementType::Table), "#98D8C8");
        assert_eq!(palette.color_for(&ElementType::List), "#F7DC6F");
        assert_eq!(palette.entries().count(), 8);
    }

    #[test]
    fn test_default_colors_distinct() {
        let palette = Palette::default();
        let mut colors: Vec<&str> = palette.entries().map(|(_, c)| c).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 8);
    }

    #[test]
    fn test_unknown_type_uses_fallback() {
        let palette = Palette::default();
        let kind = ElementType::Other("equation".to_string());
        assert_eq!(palette.color_for(&kind), FALLBACK_COLOR);
    }

    #[test]
    fn test_with_color_overrides() {
        let palette = Palette::default().with_color(ElementType::Text, "#000000");
        assert_eq!(palette.color_for(&ElementType::Text), "#000000");
        assert_eq!(palette.entries().count(), 8);
    }
}
