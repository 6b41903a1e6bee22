//! Style values attached to blocks, paragraphs and styled segments.
//!
//! Styles are plain values: two styles are the same style when they compare
//! equal, so a [`StyleSet`] never holds the same value twice.

/// Parameterless styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub enum SimpleStyle {
    Bold,
    Italic,
    Ruled,
    Horizontal,
    AlignEnd,
    Caption,
    HeadingLarge,
    HeadingMedium,
    HeadingSmall,
    /// Sesame dots (傍点) and the glyph variants below.
    Sesame,
    OpenSesame,
    Circle,
    CircleOpen,
    Triangle,
    TriangleOpen,
    DoubleCircle,
    DoubleCircleOpen,
    Saltire,
    /// Side lines (傍線) and their variants.
    Lined,
    DoubleLined,
    Dotted,
    Dashed,
    WaveDashed,
    /// Horizontal-in-vertical text (縦中横).
    Rotated,
    Superscript,
    Subscript,
    Kunten,
    Okurigana,
    Warichu,
    PageCenter,
    Gothic,
}

/// A style applied to a block, a paragraph, or a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum Style {
    Simple(SimpleStyle),
    /// Relative font size in steps; negative values are smaller.
    FontSize(i32),
    /// Indentation from the line start, in full-width characters.
    StartMargin(u32),
    /// Indentation from the line end, in full-width characters.
    EndMargin(u32),
    /// Line width limit, in full-width characters.
    Width(u32),
}

impl From<SimpleStyle> for Style {
    fn from(style: SimpleStyle) -> Self {
        Style::Simple(style)
    }
}

/// Insertion-ordered set of styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(transparent))]
pub struct StyleSet(Vec<Style>);

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style. Returns `false` if an equal style was already present.
    pub fn insert(&mut self, style: impl Into<Style>) -> bool {
        let style = style.into();
        if self.0.contains(&style) {
            return false;
        }
        self.0.push(style);
        true
    }

    pub fn contains(&self, style: &Style) -> bool {
        self.0.contains(style)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a StyleSet {
    type Item = &'a Style;
    type IntoIter = std::slice::Iter<'a, Style>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Style> for StyleSet {
    fn from_iter<I: IntoIterator<Item = Style>>(iter: I) -> Self {
        let mut set = StyleSet::new();
        for style in iter {
            set.insert(style);
        }
        set
    }
}

impl Extend<Style> for StyleSet {
    fn extend<I: IntoIterator<Item = Style>>(&mut self, iter: I) {
        for style in iter {
            self.insert(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_styles_collapse() {
        let mut set = StyleSet::new();
        assert!(set.insert(SimpleStyle::Bold));
        assert!(set.insert(Style::StartMargin(2)));
        assert!(!set.insert(Style::Simple(SimpleStyle::Bold)));
        assert!(!set.insert(Style::StartMargin(2)));
        assert!(set.insert(Style::StartMargin(3)));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let set: StyleSet = [Style::Width(10), SimpleStyle::Italic.into(), Style::Width(10)]
            .into_iter()
            .collect();
        let styles: Vec<_> = set.iter().copied().collect();
        assert_eq!(styles, vec![Style::Width(10), Style::Simple(SimpleStyle::Italic)]);
    }

    #[test]
    fn test_extend_skips_known_styles() {
        let mut set = StyleSet::new();
        set.insert(SimpleStyle::AlignEnd);
        set.extend([Style::FontSize(2), SimpleStyle::AlignEnd.into()]);
        let styles: Vec<_> = set.iter().copied().collect();
        assert_eq!(styles, vec![SimpleStyle::AlignEnd.into(), Style::FontSize(2)]);
    }
}
