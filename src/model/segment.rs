//! Segment types: the pieces a [`Fragment`] is made of.
//!
//! Every segment has a length in Unicode scalar values and a *projection*:
//! the string the transformer passes scan with their patterns. Text-bearing
//! segments project their visible text; markers and images project a single
//! [`OBJECT_REPLACEMENT`] so they keep a unique position without ever
//! matching a tag pattern.

use std::path::{Path, PathBuf};

use super::fragment::Fragment;
use super::style::{Style, StyleSet};

/// Placeholder character standing in for zero-text segments in projections.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// A piece of paragraph content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(
    feature = "cli",
    serde(tag = "type", content = "content", rename_all = "snake_case")
)]
pub enum Segment {
    /// Literal text.
    Text(String),
    /// Base text annotated with a reading.
    Ruby(Ruby),
    /// A segment with one or more styles applied.
    Styled(StyledSegment),
    /// A zero-text sentinel such as a forced line break.
    Marker(Marker),
    /// An inline image reference.
    Image(ImageMarker),
    /// A run of several segments, produced by slicing across boundaries.
    Fragment(Fragment),
}

/// Zero-text markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub enum Marker {
    LineBreak,
}

/// Ruby (furigana): a base segment and its phonetic reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Ruby {
    pub base: Box<Segment>,
    pub reading: String,
}

impl Ruby {
    pub fn new(base: Segment, reading: impl Into<String>) -> Self {
        Self {
            base: Box::new(base),
            reading: reading.into(),
        }
    }
}

/// A segment wrapped in styles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct StyledSegment {
    pub inner: Box<Segment>,
    pub styles: StyleSet,
}

impl StyledSegment {
    pub fn new(inner: Segment, style: impl Into<Style>) -> Self {
        let mut styles = StyleSet::new();
        styles.insert(style);
        Self {
            inner: Box::new(inner),
            styles,
        }
    }
}

/// An image placed inline in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct ImageMarker {
    /// Absolute path of the image file.
    pub path: PathBuf,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageMarker {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            caption: None,
            width: None,
            height: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    /// Length in Unicode scalar values.
    pub fn len(&self) -> usize {
        match self {
            Segment::Text(text) => text.chars().count(),
            Segment::Ruby(ruby) => ruby.base.len(),
            Segment::Styled(styled) => styled.inner.len(),
            Segment::Marker(_) | Segment::Image(_) => 1,
            Segment::Fragment(fragment) => fragment.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character of the projection at `index`.
    pub fn char_at(&self, index: usize) -> Option<char> {
        match self {
            Segment::Text(text) => text.chars().nth(index),
            Segment::Ruby(ruby) => ruby.base.char_at(index),
            Segment::Styled(styled) => styled.inner.char_at(index),
            Segment::Marker(_) | Segment::Image(_) => (index == 0).then_some(OBJECT_REPLACEMENT),
            Segment::Fragment(fragment) => fragment.char_at(index),
        }
    }

    /// Copy of the range `[start, end)`; bounds are clamped to the segment.
    ///
    /// Styles are copied onto the slice. A ruby sliced to less than its full
    /// base cannot keep its reading and degrades to the sliced base.
    pub fn slice(&self, start: usize, end: usize) -> Segment {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);

        if start == 0 && end == len {
            return self.clone();
        }
        if start == end {
            return Segment::Text(String::new());
        }

        match self {
            Segment::Text(text) => {
                Segment::Text(text.chars().skip(start).take(end - start).collect())
            }
            Segment::Ruby(ruby) => {
                log::debug!("ruby {:?} split, dropping its reading", ruby.reading);
                ruby.base.slice(start, end)
            }
            Segment::Styled(styled) => Segment::Styled(StyledSegment {
                inner: Box::new(styled.inner.slice(start, end)),
                styles: styled.styles.clone(),
            }),
            // Single-position segments only have the trivial slices above.
            Segment::Marker(_) | Segment::Image(_) => self.clone(),
            Segment::Fragment(fragment) => fragment.slice_clamped(start, end),
        }
    }

    pub(crate) fn write_projection(&self, buf: &mut String) {
        match self {
            Segment::Text(text) => buf.push_str(text),
            Segment::Ruby(ruby) => ruby.base.write_projection(buf),
            Segment::Styled(styled) => styled.inner.write_projection(buf),
            Segment::Marker(_) | Segment::Image(_) => buf.push(OBJECT_REPLACEMENT),
            Segment::Fragment(fragment) => {
                for segment in fragment {
                    segment.write_projection(buf);
                }
            }
        }
    }

    pub(crate) fn write_text(&self, buf: &mut String) {
        match self {
            Segment::Text(text) => buf.push_str(text),
            Segment::Ruby(ruby) => ruby.base.write_text(buf),
            Segment::Styled(styled) => styled.inner.write_text(buf),
            Segment::Marker(_) | Segment::Image(_) => {}
            Segment::Fragment(fragment) => {
                for segment in fragment {
                    segment.write_text(buf);
                }
            }
        }
    }

    /// The string pattern passes scan.
    pub fn projection(&self) -> String {
        let mut buf = String::new();
        self.write_projection(&mut buf);
        buf
    }

    /// Plain text with ruby readings and markers left out.
    pub fn plain_text(&self) -> String {
        let mut buf = String::new();
        self.write_text(&mut buf);
        buf
    }
}

impl From<Ruby> for Segment {
    fn from(ruby: Ruby) -> Self {
        Segment::Ruby(ruby)
    }
}

impl From<StyledSegment> for Segment {
    fn from(styled: StyledSegment) -> Self {
        Segment::Styled(styled)
    }
}

impl From<Marker> for Segment {
    fn from(marker: Marker) -> Self {
        Segment::Marker(marker)
    }
}

impl From<ImageMarker> for Segment {
    fn from(image: ImageMarker) -> Self {
        Segment::Image(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleStyle;

    #[test]
    fn test_text_len_counts_chars() {
        assert_eq!(Segment::text("漢字かな").len(), 4);
        assert_eq!(Segment::text("").len(), 0);
    }

    #[test]
    fn test_marker_occupies_one_position() {
        let marker = Segment::from(Marker::LineBreak);
        assert_eq!(marker.len(), 1);
        assert_eq!(marker.char_at(0), Some(OBJECT_REPLACEMENT));
        assert_eq!(marker.plain_text(), "");
    }

    #[test]
    fn test_styled_slice_copies_styles() {
        let styled = Segment::from(StyledSegment::new(Segment::text("太い文字"), SimpleStyle::Bold));
        let Segment::Styled(slice) = styled.slice(1, 3) else {
            panic!("expected styled slice");
        };
        assert_eq!(slice.inner.plain_text(), "い文");
        assert!(slice.styles.contains(&Style::Simple(SimpleStyle::Bold)));
    }

    #[test]
    fn test_ruby_full_slice_is_identity() {
        let ruby = Segment::from(Ruby::new(Segment::text("漢字"), "かんじ"));
        assert_eq!(ruby.slice(0, 2), ruby);
        assert_eq!(ruby.slice(1, 2), Segment::text("字"));
    }

    #[test]
    fn test_slice_clamps_bounds() {
        assert_eq!(Segment::text("abc").slice(1, 10), Segment::text("bc"));
        assert_eq!(Segment::text("abc").slice(5, 2), Segment::text(""));
    }
}
