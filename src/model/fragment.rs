//! Position-indexed, splice-able text container.
//!
//! A [`Fragment`] keeps its segments in a map keyed by start offset. Offsets
//! count Unicode scalar values of the projection (see [`Segment`]), which is
//! what pattern scans over [`Fragment::projection`] report once converted
//! from byte offsets.
//!
//! Invariant: keys are strictly increasing and contiguous, starting at 0,
//! and each key plus its segment length is the next key. Empty segments are
//! never stored.

use std::collections::BTreeMap;
use std::collections::btree_map;

use thiserror::Error;

use super::segment::Segment;

/// Errors from fragment splicing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("range {start}..{end} out of bounds for fragment of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// An ordered run of segments forming one logical string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    children: BTreeMap<usize, Segment>,
}

impl Fragment {
    /// A fragment holding `text` as a single text segment.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut fragment = Fragment::default();
        if !text.is_empty() {
            fragment.children.insert(0, Segment::Text(text));
        }
        fragment
    }

    /// Build a fragment from consecutive segments; empty ones are skipped.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut fragment = Fragment::default();
        fragment.append(segments);
        fragment
    }

    fn append(&mut self, segments: impl IntoIterator<Item = Segment>) {
        let mut index = self.len();
        for segment in segments {
            let len = segment.len();
            if len == 0 {
                continue;
            }
            self.children.insert(index, segment);
            index += len;
        }
    }

    pub fn len(&self) -> usize {
        self.children
            .last_key_value()
            .map(|(offset, segment)| offset + segment.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of top-level segments.
    pub fn segment_count(&self) -> usize {
        self.children.len()
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), FragmentError> {
        let len = self.len();
        if start > end || end > len {
            return Err(FragmentError::OutOfBounds { start, end, len });
        }
        Ok(())
    }

    fn floor_entry(&self, index: usize) -> Option<(usize, &Segment)> {
        self.children
            .range(..=index)
            .next_back()
            .map(|(offset, segment)| (*offset, segment))
    }

    /// Replace `[start, end)` with `replacement`, or remove it when `None`.
    ///
    /// Segments straddling either bound are split first; everything after
    /// `end` is shifted by the length difference.
    pub fn replace(
        &mut self,
        start: usize,
        end: usize,
        replacement: Option<Segment>,
    ) -> Result<(), FragmentError> {
        self.check_range(start, end)?;

        self.split_at(start);
        self.split_at(end);

        let tail = self.children.split_off(&end);
        self.children.split_off(&start);

        self.append(replacement);
        self.append(tail.into_values());
        Ok(())
    }

    /// Ensure a segment boundary exists at `index`.
    fn split_at(&mut self, index: usize) {
        let Some((offset, segment)) = self.floor_entry(index) else {
            return;
        };
        let len = segment.len();
        if offset == index || index >= offset + len {
            return;
        }

        let front = segment.slice(0, index - offset);
        let back = segment.slice(index - offset, len);
        self.children.insert(offset, front);
        self.children.insert(index, back);
    }

    /// Copy of `[start, end)` without modifying the fragment.
    ///
    /// A range inside a single segment yields that segment's own slice;
    /// a range spanning several yields a [`Segment::Fragment`].
    pub fn sub_segment(&self, start: usize, end: usize) -> Result<Segment, FragmentError> {
        self.check_range(start, end)?;
        Ok(self.slice_clamped(start, end))
    }

    pub(crate) fn slice_clamped(&self, start: usize, end: usize) -> Segment {
        let end = end.min(self.len());
        let start = start.min(end);
        if start == end {
            return Segment::Text(String::new());
        }

        let Some((first_key, _)) = self.floor_entry(start) else {
            return Segment::Text(String::new());
        };
        let entries: Vec<(usize, &Segment)> = self
            .children
            .range(first_key..end)
            .map(|(offset, segment)| (*offset, segment))
            .collect();

        if let [(offset, segment)] = entries.as_slice() {
            return segment.slice(start - offset, end - offset);
        }

        let last = entries.len() - 1;
        let pieces = entries.into_iter().enumerate().map(|(i, (offset, segment))| {
            let from = if i == 0 { start - offset } else { 0 };
            let to = if i == last { end - offset } else { segment.len() };
            segment.slice(from, to)
        });
        Segment::Fragment(Fragment::from_segments(pieces))
    }

    /// Character of the projection at `index`.
    pub fn char_at(&self, index: usize) -> Option<char> {
        let (offset, segment) = self.floor_entry(index)?;
        segment.char_at(index - offset)
    }

    /// Segments in position order.
    pub fn iter(&self) -> btree_map::Values<'_, usize, Segment> {
        self.children.values()
    }

    /// Segments with their start offsets.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Segment)> {
        self.children.iter().map(|(offset, segment)| (*offset, segment))
    }

    /// The single segment, if the fragment consists of exactly one.
    pub fn as_single(&self) -> Option<&Segment> {
        match self.children.len() {
            1 => self.children.values().next(),
            _ => None,
        }
    }

    /// The string that tag patterns are matched against.
    pub fn projection(&self) -> String {
        let mut buf = String::new();
        for segment in self.iter() {
            segment.write_projection(&mut buf);
        }
        buf
    }

    /// Visible text, without ruby readings or markers.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        for segment in self.iter() {
            segment.write_text(&mut buf);
        }
        buf
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Segment;
    type IntoIter = btree_map::Values<'a, usize, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::new(text)
    }
}

#[cfg(feature = "cli")]
impl serde::Serialize for Fragment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Marker, Ruby, SimpleStyle, StyledSegment};

    fn assert_contiguous(fragment: &Fragment) {
        let mut expected = 0;
        for (offset, segment) in fragment.entries() {
            assert_eq!(offset, expected, "gap or overlap at {offset}");
            assert!(!segment.is_empty(), "empty segment stored at {offset}");
            expected += segment.len();
        }
        assert_eq!(expected, fragment.len());
    }

    #[test]
    fn test_new_is_single_text_segment() {
        let fragment = Fragment::new("吾輩は猫である");
        assert_eq!(fragment.len(), 7);
        assert_eq!(fragment.as_single(), Some(&Segment::text("吾輩は猫である")));
        assert!(Fragment::new("").is_empty());
    }

    #[test]
    fn test_replace_middle_splits_and_shifts() {
        let mut fragment = Fragment::new("abcdefgh");
        fragment
            .replace(2, 5, Some(Segment::from(Marker::LineBreak)))
            .unwrap();

        assert_eq!(fragment.len(), 6);
        assert_eq!(fragment.segment_count(), 3);
        assert_eq!(fragment.text(), "abfgh");
        assert_eq!(fragment.char_at(2), Some(crate::model::OBJECT_REPLACEMENT));
        assert_eq!(fragment.char_at(3), Some('f'));
        assert_contiguous(&fragment);
    }

    #[test]
    fn test_replace_with_none_removes_range() {
        let mut fragment = Fragment::new("前［＃タグ］後");
        fragment.replace(1, 6, None).unwrap();
        assert_eq!(fragment.projection(), "前後");
        assert_contiguous(&fragment);
    }

    #[test]
    fn test_replace_across_segments() {
        let mut fragment = Fragment::from_segments([
            Segment::text("abc"),
            Segment::from(StyledSegment::new(Segment::text("def"), SimpleStyle::Bold)),
            Segment::text("ghi"),
        ]);
        fragment.replace(1, 8, Some(Segment::text("X"))).unwrap();

        assert_eq!(fragment.projection(), "aXi");
        assert_contiguous(&fragment);
    }

    #[test]
    fn test_replace_out_of_bounds() {
        let mut fragment = Fragment::new("abc");
        assert_eq!(
            fragment.replace(2, 4, None),
            Err(FragmentError::OutOfBounds { start: 2, end: 4, len: 3 })
        );
        assert!(fragment.replace(2, 1, None).is_err());
        assert_eq!(fragment.projection(), "abc");
    }

    #[test]
    fn test_sub_segment_within_one_segment() {
        let fragment = Fragment::new("山田太郎");
        assert_eq!(fragment.sub_segment(1, 3).unwrap(), Segment::text("田太"));
        assert_eq!(fragment.projection(), "山田太郎");
    }

    #[test]
    fn test_sub_segment_spanning_segments() {
        let fragment = Fragment::from_segments([
            Segment::text("ab"),
            Segment::from(Ruby::new(Segment::text("漢字"), "かんじ")),
            Segment::text("cd"),
        ]);
        let Segment::Fragment(slice) = fragment.sub_segment(1, 5).unwrap() else {
            panic!("expected a multi-segment slice");
        };

        assert_eq!(slice.segment_count(), 3);
        assert_eq!(slice.projection(), "b漢字c");
        assert!(matches!(slice.iter().nth(1), Some(Segment::Ruby(_))));
        assert_eq!(fragment.len(), 6);
    }

    #[test]
    fn test_char_at_delegates_with_offset() {
        let fragment = Fragment::from_segments([Segment::text("ab"), Segment::text("cd")]);
        assert_eq!(fragment.char_at(0), Some('a'));
        assert_eq!(fragment.char_at(3), Some('d'));
        assert_eq!(fragment.char_at(4), None);
    }

    #[test]
    fn test_from_segments_skips_empty() {
        let fragment =
            Fragment::from_segments([Segment::text(""), Segment::text("x"), Segment::text("")]);
        assert_eq!(fragment.segment_count(), 1);
        assert_contiguous(&fragment);
    }
}
