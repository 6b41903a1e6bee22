//! Fragment splice tests.
//!
//! Property tests compare fragment edits against the same edits performed
//! on a plain character vector.

use proptest::prelude::*;

use tsugumi::{Fragment, Marker, Ruby, Segment, SimpleStyle, StyledSegment};

/// Offsets must start at zero and each segment must end where the next begins.
fn assert_contiguous(fragment: &Fragment) {
    let mut expected = 0;
    for (offset, segment) in fragment.entries() {
        assert_eq!(offset, expected, "gap or overlap at {offset}");
        assert!(!segment.is_empty(), "empty segment stored at {offset}");
        expected += segment.len();
    }
    assert_eq!(expected, fragment.len());
}

/// Clamp a pair of arbitrary numbers to a valid `start..end` range.
fn clamp_range(len: usize, a: usize, b: usize) -> (usize, usize) {
    let start = a % (len + 1);
    let end = start + b % (len - start + 1);
    (start, end)
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_replace_with_styled_segment() {
    let mut fragment = Fragment::new("吾輩は猫である");
    let inner = fragment.sub_segment(3, 4).unwrap();
    fragment
        .replace(3, 4, Some(StyledSegment::new(inner, SimpleStyle::Sesame).into()))
        .unwrap();

    assert_eq!(fragment.text(), "吾輩は猫である");
    assert_eq!(fragment.segment_count(), 3);
    assert!(matches!(fragment.char_at(3), Some('猫')));
    assert_contiguous(&fragment);
}

#[test]
fn test_replace_shrinks_and_shifts_tail() {
    let mut fragment = Fragment::new("漢字《かんじ》です");
    let base = fragment.sub_segment(0, 2).unwrap();
    fragment
        .replace(0, 7, Some(Ruby::new(base, "かんじ").into()))
        .unwrap();

    assert_eq!(fragment.len(), 4);
    assert_eq!(fragment.projection(), "漢字です");
    let offsets: Vec<usize> = fragment.entries().map(|(offset, _)| offset).collect();
    assert_eq!(offsets, vec![0, 2]);
}

#[test]
fn test_remove_range() {
    let mut fragment = Fragment::new("前［＃太字］後");
    fragment.replace(1, 6, None).unwrap();
    assert_eq!(fragment.text(), "前後");
    assert_contiguous(&fragment);
}

#[test]
fn test_markers_take_one_position_but_no_text() {
    let mut fragment = Fragment::new("一［＃改行］二");
    fragment
        .replace(1, 6, Some(Marker::LineBreak.into()))
        .unwrap();

    assert_eq!(fragment.len(), 3);
    assert_eq!(fragment.text(), "一二");
    assert_eq!(fragment.projection(), "一\u{FFFC}二");
}

#[test]
fn test_out_of_bounds_is_an_error() {
    let mut fragment = Fragment::new("abc");
    assert!(fragment.replace(2, 4, None).is_err());
    assert!(fragment.replace(2, 1, None).is_err());
    assert!(fragment.sub_segment(0, 9).is_err());
    assert_eq!(fragment.text(), "abc");
}

#[test]
fn test_sub_segment_across_segments() {
    let fragment = Fragment::from_segments([
        Segment::text("あい"),
        StyledSegment::new(Segment::text("うえ"), SimpleStyle::Bold).into(),
        Segment::text("お"),
    ]);

    let Segment::Fragment(slice) = fragment.sub_segment(1, 4).unwrap() else {
        panic!("expected a multi-segment slice");
    };
    assert_eq!(slice.text(), "いうえ");
    assert_eq!(slice.segment_count(), 2);

    // Inside one segment the segment slices itself.
    let Segment::Styled(styled) = fragment.sub_segment(3, 4).unwrap() else {
        panic!("expected a styled slice");
    };
    assert_eq!(*styled.inner, Segment::text("え"));
    assert!(styled.styles.contains(&SimpleStyle::Bold.into()));
}

#[test]
fn test_partial_ruby_slice_drops_reading() {
    let fragment = Fragment::from_segments([Ruby::new(Segment::text("山田"), "やまだ").into()]);
    assert_eq!(fragment.sub_segment(0, 1).unwrap(), Segment::text("山"));
    assert!(matches!(fragment.sub_segment(0, 2).unwrap(), Segment::Ruby(_)));
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_splice_matches_string_splice(
        text in "[abc漢字かな]{0,24}",
        edits in prop::collection::vec(
            (any::<usize>(), any::<usize>(), "[xy猫]{0,3}"),
            0..8
        )
    ) {
        let mut fragment = Fragment::new(text.clone());
        let mut model: Vec<char> = text.chars().collect();

        for (a, b, replacement) in edits {
            let (start, end) = clamp_range(model.len(), a, b);
            let before = fragment.len();
            let inserted = replacement.chars().count();

            let segment = (!replacement.is_empty()).then(|| Segment::text(replacement.clone()));
            fragment.replace(start, end, segment).unwrap();
            model.splice(start..end, replacement.chars());

            prop_assert_eq!(fragment.len(), before - (end - start) + inserted);
            assert_contiguous(&fragment);
        }

        prop_assert_eq!(fragment.text(), model.into_iter().collect::<String>());
    }

    #[test]
    fn prop_structuring_preserves_text(
        text in "[abc漢字かな]{1,24}",
        cuts in prop::collection::vec((any::<usize>(), any::<usize>()), 0..6)
    ) {
        let mut fragment = Fragment::new(text.clone());

        for (a, b) in cuts {
            let (start, end) = clamp_range(fragment.len(), a, b);
            if start == end {
                continue;
            }
            let inner = fragment.sub_segment(start, end).unwrap();
            let styled = StyledSegment::new(inner, SimpleStyle::Bold);
            fragment.replace(start, end, Some(styled.into())).unwrap();
            assert_contiguous(&fragment);
        }

        prop_assert_eq!(fragment.text(), text.clone());
        prop_assert_eq!(fragment.projection(), text);
    }

    #[test]
    fn prop_sub_segment_is_non_destructive(
        text in "[abc漢字かな]{0,24}",
        ranges in prop::collection::vec((any::<usize>(), any::<usize>()), 1..6)
    ) {
        let fragment = Fragment::new(text.clone());
        let chars: Vec<char> = text.chars().collect();
        let snapshot = fragment.clone();

        for (a, b) in ranges {
            let (start, end) = clamp_range(chars.len(), a, b);
            let slice = fragment.sub_segment(start, end).unwrap();
            prop_assert_eq!(slice.len(), end - start);
            prop_assert_eq!(slice.projection(), chars[start..end].iter().collect::<String>());
        }

        prop_assert_eq!(&fragment, &snapshot);
        prop_assert_eq!(fragment.text(), text);
    }
}
