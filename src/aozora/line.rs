//! Content lines: one source line in, one [`Paragraph`] out.
//!
//! The passes run in a fixed order over a [`Fragment`]. Each pass scans the
//! fragment's projection, then splices structured segments over its matches
//! from the last match backwards so earlier offsets stay valid. Text turned
//! into a structured segment is never seen by a later pass as markup.

use std::ops::Range;
use std::path::{Path, PathBuf};

use regex_lite::{Captures, Match, Regex};

use super::accent::compose_spans;
use super::charref::{Expanded, expand_references};
use super::patterns::{
    ANNOTATION_RE, IMAGE_RE, KUNTEN_RE, OKURIGANA_RE, RUBY_AREA_RES, RUBY_RE, TAG_RE,
};
use super::tags::{self, TagStyle};
use super::unicode_block::UnicodeBlock;
use super::{Warning, WarningKind, record_warning};
use crate::error::{Error, Result};
use crate::model::{
    Book, Fragment, FragmentError, ImageMarker, Marker, Paragraph, Ruby, Segment, SimpleStyle,
    Style, StyledSegment,
};
use crate::util::{byte_offset, char_offset, has_markup};

/// Characters that repeat the previous one and belong to its script.
const ITERATION_MARKS: [char; 2] = ['々', 'ヶ'];

const LINE_BREAK_TAG: &str = "改行";
const PAGE_CENTER_TAG: &str = "ページの左右中央";
const CLOSING_SUFFIX: &str = "終わり";

/// What a content line turned into.
#[derive(Debug)]
pub(crate) enum LineOutcome {
    Paragraph(Paragraph),
    /// The line centers the chapter on its page and carries no text.
    PageCenter,
}

/// Transforms a single content line.
pub(crate) struct LineTransformer<'a> {
    line: usize,
    resource_root: &'a Path,
    book: &'a mut Book,
    warnings: &'a mut Vec<Warning>,
}

/// An inline opener waiting for its closer.
struct OpenTag {
    tag: TagStyle,
    text: String,
    range: Range<usize>,
}

/// An annotation whose quoted text was found right before its tag.
struct Annotation {
    text: Range<usize>,
    tag: Range<usize>,
    reading: Option<String>,
    body: String,
}

impl<'a> LineTransformer<'a> {
    pub fn new(
        line: usize,
        resource_root: &'a Path,
        book: &'a mut Book,
        warnings: &'a mut Vec<Warning>,
    ) -> Self {
        Self {
            line,
            resource_root,
            book,
            warnings,
        }
    }

    pub fn transform(mut self, raw: &str) -> Result<LineOutcome> {
        let composed = compose_spans(raw);
        let Expanded { text, unmapped } =
            expand_references(&composed).map_err(|source| Error::Decode {
                line: self.line,
                source,
            })?;
        for (reference, err) in unmapped {
            self.warn(WarningKind::UnmappedReference {
                reference,
                reason: err.to_string(),
            });
        }

        let markup = has_markup(&text);
        let mut fragment = Fragment::new(text.into_owned());
        if !markup {
            return Ok(LineOutcome::Paragraph(Paragraph::new(fragment)));
        }

        if self.extract_markers(&mut fragment)? {
            return Ok(LineOutcome::PageCenter);
        }
        self.wrap_tag_contents(&mut fragment, &KUNTEN_RE, SimpleStyle::Kunten, |_| true)?;
        // A period means a file name, handled by the image pass.
        self.wrap_tag_contents(&mut fragment, &OKURIGANA_RE, SimpleStyle::Okurigana, |text| {
            !text.contains('.')
        })?;
        self.extract_images(&mut fragment)?;
        self.extract_ruby(&mut fragment)?;
        self.extract_ruby_areas(&mut fragment)?;
        self.extract_annotations(&mut fragment)?;
        let styles = self.resolve_inline_tags(&mut fragment)?;

        let mut paragraph = Paragraph::new(fragment);
        paragraph.styles.extend(styles);
        Ok(LineOutcome::Paragraph(paragraph))
    }

    // ========================================================================
    // Passes
    // ========================================================================

    /// Line breaks become markers. Returns `true` for a page-center line.
    fn extract_markers(&mut self, fragment: &mut Fragment) -> Result<bool> {
        let projection = fragment.projection();
        let mut breaks = Vec::new();
        for (range, caps) in scan(&TAG_RE, &projection) {
            match &caps[1] {
                LINE_BREAK_TAG => breaks.push(range),
                PAGE_CENTER_TAG => return Ok(true),
                _ => {}
            }
        }

        for range in breaks.into_iter().rev() {
            self.edit(fragment, range, Some(Marker::LineBreak.into()))?;
        }
        Ok(false)
    }

    /// Replace each match of `re` with its first group wrapped in `style`.
    fn wrap_tag_contents(
        &mut self,
        fragment: &mut Fragment,
        re: &Regex,
        style: SimpleStyle,
        accept: impl Fn(&str) -> bool,
    ) -> Result<()> {
        let projection = fragment.projection();
        for (range, caps) in scan(re, &projection).into_iter().rev() {
            let Some(content) = caps.get(1) else {
                continue;
            };
            if !accept(content.as_str()) {
                continue;
            }
            let inner = self.slice(fragment, char_range(&projection, content))?;
            self.edit(fragment, range, Some(StyledSegment::new(inner, style).into()))?;
        }
        Ok(())
    }

    fn extract_images(&mut self, fragment: &mut Fragment) -> Result<()> {
        let projection = fragment.projection();
        let mut images = Vec::new();
        for (range, caps) in scan(&IMAGE_RE, &projection) {
            let path = self.resolve_resource(&caps[2]);
            self.book.add_resource(&path);

            let mut image = ImageMarker::new(&path);
            if let Some(caption) = caps.get(1).map(|m| m.as_str()).filter(|c| !c.is_empty()) {
                image = image.with_caption(unquote(caption));
            }
            if let (Some(width), Some(height)) = (caps.get(4), caps.get(5))
                && let (Ok(width), Ok(height)) = (width.as_str().parse(), height.as_str().parse())
            {
                image = image.with_size(width, height);
            }
            images.push((range, image));
        }

        for (range, image) in images.into_iter().rev() {
            self.edit(fragment, range, Some(image.into()))?;
        }
        Ok(())
    }

    fn resolve_resource(&self, file: &str) -> PathBuf {
        let joined = self.resource_root.join(file);
        std::path::absolute(&joined).unwrap_or(joined)
    }

    /// `｜base《reading》` and `base《reading》` with an inferred base.
    fn extract_ruby(&mut self, fragment: &mut Fragment) -> Result<()> {
        let projection = fragment.projection();
        let chars: Vec<char> = projection.chars().collect();
        let matches = scan(&RUBY_RE, &projection);

        for (index, (range, caps)) in matches.iter().enumerate().rev() {
            let reading = &caps[3];
            let (start, base) = match caps.get(2) {
                Some(explicit) => (range.start, char_range(&projection, explicit)),
                None => {
                    // Never reach back into the previous ruby's markup.
                    let floor = index
                        .checked_sub(1)
                        .map(|previous| matches[previous].0.end)
                        .unwrap_or(0);
                    let start = infer_base_start(&chars, range.start, floor);
                    (start, start..range.start)
                }
            };

            if base.is_empty() {
                self.warn(WarningKind::EmptyRubyBase(reading.to_string()));
                continue;
            }
            let base = self.slice(fragment, base)?;
            self.edit(fragment, start..range.end, Some(Ruby::new(base, reading).into()))?;
        }
        Ok(())
    }

    /// `［＃ルビ付き］text［＃「reading」のルビ付き終わり］` and its variants.
    fn extract_ruby_areas(&mut self, fragment: &mut Fragment) -> Result<()> {
        for re in RUBY_AREA_RES.iter() {
            let projection = fragment.projection();
            for (range, caps) in scan(re, &projection).into_iter().rev() {
                let Some(text) = caps.get(1) else {
                    continue;
                };
                let reading = &caps[2];
                if text.is_empty() {
                    self.warn(WarningKind::EmptyRubyBase(reading.to_string()));
                    self.edit(fragment, range, None)?;
                    continue;
                }
                let base = self.slice(fragment, char_range(&projection, text))?;
                self.edit(fragment, range, Some(Ruby::new(base, reading).into()))?;
            }
        }
        Ok(())
    }

    /// `text［＃「text」に…］`: ruby or style applied to the preceding text.
    fn extract_annotations(&mut self, fragment: &mut Fragment) -> Result<()> {
        while let Some(annotation) = find_annotation(&fragment.projection()) {
            let Annotation {
                text,
                tag,
                reading,
                body,
            } = annotation;

            if let Some(reading) = reading {
                let base = self.slice(fragment, text.clone())?;
                self.edit(fragment, text.start..tag.end, Some(Ruby::new(base, reading).into()))?;
                continue;
            }

            let resolved = tags::resolve(&body);
            match resolved.style {
                Some(style) => {
                    self.note_approximate(&resolved, &body);
                    let inner = self.slice(fragment, text.clone())?;
                    let styled = StyledSegment::new(inner, style);
                    self.edit(fragment, text.start..tag.end, Some(styled.into()))?;
                }
                None => {
                    self.warn(WarningKind::UnknownAnnotation(body));
                    self.edit(fragment, tag, None)?;
                }
            }
        }
        Ok(())
    }

    /// Pair `［＃tag］…［＃tag終わり］` ranges.
    ///
    /// A closer pairs with the nearest open tag of the same name; openers
    /// above it are dropped. A closer without opener is dropped. Openers left
    /// at the end of the line apply to the whole paragraph; the returned
    /// styles are those of the known ones, outermost first.
    fn resolve_inline_tags(&mut self, fragment: &mut Fragment) -> Result<Vec<Style>> {
        let mut stack: Vec<OpenTag> = Vec::new();
        let mut cursor = 0;

        loop {
            let projection = fragment.projection();
            let from = byte_offset(&projection, cursor);
            let Some(caps) = TAG_RE.captures_at(&projection, from) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let range = char_range(&projection, whole);

            let Some(closing) = caps[1].strip_suffix(CLOSING_SUFFIX) else {
                cursor = range.end;
                stack.push(OpenTag {
                    tag: tags::resolve(&caps[1]),
                    text: whole.as_str().to_string(),
                    range,
                });
                continue;
            };

            let name = tags::resolve(closing).name;
            let Some(index) = stack.iter().rposition(|open| open.tag.name == name) else {
                self.warn(WarningKind::UnmatchedInlineClose(whole.as_str().to_string()));
                cursor = range.start;
                self.edit(fragment, range, None)?;
                continue;
            };

            let discarded = stack.split_off(index + 1);
            let open = stack.remove(index);

            let mut close = range;
            for extra in discarded.iter().rev() {
                self.warn(WarningKind::DiscardedTag(extra.text.clone()));
                self.edit(fragment, extra.range.clone(), None)?;
                let width = extra.range.len();
                close = close.start - width..close.end - width;
            }

            match open.tag.style {
                Some(style) => {
                    self.note_approximate(&open.tag, &open.text);
                    let inner = self.slice(fragment, open.range.end..close.start)?;
                    let styled = StyledSegment::new(inner, style);
                    self.edit(fragment, open.range.start..close.end, Some(styled.into()))?;
                }
                None => {
                    self.warn(WarningKind::UnknownStyle(open.tag.name.clone()));
                    self.edit(fragment, close, None)?;
                    self.edit(fragment, open.range.clone(), None)?;
                }
            }
            cursor = open.range.start;
        }

        let mut styles = Vec::new();
        for open in &stack {
            match open.tag.style {
                Some(style) => {
                    self.note_approximate(&open.tag, &open.text);
                    styles.push(style);
                }
                None => self.warn(WarningKind::DiscardedTag(open.text.clone())),
            }
        }
        for open in stack.iter().rev() {
            self.edit(fragment, open.range.clone(), None)?;
        }
        Ok(styles)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn warn(&mut self, kind: WarningKind) {
        record_warning(self.warnings, self.line, kind);
    }

    fn note_approximate(&mut self, tag: &TagStyle, text: &str) {
        if tag.approximate {
            self.warn(WarningKind::UnsupportedIndent(text.to_string()));
        }
    }

    fn fragment_error(&self, source: FragmentError) -> Error {
        Error::Fragment {
            line: self.line,
            source,
        }
    }

    fn edit(
        &self,
        fragment: &mut Fragment,
        range: Range<usize>,
        replacement: Option<Segment>,
    ) -> Result<()> {
        fragment
            .replace(range.start, range.end, replacement)
            .map_err(|source| self.fragment_error(source))
    }

    fn slice(&self, fragment: &Fragment, range: Range<usize>) -> Result<Segment> {
        fragment
            .sub_segment(range.start, range.end)
            .map_err(|source| self.fragment_error(source))
    }
}

/// All matches of `re`, with the char range of each whole match.
fn scan<'h>(re: &Regex, haystack: &'h str) -> Vec<(Range<usize>, Captures<'h>)> {
    re.captures_iter(haystack)
        .filter_map(|caps| {
            let range = char_range(haystack, caps.get(0)?);
            Some((range, caps))
        })
        .collect()
}

fn char_range(haystack: &str, m: Match<'_>) -> Range<usize> {
    char_offset(haystack, m.start())..char_offset(haystack, m.end())
}

/// Start of the ruby base ending at `end`: the run of characters from the
/// same Unicode block, not reaching below `floor`. Iteration marks take the
/// block of the character they repeat.
fn infer_base_start(chars: &[char], end: usize, floor: usize) -> usize {
    let mut start = end;
    let mut block = None;

    while start > floor {
        let mut index = start - 1;
        let mut c = chars[index];
        while index > floor && ITERATION_MARKS.contains(&c) {
            index -= 1;
            c = chars[index];
        }

        let current = UnicodeBlock::of(c);
        match block {
            None => block = Some(current),
            Some(expected) if expected != current => break,
            Some(_) => {}
        }
        start = index;
    }
    start
}

/// First annotation tag whose quoted text immediately precedes it.
fn find_annotation(projection: &str) -> Option<Annotation> {
    for (position, _) in projection.match_indices("［＃「") {
        let caps = ANNOTATION_RE.captures_at(projection, position)?;
        let Some(tag) = caps.get(0) else {
            continue;
        };
        if tag.start() != position {
            continue;
        }

        let quote = &caps[1];
        if !projection[..position].ends_with(quote) {
            continue;
        }

        let text_start = position - quote.len();
        return Some(Annotation {
            text: char_offset(projection, text_start)..char_offset(projection, position),
            tag: char_range(projection, tag),
            reading: caps.get(3).map(|m| m.as_str().to_string()),
            body: caps[2].to_string(),
        });
    }
    None
}

/// `「caption」…` keeps only the quoted part.
fn unquote(caption: &str) -> &str {
    caption
        .strip_prefix('「')
        .and_then(|rest| rest.split_once('」'))
        .map(|(inner, _)| inner)
        .unwrap_or(caption)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/books/sample";

    fn run(line: &str) -> (LineOutcome, Book, Vec<Warning>) {
        let mut book = Book::new();
        let mut warnings = Vec::new();
        let outcome = LineTransformer::new(7, Path::new(ROOT), &mut book, &mut warnings)
            .transform(line)
            .unwrap();
        (outcome, book, warnings)
    }

    fn paragraph(line: &str) -> (Paragraph, Vec<Warning>) {
        match run(line) {
            (LineOutcome::Paragraph(paragraph), _, warnings) => (paragraph, warnings),
            (LineOutcome::PageCenter, _, _) => panic!("unexpected page center for {line}"),
        }
    }

    fn segments(paragraph: &Paragraph) -> Vec<&Segment> {
        paragraph.fragment.iter().collect()
    }

    fn ruby(segment: &Segment) -> (String, &str) {
        match segment {
            Segment::Ruby(ruby) => (ruby.base.plain_text(), ruby.reading.as_str()),
            other => panic!("expected ruby, got {other:?}"),
        }
    }

    fn styled(segment: &Segment) -> &StyledSegment {
        match segment {
            Segment::Styled(styled) => styled,
            other => panic!("expected styled segment, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_line_is_single_text() {
        let (paragraph, warnings) = paragraph("ただの文章です。");
        assert_eq!(segments(&paragraph), vec![&Segment::text("ただの文章です。")]);
        assert!(paragraph.styles.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_ruby_base_inferred_from_script() {
        let (paragraph, _) = paragraph("これは漢字《かんじ》です");
        let segments = segments(&paragraph);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], &Segment::text("これは"));
        assert_eq!(ruby(segments[1]), ("漢字".to_string(), "かんじ"));
        assert_eq!(segments[2], &Segment::text("です"));
        assert_eq!(paragraph.text(), "これは漢字です");
    }

    #[test]
    fn test_explicit_ruby_base() {
        let (paragraph, _) = paragraph("｜山田太郎《やまだたろう》さん");
        let segments = segments(&paragraph);
        assert_eq!(ruby(segments[0]), ("山田太郎".to_string(), "やまだたろう"));
        assert_eq!(segments[1], &Segment::text("さん"));
    }

    #[test]
    fn test_iteration_mark_joins_base() {
        let (paragraph, _) = paragraph("あの佐々木《ささき》さん");
        assert_eq!(ruby(segments(&paragraph)[1]), ("佐々木".to_string(), "ささき"));
    }

    #[test]
    fn test_adjacent_rubies() {
        let (paragraph, _) = paragraph("漢《かん》字《じ》");
        let segments = segments(&paragraph);
        assert_eq!(segments.len(), 2);
        assert_eq!(ruby(segments[0]), ("漢".to_string(), "かん"));
        assert_eq!(ruby(segments[1]), ("字".to_string(), "じ"));
    }

    #[test]
    fn test_ruby_without_base_stays_literal() {
        let (paragraph, warnings) = paragraph("《よみ》");
        assert_eq!(paragraph.text(), "《よみ》");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::EmptyRubyBase("よみ".to_string()));
        assert_eq!(warnings[0].line, 7);
    }

    #[test]
    fn test_ruby_area() {
        let (paragraph, _) = paragraph("［＃ルビ付き］青い空［＃「あおいそら」のルビ付き終わり］だ");
        let segments = segments(&paragraph);
        assert_eq!(ruby(segments[0]), ("青い空".to_string(), "あおいそら"));
        assert_eq!(paragraph.text(), "青い空だ");
    }

    #[test]
    fn test_kunten_and_okurigana() {
        let (paragraph, _) = paragraph("学［＃二］而有［＃（ル）］");
        let segments = segments(&paragraph);
        assert_eq!(segments.len(), 4);
        let kunten = styled(segments[1]);
        assert_eq!(*kunten.inner, Segment::text("二"));
        assert!(kunten.styles.contains(&SimpleStyle::Kunten.into()));
        let okurigana = styled(segments[3]);
        assert_eq!(*okurigana.inner, Segment::text("ル"));
        assert!(okurigana.styles.contains(&SimpleStyle::Okurigana.into()));
    }

    #[test]
    fn test_image_with_caption_and_size() {
        let (outcome, book, _) =
            run("［＃「挿絵」のキャプション付きの図（fig01.png、横320×縦240）入る］");
        let LineOutcome::Paragraph(paragraph) = outcome else {
            panic!("expected paragraph");
        };
        let expected = Path::new(ROOT).join("fig01.png");
        match segments(&paragraph)[0] {
            Segment::Image(image) => {
                assert_eq!(image.path, expected);
                assert_eq!(image.caption.as_deref(), Some("挿絵"));
                assert_eq!((image.width, image.height), (Some(320), Some(240)));
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert_eq!(book.resources, vec![expected]);
        assert_eq!(paragraph.text(), "");
    }

    #[test]
    fn test_image_file_name_is_not_okurigana() {
        let (outcome, book, _) = run("［＃（fig.png）入る］");
        let LineOutcome::Paragraph(paragraph) = outcome else {
            panic!("expected paragraph");
        };
        assert!(matches!(segments(&paragraph)[0], Segment::Image(image) if image.caption.is_none()));
        assert_eq!(book.resources.len(), 1);
    }

    #[test]
    fn test_line_break_marker() {
        let (paragraph, _) = paragraph("一行目［＃改行］二行目");
        let segments = segments(&paragraph);
        assert_eq!(segments[1], &Segment::Marker(Marker::LineBreak));
        assert_eq!(paragraph.text(), "一行目二行目");
        assert_eq!(paragraph.fragment.len(), 7);
    }

    #[test]
    fn test_page_center_line() {
        let (outcome, _, _) = run("［＃ページの左右中央］");
        assert!(matches!(outcome, LineOutcome::PageCenter));
    }

    #[test]
    fn test_annotation_styles_preceding_text() {
        let (paragraph, _) = paragraph("吾輩は猫［＃「猫」に傍点］である");
        let segments = segments(&paragraph);
        assert_eq!(segments[0], &Segment::text("吾輩は"));
        let styled = styled(segments[1]);
        assert_eq!(*styled.inner, Segment::text("猫"));
        assert!(styled.styles.contains(&SimpleStyle::Sesame.into()));
        assert_eq!(segments[2], &Segment::text("である"));
    }

    #[test]
    fn test_annotation_ruby() {
        let (paragraph, _) = paragraph("青空［＃「青空」の左に「あおぞら」のルビ］");
        assert_eq!(ruby(segments(&paragraph)[0]), ("青空".to_string(), "あおぞら"));
    }

    #[test]
    fn test_unknown_annotation_keeps_text() {
        let (paragraph, warnings) = paragraph("青空［＃「青空」に謎の注記］");
        assert_eq!(paragraph.text(), "青空");
        assert_eq!(
            warnings[0].kind,
            WarningKind::UnknownAnnotation("謎の注記".to_string())
        );
    }

    #[test]
    fn test_inline_pair() {
        let (paragraph, warnings) = paragraph("［＃太字］強い［＃太字終わり］文");
        let segments = segments(&paragraph);
        let bold = styled(segments[0]);
        assert_eq!(*bold.inner, Segment::text("強い"));
        assert!(bold.styles.contains(&SimpleStyle::Bold.into()));
        assert_eq!(segments[1], &Segment::text("文"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_nested_inline_pairs() {
        let (paragraph, _) = paragraph("［＃太字］a［＃斜体］b［＃斜体終わり］c［＃太字終わり］");
        assert_eq!(paragraph.text(), "abc");
        let bold = styled(paragraph.fragment.as_single().unwrap());
        assert!(bold.styles.contains(&SimpleStyle::Bold.into()));
        let Segment::Fragment(inner) = bold.inner.as_ref() else {
            panic!("expected multi-segment content");
        };
        let parts: Vec<&Segment> = inner.iter().collect();
        assert_eq!(parts.len(), 3);
        assert!(styled(parts[1]).styles.contains(&SimpleStyle::Italic.into()));
    }

    #[test]
    fn test_misnested_opener_is_discarded() {
        let (paragraph, warnings) = paragraph("［＃太字］a［＃傍点］b［＃太字終わり］c");
        assert_eq!(paragraph.text(), "abc");
        let bold = styled(segments(&paragraph)[0]);
        assert!(bold.styles.contains(&SimpleStyle::Bold.into()));
        assert_eq!(bold.inner.plain_text(), "ab");
        assert_eq!(
            warnings.iter().map(|w| &w.kind).collect::<Vec<_>>(),
            vec![&WarningKind::DiscardedTag("［＃傍点］".to_string())]
        );
    }

    #[test]
    fn test_stray_closer_is_removed() {
        let (paragraph, warnings) = paragraph("a［＃太字終わり］b");
        assert_eq!(paragraph.text(), "ab");
        assert_eq!(
            warnings[0].kind,
            WarningKind::UnmatchedInlineClose("［＃太字終わり］".to_string())
        );
    }

    #[test]
    fn test_unknown_pair_keeps_text_unstyled() {
        let (paragraph, warnings) = paragraph("［＃謎のタグ］中身［＃謎のタグ終わり］");
        assert_eq!(paragraph.text(), "中身");
        assert!(paragraph.fragment.iter().all(|s| matches!(s, Segment::Text(_))));
        assert_eq!(warnings[0].kind, WarningKind::UnknownStyle("謎のタグ".to_string()));
    }

    #[test]
    fn test_leftover_openers_style_paragraph() {
        let (paragraph, warnings) = paragraph("［＃地付き］［＃不明］おわり");
        assert_eq!(paragraph.text(), "おわり");
        assert!(paragraph.styles.contains(&SimpleStyle::AlignEnd.into()));
        assert_eq!(paragraph.styles.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DiscardedTag("［＃不明］".to_string()));
    }

    #[test]
    fn test_text_fixups_run_first() {
        let (paragraph, _) = paragraph("〔Cafe'〕※［＃「亜」、1-16-1］");
        assert_eq!(paragraph.text(), "Café亜");
    }

    #[test]
    fn test_bad_reference_is_fatal() {
        let mut book = Book::new();
        let mut warnings = Vec::new();
        let err = LineTransformer::new(3, Path::new(ROOT), &mut book, &mut warnings)
            .transform("※［＃「x」、1-95-1］")
            .unwrap_err();
        assert!(matches!(err, Error::Decode { line: 3, .. }));
    }

    #[test]
    fn test_infer_base_start_respects_floor() {
        let chars: Vec<char> = "漢字漢字".chars().collect();
        assert_eq!(infer_base_start(&chars, 4, 0), 0);
        assert_eq!(infer_base_start(&chars, 4, 2), 2);
        assert_eq!(infer_base_start(&chars, 0, 0), 0);
    }
}
