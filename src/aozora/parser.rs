//! The line-level state machine.
//!
//! A manuscript is read as: header, optional legend, body, and an optional
//! trailer after `［＃本文終わり］`. Body lines are block control tags,
//! property tags or content; the parser owns the stack of open blocks.

use std::iter::Peekable;
use std::path::Path;
use std::str::Lines;

use super::line::{LineOutcome, LineTransformer};
use super::patterns::{BLOCK_TAG_RE, LEGEND_MARK_RE, PROPERTY_TAG_RE};
use super::tags;
use super::{Parsed, Warning, WarningKind, record_warning};
use crate::error::{Error, Result};
use crate::model::{Block, Book, BookProperty, Chapter, ChapterProperty, SimpleStyle};

/// Name shared by every indentation block.
const INDENT: &str = "字下げ";

const OPEN_PREFIX: &str = "ここから";
const CLOSE_PREFIX: &str = "ここで";
const CLOSE_SUFFIX: &str = "終わり";
const END_OF_BODY: &str = "本文終わり";
const CHAPTER_BREAKS: [&str; 4] = ["改ページ", "改丁", "改段", "改見開き"];

// ============================================================================
// Block stack
// ============================================================================

/// An open block and the name its closer must match.
#[derive(Debug)]
struct BlockFrame {
    name: String,
    block: Block,
}

/// The chapter root plus the blocks opened inside it.
///
/// A block is attached to its parent when it is closed; nothing is added to
/// a parent while a child is open, so sibling order is preserved.
#[derive(Debug, Default)]
pub(crate) struct BlockStack {
    root: Block,
    frames: Vec<BlockFrame>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost open block.
    pub fn current(&mut self) -> &mut Block {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.block,
            None => &mut self.root,
        }
    }

    pub fn root_mut(&mut self) -> &mut Block {
        &mut self.root
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Names of the open blocks, outermost first.
    pub fn open_names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|frame| frame.name.as_str())
    }

    fn top_name(&self) -> Option<&str> {
        self.frames.last().map(|frame| frame.name.as_str())
    }

    /// Open `block`. A new indentation replaces an open one instead of
    /// nesting inside it.
    pub fn open(&mut self, name: impl Into<String>, block: Block) {
        let name = name.into();
        if name == INDENT && self.top_name() == Some(INDENT) {
            self.close(INDENT);
        }
        self.frames.push(BlockFrame { name, block });
    }

    /// Close the innermost block if it is named `name`.
    ///
    /// Closing an indentation closes every indentation directly below it as
    /// well. Returns `false`, changing nothing, when the names differ.
    pub fn close(&mut self, name: &str) -> bool {
        if self.top_name() != Some(name) {
            return false;
        }
        if name == INDENT {
            while self.top_name() == Some(INDENT) {
                self.pop();
            }
        } else {
            self.pop();
        }
        true
    }

    fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.current().push_block(frame.block);
        }
    }

    /// Close everything still open and return the root.
    pub fn finish(mut self) -> Block {
        while !self.frames.is_empty() {
            self.pop();
        }
        self.root
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parse a decoded manuscript. Image paths resolve against `resource_root`.
pub(crate) fn parse_text(text: &str, resource_root: &Path) -> Result<Parsed> {
    let mut parser = Parser::new(text, resource_root);
    parser.parse_header()?;
    parser.skip_legend();
    parser.parse_body()?;
    parser.parse_trailer();
    Ok(parser.finish())
}

/// State of one parse. Created per call and consumed by [`Parser::finish`].
struct Parser<'a> {
    lines: Peekable<Lines<'a>>,
    /// 1-based number of the last line read.
    line: usize,
    resource_root: &'a Path,
    book: Book,
    chapter: Chapter,
    blocks: BlockStack,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, resource_root: &'a Path) -> Self {
        Self {
            lines: text.lines().peekable(),
            line: 0,
            resource_root,
            book: Book::new(),
            chapter: Chapter::default(),
            blocks: BlockStack::new(),
            warnings: Vec::new(),
        }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line)
    }

    fn warn(&mut self, kind: WarningKind) {
        record_warning(&mut self.warnings, self.line, kind);
    }

    /// Title and credits: 2, 3, 4 or 6 lines closed by a blank line.
    fn parse_header(&mut self) -> Result<()> {
        let mut fields = Vec::with_capacity(6);
        while let Some(line) = self.next_line() {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            fields.push(line);
        }

        use BookProperty::*;
        let layout: &[BookProperty] = match fields.len() {
            2 => &[Title, Author],
            3 => &[Title, Subtitle, Author],
            4 => &[Title, OriginalTitle, Author, Translator],
            6 => &[
                Title,
                OriginalTitle,
                Subtitle,
                OriginalSubtitle,
                Author,
                Translator,
            ],
            count => {
                return Err(Error::Metadata {
                    line: self.line,
                    count,
                });
            }
        };
        for (property, value) in layout.iter().zip(fields) {
            self.book.set_property(*property, value);
        }
        Ok(())
    }

    /// The legend sits between two dash lines and is followed by a blank line.
    fn skip_legend(&mut self) {
        let starts_legend = self
            .lines
            .peek()
            .is_some_and(|line| LEGEND_MARK_RE.is_match(line.trim()));
        if !starts_legend {
            return;
        }

        self.next_line();
        while let Some(line) = self.next_line() {
            if LEGEND_MARK_RE.is_match(line.trim()) {
                break;
            }
        }
        if self.lines.peek().is_some_and(|line| line.trim().is_empty()) {
            self.next_line();
        }
        log::debug!("legend skipped, body starts after line {}", self.line);
    }

    fn parse_body(&mut self) -> Result<()> {
        while let Some(line) = self.next_line() {
            let trimmed = line.trim();

            if let Some(caps) = BLOCK_TAG_RE.captures(trimmed) {
                let tag = &caps[1];
                if tag == END_OF_BODY {
                    return Ok(());
                }
                if let Some(body) = tag.strip_prefix(OPEN_PREFIX) {
                    self.open_block(body);
                    continue;
                }
                if let Some(body) = tag.strip_prefix(CLOSE_PREFIX) {
                    let Some(name) = body.strip_suffix(CLOSE_SUFFIX) else {
                        return Err(self.unexpected_tag(tag));
                    };
                    self.close_block(name)?;
                    continue;
                }
                if CHAPTER_BREAKS.contains(&tag) {
                    self.break_chapter();
                    continue;
                }
                if tag.starts_with("ここ") {
                    return Err(self.unexpected_tag(tag));
                }
                // Other 改… tags are ordinary inline markup.
            } else if let Some(caps) = PROPERTY_TAG_RE.captures(trimmed) {
                match &caps[1] {
                    "タイトル" => self.chapter.set_property(ChapterProperty::Title, &caps[2]),
                    key => self.warn(WarningKind::UnknownChapterProperty(key.to_string())),
                }
                continue;
            }

            self.parse_content(line)?;
        }
        Ok(())
    }

    fn parse_content(&mut self, line: &str) -> Result<()> {
        let transformer =
            LineTransformer::new(self.line, self.resource_root, &mut self.book, &mut self.warnings);
        match transformer.transform(line)? {
            LineOutcome::Paragraph(paragraph) => self.blocks.current().push_paragraph(paragraph),
            LineOutcome::PageCenter => {
                self.blocks.root_mut().add_style(SimpleStyle::PageCenter);
            }
        }
        Ok(())
    }

    fn open_block(&mut self, body: &str) {
        let resolved = tags::resolve(body);
        if !resolved.is_known() {
            self.warn(WarningKind::UnknownBlockTag(body.to_string()));
        } else if resolved.approximate {
            self.warn(WarningKind::UnsupportedIndent(body.to_string()));
        }
        self.blocks.open(resolved.name, Block::with_style(resolved.style));
    }

    fn close_block(&mut self, body: &str) -> Result<()> {
        let name = tags::resolve(body).name;
        if self.blocks.close(&name) {
            return Ok(());
        }
        Err(Error::UnmatchedBlock {
            line: self.line,
            tag: body.to_string(),
        })
    }

    fn unexpected_tag(&self, tag: &str) -> Error {
        Error::UnexpectedBlockTag {
            line: self.line,
            tag: tag.to_string(),
        }
    }

    /// Store the current chapter and start a new one. Blocks left open are
    /// closed into their parents.
    fn break_chapter(&mut self) {
        let chapter = self.take_chapter();
        // A break before any content (a leading 改ページ, or two in a row)
        // would otherwise leave a chapter with nothing in it.
        if chapter.is_empty() {
            log::debug!("line {}: dropping empty chapter", self.line);
            return;
        }
        self.book.chapters.push(chapter);
    }

    fn take_chapter(&mut self) -> Chapter {
        let blocks = std::mem::take(&mut self.blocks);
        if blocks.depth() > 0 {
            log::debug!(
                "line {}: closing open blocks at chapter end: {:?}",
                self.line,
                blocks.open_names().collect::<Vec<_>>()
            );
        }
        let mut chapter = std::mem::take(&mut self.chapter);
        chapter.root = blocks.finish();
        chapter
    }

    /// Series information after the end of the body.
    fn parse_trailer(&mut self) {
        while let Some(line) = self.next_line() {
            let Some(caps) = PROPERTY_TAG_RE.captures(line.trim()) else {
                continue;
            };
            match &caps[1] {
                "シリーズ" => self.book.set_property(BookProperty::Series, &caps[2]),
                "巻数" => self.book.set_property(BookProperty::SeriesPosition, &caps[2]),
                key => self.warn(WarningKind::UnknownBookProperty(key.to_string())),
            }
        }
    }

    fn finish(mut self) -> Parsed {
        let chapter = self.take_chapter();
        if !chapter.is_empty() || self.book.chapters.is_empty() {
            self.book.chapters.push(chapter);
        }
        Parsed {
            book: self.book,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookElement, Style};

    fn parse(text: &str) -> Result<Parsed> {
        parse_text(text, Path::new("/books/sample"))
    }

    fn indent_block(width: u32) -> Block {
        Block::with_style(Some(Style::StartMargin(width)))
    }

    #[test]
    fn test_indent_replaces_open_indent() {
        let mut stack = BlockStack::new();
        stack.open(INDENT, indent_block(2));
        stack.open(INDENT, indent_block(4));
        assert_eq!(stack.depth(), 1);

        assert!(stack.close(INDENT));
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.open_names().filter(|name| *name == INDENT).count(), 0);

        let root = stack.finish();
        let widths: Vec<_> = root.blocks().map(|block| block.styles.iter().next().copied()).collect();
        assert_eq!(
            widths,
            vec![Some(Style::StartMargin(2)), Some(Style::StartMargin(4))]
        );
    }

    #[test]
    fn test_indent_nests_inside_other_blocks() {
        let mut stack = BlockStack::new();
        stack.open(INDENT, indent_block(1));
        stack.open("罫囲み", Block::new());
        stack.open(INDENT, indent_block(2));
        assert_eq!(stack.open_names().collect::<Vec<_>>(), vec![INDENT, "罫囲み", INDENT]);

        assert!(stack.close(INDENT));
        assert!(!stack.close(INDENT));
        assert!(stack.close("罫囲み"));
        assert!(stack.close(INDENT));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_mismatched_close_changes_nothing() {
        let mut stack = BlockStack::new();
        stack.open("太字", Block::new());
        assert!(!stack.close("斜体"));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_content_goes_to_innermost_block() {
        let parsed = parse(
            "題\n著者\n\n前\n［＃ここから２字下げ］\n中\n［＃ここで字下げ終わり］\n後\n",
        )
        .unwrap();
        let root = &parsed.book.chapters[0].root;
        assert_eq!(root.children.len(), 3);
        let BookElement::Block(block) = &root.children[1] else {
            panic!("expected block");
        };
        assert!(block.styles.contains(&Style::StartMargin(2)));
        assert_eq!(block.paragraphs()[0].text(), "中");
    }

    #[test]
    fn test_unmatched_close_reports_line() {
        let err = parse("題\n著者\n\n一行目\n［＃ここで太字終わり］\n").unwrap_err();
        match err {
            Error::UnmatchedBlock { line, tag } => {
                assert_eq!(line, 5);
                assert_eq!(tag, "太字");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_here_tag_is_fatal() {
        let err = parse("題\n著者\n\n［＃ここに何か］\n").unwrap_err();
        assert!(matches!(err, Error::UnexpectedBlockTag { line: 4, .. }));
    }

    #[test]
    fn test_unknown_block_opens_unstyled() {
        let parsed = parse("題\n著者\n\n［＃ここから謎］\n本文\n［＃ここで謎終わり］\n").unwrap();
        let root = &parsed.book.chapters[0].root;
        let block = root.blocks().next().unwrap();
        assert!(block.styles.is_empty());
        assert_eq!(
            parsed.warnings[0].kind,
            WarningKind::UnknownBlockTag("謎".to_string())
        );
        assert_eq!(parsed.warnings[0].line, 4);
    }

    #[test]
    fn test_legend_is_skipped() {
        let text = "題\n著者\n\n-------\n【凡例】\n《》：ルビ\n-------\n\n本文\n";
        let parsed = parse(text).unwrap();
        let paragraphs = parsed.book.chapters[0].root.paragraphs();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "本文");
    }

    #[test]
    fn test_page_center_styles_chapter_root() {
        let parsed = parse("題\n著者\n\n［＃ページの左右中央］\n扉\n").unwrap();
        let root = &parsed.book.chapters[0].root;
        assert!(root.styles.contains(&SimpleStyle::PageCenter.into()));
        assert_eq!(root.paragraphs().len(), 1);
    }
}
