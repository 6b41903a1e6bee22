//! Blocks and paragraphs: the structural part of a chapter.

use super::fragment::Fragment;
use super::style::{Style, StyleSet};

/// A child of a [`Block`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", rename_all = "snake_case"))]
pub enum BookElement {
    Block(Block),
    Paragraph(Paragraph),
}

/// A styled region of a chapter (indentation, box, heading, ...).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Block {
    pub styles: StyleSet,
    pub children: Vec<BookElement>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// A block carrying `style`, if any.
    pub fn with_style(style: Option<Style>) -> Self {
        let mut block = Block::new();
        if let Some(style) = style {
            block.styles.insert(style);
        }
        block
    }

    pub fn add_style(&mut self, style: impl Into<Style>) -> bool {
        self.styles.insert(style)
    }

    pub fn push_block(&mut self, block: Block) {
        self.children.push(BookElement::Block(block));
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.children.push(BookElement::Paragraph(paragraph));
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// All paragraphs below this block, depth first.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs(self, &mut out);
        out
    }

    /// Direct child blocks.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(|child| match child {
            BookElement::Block(block) => Some(block),
            BookElement::Paragraph(_) => None,
        })
    }
}

fn collect_paragraphs<'a>(block: &'a Block, out: &mut Vec<&'a Paragraph>) {
    for child in &block.children {
        match child {
            BookElement::Block(inner) => collect_paragraphs(inner, out),
            BookElement::Paragraph(paragraph) => out.push(paragraph),
        }
    }
}

/// One source line of content.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Paragraph {
    pub styles: StyleSet,
    pub fragment: Fragment,
}

impl Paragraph {
    pub fn new(fragment: Fragment) -> Self {
        Self {
            styles: StyleSet::new(),
            fragment,
        }
    }

    pub fn add_style(&mut self, style: impl Into<Style>) -> bool {
        self.styles.insert(style)
    }

    /// Visible text of the paragraph.
    pub fn text(&self) -> String {
        self.fragment.text()
    }
}
