//! # tsugumi
//!
//! A parser for manuscripts in the Aozora Bunko annotated-text format.
//!
//! ## Features
//!
//! - Header, legend, body and trailer of an Aozora Bunko text file
//! - Block tags (`［＃ここから２字下げ］` … `［＃ここで字下げ終わり］`) and chapter breaks
//! - Ruby with explicit or inferred base text, annotations, kunten and okurigana
//! - Inline style ranges, images, accent notation and JIS X 0213 character references
//!
//! ## Quick Start
//!
//! ```no_run
//! use tsugumi::read_aozora;
//!
//! let book = read_aozora("wagahai_wa_nekodearu.txt").unwrap();
//! println!("{} / {}", book.title().unwrap_or(""), book.author().unwrap_or(""));
//! for chapter in &book.chapters {
//!     for paragraph in chapter.root.paragraphs() {
//!         println!("{}", paragraph.text());
//!     }
//! }
//! ```
//!
//! ## Working with the Tree
//!
//! A [`Book`] holds [`Chapter`]s; each chapter has a root [`Block`] whose
//! children are nested blocks and [`Paragraph`]s. A paragraph's [`Fragment`]
//! is a sequence of [`Segment`]s:
//!
//! ```
//! use tsugumi::{AozoraFormat, Segment};
//!
//! let text = "題名\n著者\n\n漢字《かんじ》を読む\n";
//! let parsed = AozoraFormat::new().parse_str(text, ".").unwrap();
//! let paragraph = parsed.book.chapters[0].root.paragraphs()[0];
//!
//! let Some(Segment::Ruby(ruby)) = paragraph.fragment.iter().next() else {
//!     panic!("expected ruby");
//! };
//! assert_eq!(ruby.base.plain_text(), "漢字");
//! assert_eq!(ruby.reading, "かんじ");
//! ```

pub mod aozora;
pub mod error;
pub mod model;
pub(crate) mod util;

use std::path::Path;

pub use aozora::{AozoraFormat, ParseOptions, Parsed, Warning, WarningKind};
pub use error::{Error, Result};
pub use model::{
    Block, Book, BookElement, BookProperty, Chapter, ChapterProperty, Fragment, FragmentError,
    ImageMarker, Marker, Paragraph, Ruby, Segment, SimpleStyle, Style, StyleSet, StyledSegment,
};

/// Parse the Shift_JIS manuscript at `path` with default options.
///
/// Warnings are logged and dropped; use [`AozoraFormat`] to inspect them.
pub fn read_aozora<P: AsRef<Path>>(path: P) -> Result<Book> {
    AozoraFormat::new().parse(path).map(|parsed| parsed.book)
}
