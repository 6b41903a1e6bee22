//! Aozora Bunko manuscript parsing.
//!
//! [`AozoraFormat`] reads a manuscript file (or an already decoded string)
//! and returns the [`Book`] it describes together with the recoverable
//! problems met along the way.
//!
//! ```no_run
//! use tsugumi::aozora::AozoraFormat;
//!
//! let parsed = AozoraFormat::new().parse("wagahai.txt").unwrap();
//! println!("{:?}", parsed.book.title());
//! for warning in &parsed.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

mod accent;
mod charref;
mod line;
mod parser;
mod patterns;
mod sjis2004;
mod tags;
mod unicode_block;

pub use accent::{compose, compose_spans};
pub use charref::{
    DecodeError, Expanded, decode_code_point, decode_jis, expand_references, jis_to_sjis,
};
pub use tags::{TagStyle, resolve as resolve_tag};
pub use unicode_block::UnicodeBlock;

use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::error::Result;
use crate::model::Book;
use crate::util::decode_source;

// ============================================================================
// Configuration
// ============================================================================

/// Options for [`AozoraFormat`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Encoding of manuscript files. A byte-order mark overrides it.
    pub encoding: &'static Encoding,
    /// Directory images are resolved against. Defaults to the directory of
    /// the manuscript.
    pub resource_root: Option<PathBuf>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::SHIFT_JIS,
            resource_root: None,
        }
    }
}

impl ParseOptions {
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// A recoverable problem, reported with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Warning {
    pub line: usize,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", content = "detail", rename_all = "snake_case"))]
pub enum WarningKind {
    /// `ここから…` whose tag has no style; an unstyled block was opened.
    UnknownBlockTag(String),
    /// An inline tag pair with no style; its text was kept.
    UnknownStyle(String),
    /// An annotation whose tag has no style; the tag was removed.
    UnknownAnnotation(String),
    /// A closing tag with no matching opener.
    UnmatchedInlineClose(String),
    /// An opening tag dropped without effect.
    DiscardedTag(String),
    UnknownChapterProperty(String),
    UnknownBookProperty(String),
    /// An indentation form only approximated by a single margin.
    UnsupportedIndent(String),
    /// A ruby reading with no base text; left as written.
    EmptyRubyBase(String),
    /// A character reference that cannot be decoded; kept as its description.
    UnmappedReference { reference: String, reason: String },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnknownBlockTag(tag) => write!(f, "unknown block tag: {tag}"),
            WarningKind::UnknownStyle(tag) => write!(f, "unknown style: {tag}"),
            WarningKind::UnknownAnnotation(tag) => write!(f, "discarding annotation {tag}"),
            WarningKind::UnmatchedInlineClose(tag) => write!(f, "unmatched closing tag {tag}"),
            WarningKind::DiscardedTag(tag) => write!(f, "discarding tag {tag}"),
            WarningKind::UnknownChapterProperty(key) => {
                write!(f, "unknown chapter property: {key}")
            }
            WarningKind::UnknownBookProperty(key) => write!(f, "unknown book property: {key}"),
            WarningKind::UnsupportedIndent(tag) => write!(f, "unsupported indentation: {tag}"),
            WarningKind::EmptyRubyBase(reading) => write!(f, "no base text for ruby {reading}"),
            WarningKind::UnmappedReference { reference, reason } => {
                write!(f, "cannot decode {reference}: {reason}")
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Log `kind` and keep it.
pub(crate) fn record_warning(warnings: &mut Vec<Warning>, line: usize, kind: WarningKind) {
    let warning = Warning { line, kind };
    log::warn!("{warning}");
    warnings.push(warning);
}

// ============================================================================
// Parser entry points
// ============================================================================

/// A parsed manuscript.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Parsed {
    pub book: Book,
    pub warnings: Vec<Warning>,
}

/// Aozora Bunko manuscript reader.
///
/// Holds configuration only; every call parses with fresh state, so one
/// instance can be reused freely.
#[derive(Debug, Clone, Default)]
pub struct AozoraFormat {
    options: ParseOptions,
}

impl AozoraFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read and parse the manuscript at `path`.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Parsed> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let source_dir = path.parent().unwrap_or(Path::new(""));
        self.parse_bytes_in(&bytes, source_dir, &path.display().to_string())
    }

    /// Parse raw manuscript bytes; images resolve against `source_dir`.
    pub fn parse_bytes(&self, bytes: &[u8], source_dir: impl AsRef<Path>) -> Result<Parsed> {
        self.parse_bytes_in(bytes, source_dir.as_ref(), "<bytes>")
    }

    /// Parse an already decoded manuscript; images resolve against `source_dir`.
    pub fn parse_str(&self, text: &str, source_dir: impl AsRef<Path>) -> Result<Parsed> {
        let root = self.resource_root(source_dir.as_ref());
        parser::parse_text(text, &root)
    }

    fn parse_bytes_in(&self, bytes: &[u8], source_dir: &Path, name: &str) -> Result<Parsed> {
        let (text, malformed) = decode_source(bytes, self.options.encoding);
        if malformed {
            log::warn!(
                "{name}: invalid {} sequences replaced with U+FFFD",
                self.options.encoding.name()
            );
        }
        self.parse_str(&text, source_dir)
    }

    fn resource_root(&self, source_dir: &Path) -> PathBuf {
        self.options
            .resource_root
            .clone()
            .unwrap_or_else(|| source_dir.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = Warning {
            line: 12,
            kind: WarningKind::UnknownStyle("謎".to_string()),
        };
        assert_eq!(warning.to_string(), "line 12: unknown style: 謎");
    }

    #[test]
    fn test_resource_root_option_wins() {
        let format =
            AozoraFormat::with_options(ParseOptions::default().with_resource_root("/images"));
        let parsed = format
            .parse_str("題\n著者\n\n［＃挿絵（a.png）入る］\n", "/books")
            .unwrap();
        assert_eq!(parsed.book.resources, vec![PathBuf::from("/images/a.png")]);
    }

    #[test]
    fn test_parse_bytes_decodes_shift_jis() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("題\n著者\n\n本文\n");
        let parsed = AozoraFormat::new().parse_bytes(&bytes, "/books").unwrap();
        assert_eq!(parsed.book.title(), Some("題"));
        assert_eq!(parsed.book.chapters[0].root.paragraphs()[0].text(), "本文");
    }

    #[test]
    fn test_format_is_reusable() {
        let format = AozoraFormat::new();
        let first = format.parse_str("一\n著者\n\n本文\n", "/books").unwrap();
        let second = format.parse_str("二\n著者\n\n本文\n", "/books").unwrap();
        assert_eq!(first.book.title(), Some("一"));
        assert_eq!(second.book.title(), Some("二"));
        assert_eq!(second.book.chapters.len(), 1);
    }
}
