//! Book and chapter: the top of the document tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use super::block::Block;

/// Book-level properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub enum BookProperty {
    Title,
    OriginalTitle,
    Subtitle,
    OriginalSubtitle,
    Author,
    Translator,
    Series,
    SeriesPosition,
}

/// Chapter-level properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub enum ChapterProperty {
    Title,
}

/// A parsed book.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Book {
    pub properties: BTreeMap<BookProperty, String>,
    pub chapters: Vec<Chapter>,
    /// External files referenced by the text, in order of first reference.
    pub resources: Vec<PathBuf>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(&self, property: BookProperty) -> Option<&str> {
        self.properties.get(&property).map(String::as_str)
    }

    pub fn set_property(&mut self, property: BookProperty, value: impl Into<String>) {
        self.properties.insert(property, value.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.property(BookProperty::Title)
    }

    pub fn author(&self) -> Option<&str> {
        self.property(BookProperty::Author)
    }

    /// Register an external resource. Returns `false` if already known.
    pub fn add_resource(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if self.resources.iter().any(|known| known == path) {
            return false;
        }
        self.resources.push(path.to_path_buf());
        true
    }

    /// Stable `urn:uuid:` identifier derived from the title and credits.
    ///
    /// Name-based (MD5, version 3) UUID over the UTF-8 concatenation of the
    /// credits, so the same metadata always yields the same identifier.
    pub fn unique_id(&self) -> String {
        let name: String = [
            BookProperty::Title,
            BookProperty::OriginalTitle,
            BookProperty::Subtitle,
            BookProperty::OriginalSubtitle,
            BookProperty::Author,
            BookProperty::Translator,
        ]
        .iter()
        .filter_map(|property| self.property(*property))
        .collect();

        let digest = Md5::digest(name.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest);
        bytes[6] = (bytes[6] & 0x0F) | 0x30;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;

        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!(
            "urn:uuid:{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

/// One chapter: a root block plus its properties.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Chapter {
    pub properties: BTreeMap<ChapterProperty, String>,
    pub root: Block,
}

impl Chapter {
    pub fn title(&self) -> Option<&str> {
        self.properties.get(&ChapterProperty::Title).map(String::as_str)
    }

    pub fn set_property(&mut self, property: ChapterProperty, value: impl Into<String>) {
        self.properties.insert(property, value.into());
    }

    /// No properties, no content and no styles.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.root.is_empty() && self.root.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_deduplicate_in_order() {
        let mut book = Book::new();
        assert!(book.add_resource("/tmp/b.png"));
        assert!(book.add_resource("/tmp/a.png"));
        assert!(!book.add_resource("/tmp/b.png"));
        assert_eq!(
            book.resources,
            vec![PathBuf::from("/tmp/b.png"), PathBuf::from("/tmp/a.png")]
        );
    }

    #[test]
    fn test_unique_id_matches_name_based_uuid() {
        let mut book = Book::new();
        book.set_property(BookProperty::Title, "吾輩は猫である");
        book.set_property(BookProperty::Author, "夏目漱石");
        assert_eq!(
            book.unique_id(),
            "urn:uuid:a1eaae50-218a-3305-8227-b04880a17fbb"
        );
    }

    #[test]
    fn test_unique_id_is_stable_and_versioned() {
        let mut book = Book::new();
        book.set_property(BookProperty::Title, "吾輩は猫である");
        book.set_property(BookProperty::Author, "夏目漱石");
        book.set_property(BookProperty::Series, "ignored");

        let id = book.unique_id();
        assert_eq!(id, book.clone().unique_id());
        assert!(id.starts_with("urn:uuid:"));
        let uuid = &id["urn:uuid:".len()..];
        assert_eq!(uuid.len(), 36);
        assert_eq!(&uuid[14..15], "3");

        let mut other = book.clone();
        other.set_property(BookProperty::Series, "different");
        assert_eq!(other.unique_id(), id);

        other.set_property(BookProperty::Translator, "someone");
        assert_ne!(other.unique_id(), id);
    }

    #[test]
    fn test_chapter_with_only_a_title_is_not_empty() {
        let mut chapter = Chapter::default();
        assert!(chapter.is_empty());
        chapter.set_property(ChapterProperty::Title, "第一章");
        assert_eq!(chapter.title(), Some("第一章"));
        assert!(!chapter.is_empty());
    }
}
