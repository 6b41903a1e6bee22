//! Document model produced by the parser.
//!
//! This module contains:
//! - Book and chapter containers with their properties
//! - Blocks and paragraphs (the structural tree)
//! - Fragments and segments (the inline content of a paragraph)
//! - Style values

mod block;
mod book;
mod fragment;
mod segment;
mod style;

pub use block::{Block, BookElement, Paragraph};
pub use book::{Book, BookProperty, Chapter, ChapterProperty};
pub use fragment::{Fragment, FragmentError};
pub use segment::{ImageMarker, Marker, OBJECT_REPLACEMENT, Ruby, Segment, StyledSegment};
pub use style::{SimpleStyle, Style, StyleSet};
