//! Small text helpers shared by the parsing passes.

use std::borrow::Cow;

use encoding_rs::Encoding;
use memchr::memmem;

/// Decode a manuscript to a string.
///
/// A byte-order mark takes precedence over `encoding` (handled by
/// `encoding_rs`); malformed sequences become U+FFFD. Returns the decoded
/// text and whether any replacement happened.
pub fn decode_source<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> (Cow<'a, str>, bool) {
    let (text, _used, malformed) = encoding.decode(bytes);
    (text, malformed)
}

/// Parse a non-negative decimal number written in ASCII or full-width digits.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_number("３"), Some(3));
/// assert_eq!(parse_number("1２"), Some(12));
/// assert_eq!(parse_number("三"), None);
/// ```
pub fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    for c in text.chars() {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        value = value.checked_mul(10)?.checked_add(digit)?;
    }
    Some(value)
}

/// Convert a byte offset in `text` to a char offset.
pub fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Convert a char offset in `text` to a byte offset (clamped to the end).
pub fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Introducers of every markup construct the line passes understand.
const MARKUP_INTRODUCERS: [&str; 4] = ["［＃", "《", "〔", "※"];

/// Whether `line` may contain markup at all.
///
/// Most lines of a manuscript are plain prose; this lets them skip every
/// pattern pass.
pub fn has_markup(line: &str) -> bool {
    let haystack = line.as_bytes();
    MARKUP_INTRODUCERS
        .iter()
        .any(|needle| memmem::find(haystack, needle.as_bytes()).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_mixed_width() {
        assert_eq!(parse_number("３"), Some(3));
        assert_eq!(parse_number("１０"), Some(10));
        assert_eq!(parse_number("25"), Some(25));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("三"), None);
        assert_eq!(parse_number("99999999999"), None);
    }

    #[test]
    fn test_offset_conversion() {
        let text = "a漢b";
        assert_eq!(char_offset(text, 4), 2);
        assert_eq!(byte_offset(text, 2), 4);
        assert_eq!(byte_offset(text, 9), text.len());
    }

    #[test]
    fn test_has_markup() {
        assert!(!has_markup("ただの文章です。"));
        assert!(has_markup("漢字《かんじ》"));
        assert!(has_markup("［＃改行］"));
        assert!(has_markup("〔Cafe'〕"));
    }

    #[test]
    fn test_decode_source_shift_jis() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("吾輩は猫である");
        let (text, malformed) = decode_source(&bytes, encoding_rs::SHIFT_JIS);
        assert_eq!(text, "吾輩は猫である");
        assert!(!malformed);
    }

    #[test]
    fn test_decode_source_bom_wins() {
        let bytes = b"\xEF\xBB\xBFabc";
        let (text, _) = decode_source(bytes, encoding_rs::SHIFT_JIS);
        assert_eq!(text, "abc");
    }
}
