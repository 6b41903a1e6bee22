//! Tag-to-style resolution.
//!
//! Maps the text of a tag (`３字下げ`, `傍点`, `左に傍線`, ...) to the name
//! used to pair it with its closer and to the style it applies.

use crate::model::{SimpleStyle, Style};
use crate::util::parse_number;

const LEFT_PREFIX: &str = "左に";

/// Result of resolving a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStyle {
    /// Normalized name; closers are matched against this.
    pub name: String,
    /// Resolved style, `None` for unknown tags.
    pub style: Option<Style>,
    /// The style only approximates the tag (compound indentation).
    pub approximate: bool,
}

impl TagStyle {
    fn unknown(tag: &str) -> Self {
        Self {
            name: tag.to_string(),
            style: None,
            approximate: false,
        }
    }

    pub fn is_known(&self) -> bool {
        self.style.is_some()
    }
}

struct Resolved<'a> {
    name: &'a str,
    style: Style,
    approximate: bool,
}

impl<'a> Resolved<'a> {
    fn new(name: &'a str, style: impl Into<Style>) -> Self {
        Self {
            name,
            style: style.into(),
            approximate: false,
        }
    }
}

/// Resolve `tag` to its normalized name and style.
///
/// A leading `左に` is resolved without and re-prefixed to the name only.
/// Unknown tags keep their text as name and resolve to no style.
pub fn resolve(tag: &str) -> TagStyle {
    let (left, body) = match tag.strip_prefix(LEFT_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, tag),
    };

    let Some(resolved) = resolve_body(body) else {
        return TagStyle::unknown(tag);
    };

    let name = if left {
        format!("{LEFT_PREFIX}{}", resolved.name)
    } else {
        resolved.name.to_string()
    };
    TagStyle {
        name,
        style: Some(resolved.style),
        approximate: resolved.approximate,
    }
}

fn resolve_body(tag: &str) -> Option<Resolved<'_>> {
    if let Some(amount) = tag.strip_suffix("字下げ") {
        return resolve_indent(amount);
    }
    if let Some(amount) = tag.strip_suffix("字上げ") {
        let amount = amount.strip_prefix("地から").unwrap_or(amount);
        return Some(Resolved::new("字上げ", Style::EndMargin(parse_number(amount)?)));
    }
    if let Some(amount) = tag.strip_suffix("字詰め") {
        return Some(Resolved::new("字詰め", Style::Width(parse_number(amount)?)));
    }
    if tag.ends_with("文字") {
        if let Some(resolved) = resolve_font_size(tag) {
            return Some(resolved);
        }
    }
    if let Some(level) = tag.strip_suffix("見出し") {
        let style = match level.chars().next_back()? {
            '大' => SimpleStyle::HeadingLarge,
            '中' => SimpleStyle::HeadingMedium,
            '小' => SimpleStyle::HeadingSmall,
            _ => return None,
        };
        return Some(Resolved::new(tag, style));
    }

    let style = match tag {
        "太字" => SimpleStyle::Bold,
        "斜体" => SimpleStyle::Italic,
        "地付き" => SimpleStyle::AlignEnd,
        "罫囲み" | "罫囲い" => SimpleStyle::Ruled,
        "横組み" => SimpleStyle::Horizontal,
        "キャプション" => SimpleStyle::Caption,
        "傍点" => SimpleStyle::Sesame,
        "白ゴマ傍点" => SimpleStyle::OpenSesame,
        "丸傍点" => SimpleStyle::Circle,
        "白丸傍点" => SimpleStyle::CircleOpen,
        "黒三角傍点" => SimpleStyle::Triangle,
        "白三角傍点" => SimpleStyle::TriangleOpen,
        "二重丸傍点" => SimpleStyle::DoubleCircleOpen,
        "蛇の目傍点" => SimpleStyle::DoubleCircle,
        "ばつ傍点" => SimpleStyle::Saltire,
        "傍線" => SimpleStyle::Lined,
        "二重傍線" => SimpleStyle::DoubleLined,
        "鎖線" => SimpleStyle::Dotted,
        "破線" => SimpleStyle::Dashed,
        "波線" => SimpleStyle::WaveDashed,
        "縦中横" => SimpleStyle::Rotated,
        "行右小書き" | "上付き小文字" => SimpleStyle::Superscript,
        "行左小書き" | "下付き小文字" => SimpleStyle::Subscript,
        "割り注" => SimpleStyle::Warichu,
        "ゴシック体" => SimpleStyle::Gothic,
        _ => return None,
    };
    Some(Resolved::new(tag, style))
}

/// `[天から]N字下げ`; compound forms (`N字下げ、折り返してM字下げ`) have no
/// single margin and fall back to zero.
fn resolve_indent(amount: &str) -> Option<Resolved<'static>> {
    if amount.contains('、') {
        return Some(Resolved {
            name: "字下げ",
            style: Style::StartMargin(0),
            approximate: true,
        });
    }
    let amount = amount.strip_prefix("天から").unwrap_or(amount);
    Some(Resolved::new("字下げ", Style::StartMargin(parse_number(amount)?)))
}

/// `[N段階]大きな文字` and friends. Both `な` and `い` spellings share the
/// `な` name.
fn resolve_font_size(tag: &str) -> Option<Resolved<'static>> {
    let (prefix, name, sign) = [
        ("大きな文字", "大きな文字", 1),
        ("大きい文字", "大きな文字", 1),
        ("小さな文字", "小さな文字", -1),
        ("小さい文字", "小さな文字", -1),
    ]
    .into_iter()
    .find_map(|(suffix, name, sign)| tag.strip_suffix(suffix).map(|prefix| (prefix, name, sign)))?;

    let level = if prefix.is_empty() {
        1
    } else {
        let steps = prefix.strip_suffix("段階")?;
        i32::try_from(parse_number(steps)?).ok()?
    };
    Some(Resolved::new(name, Style::FontSize(sign * level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_of(tag: &str) -> Option<Style> {
        resolve(tag).style
    }

    #[test]
    fn test_indent() {
        let resolved = resolve("３字下げ");
        assert_eq!(resolved.name, "字下げ");
        assert_eq!(resolved.style, Some(Style::StartMargin(3)));
        assert!(!resolved.approximate);

        assert_eq!(style_of("天から２字下げ"), Some(Style::StartMargin(2)));
        assert_eq!(style_of("10字下げ"), Some(Style::StartMargin(10)));
    }

    #[test]
    fn test_compound_indent_is_approximate() {
        let resolved = resolve("２字下げ、折り返して３字下げ");
        assert_eq!(resolved.name, "字下げ");
        assert_eq!(resolved.style, Some(Style::StartMargin(0)));
        assert!(resolved.approximate);
    }

    #[test]
    fn test_end_margin_and_width() {
        let resolved = resolve("地から２字上げ");
        assert_eq!(resolved.name, "字上げ");
        assert_eq!(resolved.style, Some(Style::EndMargin(2)));
        assert_eq!(style_of("３字上げ"), Some(Style::EndMargin(3)));

        let resolved = resolve("２０字詰め");
        assert_eq!(resolved.name, "字詰め");
        assert_eq!(resolved.style, Some(Style::Width(20)));
    }

    #[test]
    fn test_font_size() {
        let resolved = resolve("２段階大きな文字");
        assert_eq!(resolved.name, "大きな文字");
        assert_eq!(resolved.style, Some(Style::FontSize(2)));

        assert_eq!(style_of("大きな文字"), Some(Style::FontSize(1)));
        assert_eq!(style_of("小さな文字"), Some(Style::FontSize(-1)));
        assert_eq!(style_of("１段階小さい文字"), Some(Style::FontSize(-1)));
        assert_eq!(resolve("大きい文字").name, "大きな文字");
        assert_eq!(style_of("三段階大きな文字"), None);
    }

    #[test]
    fn test_headings() {
        assert_eq!(style_of("大見出し"), Some(SimpleStyle::HeadingLarge.into()));
        assert_eq!(style_of("中見出し"), Some(SimpleStyle::HeadingMedium.into()));
        assert_eq!(style_of("小見出し"), Some(SimpleStyle::HeadingSmall.into()));

        let resolved = resolve("窓中見出し");
        assert_eq!(resolved.name, "窓中見出し");
        assert_eq!(resolved.style, Some(SimpleStyle::HeadingMedium.into()));

        assert_eq!(style_of("見出し"), None);
    }

    #[test]
    fn test_fixed_names() {
        assert_eq!(style_of("太字"), Some(SimpleStyle::Bold.into()));
        assert_eq!(style_of("罫囲い"), Some(SimpleStyle::Ruled.into()));
        assert_eq!(style_of("蛇の目傍点"), Some(SimpleStyle::DoubleCircle.into()));
        assert_eq!(style_of("二重丸傍点"), Some(SimpleStyle::DoubleCircleOpen.into()));
        assert_eq!(style_of("鎖線"), Some(SimpleStyle::Dotted.into()));
        assert_eq!(style_of("上付き小文字"), Some(SimpleStyle::Superscript.into()));
        assert_eq!(style_of("行左小書き"), Some(SimpleStyle::Subscript.into()));
        assert_eq!(resolve("傍点").name, "傍点");
    }

    #[test]
    fn test_left_prefix_applies_to_name_only() {
        let resolved = resolve("左に傍線");
        assert_eq!(resolved.name, "左に傍線");
        assert_eq!(resolved.style, Some(SimpleStyle::Lined.into()));
    }

    #[test]
    fn test_unknown_keeps_original_text() {
        let resolved = resolve("左に謎のタグ");
        assert_eq!(resolved.name, "左に謎のタグ");
        assert_eq!(resolved.style, None);
        assert!(!resolved.is_known());
    }
}
