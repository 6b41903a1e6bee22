//! Cached regex patterns for the Aozora tag grammar.
//!
//! Uses LazyLock to compile patterns once on first use. All patterns are
//! matched against whole lines or against a fragment's projection.

use regex_lite::Regex;
use std::sync::LazyLock;

// === Line classification ===

/// Dash-only line opening or closing the legend block.
pub static LEGEND_MARK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-+$").unwrap());

/// Whole-line block control tag: ここから…, ここで…, 改…, 本文終わり.
pub static BLOCK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^［＃((?:ここ|改)[^］]+|本文終わり)］$").unwrap());

/// Whole-line property assignment: ［＃key＝value］.
pub static PROPERTY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^［＃([^］＝]+)＝(.*)］$").unwrap());

// === Text fixups ===

/// Accent-notation span: 〔…〕.
pub static ACCENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"〔(.+?)〕").unwrap());

/// Character reference: ※［＃desc、…p-r-c］ or ※［＃desc、U+XXXX…］.
pub static CHAR_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"※［＃([^］]+?)、(?:[^］]*?([0-9]+)-([0-9]+)-([0-9]+)|(U\+([0-9A-Fa-f]{4,6}))?[^］]*)］",
    )
    .unwrap()
});

// === Fragment passes ===

/// Any tag: ［＃…］.
pub static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"［＃(.+?)］").unwrap());

/// Kunten mark: a single character, optionally followed by レ.
pub static KUNTEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"［＃(.レ?)］").unwrap());

/// Okurigana: ［＃（…）］.
pub static OKURIGANA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"［＃（(.+?)）］").unwrap());

/// Image: ［＃caption（file、横W×縦H、…）入る］.
pub static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"［＃([^］]*?)（([^］]+?)(、横([0-9]+)×縦([0-9]+))?(、[^］]+?)*）(入る)?］").unwrap()
});

/// Ruby: optional ｜-delimited base, then 《reading》.
pub static RUBY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(｜(.+?))?《(.+?)》").unwrap());

/// Ruby/annotation areas, one pattern per (side, kind) pair so the opener
/// and closer are guaranteed to agree.
pub static RUBY_AREA_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let mut patterns = Vec::with_capacity(4);
    for side in ["", "左に"] {
        for kind in ["ルビ", "注記"] {
            let pattern = format!(r"［＃{side}{kind}付き］(.*?)［＃{side}「(.+?)」の{kind}付き終わり］");
            patterns.push(Regex::new(&pattern).unwrap());
        }
    }
    patterns
});

/// Annotation referring back to preceding text: ［＃「text」に…］.
///
/// The back-reference itself (that the quoted text really precedes the tag)
/// is checked by the caller.
pub static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"［＃「(.+?)」(?:の左)?[には](「(.+?)」の(?:ルビ|注記)|.+?)］").unwrap()
});
