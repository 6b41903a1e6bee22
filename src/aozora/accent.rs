//! Accent composition for `〔…〕` spans.
//!
//! Inside a span, ASCII digraphs such as `e'` or `AE&` stand for Latin
//! letters with diacritics. Spans whose content contains no digraph are left
//! untouched, brackets included.

use std::borrow::Cow;

use super::patterns::ACCENT_RE;

/// Digraph (or trigraph) to precomposed letter.
const ACCENTS: &[(&str, char)] = &[
    ("!@", '¡'),
    ("?@", '¿'),
    ("A`", 'À'),
    ("A'", 'Á'),
    ("A^", 'Â'),
    ("A~", 'Ã'),
    ("A:", 'Ä'),
    ("A&", 'Å'),
    ("AE&", 'Æ'),
    ("C,", 'Ç'),
    ("E`", 'È'),
    ("E'", 'É'),
    ("E^", 'Ê'),
    ("E:", 'Ë'),
    ("I`", 'Ì'),
    ("I'", 'Í'),
    ("I^", 'Î'),
    ("I:", 'Ï'),
    ("N~", 'Ñ'),
    ("O`", 'Ò'),
    ("O'", 'Ó'),
    ("O^", 'Ô'),
    ("O~", 'Õ'),
    ("O:", 'Ö'),
    ("O/", 'Ø'),
    ("U`", 'Ù'),
    ("U'", 'Ú'),
    ("U^", 'Û'),
    ("U:", 'Ü'),
    ("Y'", 'Ý'),
    ("s&", 'ß'),
    ("a`", 'à'),
    ("a'", 'á'),
    ("a^", 'â'),
    ("a~", 'ã'),
    ("a:", 'ä'),
    ("a&", 'å'),
    ("ae&", 'æ'),
    ("c,", 'ç'),
    ("e`", 'è'),
    ("e'", 'é'),
    ("e^", 'ê'),
    ("e:", 'ë'),
    ("i`", 'ì'),
    ("i'", 'í'),
    ("i^", 'î'),
    ("i:", 'ï'),
    ("n~", 'ñ'),
    ("o`", 'ò'),
    ("o'", 'ó'),
    ("o^", 'ô'),
    ("o~", 'õ'),
    ("o:", 'ö'),
    ("o/", 'ø'),
    ("u`", 'ù'),
    ("u'", 'ú'),
    ("u^", 'û'),
    ("u:", 'ü'),
    ("y'", 'ý'),
    ("y:", 'ÿ'),
    ("A_", 'Ā'),
    ("a_", 'ā'),
    ("E_", 'Ē'),
    ("e_", 'ē'),
    ("I_", 'Ī'),
    ("i_", 'ī'),
    ("O_", 'Ō'),
    ("o_", 'ō'),
    ("OE&", 'Œ'),
    ("oe&", 'œ'),
    ("U_", 'Ū'),
    ("u_", 'ū'),
];

/// Replace every digraph in `text`, preferring the longest match.
pub fn compose(text: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut changed = false;
    let mut rest = text;

    'scan: while !rest.is_empty() {
        for width in [3, 2] {
            let Some(candidate) = rest.get(..width) else {
                continue;
            };
            if let Some((_, letter)) = ACCENTS.iter().find(|(key, _)| *key == candidate) {
                out.push(*letter);
                rest = &rest[width..];
                changed = true;
                continue 'scan;
            }
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

/// Compose accents inside every `〔…〕` span of `line`.
///
/// A span that changed loses its brackets; one that did not is kept as is.
pub fn compose_spans(line: &str) -> Cow<'_, str> {
    if !line.contains('〔') {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for caps in ACCENT_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let composed = compose(&caps[1]);
        if let Cow::Owned(composed) = composed {
            out.push_str(&line[last..whole.start()]);
            out.push_str(&composed);
            last = whole.end();
        }
    }

    if last == 0 {
        return Cow::Borrowed(line);
    }
    out.push_str(&line[last..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_digraphs() {
        assert_eq!(compose("Cafe'"), "Café");
        assert_eq!(compose("AE&sop"), "Æsop");
        assert_eq!(compose("oe&uvre"), "œuvre");
        assert_eq!(compose("Gro:s&e"), "Größe");
    }

    #[test]
    fn test_compose_unchanged_borrows() {
        assert!(matches!(compose("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_compose_spans_strips_brackets_only_when_changed() {
        assert_eq!(compose_spans("彼は〔Cafe'〕にいた"), "彼はCaféにいた");
        assert_eq!(compose_spans("〔plain〕"), "〔plain〕");
        assert_eq!(compose_spans("〔a`〕と〔b〕と〔e^〕"), "àと〔b〕とê");
    }

    #[test]
    fn test_digraphs_outside_spans_untouched() {
        assert_eq!(compose_spans("e' 〔e'〕"), "e' é");
    }
}
