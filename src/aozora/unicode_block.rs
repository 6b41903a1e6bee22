//! Unicode block lookup used to infer the base text of ruby.
//!
//! Only the blocks that occur in Japanese manuscripts are named; any other
//! code point is grouped with its 128-code-point neighbourhood.

/// A Unicode block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnicodeBlock {
    BasicLatin,
    Latin1Supplement,
    LatinExtendedA,
    LatinExtendedB,
    Greek,
    Cyrillic,
    LatinExtendedAdditional,
    GeneralPunctuation,
    LetterlikeSymbols,
    NumberForms,
    Arrows,
    MathematicalOperators,
    EnclosedAlphanumerics,
    BoxDrawing,
    GeometricShapes,
    MiscellaneousSymbols,
    CjkRadicalsSupplement,
    KangxiRadicals,
    CjkSymbolsAndPunctuation,
    Hiragana,
    Katakana,
    KatakanaPhoneticExtensions,
    EnclosedCjkLettersAndMonths,
    CjkCompatibility,
    CjkUnifiedIdeographsExtensionA,
    CjkUnifiedIdeographs,
    CjkCompatibilityIdeographs,
    HalfwidthAndFullwidthForms,
    Specials,
    CjkUnifiedIdeographsExtensionB,
    CjkUnifiedIdeographsExtensionC,
    CjkUnifiedIdeographsExtensionD,
    CjkUnifiedIdeographsExtensionE,
    CjkUnifiedIdeographsExtensionF,
    CjkCompatibilityIdeographsSupplement,
    /// Unnamed region, identified by `code point >> 7`.
    Other(u32),
}

/// Sorted, non-overlapping inclusive ranges.
const BLOCKS: &[(u32, u32, UnicodeBlock)] = &[
    (0x0000, 0x007F, UnicodeBlock::BasicLatin),
    (0x0080, 0x00FF, UnicodeBlock::Latin1Supplement),
    (0x0100, 0x017F, UnicodeBlock::LatinExtendedA),
    (0x0180, 0x024F, UnicodeBlock::LatinExtendedB),
    (0x0370, 0x03FF, UnicodeBlock::Greek),
    (0x0400, 0x04FF, UnicodeBlock::Cyrillic),
    (0x1E00, 0x1EFF, UnicodeBlock::LatinExtendedAdditional),
    (0x2000, 0x206F, UnicodeBlock::GeneralPunctuation),
    (0x2100, 0x214F, UnicodeBlock::LetterlikeSymbols),
    (0x2150, 0x218F, UnicodeBlock::NumberForms),
    (0x2190, 0x21FF, UnicodeBlock::Arrows),
    (0x2200, 0x22FF, UnicodeBlock::MathematicalOperators),
    (0x2460, 0x24FF, UnicodeBlock::EnclosedAlphanumerics),
    (0x2500, 0x257F, UnicodeBlock::BoxDrawing),
    (0x25A0, 0x25FF, UnicodeBlock::GeometricShapes),
    (0x2600, 0x26FF, UnicodeBlock::MiscellaneousSymbols),
    (0x2E80, 0x2EFF, UnicodeBlock::CjkRadicalsSupplement),
    (0x2F00, 0x2FDF, UnicodeBlock::KangxiRadicals),
    (0x3000, 0x303F, UnicodeBlock::CjkSymbolsAndPunctuation),
    (0x3040, 0x309F, UnicodeBlock::Hiragana),
    (0x30A0, 0x30FF, UnicodeBlock::Katakana),
    (0x31F0, 0x31FF, UnicodeBlock::KatakanaPhoneticExtensions),
    (0x3200, 0x32FF, UnicodeBlock::EnclosedCjkLettersAndMonths),
    (0x3300, 0x33FF, UnicodeBlock::CjkCompatibility),
    (0x3400, 0x4DBF, UnicodeBlock::CjkUnifiedIdeographsExtensionA),
    (0x4E00, 0x9FFF, UnicodeBlock::CjkUnifiedIdeographs),
    (0xF900, 0xFAFF, UnicodeBlock::CjkCompatibilityIdeographs),
    (0xFF00, 0xFFEF, UnicodeBlock::HalfwidthAndFullwidthForms),
    (0xFFF0, 0xFFFF, UnicodeBlock::Specials),
    (0x20000, 0x2A6DF, UnicodeBlock::CjkUnifiedIdeographsExtensionB),
    (0x2A700, 0x2B73F, UnicodeBlock::CjkUnifiedIdeographsExtensionC),
    (0x2B740, 0x2B81F, UnicodeBlock::CjkUnifiedIdeographsExtensionD),
    (0x2B820, 0x2CEAF, UnicodeBlock::CjkUnifiedIdeographsExtensionE),
    (0x2CEB0, 0x2EBEF, UnicodeBlock::CjkUnifiedIdeographsExtensionF),
    (0x2F800, 0x2FA1F, UnicodeBlock::CjkCompatibilityIdeographsSupplement),
];

impl UnicodeBlock {
    pub fn of(c: char) -> UnicodeBlock {
        let cp = c as u32;
        let index = BLOCKS.partition_point(|(_, end, _)| *end < cp);
        match BLOCKS.get(index) {
            Some((start, _, block)) if *start <= cp => *block,
            _ => UnicodeBlock::Other(cp >> 7),
        }
    }
}
