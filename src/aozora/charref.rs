//! Character references: `※［＃desc、第3水準1-84-77］` and `※［＃desc、U+546D］`.
//!
//! JIS X 0213 (plane, row, cell) triples are turned into a Shift_JIS-2004
//! byte pair and decoded through the JIS X 0213:2004 table. Coordinates of
//! unassigned cells, including the plane 2 rows the standard leaves empty,
//! are reported as [`DecodeError::Unmappable`], which callers treat as
//! recoverable.

use std::borrow::Cow;

use thiserror::Error;

use super::patterns::CHAR_REFERENCE_RE;
use super::sjis2004;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("illegal plane: {0}")]
    Plane(u32),

    #[error("illegal row: {0}")]
    Row(u32),

    #[error("illegal cell: {0}")]
    Cell(u32),

    #[error("no character at {plane}-{row}-{cell}")]
    Unmappable { plane: u32, row: u32, cell: u32 },

    #[error("invalid code point: U+{0:04X}")]
    CodePoint(u32),
}

impl DecodeError {
    /// Whether the reference was well-formed but names an empty cell.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DecodeError::Unmappable { .. })
    }
}

/// Map a JIS X 0213 coordinate to its Shift_JIS-2004 byte pair.
pub fn jis_to_sjis(plane: u32, row: u32, cell: u32) -> Result<[u8; 2], DecodeError> {
    if !(1..=2).contains(&plane) {
        return Err(DecodeError::Plane(plane));
    }
    if !(1..=94).contains(&row) {
        return Err(DecodeError::Row(row));
    }
    if !(1..=94).contains(&cell) {
        return Err(DecodeError::Cell(cell));
    }

    let mut s1 = (row + 33) / 2;
    let mut s2 = cell;

    if row <= 62 {
        s1 += 112;
    } else {
        s1 += 176;
    }

    if row % 2 == 0 {
        s2 += 158;
    } else {
        s2 += (cell + 32) / 96 + 63;
    }

    if plane == 2 {
        match row {
            1..=5 => s1 += 0x6F,
            8..=15 => s1 += 0x6C,
            78..=94 => s1 += 0x0D,
            _ => {}
        }
    }

    Ok([s1 as u8, s2 as u8])
}

/// Plane 2 rows assigned by JIS X 0213. The others have no Shift_JIS-2004
/// encoding of their own: [`jis_to_sjis`] folds them onto plane 1 codes.
fn is_assigned_row(plane: u32, row: u32) -> bool {
    plane == 1 || matches!(row, 1 | 3..=5 | 8 | 12..=15 | 78..=94)
}

/// Decode a (plane, row, cell) reference.
pub fn decode_jis(plane: u32, row: u32, cell: u32) -> Result<String, DecodeError> {
    let bytes = jis_to_sjis(plane, row, cell)?;
    if !is_assigned_row(plane, row) {
        return Err(DecodeError::Unmappable { plane, row, cell });
    }
    sjis2004::decode(bytes).ok_or(DecodeError::Unmappable { plane, row, cell })
}

/// Decode a `U+XXXX` reference given its hex digits.
pub fn decode_code_point(hex: &str) -> Result<char, DecodeError> {
    let value = u32::from_str_radix(hex, 16).map_err(|_| DecodeError::CodePoint(u32::MAX))?;
    char::from_u32(value).ok_or(DecodeError::CodePoint(value))
}

/// Result of expanding the references in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded<'a> {
    pub text: Cow<'a, str>,
    /// References left as literal text because they could not be decoded.
    pub unmapped: Vec<(String, DecodeError)>,
}

/// Replace every character reference in `line`.
///
/// References without usable coordinates, and recoverable decode failures,
/// become `※` followed by the description. Out-of-range coordinates and
/// invalid code points are errors.
pub fn expand_references(line: &str) -> Result<Expanded<'_>, DecodeError> {
    if !line.contains('※') {
        return Ok(Expanded {
            text: Cow::Borrowed(line),
            unmapped: Vec::new(),
        });
    }

    let mut out = String::with_capacity(line.len());
    let mut unmapped = Vec::new();
    let mut last = 0;

    for caps in CHAR_REFERENCE_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let description = &caps[1];
        let literal = || format!("※{description}");

        let replacement = if let (Some(plane), Some(row), Some(cell)) =
            (caps.get(2), caps.get(3), caps.get(4))
        {
            let plane = parse_coordinate(plane.as_str());
            let row = parse_coordinate(row.as_str());
            let cell = parse_coordinate(cell.as_str());
            match decode_jis(plane, row, cell) {
                Ok(decoded) => decoded,
                Err(err) if err.is_recoverable() => {
                    unmapped.push((whole.as_str().to_string(), err));
                    literal()
                }
                Err(err) => return Err(err),
            }
        } else if let Some(hex) = caps.get(6) {
            decode_code_point(hex.as_str())?.to_string()
        } else {
            literal()
        };

        out.push_str(&line[last..whole.start()]);
        out.push_str(&replacement);
        last = whole.end();
    }

    if last == 0 {
        return Ok(Expanded {
            text: Cow::Borrowed(line),
            unmapped,
        });
    }
    out.push_str(&line[last..]);
    Ok(Expanded {
        text: Cow::Owned(out),
        unmapped,
    })
}

/// Overlong digit runs saturate so they fail the range checks.
fn parse_coordinate(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
