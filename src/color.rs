//! Hex color parsing and comparison
//!
//! Token values carry colors as hex strings in whatever shape the export
//! tool produced. Comparison goes through a normalized RGBA form so that
//! `#aabbcc`, `AABBCC` and `#AABBCCFF` all describe the same color.

/// A color normalized to 8-bit RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Parse a hex color string into RGBA components.
///
/// Accepts 6-digit (`RRGGBB`) and 8-digit (`RRGGBBAA`) forms, with or
/// without a leading `#`, in either case. Alpha defaults to `0xFF` when
/// absent. Returns `None` for anything else.
pub fn parse_hex(value: &str) -> Option<Rgba> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        6 => Some(Rgba {
            r: channel(digits, 0)?,
            g: channel(digits, 1)?,
            b: channel(digits, 2)?,
            a: 0xFF,
        }),
        8 => Some(Rgba {
            r: channel(digits, 0)?,
            g: channel(digits, 1)?,
            b: channel(digits, 2)?,
            a: channel(digits, 3)?,
        }),
        _ => None,
    }
}

/// Extract the `i`-th two-digit channel from a hex digit string.
fn channel(digits: &str, i: usize) -> Option<u8> {
    let pair = digits.get(i * 2..i * 2 + 2)?;
    u8::from_str_radix(pair, 16).ok()
}

/// Compare two hex color strings for visual equality.
///
/// Both parseable: compared as normalized RGBA. Otherwise falls back to a
/// trimmed, case-insensitive string comparison so malformed values still
/// diff predictably instead of flapping on formatting.
pub fn hex_eq(a: &str, b: &str) -> bool {
    match (parse_hex(a), parse_hex(b)) {
        (Some(left), Some(right)) => left == right,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}
