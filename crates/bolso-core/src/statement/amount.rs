//! Statement amount parsing
//!
//! Bank exports mix US ("1,234.56") and Brazilian ("1.234,56") number
//! formats, currency prefixes, and accounting-style parentheses for
//! negatives. The disambiguation below keys on the trailing decimal group;
//! amounts with no fractional part (e.g. a bare "1.234") stay ambiguous by
//! design and parse under the as-is rule.

use super::Cell;

/// Coerce a raw statement cell to a signed decimal
///
/// Unparsable strings yield 0.0, which the admission filter then discards —
/// footer and subtotal rows routinely land here and are not errors.
pub fn parse_amount(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_amount_str(s),
        Cell::Empty => 0.0,
    }
}

/// Parse an amount string, handling currency symbols, locale-dependent
/// separators, and negative markers
pub fn parse_amount_str(raw: &str) -> f64 {
    let stripped: String = raw
        .trim()
        .replace("R$", "")
        .replace("r$", "")
        .replace(['$', ' ', '\u{a0}'], "");

    // leading '-' or accounting parentheses mark a negative; record the
    // flag, then parse the bare magnitude
    let negative = stripped.starts_with('-') || stripped.contains('(');
    let cleaned: String = stripped
        .chars()
        .filter(|c| !matches!(c, '-' | '(' | ')'))
        .collect();

    let normalized = if ends_with_decimal_group(&cleaned, '.') {
        // US convention: comma is a thousands separator
        cleaned.replace(',', "")
    } else if ends_with_decimal_group(&cleaned, ',') {
        // Brazilian convention: dot groups thousands, comma is the decimal
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    let magnitude = normalized.parse::<f64>().unwrap_or(0.0);

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// True when `s` ends in `sep` followed by exactly two digits
fn ends_with_decimal_group(s: &str, sep: char) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 3
        && bytes[bytes.len() - 3] == sep as u8
        && bytes[bytes.len() - 2].is_ascii_digit()
        && bytes[bytes.len() - 1].is_ascii_digit()
}
