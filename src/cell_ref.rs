//! Conversions between spreadsheet addresses ("AB123") and 0-based indices.
//!
//! Columns use bijective base-26 ("A" = 0, "Z" = 25, "AA" = 26, ...), so there
//! is no zero digit. Rows are 1-based in addresses and 0-based everywhere else.

use crate::error::{Result, XlgridError};
use crate::types::CellPos;

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...).
pub fn column_to_letters(index: u32) -> String {
    let mut letters = Vec::with_capacity(4);
    let mut n = u64::from(index) + 1;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + u8::try_from(n % 26).unwrap_or(0));
        n /= 26;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

/// Convert column letters back to a 0-based column index.
///
/// # Errors
/// Returns [`XlgridError::InvalidAddress`] if `letters` is empty, contains
/// anything other than `A`-`Z`, or overflows `u32`.
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(XlgridError::invalid_address(letters));
    }
    let mut col: u64 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(XlgridError::invalid_address(letters));
        }
        col = col * 26 + u64::from(b - b'A') + 1;
        if col > u64::from(u32::MAX) + 1 {
            return Err(XlgridError::invalid_address(letters));
        }
    }
    u32::try_from(col - 1).map_err(|_| XlgridError::invalid_address(letters))
}

/// Format a 0-based (row, col) pair as an address, e.g. `(0, 0)` -> `"A1"`.
pub fn to_address(row: u32, col: u32) -> String {
    format!("{}{}", column_to_letters(col), u64::from(row) + 1)
}

/// Parse an address of the form `^[A-Z]+[0-9]+$` into a 0-based position.
///
/// # Errors
/// Returns [`XlgridError::InvalidAddress`] for anything outside that grammar,
/// for row numbers with a leading zero (which also rules out row 0), and for
/// indices that do not fit in `u32`.
pub fn parse_address(address: &str) -> Result<CellPos> {
    let split = address
        .bytes()
        .position(|b| !b.is_ascii_uppercase())
        .ok_or_else(|| XlgridError::invalid_address(address))?;
    let (letters, digits) = address.split_at(split);
    if letters.is_empty()
        || digits.is_empty()
        || digits.starts_with('0')
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(XlgridError::invalid_address(address));
    }
    let col = letters_to_column(letters)?;
    let row_number: u32 = digits
        .parse()
        .map_err(|_| XlgridError::invalid_address(address))?;
    Ok(CellPos::new(row_number - 1, col))
}

/// Parse a range like `"A1:C3"` (or a single address) into its two corners.
///
/// Corners are returned as written; callers normalise with
/// [`crate::types::SelectionRange::bounds`].
///
/// # Errors
/// Returns [`XlgridError::InvalidAddress`] if either side fails to parse.
pub fn parse_range(range: &str) -> Result<(CellPos, CellPos)> {
    let range = range.trim();
    if let Some((start, end)) = range.split_once(':') {
        Ok((parse_address(start.trim())?, parse_address(end.trim())?))
    } else {
        let pos = parse_address(range)?;
        Ok((pos, pos))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_boundaries() {
        assert_eq!(column_to_letters(0), "A");
        assert_eq!(column_to_letters(25), "Z");
        assert_eq!(column_to_letters(26), "AA");
        assert_eq!(column_to_letters(51), "AZ");
        assert_eq!(column_to_letters(52), "BA");
        assert_eq!(column_to_letters(701), "ZZ");
        assert_eq!(column_to_letters(702), "AAA");
    }

    #[test]
    fn test_max_column_round_trips() {
        let letters = column_to_letters(u32::MAX);
        assert_eq!(letters_to_column(&letters).unwrap(), u32::MAX);
    }

    #[test]
    fn test_leading_zero_row_rejected() {
        assert!(parse_address("A0").is_err());
        assert!(parse_address("A01").is_err());
    }

    #[test]
    fn test_row_overflow_rejected() {
        assert!(parse_address("A99999999999").is_err());
    }

    #[test]
    fn test_range_with_whitespace() {
        let (a, b) = parse_range(" B2 : D4 ").unwrap();
        assert_eq!(a, CellPos::new(1, 1));
        assert_eq!(b, CellPos::new(3, 3));
    }
}
