//! Spreadsheet column letters.
//!
//! Columns are addressed the way spreadsheet applications do it: `A` is 1,
//! `Z` is 26, `AA` is 27, up to `XFD` (16384).

/// Highest column number a spreadsheet can address (`XFD`).
pub const MAX_COLUMN: usize = 16_384;

/// Converts column letters to a 1-based column number.
///
/// Letters are case-insensitive and surrounding whitespace is ignored.
/// Returns `None` for empty input, non-letter characters, or columns past
/// [`MAX_COLUMN`].
///
/// # Examples
///
/// ```
/// use geosheet_core::columns::column_index;
///
/// assert_eq!(column_index("A"), Some(1));
/// assert_eq!(column_index("ab"), Some(28));
/// assert_eq!(column_index("1A"), None);
/// ```
#[must_use]
pub fn column_index(name: &str) -> Option<usize> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut index = 0usize;
    for c in name.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + digit;
        if index > MAX_COLUMN {
            return None;
        }
    }
    Some(index)
}

/// Converts a 1-based column number back to letters.
///
/// Returns `None` for `0` or columns past [`MAX_COLUMN`].
#[must_use]
pub fn column_name(index: usize) -> Option<String> {
    if index == 0 || index > MAX_COLUMN {
        return None;
    }

    let mut letters = Vec::new();
    let mut remaining = index;
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        remaining = (remaining - 1) / 26;
    }
    Some(letters.iter().rev().collect())
}
