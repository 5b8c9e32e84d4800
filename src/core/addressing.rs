//! Grid addressing
//!
//! Conversion between spreadsheet column letters (`A`, `Z`, `AA`, ...) and
//! 1-based column numbers. The letters form a bijective base-26 numeral: there
//! is no zero digit, so `Z` is 26 and `AA` follows as 27.

/// Convert column letters to a 1-based column number
///
/// Letters are case-insensitive and characters outside `A-Z` are ignored.
/// An empty input yields 0, and very long inputs saturate instead of overflowing.
///
/// ```rust
/// use gridmark::core::addressing::letter_to_number;
///
/// assert_eq!(letter_to_number("A"), 1);
/// assert_eq!(letter_to_number("z"), 26);
/// assert_eq!(letter_to_number("AA"), 27);
/// ```
pub fn letter_to_number(letters: &str) -> usize {
    letters
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| (c.to_ascii_uppercase() as usize) - ('A' as usize) + 1)
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(26).saturating_add(digit)
        })
}

/// Convert a 1-based column number to column letters
///
/// Returns an empty string for 0.
///
/// ```rust
/// use gridmark::core::addressing::number_to_letter;
///
/// assert_eq!(number_to_letter(1), "A");
/// assert_eq!(number_to_letter(28), "AB");
/// ```
pub fn number_to_letter(number: usize) -> String {
    let mut letters = Vec::new();
    let mut n = number;

    while n > 0 {
        let remainder = (n - 1) % 26;
        letters.push((b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    letters.iter().rev().collect()
}

/// Format a single-cell reference token like `[B3]` from 1-based coordinates
pub fn cell_token(column: usize, row: usize) -> String {
    format!("[{}{}]", number_to_letter(column), row)
}
