//! Ordinal encodings used by list markers.
//!
//! Every function here is total: ordinals outside an encoding's range come
//! back as a literal sentinel string rather than an error.

/// Rendered for ordinals below one.
pub const NIL: &str = "NIL";

/// Highest ordinal representable with two letters (`ZZ`).
pub const MAX_LETTER_ORDINAL: i64 = 702;

/// Highest ordinal representable as a standard Roman numeral.
pub const MAX_ROMAN_ORDINAL: i64 = 3999;

const ROMAN_TABLE: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Spreadsheet-column style letters: 1 → `A`, 26 → `Z`, 27 → `AA`.
pub fn upper_letter(ordinal: i64) -> String {
    letters(ordinal, b'A').unwrap_or_else(|| ">ZZ".to_string())
}

pub fn lower_letter(ordinal: i64) -> String {
    letters(ordinal, b'a').unwrap_or_else(|| ">zz".to_string())
}

pub fn upper_roman(ordinal: i64) -> String {
    roman(ordinal).unwrap_or_else(|| ">MMMCMXCIX".to_string())
}

pub fn lower_roman(ordinal: i64) -> String {
    roman(ordinal)
        .map(|numeral| numeral.to_lowercase())
        .unwrap_or_else(|| ">mmmcmxcix".to_string())
}

/// Bijective base-26; `None` signals overflow.
fn letters(ordinal: i64, base: u8) -> Option<String> {
    if ordinal < 1 {
        return Some(NIL.to_string());
    }
    if ordinal > MAX_LETTER_ORDINAL {
        return None;
    }
    let mut digits = Vec::new();
    let mut rest = ordinal;
    while rest > 0 {
        rest -= 1;
        digits.push(base + (rest % 26) as u8);
        rest /= 26;
    }
    Some(digits.iter().rev().map(|&b| b as char).collect())
}

fn roman(ordinal: i64) -> Option<String> {
    if ordinal < 1 {
        return Some(NIL.to_string());
    }
    if ordinal > MAX_ROMAN_ORDINAL {
        return None;
    }
    let mut rest = ordinal;
    let mut numeral = String::new();
    for (value, symbol) in ROMAN_TABLE {
        while rest >= value {
            rest -= value;
            numeral.push_str(symbol);
        }
    }
    Some(numeral)
}
