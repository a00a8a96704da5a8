//! Sign text glyph table
//!
//! Sign bytes store `glyph + 32`. Button and symbol glyphs decode to their
//! two-character `#` markers. The sequence `#K(` followed by digit glyphs
//! and `)` spells out an arbitrary code point.

const GLYPH_OFFSET: u8 = 32;

const GLYPHS: [&str; 97] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j",
    "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "0", "1",
    "2", "3", "4", "5", "6", "7", "8", "9", "!", "?", "-", ".", ",", "#", ">", "(", ")", "#x",
    "#y", "#z", "#h", "", "\"", "#u", "#d", "#l", "#r", "'", ":", "/", "~", "&", "##", "#4",
    "#.", " ", "<", "#A", "#B", "#X", "#Y", ";", "\n",
];

const HASH: u8 = 67;
const UPPER_K: u8 = 10;
const OPEN_PAREN: u8 = 69;
const CLOSE_PAREN: u8 = 70;
const DIGIT_ZERO: u8 = 52;
const DIGIT_NINE: u8 = 61;

/// Glyph index of a sign byte, if the byte is inside the table.
pub fn glyph_of(byte: u8) -> Option<u8> {
    let g = byte.checked_sub(GLYPH_OFFSET)?;
    ((g as usize) < GLYPHS.len()).then_some(g)
}

/// Try to read `#K(<digits>)` at the start of `glyphs`. Returns the character
/// and the number of glyphs consumed.
fn escaped_char(glyphs: &[u8]) -> Option<(char, usize)> {
    if !glyphs.starts_with(&[HASH, UPPER_K, OPEN_PAREN]) {
        return None;
    }
    let digits = glyphs[3..]
        .iter()
        .take_while(|g| (DIGIT_ZERO..=DIGIT_NINE).contains(*g))
        .count();
    if digits == 0 || glyphs.get(3 + digits) != Some(&CLOSE_PAREN) {
        return None;
    }
    let code = glyphs[3..3 + digits]
        .iter()
        .try_fold(0u32, |acc, g| acc.checked_mul(10)?.checked_add((g - DIGIT_ZERO) as u32))?;
    Some((char::from_u32(code)?, digits + 4))
}

/// Decode sign bytes to text.
pub fn decode_sign_text(bytes: &[u8]) -> String {
    let glyphs: Vec<u8> = bytes.iter().filter_map(|&b| glyph_of(b)).collect();
    let mut text = String::with_capacity(glyphs.len());

    let mut i = 0;
    while i < glyphs.len() {
        if let Some((c, used)) = escaped_char(&glyphs[i..]) {
            text.push(c);
            i += used;
        } else {
            text.push_str(GLYPHS[glyphs[i] as usize]);
            i += 1;
        }
    }
    text
}
