/// Shift applied to names and departments on disk.
pub const SHIFT: u8 = 3;

#[inline]
fn rotate(c: char, shift: u8) -> char {
    let base = if c.is_ascii_uppercase() {
        b'A'
    } else if c.is_ascii_lowercase() {
        b'a'
    } else {
        return c;
    };
    (((c as u8 - base + shift % 26) % 26) + base) as char
}

/// Caesar-shifts ASCII letters, leaving everything else untouched.
pub fn encrypt(text: &str, shift: u8) -> String {
    text.chars().map(|c| rotate(c, shift)).collect()
}

pub fn decrypt(text: &str, shift: u8) -> String {
    encrypt(text, 26 - shift % 26)
}
