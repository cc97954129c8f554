/// Decode a single byte as ISO-8859-1.
pub fn latin1(byte: u8) -> char {
    char::from(byte)
}

/// Whether `ch` has a visible rendering.
///
/// Control, format and separator characters are not printable, with the ASCII
/// space as the one exception.
pub fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    if ch.is_control() || ch.is_whitespace() {
        return false;
    }
    !matches!(
        ch,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{E000}'..='\u{F8FF}'
    )
}

/// Map characters without a visible rendering to the space character.
pub fn printable_or_space(ch: char) -> char {
    if is_printable(ch) {
        ch
    } else {
        ' '
    }
}
