//! Character classification used by the scanner.

/// Check if a character starts a line break (`\r` or `\n`).
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Check if a character is whitespace (not line break).
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    ch.is_whitespace() && !is_line_break(ch)
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || (ch as u32 > 0x7F && unicode_xid::UnicodeXID::is_xid_start(ch))
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric() || (ch as u32 > 0x7F && unicode_xid::UnicodeXID::is_xid_continue(ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn test_whitespace_excludes_line_breaks() {
        assert!(is_white_space_single_line('\t'));
        assert!(is_white_space_single_line('\u{00A0}'));
        assert!(!is_white_space_single_line('\n'));
        assert!(!is_white_space_single_line('\r'));
    }
}
