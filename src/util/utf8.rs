/// Returns true if and only if the given character is considered a word
/// character. Word characters are alphanumeric characters and `_`.
///
/// This is the definition used by `\w`, `\b`, `\<` and `\>`.
#[inline(always)]
pub(crate) fn is_word_char(c: char) -> bool {
    if c.is_ascii() {
        return is_word_byte(c as u8);
    }
    c.is_alphanumeric()
}

/// Returns true if and only if the given byte is an ASCII word character.
#[inline(always)]
fn is_word_byte(b: u8) -> bool {
    const fn mkwordset() -> [bool; 128] {
        let mut set = [false; 128];
        set[b'_' as usize] = true;

        let mut byte = b'0';
        while byte <= b'9' {
            set[byte as usize] = true;
            byte += 1;
        }
        byte = b'A';
        while byte <= b'Z' {
            set[byte as usize] = true;
            byte += 1;
        }
        byte = b'a';
        while byte <= b'z' {
            set[byte as usize] = true;
            byte += 1;
        }
        set
    }
    const WORD: [bool; 128] = mkwordset();
    WORD[usize::from(b & 0x7F)]
}

/// Decodes the next UTF-8 encoded codepoint from the given byte slice.
///
/// If no valid encoding of a codepoint exists at the beginning of the given
/// byte slice, then the first byte is returned instead. A sequence that is
/// cut short by the end of the slice is reported the same way, so callers
/// reading incrementally should consult [`len`] to know how many bytes to
/// have on hand first.
///
/// This returns `None` if and only if `bytes` is empty.
#[inline(always)]
pub(crate) fn decode(bytes: &[u8]) -> Option<Result<char, u8>> {
    if bytes.is_empty() {
        return None;
    }
    let len = match len(bytes[0]) {
        None => return Some(Err(bytes[0])),
        Some(len) if len > bytes.len() => return Some(Err(bytes[0])),
        Some(1) => return Some(Ok(char::from(bytes[0]))),
        Some(len) => len,
    };
    match core::str::from_utf8(&bytes[..len]) {
        Ok(s) => s.chars().next().map(Ok),
        Err(_) => Some(Err(bytes[0])),
    }
}

/// Given a UTF-8 leading byte, this returns the total number of code units
/// in the following encoded codepoint.
///
/// If the given byte is not a valid UTF-8 leading byte, then this returns
/// `None`.
#[inline(always)]
pub(crate) fn len(byte: u8) -> Option<usize> {
    if byte <= 0x7F {
        return Some(1);
    } else if byte & 0b1100_0000 == 0b1000_0000 {
        return None;
    } else if byte <= 0b1101_1111 {
        Some(2)
    } else if byte <= 0b1110_1111 {
        Some(3)
    } else if byte <= 0b1111_0111 {
        Some(4)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('0'));
        assert!(is_word_char('_'));
        assert!(is_word_char('é'));
        assert!(is_word_char('δ'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('-'));
        assert!(!is_word_char('\n'));
        assert!(!is_word_char('☃'));
    }

    #[test]
    fn decode_valid_and_invalid() {
        assert_eq!(Some(Ok('a')), decode(b"abc"));
        assert_eq!(Some(Ok('☃')), decode("☃x".as_bytes()));
        assert_eq!(Some(Err(0xFF)), decode(b"\xFFabc"));
        // Truncated sequence.
        assert_eq!(Some(Err(0xE2)), decode(b"\xE2\x98"));
        assert_eq!(None, decode(b""));
    }

    #[test]
    fn leading_byte_len() {
        assert_eq!(Some(1), len(b'a'));
        assert_eq!(Some(2), len(0xC3));
        assert_eq!(Some(3), len(0xE2));
        assert_eq!(Some(4), len(0xF0));
        assert_eq!(None, len(0x80));
        assert_eq!(None, len(0xFF));
    }
}
