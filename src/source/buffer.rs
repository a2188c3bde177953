use crate::source::CharSource;

/// A character source over an in-memory sequence of characters.
///
/// The buffer is generic over anything that can be viewed as a slice of
/// characters, so it can either own its characters (`Vec<char>`) or borrow
/// them (`&[char]`). The data is never modified; only the cursor moves.
///
/// Negative offsets are supported all the way back to the start of the data.
///
/// # Example
///
/// ```
/// use rematch::source::{CharBuffer, CharSource};
///
/// let mut buf = CharBuffer::from("abc");
/// assert_eq!(Some('a'), buf.char_at(0));
/// buf.advance(2);
/// assert_eq!(Some('b'), buf.char_at(-1));
/// assert_eq!(Some('c'), buf.char_at(0));
/// assert_eq!(None, buf.char_at(1));
/// assert_eq!(None, buf.char_at(-3));
/// ```
#[derive(Clone, Debug)]
pub struct CharBuffer<T> {
    chars: T,
    cursor: usize,
}

impl<T: AsRef<[char]>> CharBuffer<T> {
    /// Create a new buffer with its cursor at the start of `chars`.
    pub fn new(chars: T) -> CharBuffer<T> {
        CharBuffer { chars, cursor: 0 }
    }

    /// Returns the characters backing this buffer.
    pub fn chars(&self) -> &[char] {
        self.chars.as_ref()
    }

    /// Returns the total number of characters in this buffer, regardless of
    /// where the cursor is.
    pub fn len(&self) -> usize {
        self.chars().len()
    }

    /// Returns true if this buffer has no characters at all.
    pub fn is_empty(&self) -> bool {
        self.chars().is_empty()
    }

    /// Moves the cursor to the given absolute offset, clamped to the end of
    /// the data.
    pub fn set_position(&mut self, offset: usize) {
        self.cursor = offset.min(self.len());
    }

    /// Consumes this buffer and returns its characters.
    pub fn into_inner(self) -> T {
        self.chars
    }
}

impl From<&str> for CharBuffer<Vec<char>> {
    fn from(text: &str) -> CharBuffer<Vec<char>> {
        CharBuffer::new(text.chars().collect())
    }
}

impl<T: AsRef<[char]>> CharSource for CharBuffer<T> {
    #[inline]
    fn char_at(&mut self, offset: isize) -> Option<char> {
        let at = if offset < 0 {
            self.cursor.checked_sub(offset.unsigned_abs())?
        } else {
            self.cursor.checked_add(offset as usize)?
        };
        self.chars().get(at).copied()
    }

    #[inline]
    fn advance(&mut self, n: usize) -> bool {
        self.cursor = self.cursor.saturating_add(n).min(self.len());
        self.cursor < self.len()
    }

    #[inline]
    fn is_valid(&mut self) -> bool {
        self.cursor < self.len()
    }

    #[inline]
    fn position(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clamps_at_end() {
        let mut buf = CharBuffer::from("ab");
        assert!(buf.is_valid());
        assert!(buf.advance(1));
        assert!(!buf.advance(5));
        assert_eq!(2, buf.position());
        assert_eq!(None, buf.char_at(0));
        assert_eq!(Some('b'), buf.char_at(-1));
        assert_eq!(None, buf.char_at(isize::MAX));
        assert_eq!(None, buf.char_at(isize::MIN));
    }

    #[test]
    fn borrowed_chars() {
        let chars = ['x', 'y', 'z'];
        let mut buf = CharBuffer::new(&chars[..]);
        buf.set_position(1);
        assert_eq!(Some('y'), buf.char_at(0));
        buf.set_position(10);
        assert_eq!(3, buf.position());
    }
}
