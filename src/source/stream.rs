use std::{collections::VecDeque, io};

use crate::{source::CharSource, util::utf8};

/// The number of bytes requested from the underlying reader at a time.
const CHUNK: usize = 8 * (1 << 10);

/// A character source over a forward-only reader of UTF-8 encoded bytes.
///
/// The source decodes characters lazily, keeping the ones at or after the
/// cursor that have been looked at in a window. Looking ahead with
/// [`CharSource::char_at`] fills the window as far as needed without
/// consuming anything. Advancing the cursor discards characters from the
/// front of the window, except for the single character right before the
/// cursor, which is kept so that `^`, `\b` and friends can look one character
/// behind. Offsets further back than that always return `None`.
///
/// If reading fails, or the bytes are not valid UTF-8, the data ends at the
/// last character decoded successfully. The error is recorded and can be
/// retrieved with [`StreamSource::take_error`].
///
/// # Example
///
/// ```
/// use rematch::source::{CharSource, StreamSource};
///
/// let mut src = StreamSource::new("héllo".as_bytes());
/// assert_eq!(Some('o'), src.char_at(4));
/// src.advance(2);
/// assert_eq!(Some('é'), src.char_at(-1));
/// assert_eq!(None, src.char_at(-2));
/// assert_eq!(2, src.position());
/// ```
#[derive(Debug)]
pub struct StreamSource<R> {
    rdr: R,
    /// Bytes read but not yet decoded. Decoding starts at `bytes_pos`.
    bytes: Vec<u8>,
    bytes_pos: usize,
    /// Decoded characters starting at the cursor.
    window: VecDeque<char>,
    /// The character immediately before the cursor, if any.
    prev: Option<char>,
    pos: usize,
    eof: bool,
    err: Option<io::Error>,
}

impl<R: io::Read> StreamSource<R> {
    /// Create a new source reading from `rdr`, with its cursor at offset 0.
    pub fn new(rdr: R) -> StreamSource<R> {
        StreamSource {
            rdr,
            bytes: vec![],
            bytes_pos: 0,
            window: VecDeque::new(),
            prev: None,
            pos: 0,
            eof: false,
            err: None,
        }
    }

    /// Returns the error that ended the data early, if one occurred. The
    /// error is returned at most once.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.err.take()
    }

    /// Returns the number of characters currently decoded ahead of the
    /// cursor, including the character at the cursor.
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Consumes this source and returns the underlying reader. Any bytes or
    /// characters read ahead are lost.
    pub fn into_inner(self) -> R {
        self.rdr
    }

    /// Decodes characters until the window holds at least `n` of them or the
    /// data has ended.
    fn fill(&mut self, n: usize) {
        while self.window.len() < n && !self.eof {
            match self.decode_one() {
                Some(c) => self.window.push_back(c),
                None => self.eof = true,
            }
        }
    }

    /// Decodes the next character from the reader. Returns `None` at the end
    /// of the data, including when an error ends it.
    fn decode_one(&mut self) -> Option<char> {
        if !self.ensure_bytes(1) {
            return None;
        }
        let need = match utf8::len(self.bytes[self.bytes_pos]) {
            Some(need) => need,
            None => return self.invalid_utf8(),
        };
        if !self.ensure_bytes(need) {
            if self.err.is_some() {
                return None;
            }
            return self.invalid_utf8();
        }
        let end = self.bytes_pos + need;
        match utf8::decode(&self.bytes[self.bytes_pos..end]) {
            Some(Ok(c)) => {
                self.bytes_pos = end;
                Some(c)
            }
            _ => self.invalid_utf8(),
        }
    }

    /// Reads from the underlying reader until at least `n` undecoded bytes
    /// are available. Returns false if the reader ran out (or failed) first.
    fn ensure_bytes(&mut self, n: usize) -> bool {
        while self.bytes.len() - self.bytes_pos < n {
            if self.bytes_pos > 0 {
                self.bytes.drain(..self.bytes_pos);
                self.bytes_pos = 0;
            }
            let old = self.bytes.len();
            self.bytes.resize(old + CHUNK, 0);
            let result = self.rdr.read(&mut self.bytes[old..]);
            match result {
                Ok(0) => {
                    self.bytes.truncate(old);
                    return false;
                }
                Ok(read) => self.bytes.truncate(old + read),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    self.bytes.truncate(old);
                }
                Err(err) => {
                    self.bytes.truncate(old);
                    debug!("stream source read failed: {}", err);
                    self.err = Some(err);
                    return false;
                }
            }
        }
        true
    }

    fn invalid_utf8(&mut self) -> Option<char> {
        let offset = self.pos + self.window.len();
        debug!("stream source found invalid UTF-8 at character {}", offset);
        self.err = Some(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("stream did not contain valid UTF-8 at character {}", offset),
        ));
        None
    }
}

impl<R: io::Read> CharSource for StreamSource<R> {
    fn char_at(&mut self, offset: isize) -> Option<char> {
        if offset < 0 {
            return if offset == -1 { self.prev } else { None };
        }
        let offset = offset as usize;
        self.fill(offset.saturating_add(1));
        self.window.get(offset).copied()
    }

    fn advance(&mut self, n: usize) -> bool {
        for _ in 0..n {
            self.fill(1);
            match self.window.pop_front() {
                None => break,
                Some(c) => {
                    self.prev = Some(c);
                    self.pos += 1;
                }
            }
        }
        self.is_valid()
    }

    fn is_valid(&mut self) -> bool {
        self.fill(1);
        !self.window.is_empty()
    }

    fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A reader that yields its data one byte per call and then fails.
    struct Trickle<'a> {
        data: &'a [u8],
        fail: bool,
    }

    impl<'a> io::Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                if self.fail {
                    return Err(io::Error::new(io::ErrorKind::Other, "boom"));
                }
                return Ok(0);
            }
            buf[0] = self.data[0];
            self.data = &self.data[1..];
            Ok(1)
        }
    }

    #[test]
    fn decodes_split_sequences() {
        let text = "a☃b😀";
        let mut src =
            StreamSource::new(Trickle { data: text.as_bytes(), fail: false });
        assert_eq!(Some('😀'), src.char_at(3));
        assert_eq!(4, src.buffered());
        assert_eq!(Some('a'), src.char_at(0));
        assert!(src.advance(1));
        assert_eq!(Some('☃'), src.char_at(0));
        assert!(!src.advance(3));
        assert_eq!(4, src.position());
        assert_eq!(Some('😀'), src.char_at(-1));
        assert!(src.take_error().is_none());
    }

    #[test]
    fn read_error_ends_data() {
        let mut src = StreamSource::new(Trickle { data: b"ab", fail: true });
        assert_eq!(Some('b'), src.char_at(1));
        assert_eq!(None, src.char_at(2));
        let err = src.take_error().unwrap();
        assert_eq!(io::ErrorKind::Other, err.kind());
        assert!(src.take_error().is_none());
    }

    #[test]
    fn invalid_utf8_ends_data() {
        let mut src = StreamSource::new(&b"ab\xFFcd"[..]);
        assert_eq!(Some('b'), src.char_at(1));
        assert_eq!(None, src.char_at(2));
        assert_eq!(None, src.char_at(3));
        let err = src.take_error().unwrap();
        assert_eq!(io::ErrorKind::InvalidData, err.kind());
    }

    #[test]
    fn truncated_utf8_ends_data() {
        let mut src = StreamSource::new(&b"a\xE2\x98"[..]);
        assert_eq!(Some('a'), src.char_at(0));
        assert_eq!(None, src.char_at(1));
        assert!(src.take_error().is_some());
    }
}
