/*!
Streaming substitution.

A [`SubstitutionFilter`] wraps a reader of UTF-8 text and yields that text
with every match of a pattern replaced by the expansion of a [`Template`].
Matches are found and replaced exactly like with
[`Pattern::substitute_all`](crate::Pattern::substitute_all), so for any text,
reading a filter to the end produces the same string as `substitute_all`.

The filter only ever holds the characters the current match attempt has
looked at, which makes it suitable for inputs of any size as long as matches
stay reasonably short.
*/

use std::{collections::VecDeque, io};

use crate::{
    pattern::Pattern,
    replace::Template,
    source::{CharSource, StreamSource},
};

/// A reader adapter that substitutes matches of a pattern on the fly.
///
/// Output can be consumed a character at a time ([`read_char`]), in blocks of
/// characters ([`read_chars`]), as an iterator of characters, or as UTF-8
/// bytes through [`io::Read`].
///
/// Errors from the underlying reader, including invalid UTF-8, end the input
/// at the last character decoded. All output produced before the error is
/// delivered first, and the error is reported once after it. A pattern
/// configured with a [step limit](crate::Config::step_limit) that exceeds it
/// stops the filter with an error of kind [`io::ErrorKind::Other`] wrapping
/// the [`MatchError`](crate::MatchError).
///
/// [`read_char`]: SubstitutionFilter::read_char
/// [`read_chars`]: SubstitutionFilter::read_chars
///
/// # Example
///
/// ```
/// use std::io::Read;
///
/// use rematch::{Pattern, SubstitutionFilter};
///
/// let re = Pattern::new(r"(\w+)@(\w+)")?;
/// let input = "mail user@host or admin@example".as_bytes();
/// let mut filter = SubstitutionFilter::new(&re, input, "$2!$1");
///
/// let mut out = String::new();
/// filter.read_to_string(&mut out)?;
/// assert_eq!("mail host!user or example!admin", out);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SubstitutionFilter<'p, R> {
    re: &'p Pattern,
    template: Template,
    src: StreamSource<R>,
    /// Output produced but not yet handed out.
    out: VecDeque<char>,
    state: FilterState,
    /// An error to report once `out` is drained.
    err: Option<io::Error>,
    /// The UTF-8 encoding of a character that did not fit in the last
    /// `io::Read::read` buffer.
    partial: [u8; 4],
    partial_pos: usize,
    partial_len: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FilterState {
    Scanning,
    Done,
}

impl<'p, R: io::Read> SubstitutionFilter<'p, R> {
    /// Create a filter that reads from `rdr` and replaces every match of `re`
    /// with the expansion of `template`.
    pub fn new<T: Into<Template>>(
        re: &'p Pattern,
        rdr: R,
        template: T,
    ) -> SubstitutionFilter<'p, R> {
        SubstitutionFilter {
            re,
            template: template.into(),
            src: StreamSource::new(rdr),
            out: VecDeque::new(),
            state: FilterState::Scanning,
            err: None,
            partial: [0; 4],
            partial_pos: 0,
            partial_len: 0,
        }
    }

    /// Returns the pattern this filter substitutes.
    pub fn pattern(&self) -> &'p Pattern {
        self.re
    }

    /// Returns the next output character, or `None` at the end of output.
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(c) = self.out.pop_front() {
                return Ok(Some(c));
            }
            match self.state {
                FilterState::Scanning => self.scan(),
                FilterState::Done => {
                    return match self.err.take() {
                        Some(err) => Err(err),
                        None => Ok(None),
                    };
                }
            }
        }
    }

    /// Fills `buf` with output characters and returns how many were
    /// written. Returns `0` only at the end of output or if `buf` is empty.
    pub fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.read_char() {
                Ok(Some(c)) => {
                    buf[n] = c;
                    n += 1;
                }
                Ok(None) => break,
                Err(err) if n == 0 => return Err(err),
                Err(err) => {
                    self.err = Some(err);
                    break;
                }
            }
        }
        Ok(n)
    }

    /// Makes one match attempt at the cursor and queues its output.
    fn scan(&mut self) {
        let caps = match self.re.try_match_here(&mut self.src) {
            Ok(caps) => caps,
            Err(err) => {
                self.state = FilterState::Done;
                self.err = Some(io::Error::new(io::ErrorKind::Other, err));
                return;
            }
        };
        if let Some(ref caps) = caps {
            let mut expanded = String::new();
            self.template.expand(caps, &mut expanded);
            self.out.extend(expanded.chars());
            let m = caps.get_match();
            if !m.is_empty() {
                self.src.advance(m.len());
                return;
            }
        }
        match self.src.char_at(0) {
            Some(c) => {
                self.out.push_back(c);
                self.src.advance(1);
            }
            None => {
                trace!("substitution filter reached end of input");
                self.state = FilterState::Done;
                self.err = self.src.take_error();
            }
        }
    }
}

impl<'p, R: io::Read> io::Read for SubstitutionFilter<'p, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            if self.partial_pos < self.partial_len {
                buf[n] = self.partial[self.partial_pos];
                self.partial_pos += 1;
                n += 1;
                continue;
            }
            let c = match self.read_char() {
                Ok(Some(c)) => c,
                Ok(None) => break,
                Err(err) if n == 0 => return Err(err),
                Err(err) => {
                    self.err = Some(err);
                    break;
                }
            };
            self.partial_len = c.encode_utf8(&mut self.partial).len();
            self.partial_pos = 0;
        }
        Ok(n)
    }
}

impl<'p, R: io::Read> Iterator for SubstitutionFilter<'p, R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<io::Result<char>> {
        self.read_char().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::MatchError;

    /// A reader that hands out at most one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl<'a> io::Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    fn filter_all(pattern: &str, text: &str, template: &str) -> String {
        let re = Pattern::new(pattern).unwrap();
        let filter = SubstitutionFilter::new(&re, Trickle(text.as_bytes()), template);
        filter.collect::<io::Result<String>>().unwrap()
    }

    #[test]
    fn agrees_with_substitute_all() {
        let cases = &[
            ("a", "banana", "<$0>"),
            ("x*", "abc", "-"),
            ("a*", "baaac", "[$0]"),
            (r"(\w+) (\w+)", "hello world, bye now", "$2 $1"),
            (r"\bfoo\b", "foo food foo", "bar"),
            ("$", "ab\ncd", "!"),
            ("", "", "E"),
            ("é+", "caféé au lait", "e"),
        ];
        for &(pattern, text, template) in cases {
            let re = Pattern::new(pattern).unwrap();
            assert_eq!(
                re.substitute_all(text, template),
                filter_all(pattern, text, template),
                "pattern {:?} on {:?}",
                pattern,
                text,
            );
        }
    }

    #[test]
    fn empty_matches_interleave() {
        assert_eq!("-a-b-c-", filter_all("x*", "abc", "-"));
        assert_eq!("E", filter_all("", "", "E"));
    }

    #[test]
    fn io_read_splits_characters() {
        let re = Pattern::new("b").unwrap();
        let mut filter = SubstitutionFilter::new(&re, "abc".as_bytes(), "☃");
        let mut got = vec![];
        let mut buf = [0u8; 1];
        loop {
            let n = filter.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            got.extend_from_slice(&buf[..n]);
        }
        assert_eq!("a☃c".as_bytes(), &got[..]);
    }

    #[test]
    fn read_chars_in_blocks() {
        let re = Pattern::new("o").unwrap();
        let mut filter = SubstitutionFilter::new(&re, "foo boo".as_bytes(), "0");
        let mut buf = ['\0'; 3];
        let mut got = String::new();
        loop {
            let n = filter.read_chars(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            got.extend(&buf[..n]);
        }
        assert_eq!("f00 b00", got);
    }

    #[test]
    fn invalid_utf8_reported_after_output() {
        let re = Pattern::new("a").unwrap();
        let input: &[u8] = b"xay\xFFz";
        let mut filter = SubstitutionFilter::new(&re, input, "A");
        let mut got = String::new();
        let err = loop {
            match filter.read_char() {
                Ok(Some(c)) => got.push(c),
                Ok(None) => panic!("expected an error"),
                Err(err) => break err,
            }
        };
        assert_eq!("xAy", got);
        assert_eq!(io::ErrorKind::InvalidData, err.kind());
        assert!(filter.read_char().unwrap().is_none());
    }

    #[test]
    fn step_limit_stops_filter() {
        let re = Pattern::builder()
            .configure(Pattern::config().step_limit(Some(100)))
            .build("(a*)*b")
            .unwrap();
        let text = "a".repeat(30);
        let mut filter = SubstitutionFilter::new(&re, text.as_bytes(), "");
        let err = filter.read_char().unwrap_err();
        assert_eq!(io::ErrorKind::Other, err.kind());
        let inner = err.into_inner().unwrap();
        assert_eq!(
            Some(&MatchError::StepLimitExceeded { limit: 100 }),
            inner.downcast_ref::<MatchError>(),
        );
    }
}
