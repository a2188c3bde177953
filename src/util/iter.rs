use crate::{error::MatchError, util::captures::Captures};

/// A searcher for advancing through all non-overlapping matches in a text.
///
/// This searcher encapsulates the logic required for finding all successive
/// non-overlapping matches in a text. It works like this:
///
/// 1. Set the start position to `0`.
/// 2. Execute a search from the start position. If there is no match, end
/// iteration.
/// 3. Report the match. If the match is non-empty, set the start position to
/// the end of the match. Otherwise, set it to one past the end of the match.
/// 4. Go back to (2).
///
/// Advancing past an empty match guarantees that iteration ends, even for
/// patterns that can match the empty string everywhere. An empty match may
/// still be reported right where a previous non-empty match ended.
///
/// A `Searcher` is not itself an iterator. It provides `advance` routines
/// that accept a closure representing how a search is executed from a given
/// start position. [`Pattern::find_iter`](crate::Pattern::find_iter) and
/// [`Pattern::captures_iter`](crate::Pattern::captures_iter) are built on top
/// of it.
#[derive(Clone, Debug)]
pub struct Searcher {
    /// The position the next search starts at.
    start: usize,
    /// The length of the text, in characters.
    len: usize,
    done: bool,
}

impl Searcher {
    /// Create a new searcher over a text of `len` characters.
    pub fn new(len: usize) -> Searcher {
        Searcher { start: 0, len, done: false }
    }

    /// Returns the position the next search starts at.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Rewinds this searcher to the start of the text.
    pub fn reset(&mut self) {
        self.start = 0;
        self.done = false;
    }

    /// Advances to the next match, panicking if the search fails.
    ///
    /// # Panics
    ///
    /// This panics if `finder` returns an error. Use
    /// [`Searcher::try_advance`] to handle errors.
    #[inline]
    pub fn advance<F>(&mut self, finder: F) -> Option<Captures>
    where
        F: FnMut(usize) -> Result<Option<Captures>, MatchError>,
    {
        match self.try_advance(finder) {
            Ok(m) => m,
            Err(err) => panic!(
                "unexpected regex find error: {}\n\
                 to handle find errors, use 'try' or 'search' methods",
                err,
            ),
        }
    }

    /// Advances to the next match. `finder` is called with the position to
    /// search from and must return the leftmost match at or after it.
    #[inline]
    pub fn try_advance<F>(
        &mut self,
        mut finder: F,
    ) -> Result<Option<Captures>, MatchError>
    where
        F: FnMut(usize) -> Result<Option<Captures>, MatchError>,
    {
        if self.done {
            return Ok(None);
        }
        let caps = match finder(self.start)? {
            None => {
                self.done = true;
                return Ok(None);
            }
            Some(caps) => caps,
        };
        let m = caps.get_match();
        self.start = if m.is_empty() { m.end() + 1 } else { m.end() };
        if self.start > self.len {
            self.done = true;
        }
        Ok(Some(caps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{source::CharBuffer, Pattern};

    fn spans(pattern: &str, text: &str) -> Vec<(usize, usize)> {
        let re = Pattern::new(pattern).unwrap();
        let mut chars = CharBuffer::from(text);
        let mut it = Searcher::new(chars.len());
        let mut got = vec![];
        while let Some(caps) = it.advance(|start| {
            chars.set_position(start);
            re.try_search(&mut chars)
        }) {
            let m = caps.get_match();
            got.push((m.start(), m.end()));
        }
        got
    }

    #[test]
    fn empty_matches_advance() {
        assert_eq!(vec![(0, 0), (1, 1), (2, 2)], spans("x*", "ab"));
        assert_eq!(vec![(0, 1), (1, 1), (2, 2)], spans("a*", "ab"));
        assert_eq!(vec![(0, 0)], spans("", ""));
    }

    #[test]
    fn reset_restarts() {
        let mut it = Searcher::new(3);
        let re = Pattern::new("b").unwrap();
        let mut chars = CharBuffer::from("abc");
        let mut find = |it: &mut Searcher| {
            it.advance(|start| {
                chars.set_position(start);
                re.try_search(&mut chars)
            })
        };
        assert!(find(&mut it).is_some());
        assert!(find(&mut it).is_none());
        it.reset();
        assert_eq!(0, it.start());
        assert!(find(&mut it).is_some());
    }
}
