use std::collections::HashMap;

use crate::source::CharSource;

/// A Horspool substring finder over a [`CharSource`].
///
/// Patterns that begin with a literal can only match where that literal
/// occurs, so the search driver uses this to skip ahead instead of trying
/// every offset. The skip table belongs to the finder. Any number of
/// finders can exist at once.
#[derive(Clone, Debug)]
pub(crate) struct Finder {
    needle: Box<[char]>,
    /// How far the window may shift when the character aligned with the
    /// needle's last position is the key. Characters not in the map shift
    /// by the needle's length.
    skip: HashMap<char, usize>,
}

impl Finder {
    /// Create a finder for a non-empty needle. Returns `None` for an empty
    /// needle.
    pub(crate) fn new(needle: &[char]) -> Option<Finder> {
        if needle.is_empty() {
            return None;
        }
        let last = needle.len() - 1;
        let mut skip = HashMap::new();
        for (i, &c) in needle[..last].iter().enumerate() {
            skip.insert(c, last - i);
        }
        Some(Finder { needle: needle.into(), skip })
    }

    pub(crate) fn needle(&self) -> &[char] {
        &self.needle
    }

    /// Advances `src` to the next occurrence of the needle at or after its
    /// cursor. Returns false if there is none, in which case the cursor is
    /// left somewhere past the last place the needle could start.
    pub(crate) fn find<S: CharSource + ?Sized>(&self, src: &mut S) -> bool {
        let last = self.needle.len() - 1;
        loop {
            let c = match src.char_at(last as isize) {
                None => return false,
                Some(c) => c,
            };
            if c == self.needle[last] && self.is_prefix_at_cursor(src, last) {
                return true;
            }
            let shift = self.skip.get(&c).copied().unwrap_or(self.needle.len());
            src.advance(shift);
        }
    }

    /// Returns true if the first `len` characters of the needle are at the
    /// cursor.
    fn is_prefix_at_cursor<S: CharSource + ?Sized>(
        &self,
        src: &mut S,
        len: usize,
    ) -> bool {
        self.needle[..len]
            .iter()
            .enumerate()
            .all(|(i, &c)| src.char_at(i as isize) == Some(c))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::source::{CharBuffer, StreamSource};

    fn find_all(needle: &str, haystack: &str) -> Vec<usize> {
        let needle: Vec<char> = needle.chars().collect();
        let finder = Finder::new(&needle).unwrap();
        let mut src = CharBuffer::from(haystack);
        let mut got = vec![];
        while finder.find(&mut src) {
            got.push(src.position());
            src.advance(1);
        }
        got
    }

    #[test]
    fn finds_every_occurrence() {
        assert_eq!(vec![0, 1, 2, 3], find_all("aa", "aaaaa"));
        assert_eq!(vec![2], find_all("abc", "ababc"));
        assert_eq!(vec![2, 7], find_all("abc", "ababcababc"));
        assert_eq!(Vec::<usize>::new(), find_all("abc", "ab"));
        assert_eq!(vec![1], find_all("☃", "a☃b"));
    }

    #[test]
    fn works_over_streams() {
        let needle: Vec<char> = "needle".chars().collect();
        let finder = Finder::new(&needle).unwrap();
        let mut src = StreamSource::new(&b"haystack with a needle in it"[..]);
        assert!(finder.find(&mut src));
        assert_eq!(16, src.position());
    }

    #[test]
    fn empty_needle() {
        assert!(Finder::new(&[]).is_none());
    }

    quickcheck! {
        fn agrees_with_naive_search(needle: Vec<bool>, haystack: Vec<bool>) -> bool {
            // A two letter alphabet makes occurrences common.
            let conv = |bits: &[bool]| -> String {
                bits.iter().map(|&b| if b { 'a' } else { 'b' }).collect()
            };
            let (needle, haystack) = (conv(&needle), conv(&haystack));
            if needle.is_empty() {
                return true;
            }
            let expected: Vec<usize> = (0..haystack.len())
                .filter(|&i| haystack[i..].starts_with(&needle))
                .collect();
            expected == find_all(&needle, &haystack)
        }
    }
}
