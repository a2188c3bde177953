use core::ops::Range;

/// A representation of a span reported by a regex engine.
///
/// A span corresponds to the starting and ending _character offsets_ of a
/// contiguous region of text. Character offsets count Unicode scalar values,
/// not bytes, so a span over a `&str` has to be converted before slicing.
/// [`Span::slice`] does this.
///
/// Spans are used by [`Match`] and [`Captures`](crate::Captures) to report
/// where a match or a capture group matched.
///
/// A span is never meant to have `end < start`, but nothing prevents one
/// from being constructed. Such a span is treated as empty.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Span {
    /// The start offset of the span, inclusive.
    pub start: usize,
    /// The end offset of the span, exclusive.
    pub end: usize,
}

impl Span {
    /// Returns this span as a range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        Range::from(*self)
    }

    /// Returns true when this span is empty. That is, when `start >= end`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns the number of characters in this span.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true when the given offset is contained within this span.
    ///
    /// Note that an empty span contains no offsets and will always return
    /// false.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        !self.is_empty() && self.start <= offset && offset < self.end
    }

    /// Returns the portion of `text` covered by this span, interpreting the
    /// span's offsets as character offsets.
    ///
    /// Offsets beyond the end of `text` are clamped to its end.
    ///
    /// # Example
    ///
    /// ```
    /// use rematch::Span;
    ///
    /// let span = Span { start: 1, end: 3 };
    /// assert_eq!("δε", span.slice("γδεζ"));
    /// ```
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let start = byte_offset(text, self.start);
        let end = byte_offset(text, self.end.max(self.start));
        &text[start..end]
    }
}

/// Converts a character offset into `text` to a byte offset, clamping to the
/// end of `text`.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

impl core::fmt::Debug for Span {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl core::ops::Index<Span> for [char] {
    type Output = [char];

    #[inline]
    fn index(&self, index: Span) -> &[char] {
        &self[index.range()]
    }
}

impl From<Range<usize>> for Span {
    #[inline]
    fn from(range: Range<usize>) -> Span {
        Span { start: range.start, end: range.end }
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Range<usize> {
        Range { start: span.start, end: span.end }
    }
}

impl PartialEq<Range<usize>> for Span {
    #[inline]
    fn eq(&self, range: &Range<usize>) -> bool {
        self.start == range.start && self.end == range.end
    }
}

impl PartialEq<Span> for Range<usize> {
    #[inline]
    fn eq(&self, span: &Span) -> bool {
        self.start == span.start && self.end == span.end
    }
}

/// A representation of a match reported by a pattern search.
///
/// A match records the character offsets of the overall match. Matches are
/// produced by [`Pattern::find_iter`](crate::Pattern::find_iter) and
/// [`Captures::get_match`](crate::Captures::get_match).
///
/// # Example
///
/// ```
/// use rematch::{Match, Pattern};
///
/// let re = Pattern::new(r"[0-9]+")?;
/// let got: Vec<Match> = re.find_iter("a1 b22 c333").collect();
/// assert_eq!(vec![Match::new(1..2), Match::new(4..6), Match::new(8..11)], got);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Match {
    span: Span,
}

impl Match {
    /// Create a new match from a span.
    ///
    /// # Panics
    ///
    /// This panics if `end < start`.
    #[inline]
    pub fn new<S: Into<Span>>(span: S) -> Match {
        let span = span.into();
        assert!(span.start <= span.end, "invalid match span");
        Match { span }
    }

    /// The starting position of the match.
    #[inline]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// The ending position of the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Returns the match span as a range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }

    /// Returns the span for this match.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns true when the span in this match is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Returns the number of characters in this match.
    #[inline]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Returns the matched portion of `text`, which must be the text this
    /// match was reported for.
    #[inline]
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        self.span.slice(text)
    }
}

impl core::fmt::Debug for Match {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Match({:?})", self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_slice_uses_char_offsets() {
        let text = "a☃b☃c";
        assert_eq!("☃b", Span::from(1..3).slice(text));
        assert_eq!("c", Span::from(4..5).slice(text));
        assert_eq!("", Span::from(5..5).slice(text));
        assert_eq!("c", Span::from(4..100).slice(text));
        assert_eq!("", Span::from(3..1).slice(text));
    }

    #[test]
    fn span_contains() {
        let span = Span::from(2..4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(3));
        assert!(!span.contains(4));
        assert!(!Span::from(2..2).contains(2));
    }

    #[test]
    #[should_panic]
    fn match_rejects_inverted_span() {
        Match::new(Span { start: 3, end: 1 });
    }
}
