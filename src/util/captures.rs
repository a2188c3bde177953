use crate::{
    source::CharSource,
    state::State,
    util::search::{Match, Span},
};

/// The capture groups of a successful match.
///
/// Group `0` always corresponds to the overall match, and groups `1` and up
/// correspond to the capture groups of the pattern in the order their
/// opening delimiters appear. A group that did not participate in the match
/// has no span.
///
/// Besides spans, a `Captures` holds the text of every group that matched.
/// The text is copied out of the [`CharSource`](crate::source::CharSource)
/// when the match is found, so it remains available even for matches found
/// in a stream.
///
/// # Example
///
/// ```
/// use rematch::{Pattern, Span};
///
/// let re = Pattern::new(r"(a)(b)?")?;
/// let caps = re.find("xa").unwrap();
/// assert_eq!(Some(Span { start: 1, end: 2 }), caps.get(1));
/// assert_eq!(Some("a"), caps.as_str(1));
/// // The second group did not participate.
/// assert_eq!(None, caps.get(2));
/// assert_eq!(None, caps.as_str(2));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Captures {
    spans: Vec<Option<Span>>,
    texts: Vec<Option<String>>,
}

impl Captures {
    /// Materializes a finished match state. `base` is the absolute offset at
    /// which the attempt started, and `src` must still have its cursor there.
    pub(crate) fn from_state<S: CharSource + ?Sized>(
        st: &State,
        base: usize,
        src: &mut S,
    ) -> Captures {
        let mut spans = Vec::with_capacity(st.group_len());
        let mut texts = Vec::with_capacity(st.group_len());
        for group in 0..st.group_len() {
            match st.group(group) {
                None => {
                    spans.push(None);
                    texts.push(None);
                }
                Some((start, end)) => {
                    let text = (start..end)
                        .filter_map(|i| src.char_at(i as isize))
                        .collect();
                    spans.push(Some(Span { start: base + start, end: base + end }));
                    texts.push(Some(text));
                }
            }
        }
        Captures { spans, texts }
    }

    /// Returns the overall match.
    #[inline]
    pub fn get_match(&self) -> Match {
        match self.spans[0] {
            Some(span) => Match::new(span),
            None => unreachable!("group 0 is always set for a match"),
        }
    }

    /// Returns the span of the given group, or `None` if the group did not
    /// participate in the match or does not exist.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied().flatten()
    }

    /// Returns the text matched by the given group, or `None` if the group
    /// did not participate in the match or does not exist.
    #[inline]
    pub fn as_str(&self, index: usize) -> Option<&str> {
        self.texts.get(index)?.as_deref()
    }

    /// Returns the number of groups, including group 0.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.spans.len()
    }

    /// Returns an iterator over the spans of every group, starting with
    /// group 0.
    pub fn iter(&self) -> GroupSpans<'_> {
        GroupSpans { it: self.spans.iter() }
    }
}

/// An iterator over the spans of every group in a [`Captures`].
///
/// This is created by [`Captures::iter`].
#[derive(Clone, Debug)]
pub struct GroupSpans<'a> {
    it: core::slice::Iter<'a, Option<Span>>,
}

impl<'a> Iterator for GroupSpans<'a> {
    type Item = Option<Span>;

    fn next(&mut self) -> Option<Option<Span>> {
        self.it.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a> ExactSizeIterator for GroupSpans<'a> {}
