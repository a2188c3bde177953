/*!
The backtracking matcher.

Matching is a single recursive decision procedure over the token arena.
[`Matcher::run`] asks "does the chain starting at this token, followed by
everything after it, succeed from this state?" When a chain runs out of
tokens, the completed state is handed to a *sink*. The sink either accepts
it, which stops the search, or rejects it, which makes the matcher backtrack
into the next alternative. The same procedure is used in three ways:

* An accepting sink finds the first successful match.
* A rejecting sink that records every state it is offered enumerates all
  the ways a chain can match. Repetitions use this to grow one count at a
  time.
* A sink that only accepts states at the end of the text implements
  whole-input matching.

There is no memoization. Nested unbounded repetitions can take exponential
time, which is why an optional step budget exists.
*/

use crate::{
    class::eq_ignore_case,
    source::CharSource,
    state::State,
    token::{Kind, Look, Program, TokenId},
    util::utf8,
};

/// The receiver of completed states. Returning `true` accepts the state and
/// ends the search.
pub(crate) type Sink<'a> = dyn FnMut(State) -> bool + 'a;

/// Execution-time options of a search.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Options {
    /// When set, `^` does not match at the start of the data.
    pub(crate) not_bol: bool,
    /// When set, `$` does not match at the end of the data.
    pub(crate) not_eol: bool,
    /// The most tokens that may be evaluated before giving up.
    pub(crate) step_limit: Option<u64>,
}

/// The mutable working state of one search over one source.
pub(crate) struct Matcher<'p, 's, S: ?Sized> {
    prog: &'p Program,
    src: &'s mut S,
    opts: Options,
    steps: u64,
    exceeded: bool,
}

impl<'p, 's, S: CharSource + ?Sized> Matcher<'p, 's, S> {
    pub(crate) fn new(
        prog: &'p Program,
        src: &'s mut S,
        opts: Options,
    ) -> Matcher<'p, 's, S> {
        Matcher { prog, src, opts, steps: 0, exceeded: false }
    }

    /// Returns the source this matcher reads from.
    pub(crate) fn source(&mut self) -> &mut S {
        self.src
    }

    /// Returns true if the step budget ran out. Once it has, every call to
    /// `run` fails immediately.
    pub(crate) fn exceeded(&self) -> bool {
        self.exceeded
    }

    /// Returns the number of tokens evaluated so far.
    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    /// Starts a new match attempt with a fresh step budget.
    pub(crate) fn reset_steps(&mut self) {
        self.steps = 0;
    }

    /// Runs the chain starting at `at` from `st`, handing every completed
    /// state to `sink` until it accepts one. Returns whether a state was
    /// accepted.
    pub(crate) fn run(
        &mut self,
        at: Option<TokenId>,
        mut st: State,
        sink: &mut Sink<'_>,
    ) -> bool {
        let prog = self.prog;
        let mut at = at;
        loop {
            let id = match at {
                None => return sink(st),
                Some(id) => id,
            };
            if !self.step() {
                return false;
            }
            let token = &prog.tokens[id];
            match token.kind {
                Kind::Empty => {}
                Kind::Literal(ref chars) => {
                    for &c in chars.iter() {
                        if !self.is_char(st.at, c) {
                            return false;
                        }
                        st.at += 1;
                    }
                }
                Kind::Any { newline, nul } => match self.char_at(st.at) {
                    None => return false,
                    Some('\n') if !newline => return false,
                    Some('\0') if !nul => return false,
                    Some(_) => st.at += 1,
                },
                Kind::Class(ref cls) => match self.char_at(st.at) {
                    Some(c) if cls.is_match(c, prog.case_insensitive) => {
                        st.at += 1
                    }
                    _ => return false,
                },
                Kind::Look(look) => {
                    if !self.is_look(look, st.at) {
                        return false;
                    }
                }
                Kind::Group { index, .. } => st.open(index),
                Kind::GroupEnd { index } => st.close(index),
                Kind::Alternation(ref branches) => {
                    for &branch in branches.iter() {
                        if self.run(Some(branch), st.clone(), sink) {
                            return true;
                        }
                        if self.exceeded {
                            return false;
                        }
                    }
                    return false;
                }
                Kind::Repeat { .. } => return self.repeat(id, st, sink),
                Kind::BackRef(index) => {
                    let (start, end) = match st.group(index) {
                        None => return false,
                        Some(bounds) => bounds,
                    };
                    for i in start..end {
                        let c = match self.char_at(i) {
                            None => return false,
                            Some(c) => c,
                        };
                        if !self.is_char(st.at, c) {
                            return false;
                        }
                        st.at += 1;
                    }
                }
                Kind::LookAhead { inner, negate } => {
                    let found = self.run(Some(inner), st.clone(), &mut |_| true);
                    if self.exceeded || found == negate {
                        return false;
                    }
                }
            }
            at = token.follow();
        }
    }

    /// Resolves a repetition.
    ///
    /// For every count from 0 up, this keeps the list of states reachable
    /// after exactly that many iterations of the body, in the order they were
    /// produced. Greedy repetitions grow as far as possible and then try the
    /// continuation from the highest count down. Lazy repetitions try the
    /// continuation before every growth step.
    fn repeat(&mut self, id: TokenId, st: State, sink: &mut Sink<'_>) -> bool {
        let prog = self.prog;
        let token = &prog.tokens[id];
        let (inner, min, max, greedy) = match token.kind {
            Kind::Repeat { inner, min, max, greedy, .. } => {
                (inner, min as usize, max.map(|max| max as usize), greedy)
            }
            _ => unreachable!("repeat called on a non-repeat token"),
        };
        let follow = token.follow();

        let mut counts: Vec<Vec<State>> = vec![vec![st]];
        loop {
            let reached = counts.len() - 1;
            if !greedy && reached >= min {
                for cand in counts[reached].iter() {
                    if self.run(follow, cand.clone(), sink) {
                        return true;
                    }
                    if self.exceeded {
                        return false;
                    }
                }
            }
            if max.map_or(false, |max| reached >= max) {
                break;
            }

            let mut grown: Vec<State> = vec![];
            for cand in counts[reached].iter() {
                let mut outcomes = vec![];
                self.run(Some(inner), cand.clone(), &mut |next| {
                    outcomes.push(next);
                    false
                });
                if self.exceeded {
                    return false;
                }
                for next in outcomes {
                    // An iteration that changes nothing can be repeated
                    // forever. It only counts while it is needed to reach
                    // the minimum.
                    if reached >= min && next == *cand {
                        continue;
                    }
                    if !grown.contains(&next) {
                        grown.push(next);
                    }
                }
            }
            if grown.is_empty() {
                break;
            }
            // Every count past one that repeats an eligible count's
            // candidates would only offer states that were already offered.
            let mut earlier = counts.iter().skip(min);
            if earlier.any(|prev| same_candidates(prev, &grown)) {
                trace!(
                    "repetition at token {} cycles after {} iterations",
                    id,
                    reached,
                );
                break;
            }
            counts.push(grown);
        }

        if counts.len() - 1 < min || !greedy {
            return false;
        }
        for cands in counts.into_iter().skip(min).rev() {
            for cand in cands {
                if self.run(follow, cand, sink) {
                    return true;
                }
                if self.exceeded {
                    return false;
                }
            }
        }
        false
    }

    /// Counts one token evaluation against the budget. Returns false if the
    /// budget is exhausted.
    #[inline]
    fn step(&mut self) -> bool {
        if self.exceeded {
            return false;
        }
        self.steps += 1;
        if let Some(limit) = self.opts.step_limit {
            if self.steps > limit {
                debug!("step limit of {} exceeded", limit);
                self.exceeded = true;
                return false;
            }
        }
        true
    }

    #[inline]
    fn char_at(&mut self, at: usize) -> Option<char> {
        self.src.char_at(at as isize)
    }

    /// Returns the character before position `at`.
    #[inline]
    fn char_before(&mut self, at: usize) -> Option<char> {
        self.src.char_at(at as isize - 1)
    }

    #[inline]
    fn is_char(&mut self, at: usize, want: char) -> bool {
        match self.char_at(at) {
            None => false,
            Some(c) if self.prog.case_insensitive => eq_ignore_case(c, want),
            Some(c) => c == want,
        }
    }

    fn is_look(&mut self, look: Look, at: usize) -> bool {
        let is_word = |c: Option<char>| c.map_or(false, utf8::is_word_char);
        match look {
            Look::LineStart => {
                if self.src.position() + at == 0 {
                    return !self.opts.not_bol;
                }
                self.prog.multi_line && self.char_before(at) == Some('\n')
            }
            Look::LineEnd => match self.char_at(at) {
                None => !self.opts.not_eol,
                Some(c) => self.prog.multi_line && c == '\n',
            },
            Look::TextStart => self.src.position() + at == 0,
            Look::TextEnd => self.char_at(at).is_none(),
            Look::WordBoundary => {
                is_word(self.char_before(at)) != is_word(self.char_at(at))
            }
            Look::NotWordBoundary => {
                is_word(self.char_before(at)) == is_word(self.char_at(at))
            }
            Look::WordStart => {
                !is_word(self.char_before(at)) && is_word(self.char_at(at))
            }
            Look::WordEnd => {
                is_word(self.char_before(at)) && !is_word(self.char_at(at))
            }
        }
    }
}

/// Returns true if both lists hold the same candidates, in any order. Neither
/// list contains duplicates.
fn same_candidates(a: &[State], b: &[State]) -> bool {
    a.len() == b.len() && a.iter().all(|st| b.contains(st))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compile::{compile, Flags},
        source::CharBuffer,
        syntax::Syntax,
    };

    fn prog(pattern: &str) -> Program {
        compile(pattern, Syntax::perl5(), Flags::default()).unwrap()
    }

    /// Returns every way `pattern` matches at the start of `text`, in the
    /// order the matcher produces them, as (end, group 1) pairs.
    fn all(pattern: &str, text: &str) -> Vec<(usize, Option<(usize, usize)>)> {
        let prog = prog(pattern);
        let mut src = CharBuffer::from(text);
        let mut m = Matcher::new(&prog, &mut src, Options::default());
        let mut got = vec![];
        let st = State::new(prog.group_len);
        m.run(Some(prog.start), st, &mut |st| {
            let group = if st.group_len() > 1 { st.group(1) } else { None };
            got.push((st.at, group));
            false
        });
        got
    }

    fn first(
        pattern: &str,
        text: &str,
    ) -> Option<(usize, Option<(usize, usize)>)> {
        all(pattern, text).into_iter().next()
    }

    #[test]
    fn greedy_prefers_more() {
        assert_eq!(Some((3, None)), first("a*", "aaab"));
        assert_eq!(
            vec![(3, None), (2, None), (1, None), (0, None)],
            all("a*", "aaab"),
        );
    }

    #[test]
    fn lazy_prefers_fewer() {
        assert_eq!(Some((0, None)), first("a*?", "aaab"));
        assert_eq!(Some((4, None)), first("a*?b", "aaab"));
    }

    #[test]
    fn bounded_counts() {
        assert_eq!(Some((2, None)), first("a{1,2}", "aaaa"));
        assert_eq!(Some((1, None)), first("a{1,2}?", "aaaa"));
        assert_eq!(None, first("a{3}", "aa"));
        assert_eq!(Some((3, None)), first("a{2,}?a", "aaaa"));
    }

    #[test]
    fn zero_width_bodies_terminate() {
        assert_eq!(Some((0, Some((0, 0)))), first("(a?)*", "b"));
        assert_eq!(Some((2, Some((2, 2)))), first("(a?)*", "aab"));
        assert_eq!(Some((0, None)), first("(?:a?){3}", "b"));
        assert_eq!(Some((0, None)), first("(?:)*", "xyz"));
        assert_eq!(Some((0, Some((0, 0)))), first("(a*)*", "b"));
        assert_eq!(Some((3, Some((3, 3)))), first("(a*)+$", "aaa"));
    }

    #[test]
    fn zero_width_iteration_can_enable_a_later_one() {
        // The first iteration only sets group 1, which the second needs.
        assert_eq!(Some((1, Some((1, 1)))), first(r"(?:()|\1z)*$", "z"));
        assert_eq!(Some((1, Some((1, 1)))), first(r"^(?:()|\1z)*$", "z"));
        assert_eq!(Some((2, Some((2, 2)))), first(r"(?:()|\1z)*$", "zz"));
    }

    #[test]
    fn repeating_candidate_sets_terminate() {
        let text = "a".repeat(12);
        assert_eq!(None, first("(a*)*b", &text));
        assert_eq!(Some((12, Some((12, 12)))), first("(a*)*", &text));
        assert_eq!(Some((2, Some((1, 1)))), first("(a|())+b", "ab"));
    }

    #[test]
    fn branching_bodies_keep_candidate_order() {
        // Each iteration of the body can consume one or two characters.
        assert_eq!(Some((4, Some((2, 3)))), first("(a|ab)*c", "abacx"));
        assert_eq!(Some((3, Some((2, 3)))), first("(ab|a)*", "aba"));
    }

    #[test]
    fn groups_and_backrefs() {
        assert_eq!(Some((4, Some((0, 2)))), first(r"(ab)\1", "abab"));
        assert_eq!(None, first(r"(ab)\1", "abac"));
        // A back-reference to a group that did not participate fails.
        assert_eq!(None, first(r"(?:(a)|b)\1", "b"));
        assert_eq!(Some((1, Some((0, 1)))), first("(a)(b)?", "a"));
    }

    #[test]
    fn lookahead_does_not_consume() {
        assert_eq!(Some((1, None)), first("a(?=b)", "ab"));
        assert_eq!(None, first("a(?=b)", "ac"));
        assert_eq!(Some((1, None)), first("a(?!b)", "ac"));
    }

    #[test]
    fn step_limit_stops_search() {
        let prog = prog("(a*)*b");
        let text = "a".repeat(20);
        let mut src = CharBuffer::from(text.as_str());
        let opts = Options { step_limit: Some(100), ..Options::default() };
        let mut m = Matcher::new(&prog, &mut src, opts);
        let st = State::new(prog.group_len);
        assert!(!m.run(Some(prog.start), st, &mut |_| true));
        assert!(m.exceeded());
        assert_eq!(101, m.steps());
    }
}
