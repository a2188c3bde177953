use std::convert::TryFrom;

use crate::{
    backtrack::{Matcher, Options},
    compile::{self, Flags},
    error::{Error, MatchError},
    literal::Finder,
    replace::Template,
    source::{CharBuffer, CharSource},
    state::State,
    syntax::Syntax,
    token::Program,
    util::{
        captures::Captures,
        iter::Searcher,
        search::{byte_offset, Match},
    },
};

/// The configuration used for compiling and executing a [`Pattern`].
///
/// Some options only apply at compile time (case insensitivity, multi-line
/// mode and what `.` matches). The rest apply to every search the pattern
/// runs. All options are set through a [`Builder`].
///
/// Options left unset take their documented defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    case_insensitive: Option<bool>,
    multi_line: Option<bool>,
    dot_matches_new_line: Option<bool>,
    dot_excludes_nul: Option<bool>,
    not_bol: Option<bool>,
    not_eol: Option<bool>,
    step_limit: Option<Option<u64>>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// When enabled, characters are compared without regard to simple case,
    /// both in literals and in bracket expressions.
    ///
    /// Disabled by default.
    pub fn case_insensitive(mut self, yes: bool) -> Config {
        self.case_insensitive = Some(yes);
        self
    }

    /// When enabled, `^` also matches right after every `\n` and `$` also
    /// matches right before every `\n`.
    ///
    /// Disabled by default.
    pub fn multi_line(mut self, yes: bool) -> Config {
        self.multi_line = Some(yes);
        self
    }

    /// When enabled, `.` matches `\n` regardless of the syntax.
    ///
    /// Disabled by default.
    pub fn dot_matches_new_line(mut self, yes: bool) -> Config {
        self.dot_matches_new_line = Some(yes);
        self
    }

    /// When enabled, `.` does not match NUL regardless of the syntax.
    ///
    /// Disabled by default.
    pub fn dot_excludes_nul(mut self, yes: bool) -> Config {
        self.dot_excludes_nul = Some(yes);
        self
    }

    /// When enabled, the start of the text is not treated as the start of a
    /// line, so `^` only matches there if it matches after a newline in
    /// multi-line mode. This is useful when searching text that continues
    /// something searched earlier.
    ///
    /// Disabled by default.
    pub fn not_bol(mut self, yes: bool) -> Config {
        self.not_bol = Some(yes);
        self
    }

    /// When enabled, the end of the text is not treated as the end of a
    /// line, so `$` does not match there.
    ///
    /// Disabled by default.
    pub fn not_eol(mut self, yes: bool) -> Config {
        self.not_eol = Some(yes);
        self
    }

    /// Sets the maximum number of token evaluations a single match attempt
    /// may perform. Every start offset a search tries is one attempt with
    /// its own budget, so searching text, substituting in it and filtering
    /// it as a stream all fail on the same inputs. A search whose attempt
    /// exceeds the limit stops with [`MatchError::StepLimitExceeded`].
    ///
    /// Backtracking can take exponential time on some patterns, for example
    /// nested unbounded repetitions like `(a*)*b`. A step limit bounds the
    /// damage.
    ///
    /// There is no limit by default.
    pub fn step_limit(mut self, limit: Option<u64>) -> Config {
        self.step_limit = Some(limit);
        self
    }

    /// Returns whether case insensitive matching is enabled.
    pub fn get_case_insensitive(&self) -> bool {
        self.case_insensitive.unwrap_or(false)
    }

    /// Returns whether multi-line mode is enabled.
    pub fn get_multi_line(&self) -> bool {
        self.multi_line.unwrap_or(false)
    }

    /// Returns whether `.` is forced to match `\n`.
    pub fn get_dot_matches_new_line(&self) -> bool {
        self.dot_matches_new_line.unwrap_or(false)
    }

    /// Returns whether `.` is forced to not match NUL.
    pub fn get_dot_excludes_nul(&self) -> bool {
        self.dot_excludes_nul.unwrap_or(false)
    }

    /// Returns whether the start of the text is not a line start.
    pub fn get_not_bol(&self) -> bool {
        self.not_bol.unwrap_or(false)
    }

    /// Returns whether the end of the text is not a line end.
    pub fn get_not_eol(&self) -> bool {
        self.not_eol.unwrap_or(false)
    }

    /// Returns the step limit, if one is set.
    pub fn get_step_limit(&self) -> Option<u64> {
        self.step_limit.unwrap_or(None)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            case_insensitive: o.case_insensitive.or(self.case_insensitive),
            multi_line: o.multi_line.or(self.multi_line),
            dot_matches_new_line: o
                .dot_matches_new_line
                .or(self.dot_matches_new_line),
            dot_excludes_nul: o.dot_excludes_nul.or(self.dot_excludes_nul),
            not_bol: o.not_bol.or(self.not_bol),
            not_eol: o.not_eol.or(self.not_eol),
            step_limit: o.step_limit.or(self.step_limit),
        }
    }

    fn flags(&self) -> Flags {
        Flags {
            case_insensitive: self.get_case_insensitive(),
            multi_line: self.get_multi_line(),
            dot_matches_new_line: self.get_dot_matches_new_line(),
            dot_excludes_nul: self.get_dot_excludes_nul(),
        }
    }

    fn options(&self) -> Options {
        Options {
            not_bol: self.get_not_bol(),
            not_eol: self.get_not_eol(),
            step_limit: self.get_step_limit(),
        }
    }
}

/// A builder for a [`Pattern`].
///
/// # Example
///
/// ```
/// use rematch::{Pattern, Syntax};
///
/// let re = Pattern::builder()
///     .syntax(Syntax::posix_basic())
///     .configure(Pattern::config().case_insensitive(true))
///     .build(r"\(ab\)\+")?;
/// assert_eq!(Some("aBAb"), re.find("xaBAbx").unwrap().as_str(0));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    syntax: Syntax,
}

impl Builder {
    /// Create a new builder with the default syntax ([`Syntax::perl5`]) and
    /// configuration.
    pub fn new() -> Builder {
        Builder { config: Config::default(), syntax: Syntax::default() }
    }

    /// Compiles a pattern.
    pub fn build(&self, pattern: &str) -> Result<Pattern, Error> {
        let prog = compile::compile(pattern, self.syntax, self.config.flags())?;
        let prefilter = prog.literal_prefix().and_then(Finder::new);
        if let Some(ref _pre) = prefilter {
            debug!(
                "using literal prefilter {:?}",
                _pre.needle().iter().collect::<String>(),
            );
        }
        Ok(Pattern {
            pattern: pattern.to_string(),
            syntax: self.syntax,
            config: self.config,
            prog,
            prefilter,
        })
    }

    /// Apply the given configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax patterns are written in.
    pub fn syntax(&mut self, syntax: Syntax) -> &mut Builder {
        self.syntax = syntax;
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

/// A compiled pattern.
///
/// A pattern is compiled once and can then be used for any number of
/// searches. It is immutable, so it can be shared between threads freely.
/// Every search creates its own working state.
///
/// Searches report leftmost-first matches. The pattern is tried at each
/// offset in turn, and the first offset at which it matches wins. At a given
/// offset, alternation prefers earlier branches and repetition prefers more
/// iterations (or fewer, for lazy repetitions), whatever it takes for the
/// rest of the pattern to match.
///
/// All offsets are in characters, not bytes.
///
/// # Searching with a step limit
///
/// The matcher backtracks without memoization, so some patterns take
/// exponential time. When a [step limit](Config::step_limit) is configured,
/// a search can fail. The `try_` methods report that failure as a
/// [`MatchError`]. The other methods panic on it. Without a step limit,
/// no search fails.
///
/// # Example
///
/// ```
/// use rematch::Pattern;
///
/// let re = Pattern::new(r"(\w+)=(\d+)")?;
/// let caps = re.find("set x=10, y=20").unwrap();
/// assert_eq!(Some("x"), caps.as_str(1));
/// assert_eq!(Some("10"), caps.as_str(2));
///
/// assert_eq!(
///     "set 10=x, 20=y",
///     re.substitute_all("set x=10, y=20", "$2=$1"),
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Pattern {
    pattern: String,
    syntax: Syntax,
    config: Config,
    prog: Program,
    prefilter: Option<Finder>,
}

impl Pattern {
    /// Compiles a pattern written in the default syntax
    /// ([`Syntax::perl5`]) with the default configuration.
    pub fn new(pattern: &str) -> Result<Pattern, Error> {
        Pattern::builder().build(pattern)
    }

    /// Return a default configuration for a pattern.
    pub fn config() -> Config {
        Config::new()
    }

    /// Return a builder for configuring the compilation of a pattern.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Returns the pattern string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the syntax this pattern was compiled with.
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Returns the configuration of this pattern.
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of capture groups, including the implicit group 0
    /// for the whole match.
    pub fn group_len(&self) -> usize {
        self.prog.group_len
    }

    /// Returns the fewest characters any match of this pattern consumes.
    pub fn min_len(&self) -> usize {
        self.prog.min_len
    }

    /// Returns true if this pattern matches somewhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Returns the leftmost-first match in `text`.
    pub fn find(&self, text: &str) -> Option<Captures> {
        self.find_at(text, 0)
    }

    /// Returns the leftmost-first match in `text` that starts at or after
    /// the character offset `start`.
    ///
    /// Unlike slicing `text`, the characters before `start` are still
    /// visible to `^`, `\b` and similar assertions.
    pub fn find_at(&self, text: &str, start: usize) -> Option<Captures> {
        unwrap_or_panic(self.try_find_at(text, start))
    }

    /// Like [`Pattern::find_at`], but reports step limit failures.
    pub fn try_find_at(
        &self,
        text: &str,
        start: usize,
    ) -> Result<Option<Captures>, MatchError> {
        let mut chars = CharBuffer::from(text);
        if start > chars.len() {
            return Ok(None);
        }
        chars.set_position(start);
        self.try_search(&mut chars)
    }

    /// Returns true if this pattern matches the whole of `text`.
    ///
    /// # Example
    ///
    /// ```
    /// use rematch::Pattern;
    ///
    /// let re = Pattern::new("a|ab")?;
    /// // Even though the first branch matches first, the second branch
    /// // makes the whole text match.
    /// assert!(re.matches("ab"));
    /// assert!(!re.matches("abc"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn matches(&self, text: &str) -> bool {
        unwrap_or_panic(self.try_matches(text))
    }

    /// Like [`Pattern::matches`], but reports step limit failures.
    pub fn try_matches(&self, text: &str) -> Result<bool, MatchError> {
        let mut chars = CharBuffer::from(text);
        let len = chars.len();
        if self.prog.min_len > len {
            return Ok(false);
        }
        let mut m = Matcher::new(&self.prog, &mut chars, self.config.options());
        let st = State::new(self.prog.group_len);
        let matched = m.run(Some(self.prog.start), st, &mut |st| st.at == len);
        if m.exceeded() {
            return Err(self.step_limit_error());
        }
        Ok(matched)
    }

    /// Returns an iterator over all non-overlapping matches in `text`.
    ///
    /// After a non-empty match, the next search starts where it ended.
    /// After an empty match, it starts one character later.
    ///
    /// # Panics
    ///
    /// The iterator panics if a configured step limit is exceeded.
    pub fn find_iter(&self, text: &str) -> FindMatches<'_> {
        let chars = CharBuffer::from(text);
        let it = Searcher::new(chars.len());
        FindMatches { re: self, chars, it }
    }

    /// Returns an iterator over the captures of all non-overlapping matches
    /// in `text`. Matches are found exactly like with
    /// [`Pattern::find_iter`].
    ///
    /// # Panics
    ///
    /// The iterator panics if a configured step limit is exceeded.
    pub fn captures_iter(&self, text: &str) -> CapturesMatches<'_> {
        let chars = CharBuffer::from(text);
        let it = Searcher::new(chars.len());
        CapturesMatches { re: self, chars, it }
    }

    /// Returns `text` with its first match replaced by the expansion of
    /// `template`.
    pub fn substitute<T: Into<Template>>(&self, text: &str, template: T) -> String {
        let template = template.into();
        let caps = match self.find(text) {
            None => return text.to_string(),
            Some(caps) => caps,
        };
        let m = caps.get_match();
        let mut out = String::with_capacity(text.len());
        out.push_str(&text[..byte_offset(text, m.start())]);
        template.expand(&caps, &mut out);
        out.push_str(&text[byte_offset(text, m.end())..]);
        out
    }

    /// Returns `text` with every non-overlapping match replaced by the
    /// expansion of `template`.
    ///
    /// Matches are found like with [`Pattern::find_iter`]. An empty match is
    /// replaced by the expansion followed by the character it preceded.
    ///
    /// # Panics
    ///
    /// This panics if a configured step limit is exceeded.
    ///
    /// # Example
    ///
    /// ```
    /// use rematch::Pattern;
    ///
    /// let re = Pattern::new("x*")?;
    /// assert_eq!("-a-b-", re.substitute_all("ab", "-"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn substitute_all<T: Into<Template>>(
        &self,
        text: &str,
        template: T,
    ) -> String {
        unwrap_or_panic(self.try_substitute_all(text, template))
    }

    /// Like [`Pattern::substitute_all`], but reports step limit failures.
    pub fn try_substitute_all<T: Into<Template>>(
        &self,
        text: &str,
        template: T,
    ) -> Result<String, MatchError> {
        let template = template.into();
        let chars: Vec<char> = text.chars().collect();
        let mut buf = CharBuffer::new(&chars[..]);
        let mut out = String::with_capacity(text.len());
        let mut at = 0;
        loop {
            buf.set_position(at);
            let caps = match self.try_search(&mut buf)? {
                None => {
                    out.extend(&chars[at..]);
                    break;
                }
                Some(caps) => caps,
            };
            let m = caps.get_match();
            out.extend(&chars[at..m.start()]);
            template.expand(&caps, &mut out);
            if !m.is_empty() {
                at = m.end();
                continue;
            }
            match chars.get(m.start()) {
                None => break,
                Some(&c) => out.push(c),
            }
            at = m.start() + 1;
        }
        Ok(out)
    }

    /// Searches `src` from its cursor onwards and returns the leftmost-first
    /// match.
    ///
    /// On success, the cursor is left at the start of the match. Offsets in
    /// the returned captures are absolute positions in the source.
    ///
    /// # Panics
    ///
    /// This panics if a configured step limit is exceeded.
    pub fn search<S: CharSource + ?Sized>(&self, src: &mut S) -> Option<Captures> {
        unwrap_or_panic(self.try_search(src))
    }

    /// Like [`Pattern::search`], but reports step limit failures.
    pub fn try_search<S: CharSource + ?Sized>(
        &self,
        src: &mut S,
    ) -> Result<Option<Captures>, MatchError> {
        self.search_imp(src, false)
    }

    /// Attempts a match exactly at the cursor of `src`, without moving it.
    ///
    /// # Panics
    ///
    /// This panics if a configured step limit is exceeded.
    pub fn match_here<S: CharSource + ?Sized>(
        &self,
        src: &mut S,
    ) -> Option<Captures> {
        unwrap_or_panic(self.try_match_here(src))
    }

    /// Like [`Pattern::match_here`], but reports step limit failures.
    pub fn try_match_here<S: CharSource + ?Sized>(
        &self,
        src: &mut S,
    ) -> Result<Option<Captures>, MatchError> {
        self.search_imp(src, true)
    }

    /// The search driver. Tries the program at the cursor and, unless
    /// `anchored`, at every following offset up to and including the end of
    /// the data.
    fn search_imp<S: CharSource + ?Sized>(
        &self,
        src: &mut S,
        anchored: bool,
    ) -> Result<Option<Captures>, MatchError> {
        let prog = &self.prog;
        let need = isize::try_from(prog.min_len).unwrap_or(isize::MAX);
        let mut m = Matcher::new(prog, src, self.config.options());
        loop {
            if !anchored {
                if let Some(ref pre) = self.prefilter {
                    if !pre.find(m.source()) {
                        return Ok(None);
                    }
                }
            }
            // Too few characters left for any match here or further on.
            if need > 0 && m.source().char_at(need - 1).is_none() {
                return Ok(None);
            }
            let mut found = None;
            let st = State::new(prog.group_len);
            m.reset_steps();
            m.run(Some(prog.start), st, &mut |st| {
                found = Some(st);
                true
            });
            if m.exceeded() {
                return Err(self.step_limit_error());
            }
            if let Some(mut st) = found {
                st.finish();
                let base = m.source().position();
                return Ok(Some(Captures::from_state(&st, base, m.source())));
            }
            if anchored || !m.source().is_valid() {
                return Ok(None);
            }
            m.source().advance(1);
        }
    }

    fn step_limit_error(&self) -> MatchError {
        MatchError::step_limit_exceeded(self.config.get_step_limit().unwrap_or(0))
    }
}

impl core::fmt::Display for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

impl core::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Pattern({:?}, syntax: {:?})", self.pattern, self.syntax)?;
        self.prog.fmt(f)
    }
}

fn unwrap_or_panic<T>(result: Result<T, MatchError>) -> T {
    match result {
        Ok(t) => t,
        Err(err) => panic!(
            "unexpected regex search error: {}\n\
             to handle search errors, use 'try' methods",
            err,
        ),
    }
}

/// An iterator over all non-overlapping matches in a text.
///
/// This iterator is created by [`Pattern::find_iter`]. It is restartable
/// with [`FindMatches::reset`].
#[derive(Debug)]
pub struct FindMatches<'r> {
    re: &'r Pattern,
    chars: CharBuffer<Vec<char>>,
    it: Searcher,
}

impl<'r> FindMatches<'r> {
    /// Restarts iteration from the beginning of the text.
    pub fn reset(&mut self) {
        self.it.reset();
    }
}

impl<'r> Iterator for FindMatches<'r> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let FindMatches { re, ref mut chars, ref mut it } = *self;
        let caps = it.advance(|start| {
            chars.set_position(start);
            re.try_search(chars)
        })?;
        Some(caps.get_match())
    }
}

/// An iterator over the captures of all non-overlapping matches in a text.
///
/// This iterator is created by [`Pattern::captures_iter`]. It is restartable
/// with [`CapturesMatches::reset`].
#[derive(Debug)]
pub struct CapturesMatches<'r> {
    re: &'r Pattern,
    chars: CharBuffer<Vec<char>>,
    it: Searcher,
}

impl<'r> CapturesMatches<'r> {
    /// Restarts iteration from the beginning of the text.
    pub fn reset(&mut self) {
        self.it.reset();
    }
}

impl<'r> Iterator for CapturesMatches<'r> {
    type Item = Captures;

    fn next(&mut self) -> Option<Captures> {
        let CapturesMatches { re, ref mut chars, ref mut it } = *self;
        it.advance(|start| {
            chars.set_position(start);
            re.try_search(chars)
        })
    }
}
