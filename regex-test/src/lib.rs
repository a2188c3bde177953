/*!
A small harness for running TOML described regex tests.

Each TOML file contains a list of `[[tests]]`. A test names one pattern, an
input, the options to compile and search with and exactly one expectation.
Offsets in expectations are character offsets.

```toml
[[tests]]
name = "basic"
regex = '(a)(b)?'
input = "xa"
captures = [[[1, 2], [1, 2], []]]
```

A test runner hands every test to a closure that compiles the regex and
returns a [`CompiledRegex`], which in turn produces one or more
[`TestResult`]s for the test. The runner compares results against the
expectations and reports all failures at once.
*/

use std::borrow::Borrow;
use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use bstr::ByteVec;
use serde::Deserialize;

mod escape;

const ENV_REGEX_TEST: &str = "REGEX_TEST";

/// A collection of regex tests.
#[derive(Clone, Debug, Deserialize)]
pub struct RegexTests {
    tests: Vec<RegexTest>,
    #[serde(skip)]
    seen: HashSet<String>,
}

/// A regex test describes the inputs and expected outputs of a regex search.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    regex: String,
    #[serde(default)]
    input: String,
    syntax: Option<String>,
    #[serde(rename = "match")]
    is_match: Option<bool>,
    full_match: Option<bool>,
    matches: Option<Vec<Match>>,
    captures: Option<Vec<Captures>>,
    replace: Option<String>,
    replaced: Option<String>,
    match_limit: Option<usize>,
    step_limit: Option<u64>,
    #[serde(default)]
    search_error: bool,
    #[serde(default = "default_true")]
    compiles: bool,
    #[serde(default)]
    case_insensitive: bool,
    #[serde(default)]
    multi_line: bool,
    #[serde(default)]
    dot_matches_new_line: bool,
    #[serde(default)]
    dot_excludes_nul: bool,
    #[serde(default)]
    not_bol: bool,
    #[serde(default)]
    not_eol: bool,
    #[serde(default)]
    unescape: bool,
}

/// The different kinds of expectations a test can have.
#[derive(Clone, Debug)]
enum Expected<'a> {
    /// Just a simple yes/no as to whether the regex matches somewhere.
    YesNo(bool),
    /// Whether the regex matches the whole input.
    Full(bool),
    /// A sequence of all non-overlapping match offsets.
    AllStartEnd(&'a [Match]),
    /// A sequence of all non-overlapping capturing groups, one for each
    /// match.
    AllCaptures(&'a [Captures]),
    /// The output of replacing every match.
    Replaced(&'a str),
    /// The search fails because it exceeds its step limit.
    SearchError,
}

/// Match represents a single match span, from start to end, represented via
/// character offsets.
#[derive(Clone, Deserialize, Eq, PartialEq)]
#[serde(from = "MatchFormat")]
pub struct Match {
    /// The starting character offset of the match.
    pub start: usize,
    /// The ending character offset of the match.
    pub end: usize,
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Captures represents a single group of captured matches from a regex
/// search.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "CapturesFormat")]
pub struct Captures(Vec<Option<Match>>);

impl RegexTests {
    /// Create a new empty collection of regex tests.
    pub fn new() -> RegexTests {
        RegexTests { tests: vec![], seen: HashSet::new() }
    }

    /// Decodes the TOML tests in `data` and adds them to this collection
    /// under the given group name. Unnamed tests are numbered from 1 in the
    /// order they appear.
    pub fn load_slice(&mut self, group_name: &str, data: &[u8]) -> Result<()> {
        let decoded: RegexTests =
            toml::from_slice(data).context("error decoding TOML")?;
        let mut unnamed = 0;
        for mut test in decoded.tests {
            test.group = group_name.to_string();
            if test.name.is_empty() {
                unnamed += 1;
                test.name = unnamed.to_string();
            }
            test.full_name = format!("{}/{}", group_name, test.name);
            if test.unescape {
                test.input = crate::escape::unescape(&test.input);
            }
            test.validate()
                .with_context(|| format!("invalid test '{}'", test.full_name))?;
            if !self.seen.insert(test.full_name.clone()) {
                bail!("test name '{}' is used more than once", test.full_name);
            }
            self.tests.push(test);
        }
        Ok(())
    }

    /// Return an iterator over all regex tests that have been loaded. The
    /// order of the iterator corresponds to the order in which the tests were
    /// loaded.
    pub fn iter(&self) -> RegexTestsIter {
        RegexTestsIter { it: self.tests.iter() }
    }
}

impl Captures {
    /// Create a new set of captures for a single match of a regex.
    ///
    /// The iterator should provide items for every capturing group in the
    /// regex, including the 0th capturing group corresponding to the entire
    /// match. If a capturing group did not participate in the match, then a
    /// `None` value should be used.
    pub fn new<I: IntoIterator<Item = Option<Match>>>(it: I) -> Captures {
        Captures(it.into_iter().collect())
    }
}

impl RegexTest {
    fn test(&self, regex: &CompiledRegex) -> Vec<TestResult> {
        match regex.match_regex {
            None => vec![TestResult::skip()],
            Some(ref match_regex) => match_regex(self),
        }
    }

    fn validate(&self) -> Result<()> {
        let expectations = [
            self.is_match.is_some(),
            self.full_match.is_some(),
            self.matches.is_some(),
            self.captures.is_some(),
            self.replaced.is_some(),
            self.search_error,
        ];
        let count = expectations.iter().filter(|&&yes| yes).count();
        if count == 0 && self.compiles {
            bail!(
                "one of 'match', 'full_match', 'matches', 'captures', \
                 'replaced' or 'search_error' must be present"
            )
        } else if count > 1 {
            bail!(
                "only one of 'match', 'full_match', 'matches', 'captures', \
                 'replaced' or 'search_error' can be present"
            )
        }
        if self.replaced.is_some() != self.replace.is_some() {
            bail!("'replace' and 'replaced' must be given together");
        }
        if self.search_error && self.step_limit.is_none() {
            bail!("'search_error' requires a 'step_limit'");
        }
        Ok(())
    }

    /// Return the group name of this test.
    ///
    /// Usually the group name corresponds to a collection of related tests.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The name of this test.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full name of this test, which is formed by joining the group
    /// name with the test name via a `/`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Return the regex pattern of this test.
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Return the text on which the regex should be matched.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Return the name of the dialect the regex is written in, if the test
    /// specifies one.
    pub fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    /// Returns true if and only if this test expects the regex to match
    /// somewhere in the input.
    pub fn is_match(&self) -> bool {
        match self.expected() {
            Expected::YesNo(yesno) => yesno,
            Expected::Full(yesno) => yesno,
            Expected::AllStartEnd(matches) => !matches.is_empty(),
            Expected::AllCaptures(matches) => !matches.is_empty(),
            Expected::Replaced(_) | Expected::SearchError => false,
        }
    }

    /// If this test expects a verdict on whether the regex matches the whole
    /// input, then it is returned.
    pub fn full_match(&self) -> Option<bool> {
        self.full_match
    }

    /// If this test expects all non-overlapping matches (whether capturing
    /// or not), then they are returned. Otherwise, `None` is returned.
    pub fn matches(&self) -> Option<Vec<Match>> {
        match self.expected() {
            Expected::AllStartEnd(matches) => Some(matches.to_vec()),
            Expected::AllCaptures(matches) => Some(
                matches.iter().filter_map(|c| c.0.get(0).cloned()?).collect(),
            ),
            _ => None,
        }
    }

    /// If this test expects all non-overlapping matches as capturing groups,
    /// then they are returned. Otherwise, `None` is returned.
    pub fn captures(&self) -> Option<Vec<Captures>> {
        match self.expected() {
            Expected::AllCaptures(matches) => Some(matches.to_vec()),
            _ => None,
        }
    }

    /// If this test expects the output of replacing every match, then the
    /// replacement template is returned.
    pub fn replace(&self) -> Option<&str> {
        self.replace.as_deref()
    }

    /// If this test expects the output of replacing every match, then that
    /// output is returned.
    pub fn replaced(&self) -> Option<&str> {
        self.replaced.as_deref()
    }

    /// Returns true if this test expects the search to fail.
    pub fn search_error(&self) -> bool {
        self.search_error
    }

    fn expected(&self) -> Expected {
        if let Some(is_match) = self.is_match {
            Expected::YesNo(is_match)
        } else if let Some(full) = self.full_match {
            Expected::Full(full)
        } else if let Some(ref matches) = self.matches {
            Expected::AllStartEnd(matches)
        } else if let Some(ref captures) = self.captures {
            Expected::AllCaptures(captures)
        } else if let Some(ref replaced) = self.replaced {
            Expected::Replaced(replaced)
        } else if self.search_error {
            Expected::SearchError
        } else {
            // Only tests that are expected to not compile have no
            // expectation, and those never get searched.
            Expected::YesNo(false)
        }
    }

    /// Returns the limit on the number of matches that should be reported,
    /// if specified in the test.
    pub fn match_limit(&self) -> Option<usize> {
        self.match_limit
    }

    /// Returns the step limit searches should run with, if any.
    pub fn step_limit(&self) -> Option<u64> {
        self.step_limit
    }

    /// Returns true if the regex in this test is expected to compile.
    pub fn compiles(&self) -> bool {
        self.compiles
    }

    /// Returns true if regex matching should be performed without regard to
    /// case.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns true if `^` and `$` should match at line boundaries.
    pub fn multi_line(&self) -> bool {
        self.multi_line
    }

    /// Returns true if `.` should match `\n`.
    pub fn dot_matches_new_line(&self) -> bool {
        self.dot_matches_new_line
    }

    /// Returns true if `.` should not match NUL.
    pub fn dot_excludes_nul(&self) -> bool {
        self.dot_excludes_nul
    }

    /// Returns true if the start of the input is not a line start.
    pub fn not_bol(&self) -> bool {
        self.not_bol
    }

    /// Returns true if the end of the input is not a line end.
    pub fn not_eol(&self) -> bool {
        self.not_eol
    }
}

/// The result of compiling a regex.
///
/// In many implementations, the act of matching a regex can be separated from
/// the act of compiling a regex. A `CompiledRegex` represents a regex that has
/// been compiled and is ready to be used for matching.
pub struct CompiledRegex {
    match_regex: Option<Box<dyn Fn(&RegexTest) -> Vec<TestResult>>>,
}

impl CompiledRegex {
    /// Provide a closure that represents the compiled regex and executes a
    /// regex match on any `RegexTest`. The `RegexTest` given to the closure
    /// provided is the exact same `RegexTest` that is used to compile this
    /// regex.
    pub fn compiled<F: Fn(&RegexTest) -> Vec<TestResult> + 'static>(
        match_regex: F,
    ) -> CompiledRegex {
        CompiledRegex { match_regex: Some(Box::new(match_regex)) }
    }

    /// Indicate that tests on this regex should be skipped. This typically
    /// occurs if the `RegexTest` requires something that an implementation
    /// does not support.
    pub fn skip() -> CompiledRegex {
        CompiledRegex { match_regex: None }
    }
}

impl std::fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let status = match self.match_regex {
            None => "Skip",
            Some(_) => "Run(...)",
        };
        f.debug_struct("CompiledRegex").field("match_regex", &status).finish()
    }
}

/// The result of executing a single regex search.
///
/// When using the test runner, callers must provide a closure that takes
/// a `RegexTest` and returns `TestResult`s. A `TestResult` captures the
/// results of searching the input with the regex specified by the
/// `RegexTest`.
#[derive(Debug, Clone)]
pub struct TestResult {
    name: String,
    kind: TestResultKind,
}

#[derive(Debug, Clone)]
enum TestResultKind {
    Matched { yes: bool },
    FullMatched { yes: bool },
    MatchedStartEnd { matches: Vec<Match> },
    MatchedCaptures { matches: Vec<Captures> },
    Replaced { output: String },
    SearchError { msg: String },
    Skip,
    /// Occurs when no test result is available. e.g., A regex failed to
    /// compile or something panicked.
    None,
}

impl TestResult {
    /// Create a test result that indicates a match.
    pub fn matched() -> TestResult {
        TestResult::kind(TestResultKind::Matched { yes: true })
    }

    /// Create a test result that indicates the regex did not match.
    pub fn no_match() -> TestResult {
        TestResult::kind(TestResultKind::Matched { yes: false })
    }

    /// Create a test result that indicates whether the regex matched the
    /// whole input.
    pub fn full_match(yes: bool) -> TestResult {
        TestResult::kind(TestResultKind::FullMatched { yes })
    }

    /// Create a test result containing a sequence of all matches in the
    /// test's input string.
    pub fn matches<I: IntoIterator<Item = Match>>(it: I) -> TestResult {
        TestResult::kind(TestResultKind::MatchedStartEnd {
            matches: it.into_iter().collect(),
        })
    }

    /// Create a test result containing a sequence of all capturing matches
    /// in the test's input string.
    pub fn captures<I: IntoIterator<Item = Captures>>(it: I) -> TestResult {
        TestResult::kind(TestResultKind::MatchedCaptures {
            matches: it.into_iter().collect(),
        })
    }

    /// Create a test result containing the output of replacing every match
    /// in the test's input string.
    pub fn replaced(output: String) -> TestResult {
        TestResult::kind(TestResultKind::Replaced { output })
    }

    /// Create a test result that indicates the search failed with the given
    /// message.
    pub fn search_error<E: std::fmt::Display>(err: E) -> TestResult {
        TestResult::kind(TestResultKind::SearchError { msg: err.to_string() })
    }

    /// Indicate that this test should be skipped. It will not be counted as
    /// a failure.
    pub fn skip() -> TestResult {
        TestResult::kind(TestResultKind::Skip)
    }

    /// Indicate that this test has no results.
    pub fn none() -> TestResult {
        TestResult::kind(TestResultKind::None)
    }

    /// Give a name to this test result. This will be included in the output
    /// if the test fails.
    pub fn name(mut self, name: &str) -> TestResult {
        self.name = name.to_string();
        self
    }

    fn kind(kind: TestResultKind) -> TestResult {
        TestResult { name: "".to_string(), kind }
    }
}

/// Runs regex tests and collects a report of their outcomes.
///
/// A runner is meant to be used inside a `#[test]` function: hand it tests
/// with `test_iter` (or `test`), then call `assert`, which panics with every
/// failure if there were any. Failing tests do not stop the run.
///
/// ### Selecting tests
///
/// The `REGEX_TEST` environment variable may hold a comma separated list of
/// name filters. A filter starting with `-` excludes the tests whose full
/// name contains the rest of it. Any other filter includes them. When at
/// least one including filter exists, a test must match one to run. Later
/// filters override earlier ones, so `REGEX_TEST=basic,-basic/3` runs the
/// `basic` group except for its third test.
#[derive(Debug)]
pub struct TestRunner {
    filters: Vec<NameFilter>,
    report: Report,
}

#[derive(Debug)]
struct NameFilter {
    exclude: bool,
    substring: String,
}

impl TestRunner {
    /// Create a new runner, reading its filters from `REGEX_TEST`.
    ///
    /// This fails when `REGEX_TEST` is set but isn't valid UTF-8.
    pub fn new() -> Result<TestRunner> {
        let mut runner =
            TestRunner { filters: vec![], report: Report::default() };
        for filter in read_env(ENV_REGEX_TEST)?.split(',') {
            match filter.trim() {
                "" => {}
                f if f.starts_with('-') => {
                    runner.blacklist(&f[1..]);
                }
                f => {
                    runner.whitelist(f);
                }
            }
        }
        Ok(runner)
    }

    /// Panics with a report of every failure, if there were any.
    ///
    /// When `REGEX_TEST_VERBOSE=1`, the outcome of every test is printed
    /// first.
    pub fn assert(&mut self) {
        self.report.assert();
    }

    /// Run only tests whose full name contains `substring`, unless a later
    /// filter excludes them.
    pub fn whitelist(&mut self, substring: &str) -> &mut TestRunner {
        let substring = substring.to_string();
        self.filters.push(NameFilter { exclude: false, substring });
        self
    }

    /// Skip tests whose full name contains `substring`, unless a later
    /// filter includes them.
    pub fn blacklist(&mut self, substring: &str) -> &mut TestRunner {
        let substring = substring.to_string();
        self.filters.push(NameFilter { exclude: true, substring });
        self
    }

    /// Run every test yielded by `it`. `compile` is called with each test
    /// and its pattern.
    pub fn test_iter<I, T>(
        &mut self,
        it: I,
        mut compile: impl FnMut(
            &RegexTest,
            &str,
        )
            -> Result<CompiledRegex, Box<dyn std::error::Error>>,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<RegexTest>,
    {
        for test in it {
            let test = test.borrow();
            if self.is_filtered_out(test) {
                self.report.skip(test, &TestResult::none());
            } else {
                self.test(test, |pattern| compile(test, pattern));
            }
        }
        self
    }

    /// Run a single test, ignoring the name filters.
    ///
    /// Panics while compiling or searching are caught and reported as
    /// failures of this test.
    pub fn test(
        &mut self,
        test: &RegexTest,
        mut compile: impl FnMut(
            &str,
        )
            -> Result<CompiledRegex, Box<dyn std::error::Error>>,
    ) -> &mut TestRunner {
        let compiled = match catch_panic(|| compile(test.regex())) {
            Err(msg) => {
                let failure = Failure::PanicWhileCompiling(msg);
                self.report.fail(test, &TestResult::skip(), failure);
                return self;
            }
            Ok(Err(_)) if !test.compiles() => {
                self.report.pass(test, &TestResult::none());
                return self;
            }
            Ok(Err(err)) => {
                let failure = Failure::CompileError(err.to_string());
                self.report.fail(test, &TestResult::skip(), failure);
                return self;
            }
            Ok(Ok(compiled)) => compiled,
        };
        if !test.compiles() {
            let failure = Failure::NoCompileError;
            self.report.fail(test, &TestResult::skip(), failure);
            return self;
        }
        let results = match catch_panic(|| test.test(&compiled)) {
            Ok(results) => results,
            Err(msg) => {
                let failure = Failure::PanicWhileSearching(msg);
                self.report.fail(test, &TestResult::skip(), failure);
                return self;
            }
        };
        for result in results.iter() {
            match check(test, result) {
                Ok(true) => self.report.pass(test, result),
                Ok(false) => self.report.skip(test, result),
                Err(failure) => self.report.fail(test, result, failure),
            }
        }
        self
    }

    fn is_filtered_out(&self, test: &RegexTest) -> bool {
        let mut out = self.filters.iter().any(|f| !f.exclude);
        for filter in self.filters.iter() {
            if test.full_name().contains(&filter.substring) {
                out = filter.exclude;
            }
        }
        out
    }
}

/// Compares one result against the expectation of a test. Returns `Ok(true)`
/// when it passes and `Ok(false)` when the result was skipped.
fn check(test: &RegexTest, result: &TestResult) -> Result<bool, Failure> {
    let expected = test.expected();
    let got = match result.kind {
        TestResultKind::None | TestResultKind::Skip => return Ok(false),
        ref got => got,
    };
    match (expected, got) {
        (Expected::SearchError, TestResultKind::SearchError { .. }) => Ok(true),
        (Expected::SearchError, _) => Err(Failure::NoSearchError),
        (_, TestResultKind::SearchError { msg }) => {
            Err(Failure::SearchError(msg.clone()))
        }
        (_, &TestResultKind::Matched { yes }) => {
            if yes == test.is_match() {
                Ok(true)
            } else {
                Err(Failure::IsMatch)
            }
        }
        (Expected::Full(want), &TestResultKind::FullMatched { yes }) => {
            if want == yes {
                Ok(true)
            } else {
                Err(Failure::FullMatch)
            }
        }
        (Expected::AllStartEnd(want), TestResultKind::MatchedStartEnd {
            matches,
        }) => {
            if want == &matches[..] {
                Ok(true)
            } else {
                Err(Failure::StartEnd(matches.clone()))
            }
        }
        (Expected::AllCaptures(want), TestResultKind::MatchedCaptures {
            matches,
        }) => {
            if want == &matches[..] {
                Ok(true)
            } else {
                Err(Failure::Captures(matches.clone()))
            }
        }
        (Expected::AllCaptures(want), TestResultKind::MatchedStartEnd {
            matches,
        }) => {
            let want: Vec<Match> =
                want.iter().filter_map(|c| c.0.get(0).cloned()?).collect();
            if want == *matches {
                Ok(true)
            } else {
                Err(Failure::StartEnd(matches.clone()))
            }
        }
        (Expected::AllStartEnd(want), TestResultKind::MatchedCaptures {
            matches,
        }) => {
            let got: Vec<Match> =
                matches.iter().filter_map(|c| c.0.get(0).cloned()?).collect();
            if want == &got[..] {
                Ok(true)
            } else {
                Err(Failure::StartEnd(got))
            }
        }
        (
            Expected::YesNo(_) | Expected::Full(_),
            TestResultKind::MatchedStartEnd { matches },
        ) => {
            if test.is_match() == !matches.is_empty() {
                Ok(true)
            } else {
                Err(Failure::IsMatch)
            }
        }
        (
            Expected::YesNo(_) | Expected::Full(_),
            TestResultKind::MatchedCaptures { matches },
        ) => {
            if test.is_match() == !matches.is_empty() {
                Ok(true)
            } else {
                Err(Failure::IsMatch)
            }
        }
        (Expected::Replaced(want), TestResultKind::Replaced { output }) => {
            if want == output {
                Ok(true)
            } else {
                Err(Failure::Replaced(output.clone()))
            }
        }
        (expected, got) => Err(Failure::Incompatible {
            expected: expected.description(),
            got: got.description(),
        }),
    }
}

/// Why a test failed.
#[derive(Debug)]
enum Failure {
    /// The regex matched when it shouldn't have, or the other way around.
    IsMatch,
    /// Like `IsMatch`, but for matching the whole input.
    FullMatch,
    /// The spans of all matches differ from the expected ones.
    StartEnd(Vec<Match>),
    /// The capture groups of all matches differ from the expected ones.
    Captures(Vec<Captures>),
    /// Replacing every match produced different output.
    Replaced(String),
    NoCompileError,
    CompileError(String),
    SearchError(String),
    NoSearchError,
    /// The result is of a different kind than what the test expects, for
    /// example a replacement for a test that lists matches.
    Incompatible { expected: &'static str, got: &'static str },
    PanicWhileCompiling(String),
    PanicWhileSearching(String),
}

impl Failure {
    /// Describes this failure for `test` in a line or a few.
    fn describe(&self, test: &RegexTest) -> String {
        match *self {
            Failure::IsMatch if test.is_match() => {
                "expected match, but none found".to_string()
            }
            Failure::IsMatch => {
                "expected no match, but found a match".to_string()
            }
            Failure::FullMatch if test.is_match() => {
                "expected a full match, but found none".to_string()
            }
            Failure::FullMatch => {
                "expected no full match, but found one".to_string()
            }
            Failure::StartEnd(ref got) => format!(
                "wrong matches\nexpected: {:?}\n     got: {:?}",
                test.matches().unwrap_or_default(),
                got,
            ),
            Failure::Captures(ref got) => format!(
                "wrong captures\nexpected: {:?}\n     got: {:?}",
                test.captures().unwrap_or_default(),
                got,
            ),
            Failure::Replaced(ref got) => format!(
                "wrong replacement\nexpected: \"{}\"\n     got: \"{}\"",
                escape::escape(test.replaced().unwrap_or("")),
                escape::escape(got),
            ),
            Failure::NoCompileError => {
                "expected regex to NOT compile, but it did".to_string()
            }
            Failure::CompileError(ref err) => {
                format!("expected regex to compile, failed: {}", err)
            }
            Failure::SearchError(ref msg) => {
                format!("expected search to succeed, failed: {}", msg)
            }
            Failure::NoSearchError => {
                "expected search to fail, but it succeeded".to_string()
            }
            Failure::Incompatible { expected, got } => {
                format!("expected {} results, but got {}", expected, got)
            }
            Failure::PanicWhileCompiling(ref msg) => {
                format!("panicked while compiling:\n{}", msg)
            }
            Failure::PanicWhileSearching(ref msg) => {
                format!("panicked while searching:\n{}", msg)
            }
        }
    }
}

/// The outcome of every result checked by a runner. Tests are identified by
/// their full name, with the result name in parentheses when it has one.
/// Failures are rendered as soon as they are recorded.
#[derive(Debug, Default)]
struct Report {
    passed: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<(String, String)>,
}

impl Report {
    fn pass(&mut self, test: &RegexTest, result: &TestResult) {
        self.passed.push(result_name(test, result));
    }

    fn skip(&mut self, test: &RegexTest, result: &TestResult) {
        self.skipped.push(result_name(test, result));
    }

    fn fail(&mut self, test: &RegexTest, result: &TestResult, why: Failure) {
        let name = result_name(test, result);
        let msg = format!(
            "{}: {}\npattern: {:?}\nsyntax:  {}\ninput:   \"{}\"",
            name,
            why.describe(test),
            test.regex(),
            test.syntax().unwrap_or("default"),
            escape::escape(test.input()),
        );
        self.failed.push((name, msg));
    }

    fn assert(&self) {
        if read_env("REGEX_TEST_VERBOSE").map_or(false, |s| s == "1") {
            self.print_outcomes();
        }
        if self.failed.is_empty() {
            return;
        }
        let rule = "~".repeat(79);
        let msgs: Vec<&str> =
            self.failed.iter().map(|(_, msg)| msg.as_str()).collect();
        panic!(
            "{} tests failed:\n{}\n{}\n{}\n\n\
             Set REGEX_TEST to select tests by name, e.g. REGEX_TEST=foo,-foo2\n\
             runs the tests whose names contain foo but not foo2.\n",
            self.failed.len(),
            rule,
            msgs.join("\n\n"),
            rule,
        )
    }

    fn print_outcomes(&self) {
        let rule = "~".repeat(79);
        println!("{}", rule);
        for name in self.skipped.iter() {
            println!("skip: {}", name);
        }
        for name in self.passed.iter() {
            println!("pass: {}", name);
        }
        for (name, _) in self.failed.iter() {
            println!("FAIL: {}", name);
        }
        println!(
            "\npassed: {}, skipped: {}, failed: {}",
            self.passed.len(),
            self.skipped.len(),
            self.failed.len(),
        );
        println!("{}", rule);
    }
}

fn result_name(test: &RegexTest, result: &TestResult) -> String {
    if result.name.is_empty() {
        test.full_name().to_string()
    } else {
        format!("{} ({})", test.full_name(), result.name)
    }
}

impl<'a> Expected<'a> {
    fn description(&self) -> &'static str {
        match *self {
            Expected::YesNo(_) => "match",
            Expected::Full(_) => "full match",
            Expected::AllStartEnd(_) => "matches",
            Expected::AllCaptures(_) => "captures",
            Expected::Replaced(_) => "replacement",
            Expected::SearchError => "search error",
        }
    }
}

impl TestResultKind {
    fn description(&self) -> &'static str {
        match *self {
            TestResultKind::Matched { .. } => "match",
            TestResultKind::FullMatched { .. } => "full match",
            TestResultKind::MatchedStartEnd { .. } => "matches",
            TestResultKind::MatchedCaptures { .. } => "captures",
            TestResultKind::Replaced { .. } => "replacement",
            TestResultKind::SearchError { .. } => "search error",
            TestResultKind::Skip | TestResultKind::None => "nothing",
        }
    }
}

/// An iterator over regex tests.
#[derive(Debug)]
pub struct RegexTestsIter<'a> {
    it: std::slice::Iter<'a, RegexTest>,
}

impl<'a> Iterator for RegexTestsIter<'a> {
    type Item = &'a RegexTest;

    fn next(&mut self) -> Option<&'a RegexTest> {
        self.it.next()
    }
}

/// A span written as `[start, end]`.
#[derive(Deserialize)]
struct MatchFormat([usize; 2]);

impl From<MatchFormat> for Match {
    fn from(MatchFormat([start, end]): MatchFormat) -> Match {
        Match { start, end }
    }
}

/// The groups of one match, written as a list of spans. TOML has no null,
/// so a group that did not participate is written as `[]`.
#[derive(Deserialize)]
struct CapturesFormat(Vec<GroupFormat>);

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupFormat {
    Unset([usize; 0]),
    Set(MatchFormat),
}

impl From<CapturesFormat> for Captures {
    fn from(CapturesFormat(groups): CapturesFormat) -> Captures {
        Captures::new(groups.into_iter().map(|group| match group {
            GroupFormat::Unset(_) => None,
            GroupFormat::Set(span) => Some(Match::from(span)),
        }))
    }
}

/// Returns the value of `var`, or an empty string when it isn't set.
fn read_env(var: &str) -> Result<String> {
    match std::env::var_os(var) {
        None => Ok(String::new()),
        Some(val) => val.into_string().map_err(|val| {
            anyhow::anyhow!(
                "{} is not valid UTF-8: {:?}",
                var,
                Vec::from_os_str_lossy(&val),
            )
        }),
    }
}

/// Runs `fun`, turning a panic into its message.
fn catch_panic<T>(fun: impl FnOnce() -> T) -> Result<T, String> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(fun)).map_err(
        |payload| match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(msg) => msg.to_string(),
                Err(_) => "<panic with a non-string payload>".to_string(),
            },
        },
    )
}

/// A function to set some boolean fields to a default of 'true'. We use a
/// function so that we can hand a path to it to Serde.
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_no_regex() {
        let data = r#"
[[tests]]
name = "foo"
input = "lib.rs"
match = true
"#;

        let mut tests = RegexTests::new();
        assert!(tests.load_slice("test", data.as_bytes()).is_err());
    }

    #[test]
    fn err_unknown_field() {
        let data = r#"
[[tests]]
name = "foo"
regex = ".*.rs"
input = "lib.rs"
match = true
something = 0
"#;

        let mut tests = RegexTests::new();
        assert!(tests.load_slice("test", data.as_bytes()).is_err());
    }

    #[test]
    fn err_no_expectation() {
        let data = r#"
[[tests]]
name = "foo"
regex = ".*.rs"
input = "lib.rs"
"#;

        let mut tests = RegexTests::new();
        assert!(tests.load_slice("test", data.as_bytes()).is_err());
    }

    #[test]
    fn err_replace_without_replaced() {
        let data = r#"
[[tests]]
name = "foo"
regex = "a"
input = "abc"
replace = "x"
match = true
"#;

        let mut tests = RegexTests::new();
        assert!(tests.load_slice("test", data.as_bytes()).is_err());
    }

    #[test]
    fn err_duplicate_name() {
        let data = r#"
[[tests]]
name = "foo"
regex = "a"
input = "abc"
match = true

[[tests]]
name = "foo"
regex = "b"
input = "abc"
match = true
"#;

        let mut tests = RegexTests::new();
        assert!(tests.load_slice("test", data.as_bytes()).is_err());
    }

    #[test]
    fn load_match() {
        let data = r#"
[[tests]]
name = "foo"
regex = ".*.rs"
input = "lib.rs"
syntax = "posix-basic"
match = true
case_insensitive = true
multi_line = true
not_eol = true
"#;

        let mut tests = RegexTests::new();
        tests.load_slice("test", data.as_bytes()).unwrap();

        let t0 = &tests.tests[0];
        assert_eq!("test", t0.group());
        assert_eq!("foo", t0.name());
        assert_eq!("test/foo", t0.full_name());
        assert_eq!(".*.rs", t0.regex());
        assert_eq!(Some("posix-basic"), t0.syntax());
        assert!(t0.is_match());
        assert!(t0.compiles());
        assert!(t0.case_insensitive());
        assert!(t0.multi_line());
        assert!(!t0.not_bol());
        assert!(t0.not_eol());
        assert_eq!(None, t0.step_limit());
    }

    #[test]
    fn load_matches() {
        let data = r#"
[[tests]]
name = "foo"
regex = ".*.rs"
input = "lib.rs"
matches = [[0, 2], [5, 10]]
"#;

        let mut tests = RegexTests::new();
        tests.load_slice("test", data.as_bytes()).unwrap();

        let t0 = &tests.tests[0];
        assert!(t0.is_match());
        assert_eq!(
            t0.matches(),
            Some(vec![Match { start: 0, end: 2 }, Match { start: 5, end: 10 }])
        );
        assert_eq!(t0.captures(), None);
    }

    #[test]
    fn load_captures() {
        let data = r#"
[[tests]]
name = "foo"
regex = ".*.rs"
input = "lib.rs"
captures = [
  [[0, 15], [5, 10], [], [13, 14]],
  [[20, 30], [22, 24], [25, 27], []],
]
"#;

        let mut tests = RegexTests::new();
        tests.load_slice("test", data.as_bytes()).unwrap();

        let t0 = &tests.tests[0];
        assert!(t0.is_match());
        assert_eq!(
            t0.matches(),
            Some(vec![
                Match { start: 0, end: 15 },
                Match { start: 20, end: 30 },
            ])
        );
        assert_eq!(
            t0.captures(),
            Some(vec![
                Captures::new(vec![
                    Some(Match { start: 0, end: 15 }),
                    Some(Match { start: 5, end: 10 }),
                    None,
                    Some(Match { start: 13, end: 14 }),
                ]),
                Captures::new(vec![
                    Some(Match { start: 20, end: 30 }),
                    Some(Match { start: 22, end: 24 }),
                    Some(Match { start: 25, end: 27 }),
                    None,
                ]),
            ])
        );
    }

    #[test]
    fn load_replaced() {
        let data = r#"
[[tests]]
name = "foo"
regex = 'x*'
input = 'a\tb'
unescape = true
replace = "-"
replaced = "-a-\t-b-"
"#;

        let mut tests = RegexTests::new();
        tests.load_slice("test", data.as_bytes()).unwrap();

        let t0 = &tests.tests[0];
        assert_eq!("a\tb", t0.input());
        assert_eq!(Some("-"), t0.replace());
        assert_eq!(Some("-a-\t-b-"), t0.replaced());
        assert_eq!(None, t0.matches());
    }

    #[test]
    fn load_no_compile() {
        let data = r#"
[[tests]]
name = "foo"
regex = '(a'
compiles = false
"#;

        let mut tests = RegexTests::new();
        tests.load_slice("test", data.as_bytes()).unwrap();
        assert!(!tests.tests[0].compiles());
        assert_eq!("", tests.tests[0].input());
    }
}
