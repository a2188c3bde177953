/*!
A backtracking regular expression engine with selectable dialects.

This crate compiles patterns written in one of several classic regex
dialects (the POSIX basic and extended syntaxes, GNU grep, egrep, awk, sed,
Emacs and Perl-like syntaxes) into a linked token program, and runs that
program with a backtracking matcher. It supports features that automata
based engines cannot, such as back-references and look-ahead, at the cost of
worst case exponential search time. A [step limit](Config::step_limit)
bounds that cost when patterns come from untrusted sources.

# Overview

* [`Pattern`] is the compiled form of a pattern. It finds matches, checks
whole-text matches, iterates over all matches and substitutes them.
* [`Syntax`] selects the dialect a pattern is written in.
* [`Builder`] and [`Config`] set compile and search options, such as case
insensitivity or multi-line anchors.
* [`Captures`] reports the spans and text of capture groups.
* [`Template`] is a replacement string where `$0` through `$9` stand for
capture groups.
* [`SubstitutionFilter`] substitutes matches in a reader as it is read.
* The [`source`] module provides the character sources searches run over:
in-memory buffers and forward-only streams.

All offsets reported by this crate count characters, not bytes.

# Example

```
use rematch::{Pattern, Syntax};

// POSIX basic syntax needs backslashes for grouping and intervals.
let re = Pattern::builder()
    .syntax(Syntax::posix_basic())
    .build(r"\([a-z]\+\)-\1")?;
assert!(re.is_match("xx abab-ab yy"));

// The same thing in the default Perl-like syntax.
let re = Pattern::new(r"([a-z]+)-\1")?;
let caps = re.find("xx abab-ab yy").unwrap();
assert_eq!(Some("ab-ab"), caps.as_str(0));
assert_eq!(Some("ab"), caps.as_str(1));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages about
pattern compilation and search. This is mostly useful for debugging the
matcher itself.
*/

#![warn(missing_debug_implementations)]

pub use crate::{
    error::{Error, ErrorKind, MatchError},
    filter::SubstitutionFilter,
    pattern::{Builder, CapturesMatches, Config, FindMatches, Pattern},
    replace::Template,
    syntax::{Syntax, UnknownSyntax},
    util::{
        captures::{Captures, GroupSpans},
        search::{Match, Span},
    },
};

#[macro_use]
mod macros;

mod backtrack;
mod class;
mod compile;
mod error;
mod filter;
mod literal;
mod pattern;
mod replace;
pub mod source;
mod state;
mod syntax;
mod token;
pub mod util;
