/*!
The compiled form of a pattern: tokens stored in an arena.

A [`Program`] is a flat vector of [`Token`]s. Each token refers to the token
that follows it by index through its `next` link. A token at the end of a
nested chain (the body of a group or an alternation branch) has no `next`
but has an `uncle` link to where matching resumes in the enclosing chain.
The bodies of repetitions and look-aheads are chains of their own with no
outgoing links at all, so the matcher can run them in isolation.

Since tokens are only ever linked to tokens created before them, the links
form a DAG. The arena is never modified after compilation.
*/

use crate::class::Class;

/// The index of a token in a program's arena.
pub(crate) type TokenId = usize;

/// A compiled pattern.
#[derive(Clone)]
pub(crate) struct Program {
    pub(crate) tokens: Vec<Token>,
    /// The first token of the top-level chain.
    pub(crate) start: TokenId,
    /// The number of groups, including the implicit group 0.
    pub(crate) group_len: usize,
    /// The fewest characters any match can consume.
    pub(crate) min_len: usize,
    pub(crate) case_insensitive: bool,
    pub(crate) multi_line: bool,
}

impl Program {
    /// Returns the literal the top-level chain starts with, if it starts with
    /// one and matching is case sensitive.
    pub(crate) fn literal_prefix(&self) -> Option<&[char]> {
        if self.case_insensitive {
            return None;
        }
        match self.tokens[self.start].kind {
            Kind::Literal(ref chars) => Some(chars),
            _ => None,
        }
    }
}

/// One compiled unit of a pattern along with its links.
#[derive(Clone)]
pub(crate) struct Token {
    pub(crate) kind: Kind,
    pub(crate) next: Option<TokenId>,
    pub(crate) uncle: Option<TokenId>,
}

impl Token {
    /// Where matching continues after this token succeeds. `None` means the
    /// end of the chain has been reached.
    #[inline]
    pub(crate) fn follow(&self) -> Option<TokenId> {
        self.next.or(self.uncle)
    }
}

#[derive(Clone)]
pub(crate) enum Kind {
    /// Matches the empty string.
    Empty,
    /// A run of literal characters.
    Literal(Box<[char]>),
    /// The `.` operator. `newline` and `nul` say whether `\n` and NUL are
    /// matched.
    Any { newline: bool, nul: bool },
    Class(Class),
    Look(Look),
    /// Opens a capture group. The group's body starts at `next`, and `end`
    /// is the `GroupEnd` token the body rejoins.
    Group { index: usize, end: TokenId },
    GroupEnd { index: usize },
    /// Branches, tried in order. Each branch's chain rejoins this token's
    /// continuation through its uncle links.
    Alternation(Box<[TokenId]>),
    Repeat {
        inner: TokenId,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        /// The fewest characters the whole repetition consumes.
        min_len: usize,
    },
    BackRef(usize),
    LookAhead { inner: TokenId, negate: bool },
}

/// A zero-width assertion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Look {
    /// `^`
    LineStart,
    /// `$`
    LineEnd,
    /// `\A`
    TextStart,
    /// `\Z`
    TextEnd,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
    /// `\<`
    WordStart,
    /// `\>`
    WordEnd,
}

impl core::fmt::Debug for Program {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "rematch::Program(")?;
        for (id, token) in self.tokens.iter().enumerate() {
            let status = if id == self.start { '>' } else { ' ' };
            write!(f, "{}{:06?}: {:?}", status, id, token.kind)?;
            match (token.next, token.uncle) {
                (Some(next), _) => writeln!(f, " => {:?}", next)?,
                (None, Some(uncle)) => writeln!(f, " ~> {:?}", uncle)?,
                (None, None) => writeln!(f, " => MATCH")?,
            }
        }
        writeln!(f)?;
        writeln!(f, "groups: {:?}", self.group_len)?;
        writeln!(f, "minimum length: {:?}", self.min_len)?;
        writeln!(f, ")")?;
        Ok(())
    }
}

impl core::fmt::Debug for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Kind::Empty => write!(f, "empty"),
            Kind::Literal(ref chars) => {
                let s: String = chars.iter().collect();
                write!(f, "literal({:?})", s)
            }
            Kind::Any { newline, nul } => {
                write!(f, "any(newline={:?}, nul={:?})", newline, nul)
            }
            Kind::Class(ref cls) => write!(f, "class({})", cls),
            Kind::Look(look) => write!(f, "{:?}", look),
            Kind::Group { index, end } => {
                write!(f, "group(index={:?}, end={:?})", index, end)
            }
            Kind::GroupEnd { index } => write!(f, "group-end({:?})", index),
            Kind::Alternation(ref branches) => {
                let alts = branches
                    .iter()
                    .map(|id| format!("{:?}", id))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "alternation({})", alts)
            }
            Kind::Repeat { inner, min, max, greedy, min_len } => {
                let max = match max {
                    None => "inf".to_string(),
                    Some(max) => max.to_string(),
                };
                let mode = if greedy { "greedy" } else { "lazy" };
                write!(
                    f,
                    "repeat({}, {}..={}, inner={:?}, min_len={:?})",
                    mode, min, max, inner, min_len,
                )
            }
            Kind::BackRef(index) => write!(f, "backref({:?})", index),
            Kind::LookAhead { inner, negate } => {
                let op = if negate { "!" } else { "=" };
                write!(f, "lookahead({}, inner={:?})", op, inner)
            }
        }
    }
}
