/// An error that occurred while compiling a pattern.
///
/// This error carries the character offset into the pattern at which the
/// problem was detected, the pattern itself and the kind of problem. The
/// `std::fmt::Display` impl produces a human readable message that includes
/// the offset.
///
/// Compilation never silently downgrades a malformed pattern to one that
/// matches nothing. Every construct the active dialect cannot make sense of
/// is reported through this type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
    pattern: String,
}

/// The kind of error that occurred while compiling a pattern.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A group was opened but never closed.
    UnclosedGroup,
    /// A group was closed but never opened, in a dialect where an unmatched
    /// closing delimiter is not a literal.
    UnopenedGroup,
    /// A bracket expression was never closed.
    UnclosedClass,
    /// A named class like `[:alpha:]` was not recognized.
    InvalidClassName {
        /// The name that was given.
        name: String,
    },
    /// A range in a bracket expression whose end comes before its start, in
    /// a dialect where that is not permitted.
    InvalidRange {
        /// The start of the range.
        start: char,
        /// The end of the range.
        end: char,
    },
    /// A repetition whose minimum exceeds its maximum, for example `a{3,1}`.
    InvertedRepetition {
        /// The minimum that was given.
        min: u32,
        /// The maximum that was given.
        max: u32,
    },
    /// A repetition bound was not of the form `{m}`, `{m,}` or `{m,n}`.
    MalformedInterval,
    /// A repetition bound exceeded the maximum supported value.
    RepetitionTooBig {
        /// The bound that was given.
        given: u64,
        /// The largest supported bound.
        limit: u32,
    },
    /// A repetition operator was found with nothing before it to repeat.
    NothingToRepeat,
    /// An escape sequence that the active dialect does not define.
    UnknownEscape {
        /// The escaped character.
        c: char,
    },
    /// A malformed `\xHH` escape.
    InvalidHexEscape,
    /// A back-reference to a group that does not exist when it is used.
    InvalidBackReference {
        /// The group index that was referenced.
        index: usize,
    },
    /// A `(?` construct that the active dialect does not support.
    UnsupportedGroupFlag,
    /// A `(?#` comment that was never closed.
    UnclosedComment,
    /// A pattern that ends in a single backslash.
    TrailingBackslash,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, offset: usize, pattern: &str) -> Error {
        Error { kind, offset, pattern: pattern.to_string() }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the character offset into the pattern at which this error
    /// was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "regex parse error at offset {}: ", self.offset)?;
        match *self.kind() {
            ErrorKind::UnclosedGroup => write!(f, "unclosed group"),
            ErrorKind::UnopenedGroup => {
                write!(f, "unmatched closing group delimiter")
            }
            ErrorKind::UnclosedClass => write!(f, "unclosed bracket expression"),
            ErrorKind::InvalidClassName { ref name } => {
                write!(f, "invalid character class name '{}'", name)
            }
            ErrorKind::InvalidRange { start, end } => write!(
                f,
                "invalid range '{}-{}' (end comes before start)",
                start.escape_debug(),
                end.escape_debug(),
            ),
            ErrorKind::InvertedRepetition { min, max } => write!(
                f,
                "repetition minimum {} exceeds its maximum {}",
                min, max,
            ),
            ErrorKind::MalformedInterval => {
                write!(f, "malformed repetition interval")
            }
            ErrorKind::RepetitionTooBig { given, limit } => write!(
                f,
                "repetition bound {} exceeds the limit of {}",
                given, limit,
            ),
            ErrorKind::NothingToRepeat => {
                write!(f, "repetition operator with nothing to repeat")
            }
            ErrorKind::UnknownEscape { c } => {
                write!(f, "unrecognized escape sequence '\\{}'", c)
            }
            ErrorKind::InvalidHexEscape => {
                write!(f, "invalid hexadecimal escape")
            }
            ErrorKind::InvalidBackReference { index } => write!(
                f,
                "back-reference to group {} which does not exist",
                index,
            ),
            ErrorKind::UnsupportedGroupFlag => {
                write!(f, "unsupported group construct")
            }
            ErrorKind::UnclosedComment => write!(f, "unclosed comment"),
            ErrorKind::TrailingBackslash => {
                write!(f, "pattern ends with a trailing backslash")
            }
        }
    }
}

/// An error that occurred while executing a search.
///
/// The only way a search can fail is by exhausting the step budget set with
/// [`Config::step_limit`](crate::Config::step_limit). Searches without a
/// budget never fail. Not finding a match is not an error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchError {
    /// The search evaluated more tokens than the configured limit allows.
    StepLimitExceeded {
        /// The configured limit.
        limit: u64,
    },
}

impl MatchError {
    pub(crate) fn step_limit_exceeded(limit: u64) -> MatchError {
        MatchError::StepLimitExceeded { limit }
    }
}

impl std::error::Error for MatchError {}

impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            MatchError::StepLimitExceeded { limit } => write!(
                f,
                "search exceeded the step limit of {} token evaluations",
                limit,
            ),
        }
    }
}
