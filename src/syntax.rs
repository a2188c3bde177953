/*!
Syntax descriptors select the regex dialect a pattern is written in.

A [`Syntax`] is a flat set of capabilities. Each capability toggles how the
compiler treats one family of constructs: whether grouping requires a
backslash, whether `+` is an operator, whether `{m,n}` bounds exist and so on.
The capability names follow GNU regex's `RE_*` syntax bits, which makes it
straightforward to describe the classic POSIX and GNU dialects. A few more
capabilities cover the Perl-like dialects: lazy quantifiers, `(?:...)`,
look-ahead and the `\w`/`\d`/`\s` escapes.

Most callers want one of the predefined dialects, for example
[`Syntax::posix_extended`] or [`Syntax::perl5`]. A dialect can then be tweaked
further since every setter consumes and returns the descriptor:

```
use rematch::Syntax;

let syntax = Syntax::posix_basic().stingy_ops(true);
assert!(syntax.is_bk_plus_qm());
assert!(syntax.is_stingy_ops());
```
*/

/// An immutable set of dialect capabilities.
///
/// The default syntax is [`Syntax::perl5`].
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Syntax {
    bools: u32,
}

impl Syntax {
    /// Returns a syntax with every capability disabled.
    ///
    /// This corresponds to the classic Emacs dialect: grouping, alternation
    /// and back-references all require a backslash, and neither intervals
    /// nor character classes are recognized.
    pub const fn empty() -> Syntax {
        Syntax { bools: 0 }
    }

    define_bool!(
        /// When enabled, a backslash inside a bracket expression quotes the
        /// following character.
        0, is_backslash_escape_in_lists, backslash_escape_in_lists
    );
    define_bool!(
        /// When enabled, `\+` and `\?` are repetition operators while `+` and
        /// `?` are literals. Otherwise it is the other way around.
        1, is_bk_plus_qm, bk_plus_qm
    );
    define_bool!(
        /// When enabled, named classes like `[:alpha:]` are recognized inside
        /// bracket expressions.
        2, is_char_classes, char_classes
    );
    define_bool!(
        /// When enabled, `^` and `$` are anchors anywhere in a pattern.
        /// Otherwise they are only anchors at the start (respectively, end)
        /// of a pattern, group or alternation branch and are literals
        /// elsewhere.
        3, is_context_indep_anchors, context_indep_anchors
    );
    define_bool!(
        /// When enabled, repetition operators are always operators. A
        /// repetition operator with nothing to repeat is then an error.
        4, is_context_indep_ops, context_indep_ops
    );
    define_bool!(
        /// When enabled, a repetition operator with nothing to repeat is an
        /// error.
        5, is_context_invalid_ops, context_invalid_ops
    );
    define_bool!(
        /// When enabled, `.` matches `\n`.
        6, is_dot_newline, dot_newline
    );
    define_bool!(
        /// When enabled, `.` does not match NUL.
        7, is_dot_not_null, dot_not_null
    );
    define_bool!(
        /// When enabled, bounded repetitions like `{m,n}` are supported.
        8, is_intervals, intervals
    );
    define_bool!(
        /// When enabled, `+`, `?` and `|` are not operators in any form.
        9, is_limited_ops, limited_ops
    );
    define_bool!(
        /// When enabled, a newline in a pattern acts as alternation.
        10, is_newline_alt, newline_alt
    );
    define_bool!(
        /// When enabled, intervals are written `{m,n}` instead of `\{m,n\}`.
        11, is_no_bk_braces, no_bk_braces
    );
    define_bool!(
        /// When enabled, groups are written `(...)` instead of `\(...\)`.
        12, is_no_bk_parens, no_bk_parens
    );
    define_bool!(
        /// When enabled, `\1` through `\9` are not back-references.
        13, is_no_bk_refs, no_bk_refs
    );
    define_bool!(
        /// When enabled, alternation is written `|` instead of `\|`.
        14, is_no_bk_vbar, no_bk_vbar
    );
    define_bool!(
        /// When enabled, a range whose end comes before its start, like
        /// `[z-a]`, is an error. Otherwise it is an empty range.
        15, is_no_empty_ranges, no_empty_ranges
    );
    define_bool!(
        /// When enabled, a closing group delimiter without a matching opening
        /// delimiter is a literal.
        16, is_unmatched_right_paren_ord, unmatched_right_paren_ord
    );
    define_bool!(
        /// When enabled, a negated bracket expression never matches `\n`.
        17, is_hat_lists_not_newline, hat_lists_not_newline
    );
    define_bool!(
        /// When enabled, a `?` following a repetition operator makes it lazy.
        18, is_stingy_ops, stingy_ops
    );
    define_bool!(
        /// When enabled, the Perl escapes `\w`, `\W`, `\s`, `\S`, `\d` and
        /// `\D` are recognized, along with the character escapes `\n`, `\t`,
        /// `\r`, `\f`, `\e`, `\a`, `\0` and `\xHH`.
        19, is_char_class_escapes, char_class_escapes
    );
    define_bool!(
        /// When enabled, `(?:...)` is a non-capturing group.
        20, is_pure_grouping, pure_grouping
    );
    define_bool!(
        /// When enabled, `(?=...)` and `(?!...)` are look-ahead assertions.
        21, is_lookahead, lookahead
    );
    define_bool!(
        /// When enabled, `\A` and `\Z` match at the start and end of the
        /// text regardless of multi-line mode.
        22, is_string_anchors, string_anchors
    );
    define_bool!(
        /// When enabled, `(?#...)` is a comment.
        23, is_comments, comments
    );
    define_bool!(
        /// When enabled, the Perl class escapes are also recognized inside
        /// bracket expressions. This requires `backslash_escape_in_lists`.
        24, is_char_class_esc_in_lists, char_class_esc_in_lists
    );

    const fn with(self, bits: u32) -> Syntax {
        Syntax { bools: self.bools | bits }
    }

    const POSIX_COMMON: u32 = bit::CHAR_CLASSES
        | bit::DOT_NEWLINE
        | bit::DOT_NOT_NULL
        | bit::INTERVALS
        | bit::NO_EMPTY_RANGES;

    /// The GNU Emacs dialect. No capability is enabled.
    pub const fn emacs() -> Syntax {
        Syntax::empty()
    }

    /// The traditional awk dialect.
    pub const fn awk() -> Syntax {
        Syntax::empty().with(
            bit::BACKSLASH_ESCAPE_IN_LISTS
                | bit::DOT_NOT_NULL
                | bit::NO_BK_PARENS
                | bit::NO_BK_REFS
                | bit::NO_BK_VBAR
                | bit::NO_EMPTY_RANGES
                | bit::DOT_NEWLINE
                | bit::CONTEXT_INDEP_ANCHORS
                | bit::UNMATCHED_RIGHT_PAREN_ORD,
        )
    }

    /// The traditional grep dialect.
    pub const fn grep() -> Syntax {
        Syntax::empty().with(
            bit::BK_PLUS_QM
                | bit::CHAR_CLASSES
                | bit::HAT_LISTS_NOT_NEWLINE
                | bit::INTERVALS
                | bit::NEWLINE_ALT,
        )
    }

    /// The traditional egrep dialect.
    pub const fn egrep() -> Syntax {
        Syntax::empty().with(
            bit::CHAR_CLASSES
                | bit::CONTEXT_INDEP_ANCHORS
                | bit::CONTEXT_INDEP_OPS
                | bit::HAT_LISTS_NOT_NEWLINE
                | bit::NEWLINE_ALT
                | bit::NO_BK_PARENS
                | bit::NO_BK_VBAR,
        )
    }

    /// The POSIX egrep dialect, which adds intervals to egrep.
    pub const fn posix_egrep() -> Syntax {
        Syntax::egrep().with(bit::INTERVALS | bit::NO_BK_BRACES)
    }

    /// POSIX basic regular expressions, as used by `ed` and `sed`.
    pub const fn posix_basic() -> Syntax {
        Syntax::empty().with(Syntax::POSIX_COMMON | bit::BK_PLUS_QM)
    }

    /// A minimal variant of POSIX basic syntax without `+`, `?` or `|`.
    pub const fn posix_minimal_basic() -> Syntax {
        Syntax::empty().with(Syntax::POSIX_COMMON | bit::LIMITED_OPS)
    }

    /// POSIX extended regular expressions.
    pub const fn posix_extended() -> Syntax {
        Syntax::empty().with(
            Syntax::POSIX_COMMON
                | bit::CONTEXT_INDEP_ANCHORS
                | bit::CONTEXT_INDEP_OPS
                | bit::NO_BK_BRACES
                | bit::NO_BK_PARENS
                | bit::NO_BK_VBAR
                | bit::UNMATCHED_RIGHT_PAREN_ORD,
        )
    }

    /// A minimal variant of POSIX extended syntax without back-references
    /// where misplaced repetition operators are errors.
    pub const fn posix_minimal_extended() -> Syntax {
        Syntax::empty().with(
            Syntax::POSIX_COMMON
                | bit::CONTEXT_INDEP_ANCHORS
                | bit::CONTEXT_INVALID_OPS
                | bit::NO_BK_BRACES
                | bit::NO_BK_PARENS
                | bit::NO_BK_REFS
                | bit::NO_BK_VBAR
                | bit::UNMATCHED_RIGHT_PAREN_ORD,
        )
    }

    /// The POSIX awk dialect: POSIX extended with escapes in lists.
    pub const fn posix_awk() -> Syntax {
        Syntax::posix_extended().with(bit::BACKSLASH_ESCAPE_IN_LISTS)
    }

    /// The `ed` dialect, which is POSIX basic syntax.
    pub const fn ed() -> Syntax {
        Syntax::posix_basic()
    }

    /// The `sed` dialect, which is POSIX basic syntax.
    pub const fn sed() -> Syntax {
        Syntax::posix_basic()
    }

    /// A Perl 4 like dialect.
    pub const fn perl4() -> Syntax {
        Syntax::empty().with(
            bit::BACKSLASH_ESCAPE_IN_LISTS
                | bit::CONTEXT_INDEP_ANCHORS
                | bit::CONTEXT_INDEP_OPS
                | bit::INTERVALS
                | bit::NO_BK_BRACES
                | bit::NO_BK_PARENS
                | bit::NO_BK_VBAR
                | bit::NO_EMPTY_RANGES
                | bit::CHAR_CLASS_ESCAPES
                | bit::STRING_ANCHORS,
        )
    }

    /// Perl 4 syntax where `.` also matches `\n` (as with Perl's `/s`).
    pub const fn perl4_s() -> Syntax {
        Syntax::perl4().with(bit::DOT_NEWLINE)
    }

    /// A Perl 5 like dialect. This adds lazy quantifiers, non-capturing
    /// groups, look-ahead and comments to Perl 4.
    ///
    /// This is the default syntax.
    pub const fn perl5() -> Syntax {
        Syntax::perl4().with(
            bit::PURE_GROUPING
                | bit::STINGY_OPS
                | bit::LOOKAHEAD
                | bit::COMMENTS
                | bit::CHAR_CLASS_ESC_IN_LISTS,
        )
    }

    /// Perl 5 syntax where `.` also matches `\n` (as with Perl's `/s`).
    pub const fn perl5_s() -> Syntax {
        Syntax::perl5().with(bit::DOT_NEWLINE)
    }

    /// Returns true when a group is opened with `(` rather than `\(`.
    pub(crate) fn group_needs_backslash(&self) -> bool {
        !self.is_no_bk_parens()
    }
}

impl Default for Syntax {
    fn default() -> Syntax {
        Syntax::perl5()
    }
}

impl core::fmt::Debug for Syntax {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        for &(name, bit) in bit::NAMES.iter() {
            if self.bools & bit != 0 {
                set.entry(&format_args!("{}", name));
            }
        }
        set.finish()
    }
}

impl core::str::FromStr for Syntax {
    type Err = UnknownSyntax;

    /// Parses the name of a predefined dialect. Names are matched without
    /// regard to case, and `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Syntax, UnknownSyntax> {
        let name = s.to_ascii_lowercase().replace('-', "_");
        let syntax = match &*name {
            "emacs" => Syntax::emacs(),
            "awk" => Syntax::awk(),
            "grep" => Syntax::grep(),
            "egrep" => Syntax::egrep(),
            "posix_awk" => Syntax::posix_awk(),
            "posix_egrep" => Syntax::posix_egrep(),
            "posix_basic" => Syntax::posix_basic(),
            "posix_minimal_basic" => Syntax::posix_minimal_basic(),
            "posix_extended" => Syntax::posix_extended(),
            "posix_minimal_extended" => Syntax::posix_minimal_extended(),
            "ed" => Syntax::ed(),
            "sed" => Syntax::sed(),
            "perl4" => Syntax::perl4(),
            "perl4_s" => Syntax::perl4_s(),
            "perl5" => Syntax::perl5(),
            "perl5_s" => Syntax::perl5_s(),
            _ => return Err(UnknownSyntax { name: s.to_string() }),
        };
        Ok(syntax)
    }
}

/// The error returned when parsing the name of an unknown dialect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownSyntax {
    name: String,
}

impl std::error::Error for UnknownSyntax {}

impl core::fmt::Display for UnknownSyntax {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "unrecognized syntax '{}', expected one of: {}",
            self.name,
            DIALECTS.join(", "),
        )
    }
}

/// The names of every predefined dialect.
pub const DIALECTS: &[&str] = &[
    "emacs",
    "awk",
    "grep",
    "egrep",
    "posix-awk",
    "posix-egrep",
    "posix-basic",
    "posix-minimal-basic",
    "posix-extended",
    "posix-minimal-extended",
    "ed",
    "sed",
    "perl4",
    "perl4-s",
    "perl5",
    "perl5-s",
];

mod bit {
    pub const BACKSLASH_ESCAPE_IN_LISTS: u32 = 1 << 0;
    pub const BK_PLUS_QM: u32 = 1 << 1;
    pub const CHAR_CLASSES: u32 = 1 << 2;
    pub const CONTEXT_INDEP_ANCHORS: u32 = 1 << 3;
    pub const CONTEXT_INDEP_OPS: u32 = 1 << 4;
    pub const CONTEXT_INVALID_OPS: u32 = 1 << 5;
    pub const DOT_NEWLINE: u32 = 1 << 6;
    pub const DOT_NOT_NULL: u32 = 1 << 7;
    pub const INTERVALS: u32 = 1 << 8;
    pub const LIMITED_OPS: u32 = 1 << 9;
    pub const NEWLINE_ALT: u32 = 1 << 10;
    pub const NO_BK_BRACES: u32 = 1 << 11;
    pub const NO_BK_PARENS: u32 = 1 << 12;
    pub const NO_BK_REFS: u32 = 1 << 13;
    pub const NO_BK_VBAR: u32 = 1 << 14;
    pub const NO_EMPTY_RANGES: u32 = 1 << 15;
    pub const UNMATCHED_RIGHT_PAREN_ORD: u32 = 1 << 16;
    pub const HAT_LISTS_NOT_NEWLINE: u32 = 1 << 17;
    pub const STINGY_OPS: u32 = 1 << 18;
    pub const CHAR_CLASS_ESCAPES: u32 = 1 << 19;
    pub const PURE_GROUPING: u32 = 1 << 20;
    pub const LOOKAHEAD: u32 = 1 << 21;
    pub const STRING_ANCHORS: u32 = 1 << 22;
    pub const COMMENTS: u32 = 1 << 23;
    pub const CHAR_CLASS_ESC_IN_LISTS: u32 = 1 << 24;

    pub const NAMES: &[(&str, u32)] = &[
        ("backslash_escape_in_lists", BACKSLASH_ESCAPE_IN_LISTS),
        ("bk_plus_qm", BK_PLUS_QM),
        ("char_classes", CHAR_CLASSES),
        ("context_indep_anchors", CONTEXT_INDEP_ANCHORS),
        ("context_indep_ops", CONTEXT_INDEP_OPS),
        ("context_invalid_ops", CONTEXT_INVALID_OPS),
        ("dot_newline", DOT_NEWLINE),
        ("dot_not_null", DOT_NOT_NULL),
        ("intervals", INTERVALS),
        ("limited_ops", LIMITED_OPS),
        ("newline_alt", NEWLINE_ALT),
        ("no_bk_braces", NO_BK_BRACES),
        ("no_bk_parens", NO_BK_PARENS),
        ("no_bk_refs", NO_BK_REFS),
        ("no_bk_vbar", NO_BK_VBAR),
        ("no_empty_ranges", NO_EMPTY_RANGES),
        ("unmatched_right_paren_ord", UNMATCHED_RIGHT_PAREN_ORD),
        ("hat_lists_not_newline", HAT_LISTS_NOT_NEWLINE),
        ("stingy_ops", STINGY_OPS),
        ("char_class_escapes", CHAR_CLASS_ESCAPES),
        ("pure_grouping", PURE_GROUPING),
        ("lookahead", LOOKAHEAD),
        ("string_anchors", STRING_ANCHORS),
        ("comments", COMMENTS),
        ("char_class_esc_in_lists", CHAR_CLASS_ESC_IN_LISTS),
    ];
}
