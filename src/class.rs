use crate::util::utf8;

/// A bracket expression or a class escape like `\w`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Class {
    items: Vec<ClassItem>,
    negated: bool,
    /// When set, the class never matches `\n`. Used for negated lists in
    /// dialects with `hat_lists_not_newline`.
    no_newline: bool,
}

/// One member of a class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ClassItem {
    Range(char, char),
    Named(NamedClass),
    NotNamed(NamedClass),
}

/// The POSIX named classes plus `word`, which backs `\w`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NamedClass {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    XDigit,
    Word,
}

impl NamedClass {
    /// Looks up the class for a name used in `[:name:]`.
    pub(crate) fn from_name(name: &str) -> Option<NamedClass> {
        use self::NamedClass::*;

        Some(match name {
            "alnum" => Alnum,
            "alpha" => Alpha,
            "blank" => Blank,
            "cntrl" => Cntrl,
            "digit" => Digit,
            "graph" => Graph,
            "lower" => Lower,
            "print" => Print,
            "punct" => Punct,
            "space" => Space,
            "upper" => Upper,
            "xdigit" => XDigit,
            "word" => Word,
            _ => return None,
        })
    }

    fn name(&self) -> &'static str {
        use self::NamedClass::*;

        match *self {
            Alnum => "alnum",
            Alpha => "alpha",
            Blank => "blank",
            Cntrl => "cntrl",
            Digit => "digit",
            Graph => "graph",
            Lower => "lower",
            Print => "print",
            Punct => "punct",
            Space => "space",
            Upper => "upper",
            XDigit => "xdigit",
            Word => "word",
        }
    }

    fn contains(&self, c: char) -> bool {
        use self::NamedClass::*;

        match *self {
            Alnum => c.is_alphanumeric(),
            Alpha => c.is_alphabetic(),
            Blank => c == ' ' || c == '\t',
            Cntrl => c.is_control(),
            Digit => c.is_ascii_digit(),
            Graph => !c.is_whitespace() && !c.is_control(),
            Lower => c.is_lowercase(),
            Print => !c.is_control(),
            Punct => c.is_ascii_punctuation(),
            Space => c.is_whitespace(),
            Upper => c.is_uppercase(),
            XDigit => c.is_ascii_hexdigit(),
            Word => utf8::is_word_char(c),
        }
    }
}

impl Class {
    pub(crate) fn new(items: Vec<ClassItem>, negated: bool) -> Class {
        Class { items, negated, no_newline: false }
    }

    /// A class consisting of a single named class, as produced by `\w` and
    /// friends. The negated escapes (`\W` and so on) set `negated`.
    pub(crate) fn named(class: NamedClass, negated: bool) -> Class {
        Class::new(vec![ClassItem::Named(class)], negated)
    }

    pub(crate) fn no_newline(mut self, yes: bool) -> Class {
        self.no_newline = yes;
        self
    }

    pub(crate) fn is_match(&self, c: char, case_insensitive: bool) -> bool {
        if self.no_newline && c == '\n' {
            return false;
        }
        let found = if case_insensitive {
            case_variants(c).iter().any(|&v| self.contains(v))
        } else {
            self.contains(c)
        };
        found != self.negated
    }

    fn contains(&self, c: char) -> bool {
        self.items.iter().any(|item| match *item {
            ClassItem::Range(start, end) => start <= c && c <= end,
            ClassItem::Named(ref class) => class.contains(c),
            ClassItem::NotNamed(ref class) => !class.contains(c),
        })
    }
}

impl core::fmt::Display for Class {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[")?;
        if self.negated {
            write!(f, "^")?;
        }
        for item in self.items.iter() {
            match *item {
                ClassItem::Range(start, end) if start == end => {
                    write!(f, "{}", start.escape_debug())?
                }
                ClassItem::Range(start, end) => write!(
                    f,
                    "{}-{}",
                    start.escape_debug(),
                    end.escape_debug()
                )?,
                ClassItem::Named(ref class) => {
                    write!(f, "[:{}:]", class.name())?
                }
                ClassItem::NotNamed(ref class) => {
                    write!(f, "[:^{}:]", class.name())?
                }
            }
        }
        write!(f, "]")
    }
}

/// Returns `c` along with its simple lowercase and uppercase forms. Forms
/// that map to more than one character are left out and replaced by `c`.
pub(crate) fn case_variants(c: char) -> [char; 3] {
    [c, simple(c.to_lowercase()).unwrap_or(c), simple(c.to_uppercase()).unwrap_or(c)]
}

/// Returns true if `a` and `b` are equal when compared without regard to
/// simple case.
pub(crate) fn eq_ignore_case(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    let (va, vb) = (case_variants(a), case_variants(b));
    va[1] == vb[1] || va[2] == vb[2]
}

fn simple<I: Iterator<Item = char>>(mut it: I) -> Option<char> {
    let c = it.next()?;
    match it.next() {
        None => Some(c),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_and_negation() {
        let cls = Class::new(vec![ClassItem::Range('a', 'c')], false);
        assert!(cls.is_match('b', false));
        assert!(!cls.is_match('d', false));
        assert!(!cls.is_match('B', false));
        assert!(cls.is_match('B', true));

        let cls = Class::new(vec![ClassItem::Range('a', 'c')], true);
        assert!(!cls.is_match('a', false));
        assert!(cls.is_match('\n', false));
        assert!(!cls.clone().no_newline(true).is_match('\n', false));
    }

    #[test]
    fn named_classes() {
        let word = Class::named(NamedClass::Word, false);
        assert!(word.is_match('_', false));
        assert!(!word.is_match('-', false));
        let not_digit = Class::named(NamedClass::Digit, true);
        assert!(not_digit.is_match('x', false));
        assert!(!not_digit.is_match('7', false));
        let mixed = Class::new(
            vec![ClassItem::NotNamed(NamedClass::Space), ClassItem::Range('\n', '\n')],
            false,
        );
        assert!(mixed.is_match('a', false));
        assert!(mixed.is_match('\n', false));
        assert!(!mixed.is_match(' ', false));
        assert_eq!(None, NamedClass::from_name("bogus"));
        assert_eq!(Some(NamedClass::XDigit), NamedClass::from_name("xdigit"));
    }

    #[test]
    fn case_folding() {
        assert!(eq_ignore_case('a', 'A'));
        assert!(eq_ignore_case('Σ', 'σ'));
        assert!(!eq_ignore_case('a', 'b'));
        // 'ß' uppercases to "SS", which is not a simple mapping.
        assert!(!eq_ignore_case('ß', 's'));
        let upper = Class::named(NamedClass::Upper, false);
        assert!(upper.is_match('q', true));
        assert!(!upper.is_match('q', false));
    }

    #[test]
    fn display() {
        let cls = Class::new(
            vec![ClassItem::Range('a', 'z'), ClassItem::Named(NamedClass::Digit)],
            true,
        );
        assert_eq!("[^a-z[:digit:]]", cls.to_string());
    }
}
