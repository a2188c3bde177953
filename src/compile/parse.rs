use crate::{
    class::{Class, ClassItem, NamedClass},
    compile::ast::Ast,
    error::{Error, ErrorKind},
    syntax::Syntax,
    token::Look,
};

/// The largest repetition bound that may appear in an interval. This is
/// `RE_DUP_MAX` in POSIX.
pub(crate) const REPEAT_LIMIT: u32 = 0x7FFF;

/// A recursive descent parser from a pattern string to an [`Ast`].
///
/// Which characters are operators, and in what form, is decided entirely by
/// the parser's [`Syntax`]. All offsets reported in errors are character
/// offsets into the pattern.
pub(crate) struct Parser<'a> {
    pattern: &'a str,
    chars: Vec<char>,
    pos: usize,
    syntax: Syntax,
    /// The index given to the next capture group.
    next_group: usize,
    /// The number of groups currently open.
    depth: usize,
}

#[derive(Clone, Copy, Debug)]
enum RepeatOp {
    Star,
    Plus,
    Question,
    Interval,
}

impl RepeatOp {
    /// The character this operator stands for when it ends up being a
    /// literal.
    fn literal(&self) -> char {
        match *self {
            RepeatOp::Star => '*',
            RepeatOp::Plus => '+',
            RepeatOp::Question => '?',
            RepeatOp::Interval => '{',
        }
    }
}

/// One element of a bracket expression before ranges are resolved.
enum ClassAtom {
    Char(char),
    Item(ClassItem),
}

impl<'a> Parser<'a> {
    pub(crate) fn new(pattern: &'a str, syntax: Syntax) -> Parser<'a> {
        Parser {
            pattern,
            chars: pattern.chars().collect(),
            pos: 0,
            syntax,
            next_group: 1,
            depth: 0,
        }
    }

    /// Parses the whole pattern. On success, returns the tree and the number
    /// of groups, including the implicit group 0.
    pub(crate) fn parse(mut self) -> Result<(Ast, usize), Error> {
        let ast = self.parse_alternation()?;
        debug_assert!(self.is_done());
        Ok((ast, self.next_group))
    }

    fn parse_alternation(&mut self) -> Result<Ast, Error> {
        let mut branches = vec![self.parse_concat()?];
        while let Some(len) = self.alternation_len() {
            self.bump(len);
            branches.push(self.parse_concat()?);
        }
        if branches.len() == 1 {
            return Ok(branches.pop().unwrap_or(Ast::Empty));
        }
        Ok(Ast::Alternation(branches))
    }

    fn parse_concat(&mut self) -> Result<Ast, Error> {
        let mut items: Vec<Ast> = vec![];
        while !self.is_done() {
            if self.alternation_len().is_some() {
                break;
            }
            if let Some(len) = self.close_group_len() {
                if self.depth > 0 {
                    break;
                }
                if len == 1 && self.syntax.is_unmatched_right_paren_ord() {
                    self.bump(1);
                    items.push(Ast::Literal(')'));
                    continue;
                }
                return Err(self.error(ErrorKind::UnopenedGroup, self.pos));
            }
            if let Some((op, len)) = self.repeat_op() {
                let op_start = self.pos;
                let last = match items.pop() {
                    Some(last) if last.is_repeatable() => last,
                    last => {
                        items.extend(last);
                        if self.syntax.is_context_indep_ops()
                            || self.syntax.is_context_invalid_ops()
                        {
                            return Err(self.error(
                                ErrorKind::NothingToRepeat,
                                op_start,
                            ));
                        }
                        self.bump(len);
                        items.push(Ast::Literal(op.literal()));
                        continue;
                    }
                };
                self.bump(len);
                let (min, max) = match op {
                    RepeatOp::Star => (0, None),
                    RepeatOp::Plus => (1, None),
                    RepeatOp::Question => (0, Some(1)),
                    RepeatOp::Interval => self.parse_interval(op_start)?,
                };
                let mut greedy = true;
                if self.syntax.is_stingy_ops() && self.peek() == Some('?') {
                    self.bump(1);
                    greedy = false;
                }
                items.push(Ast::Repeat { ast: Box::new(last), min, max, greedy });
                continue;
            }
            let atom = self.parse_atom(items.is_empty())?;
            items.push(atom);
        }
        Ok(match items.len() {
            0 => Ast::Empty,
            1 => items.pop().unwrap_or(Ast::Empty),
            _ => Ast::Concat(items),
        })
    }

    fn parse_atom(&mut self, at_start: bool) -> Result<Ast, Error> {
        if let Some(len) = self.open_group_len() {
            return self.parse_group(len);
        }
        let c = self.chars[self.pos];
        match c {
            '.' => {
                self.bump(1);
                Ok(Ast::Any)
            }
            '[' => self.parse_class(),
            '^' => {
                self.bump(1);
                if at_start || self.syntax.is_context_indep_anchors() {
                    Ok(Ast::Look(Look::LineStart))
                } else {
                    Ok(Ast::Literal('^'))
                }
            }
            '$' => {
                self.bump(1);
                if self.syntax.is_context_indep_anchors() || self.at_end_context()
                {
                    Ok(Ast::Look(Look::LineEnd))
                } else {
                    Ok(Ast::Literal('$'))
                }
            }
            '\\' => self.parse_escape(),
            c => {
                self.bump(1);
                Ok(Ast::Literal(c))
            }
        }
    }

    fn parse_group(&mut self, open_len: usize) -> Result<Ast, Error> {
        let open = self.pos;
        self.bump(open_len);
        let extended = self.syntax.is_pure_grouping()
            || self.syntax.is_lookahead()
            || self.syntax.is_comments();
        if open_len == 1 && extended && self.peek() == Some('?') {
            match self.peek_at(1) {
                Some(':') if self.syntax.is_pure_grouping() => {
                    self.bump(2);
                    return self.parse_group_body(open);
                }
                Some(c @ '=') | Some(c @ '!') if self.syntax.is_lookahead() => {
                    self.bump(2);
                    let ast = self.parse_group_body(open)?;
                    return Ok(Ast::LookAhead {
                        ast: Box::new(ast),
                        negate: c == '!',
                    });
                }
                Some('#') if self.syntax.is_comments() => {
                    self.bump(2);
                    while let Some(c) = self.peek() {
                        self.bump(1);
                        if c == ')' {
                            return Ok(Ast::Empty);
                        }
                    }
                    return Err(self.error(ErrorKind::UnclosedComment, open));
                }
                _ => {
                    return Err(self.error(ErrorKind::UnsupportedGroupFlag, open))
                }
            }
        }
        let index = self.next_group;
        self.next_group += 1;
        let ast = self.parse_group_body(open)?;
        Ok(Ast::Group { index, ast: Box::new(ast) })
    }

    /// Parses the inside of a group whose opening delimiter started at
    /// `open`, along with the closing delimiter.
    fn parse_group_body(&mut self, open: usize) -> Result<Ast, Error> {
        self.depth += 1;
        let ast = self.parse_alternation()?;
        self.depth -= 1;
        match self.close_group_len() {
            Some(len) => {
                self.bump(len);
                Ok(ast)
            }
            None => Err(self.error(ErrorKind::UnclosedGroup, open)),
        }
    }

    fn parse_escape(&mut self) -> Result<Ast, Error> {
        let start = self.pos;
        self.bump(1);
        let c = match self.peek() {
            None => {
                return Err(self.error(ErrorKind::TrailingBackslash, start))
            }
            Some(c) => c,
        };
        self.bump(1);
        let escapes = self.syntax.is_char_class_escapes();
        let ast = match c {
            '1'..='9' if !self.syntax.is_no_bk_refs() => {
                let index = c as usize - '0' as usize;
                if index >= self.next_group {
                    return Err(self.error(
                        ErrorKind::InvalidBackReference { index },
                        start,
                    ));
                }
                Ast::BackRef(index)
            }
            '1'..='9' => Ast::Literal(c),
            'b' => Ast::Look(Look::WordBoundary),
            'B' => Ast::Look(Look::NotWordBoundary),
            '<' => Ast::Look(Look::WordStart),
            '>' => Ast::Look(Look::WordEnd),
            'A' if self.syntax.is_string_anchors() => Ast::Look(Look::TextStart),
            'Z' if self.syntax.is_string_anchors() => Ast::Look(Look::TextEnd),
            'w' | 'W' | 's' | 'S' | 'd' | 'D' if escapes => {
                let (cls, negated) = perl_class(c);
                Ast::Class(Class::named(cls, negated))
            }
            'x' if escapes => Ast::Literal(self.parse_hex(start)?),
            c if escapes && control_escape(c).is_some() => {
                Ast::Literal(control_escape(c).unwrap_or(c))
            }
            c if c.is_alphanumeric() => {
                return Err(self.error(ErrorKind::UnknownEscape { c }, start))
            }
            c => Ast::Literal(c),
        };
        Ok(ast)
    }

    /// Parses the two hex digits following `\x`. `start` is the offset of the
    /// backslash.
    fn parse_hex(&mut self, start: usize) -> Result<char, Error> {
        let digits = (self.peek_at(0), self.peek_at(1));
        let (hi, lo) = match digits {
            (Some(hi), Some(lo)) => (hi.to_digit(16), lo.to_digit(16)),
            _ => (None, None),
        };
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                self.bump(2);
                Ok(char::from((hi * 16 + lo) as u8))
            }
            _ => Err(self.error(ErrorKind::InvalidHexEscape, start)),
        }
    }

    /// Parses the bounds of an interval whose opening delimiter started at
    /// `open` and has already been consumed.
    fn parse_interval(
        &mut self,
        open: usize,
    ) -> Result<(u32, Option<u32>), Error> {
        let min = self.parse_bound()?;
        let max = if self.peek() == Some(',') {
            self.bump(1);
            self.parse_bound()?
        } else {
            match min {
                None => {
                    return Err(self.error(ErrorKind::MalformedInterval, open))
                }
                Some(min) => Some(min),
            }
        };
        let close = if self.syntax.is_no_bk_braces() { "}" } else { "\\}" };
        if !self.is_at(close) {
            return Err(self.error(ErrorKind::MalformedInterval, open));
        }
        self.bump(close.len());
        let min = min.unwrap_or(0);
        if let Some(max) = max {
            if min > max {
                return Err(self.error(
                    ErrorKind::InvertedRepetition { min, max },
                    open,
                ));
            }
        }
        Ok((min, max))
    }

    /// Parses an optional decimal repetition bound.
    fn parse_bound(&mut self) -> Result<Option<u32>, Error> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(u64::from(digit));
            self.bump(1);
        }
        if self.pos == start {
            return Ok(None);
        }
        if value > u64::from(REPEAT_LIMIT) {
            return Err(self.error(
                ErrorKind::RepetitionTooBig { given: value, limit: REPEAT_LIMIT },
                start,
            ));
        }
        Ok(Some(value as u32))
    }

    fn parse_class(&mut self) -> Result<Ast, Error> {
        let open = self.pos;
        self.bump(1);
        let negated = self.peek() == Some('^');
        if negated {
            self.bump(1);
        }
        let mut items = vec![];
        let mut first = true;
        loop {
            let c = match self.peek() {
                None => return Err(self.error(ErrorKind::UnclosedClass, open)),
                Some(c) => c,
            };
            if c == ']' && !first {
                self.bump(1);
                break;
            }
            first = false;
            let lo = match self.parse_class_atom(open)? {
                ClassAtom::Item(item) => {
                    items.push(item);
                    continue;
                }
                ClassAtom::Char(lo) => lo,
            };
            let is_range = self.peek() == Some('-')
                && self.peek_at(1).map_or(false, |c| c != ']');
            if !is_range {
                items.push(ClassItem::Range(lo, lo));
                continue;
            }
            let dash = self.pos;
            self.bump(1);
            match self.parse_class_atom(open)? {
                ClassAtom::Item(item) => {
                    items.push(ClassItem::Range(lo, lo));
                    items.push(ClassItem::Range('-', '-'));
                    items.push(item);
                }
                ClassAtom::Char(hi) if hi < lo => {
                    if self.syntax.is_no_empty_ranges() {
                        return Err(self.error(
                            ErrorKind::InvalidRange { start: lo, end: hi },
                            dash,
                        ));
                    }
                }
                ClassAtom::Char(hi) => items.push(ClassItem::Range(lo, hi)),
            }
        }
        let no_newline = negated && self.syntax.is_hat_lists_not_newline();
        Ok(Ast::Class(Class::new(items, negated).no_newline(no_newline)))
    }

    fn parse_class_atom(&mut self, open: usize) -> Result<ClassAtom, Error> {
        let c = match self.peek() {
            None => return Err(self.error(ErrorKind::UnclosedClass, open)),
            Some(c) => c,
        };
        if c == '[' {
            if let Some(atom) = self.parse_bracketed_name()? {
                return Ok(atom);
            }
        }
        if c == '\\' && self.syntax.is_backslash_escape_in_lists() {
            let start = self.pos;
            let e = match self.peek_at(1) {
                None => {
                    return Err(self.error(ErrorKind::UnclosedClass, open))
                }
                Some(e) => e,
            };
            self.bump(2);
            if self.syntax.is_char_class_esc_in_lists()
                && matches!(e, 'w' | 'W' | 's' | 'S' | 'd' | 'D')
            {
                let (cls, negated) = perl_class(e);
                let item = if negated {
                    ClassItem::NotNamed(cls)
                } else {
                    ClassItem::Named(cls)
                };
                return Ok(ClassAtom::Item(item));
            }
            if self.syntax.is_char_class_escapes() {
                if e == 'x' {
                    return Ok(ClassAtom::Char(self.parse_hex(start)?));
                }
                if let Some(c) = control_escape(e) {
                    return Ok(ClassAtom::Char(c));
                }
            }
            return Ok(ClassAtom::Char(e));
        }
        self.bump(1);
        Ok(ClassAtom::Char(c))
    }

    /// Parses `[:name:]`, `[.c.]` or `[=c=]` at the current position. Returns
    /// `None` (consuming nothing) if the `[` does not start one of them.
    fn parse_bracketed_name(&mut self) -> Result<Option<ClassAtom>, Error> {
        let delim = match self.peek_at(1) {
            Some(':') if self.syntax.is_char_classes() => ':',
            Some(d @ '.') | Some(d @ '=') => d,
            _ => return Ok(None),
        };
        let start = self.pos;
        let body = start + 2;
        let end = match (body..self.chars.len().saturating_sub(1)).find(|&i| {
            self.chars[i] == delim && self.chars[i + 1] == ']'
        }) {
            None => return Ok(None),
            Some(end) => end,
        };
        let name: String = self.chars[body..end].iter().collect();
        if delim == ':' {
            let cls = match NamedClass::from_name(&name) {
                Some(cls) => cls,
                None => {
                    return Err(self.error(
                        ErrorKind::InvalidClassName { name },
                        start,
                    ))
                }
            };
            self.pos = end + 2;
            return Ok(Some(ClassAtom::Item(ClassItem::Named(cls))));
        }
        // Collating elements and equivalence classes are only supported for
        // single characters, where both mean the character itself.
        let mut it = name.chars();
        match (it.next(), it.next()) {
            (Some(c), None) => {
                self.pos = end + 2;
                Ok(Some(ClassAtom::Char(c)))
            }
            _ => Err(self.error(ErrorKind::InvalidClassName { name }, start)),
        }
    }

    /// Returns the length of the alternation operator at the current
    /// position, if there is one.
    fn alternation_len(&self) -> Option<usize> {
        if self.syntax.is_newline_alt() && self.peek() == Some('\n') {
            return Some(1);
        }
        if self.syntax.is_limited_ops() {
            return None;
        }
        let op = if self.syntax.is_no_bk_vbar() { "|" } else { "\\|" };
        if self.is_at(op) {
            Some(op.len())
        } else {
            None
        }
    }

    fn open_group_len(&self) -> Option<usize> {
        let op = if self.syntax.group_needs_backslash() { "\\(" } else { "(" };
        if self.is_at(op) {
            Some(op.len())
        } else {
            None
        }
    }

    fn close_group_len(&self) -> Option<usize> {
        let op = if self.syntax.group_needs_backslash() { "\\)" } else { ")" };
        if self.is_at(op) {
            Some(op.len())
        } else {
            None
        }
    }

    fn repeat_op(&self) -> Option<(RepeatOp, usize)> {
        if self.peek() == Some('*') {
            return Some((RepeatOp::Star, 1));
        }
        if !self.syntax.is_limited_ops() {
            let (plus, question) = if self.syntax.is_bk_plus_qm() {
                ("\\+", "\\?")
            } else {
                ("+", "?")
            };
            if self.is_at(plus) {
                return Some((RepeatOp::Plus, plus.len()));
            }
            if self.is_at(question) {
                return Some((RepeatOp::Question, question.len()));
            }
        }
        if self.syntax.is_intervals() {
            let open = if self.syntax.is_no_bk_braces() { "{" } else { "\\{" };
            if self.is_at(open) {
                return Some((RepeatOp::Interval, open.len()));
            }
        }
        None
    }

    /// Returns true if the current position ends a branch: the end of the
    /// pattern, a closing group delimiter or an alternation operator.
    fn at_end_context(&self) -> bool {
        self.is_done()
            || self.close_group_len().is_some()
            || self.alternation_len().is_some()
    }

    fn is_done(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    /// Returns true if the pattern continues with `s` at the current
    /// position. `s` is always ASCII, so its byte length is its length in
    /// characters.
    fn is_at(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn bump(&mut self, n: usize) {
        self.pos += n;
    }

    fn error(&self, kind: ErrorKind, offset: usize) -> Error {
        Error::new(kind, offset, self.pattern)
    }
}

/// Maps the letter of a Perl class escape to its class and whether it is
/// negated.
fn perl_class(c: char) -> (NamedClass, bool) {
    let cls = match c.to_ascii_lowercase() {
        'w' => NamedClass::Word,
        'd' => NamedClass::Digit,
        _ => NamedClass::Space,
    };
    (cls, c.is_ascii_uppercase())
}

/// Returns the character denoted by a control escape like `\n`.
fn control_escape(c: char) -> Option<char> {
    Some(match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'f' => '\x0C',
        'e' => '\x1B',
        'a' => '\x07',
        '0' => '\0',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str, syntax: Syntax) -> Result<Ast, ErrorKind> {
        Parser::new(pattern, syntax)
            .parse()
            .map(|(ast, _)| ast)
            .map_err(|err| err.kind().clone())
    }

    fn lit(c: char) -> Ast {
        Ast::Literal(c)
    }

    fn cat(asts: Vec<Ast>) -> Ast {
        Ast::Concat(asts)
    }

    fn star(ast: Ast) -> Ast {
        Ast::Repeat { ast: Box::new(ast), min: 0, max: None, greedy: true }
    }

    #[test]
    fn basic_vs_extended_groups() {
        let group = Ast::Group { index: 1, ast: Box::new(lit('a')) };
        assert_eq!(Ok(group.clone()), parse(r"\(a\)", Syntax::posix_basic()));
        assert_eq!(
            Ok(cat(vec![lit('('), lit('a'), lit(')')])),
            parse("(a)", Syntax::posix_basic()),
        );
        assert_eq!(Ok(group), parse("(a)", Syntax::posix_extended()));
    }

    #[test]
    fn plus_and_question_forms() {
        let plus = Ast::Repeat {
            ast: Box::new(lit('a')),
            min: 1,
            max: None,
            greedy: true,
        };
        assert_eq!(Ok(plus.clone()), parse(r"a\+", Syntax::posix_basic()));
        assert_eq!(Ok(plus), parse("a+", Syntax::posix_extended()));
        assert_eq!(
            Ok(cat(vec![lit('a'), lit('+')])),
            parse("a+", Syntax::posix_basic()),
        );
        assert_eq!(
            Ok(cat(vec![lit('a'), lit('+')])),
            parse("a+", Syntax::posix_minimal_basic()),
        );
    }

    #[test]
    fn nothing_to_repeat() {
        assert_eq!(
            Ok(cat(vec![lit('*'), lit('a')])),
            parse("*a", Syntax::posix_basic()),
        );
        assert_eq!(
            Err(ErrorKind::NothingToRepeat),
            parse("*a", Syntax::posix_extended()),
        );
        assert_eq!(Err(ErrorKind::NothingToRepeat), parse("a|?", Syntax::perl5()));
        assert_eq!(
            Ok(cat(vec![Ast::Look(Look::LineStart), lit('*')])),
            parse("^*", Syntax::posix_basic()),
        );
    }

    #[test]
    fn anchors_in_context() {
        assert_eq!(
            Ok(cat(vec![lit('a'), lit('^'), lit('$'), lit('b')])),
            parse("a^$b", Syntax::posix_basic()),
        );
        assert_eq!(
            Ok(cat(vec![
                lit('a'),
                Ast::Look(Look::LineStart),
                Ast::Look(Look::LineEnd),
                lit('b'),
            ])),
            parse("a^$b", Syntax::posix_extended()),
        );
        assert_eq!(
            Ok(Ast::Group {
                index: 1,
                ast: Box::new(cat(vec![
                    Ast::Look(Look::LineStart),
                    lit('a'),
                    Ast::Look(Look::LineEnd),
                ])),
            }),
            parse(r"\(^a$\)", Syntax::posix_basic()),
        );
    }

    #[test]
    fn intervals() {
        let rep = |min, max| Ast::Repeat {
            ast: Box::new(lit('a')),
            min,
            max,
            greedy: true,
        };
        let perl = Syntax::perl5();
        assert_eq!(Ok(rep(2, Some(2))), parse("a{2}", perl));
        assert_eq!(Ok(rep(2, None)), parse("a{2,}", perl));
        assert_eq!(Ok(rep(0, Some(3))), parse("a{,3}", perl));
        assert_eq!(Ok(rep(1, Some(3))), parse(r"a\{1,3\}", Syntax::posix_basic()));
        assert_eq!(
            Err(ErrorKind::InvertedRepetition { min: 3, max: 1 }),
            parse("a{3,1}", perl),
        );
        assert_eq!(Err(ErrorKind::MalformedInterval), parse("a{x}", perl));
        assert_eq!(Err(ErrorKind::MalformedInterval), parse("a{1", perl));
        assert_eq!(
            Err(ErrorKind::RepetitionTooBig { given: 40000, limit: REPEAT_LIMIT }),
            parse("a{40000}", perl),
        );
        // Emacs syntax has no intervals at all.
        assert_eq!(
            Ok(cat(vec![lit('a'), lit('{'), lit('2'), lit('}')])),
            parse(r"a\{2\}", Syntax::emacs()),
        );
    }

    #[test]
    fn lazy_and_stacked() {
        let lazy = Ast::Repeat {
            ast: Box::new(lit('a')),
            min: 0,
            max: None,
            greedy: false,
        };
        assert_eq!(Ok(lazy), parse("a*?", Syntax::perl5()));
        assert_eq!(
            Ok(Ast::Repeat {
                ast: Box::new(star(lit('a'))),
                min: 0,
                max: Some(1),
                greedy: true,
            }),
            parse("a*?", Syntax::posix_extended()),
        );
    }

    #[test]
    fn escapes() {
        let perl = Syntax::perl5();
        assert_eq!(Ok(lit('\t')), parse(r"\t", perl));
        assert_eq!(Ok(lit('A')), parse(r"\x41", perl));
        assert_eq!(Err(ErrorKind::InvalidHexEscape), parse(r"\x4", perl));
        assert_eq!(Ok(lit('.')), parse(r"\.", perl));
        assert_eq!(
            Err(ErrorKind::UnknownEscape { c: 'q' }),
            parse(r"\q", perl),
        );
        assert_eq!(
            Err(ErrorKind::UnknownEscape { c: 'd' }),
            parse(r"\d", Syntax::posix_extended()),
        );
        assert_eq!(Err(ErrorKind::TrailingBackslash), parse("a\\", perl));
        assert_eq!(Ok(Ast::Look(Look::WordStart)), parse(r"\<", perl));
        assert_eq!(
            Ok(Ast::Look(Look::WordBoundary)),
            parse(r"\b", Syntax::posix_basic()),
        );
    }

    #[test]
    fn back_references() {
        let perl = Syntax::perl5();
        assert_eq!(
            Ok(cat(vec![
                Ast::Group { index: 1, ast: Box::new(lit('a')) },
                Ast::BackRef(1),
            ])),
            parse(r"(a)\1", perl),
        );
        assert_eq!(
            Err(ErrorKind::InvalidBackReference { index: 2 }),
            parse(r"(a)\2", perl),
        );
        // Without back-references, an escaped digit is the digit itself.
        assert_eq!(
            Ok(cat(vec![
                Ast::Group { index: 1, ast: Box::new(lit('a')) },
                lit('1'),
            ])),
            parse(r"(a)\1", Syntax::posix_minimal_extended()),
        );
    }

    #[test]
    fn groups() {
        let perl = Syntax::perl5();
        assert_eq!(Err(ErrorKind::UnclosedGroup), parse("(a", perl));
        assert_eq!(Err(ErrorKind::UnopenedGroup), parse("a)", perl));
        assert_eq!(
            Ok(cat(vec![lit('a'), lit(')')])),
            parse("a)", Syntax::posix_extended()),
        );
        assert_eq!(Ok(cat(vec![lit('a'), lit('b')])), parse("(?:ab)", perl));
        assert_eq!(Ok(Ast::Empty), parse("(?#hello)", perl));
        assert_eq!(Err(ErrorKind::UnclosedComment), parse("(?#hello", perl));
        assert_eq!(Err(ErrorKind::UnsupportedGroupFlag), parse("(?i)a", perl));
        assert_eq!(
            Ok(Ast::LookAhead { ast: Box::new(lit('a')), negate: true }),
            parse("(?!a)", perl),
        );
        let (_, groups) =
            Parser::new("(a(b)(?:c)(d))", perl).parse().unwrap();
        assert_eq!(4, groups);
    }

    #[test]
    fn classes() {
        let perl = Syntax::perl5();
        let ext = Syntax::posix_extended();
        let range = |lo, hi| ClassItem::Range(lo, hi);
        assert_eq!(
            Ok(Ast::Class(Class::new(vec![range(']', ']'), range('a', 'c')], false))),
            parse("[]a-c]", ext),
        );
        assert_eq!(
            Ok(Ast::Class(Class::new(vec![range('a', 'a'), range('-', '-')], true))),
            parse("[^a-]", ext),
        );
        assert_eq!(
            Ok(Ast::Class(Class::new(
                vec![ClassItem::Named(NamedClass::Digit), range('x', 'x')],
                false,
            ))),
            parse("[[:digit:]x]", ext),
        );
        assert_eq!(
            Err(ErrorKind::InvalidClassName { name: "digits".to_string() }),
            parse("[[:digits:]]", ext),
        );
        assert_eq!(Err(ErrorKind::UnclosedClass), parse("[abc", ext));
        assert_eq!(
            Err(ErrorKind::InvalidRange { start: 'z', end: 'a' }),
            parse("[z-a]", ext),
        );
        assert_eq!(
            Ok(Ast::Class(Class::new(vec![], false))),
            parse("[z-a]", Syntax::emacs()),
        );
        assert_eq!(
            Ok(Ast::Class(Class::new(
                vec![ClassItem::NotNamed(NamedClass::Digit), range('\n', '\n')],
                false,
            ))),
            parse(r"[\D\n]", perl),
        );
        // Without escapes in lists, a backslash is an ordinary member.
        assert_eq!(
            Ok(Ast::Class(Class::new(vec![range('\\', '\\'), range('n', 'n')], false))),
            parse(r"[\n]", ext),
        );
        assert_eq!(
            Ok(Ast::Class(
                Class::new(vec![range('a', 'a')], true).no_newline(true)
            )),
            parse("[^a]", Syntax::grep()),
        );
    }

    #[test]
    fn alternation_forms() {
        let alt = Ast::Alternation(vec![lit('a'), lit('b')]);
        assert_eq!(Ok(alt.clone()), parse("a|b", Syntax::posix_extended()));
        assert_eq!(Ok(alt.clone()), parse(r"a\|b", Syntax::posix_basic()));
        assert_eq!(Ok(alt), parse("a\nb", Syntax::grep()));
        assert_eq!(
            Ok(cat(vec![lit('a'), lit('|'), lit('b')])),
            parse("a|b", Syntax::posix_basic()),
        );
        assert_eq!(
            Ok(Ast::Alternation(vec![lit('a'), Ast::Empty])),
            parse("a|", Syntax::perl5()),
        );
    }
}
