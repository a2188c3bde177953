use crate::{class::Class, token::Look};

/// The syntax tree of a pattern, as produced by the parser.
///
/// Non-capturing groups and comments do not appear in the tree. The parser
/// returns their contents directly (or `Empty` for a comment).
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Ast {
    Empty,
    Literal(char),
    Any,
    Class(Class),
    Look(Look),
    Group { index: usize, ast: Box<Ast> },
    Concat(Vec<Ast>),
    Alternation(Vec<Ast>),
    Repeat { ast: Box<Ast>, min: u32, max: Option<u32>, greedy: bool },
    BackRef(usize),
    LookAhead { ast: Box<Ast>, negate: bool },
}

impl Ast {
    /// Returns the fewest characters a match of this tree consumes.
    pub(crate) fn min_len(&self) -> usize {
        match *self {
            Ast::Empty | Ast::Look(_) | Ast::BackRef(_) => 0,
            Ast::LookAhead { .. } => 0,
            Ast::Literal(_) | Ast::Any | Ast::Class(_) => 1,
            Ast::Group { ref ast, .. } => ast.min_len(),
            Ast::Concat(ref asts) => {
                asts.iter().fold(0, |sum, ast| sum.saturating_add(ast.min_len()))
            }
            Ast::Alternation(ref asts) => {
                asts.iter().map(|ast| ast.min_len()).min().unwrap_or(0)
            }
            Ast::Repeat { ref ast, min, .. } => {
                ast.min_len().saturating_mul(min as usize)
            }
        }
    }

    /// Returns true if this tree may be the operand of a repetition
    /// operator.
    pub(crate) fn is_repeatable(&self) -> bool {
        !matches!(*self, Ast::Look(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_lengths() {
        let lit = |c| Ast::Literal(c);
        let ast = Ast::Concat(vec![
            lit('a'),
            Ast::Alternation(vec![lit('b'), Ast::Concat(vec![lit('c'), lit('d')])]),
            Ast::Repeat {
                ast: Box::new(lit('e')),
                min: 3,
                max: None,
                greedy: true,
            },
            Ast::BackRef(1),
        ]);
        assert_eq!(5, ast.min_len());
        assert_eq!(0, Ast::Alternation(vec![lit('a'), Ast::Empty]).min_len());
    }
}
