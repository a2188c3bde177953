use crate::{
    compile::ast::Ast,
    token::{Kind, Token, TokenId},
};

/// Options that change how tokens are built, resolved from the syntax and
/// the pattern's configuration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LowerOptions {
    pub(crate) dot_newline: bool,
    pub(crate) dot_nul: bool,
}

/// Lowers a syntax tree into a token arena.
///
/// Chains are built back to front: every tree is lowered with the links its
/// last token must carry, so that each token's successor already exists by
/// the time the token is pushed.
pub(crate) struct Lowerer {
    tokens: Vec<Token>,
    opts: LowerOptions,
}

/// A piece of a flattened concatenation. Runs of adjacent literals are
/// merged into one piece.
enum Piece<'a> {
    Literal(Vec<char>),
    Ast(&'a Ast),
}

impl Lowerer {
    pub(crate) fn new(opts: LowerOptions) -> Lowerer {
        Lowerer { tokens: vec![], opts }
    }

    /// Lowers the top-level tree and returns the arena along with the first
    /// token of the top-level chain.
    pub(crate) fn lower_program(mut self, ast: &Ast) -> (Vec<Token>, TokenId) {
        let start = self.lower(ast, None, None);
        (self.tokens, start)
    }

    /// Lowers `ast` into a chain whose last token carries the given links,
    /// and returns the first token of the chain.
    fn lower(
        &mut self,
        ast: &Ast,
        next: Option<TokenId>,
        uncle: Option<TokenId>,
    ) -> TokenId {
        match *ast {
            Ast::Empty => self.push(Kind::Empty, next, uncle),
            Ast::Literal(c) => {
                self.push(Kind::Literal(vec![c].into_boxed_slice()), next, uncle)
            }
            Ast::Any => {
                let kind = Kind::Any {
                    newline: self.opts.dot_newline,
                    nul: self.opts.dot_nul,
                };
                self.push(kind, next, uncle)
            }
            Ast::Class(ref cls) => self.push(Kind::Class(cls.clone()), next, uncle),
            Ast::Look(look) => self.push(Kind::Look(look), next, uncle),
            Ast::BackRef(index) => self.push(Kind::BackRef(index), next, uncle),
            Ast::Group { index, ref ast } => {
                let end = self.push(Kind::GroupEnd { index }, next, uncle);
                let inner = self.lower(ast, None, Some(end));
                self.push(Kind::Group { index, end }, Some(inner), None)
            }
            Ast::Concat(ref asts) => {
                let mut pieces = vec![];
                flatten(asts, &mut pieces);
                let mut head: Option<TokenId> = None;
                for piece in pieces.iter().rev() {
                    let (n, u) = match head {
                        None => (next, uncle),
                        Some(id) => (Some(id), None),
                    };
                    head = Some(match *piece {
                        Piece::Literal(ref chars) => self.push(
                            Kind::Literal(chars.clone().into_boxed_slice()),
                            n,
                            u,
                        ),
                        Piece::Ast(ast) => self.lower(ast, n, u),
                    });
                }
                match head {
                    Some(head) => head,
                    None => self.push(Kind::Empty, next, uncle),
                }
            }
            Ast::Alternation(ref asts) => {
                let follow = next.or(uncle);
                let branches: Vec<TokenId> =
                    asts.iter().map(|ast| self.lower(ast, None, follow)).collect();
                self.push(Kind::Alternation(branches.into_boxed_slice()), next, uncle)
            }
            Ast::Repeat { ref ast, min, max, greedy } => {
                let inner = self.lower(ast, None, None);
                let min_len = ast.min_len().saturating_mul(min as usize);
                let kind = Kind::Repeat { inner, min, max, greedy, min_len };
                self.push(kind, next, uncle)
            }
            Ast::LookAhead { ref ast, negate } => {
                let inner = self.lower(ast, None, None);
                self.push(Kind::LookAhead { inner, negate }, next, uncle)
            }
        }
    }

    fn push(
        &mut self,
        kind: Kind,
        next: Option<TokenId>,
        uncle: Option<TokenId>,
    ) -> TokenId {
        let id = self.tokens.len();
        self.tokens.push(Token { kind, next, uncle });
        id
    }
}

/// Flattens nested concatenations and merges adjacent literals.
fn flatten<'a>(asts: &'a [Ast], pieces: &mut Vec<Piece<'a>>) {
    for ast in asts.iter() {
        match *ast {
            Ast::Concat(ref inner) => flatten(inner, pieces),
            Ast::Empty => {}
            Ast::Literal(c) => match pieces.last_mut() {
                Some(Piece::Literal(ref mut chars)) => chars.push(c),
                _ => pieces.push(Piece::Literal(vec![c])),
            },
            _ => pieces.push(Piece::Ast(ast)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile::parse::Parser, syntax::Syntax};

    fn lower(pattern: &str) -> (Vec<Token>, TokenId) {
        let (ast, _) = Parser::new(pattern, Syntax::perl5()).parse().unwrap();
        let opts = LowerOptions { dot_newline: false, dot_nul: true };
        Lowerer::new(opts).lower_program(&ast)
    }

    #[test]
    fn literals_are_merged() {
        let (tokens, start) = lower("abc");
        assert_eq!(1, tokens.len());
        match tokens[start].kind {
            Kind::Literal(ref chars) => assert_eq!(&['a', 'b', 'c'][..], &**chars),
            ref kind => panic!("unexpected token {:?}", kind),
        }
        // A repetition binds to the last character only.
        let (tokens, start) = lower("abc*");
        assert_eq!(3, tokens.len());
        match tokens[start].kind {
            Kind::Literal(ref chars) => assert_eq!(&['a', 'b'][..], &**chars),
            ref kind => panic!("unexpected token {:?}", kind),
        }
    }

    #[test]
    fn group_rejoins_through_uncle() {
        let (tokens, start) = lower("(a)b");
        let (index, end) = match tokens[start].kind {
            Kind::Group { index, end } => (index, end),
            ref kind => panic!("unexpected token {:?}", kind),
        };
        assert_eq!(1, index);
        let inner = tokens[start].next.unwrap();
        assert_eq!(None, tokens[inner].next);
        assert_eq!(Some(end), tokens[inner].uncle);
        let b = tokens[end].follow().unwrap();
        assert!(matches!(tokens[b].kind, Kind::Literal(_)));
        assert_eq!(None, tokens[b].follow());
    }

    #[test]
    fn alternation_branches_rejoin() {
        let (tokens, start) = lower("(?:a|)c");
        let branches = match tokens[start].kind {
            Kind::Alternation(ref branches) => branches.clone(),
            ref kind => panic!("unexpected token {:?}", kind),
        };
        let after = tokens[start].next;
        assert!(after.is_some());
        for &branch in branches.iter() {
            assert_eq!(after, tokens[branch].follow());
        }
        assert!(matches!(tokens[branches[1]].kind, Kind::Empty));
    }

    #[test]
    fn repeat_body_is_isolated() {
        let (tokens, start) = lower("(ab)*c");
        let inner = match tokens[start].kind {
            Kind::Repeat { inner, min: 0, max: None, greedy: true, .. } => inner,
            ref kind => panic!("unexpected token {:?}", kind),
        };
        let end = match tokens[inner].kind {
            Kind::Group { end, .. } => end,
            ref kind => panic!("unexpected token {:?}", kind),
        };
        assert_eq!(None, tokens[end].follow());
        assert!(tokens[start].next.is_some());
    }
}
