/*!
Compilation of a pattern string into a [`Program`].

Compilation happens in two passes. The [`parse`] pass turns the pattern into
an [`Ast`](ast::Ast) according to a [`Syntax`]. The [`lower`] pass turns the
tree into a token arena, merging runs of literal characters and resolving
dialect flags that only matter once, such as what `.` matches.
*/

use crate::{
    error::Error,
    syntax::Syntax,
    token::Program,
};

use self::{
    lower::{LowerOptions, Lowerer},
    parse::Parser,
};

mod ast;
mod lower;
mod parse;

/// The compile-time options of a pattern.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Flags {
    pub(crate) case_insensitive: bool,
    pub(crate) multi_line: bool,
    pub(crate) dot_matches_new_line: bool,
    pub(crate) dot_excludes_nul: bool,
}

/// Compiles a pattern into a program.
pub(crate) fn compile(
    pattern: &str,
    syntax: Syntax,
    flags: Flags,
) -> Result<Program, Error> {
    let (ast, group_len) = Parser::new(pattern, syntax).parse()?;
    let opts = LowerOptions {
        dot_newline: syntax.is_dot_newline() || flags.dot_matches_new_line,
        dot_nul: !(syntax.is_dot_not_null() || flags.dot_excludes_nul),
    };
    let (tokens, start) = Lowerer::new(opts).lower_program(&ast);
    let prog = Program {
        tokens,
        start,
        group_len,
        min_len: ast.min_len(),
        case_insensitive: flags.case_insensitive,
        multi_line: flags.multi_line,
    };
    debug!(
        "compiled {:?} into {} tokens with {} groups (minimum length {})",
        pattern,
        prog.tokens.len(),
        prog.group_len,
        prog.min_len,
    );
    Ok(prog)
}
