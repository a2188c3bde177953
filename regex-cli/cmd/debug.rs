use std::io::{stdout, Write};

use crate::{
    config::{self, common, patterns, syntax},
    util::{self, Table},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the compiled form of a pattern.

A table of properties is printed first: how long compilation took, the number
of capture groups (including the implicit group for the whole match) and the
minimum number of characters a match needs. The token program follows, one
token per line. '>' marks the start token, '=>' the token that follows and
'~>' the token control returns to at the end of a group or branch.

USAGE:
    rematch debug [options] <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut patterns = patterns::Config::default();
    let mut syntax = syntax::Config::default();
    config::configure(
        p,
        USAGE,
        &mut [&mut common, &mut syntax, &mut patterns],
    )?;

    let pattern = patterns.get()?;
    let mut table = Table::empty();
    let (re, time) = util::timeitr(|| syntax.build(pattern))?;
    table.add("compile time", time);
    table.add("syntax", re.syntax());
    table.add("groups", re.group_len());
    table.add("minimum length", re.min_len());
    table.print(stdout())?;
    if !common.quiet {
        writeln!(stdout(), "\n{:?}", re)?;
    }
    Ok(())
}
