use std::io::{self, Write};

use {anyhow::Context, rematch::SubstitutionFilter};

use crate::config::{self, common, input, patterns, syntax};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Substitutes every match of a pattern in a file, or stdin when no path is
given, and writes the result to stdout.

In the template, $0 stands for the whole match and $1 through $9 for capture
groups. Groups that did not participate expand to nothing. Any other $ is
copied as is.

The input is processed as it is read, so inputs of any size may be given.

USAGE:
    rematch replace [options] <pattern> <template> [<path>]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut patterns = patterns::Config::default();
    let mut syntax = syntax::Config::default();
    let mut input = input::Config::with_template();
    config::configure(
        p,
        USAGE,
        &mut [&mut common, &mut syntax, &mut patterns, &mut input],
    )?;

    let re = syntax.build(patterns.get()?)?;
    let template = input.template()?;
    let mut filter = SubstitutionFilter::new(&re, input.reader()?, template);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    io::copy(&mut filter, &mut out).context("substitution failed")?;
    out.flush()?;
    Ok(())
}
