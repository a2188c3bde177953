use std::io::{self, Write};

use rematch::{source::CharBuffer, util::iter::Searcher};

use crate::{
    config::{self, common, input, patterns, syntax},
    util::Table,
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints every match of a pattern in a file, or stdin when no path is given.

Each match is printed on its own line as 'line:column:match', where lines and
columns count from 1 and columns count characters. Matches may span lines.

USAGE:
    rematch find [options] <pattern> [<path>]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut patterns = patterns::Config::default();
    let mut syntax = syntax::Config::default();
    let mut input = input::Config::path_only();
    config::configure(
        p,
        USAGE,
        &mut [&mut common, &mut syntax, &mut patterns, &mut input],
    )?;

    let re = syntax.build(patterns.get()?)?;
    let text = input.read_to_string()?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut chars = CharBuffer::from(&*text);
    let mut it = Searcher::new(chars.len());
    let mut locator = Locator::new(&text);
    let mut count = 0;
    while let Some(caps) = it.try_advance(|start| {
        chars.set_position(start);
        re.try_search(&mut chars)
    })? {
        count += 1;
        if common.quiet {
            continue;
        }
        let m = caps.get_match();
        let (line, column) = locator.locate(m.start());
        writeln!(out, "{}:{}:{}", line, column, m.as_str(&text))?;
    }
    out.flush()?;
    if common.quiet {
        let mut table = Table::empty();
        table.add("matches", count);
        table.print(io::stdout())?;
    }
    Ok(())
}

/// Converts character offsets into 1-based line and column numbers.
///
/// Offsets must be given in non-decreasing order, which lets each lookup
/// scan only the text between the previous offset and the new one.
#[derive(Debug)]
struct Locator<'t> {
    text: &'t str,
    /// The character offset of the last position located.
    offset: usize,
    /// The byte offset corresponding to `offset`.
    byte: usize,
    /// The line `byte` is on.
    line: usize,
}

impl<'t> Locator<'t> {
    fn new(text: &'t str) -> Locator<'t> {
        Locator { text, offset: 0, byte: 0, line: 1 }
    }

    fn locate(&mut self, offset: usize) -> (usize, usize) {
        let skip = offset.saturating_sub(self.offset);
        let byte = self.text[self.byte..]
            .char_indices()
            .nth(skip)
            .map_or(self.text.len(), |(i, _)| self.byte + i);
        let bytes = self.text.as_bytes();
        self.line += memchr::memchr_iter(b'\n', &bytes[self.byte..byte]).count();
        self.offset = offset.max(self.offset);
        self.byte = byte;

        let line_start =
            memchr::memrchr(b'\n', &bytes[..byte]).map_or(0, |i| i + 1);
        let column = self.text[line_start..byte].chars().count() + 1;
        (self.line, column)
    }
}
