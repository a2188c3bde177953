use crate::args;

mod debug;
mod find;
mod replace;

const USAGE: &'static str = "\
Search and substitute text with patterns written in classic regex dialects.

USAGE:
    rematch <command> ...

COMMANDS:
    debug    Print the compiled form of a pattern.
    find     Print every match in a file or stdin.
    replace  Substitute every match in a file or stdin.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "debug" => debug::run(p),
        "find" => find::run(p),
        "replace" => replace::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
