use std::fmt::Debug;

use lexopt::{Arg, Parser};

use crate::args::Usage;

pub mod common;
pub mod input;
pub mod patterns;
pub mod syntax;

/// A group of command line flags and positional arguments.
///
/// Each command builds the groups it needs and hands them to `configure`,
/// which offers every argument to each group in turn. The first group to
/// recognize an argument consumes it.
pub trait Configurable: Debug {
    /// Consumes `arg` (and its value, if it takes one) and returns true, or
    /// returns false if this group doesn't know `arg`.
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool>;

    fn usage(&self) -> &[Usage];
}

/// Parses the rest of the command line into `targets`.
///
/// `-h` and `--help` stop parsing with an error carrying `usage`, where
/// `%options%` is replaced by the short or long docs of every target's
/// flags.
pub fn configure(
    p: &mut Parser,
    usage: &str,
    targets: &mut [&mut dyn Configurable],
) -> anyhow::Result<()> {
    loop {
        // The arg borrows from the parser, but targets need the parser too
        // in order to read flag values. So long flag names are copied out
        // before the arg is handed over.
        let long;
        let mut arg = match p.next()? {
            None => return Ok(()),
            Some(Arg::Short('h')) => {
                anyhow::bail!("{}", help(usage, targets, false))
            }
            Some(Arg::Long("help")) => {
                anyhow::bail!("{}", help(usage, targets, true))
            }
            Some(Arg::Long(name)) => {
                long = name.to_string();
                Arg::Long(&long)
            }
            Some(Arg::Short(c)) => Arg::Short(c),
            Some(Arg::Value(v)) => Arg::Value(v),
        };
        let mut recognized = false;
        for t in targets.iter_mut() {
            if t.configure(p, &mut arg)? {
                recognized = true;
                break;
            }
        }
        if !recognized {
            return Err(arg.unexpected().into());
        }
    }
}

fn help(usage: &str, targets: &[&mut dyn Configurable], long: bool) -> String {
    let mut usages: Vec<Usage> =
        targets.iter().flat_map(|t| t.usage().iter().copied()).collect();
    usages.sort_by_key(|u| u.format);
    let options =
        if long { Usage::long(&usages) } else { Usage::short(&usages) };
    usage.replace("%options%", &options)
}
