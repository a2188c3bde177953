use std::path::PathBuf;

use {
    anyhow::Context,
    lexopt::{Arg, Parser},
};

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// The pattern a command runs. It is either the first positional argument
/// or given with a flag.
#[derive(Debug, Default)]
pub struct Config {
    pattern: Option<String>,
}

impl Config {
    /// Returns the pattern, or an error if none was given.
    pub fn get(&self) -> anyhow::Result<&str> {
        match self.pattern {
            None => anyhow::bail!("no pattern was given"),
            Some(ref pattern) => Ok(pattern),
        }
    }

    fn set(&mut self, pattern: String) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.pattern.is_none(),
            "only one pattern is allowed, but got a second one: '{}'",
            pattern,
        );
        self.pattern = Some(pattern);
        Ok(())
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('p') | Arg::Long("pattern") => {
                self.set(args::value(p, "-p/--pattern")?)?;
            }
            Arg::Short('f') | Arg::Long("pattern-file") => {
                let path =
                    PathBuf::from(p.value().context("-f/--pattern-file")?);
                let contents =
                    std::fs::read_to_string(&path).with_context(|| {
                        anyhow::anyhow!("failed to read {}", path.display())
                    })?;
                let pat = contents
                    .strip_suffix('\n')
                    .map(|p| p.strip_suffix('\r').unwrap_or(p))
                    .unwrap_or(&contents);
                self.set(pat.to_string())?;
            }
            Arg::Value(ref mut v) => {
                if self.pattern.is_some() {
                    return Ok(false);
                }
                let v = std::mem::take(v);
                self.pattern = Some(args::utf8(v, "pattern")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-p, --pattern <pattern>",
                "Give the pattern with a flag.",
                r#"
Gives the pattern with a flag instead of as the first positional argument.
This is useful for patterns that start with a '-'. When this flag is used,
every positional argument is treated as something other than a pattern.
"#,
            ),
            Usage::new(
                "-f, --pattern-file <path>",
                "Read the pattern from a file.",
                r#"
Reads the pattern from the file at the given path. A single trailing line
terminator is removed. Every other character, including other line
terminators, is part of the pattern.
"#,
            ),
        ];
        USAGES
    }
}
