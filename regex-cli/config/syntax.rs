use {
    anyhow::Context,
    lexopt::{Arg, Parser},
    rematch::{Pattern, Syntax},
};

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// This exposes the dialect and every option of a `rematch::Config` via CLI
/// flags.
#[derive(Debug, Default)]
pub struct Config {
    syntax: Syntax,
    config: rematch::Config,
}

impl Config {
    /// Compiles the given pattern with this configuration.
    pub fn build(&self, pattern: &str) -> anyhow::Result<Pattern> {
        log::debug!(
            "compiling '{}' with syntax {:?} and {:?}",
            pattern,
            self.syntax,
            self.config,
        );
        Pattern::builder()
            .syntax(self.syntax)
            .configure(self.config)
            .build(pattern)
            .with_context(|| format!("failed to compile pattern '{}'", pattern))
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('s') | Arg::Long("syntax") => {
                self.syntax = args::parse(p, "-s/--syntax")?;
            }
            Arg::Short('i') | Arg::Long("case-insensitive") => {
                self.config = self.config.case_insensitive(true);
            }
            Arg::Long("multi-line") => {
                self.config = self.config.multi_line(true);
            }
            Arg::Long("dot-matches-new-line") => {
                self.config = self.config.dot_matches_new_line(true);
            }
            Arg::Long("dot-excludes-nul") => {
                self.config = self.config.dot_excludes_nul(true);
            }
            Arg::Long("not-bol") => {
                self.config = self.config.not_bol(true);
            }
            Arg::Long("not-eol") => {
                self.config = self.config.not_eol(true);
            }
            Arg::Long("step-limit") => {
                let limit = args::parse_maybe(p, "--step-limit")?;
                self.config = self.config.step_limit(limit);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-s, --syntax <dialect>",
                "Set the dialect the pattern is written in.",
                r#"
Sets the dialect the pattern is written in. The default is perl5.

The choices are: emacs, awk, grep, egrep, posix-awk, posix-egrep, posix-basic,
posix-minimal-basic, posix-extended, posix-minimal-extended, ed, sed, perl4,
perl4-s, perl5 and perl5-s. Names are case insensitive, and '_' may be used
in place of '-'.
"#,
            ),
            Usage::new(
                "-i, --case-insensitive",
                "Enable case insensitive mode.",
                r#"
Enables case insensitive mode. Literals, back-references and the members of
bracket expressions match either case.
"#,
            ),
            Usage::new(
                "--multi-line",
                "Make ^ and $ match at line terminators.",
                r#"
Enables multi-line mode. When enabled, '^' also matches right after a '\n'
and '$' also matches right before one.
"#,
            ),
            Usage::new(
                "--dot-matches-new-line",
                "Make . match \\n.",
                r#"
Makes '.' match '\n' in dialects where it doesn't already.
"#,
            ),
            Usage::new(
                "--dot-excludes-nul",
                "Prevent . from matching NUL.",
                r#"
Prevents '.' from matching the NUL character.
"#,
            ),
            Usage::new(
                "--not-bol",
                "The start of the input is not a line start.",
                r#"
Prevents '^' from matching at the very start of the input. In multi-line
mode, '^' still matches after every '\n'.
"#,
            ),
            Usage::new(
                "--not-eol",
                "The end of the input is not a line end.",
                r#"
Prevents '$' from matching at the very end of the input. In multi-line mode,
'$' still matches before every '\n'.
"#,
            ),
            Usage::new(
                "--step-limit <limit>",
                "Bound the work done by each search.",
                r#"
Sets the number of matcher steps a single search attempt may take before it
fails with an error. Some patterns take exponential time on some inputs, and
this turns a search that would never finish into an error.

The special value 'none' removes the limit, which is the default.
"#,
            ),
        ];
        USAGES
    }
}
