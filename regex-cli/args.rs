use std::{
    ffi::OsString,
    fmt::{Debug, Display},
    str::FromStr,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser},
};

/// Reads the name of a sub-command from the parser.
///
/// When there is no next argument, or it is `-h` or `--help`, the given
/// usage is returned as the error so that it gets printed.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    match p.next()? {
        None | Some(Arg::Short('h')) | Some(Arg::Long("help")) => {
            anyhow::bail!("{}", usage.trim())
        }
        Some(Arg::Value(cmd)) => utf8(cmd, "command"),
        Some(arg) => Err(arg.unexpected().into()),
    }
}

/// Reads the value of `flag_name` and parses it into `T`.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let v = value(p, flag_name)?;
    // 'anyhow::Error::msg' accepts error types that don't impl
    // 'std::error::Error', which '?' would require.
    v.parse().map_err(|err| anyhow::Error::msg(err).context(flag_name))
}

/// Like `parse`, except the value `none` parses to `None`. This is how
/// limits are switched off.
pub fn parse_maybe<T>(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let v = value(p, flag_name)?;
    if v == "none" {
        return Ok(None);
    }
    v.parse()
        .map(Some)
        .map_err(|err| anyhow::Error::msg(err).context(flag_name))
}

/// Reads the value of `flag_name` as a string. Values that aren't valid
/// UTF-8 are rejected.
pub fn value(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<String> {
    utf8(p.value().context(flag_name)?, flag_name)
}

/// Converts an argument to a string. `what` names the argument in the error
/// for values that aren't valid UTF-8.
pub fn utf8(v: OsString, what: &str) -> anyhow::Result<String> {
    v.into_string().map_err(|v| {
        anyhow::Error::from(lexopt::Error::NonUnicodeValue(v))
            .context(format!("{} must be valid UTF-8", what))
    })
}

/// The documentation of one flag.
///
/// `Usage::short` renders a list of these as a two column table for `-h`.
/// `Usage::long` renders each with its full, word wrapped description for
/// `--help`.
#[derive(Clone, Copy, Debug)]
pub struct Usage {
    /// How the flag is written, for example, `-s, --syntax <dialect>`.
    pub format: &'static str,
    /// A one line description.
    pub short: &'static str,
    /// The full description. Paragraphs are separated by blank lines.
    /// Line breaks within a paragraph are not preserved.
    pub long: &'static str,
}

impl Usage {
    pub const fn new(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { format, short, long }
    }

    /// Lines up each format with its short description.
    pub fn short(usages: &[Usage]) -> String {
        let width = usages.iter().map(|u| u.format.len()).max().unwrap_or(0);
        usages
            .iter()
            .map(|u| {
                format!("    {:width$}  {}\n", u.format, u.short, width = width)
            })
            .collect()
    }

    /// Prints each format followed by its long description, indented and
    /// wrapped to 79 columns.
    pub fn long(usages: &[Usage]) -> String {
        const INDENT: &str = "        ";
        let opts = textwrap::Options::new(79)
            .initial_indent(INDENT)
            .subsequent_indent(INDENT);
        let mut blocks = vec![];
        for usage in usages.iter() {
            let mut block = format!("    {}\n", usage.format);
            let paragraphs = usage
                .long
                .trim()
                .split("\n\n")
                .map(|para| textwrap::fill(&para.replace('\n', " "), &opts))
                .collect::<Vec<String>>();
            block.push_str(&paragraphs.join("\n\n"));
            block.push('\n');
            blocks.push(block);
        }
        blocks.join("\n")
    }
}
