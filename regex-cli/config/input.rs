use std::{
    io::{self, Read},
    path::PathBuf,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser},
};

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// The positional arguments that follow the pattern: an optional
/// substitution template and the path to read. Stdin is read when no path
/// is given.
#[derive(Debug, Default)]
pub struct Config {
    template: Option<String>,
    needs_template: bool,
    path: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration whose only positional argument is a path.
    pub fn path_only() -> Config {
        Config::default()
    }

    /// Creates a configuration whose first positional argument is a
    /// substitution template, followed by an optional path.
    pub fn with_template() -> Config {
        Config { needs_template: true, ..Config::default() }
    }

    /// Returns the template, or an error if none was given.
    pub fn template(&self) -> anyhow::Result<&str> {
        match self.template {
            None => anyhow::bail!("no substitution template was given"),
            Some(ref template) => Ok(template),
        }
    }

    /// Opens the input for reading.
    pub fn reader(&self) -> anyhow::Result<Box<dyn io::Read>> {
        match self.path {
            None => Ok(Box::new(io::stdin())),
            Some(ref path) => {
                let file = std::fs::File::open(path).with_context(|| {
                    format!("failed to open {}", path.display())
                })?;
                Ok(Box::new(io::BufReader::new(file)))
            }
        }
    }

    /// Reads the whole input into memory.
    pub fn read_to_string(&self) -> anyhow::Result<String> {
        let mut text = String::new();
        self.reader()?
            .read_to_string(&mut text)
            .with_context(|| format!("failed to read {}", self.name()))?;
        Ok(text)
    }

    fn name(&self) -> String {
        match self.path {
            None => "<stdin>".to_string(),
            Some(ref path) => path.display().to_string(),
        }
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Value(ref mut v) => {
                let v = std::mem::take(v);
                if self.needs_template && self.template.is_none() {
                    self.template = Some(args::utf8(v, "template")?);
                } else if self.path.is_none() {
                    self.path = Some(PathBuf::from(v));
                } else {
                    anyhow::bail!(
                        "unexpected extra argument '{}'",
                        PathBuf::from(v).display(),
                    );
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[]
    }
}
