use std::{
    fmt::Debug,
    io::{self, Write},
    time::{Duration, Instant},
};

/// Runs `f` and returns its result along with how long it took.
pub fn timeit<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let t = f();
    (t, start.elapsed())
}

/// Like `timeit`, but for fallible operations. The duration is only
/// reported on success.
pub fn timeitr<T, E>(
    f: impl FnOnce() -> Result<T, E>,
) -> Result<(T, Duration), E> {
    match timeit(f) {
        (Ok(t), elapsed) => Ok((t, elapsed)),
        (Err(err), _) => Err(err),
    }
}

/// Labelled values printed as two aligned columns, with labels flush right.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<(&'static str, String)>,
}

impl Table {
    pub fn empty() -> Table {
        Table::default()
    }

    /// Adds a row. The value is rendered with its `Debug` impl right away.
    pub fn add<D: Debug>(&mut self, label: &'static str, value: D) {
        self.rows.push((label, format!("{:?}", value)));
    }

    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = tabwriter::TabWriter::new(wtr)
            .alignment(tabwriter::Alignment::Right);
        for &(label, ref value) in self.rows.iter() {
            writeln!(wtr, "{}:\t{}", label, value)?;
        }
        wtr.flush()
    }
}
