use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::diff::ChangeRecord;
use crate::snapshot::Tree;

const SEPARATOR: &str = "----------";

/// Console output of the watcher: snapshot summaries and change batches.
pub struct Reporter<W> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn summary(&mut self, tree: &Tree) -> io::Result<()> {
        writeln!(self.out, "{}", tree.info())?;
        if tree.is_complete() {
            writeln!(self.out, "Tree is complete")
        } else {
            writeln!(self.out, "Tree is not complete")
        }
    }

    pub fn tree(&mut self, tree: &Tree) -> io::Result<()> {
        write!(self.out, "{}", tree.display())
    }

    /// Prints one batch of records, or `no change` for an empty batch.
    pub fn changes(&mut self, records: &[ChangeRecord]) -> io::Result<()> {
        if records.is_empty() {
            writeln!(self.out, "no change")?;
            return self.out.flush();
        }

        writeln!(self.out, "{SEPARATOR}")?;
        for record in records {
            writeln!(self.out, "{}", paint(record))?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn paint(record: &ChangeRecord) -> ColoredString {
    let line = record.to_string();
    match record {
        ChangeRecord::ModifiedKey { .. } => line.yellow(),
        ChangeRecord::NonmatchingExpansion { .. } => line.magenta(),
        ChangeRecord::MissingKey { .. } => line.red(),
        ChangeRecord::NewKey { .. } => line.green(),
    }
}
