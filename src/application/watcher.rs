use std::io::Write;

use futures::{FutureExt, pin_mut, select};
use snafu::prelude::*;
use tracing::{debug, error, info};

use crate::application::{Reporter, RuntimeConfig};
use crate::diff::{ChangeRecord, DiffError, diff};
use crate::namespace::NamespaceAccessor;
use crate::snapshot::{BuildError, SnapshotBuilder, Tree};

/// Result of one polling cycle.
#[derive(Debug)]
pub struct Comparison {
    pub snapshot: Tree,
    pub records: Vec<ChangeRecord>,
}

/// Polls one namespace subtree and reports how it changes over time.
pub struct Watcher<'a, A> {
    accessor: &'a A,
    config: &'a RuntimeConfig,
}

impl<'a, A: NamespaceAccessor> Watcher<'a, A> {
    pub fn new(accessor: &'a A, config: &'a RuntimeConfig) -> Self {
        Self { accessor, config }
    }

    pub fn snapshot(&self) -> Result<Tree, BuildError> {
        SnapshotBuilder::new(self.accessor).build(
            &self.config.root,
            &self.config.start,
            self.config.filter.as_deref(),
            self.config.max_depth,
        )
    }

    /// Takes a fresh snapshot and diffs it against `baseline`.
    pub fn compare(&self, baseline: &Tree) -> Result<Comparison, WatchError> {
        let snapshot = self.snapshot().context(SnapshotSnafu)?;
        let records = diff(baseline, &snapshot).context(ComparisonSnafu)?;
        Ok(Comparison { snapshot, records })
    }

    /// Takes the baseline, then compares against it once per interval until
    /// the cycle limit is reached or Ctrl-C is received.
    ///
    /// The baseline only moves forward when a cycle reports changes. A cycle
    /// whose snapshot fails is logged and skipped.
    pub async fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> Result<(), WatchError> {
        let mut baseline = self.snapshot().context(SnapshotSnafu)?;
        info!(
            "Baseline snapshot of '{}' under '{}' taken",
            self.config.start, self.config.root
        );
        reporter.summary(&baseline).context(OutputSnafu)?;
        if self.config.show_tree {
            reporter.tree(&baseline).context(OutputSnafu)?;
        }

        let shutdown = compio::signal::ctrl_c().fuse();
        pin_mut!(shutdown);

        let mut cycle: u64 = 0;
        while self.config.cycles.is_none_or(|limit| cycle < limit) {
            let tick = compio::time::sleep(self.config.interval).fuse();
            pin_mut!(tick);
            select! {
                signal = shutdown => {
                    signal.context(SignalSnafu)?;
                    info!("Interrupted after {} cycles, stopping", cycle);
                    return Ok(());
                }
                () = tick => {}
            }
            cycle += 1;

            let comparison = match self.compare(&baseline) {
                Ok(comparison) => comparison,
                Err(WatchError::SnapshotError { source }) => {
                    error!(
                        "Skipping cycle {}: {}",
                        cycle,
                        snafu::Report::from_error(source)
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };
            debug!("Cycle {} produced {} records", cycle, comparison.records.len());

            reporter.changes(&comparison.records).context(OutputSnafu)?;
            if !comparison.records.is_empty() {
                baseline = comparison.snapshot;
            }
        }

        info!("Completed {} cycles", cycle);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum WatchError {
    #[snafu(display("Failed to take a snapshot"))]
    SnapshotError { source: BuildError },
    #[snafu(display("Failed to compare snapshots"))]
    ComparisonError { source: DiffError },
    #[snafu(display("Failed to write the report"))]
    OutputError { source: std::io::Error },
    #[snafu(display("Failed to listen for Ctrl-C"))]
    SignalError { source: std::io::Error },
}
