use snafu::prelude::*;

use crate::diff::ChangeRecord;
use crate::namespace::KeyPath;
use crate::snapshot::Tree;

/// Compares an `older` and a `newer` snapshot of the same key.
///
/// Records are emitted depth-first in pre-order: the timestamp and expansion
/// checks for a key come before anything reported about its children. Below a
/// key whose expansion differs between the snapshots nothing is compared.
pub fn diff(older: &Tree, newer: &Tree) -> Result<Vec<ChangeRecord>, DiffError> {
    ensure!(
        older.path() == newer.path(),
        MismatchedRootsSnafu {
            older: older.path().clone(),
            newer: newer.path().clone(),
        }
    );

    let mut records = Vec::new();
    diff_nodes(older, newer, 0, &mut records);
    Ok(records)
}

fn diff_nodes(older: &Tree, newer: &Tree, depth: usize, records: &mut Vec<ChangeRecord>) {
    // A restricted side has no timestamp; its change only shows up through the
    // expansion check below.
    if let (Some(before), Some(after)) = (older.modified(), newer.modified()) {
        if before != after {
            records.push(ChangeRecord::ModifiedKey {
                path: older.path().clone(),
                timestamp: before.max(after).to_local(),
            });
        }
    }

    if older.is_expanded() != newer.is_expanded() {
        records.push(ChangeRecord::NonmatchingExpansion { depth });
        return;
    }
    let (Some(before), Some(after)) = (older.children(), newer.children()) else {
        return;
    };

    records.extend(
        before
            .iter()
            .filter(|(name, _)| !after.contains_key(name.as_str()))
            .map(|(_, child)| ChangeRecord::MissingKey {
                path: child.path().clone(),
            }),
    );
    records.extend(
        after
            .iter()
            .filter(|(name, _)| !before.contains_key(name.as_str()))
            .map(|(_, child)| ChangeRecord::NewKey {
                path: child.path().clone(),
            }),
    );

    for (name, child) in before {
        if let Some(counterpart) = newer.get(name) {
            diff_nodes(child, counterpart, depth + 1, records);
        }
    }
}

#[derive(Debug, Snafu)]
pub enum DiffError {
    #[snafu(display(
        "Cannot compare snapshots of different keys: '{}' and '{}'",
        older,
        newer
    ))]
    MismatchedRoots { older: KeyPath, newer: KeyPath },
}
