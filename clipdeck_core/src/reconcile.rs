//! Parent/child roster helpers shared by the services.
//!
//! [`diff_roster`] decides which stored children to delete, update or insert
//! when a parent is saved with a new child list. [`group_rows`] folds the
//! flat rows of a parent-to-child left join back into nested form.

use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::hash::Hash;

/// Outcome of comparing a stored child list with a submitted one.
#[derive(Debug, PartialEq, Eq)]
pub struct RosterDiff<K, E, S> {
    /// Stored children whose key does not appear in the submission.
    pub removed: Vec<E>,
    /// Submitted children whose key matches a stored child, paired with that key.
    pub retained: Vec<(K, S)>,
    /// Submitted children with no key, or a key nothing stored carries.
    pub added: Vec<S>,
}

impl<K, E, S> RosterDiff<K, E, S> {
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Partitions `submitted` against `existing` by key equality.
///
/// Submission order is kept within `retained` and `added`; `removed` keeps
/// the order of `existing`.
pub fn diff_roster<E, S, K, FE, FS>(
    existing: Vec<E>,
    submitted: Vec<S>,
    existing_key: FE,
    submitted_key: FS,
) -> RosterDiff<K, E, S>
where
    K: Eq + Hash,
    FE: Fn(&E) -> K,
    FS: Fn(&S) -> Option<K>,
{
    let existing_keys: HashSet<K> = existing.iter().map(&existing_key).collect();
    let submitted_keys: HashSet<K> = submitted.iter().filter_map(&submitted_key).collect();

    let mut retained = Vec::new();
    let mut added = Vec::new();
    for child in submitted {
        match submitted_key(&child) {
            Some(key) if existing_keys.contains(&key) => retained.push((key, child)),
            _ => added.push(child),
        }
    }

    let removed = existing
        .into_iter()
        .filter(|child| !submitted_keys.contains(&existing_key(child)))
        .collect();

    RosterDiff {
        removed,
        retained,
        added,
    }
}

/// Groups `(parent, Option<child>)` join rows by parent key, in the order
/// parents first appear. Rows without a child still produce their parent.
pub fn group_rows<P, C, K, F>(rows: Vec<(P, Option<C>)>, parent_key: F) -> Vec<(P, Vec<C>)>
where
    K: Eq + Hash,
    F: Fn(&P) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut grouped: Vec<(P, Vec<C>)> = Vec::new();

    for (parent, child) in rows {
        let slot = match slots.entry(parent_key(&parent)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                grouped.push((parent, Vec::new()));
                *entry.insert(grouped.len() - 1)
            }
        };

        if let Some(child) = child {
            grouped[slot].1.push(child);
        }
    }

    grouped
}
