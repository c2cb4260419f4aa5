//! List diffing.
//!
//! Rows are matched with a Myers longest common subsequence over the identity
//! predicate; identical rows left unmatched on both sides become moves. The
//! result is emitted as removals (back to front), then moves, then inserts,
//! then content changes, so each update is valid against the list produced by
//! the ones before it.

mod callback;
mod myers;
mod update;

pub use callback::{item_callback, EqualityCallback, FnItemCallback, ItemCallback};
pub use update::{DiffResult, ListUpdate, ListUpdateCallback};

use crate::snapshot::Snapshot;
use smallvec::SmallVec;
use update::RangeCoalescer;

/// Computes the updates turning `old` into `new`.
pub fn calculate_diff<T, C>(old: &[T], new: &[T], callback: &C) -> DiffResult
where
    C: ItemCallback<T> + ?Sized,
{
    let old: Vec<&T> = old.iter().collect();
    let new: Vec<&T> = new.iter().collect();
    diff_items(&old, &new, callback, &|| false).unwrap_or_default()
}

/// Computes the updates turning one snapshot into another.
pub fn calculate_snapshot_diff<T, C>(old: &Snapshot<T>, new: &Snapshot<T>, callback: &C) -> DiffResult
where
    C: ItemCallback<T> + ?Sized,
{
    diff_snapshots(old, new, callback, &|| false).unwrap_or_default()
}

/// Snapshot diff that gives up, returning `None`, once `cancelled` reports true.
pub(crate) fn diff_snapshots<T, C>(
    old: &Snapshot<T>,
    new: &Snapshot<T>,
    callback: &C,
    cancelled: &dyn Fn() -> bool,
) -> Option<DiffResult>
where
    C: ItemCallback<T> + ?Sized,
{
    let old: Vec<&T> = old.iter().collect();
    let new: Vec<&T> = new.iter().collect();
    diff_items(&old, &new, callback, cancelled)
}

fn diff_items<T, C>(
    old: &[&T],
    new: &[&T],
    callback: &C,
    cancelled: &dyn Fn() -> bool,
) -> Option<DiffResult>
where
    C: ItemCallback<T> + ?Sized,
{
    let same = |o: usize, n: usize| callback.are_items_the_same(old[o], new[n]);
    let common = myers::longest_common_subsequence(old.len(), new.len(), same, cancelled)?;

    // old_match[o] / new_match[n] link the two sides; in_sequence marks rows
    // that keep their relative order and therefore never move.
    let mut old_match: Vec<Option<usize>> = vec![None; old.len()];
    let mut new_match: Vec<Option<usize>> = vec![None; new.len()];
    let mut in_sequence = vec![false; old.len()];
    for &(o, n) in &common {
        old_match[o] = Some(n);
        new_match[n] = Some(o);
        in_sequence[o] = true;
    }

    if cancelled() {
        return None;
    }
    if !match_moved_rows(&mut old_match, &mut new_match, same, cancelled) {
        return None;
    }

    let mut updates: SmallVec<[ListUpdate; 8]> = SmallVec::new();
    let mut coalescer = RangeCoalescer::default();

    for o in (0..old.len()).rev() {
        if old_match[o].is_none() {
            coalescer.push(ListUpdate::Removed { position: o, count: 1 }, &mut updates);
        }
    }
    coalescer.flush(&mut updates);

    // Surviving rows, identified by their index in `new`, in current order.
    let mut current: Vec<usize> = old_match.iter().filter_map(|matched| *matched).collect();
    let mut settled = vec![false; new.len()];
    for &(_, n) in &common {
        settled[n] = true;
    }
    for n in 0..new.len() {
        let Some(o) = new_match[n] else { continue };
        if in_sequence[o] {
            continue;
        }
        let Some(from) = current.iter().position(|&row| row == n) else {
            continue;
        };
        current.remove(from);
        let to = current
            .iter()
            .rposition(|&row| settled[row] && row < n)
            .map_or(0, |p| p + 1);
        current.insert(to, n);
        settled[n] = true;
        if from != to {
            updates.push(ListUpdate::Moved { from, to });
        }
    }

    // Every surviving row now sits in new-list order, so inserting missing
    // rows in ascending order lands each one at its final index.
    for n in 0..new.len() {
        if new_match[n].is_none() {
            coalescer.push(ListUpdate::Inserted { position: n, count: 1 }, &mut updates);
        }
    }
    coalescer.flush(&mut updates);

    for n in 0..new.len() {
        if let Some(o) = new_match[n] {
            if !callback.are_contents_the_same(old[o], new[n]) {
                coalescer.push(ListUpdate::Changed { position: n, count: 1 }, &mut updates);
            }
        }
    }
    coalescer.flush(&mut updates);

    Some(DiffResult::new(updates, old.len(), new.len()))
}

/// Upper bound on identity comparisons spent pairing rows outside the common
/// subsequence. Rows still unpaired afterwards are removed and reinserted.
const MOVE_SEARCH_BUDGET: usize = 1 << 20;

/// Pairs rows missing from the common subsequence that still exist on the
/// other side. Returns `false` if cancelled.
fn match_moved_rows(
    old_match: &mut [Option<usize>],
    new_match: &mut [Option<usize>],
    same: impl Fn(usize, usize) -> bool,
    cancelled: &dyn Fn() -> bool,
) -> bool {
    let mut unmatched: Vec<usize> = (0..new_match.len())
        .filter(|&n| new_match[n].is_none())
        .collect();
    let mut budget = MOVE_SEARCH_BUDGET;
    for o in 0..old_match.len() {
        if unmatched.is_empty() || budget == 0 {
            break;
        }
        if old_match[o].is_some() {
            continue;
        }
        if cancelled() {
            return false;
        }
        let scanned = unmatched.len().min(budget);
        let found = unmatched[..scanned].iter().position(|&n| same(o, n));
        budget -= found.map_or(scanned, |slot| slot + 1);
        if let Some(slot) = found {
            let n = unmatched.remove(slot);
            old_match[o] = Some(n);
            new_match[n] = Some(o);
        }
    }
    true
}

#[cfg(test)]
#[path = "../tests/diff_tests.rs"]
mod tests;
