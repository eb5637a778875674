//! Reindexer
//!
//! Pure functions over ordered id lists. Lists are in render order; positions
//! are derived afterwards through a [`RenderOrder`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::OrderError;
use crate::position::{assign_positions, Position, RenderOrder};

/// One position field write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionWrite<T> {
    pub id: T,
    pub position: Position,
}

fn check_index(index: usize, len: usize) -> Result<(), OrderError> {
    if index < len {
        Ok(())
    } else {
        Err(OrderError::IndexOutOfRange { index, len })
    }
}

/// Moves the id at `from` to `to` inside one container
///
/// Both indices must lie in `[0, len)`; on error the caller keeps `ids`.
pub fn reorder_within_container<T: Clone>(
    ids: &[T],
    from: usize,
    to: usize,
) -> Result<Vec<T>, OrderError> {
    check_index(from, ids.len())?;
    check_index(to, ids.len())?;

    let mut reordered = ids.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    Ok(reordered)
}

/// Moves the id at `from` in `source` to index `to` of `destination`
///
/// `to` may equal the destination length (drop at the end, or into an
/// empty container).
pub fn move_across_containers<T: Clone>(
    source: &[T],
    destination: &[T],
    from: usize,
    to: usize,
) -> Result<(Vec<T>, Vec<T>), OrderError> {
    check_index(from, source.len())?;
    if to > destination.len() {
        return Err(OrderError::IndexOutOfRange {
            index: to,
            len: destination.len(),
        });
    }

    let mut new_source = source.to_vec();
    let moved = new_source.remove(from);
    let mut new_destination = destination.to_vec();
    new_destination.insert(to, moved);
    Ok((new_source, new_destination))
}

/// Position for an entity appended to the container
///
/// Under the descending convention it becomes the first rendered element.
pub fn append_new<T>(ids: &[T]) -> Position {
    if ids.is_empty() {
        0
    } else {
        ids.len() as Position
    }
}

/// Removes the id at `index`; remaining ids keep their relative order
pub fn close_gap_on_remove<T: Clone>(ids: &[T], index: usize) -> Result<Vec<T>, OrderError> {
    check_index(index, ids.len())?;
    let mut remaining = ids.to_vec();
    remaining.remove(index);
    Ok(remaining)
}

/// Full renumbering: one write per member
pub fn renumber<T: Clone>(ids: &[T], order: RenderOrder) -> Vec<PositionWrite<T>> {
    assign_positions(ids, order)
        .into_iter()
        .map(|(id, position)| PositionWrite { id, position })
        .collect()
}

/// Writes needed to go from the stored `(id, position)` pairs to `after`
///
/// Members whose position does not change are skipped; ids absent from
/// `before` are always written.
pub fn position_writes<T>(
    before: &[(T, Position)],
    after: &[T],
    order: RenderOrder,
) -> Vec<PositionWrite<T>>
where
    T: Clone + Eq + Hash,
{
    let current: HashMap<&T, Position> = before.iter().map(|(id, pos)| (id, *pos)).collect();
    renumber(after, order)
        .into_iter()
        .filter(|write| current.get(&write.id) != Some(&write.position))
        .collect()
}

/// Merges a submitted order with the stored membership of a container
///
/// Submitted ids come first (duplicates keep their first occurrence), then
/// stored ids the submission omitted, in their stored order. Membership
/// checks are the caller's job.
pub fn reconcile_order<T>(submitted: &[T], stored: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(stored.len().max(submitted.len()));
    for id in submitted.iter().chain(stored.iter()) {
        if seen.insert(id.clone()) {
            merged.push(id.clone());
        }
    }
    merged
}
