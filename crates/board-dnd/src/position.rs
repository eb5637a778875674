//! Position Model
//!
//! A container is valid when the positions of its `n` members are exactly
//! `{0, 1, ..., n-1}`. Lists are rendered through a [`RenderOrder`], which maps
//! a UI list index to a position and back.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Zero-based rank of an entity inside its container
pub type Position = u32;

/// Direction in which a container is rendered
///
/// `Descending` puts the highest position at list index 0, so the most
/// recently appended entity is shown first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderOrder {
    #[default]
    Descending,
    Ascending,
}

impl RenderOrder {
    /// Position of the element at list `index` in a list of `len` elements
    pub fn position_at(self, len: usize, index: usize) -> Position {
        debug_assert!(index < len, "index {} outside list of {}", index, len);
        let rank = match self {
            RenderOrder::Descending => len - 1 - index,
            RenderOrder::Ascending => index,
        };
        rank as Position
    }

    /// List index at which `position` is rendered in a list of `len` elements
    pub fn index_of(self, len: usize, position: Position) -> usize {
        let position = position as usize;
        match self {
            RenderOrder::Descending => len.saturating_sub(1).saturating_sub(position),
            RenderOrder::Ascending => position,
        }
    }

    /// Comparator for sorting by position into render order
    pub fn compare(self, a: Position, b: Position) -> Ordering {
        match self {
            RenderOrder::Descending => b.cmp(&a),
            RenderOrder::Ascending => a.cmp(&b),
        }
    }

    /// Sorts `items` into render order by the position `key` returns
    pub fn sort_by_position<T>(self, items: &mut [T], key: impl Fn(&T) -> Position) {
        items.sort_by(|a, b| self.compare(key(a), key(b)));
    }

    /// SQL ordering keyword matching this comparator
    pub fn sql_direction(self) -> &'static str {
        match self {
            RenderOrder::Descending => "DESC",
            RenderOrder::Ascending => "ASC",
        }
    }
}

/// Checks that positions form exactly `{0, ..., n-1}`
pub fn validate_positions(positions: impl IntoIterator<Item = Position>) -> bool {
    let mut positions: Vec<Position> = positions.into_iter().collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(expected, &actual)| actual as usize == expected)
}

/// Checks the dense-position invariant for a container's `(id, position)` pairs
pub fn validate<T>(members: &[(T, Position)]) -> bool {
    validate_positions(members.iter().map(|(_, position)| *position))
}

pub fn size_after_insert(len: usize) -> usize {
    len + 1
}

pub fn size_after_remove(len: usize) -> usize {
    len.saturating_sub(1)
}

/// Pairs every id with the position implied by its list index
pub fn assign_positions<T: Clone>(ids: &[T], order: RenderOrder) -> Vec<(T, Position)> {
    let len = ids.len();
    ids.iter()
        .enumerate()
        .map(|(index, id)| (id.clone(), order.position_at(len, index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_index_to_position() {
        let order = RenderOrder::Descending;
        assert_eq!(order.position_at(3, 0), 2);
        assert_eq!(order.position_at(3, 2), 0);
        assert_eq!(order.index_of(3, 2), 0);
        assert_eq!(order.index_of(3, 0), 2);
    }

    #[test]
    fn test_ascending_index_to_position() {
        let order = RenderOrder::Ascending;
        assert_eq!(order.position_at(3, 0), 0);
        assert_eq!(order.index_of(3, 1), 1);
    }

    #[test]
    fn test_validate() {
        assert!(validate::<u32>(&[]));
        assert!(validate(&[(1, 2), (2, 0), (3, 1)]));
        assert!(!validate(&[(1, 0), (2, 2)]));
        assert!(!validate(&[(1, 1), (2, 1)]));
        assert!(!validate(&[(1, 1)]));
    }

    #[test]
    fn test_sort_by_position() {
        let mut items = vec![(10, 0), (11, 2), (12, 1)];
        RenderOrder::Descending.sort_by_position(&mut items, |item| item.1);
        assert_eq!(items, vec![(11, 2), (12, 1), (10, 0)]);
    }

    #[test]
    fn test_assign_positions() {
        let assigned = assign_positions(&["a", "b", "c"], RenderOrder::Descending);
        assert_eq!(assigned, vec![("a", 2), ("b", 1), ("c", 0)]);
        assert!(validate(&assigned));
    }

    #[test]
    fn test_size_helpers() {
        assert_eq!(size_after_insert(0), 1);
        assert_eq!(size_after_remove(0), 0);
        assert_eq!(size_after_remove(4), 3);
    }
}
