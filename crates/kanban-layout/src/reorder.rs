#![forbid(unsafe_code)]

//! Reorder policy: when a hover becomes a swap, and where a transferred card
//! lands.
//!
//! # Directional hysteresis
//!
//! Overlap alone never reorders. A swap commits only once the moving item's
//! center has crossed to the far side of the target's center, in the
//! direction that agrees with moving past it in list order:
//!
//! ```text
//! moving earlier in list (i < j): swap when moving_center > target_center
//! moving later in list   (i > j): swap when moving_center < target_center
//! ```
//!
//! Equal centers never swap. For any fixed pair of centers at most one of
//! the two orderings approves, so two items cannot flip back and forth.

use kanban_core::model::Column;

use crate::hit_test::find_card_at;

/// Axis-agnostic directional hysteresis rule.
#[inline]
#[must_use]
pub fn should_swap(
    moving_center: f32,
    target_center: f32,
    moving_index: usize,
    target_index: usize,
) -> bool {
    let after_target = moving_center > target_center;
    let before_target = moving_center < target_center;
    let moving_is_later = moving_index > target_index;
    let moving_is_earlier = moving_index < target_index;
    (after_target && moving_is_earlier) || (before_target && moving_is_later)
}

/// Hysteresis rule on horizontal centers.
#[inline]
#[must_use]
pub fn should_swap_columns(
    moving_center_x: f32,
    target_center_x: f32,
    moving_index: usize,
    target_index: usize,
) -> bool {
    should_swap(moving_center_x, target_center_x, moving_index, target_index)
}

/// Hysteresis rule on vertical centers within one column.
#[inline]
#[must_use]
pub fn should_swap_cards(
    moving_center_y: f32,
    target_center_y: f32,
    moving_index: usize,
    target_index: usize,
) -> bool {
    should_swap(moving_center_y, target_center_y, moving_index, target_index)
}

/// Insertion index for a card entering `target` with its center at
/// `card_center_y`.
///
/// 1. A mounted card containing the point: take its index (the hit card is
///    pushed down).
/// 2. No hit, column non-empty: past the last card's center appends,
///    otherwise prepends. A point inside the last card's lower half is a hit
///    and resolves to rule 1 (`len - 1`), not an append.
/// 3. Empty column: `0`.
#[must_use]
pub fn determine_drop_index_in_column(card_center_y: f32, target: &Column) -> usize {
    if let Some(hit) = find_card_at(target, card_center_y) {
        return hit.index;
    }
    match target.cards.last() {
        Some(last) if card_center_y > last.coordinates.center_y() => target.cards.len(),
        Some(_) | None => 0,
    }
}

/// Move the element at `from` to `to` by remove-then-insert.
///
/// Returns `false` (and leaves `list` untouched) if either index is out of
/// range or they are equal.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= list.len() || to >= list.len() {
        return false;
    }
    let item = list.remove(from);
    list.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::geometry::Coordinates;
    use kanban_core::model::{Card, CardId, ColumnId, ViewportState};

    #[test]
    fn swap_requires_crossing_in_travel_direction() {
        // Moving right past a later item.
        assert!(should_swap_columns(170.0, 160.0, 0, 1));
        assert!(!should_swap_columns(150.0, 160.0, 0, 1));
        // Moving left past an earlier item.
        assert!(should_swap_columns(150.0, 160.0, 2, 1));
        assert!(!should_swap_columns(170.0, 160.0, 2, 1));
    }

    #[test]
    fn equal_centers_never_swap() {
        assert!(!should_swap(100.0, 100.0, 0, 1));
        assert!(!should_swap(100.0, 100.0, 1, 0));
    }

    #[test]
    fn same_index_never_swaps() {
        assert!(!should_swap_cards(10.0, 100.0, 3, 3));
        assert!(!should_swap_cards(200.0, 100.0, 3, 3));
    }

    fn column_with(tops: &[f32]) -> Column {
        let mut column = Column::new(ColumnId::new(1), "k", 0);
        column.cards = tops
            .iter()
            .enumerate()
            .map(|(i, top)| {
                let mut card = Card::new(CardId::new(i as u64), "c", i as u32);
                card.coordinates = Coordinates::new(0.0, *top, 100.0, 50.0);
                card
            })
            .collect();
        column.viewport = ViewportState::range(0, tops.len());
        column
    }

    #[test]
    fn drop_index_on_hit_card() {
        let column = column_with(&[100.0, 160.0]);
        assert_eq!(determine_drop_index_in_column(120.0, &column), 0);
        assert_eq!(determine_drop_index_in_column(170.0, &column), 1);
    }

    #[test]
    fn drop_index_fallbacks() {
        let column = column_with(&[100.0, 160.0]);
        // Gap between cards, above the last center: prepend.
        assert_eq!(determine_drop_index_in_column(155.0, &column), 0);
        // Below the last card's center with no hit: append.
        assert_eq!(determine_drop_index_in_column(400.0, &column), 2);
        // Empty column.
        assert_eq!(determine_drop_index_in_column(400.0, &column_with(&[])), 0);
    }

    #[test]
    fn below_last_center_inside_last_card_takes_its_slot() {
        // Last card spans 160..=210 with its center at 185.
        let column = column_with(&[100.0, 160.0]);
        assert_eq!(determine_drop_index_in_column(200.0, &column), 1);
        assert_eq!(determine_drop_index_in_column(210.0, &column), 1);
        assert_eq!(determine_drop_index_in_column(210.5, &column), 2);
    }

    #[test]
    fn move_item_remove_then_insert() {
        let mut list = vec!['a', 'b', 'c'];
        assert!(move_item(&mut list, 0, 2));
        assert_eq!(list, vec!['b', 'c', 'a']);
        assert!(move_item(&mut list, 2, 0));
        assert_eq!(list, vec!['a', 'b', 'c']);
        assert!(!move_item(&mut list, 1, 1));
        assert!(!move_item(&mut list, 0, 3));
        assert_eq!(list, vec!['a', 'b', 'c']);
    }
}
