//! Selection mappings
//!
//! Id-keyed quantity maps backing the three selectable collections of a
//! basket session. The map never holds a zero-quantity entry, and adjustments
//! are clamped so the map total never grows past its cap.

use rustc_hash::FxHashMap;

use crate::catalog::ItemId;

/// Upper bound on the summed quantity of a selection mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityCap {
    /// No plan-derived cap; bounded only by non-negativity.
    Unbounded,

    /// The sum of quantities across the mapping may not exceed this total.
    Total(u32),
}

/// Result of a clamped quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjusted {
    /// The entry's quantity after the adjustment.
    pub quantity: u32,

    /// Whether the requested delta was cut short by a bound.
    pub clamped: bool,
}

/// An id-keyed collection of chosen catalog items with positive quantities.
#[derive(Debug, Clone, Default)]
pub struct SelectionMap {
    entries: FxHashMap<ItemId, u32>,
}

impl SelectionMap {
    /// Create an empty selection mapping.
    #[must_use]
    pub fn new() -> Self {
        SelectionMap::default()
    }

    /// Get the quantity selected for an item; absent items are 0.
    #[must_use]
    pub fn quantity(&self, id: ItemId) -> u32 {
        self.entries.get(&id).copied().unwrap_or(0)
    }

    /// Sum of quantities across the mapping.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.entries.values().sum()
    }

    /// Number of distinct items selected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.entries.iter().map(|(id, quantity)| (*id, *quantity))
    }

    /// Entries as `(id, quantity)` pairs sorted by id, for deterministic
    /// handoff.
    #[must_use]
    pub fn to_lines(&self) -> Vec<(ItemId, u32)> {
        let mut lines: Vec<(ItemId, u32)> = self.iter().collect();
        lines.sort_unstable_by_key(|(id, _)| *id);
        lines
    }

    /// Restore an entry from a persisted draft, as-is.
    ///
    /// Zero quantities are dropped rather than stored; a restored total may
    /// exceed the current cap, in which case [`SelectionMap::adjust`] only
    /// lets it shrink.
    pub fn seed(&mut self, id: ItemId, quantity: u32) {
        if quantity > 0 {
            self.entries.insert(id, quantity);
        }
    }

    /// Adjust an entry's quantity by a signed delta, clamped to
    /// `0 ..= cap − total_excluding_this`.
    ///
    /// The upper bound is computed against the other entries' total, so an
    /// entry already above a stale cap can still be decreased while the map
    /// total never grows past the cap. Reaching 0 removes the entry.
    pub fn adjust(&mut self, id: ItemId, delta: i64, cap: QuantityCap) -> Adjusted {
        let current = self.quantity(id);
        let others = i64::from(self.total()) - i64::from(current);

        let upper = match cap {
            QuantityCap::Unbounded => i64::from(u32::MAX),
            QuantityCap::Total(cap) => (i64::from(cap) - others).max(0),
        };

        let requested = i64::from(current).saturating_add(delta);
        let quantity = requested.clamp(0, upper);

        self.apply(id, u32::try_from(quantity).unwrap_or(0));

        Adjusted {
            quantity: self.quantity(id),
            clamped: quantity != requested,
        }
    }

    /// Set an entry outright, removing it at zero.
    fn apply(&mut self, id: ItemId, quantity: u32) {
        if quantity == 0 {
            self.entries.remove(&id);
        } else {
            self.entries.insert(id, quantity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_accumulates_up_to_cap() {
        let mut map = SelectionMap::new();

        for _ in 0..5 {
            map.adjust(ItemId(10), 1, QuantityCap::Total(5));
        }

        assert_eq!(map.quantity(ItemId(10)), 5);
        assert_eq!(map.total(), 5);

        let sixth = map.adjust(ItemId(10), 1, QuantityCap::Total(5));

        assert_eq!(sixth, Adjusted { quantity: 5, clamped: true });
        assert_eq!(map.total(), 5);
    }

    #[test]
    fn cap_is_shared_across_entries() {
        let mut map = SelectionMap::new();

        map.adjust(ItemId(1), 3, QuantityCap::Total(5));
        let second = map.adjust(ItemId(2), 4, QuantityCap::Total(5));

        assert_eq!(second, Adjusted { quantity: 2, clamped: true });
        assert_eq!(map.total(), 5);
    }

    #[test]
    fn decrease_below_zero_clamps_to_zero_and_removes() {
        let mut map = SelectionMap::new();

        map.adjust(ItemId(1), 2, QuantityCap::Unbounded);
        let result = map.adjust(ItemId(1), -3, QuantityCap::Unbounded);

        assert_eq!(result, Adjusted { quantity: 0, clamped: true });
        assert!(map.is_empty());
        assert_eq!(map.quantity(ItemId(1)), 0);
    }

    #[test]
    fn reaching_zero_exactly_removes_entry() {
        let mut map = SelectionMap::new();

        map.adjust(ItemId(1), 1, QuantityCap::Unbounded);
        let result = map.adjust(ItemId(1), -1, QuantityCap::Unbounded);

        assert_eq!(result, Adjusted { quantity: 0, clamped: false });
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn seeded_entry_above_cap_can_only_shrink() {
        let mut map = SelectionMap::new();
        map.seed(ItemId(1), 7);

        let increase = map.adjust(ItemId(1), 1, QuantityCap::Total(5));
        assert_eq!(increase, Adjusted { quantity: 5, clamped: true });

        map.seed(ItemId(1), 7);
        let decrease = map.adjust(ItemId(1), -1, QuantityCap::Total(5));
        assert_eq!(decrease.quantity, 5);
    }

    #[test]
    fn seed_drops_zero_quantities() {
        let mut map = SelectionMap::new();
        map.seed(ItemId(1), 0);

        assert!(map.is_empty());
    }

    #[test]
    fn unbounded_map_accepts_large_deltas() {
        let mut map = SelectionMap::new();

        let result = map.adjust(ItemId(3), 40, QuantityCap::Unbounded);

        assert_eq!(result, Adjusted { quantity: 40, clamped: false });
    }

    #[test]
    fn to_lines_sorts_by_id() {
        let mut map = SelectionMap::new();
        map.seed(ItemId(9), 1);
        map.seed(ItemId(2), 3);
        map.seed(ItemId(5), 2);

        assert_eq!(
            map.to_lines(),
            vec![(ItemId(2), 3), (ItemId(5), 2), (ItemId(9), 1)]
        );
    }
}
