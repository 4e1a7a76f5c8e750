//! Match discovery and order assembly shared by the section and sentence
//! aligners.
//!
//! Discovery produces a [`MatchTable`]: one slot per old item, `None` when
//! the item found no partner. Assembly turns a table into [`Slot`]s in output
//! order. The two steps are independent so that per-match work (child
//! alignment, pair construction) can run between them without touching order.

use crate::assignment::max_weight_assignment;

/// An old item's partner on the new side.
#[derive(Clone, Debug, PartialEq)]
pub struct Match<S> {
    pub new_index: usize,
    pub score: S,
}

/// Match table indexed by old position.
pub type MatchTable<S> = Vec<Option<Match<S>>>;

/// One position of an assembled alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Matched { old: usize, new: usize },
    Deleted { old: usize },
    Added { new: usize },
}

/// Greedy forward-only matching.
///
/// Each old item scans the new items strictly after the last consumed index
/// and takes the first one `accept` returns a score for. Earlier choices are
/// never revisited.
pub fn find_ordered<S>(
    old_len: usize,
    new_len: usize,
    mut accept: impl FnMut(usize, usize) -> Option<S>,
) -> MatchTable<S> {
    let mut table: MatchTable<S> = (0..old_len).map(|_| None).collect();
    if old_len == 0 || new_len == 0 {
        return table;
    }

    let mut next_new = 0;
    for (i, slot) in table.iter_mut().enumerate() {
        for j in next_new..new_len {
            if let Some(score) = accept(i, j) {
                *slot = Some(Match { new_index: j, score });
                next_new = j + 1;
                break;
            }
        }
    }
    table
}

/// Maximum-weight matching over a dense `old x new` weight matrix.
///
/// Only assignments with strictly positive weight are kept; mark disallowed
/// cells with a negative weight.
pub fn find_optimal(weights: &[Vec<f64>]) -> MatchTable<f64> {
    max_weight_assignment(weights)
        .into_iter()
        .enumerate()
        .map(|(i, assigned)| {
            let j = assigned?;
            let score = weights[i][j];
            (score > 0.0).then_some(Match { new_index: j, score })
        })
        .collect()
}

/// Assemble an order-preserving table: old items in order, with unconsumed
/// new items inserted at the gap where they sit between consumed indices.
pub fn ordered_slots<S>(table: &[Option<Match<S>>], new_len: usize) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(table.len() + new_len);
    let mut next_new = 0;

    for (old, entry) in table.iter().enumerate() {
        match entry {
            Some(m) => {
                if m.new_index >= next_new {
                    slots.extend((next_new..m.new_index).map(|new| Slot::Added { new }));
                    next_new = m.new_index + 1;
                }
                slots.push(Slot::Matched {
                    old,
                    new: m.new_index,
                });
            }
            None => slots.push(Slot::Deleted { old }),
        }
    }
    slots.extend((next_new..new_len).map(|new| Slot::Added { new }));
    slots
}

/// Assemble an unordered table: old items in order, then every unmatched
/// new item in new order.
pub fn unordered_slots<S>(table: &[Option<Match<S>>], new_len: usize) -> Vec<Slot> {
    let mut used = vec![false; new_len];
    let mut slots = Vec::with_capacity(table.len() + new_len);

    for (old, entry) in table.iter().enumerate() {
        match entry {
            Some(m) => {
                used[m.new_index] = true;
                slots.push(Slot::Matched {
                    old,
                    new: m.new_index,
                });
            }
            None => slots.push(Slot::Deleted { old }),
        }
    }
    slots.extend(
        used.iter()
            .enumerate()
            .filter(|(_, &u)| !u)
            .map(|(new, _)| Slot::Added { new }),
    );
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn equal_strings<'a>(
        old: &'a [&'a str],
        new: &'a [&'a str],
    ) -> impl FnMut(usize, usize) -> Option<()> + 'a {
        move |i, j| (old[i] == new[j]).then_some(())
    }

    #[test]
    fn ordered_skips_inserted_item() {
        let old = ["A", "C"];
        let new = ["A", "B", "C"];
        let table = find_ordered(old.len(), new.len(), equal_strings(&old, &new));
        assert_eq!(table[0].as_ref().map(|m| m.new_index), Some(0));
        assert_eq!(table[1].as_ref().map(|m| m.new_index), Some(2));

        let slots = ordered_slots(&table, new.len());
        assert_eq!(
            slots,
            vec![
                Slot::Matched { old: 0, new: 0 },
                Slot::Added { new: 1 },
                Slot::Matched { old: 1, new: 2 },
            ]
        );
    }

    #[test]
    fn ordered_never_backtracks() {
        // "B" matches at index 1, so "A" at index 0 can no longer be used.
        let old = ["B", "A"];
        let new = ["A", "B"];
        let table = find_ordered(old.len(), new.len(), equal_strings(&old, &new));
        assert_eq!(table[0].as_ref().map(|m| m.new_index), Some(1));
        assert!(table[1].is_none());

        let slots = ordered_slots(&table, new.len());
        assert_eq!(
            slots,
            vec![
                Slot::Added { new: 0 },
                Slot::Matched { old: 0, new: 1 },
                Slot::Deleted { old: 1 },
            ]
        );
    }

    #[test]
    fn empty_sides() {
        let table = find_ordered::<()>(2, 0, |_, _| Some(()));
        assert!(table.iter().all(Option::is_none));
        assert_eq!(
            ordered_slots(&table, 0),
            vec![Slot::Deleted { old: 0 }, Slot::Deleted { old: 1 }]
        );
        let table = find_ordered::<()>(0, 2, |_, _| Some(()));
        assert_eq!(
            ordered_slots(&table, 2),
            vec![Slot::Added { new: 0 }, Slot::Added { new: 1 }]
        );
    }

    #[test]
    fn optimal_drops_non_positive_assignments() {
        let weights = vec![vec![-1.0, 0.8], vec![-1.0, -1.0]];
        let table = find_optimal(&weights);
        assert_eq!(table[0], Some(Match { new_index: 1, score: 0.8 }));
        assert_eq!(table[1], None);

        assert_eq!(
            unordered_slots(&table, 2),
            vec![
                Slot::Matched { old: 0, new: 1 },
                Slot::Deleted { old: 1 },
                Slot::Added { new: 0 },
            ]
        );
    }

    fn old_indices(slots: &[Slot]) -> Vec<usize> {
        slots
            .iter()
            .filter_map(|s| match s {
                Slot::Matched { old, .. } | Slot::Deleted { old } => Some(*old),
                Slot::Added { .. } => None,
            })
            .collect()
    }

    fn new_indices(slots: &[Slot]) -> Vec<usize> {
        let mut seen: Vec<usize> = slots
            .iter()
            .filter_map(|s| match s {
                Slot::Matched { new, .. } | Slot::Added { new } => Some(*new),
                Slot::Deleted { .. } => None,
            })
            .collect();
        seen.sort_unstable();
        seen
    }

    proptest! {
        #[test]
        fn ordered_assembly_covers_both_sides(
            old in prop::collection::vec(0u8..4, 0..8),
            new in prop::collection::vec(0u8..4, 0..8),
        ) {
            let table = find_ordered(old.len(), new.len(), |i, j| (old[i] == new[j]).then_some(()));
            let slots = ordered_slots(&table, new.len());

            prop_assert_eq!(old_indices(&slots), (0..old.len()).collect::<Vec<_>>());
            prop_assert_eq!(new_indices(&slots), (0..new.len()).collect::<Vec<_>>());

            let matched_new: Vec<usize> = slots
                .iter()
                .filter_map(|s| match s {
                    Slot::Matched { new, .. } => Some(*new),
                    _ => None,
                })
                .collect();
            prop_assert!(matched_new.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn unordered_assembly_covers_both_sides(
            weights in prop::collection::vec(prop::collection::vec(-1.0f64..1.0, 3), 0..5),
        ) {
            let table = find_optimal(&weights);
            let slots = unordered_slots(&table, 3);
            prop_assert_eq!(old_indices(&slots), (0..weights.len()).collect::<Vec<_>>());
            prop_assert_eq!(new_indices(&slots), vec![0, 1, 2]);
        }
    }
}
