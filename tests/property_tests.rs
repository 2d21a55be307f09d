use proptest::prelude::*;
use std::collections::BTreeMap;

use canopy::{BPlusTree, EngineError, Interval, OrderedTable};

#[derive(Debug, Clone)]
enum Operation {
    Put { key: i32, value: i32 },
    Get { key: i32 },
    Delete { key: i32 },
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-200..200i32, any::<i32>()).prop_map(|(key, value)| Operation::Put { key, value }),
        1 => (-200..200i32).prop_map(|key| Operation::Get { key }),
        2 => (-200..200i32).prop_map(|key| Operation::Delete { key }),
    ]
}

/// Routes a record the way the external buffer layer does: out-of-range
/// keys accumulate in `buffer` and flush through `write` once full.
fn routed_put(
    tree: &mut BPlusTree<i32, i32>,
    buffer: &mut OrderedTable<i32, i32>,
    buffer_capacity: usize,
    key: i32,
    value: i32,
) {
    let buffered = match tree.index_range() {
        None => true,
        Some(range) => key > range.right,
    };
    if buffered {
        buffer.put(key, value);
        if buffer.len() == buffer_capacity {
            let batch = std::mem::take(buffer);
            tree.write(batch).unwrap();
        }
    } else {
        tree.insert(key, value).unwrap();
    }
}

proptest! {
    #[test]
    fn prop_loaded_tree_matches_btreemap(
        records in prop::collection::vec((-500..500i32, any::<i32>()), 1..300),
        probes in prop::collection::vec(-500..500i32, 1..100),
    ) {
        let mut tree = BPlusTree::new(4, 6).unwrap();
        let mut buffer = OrderedTable::new();
        let mut model = BTreeMap::new();
        for (key, value) in records {
            model.insert(key, value);
            routed_put(&mut tree, &mut buffer, 4, key, value);
        }
        if !buffer.is_empty() {
            tree.write(std::mem::take(&mut buffer)).unwrap();
        }
        for (key, value) in &model {
            prop_assert_eq!(tree.get(key), Some(value));
        }
        for key in probes {
            prop_assert_eq!(tree.get(&key), model.get(&key));
        }
        prop_assert_eq!(tree.stats().table_count, tree.size());
        prop_assert_eq!(tree.stats().overfull_blocks, 0);
    }

    #[test]
    fn prop_mixed_phase_stays_consistent(
        load in prop::collection::vec((-200..200i32, any::<i32>()), 1..200),
        ops in prop::collection::vec(arb_operation(), 1..200),
    ) {
        let mut tree = BPlusTree::new(4, 6).unwrap();
        let mut buffer = OrderedTable::new();
        let mut model = BTreeMap::new();
        for (key, value) in load {
            model.insert(key, value);
            routed_put(&mut tree, &mut buffer, 4, key, value);
        }
        if !buffer.is_empty() {
            tree.write(std::mem::take(&mut buffer)).unwrap();
        }
        // The second phase inserts only keys the index covers at that
        // moment, so every operation goes straight at the tree.
        for op in ops {
            match op {
                Operation::Put { key, value } => {
                    let in_range = tree.index_range().is_some_and(|range| key <= range.right);
                    if in_range {
                        model.insert(key, value);
                        tree.insert(key, value).unwrap();
                    }
                }
                Operation::Get { key } => {
                    prop_assert_eq!(tree.get(&key), model.get(&key));
                }
                Operation::Delete { key } => {
                    prop_assert_eq!(tree.delete(&key), model.remove(&key));
                }
            }
            prop_assert_eq!(tree.size(), tree.stats().table_count);
        }
    }

    #[test]
    fn prop_split_partitions_every_table(
        keys in prop::collection::btree_set(any::<i32>(), 3..300),
    ) {
        let mut left: OrderedTable<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let total = left.len();
        let right = left.split().unwrap();
        prop_assert_eq!(left.len() + right.len(), total);
        prop_assert!(!left.is_empty());
        prop_assert!(!right.is_empty());
        prop_assert!(left.max_key().unwrap() < right.min_key().unwrap());
        let mut rejoined: Vec<i32> = left.iter().chain(right.iter()).map(|(k, _)| *k).collect();
        rejoined.sort_unstable();
        let expected: Vec<i32> = keys.into_iter().collect();
        prop_assert_eq!(rejoined, expected);
    }

    #[test]
    fn prop_undersized_split_never_mutates(
        keys in prop::collection::btree_set(any::<i32>(), 0..3),
    ) {
        let size = keys.len();
        let mut table: OrderedTable<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        prop_assert_eq!(table.split().unwrap_err(), EngineError::InsufficientSize { size });
        prop_assert_eq!(table.len(), size);
    }

    #[test]
    fn prop_overlapping_writes_are_rejected(
        lo in -1000..1000i32,
        span in 1..50i32,
        offset in -50..=0i32,
    ) {
        let mut tree = BPlusTree::new(4, 100).unwrap();
        tree.write((lo..=lo + span).map(|k| (k, k)).collect()).unwrap();
        let size_before = tree.size();
        // A batch whose smallest key does not clear the index range fails.
        let bad: OrderedTable<i32, i32> =
            (lo + span + offset..=lo + 2 * span).map(|k| (k, k)).collect();
        prop_assert_eq!(tree.write(bad).unwrap_err(), EngineError::OutOfRange);
        prop_assert_eq!(tree.size(), size_before);
        // Clearing the boundary by one makes the same span acceptable.
        let good: OrderedTable<i32, i32> =
            (lo + span + 1..=lo + 2 * span + 1).map(|k| (k, k)).collect();
        prop_assert!(tree.write(good).is_ok());
    }

    #[test]
    fn prop_interval_contains_agrees_with_compare(
        a in any::<i32>(),
        b in any::<i32>(),
        probe in any::<i32>(),
    ) {
        prop_assume!(a != b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let range = Interval::new(lo, hi).unwrap();
        prop_assert_eq!(range.contains(&probe), lo <= probe && probe <= hi);
        if let Ok(point_side) = Interval::new(probe, probe.saturating_add(1)) {
            let ordering = range.compare(&point_side);
            if range.contains(&probe) {
                prop_assert_ne!(ordering, std::cmp::Ordering::Greater);
            }
        }
    }
}
