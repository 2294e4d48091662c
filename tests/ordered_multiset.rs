use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sealed_rbtree::{OrderedMultiMap, OrderedMultiSet, SealedIndex};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 3_000;

/// A narrow key range so most keys repeat many times.
fn key_strategy() -> impl Strategy<Value = i32> {
    0i32..50i32
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MultiOp {
    Insert(i32),
    Remove(i32),
    RemoveAll(i32),
    Count(i32),
    RemoveFirst,
    RemoveLast,
}

fn multi_op_strategy() -> impl Strategy<Value = MultiOp> {
    prop_oneof![
        8 => key_strategy().prop_map(MultiOp::Insert),
        3 => key_strategy().prop_map(MultiOp::Remove),
        1 => key_strategy().prop_map(MultiOp::RemoveAll),
        2 => key_strategy().prop_map(MultiOp::Count),
        1 => Just(MultiOp::RemoveFirst),
        1 => Just(MultiOp::RemoveLast),
    ]
}

/// A sorted `Vec` of `(key, serial)` pairs, equal keys in insertion order.
#[derive(Default)]
struct Model {
    entries: Vec<(i32, u32)>,
}

impl Model {
    fn insert(&mut self, entry: (i32, u32)) {
        let at = self.entries.partition_point(|&(k, _)| k <= entry.0);
        self.entries.insert(at, entry);
    }

    fn equal_range(&self, key: i32) -> std::ops::Range<usize> {
        self.entries.partition_point(|&(k, _)| k < key)..self.entries.partition_point(|&(k, _)| k <= key)
    }

    fn remove(&mut self, key: i32) -> Option<(i32, u32)> {
        let range = self.equal_range(key);
        (!range.is_empty()).then(|| self.entries.remove(range.start))
    }

    fn remove_all(&mut self, key: i32) -> usize {
        let range = self.equal_range(key);
        self.entries.drain(range).count()
    }
}

/// Every position in traversal order, ending with the end position.
fn all_positions(map: &OrderedMultiMap<i32, u32>) -> Vec<SealedIndex> {
    let mut positions = vec![map.start_index()];
    while !positions[positions.len() - 1].is_end() {
        let next = map.index_after(&positions[positions.len() - 1]).unwrap();
        positions.push(next);
    }
    positions
}

// ─── Stable duplicates ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations against a sorted `Vec` model, which also pins down the order of
    /// equal keys: later insertions sort after earlier ones.
    #[test]
    fn multimap_ops_match_model(ops in proptest::collection::vec(multi_op_strategy(), TEST_SIZE)) {
        let mut map: OrderedMultiMap<i32, u32> = OrderedMultiMap::new();
        let mut model = Model::default();
        let mut serial = 0u32;

        for op in &ops {
            match *op {
                MultiOp::Insert(k) => {
                    serial += 1;
                    let (index, inserted) = map.insert((k, serial));
                    prop_assert!(inserted);
                    prop_assert_eq!(map.value_at(&index), Ok(&(k, serial)));
                    model.insert((k, serial));
                }
                MultiOp::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(k), "remove({})", k);
                }
                MultiOp::RemoveAll(k) => {
                    prop_assert_eq!(map.remove_all(&k), model.remove_all(k), "remove_all({})", k);
                }
                MultiOp::Count(k) => {
                    prop_assert_eq!(map.count(&k), model.equal_range(k).len(), "count({})", k);
                }
                MultiOp::RemoveFirst => {
                    let expected = (!model.entries.is_empty()).then(|| model.entries.remove(0));
                    prop_assert_eq!(map.remove_first(), expected);
                }
                MultiOp::RemoveLast => {
                    prop_assert_eq!(map.remove_last(), model.entries.pop());
                }
            }
        }

        prop_assert!(map.check_invariants().is_ok());
        prop_assert_eq!(map.to_vec(), model.entries);
    }

    /// Both tie-breaking comparators agree with traversal order for every pair of positions.
    #[test]
    fn position_order_matches_traversal(keys in proptest::collection::vec(0i32..4, 1..300)) {
        let map: OrderedMultiMap<i32, u32> = keys.iter().zip(0..).map(|(&k, s)| (k, s)).collect();
        let positions = all_positions(&map);
        prop_assert_eq!(positions.len(), keys.len() + 1);

        for (i, a) in positions.iter().enumerate().step_by(7) {
            for (j, b) in positions.iter().enumerate() {
                prop_assert_eq!(map.position_less(a, b), Ok(i < j), "position_less({}, {})", i, j);
                prop_assert_eq!(map.compare_positions_by_path_bits(a, b), Ok(i < j));
                prop_assert_eq!(map.distance(a, b), Ok(j as isize - i as isize));
            }
        }
    }

    /// Offsetting an index lands where stepping one at a time does.
    #[test]
    fn index_offset_matches_stepping(
        keys in proptest::collection::vec(key_strategy(), 1..500),
        from in 0usize..500,
        by in -500isize..500,
    ) {
        let map: OrderedMultiMap<i32, u32> = keys.iter().map(|&k| (k, 0)).collect();
        let positions = all_positions(&map);
        let from = from % positions.len();
        let target = from as isize + by;

        let result = map.index_offset(&positions[from], by);
        if target < 0 {
            prop_assert_eq!(result, Err(sealed_rbtree::IndexError::LowerOutOfBounds));
        } else if target as usize >= positions.len() {
            prop_assert_eq!(result, Err(sealed_rbtree::IndexError::UpperOutOfBounds));
        } else {
            prop_assert_eq!(result, Ok(positions[target as usize].clone()));
        }
    }
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn duplicates_keep_insertion_order() {
    let mut bag = OrderedMultiSet::new();
    for value in [3, 1, 3, 2, 3, 1] {
        bag.insert(value);
    }
    assert_eq!(bag.to_vec(), [1, 1, 2, 3, 3, 3]);
    assert_eq!(bag.count(&3), 3);
    assert_eq!(bag.remove_all(&3), 3);
    assert_eq!(bag.to_vec(), [1, 1, 2]);
    bag.check_invariants().unwrap();
}

#[test]
fn equal_range_bounds_every_duplicate() {
    let map: OrderedMultiMap<&str, u8> = [("b", 1), ("a", 0), ("b", 2), ("c", 0), ("b", 3)].into();
    let (from, to) = map.equal_range(&"b");
    let bs: Vec<_> = map.iter_between(&from, &to).unwrap().map(|&(_, v)| v).collect();
    assert_eq!(bs, [1, 2, 3]);

    let (from, to) = map.equal_range(&"z");
    assert!(from.is_end());
    assert_eq!(from, to);
}

#[test]
fn remove_at_takes_exactly_that_duplicate() {
    let mut map: OrderedMultiMap<u8, char> = [(1, 'a'), (1, 'b'), (1, 'c')].into();
    let middle = map.index_after(&map.start_index()).unwrap();
    let last = map.last_index().unwrap();

    assert_eq!(map.remove_at(&middle), Ok((1, 'b')));
    assert_eq!(map.value_at(&last), Ok(&(1, 'c')));
    assert_eq!(map.to_vec(), [(1, 'a'), (1, 'c')]);
}

#[test]
fn deep_runs_of_duplicates_still_compare() {
    let bag: OrderedMultiSet<u8> = std::iter::repeat_n(9, 5_000).collect();
    bag.check_invariants().unwrap();
    let first = bag.first_index().unwrap();
    let last = bag.last_index().unwrap();
    let almost = bag.index_before(&last).unwrap();

    assert_eq!(bag.position_less(&first, &last), Ok(true));
    assert_eq!(bag.position_less(&almost, &last), Ok(true));
    assert_eq!(bag.position_less(&last, &almost), Ok(false));
    assert_eq!(bag.compare_positions_by_path_bits(&almost, &last), Ok(true));
    assert_eq!(bag.distance(&first, &last), Ok(4_999));
}
