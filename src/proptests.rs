use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Keys drawn from a few clustered spaces so that operations collide, share
/// long prefixes, and differ only in low or high bits.
fn key_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        2 => 0u32..64,
        2 => (0u32..64).prop_map(|k| k << 26),
        1 => (0u32..16, 0u32..32).prop_map(|(k, shift)| k << shift),
        1 => any::<u32>(),
    ]
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "key_strategy()")] u32, u32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "key_strategy()")] u32),
    #[proptest(weight = 2)]
    Find(#[proptest(strategy = "key_strategy()")] u32),
}

fn check_invariants(t: &RadixTree) {
    assert_eq!(t.validate(), Ok(()));
    t.traverse(|node| {
        assert!(!(node.is_internal() && node.is_set()));
        if let Some(children) = node.children() {
            for child in children {
                assert!(child.index() < t.nodes.len(), "internal node child out of range");
            }
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t = RadixTree::new();
        let mut m: BTreeMap<u32, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.replace(key, value), m.insert(key, value));
                    let (leaf, _) = t.find(key);
                    prop_assert_eq!(leaf.entry(), Some(Entry { key, value }));
                }
                Op::Remove(key) => {
                    let removed = t.remove(key).map(|e| e.value);
                    prop_assert_eq!(removed, m.remove(&key));
                    prop_assert!(!t.contains_key(key));
                }
                Op::Find(key) => {
                    prop_assert_eq!(t.get(key), m.get(&key).copied());
                    let (leaf, branches) = t.find(key);
                    prop_assert!(!leaf.is_internal());
                    prop_assert!(branches <= KEY_BITS);
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        check_invariants(&t);
        let got: Vec<(u32, u32)> = t.iter().collect();
        let expected: Vec<(u32, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);

        // Shape depends only on the stored keys, not on the history.
        let rebuilt: RadixTree = m.into_iter().collect();
        prop_assert_eq!(t.pretty().to_string(), rebuilt.pretty().to_string());
        prop_assert_eq!(t.node_count(), rebuilt.node_count());
    }

    #[test]
    fn prop_traverse_counts_set_leaves(keys in prop::collection::btree_set(key_strategy(), 0..200)) {
        let t: RadixTree = keys.iter().map(|&k| (k, !k)).collect();
        let mut set = 0usize;
        t.traverse(|node| {
            if node.is_set() {
                set += 1;
            }
        });
        prop_assert_eq!(set, keys.len());
        check_invariants(&t);
    }

    #[test]
    fn prop_longest_common_prefix(
        keys in prop::collection::btree_set(key_strategy(), 1..100),
        probe in key_strategy(),
    ) {
        let t: RadixTree = keys.iter().map(|&k| (k, 0)).collect();
        let expected = keys.iter().map(|&k| (k ^ probe).leading_zeros()).max();
        prop_assert_eq!(t.longest_common_prefix(probe), expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [u32; 6] = [
    0x0000_0000,
    0x0000_0001,
    0x8000_0000,
    0xA000_0000,
    0xB000_0000,
    0xFFFF_FFFF,
];

#[test]
fn exhaustive_insert_order_small_set() {
    let reference: RadixTree = SMALL_SET.iter().map(|&k| (k, k)).collect();
    let shape = reference.pretty().to_string();

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = RadixTree::new();
        for k in perm {
            t.insert(k, k);
        }
        check_invariants(&t);
        assert_eq!(t.pretty().to_string(), shape);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let base: RadixTree = SMALL_SET.iter().map(|&k| (k, k)).collect();

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        let mut m: BTreeMap<u32, u32> = SMALL_SET.iter().map(|&k| (k, k)).collect();

        for k in perm {
            assert_eq!(t.remove(k).map(|e| e.value), m.remove(&k));
            assert_eq!(t.len(), m.len());
            check_invariants(&t);
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.node_count(), 1);
        assert!(!t.node(t.root()).is_internal());
    });
}
