//! Persistence tests: every earlier version stays readable and unchanged.

use crate::ChampMap;

/// Insert leaves the original untouched.
#[test]
fn insert_keeps_original() {
    let base: ChampMap<_, _> = [(1, 10), (2, 20)].into_iter().collect();
    let saved_hash = base.combined_hash();

    let (grown, _) = base.insert(3, 30);
    let (grown, _) = grown.insert(4, 40);

    assert_eq!(grown.len(), 4);
    assert_eq!(base.len(), 2);
    assert_eq!(base.combined_hash(), saved_hash);
    assert_eq!(base.get(&1), Some(&10));
    assert_eq!(base.get(&3), None);
    assert_eq!(base.get(&4), None);
}

/// Remove leaves the original untouched.
#[test]
fn remove_keeps_original() {
    let base: ChampMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();

    let (shrunk, _) = base.remove(&"a");
    assert_eq!(shrunk.len(), 1);

    assert_eq!(base.len(), 2);
    assert_eq!(base.get(&"a"), Some(&1));
    assert_eq!(base.get(&"b"), Some(&2));
}

/// Overwriting a value leaves the original value in the old map.
#[test]
fn overwrite_keeps_original() {
    let (v1, _) = ChampMap::new().insert("k", 1);
    let (v2, _) = v1.insert("k", 2);

    assert_eq!(v1.get(&"k"), Some(&1));
    assert_eq!(v2.get(&"k"), Some(&2));
    assert_ne!(v1, v2);
}

/// Every intermediate version of a chain of inserts stays intact.
#[test]
fn version_history() {
    let mut versions = vec![ChampMap::new()];
    for i in 0..50_u32 {
        let (next, _) = versions[versions.len() - 1].insert(i, i * i);
        versions.push(next);
    }

    for (n, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), n);
        for i in 0..50_u32 {
            let expected = (i < n as u32).then_some(i * i);
            assert_eq!(version.get(&i).copied(), expected, "version {n}, key {i}");
        }
        assert_eq!(version.validate(), Ok(()));
    }
}

/// Insert 1..=40, remove 1..=39: only 40 is left, in canonical shape.
#[test]
fn grow_then_shrink_to_one() {
    let mut map = ChampMap::new();
    for i in 1..=40 {
        map = map.insert(i, i).0;
    }
    let full = map.clone();
    for i in 1..40 {
        map = map.remove(&i).0;
    }

    let single: ChampMap<_, _> = [(40, 40)].into_iter().collect();
    assert_eq!(map, single);
    assert_eq!(format!("{:?}", map.root.node), format!("{:?}", single.root.node));
    assert_eq!(full.len(), 40);
    assert_eq!(map.validate(), Ok(()));
}

/// Unchanged results share the root.
#[test]
fn noop_updates_share_root() {
    let base: ChampMap<_, _> = (0..100).map(|i| (i, i)).collect();

    let (same_value, old) = base.insert(5, 5);
    assert_eq!(old, Some(5));
    assert!(same_value.ptr_eq(&base));

    let (missing, old) = base.remove(&1000);
    assert_eq!(old, None);
    assert!(missing.ptr_eq(&base));

    let (changed, _) = base.insert(5, 6);
    assert!(!changed.ptr_eq(&base));
}

/// Persistent maps can be shared across threads.
#[test]
fn versions_shared_across_threads() {
    let base: ChampMap<u32, u32> = (0..1000).map(|i| (i, i)).collect();

    std::thread::scope(|scope| {
        for t in 0..4_u32 {
            let base = &base;
            scope.spawn(move || {
                let (mine, _) = base.insert(10_000 + t, t);
                assert_eq!(mine.len(), 1001);
                assert_eq!(base.len(), 1000);
                assert_eq!(mine.get(&(10_000 + t)), Some(&t));
            });
        }
    });
    assert_eq!(base.len(), 1000);
}
