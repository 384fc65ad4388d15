use super::{addr, counting_cache};
use cachesim::PhysAddr;
use cachesim::stats::Outcome;
use cachesim::system::memory::DetachedStore;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(1)]
#[case(2)]
#[case(8)]
#[case(1024)]
fn one_extra_tag_evicts_the_first_touched(#[case] ways: usize) {
    let mut cache = counting_cache(ways);
    let mut store = DetachedStore::new();

    for tag in 0..ways as u64 {
        cache.read_byte(PhysAddr::new(addr(tag, 5)), &mut store).unwrap();
        assert_eq!(cache.last_outcome(), Some(Outcome::Miss));
    }
    cache
        .read_byte(PhysAddr::new(addr(ways as u64, 5)), &mut store)
        .unwrap();
    assert_eq!(cache.last_outcome(), Some(Outcome::MissEviction));

    let mut tags: Vec<u64> = cache.set(5).lines().iter().map(|l| l.tag()).collect();
    tags.sort_unstable();
    let expected: Vec<u64> = (1..=ways as u64).collect();
    assert_eq!(tags, expected);
}

#[test]
fn hit_refreshes_recency() {
    let mut cache = counting_cache(2);
    let mut store = DetachedStore::new();
    let mut outcome = |cache: &mut cachesim::SramCache, tag| {
        cache.read_byte(PhysAddr::new(addr(tag, 0)), &mut store).unwrap();
        cache.last_outcome().unwrap()
    };

    assert_eq!(outcome(&mut cache, 0xA), Outcome::Miss);
    assert_eq!(outcome(&mut cache, 0xB), Outcome::Miss);
    assert_eq!(outcome(&mut cache, 0xA), Outcome::Hit);
    // B is now least recently used.
    assert_eq!(outcome(&mut cache, 0xC), Outcome::MissEviction);
    assert_eq!(outcome(&mut cache, 0xA), Outcome::Hit);
    assert_eq!(outcome(&mut cache, 0xB), Outcome::MissEviction);
    assert_eq!(outcome(&mut cache, 0xC), Outcome::MissEviction);
    assert_eq!(outcome(&mut cache, 0xB), Outcome::Hit);
}

#[test]
fn every_access_ages_the_whole_set() {
    let mut cache = counting_cache(4);
    let mut store = DetachedStore::new();

    cache.read_byte(PhysAddr::new(addr(1, 3)), &mut store).unwrap();
    cache.read_byte(PhysAddr::new(addr(2, 3)), &mut store).unwrap();
    cache.read_byte(PhysAddr::new(addr(1, 3)), &mut store).unwrap();

    // Free lines are taken from the back of the set.
    let recency: Vec<u64> = cache.set(3).lines().iter().map(|l| l.recency()).collect();
    assert_eq!(recency, vec![3, 3, 1, 0]);
}

#[test]
fn other_sets_are_untouched() {
    let mut cache = counting_cache(2);
    let mut store = DetachedStore::new();
    cache.read_byte(PhysAddr::new(addr(1, 7)), &mut store).unwrap();

    for (index, set) in cache.sets().iter().enumerate() {
        if index != 7 {
            assert!(set.lines().iter().all(|l| l.recency() == 0));
            assert_eq!(set.valid_lines(), 0);
        }
    }
}

#[test]
fn fill_order_runs_from_the_last_way() {
    let mut cache = counting_cache(2);
    let mut store = DetachedStore::new();

    // Fill way 1 then way 0; after that way 1 is older.
    cache.read_byte(PhysAddr::new(addr(1, 0)), &mut store).unwrap();
    cache.read_byte(PhysAddr::new(addr(2, 0)), &mut store).unwrap();
    assert_eq!(cache.set(0).lines()[1].tag(), 1);
    assert_eq!(cache.set(0).lines()[0].tag(), 2);

    cache.read_byte(PhysAddr::new(addr(3, 0)), &mut store).unwrap();
    assert_eq!(cache.set(0).lines()[1].tag(), 3);
    assert_eq!(cache.set(0).lines()[0].tag(), 2);
}
