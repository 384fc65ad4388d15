//! Block transfers between the cache and a mocked backing store.

use cachesim::config::CacheConfig;
use cachesim::system::memory::LineStore;
use cachesim::{PhysAddr, Result, SramCache};
use mockall::mock;
use mockall::predicate::eq;

mock! {
    pub Store {}
    impl LineStore for Store {
        fn check_block(&self, addr: PhysAddr, len: usize) -> Result<()>;
        fn read_block(&mut self, addr: PhysAddr, buf: &mut [u8]) -> Result<()>;
        fn write_block(&mut self, addr: PhysAddr, buf: &[u8]) -> Result<()>;
    }
}

fn direct_mapped() -> SramCache {
    let config = CacheConfig {
        ways: 1,
        ..CacheConfig::default()
    };
    SramCache::new(&config).unwrap()
}

fn permissive_checks(store: &mut MockStore) {
    store.expect_check_block().returning(|_, _| Ok(()));
}

#[test]
fn dirty_block_is_written_back_exactly_once_at_its_own_address() {
    let mut store = MockStore::new();
    permissive_checks(&mut store);
    store.expect_read_block().times(3).returning(|_, buf| {
        buf.fill(0);
        Ok(())
    });
    store
        .expect_write_block()
        .with(eq(PhysAddr::new(0x0000)), mockall::predicate::always())
        .times(1)
        .returning(|_, buf| {
            assert_eq!(buf.len(), 64);
            assert_eq!(buf[5], 0xAB);
            Ok(())
        });
    store
        .expect_write_block()
        .with(eq(PhysAddr::new(0x1000)), mockall::predicate::always())
        .times(1)
        .returning(|_, buf| {
            assert_eq!(buf[0], 0xCD);
            Ok(())
        });

    let mut cache = direct_mapped();
    cache.write_byte(PhysAddr::new(0x0005), 0xAB, &mut store).unwrap();
    cache.write_byte(PhysAddr::new(0x1000), 0xCD, &mut store).unwrap();
    cache.read_byte(PhysAddr::new(0x0005), &mut store).unwrap();
}

#[test]
fn clean_blocks_are_discarded_silently() {
    let mut store = MockStore::new();
    permissive_checks(&mut store);
    store.expect_read_block().times(4).returning(|_, _| Ok(()));
    store.expect_write_block().never();

    let mut cache = direct_mapped();
    for addr in [0x0000, 0x1000, 0x2000, 0x0000] {
        cache.read_byte(PhysAddr::new(addr), &mut store).unwrap();
    }
}

#[test]
fn hits_never_reach_the_store() {
    let mut store = MockStore::new();
    permissive_checks(&mut store);
    store
        .expect_read_block()
        .with(eq(PhysAddr::new(0x0240)), mockall::predicate::always())
        .times(1)
        .returning(|_, _| Ok(()));
    store.expect_write_block().never();

    let mut cache = direct_mapped();
    for offset in 0..64 {
        cache
            .write_byte(PhysAddr::new(0x240 + offset), offset as u8, &mut store)
            .unwrap();
    }
    assert_eq!(cache.read_byte(PhysAddr::new(0x27F), &mut store).unwrap(), 63);
}

#[test]
fn rejected_block_stops_the_access_before_any_transfer() {
    let mut store = MockStore::new();
    store.expect_check_block().returning(|addr, len| {
        Err(cachesim::MemError::OutOfRange {
            addr: addr.val(),
            len,
            size: 0,
        })
    });
    store.expect_read_block().never();
    store.expect_write_block().never();

    let mut cache = direct_mapped();
    assert!(cache.read_byte(PhysAddr::new(0x40), &mut store).is_err());
    assert_eq!(cache.set(1).lines()[0].recency(), 0);
}
