use cachesim::PhysAddr;
use cachesim::MemError;
use cachesim::system::memory::{Dram, LineStore};
use rstest::rstest;

#[rstest]
#[case(0, 0)]
#[case(0x100, 0x0123_4567_89AB_CDEF)]
#[case(0xFFF8, u64::MAX)]
fn u64_round_trip(#[case] addr: u64, #[case] val: u64) {
    let mut mem = Dram::new(65536, 64);
    mem.write_u64(addr, val).unwrap();
    assert_eq!(mem.read_u64(addr).unwrap(), val);
    for i in 0..8 {
        assert_eq!(mem.read_u8(addr + i).unwrap(), (val >> (8 * i)) as u8);
    }
}

#[test]
fn instruction_buffer_is_exact_length() {
    let mut mem = Dram::new(4096, 16);
    mem.write_instruction(0x20, "push %rbp").unwrap();
    let raw = mem.read_instruction(0x20).unwrap();
    assert_eq!(raw.len(), 16);
    assert_eq!(&raw[..9], b"push %rbp");
    assert_eq!(&raw[9..], &[0u8; 7]);
    // The byte after the buffer is not part of it.
    assert_eq!(mem.read_u8(0x30).unwrap(), 0);
}

#[test]
fn instruction_longer_than_buffer_is_rejected_without_writing() {
    let mut mem = Dram::new(4096, 16);
    let err = mem.write_instruction(0, "0123456789abcdef").unwrap_err();
    assert!(matches!(err, MemError::InstructionTooLong { len: 16, max: 16 }));
    assert!(mem.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn line_store_moves_whole_blocks() {
    let mut mem = Dram::new(4096, 64);
    let block = [0x5Au8; 32];
    mem.write_block(PhysAddr::new(0x45), &block).unwrap();
    assert_eq!(mem.read_u8(0x3F).unwrap(), 0);
    assert_eq!(mem.read_u8(0x40).unwrap(), 0x5A);
    assert_eq!(mem.read_u8(0x5F).unwrap(), 0x5A);
    assert_eq!(mem.read_u8(0x60).unwrap(), 0);

    assert!(mem.check_block(PhysAddr::new(0xFFF), 32).is_ok());
    assert!(mem.check_block(PhysAddr::new(0x1000), 32).is_err());
    assert!(matches!(
        mem.check_block(PhysAddr::new(0), 24),
        Err(MemError::InvalidConfig(_))
    ));
}

#[test]
fn load_places_image() {
    let mut mem = Dram::new(4096, 64);
    mem.load(&[1, 2, 3, 4], 0x10).unwrap();
    assert_eq!(mem.read_u8(0x13).unwrap(), 4);
    assert!(mem.load(&[0; 8], 4092).unwrap_err().is_out_of_range());
}
