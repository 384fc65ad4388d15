use cachesim::common::constants::{PHYSICAL_ADDRESS_BITS, PAGE_NUMBER_BITS, PAGE_OFFSET_BITS};
use cachesim::common::{AddressLayout, PhysAddr};
use rstest::rstest;

#[test]
fn page_view_widths_cover_the_address() {
    assert_eq!(PAGE_NUMBER_BITS + PAGE_OFFSET_BITS, PHYSICAL_ADDRESS_BITS);
}

#[rstest]
#[case(6, 6, 40)]
#[case(4, 4, 44)]
#[case(1, 1, 50)]
#[case(5, 0, 47)]
fn tag_takes_remaining_bits(#[case] b: u32, #[case] s: u32, #[case] tag_bits: u32) {
    let layout = AddressLayout::new(b, s).unwrap();
    assert_eq!(layout.tag_bits(), tag_bits);
    assert_eq!(layout.block_bytes(), 1 << b);
    assert_eq!(layout.num_sets(), 1 << s);
}

#[test]
fn fields_are_exact_bit_slices() {
    let layout = AddressLayout::new(6, 6).unwrap();

    let a = layout.decode(PhysAddr::new(0x0000_0000_003F));
    assert_eq!((a.tag, a.index, a.offset), (0, 0, 0x3F));

    let a = layout.decode(PhysAddr::new(0x0000_0000_0FC0));
    assert_eq!((a.tag, a.index, a.offset), (0, 0x3F, 0));

    let a = layout.decode(PhysAddr::new(0x0000_0000_1000));
    assert_eq!((a.tag, a.index, a.offset), (1, 0, 0));

    let a = layout.decode(PhysAddr::new(0xF_FFFF_FFFF_FFFF));
    assert_eq!((a.tag, a.index, a.offset), ((1 << 40) - 1, 0x3F, 0x3F));
}

#[test]
fn block_base_clears_offset_only() {
    let layout = AddressLayout::new(4, 2).unwrap();
    assert_eq!(layout.block_base(PhysAddr::new(0x12F)).val(), 0x120);
    assert_eq!(layout.compose(0x4, 0x2).val(), 0x120);
}

#[test]
fn paging_view_of_same_bits() {
    let addr = PhysAddr::new(0xA_BCDE_F012_3456);
    assert_eq!(addr.page_offset(), 0x456);
    assert_eq!(addr.page_number(), 0xA_BCDE_F012_3);
}
