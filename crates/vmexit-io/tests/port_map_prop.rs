use proptest::prelude::*;

use vmexit_io::devices::DeviceStubRegistry;
use vmexit_io::{
    DispatchOutcome, IoDirection, IoExit, IoExitDispatcher, PortDispatchTable, PortHandler,
};

const STUB_SAMPLE_PORTS: &[u16] = &[
    0x0060, 0x0064, 0x00C0, 0x00DF, 0x00FF, 0x0378, 0x037A, 0x0278, 0x027F, 0x0510, 0x0511,
    0x000D, 0x03E9, 0x0200, 0x0201, 0x02F8, 0x01F0, 0x01F7, 0x0170, 0x0176,
];

fn direction() -> impl Strategy<Value = IoDirection> {
    prop_oneof![Just(IoDirection::Read), Just(IoDirection::Write)]
}

fn size() -> impl Strategy<Value = u8> {
    prop_oneof![Just(1u8), Just(2u8), Just(4u8)]
}

/// An exit shape plus a buffer of matching length.
fn access() -> impl Strategy<Value = (IoDirection, u8, u32, Vec<u8>)> {
    (direction(), size(), 1u32..=8).prop_flat_map(|(direction, size, count)| {
        let len = usize::from(size) * count as usize;
        (
            Just(direction),
            Just(size),
            Just(count),
            proptest::collection::vec(any::<u8>(), len),
        )
    })
}

fn dispatch(
    d: &mut IoExitDispatcher,
    port: u16,
    (direction, size, count, data): &mut (IoDirection, u8, u32, Vec<u8>),
) -> DispatchOutcome {
    let mut exit = IoExit::new(*direction, *size, port, *count, data).unwrap();
    d.dispatch(&mut exit)
}

proptest! {
    #[test]
    fn stubbed_ports_never_touch_the_buffer(
        port in proptest::sample::select(STUB_SAMPLE_PORTS),
        mut acc in access(),
    ) {
        let mut d = IoExitDispatcher::default();
        let before = acc.3.clone();
        let chipset = *d.chipset();
        prop_assert_eq!(dispatch(&mut d, port, &mut acc), DispatchOutcome::Ignored);
        prop_assert_eq!(&acc.3, &before);
        prop_assert_eq!(*d.chipset(), chipset);
    }

    #[test]
    fn serial_chatter_never_touches_the_buffer(
        port in 0x03F9u16..=0x03FF,
        mut acc in access(),
    ) {
        let mut d = IoExitDispatcher::default();
        let before = acc.3.clone();
        prop_assert_eq!(dispatch(&mut d, port, &mut acc), DispatchOutcome::Ignored);
        prop_assert_eq!(&acc.3, &before);
    }

    #[test]
    fn unmatched_ports_are_ignored_without_side_effects(
        port in any::<u16>(),
        mut acc in access(),
    ) {
        let table = PortDispatchTable::legacy_pc();
        prop_assume!(table.lookup(port).is_none());

        let mut d = IoExitDispatcher::default();
        let before = acc.3.clone();
        let chipset = *d.chipset();
        prop_assert_eq!(dispatch(&mut d, port, &mut acc), DispatchOutcome::Ignored);
        prop_assert_eq!(&acc.3, &before);
        prop_assert_eq!(*d.chipset(), chipset);
    }

    #[test]
    fn rtc_index_is_masked_to_seven_bits(value in any::<u8>()) {
        let mut d = IoExitDispatcher::default();
        let mut acc = (IoDirection::Write, 1u8, 1u32, vec![value]);
        dispatch(&mut d, 0x70, &mut acc);
        prop_assert_eq!(d.chipset().rtc.index(), value & 0x7F);

        let mut read = (IoDirection::Read, 1u8, 1u32, vec![0xAA]);
        dispatch(&mut d, 0x71, &mut read);
        let expected = match value & 0x7F {
            0x0F => 0x00,
            0x34 => 0x08,
            _ => 0xAA,
        };
        prop_assert_eq!(read.3[0], expected);
    }

    #[test]
    fn pci_data_word_read_ignores_latched_address(addr in any::<u32>()) {
        let mut d = IoExitDispatcher::default();
        let mut write = (IoDirection::Write, 4u8, 1u32, addr.to_le_bytes().to_vec());
        dispatch(&mut d, 0xCF8, &mut write);
        prop_assert_eq!(d.chipset().pci.address(), addr);

        let mut read = (IoDirection::Read, 2u8, 1u32, vec![0xFF, 0xFF]);
        dispatch(&mut d, 0xCFC, &mut read);
        prop_assert_eq!(read.3, vec![0x00, 0x80]);
    }
}

#[test]
fn registry_agrees_with_table_for_stub_ports() {
    let table = PortDispatchTable::legacy_pc();
    for &port in STUB_SAMPLE_PORTS {
        let rule = table.lookup(port).expect("stub port has a rule");
        let PortHandler::Stub(dev) = rule.handler else {
            panic!("port {port:#x} routed to {} instead of a stub", rule.name);
        };
        assert!(dev.matches(port), "port {port:#x}");
        assert_eq!(rule.name, dev.name(), "port {port:#x}");
        let first = DeviceStubRegistry::devices().find(|d| d.matches(port));
        assert_eq!(first, Some(dev), "port {port:#x}");
    }
}
