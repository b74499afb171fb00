//! Legacy devices that are decoded but deliberately not modelled.
//!
//! Accesses to these ports are swallowed: no state changes and, on reads, the guest buffer keeps
//! whatever bytes it already held. Nothing here zero-fills.

use crate::dispatch::DispatchOutcome;
use crate::exit::IoExit;
use crate::ports::{
    PortMatch, DMA2_IO_BASE, DMA2_IO_MASK, HDC1_IO_BASE, HDC1_IO_MASK, HDC2_IO_BASE, HDC2_IO_MASK,
    KBC_IO_BASE, KBC_IO_MASK, LEGACY_DIAGNOSTIC_PORTS, PARALLEL_PRINTER1_IO_BASE,
    PARALLEL_PRINTER2_IO_BASE, PARALLEL_PRINTER_IO_MASK, UPW48_IO_BASE, UPW48_IO_MASK,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubDevice {
    /// Secondary (16-bit) 8237 DMA controller.
    Dma2,
    /// i8042 keyboard controller.
    KeyboardController,
    ParallelPrinter,
    LegacyDiagnostic,
    /// Catch-all for the `0x200..=0x2FF` window (game port, sound cards, COM4/COM2 aliases).
    Upw48,
    PrimaryDiskController,
    SecondaryDiskController,
}

const DMA2: [PortMatch; 1] = [PortMatch::masked(DMA2_IO_BASE, DMA2_IO_MASK)];
const KBC: [PortMatch; 1] = [PortMatch::masked(KBC_IO_BASE, KBC_IO_MASK)];
const PARALLEL_PRINTER: [PortMatch; 2] = [
    PortMatch::masked(PARALLEL_PRINTER1_IO_BASE, PARALLEL_PRINTER_IO_MASK),
    PortMatch::masked(PARALLEL_PRINTER2_IO_BASE, PARALLEL_PRINTER_IO_MASK),
];
const LEGACY_DIAGNOSTIC: [PortMatch; 4] = [
    PortMatch::Exact(LEGACY_DIAGNOSTIC_PORTS[0]),
    PortMatch::Exact(LEGACY_DIAGNOSTIC_PORTS[1]),
    PortMatch::Exact(LEGACY_DIAGNOSTIC_PORTS[2]),
    PortMatch::Exact(LEGACY_DIAGNOSTIC_PORTS[3]),
];
const UPW48: [PortMatch; 1] = [PortMatch::masked(UPW48_IO_BASE, UPW48_IO_MASK)];
const HDC1: [PortMatch; 1] = [PortMatch::masked(HDC1_IO_BASE, HDC1_IO_MASK)];
const HDC2: [PortMatch; 1] = [PortMatch::masked(HDC2_IO_BASE, HDC2_IO_MASK)];

impl StubDevice {
    /// Registry order. Within the stub block no two entries need to shadow each other, but the
    /// order is kept stable so rule listings are deterministic.
    pub const ALL: [StubDevice; 7] = [
        StubDevice::Dma2,
        StubDevice::KeyboardController,
        StubDevice::ParallelPrinter,
        StubDevice::LegacyDiagnostic,
        StubDevice::Upw48,
        StubDevice::PrimaryDiskController,
        StubDevice::SecondaryDiskController,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dma2 => "dma2",
            Self::KeyboardController => "kbc",
            Self::ParallelPrinter => "lpt",
            Self::LegacyDiagnostic => "legacy-diag",
            Self::Upw48 => "upw48",
            Self::PrimaryDiskController => "hdc1",
            Self::SecondaryDiskController => "hdc2",
        }
    }

    pub fn matchers(self) -> &'static [PortMatch] {
        match self {
            Self::Dma2 => &DMA2,
            Self::KeyboardController => &KBC,
            Self::ParallelPrinter => &PARALLEL_PRINTER,
            Self::LegacyDiagnostic => &LEGACY_DIAGNOSTIC,
            Self::Upw48 => &UPW48,
            Self::PrimaryDiskController => &HDC1,
            Self::SecondaryDiskController => &HDC2,
        }
    }

    pub fn matches(self, port: u16) -> bool {
        self.matchers().iter().any(|m| m.matches(port))
    }
}

/// The stubbed devices, in the order their rules are registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceStubRegistry;

impl DeviceStubRegistry {
    pub fn devices() -> impl Iterator<Item = StubDevice> {
        StubDevice::ALL.into_iter()
    }

    /// Drops an access to a stubbed device. Takes the exit by shared reference: the guest
    /// buffer is never written.
    pub fn absorb(device: StubDevice, exit: &IoExit<'_>) -> DispatchOutcome {
        tracing::trace!(
            device = device.name(),
            port = exit.port(),
            direction = exit.direction().as_str(),
            "stubbed port access dropped"
        );
        DispatchOutcome::Ignored
    }
}
