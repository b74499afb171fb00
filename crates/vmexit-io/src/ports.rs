//! Legacy PC port map and port matchers.

/// COM1 transmit/receive buffer register.
pub const SERIAL_TX_PORT: u16 = 0x03F8;

pub const RTC_IO_BASE: u16 = 0x0070;
pub const RTC_IO_MASK: u16 = 0xFFF0;
pub const RTC_PORT_INDEX: u16 = 0x0070;
pub const RTC_PORT_DATA: u16 = 0x0071;

/// PS/2 system control port A (fast A20 / fast reset).
pub const PS2_SYSTEM_CONTROL_A: u16 = 0x0092;

pub const DMA2_IO_BASE: u16 = 0x00C0;
pub const DMA2_IO_MASK: u16 = 0xFFC0;

pub const KBC_IO_BASE: u16 = 0x0060;
pub const KBC_IO_MASK: u16 = 0xFFF0;

pub const PARALLEL_PRINTER1_IO_BASE: u16 = 0x0378;
pub const PARALLEL_PRINTER2_IO_BASE: u16 = 0x0278;
pub const PARALLEL_PRINTER_IO_MASK: u16 = 0xFFF8;

/// Firmware debug and POST ports that are written during boot and never read back meaningfully.
pub const LEGACY_DIAGNOSTIC_PORTS: [u16; 4] = [0x000D, 0x0510, 0x0511, 0x03E9];

pub const UPW48_IO_BASE: u16 = 0x0200;
pub const UPW48_IO_MASK: u16 = 0xFF00;

pub const HDC1_IO_BASE: u16 = 0x01F0;
pub const HDC1_IO_MASK: u16 = 0xFFF0;
pub const HDC2_IO_BASE: u16 = 0x0170;
pub const HDC2_IO_MASK: u16 = 0xFFF8;

pub const PCI_IO_BASE: u16 = 0x0CF8;
pub const PCI_IO_MASK: u16 = 0xFFF8;
pub const PCI_CFG_ADDR_PORT: u16 = 0x0CF8;
pub const PCI_CFG_DATA_PORT: u16 = 0x0CFC;

/// Floppy disk controller digital output register; accesses here are only observed.
pub const FDC_DOR_PORT: u16 = 0x03F2;

/// A port matcher: either one exact port or a `(base, mask)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMatch {
    Exact(u16),
    /// Matches when `port & mask == base`.
    Masked { base: u16, mask: u16 },
}

impl PortMatch {
    pub const fn masked(base: u16, mask: u16) -> Self {
        Self::Masked { base, mask }
    }

    pub const fn matches(&self, port: u16) -> bool {
        match *self {
            Self::Exact(p) => port == p,
            Self::Masked { base, mask } => port & mask == base,
        }
    }
}

/// The UART register block above the transmit port (IER..SCR, `0x3F9..=0x3FF`).
///
/// The transmit port itself is left out so the serial collaborator still sees it.
pub const SERIAL_CHATTER: [PortMatch; 3] = [
    PortMatch::Exact(0x03F9),
    PortMatch::masked(0x03FA, 0xFFFE),
    PortMatch::masked(0x03FC, 0xFFFC),
];

pub const SERIAL_TX: [PortMatch; 1] = [PortMatch::Exact(SERIAL_TX_PORT)];

pub const RTC: [PortMatch; 1] = [PortMatch::masked(RTC_IO_BASE, RTC_IO_MASK)];

pub const SYSTEM_CONTROL_A: [PortMatch; 1] = [PortMatch::Exact(PS2_SYSTEM_CONTROL_A)];

pub const PCI_CONFIG: [PortMatch; 1] = [PortMatch::masked(PCI_IO_BASE, PCI_IO_MASK)];
