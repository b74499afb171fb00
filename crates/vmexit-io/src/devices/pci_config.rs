//! PCI configuration mechanism #1 stub (`0xCF8`/`0xCFC`).
//!
//! The address register is latched but never decoded; no configuration space exists behind it.
//! 16-bit data reads answer `0x8000`, which firmware treats as the end of enumeration.

use crate::dispatch::DispatchOutcome;
use crate::exit::IoExit;
use crate::ports::{PCI_CFG_ADDR_PORT, PCI_CFG_DATA_PORT};

/// Value returned for 16-bit reads of the configuration data port.
pub const PCI_CFG_DATA_NO_DEVICE: u16 = 0x8000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PciConfigLatch {
    addr: u32,
}

impl PciConfigLatch {
    pub fn new() -> Self {
        Self { addr: 0 }
    }

    /// Last value written to `0xCF8`.
    pub fn address(&self) -> u32 {
        self.addr
    }

    pub fn handle(&mut self, exit: &mut IoExit<'_>) -> DispatchOutcome {
        match exit.port() {
            PCI_CFG_ADDR_PORT if exit.is_write() && exit.size() == 4 => {
                self.addr = exit.first_value();
                DispatchOutcome::Handled
            }
            PCI_CFG_DATA_PORT if exit.is_read() && exit.size() == 2 => {
                exit.set_first_u16(PCI_CFG_DATA_NO_DEVICE);
                DispatchOutcome::Handled
            }
            _ => DispatchOutcome::Ignored,
        }
    }
}
