//! CMOS real-time clock index/data pair (ports `0x70`/`0x71`).
//!
//! Only two CMOS registers are answered. Every other register read leaves the guest buffer as it
//! was, which is what firmware probing this monitor has been observed to tolerate.

use crate::dispatch::DispatchOutcome;
use crate::exit::IoExit;
use crate::ports::{RTC_PORT_DATA, RTC_PORT_INDEX};

/// CMOS shutdown status byte.
pub const CMOS_REG_SHUTDOWN_STATUS: u8 = 0x0F;
/// Extended memory above 16MiB, high byte (in 64KiB units).
pub const CMOS_REG_HIGH_MEM_HI: u8 = 0x34;

const INDEX_MASK: u8 = 0x7F;

/// Latched CMOS register index. Bit 7 (the NMI mask) is dropped on write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RtcIndexLatch {
    index: u8,
}

impl RtcIndexLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn handle(&mut self, exit: &mut IoExit<'_>) -> DispatchOutcome {
        match exit.port() {
            RTC_PORT_INDEX if exit.is_write() => {
                self.index = exit.data()[0] & INDEX_MASK;
                DispatchOutcome::Handled
            }
            RTC_PORT_DATA if exit.is_read() => {
                if let Some(value) = self.register_value() {
                    exit.set_first_u8(value);
                }
                DispatchOutcome::Handled
            }
            _ => DispatchOutcome::Ignored,
        }
    }

    fn register_value(&self) -> Option<u8> {
        match self.index {
            CMOS_REG_SHUTDOWN_STATUS => Some(0x00),
            CMOS_REG_HIGH_MEM_HI => Some(0x08),
            _ => None,
        }
    }
}
