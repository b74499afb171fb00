use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::dispatch::DispatchOutcome;
use crate::exit::IoExit;

/// Entry point of the serial console device model for accesses to the COM1 data port.
pub trait SerialTransmit {
    fn handle_io(&mut self, exit: &mut IoExit<'_>) -> DispatchOutcome;

    /// Reset the device back to its power-on state.
    fn reset(&mut self) {}
}

/// Shared host-visible serial output buffer.
pub type SharedSerialLog = Rc<RefCell<Vec<u8>>>;

/// Shared queue of bytes the host has made available to the guest.
pub type SharedSerialRx = Rc<RefCell<VecDeque<u8>>>;

/// Minimal COM1 data register.
///
/// Transmitted bytes are appended to a shared log. Received bytes are only delivered if the host
/// queued them on the shared receive queue; with an empty queue, reads leave the guest buffer as
/// it was.
#[derive(Debug, Default)]
pub struct SerialConsole {
    log: SharedSerialLog,
    rx: SharedSerialRx,
}

impl SerialConsole {
    pub fn new(log: SharedSerialLog, rx: SharedSerialRx) -> Self {
        Self { log, rx }
    }

    pub fn log(&self) -> SharedSerialLog {
        self.log.clone()
    }

    pub fn rx(&self) -> SharedSerialRx {
        self.rx.clone()
    }

    pub fn push_rx(&mut self, byte: u8) {
        self.rx.borrow_mut().push_back(byte);
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

impl SerialTransmit for SerialConsole {
    fn handle_io(&mut self, exit: &mut IoExit<'_>) -> DispatchOutcome {
        if exit.is_write() {
            self.log
                .borrow_mut()
                .extend(exit.values().map(|value| value as u8));
        } else if let Some(byte) = self.rx.borrow_mut().pop_front() {
            exit.set_first_u8(byte);
        }
        DispatchOutcome::Handled
    }

    fn reset(&mut self) {
        self.log.borrow_mut().clear();
        self.rx.borrow_mut().clear();
    }
}
