//! PS/2 system control port A (`0x92`).

use crate::dispatch::DispatchOutcome;
use crate::exit::IoExit;

/// Answers single-byte reads with `0x00` (A20 off, no fast reset pending). Writes and string or
/// wide accesses are dropped.
pub fn handle_system_control_a(exit: &mut IoExit<'_>) -> DispatchOutcome {
    if !exit.is_single_byte() {
        return DispatchOutcome::Ignored;
    }
    if exit.is_read() {
        exit.set_first_u8(0x00);
        DispatchOutcome::Handled
    } else {
        DispatchOutcome::Ignored
    }
}
