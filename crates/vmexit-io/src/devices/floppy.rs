use crate::exit::IoExit;

/// Observer notified for accesses to the floppy controller's digital output register.
///
/// Floppy emulation lives elsewhere; this only marks that firmware touched the controller.
pub trait FloppyObserver {
    fn observe(&mut self, exit: &IoExit<'_>);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFloppyObserver;

impl FloppyObserver for NoopFloppyObserver {
    fn observe(&mut self, _exit: &IoExit<'_>) {}
}

/// Emits an `info` event per controller access.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFloppyObserver;

impl FloppyObserver for TracingFloppyObserver {
    fn observe(&mut self, exit: &IoExit<'_>) {
        tracing::info!(
            port = exit.port(),
            direction = exit.direction().as_str(),
            "FDC access"
        );
    }
}
