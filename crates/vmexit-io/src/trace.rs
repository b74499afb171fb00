//! Optional per-access I/O trace.
//!
//! Records are emitted as `debug` events under [`TRACE_TARGET`] so they can be filtered
//! separately from the rest of the crate's logging.

use std::fmt::Write as _;

use crate::dispatch::DispatchOutcome;
use crate::exit::{element_value, IoExit};

pub const TRACE_TARGET: &str = "vmexit_io::trace";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IoTraceLogger {
    enabled: bool,
}

impl IoTraceLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Logs the access before dispatch; writes include the outgoing elements.
    pub fn begin(&self, exit: &IoExit<'_>) {
        if !self.enabled {
            return;
        }
        if exit.is_write() {
            tracing::debug!(
                target: TRACE_TARGET,
                direction = exit.direction().as_str(),
                size = exit.size(),
                port = %format_port(exit.port()),
                count = exit.count(),
                data = %format_elements(exit.data(), exit.size()),
                "io begin"
            );
        } else {
            tracing::debug!(
                target: TRACE_TARGET,
                direction = exit.direction().as_str(),
                size = exit.size(),
                port = %format_port(exit.port()),
                count = exit.count(),
                "io begin"
            );
        }
    }

    /// Logs what a read returns to the guest.
    pub fn end(&self, exit: &IoExit<'_>, outcome: DispatchOutcome) {
        if !self.enabled || !exit.is_read() {
            return;
        }
        tracing::debug!(
            target: TRACE_TARGET,
            port = %format_port(exit.port()),
            outcome = ?outcome,
            data = %format_elements(exit.data(), exit.size()),
            "io end"
        );
    }
}

pub fn format_port(port: u16) -> String {
    format!("{port:#06x}")
}

/// Formats every `size`-wide element of `data` as zero-padded hex, separated by spaces.
///
/// Widths other than 1, 2 and 4 produce an empty string.
pub fn format_elements(data: &[u8], size: u8) -> String {
    let digits = usize::from(size) * 2;
    let mut out = String::new();
    let mut index = 0;
    while let Some(value) = element_value(data, size, index) {
        if index != 0 {
            out.push(' ');
        }
        let _ = write!(out, "{value:0digits$x}");
        index += 1;
    }
    out
}
