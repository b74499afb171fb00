//! Port-I/O VM-exit dispatch for a minimal legacy PC chipset.
//!
//! The run loop decodes each `KVM_EXIT_IO` into an [`IoExit`] and hands it to
//! [`IoExitDispatcher::dispatch`]. The dispatcher walks an ordered [`PortDispatchTable`] and
//! either forwards the access to a collaborator, runs one of the two stateful stubs (CMOS RTC
//! index/data, PCI configuration mechanism #1), or drops it. Dispatch never fails.
#![forbid(unsafe_code)]

pub mod config;
pub mod devices;
pub mod dispatch;
pub mod exit;
pub mod ports;
pub mod trace;

pub use config::DispatcherConfig;
pub use dispatch::{
    ChipsetState, DispatchOutcome, IoExitDispatcher, PortDispatchTable, PortHandler, PortRule,
};
pub use exit::{IoDirection, IoExit, IoExitError};
pub use ports::PortMatch;
pub use trace::IoTraceLogger;
