//! Legacy chipset behaviour reachable from the port dispatcher.

pub mod floppy;
pub mod pci_config;
pub mod rtc;
pub mod serial;
pub mod stubs;
pub mod system_control;

pub use floppy::{FloppyObserver, NoopFloppyObserver, TracingFloppyObserver};
pub use pci_config::{PciConfigLatch, PCI_CFG_DATA_NO_DEVICE};
pub use rtc::RtcIndexLatch;
pub use serial::{SerialConsole, SerialTransmit, SharedSerialLog, SharedSerialRx};
pub use stubs::{DeviceStubRegistry, StubDevice};
pub use system_control::handle_system_control_a;
