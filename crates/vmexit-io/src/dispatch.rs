use crate::config::DispatcherConfig;
use crate::devices::{
    handle_system_control_a, DeviceStubRegistry, FloppyObserver, NoopFloppyObserver,
    PciConfigLatch, RtcIndexLatch, SerialConsole, SerialTransmit, SharedSerialLog,
    SharedSerialRx, StubDevice, TracingFloppyObserver,
};
use crate::exit::IoExit;
use crate::ports::{self, PortMatch, FDC_DOR_PORT};
use crate::trace::IoTraceLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler acted on the access (latched state, produced read data or forwarded it).
    Handled,
    /// The access was absorbed, failed a handler's width/direction guard, or matched nothing.
    Ignored,
}

/// What a matched rule does with the access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortHandler {
    /// Dropped without touching the buffer.
    Absorb,
    SerialTransmit,
    Rtc,
    SystemControlA,
    Stub(StubDevice),
    PciConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRule {
    pub name: &'static str,
    pub matchers: &'static [PortMatch],
    pub handler: PortHandler,
}

impl PortRule {
    pub const fn new(
        name: &'static str,
        matchers: &'static [PortMatch],
        handler: PortHandler,
    ) -> Self {
        Self {
            name,
            matchers,
            handler,
        }
    }

    pub fn matches(&self, port: u16) -> bool {
        self.matchers.iter().any(|m| m.matches(port))
    }
}

/// Ordered port rules; the first rule that matches a port wins.
///
/// Rules may overlap. Overlap is how the legacy map expresses precedence (e.g. the second
/// parallel printer inside the `0x200` window), so nothing is rejected at registration time.
#[derive(Debug, Clone, Default)]
pub struct PortDispatchTable {
    rules: Vec<PortRule>,
}

impl PortDispatchTable {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The PC chipset map served by this monitor, in priority order.
    pub fn legacy_pc() -> Self {
        let mut table = Self::new();
        table.push(PortRule::new(
            "serial-chatter",
            &ports::SERIAL_CHATTER,
            PortHandler::Absorb,
        ));
        table.push(PortRule::new(
            "serial-tx",
            &ports::SERIAL_TX,
            PortHandler::SerialTransmit,
        ));
        table.push(PortRule::new("rtc", &ports::RTC, PortHandler::Rtc));
        table.push(PortRule::new(
            "sysctrl-a",
            &ports::SYSTEM_CONTROL_A,
            PortHandler::SystemControlA,
        ));
        for dev in DeviceStubRegistry::devices() {
            table.push(PortRule::new(
                dev.name(),
                dev.matchers(),
                PortHandler::Stub(dev),
            ));
        }
        table.push(PortRule::new(
            "pci-config",
            &ports::PCI_CONFIG,
            PortHandler::PciConfig,
        ));
        table
    }

    /// Appends a rule at the lowest priority.
    pub fn push(&mut self, rule: PortRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[PortRule] {
        &self.rules
    }

    pub fn lookup(&self, port: u16) -> Option<&PortRule> {
        self.rules.iter().find(|rule| rule.matches(port))
    }

    /// Every rule matching `port`, in priority order. Entries after the first are shadowed.
    pub fn candidates(&self, port: u16) -> impl Iterator<Item = &PortRule> + '_ {
        self.rules.iter().filter(move |rule| rule.matches(port))
    }
}

/// Registers that persist between traps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChipsetState {
    pub rtc: RtcIndexLatch,
    pub pci: PciConfigLatch,
}

/// Routes port-I/O VM exits to the emulated legacy chipset.
///
/// Each instance owns its chipset registers; two dispatchers never observe each other's RTC
/// index or PCI address.
pub struct IoExitDispatcher {
    table: PortDispatchTable,
    chipset: ChipsetState,
    serial: Box<dyn SerialTransmit>,
    /// Host-side handles of the built-in console; `None` with a caller-supplied serial device.
    console: Option<(SharedSerialLog, SharedSerialRx)>,
    floppy: Box<dyn FloppyObserver>,
    tracer: IoTraceLogger,
}

impl IoExitDispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        let floppy: Box<dyn FloppyObserver> = if config.trace_floppy {
            Box::new(TracingFloppyObserver)
        } else {
            Box::new(NoopFloppyObserver)
        };
        let console = SerialConsole::default();
        let handles = (console.log(), console.rx());
        let mut dispatcher = Self::with_collaborators(config, Box::new(console), floppy);
        dispatcher.console = Some(handles);
        dispatcher
    }

    pub fn with_collaborators(
        config: DispatcherConfig,
        serial: Box<dyn SerialTransmit>,
        floppy: Box<dyn FloppyObserver>,
    ) -> Self {
        Self {
            table: PortDispatchTable::legacy_pc(),
            chipset: ChipsetState::default(),
            serial,
            console: None,
            floppy,
            tracer: IoTraceLogger::new(config.trace_io),
        }
    }

    pub fn table(&self) -> &PortDispatchTable {
        &self.table
    }

    pub fn chipset(&self) -> &ChipsetState {
        &self.chipset
    }

    /// Bytes the guest transmitted on COM1, when the built-in console is in use.
    pub fn serial_log(&self) -> Option<SharedSerialLog> {
        self.console.as_ref().map(|(log, _)| log.clone())
    }

    /// Receive queue the host fills for COM1 reads, when the built-in console is in use.
    pub fn serial_rx(&self) -> Option<SharedSerialRx> {
        self.console.as_ref().map(|(_, rx)| rx.clone())
    }

    pub fn tracer_mut(&mut self) -> &mut IoTraceLogger {
        &mut self.tracer
    }

    /// Handles one trapped access. Never fails: unknown ports and unsupported access shapes are
    /// dropped so firmware can keep going.
    pub fn dispatch(&mut self, exit: &mut IoExit<'_>) -> DispatchOutcome {
        self.tracer.begin(exit);

        if exit.port() == FDC_DOR_PORT {
            self.floppy.observe(exit);
        }

        let matched = self
            .table
            .lookup(exit.port())
            .map(|rule| (rule.name, rule.handler));
        let (rule, outcome) = match matched {
            Some((name, handler)) => (name, self.run(handler, exit)),
            None => ("unmatched", DispatchOutcome::Ignored),
        };

        tracing::trace!(
            port = exit.port(),
            direction = exit.direction().as_str(),
            rule,
            ?outcome,
            "port I/O dispatched"
        );

        self.tracer.end(exit, outcome);
        outcome
    }

    fn run(&mut self, handler: PortHandler, exit: &mut IoExit<'_>) -> DispatchOutcome {
        match handler {
            PortHandler::Absorb => DispatchOutcome::Ignored,
            PortHandler::SerialTransmit => self.serial.handle_io(exit),
            PortHandler::Rtc => self.chipset.rtc.handle(exit),
            PortHandler::SystemControlA => handle_system_control_a(exit),
            PortHandler::Stub(dev) => DeviceStubRegistry::absorb(dev, exit),
            PortHandler::PciConfig => self.chipset.pci.handle(exit),
        }
    }

    /// Reset the chipset registers and the serial device back to their power-on state.
    pub fn reset(&mut self) {
        self.chipset = ChipsetState::default();
        self.serial.reset();
    }
}

impl Default for IoExitDispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}
