use std::io;
use std::sync::{Arc, Mutex};

use vmexit_io::trace::TRACE_TARGET;
use vmexit_io::{DispatchOutcome, DispatcherConfig, IoDirection, IoExit, IoExitDispatcher};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a debug-level fmt subscriber and returns everything it printed.
fn capture(f: impl FnOnce()) -> String {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    out.text()
}

fn run(d: &mut IoExitDispatcher, direction: IoDirection, size: u8, port: u16, data: &mut [u8]) {
    let count = (data.len() / usize::from(size)) as u32;
    let mut exit = IoExit::new(direction, size, port, count, data).unwrap();
    d.dispatch(&mut exit);
}

#[test]
fn enabled_trace_records_writes_and_read_results() {
    let mut d = IoExitDispatcher::new(DispatcherConfig {
        trace_io: true,
        trace_floppy: false,
    });
    assert!(d.tracer_mut().is_enabled());

    let logs = capture(|| {
        run(&mut d, IoDirection::Write, 1, 0x70, &mut [0x0F]);
        run(&mut d, IoDirection::Read, 1, 0x71, &mut [0xAA]);
    });

    let lines: Vec<&str> = logs.lines().collect();
    assert_eq!(lines.len(), 3, "{logs}");
    assert!(lines.iter().all(|line| line.contains(TRACE_TARGET)), "{logs}");

    assert!(lines[0].contains("io begin"), "{logs}");
    assert!(lines[0].contains(r#"direction="out""#), "{logs}");
    assert!(lines[0].contains("port=0x0070"), "{logs}");
    assert!(lines[0].contains("data=0f"), "{logs}");

    assert!(lines[1].contains("io begin"), "{logs}");
    assert!(lines[1].contains("port=0x0071"), "{logs}");
    assert!(!lines[1].contains("data="), "{logs}");

    assert!(lines[2].contains("io end"), "{logs}");
    assert!(lines[2].contains("outcome=Handled"), "{logs}");
    assert!(lines[2].contains("data=00"), "{logs}");
}

#[test]
fn repeated_word_writes_list_every_element() {
    let mut d = IoExitDispatcher::new(DispatcherConfig {
        trace_io: true,
        trace_floppy: false,
    });
    let logs = capture(|| {
        run(&mut d, IoDirection::Write, 2, 0x510, &mut [0x34, 0x12, 0x78, 0x56]);
    });
    assert!(logs.contains("count=2"), "{logs}");
    assert!(logs.contains("data=1234 5678"), "{logs}");
    assert!(!logs.contains("io end"), "{logs}");
}

#[test]
fn trace_toggle_at_runtime() {
    let mut d = IoExitDispatcher::new(DispatcherConfig {
        trace_io: false,
        trace_floppy: false,
    });
    assert!(!d.tracer_mut().is_enabled());

    let logs = capture(|| run(&mut d, IoDirection::Read, 2, 0xCFC, &mut [0xFF, 0xFF]));
    assert!(logs.is_empty(), "{logs}");

    d.tracer_mut().set_enabled(true);
    let mut data = [0xFF, 0xFF];
    let logs = capture(|| run(&mut d, IoDirection::Read, 2, 0xCFC, &mut data));
    assert_eq!(data, [0x00, 0x80]);
    assert!(logs.contains("io end"), "{logs}");
    assert!(logs.contains("data=8000"), "{logs}");

    d.tracer_mut().set_enabled(false);
    let logs = capture(|| run(&mut d, IoDirection::Write, 1, 0x3F8, &mut [b'x']));
    assert!(logs.is_empty(), "{logs}");
}

#[test]
fn floppy_marker_follows_config() {
    let mut marked = IoExitDispatcher::new(DispatcherConfig {
        trace_io: false,
        trace_floppy: true,
    });
    let mut buf = [0x42];
    let logs = capture(|| {
        let mut exit = IoExit::new(IoDirection::Read, 1, 0x3F2, 1, &mut buf).unwrap();
        assert_eq!(marked.dispatch(&mut exit), DispatchOutcome::Ignored);
    });
    assert!(logs.contains("FDC access"), "{logs}");
    assert!(logs.contains(r#"direction="in""#), "{logs}");
    assert_eq!(buf, [0x42]);

    let mut quiet = IoExitDispatcher::new(DispatcherConfig {
        trace_io: false,
        trace_floppy: false,
    });
    let logs = capture(|| run(&mut quiet, IoDirection::Write, 1, 0x3F2, &mut [0x0C]));
    assert!(logs.is_empty(), "{logs}");
}
