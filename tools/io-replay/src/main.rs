#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vmexit_io::DispatcherConfig;

#[derive(Debug, Parser)]
#[command(
    name = "io-replay",
    version,
    about = "Replay recorded port-I/O exits through the legacy chipset dispatcher"
)]
struct Args {
    /// JSON-lines file of recorded exits (`-` for stdin).
    input: PathBuf,

    /// Log every access before and after dispatch.
    ///
    /// Overrides `VMEXIT_IO_TRACE`.
    #[arg(long)]
    trace_io: bool,

    /// Log filter (tracing-subscriber EnvFilter syntax).
    ///
    /// Environment variable: `VMEXIT_IO_LOG`.
    #[arg(long, env = "VMEXIT_IO_LOG", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("invalid log filter {:?}", args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = DispatcherConfig::from_env();
    if args.trace_io {
        config.trace_io = true;
    }

    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());
    let summary = if args.input.as_os_str() == "-" {
        io_replay::replay(io::stdin().lock(), output, config)?
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("failed to open {}", args.input.display()))?;
        io_replay::replay(BufReader::new(file), output, config)?
    };

    tracing::debug!(?summary, "done");
    Ok(())
}
