//! Replays recorded port-I/O exits through a fresh [`IoExitDispatcher`].
//!
//! Input is JSON lines, one exit per line:
//!
//! ```text
//! {"direction":"write","size":1,"port":112,"data":[15]}
//! {"direction":"read","size":1,"port":113,"data":[170]}
//! ```
//!
//! `count` defaults to 1. Output is one JSON line per exit carrying the outcome, the rule that
//! matched and the buffer as the guest would see it after the exit.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vmexit_io::{DispatchOutcome, DispatcherConfig, IoDirection, IoExit, IoExitDispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Read,
    Write,
}

impl From<Direction> for IoDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Read => IoDirection::Read,
            Direction::Write => IoDirection::Write,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExitRecord {
    pub direction: Direction,
    pub size: u8,
    pub port: u16,
    #[serde(default = "default_count")]
    pub count: u32,
    pub data: Vec<u8>,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayResult {
    pub line: usize,
    pub port: u16,
    pub rule: &'static str,
    pub handled: bool,
    pub data: Vec<u8>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub exits: usize,
    pub handled: usize,
    pub ignored: usize,
}

pub fn replay(
    input: impl BufRead,
    mut output: impl Write,
    config: DispatcherConfig,
) -> Result<ReplaySummary> {
    let mut dispatcher = IoExitDispatcher::new(config);
    let mut summary = ReplaySummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut record: ExitRecord = serde_json::from_str(&line)
            .with_context(|| format!("line {line_no}: malformed exit record"))?;
        let rule = dispatcher
            .table()
            .lookup(record.port)
            .map_or("unmatched", |rule| rule.name);

        let mut exit = IoExit::new(
            record.direction.into(),
            record.size,
            record.port,
            record.count,
            &mut record.data,
        )
        .with_context(|| format!("line {line_no}: invalid exit"))?;
        let outcome = dispatcher.dispatch(&mut exit);

        summary.exits += 1;
        match outcome {
            DispatchOutcome::Handled => summary.handled += 1,
            DispatchOutcome::Ignored => summary.ignored += 1,
        }

        let result = ReplayResult {
            line: line_no,
            port: record.port,
            rule,
            handled: outcome == DispatchOutcome::Handled,
            data: record.data,
        };
        serde_json::to_writer(&mut output, &result).context("failed to write result")?;
        output.write_all(b"\n").context("failed to write result")?;
    }

    output.flush().context("failed to flush output")?;
    tracing::info!(
        exits = summary.exits,
        handled = summary.handled,
        ignored = summary.ignored,
        "replay finished"
    );
    Ok(summary)
}
