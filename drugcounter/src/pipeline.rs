//! # Ranking Pipeline
//!
//! Drives one run from ledger to report.
//!
//! ## Stages
//!
//! 1. **Read**: skip the header, validate each data line, fold accepted
//!    records into the [`Aggregator`]
//! 2. **Select**: stream every drug through a bounded [`TopKHeap`]
//! 3. **Write**: drain the heap highest-first and emit the report
//!
//! Rejected lines never stop a run. They are recorded in the audit log (when
//! one is attached) and skipped.
//!
//! ## Report Format
//!
//! ```text
//! drug_name,num_prescriber,total_cost
//! AMBIEN,2,300.0
//! BENZTROPINE MESYLATE,1,1500.0
//! ```
//!
//! Fields are never quoted. Costs use the shortest representation that reads
//! back to the same `f64`, so whole numbers keep their `.0`.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::aggregate::{Aggregator, RankedEntry};
use crate::audit::{AuditLog, LogEvent, Status};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::heap::TopKHeap;
use crate::record::LineValidator;

/// Report header, written even when no drug qualifies
pub const REPORT_HEADER: [&str; 3] = ["drug_name", "num_prescriber", "total_cost"];

/// One report line
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "drug_name")]
    drug_name: &'a str,

    #[serde(rename = "num_prescriber")]
    prescriber_count: usize,

    #[serde(rename = "total_cost")]
    total_cost: f64,
}

impl<'a> From<&'a RankedEntry> for ReportRow<'a> {
    fn from(entry: &'a RankedEntry) -> Self {
        Self {
            drug_name: &entry.drug_name,
            prescriber_count: entry.prescriber_count,
            total_cost: entry.total_cost,
        }
    }
}

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Data lines read, header excluded
    pub lines_read: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub distinct_drugs: usize,
    /// Report rows written, header excluded
    pub written: usize,
}

/// State owned by a single run
///
/// `L` is the audit log destination. Runs without logging use
/// [`Pipeline::unlogged`].
pub struct Pipeline<L: Write> {
    validator: LineValidator,
    top_k: Option<usize>,
    audit: Option<AuditLog<L>>,
}

impl Pipeline<io::Sink> {
    /// Pipeline with no audit log attached
    pub fn unlogged(top_k: Option<usize>) -> Result<Self> {
        Ok(Self::new(LineValidator::new()?, top_k, None))
    }
}

impl<L: Write> Pipeline<L> {
    pub fn new(validator: LineValidator, top_k: Option<usize>, audit: Option<AuditLog<L>>) -> Self {
        Self { validator, top_k, audit }
    }

    /// Run every stage over `input`, writing the report to `output`
    pub fn process<R: BufRead, W: Write>(&mut self, input: R, output: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let aggregator = self.read_input(input, &mut summary)?;
        summary.distinct_drugs = aggregator.len();

        let ranked = self.select(aggregator)?;
        summary.written = self.write_output(&ranked, output)?;

        tracing::info!(
            lines = summary.lines_read,
            rejected = summary.rejected,
            drugs = summary.distinct_drugs,
            written = summary.written,
            "report complete"
        );
        Ok(summary)
    }

    /// Record the terminal event and hand back the audit log destination
    ///
    /// A failed `outcome` is logged as `ERROR`, anything else as `NORMAL`.
    pub fn finish<T>(mut self, outcome: &Result<T>) -> Result<Option<L>> {
        let event = match outcome {
            Ok(_) => LogEvent::now(Status::Normal, "Program finished successfully."),
            Err(_) => LogEvent::now(Status::Error, "Program was terminated unexpectedly."),
        };
        self.log(&event)?;

        match self.audit.take() {
            Some(mut audit) => {
                audit.flush().map_err(Error::AuditLog)?;
                Ok(Some(audit.into_inner()))
            }
            None => Ok(None),
        }
    }

    fn log(&mut self, event: &LogEvent<'_>) -> Result<()> {
        match self.audit.as_mut() {
            Some(audit) => audit.record(event).map_err(Error::AuditLog),
            None => Ok(()),
        }
    }

    fn read_input<R: BufRead>(&mut self, mut input: R, summary: &mut RunSummary) -> Result<Aggregator> {
        let started = Instant::now();
        self.log(&LogEvent::now(Status::Normal, "start reading the input file."))?;

        let mut aggregator = Aggregator::new();
        let mut buf = Vec::new();

        // line 0 is the header
        for line_number in 0.. {
            buf.clear();
            if input.read_until(b'\n', &mut buf).map_err(Error::Read)? == 0 {
                break;
            }
            if line_number == 0 {
                continue;
            }
            let line = decode_line(&buf);
            summary.lines_read += 1;

            match self.validator.validate(&line) {
                Ok(record) => {
                    summary.accepted += 1;
                    aggregator.observe(record);
                }
                Err(rejection) => {
                    summary.rejected += 1;
                    tracing::debug!(line = line_number, reason = %rejection, "skipping ledger line");
                    let event = LogEvent::now(Status::Warning, rejection.message()).with_line(line_number, &line);
                    self.log(&event)?;
                }
            }
        }

        self.log(&LogEvent::now(
            Status::Normal,
            format!(
                "Finish reading {} lines in {} seconds.",
                summary.lines_read,
                started.elapsed().as_secs_f64()
            ),
        ))?;
        Ok(aggregator)
    }

    fn select(&mut self, aggregator: Aggregator) -> Result<Vec<RankedEntry>> {
        self.log(&LogEvent::now(Status::Normal, "Start sorting the drug records."))?;

        let mut heap = TopKHeap::new(self.top_k);
        for entry in aggregator.into_ranked_entries() {
            heap.push(entry);
        }
        let ranked = heap.into_descending();

        tracing::debug!(kept = ranked.len(), limit = ?self.top_k, "selected top drugs");
        self.log(&LogEvent::now(Status::Normal, "Sorting finished."))?;
        Ok(ranked)
    }

    fn write_output<W: Write>(&mut self, ranked: &[RankedEntry], output: W) -> Result<usize> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(output);

        writer.write_record(REPORT_HEADER)?;
        for entry in ranked {
            writer.serialize(ReportRow::from(entry))?;
        }
        writer.flush().map_err(Error::Flush)?;

        self.log(&LogEvent::now(
            Status::Normal,
            format!("Written {} drug records.", ranked.len()),
        ))?;
        Ok(ranked.len())
    }
}

/// Run the pipeline against files named by `config`
///
/// Opens the audit log (when enabled), then the ledger, then the report. The
/// ledger and report handles close as soon as processing ends; the audit log
/// stays open long enough to record whether the run succeeded.
///
/// # Errors
///
/// [`Error::InputNotFound`] if the ledger is not an existing file. Nothing is
/// opened or logged in that case. Any later failure is logged as a terminal
/// `ERROR` event before it is returned.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    if !config.input_path.is_file() {
        return Err(Error::InputNotFound(config.input_path.clone()));
    }

    let validator = LineValidator::new()?;
    let audit = if config.logging {
        Some(AuditLog::new(BufWriter::new(create(&config.log_path)?)))
    } else {
        None
    };
    let mut pipeline = Pipeline::new(validator, config.top_k, audit);

    let outcome = open_and_process(&mut pipeline, config);
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "run terminated");
    }

    let finished = pipeline.finish(&outcome);
    let summary = outcome?;
    finished?;
    Ok(summary)
}

fn open_and_process<L: Write>(pipeline: &mut Pipeline<L>, config: &RunConfig) -> Result<RunSummary> {
    let input = BufReader::new(open(&config.input_path)?);
    let output = BufWriter::new(create(&config.output_path)?);
    pipeline.process(input, output)
}

/// Line text without its terminator; bytes that are not UTF-8 become U+FFFD
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })
}
