use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::filter::{FilterOpts, FilterRun};
use crate::output::{write_atomically, DirCreator};

/// Run-level information written as a JSON comment line at the top of a report.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct ReportMetadata {
    pub seqtools_version: String,
    pub input_path: String,
    pub output_path: Option<String>,
    pub report_date: String,
    pub gc_bounds: (f64, f64),
    pub length_bounds: (u64, u64),
    pub quality_threshold: f64,
    pub read_count: usize,
    pub passed_read_count: usize,
    pub avg_qual: f64,
    pub avg_len: f64,
}

/// One row per read.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ReportRecord {
    pub id: String,
    pub len: u64,
    pub gc: f64,
    pub avg_qual: f64,
    pub passed: bool,
}

impl ReportMetadata {
    pub fn new(input: &Path, opts: &FilterOpts, run: &FilterRun) -> Self {
        let n = run.evaluations.len();
        let mean = |total: f64| if n == 0 { 0.0 } else { total / (n as f64) };

        ReportMetadata {
            seqtools_version: env!("CARGO_PKG_VERSION").to_string(),
            input_path: input.display().to_string(),
            output_path: run.output.as_ref().map(|p| p.display().to_string()),
            report_date: format!("{:?}", chrono::offset::Local::now()),
            gc_bounds: (opts.gc.lo, opts.gc.hi),
            length_bounds: (opts.len.lo, opts.len.hi),
            quality_threshold: opts.quality,
            read_count: run.input_reads,
            passed_read_count: run.passed_reads,
            avg_qual: mean(run.evaluations.iter().map(|e| e.metrics.mean_quality).sum()),
            avg_len: mean(run.evaluations.iter().map(|e| e.metrics.len as f64).sum()),
        }
    }
}

/// Writes the metadata line followed by a tab-separated table of every evaluated read.
pub fn write_report(writer: &mut impl Write, metadata: &ReportMetadata, run: &FilterRun) -> Result<()> {
    writeln!(writer, "#{}", serde_json::to_string(metadata)?)?;

    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    for e in run.evaluations.iter() {
        wtr.serialize(ReportRecord {
            id: e.read.id.clone(),
            len: e.metrics.len,
            gc: e.metrics.gc,
            avg_qual: e.metrics.mean_quality,
            passed: e.passed,
        })?;
    }
    wtr.flush()?;

    Ok(())
}

/// Writes a report for `run` to `path`. Unlike the filtered reads, a report is written even
/// when no read passed.
pub fn save_report(
    path: &Path,
    input: &Path,
    opts: &FilterOpts,
    run: &FilterRun,
    dirs: &impl DirCreator,
) -> Result<()> {
    let metadata = ReportMetadata::new(input, opts, run);
    info!("Writing report to {}...", path.display());

    let mut buf = Vec::new();
    write_report(&mut buf, &metadata, run)?;
    write_atomically(path, dirs, |w| w.write_all(&buf))
}
