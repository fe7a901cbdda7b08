use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use thiserror::Error;

use crate::bounds::{Bounds, BoundsSpec};
use crate::metrics::MetricError;
use crate::output::{write_atomically, DirCreator};
use crate::reader::{read_store_from_path, write_read};
use crate::record::Read;
use crate::store::RecordStore;

/// Default upper length bound, 2^32 bases.
pub const DEFAULT_MAX_LEN: u64 = 1 << 32;

/// Thresholds a read must meet to be kept. All bounds are inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterOpts {
    /// GC content, as a percentage
    pub gc: Bounds<f64>,
    /// number of bases
    pub len: Bounds<u64>,
    /// minimum mean Phred score
    pub quality: f64,
}

impl Default for FilterOpts {
    fn default() -> Self {
        FilterOpts {
            gc: Bounds::new(0.0, 100.0),
            len: Bounds::new(0, DEFAULT_MAX_LEN),
            quality: 0.0,
        }
    }
}

impl FilterOpts {
    pub fn new(gc: BoundsSpec<f64>, len: BoundsSpec<u64>, quality: f64) -> Self {
        FilterOpts {
            gc: gc.normalize(),
            len: len.normalize(),
            quality,
        }
    }
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("read `{id}` cannot be filtered")]
    Degenerate {
        id: String,
        #[source]
        source: MetricError,
    },

    #[error("unable to start the filtering thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// The values a read is judged on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReadMetrics {
    pub gc: f64,
    pub len: u64,
    pub mean_quality: f64,
}

impl ReadMetrics {
    pub fn of(read: &Read) -> Result<Self, FilterError> {
        let wrap = |source| FilterError::Degenerate {
            id: read.id.clone(),
            source,
        };

        Ok(ReadMetrics {
            gc: read.gc_content().map_err(wrap)?,
            len: read.len() as u64,
            mean_quality: read.phred_quality_avg().map_err(wrap)?,
        })
    }

    /// Every criterion is evaluated; a read is kept only if all three hold.
    pub fn passes(&self, opts: &FilterOpts) -> bool {
        let gc_ok = opts.gc.contains(self.gc);
        let len_ok = opts.len.contains(self.len);
        let qual_ok = self.mean_quality >= opts.quality;

        gc_ok & len_ok & qual_ok
    }
}

/// A read along with its metrics and the filter decision.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub read: Read,
    pub metrics: ReadMetrics,
    pub passed: bool,
}

fn evaluate(read: Read, opts: &FilterOpts) -> Result<Evaluation, FilterError> {
    let metrics = ReadMetrics::of(&read)?;
    Ok(Evaluation {
        passed: metrics.passes(opts),
        read,
        metrics,
    })
}

/// Returns true if the read satisfies every threshold in `opts`.
///
/// # Errors
///
/// An empty read has no GC content or mean quality, which is reported as an error.
pub fn filter(read: &Read, opts: &FilterOpts) -> Result<bool, FilterError> {
    Ok(ReadMetrics::of(read)?.passes(opts))
}

/// Evaluates every read of the store, in store order.
pub fn evaluate_store(store: &RecordStore, opts: &FilterOpts) -> Result<Vec<Evaluation>, FilterError> {
    store.reads().map(|r| evaluate(r, opts)).collect()
}

/// Same as `evaluate_store`, spread over a pool of `threads` threads. The result is in store
/// order regardless of the order in which reads finish.
pub fn par_evaluate_store(
    store: &RecordStore,
    opts: &FilterOpts,
    threads: usize,
) -> Result<Vec<Evaluation>, FilterError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let reads: Vec<Read> = store.reads().collect();
    pool.install(|| {
        reads
            .into_par_iter()
            .map(|r| evaluate(r, opts))
            .collect::<Result<Vec<_>, _>>()
    })
}

fn passing(evaluations: Vec<Evaluation>) -> RecordStore {
    evaluations
        .into_iter()
        .filter(|e| e.passed)
        .map(|e| e.read)
        .collect()
}

/// Keeps the reads of `store` that satisfy `opts`, preserving their order.
pub fn filter_store(store: &RecordStore, opts: &FilterOpts) -> Result<RecordStore, FilterError> {
    Ok(passing(evaluate_store(store, opts)?))
}

/// Parallel version of `filter_store`, with identical output.
pub fn par_filter_store(
    store: &RecordStore,
    opts: &FilterOpts,
    threads: usize,
) -> Result<RecordStore, FilterError> {
    Ok(passing(par_evaluate_store(store, opts, threads)?))
}

/// Outcome of filtering a FASTQ file.
#[derive(Debug)]
pub struct FilterRun {
    pub input_reads: usize,
    pub passed_reads: usize,
    /// Where the passing reads were written; `None` if no read passed.
    pub output: Option<PathBuf>,
    pub evaluations: Vec<Evaluation>,
}

/// Filters the FASTQ file at `input` and writes the passing reads to `output`.
///
/// The whole input is read and checked before anything is written, so a malformed input never
/// leaves a partial output behind. If no read passes, neither the output file nor its
/// directory is created. Otherwise the output directory is created through `dirs` and the
/// file at `output` is replaced.
///
/// `threads` above 1 evaluates reads in parallel.
pub fn filter_fastq(
    input: &Path,
    output: &Path,
    opts: &FilterOpts,
    threads: usize,
    dirs: &impl DirCreator,
) -> Result<FilterRun> {
    let store = read_store_from_path(input)?;
    info!("Loaded {} reads from {}", store.len(), input.display());

    let evaluations = if threads > 1 {
        par_evaluate_store(&store, opts, threads)?
    } else {
        evaluate_store(&store, opts)?
    };

    let passed_reads = evaluations.iter().filter(|e| e.passed).count();
    let mut run = FilterRun {
        input_reads: store.len(),
        passed_reads,
        output: None,
        evaluations,
    };

    if passed_reads == 0 {
        info!("No reads passed the filters, {} not written", output.display());
        return Ok(run);
    }

    write_atomically(output, dirs, |writer| {
        run.evaluations
            .iter()
            .filter(|e| e.passed)
            .try_for_each(|e| write_read(writer, &e.read))
    })
    .with_context(|| format!("Could not write filtered reads to {}", output.display()))?;

    info!(
        "Kept {} of {} reads, written to {}",
        passed_reads,
        run.input_reads,
        output.display()
    );
    run.output = Some(output.to_path_buf());

    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::RecordingDirs;
    use crate::output::FsDirCreator;
    use crate::reader::read_store;
    use std::io::Cursor;

    fn store(reads: &[(&str, &str, &str)]) -> RecordStore {
        reads
            .iter()
            .map(|&(id, seq, qual)| Read::new(id, seq, qual))
            .collect()
    }

    fn ids(store: &RecordStore) -> Vec<String> {
        store.reads().map(|r| r.id).collect()
    }

    #[test]
    fn defaults_keep_everything() {
        let s = store(&[
            ("a", "ATAT", "!!!!"),
            ("b", "GCGC", "~~~~"),
            ("c", "N", "#"),
        ]);
        assert_eq!(filter_store(&s, &FilterOpts::default()).unwrap(), s);
    }

    #[test]
    fn length_bounds() {
        let s = store(&[("short", "ATGC", "IIII"), ("long", "ATGCGTAT", "IIIIIIII")]);
        let opts = FilterOpts::new(
            BoundsSpec::Range(0.0, 100.0),
            BoundsSpec::Range(5, 10),
            0.0,
        );
        assert_eq!(ids(&filter_store(&s, &opts).unwrap()), vec!["long"]);
    }

    #[test]
    fn scalar_length_bound_is_an_upper_bound() {
        let s = store(&[("short", "ATGC", "IIII"), ("long", "ATGCGTAT", "IIIIIIII")]);
        let opts = FilterOpts {
            len: BoundsSpec::Upper(4).normalize(),
            ..FilterOpts::default()
        };
        assert_eq!(ids(&filter_store(&s, &opts).unwrap()), vec!["short"]);
    }

    #[test]
    fn gc_bounds() {
        let s = store(&[("lowGC", "ATATAT", "IIIIII"), ("highGC", "GCGCGC", "IIIIII")]);
        let opts = FilterOpts {
            gc: Bounds::new(50.0, 100.0),
            ..FilterOpts::default()
        };
        assert_eq!(ids(&filter_store(&s, &opts).unwrap()), vec!["highGC"]);

        let s = store(&[("tooGC", "GCGCGC", "IIIIII"), ("okGC", "ATGCAT", "IIIIII")]);
        let opts = FilterOpts {
            gc: BoundsSpec::Upper(70.0).normalize(),
            ..FilterOpts::default()
        };
        assert_eq!(ids(&filter_store(&s, &opts).unwrap()), vec!["okGC"]);
    }

    #[test]
    fn quality_threshold() {
        // '+' = 10, 'I' = 40
        let s = store(&[("lowQ", "ATGCGA", "++++++"), ("highQ", "GGCCTA", "IIIIII")]);
        let opts = FilterOpts {
            quality: 30.0,
            ..FilterOpts::default()
        };
        assert_eq!(ids(&filter_store(&s, &opts).unwrap()), vec!["highQ"]);

        let opts = FilterOpts {
            quality: 40.0,
            ..FilterOpts::default()
        };
        assert_eq!(ids(&filter_store(&s, &opts).unwrap()), vec!["highQ"]);
    }

    #[test]
    fn all_criteria_must_hold() {
        let read = Read::new("r", "GGGA", "IIII");
        let metrics = ReadMetrics::of(&read).unwrap();
        assert_eq!(metrics.gc, 75.0);
        assert_eq!(metrics.len, 4);
        assert_eq!(metrics.mean_quality, 40.0);

        let ok = FilterOpts::new(BoundsSpec::Range(70.0, 80.0), BoundsSpec::Range(4, 4), 40.0);
        assert!(metrics.passes(&ok));
        assert!(!metrics.passes(&FilterOpts { quality: 40.5, ..ok }));
        assert!(!metrics.passes(&FilterOpts { len: Bounds::new(5, 9), ..ok }));
        assert!(!metrics.passes(&FilterOpts { gc: Bounds::new(0.0, 74.9), ..ok }));
    }

    #[test]
    fn empty_read_is_an_error() {
        let s = store(&[("ok", "A", "I"), ("empty", "", "")]);
        let err = filter_store(&s, &FilterOpts::default()).unwrap_err();
        assert!(matches!(err, FilterError::Degenerate { ref id, .. } if id == "empty"));
        assert!(filter(&Read::new("e", "", ""), &FilterOpts::default()).is_err());
    }

    #[test]
    fn parallel_reports_the_same_error() {
        let s = store(&[("ok", "A", "I"), ("empty", "", ""), ("also_ok", "G", "I")]);
        let err = par_filter_store(&s, &FilterOpts::default(), 3).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Degenerate {
                ref id,
                source: MetricError::Degenerate { .. },
            } if id == "empty"
        ));
    }

    #[test]
    fn parallel_matches_sequential() {
        let reads: Vec<Read> = (0..200)
            .map(|i| {
                let seq = "ACGT".repeat(1 + i % 7) + &"G".repeat(i % 5);
                let qual = std::iter::repeat((b'!' + (i % 41) as u8) as char)
                    .take(seq.len())
                    .collect::<String>();
                Read::new(format!("read{i}"), seq, qual)
            })
            .collect();
        let s: RecordStore = reads.into_iter().collect();
        let opts = FilterOpts::new(BoundsSpec::Range(50.0, 60.0), BoundsSpec::Upper(20), 10.0);

        assert_eq!(
            par_filter_store(&s, &opts, 4).unwrap(),
            filter_store(&s, &opts).unwrap()
        );
    }

    #[test]
    fn filter_fastq_writes_only_passing_reads() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.fastq");
        std::fs::write(&input, "@short\nATGC\n+\nIIII\n@long\nATGCGTAT\n+\nIIIIIIII\n").unwrap();

        let output = tmp.path().join("filtered").join("out.fastq");
        let opts = FilterOpts {
            len: Bounds::new(5, 10),
            ..FilterOpts::default()
        };
        let dirs = RecordingDirs::default();
        let run = filter_fastq(&input, &output, &opts, 1, &dirs).unwrap();

        assert_eq!(run.input_reads, 2);
        assert_eq!(run.passed_reads, 1);
        assert_eq!(run.output.as_deref(), Some(output.as_path()));
        assert_eq!(*dirs.created.borrow(), vec![tmp.path().join("filtered")]);

        let written = read_store(Cursor::new(std::fs::read(&output).unwrap())).unwrap();
        assert_eq!(ids(&written), vec!["long"]);
    }

    #[test]
    fn nothing_passes_means_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.fastq");
        std::fs::write(&input, "@low_quality\nATATAT\n+\n&&&&&&\n").unwrap();

        let out_dir = tmp.path().join("filtered");
        let output = out_dir.join("no_output.fastq");
        let opts = FilterOpts {
            gc: Bounds::new(80.0, 100.0),
            quality: 40.0,
            ..FilterOpts::default()
        };
        let dirs = RecordingDirs::default();
        let run = filter_fastq(&input, &output, &opts, 1, &dirs).unwrap();

        assert_eq!(run.passed_reads, 0);
        assert!(run.output.is_none());
        assert!(dirs.created.borrow().is_empty());
        assert!(!out_dir.exists());
    }

    #[test]
    fn empty_input_means_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("empty.fastq");
        std::fs::write(&input, "").unwrap();
        let output = tmp.path().join("out").join("empty_out.fastq");

        let run = filter_fastq(&input, &output, &FilterOpts::default(), 1, &FsDirCreator).unwrap();
        assert_eq!(run.input_reads, 0);
        assert!(!output.exists());
    }

    #[test]
    fn malformed_input_fails_before_output() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("not_a_fastq.txt");
        std::fs::write(&input, "This is not a fastq file").unwrap();
        let output = tmp.path().join("filtered").join("out.fastq");
        let dirs = RecordingDirs::default();

        let err = filter_fastq(&input, &output, &FilterOpts::default(), 1, &dirs).unwrap_err();

        let fastq_err = err
            .chain()
            .find_map(|e| e.downcast_ref::<crate::reader::FastqError>())
            .expect("a FASTQ format error");
        assert!(fastq_err.is_format_error());
        assert!(dirs.created.borrow().is_empty());
        assert!(!output.exists());
    }
}
