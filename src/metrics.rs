use thiserror::Error;

/// Offset of the Phred+33 quality encoding.
pub const PHRED_OFFSET: i64 = 33;

#[derive(Error, Debug, PartialEq)]
pub enum MetricError {
    #[error("cannot compute {metric} of an empty {what}")]
    Degenerate {
        metric: &'static str,
        what: &'static str,
    },
}

/// GC content of a sequence as a percentage in `[0, 100]`. Counting is case-insensitive and
/// every other symbol (including `N`) counts towards the length only.
pub fn gc_content(seq: &[u8]) -> Result<f64, MetricError> {
    if seq.is_empty() {
        return Err(MetricError::Degenerate {
            metric: "GC content",
            what: "sequence",
        });
    }

    let gc = seq
        .iter()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();

    Ok(100.0 * (gc as f64) / (seq.len() as f64))
}

/// Sum of the decoded Phred scores. A byte below `!` decodes to a negative score, which is
/// summed as is.
pub fn phred_quality_total(qual: &[u8]) -> i64 {
    qual.iter().map(|&q| (q as i64) - PHRED_OFFSET).sum()
}

/// Arithmetic mean of the decoded Phred+33 scores of a quality string.
pub fn mean_quality(qual: &[u8]) -> Result<f64, MetricError> {
    if qual.is_empty() {
        return Err(MetricError::Degenerate {
            metric: "mean quality",
            what: "quality string",
        });
    }

    Ok((phred_quality_total(qual) as f64) / (qual.len() as f64))
}
