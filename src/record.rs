use crate::metrics::{self, MetricError};

/// A single sequencing read: identifier, bases and Phred+33 quality string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Read {
    pub id: String,
    pub seq: String,
    pub qual: String,
}

impl Read {
    pub fn new(id: impl Into<String>, seq: impl Into<String>, qual: impl Into<String>) -> Self {
        Read {
            id: id.into(),
            seq: seq.into(),
            qual: qual.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn gc_content(&self) -> Result<f64, MetricError> {
        metrics::gc_content(self.seq.as_bytes())
    }

    pub fn phred_quality_avg(&self) -> Result<f64, MetricError> {
        metrics::mean_quality(self.qual.as_bytes())
    }
}
