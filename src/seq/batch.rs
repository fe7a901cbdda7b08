use std::fmt;

use super::nucleic::{infer_na_kind, is_nucleic_acid, NaKind, NaOperation};
use super::{BioSeq, SeqError};

/// Why a sequence was left out of a batch result.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticReason {
    /// Contains characters other than `ACGTU`.
    NotNucleicAcid,
    /// Contains both `T` and `U`.
    Undetermined,
    /// The operation does not apply to the inferred variant, e.g. transcribing RNA.
    Unsupported(SeqError),
}

/// A per-sequence problem reported by a batch operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// 0-based position of the sequence in the batch input
    pub index: usize,
    pub sequence: String,
    pub reason: DiagnosticReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence {} `{}`: ", self.index + 1, self.sequence)?;
        match &self.reason {
            DiagnosticReason::NotNucleicAcid => f.write_str("not a nucleic acid"),
            DiagnosticReason::Undetermined => {
                f.write_str("nucleic acid type is undetermined (contains both T and U)")
            }
            DiagnosticReason::Unsupported(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BatchOutput {
    /// Exactly one sequence succeeded.
    Single(String),
    /// Zero, or two or more, sequences succeeded.
    Many(Vec<String>),
}

impl BatchOutput {
    pub fn as_slice(&self) -> &[String] {
        match self {
            BatchOutput::Single(s) => std::slice::from_ref(s),
            BatchOutput::Many(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchOutcome {
    pub output: BatchOutput,
    pub diagnostics: Vec<Diagnostic>,
}

fn transform_one(seq: &str, op: NaOperation) -> Result<String, DiagnosticReason> {
    if !is_nucleic_acid(seq) {
        return Err(DiagnosticReason::NotNucleicAcid);
    }

    let kind = match infer_na_kind(seq) {
        NaKind::Undetermined => return Err(DiagnosticReason::Undetermined),
        k => k.seq_kind().ok_or(DiagnosticReason::Undetermined)?,
    };

    BioSeq::new(kind, seq)
        .and_then(|s| op.apply(&s))
        .map(BioSeq::into_string)
        .map_err(DiagnosticReason::Unsupported)
}

/// Applies `op` to each sequence independently. Sequences that are not nucleic acids, whose
/// type cannot be determined, or that do not support `op` are reported in the diagnostics
/// and left out of the output; they never stop the rest of the batch.
pub fn run_na_batch<S: AsRef<str>>(seqs: &[S], op: NaOperation) -> BatchOutcome {
    let mut results = Vec::with_capacity(seqs.len());
    let mut diagnostics = Vec::new();

    for (index, seq) in seqs.iter().enumerate() {
        let seq = seq.as_ref();
        match transform_one(seq, op) {
            Ok(out) => results.push(out),
            Err(reason) => {
                let diagnostic = Diagnostic {
                    index,
                    sequence: seq.to_string(),
                    reason,
                };
                warn!("Skipping {diagnostic}");
                diagnostics.push(diagnostic);
            }
        }
    }

    let output = if results.len() == 1 {
        BatchOutput::Single(results.remove(0))
    } else {
        BatchOutput::Many(results)
    };

    BatchOutcome {
        output,
        diagnostics,
    }
}
