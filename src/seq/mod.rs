pub mod alphabet;
pub mod batch;
pub mod nucleic;
pub mod protein;
pub mod sequence;

use std::fmt;

use thiserror::Error;

pub use self::batch::{run_na_batch, BatchOutcome, BatchOutput, Diagnostic, DiagnosticReason};
pub use self::nucleic::{infer_na_kind, is_nucleic_acid, NaKind, NaOperation};
pub use self::protein::{validate_protein, ProteinError};
pub use self::sequence::BioSeq;

/// The closed set of biological sequence variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SeqKind {
    Dna,
    Rna,
    AminoAcid,
}

impl SeqKind {
    pub fn is_nucleic_acid(self) -> bool {
        matches!(self, SeqKind::Dna | SeqKind::Rna)
    }
}

impl fmt::Display for SeqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeqKind::Dna => "DNA",
            SeqKind::Rna => "RNA",
            SeqKind::AminoAcid => "amino acid",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeqError {
    #[error("invalid character {found:?} at position {pos} of a {kind} sequence")]
    Alphabet {
        kind: SeqKind,
        pos: usize,
        found: char,
    },

    #[error("{op} is not supported for {kind} sequences")]
    Capability { kind: SeqKind, op: NaOperation },
}
