use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{BioSeq, SeqError, SeqKind};

/// Outcome of classifying a nucleic acid string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NaKind {
    Dna,
    Rna,
    /// Both `T` and `U` are present, so neither variant applies.
    Undetermined,
}

impl NaKind {
    pub fn seq_kind(self) -> Option<SeqKind> {
        match self {
            NaKind::Dna => Some(SeqKind::Dna),
            NaKind::Rna => Some(SeqKind::Rna),
            NaKind::Undetermined => None,
        }
    }
}

/// True if every character is one of `ACGTU`, in either case.
pub fn is_nucleic_acid(seq: &str) -> bool {
    seq.bytes()
        .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'U'))
}

/// Classifies a nucleic acid string, case-insensitively: `T` only is DNA, `T` and `U` together
/// are undetermined, anything else (including `ACG`-only and empty strings) is taken as RNA.
pub fn infer_na_kind(seq: &str) -> NaKind {
    let has = |c: u8| seq.bytes().any(|b| b.to_ascii_uppercase() == c);

    match (has(b'T'), has(b'U')) {
        (true, true) => NaKind::Undetermined,
        (true, false) => NaKind::Dna,
        _ => NaKind::Rna,
    }
}

/// Transforms available on nucleic acid sequences.
#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum NaOperation {
    /// DNA to RNA (T becomes U)
    Transcribe,
    /// reverse the order of the bases
    Reverse,
    /// replace each base by its pairing partner
    Complement,
    /// complement, then reverse
    #[value(alias = "reverse_complement")]
    ReverseComplement,
}

impl NaOperation {
    pub fn name(self) -> &'static str {
        match self {
            NaOperation::Transcribe => "transcribe",
            NaOperation::Reverse => "reverse",
            NaOperation::Complement => "complement",
            NaOperation::ReverseComplement => "reverse_complement",
        }
    }

    pub fn apply(self, seq: &BioSeq) -> Result<BioSeq, SeqError> {
        match self {
            NaOperation::Transcribe => seq.transcribe(),
            NaOperation::Reverse => seq.reverse(),
            NaOperation::Complement => seq.complement(),
            NaOperation::ReverseComplement => seq.reverse_complement(),
        }
    }
}

impl fmt::Display for NaOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
#[error("unknown operation `{0}`: expected one of transcribe, reverse, complement, reverse_complement")]
pub struct ParseOperationErr(String);

impl FromStr for NaOperation {
    type Err = ParseOperationErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "transcribe" => Ok(NaOperation::Transcribe),
            "reverse" => Ok(NaOperation::Reverse),
            "complement" => Ok(NaOperation::Complement),
            "reverse_complement" => Ok(NaOperation::ReverseComplement),
            _ => Err(ParseOperationErr(s.to_string())),
        }
    }
}
