use thiserror::Error;

use super::{BioSeq, SeqError};

/// Proteins are expected to open with methionine.
pub const START_CODON: char = 'M';

/// Shortest sequence accepted as a protein.
pub const MIN_PROTEIN_LEN: usize = 20;

#[derive(Error, Debug, PartialEq)]
pub enum ProteinError {
    #[error("sequence is empty")]
    Empty,

    #[error("sequence is not made of amino acids: {0}")]
    InvalidAlphabet(#[source] SeqError),

    #[error("sequence does not start with methionine (M), found {found:?}")]
    MissingStartCodon { found: char },

    #[error("sequence of {len} residues is too short to be a protein (at least 20 needed)")]
    TooShort { len: usize },
}

/// Checks that `seq` reads as a protein: non-empty, made of amino acid codes, starting with
/// `M` and at least `MIN_PROTEIN_LEN` residues long. Checks run in that order and the first
/// failure is returned.
pub fn validate_protein(seq: &str) -> Result<BioSeq, ProteinError> {
    let Some(first) = seq.chars().next() else {
        return Err(ProteinError::Empty);
    };

    let protein = BioSeq::amino_acid(seq).map_err(ProteinError::InvalidAlphabet)?;

    if !first.eq_ignore_ascii_case(&START_CODON) {
        return Err(ProteinError::MissingStartCodon { found: first });
    }

    if protein.len() < MIN_PROTEIN_LEN {
        return Err(ProteinError::TooShort { len: protein.len() });
    }

    Ok(protein)
}
