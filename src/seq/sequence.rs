use std::fmt;

use super::alphabet::{self, AlphabetTable};
use super::{NaOperation, SeqError, SeqKind};

/// An immutable, validated biological sequence.
///
/// Every derived sequence (complement, reverse, transcript) is a new value; the original is
/// never modified.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BioSeq {
    kind: SeqKind,
    seq: String,
}

impl BioSeq {
    /// Validates `seq` against the alphabet of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `SeqError::Alphabet` naming the first character outside the alphabet.
    pub fn new(kind: SeqKind, seq: impl Into<String>) -> Result<Self, SeqError> {
        let seq = seq.into();

        if let Some(pos) = alphabet::table(kind).first_invalid(seq.as_bytes()) {
            // `pos` is on a char boundary: everything before it is ASCII
            let found = seq[pos..].chars().next().unwrap_or('\u{FFFD}');
            return Err(SeqError::Alphabet { kind, pos, found });
        }

        Ok(BioSeq { kind, seq })
    }

    pub fn dna(seq: impl Into<String>) -> Result<Self, SeqError> {
        Self::new(SeqKind::Dna, seq)
    }

    pub fn rna(seq: impl Into<String>) -> Result<Self, SeqError> {
        Self::new(SeqKind::Rna, seq)
    }

    pub fn amino_acid(seq: impl Into<String>) -> Result<Self, SeqError> {
        Self::new(SeqKind::AminoAcid, seq)
    }

    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.seq
    }

    pub fn into_string(self) -> String {
        self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    fn table(&self) -> &'static AlphabetTable {
        alphabet::table(self.kind)
    }

    fn unsupported(&self, op: NaOperation) -> SeqError {
        SeqError::Capability {
            kind: self.kind,
            op,
        }
    }

    /// A new value of the same variant built from already-validated symbols.
    fn derive(&self, seq: String) -> Self {
        BioSeq {
            kind: self.kind,
            seq,
        }
    }

    /// Replaces every base by its pairing partner, keeping case.
    pub fn complement(&self) -> Result<Self, SeqError> {
        let table = self.table();
        if !table.has_complement() {
            return Err(self.unsupported(NaOperation::Complement));
        }

        // every symbol was validated on construction, so each has a partner
        let complement = self
            .seq
            .bytes()
            .map(|b| table.complement(b).unwrap_or(b) as char)
            .collect();

        Ok(self.derive(complement))
    }

    pub fn reverse(&self) -> Result<Self, SeqError> {
        if !self.kind.is_nucleic_acid() {
            return Err(self.unsupported(NaOperation::Reverse));
        }

        Ok(self.derive(self.seq.chars().rev().collect()))
    }

    /// The complement, read in reverse.
    pub fn reverse_complement(&self) -> Result<Self, SeqError> {
        if !self.kind.is_nucleic_acid() {
            return Err(self.unsupported(NaOperation::ReverseComplement));
        }

        self.complement()?.reverse()
    }

    /// Transcribes DNA into RNA by replacing `T`/`t` with `U`/`u`.
    ///
    /// # Errors
    ///
    /// Returns `SeqError::Capability` for anything other than DNA.
    pub fn transcribe(&self) -> Result<Self, SeqError> {
        if self.kind != SeqKind::Dna {
            return Err(self.unsupported(NaOperation::Transcribe));
        }

        let transcript = self
            .seq
            .chars()
            .map(|c| match c {
                'T' => 'U',
                't' => 'u',
                c => c,
            })
            .collect();

        Ok(BioSeq {
            kind: SeqKind::Rna,
            seq: transcript,
        })
    }
}

impl fmt::Display for BioSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.seq)
    }
}

impl AsRef<str> for BioSeq {
    fn as_ref(&self) -> &str {
        &self.seq
    }
}
