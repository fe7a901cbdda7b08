use bio::alphabets::Alphabet;
use lazy_static::lazy_static;

use super::SeqKind;

const DNA_PAIRS: &[(u8, u8)] = &[
    (b'A', b'T'),
    (b'T', b'A'),
    (b'G', b'C'),
    (b'C', b'G'),
    (b'a', b't'),
    (b't', b'a'),
    (b'g', b'c'),
    (b'c', b'g'),
];

const RNA_PAIRS: &[(u8, u8)] = &[
    (b'A', b'U'),
    (b'U', b'A'),
    (b'G', b'C'),
    (b'C', b'G'),
    (b'a', b'u'),
    (b'u', b'a'),
    (b'g', b'c'),
    (b'c', b'g'),
];

/// The 20 standard one-letter amino acid codes, plus `*` for a stop.
pub const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY*";

/// The symbols of one sequence variant and, for nucleic acids, the complement of each symbol.
pub struct AlphabetTable {
    pub symbols: Alphabet,
    complement: Option<[u8; 256]>,
}

impl AlphabetTable {
    fn nucleic(pairs: &[(u8, u8)]) -> Self {
        let mut complement = [0u8; 256];
        for &(from, to) in pairs {
            complement[from as usize] = to;
        }

        AlphabetTable {
            symbols: Alphabet::new(pairs.iter().map(|&(from, _)| from)),
            complement: Some(complement),
        }
    }

    fn amino_acid() -> Self {
        let both_cases = AMINO_ACIDS
            .iter()
            .flat_map(|b| [b.to_ascii_uppercase(), b.to_ascii_lowercase()]);

        AlphabetTable {
            symbols: Alphabet::new(both_cases),
            complement: None,
        }
    }

    pub fn contains(&self, b: u8) -> bool {
        self.symbols.is_word([b])
    }

    /// Position of the first byte of `text` outside the alphabet.
    pub fn first_invalid(&self, text: &[u8]) -> Option<usize> {
        if self.symbols.is_word(text) {
            return None;
        }
        text.iter().position(|&b| !self.contains(b))
    }

    /// Complement of a single symbol. `None` for variants without pairing rules or for bytes
    /// outside the alphabet.
    pub fn complement(&self, b: u8) -> Option<u8> {
        match &self.complement {
            Some(table) if table[b as usize] != 0 => Some(table[b as usize]),
            _ => None,
        }
    }

    pub fn has_complement(&self) -> bool {
        self.complement.is_some()
    }
}

lazy_static! {
    static ref DNA: AlphabetTable = AlphabetTable::nucleic(DNA_PAIRS);
    static ref RNA: AlphabetTable = AlphabetTable::nucleic(RNA_PAIRS);
    static ref AMINO_ACID: AlphabetTable = AlphabetTable::amino_acid();
}

/// Returns the alphabet table owned by a sequence variant.
pub fn table(kind: SeqKind) -> &'static AlphabetTable {
    match kind {
        SeqKind::Dna => &*DNA,
        SeqKind::Rna => &*RNA,
        SeqKind::AminoAcid => &*AMINO_ACID,
    }
}
