use std::io::{BufRead, Write};

use anyhow::Result;

/// Rewrites a FASTA stream so every sequence sits on a single line.
///
/// Header lines are copied (trimmed) and the sequence lines that follow are joined. Lines before
/// the first header have no record to belong to and are dropped. Returns the number of records
/// written.
pub fn convert_to_oneline(reader: impl BufRead, writer: &mut impl Write) -> Result<usize> {
    let mut header: Option<String> = None;
    let mut seq = String::new();
    let mut records = 0;
    let mut dropped = 0;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.starts_with('>') {
            if let Some(h) = header.replace(line.to_string()) {
                writeln!(writer, "{h}\n{seq}")?;
                records += 1;
            }
            seq.clear();
        } else if header.is_some() {
            seq.push_str(line);
        } else if !line.is_empty() {
            dropped += 1;
        }
    }

    if let Some(h) = header {
        writeln!(writer, "{h}\n{seq}")?;
        records += 1;
    }

    if dropped > 0 {
        warn!("Dropped {dropped} lines found before the first FASTA header");
    }

    Ok(records)
}

/// A named protein translation, as written to FASTA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gene {
    pub name: String,
    pub translation: String,
}

/// Writes genes as `>name` / translation line pairs, skipping genes without a translation.
/// Returns the number of genes written.
pub fn write_genes<'a>(
    writer: &mut impl Write,
    genes: impl IntoIterator<Item = &'a Gene>,
) -> std::io::Result<usize> {
    let mut written = 0;
    for gene in genes.into_iter().filter(|g| !g.translation.is_empty()) {
        writeln!(writer, ">{}\n{}", gene.name, gene.translation)?;
        written += 1;
    }
    Ok(written)
}
