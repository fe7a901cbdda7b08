use std::collections::HashSet;
use std::io::{BufRead, Write};

use anyhow::Result;
use itertools::Itertools;

const MULTISPECIES: &str = "MULTISPECIES: ";

/// Reduces a BLAST hit line (`>name [organism]`) to its protein description.
fn clean_description(hit: &str) -> String {
    let hit = hit.strip_prefix('>').unwrap_or(hit);
    let before_organism = hit.split('[').next().unwrap_or_default().trim();
    before_organism.replace(MULTISPECIES, "")
}

/// Lists the best hit description of every query in a text BLAST report.
///
/// After each `Description` table header, the first `>` hit whose description has not been
/// seen yet is taken as the best hit of that query. The descriptions are returned once each,
/// sorted case-insensitively.
pub fn best_hit_descriptions(reader: impl BufRead) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut in_hits = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.starts_with("Description") {
            in_hits = true;
            continue;
        }

        if in_hits && line.starts_with('>') && seen.insert(clean_description(line)) {
            in_hits = false;
        }
    }

    Ok(seen
        .into_iter()
        .sorted_by_cached_key(|d| d.to_lowercase())
        .collect())
}

/// Writes one description per line.
pub fn write_descriptions(writer: &mut impl Write, descriptions: &[String]) -> std::io::Result<()> {
    descriptions
        .iter()
        .try_for_each(|d| writeln!(writer, "{d}"))
}
