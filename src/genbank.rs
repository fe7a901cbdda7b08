use std::io::BufRead;

use anyhow::Result;
use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::fasta::Gene;

lazy_static! {
    static ref GENE_RE: Regex = Regex::new(r#"^/gene="([^"]*)""#).unwrap();
    static ref TRANSLATION_RE: Regex = Regex::new(r#"^/translation="([^"]*)(")?"#).unwrap();
}

/// Returns the feature key if `line` opens a feature in the FEATURES table. Keys start at
/// column 6, qualifiers and locations continue at column 22.
fn feature_key(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("     ")?;
    if rest.starts_with(' ') {
        return None;
    }
    rest.split_whitespace().next()
}

#[derive(Default)]
struct CdsBuilder {
    name: Option<String>,
    translation: String,
    in_translation: bool,
}

impl CdsBuilder {
    fn finish(self, genes: &mut Vec<Gene>) {
        match self.name {
            Some(name) => genes.push(Gene {
                name,
                translation: self.translation,
            }),
            None => debug!("Skipping a CDS without a /gene qualifier"),
        }
    }
}

/// Collects the gene name and protein translation of every CDS feature of a GenBank file, in
/// file order. Translations split over several lines are joined. CDS features without a
/// `/gene` qualifier are skipped.
pub fn genes_from_gbk(reader: impl BufRead) -> Result<Vec<Gene>> {
    let mut genes = Vec::new();
    let mut current: Option<CdsBuilder> = None;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if let Some(cds) = current.as_mut().filter(|c| c.in_translation) {
            match trimmed.split_once('"') {
                Some((end, _)) => {
                    cds.translation.push_str(end);
                    cds.in_translation = false;
                }
                None => cds.translation.push_str(trimmed),
            }
            continue;
        }

        let new_section = !line.is_empty() && !line.starts_with(' ');
        if let Some(key) = feature_key(&line).filter(|_| !new_section) {
            if let Some(cds) = current.take() {
                cds.finish(&mut genes);
            }
            if key == "CDS" {
                current = Some(CdsBuilder::default());
            }
            continue;
        }
        if new_section {
            if let Some(cds) = current.take() {
                cds.finish(&mut genes);
            }
            continue;
        }

        let Some(cds) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = GENE_RE.captures(trimmed) {
            cds.name = Some(caps[1].to_string());
        } else if let Some(caps) = TRANSLATION_RE.captures(trimmed) {
            cds.translation = caps[1].to_string();
            cds.in_translation = caps.get(2).is_none();
        }
    }

    if let Some(cds) = current {
        cds.finish(&mut genes);
    }

    info!("Found {} named CDS features", genes.len());
    Ok(genes)
}

/// Selects the genes around every gene whose name contains one of `queries`: up to
/// `n_before` genes before it and `n_after` genes after it, clamped to the ends of the list.
/// The matching gene itself is not included on its own account, though it can be included as
/// a neighbour of another match. Each gene appears once, in the order it was first selected.
pub fn find_neighbours<'a, S: AsRef<str>>(
    genes: &'a [Gene],
    queries: &[S],
    n_before: usize,
    n_after: usize,
) -> Vec<&'a Gene> {
    let mut selected: IndexSet<usize> = IndexSet::new();

    for (idx, gene) in genes.iter().enumerate() {
        if !queries.iter().any(|q| gene.name.contains(q.as_ref())) {
            continue;
        }

        let start = idx.saturating_sub(n_before);
        let end = idx.saturating_add(n_after).min(genes.len().saturating_sub(1));
        selected.extend((start..=end).filter(|&i| i != idx));
    }

    for q in queries.iter().map(AsRef::as_ref) {
        if !genes.iter().any(|g| g.name.contains(q)) {
            warn!("No gene matches `{q}`");
        }
    }

    selected.into_iter().map(|i| &genes[i]).collect()
}
