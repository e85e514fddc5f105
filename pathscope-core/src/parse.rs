// Flat-file pathway record parser.
//
// Records use fixed-width, line-oriented tagged sections: a tag in column 0
// opens a section and continuation lines are indented. Only the GENE section
// and the ENTRY/NAME header fields are read.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DedupPolicy;
use crate::types::GeneRecord;

const GENE_TAG: &str = "GENE";
const TERMINATOR_TAGS: [&str; 3] = ["COMPOUND", "REFERENCE", "AUTHORS"];

/// Everything the parser extracts from one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayRecord {
    /// First token of the ENTRY line, e.g. `hsa05016`.
    pub entry: Option<String>,
    /// Value of the NAME line.
    pub name: Option<String>,
    /// Genes in source order.
    pub genes: Vec<GeneRecord>,
    /// Non-blank lines inside the GENE section that were not gene entries.
    pub skipped_lines: usize,
}

/// Parse only the gene list of a record.
pub fn parse_genes(raw: &str) -> Vec<GeneRecord> {
    parse_record(raw).genes
}

/// Parse a raw record. Never fails: malformed gene lines are skipped and
/// counted, and a missing or empty GENE section yields no genes.
pub fn parse_record(raw: &str) -> PathwayRecord {
    let mut record = PathwayRecord::default();
    let mut in_genes = false;

    for (line_no, line) in raw.lines().enumerate() {
        if let Some(rest) = line.strip_prefix(GENE_TAG) {
            in_genes = true;
            let first = rest.trim();
            if !first.is_empty() {
                push_gene_line(&mut record, first, line_no);
            }
            continue;
        }

        if TERMINATOR_TAGS.iter().any(|tag| line.starts_with(tag)) {
            in_genes = false;
            continue;
        }

        if in_genes {
            let data = line.trim();
            if !data.is_empty() {
                push_gene_line(&mut record, data, line_no);
            }
            continue;
        }

        if record.entry.is_none() {
            if let Some(rest) = line.strip_prefix("ENTRY") {
                record.entry = rest.split_whitespace().next().map(str::to_string);
                continue;
            }
        }
        if record.name.is_none() {
            if let Some(rest) = line.strip_prefix("NAME") {
                let name = rest.trim();
                if !name.is_empty() {
                    record.name = Some(name.to_string());
                }
            }
        }
    }

    debug!(
        genes = record.genes.len(),
        skipped = record.skipped_lines,
        entry = record.entry.as_deref().unwrap_or(""),
        "Parsed pathway record"
    );
    record
}

fn push_gene_line(record: &mut PathwayRecord, data: &str, line_no: usize) {
    match parse_gene_line(data) {
        Some(gene) => record.genes.push(gene),
        None => {
            debug!(line = line_no + 1, text = data, "Skipping malformed GENE line");
            record.skipped_lines += 1;
        }
    }
}

/// Parse one data line: `"<id> <symbol>; <description>"`.
///
/// Splits at the first `;` only, so descriptions keep their own
/// semicolons.
pub fn parse_gene_line(data: &str) -> Option<GeneRecord> {
    let (head, description) = data.split_once(';')?;
    let (id, symbol) = head.trim().split_once(char::is_whitespace)?;
    let symbol = symbol.trim();
    if id.is_empty() || symbol.is_empty() {
        return None;
    }
    Some(GeneRecord {
        id: id.to_string(),
        symbol: symbol.to_string(),
        description: description.trim().to_string(),
    })
}

/// Collapse duplicate symbols according to `policy`. Order of first
/// appearance is preserved in every mode.
pub fn dedup_genes(genes: Vec<GeneRecord>, policy: DedupPolicy) -> Vec<GeneRecord> {
    match policy {
        DedupPolicy::Keep => genes,
        DedupPolicy::FirstWins => {
            let mut seen = HashSet::new();
            genes
                .into_iter()
                .filter(|g| seen.insert(g.symbol.clone()))
                .collect()
        }
        DedupPolicy::LastWins => {
            let mut slot: HashMap<String, usize> = HashMap::new();
            let mut out: Vec<GeneRecord> = Vec::with_capacity(genes.len());
            for gene in genes {
                if let Some(&idx) = slot.get(&gene.symbol) {
                    out[idx] = gene;
                } else {
                    slot.insert(gene.symbol.clone(), out.len());
                    out.push(gene);
                }
            }
            out
        }
    }
}
