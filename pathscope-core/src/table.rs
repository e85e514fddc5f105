use serde::{Deserialize, Serialize};

use crate::score::rank_by_priority;
use crate::types::{MechanismLabel, ScoredGene};

/// Scored genes in parse order, as handed to presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneTable {
    rows: Vec<ScoredGene>,
}

impl GeneTable {
    pub fn new(rows: Vec<ScoredGene>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in parse order.
    pub fn rows(&self) -> &[ScoredGene] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ScoredGene> {
        self.rows
    }

    /// Rows in descending priority; ties keep parse order.
    pub fn ranked(&self) -> Vec<&ScoredGene> {
        rank_by_priority(&self.rows)
    }

    /// Case-insensitive substring match on symbol, description, or role
    /// (identifier or display name). An empty query matches every row.
    pub fn search(&self, query: &str) -> Vec<&ScoredGene> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|g| {
                g.symbol().to_lowercase().contains(&needle)
                    || g.description().to_lowercase().contains(&needle)
                    || g.role().display_name().to_lowercase().contains(&needle)
                    || g.role().as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn with_role(&self, role: MechanismLabel) -> Vec<&ScoredGene> {
        self.rows.iter().filter(|g| g.role() == role).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&ScoredGene> {
        self.rows.iter().find(|g| g.symbol() == symbol)
    }
}

impl From<Vec<ScoredGene>> for GeneTable {
    fn from(rows: Vec<ScoredGene>) -> Self {
        Self::new(rows)
    }
}

impl<'a> IntoIterator for &'a GeneTable {
    type Item = &'a ScoredGene;
    type IntoIter = std::slice::Iter<'a, ScoredGene>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
