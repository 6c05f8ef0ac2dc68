// src/exon_map.rs

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::models::Transcript;

/// Gene-wide exon numbering, shared by every splice variant.
///
/// Built once per gene over the kept transcripts and never recomputed
/// mid-run; the feature annotator and the audit report both depend on a
/// single consistent mapping.
#[derive(Debug, Default)]
pub struct ExonNumberMap {
    numbers: HashMap<String, u32>,
    /// Exon ids in numbering order (index + 1 == exon number).
    ordered: Vec<String>,
}

impl ExonNumberMap {
    /// Union the exon ids of all kept transcripts, deduplicate by id, and
    /// number 1..N by genomic start ascending. Ties keep first-encounter
    /// order (the sort is stable), which callers must treat as arbitrary
    /// but deterministic.
    pub fn build(transcripts: &[Transcript]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique = Vec::new();
        for transcript in transcripts {
            for exon in &transcript.exons {
                if seen.insert(exon.id.as_str()) {
                    unique.push(exon);
                }
            }
        }

        unique.sort_by_key(|exon| exon.start);

        let ordered: Vec<String> = unique.iter().map(|exon| exon.id.clone()).collect();
        let numbers = ordered
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), (i + 1) as u32))
            .collect();

        info!(exons = ordered.len(), "gene-wide exon numbering built");

        Self { numbers, ordered }
    }

    pub fn number(&self, exon_id: &str) -> Option<u32> {
        self.numbers.get(exon_id).copied()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Exon ids with their numbers, in numbering order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ordered
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), (i + 1) as u32))
    }
}
