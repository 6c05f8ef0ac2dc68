// src/models.rs

use std::collections::HashSet;

use serde::{Deserialize, Deserializer};

/// Sequence representation requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// Spliced transcript sequence (Ensembl "cdna").
    Full,
    /// Coding sequence only (Ensembl "cds").
    Coding,
    /// Raw genomic span (Ensembl "genomic").
    Genomic,
}

impl SeqKind {
    pub fn as_ensembl_type(&self) -> &'static str {
        match self {
            SeqKind::Full => "cdna",
            SeqKind::Coding => "cds",
            SeqKind::Genomic => "genomic",
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exon {
    pub id: String,
    pub start: u64,
    pub end: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Transcript {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub start: u64,
    pub end: u64,
    #[serde(default, deserialize_with = "canonical_flag")]
    pub is_canonical: bool,
    #[serde(rename = "Exon", default)]
    pub exons: Vec<Exon>,
}

impl Transcript {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    pub fn span(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn exon_ids(&self) -> HashSet<&str> {
        self.exons.iter().map(|e| e.id.as_str()).collect()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Gene {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub seq_region_name: String,
    pub start: u64,
    pub end: u64,
    pub strand: i8,
    #[serde(rename = "Transcript", default)]
    pub transcripts: Vec<Transcript>,
}

impl Gene {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Ensembl encodes the canonical flag as an integer (0 or 1).
fn canonical_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u8>::deserialize(deserializer)?;
    Ok(value == Some(1))
}
