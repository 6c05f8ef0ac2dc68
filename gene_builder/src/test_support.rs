// src/test_support.rs

//! In-memory [`GenomeDataSource`] used by unit tests.

use std::collections::HashMap;

use crate::ensembl::GenomeDataSource;
use crate::error::GeneBuilderError;
use crate::models::{Gene, SeqKind, Transcript};

#[derive(Default)]
pub struct StaticSource {
    pub gene: Option<Gene>,
    pub details: HashMap<String, Transcript>,
    pub sequences: HashMap<(String, SeqKind), String>,
}

impl StaticSource {
    pub fn add_detail(&mut self, transcript: Transcript) {
        self.details.insert(transcript.id.clone(), transcript);
    }

    pub fn add_sequence(&mut self, feature_id: &str, kind: SeqKind, seq: &str) {
        self.sequences
            .insert((feature_id.to_string(), kind), seq.to_string());
    }

    pub fn remove_sequence(&mut self, feature_id: &str, kind: SeqKind) {
        self.sequences.remove(&(feature_id.to_string(), kind));
    }

    fn not_found(what: &str) -> GeneBuilderError {
        GeneBuilderError::Status {
            url: format!("static://{what}"),
            status: reqwest::StatusCode::NOT_FOUND,
            body: String::new(),
        }
    }
}

impl GenomeDataSource for StaticSource {
    fn fetch_gene(&self, symbol: &str, _species: &str) -> Result<Gene, GeneBuilderError> {
        self.gene.clone().ok_or_else(|| Self::not_found(symbol))
    }

    fn fetch_transcript_detail(&self, transcript_id: &str) -> Result<Transcript, GeneBuilderError> {
        self.details
            .get(transcript_id)
            .cloned()
            .ok_or_else(|| Self::not_found(transcript_id))
    }

    fn fetch_sequence(&self, feature_id: &str, kind: SeqKind) -> Result<String, GeneBuilderError> {
        self.sequences
            .get(&(feature_id.to_string(), kind))
            .cloned()
            .ok_or_else(|| Self::not_found(feature_id))
    }
}
