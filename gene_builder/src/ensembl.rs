// src/ensembl.rs

use serde::Deserialize;

use crate::api_handler::ApiHandler;
use crate::config::Config;
use crate::error::GeneBuilderError;
use crate::models::{Gene, SeqKind, Transcript};

/// Read access to a genome-annotation provider.
///
/// The pipeline only ever reads; any failure is treated as "this item is
/// unavailable" and degraded per component.
pub trait GenomeDataSource {
    /// Gene record for a symbol, including nested transcript stubs.
    fn fetch_gene(&self, symbol: &str, species: &str) -> Result<Gene, GeneBuilderError>;

    /// Transcript record including nested exon stubs.
    fn fetch_transcript_detail(&self, transcript_id: &str) -> Result<Transcript, GeneBuilderError>;

    /// Sequence string for a transcript or exon at the requested representation.
    fn fetch_sequence(&self, feature_id: &str, kind: SeqKind) -> Result<String, GeneBuilderError>;
}

#[derive(Deserialize)]
struct SequenceRecord {
    seq: String,
}

/// Ensembl REST implementation of [`GenomeDataSource`].
pub struct EnsemblClient {
    api: ApiHandler,
}

impl EnsemblClient {
    pub fn new(config: &Config) -> Result<Self, GeneBuilderError> {
        Ok(Self {
            api: ApiHandler::new(&config.api_base_url, config.retry.clone(), config.api_delay)?,
        })
    }
}

impl GenomeDataSource for EnsemblClient {
    fn fetch_gene(&self, symbol: &str, species: &str) -> Result<Gene, GeneBuilderError> {
        self.api
            .get_json(&format!("/lookup/symbol/{species}/{symbol}?expand=1"))
    }

    fn fetch_transcript_detail(&self, transcript_id: &str) -> Result<Transcript, GeneBuilderError> {
        self.api.get_json(&format!("/lookup/id/{transcript_id}?expand=1"))
    }

    fn fetch_sequence(&self, feature_id: &str, kind: SeqKind) -> Result<String, GeneBuilderError> {
        let record: SequenceRecord = self.api.get_json(&format!(
            "/sequence/id/{}?type={}",
            feature_id,
            kind.as_ensembl_type()
        ))?;
        Ok(record.seq)
    }
}
