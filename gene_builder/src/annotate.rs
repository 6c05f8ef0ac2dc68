// src/annotate.rs

use tracing::warn;

use crate::cds::CdsBounds;
use crate::config::Config;
use crate::ensembl::GenomeDataSource;
use crate::error::GeneBuilderError;
use crate::exon_map::ExonNumberMap;
use crate::models::{SeqKind, Transcript};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    FivePrimeUtr,
    CodingExon,
    ThreePrimeUtr,
    /// Single feature covering a transcript with no locatable CDS.
    Transcript,
}

/// One annotated region of a transcript. Offsets are 0-based half-open,
/// relative to the transcript's spliced sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub kind: FeatureKind,
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub color: String,
}

/// Palette color for a gene-wide exon number. Indexing by number rather
/// than by feature position keeps an exon's color identical across every
/// transcript that contains it.
pub fn color_for(exon_number: u32, palette: &[String]) -> &str {
    &palette[(exon_number as usize - 1) % palette.len()]
}

/// Derive the ordered feature list for one transcript: 5'UTR, numbered
/// coding exons and 3'UTR when the CDS was located, or a single
/// whole-transcript feature otherwise.
///
/// Exon lengths come from each exon's genomic sequence. A failed exon
/// fetch would desynchronize every later offset, so it aborts this
/// transcript's annotation instead of guessing a length.
pub fn annotate_transcript(
    source: &dyn GenomeDataSource,
    transcript: &Transcript,
    transcript_seq: &str,
    cds: Option<CdsBounds>,
    exon_map: &ExonNumberMap,
    config: &Config,
) -> Result<Vec<Feature>, GeneBuilderError> {
    let Some(cds) = cds else {
        return Ok(vec![Feature {
            kind: FeatureKind::Transcript,
            start: 0,
            end: transcript_seq.len(),
            label: "transcript".to_string(),
            color: config.noncoding_color.clone(),
        }]);
    };

    let mut features = Vec::new();

    if cds.start > 0 {
        features.push(Feature {
            kind: FeatureKind::FivePrimeUtr,
            start: 0,
            end: cds.start,
            label: "5'UTR".to_string(),
            color: config.utr_color.clone(),
        });
    }

    let mut exons: Vec<_> = transcript.exons.iter().collect();
    exons.sort_by_key(|exon| exon.start);

    // Walk exons in genomic order, advancing a transcript-relative cursor
    // by each exon's genomic length. Offsets stay aligned with the spliced
    // sequence because exons contribute their full genomic span to it.
    let mut cursor = 0usize;
    for exon in exons {
        let exon_seq = source.fetch_sequence(&exon.id, SeqKind::Genomic)?;
        let annotated_len = (exon.end.saturating_sub(exon.start) + 1) as usize;
        if exon_seq.len() != annotated_len {
            warn!(
                exon = %exon.id,
                fetched = exon_seq.len(),
                annotated = annotated_len,
                "exon sequence length differs from annotated coordinates"
            );
        }
        let exon_start = cursor;
        let exon_end = cursor + exon_seq.len();

        if exon_end > cds.start && exon_start < cds.end {
            let coding_start = exon_start.max(cds.start);
            let coding_end = exon_end.min(cds.end);
            let (label, color) = match exon_map.number(&exon.id) {
                Some(number) => (
                    format!("exon{number}"),
                    color_for(number, &config.exon_colors).to_string(),
                ),
                None => {
                    // Should not happen for a kept transcript; label with a
                    // sentinel rather than aborting.
                    warn!(
                        exon = %exon.id,
                        transcript = transcript.name(),
                        "exon missing from gene-wide numbering"
                    );
                    ("exon?".to_string(), config.exon_colors[0].clone())
                }
            };
            features.push(Feature {
                kind: FeatureKind::CodingExon,
                start: coding_start,
                end: coding_end,
                label,
                color,
            });
        }

        cursor = exon_end;
    }

    if cds.end < transcript_seq.len() {
        features.push(Feature {
            kind: FeatureKind::ThreePrimeUtr,
            start: cds.end,
            end: transcript_seq.len(),
            label: "3'UTR".to_string(),
            color: config.utr_color.clone(),
        });
    }

    Ok(features)
}
