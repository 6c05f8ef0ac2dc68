// src/dedup.rs

use std::collections::HashSet;
use std::fmt;

use tracing::info;

use crate::models::Transcript;

/// Why a transcript was dropped from the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReason {
    /// Canonical-only mode and the transcript is not canonical.
    NonCanonical,
    /// Exon-id set is contained in another transcript's.
    ExonSubset {
        superset: String,
        exons_this: usize,
        exons_super: usize,
    },
    /// Genomic interval contained in another transcript's, with fewer exons.
    /// This is a bounding-box heuristic: it does not verify that the exons
    /// themselves nest inside the container's exons.
    GenomicSubset {
        superset: String,
        exons_this: usize,
        exons_super: usize,
        span_this: u64,
        span_super: u64,
    },
}

impl FilterReason {
    pub fn code(&self) -> &'static str {
        match self {
            FilterReason::NonCanonical => "non_canonical",
            FilterReason::ExonSubset { .. } => "exon_subset",
            FilterReason::GenomicSubset { .. } => "genomic_subset",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterReason::NonCanonical => {
                write!(f, "non-canonical transcript (canonical-only mode)")
            }
            FilterReason::ExonSubset {
                superset,
                exons_this,
                exons_super,
            } => write!(
                f,
                "exon subset of {superset} ({exons_this} vs {exons_super} exons)"
            ),
            FilterReason::GenomicSubset {
                superset,
                exons_this,
                exons_super,
                span_this,
                span_super,
            } => write!(
                f,
                "genomically contained within {superset} \
                 ({span_this} bp/{exons_this} exons vs {span_super} bp/{exons_super} exons)"
            ),
        }
    }
}

/// Record of a dedup decision, kept for the audit report.
#[derive(Debug, Clone)]
pub struct FilteredTranscript {
    pub id: String,
    pub name: String,
    pub reason: FilterReason,
}

/// Drop transcripts that are redundant or subsets of another transcript of
/// the same gene. Returns the kept transcripts and a record per dropped one.
///
/// A transcript is never dropped in favour of a non-canonical superset when
/// it is itself canonical: canonical status is an external authority signal
/// that a purely structural subset relationship does not override.
pub fn filter_duplicate_transcripts(
    transcripts: &[Transcript],
    canonical_only: bool,
) -> (Vec<Transcript>, Vec<FilteredTranscript>) {
    // Deduplication is a property of comparing transcripts; with one or
    // fewer there is nothing to compare.
    if transcripts.len() <= 1 {
        return (transcripts.to_vec(), Vec::new());
    }

    let exon_sets: Vec<HashSet<&str>> = transcripts.iter().map(|t| t.exon_ids()).collect();

    let mut kept = Vec::new();
    let mut filtered = Vec::new();

    for (i, transcript) in transcripts.iter().enumerate() {
        match filter_reason(transcripts, &exon_sets, i, canonical_only) {
            Some(reason) => {
                info!(
                    transcript = transcript.name(),
                    reason = reason.code(),
                    "filtered: {reason}"
                );
                filtered.push(FilteredTranscript {
                    id: transcript.id.clone(),
                    name: transcript.name().to_string(),
                    reason,
                });
            }
            None => {
                info!(
                    transcript = transcript.name(),
                    exons = exon_sets[i].len(),
                    span = transcript.span(),
                    canonical = transcript.is_canonical,
                    "keeping"
                );
                kept.push(transcript.clone());
            }
        }
    }

    info!(
        kept = kept.len(),
        filtered = filtered.len(),
        total = transcripts.len(),
        "transcript filtering done"
    );

    (kept, filtered)
}

fn filter_reason(
    transcripts: &[Transcript],
    exon_sets: &[HashSet<&str>],
    i: usize,
    canonical_only: bool,
) -> Option<FilterReason> {
    let this = &transcripts[i];

    if canonical_only && !this.is_canonical {
        return Some(FilterReason::NonCanonical);
    }

    for (j, other) in transcripts.iter().enumerate() {
        if i == j {
            continue;
        }

        // Keep a canonical transcript over any non-canonical superset.
        if this.is_canonical && !other.is_canonical {
            continue;
        }

        if exon_sets[i].is_subset(&exon_sets[j]) {
            return Some(FilterReason::ExonSubset {
                superset: other.name().to_string(),
                exons_this: exon_sets[i].len(),
                exons_super: exon_sets[j].len(),
            });
        }

        // A genomically contained transcript with fewer exons is very likely
        // a partial or truncated annotation of the container.
        if this.start >= other.start
            && this.end <= other.end
            && exon_sets[i].len() < exon_sets[j].len()
        {
            return Some(FilterReason::GenomicSubset {
                superset: other.name().to_string(),
                exons_this: exon_sets[i].len(),
                exons_super: exon_sets[j].len(),
                span_this: this.span(),
                span_super: other.span(),
            });
        }
    }

    None
}
