// src/audit.rs

use chrono::Local;
use md5::{Digest, Md5};

use crate::annotate::Feature;
use crate::dedup::FilteredTranscript;
use crate::models::{Gene, Transcript};

/// One generated file, summarized for the audit trail.
pub struct OutputFile {
    pub filename: String,
    pub sequence_length: usize,
    pub md5: String,
}

/// Truncated MD5 of a written file, enough to spot accidental edits.
pub fn short_md5(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Md5::digest(bytes));
    digest[..8].to_string()
}

/// "danio_rerio" -> "Danio_rerio", the capitalization Ensembl uses in its
/// website URLs.
fn species_url_name(species: &str) -> String {
    let mut chars = species.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Render the per-gene audit report: every keep/filter decision with its
/// reason, every annotated feature in 1-based display coordinates, and
/// verification links back to the provider.
pub fn generate_audit_report(
    gene: &Gene,
    species: &str,
    kept: &[Transcript],
    filtered: &[FilteredTranscript],
    features_by_transcript: &[(String, Vec<Feature>)],
    output_files: &[OutputFile],
) -> String {
    let species_url = species_url_name(species);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("GENE EXTRACTION AUDIT - {}", gene.name()));
    lines.push("=".repeat(80));
    lines.push(format!(
        "Generated: {}",
        Local::now().format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "Gene: {} | Location: chr{}:{}-{}",
        gene.id, gene.seq_region_name, gene.start, gene.end
    ));
    lines.push(format!(
        "Verify: https://ensembl.org/{}/Gene/Summary?g={}",
        species_url, gene.id
    ));
    lines.push(String::new());

    lines.push("TRANSCRIPTS".to_string());
    lines.push("-".repeat(80));
    for transcript in kept {
        let canonical = if transcript.is_canonical {
            " [CANONICAL]"
        } else {
            ""
        };
        lines.push(format!("KEPT: {}{}", transcript.name(), canonical));
        lines.push(format!(
            "   https://ensembl.org/{}/Transcript/Exons?t={}",
            species_url, transcript.id
        ));
    }
    for record in filtered {
        lines.push(format!("FILTERED: {} - {}", record.name, record.reason));
    }
    lines.push(String::new());

    lines.push("FEATURES ANNOTATED".to_string());
    lines.push("-".repeat(80));
    for (name, features) in features_by_transcript {
        lines.push(format!("\n{name}:"));
        for feature in features {
            // 1-based inclusive display coordinates.
            let start = feature.start + 1;
            let end = feature.end;
            lines.push(format!(
                "  {:<10} {:>5}-{:<5} ({} bp)",
                feature.label,
                start,
                end,
                end - start + 1
            ));
        }
    }
    lines.push(String::new());

    lines.push("SANITY CHECKS".to_string());
    lines.push("-".repeat(80));
    lines.push(format!(
        "1. Click: https://ensembl.org/{}/Gene/Summary?g={}",
        species_url, gene.id
    ));
    lines.push(format!(
        "   Confirm gene '{}' is present and location matches 'chr{}:{}-{}'.",
        gene.name(),
        gene.seq_region_name,
        gene.start,
        gene.end
    ));
    lines.push(String::new());
    for transcript in kept {
        lines.push(format!("2. For transcript {}:", transcript.name()));
        lines.push(format!(
            "   Click: https://ensembl.org/{}/Transcript/Exons?t={}",
            species_url, transcript.id
        ));
        lines.push(
            "   Verify exon boundaries match the FEATURES ANNOTATED section above.".to_string(),
        );
    }
    lines.push(String::new());

    lines.push("METHODOLOGY".to_string());
    lines.push("-".repeat(80));
    lines.push("Gene sequences extracted from Ensembl via REST API.".to_string());
    lines.push(format!(
        "Species: {species}. CDS boundaries from Ensembl annotations."
    ));
    lines.push("Exon numbering based on genomic position across variants.".to_string());
    lines.push(String::new());

    lines.push("OUTPUT FILES".to_string());
    lines.push("-".repeat(80));
    for file in output_files {
        lines.push(format!(
            "{} ({} bp, MD5:{})",
            file.filename, file.sequence_length, file.md5
        ));
    }
    lines.push(String::new());
    lines.push(format!("Report generated: {}", Local::now().to_rfc3339()));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::FeatureKind;
    use crate::dedup::FilterReason;

    fn gene() -> Gene {
        Gene {
            id: "ENSDARG00000001".to_string(),
            display_name: Some("lrfn1".to_string()),
            seq_region_name: "16".to_string(),
            start: 1000,
            end: 90000,
            strand: 1,
            transcripts: Vec::new(),
        }
    }

    fn kept_transcript() -> Transcript {
        Transcript {
            id: "ENSDART00000001".to_string(),
            display_name: Some("lrfn1-201".to_string()),
            start: 1000,
            end: 90000,
            is_canonical: true,
            exons: Vec::new(),
        }
    }

    #[test]
    fn report_lists_decisions_and_display_coordinates() {
        let kept = vec![kept_transcript()];
        let filtered = vec![FilteredTranscript {
            id: "ENSDART00000002".to_string(),
            name: "lrfn1-202".to_string(),
            reason: FilterReason::ExonSubset {
                superset: "lrfn1-201".to_string(),
                exons_this: 3,
                exons_super: 4,
            },
        }];
        let features = vec![(
            "lrfn1-201".to_string(),
            vec![Feature {
                kind: FeatureKind::FivePrimeUtr,
                start: 0,
                end: 12,
                label: "5'UTR".to_string(),
                color: "#ffcc99".to_string(),
            }],
        )];
        let outputs = vec![OutputFile {
            filename: "lrfn1_lrfn1-201.gbk".to_string(),
            sequence_length: 120,
            md5: "00112233".to_string(),
        }];

        let report =
            generate_audit_report(&gene(), "danio_rerio", &kept, &filtered, &features, &outputs);

        assert!(report.contains("GENE EXTRACTION AUDIT - lrfn1"));
        assert!(report.contains("KEPT: lrfn1-201 [CANONICAL]"));
        assert!(report.contains("FILTERED: lrfn1-202 - exon subset of lrfn1-201"));
        // [0,12) renders as 1-12 (12 bp).
        assert!(report.contains("1-12"));
        assert!(report.contains("(12 bp)"));
        assert!(report.contains("Danio_rerio/Gene/Summary?g=ENSDARG00000001"));
        assert!(report.contains("lrfn1_lrfn1-201.gbk (120 bp, MD5:00112233)"));
    }

    #[test]
    fn short_md5_is_eight_hex_chars() {
        let digest = short_md5(b"ACGT");
        assert_eq!(digest.len(), 8);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
