// src/pipeline.rs

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing::{info, warn};

use crate::annotate::{annotate_transcript, Feature};
use crate::audit::{generate_audit_report, short_md5, OutputFile};
use crate::cds::locate_cds;
use crate::config::Config;
use crate::dedup::filter_duplicate_transcripts;
use crate::ensembl::GenomeDataSource;
use crate::error::GeneBuilderError;
use crate::exon_map::ExonNumberMap;
use crate::genbank::{today_genbank_date, write_genbank_file, GenbankRecord};
use crate::models::{SeqKind, Transcript};

pub struct GeneratedFile {
    pub path: PathBuf,
    pub filename: String,
    pub transcript_name: String,
    pub sequence_length: usize,
    pub feature_count: usize,
}

/// Run the whole pipeline for one gene: fetch, dedup, number exons, then
/// per kept transcript locate the CDS, annotate and write a GenBank file.
/// One audit report is written per run.
///
/// Fatal only if the gene itself cannot be fetched or no transcript
/// produces output; everything else degrades to a warning.
pub fn process_gene(
    source: &dyn GenomeDataSource,
    config: &Config,
    gene_symbol: &str,
) -> Result<Vec<GeneratedFile>, GeneBuilderError> {
    let run_dir = config.output_dir.join(format!(
        "{}_{}",
        gene_symbol,
        Local::now().format("%Y-%m-%d_%H-%M")
    ));
    fs::create_dir_all(&run_dir)?;
    info!(dir = %run_dir.display(), "saving results");

    let gene = source.fetch_gene(gene_symbol, &config.species)?;
    info!(
        gene = gene.name(),
        id = %gene.id,
        location = %format!("{}:{}-{}", gene.seq_region_name, gene.start, gene.end),
        strand = gene.strand,
        transcripts = gene.transcripts.len(),
        "fetched gene"
    );

    // Resolve exon-level detail once per transcript. A transcript whose
    // detail cannot be fetched drops out of both the dedup and the
    // numbering input.
    let mut details: Vec<Transcript> = Vec::new();
    for stub in &gene.transcripts {
        match source.fetch_transcript_detail(&stub.id) {
            Ok(detail) => details.push(detail),
            Err(err) => {
                warn!(transcript = %stub.id, "could not analyze transcript: {err}");
            }
        }
    }

    let (kept, filtered) = filter_duplicate_transcripts(&details, config.canonical_only);

    // One numbering per run; never recomputed against a different subset.
    let exon_map = ExonNumberMap::build(&kept);

    let mut generated = Vec::new();
    let mut features_by_transcript: Vec<(String, Vec<Feature>)> = Vec::new();

    for transcript in &kept {
        info!(transcript = transcript.name(), id = %transcript.id, "processing");

        let transcript_seq = match source.fetch_sequence(&transcript.id, SeqKind::Full) {
            Ok(seq) => seq,
            Err(err) => {
                warn!(
                    transcript = transcript.name(),
                    "could not fetch transcript sequence: {err}"
                );
                continue;
            }
        };

        let cds = resolve_cds(source, transcript, &transcript_seq);

        let features = match annotate_transcript(
            source,
            transcript,
            &transcript_seq,
            cds,
            &exon_map,
            config,
        ) {
            Ok(features) => features,
            Err(err) => {
                warn!(
                    transcript = transcript.name(),
                    "annotation aborted, skipping transcript: {err}"
                );
                continue;
            }
        };

        let filename = format!("{}_{}.gbk", gene_symbol, transcript.name());
        let path = run_dir.join(&filename);
        let record = GenbankRecord {
            locus_name: gene_symbol,
            sequence: &transcript_seq,
            features: &features,
            date: today_genbank_date(),
        };
        write_genbank_file(&path, &record)?;
        info!(
            file = %path.display(),
            length = transcript_seq.len(),
            features = features.len(),
            "wrote record"
        );

        features_by_transcript.push((transcript.name().to_string(), features.clone()));
        generated.push(GeneratedFile {
            path,
            filename,
            transcript_name: transcript.name().to_string(),
            sequence_length: transcript_seq.len(),
            feature_count: features.len(),
        });
    }

    if generated.is_empty() {
        return Err(GeneBuilderError::EmptyRun {
            gene: gene_symbol.to_string(),
        });
    }

    let mut output_files = Vec::new();
    for file in &generated {
        let bytes = fs::read(&file.path)?;
        output_files.push(OutputFile {
            filename: file.filename.clone(),
            sequence_length: file.sequence_length,
            md5: short_md5(&bytes),
        });
    }
    let report = generate_audit_report(
        &gene,
        &config.species,
        &kept,
        &filtered,
        &features_by_transcript,
        &output_files,
    );
    let report_path = run_dir.join(format!("{gene_symbol}_audit_report.txt"));
    fs::write(&report_path, report)?;
    info!(file = %report_path.display(), "audit report saved");

    Ok(generated)
}

/// Fetch the transcript's CDS and place it inside the full sequence. Any
/// failure, from the fetch to the verification, means the transcript is
/// treated as non-coding.
fn resolve_cds(
    source: &dyn GenomeDataSource,
    transcript: &Transcript,
    transcript_seq: &str,
) -> Option<crate::cds::CdsBounds> {
    let cds_seq = match source.fetch_sequence(&transcript.id, SeqKind::Coding) {
        Ok(seq) if !seq.is_empty() => seq,
        Ok(_) => return None,
        Err(err) => {
            warn!(transcript = transcript.name(), "could not fetch CDS: {err}");
            return None;
        }
    };

    match locate_cds(transcript_seq, &cds_seq) {
        Ok(bounds) => Some(bounds),
        Err(reason) => {
            warn!(
                transcript = transcript.name(),
                ?reason,
                "CDS not locatable, annotating as non-coding"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exon, Gene};
    use crate::test_support::StaticSource;

    fn exon(id: &str, start: u64, end: u64) -> Exon {
        Exon {
            id: id.to_string(),
            start,
            end,
        }
    }

    fn transcript(id: &str, name: &str, start: u64, end: u64, canonical: bool, exons: Vec<Exon>) -> Transcript {
        Transcript {
            id: id.to_string(),
            display_name: Some(name.to_string()),
            start,
            end,
            is_canonical: canonical,
            exons,
        }
    }

    /// Gene with a canonical two-exon transcript and a one-exon subset.
    fn fixture() -> StaticSource {
        let t1 = transcript(
            "t1",
            "lrfn1-201",
            1000,
            2059,
            true,
            vec![exon("e1", 1000, 1059), exon("e2", 2000, 2059)],
        );
        let t2 = transcript(
            "t2",
            "lrfn1-202",
            1000,
            1059,
            false,
            vec![exon("e1", 1000, 1059)],
        );

        let mut source = StaticSource::default();
        source.gene = Some(Gene {
            id: "g1".to_string(),
            display_name: Some("lrfn1".to_string()),
            seq_region_name: "16".to_string(),
            start: 1000,
            end: 2059,
            strand: 1,
            transcripts: vec![t1.clone(), t2.clone()],
        });
        source.add_detail(t1);
        source.add_detail(t2);

        // 120-base transcript: 12 bases of 5'UTR, then a 9-base CDS.
        let cds = "ATGAAATAG";
        let full = format!("{}{}{}", "G".repeat(12), cds, "C".repeat(99));
        source.add_sequence("t1", SeqKind::Full, &full);
        source.add_sequence("t1", SeqKind::Coding, cds);
        source.add_sequence("e1", SeqKind::Genomic, &"A".repeat(60));
        source.add_sequence("e2", SeqKind::Genomic, &"T".repeat(60));

        source
    }

    #[test]
    fn run_writes_one_record_per_kept_transcript_plus_audit() {
        let source = fixture();
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let generated = process_gene(&source, &config, "lrfn1").unwrap();

        // The subset transcript is filtered, so exactly one record.
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].transcript_name, "lrfn1-201");
        assert_eq!(generated[0].sequence_length, 120);
        assert_eq!(generated[0].feature_count, 3);
        assert!(generated[0].path.exists());

        let record_text = fs::read_to_string(&generated[0].path).unwrap();
        assert!(record_text.starts_with("LOCUS       lrfn1"));
        assert!(record_text.contains("misc_feature    13..21"));
        assert!(record_text.trim_end().ends_with("//"));

        let run_dir = generated[0].path.parent().unwrap();
        let audit = fs::read_to_string(run_dir.join("lrfn1_audit_report.txt")).unwrap();
        assert!(audit.contains("KEPT: lrfn1-201 [CANONICAL]"));
        assert!(audit.contains("FILTERED: lrfn1-202 - exon subset of lrfn1-201"));
    }

    #[test]
    fn unfetchable_detail_is_skipped_not_fatal() {
        let mut source = fixture();
        source.details.remove("t2");
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let generated = process_gene(&source, &config, "lrfn1").unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].transcript_name, "lrfn1-201");
    }

    #[test]
    fn unlocatable_cds_downgrades_to_whole_transcript_feature() {
        let mut source = fixture();
        // CDS without a start codon.
        source.add_sequence("t1", SeqKind::Coding, "TTGAAATAG");
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let generated = process_gene(&source, &config, "lrfn1").unwrap();
        assert_eq!(generated[0].feature_count, 1);

        let record_text = fs::read_to_string(&generated[0].path).unwrap();
        assert!(record_text.contains("/label=\"transcript\""));
        assert!(record_text.contains("misc_feature    1..120"));
    }

    #[test]
    fn missing_exon_sequence_skips_transcript_and_fails_empty_run() {
        let mut source = fixture();
        source.remove_sequence("e1", SeqKind::Genomic);
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        // The only kept transcript loses its exon walk, so the run ends
        // with zero output.
        let result = process_gene(&source, &config, "lrfn1");
        assert!(matches!(result, Err(GeneBuilderError::EmptyRun { .. })));
    }

    #[test]
    fn missing_gene_is_fatal() {
        let mut source = fixture();
        source.gene = None;
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        assert!(process_gene(&source, &config, "lrfn1").is_err());
    }

    #[test]
    fn canonical_only_filters_the_rest() {
        let source = fixture();
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            canonical_only: true,
            ..Config::default()
        };

        let generated = process_gene(&source, &config, "lrfn1").unwrap();
        assert_eq!(generated.len(), 1);

        let run_dir = generated[0].path.parent().unwrap();
        let audit = fs::read_to_string(run_dir.join("lrfn1_audit_report.txt")).unwrap();
        assert!(audit.contains("FILTERED: lrfn1-202 - non-canonical"));
    }
}
