// src/genbank.rs

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::annotate::Feature;

/// ApE graphic blob attached to every feature; ApE refuses to render
/// features without it.
const APE_GRAPHIC_FORMAT: &str = "arrow_data {{0 0.5 0 1 2 0 0 -1 0 -0.5} \
     {0 .5 .1 .5 .1 -.5 0 -.5} 0} width 5 offset 0";

pub struct GenbankRecord<'a> {
    pub locus_name: &'a str,
    pub sequence: &'a str,
    pub features: &'a [Feature],
    /// DD-MON-YYYY, upper-cased (GenBank LOCUS convention).
    pub date: String,
}

pub fn today_genbank_date() -> String {
    Local::now().format("%d-%b-%Y").to_string().to_uppercase()
}

pub fn write_genbank_file(path: &Path, record: &GenbankRecord) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_genbank(&mut out, record)?;
    out.flush()
}

/// Write a flat-text GenBank record the way ApE expects it: header block,
/// features with 1-based inclusive coordinates, then the sequence at 60
/// bases per line in groups of 10.
pub fn write_genbank<W: Write>(out: &mut W, record: &GenbankRecord) -> io::Result<()> {
    writeln!(
        out,
        "LOCUS       {:<20}{:>6} bp    DNA        linear       {}",
        record.locus_name,
        record.sequence.len(),
        record.date
    )?;
    writeln!(out, "DEFINITION  .")?;
    writeln!(out, "ACCESSION   ")?;
    writeln!(out, "VERSION     ")?;
    writeln!(out, "SOURCE      .")?;
    writeln!(out, "  ORGANISM  .")?;
    writeln!(out, "COMMENT     ")?;
    writeln!(out, "COMMENT     ApEinfo:methylated:1")?;

    if !record.features.is_empty() {
        writeln!(out, "FEATURES             Location/Qualifiers")?;
        for feature in record.features {
            // 0-based half-open becomes 1-based inclusive on the way out.
            writeln!(
                out,
                "     {:<16}{}..{}",
                "misc_feature",
                feature.start + 1,
                feature.end
            )?;
            let qualifiers = [
                ("locus_tag", feature.label.as_str()),
                ("label", feature.label.as_str()),
                ("ApEinfo_label", feature.label.as_str()),
                ("ApEinfo_fwdcolor", feature.color.as_str()),
                ("ApEinfo_revcolor", "green"),
                ("ApEinfo_graphicformat", APE_GRAPHIC_FORMAT),
            ];
            for (key, value) in qualifiers {
                writeln!(out, "                     /{key}=\"{value}\"")?;
            }
        }
    }

    writeln!(out, "ORIGIN")?;
    let sequence = record.sequence.to_ascii_uppercase();
    for (i, line) in sequence.as_bytes().chunks(60).enumerate() {
        let groups: Vec<&str> = line
            .chunks(10)
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
            .collect();
        writeln!(out, "{:>9} {}", i * 60 + 1, groups.join(" "))?;
    }
    writeln!(out, "//")?;

    Ok(())
}
