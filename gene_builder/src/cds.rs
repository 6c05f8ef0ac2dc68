// src/cds.rs

/// 0-based half-open CDS bounds within a transcript's spliced sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdsBounds {
    pub start: usize,
    pub end: usize,
}

/// Why a CDS could not be placed. Callers treat every variant the same
/// way (the transcript is annotated as non-coding); the distinction only
/// feeds the warning log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdsLookupError {
    /// The CDS does not begin with the ATG start codon.
    MissingStartCodon,
    /// The probe prefix does not occur in the transcript sequence.
    NotFoundInTranscript,
    /// The probe matched but the full CDS does not; likely a repeated
    /// motif upstream of the true CDS.
    VerifyMismatch,
}

/// Leading slice of the CDS searched for in the transcript. Searching the
/// whole CDS would also work; the short probe keeps the scan cheap while
/// the full verification below rejects false hits.
const PROBE_LENGTH: usize = 50;

/// Locate the coding sequence inside the full (spliced) transcript
/// sequence. Matching is case-insensitive; only a full exact match of the
/// entire CDS is trusted.
pub fn locate_cds(transcript_seq: &str, cds_seq: &str) -> Result<CdsBounds, CdsLookupError> {
    let transcript_upper = transcript_seq.to_ascii_uppercase();
    let cds_upper = cds_seq.to_ascii_uppercase();

    if !cds_upper.starts_with("ATG") {
        return Err(CdsLookupError::MissingStartCodon);
    }

    let probe = cds_upper.get(..PROBE_LENGTH).unwrap_or(&cds_upper);
    let start = transcript_upper
        .find(probe)
        .ok_or(CdsLookupError::NotFoundInTranscript)?;
    let end = start + cds_upper.len();

    if transcript_upper.get(start..end) != Some(cds_upper.as_str()) {
        return Err(CdsLookupError::VerifyMismatch);
    }

    Ok(CdsBounds { start, end })
}
