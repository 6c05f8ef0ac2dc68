// src/config.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::api_handler::RetryPolicy;

pub const ENSEMBL_API_URL: &str = "https://rest.ensembl.org";

pub const DEFAULT_SPECIES: &str = "danio_rerio";

/// Delay between consecutive API calls, to be nice to the provider.
pub const API_DELAY: Duration = Duration::from_millis(500);

/// Colors cycle through this list for coding exons. Indexed by the
/// gene-wide exon number, so the same exon renders identically in
/// every splice variant that contains it.
pub const EXON_COLORS: [&str; 8] = [
    "cyan", "#ff00dc", "#ff9fdf", "#d0b2ff", "#84ff84", "#ffd700", "#ff6b6b", "#4ecdc4",
];

pub const UTR_COLOR: &str = "#ffcc99";

/// Color for the single feature covering a non-coding transcript.
pub const NONCODING_COLOR: &str = "cyan";

pub struct Config {
    pub species: String,
    pub canonical_only: bool,
    pub output_dir: PathBuf,
    pub api_base_url: String,
    pub retry: RetryPolicy,
    pub api_delay: Duration,
    pub exon_colors: Vec<String>,
    pub utr_color: String,
    pub noncoding_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            species: DEFAULT_SPECIES.to_string(),
            canonical_only: false,
            output_dir: PathBuf::from("output"),
            api_base_url: ENSEMBL_API_URL.to_string(),
            retry: RetryPolicy::default(),
            api_delay: API_DELAY,
            exon_colors: EXON_COLORS.iter().map(|c| c.to_string()).collect(),
            utr_color: UTR_COLOR.to_string(),
            noncoding_color: NONCODING_COLOR.to_string(),
        }
    }
}
