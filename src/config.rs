//! Run configuration.
//!
//! Input file names are fixed; only the data directory, output path,
//! gazetteer and era selection come from the environment.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::types::Era;

/// 1930-2010 match results
pub const HISTORICAL_FILE: &str = "WorldCupMatches1930-2010.csv";

/// Kickoff reference table used by the historical resolver
pub const REFERENCE_FILE: &str = "WorldCupMatches1930-2022-datetime.csv";

pub const BRAZIL_2014_FILE: &str = "WorldCupMatches2014.csv";

pub const RUSSIA_2018_FILE: &str = "data_2018.json";

/// 2022 results (scores and stage)
pub const QATAR_2022_RESULTS_FILE: &str = "WorldCupMatches2022.csv";

/// 2022 kickoffs and venues
pub const QATAR_2022_VENUES_FILE: &str = "WorldCupMatches2022-venue.csv";

pub const STADIUM_CITY_FILE: &str = "stadium_city_mapping2022.csv";

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_OUTPUT_FILE: &str = "worldcup_matches.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub data_dir: PathBuf,
    pub output_path: PathBuf,
    /// City gazetteer for the 2014 normalizer; none means every lookup misses
    pub gazetteer_path: Option<PathBuf>,
    /// Eras to run, in merge order
    pub eras: Vec<Era>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}

impl EtlConfig {
    /// All eras, output written next to the inputs.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            output_path: data_dir.join(DEFAULT_OUTPUT_FILE),
            data_dir,
            gazetteer_path: None,
            eras: Era::ALL.to_vec(),
        }
    }

    /// Read `DATA_DIR`, `OUTPUT_PATH`, `GAZETTEER_PATH` and `ERAS`.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let mut config = Self::with_data_dir(data_dir);

        if let Some(output) = env_path("OUTPUT_PATH") {
            config.output_path = output;
        }
        config.gazetteer_path = env_path("GAZETTEER_PATH");
        config.eras = eras_from_env();
        config
    }

    pub fn historical_path(&self) -> PathBuf {
        self.data_dir.join(HISTORICAL_FILE)
    }

    pub fn reference_path(&self) -> PathBuf {
        self.data_dir.join(REFERENCE_FILE)
    }

    pub fn brazil_2014_path(&self) -> PathBuf {
        self.data_dir.join(BRAZIL_2014_FILE)
    }

    pub fn russia_2018_path(&self) -> PathBuf {
        self.data_dir.join(RUSSIA_2018_FILE)
    }

    pub fn qatar_2022_results_path(&self) -> PathBuf {
        self.data_dir.join(QATAR_2022_RESULTS_FILE)
    }

    pub fn qatar_2022_venues_path(&self) -> PathBuf {
        self.data_dir.join(QATAR_2022_VENUES_FILE)
    }

    pub fn stadium_city_path(&self) -> PathBuf {
        self.data_dir.join(STADIUM_CITY_FILE)
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Get enabled eras from ERAS env var (comma-separated labels).
/// If unset/empty, returns every era. Unknown labels are ignored with a
/// warning. Example: ERAS="2014,2022"
pub fn eras_from_env() -> Vec<Era> {
    match std::env::var("ERAS") {
        Ok(raw) if !raw.trim().is_empty() => parse_eras(&raw),
        _ => Era::ALL.to_vec(),
    }
}

/// Parse an era list; result is in merge order without duplicates.
pub fn parse_eras(raw: &str) -> Vec<Era> {
    let mut selected = Vec::new();
    for label in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        match Era::from_label(label) {
            Some(era) => selected.push(era),
            None => warn!("Unknown era '{}' in ERAS, ignoring", label),
        }
    }
    Era::ALL
        .into_iter()
        .filter(|era| selected.contains(era))
        .collect()
}
