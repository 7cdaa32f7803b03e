//! Era pipelines.
//!
//! Each pipeline turns one era's raw rows into canonical [`MatchRecord`]s,
//! applying its own normalizer in the order stage, team, venue, date/time,
//! result. Pipelines own their intermediate state; nothing is shared across
//! eras except read-only reference data.
//!
//! ## Eras
//!
//! - **historical**: 1930-2010 results, kickoff reconciled against the
//!   reference table
//! - **brazil2014**: 2014 export with city gazetteer
//! - **russia2018**: 2018 JSON document
//! - **qatar2022**: 2022 results joined to venues via merge keys

pub mod brazil2014;
pub mod historical;
pub mod qatar2022;
pub mod russia2018;

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::config::EtlConfig;
use crate::error::Result;
use crate::gazetteer::Gazetteer;
use crate::merge::{merge_eras, MergeSummary};
use crate::sources;
use crate::types::{Era, MatchRecord};

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*[-\u{2013}]\s*(\d+)").expect("Invalid regex"));

/// Goal count from a numeric field (`3`, `3.0`); anything else is unknown.
pub fn parse_goals(raw: Option<&str>) -> Option<u32> {
    let s = raw?.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u32)
}

/// Goal pair from score text such as `3-1` or `2 – 2 (a.e.t.)`.
pub fn parse_score(raw: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(caps) = raw.and_then(|s| SCORE_RE.captures(s)) else {
        return (None, None);
    };
    (caps[1].parse().ok(), caps[2].parse().ok())
}

/// Drop exact duplicate records, keeping the first occurrence in order.
pub fn dedup_records(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut seen = FxHashSet::default();
    records
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

/// Load one era's inputs from the configured data directory and run its
/// pipeline.
pub fn run_era(era: Era, config: &EtlConfig, gazetteer: &Gazetteer) -> Result<Vec<MatchRecord>> {
    info!(
        event = "era_pipeline_start",
        era = %era,
        data_dir = %config.data_dir.display(),
        "Running {} pipeline",
        era
    );

    let records = match era {
        Era::Historical => {
            let rows = sources::load_historical(&config.historical_path())?;
            let reference = sources::load_reference(&config.reference_path())?;
            historical::run(&rows, &reference).records
        }
        Era::Brazil2014 => {
            let rows = sources::load_2014(&config.brazil_2014_path())?;
            brazil2014::run(&rows, gazetteer)
        }
        Era::Russia2018 => {
            let doc = sources::load_2018(&config.russia_2018_path())?;
            russia2018::run(&doc)
        }
        Era::Qatar2022 => {
            let results = sources::load_2022_results(&config.qatar_2022_results_path())?;
            let venues = sources::load_2022_venues(&config.qatar_2022_venues_path())?;
            let stadiums = sources::load_stadium_cities(&config.stadium_city_path())?;
            qatar2022::run(&results, &venues, &stadiums)?
        }
    };

    info!(
        event = "era_pipeline_done",
        era = %era,
        records = records.len(),
        "{} pipeline produced {} records",
        era,
        records.len()
    );
    Ok(records)
}

/// Run every configured era in merge order and concatenate the results.
/// The first era that fails aborts the run.
pub fn run_all(config: &EtlConfig) -> Result<(Vec<MatchRecord>, MergeSummary)> {
    let gazetteer = match &config.gazetteer_path {
        Some(path) => Gazetteer::load_from(path)?,
        None => Gazetteer::empty(),
    };

    let mut outputs = Vec::with_capacity(config.eras.len());
    for &era in &config.eras {
        outputs.push((era, run_era(era, config, &gazetteer)?));
    }
    Ok(merge_eras(outputs))
}
