//! 2014 pipeline.

use tracing::{debug, info};

use crate::gazetteer::Gazetteer;
use crate::normalize::{Brazil2014Normalizer, FieldNormalizer};
use crate::pipelines::{dedup_records, parse_goals};
use crate::timestamp::parse_timestamp;
use crate::types::{Brazil2014Row, MatchRecord};

const EDITION_YEAR: u16 = 2014;

/// Year column as written by the export: `2014` or `2014.0`.
fn row_year(row: &Brazil2014Row) -> Option<u16> {
    let raw = row.year.as_deref()?.trim();
    raw.parse::<u16>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|y| y as u16))
}

pub fn run(rows: &[Brazil2014Row], gazetteer: &Gazetteer) -> Vec<MatchRecord> {
    let normalizer = Brazil2014Normalizer::new(gazetteer);

    let records: Vec<MatchRecord> = rows
        .iter()
        .filter(|row| row_year(row) == Some(EDITION_YEAR))
        .map(|row| {
            let datetime = row.datetime.as_deref().and_then(parse_timestamp);
            if datetime.is_none() {
                debug!("Unparseable 2014 kickoff: {:?}", row.datetime);
            }
            MatchRecord::new(
                normalizer.era(),
                datetime,
                normalizer.stage(row.stage.as_deref()),
                normalizer.city(row.city.as_deref()),
                normalizer.team(row.home_team.as_deref()),
                normalizer.team(row.away_team.as_deref()),
                parse_goals(row.home_goals.as_deref()),
                parse_goals(row.away_goals.as_deref()),
                false,
            )
        })
        .collect();

    let filtered = records.len();
    let records = dedup_records(records);

    info!(
        event = "brazil2014_pipeline_summary",
        input_rows = rows.len(),
        kept = filtered,
        duplicates = filtered - records.len(),
        records = records.len(),
        "2014 pipeline: {} records from {} rows",
        records.len(),
        rows.len()
    );

    records
}
