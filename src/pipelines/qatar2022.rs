//! 2022 pipeline.
//!
//! Scores and kickoffs come from two separate tables. Both sides are keyed
//! with [`build_key`] (sorted normalized team pair plus calendar date) and
//! inner-joined; the kickoff comes from the venue table, the city from the
//! stadium mapping.

use std::collections::HashMap;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::merge_key::build_key;
use crate::normalize::{FieldNormalizer, Qatar2022Normalizer};
use crate::pipelines::{dedup_records, parse_goals};
use crate::timestamp::parse_day_first;
use crate::types::{MatchRecord, Qatar2022ResultRow, Qatar2022VenueRow};

/// Stadium name to city, as loaded from the mapping table.
pub type StadiumCities = HashMap<String, String>;

struct KeyedVenue<'a> {
    row: &'a Qatar2022VenueRow,
    kickoff: Option<chrono::NaiveDateTime>,
}

pub fn run(
    results: &[Qatar2022ResultRow],
    venues: &[Qatar2022VenueRow],
    stadium_cities: &StadiumCities,
) -> Result<Vec<MatchRecord>> {
    let normalizer = Qatar2022Normalizer;

    let mut index: FxHashMap<String, Vec<KeyedVenue<'_>>> = FxHashMap::default();
    for row in venues {
        let kickoff = row.match_time.as_deref().and_then(parse_day_first);
        let key = build_key(
            &normalizer.team(row.home_team.as_deref()),
            &normalizer.team(row.away_team.as_deref()),
            kickoff.map(|dt| dt.date()),
        );
        index.entry(key).or_default().push(KeyedVenue { row, kickoff });
    }

    let mut records = Vec::new();
    let mut unmatched = 0;
    for row in results {
        let home_team = normalizer.team(row.team1.as_deref());
        let away_team = normalizer.team(row.team2.as_deref());
        let date = row
            .date
            .as_deref()
            .and_then(parse_day_first)
            .map(|dt| dt.date());
        let key = build_key(&home_team, &away_team, date);

        let Some(matches) = index.get(&key) else {
            unmatched += 1;
            continue;
        };

        let stage = normalizer.stage(row.category.as_deref());
        let home_goals = parse_goals(row.goals_team1.as_deref());
        let away_goals = parse_goals(row.goals_team2.as_deref());
        for venue in matches {
            records.push(MatchRecord::new(
                normalizer.era(),
                venue.kickoff,
                stage.clone(),
                city_for(&normalizer, stadium_cities, venue.row.venue.as_deref()),
                home_team.clone(),
                away_team.clone(),
                home_goals,
                away_goals,
                false,
            ));
        }
    }

    if records.is_empty() {
        return Err(PipelineError::EmptyMergeResult {
            results_rows: results.len(),
            venue_rows: venues.len(),
        });
    }
    if unmatched > 0 {
        warn!(
            event = "qatar2022_unmatched_results",
            count = unmatched,
            "{} result rows had no venue row with the same merge key",
            unmatched
        );
    }

    let joined = records.len();
    let records = dedup_records(records);

    info!(
        event = "qatar2022_pipeline_summary",
        results_rows = results.len(),
        venue_rows = venues.len(),
        joined = joined,
        unmatched = unmatched,
        records = records.len(),
        "2022 pipeline: {} records joined from {} results and {} venues",
        records.len(),
        results.len(),
        venues.len()
    );

    Ok(records)
}

fn city_for(
    normalizer: &Qatar2022Normalizer,
    stadium_cities: &StadiumCities,
    venue: Option<&str>,
) -> String {
    let city = venue.and_then(|v| stadium_cities.get(v.trim()));
    normalizer.city(city.map(String::as_str))
}
