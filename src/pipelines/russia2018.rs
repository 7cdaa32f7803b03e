//! 2018 pipeline.
//!
//! The source is a single JSON document with team and stadium tables plus
//! group and knockout sections. Fixtures reference teams by id; knockout
//! slots that were never filled still hold bracket placeholders and are
//! skipped.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::normalize::{FieldNormalizer, Russia2018Normalizer};
use crate::pipelines::dedup_records;
use crate::timestamp::parse_timestamp;
use crate::types::{Match2018, MatchRecord, Round2018, Russia2018Document, TeamRef2018};

/// Knockout sections in bracket order; unknown sections follow.
const KNOCKOUT_ORDER: [&str; 5] = ["round_16", "round_8", "round_4", "round_2_loser", "round_2"];

struct Lookups<'d> {
    teams: FxHashMap<u32, &'d str>,
    cities: FxHashMap<u32, Option<&'d str>>,
}

impl<'d> Lookups<'d> {
    fn new(doc: &'d Russia2018Document) -> Self {
        Self {
            teams: doc.teams.iter().map(|t| (t.id, t.name.as_str())).collect(),
            cities: doc
                .stadiums
                .iter()
                .map(|s| (s.id, s.city.as_deref()))
                .collect(),
        }
    }

    fn team(&self, slot: &TeamRef2018) -> Option<&'d str> {
        match slot {
            TeamRef2018::Id(id) => self.teams.get(id).copied(),
            TeamRef2018::Placeholder(_) => None,
        }
    }

    fn city(&self, stadium: Option<u32>) -> Option<&'d str> {
        stadium.and_then(|id| self.cities.get(&id).copied().flatten())
    }
}

fn knockout_sections(doc: &Russia2018Document) -> Vec<(&str, &Round2018)> {
    let mut sections: Vec<(&str, &Round2018)> = KNOCKOUT_ORDER
        .iter()
        .filter_map(|key| doc.knockout.get_key_value(*key))
        .map(|(k, r)| (k.as_str(), r))
        .collect();
    sections.extend(
        doc.knockout
            .iter()
            .filter(|(k, _)| !KNOCKOUT_ORDER.contains(&k.as_str()))
            .map(|(k, r)| (k.as_str(), r)),
    );
    sections
}

pub fn run(doc: &Russia2018Document) -> Vec<MatchRecord> {
    let normalizer = Russia2018Normalizer;
    let lookups = Lookups::new(doc);
    let mut records = Vec::new();
    let mut skipped = 0;

    let groups = doc.groups.iter().map(|(key, round)| {
        let label = round
            .name
            .clone()
            .unwrap_or_else(|| format!("group {}", key));
        (label, round)
    });
    let knockout = knockout_sections(doc)
        .into_iter()
        .map(|(key, round)| (key.to_string(), round));

    for (label, round) in groups.chain(knockout) {
        let stage = normalizer.stage(Some(&label));
        for m in &round.matches {
            match build_record(&normalizer, &lookups, &stage, m) {
                Some(record) => records.push(record),
                None => {
                    skipped += 1;
                    debug!(
                        "Skipping unresolved 2018 fixture in {}: {:?} vs {:?}",
                        label, m.home_team, m.away_team
                    );
                }
            }
        }
    }

    let built = records.len();
    let records = dedup_records(records);

    info!(
        event = "russia2018_pipeline_summary",
        teams = doc.teams.len(),
        stadiums = doc.stadiums.len(),
        unresolved = skipped,
        duplicates = built - records.len(),
        records = records.len(),
        "2018 pipeline: {} records ({} unresolved fixtures skipped)",
        records.len(),
        skipped
    );

    records
}

fn build_record(
    normalizer: &Russia2018Normalizer,
    lookups: &Lookups<'_>,
    stage: &str,
    m: &Match2018,
) -> Option<MatchRecord> {
    let home = lookups.team(&m.home_team)?;
    let away = lookups.team(&m.away_team)?;
    Some(MatchRecord::new(
        normalizer.era(),
        m.date.as_deref().and_then(parse_timestamp),
        stage.to_string(),
        normalizer.city(lookups.city(m.stadium)),
        normalizer.team(Some(home)),
        normalizer.team(Some(away)),
        m.home_result,
        m.away_result,
        false,
    ))
}
