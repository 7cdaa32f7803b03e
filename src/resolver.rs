//! Kickoff date/time reconciliation for the historical era.
//!
//! Historical match rows carry no reliable kickoff. Each row is looked up in
//! the reference table through a cascade of progressively looser tiers:
//!
//! 1. **Exact**: year + stage + replay flag + unordered team pair
//! 2. **IgnoreReplay**: year + stage + unordered team pair; among several
//!    candidates the one with the same replay flag is preferred
//! 3. **TeamsOnly**: year + unordered team pair
//!
//! The first tier with a non-empty candidate set wins. Manual venue and
//! fixture overrides are applied afterwards, then date and time strings are
//! combined into one timestamp.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::normalize::{FieldNormalizer, HistoricalNormalizer};
use crate::overrides::{same_pair, FixtureOverride, VenueOverride, FIXTURE_OVERRIDES, VENUE_OVERRIDES};
use crate::timestamp::combine_date_time;
use crate::types::DateTimeReferenceRecord;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("Invalid regex"));

/// First 4-digit run of an edition or tournament identifier
/// (`1994-USA` -> 1994, `WC-1954` -> 1954).
pub fn edition_year(id: &str) -> Option<u16> {
    YEAR_RE.find(id).and_then(|m| m.as_str().parse().ok())
}

/// Lookup tier that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    Exact,
    IgnoreReplay,
    TeamsOnly,
}

/// Reference row with stage and team names normalized the same way as the
/// source rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub year: Option<u16>,
    pub stage: String,
    pub home_team: String,
    pub away_team: String,
    pub replay: bool,
    pub stadium: Option<String>,
    pub match_date: Option<String>,
    pub match_time: Option<String>,
}

/// Read-only normalized view over the reference records.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    pub fn prepare(records: &[DateTimeReferenceRecord], normalizer: &HistoricalNormalizer) -> Self {
        let entries = records
            .iter()
            .map(|r| ReferenceEntry {
                year: r.tournament_id.as_deref().and_then(edition_year),
                stage: normalizer.stage(r.stage_name.as_deref()),
                home_team: normalizer.team(r.home_team.as_deref()),
                away_team: normalizer.team(r.away_team.as_deref()),
                replay: parse_replay_flag(r.replay.as_deref()),
                stadium: r.stadium_name.clone(),
                match_date: r.match_date.clone(),
                match_time: r.match_time.clone(),
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the tier cascade for one query.
    pub fn lookup(&self, query: &MatchQuery<'_>) -> Option<(MatchTier, &ReferenceEntry)> {
        TIERS.iter().find_map(|tier| tier.select(&self.entries, query))
    }

    /// Reference row recorded at `stadium` for the unordered team pair.
    pub fn find_at_stadium(&self, stadium: &str, team_a: &str, team_b: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| {
            e.stadium.as_deref() == Some(stadium)
                && same_pair(&e.home_team, &e.away_team, team_a, team_b)
        })
    }
}

/// Replay indicator: any non-zero number is a replay, anything else is not.
fn parse_replay_flag(raw: Option<&str>) -> bool {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v != 0.0)
        .unwrap_or(false)
}

/// Fields of a source row the cascade matches on.
#[derive(Debug, Clone, Copy)]
pub struct MatchQuery<'a> {
    pub year: Option<u16>,
    pub stage: &'a str,
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub replay: bool,
}

type CandidateFilter = fn(&ReferenceEntry, &MatchQuery<'_>) -> bool;

/// One level of the cascade.
pub struct Tier {
    pub kind: MatchTier,
    filter: CandidateFilter,
    prefer_same_replay: bool,
}

impl Tier {
    /// Candidates for this tier, or `None` if the tier finds nothing.
    pub fn select<'e>(
        &self,
        entries: &'e [ReferenceEntry],
        query: &MatchQuery<'_>,
    ) -> Option<(MatchTier, &'e ReferenceEntry)> {
        let candidates: Vec<&ReferenceEntry> =
            entries.iter().filter(|e| (self.filter)(e, query)).collect();

        let first = *candidates.first()?;
        let chosen = if self.prefer_same_replay && candidates.len() > 1 {
            candidates
                .iter()
                .copied()
                .find(|e| e.replay == query.replay)
                .unwrap_or(first)
        } else {
            first
        };
        Some((self.kind, chosen))
    }
}

fn same_year(entry: &ReferenceEntry, query: &MatchQuery<'_>) -> bool {
    matches!((entry.year, query.year), (Some(a), Some(b)) if a == b)
}

fn same_teams(entry: &ReferenceEntry, query: &MatchQuery<'_>) -> bool {
    same_pair(&entry.home_team, &entry.away_team, query.home_team, query.away_team)
}

/// The cascade, most restrictive first.
pub static TIERS: [Tier; 3] = [
    Tier {
        kind: MatchTier::Exact,
        filter: |e, q| {
            same_year(e, q) && e.stage == q.stage && e.replay == q.replay && same_teams(e, q)
        },
        prefer_same_replay: false,
    },
    Tier {
        kind: MatchTier::IgnoreReplay,
        filter: |e, q| same_year(e, q) && e.stage == q.stage && same_teams(e, q),
        prefer_same_replay: true,
    },
    Tier {
        kind: MatchTier::TeamsOnly,
        filter: |e, q| same_year(e, q) && same_teams(e, q),
        prefer_same_replay: false,
    },
];

/// A historical row going through reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingMatch {
    pub edition: String,
    pub year: Option<u16>,
    pub stage: String,
    pub home_team: String,
    pub away_team: String,
    /// Raw venue text, before city normalization
    pub venue: String,
    pub replay: bool,
    pub match_date: Option<String>,
    pub match_time: Option<String>,
    pub tier: Option<MatchTier>,
    pub datetime: Option<NaiveDateTime>,
}

impl PendingMatch {
    fn query(&self) -> MatchQuery<'_> {
        MatchQuery {
            year: self.year,
            stage: &self.stage,
            home_team: &self.home_team,
            away_team: &self.away_team,
            replay: self.replay,
        }
    }
}

/// Aggregate reconciliation statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub rows: usize,
    /// Size of the reference table the rows were resolved against
    pub reference_rows: usize,
    pub exact: usize,
    pub ignore_replay: usize,
    pub teams_only: usize,
    /// Rows no tier could reconcile
    pub unmatched: usize,
    pub venue_overrides: usize,
    pub fixture_overrides: usize,
    /// Rows ending with a timestamp
    pub resolved: usize,
    /// Rows with date/time text that could not be parsed
    pub unparseable: usize,
}

impl ResolutionReport {
    /// Share of rows with a timestamp, as a percentage.
    pub fn coverage(&self) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        (self.resolved as f64 / self.rows as f64) * 100.0
    }
}

/// Runs the cascade, the override tables and timestamp combination.
pub struct DateTimeResolver<'r> {
    reference: &'r ReferenceTable,
    venue_overrides: &'r [VenueOverride],
    fixture_overrides: &'r [FixtureOverride],
}

impl<'r> DateTimeResolver<'r> {
    /// Resolver with the built-in override tables.
    pub fn new(reference: &'r ReferenceTable) -> Self {
        Self::with_overrides(reference, VENUE_OVERRIDES, FIXTURE_OVERRIDES)
    }

    pub fn with_overrides(
        reference: &'r ReferenceTable,
        venue_overrides: &'r [VenueOverride],
        fixture_overrides: &'r [FixtureOverride],
    ) -> Self {
        Self {
            reference,
            venue_overrides,
            fixture_overrides,
        }
    }

    /// Assign `match_date`, `match_time`, `tier` and `datetime` on every row.
    pub fn resolve(&self, rows: &mut [PendingMatch]) -> ResolutionReport {
        let mut report = ResolutionReport {
            rows: rows.len(),
            reference_rows: self.reference.len(),
            ..Default::default()
        };
        if self.reference.is_empty() && !rows.is_empty() {
            warn!(
                event = "datetime_reference_empty",
                rows = rows.len(),
                "Reference table is empty; only overrides can supply kickoffs"
            );
        }

        for row in rows.iter_mut() {
            match self.reference.lookup(&row.query()) {
                Some((tier, entry)) => {
                    row.match_date = entry.match_date.clone();
                    row.match_time = entry.match_time.clone();
                    row.tier = Some(tier);
                    match tier {
                        MatchTier::Exact => report.exact += 1,
                        MatchTier::IgnoreReplay => report.ignore_replay += 1,
                        MatchTier::TeamsOnly => report.teams_only += 1,
                    }
                }
                None => {
                    report.unmatched += 1;
                    debug!(
                        "No reference row for {} {} vs {} ({})",
                        row.edition, row.home_team, row.away_team, row.stage
                    );
                }
            }
        }

        report.venue_overrides = self.apply_venue_overrides(rows);
        report.fixture_overrides = self.apply_fixture_overrides(rows);

        for row in rows.iter_mut() {
            row.datetime = combine_date_time(row.match_date.as_deref(), row.match_time.as_deref());
            if row.datetime.is_some() {
                report.resolved += 1;
            } else if row.match_date.is_some() {
                report.unparseable += 1;
                debug!(
                    "Unparseable kickoff for {} vs {}: date={:?} time={:?}",
                    row.home_team, row.away_team, row.match_date, row.match_time
                );
            }
        }

        info!(
            event = "datetime_resolution_summary",
            rows = report.rows,
            reference_rows = report.reference_rows,
            exact = report.exact,
            ignore_replay = report.ignore_replay,
            teams_only = report.teams_only,
            unmatched = report.unmatched,
            venue_overrides = report.venue_overrides,
            fixture_overrides = report.fixture_overrides,
            "Resolved kickoff for {}/{} rows ({:.1}% coverage)",
            report.resolved,
            report.rows,
            report.coverage()
        );
        if report.unparseable > 0 {
            warn!(
                event = "datetime_unparseable",
                count = report.unparseable,
                "{} rows have kickoff text that could not be parsed",
                report.unparseable
            );
        }

        report
    }

    fn apply_venue_overrides(&self, rows: &mut [PendingMatch]) -> usize {
        let mut applied = 0;
        for rule in self.venue_overrides {
            let Some(entry) = self
                .reference
                .find_at_stadium(rule.stadium, rule.team_a, rule.team_b)
            else {
                debug!("Venue override {} has no reference row", rule.stadium);
                continue;
            };

            for row in rows.iter_mut() {
                if rule.venue_matches(&row.venue) && rule.pair_matches(&row.home_team, &row.away_team) {
                    row.replay = true;
                    row.match_date = entry.match_date.clone();
                    row.match_time = entry.match_time.clone();
                    applied += 1;
                }
            }
        }
        applied
    }

    fn apply_fixture_overrides(&self, rows: &mut [PendingMatch]) -> usize {
        let mut applied = 0;
        for rule in self.fixture_overrides {
            for row in rows.iter_mut() {
                if rule.matches(&row.edition, &row.home_team, &row.away_team) {
                    row.match_date = Some(rule.date.to_string());
                    row.match_time = Some(rule.time.to_string());
                    applied += 1;
                }
            }
        }
        applied
    }
}
