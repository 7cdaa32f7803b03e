//! Core record types shared by every era pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::outcome::match_outcome;

/// Output timestamp layout for exported records.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source era a record came from. Each era has its own input shape and its
/// own normalization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Era {
    /// 1930-2010 editions, reconciled against the datetime reference table
    Historical,
    /// 2014 edition (semicolon-separated ISO-8859-1 export)
    Brazil2014,
    /// 2018 edition (JSON document)
    Russia2018,
    /// 2022 edition (results + venue tables joined on a merge key)
    Qatar2022,
}

impl Era {
    pub const ALL: [Era; 4] = [
        Era::Historical,
        Era::Brazil2014,
        Era::Russia2018,
        Era::Qatar2022,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Era::Historical => "1930-2010",
            Era::Brazil2014 => "2014",
            Era::Russia2018 => "2018",
            Era::Qatar2022 => "2022",
        }
    }

    /// Parse an era label as used in the `ERAS` env var.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1930-2010" | "historical" | "1930" => Some(Era::Historical),
            "2014" => Some(Era::Brazil2014),
            "2018" => Some(Era::Russia2018),
            "2022" => Some(Era::Qatar2022),
            _ => None,
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a match from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Winner,
    Loser,
    Draw,
}

impl MatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Winner => "winner",
            MatchResult::Loser => "loser",
            MatchResult::Draw => "draw",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical match row, independent of source era.
///
/// Results are private to construction: they are always derived from the
/// goal pair by [`match_outcome`] and can't be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchRecord {
    #[serde(rename = "Datetime", serialize_with = "serialize_datetime")]
    pub datetime: Option<NaiveDateTime>,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Home Team Name")]
    pub home_team: String,
    #[serde(rename = "Home Team Goals")]
    pub home_goals: Option<u32>,
    #[serde(rename = "Away Team Goals")]
    pub away_goals: Option<u32>,
    #[serde(rename = "Away Team Name")]
    pub away_team: String,
    #[serde(rename = "Home Result")]
    home_result: Option<MatchResult>,
    #[serde(rename = "Away Result")]
    away_result: Option<MatchResult>,
    #[serde(rename = "Replay")]
    pub replay: bool,
    #[serde(skip)]
    pub era: Era,
}

impl MatchRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        era: Era,
        datetime: Option<NaiveDateTime>,
        stage: String,
        city: String,
        home_team: String,
        away_team: String,
        home_goals: Option<u32>,
        away_goals: Option<u32>,
        replay: bool,
    ) -> Self {
        let (home_result, away_result) = match_outcome(home_goals, away_goals);
        Self {
            datetime,
            stage,
            city,
            home_team,
            home_goals,
            away_goals,
            away_team,
            home_result,
            away_result,
            replay,
            era,
        }
    }

    pub fn home_result(&self) -> Option<MatchResult> {
        self.home_result
    }

    pub fn away_result(&self) -> Option<MatchResult> {
        self.away_result
    }
}

fn serialize_datetime<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&dt.format(DATETIME_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

/// One row of the 1930-2010 match table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalRow {
    /// Edition identifier, e.g. `1994-USA`
    pub edition: Option<String>,
    pub round: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub venue: Option<String>,
    /// Combined score text such as `3-1`
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default, rename = "Home Team Goals")]
    pub home_goals: Option<String>,
    #[serde(default, rename = "Away Team Goals")]
    pub away_goals: Option<String>,
}

/// One row of the secondary date/time reference table (historical era only).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateTimeReferenceRecord {
    #[serde(rename = "Tournament Id")]
    pub tournament_id: Option<String>,
    #[serde(rename = "Stage Name")]
    pub stage_name: Option<String>,
    #[serde(default, rename = "Stadium Name")]
    pub stadium_name: Option<String>,
    #[serde(rename = "Home Team Name")]
    pub home_team: Option<String>,
    #[serde(rename = "Away Team Name")]
    pub away_team: Option<String>,
    #[serde(default, rename = "Replay")]
    pub replay: Option<String>,
    #[serde(rename = "Match Date")]
    pub match_date: Option<String>,
    #[serde(rename = "Match Time")]
    pub match_time: Option<String>,
}

/// One row of the 2014 match export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Brazil2014Row {
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Datetime")]
    pub datetime: Option<String>,
    #[serde(rename = "Stage")]
    pub stage: Option<String>,
    #[serde(default, rename = "Stadium")]
    pub stadium: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Home Team Name")]
    pub home_team: Option<String>,
    #[serde(rename = "Home Team Goals")]
    pub home_goals: Option<String>,
    #[serde(rename = "Away Team Goals")]
    pub away_goals: Option<String>,
    #[serde(rename = "Away Team Name")]
    pub away_team: Option<String>,
}

/// One row of the 2022 results table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Qatar2022ResultRow {
    pub date: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    #[serde(rename = "number of goals team1")]
    pub goals_team1: Option<String>,
    #[serde(rename = "number of goals team2")]
    pub goals_team2: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One row of the 2022 venue/kickoff table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Qatar2022VenueRow {
    pub match_time: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub venue: Option<String>,
}

/// The 2018 source document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Russia2018Document {
    #[serde(default)]
    pub stadiums: Vec<Stadium2018>,
    #[serde(default)]
    pub teams: Vec<Team2018>,
    #[serde(default)]
    pub groups: std::collections::BTreeMap<String, Round2018>,
    #[serde(default)]
    pub knockout: std::collections::BTreeMap<String, Round2018>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stadium2018 {
    pub id: u32,
    pub name: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team2018 {
    pub id: u32,
    pub name: String,
}

/// A group or knockout round section of the 2018 document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Round2018 {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub matches: Vec<Match2018>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Match2018 {
    pub home_team: TeamRef2018,
    pub away_team: TeamRef2018,
    #[serde(default)]
    pub home_result: Option<u32>,
    #[serde(default)]
    pub away_result: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub stadium: Option<u32>,
}

/// Team slot in a 2018 fixture: a resolved team id, or an unresolved
/// bracket placeholder such as `winner_a`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TeamRef2018 {
    Id(u32),
    Placeholder(String),
}
