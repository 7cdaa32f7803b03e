//! 1930-2010 pipeline.
//!
//! Stage and team names are first normalized into the reconciliation form
//! shared with the reference table, kickoffs are resolved, and a final pass
//! maps every field to the shared output vocabulary.

use rustc_hash::FxHashSet;
use tracing::info;

use crate::normalize::{FieldNormalizer, HistoricalNormalizer};
use crate::overrides::{apply_team_overrides, TEAM_YEAR_OVERRIDES};
use crate::pipelines::{parse_goals, parse_score};
use crate::resolver::{edition_year, DateTimeResolver, PendingMatch, ReferenceTable, ResolutionReport};
use crate::types::{DateTimeReferenceRecord, HistoricalRow, MatchRecord};

/// Edition supplied by its own dedicated source; its rows here are dropped.
const EXCLUDED_EDITION: &str = "2014";

/// Qualifying rounds are not part of the final tournament.
const EXCLUDED_ROUND: &str = "PRELIMINARY";

/// Output of the historical pipeline.
#[derive(Debug, Clone)]
pub struct HistoricalOutput {
    pub records: Vec<MatchRecord>,
    pub report: ResolutionReport,
    /// Rows dropped as qualifying rounds or excluded editions
    pub excluded: usize,
}

fn is_excluded(row: &HistoricalRow) -> bool {
    let preliminary = row
        .round
        .as_deref()
        .is_some_and(|r| r.to_uppercase().contains(EXCLUDED_ROUND));
    let excluded_edition = row
        .edition
        .as_deref()
        .is_some_and(|e| e.contains(EXCLUDED_EDITION));
    preliminary || excluded_edition
}

pub fn run(rows: &[HistoricalRow], reference: &[DateTimeReferenceRecord]) -> HistoricalOutput {
    let normalizer = HistoricalNormalizer;

    let kept: Vec<&HistoricalRow> = rows.iter().filter(|r| !is_excluded(r)).collect();
    let excluded = rows.len() - kept.len();

    let mut pending = Vec::with_capacity(kept.len());
    let mut seen_fixtures = FxHashSet::default();
    let mut renamed = 0;

    for row in &kept {
        let edition = row.edition.clone().unwrap_or_default();
        let year = edition_year(&edition);
        let stage = normalizer.stage(row.round.as_deref());
        let mut home_team = normalizer.team(row.team1.as_deref());
        let mut away_team = normalizer.team(row.team2.as_deref());
        renamed += apply_team_overrides(TEAM_YEAR_OVERRIDES, year, &mut home_team, &mut away_team);

        // Later occurrences of the same fixture are replays.
        let fixture = (edition.clone(), stage.clone(), home_team.clone(), away_team.clone());
        let replay = !seen_fixtures.insert(fixture);

        pending.push(PendingMatch {
            edition,
            year,
            stage,
            home_team,
            away_team,
            venue: row.venue.clone().unwrap_or_default(),
            replay,
            ..Default::default()
        });
    }

    let reference = ReferenceTable::prepare(reference, &normalizer);
    let report = DateTimeResolver::new(&reference).resolve(&mut pending);

    let records: Vec<MatchRecord> = kept
        .iter()
        .zip(pending)
        .map(|(row, m)| {
            let city = normalizer.city(row.venue.as_deref());
            let (home_goals, away_goals) = goals(row);
            MatchRecord::new(
                normalizer.era(),
                m.datetime,
                normalizer.canonical_stage(&m.stage),
                normalizer.canonical_city(Some(&city)),
                normalizer.canonical_team(Some(&m.home_team)),
                normalizer.canonical_team(Some(&m.away_team)),
                home_goals,
                away_goals,
                m.replay,
            )
        })
        .collect();

    info!(
        event = "historical_pipeline_summary",
        input_rows = rows.len(),
        excluded = excluded,
        renamed_teams = renamed,
        replays = records.iter().filter(|r| r.replay).count(),
        records = records.len(),
        "Historical pipeline: {} records ({} rows excluded)",
        records.len(),
        excluded
    );

    HistoricalOutput {
        records,
        report,
        excluded,
    }
}

/// Separate goal columns win over the combined score text.
fn goals(row: &HistoricalRow) -> (Option<u32>, Option<u32>) {
    let separate = (
        parse_goals(row.home_goals.as_deref()),
        parse_goals(row.away_goals.as_deref()),
    );
    match separate {
        (Some(h), Some(a)) => (Some(h), Some(a)),
        _ => parse_score(row.score.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Era, MatchResult};
    use chrono::NaiveDate;

    fn row(edition: &str, round: &str, team1: &str, team2: &str, venue: &str, score: &str) -> HistoricalRow {
        HistoricalRow {
            edition: Some(edition.to_string()),
            round: Some(round.to_string()),
            team1: Some(team1.to_string()),
            team2: Some(team2.to_string()),
            venue: Some(venue.to_string()),
            score: Some(score.to_string()),
            ..Default::default()
        }
    }

    fn reference(id: &str, stage: &str, home: &str, away: &str, date: &str, time: &str) -> DateTimeReferenceRecord {
        DateTimeReferenceRecord {
            tournament_id: Some(id.to_string()),
            stage_name: Some(stage.to_string()),
            stadium_name: None,
            home_team: Some(home.to_string()),
            away_team: Some(away.to_string()),
            replay: Some("0".to_string()),
            match_date: Some(date.to_string()),
            match_time: Some(time.to_string()),
        }
    }

    #[test]
    fn test_filters_preliminary_and_excluded_edition() {
        let rows = vec![
            row("1934-ITALY", "PRELIMINARY ROUND", "Italy", "Greece", "Milan", "4-0"),
            row("2014-BRAZIL", "GROUP_STAGE", "Brazil", "Croatia", "São Paulo", "3-1"),
            row("1934-ITALY", "1/8 FINAL", "Italy", "USA", "Rome", "7-1"),
        ];
        let out = run(&rows, &[]);
        assert_eq!(out.excluded, 2);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.era, Era::Historical);
        assert_eq!(r.stage, "round of 16");
        assert_eq!(r.away_team, "united states");
        assert_eq!(r.home_goals, Some(7));
        assert_eq!(r.home_result(), Some(MatchResult::Winner));
    }

    #[test]
    fn test_replay_flag_on_repeated_fixture() {
        let rows = vec![
            row("1934-ITALY", "1/4 FINAL", "Italy", "Spain", "Florence", "1-1"),
            row("1934-ITALY", "1/4 FINAL", "Italy", "Spain", "Florence", "1-0"),
        ];
        let out = run(&rows, &[]);
        assert!(!out.records[0].replay);
        assert!(out.records[1].replay);
        assert_eq!(out.records[0].stage, "quarter-final");
        assert_eq!(out.records[0].home_result(), Some(MatchResult::Draw));
    }

    #[test]
    fn test_slovakia_rewritten_in_2002() {
        let rows = vec![
            row("2002-KOREA-JAPAN", "GROUP_STAGE", "Paraguay", "Slovakia", "Jeonju", "3-1"),
            row("1998-FRANCE", "GROUP_STAGE", "Paraguay", "Slovakia", "Lens", "0-0"),
        ];
        let out = run(&rows, &[]);
        assert_eq!(out.records[0].away_team, "slovenia");
        assert_eq!(out.records[1].away_team, "slovakia");
    }

    #[test]
    fn test_kickoff_resolved_from_reference() {
        let rows = vec![row(
            "1930-URUGUAY",
            "GROUP_STAGE",
            "France",
            "Mexico",
            "Estadio Pocitos, Montevideo",
            "4-1",
        )];
        let refs = vec![reference(
            "WC-1930",
            "group stage",
            "France",
            "Mexico",
            "1930-07-13",
            "15:00",
        )];
        let out = run(&rows, &refs);
        assert_eq!(out.report.exact, 1);
        assert_eq!(
            out.records[0].datetime,
            NaiveDate::from_ymd_opt(1930, 7, 13)
                .unwrap()
                .and_hms_opt(15, 0, 0)
        );
        assert_eq!(out.records[0].stage, "group");
        assert_eq!(out.records[0].city, "estadio pocitos montevideo");
    }

    #[test]
    fn test_1994_override_applied_with_source_names() {
        let rows = vec![row(
            "1994-USA",
            "GROUP_STAGE",
            "Norway",
            "Mexico",
            "Washington, D.C.",
            "1-0",
        )];
        let refs = vec![reference(
            "WC-1994",
            "group stage",
            "Norway",
            "Mexico",
            "1994-06-20",
            "19:30",
        )];
        let out = run(&rows, &refs);
        assert_eq!(out.report.fixture_overrides, 1);
        assert_eq!(
            out.records[0].datetime,
            NaiveDate::from_ymd_opt(1994, 6, 19)
                .unwrap()
                .and_hms_opt(13, 0, 0)
        );
        assert_eq!(out.records[0].city, "washington dc");
    }

    #[test]
    fn test_missing_score_leaves_results_null() {
        let mut r = row("1950-BRAZIL", "FINAL_ROUND", "Uruguay", "Brazil", "Rio de Janeiro", "");
        r.score = None;
        let out = run(&[r], &[]);
        assert_eq!(out.records[0].home_goals, None);
        assert_eq!(out.records[0].home_result(), None);
        assert_eq!(out.records[0].away_result(), None);
        assert_eq!(out.records[0].stage, "final round");
        assert_eq!(out.records[0].datetime, None);
    }

    #[test]
    fn test_separate_goal_columns_preferred() {
        let mut r = row("1958-SWEDEN", "FINAL", "Brazil", "Sweden", "Solna", "");
        r.home_goals = Some("5".to_string());
        r.away_goals = Some("2".to_string());
        let out = run(&[r], &[]);
        assert_eq!(out.records[0].home_goals, Some(5));
        assert_eq!(out.records[0].away_goals, Some(2));
        assert_eq!(out.records[0].stage, "final");
    }
}
