//! End-to-end tests over a fixture data directory.
//!
//! Each test writes small source files into a temp dir, runs the configured
//! eras through loading, normalization, merge and export, and checks the
//! exported CSV.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use worldcup_reconcile::config::{
    EtlConfig, BRAZIL_2014_FILE, HISTORICAL_FILE, QATAR_2022_RESULTS_FILE, QATAR_2022_VENUES_FILE,
    REFERENCE_FILE, RUSSIA_2018_FILE, STADIUM_CITY_FILE,
};
use worldcup_reconcile::error::PipelineError;
use worldcup_reconcile::export::write_canonical_csv;
use worldcup_reconcile::pipelines::run_all;
use worldcup_reconcile::types::{Era, MatchResult};

const HISTORICAL_CSV: &str = "\
edition,round,team1,team2,venue,score
1930-URUGUAY,GROUP_STAGE,France,Mexico,\"Estadio Pocitos, Montevideo\",4-1
1934-ITALY,PRELIMINARY ROUND,Italy,Greece,Milan,4-0
1934-ITALY,1/4 FINAL,Italy,Spain,Florence,1-1
1934-ITALY,1/4 FINAL,Italy,Spain,Florence,1-0
1994-USA,GROUP_STAGE,Norway,Mexico,\"Washington, D.C.\",1-0
2002-KOREA-JAPAN,GROUP_STAGE,Paraguay,Slovakia,Jeonju,3-1
2014-BRAZIL,GROUP_STAGE,Brazil,Croatia,Sao Paulo,3-1
";

const REFERENCE_CSV: &[u8] = b"\
Tournament Id,Stage Name,Stadium Name,Home Team Name,Away Team Name,Replay,Match Date,Match Time
WC-1930,group stage,Estadio Pocitos,France,Mexico,0,1930-07-13,15:00
WC-1994,group stage,RFK Stadium,Norway,Mexico,0,1994-06-20,19:30
WC-2002,group stage,Jeonju World Cup Stadium,Paraguay,Slovenia,0,2002-06-12,15:30
WC-1958,group stage,Malm\xf6 Stadion,Argentina,West Germany,0,1958-06-08,19:00
";

const BRAZIL_2014_CSV: &[u8] = b"\
Year;Datetime;Stage;Stadium;City;Home Team Name;Home Team Goals;Away Team Goals;Away Team Name
2014;12 Jun 2014 - 17:00 ;Group A;Arena de S\xe3o Paulo;S\xe3o Paulo ;Brazil;3;1;Croatia
2014;12 Jun 2014 - 17:00 ;Group A;Arena de S\xe3o Paulo;S\xe3o Paulo ;Brazil;3;1;Croatia
2010;11 Jul 2010 - 20:30 ;Final;Soccer City;Johannesburg ;Netherlands;0;1;Spain
";

const RUSSIA_2018_JSON: &str = r#"{
    "stadiums": [{"id": 1, "name": "Luzhniki Stadium", "city": "Moscow"}],
    "teams": [{"id": 1, "name": "Russia"}, {"id": 2, "name": "Saudi Arabia"}],
    "groups": {
        "a": {"name": "Group A", "matches": [
            {"home_team": 1, "away_team": 2, "home_result": 5, "away_result": 0,
             "date": "2018-06-14T18:00:00+03:00", "stadium": 1}
        ]}
    },
    "knockout": {
        "round_16": {"name": "Round of 16", "matches": [
            {"home_team": "winner_a", "away_team": "runner_b", "home_result": null,
             "away_result": null, "date": "2018-06-30T17:00:00+03:00", "stadium": 1}
        ]}
    }
}"#;

const QATAR_2022_RESULTS_CSV: &str = "\
date,team1,team2,number of goals team1,number of goals team2,category
18 DEC 2022,ARGENTINA,FRANCE,3,3,Final
";

const QATAR_2022_VENUES_CSV: &str = "\
match_time,home_team,away_team,venue
18/12/2022 18:00,Argentina,France,Lusail Stadium
";

const STADIUM_CITY_CSV: &str = "\
Stadium,City
Lusail Stadium,Lusail
";

fn write(dir: &Path, name: &str, contents: impl AsRef<[u8]>) {
    fs::write(dir.join(name), contents).unwrap();
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let p = dir.path();
    write(p, HISTORICAL_FILE, HISTORICAL_CSV);
    write(p, REFERENCE_FILE, REFERENCE_CSV);
    write(p, BRAZIL_2014_FILE, BRAZIL_2014_CSV);
    write(p, RUSSIA_2018_FILE, RUSSIA_2018_JSON);
    write(p, QATAR_2022_RESULTS_FILE, QATAR_2022_RESULTS_CSV);
    write(p, QATAR_2022_VENUES_FILE, QATAR_2022_VENUES_CSV);
    write(p, STADIUM_CITY_FILE, STADIUM_CITY_CSV);
    dir
}

fn config_for(dir: &TempDir, eras: &[Era]) -> EtlConfig {
    let mut config = EtlConfig::with_data_dir(dir.path());
    config.output_path = dir.path().join("out").join("matches.csv");
    config.eras = eras.to_vec();
    config
}

#[test]
fn test_full_run_exports_every_era() {
    let dir = fixture_dir();
    let config = config_for(&dir, &Era::ALL);

    let (records, summary) = run_all(&config).unwrap();
    assert_eq!(summary.count_for(Era::Historical), 5);
    assert_eq!(summary.count_for(Era::Brazil2014), 1);
    assert_eq!(summary.count_for(Era::Russia2018), 1);
    assert_eq!(summary.count_for(Era::Qatar2022), 1);
    assert_eq!(summary.total, 8);
    // Both Italy-Spain rows have no reference entry
    assert_eq!(summary.missing_datetime, 2);
    assert_eq!(summary.replays, 1);

    let written = write_canonical_csv(&config.output_path, &records).unwrap();
    assert_eq!(written, 8);

    let text = fs::read_to_string(&config.output_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Datetime,Stage,City,Home Team Name,Home Team Goals,Away Team Goals,Away Team Name,Home Result,Away Result,Replay"
    );
    assert_eq!(
        lines[1],
        "1930-07-13 15:00:00,group,estadio pocitos montevideo,france,4,1,mexico,winner,loser,false"
    );
    assert_eq!(
        lines[2],
        ",quarter-final,florence,italy,1,1,spain,draw,draw,false"
    );
    assert_eq!(
        lines[3],
        ",quarter-final,florence,italy,1,0,spain,winner,loser,true"
    );
    assert_eq!(
        lines[4],
        "1994-06-19 13:00:00,group,washington dc,norway,1,0,mexico,winner,loser,false"
    );
    assert_eq!(
        lines[5],
        "2002-06-12 15:30:00,group,jeonju,paraguay,3,1,slovenia,winner,loser,false"
    );
    assert_eq!(
        lines[6],
        "2014-06-12 17:00:00,group,sao paulo,brazil,3,1,croatia,winner,loser,false"
    );
    assert_eq!(
        lines[7],
        "2018-06-14 18:00:00,group,moscow,russia,5,0,saudi arabia,winner,loser,false"
    );
    assert_eq!(
        lines[8],
        "2022-12-18 18:00:00,final,lusail,argentina,3,3,france,draw,draw,false"
    );
}

#[test]
fn test_results_never_both_winner() {
    let dir = fixture_dir();
    let (records, _) = run_all(&config_for(&dir, &Era::ALL)).unwrap();
    for r in &records {
        match (r.home_goals, r.away_goals) {
            (Some(_), Some(_)) => {
                assert!(r.home_result().is_some() && r.away_result().is_some());
                assert!(
                    !(r.home_result() == Some(MatchResult::Winner)
                        && r.away_result() == Some(MatchResult::Winner))
                );
            }
            _ => {
                assert_eq!(r.home_result(), None);
                assert_eq!(r.away_result(), None);
            }
        }
    }
}

#[test]
fn test_era_subset_runs_only_selected_sources() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), RUSSIA_2018_FILE, RUSSIA_2018_JSON);

    let (records, summary) = run_all(&config_for(&dir, &[Era::Russia2018])).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(summary.per_era, vec![(Era::Russia2018, 1)]);
}

#[test]
fn test_missing_source_file_aborts() {
    let dir = fixture_dir();
    fs::remove_file(dir.path().join(REFERENCE_FILE)).unwrap();

    let err = run_all(&config_for(&dir, &[Era::Historical])).unwrap_err();
    match err {
        PipelineError::MissingRequiredFile { path } => {
            assert!(path.ends_with(REFERENCE_FILE));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_2022_without_matching_venues_is_fatal() {
    let dir = fixture_dir();
    write(
        dir.path(),
        QATAR_2022_VENUES_FILE,
        "match_time,home_team,away_team,venue\n17/12/2022 16:00,Croatia,Morocco,Khalifa International Stadium\n",
    );

    let err = run_all(&config_for(&dir, &[Era::Qatar2022])).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::EmptyMergeResult {
            results_rows: 1,
            venue_rows: 1
        }
    ));
}

#[test]
fn test_gazetteer_file_resolves_2014_cities() {
    let dir = fixture_dir();
    write(
        dir.path(),
        BRAZIL_2014_FILE,
        b"Year;Datetime;Stage;Stadium;City;Home Team Name;Home Team Goals;Away Team Goals;Away Team Name\n\
2014;13 Jul 2014 - 16:00 ;Final;Maracan\xe3;Rio ;Germany;1;0;Argentina\n"
            .as_slice(),
    );
    let gazetteer = dir.path().join("cities.txt");
    fs::write(&gazetteer, "# canonical, alternates\nRio de Janeiro, Rio, Rio De Janeiro\n").unwrap();

    let mut config = config_for(&dir, &[Era::Brazil2014]);
    config.gazetteer_path = Some(gazetteer);
    let (records, _) = run_all(&config).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].city, "rio de janeiro");
    assert_eq!(records[0].stage, "final");
    assert_eq!(records[0].home_result(), Some(MatchResult::Winner));
}

#[test]
fn test_missing_gazetteer_file_is_fatal() {
    let dir = fixture_dir();
    let mut config = config_for(&dir, &[Era::Brazil2014]);
    config.gazetteer_path = Some(dir.path().join("missing.txt"));
    assert!(matches!(
        run_all(&config).unwrap_err(),
        PipelineError::MissingRequiredFile { .. }
    ));
}
