//! Source file loading.
//!
//! Every loader checks that its file exists and that the columns the
//! pipeline reads are present before any row is deserialized. Rows that fail
//! to deserialize are skipped with a warning; I/O and structural CSV errors
//! propagate.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::pipelines::qatar2022::StadiumCities;
use crate::types::{
    Brazil2014Row, DateTimeReferenceRecord, HistoricalRow, Qatar2022ResultRow, Qatar2022VenueRow,
    Russia2018Document,
};

const HISTORICAL_COLUMNS: &[&str] = &["edition", "round", "team1", "team2", "venue"];
const REFERENCE_COLUMNS: &[&str] = &[
    "Tournament Id",
    "Stage Name",
    "Home Team Name",
    "Away Team Name",
    "Match Date",
    "Match Time",
];
const BRAZIL_2014_COLUMNS: &[&str] = &[
    "Year",
    "Datetime",
    "Stage",
    "City",
    "Home Team Name",
    "Home Team Goals",
    "Away Team Goals",
    "Away Team Name",
];
const QATAR_2022_RESULT_COLUMNS: &[&str] = &[
    "date",
    "team1",
    "team2",
    "number of goals team1",
    "number of goals team2",
];
const QATAR_2022_VENUE_COLUMNS: &[&str] = &["match_time", "home_team", "away_team", "venue"];

/// Decode one field. Malformed sequences are replaced with U+FFFD and
/// reported through the returned flag.
pub fn decode_field(bytes: &[u8], encoding: &'static Encoding) -> (String, bool) {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    (text.into_owned(), had_errors)
}

/// Layout of one delimited source table.
#[derive(Debug, Clone, Copy)]
pub struct TableFormat<'a> {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub required: &'a [&'a str],
}

pub fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingRequiredFile {
            path: path.to_path_buf(),
        })
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn decode_headers(raw: &ByteRecord, encoding: &'static Encoding) -> StringRecord {
    raw.iter()
        .map(|field| {
            let (name, _) = decode_field(field, encoding);
            name.trim_start_matches('\u{feff}').trim().to_string()
        })
        .collect()
}

fn check_columns(path: &Path, headers: &StringRecord, required: &[&str]) -> Result<()> {
    match required.iter().find(|col| !headers.iter().any(|h| h == **col)) {
        Some(missing) => Err(PipelineError::MissingRequiredColumn {
            file: file_label(path),
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}

/// Read a delimited table into typed rows.
pub fn read_table<T: DeserializeOwned>(path: &Path, format: TableFormat<'_>) -> Result<Vec<T>> {
    require_file(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = decode_headers(rdr.byte_headers()?, format.encoding);
    check_columns(path, &headers, format.required)?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    let mut decode_errors = 0usize;
    for (i, result) in rdr.byte_records().enumerate() {
        let raw = result?;
        let record: StringRecord = raw
            .iter()
            .map(|field| {
                let (text, had_errors) = decode_field(field, format.encoding);
                if had_errors {
                    decode_errors += 1;
                }
                text
            })
            .collect();
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                // +2: header line and 1-based numbering
                warn!("Skipping malformed row {} in {}: {}", i + 2, file_label(path), e);
            }
        }
    }

    info!(
        event = "source_loaded",
        file = %file_label(path),
        rows = rows.len(),
        skipped = skipped,
        "Loaded {} rows from {}",
        rows.len(),
        file_label(path)
    );
    if decode_errors > 0 {
        warn!(
            event = "source_decode_errors",
            file = %file_label(path),
            encoding = format.encoding.name(),
            fields = decode_errors,
            "{} fields in {} were not valid {}",
            decode_errors,
            file_label(path),
            format.encoding.name()
        );
    }
    Ok(rows)
}

/// 1930-2010 match table. Goals come either from `score` or from the two
/// goal columns, so one of those must be present.
pub fn load_historical(path: &Path) -> Result<Vec<HistoricalRow>> {
    require_file(path)?;
    let mut rdr = csv::ReaderBuilder::new().from_path(path)?;
    let headers = decode_headers(rdr.byte_headers()?, UTF_8);
    let has = |col: &str| headers.iter().any(|h| h == col);
    if !has("score") && !(has("Home Team Goals") && has("Away Team Goals")) {
        return Err(PipelineError::MissingRequiredColumn {
            file: file_label(path),
            column: "score".to_string(),
        });
    }

    read_table(
        path,
        TableFormat {
            delimiter: b',',
            encoding: UTF_8,
            required: HISTORICAL_COLUMNS,
        },
    )
}

/// Kickoff reference table (Windows-1252, the superset of ISO-8859-1 the
/// export was written in).
pub fn load_reference(path: &Path) -> Result<Vec<DateTimeReferenceRecord>> {
    read_table(
        path,
        TableFormat {
            delimiter: b',',
            encoding: WINDOWS_1252,
            required: REFERENCE_COLUMNS,
        },
    )
}

/// 2014 export (semicolon-separated, Windows-1252).
pub fn load_2014(path: &Path) -> Result<Vec<Brazil2014Row>> {
    read_table(
        path,
        TableFormat {
            delimiter: b';',
            encoding: WINDOWS_1252,
            required: BRAZIL_2014_COLUMNS,
        },
    )
}

pub fn load_2018(path: &Path) -> Result<Russia2018Document> {
    require_file(path)?;
    let reader = BufReader::new(File::open(path)?);
    let doc: Russia2018Document = serde_json::from_reader(reader)?;
    info!(
        event = "source_loaded",
        file = %file_label(path),
        teams = doc.teams.len(),
        stadiums = doc.stadiums.len(),
        groups = doc.groups.len(),
        knockout_rounds = doc.knockout.len(),
        "Loaded 2018 document from {}",
        file_label(path)
    );
    Ok(doc)
}

pub fn load_2022_results(path: &Path) -> Result<Vec<Qatar2022ResultRow>> {
    let rows: Vec<Qatar2022ResultRow> = read_table(
        path,
        TableFormat {
            delimiter: b',',
            encoding: UTF_8,
            required: QATAR_2022_RESULT_COLUMNS,
        },
    )?;
    if rows.iter().all(|r| r.category.is_none()) {
        warn!(
            event = "missing_stage_column",
            file = %file_label(path),
            "No stage values in {}; every 2022 stage will be unknown",
            file_label(path)
        );
    }
    Ok(rows)
}

pub fn load_2022_venues(path: &Path) -> Result<Vec<Qatar2022VenueRow>> {
    read_table(
        path,
        TableFormat {
            delimiter: b',',
            encoding: UTF_8,
            required: QATAR_2022_VENUE_COLUMNS,
        },
    )
}

/// Stadium-to-city mapping: first column is the stadium, second the city,
/// whatever the headers say.
pub fn load_stadium_cities(path: &Path) -> Result<StadiumCities> {
    require_file(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    if rdr.headers()?.len() < 2 {
        return Err(PipelineError::MissingRequiredColumn {
            file: file_label(path),
            column: "city".to_string(),
        });
    }

    let mut map = StadiumCities::new();
    for result in rdr.records() {
        let record = result?;
        if let (Some(stadium), Some(city)) = (record.get(0), record.get(1)) {
            if !stadium.is_empty() {
                map.insert(stadium.to_string(), city.to_string());
            }
        }
    }

    info!(
        event = "source_loaded",
        file = %file_label(path),
        stadiums = map.len(),
        "Loaded {} stadium cities",
        map.len()
    );
    Ok(map)
}
