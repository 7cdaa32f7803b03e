//! World Cup match table reconciliation
//!
//! Unifies per-edition World Cup match sources (1930-2010, 2014, 2018, 2022)
//! into one canonical table with normalized stages, teams and cities,
//! reconciled kickoff timestamps and derived results.

pub mod config;
pub mod error;
pub mod export;
pub mod gazetteer;
pub mod logging;
pub mod merge;
pub mod merge_key;
pub mod normalize;
pub mod outcome;
pub mod overrides;
pub mod pipelines;
pub mod resolver;
pub mod sources;
pub mod timestamp;
pub mod types;
