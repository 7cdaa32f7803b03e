//! Concatenation of per-era outputs into the unified match table.

use std::fmt;

use tracing::{info, warn};

use crate::types::{Era, MatchRecord};

/// Record counts and data-quality totals for one merged run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Rows contributed per era, in merge order
    pub per_era: Vec<(Era, usize)>,
    pub total: usize,
    pub missing_datetime: usize,
    pub missing_stage: usize,
    pub missing_result: usize,
    pub replays: usize,
}

impl MergeSummary {
    pub fn count_for(&self, era: Era) -> usize {
        self.per_era
            .iter()
            .filter(|(e, _)| *e == era)
            .map(|(_, n)| n)
            .sum()
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .per_era
            .iter()
            .map(|(era, n)| format!("{}={}", era, n))
            .collect();
        write!(
            f,
            "{} records [{}], {} without kickoff, {} without result",
            self.total,
            parts.join(" "),
            self.missing_datetime,
            self.missing_result
        )
    }
}

/// Concatenate era outputs in the order given. Records are moved, never
/// re-normalized; the only merge-time step is tallying quality counts.
pub fn merge_eras(outputs: Vec<(Era, Vec<MatchRecord>)>) -> (Vec<MatchRecord>, MergeSummary) {
    let mut summary = MergeSummary::default();
    let capacity = outputs.iter().map(|(_, r)| r.len()).sum();
    let mut merged = Vec::with_capacity(capacity);

    for (era, records) in outputs {
        summary.per_era.push((era, records.len()));
        merged.extend(records);
    }

    summary.total = merged.len();
    for record in &merged {
        if record.datetime.is_none() {
            summary.missing_datetime += 1;
        }
        if record.stage.trim().is_empty() {
            summary.missing_stage += 1;
        }
        if record.home_result().is_none() {
            summary.missing_result += 1;
        }
        if record.replay {
            summary.replays += 1;
        }
    }

    if summary.missing_stage > 0 {
        warn!(
            event = "merge_missing_stage",
            count = summary.missing_stage,
            "{} merged records have an empty stage",
            summary.missing_stage
        );
    }
    info!(
        event = "merge_summary",
        total = summary.total,
        missing_datetime = summary.missing_datetime,
        missing_result = summary.missing_result,
        replays = summary.replays,
        "Merged {}",
        summary
    );

    (merged, summary)
}
