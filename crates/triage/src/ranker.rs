use crate::scoring::MatchRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Presentation cap for ranked results
pub const DEFAULT_RESULT_LIMIT: usize = 15;

/// Ordering among records with equal scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep input order (catalog order when fed straight from scoring)
    #[default]
    Stable,
    /// Ascending condition id
    ConditionId,
}

/// Sort by score descending and keep the first `limit` records.
///
/// Ties keep their input order; no other tie order is guaranteed.
#[must_use]
pub fn rank(records: Vec<MatchRecord>, limit: usize) -> Vec<MatchRecord> {
    rank_with(records, limit, TieBreak::Stable)
}

#[must_use]
pub fn rank_with(mut records: Vec<MatchRecord>, limit: usize, tie_break: TieBreak) -> Vec<MatchRecord> {
    records.sort_by(|a, b| compare(a, b, tie_break));
    if records.len() > limit {
        log::debug!("Truncating {} ranked records to {limit}", records.len());
        records.truncate(limit);
    }
    records
}

fn compare(a: &MatchRecord, b: &MatchRecord, tie_break: TieBreak) -> Ordering {
    let by_score = b.score.total_cmp(&a.score);
    match tie_break {
        TieBreak::Stable => by_score,
        TieBreak::ConditionId => by_score.then_with(|| a.condition.id.cmp(&b.condition.id)),
    }
}
