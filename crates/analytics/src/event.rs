use healbuddy_catalog::{ConditionId, SymptomId};
use healbuddy_triage::{Analysis, MatchRecord};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Top-ranked condition of an analysis, as stored in the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDiagnosis {
    pub condition_id: ConditionId,
    pub condition_name: String,
    pub score: f64,
}

impl From<&MatchRecord> for TopDiagnosis {
    fn from(record: &MatchRecord) -> Self {
        Self {
            condition_id: record.condition.id,
            condition_name: record.condition.name.clone(),
            score: record.score,
        }
    }
}

/// One recorded symptom-check query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub user: String,
    pub timestamp_unix_ms: u64,
    pub symptoms_selected: usize,
    pub symptoms: Vec<SymptomId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_diagnosis: Option<TopDiagnosis>,
}

impl SessionEvent {
    pub fn new(
        user: impl Into<String>,
        timestamp_unix_ms: u64,
        symptoms: Vec<SymptomId>,
        top_diagnosis: Option<TopDiagnosis>,
    ) -> Self {
        Self {
            user: user.into(),
            timestamp_unix_ms,
            symptoms_selected: symptoms.len(),
            symptoms,
            top_diagnosis,
        }
    }

    #[must_use]
    pub fn from_analysis(user: &str, analysis: &Analysis, timestamp_unix_ms: u64) -> Self {
        Self::new(
            user,
            timestamp_unix_ms,
            analysis.selection.ids().to_vec(),
            analysis.top_match().map(TopDiagnosis::from),
        )
    }
}

pub fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|dur| u64::try_from(dur.as_millis()).ok())
        .unwrap_or(0)
}
