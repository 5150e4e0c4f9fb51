use crate::scoring::MatchRecord;
use crate::selection::Selection;
use healbuddy_catalog::{Severity, SymptomId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const URGENT_MESSAGE: &str = "URGENT: Critical symptoms detected. Please seek immediate medical attention or call emergency services.";
pub const HIGH_MESSAGE: &str =
    "HIGH PRIORITY: Schedule a medical appointment soon to discuss these symptoms.";
pub const LOW_MESSAGE: &str = "LOW PRIORITY: Your symptoms appear mild. Monitor your condition and consult a doctor if symptoms persist.";

/// Session-wide urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriageLevel {
    Low,
    High,
    Urgent,
}

impl TriageLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Low => LOW_MESSAGE,
            Self::High => HIGH_MESSAGE,
            Self::Urgent => URGENT_MESSAGE,
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Critical symptom found in a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalSymptom {
    pub id: SymptomId,
    pub label: String,
}

/// Symptoms whose presence alone forces `URGENT`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriticalSymptoms {
    labels: BTreeMap<SymptomId, String>,
}

impl CriticalSymptoms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SymptomId, label: impl Into<String>) {
        self.labels.insert(id, label.into());
    }

    #[must_use]
    pub fn label(&self, id: SymptomId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: SymptomId) -> bool {
        self.labels.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (SymptomId, &str)> + '_ {
        self.labels.iter().map(|(id, label)| (*id, label.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(SymptomId, S)> for CriticalSymptoms {
    fn from_iter<I: IntoIterator<Item = (SymptomId, S)>>(iter: I) -> Self {
        let mut critical = Self::new();
        for (id, label) in iter {
            critical.insert(id, label);
        }
        critical
    }
}

/// Urgency banner for one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageResult {
    pub level: TriageLevel,
    pub message: String,

    /// Highest severity among all scored conditions (not just the ranked ones)
    pub max_severity: Severity,

    /// Critical symptoms present in the selection, in selection order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub critical_hits: Vec<CriticalSymptom>,
}

pub struct TriageClassifier;

impl TriageClassifier {
    /// Classify the session from the full set of match records.
    ///
    /// Pass every scored record, never a truncated ranking: a low-scoring
    /// severe condition must still escalate.
    #[must_use]
    pub fn classify(
        records: &[MatchRecord],
        selection: &Selection,
        critical: &CriticalSymptoms,
    ) -> TriageResult {
        let critical_hits: Vec<CriticalSymptom> = selection
            .iter()
            .filter_map(|id| {
                critical.label(id).map(|label| CriticalSymptom {
                    id,
                    label: label.to_string(),
                })
            })
            .collect();
        let max_severity = Self::max_severity(records);
        let level = Self::level_for(!critical_hits.is_empty(), max_severity);

        log::debug!(
            "Triage {level}: max_severity={max_severity}, critical_hits={}",
            critical_hits.len()
        );

        TriageResult {
            level,
            message: level.message().to_string(),
            max_severity,
            critical_hits,
        }
    }

    /// Monotonic raise over record severities, starting from `Mild`
    #[must_use]
    pub fn max_severity(records: &[MatchRecord]) -> Severity {
        records
            .iter()
            .fold(Severity::Mild, |acc, record| acc.raise(record.condition.severity))
    }

    /// Decision table, first match wins
    #[must_use]
    pub fn level_for(has_critical: bool, max_severity: Severity) -> TriageLevel {
        if has_critical || max_severity == Severity::Severe {
            TriageLevel::Urgent
        } else if max_severity == Severity::Moderate {
            TriageLevel::High
        } else {
            TriageLevel::Low
        }
    }
}
