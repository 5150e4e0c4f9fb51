use crate::classifier::{TriageClassifier, TriageResult};
use crate::error::Result;
use crate::profile::TriageProfile;
use crate::ranker::rank_with;
use crate::scoring::{score, MatchRecord};
use crate::selection::Selection;
use healbuddy_catalog::{Catalog, SymptomId};
use serde::Serialize;

/// Terminal state of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// At least one condition matched; `ranked` is the truncated view,
    /// `triage` was computed from every scored record.
    Matches {
        triage: TriageResult,
        ranked: Vec<MatchRecord>,
    },
    /// Nothing matched. A banner is still produced when the selection
    /// contains a critical symptom.
    NoMatches {
        #[serde(skip_serializing_if = "Option::is_none")]
        triage: Option<TriageResult>,
    },
}

/// Result of analyzing one selection against a catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub selection: Selection,

    /// Scored conditions before truncation
    pub total_matches: usize,

    pub outcome: AnalysisOutcome,
}

impl Analysis {
    /// Top-ranked record (the one reported to analytics)
    #[must_use]
    pub fn top_match(&self) -> Option<&MatchRecord> {
        self.ranked().first()
    }

    #[must_use]
    pub fn ranked(&self) -> &[MatchRecord] {
        match &self.outcome {
            AnalysisOutcome::Matches { ranked, .. } => ranked,
            AnalysisOutcome::NoMatches { .. } => &[],
        }
    }

    #[must_use]
    pub fn triage(&self) -> Option<&TriageResult> {
        match &self.outcome {
            AnalysisOutcome::Matches { triage, .. } => Some(triage),
            AnalysisOutcome::NoMatches { triage } => triage.as_ref(),
        }
    }

    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::NoMatches { .. })
    }
}

/// Scoring, triage and ranking composed under one profile.
///
/// Holds no per-call state; one engine can serve any number of analyses.
#[derive(Clone, Debug, Default)]
pub struct TriageEngine {
    profile: TriageProfile,
}

impl TriageEngine {
    #[must_use]
    pub fn new(profile: TriageProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub fn profile(&self) -> &TriageProfile {
        &self.profile
    }

    /// Analyze raw symptom ids. Fails only on an empty selection.
    pub fn analyze<I>(&self, catalog: &Catalog, ids: I) -> Result<Analysis>
    where
        I: IntoIterator<Item = SymptomId>,
    {
        let selection = Selection::new(ids)?;
        Ok(self.analyze_selection(catalog, selection))
    }

    #[must_use]
    pub fn analyze_selection(&self, catalog: &Catalog, selection: Selection) -> Analysis {
        let records = score(&selection, catalog);
        let total_matches = records.len();
        let critical = self.profile.critical_symptoms();

        if records.is_empty() {
            let triage = TriageClassifier::classify(&records, &selection, critical);
            log::info!("No conditions matched {} selected symptoms", selection.len());
            return Analysis {
                selection,
                total_matches,
                outcome: AnalysisOutcome::NoMatches {
                    triage: (!triage.critical_hits.is_empty()).then_some(triage),
                },
            };
        }

        let triage = TriageClassifier::classify(&records, &selection, critical);
        let ranked = rank_with(records, self.profile.result_limit(), self.profile.tie_break());

        log::info!(
            "Analysis: {} selected, {total_matches} matched, triage {}",
            selection.len(),
            triage.level
        );

        Analysis {
            selection,
            total_matches,
            outcome: AnalysisOutcome::Matches { triage, ranked },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TriageLevel;
    use crate::error::TriageError;
    use healbuddy_catalog::{Condition, Severity, Symptom};

    fn catalog() -> Catalog {
        Catalog::builder()
            .symptom(Symptom::new(8, "Chest Pain", "Cardiovascular"))
            .symptom(Symptom::new(40, "Hiccups", "General"))
            .symptom(Symptom::new(41, "Yawning", "General"))
            .condition(Condition::new(1, "Fatigue Syndrome", "General", Severity::Mild))
            .association(1, 41, 0.5)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_selection_is_an_error() {
        let engine = TriageEngine::default();
        let err = engine.analyze(&catalog(), Vec::new()).unwrap_err();
        assert_eq!(err, TriageError::EmptySelection);
    }

    #[test]
    fn no_matches_is_distinct_from_empty_selection() {
        let engine = TriageEngine::default();
        let analysis = engine.analyze(&catalog(), [40]).unwrap();

        assert!(analysis.is_no_match());
        assert_eq!(analysis.total_matches, 0);
        assert!(analysis.top_match().is_none());
        assert!(analysis.triage().is_none());
    }

    #[test]
    fn no_matches_still_flags_critical_symptoms() {
        let engine = TriageEngine::default();
        let analysis = engine.analyze(&catalog(), [8, 40]).unwrap();

        assert!(analysis.is_no_match());
        let triage = analysis.triage().unwrap();
        assert_eq!(triage.level, TriageLevel::Urgent);
        assert_eq!(triage.critical_hits[0].label, "Chest Pain");
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let engine = TriageEngine::default();
        let analysis = engine.analyze(&catalog(), [41]).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["outcome"]["status"], "matches");
        assert_eq!(json["outcome"]["triage"]["level"], "LOW");
        assert_eq!(json["selection"], serde_json::json!([41]));
        assert_eq!(json["outcome"]["ranked"][0]["score"], 50.0);
    }
}
