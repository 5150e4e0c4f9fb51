use healbuddy_catalog::{Catalog, Condition, Severity, Symptom};
use healbuddy_triage::{
    rank, score, AnalysisOutcome, CriticalSymptoms, Selection, TriageClassifier, TriageEngine,
    TriageError, TriageLevel, TriageProfile, HIGH_MESSAGE,
};
use pretty_assertions::assert_eq;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn no_critical_engine() -> TriageEngine {
    TriageEngine::new(TriageProfile::default_profile().with_critical_symptoms(CriticalSymptoms::new()))
}

#[test]
fn two_condition_scenario() {
    let catalog = Catalog::builder()
        .symptom(Symptom::new(10, "Cough", "Respiratory"))
        .symptom(Symptom::new(20, "Fever", "General"))
        .condition(Condition::new(1, "A", "Test", Severity::Moderate))
        .condition(Condition::new(2, "B", "Test", Severity::Mild))
        .association(1, 10, 0.5)
        .association(2, 10, 0.2)
        .association(2, 20, 0.8)
        .build()
        .unwrap();

    let analysis = no_critical_engine().analyze(&catalog, [10, 20]).unwrap();
    assert_eq!(analysis.total_matches, 2);

    let AnalysisOutcome::Matches { triage, ranked } = &analysis.outcome else {
        panic!("expected matches, got {:?}", analysis.outcome);
    };

    let names: Vec<&str> = ranked.iter().map(|r| r.condition.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert!(approx(ranked[0].score, 50.0));
    assert_eq!(ranked[0].match_count, 2);
    assert_eq!(ranked[0].matched_symptom_ids, vec![10, 20]);
    assert!(approx(ranked[1].score, 25.0));
    assert_eq!(ranked[1].match_count, 1);

    assert_eq!(triage.level, TriageLevel::High);
    assert_eq!(triage.message, HIGH_MESSAGE);
    assert_eq!(triage.max_severity, Severity::Moderate);
    assert!(triage.critical_hits.is_empty());
}

#[test]
fn severe_condition_outside_top_n_still_escalates() {
    // 20 mild conditions with strong weights on symptom 1, one severe condition
    // with a tiny weight that ranks last
    let mut builder = Catalog::builder().symptom(Symptom::new(1, "Fatigue", "General"));
    for id in 1..=20u32 {
        builder = builder
            .condition(Condition::new(id, format!("Mild {id}"), "Test", Severity::Mild))
            .association(id, 1, 0.5 + f64::from(id) / 100.0);
    }
    let catalog = builder
        .condition(Condition::new(99, "Severe", "Test", Severity::Severe))
        .association(99, 1, 0.01)
        .build()
        .unwrap();

    let analysis = no_critical_engine().analyze(&catalog, [1]).unwrap();

    assert_eq!(analysis.total_matches, 21);
    assert_eq!(analysis.ranked().len(), 15);
    assert!(analysis.ranked().iter().all(|r| r.condition.id != 99));
    assert_eq!(analysis.triage().unwrap().level, TriageLevel::Urgent);
    assert_eq!(analysis.triage().unwrap().max_severity, Severity::Severe);
}

#[test]
fn composed_operations_match_engine() {
    let catalog = Catalog::builtin();
    let profile = TriageProfile::default_profile();
    let selection = Selection::new([1, 4, 20]).unwrap();

    let records = score(&selection, &catalog);
    let triage = TriageClassifier::classify(&records, &selection, profile.critical_symptoms());
    let ranked = rank(records, profile.result_limit());

    let analysis = TriageEngine::new(profile).analyze_selection(&catalog, selection);
    assert_eq!(analysis.ranked(), ranked.as_slice());
    assert_eq!(analysis.triage(), Some(&triage));
}

#[test]
fn builtin_catalog_flu_like_selection() {
    let catalog = Catalog::builtin();
    // Fever, Muscle Aches, Fatigue, Chills
    let analysis = TriageEngine::default()
        .analyze(&catalog, [1, 7, 2, 20])
        .unwrap();

    let top = analysis.top_match().unwrap();
    assert_eq!(top.condition.name, "Influenza");
    assert_eq!(top.match_count, 4);
    assert!(approx(top.score, 100.0 * (0.9 + 0.8 + 0.7 + 0.7) / 4.0));
    // Pneumonia matches Fever and Chills, so the session escalates
    assert_eq!(analysis.triage().unwrap().level, TriageLevel::Urgent);
}

#[test]
fn builtin_catalog_chest_pain_is_urgent() {
    let catalog = Catalog::builtin();
    let analysis = TriageEngine::default().analyze(&catalog, [8]).unwrap();

    let triage = analysis.triage().unwrap();
    assert_eq!(triage.level, TriageLevel::Urgent);
    assert_eq!(triage.critical_hits.len(), 1);
    assert_eq!(triage.critical_hits[0].label, "Chest Pain");
    assert_eq!(analysis.top_match().unwrap().condition.name, "Heart Attack");
}

#[test]
fn builtin_catalog_mild_selection_is_low() {
    let catalog = Catalog::builtin();
    // Sneezing, Itchy Eyes
    let analysis = TriageEngine::default().analyze(&catalog, [15, 16]).unwrap();

    assert_eq!(analysis.top_match().unwrap().condition.name, "Seasonal Allergies");
    assert_eq!(analysis.triage().unwrap().level, TriageLevel::Low);
}

#[test]
fn empty_selection_never_yields_records() {
    let catalog = Catalog::builtin();
    let err = TriageEngine::default()
        .analyze(&catalog, std::iter::empty())
        .unwrap_err();
    assert_eq!(err, TriageError::EmptySelection);
}

#[test]
fn unknown_ids_only_is_no_match() {
    let catalog = Catalog::builtin();
    let analysis = TriageEngine::default()
        .analyze(&catalog, [5_000, 5_001])
        .unwrap();
    assert!(analysis.is_no_match());
    assert!(analysis.triage().is_none());
}

#[test]
fn deterministic_profile_breaks_ties_by_id() {
    let catalog = Catalog::builder()
        .symptom(Symptom::new(1, "Fatigue", "General"))
        .condition(Condition::new(30, "Late", "Test", Severity::Mild))
        .condition(Condition::new(10, "Early", "Test", Severity::Mild))
        .association(30, 1, 0.5)
        .association(10, 1, 0.5)
        .build()
        .unwrap();

    let stable = TriageEngine::default().analyze(&catalog, [1]).unwrap();
    let ids: Vec<u32> = stable.ranked().iter().map(|r| r.condition.id).collect();
    assert_eq!(ids, vec![30, 10]);

    let deterministic = TriageEngine::new(TriageProfile::builtin("deterministic").unwrap())
        .analyze(&catalog, [1])
        .unwrap();
    let ids: Vec<u32> = deterministic.ranked().iter().map(|r| r.condition.id).collect();
    assert_eq!(ids, vec![10, 30]);
}
