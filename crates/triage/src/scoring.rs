use crate::selection::Selection;
use healbuddy_catalog::{AssociationTable, Catalog, Condition, SymptomId};
use serde::Serialize;

/// Per-condition result of scoring one selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub condition: Condition,

    /// `100 * sum(matched weights) / |selection|`
    pub score: f64,

    pub match_count: usize,

    /// Matched ids in selection order
    pub matched_symptom_ids: Vec<SymptomId>,
}

/// Score every condition in the catalog against the selection
#[must_use]
pub fn score(selection: &Selection, catalog: &Catalog) -> Vec<MatchRecord> {
    score_conditions(selection, catalog.conditions(), catalog.associations())
}

/// Score `conditions` against the selection.
///
/// Conditions without a single matching symptom are omitted. The divisor is the
/// size of the whole selection, so unknown or unmatched ids dilute every score.
/// A weight of exactly zero counts as no association.
///
/// Records come out in `conditions` order.
#[must_use]
pub fn score_conditions(
    selection: &Selection,
    conditions: &[Condition],
    weights: &AssociationTable,
) -> Vec<MatchRecord> {
    #[allow(clippy::cast_precision_loss)]
    let denominator = selection.len() as f64;
    let mut records = Vec::new();

    for condition in conditions {
        let Some(condition_weights) = weights.weights_for(condition.id) else {
            continue;
        };

        let mut total = 0.0;
        let mut matched = Vec::new();
        for id in selection.iter() {
            match condition_weights.get(&id) {
                Some(&weight) if weight != 0.0 => {
                    total += weight;
                    matched.push(id);
                }
                _ => {}
            }
        }

        if matched.is_empty() {
            continue;
        }

        records.push(MatchRecord {
            condition: condition.clone(),
            score: (total / denominator) * 100.0,
            match_count: matched.len(),
            matched_symptom_ids: matched,
        });
    }

    log::debug!(
        "Scored {} of {} conditions against {} selected symptoms",
        records.len(),
        conditions.len(),
        selection.len()
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use healbuddy_catalog::Severity;
    use proptest::prelude::*;

    fn condition(id: u32, severity: Severity) -> Condition {
        Condition::new(id, format!("Condition {id}"), "Test", severity)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn score_divides_by_whole_selection() {
        let conditions = vec![condition(1, Severity::Mild)];
        let weights: AssociationTable = [(1, 1, 0.6), (1, 2, 0.3)].into_iter().collect();
        let selection = Selection::new([1, 2, 3]).unwrap();

        let records = score_conditions(&selection, &conditions, &weights);
        assert_eq!(records.len(), 1);
        assert!(approx(records[0].score, 30.0), "score={}", records[0].score);
        assert_eq!(records[0].match_count, 2);
        assert_eq!(records[0].matched_symptom_ids, vec![1, 2]);
    }

    #[test]
    fn matched_ids_follow_selection_order() {
        let conditions = vec![condition(1, Severity::Mild)];
        let weights: AssociationTable = [(1, 5, 0.5), (1, 9, 0.5)].into_iter().collect();
        let selection = Selection::new([9, 4, 5]).unwrap();

        let records = score_conditions(&selection, &conditions, &weights);
        assert_eq!(records[0].matched_symptom_ids, vec![9, 5]);
    }

    #[test]
    fn skips_conditions_without_matches_or_weights() {
        let conditions = vec![
            condition(1, Severity::Mild),
            condition(2, Severity::Severe),
            condition(3, Severity::Moderate),
        ];
        // condition 2 has weights but none selected, condition 3 has no table at all
        let weights: AssociationTable = [(1, 1, 0.5), (2, 7, 0.9)].into_iter().collect();
        let selection = Selection::new([1]).unwrap();

        let records = score_conditions(&selection, &conditions, &weights);
        let ids: Vec<u32> = records.iter().map(|r| r.condition.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn zero_weight_is_not_a_match() {
        let conditions = vec![condition(1, Severity::Mild)];
        let weights: AssociationTable = [(1, 1, 0.0), (1, 2, 0.4)].into_iter().collect();

        let only_zero = Selection::new([1]).unwrap();
        assert!(score_conditions(&only_zero, &conditions, &weights).is_empty());

        let both = Selection::new([1, 2]).unwrap();
        let records = score_conditions(&both, &conditions, &weights);
        assert_eq!(records[0].match_count, 1);
        assert!(approx(records[0].score, 20.0));
    }

    #[test]
    fn unknown_ids_dilute_score() {
        let conditions = vec![condition(1, Severity::Mild)];
        let weights: AssociationTable = [(1, 1, 1.0)].into_iter().collect();

        let alone = Selection::new([1]).unwrap();
        let diluted = Selection::new([1, 9_999]).unwrap();
        assert!(approx(score_conditions(&alone, &conditions, &weights)[0].score, 100.0));
        assert!(approx(score_conditions(&diluted, &conditions, &weights)[0].score, 50.0));
    }

    fn arb_table() -> impl Strategy<Value = Vec<(u32, u32, f64)>> {
        prop::collection::vec((1u32..8, 1u32..30, 0.01f64..=1.0), 0..60)
    }

    proptest! {
        #[test]
        fn proptest_every_record_has_a_match(
            rows in arb_table(),
            ids in prop::collection::vec(1u32..40, 1..12),
        ) {
            let conditions: Vec<Condition> =
                (1..8).map(|id| condition(id, Severity::Mild)).collect();
            let weights: AssociationTable = rows.into_iter().collect();
            let selection = Selection::new(ids).unwrap();

            for record in score_conditions(&selection, &conditions, &weights) {
                prop_assert!(record.match_count >= 1);
                prop_assert_eq!(record.match_count, record.matched_symptom_ids.len());
                for id in &record.matched_symptom_ids {
                    prop_assert!(selection.contains(*id));
                }
            }
        }

        #[test]
        fn proptest_unmatched_id_strictly_dilutes(
            rows in arb_table(),
            ids in prop::collection::vec(1u32..30, 1..10),
        ) {
            let conditions: Vec<Condition> =
                (1..8).map(|id| condition(id, Severity::Mild)).collect();
            let weights: AssociationTable = rows.into_iter().collect();
            let selection = Selection::new(ids.clone()).unwrap();
            // ids >= 1000 never appear in the generated tables
            let mut extended_ids = ids;
            extended_ids.push(1_000);
            let extended = Selection::new(extended_ids).unwrap();

            let before = score_conditions(&selection, &conditions, &weights);
            let after = score_conditions(&extended, &conditions, &weights);
            prop_assert_eq!(before.len(), after.len());
            for (b, a) in before.iter().zip(&after) {
                prop_assert_eq!(b.condition.id, a.condition.id);
                prop_assert_eq!(&b.matched_symptom_ids, &a.matched_symptom_ids);
                prop_assert!(a.score < b.score);
            }
        }
    }
}
