use crate::error::{CatalogError, Result};
use crate::types::{AssociationTable, Condition, ConditionId, Symptom, SymptomId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Row kinds tracked by the ingestion filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Symptom,
    Condition,
    Association,
}

/// Counts of rows dropped while building a catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub skipped_symptoms: usize,
    pub skipped_conditions: usize,
    pub skipped_associations: usize,
}

impl IngestReport {
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.skipped_symptoms + self.skipped_conditions + self.skipped_associations
    }
}

/// Immutable symptom/condition/association tables shared by every analysis.
///
/// There is no `&mut` API: once built, a catalog can be shared across threads
/// and analyses without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    symptoms: Vec<Symptom>,
    conditions: Vec<Condition>,
    associations: AssociationTable,
    symptom_index: HashMap<SymptomId, usize>,
    condition_index: HashMap<ConditionId, usize>,
    report: IngestReport,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Symptoms in catalog order
    #[must_use]
    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    /// Conditions in catalog order
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn associations(&self) -> &AssociationTable {
        &self.associations
    }

    #[must_use]
    pub fn symptom(&self, id: SymptomId) -> Option<&Symptom> {
        self.symptom_index.get(&id).map(|&idx| &self.symptoms[idx])
    }

    #[must_use]
    pub fn condition(&self, id: ConditionId) -> Option<&Condition> {
        self.condition_index
            .get(&id)
            .map(|&idx| &self.conditions[idx])
    }

    #[must_use]
    pub fn symptom_name(&self, id: SymptomId) -> Option<&str> {
        self.symptom(id).map(|s| s.name.as_str())
    }

    /// Distinct symptom categories, sorted
    #[must_use]
    pub fn categories(&self) -> BTreeSet<&str> {
        self.symptoms.iter().map(|s| s.category.as_str()).collect()
    }

    #[must_use]
    pub fn ingest_report(&self) -> IngestReport {
        self.report
    }
}

/// Collects raw catalog rows and filters malformed ones on `build`
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    symptoms: Vec<Symptom>,
    conditions: Vec<Condition>,
    associations: Vec<(ConditionId, SymptomId, f64)>,
    report: IngestReport,
}

impl CatalogBuilder {
    #[must_use]
    pub fn symptom(mut self, symptom: Symptom) -> Self {
        self.symptoms.push(symptom);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn association(mut self, condition: ConditionId, symptom: SymptomId, weight: f64) -> Self {
        self.associations.push((condition, symptom, weight));
        self
    }

    /// Record a row rejected before it could be turned into a typed value
    pub(crate) fn skip(&mut self, kind: RowKind, reason: &str) {
        log::warn!("Skipping malformed {kind:?} row: {reason}");
        match kind {
            RowKind::Symptom => self.report.skipped_symptoms += 1,
            RowKind::Condition => self.report.skipped_conditions += 1,
            RowKind::Association => self.report.skipped_associations += 1,
        }
    }

    pub fn build(mut self) -> Result<Catalog> {
        let mut symptoms = Vec::with_capacity(self.symptoms.len());
        let mut symptom_index = HashMap::new();
        for symptom in std::mem::take(&mut self.symptoms) {
            if symptom.id == 0 || symptom.name.trim().is_empty() {
                self.skip(
                    RowKind::Symptom,
                    &format!("id={} name={:?}", symptom.id, symptom.name),
                );
                continue;
            }
            if symptom_index.insert(symptom.id, symptoms.len()).is_some() {
                return Err(CatalogError::DuplicateSymptom(symptom.id));
            }
            symptoms.push(symptom);
        }

        let mut conditions = Vec::with_capacity(self.conditions.len());
        let mut condition_index = HashMap::new();
        for condition in std::mem::take(&mut self.conditions) {
            if condition.id == 0 || condition.name.trim().is_empty() {
                self.skip(
                    RowKind::Condition,
                    &format!("id={} name={:?}", condition.id, condition.name),
                );
                continue;
            }
            if condition_index
                .insert(condition.id, conditions.len())
                .is_some()
            {
                return Err(CatalogError::DuplicateCondition(condition.id));
            }
            conditions.push(condition);
        }

        let mut associations = AssociationTable::new();
        for (condition, symptom, weight) in std::mem::take(&mut self.associations) {
            if condition == 0 || symptom == 0 || !weight.is_finite() {
                self.skip(
                    RowKind::Association,
                    &format!("condition={condition} symptom={symptom} weight={weight}"),
                );
                continue;
            }
            if !condition_index.contains_key(&condition) {
                self.skip(
                    RowKind::Association,
                    &format!("condition {condition} is not in the catalog"),
                );
                continue;
            }
            associations.insert(condition, symptom, weight);
        }

        log::debug!(
            "Catalog built: {} symptoms, {} conditions, {} associations ({} rows skipped)",
            symptoms.len(),
            conditions.len(),
            associations.len(),
            self.report.total_skipped()
        );

        Ok(Catalog {
            symptoms,
            conditions,
            associations,
            symptom_index,
            condition_index,
            report: self.report,
        })
    }
}
