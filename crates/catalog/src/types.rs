use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub type SymptomId = u32;
pub type ConditionId = u32;

/// Symptom a user can select (e.g., "Chest Pain" in "Cardiovascular")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symptom {
    pub id: SymptomId,
    pub name: String,
    pub category: String,
}

impl Symptom {
    pub fn new(id: SymptomId, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Clinical severity of a condition.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Mild < Moderate < Severe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Monotonic raise: never lowers an already raised severity.
    #[must_use]
    pub fn raise(self, other: Self) -> Self {
        self.max(other)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Candidate condition scored against a selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub id: ConditionId,
    pub name: String,
    pub category: String,
    pub severity: Severity,
}

impl Condition {
    pub fn new(
        id: ConditionId,
        name: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            severity,
        }
    }
}

/// Sparse condition -> symptom -> weight relation.
///
/// A missing entry means "no association".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationTable {
    by_condition: HashMap<ConditionId, HashMap<SymptomId, f64>>,
}

impl AssociationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the weight for a (condition, symptom) pair
    pub fn insert(&mut self, condition: ConditionId, symptom: SymptomId, weight: f64) {
        self.by_condition
            .entry(condition)
            .or_default()
            .insert(symptom, weight);
    }

    #[must_use]
    pub fn weights_for(&self, condition: ConditionId) -> Option<&HashMap<SymptomId, f64>> {
        self.by_condition.get(&condition)
    }

    #[must_use]
    pub fn weight(&self, condition: ConditionId, symptom: SymptomId) -> Option<f64> {
        self.weights_for(condition)
            .and_then(|weights| weights.get(&symptom))
            .copied()
    }

    /// Number of (condition, symptom) pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_condition.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.by_condition.len()
    }
}

impl FromIterator<(ConditionId, SymptomId, f64)> for AssociationTable {
    fn from_iter<I: IntoIterator<Item = (ConditionId, SymptomId, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (condition, symptom, weight) in iter {
            table.insert(condition, symptom, weight);
        }
        table
    }
}
