use crate::error::{Result, TriageError};
use healbuddy_catalog::SymptomId;
use serde::Serialize;
use std::collections::HashSet;

/// Symptom ids chosen for one analysis.
///
/// Duplicates are dropped, first-seen order is kept so matched ids are
/// reported in the order the user picked them. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<SymptomId>,
}

impl Selection {
    pub fn new<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = SymptomId>,
    {
        let mut seen = HashSet::new();
        let ids: Vec<SymptomId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Err(TriageError::EmptySelection);
        }
        Ok(Self { ids })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SymptomId> + '_ {
        self.ids.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, id: SymptomId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn ids(&self) -> &[SymptomId] {
        &self.ids
    }
}
