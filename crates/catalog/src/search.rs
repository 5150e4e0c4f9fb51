use crate::types::Symptom;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

/// Case-insensitive substring filter on symptom names.
///
/// An empty (or whitespace-only) needle keeps every symptom.
#[must_use]
pub fn filter_symptoms<'a>(symptoms: &'a [Symptom], needle: &str) -> Vec<&'a Symptom> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return symptoms.iter().collect();
    }
    symptoms
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

/// Fuzzy symptom lookup using nucleo-matcher
pub struct SymptomSearch {
    matcher: Matcher,
}

impl SymptomSearch {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Match against symptom names and categories.
    /// Returns (symptom_index, score) sorted by score descending, scores normalized to 0-1
    pub fn search(&mut self, query: &str, symptoms: &[Symptom], limit: usize) -> Vec<(usize, f32)> {
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(usize, u32)> = symptoms
            .iter()
            .enumerate()
            .filter_map(|(idx, symptom)| {
                let name = Utf32String::from(symptom.name.as_str());
                let name_score = pattern.score(name.slice(..), &mut self.matcher);

                let category = Utf32String::from(symptom.category.as_str());
                // Category hits rank below any name hit of similar quality
                let category_score = pattern
                    .score(category.slice(..), &mut self.matcher)
                    .map(|s| s / 2);

                let best = name_score.into_iter().chain(category_score).max()?;
                Some((idx, best))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        let max_score = scored.first().map(|(_, s)| *s as f32).unwrap_or(1.0);

        scored
            .into_iter()
            .map(|(idx, score)| {
                let normalized = if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                };
                (idx, normalized)
            })
            .collect()
    }
}

impl Default for SymptomSearch {
    fn default() -> Self {
        Self::new()
    }
}
