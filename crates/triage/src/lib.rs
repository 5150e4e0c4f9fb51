//! # HealBuddy Triage
//!
//! Scoring, triage classification and ranking for the symptom checker.
//!
//! ## Pipeline
//!
//! ```text
//! symptom ids
//!     │
//!     ├──> Selection (dedup, reject empty)
//!     │
//!     ├──> Scoring (Catalog, read-only)
//!     │      └─ score = 100 * Σ matched weights / |selection|
//!     │
//!     ├──> MatchRecord[] (every condition with ≥ 1 match)
//!     │      │
//!     │      ├──> TriageClassifier (full set)
//!     │      │      ├─ critical symptom in selection → URGENT
//!     │      │      ├─ any Severe condition         → URGENT
//!     │      │      ├─ any Moderate condition       → HIGH
//!     │      │      └─ otherwise                    → LOW
//!     │      │
//!     │      └──> Ranker (score desc, top-N)
//!     │
//!     └──> Analysis { Matches { triage, ranked } | NoMatches }
//! ```
//!
//! ## Example
//!
//! ```
//! use healbuddy_catalog::{Catalog, Condition, Severity, Symptom};
//! use healbuddy_triage::{TriageEngine, TriageLevel};
//!
//! let catalog = Catalog::builder()
//!     .symptom(Symptom::new(11, "Cough", "Respiratory"))
//!     .symptom(Symptom::new(21, "Fever", "General"))
//!     .condition(Condition::new(1, "Bronchitis", "Respiratory", Severity::Moderate))
//!     .association(1, 11, 0.5)
//!     .build()?;
//!
//! let analysis = TriageEngine::default().analyze(&catalog, [11, 21])?;
//! let top = analysis.top_match().unwrap();
//! assert_eq!(top.score, 25.0);
//! assert_eq!(analysis.triage().unwrap().level, TriageLevel::High);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod classifier;
mod engine;
mod error;
mod profile;
mod ranker;
mod scoring;
mod selection;

pub use classifier::{
    CriticalSymptom, CriticalSymptoms, TriageClassifier, TriageLevel, TriageResult, HIGH_MESSAGE,
    LOW_MESSAGE, URGENT_MESSAGE,
};
pub use engine::{Analysis, AnalysisOutcome, TriageEngine};
pub use error::{Result, TriageError};
pub use profile::TriageProfile;
pub use ranker::{rank, rank_with, TieBreak, DEFAULT_RESULT_LIMIT};
pub use scoring::{score, score_conditions, MatchRecord};
pub use selection::Selection;
