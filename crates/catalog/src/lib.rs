//! # HealBuddy Catalog
//!
//! Symptom, condition and weighted association tables for the symptom checker.
//!
//! ## Data flow
//!
//! ```text
//! catalog.json / catalog.toml
//!     │
//!     ├──> Loader (JSON or TOML, unknown fields rejected)
//!     │      └─> raw rows
//!     │
//!     ├──> CatalogBuilder (ingestion filter)
//!     │      ├─ drop id 0 / empty names / non-finite weights
//!     │      ├─ drop associations for unknown conditions
//!     │      └─ reject duplicate ids
//!     │
//!     └──> Catalog (immutable, shared read-only)
//!            ├─ symptoms, conditions (catalog order)
//!            └─ AssociationTable: condition -> symptom -> weight
//! ```
//!
//! ## Example
//!
//! ```
//! use healbuddy_catalog::{Catalog, Condition, Severity, Symptom};
//!
//! let catalog = Catalog::builder()
//!     .symptom(Symptom::new(10, "Cough", "Respiratory"))
//!     .condition(Condition::new(1, "Bronchitis", "Respiratory", Severity::Moderate))
//!     .association(1, 10, 0.8)
//!     .build()?;
//!
//! assert_eq!(catalog.associations().weight(1, 10), Some(0.8));
//! # Ok::<(), healbuddy_catalog::CatalogError>(())
//! ```

mod error;
mod loader;
mod search;
mod store;
mod types;

pub use error::{CatalogError, Result};
pub use search::{filter_symptoms, SymptomSearch};
pub use store::{Catalog, CatalogBuilder, IngestReport, RowKind};
pub use types::{AssociationTable, Condition, ConditionId, Severity, Symptom, SymptomId};
