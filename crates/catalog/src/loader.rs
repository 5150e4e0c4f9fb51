use std::path::Path;

use serde::Deserialize;

use crate::error::{CatalogError, Result};
use crate::store::{Catalog, CatalogBuilder, RowKind};
use crate::types::{Condition, Severity, Symptom};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default)]
    schema_version: Option<u32>,
    #[serde(default)]
    symptoms: Vec<RawSymptom>,
    #[serde(default)]
    conditions: Vec<RawCondition>,
    #[serde(default)]
    associations: Vec<RawAssociation>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSymptom {
    id: i64,
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    id: i64,
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    severity: Option<String>,
}

// TOML `nan`/`inf` become JSON null on conversion, so weights stay optional
// and missing values are dropped by the ingestion filter.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAssociation {
    condition_id: i64,
    symptom_id: i64,
    weight: Option<f64>,
}

impl Catalog {
    /// Catalog compiled into the binary
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_bytes(BUILTIN_CATALOG.as_bytes()).expect("builtin catalog must parse")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(|err| match err {
            CatalogError::ParseError(msg) => {
                CatalogError::ParseError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a JSON or TOML catalog document
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw = parse_raw(bytes)?;
        if let Some(schema_version) = raw.schema_version {
            if schema_version != 1 {
                return Err(CatalogError::UnsupportedSchema(schema_version));
            }
        }
        builder_from_raw(raw).build()
    }
}

fn parse_raw(bytes: &[u8]) -> Result<RawCatalog> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes)
                .map_err(|err| CatalogError::ParseError(format!("{json_err}; {err}")))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                CatalogError::ParseError(format!(
                    "catalog is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                ))
            })?;
            serde_json::to_value(toml_value).map_err(|err| {
                CatalogError::ParseError(format!("failed to convert TOML catalog to JSON: {err}"))
            })?
        }
    };

    serde_json::from_value(value).map_err(|err| CatalogError::ParseError(err.to_string()))
}

fn builder_from_raw(raw: RawCatalog) -> CatalogBuilder {
    let mut builder = Catalog::builder();

    for row in raw.symptoms {
        let Ok(id) = u32::try_from(row.id) else {
            builder.skip(RowKind::Symptom, &format!("id {} out of range", row.id));
            continue;
        };
        builder = builder.symptom(Symptom::new(
            id,
            row.name.unwrap_or_default(),
            row.category.unwrap_or_default(),
        ));
    }

    for row in raw.conditions {
        let Ok(id) = u32::try_from(row.id) else {
            builder.skip(RowKind::Condition, &format!("id {} out of range", row.id));
            continue;
        };
        let severity = match row.severity.as_deref().map(str::parse::<Severity>) {
            Some(Ok(severity)) => severity,
            Some(Err(err)) => {
                builder.skip(RowKind::Condition, &format!("condition {id}: {err}"));
                continue;
            }
            None => {
                builder.skip(RowKind::Condition, &format!("condition {id}: missing severity"));
                continue;
            }
        };
        builder = builder.condition(Condition::new(
            id,
            row.name.unwrap_or_default(),
            row.category.unwrap_or_default(),
            severity,
        ));
    }

    for row in raw.associations {
        let ids = u32::try_from(row.condition_id)
            .ok()
            .zip(u32::try_from(row.symptom_id).ok());
        let (Some((condition, symptom)), Some(weight)) = (ids, row.weight) else {
            builder.skip(
                RowKind::Association,
                &format!(
                    "condition={} symptom={} weight={:?}",
                    row.condition_id, row.symptom_id, row.weight
                ),
            );
            continue;
        };
        builder = builder.association(condition, symptom, weight);
    }

    builder
}
