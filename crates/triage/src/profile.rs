use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use healbuddy_catalog::SymptomId;
use serde::Deserialize;

use crate::classifier::CriticalSymptoms;
use crate::ranker::{TieBreak, DEFAULT_RESULT_LIMIT};

const BUILTIN_DEFAULT: &str = include_str!("../../../profiles/default.json");
const BUILTIN_DETERMINISTIC: &str = include_str!("../../../profiles/deterministic.json");

/// Triage policy: critical symptoms, result cap and tie handling
#[derive(Clone, Debug)]
pub struct TriageProfile {
    name: String,
    description: Option<String>,
    critical_symptoms: CriticalSymptoms,
    result_limit: usize,
    tie_break: TieBreak,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
    #[serde(default)]
    schema_version: Option<u32>,
    name: Option<String>,
    description: Option<String>,
    critical_symptoms: Option<Vec<RawCriticalSymptom>>,
    result_limit: Option<usize>,
    tie_break: Option<TieBreak>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCriticalSymptom {
    id: SymptomId,
    label: String,
}

impl TriageProfile {
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "default" => Some(
                Self::from_bytes("default", BUILTIN_DEFAULT.as_bytes(), None)
                    .expect("builtin default profile must parse"),
            ),
            "deterministic" => Self::from_bytes(
                "deterministic",
                BUILTIN_DETERMINISTIC.as_bytes(),
                Some("default"),
            )
            .ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn default_profile() -> Self {
        Self::builtin("default").expect("default profile is bundled")
    }

    /// Builtin profile by name, otherwise a profile file path
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if let Some(profile) = Self::builtin(name_or_path) {
            return Ok(profile);
        }
        let path = Path::new(name_or_path);
        if !path.is_file() {
            return Err(anyhow!(
                "Unknown profile '{name_or_path}' (builtin: default, deterministic)"
            ));
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(name_or_path);
        Self::from_file(name, path)
    }

    /// User profile file, always layered over the bundled default
    pub fn from_file(profile_name: &str, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        Self::from_bytes(profile_name, &bytes, Some("default"))
    }

    pub fn from_bytes(profile_name: &str, bytes: &[u8], base: Option<&str>) -> Result<Self> {
        let raw = parse_raw(bytes).with_context(|| {
            format!("Profile '{profile_name}' is not valid JSON/TOML configuration")
        })?;
        let merged_raw = if let Some(base_name) = base {
            let base_raw = builtin_raw(base_name)?;
            merge_raw_profiles(base_raw, raw)
        } else {
            raw
        };
        Self::from_raw(merged_raw, profile_name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn critical_symptoms(&self) -> &CriticalSymptoms {
        &self.critical_symptoms
    }

    #[must_use]
    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    #[must_use]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn with_result_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(anyhow!("result_limit must be > 0"));
        }
        self.result_limit = limit;
        Ok(self)
    }

    #[must_use]
    pub fn with_critical_symptoms(mut self, critical: CriticalSymptoms) -> Self {
        self.critical_symptoms = critical;
        self
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    fn from_raw(raw: RawProfile, fallback_name: &str) -> Result<Self> {
        if let Some(schema_version) = raw.schema_version {
            if schema_version != 1 {
                return Err(anyhow!(
                    "profile.schema_version {schema_version} is not supported (expected 1)"
                ));
            }
        }

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let result_limit = raw.result_limit.unwrap_or(DEFAULT_RESULT_LIMIT);
        if result_limit == 0 {
            return Err(anyhow!("profile '{name}': result_limit must be > 0"));
        }

        let critical_symptoms = build_critical_symptoms(raw.critical_symptoms.unwrap_or_default())
            .with_context(|| format!("Invalid critical_symptoms for profile '{name}'"))?;

        Ok(Self {
            name,
            description: raw.description,
            critical_symptoms,
            result_limit,
            tie_break: raw.tie_break.unwrap_or_default(),
        })
    }
}

impl Default for TriageProfile {
    fn default() -> Self {
        Self::default_profile()
    }
}

fn build_critical_symptoms(raw: Vec<RawCriticalSymptom>) -> Result<CriticalSymptoms> {
    let mut seen = HashSet::new();
    let mut critical = CriticalSymptoms::new();
    for (idx, entry) in raw.into_iter().enumerate() {
        if entry.id == 0 {
            return Err(anyhow!("critical_symptoms[{idx}].id must be > 0"));
        }
        if entry.label.trim().is_empty() {
            return Err(anyhow!("critical_symptoms[{idx}].label must not be empty"));
        }
        if !seen.insert(entry.id) {
            return Err(anyhow!(
                "critical_symptoms[{idx}].id {} is listed twice",
                entry.id
            ));
        }
        critical.insert(entry.id, entry.label);
    }
    Ok(critical)
}

fn builtin_raw(name: &str) -> Result<RawProfile> {
    let bytes = match name {
        "default" => BUILTIN_DEFAULT,
        "deterministic" => BUILTIN_DETERMINISTIC,
        _ => return Err(anyhow!("Unknown base profile '{name}'")),
    };
    parse_raw(bytes.as_bytes())
}

fn merge_raw_profiles(base: RawProfile, overlay: RawProfile) -> RawProfile {
    RawProfile {
        schema_version: overlay.schema_version.or(base.schema_version),
        // identity is never inherited from the base
        name: overlay.name,
        description: overlay.description,
        critical_symptoms: overlay.critical_symptoms.or(base.critical_symptoms),
        result_limit: overlay.result_limit.or(base.result_limit),
        tie_break: overlay.tie_break.or(base.tie_break),
    }
}

fn parse_raw(bytes: &[u8]) -> Result<RawProfile> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!(
                    "Profile is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                )
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML profile to JSON: {err}"))?
        }
    };

    serde_json::from_value(value).map_err(|err| anyhow!("Profile parse error: {err}"))
}
