use std::collections::BTreeMap;

use healbuddy_catalog::SymptomId;
use serde::{Deserialize, Serialize};

use crate::event::SessionEvent;

/// Sessions retained in the log; older entries are dropped first
pub const MAX_SESSIONS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub first_seen_unix_ms: u64,
    pub last_active_unix_ms: u64,
    pub queries_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_query: Option<SessionEvent>,
}

impl UserStats {
    fn first(event: &SessionEvent) -> Self {
        Self {
            first_seen_unix_ms: event.timestamp_unix_ms,
            last_active_unix_ms: event.timestamp_unix_ms,
            queries_count: 0,
            last_query: None,
        }
    }
}

/// Persistent usage log: capped session list plus running counters.
///
/// Counters are cumulative and survive session eviction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsLog {
    #[serde(default)]
    pub sessions: Vec<SessionEvent>,
    #[serde(default)]
    pub symptom_trends: BTreeMap<SymptomId, u64>,
    #[serde(default)]
    pub diagnosis_trends: BTreeMap<String, u64>,
    #[serde(default)]
    pub user_stats: BTreeMap<String, UserStats>,
}

impl AnalyticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: SessionEvent) {
        for &id in &event.symptoms {
            *self.symptom_trends.entry(id).or_insert(0) += 1;
        }
        if let Some(top) = &event.top_diagnosis {
            *self
                .diagnosis_trends
                .entry(top.condition_name.clone())
                .or_insert(0) += 1;
        }

        let stats = self
            .user_stats
            .entry(event.user.clone())
            .or_insert_with(|| UserStats::first(&event));
        stats.queries_count += 1;
        stats.last_active_unix_ms = event.timestamp_unix_ms;
        stats.last_query = Some(event.clone());

        self.sessions.push(event);
        if self.sessions.len() > MAX_SESSIONS {
            let excess = self.sessions.len() - MAX_SESSIONS;
            self.sessions.drain(..excess);
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn user_count(&self) -> usize {
        self.user_stats.len()
    }
}
