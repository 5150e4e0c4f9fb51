use std::collections::BTreeMap;

use serde::Serialize;

use crate::event::SessionEvent;
use crate::history::{AnalyticsLog, UserStats};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;
pub const TOP_ITEMS_LIMIT: usize = 10;
pub const RECENT_SESSIONS_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendItem<K> {
    pub key: K,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_sessions: usize,
    pub total_users: usize,
    pub last_7_days: usize,
    pub last_30_days: usize,
    pub top_symptoms: Vec<TrendItem<u32>>,
    pub top_diagnoses: Vec<TrendItem<String>>,
    /// Share of users with more than one query, as a rounded percentage
    pub user_retention_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedStats<'a> {
    pub total_sessions: usize,
    pub total_unique_users: usize,
    pub average_symptoms_per_query: f64,
    pub recent_sessions: &'a [SessionEvent],
    pub users: &'a BTreeMap<String, UserStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// UTC calendar day, `YYYY-MM-DD`
    pub date: String,
    pub sessions: usize,
}

/// Dashboard summary as of `now_unix_ms`
pub fn summary(log: &AnalyticsLog, now_unix_ms: u64) -> Summary {
    let since = |days: u64| {
        let cutoff = now_unix_ms.saturating_sub(days * DAY_MS);
        log.sessions
            .iter()
            .filter(|s| s.timestamp_unix_ms > cutoff)
            .count()
    };

    Summary {
        total_sessions: log.session_count(),
        total_users: log.user_count(),
        last_7_days: since(7),
        last_30_days: since(30),
        top_symptoms: top_items(&log.symptom_trends, TOP_ITEMS_LIMIT),
        top_diagnoses: top_items(&log.diagnosis_trends, TOP_ITEMS_LIMIT),
        user_retention_pct: retention_pct(&log.user_stats),
    }
}

/// Highest counts first; equal counts keep key order
pub fn top_items<K: Clone + Ord>(counts: &BTreeMap<K, u64>, limit: usize) -> Vec<TrendItem<K>> {
    let mut items: Vec<TrendItem<K>> = counts
        .iter()
        .map(|(key, &count)| TrendItem {
            key: key.clone(),
            count,
        })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count));
    items.truncate(limit);
    items
}

fn retention_pct(users: &BTreeMap<String, UserStats>) -> u32 {
    if users.is_empty() {
        return 0;
    }
    let returning = users.values().filter(|u| u.queries_count > 1).count();
    let pct = (returning as f64 / users.len() as f64) * 100.0;
    pct.round() as u32
}

pub fn detailed_stats(log: &AnalyticsLog) -> DetailedStats<'_> {
    let total = log.sessions.len();
    let average = if total == 0 {
        0.0
    } else {
        let selected: usize = log.sessions.iter().map(|s| s.symptoms_selected).sum();
        ((selected as f64 / total as f64) * 10.0).round() / 10.0
    };
    let recent_start = total.saturating_sub(RECENT_SESSIONS_LIMIT);

    DetailedStats {
        total_sessions: total,
        total_unique_users: log.user_count(),
        average_symptoms_per_query: average,
        recent_sessions: &log.sessions[recent_start..],
        users: &log.user_stats,
    }
}

/// Sessions per UTC day, oldest day first
pub fn daily_activity(sessions: &[SessionEvent]) -> Vec<DailyCount> {
    let mut days: BTreeMap<String, usize> = BTreeMap::new();
    for session in sessions {
        let Ok(millis) = i64::try_from(session.timestamp_unix_ms) else {
            continue;
        };
        let Some(at) = chrono::DateTime::from_timestamp_millis(millis) else {
            log::warn!("Skipping session with out-of-range timestamp {millis}");
            continue;
        };
        *days.entry(at.date_naive().to_string()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(date, sessions)| DailyCount { date, sessions })
        .collect()
}
