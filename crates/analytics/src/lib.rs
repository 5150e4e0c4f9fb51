//! # HealBuddy Analytics
//!
//! Usage log for symptom-check sessions and the admin summaries built from it.
//!
//! ```text
//! Analysis ──> SessionEvent ──> AnalyticsLog::record
//!                                   ├─ sessions (last 1000)
//!                                   ├─ symptom / diagnosis counters
//!                                   └─ per-user stats
//!                                          │
//!              AnalyticsStore (JSON) <─────┤
//!                                          └──> summary / detailed_stats / daily_activity
//! ```

mod error;
mod event;
mod history;
mod store;
mod summary;

pub use error::{AnalyticsError, Result};
pub use event::{current_unix_ms, SessionEvent, TopDiagnosis};
pub use history::{AnalyticsLog, UserStats, MAX_SESSIONS};
pub use store::AnalyticsStore;
pub use summary::{
    daily_activity, detailed_stats, summary, top_items, DailyCount, DetailedStats, Summary,
    TrendItem, RECENT_SESSIONS_LIMIT, TOP_ITEMS_LIMIT,
};
