use chrono::{DateTime, Utc};
use healbuddy_analytics::{DailyCount, DetailedStats, SessionEvent, Summary, UserStats};
use healbuddy_catalog::{Catalog, Symptom, SymptomId};
use healbuddy_triage::{Analysis, AnalysisOutcome, TriageResult};

const USERS_LIMIT: usize = 20;

pub const DISCLAIMER: &str =
    "Note: This is not medical advice. For serious symptoms, consult a doctor.";

pub fn render_analysis(analysis: &Analysis, catalog: &Catalog) -> String {
    let mut out = String::new();

    match &analysis.outcome {
        AnalysisOutcome::NoMatches { triage } => {
            if let Some(triage) = triage {
                push_banner(&mut out, triage);
            }
            out.push_str("No matches. Try selecting different symptoms.\n");
        }
        AnalysisOutcome::Matches { triage, ranked } => {
            push_banner(&mut out, triage);
            let selected = analysis.selection.len();
            for (idx, record) in ranked.iter().enumerate() {
                out.push_str(&format!(
                    "{}. {} ({}, {})  {:.1}%\n",
                    idx + 1,
                    record.condition.name,
                    record.condition.category,
                    record.condition.severity,
                    record.score
                ));
                out.push_str(&format!(
                    "   {}/{} symptoms matched: {}\n",
                    record.match_count,
                    selected,
                    symptom_names(catalog, &record.matched_symptom_ids)
                ));
            }
            if analysis.total_matches > ranked.len() {
                out.push_str(&format!(
                    "({} more conditions not shown)\n",
                    analysis.total_matches - ranked.len()
                ));
            }
        }
    }

    out.push('\n');
    out.push_str(DISCLAIMER);
    out
}

fn push_banner(out: &mut String, triage: &TriageResult) {
    out.push_str(&format!("[{} PRIORITY] {}\n", triage.level, triage.message));
    if !triage.critical_hits.is_empty() {
        let labels: Vec<&str> = triage
            .critical_hits
            .iter()
            .map(|hit| hit.label.as_str())
            .collect();
        out.push_str(&format!("Critical symptoms: {}\n", labels.join(", ")));
    }
    out.push('\n');
}

fn symptom_names(catalog: &Catalog, ids: &[SymptomId]) -> String {
    ids.iter()
        .map(|&id| symptom_label(catalog, id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn symptom_label(catalog: &Catalog, id: SymptomId) -> String {
    catalog
        .symptom_name(id)
        .map_or_else(|| format!("#{id}"), str::to_string)
}

pub fn render_symptoms(symptoms: &[&Symptom]) -> String {
    if symptoms.is_empty() {
        return "No symptoms found".to_string();
    }
    symptoms
        .iter()
        .map(|s| format!("{:>4}  {} ({})", s.id, s.name, s.category))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(
    summary: &Summary,
    detailed: &DetailedStats<'_>,
    daily: &[DailyCount],
    recent: usize,
    catalog: &Catalog,
) -> String {
    let mut md = String::new();
    md.push_str("# HealBuddy usage\n\n");
    md.push_str(&format!("- Sessions: `{}`\n", summary.total_sessions));
    md.push_str(&format!("- Users: `{}`\n", summary.total_users));
    md.push_str(&format!("- Last 7 days: `{}`\n", summary.last_7_days));
    md.push_str(&format!("- Last 30 days: `{}`\n", summary.last_30_days));
    md.push_str(&format!("- Retention: `{}%`\n", summary.user_retention_pct));
    md.push_str(&format!(
        "- Avg symptoms per query: `{:.1}`\n\n",
        detailed.average_symptoms_per_query
    ));

    md.push_str("## Top symptoms\n\n");
    md.push_str("| symptom | count |\n|---|---:|\n");
    for item in &summary.top_symptoms {
        md.push_str(&format!(
            "| {} | {} |\n",
            symptom_label(catalog, item.key),
            item.count
        ));
    }
    md.push('\n');

    md.push_str("## Top diagnoses\n\n");
    md.push_str("| diagnosis | count |\n|---|---:|\n");
    for item in &summary.top_diagnoses {
        md.push_str(&format!("| {} | {} |\n", item.key, item.count));
    }
    md.push('\n');

    md.push_str("## Daily activity\n\n");
    md.push_str("| date | sessions |\n|---|---:|\n");
    for day in daily {
        md.push_str(&format!("| {} | {} |\n", day.date, day.sessions));
    }
    md.push('\n');

    md.push_str("## Recent sessions\n\n");
    md.push_str("| user | symptoms | top diagnosis | score |\n|---|---:|---|---:|\n");
    for session in detailed.recent_sessions.iter().rev().take(recent) {
        md.push_str(&session_row(session));
    }
    md.push('\n');

    md.push_str("## Users\n\n");
    md.push_str("| user | first seen | last active | queries |\n|---|---|---|---:|\n");
    for (user, stats) in most_recent_users(detailed) {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            user,
            format_day(stats.first_seen_unix_ms),
            format_timestamp(stats.last_active_unix_ms),
            stats.queries_count
        ));
    }

    md
}

/// Users by last activity, newest first
fn most_recent_users<'a>(detailed: &DetailedStats<'a>) -> Vec<(&'a str, &'a UserStats)> {
    let mut users: Vec<(&str, &UserStats)> = detailed
        .users
        .iter()
        .map(|(user, stats)| (user.as_str(), stats))
        .collect();
    users.sort_by(|a, b| b.1.last_active_unix_ms.cmp(&a.1.last_active_unix_ms));
    users.truncate(USERS_LIMIT);
    users
}

fn format_day(unix_ms: u64) -> String {
    to_datetime(unix_ms).map_or_else(|| "n/a".to_string(), |at| at.date_naive().to_string())
}

fn format_timestamp(unix_ms: u64) -> String {
    to_datetime(unix_ms).map_or_else(
        || "n/a".to_string(),
        |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

fn to_datetime(unix_ms: u64) -> Option<DateTime<Utc>> {
    i64::try_from(unix_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

fn session_row(session: &SessionEvent) -> String {
    let (name, score) = session
        .top_diagnosis
        .as_ref()
        .map_or(("None", 0.0), |top| (top.condition_name.as_str(), top.score));
    format!(
        "| {} | {} | {} | {:.1}% |\n",
        session.user, session.symptoms_selected, name, score
    )
}
