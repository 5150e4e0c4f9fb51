use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use healbuddy_analytics::{
    current_unix_ms, daily_activity, detailed_stats, summary, AnalyticsStore, DailyCount,
    DetailedStats, SessionEvent, Summary,
};
use healbuddy_catalog::{filter_symptoms, Catalog, Symptom, SymptomId, SymptomSearch};
use healbuddy_triage::{TriageEngine, TriageError, TriageProfile};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

mod report;

const FUZZY_LIMIT: usize = 20;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "healbuddy")]
#[command(about = "Symptom checker with triage guidance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Catalog file (JSON or TOML); the bundled catalog is used when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Triage profile: builtin name (default, deterministic) or file path
    #[arg(long, global = true, env = "HEALBUDDY_PROFILE", default_value = "default")]
    profile: String,

    /// Analytics log file
    #[arg(
        long,
        global = true,
        env = "HEALBUDDY_ANALYTICS",
        default_value = ".healbuddy/analytics.json"
    )]
    analytics: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Score selected symptoms against the catalog and print triage guidance
    Analyze(AnalyzeArgs),

    /// List catalog symptoms
    Symptoms(SymptomsArgs),

    /// Show usage analytics
    Stats(StatsArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Comma-separated symptom ids, e.g. 1,4,20
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    symptoms: Vec<SymptomId>,

    /// User identifier recorded in analytics
    #[arg(long, default_value = "anonymous")]
    user: String,

    /// Override the profile's result limit
    #[arg(long)]
    limit: Option<usize>,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Do not record this query in analytics
    #[arg(long)]
    no_record: bool,
}

#[derive(Args)]
struct SymptomsArgs {
    /// Case-insensitive name filter
    #[arg(long)]
    search: Option<String>,

    /// Fuzzy match names and categories instead of substring filtering
    #[arg(long, requires = "search")]
    fuzzy: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatsArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Number of recent sessions to show
    #[arg(long, default_value_t = 20)]
    recent: usize,
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    summary: Summary,
    detailed: DetailedStats<'a>,
    daily_activity: Vec<DailyCount>,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Analyze(args) => args.json,
        Commands::Symptoms(args) => args.json,
        Commands::Stats(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let catalog = load_catalog(cli.catalog.as_ref())?;
    let store = AnalyticsStore::new(cli.analytics.clone());

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, &cli.profile, &catalog, &store).await?,
        Commands::Symptoms(args) => run_symptoms(args, &catalog)?,
        Commands::Stats(args) => run_stats(args, &catalog, &store).await?,
    }

    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };
    let report = catalog.ingest_report();
    if report.total_skipped() > 0 {
        log::warn!(
            "Catalog loaded with {} skipped rows ({} symptoms, {} conditions, {} associations)",
            report.total_skipped(),
            report.skipped_symptoms,
            report.skipped_conditions,
            report.skipped_associations
        );
    }
    log::debug!(
        "Catalog: {} symptoms, {} conditions",
        catalog.symptoms().len(),
        catalog.conditions().len()
    );
    Ok(catalog)
}

async fn run_analyze(
    args: AnalyzeArgs,
    profile_name: &str,
    catalog: &Catalog,
    store: &AnalyticsStore,
) -> Result<()> {
    let mut profile = TriageProfile::resolve(profile_name)?;
    if let Some(limit) = args.limit {
        profile = profile.with_result_limit(limit)?;
    }
    let engine = TriageEngine::new(profile);

    let analysis = match engine.analyze(catalog, args.symptoms.iter().copied()) {
        Ok(analysis) => analysis,
        Err(TriageError::EmptySelection) => {
            eprintln!("Error: Please select at least one symptom");
            std::process::exit(1);
        }
    };

    let unknown: Vec<SymptomId> = analysis
        .selection
        .iter()
        .filter(|&id| catalog.symptom(id).is_none())
        .collect();
    if !unknown.is_empty() {
        log::warn!("Symptom ids not in catalog: {unknown:?}");
    }

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&analysis)?)?;
    } else {
        print_stdout(&report::render_analysis(&analysis, catalog))?;
    }

    if !args.no_record {
        let event = SessionEvent::from_analysis(&args.user, &analysis, current_unix_ms());
        // analytics never blocks the result
        if let Err(err) = store.record_query(event).await {
            log::warn!("Skipping analytics for {}: {err}", store.path().display());
        }
    }

    Ok(())
}

fn run_symptoms(args: SymptomsArgs, catalog: &Catalog) -> Result<()> {
    let symptoms: Vec<&Symptom> = match args.search.as_deref() {
        Some(query) if args.fuzzy => {
            let mut search = SymptomSearch::new();
            search
                .search(query, catalog.symptoms(), FUZZY_LIMIT)
                .into_iter()
                .map(|(idx, _)| &catalog.symptoms()[idx])
                .collect()
        }
        Some(needle) => filter_symptoms(catalog.symptoms(), needle),
        None => catalog.symptoms().iter().collect(),
    };

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&symptoms)?)?;
    } else {
        print_stdout(&report::render_symptoms(&symptoms))?;
    }
    Ok(())
}

async fn run_stats(args: StatsArgs, catalog: &Catalog, store: &AnalyticsStore) -> Result<()> {
    let log = store
        .load()
        .await
        .with_context(|| format!("Failed to read analytics {}", store.path().display()))?;

    let detailed = detailed_stats(&log);
    // the activity view covers the same window as the recent-sessions table
    let daily = daily_activity(detailed.recent_sessions);
    let output = StatsOutput {
        summary: summary(&log, current_unix_ms()),
        detailed,
        daily_activity: daily,
    };

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_stdout(&report::render_stats(
            &output.summary,
            &output.detailed,
            &output.daily_activity,
            args.recent,
            catalog,
        ))?;
    }
    Ok(())
}
