use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use review_search::command::ReviewCommand;
use review_search::config::AppConfig;
use review_search::logging::init_tracing;
use review_search::render::{Presentation, plain_text};
use review_search::transport::{JsonMessageLog, StaticAuthorDirectory, parse_history};
use review_search::{Aggregator, ReviewError};

#[derive(Parser)]
#[command(
    name = "review-search",
    about = "Find what reviewers wrote about one person, week by week"
)]
struct Cli {
    /// TOML config file; the built-in roster and weeks are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the review command against an exported channel history
    Search {
        /// Name to look up, e.g. "Sophia" or "Jack M"
        query: Vec<String>,
        /// Directory holding `<channel>.json` history exports
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,
        /// Print terminal text instead of the JSON payload
        #[arg(long)]
        text: bool,
    },
    /// Show which roster entry a query resolves to
    Resolve { query: Vec<String> },
    /// Build the raw result set from a single message file
    Scan {
        query: Vec<String>,
        /// JSON array of messages, or an export with a `messages` array
        #[arg(long)]
        messages: PathBuf,
    },
    /// List the configured reporting periods
    Periods,
    /// Print the response sent when the dismiss button is clicked
    Dismiss,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(Some(&cli.log_level))?;
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            query,
            log_dir,
            text,
        } => run_search(&config, &query.join(" "), log_dir, text).await,
        Command::Resolve { query } => run_resolve(&config, &query.join(" ")),
        Command::Scan { query, messages } => run_scan(&config, &query.join(" "), &messages).await,
        Command::Periods => run_periods(&config),
        Command::Dismiss => run_dismiss(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(AppConfig::default()),
    }
}

fn print_json<T: serde::Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn command_for(
    config: &AppConfig,
    log_dir: PathBuf,
) -> anyhow::Result<ReviewCommand<JsonMessageLog, StaticAuthorDirectory>> {
    let source = JsonMessageLog::new(log_dir);
    let authors = StaticAuthorDirectory::new(config.authors.clone());
    Ok(ReviewCommand::new(config, source, authors)?)
}

// ═══════════════════════════════════════════════════════════════════════
//  SEARCH: the full command path, as the chat client would see it
// ═══════════════════════════════════════════════════════════════════════

async fn run_search(
    config: &AppConfig,
    query: &str,
    log_dir: PathBuf,
    text: bool,
) -> anyhow::Result<()> {
    let command = command_for(config, log_dir)?;

    if !text {
        return print_json(&command.handle_query(query).await);
    }

    match command.run(query).await {
        Ok(rs) => print!("{}", plain_text(&rs, &Presentation::from_config(config))),
        Err(ReviewError::Transport(err)) => {
            return Err(err).context("fetching channel history");
        }
        Err(err) => eprintln!("{err}"),
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  RESOLVE / SCAN: pipeline stages on their own
// ═══════════════════════════════════════════════════════════════════════

fn run_resolve(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let roster = config.roster()?;
    let resolver = review_search::NameResolver::new(&roster);
    match resolver.resolve(query) {
        Some(r) => {
            let note = if r.tier.is_ambiguous() { " (ambiguous)" } else { "" };
            println!("{} [{:?}]{note}", r.entry, r.tier);
        }
        None => eprintln!("No roster entry matches \"{query}\""),
    }
    Ok(())
}

async fn run_scan(config: &AppConfig, query: &str, path: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let messages = parse_history(&raw)?;
    let aggregator = Aggregator::from_config(config)?;
    let authors = StaticAuthorDirectory::new(config.authors.clone());

    let rs = aggregator.build_result_set(query, &messages, &authors).await?;
    eprintln!(
        "{} span(s) in {} period(s) for {}",
        rs.span_count(),
        rs.periods.len(),
        rs.name
    );
    print_json(&rs)
}

// ═══════════════════════════════════════════════════════════════════════
//  PERIODS / DISMISS
// ═══════════════════════════════════════════════════════════════════════

fn run_periods(config: &AppConfig) -> anyhow::Result<()> {
    let table = config.period_table()?;
    let presentation = Presentation::from_config(config);
    println!("UTC offset: {}", table.offset());
    for p in table.periods() {
        println!(
            "{}: {} .. {}",
            presentation.period_heading(p.number),
            p.start,
            p.end
        );
    }
    Ok(())
}

fn run_dismiss(config: &AppConfig) -> anyhow::Result<()> {
    let command = command_for(config, PathBuf::from("."))?;
    match command.handle_action(review_search::render::DISMISS_ACTION_ID) {
        Some(resp) => print_json(&resp),
        None => Ok(()),
    }
}
