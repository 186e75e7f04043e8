use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use lead_ranker::filter::LeadFilter;
use lead_ranker::pipeline::{LeadBatch, LeadPipeline};
use lead_ranker::scoring::{ScoreAggregator, Tier};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Leads file (JSON, or YAML with a .yaml/.yml extension)
    leads: PathBuf,

    /// Date recency is measured from (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Score on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank leads
    Rank {
        #[command(flatten)]
        score: ScoreArgs,

        /// Only show leads with at least this total score
        #[arg(long)]
        min_score: Option<u32>,

        /// Only show leads in these tiers (hot, warm, cold)
        #[arg(long, value_parser = parse_tier)]
        tier: Vec<Tier>,

        /// Only show leads in these biotech hubs
        #[arg(long)]
        hub: Vec<String>,

        /// Only show leads whose name, title or company contains this text
        #[arg(long)]
        search: Option<String>,

        /// Output format (defaults to table)
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the per-criterion breakdown of one lead by its rank
    Show {
        #[command(flatten)]
        score: ScoreArgs,

        /// Rank of the lead (1-based, as shown by `rank`)
        rank: usize,
    },
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "lead-ranker")]
#[command(about = "Propensity-to-buy ranking for life-science leads", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-ranker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn parse_tier(s: &str) -> Result<Tier, String> {
    Tier::parse(s).ok_or_else(|| format!("unknown tier '{}' (hot, warm, cold)", s))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "lead_ranker=info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let start_time = Instant::now();

    if let Commands::Init { force } = cli.command {
        let path = match cli.config.map(Ok).unwrap_or_else(lead_ranker::config::get_config_path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = lead_ranker::config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match lead_ranker::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let scoring = config.effective_scoring();

    let score_args = match &cli.command {
        Commands::Rank { score, .. } | Commands::Show { score, .. } => score,
        Commands::Init { .. } => unreachable!("handled above"),
    };

    let as_of = score_args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    // Validate scoring config at startup
    let aggregator = match ScoreAggregator::new(&scoring, as_of) {
        Ok(a) => a,
        Err(errors) => {
            eprintln!("Scoring config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let parsed = match lead_ranker::leads::load_leads(&score_args.leads) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };
    for rejected in &parsed.rejected {
        eprintln!("lead {}: unreadable record ({})", rejected.index + 1, rejected.reason);
    }

    let mut pipeline = LeadPipeline::new(aggregator);
    if score_args.sequential {
        pipeline = pipeline.sequential();
    }
    let batch = pipeline.process(parsed.records);

    if cli.verbose {
        for issue in &batch.issues {
            eprintln!("{}", lead_ranker::output::format_issue(issue));
        }
        eprintln!(
            "{} in {:?} (as of {})",
            lead_ranker::output::format_summary(&batch.summary),
            start_time.elapsed(),
            as_of
        );
    }

    let use_colors = lead_ranker::output::should_use_colors();

    match cli.command {
        Commands::Rank {
            min_score,
            tier,
            hub,
            search,
            format,
            output,
            ..
        } => {
            let filter = LeadFilter {
                min_score,
                tiers: tier,
                hubs: hub,
                search,
            };
            if let Err(e) = emit_ranked(&batch, &filter, format, output.as_deref(), use_colors) {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        }
        Commands::Show { rank, .. } => {
            // Validate rank bounds (1-based)
            match batch.by_rank(rank) {
                Some(scored) => {
                    println!("{}", lead_ranker::output::format_lead_detail(scored, use_colors));
                }
                None => {
                    eprintln!("Invalid rank {}. Must be between 1 and {}.", rank, batch.len());
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Init { .. } => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}

fn emit_ranked(
    batch: &LeadBatch,
    filter: &LeadFilter,
    format: OutputFormat,
    output: Option<&Path>,
    use_colors: bool,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let view = filter.apply(&batch.leads);
    if !filter.is_empty() {
        tracing::info!(shown = view.len(), total = batch.len(), "applied filters");
    }

    let rendered = match format {
        OutputFormat::Table => {
            lead_ranker::output::format_ranked_table(&view, use_colors && output.is_none())
        }
        OutputFormat::Tsv => lead_ranker::output::format_tsv(&view),
        OutputFormat::Json => lead_ranker::output::format_json(&view)?,
    };

    match output {
        None => println!("{}", rendered),
        Some(path) => {
            let mut file = atomic_write_file::AtomicWriteFile::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            writeln!(file, "{}", rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            file.commit()
                .with_context(|| format!("Failed to save {}", path.display()))?;
            eprintln!("Wrote {} leads to {}", view.len(), path.display());
        }
    }
    Ok(())
}
