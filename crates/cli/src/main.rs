use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use report::{ChainOutput, DepthsOutput, GraphOutput};
use std::path::PathBuf;
use voyage_graph::{AnalyzerConfig, ChainAnalyzer, ChainOptions, TurnaroundPolicy};
use voyage_itinerary::SailingOfferRow;

mod input;
mod report;

#[derive(Parser)]
#[command(name = "voyage-chain")]
#[command(about = "Back-to-back and side-by-side cruise chain analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Analyzer config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Longest chain depth for every row
    Depths(DepthsArgs),

    /// Longest chain from one row, or over all rows
    Chain(ChainArgs),

    /// Connection graph statistics and edges
    Graph(AnalysisArgs),
}

#[derive(Args)]
struct AnalysisArgs {
    /// JSON array of offer rows (`-` for stdin)
    rows: PathBuf,

    /// Allow connections onto a different ship in the same port
    #[arg(long)]
    side_by_side: bool,

    /// Offer codes already used by an existing chain
    #[arg(long = "used", value_name = "CODE")]
    used: Vec<String>,

    /// JSON array of hidden row keys (OFFER|SHIP|DATE)
    #[arg(long)]
    hidden: Option<PathBuf>,

    /// Accept departures the day after arrival
    #[arg(long)]
    next_day: bool,
}

#[derive(Args)]
struct DepthsArgs {
    #[command(flatten)]
    analysis: AnalysisArgs,

    /// Run even when auto-run is disabled
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct ChainArgs {
    #[command(flatten)]
    analysis: AnalysisArgs,

    /// Start row index; omit for the longest chain overall
    #[arg(long)]
    from: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = input::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Depths(args) => run_depths(config, args, cli.pretty)?,
        Commands::Chain(args) => run_chain(config, args, cli.pretty)?,
        Commands::Graph(args) => run_graph(config, args, cli.pretty)?,
    }

    Ok(())
}

/// Rows plus an analyzer wired with the requested collaborators
fn prepare(
    config: AnalyzerConfig,
    args: &AnalysisArgs,
) -> Result<(ChainAnalyzer, Vec<SailingOfferRow>)> {
    let rows = input::read_rows(&args.rows)?;

    let mut analyzer = ChainAnalyzer::new(config);
    if let Some(path) = &args.hidden {
        let hidden = input::read_hidden(path)?;
        analyzer = analyzer.with_visibility(Box::new(hidden));
    }

    Ok((analyzer, rows))
}

fn options(args: &AnalysisArgs) -> ChainOptions<'static> {
    let mut options = ChainOptions::new().used_offers(args.used.iter().cloned());
    if args.side_by_side {
        options = options.side_by_side(true);
    }
    if args.next_day {
        options = options.turnaround(TurnaroundPolicy::AllowNextDay);
    }
    options
}

fn run_depths(config: AnalyzerConfig, args: DepthsArgs, pretty: bool) -> Result<()> {
    let ran = args.force || config.auto_run;
    let (analyzer, rows) = prepare(config, &args.analysis)?;
    let options = options(&args.analysis).force(args.force);

    let depths = analyzer.compute_depths(&rows, &options);
    report::emit(&DepthsOutput::new(rows.len(), ran, depths), pretty)
}

fn run_chain(config: AnalyzerConfig, args: ChainArgs, pretty: bool) -> Result<()> {
    let (analyzer, rows) = prepare(config, &args.analysis)?;
    let options = options(&args.analysis);

    let chain = match args.from {
        Some(start) => {
            if start >= rows.len() {
                anyhow::bail!("Row {start} out of range ({} rows)", rows.len());
            }
            analyzer.longest_chain_from(&rows, &options, start)
        }
        None => analyzer.longest_chain_overall(&rows, &options),
    };

    report::emit(&ChainOutput::new(args.from, chain), pretty)
}

fn run_graph(config: AnalyzerConfig, args: AnalysisArgs, pretty: bool) -> Result<()> {
    let (analyzer, rows) = prepare(config, &args)?;
    let (table, graph) = analyzer.connection_graph(&rows, &options(&args));

    let output = GraphOutput {
        stats: graph.stats(&table),
        connections: graph.connections(),
    };
    report::emit(&output, pretty).context("Failed to write graph output")
}
