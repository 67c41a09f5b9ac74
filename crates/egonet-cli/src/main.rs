#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "egonet",
    author,
    version,
    about = "egonet: centrality analysis for two-hop social snapshots",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Rank people by closeness, betweenness and eigenvector centrality",
        long_about = "Build the connection graph from a snapshot and rank every person by closeness, betweenness (doubled Brandes) and eigenvector centrality.",
        after_help = "EXAMPLES:\n    # Top 10 per metric\n    egonet analyze snapshot.json\n\n    # Measure the effect of clique inference\n    egonet analyze snapshot.json --no-clique-inference\n\n    # Every score as JSON\n    egonet analyze snapshot.json --full --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Show graph statistics, hop tiers and builder counters",
        after_help = "EXAMPLES:\n    # Summary\n    egonet graph snapshot.json\n\n    # Export adjacency for a layout tool\n    egonet graph snapshot.json --adjacency --json"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(about = "Link roots that share a direct contact")]
    Overlap(cmd::overlap::OverlapArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    egonet completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("EGONET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "egonet=debug,egonet_core=debug,info"
        } else {
            "egonet=info,egonet_core=info,warn"
        })
    });

    let format = env::var("EGONET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, output: OutputMode) -> anyhow::Result<()> {
    let working_dir = env::current_dir()?;

    match cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(&args, output, &working_dir),
        Commands::Graph(args) => cmd::graph::run_graph(&args, output, &working_dir),
        Commands::Overlap(args) => cmd::overlap::run_overlap(&args, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(?cli, "parsed arguments");

    let output = cli.output_mode();
    match run(cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error = err.downcast_ref::<egonet_core::Error>().map_or_else(
                || CliError::new(format!("{err:#}")),
                |core| {
                    let mut error = CliError::from(core);
                    error.message = format!("{err:#}");
                    error
                },
            );
            if render_error(output, &error).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
