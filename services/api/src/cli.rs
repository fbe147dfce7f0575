use crate::commands::{run_recommend, run_score, run_search, RecommendArgs, ScoreArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use partner_align::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Partner Align",
    about = "Serve and query the partner discovery directory from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score two organizations from a directory export against each other
    Score(ScoreArgs),
    /// Filter and rank a directory export
    Search(SearchArgs),
    /// List recommended partners for one organization in a directory export
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory CSV loaded into the in-memory repository at start-up
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Search(args) => run_search(args),
        Command::Recommend(args) => run_recommend(args),
    }
}
