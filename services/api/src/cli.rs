use crate::commands::{run_assess, run_batch, run_demo, run_schema, AssessArgs, BatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use creditwise::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CreditWise",
    about = "Score loan applications against the trained approval model",
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
    /// Assess a single application from flags or a JSON file
    Assess(AssessArgs),
    /// Assess every row of a CSV file
    Batch(BatchArgs),
    /// Print the training columns the model expects
    Schema(ArtifactArgs),
    /// Walk the form's default applicant through every pipeline stage
    Demo(ArtifactArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ArtifactArgs {
    /// Directory holding best_loan_model.json, scaler.json, and model_columns.json
    #[arg(long)]
    pub(crate) artifacts_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
        Command::Schema(args) => run_schema(args),
        Command::Demo(args) => run_demo(args),
    }
}
