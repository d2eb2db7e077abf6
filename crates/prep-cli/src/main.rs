use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "prep")]
#[command(about = "PREP - interview preparation: research, questions, mock interview, feedback", long_about = None)]
struct Cli {
    /// Directory holding session records (overrides `data_dir` in config.toml)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new session
    New(NewArgs),
    /// Research the company and plan the questions
    Start { session_id: String },
    /// Show the next unanswered question
    Question { session_id: String },
    /// Answer a question (use "-" to read the answer from stdin)
    Answer {
        session_id: String,
        question_id: String,
        text: String,
    },
    /// Show the session status and progress
    Status { session_id: String },
    /// Print the full session record as JSON
    Show { session_id: String },
    /// Score a session again after a scoring failure
    RetryScoring { session_id: String },
    /// List session ids, oldest first
    List,
}

#[derive(Args)]
struct NewArgs {
    #[arg(long)]
    company: String,
    #[arg(long)]
    role: String,
    /// Number of questions (defaults to the configured count)
    #[arg(long)]
    count: Option<u32>,
    /// Category weights as TECHNICAL,BEHAVIORAL,COMPANY (e.g. 2,2,1)
    #[arg(long, value_parser = commands::parse_mix)]
    mix: Option<prep_core::question::CategoryMix>,
}

fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let app = commands::App::init(cli.config.as_deref(), cli.data_dir.as_deref()).await?;

    match cli.command {
        Commands::New(args) => app.new_session(&args.company, &args.role, args.count, args.mix).await?,
        Commands::Start { session_id } => app.start(&session_id).await?,
        Commands::Question { session_id } => app.question(&session_id).await?,
        Commands::Answer {
            session_id,
            question_id,
            text,
        } => app.answer(&session_id, &question_id, &text).await?,
        Commands::Status { session_id } => app.status(&session_id).await?,
        Commands::Show { session_id } => app.show(&session_id).await?,
        Commands::RetryScoring { session_id } => app.retry_scoring(&session_id).await?,
        Commands::List => app.list().await?,
    }

    Ok(())
}
