mod cmd_start;
mod cmd_status;
mod cmd_verdict;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "culprit")]
#[command(about = "Bisect a commit history for the change that introduced a regression")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a session; prints the session file path and the first commit to test
    Start {
        /// Git repository to read history from
        #[arg(long, conflicts_with = "commits")]
        repo: Option<PathBuf>,

        /// Revision to walk from (default: HEAD)
        #[arg(long, requires = "repo")]
        rev: Option<String>,

        /// Maximum commits to load
        #[arg(long, default_value_t = culprit_git::DEFAULT_LIMIT)]
        limit: usize,

        /// JSON file with a pre-linearized, newest-first commit array
        #[arg(long)]
        commits: Option<PathBuf>,

        /// Known-bad commit hash
        #[arg(long)]
        bad: String,

        /// Directory for session files (default: $TMPDIR)
        #[arg(long)]
        session_dir: Option<PathBuf>,
    },
    /// Mark the commit under test as good
    Good {
        /// Path to the session file
        #[arg(long)]
        session: PathBuf,
    },
    /// Mark the commit under test as bad
    Bad {
        /// Path to the session file
        #[arg(long)]
        session: PathBuf,
    },
    /// Roll back the most recent verdict
    Undo {
        /// Path to the session file
        #[arg(long)]
        session: PathBuf,
    },
    /// End the session and delete its file
    Reset {
        /// Path to the session file
        #[arg(long)]
        session: PathBuf,
    },
    /// Show per-commit statuses and progress
    Status {
        /// Path to the session file
        #[arg(long)]
        session: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Start {
            repo,
            rev,
            limit,
            commits,
            bad,
            session_dir,
        } => cmd_start::run(
            cmd_start::StartArgs {
                repo,
                rev,
                limit,
                commits,
                bad,
                session_dir,
            },
            cli.json,
        ),
        Commands::Good { session } => cmd_verdict::run(session, cmd_verdict::Op::Good, cli.json),
        Commands::Bad { session } => cmd_verdict::run(session, cmd_verdict::Op::Bad, cli.json),
        Commands::Undo { session } => cmd_verdict::run(session, cmd_verdict::Op::Undo, cli.json),
        Commands::Reset { session } => cmd_verdict::run(session, cmd_verdict::Op::Reset, cli.json),
        Commands::Status { session } => cmd_status::run(session, cli.json),
    }
}
