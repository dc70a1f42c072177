use crate::report;
use anyhow::{Context, Result, bail};
use culprit::{BisectSession, CommitRef};
use culprit_git::HistoryConfig;
use culprit_store::SessionFile;
use std::path::PathBuf;

pub struct StartArgs {
    pub repo: Option<PathBuf>,
    pub rev: Option<String>,
    pub limit: usize,
    pub commits: Option<PathBuf>,
    pub bad: String,
    pub session_dir: Option<PathBuf>,
}

pub fn run(args: StartArgs, json: bool) -> Result<()> {
    let commits = load_commits(&args)?;
    if commits.len() < 2 {
        bail!("need at least two commits to bisect (got {})", commits.len());
    }

    let mut session = BisectSession::new(commits);
    session.start(&args.bad);

    let state = session.state();
    if state.current_midpoint.is_none() && state.suspected_hash.is_none() {
        bail!(
            "known-bad hash '{}' is not in the loaded history",
            args.bad
        );
    }

    let session_path = session_file_path(args.session_dir.as_ref());
    let file = SessionFile::new(session.commits().to_vec(), state);
    culprit_store::save(&session_path, &file)
        .with_context(|| format!("failed to write session file {}", session_path.display()))?;

    if !json {
        println!("session: {}", session_path.display());
    }
    report::print_progress(session.commits(), state, json);
    Ok(())
}

fn load_commits(args: &StartArgs) -> Result<Vec<CommitRef>> {
    if let Some(path) = &args.commits {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read commit list {}", path.display()))?;
        let commits: Vec<CommitRef> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse commit list {}", path.display()))?;
        return Ok(commits);
    }

    let Some(repo_path) = &args.repo else {
        bail!("one of --repo or --commits is required");
    };
    let repo = git2::Repository::open(repo_path)
        .with_context(|| format!("failed to open repository at {}", repo_path.display()))?;
    let config = HistoryConfig {
        rev: args.rev.clone(),
        limit: Some(args.limit),
    };
    culprit_git::read_history(&repo, &config)
}

fn session_file_path(dir: Option<&PathBuf>) -> PathBuf {
    let dir = dir.cloned().unwrap_or_else(std::env::temp_dir);
    let ts_compact = chrono::Utc::now().format("%Y%m%dT%H%M%S").to_string();
    let pid = std::process::id();
    dir.join(format!("culprit-{ts_compact}-{pid}.json"))
}
