use crate::report;
use anyhow::{Context, Result, bail};
use culprit::BisectSession;
use culprit_store::StoredState;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub enum Op {
    Good,
    Bad,
    Undo,
    Reset,
}

pub fn run(session_path: PathBuf, op: Op, json: bool) -> Result<()> {
    let file = culprit_store::load(&session_path)
        .with_context(|| format!("failed to load session {}", session_path.display()))?;
    let state = file.state();

    // The core treats out-of-sequence calls as silent no-ops; the CLI
    // surfaces them as errors instead.
    match op {
        Op::Good | Op::Bad if state.current_midpoint.is_none() => {
            bail!("no commit awaiting a verdict");
        }
        Op::Undo if state.history.is_empty() => {
            bail!("nothing to undo");
        }
        _ => {}
    }

    let mut session = BisectSession::with_state(file.commits.clone(), state);
    match op {
        Op::Good => session.mark_good(),
        Op::Bad => session.mark_bad(),
        Op::Undo => session.undo(),
        Op::Reset => session.reset(),
    };

    if let Op::Reset = op {
        std::fs::remove_file(&session_path)
            .with_context(|| format!("failed to remove session {}", session_path.display()))?;
        if json {
            println!("{}", serde_json::json!({ "reset": true }));
        } else {
            println!("session reset: {}", session_path.display());
        }
        return Ok(());
    }

    let mut updated = file;
    updated.bisect = StoredState::from(session.state());
    culprit_store::save(&session_path, &updated)
        .with_context(|| format!("failed to write session {}", session_path.display()))?;

    report::print_progress(session.commits(), session.state(), json);
    Ok(())
}
