use crate::report;
use anyhow::{Context, Result};
use culprit::status_map;
use std::path::PathBuf;

pub fn run(session_path: PathBuf, json: bool) -> Result<()> {
    let file = culprit_store::load(&session_path)
        .with_context(|| format!("failed to load session {}", session_path.display()))?;
    let state = file.state();
    let statuses = status_map(&state);

    if json {
        let by_hash: serde_json::Map<String, serde_json::Value> = file
            .commits
            .iter()
            .filter_map(|c| {
                statuses
                    .get(&c.hash)
                    .map(|s| (c.hash.clone(), serde_json::json!(s.to_string())))
            })
            .collect();
        let output = serde_json::json!({
            "isActive": state.is_active,
            "midpoint": state.current_midpoint,
            "suspected": state.suspected_hash,
            "remaining": state.remaining,
            "steps": state.estimated_steps,
            "statuses": by_hash,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if state.suspected_hash.is_some() {
        println!("converged");
    } else if state.is_active {
        println!(
            "bisecting: {} candidates, ~{} steps left",
            state.remaining, state.estimated_steps
        );
    } else {
        println!("idle");
    }
    println!();

    for commit in &file.commits {
        let marker = if state.current_midpoint.as_deref() == Some(commit.hash.as_str()) {
            "[testing]"
        } else {
            match statuses.get(&commit.hash) {
                Some(status) => match status {
                    culprit::BisectStatus::Good => "[good]",
                    culprit::BisectStatus::Bad => "[bad]",
                    culprit::BisectStatus::Suspected => "[suspected]",
                    culprit::BisectStatus::Skipped => "[skipped]",
                },
                None => "",
            }
        };
        println!(
            "  {:<11} {} {}",
            marker,
            report::short(&commit.hash),
            commit.subject()
        );
    }
    Ok(())
}
