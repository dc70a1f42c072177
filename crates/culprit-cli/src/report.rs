use culprit::{BisectState, CommitRef};

/// Print where the search stands: the next commit to test, the converged
/// suspect, or a stuck/idle notice.
pub fn print_progress(commits: &[CommitRef], state: &BisectState, json: bool) {
    if json {
        let output = serde_json::json!({
            "isActive": state.is_active,
            "midpoint": state.current_midpoint,
            "suspected": state.suspected_hash,
            "remaining": state.remaining,
            "steps": state.estimated_steps,
        });
        // Pretty output is small here; match the status command's shape.
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return;
    }

    if let Some(suspect) = &state.suspected_hash {
        println!("suspect: {}", describe(commits, suspect));
    } else if let Some(midpoint) = &state.current_midpoint {
        println!(
            "next: {}   ({} candidates, ~{} steps)",
            describe(commits, midpoint),
            state.remaining,
            state.estimated_steps
        );
    } else if state.is_active {
        println!("stuck: boundaries no longer resolve against the commit list");
    } else {
        println!("no active session");
    }
}

/// `shorthash subject` for a known commit, bare hash otherwise.
pub fn describe(commits: &[CommitRef], hash: &str) -> String {
    match commits.iter().find(|c| c.hash == hash) {
        Some(commit) => format!("{} {}", short(hash), commit.subject()),
        None => hash.to_string(),
    }
}

pub fn short(hash: &str) -> String {
    hash.chars().take(8).collect()
}
