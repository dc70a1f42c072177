//! The pure bisection step: pick the next commit worth testing between two
//! boundary hashes, or report convergence.

use crate::types::CommitRef;
use std::collections::HashSet;

/// What one engine step concluded.
///
/// Exactly one of `midpoint` and `suspected` is set while a search is
/// progressing or converged; both are `None` when a boundary could not be
/// resolved against the sequence ("cannot proceed" — the caller should hold
/// position until its state is corrected, never treat this as an error).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The commit to present for a verdict.
    pub midpoint: Option<String>,
    /// The isolated culprit, set exactly when the search has converged.
    pub suspected: Option<String>,
    /// Candidates still inside the window.
    pub remaining: usize,
    /// `ceil(log2(remaining))` — worst-case verdicts left.
    pub estimated_steps: u32,
}

/// Compute the next step of a bisection over `commits`.
///
/// The inclusive window spans `good_hash` to `bad_hash` in either orientation;
/// candidates are the window's hashes in sequence order minus `eliminated`.
/// The boundaries themselves stay eligible unless a prior verdict retired
/// them, so a window narrowed to two candidates may legitimately present a
/// boundary as the midpoint.
///
/// Convergence: one candidate or fewer means no further commit can
/// discriminate, and the current bad boundary is reported as the suspect —
/// the last-known-bad commit is the answer once nothing between the
/// boundaries remains testable.
///
/// Deterministic and pure; `O(window)` per call.
pub fn step(
    commits: &[CommitRef],
    good_hash: &str,
    bad_hash: &str,
    eliminated: &HashSet<String>,
) -> StepOutcome {
    let good_idx = commits.iter().position(|c| c.hash == good_hash);
    let bad_idx = commits.iter().position(|c| c.hash == bad_hash);
    let (Some(good_idx), Some(bad_idx)) = (good_idx, bad_idx) else {
        return StepOutcome::default();
    };

    let start = good_idx.min(bad_idx);
    let end = good_idx.max(bad_idx);

    let candidates: Vec<&str> = commits[start..=end]
        .iter()
        .map(|c| c.hash.as_str())
        .filter(|hash| !eliminated.contains(*hash))
        .collect();

    if candidates.len() <= 1 {
        return StepOutcome {
            midpoint: None,
            suspected: Some(bad_hash.to_string()),
            remaining: 0,
            estimated_steps: 0,
        };
    }

    let midpoint = candidates[candidates.len() / 2];
    StepOutcome {
        midpoint: Some(midpoint.to_string()),
        suspected: None,
        remaining: candidates.len(),
        estimated_steps: candidates.len().next_power_of_two().ilog2(),
    }
}
