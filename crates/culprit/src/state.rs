//! Session state values, the reducer that advances them, and the derived
//! per-commit status map.

use crate::engine::{self, StepOutcome};
use crate::types::{BisectStatus, CommitRef, short};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// The value type for one bisect session.
///
/// States are only ever replaced wholesale — each transition builds a new
/// set and a new snapshot stack, so entries retained in `history` never
/// alias live data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BisectState {
    /// Whether a session is in progress. Stays `true` after convergence
    /// until an explicit reset.
    pub is_active: bool,
    /// Known-good boundary hash.
    pub good_hash: Option<String>,
    /// Known-bad boundary hash.
    pub bad_hash: Option<String>,
    /// The commit currently awaiting a verdict; `None` once converged.
    pub current_midpoint: Option<String>,
    /// Commits proven to be on a known side and no longer worth testing.
    /// Grows on every verdict, shrinks only through undo or reset.
    pub eliminated_hashes: HashSet<String>,
    /// The converged culprit; mutually exclusive with `current_midpoint`.
    pub suspected_hash: Option<String>,
    /// Candidates left inside the window after the latest step.
    pub remaining: usize,
    /// Worst-case verdicts left after the latest step.
    pub estimated_steps: u32,
    /// Snapshot stack for undo. Each entry stores every field except its
    /// own nested `history`.
    pub history: Vec<BisectState>,
}

impl BisectState {
    /// Copy of this state with the undo stack stripped, as stored in
    /// `history`.
    pub fn without_history(&self) -> BisectState {
        BisectState {
            history: Vec::new(),
            ..self.clone()
        }
    }
}

/// A transition request against a [`BisectState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BisectAction {
    /// Begin a session with the given known-bad hash. The good boundary is
    /// the chronologically oldest commit (the last element of the
    /// newest-first sequence).
    Start { bad_hash: String },
    /// The commit under test does not exhibit the regression.
    MarkGood,
    /// The commit under test exhibits the regression.
    MarkBad,
    /// Roll back the most recent verdict exactly.
    Undo,
    /// Return to the inactive, empty state.
    Reset,
}

/// Advance `state` by one action against the supplied commit sequence.
///
/// Pure apart from log output, and total: precondition violations (too few
/// commits, no commit under test, empty history) and unresolvable boundaries
/// return the state unchanged rather than failing.
pub fn reduce(commits: &[CommitRef], state: &BisectState, action: &BisectAction) -> BisectState {
    match action {
        BisectAction::Start { bad_hash } => start(commits, state, bad_hash),
        BisectAction::MarkGood => mark(commits, state, Verdict::Good),
        BisectAction::MarkBad => mark(commits, state, Verdict::Bad),
        BisectAction::Undo => undo(state),
        BisectAction::Reset => {
            info!("bisect session reset");
            BisectState::default()
        }
    }
}

/// Derive the hash → status map for visualization.
///
/// Re-derived on every read, never stored. Boundary and suspect
/// classifications take precedence over `Skipped` when a hash matches more
/// than one condition.
pub fn status_map(state: &BisectState) -> HashMap<String, BisectStatus> {
    let mut statuses = HashMap::new();
    if let Some(hash) = &state.good_hash {
        statuses.insert(hash.clone(), BisectStatus::Good);
    }
    if let Some(hash) = &state.bad_hash {
        statuses.insert(hash.clone(), BisectStatus::Bad);
    }
    if let Some(hash) = &state.suspected_hash {
        statuses.insert(hash.clone(), BisectStatus::Suspected);
    }
    for hash in &state.eliminated_hashes {
        statuses
            .entry(hash.clone())
            .or_insert(BisectStatus::Skipped);
    }
    statuses
}

enum Verdict {
    Good,
    Bad,
}

fn start(commits: &[CommitRef], state: &BisectState, bad_hash: &str) -> BisectState {
    if commits.len() < 2 {
        warn!(
            commits = commits.len(),
            "not enough commits to start a bisect session"
        );
        return state.clone();
    }

    // Oldest commit in a newest-first sequence is the last element.
    let good_hash = commits[commits.len() - 1].hash.clone();
    info!(
        good = %short(&good_hash),
        bad = %short(bad_hash),
        "starting bisect session"
    );

    let outcome = engine::step(commits, &good_hash, bad_hash, &HashSet::new());
    apply_outcome(
        BisectState {
            is_active: true,
            good_hash: Some(good_hash),
            bad_hash: Some(bad_hash.to_string()),
            ..Default::default()
        },
        outcome,
    )
}

fn mark(commits: &[CommitRef], state: &BisectState, verdict: Verdict) -> BisectState {
    let (Some(midpoint), Some(good), Some(bad)) = (
        state.current_midpoint.clone(),
        state.good_hash.clone(),
        state.bad_hash.clone(),
    ) else {
        warn!("verdict ignored: no commit under test");
        return state.clone();
    };

    // The boundary being moved toward the midpoint; everything in between is
    // now proven to be on that boundary's side.
    let (new_good, new_bad, retired_boundary, label) = match verdict {
        Verdict::Good => (midpoint.clone(), bad, good, "good"),
        Verdict::Bad => (good, midpoint.clone(), bad, "bad"),
    };

    let boundary_idx = index_of(commits, &retired_boundary);
    let midpoint_idx = index_of(commits, &midpoint);
    let (Some(boundary_idx), Some(midpoint_idx)) = (boundary_idx, midpoint_idx) else {
        warn!(
            boundary = %short(&retired_boundary),
            "verdict ignored: boundary not in the commit sequence"
        );
        return state.clone();
    };

    info!(midpoint = %short(&midpoint), verdict = label, "verdict recorded");

    // Retire the whole proven span, not just the tested midpoint.
    let mut eliminated = state.eliminated_hashes.clone();
    let lo = boundary_idx.min(midpoint_idx);
    let hi = boundary_idx.max(midpoint_idx);
    for commit in &commits[lo..=hi] {
        eliminated.insert(commit.hash.clone());
    }
    debug!(
        span = hi - lo + 1,
        eliminated = eliminated.len(),
        "span retired"
    );

    let mut history = state.history.clone();
    history.push(state.without_history());

    let outcome = engine::step(commits, &new_good, &new_bad, &eliminated);
    apply_outcome(
        BisectState {
            is_active: state.is_active,
            good_hash: Some(new_good),
            bad_hash: Some(new_bad),
            eliminated_hashes: eliminated,
            history,
            ..Default::default()
        },
        outcome,
    )
}

fn undo(state: &BisectState) -> BisectState {
    let mut history = state.history.clone();
    let Some(snapshot) = history.pop() else {
        warn!("undo ignored: no history");
        return state.clone();
    };
    debug!(depth = history.len(), "rolled back one verdict");
    // The snapshot was stored without its own stack; the remaining stack is
    // exactly the history it had when it was live.
    BisectState { history, ..snapshot }
}

fn apply_outcome(mut state: BisectState, outcome: StepOutcome) -> BisectState {
    if let Some(suspect) = &outcome.suspected {
        info!(suspect = %short(suspect), "bisect converged");
    } else if let Some(midpoint) = &outcome.midpoint {
        debug!(
            midpoint = %short(midpoint),
            remaining = outcome.remaining,
            steps = outcome.estimated_steps,
            "next midpoint"
        );
    } else {
        warn!("bisect step produced neither a midpoint nor a suspect");
    }
    state.current_midpoint = outcome.midpoint;
    state.suspected_hash = outcome.suspected;
    state.remaining = outcome.remaining;
    state.estimated_steps = outcome.estimated_steps;
    state
}

fn index_of(commits: &[CommitRef], hash: &str) -> Option<usize> {
    commits.iter().position(|c| c.hash == hash)
}
