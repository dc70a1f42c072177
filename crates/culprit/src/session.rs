//! Session ownership: the commit sequence, the live state, and change
//! notification for the commit under test.

use crate::state::{BisectAction, BisectState, reduce, status_map};
use crate::types::{BisectStatus, CommitRef};
use std::collections::HashMap;

/// The commit a host UI should navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A midpoint awaiting a verdict.
    Midpoint(String),
    /// The converged culprit.
    Suspect(String),
}

impl Selection {
    pub fn hash(&self) -> &str {
        match self {
            Selection::Midpoint(hash) | Selection::Suspect(hash) => hash,
        }
    }
}

/// A bisect workflow over one loaded commit sequence.
///
/// Owns the sequence and the current [`BisectState`]; every operation runs
/// the reducer and, when the commit under test or the convergence result
/// changed, notifies the registered selection observer. Single-writer by
/// construction — the session is owned by one host at a time and every
/// operation runs to completion before returning.
pub struct BisectSession {
    commits: Vec<CommitRef>,
    state: BisectState,
    on_select: Option<Box<dyn FnMut(&Selection)>>,
}

impl BisectSession {
    /// New idle session over a newest-first commit sequence.
    pub fn new(commits: Vec<CommitRef>) -> Self {
        BisectSession {
            commits,
            state: BisectState::default(),
            on_select: None,
        }
    }

    /// Resume a session from previously persisted state.
    pub fn with_state(commits: Vec<CommitRef>, state: BisectState) -> Self {
        BisectSession {
            commits,
            state,
            on_select: None,
        }
    }

    /// Register the observer invoked whenever the selected commit changes.
    pub fn on_selection(mut self, observer: impl FnMut(&Selection) + 'static) -> Self {
        self.on_select = Some(Box::new(observer));
        self
    }

    pub fn commits(&self) -> &[CommitRef] {
        &self.commits
    }

    pub fn state(&self) -> &BisectState {
        &self.state
    }

    /// The commit currently worth looking at: the suspect once converged,
    /// otherwise the midpoint under test.
    pub fn selection(&self) -> Option<Selection> {
        if let Some(suspect) = &self.state.suspected_hash {
            return Some(Selection::Suspect(suspect.clone()));
        }
        self.state
            .current_midpoint
            .as_ref()
            .map(|midpoint| Selection::Midpoint(midpoint.clone()))
    }

    /// Derived hash → status map for visualization.
    pub fn statuses(&self) -> HashMap<String, BisectStatus> {
        status_map(&self.state)
    }

    /// Begin a session with `bad_hash` as the known-bad boundary. No-op
    /// unless at least two commits are loaded.
    pub fn start(&mut self, bad_hash: &str) -> &BisectState {
        self.apply(BisectAction::Start {
            bad_hash: bad_hash.to_string(),
        })
    }

    /// Record that the commit under test predates the regression.
    pub fn mark_good(&mut self) -> &BisectState {
        self.apply(BisectAction::MarkGood)
    }

    /// Record that the commit under test exhibits the regression.
    pub fn mark_bad(&mut self) -> &BisectState {
        self.apply(BisectAction::MarkBad)
    }

    /// Roll back the most recent verdict exactly. No-op on empty history.
    pub fn undo(&mut self) -> &BisectState {
        self.apply(BisectAction::Undo)
    }

    /// Return to the inactive, empty state.
    pub fn reset(&mut self) -> &BisectState {
        self.apply(BisectAction::Reset)
    }

    fn apply(&mut self, action: BisectAction) -> &BisectState {
        let before = self.selection();
        self.state = reduce(&self.commits, &self.state, &action);
        let after = self.selection();
        if after != before
            && let (Some(selection), Some(observer)) = (after.as_ref(), self.on_select.as_mut())
        {
            observer(selection);
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seq(n: usize) -> Vec<CommitRef> {
        (0..n)
            .map(|i| CommitRef::new(format!("c{i}"), "dev", "2026-01-01T00:00:00Z", "change"))
            .collect()
    }

    #[test]
    fn test_start_selects_midpoint() {
        let mut session = BisectSession::new(seq(8));
        session.start("c0");
        assert_eq!(
            session.selection(),
            Some(Selection::Midpoint("c4".to_string()))
        );
    }

    #[test]
    fn test_suspect_wins_selection_once_converged() {
        let mut session = BisectSession::new(seq(2));
        session.start("c0");
        session.mark_good();
        assert_eq!(
            session.selection(),
            Some(Selection::Suspect("c0".to_string()))
        );
    }

    #[test]
    fn test_observer_fires_on_selection_changes_only() {
        let seen: Rc<RefCell<Vec<Selection>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session =
            BisectSession::new(seq(4)).on_selection(move |s| sink.borrow_mut().push(s.clone()));

        session.start("c0");
        assert_eq!(seen.borrow().len(), 1);

        // Verdict with no midpoint change source: undo with empty history
        // and a verdict after convergence are both silent.
        session.undo();
        assert_eq!(seen.borrow().len(), 1);

        session.mark_good(); // midpoint c2 -> c1
        session.mark_good(); // converges on c0
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(
            seen.borrow().last(),
            Some(&Selection::Suspect("c0".to_string()))
        );

        session.mark_good(); // no commit under test: no-op, no event
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_observer_fires_on_undo() {
        let seen: Rc<RefCell<Vec<Selection>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session =
            BisectSession::new(seq(8)).on_selection(move |s| sink.borrow_mut().push(s.clone()));

        session.start("c0");
        session.mark_good();
        let events = seen.borrow().len();
        session.undo();
        assert_eq!(seen.borrow().len(), events + 1);
        assert_eq!(
            seen.borrow().last(),
            Some(&Selection::Midpoint("c4".to_string()))
        );
    }

    #[test]
    fn test_resume_from_persisted_state() {
        let commits = seq(8);
        let mut original = BisectSession::new(commits.clone());
        original.start("c0");
        original.mark_good();
        let saved = original.state().clone();

        let mut resumed = BisectSession::with_state(commits, saved.clone());
        assert_eq!(resumed.state(), &saved);
        resumed.undo();
        assert_eq!(resumed.state().current_midpoint.as_deref(), Some("c4"));
    }

    #[test]
    fn test_statuses_reflect_current_state() {
        let mut session = BisectSession::new(seq(4));
        session.start("c0");
        let statuses = session.statuses();
        assert_eq!(statuses.get("c3"), Some(&BisectStatus::Good));
        assert_eq!(statuses.get("c0"), Some(&BisectStatus::Bad));
    }

    #[test]
    fn test_selection_hash_accessor() {
        assert_eq!(Selection::Midpoint("abc".to_string()).hash(), "abc");
        assert_eq!(Selection::Suspect("def".to_string()).hash(), "def");
    }
}
