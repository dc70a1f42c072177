#![doc = include_str!("../README.md")]

mod error;

pub use error::{Result, StoreError};

use culprit::{BisectState, CommitRef};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stored format version. Bump on incompatible layout changes.
pub const STORE_VERSION: u32 = 1;

/// Serialized mirror of [`BisectState`].
///
/// The elimination set is flattened to a sorted array here and rebuilt as a
/// set on load; history snapshots nest with their own stacks already
/// stripped, so the recursion is one level deep in practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    pub is_active: bool,
    pub good_hash: Option<String>,
    pub bad_hash: Option<String>,
    pub current_midpoint: Option<String>,
    pub eliminated_hashes: Vec<String>,
    pub suspected_hash: Option<String>,
    #[serde(default)]
    pub remaining: usize,
    #[serde(default, rename = "steps")]
    pub estimated_steps: u32,
    #[serde(default)]
    pub history: Vec<StoredState>,
}

impl From<&BisectState> for StoredState {
    fn from(state: &BisectState) -> Self {
        let mut eliminated: Vec<String> = state.eliminated_hashes.iter().cloned().collect();
        eliminated.sort();
        StoredState {
            is_active: state.is_active,
            good_hash: state.good_hash.clone(),
            bad_hash: state.bad_hash.clone(),
            current_midpoint: state.current_midpoint.clone(),
            eliminated_hashes: eliminated,
            suspected_hash: state.suspected_hash.clone(),
            remaining: state.remaining,
            estimated_steps: state.estimated_steps,
            history: state.history.iter().map(StoredState::from).collect(),
        }
    }
}

impl From<StoredState> for BisectState {
    fn from(stored: StoredState) -> Self {
        BisectState {
            is_active: stored.is_active,
            good_hash: stored.good_hash,
            bad_hash: stored.bad_hash,
            current_midpoint: stored.current_midpoint,
            eliminated_hashes: stored.eliminated_hashes.into_iter().collect(),
            suspected_hash: stored.suspected_hash,
            remaining: stored.remaining,
            estimated_steps: stored.estimated_steps,
            history: stored.history.into_iter().map(BisectState::from).collect(),
        }
    }
}

/// One persisted workflow: the commit sequence plus the bisect state.
///
/// The sequence travels with the state because the core never fetches —
/// a resumed session must see exactly the ordering it was started with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    pub version: u32,
    pub created_at: String,
    pub commits: Vec<CommitRef>,
    pub bisect: StoredState,
}

impl SessionFile {
    pub fn new(commits: Vec<CommitRef>, state: &BisectState) -> Self {
        SessionFile {
            version: STORE_VERSION,
            created_at: now_iso8601(),
            commits,
            bisect: StoredState::from(state),
        }
    }

    /// Rebuild the in-memory state (array → set).
    pub fn state(&self) -> BisectState {
        self.bisect.clone().into()
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Write a session file atomically: temp file in the target directory,
/// then persist over the destination.
pub fn save(path: &Path, session: &SessionFile) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&tmp, session)?;
    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Read and version-check a session file.
pub fn load(path: &Path) -> Result<SessionFile> {
    let data = std::fs::read_to_string(path)?;
    let session: SessionFile = serde_json::from_str(&data)?;
    if session.version != STORE_VERSION {
        return Err(StoreError::UnsupportedVersion(session.version));
    }
    Ok(session)
}

fn now_iso8601() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
