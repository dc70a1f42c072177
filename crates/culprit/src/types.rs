use serde::{Deserialize, Serialize};

/// One commit in an externally supplied, already-linearized history.
///
/// Sequences are **newest-first**: index 0 is the most recent commit and the
/// last element is the chronologically oldest — the order a hosting API or a
/// first-parent revwalk produces. Hashes must be unique within a sequence,
/// and the caller guarantees a single contiguous bad region along it; the
/// engine does not verify either.
///
/// Only `hash` participates in bisection. The remaining fields exist so that
/// presentation layers can label commits without a second lookup.
///
/// # JSON shape
///
/// ```json
/// {
///   "hash": "7fbc12a3d9021a",
///   "author": "Chief Architect",
///   "authorEmail": "architect@enterprise.io",
///   "date": "2023-11-01T09:00:00Z",
///   "message": "feat: core protocol implementation",
///   "parents": ["d5e6f7a8b2c1d3"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRef {
    pub hash: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    /// Author timestamp (ISO 8601).
    pub date: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

impl CommitRef {
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CommitRef {
            hash: hash.into(),
            author: author.into(),
            author_email: None,
            date: date.into(),
            message: message.into(),
            parents: Vec::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    pub fn with_parent(mut self, hash: impl Into<String>) -> Self {
        self.parents.push(hash.into());
        self
    }

    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Classification of a commit within an active bisect session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BisectStatus {
    /// The current known-good boundary.
    Good,
    /// The current known-bad boundary.
    Bad,
    /// The converged culprit.
    Suspected,
    /// Eliminated by a prior verdict and no longer worth testing.
    Skipped,
}

impl std::fmt::Display for BisectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BisectStatus::Good => write!(f, "good"),
            BisectStatus::Bad => write!(f, "bad"),
            BisectStatus::Suspected => write!(f, "suspected"),
            BisectStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// First eight characters of a hash, for log lines.
pub(crate) fn short(hash: &str) -> String {
    hash.chars().take(8).collect()
}
