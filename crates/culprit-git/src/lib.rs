#![doc = include_str!("../README.md")]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use culprit::CommitRef;
use git2::{Commit, Repository};

/// Cap applied when [`HistoryConfig::limit`] is left at the default.
pub const DEFAULT_LIMIT: usize = 100;

/// Configuration for reading a repository's linearized history.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Revision expression to start from (e.g. a branch name, `"HEAD~20"`,
    /// or a commit id). Defaults to `HEAD`.
    pub rev: Option<String>,
    /// Maximum number of records; `None` walks the entire first-parent
    /// chain.
    pub limit: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            rev: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Walk the repository newest-first along first parents and map each commit
/// to a [`CommitRef`].
///
/// First-parent simplification is what turns a merge-bearing history into
/// the flat sequence the bisection core requires: a merged side branch
/// collapses into the merge commit that landed it.
pub fn read_history(repo: &Repository, config: &HistoryConfig) -> Result<Vec<CommitRef>> {
    let start = match &config.rev {
        Some(rev) => repo
            .revparse_single(rev)
            .with_context(|| format!("failed to resolve revision '{rev}'"))?
            .peel_to_commit()
            .with_context(|| format!("revision '{rev}' does not point at a commit"))?,
        None => repo
            .head()
            .context("failed to resolve HEAD")?
            .peel_to_commit()
            .context("HEAD does not point at a commit")?,
    };

    let mut walker = repo.revwalk()?;
    walker.push(start.id())?;
    walker.simplify_first_parent()?;
    walker.set_sorting(git2::Sort::TOPOLOGICAL)?;

    let mut commits = Vec::new();
    for oid in walker {
        if let Some(limit) = config.limit
            && commits.len() >= limit
        {
            break;
        }
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        commits.push(commit_to_ref(&commit));
    }
    Ok(commits)
}

fn commit_to_ref(commit: &Commit) -> CommitRef {
    let author = commit.author();
    let mut commit_ref = CommitRef::new(
        commit.id().to_string(),
        author.name().unwrap_or("unknown"),
        iso8601(commit.time()),
        commit.message().unwrap_or("").trim_end(),
    );
    if let Some(email) = author.email() {
        commit_ref = commit_ref.with_email(email);
    }
    for parent_id in commit.parent_ids() {
        commit_ref = commit_ref.with_parent(parent_id.to_string());
    }
    commit_ref
}

fn iso8601(time: git2::Time) -> String {
    DateTime::<Utc>::from_timestamp(time.seconds(), 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_temp_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        (dir, repo)
    }

    fn create_commit(
        repo: &Repository,
        message: &str,
        file_name: &str,
        content: &str,
        parent: Option<&git2::Commit>,
    ) -> git2::Oid {
        let mut index = repo.index().unwrap();
        let file_path = repo.workdir().unwrap().join(file_name);
        std::fs::write(&file_path, content).unwrap();
        index.add_path(std::path::Path::new(file_name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        let parents: Vec<&git2::Commit> = parent.into_iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn chain(repo: &Repository, messages: &[&str]) -> Vec<git2::Oid> {
        let mut oids = Vec::new();
        let mut parent: Option<git2::Oid> = None;
        for (i, message) in messages.iter().enumerate() {
            let parent_commit = parent.map(|oid| repo.find_commit(oid).unwrap());
            let oid = create_commit(
                repo,
                message,
                "file.txt",
                &format!("content {i}"),
                parent_commit.as_ref(),
            );
            oids.push(oid);
            parent = Some(oid);
        }
        oids
    }

    #[test]
    fn test_history_is_newest_first() {
        let (_dir, repo) = init_temp_repo();
        let oids = chain(&repo, &["first", "second", "third"]);

        let history = read_history(&repo, &HistoryConfig::default()).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].hash, oids[2].to_string());
        assert_eq!(history[1].hash, oids[1].to_string());
        assert_eq!(history[2].hash, oids[0].to_string());
        assert_eq!(history[0].message, "third");
    }

    #[test]
    fn test_commit_fields() {
        let (_dir, repo) = init_temp_repo();
        let oids = chain(&repo, &["first", "second"]);

        let history = read_history(&repo, &HistoryConfig::default()).unwrap();
        let newest = &history[0];
        assert_eq!(newest.author, "Test User");
        assert_eq!(newest.author_email.as_deref(), Some("test@example.com"));
        assert!(newest.date.ends_with('Z'));
        assert_eq!(newest.parents, vec![oids[0].to_string()]);

        let oldest = &history[1];
        assert!(oldest.parents.is_empty());
    }

    #[test]
    fn test_limit_caps_the_walk() {
        let (_dir, repo) = init_temp_repo();
        let oids = chain(&repo, &["a", "b", "c", "d", "e"]);

        let config = HistoryConfig {
            rev: None,
            limit: Some(2),
        };
        let history = read_history(&repo, &config).unwrap();
        assert_eq!(history.len(), 2);
        // The cap keeps the newest records.
        assert_eq!(history[0].hash, oids[4].to_string());
        assert_eq!(history[1].hash, oids[3].to_string());
    }

    #[test]
    fn test_unlimited_walk() {
        let (_dir, repo) = init_temp_repo();
        chain(&repo, &["a", "b", "c"]);

        let config = HistoryConfig {
            rev: None,
            limit: None,
        };
        assert_eq!(read_history(&repo, &config).unwrap().len(), 3);
    }

    #[test]
    fn test_explicit_rev_starts_the_walk() {
        let (_dir, repo) = init_temp_repo();
        let oids = chain(&repo, &["first", "second", "third"]);

        let config = HistoryConfig {
            rev: Some("HEAD~1".to_string()),
            limit: None,
        };
        let history = read_history(&repo, &config).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].hash, oids[1].to_string());
    }

    #[test]
    fn test_merges_collapse_to_first_parent() {
        let (_dir, repo) = init_temp_repo();
        let oids = chain(&repo, &["base", "mainline"]);
        let base = repo.find_commit(oids[0]).unwrap();
        let mainline = repo.find_commit(oids[1]).unwrap();

        // A side branch off the base commit, then a merge whose first
        // parent is the mainline tip.
        let mut index = repo.index().unwrap();
        std::fs::write(repo.workdir().unwrap().join("side.txt"), "side").unwrap();
        index.add_path(std::path::Path::new("side.txt")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        let side_oid = repo
            .commit(None, &sig, &sig, "side work", &tree, &[&base])
            .unwrap();
        let side = repo.find_commit(side_oid).unwrap();
        let merge_oid = repo
            .commit(
                Some("HEAD"),
                &sig,
                &sig,
                "merge side",
                &tree,
                &[&mainline, &side],
            )
            .unwrap();

        let history = read_history(&repo, &HistoryConfig::default()).unwrap();
        let hashes: Vec<&str> = history.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(
            hashes,
            vec![
                merge_oid.to_string().as_str(),
                oids[1].to_string().as_str(),
                oids[0].to_string().as_str(),
            ],
            "side-branch commit must not appear on the first-parent walk"
        );
        // The merge record still names both parents.
        assert_eq!(history[0].parents.len(), 2);
    }

    #[test]
    fn test_unknown_rev_is_an_error() {
        let (_dir, repo) = init_temp_repo();
        chain(&repo, &["only"]);

        let config = HistoryConfig {
            rev: Some("no-such-branch".to_string()),
            limit: None,
        };
        let err = read_history(&repo, &config).unwrap_err();
        assert!(err.to_string().contains("no-such-branch"));
    }

    #[test]
    fn test_empty_repo_is_an_error() {
        let (_dir, repo) = init_temp_repo();
        assert!(read_history(&repo, &HistoryConfig::default()).is_err());
    }
}
