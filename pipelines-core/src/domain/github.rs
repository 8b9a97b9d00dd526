//! GitHub and integration (kolkrabbi) domain types

use serde::{Deserialize, Serialize};

/// GitHub credentials linked to the platform account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubAccount {
    pub github: GitHubToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubToken {
    pub token: String,
}

/// Link between an app and a GitHub repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppLink {
    /// Repository in `owner/name` form
    pub repo: String,
    #[serde(default)]
    pub auto_deploy: Option<bool>,
    #[serde(default)]
    pub branch: Option<String>,
}

/// GitHub repository metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    #[serde(alias = "full_name")]
    pub name: String,
    pub default_branch: String,
}

/// Result of `GET /repos/{repo}/compare/{base}...{head}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub ahead_by: u64,
    #[serde(default)]
    pub commits: Vec<GitHubCommit>,
}

/// A commit entry of a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    pub author: CommitAuthor,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: chrono::DateTime<chrono::Utc>,
}

impl GitHubCommit {
    /// First 7 characters of the commit sha
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.commit.message.lines().next().unwrap_or("")
    }
}
