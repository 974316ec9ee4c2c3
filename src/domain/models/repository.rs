use serde::{Deserialize, Serialize};

/// Owner of a repository as shown next to it in lists and headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

/// Entry of the searched repositories list.
///
/// This is also the persisted shape, so field order and names are part of the
/// stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub description: Option<String>,
    pub owner: Owner,
}

/// Repository metadata shown on the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    pub full_name: String,
    pub description: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub html_url: String,
    pub owner: Owner,
}

impl From<RepositoryDetails> for Repository {
    fn from(details: RepositoryDetails) -> Self {
        Self {
            full_name: details.full_name,
            description: details.description,
            owner: details.owner,
        }
    }
}
