//! [`PublishPort`] and [`RepoStateStore`] on top of [`GitHubClient`].

use resk_core::{RemoteRef, SnippetName};
use resk_sync::{BoxError, PublishPort, RepoStateStore, StoreError, StoredFile};

use crate::client::GitHubClient;
use crate::error::GitHubError;

impl PublishPort for GitHubClient {
    fn create(&self, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError> {
        Ok(self.create_gist(name, source)?)
    }

    fn update(&self, id: &str, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError> {
        Ok(self.update_gist(id, name, source)?)
    }
}

/// Contents API of one repository, used as the dump store.
#[derive(Debug, Clone)]
pub struct RepoContents<'a> {
    client: &'a GitHubClient,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Dump store for `owner/repo`.
    pub fn repo(&self, owner: impl Into<String>, repo: impl Into<String>) -> RepoContents<'_> {
        RepoContents {
            client: self,
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl RepoStateStore for RepoContents<'_> {
    fn read(&self, path: &str, git_ref: &str) -> Result<Option<StoredFile>, StoreError> {
        self.client
            .get_contents(&self.owner, &self.repo, path, git_ref)
            .map_err(|e| StoreError::Backend(Box::new(e)))
    }

    fn write(
        &self,
        path: &str,
        content: &str,
        prior_sha: Option<&str>,
        message: &str,
        git_ref: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_contents(&self.owner, &self.repo, path, content, prior_sha, message, git_ref)
            .map_err(|e| store_error(path, e))
    }
}

/// 409: sha does not match. 422 is a conflict only when GitHub complains
/// about the sha (e.g. `"sha" wasn't supplied`); other 422s are validation
/// failures such as an unknown branch.
fn store_error(path: &str, err: GitHubError) -> StoreError {
    let conflict = match &err {
        GitHubError::Status { status: 409, .. } => true,
        GitHubError::Status {
            status: 422,
            message,
            ..
        } => message.contains("sha"),
        _ => false,
    };
    if conflict {
        StoreError::Conflict {
            path: path.to_string(),
        }
    } else {
        StoreError::Backend(Box::new(err))
    }
}
