//! Blocking GitHub REST client for gists and repository contents.
//!
//! | Operation        | Endpoint                                         |
//! |------------------|--------------------------------------------------|
//! | create gist      | `POST  /gists`                                   |
//! | update gist      | `PATCH /gists/{id}`                              |
//! | read file        | `GET   /repos/{owner}/{repo}/contents/{path}?ref=` |
//! | create/update file | `PUT /repos/{owner}/{repo}/contents/{path}`    |

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use resk_core::{RemoteRef, SnippetName};
use resk_sync::StoredFile;

use crate::error::GitHubError;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("resk/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around a `ureq` agent with GitHub headers and auth.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
    public: bool,
}

#[derive(Debug, Deserialize)]
struct ContentsFile {
    #[serde(default)]
    content: Option<String>,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GitHubClient {
    /// Client for api.github.com. Without a token only public reads work.
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Client for another API root (GitHub Enterprise, test servers).
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            public: true,
        }
    }

    /// Create secret gists instead of public ones.
    pub fn secret_gists(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Gists
    // -----------------------------------------------------------------------

    /// Create a single-file gist named `name`.
    pub fn create_gist(&self, name: &SnippetName, content: &str) -> Result<RemoteRef, GitHubError> {
        let url = format!("{}/gists", self.base_url);
        let body = json!({
            "public": self.public,
            "files": { name.as_str(): { "content": content } },
        });
        let resp = self.send("POST", &url, &[], Some(body))?;
        decode(&url, resp)
    }

    /// Replace the content of file `name` in gist `id`.
    pub fn update_gist(
        &self,
        id: &str,
        name: &SnippetName,
        content: &str,
    ) -> Result<RemoteRef, GitHubError> {
        let url = format!("{}/gists/{id}", self.base_url);
        let body = json!({
            "files": { name.as_str(): { "content": content } },
        });
        let resp = self.send("PATCH", &url, &[], Some(body))?;
        decode(&url, resp)
    }

    // -----------------------------------------------------------------------
    // Repository contents
    // -----------------------------------------------------------------------

    /// Read a file; `Ok(None)` on 404 or when `path` is a directory.
    pub fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<StoredFile>, GitHubError> {
        let url = self.contents_url(owner, repo, path);
        let resp = match self.send("GET", &url, &[("ref", git_ref)], None) {
            Ok(resp) => resp,
            Err(err) if err.status() == Some(404) => return Ok(None),
            Err(err) => return Err(err),
        };

        let value: Value = decode(&url, resp)?;
        if value.is_array() {
            return Ok(None);
        }
        let file: ContentsFile = serde_json::from_value(value).map_err(|e| GitHubError::Decode {
            url: url.clone(),
            source: std::io::Error::other(e),
        })?;
        Ok(Some(StoredFile {
            content: file.content.unwrap_or_default(),
            sha: file.sha,
        }))
    }

    /// Create or update a file. `sha` must be the current blob sha when the
    /// file exists.
    #[allow(clippy::too_many_arguments)]
    pub fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        sha: Option<&str>,
        message: &str,
        branch: &str,
    ) -> Result<(), GitHubError> {
        let url = self.contents_url(owner, repo, path);
        let mut body = json!({
            "message": message,
            "content": content,
            "branch": branch,
        });
        if let Some(sha) = sha {
            body["sha"] = Value::String(sha.to_string());
        }
        self.send("PUT", &url, &[], Some(body))?;
        Ok(())
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{owner}/{repo}/contents/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }

    fn send(
        &self,
        method: &'static str,
        url: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<ureq::Response, GitHubError> {
        let mut req = self
            .agent
            .request(method, url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            req = req.set("Authorization", &format!("Bearer {token}"));
        }
        for (key, value) in query {
            req = req.query(key, value);
        }

        tracing::debug!(method, url, "github request");
        let result = match body {
            Some(body) => req.send_json(body),
            None => req.call(),
        };
        result.map_err(|err| match err {
            ureq::Error::Status(status, resp) => GitHubError::Status {
                method,
                url: url.to_string(),
                status,
                message: error_message(resp),
            },
            ureq::Error::Transport(transport) => GitHubError::Transport {
                url: url.to_string(),
                source: Box::new(transport),
            },
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(url: &str, resp: ureq::Response) -> Result<T, GitHubError> {
    resp.into_json().map_err(|source| GitHubError::Decode {
        url: url.to_string(),
        source,
    })
}

fn error_message(resp: ureq::Response) -> String {
    let text = resp.into_string().unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = GitHubClient::with_base_url("https://ghe.example.com/api/v3/", None);
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(
            client.contents_url("o", "r", "/.github/resk.json"),
            "https://ghe.example.com/api/v3/repos/o/r/contents/.github/resk.json"
        );
    }

    #[test]
    fn user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("resk/"));
    }
}
