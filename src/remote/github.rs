//! [`RemoteSource`] backed by the GitHub contents API and raw file host.
use std::time::Duration;

use serde::Deserialize;

use super::{MAX_FILE_SIZE, Manifest, RemoteSource};
use crate::config::RepoConfig;
use crate::error::RemoteError;

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";
const USER_AGENT: &str = "airc-cli";
const TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of a contents API directory listing.
#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Blocking GitHub client for one repository.
#[derive(Debug)]
pub struct GitHubSource {
    agent: ureq::Agent,
    repo: RepoConfig,
}

impl GitHubSource {
    /// Create a client for `repo`, authenticating with its token if set.
    #[must_use]
    pub fn new(repo: RepoConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(TIMEOUT))
            .build()
            .into();
        Self { agent, repo }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{API_BASE}/repos/{}/{}/contents/{path}?ref={}",
            self.repo.owner, self.repo.name, self.repo.branch
        )
    }

    fn raw_url(&self, path: &str) -> String {
        format!(
            "{RAW_BASE}/{}/{}/{}/{path}",
            self.repo.owner, self.repo.name, self.repo.branch
        )
    }

    fn get(&self, url: &str) -> Result<ureq::http::Response<ureq::Body>, RemoteError> {
        let mut request = self.agent.get(url).header("User-Agent", USER_AGENT);
        if let Some(token) = self.repo.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
            .call()
            .map_err(|e| RemoteError::Network(e.to_string()))
    }

    /// GET a contents API listing of `path`, reporting 404 as `resource`.
    fn list_dir(&self, path: &str, resource: &str) -> Result<Vec<ContentItem>, RemoteError> {
        let mut response = self.get(&self.contents_url(path))?;
        let reset = header_str(&response, "x-ratelimit-reset");
        check_status(response.status().as_u16(), reset.as_deref(), resource)?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))
    }

    fn walk(&self, path: &str, profile: &str, files: &mut Vec<String>) -> Result<(), RemoteError> {
        for item in self.list_dir(path, &format!("profiles/{profile}"))? {
            match item.kind.as_str() {
                "file" => files.push(item.path),
                "dir" => self.walk(&item.path, profile, files)?,
                _ => {}
            }
        }
        Ok(())
    }
}

impl RemoteSource for GitHubSource {
    fn list_profiles(&self) -> Result<Vec<String>, RemoteError> {
        Ok(self
            .list_dir("profiles", "profiles")?
            .into_iter()
            .filter(|item| item.kind == "dir")
            .map(|item| item.name)
            .collect())
    }

    fn fetch_manifest(&self, profile: &str) -> Option<Manifest> {
        let mut response = self
            .get(&self.raw_url(&format!("profiles/{profile}/files.json")))
            .ok()?;
        if response.status().as_u16() != 200 {
            return None;
        }
        let body = response.body_mut().read_to_string().ok()?;
        Manifest::parse(&body)
    }

    fn list_files(&self, profile: &str) -> Result<Vec<String>, RemoteError> {
        let mut files = Vec::new();
        self.walk(&format!("profiles/{profile}"), profile, &mut files)?;
        Ok(files)
    }

    fn download(&self, repo_path: &str) -> Result<Vec<u8>, RemoteError> {
        let too_large = || RemoteError::FileTooLarge {
            path: repo_path.to_string(),
            limit_mb: MAX_FILE_SIZE / 1024 / 1024,
        };

        let mut response = self.get(&self.raw_url(repo_path))?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(RemoteError::Download {
                path: repo_path.to_string(),
                reason: format!("HTTP {status}"),
            });
        }
        let declared = header_str(&response, "content-length").and_then(|v| v.parse::<u64>().ok());
        if declared.is_some_and(|len| len > MAX_FILE_SIZE) {
            return Err(too_large());
        }

        response
            .body_mut()
            .with_config()
            .limit(MAX_FILE_SIZE)
            .read_to_vec()
            .map_err(|e| match e {
                ureq::Error::BodyExceedsLimit(_) => too_large(),
                other => RemoteError::Download {
                    path: repo_path.to_string(),
                    reason: other.to_string(),
                },
            })
    }
}

fn header_str(response: &ureq::http::Response<ureq::Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Map a contents API status to a result.
fn check_status(status: u16, reset: Option<&str>, resource: &str) -> Result<(), RemoteError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(RemoteError::NotFound(resource.to_string())),
        403 => Err(RemoteError::RateLimited {
            reset: render_reset(reset),
        }),
        code => Err(RemoteError::Status(code)),
    }
}

/// Render an `x-ratelimit-reset` epoch value as a UTC time.
fn render_reset(reset: Option<&str>) -> String {
    reset
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || "unknown".to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
}
