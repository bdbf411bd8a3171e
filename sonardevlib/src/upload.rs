//! Artifact upload into a local server installation.
//!
//! Staging a freshly built plugin is a three-phase sequence: validate the
//! installation and the artifact, copy the artifact into the server's
//! download directory, then ask the running server to restart over HTTP.
//! The phases are public so the restart can be retried without copying
//! again. Nothing is rolled back when a later phase fails.

use std::fs;
use std::path::PathBuf;

use reqwest::StatusCode;
use tracing::info;
use url::Url;

use crate::error::SonardevError;
use crate::Result;

/// Base URL assumed when no server URL is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9000";

/// File that identifies a directory as a server installation.
const SERVER_MARKER: &str = "conf/sonar.properties";

/// Directory under the server home that the server polls for staged plugins.
const DOWNLOADS_DIR: &str = "extensions/downloads";

/// Restart endpoint, resolved against the server URL's authority.
const RESTART_ENDPOINT: &str = "/api/system/restart";

/// Copies a plugin artifact into a local server installation and restarts
/// the server.
#[derive(Debug, Clone)]
pub struct Uploader {
    server_home: PathBuf,
    artifact: PathBuf,
    server_url: Url,
}

impl Uploader {
    /// Create an uploader for `artifact`, targeting the installation at
    /// `server_home` reachable at `server_url`.
    pub fn new(
        server_home: impl Into<PathBuf>,
        artifact: impl Into<PathBuf>,
        server_url: &str,
    ) -> Result<Self> {
        let server_url = Url::parse(server_url).map_err(|source| SonardevError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self {
            server_home: server_home.into(),
            artifact: artifact.into(),
            server_url,
        })
    }

    /// Run the full sequence: check, copy, restart.
    ///
    /// Returns the path the artifact was staged at. A restart failure leaves
    /// the staged copy in place; the server will pick it up on its next
    /// manual restart.
    pub fn run(&self) -> Result<PathBuf> {
        self.check()?;
        let staged = self.copy_artifact()?;
        self.restart_server()?;
        Ok(staged)
    }

    /// Validate the server home, its configuration marker, and the artifact.
    ///
    /// Runs before any side effect; a failure here means nothing was copied
    /// and no request was sent.
    pub fn check(&self) -> Result<()> {
        if !self.server_home.exists() {
            return Err(SonardevError::ServerHomeNotFound(self.server_home.clone()));
        }
        if !self.server_home.is_dir() {
            return Err(SonardevError::NotADirectory(self.server_home.clone()));
        }
        if !self.server_home.join(SERVER_MARKER).is_file() {
            return Err(SonardevError::NotAServerHome(self.server_home.clone()));
        }
        if !self.artifact.is_file() {
            return Err(SonardevError::ArtifactNotFound(self.artifact.clone()));
        }
        Ok(())
    }

    /// Copy the artifact into `extensions/downloads/` under the server home,
    /// creating the directory if needed, and return the destination path.
    ///
    /// An existing file with the same name is overwritten.
    pub fn copy_artifact(&self) -> Result<PathBuf> {
        let downloads = self.server_home.join(DOWNLOADS_DIR);
        let file_name = self
            .artifact
            .file_name()
            .ok_or_else(|| SonardevError::ArtifactNotFound(self.artifact.clone()))?;
        let dest = downloads.join(file_name);

        info!("copying {} to {}", self.artifact.display(), dest.display());
        fs::create_dir_all(&downloads).map_err(|source| SonardevError::Copy {
            from: self.artifact.clone(),
            to: downloads.clone(),
            source,
        })?;
        fs::copy(&self.artifact, &dest).map_err(|source| SonardevError::Copy {
            from: self.artifact.clone(),
            to: dest.clone(),
            source,
        })?;

        Ok(dest)
    }

    /// POST to the restart endpoint and require `204 No Content`.
    ///
    /// The endpoint path is absolute, so a base URL carrying its own path
    /// still resolves to `<authority>/api/system/restart`.
    pub fn restart_server(&self) -> Result<()> {
        let endpoint = self
            .server_url
            .join(RESTART_ENDPOINT)
            .map_err(|source| SonardevError::InvalidUrl {
                url: self.server_url.to_string(),
                source,
            })?;

        info!("restarting server at {endpoint}");
        let client = reqwest::blocking::Client::builder().build().map_err(|source| {
            SonardevError::RestartRequest {
                url: endpoint.to_string(),
                source,
            }
        })?;
        let response = client.post(endpoint.clone()).send().map_err(|source| {
            SonardevError::RestartRequest {
                url: endpoint.to_string(),
                source,
            }
        })?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(SonardevError::RestartRejected {
                url: endpoint.to_string(),
                status: response.status(),
            });
        }

        info!("server restarted");
        Ok(())
    }
}
