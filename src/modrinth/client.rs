use crate::error::{AuditError, Result};
use crate::registry::{ModMetadata, ModVersionRecord, RegistryClient};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";
const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// Blocking client for the Modrinth v2 project API
pub struct ModrinthClient {
    client: Client,
    base_url: Url,
}

impl ModrinthClient {
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Self::validate_base_url(base_url)?;
        let client = Self::build_client(timeout)?;

        Ok(Self { client, base_url })
    }

    /// `{base}/project/{id}` plus any trailing segments, with the id percent-encoded.
    fn project_url(&self, project_id: &str, trailing: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AuditError::lookup(project_id, "registry URL cannot take a path"))?
            .pop_if_empty()
            .push("project")
            .push(project_id)
            .extend(trailing);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, project_id: &str, url: Url) -> Result<T> {
        debug!(%url, "Fetching");

        let response = self.client.get(url.clone()).send().map_err(|e| {
            warn!(%url, error = %e, "Request failed");
            AuditError::lookup(project_id, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Registry returned an error status");
            return Err(AuditError::lookup(project_id, format!("HTTP {status}")));
        }

        let text = response
            .text()
            .map_err(|e| AuditError::lookup(project_id, e))?;

        if text.len() > MAX_RESPONSE_BYTES {
            return Err(AuditError::lookup(
                project_id,
                "registry response exceeded 10MB limit",
            ));
        }

        serde_json::from_str(&text)
            .map_err(|e| AuditError::lookup(project_id, format!("unexpected payload: {e}")))
    }

    fn build_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mrpack-audit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuditError::Io(std::io::Error::other(e)))
    }

    fn validate_base_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url)
            .map_err(|_| AuditError::Config(format!("Invalid registry URL: {url}")))?;

        match parsed.scheme() {
            "https" | "http" => {}
            scheme => {
                return Err(AuditError::Config(format!(
                    "Unsupported registry scheme: {scheme}"
                )));
            }
        }

        if parsed.cannot_be_a_base() {
            return Err(AuditError::Config(format!("Invalid registry URL: {url}")));
        }

        Ok(parsed)
    }
}

impl RegistryClient for ModrinthClient {
    fn fetch_metadata(&self, project_id: &str) -> Result<ModMetadata> {
        let url = self.project_url(project_id, &[])?;
        self.get_json(project_id, url)
    }

    fn fetch_versions(&self, project_id: &str) -> Result<Vec<ModVersionRecord>> {
        let url = self.project_url(project_id, &["version"])?;
        let versions: Vec<ModVersionRecord> = self.get_json(project_id, url)?;
        debug!(project_id, count = versions.len(), "Fetched version list");
        Ok(versions)
    }
}
