use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use super::Notebook;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to a notes server's `/api/nodes` endpoint.
#[derive(Clone, Debug)]
pub struct NotesClient {
    base_url: String,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/nodes", self.base_url)
    }

    pub fn load(&self) -> Result<Notebook> {
        let endpoint = self.endpoint();
        let record = ureq::get(&endpoint)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .with_context(|| format!("failed to fetch notes from {endpoint}"))?
            .into_json::<Value>()
            .with_context(|| format!("invalid notes record from {endpoint}"))?;

        Ok(Notebook::from_record(&record))
    }

    /// Replaces the whole stored record with `notebook`.
    pub fn save(&self, notebook: &Notebook) -> Result<()> {
        let endpoint = self.endpoint();
        ureq::put(&endpoint)
            .timeout(REQUEST_TIMEOUT)
            .send_json(notebook.to_record())
            .with_context(|| format!("failed to save notes to {endpoint}"))?;
        Ok(())
    }
}
