use std::time::Duration;

use anyhow::{Context, Result};

use super::parse::{GraphSpec, validate};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) fn fetch_graph_spec(url: &str) -> Result<GraphSpec> {
    let spec = ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .with_context(|| format!("failed to fetch graph from {url}"))?
        .into_json::<GraphSpec>()
        .with_context(|| format!("graph response from {url} was not valid JSON"))?;

    validate(spec).with_context(|| format!("graph response from {url} was rejected"))
}
