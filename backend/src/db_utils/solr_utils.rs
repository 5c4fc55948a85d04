use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SearchConfig;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RawSelectResponse {
    #[serde(rename = "responseHeader", default)]
    pub response_header: RawResponseHeader,
    pub response: RawResultPage,
    #[serde(default)]
    pub facet_counts: Option<RawFacetCounts>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RawResponseHeader {
    #[serde(default)]
    pub status: i64,
    #[serde(rename = "QTime", default)]
    pub qtime: u64,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RawResultPage {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RawFacetCounts {
    /// Per field, a flat `[value, count, value, count, ...]` list.
    #[serde(default)]
    pub facet_fields: IndexMap<String, Vec<serde_json::Value>>,
}

/// Runs one `select` request. Any non-success status is an error carrying the body.
pub async fn solr_select(
    client: &reqwest::Client,
    config: &SearchConfig,
    params: &[(String, String)],
) -> anyhow::Result<RawSelectResponse> {
    let query_hash = sha256::digest(format!("{params:?}"));
    let t0 = std::time::Instant::now();

    let response = client.get(config.select_url()).query(params).send().await?;
    let status = response.status();
    let response_txt = response.text().await?;
    if status.is_client_error() || status.is_server_error() {
        anyhow::bail!("Error: {}: {}", status, response_txt);
    }
    let dt_ms = t0.elapsed().as_millis();
    debug!("solr response {}: len = {}", &query_hash[..12], response_txt.len());

    let response: RawSelectResponse = serde_json::from_str(&response_txt)?;
    info!(
        "solr select {}: {} hits in {}ms (QTime {}ms)",
        &query_hash[..12],
        response.response.num_found,
        dt_ms,
        response.response_header.qtime
    );
    Ok(response)
}

/// `2024-01-15T10:30:00Z` -> `15/01/2024 10:30`, in UTC. Anything unparseable is returned as-is.
pub fn format_solr_datetime(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc).format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Flattens a stored field to display text: arrays are joined with `, `, null is empty.
pub fn solr_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(solr_value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
