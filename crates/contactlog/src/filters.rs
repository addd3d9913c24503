//! Block-list retrieval from the Quickbase record store.
//!
//! Credentials and per-list table/column ids come from the environment
//! (see the README). Any failure here is returned to the caller, which
//! logs a warning and runs the export unfiltered; retrieval problems are
//! never fatal.

use std::collections::{BTreeSet, HashMap};
use std::env;

use anyhow::{Context, Result};
use contactlog_core::FilterList;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

const QUERY_URL: &str = "https://api.quickbase.com/v1/records/query";

/// One record-query response: a list of records keyed by field id.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Vec<HashMap<String, Field>>,
}

#[derive(Debug, Deserialize)]
struct Field {
    value: serde_json::Value,
}

/// Loads all four block-lists.
///
/// # Errors
///
/// Returns an error if credentials are missing from the environment or any
/// of the queries fails; partial results are never returned.
pub fn load_filters() -> Result<FilterList> {
    info!("Loading updated filters from Quickbase");
    let client = QuickbaseClient::from_env()?;
    Ok(FilterList {
        domains: client.fetch_list("DOMAINS")?,
        emails: client.fetch_list("EMAILS")?,
        keywords: client.fetch_list("KEYWORDS")?,
        staff: client.fetch_list("STAFF")?,
    })
}

/// Minimal Quickbase records-API client.
struct QuickbaseClient {
    http: reqwest::blocking::Client,
    realm: String,
    user_agent: String,
    token: String,
}

impl QuickbaseClient {
    fn from_env() -> Result<Self> {
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            realm: require_env("QB_REALM_HOSTNAME")?,
            user_agent: require_env("QB_USER_AGENT")?,
            token: require_env("QB_TOKEN")?,
        })
    }

    /// Fetches one list; `prefix` selects the `*_TABLE_ID` / `*_COLUMN_ID`
    /// environment pair.
    fn fetch_list(&self, prefix: &str) -> Result<BTreeSet<String>> {
        let table_id = require_env(&format!("{prefix}_TABLE_ID"))?;
        let column: u32 = require_env(&format!("{prefix}_COLUMN_ID"))?
            .parse()
            .with_context(|| format!("{prefix}_COLUMN_ID is not a field id"))?;

        let body = json!({
            "from": table_id,
            "select": [column],
            "where": format!("{{{column}.XEX.''}}"),
            "options": {"skip": 0, "top": 0, "compareWithAppLocalTime": false},
        });

        debug!(list = prefix, table = %table_id, "querying filter list");
        let response = self
            .http
            .post(QUERY_URL)
            .header("QB-Realm-Hostname", &self.realm)
            .header("User-Agent", &self.user_agent)
            .header("Authorization", &self.token)
            .json(&body)
            .send()
            .context("sending Quickbase query")?
            .error_for_status()
            .context("Quickbase returned an error status")?
            .json::<QueryResponse>()
            .context("decoding Quickbase response")?;

        Ok(values_from_response(&response, &column.to_string()))
    }
}

fn values_from_response(response: &QueryResponse, column_id: &str) -> BTreeSet<String> {
    response
        .data
        .iter()
        .filter_map(|record| record.get(column_id))
        .filter_map(|field| field.value.as_str())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing environment variable {name}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_values_from_response() {
        let response: QueryResponse = serde_json::from_value(json!({
            "data": [
                {"6": {"value": "spam.example"}},
                {"6": {"value": "junk.example"}},
                {"6": {"value": ""}},
                {"6": {"value": 42}},
            ]
        }))
        .unwrap();

        let values = values_from_response(&response, "6");
        assert_eq!(values.len(), 2);
        assert!(values.contains("spam.example"));
        assert!(values.contains("junk.example"));
    }

    #[test]
    fn test_values_ignore_other_columns() {
        let response: QueryResponse = serde_json::from_value(json!({
            "data": [{"7": {"value": "spam.example"}}]
        }))
        .unwrap();

        assert!(values_from_response(&response, "6").is_empty());
    }
}
