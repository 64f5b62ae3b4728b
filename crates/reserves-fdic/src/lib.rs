#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/reserves/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! FDIC BankFind data provider.
//!
//! This crate implements the reserves-core traits for the
//! [FDIC BankFind Suite](https://banks.data.fdic.gov/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use reserves_fdic::FdicProvider;
//! use reserves_core::{FinancialsProvider, InstitutionSearchProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Picks up FDIC_API_KEY if it is set
//!     let provider = FdicProvider::from_env();
//!
//!     let banks = provider.search_institutions("First Republic", 8).await?;
//!     if let Some(bank) = banks.first() {
//!         let latest = provider.latest_financials(bank.cert).await?;
//!         println!("{:?}", latest);
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Url};
use reserves_core::{
    CertNumber, DataProvider, FinancialsProvider, FinancialsRecord, Institution,
    InstitutionSearchProvider, Result, ReservesError,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Origin of the public BankFind API.
pub const FDIC_API_BASE: &str = "https://banks.data.fdic.gov";

/// Environment variable holding the optional API key.
pub const API_KEY_ENV: &str = "FDIC_API_KEY";

/// Environment variable overriding [`FDIC_API_BASE`].
pub const API_BASE_ENV: &str = "FDIC_API_BASE";

/// Fields requested from the institutions endpoint.
const INSTITUTION_FIELDS: &str = "CERT,NAME,CITY,STNAME";

/// Fields requested from the financials endpoint.
///
/// `CHBAL` is cash and balances due, `CHFRB` balances at the Fed, `LIAB` total
/// liabilities.
const FINANCIAL_FIELDS: &[&str] = &["NAME", "CERT", "REPDTE", "CHBAL", "CHFRB", "LIAB"];

/// Connection settings for [`FdicProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct FdicConfig {
    /// API origin, without a trailing `/api`.
    pub api_base: String,
    /// Optional API key sent as the `api_key` query parameter.
    pub api_key: Option<String>,
}

impl Default for FdicConfig {
    fn default() -> Self {
        Self {
            api_base: FDIC_API_BASE.to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for FdicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdicConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl FdicConfig {
    /// Reads [`API_KEY_ENV`] and [`API_BASE_ENV`] from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            api_base: non_blank(API_BASE_ENV).unwrap_or_else(|| FDIC_API_BASE.to_string()),
            api_key: non_blank(API_KEY_ENV),
        }
    }
}

/// FDIC BankFind data provider.
///
/// Provides access to:
/// - Institution search by name
/// - The most recent quarterly financials for an institution
///
/// Requests are issued once; there is no retry, timeout override or caching.
#[derive(Clone)]
pub struct FdicProvider {
    client: Client,
    config: FdicConfig,
}

impl fmt::Debug for FdicProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdicProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl Default for FdicProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FdicProvider {
    /// Create a provider against the public API without an API key.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FdicConfig::default())
    }

    /// Create a provider configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(FdicConfig::from_env())
    }

    /// Create a provider from an explicit config.
    #[must_use]
    pub fn with_config(config: FdicConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a provider with a custom HTTP client.
    #[must_use]
    pub const fn with_client(client: Client, config: FdicConfig) -> Self {
        Self { client, config }
    }

    /// Point the provider at a different API origin.
    #[must_use]
    pub fn with_base_url(mut self, api_base: impl Into<String>) -> Self {
        self.config.api_base = api_base.into();
        self
    }

    /// Send `api_key` with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &FdicConfig {
        &self.config
    }

    /// Build a request URL.
    ///
    /// Relative paths are resolved under `{api_base}/api/`. Parameters with no
    /// value, or an empty one, are left out. The API key, when configured, is
    /// always appended.
    pub fn url(&self, path: &str, params: &[(&str, Option<String>)]) -> Result<Url> {
        let target = if path.starts_with("http") {
            path.to_string()
        } else {
            let prefix = if path.starts_with("api/") { "" } else { "api/" };
            format!(
                "{}/{prefix}{path}",
                self.config.api_base.trim_end_matches('/')
            )
        };

        let mut url = Url::parse(&target)
            .map_err(|e| ReservesError::InvalidParameter(format!("{target}: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                    query.append_pair(key, value);
                }
            }
            if let Some(api_key) = &self.config.api_key {
                query.append_pair("api_key", api_key);
            }
        }
        if url.query().is_some_and(str::is_empty) {
            url.set_query(None);
        }

        Ok(url)
    }

    /// Make a GET request and parse the JSON response.
    pub async fn get(&self, path: &str, params: &[(&str, Option<String>)]) -> Result<Value> {
        let url = self.url(path, params)?;
        debug!(path, "FDIC request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReservesError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|t| !t.is_empty());
            warn!(path, status = status.as_u16(), "FDIC request failed");
            return Err(ReservesError::RemoteRequest {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ReservesError::Network(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| ReservesError::Parse(format!("{e}: {text}")))
    }
}

/// Escapes double quotes so `text` can sit inside a quoted search term.
#[must_use]
pub fn escape_search_term(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Pulls the `data` object out of each `{"data": [{"data": {...}}]}` row.
///
/// Returns `None` when the body does not have that shape.
fn unwrap_rows(body: Value) -> Option<Vec<Value>> {
    serde_json::from_value::<FdicEnvelope>(body)
        .ok()
        .map(|envelope| envelope.data.into_iter().map(|row| row.data).collect())
}

impl DataProvider for FdicProvider {
    fn name(&self) -> &str {
        "FDIC BankFind"
    }

    fn description(&self) -> &str {
        "FDIC BankFind Suite - Institution directory and quarterly Call Report financials"
    }
}

#[async_trait]
impl InstitutionSearchProvider for FdicProvider {
    async fn search_institutions(&self, fragment: &str, limit: usize) -> Result<Vec<Institution>> {
        let body = self
            .get(
                "institutions",
                &[
                    (
                        "search",
                        Some(format!("NAME:\"{}\"", escape_search_term(fragment))),
                    ),
                    ("fields", Some(INSTITUTION_FIELDS.to_string())),
                    ("limit", Some(limit.to_string())),
                    ("format", Some("json".to_string())),
                ],
            )
            .await?;

        let Some(rows) = unwrap_rows(body) else {
            warn!(fragment, "Unexpected institutions response shape");
            return Ok(Vec::new());
        };

        Ok(rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<Institution>(row).ok())
            .collect())
    }
}

#[async_trait]
impl FinancialsProvider for FdicProvider {
    async fn latest_financials(&self, cert: CertNumber) -> Result<Option<FinancialsRecord>> {
        let body = self
            .get(
                "financials",
                &[
                    ("filters", Some(format!("CERT:{cert}"))),
                    ("fields", Some(FINANCIAL_FIELDS.join(","))),
                    ("sort_by", Some("REPDTE".to_string())),
                    ("sort_order", Some("desc".to_string())),
                    ("limit", Some("1".to_string())),
                    ("format", Some("json".to_string())),
                ],
            )
            .await?;

        let row = unwrap_rows(body).and_then(|rows| rows.into_iter().next());
        match row {
            Some(row @ Value::Object(_)) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| ReservesError::Parse(e.to_string())),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// FDIC API Response Types
// ============================================================================

/// Top-level response of every BankFind endpoint.
#[derive(Debug, Deserialize)]
struct FdicEnvelope {
    #[serde(default)]
    data: Vec<FdicRow>,
}

/// One result row; the record itself sits under `data`.
#[derive(Debug, Deserialize)]
struct FdicRow {
    #[serde(default)]
    data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&'static str, Option<&str>)]) -> Vec<(&'static str, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (*k, v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_url_building() {
        let provider = FdicProvider::new();
        let url = provider
            .url(
                "institutions",
                &params(&[("fields", Some("CERT,NAME")), ("limit", Some("8"))]),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://banks.data.fdic.gov/api/institutions?fields=CERT%2CNAME&limit=8"
        );
    }

    #[test]
    fn test_url_skips_missing_params() {
        let provider = FdicProvider::new();
        let url = provider
            .url(
                "api/financials",
                &params(&[("filters", None), ("sort_by", Some("")), ("limit", Some("1"))]),
            )
            .unwrap();
        assert_eq!(url.as_str(), "https://banks.data.fdic.gov/api/financials?limit=1");

        let url = provider.url("financials", &[]).unwrap();
        assert_eq!(url.as_str(), "https://banks.data.fdic.gov/api/financials");
    }

    #[test]
    fn test_url_appends_api_key() {
        let provider = FdicProvider::new().with_api_key("k3y");
        let url = provider
            .url("institutions", &params(&[("format", Some("json"))]))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://banks.data.fdic.gov/api/institutions?format=json&api_key=k3y"
        );
    }

    #[test]
    fn test_url_absolute_path_and_custom_base() {
        let provider = FdicProvider::new().with_base_url("http://localhost:9000/");
        let url = provider.url("institutions", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/institutions");

        let url = provider
            .url("https://example.org/custom", &params(&[("a", Some("b"))]))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.org/custom?a=b");
    }

    #[test]
    fn test_url_encodes_search_filter() {
        let provider = FdicProvider::new();
        let url = provider
            .url(
                "institutions",
                &[("search", Some("NAME:\"First Bank\"".to_string()))],
            )
            .unwrap();
        assert_eq!(
            url.query(),
            Some("search=NAME%3A%22First+Bank%22")
        );
    }

    #[test]
    fn test_escape_search_term() {
        assert_eq!(escape_search_term("Bank \"of\" Town"), "Bank \\\"of\\\" Town");
        assert_eq!(escape_search_term("plain"), "plain");
    }

    #[test]
    fn test_unwrap_rows() {
        let rows = unwrap_rows(json!({
            "meta": {"total": 2},
            "data": [{"data": {"CERT": 1}}, {"data": {"CERT": 2}, "score": 1.0}]
        }))
        .unwrap();
        assert_eq!(rows, vec![json!({"CERT": 1}), json!({"CERT": 2})]);

        assert_eq!(unwrap_rows(json!({"meta": {}})), Some(Vec::new()));
        assert_eq!(unwrap_rows(json!({"data": "nope"})), None);
        assert_eq!(unwrap_rows(json!([1, 2, 3])), None);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = FdicConfig::from_lookup(|key| match key {
            API_KEY_ENV => Some(" secret ".to_string()),
            API_BASE_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_base, FDIC_API_BASE);

        let config = FdicConfig::from_lookup(|_| None);
        assert_eq!(config, FdicConfig::default());
    }

    #[test]
    fn test_with_client_keeps_config() {
        let config = FdicConfig {
            api_base: "http://localhost:9000".to_string(),
            api_key: Some("k3y".to_string()),
        };
        let provider = FdicProvider::with_client(Client::new(), config.clone());
        assert_eq!(provider.config(), &config);

        let url = provider.url("institutions", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/institutions?api_key=k3y");

        let provider = FdicProvider::new().with_base_url("http://other").with_api_key("x");
        assert_eq!(provider.config().api_base, "http://other");
        assert_eq!(provider.config().api_key.as_deref(), Some("x"));
    }

    #[test]
    fn test_provider_metadata() {
        let provider = FdicProvider::new();
        assert_eq!(provider.name(), "FDIC BankFind");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = FdicProvider::new().with_api_key("secret_key_12345");
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
