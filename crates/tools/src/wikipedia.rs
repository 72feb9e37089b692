//! Wikipedia capabilities — search, summary, and page coordinates.
//!
//! All three talk to the MediaWiki action API (`/w/api.php`). Not-found
//! and disambiguation conditions are rendered as descriptive result
//! strings so the model can reformulate its query; only transport and
//! decode failures become capability errors.

use async_trait::async_trait;
use reagent_core::capability::{ArgValue, Capability, ParamKind, ParamSpec};
use reagent_core::error::CapabilityError;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";
const USER_AGENT: &str = "reagent/0.1 (https://github.com/reagent-rs/reagent)";

/// Maximum sentences the summary endpoint will return.
const MAX_SUMMARY_SENTENCES: u32 = 10;

/// Shared HTTP client for the MediaWiki action API.
#[derive(Clone)]
pub struct WikiClient {
    base_url: String,
    client: reqwest::Client,
}

impl WikiClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            client,
        }
    }

    /// Create with a custom base URL (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn query(
        &self,
        capability: &str,
        params: &[(&str, String)],
    ) -> Result<QueryResponse, CapabilityError> {
        let url = format!("{}/w/api.php", self.base_url);
        let mut query: Vec<(&str, String)> = vec![
            ("action", "query".into()),
            ("format", "json".into()),
            ("redirects", "1".into()),
        ];
        query.extend(params.iter().cloned());

        debug!(capability, "Querying MediaWiki API");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| CapabilityError::InvocationFailed {
                name: capability.into(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CapabilityError::InvocationFailed {
                name: capability.into(),
                reason: format!("Wikipedia API returned status {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| CapabilityError::InvocationFailed {
                name: capability.into(),
                reason: format!("failed to decode Wikipedia response: {e}"),
            })
    }
}

impl Default for WikiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Searches Wikipedia and returns matching page titles.
pub struct SearchPage {
    wiki: WikiClient,
}

impl SearchPage {
    pub fn new(wiki: WikiClient) -> Self {
        Self { wiki }
    }
}

#[async_trait]
impl Capability for SearchPage {
    fn name(&self) -> &str {
        "search_wikipedia_page"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new("query", ParamKind::Str)]
    }

    fn description(&self) -> &str {
        "Searches Wikipedia for a query and returns relevant page titles. Useful before wikipedia_summary or wikipedia_coordinates, which need an exact page title. Example: search_wikipedia_page(\"WW2 casualties\")"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        let query = single_string_arg(self.name(), args)?;

        let response = self
            .wiki
            .query(
                self.name(),
                &[
                    ("list", "search".into()),
                    ("srsearch", query.to_string()),
                    ("srlimit", "5".into()),
                ],
            )
            .await?;

        let titles = response.search_titles();
        if titles.is_empty() {
            Ok(format!("Wikipedia page for '{query}' not found."))
        } else {
            Ok(titles.join("; "))
        }
    }
}

/// Returns the coordinates recorded on a Wikipedia page, if any.
pub struct PageCoordinates {
    wiki: WikiClient,
}

impl PageCoordinates {
    pub fn new(wiki: WikiClient) -> Self {
        Self { wiki }
    }
}

#[async_trait]
impl Capability for PageCoordinates {
    fn name(&self) -> &str {
        "wikipedia_coordinates"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new("page_title", ParamKind::Str)]
    }

    fn description(&self) -> &str {
        "Provides the latitude and longitude for a Wikipedia page describing a location. Use search_wikipedia_page first to get the exact page title. Example: wikipedia_coordinates(\"Tallahassee, Florida\")"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        let page_title = single_string_arg(self.name(), args)?;

        let response = self
            .wiki
            .query(
                self.name(),
                &[
                    ("prop", "coordinates".into()),
                    ("titles", page_title.to_string()),
                ],
            )
            .await?;

        match response.first_page() {
            Some(page) if !page.is_missing() => match page.first_coordinates() {
                Some((lat, lon)) => Ok(format!("latitude {lat}, longitude {lon}")),
                None => Ok(format!(
                    "Wikipedia page '{page_title}' has no recorded coordinates."
                )),
            },
            _ => Ok(format!("Wikipedia page for '{page_title}' not found.")),
        }
    }
}

/// Returns a plain-text summary of a Wikipedia page.
pub struct PageSummary {
    wiki: WikiClient,
}

impl PageSummary {
    pub fn new(wiki: WikiClient) -> Self {
        Self { wiki }
    }
}

#[async_trait]
impl Capability for PageSummary {
    fn name(&self) -> &str {
        "wikipedia_summary"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("query", ParamKind::Str),
            ParamSpec::new("sentences", ParamKind::Int),
        ]
    }

    fn description(&self) -> &str {
        "Searches Wikipedia for a query and returns a summary of up to 10 sentences. The sentences argument is optional (default 10). Example: wikipedia_summary(\"United States president\", 5)"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        if args.is_empty() || args.len() > 2 {
            return Err(CapabilityError::InvalidArguments {
                name: self.name().into(),
                reason: format!("expected a query and optional sentence count, got {} arguments", args.len()),
            });
        }
        let query = args[0]
            .as_str()
            .ok_or_else(|| CapabilityError::InvalidArguments {
                name: self.name().into(),
                reason: format!("query is not a string: {}", args[0]),
            })?;
        let sentences = match args.get(1) {
            Some(arg) => arg
                .as_i64()
                .filter(|n| *n > 0)
                .ok_or_else(|| CapabilityError::InvalidArguments {
                    name: self.name().into(),
                    reason: format!("sentences is not a positive integer: {arg}"),
                })? as u32,
            None => MAX_SUMMARY_SENTENCES,
        }
        .min(MAX_SUMMARY_SENTENCES);

        let response = self
            .wiki
            .query(
                self.name(),
                &[
                    ("prop", "extracts|pageprops".into()),
                    ("ppprop", "disambiguation".into()),
                    ("explaintext", "1".into()),
                    ("exsentences", sentences.to_string()),
                    ("titles", query.to_string()),
                ],
            )
            .await?;

        match response.first_page() {
            Some(page) if page.is_disambiguation() => Ok(format!(
                "The query '{query}' is ambiguous. Try a more specific query, or use search_wikipedia_page to list candidate titles."
            )),
            Some(page) if !page.is_missing() => match &page.extract {
                Some(extract) if !extract.is_empty() => Ok(extract.clone()),
                _ => Ok(format!("Wikipedia page for '{query}' not found.")),
            },
            _ => Ok(format!("Wikipedia page for '{query}' not found.")),
        }
    }
}

fn single_string_arg<'a>(
    name: &str,
    args: &'a [ArgValue],
) -> Result<&'a str, CapabilityError> {
    if args.len() != 1 {
        return Err(CapabilityError::InvalidArguments {
            name: name.into(),
            reason: format!("expected 1 string argument, got {}", args.len()),
        });
    }
    args[0]
        .as_str()
        .ok_or_else(|| CapabilityError::InvalidArguments {
            name: name.into(),
            reason: format!("argument is not a string: {}", args[0]),
        })
}

// --- MediaWiki API types (internal) ---

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    pages: HashMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    coordinates: Vec<Coordinates>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    lat: f64,
    lon: f64,
}

impl QueryResponse {
    fn search_titles(&self) -> Vec<String> {
        self.query
            .as_ref()
            .map(|q| q.search.iter().map(|h| h.title.clone()).collect())
            .unwrap_or_default()
    }

    fn first_page(&self) -> Option<&WikiPage> {
        self.query.as_ref().and_then(|q| q.pages.values().next())
    }
}

impl WikiPage {
    fn is_missing(&self) -> bool {
        self.missing.is_some()
    }

    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|p| p.disambiguation.is_some())
    }

    fn first_coordinates(&self) -> Option<(f64, f64)> {
        self.coordinates.first().map(|c| (c.lat, c.lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_search_response() {
        let data = r#"{
            "query": {
                "search": [
                    {"ns": 0, "title": "World War II casualties", "pageid": 1},
                    {"ns": 0, "title": "World War I casualties", "pageid": 2}
                ]
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            parsed.search_titles(),
            vec!["World War II casualties", "World War I casualties"]
        );
    }

    #[test]
    fn parse_empty_search_response() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"query": {"search": []}}"#).unwrap();
        assert!(parsed.search_titles().is_empty());
    }

    #[test]
    fn parse_extract_page() {
        let data = r#"{
            "query": {
                "pages": {
                    "736": {"pageid": 736, "title": "Albert Einstein", "extract": "Albert Einstein was a theoretical physicist."}
                }
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(data).unwrap();
        let page = parsed.first_page().unwrap();
        assert!(!page.is_missing());
        assert!(!page.is_disambiguation());
        assert!(page.extract.as_deref().unwrap().contains("physicist"));
    }

    #[test]
    fn parse_missing_page() {
        let data = r#"{
            "query": {
                "pages": {
                    "-1": {"ns": 0, "title": "Nonexistent", "missing": ""}
                }
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.first_page().unwrap().is_missing());
    }

    #[test]
    fn parse_disambiguation_page() {
        let data = r#"{
            "query": {
                "pages": {
                    "123": {"title": "Mercury", "pageprops": {"disambiguation": ""}}
                }
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.first_page().unwrap().is_disambiguation());
    }

    #[test]
    fn parse_coordinates_page() {
        let data = r#"{
            "query": {
                "pages": {
                    "30": {"title": "Tallahassee, Florida", "coordinates": [{"lat": 30.45, "lon": -84.25, "primary": "", "globe": "earth"}]}
                }
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(data).unwrap();
        let page = parsed.first_page().unwrap();
        assert_eq!(page.first_coordinates(), Some((30.45, -84.25)));
    }

    #[tokio::test]
    async fn search_rejects_non_string_argument() {
        let cap = SearchPage::new(WikiClient::default());
        let err = cap.invoke(&[ArgValue::Int(5)]).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn summary_rejects_zero_sentences() {
        let cap = PageSummary::new(WikiClient::default());
        let err = cap
            .invoke(&[ArgValue::Str("Einstein".into()), ArgValue::Int(0)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }

    #[tokio::test]
    async fn coordinates_rejects_wrong_arity() {
        let cap = PageCoordinates::new(WikiClient::default());
        let err = cap.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments { .. }));
    }
}
