use crate::error::{Error, Result};
use crate::extract::{Extractor, PageSpeedResponse};
use crate::results::{AnalysisReport, StrategyResult};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Category the full analysis path restricts the upstream report to
pub const PERFORMANCE_CATEGORY: &str = "performance";

/// Device emulation used by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body returned by Google APIs
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the PageSpeed Insights `runPagespeed` endpoint
#[derive(Debug, Clone)]
pub struct PageSpeedClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    category: Option<String>,
}

impl PageSpeedClient {
    /// Create a client for the given endpoint and API key
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            category: None,
        }
    }

    /// Reuse an existing HTTP client (and its connection pool)
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Restrict reports to a single category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Build the upstream request URL for one strategy
    pub fn request_url(&self, target_url: &str, strategy: Strategy) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            Error::Config(format!("Endpoint do PageSpeed inválido ({}): {}", self.endpoint, e))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("url", target_url)
                .append_pair("key", &self.api_key)
                .append_pair("strategy", strategy.as_str());
            if let Some(category) = &self.category {
                query.append_pair("category", category);
            }
        }

        Ok(url)
    }

    /// Fetch the raw report for one strategy
    pub async fn fetch(&self, target_url: &str, strategy: Strategy) -> Result<PageSpeedResponse> {
        let url = self.request_url(target_url, strategy)?;
        ::log::debug!("Requesting {} analysis of {}", strategy, target_url);

        // TODO: bound this call with a timeout; a hung upstream currently hangs the request
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::upstream(strategy, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::upstream(strategy, e))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api_error) => format!("HTTP {}: {}", status, api_error.error.message),
                Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
                Err(_) => format!("HTTP {}: {}", status, body.trim()),
            };
            ::log::warn!("{} analysis of {} failed: {}", strategy, target_url, detail);
            return Err(Error::upstream(strategy, detail));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::upstream(strategy, format!("resposta JSON inválida: {}", e)))
    }

    /// Fetch and extract one strategy
    pub async fn analyze_strategy(
        &self,
        target_url: &str,
        strategy: Strategy,
        extractor: &Extractor,
    ) -> Result<StrategyResult> {
        let report = self.fetch(target_url, strategy).await?;
        Ok(extractor.extract(&report))
    }

    /// Run the mobile and desktop analyses concurrently
    ///
    /// Fails as a whole as soon as either strategy fails.
    pub async fn analyze(&self, target_url: &str, extractor: &Extractor) -> Result<AnalysisReport> {
        ::log::info!("Analyzing {}", target_url);

        let (mobile, desktop) = tokio::try_join!(
            self.analyze_strategy(target_url, Strategy::Mobile, extractor),
            self.analyze_strategy(target_url, Strategy::Desktop, extractor),
        )?;

        ::log::info!(
            "Analysis of {} complete - mobile {}, desktop {}",
            target_url,
            mobile.score,
            desktop.score
        );

        Ok(AnalysisReport { mobile, desktop })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractorOptions;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload(score: f64) -> serde_json::Value {
        json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": score, "auditRefs": [
                    { "id": "unused-javascript", "weight": 0 }
                ] } },
                "audits": {
                    "largest-contentful-paint": { "title": "LCP", "score": 0.5, "displayValue": "3.1 s" },
                    "unused-javascript": {
                        "title": "Reduce unused JavaScript",
                        "description": "Remove dead code.",
                        "score": 0.3,
                        "details": { "overallSavingsMs": 850 }
                    }
                }
            }
        })
    }

    #[test]
    fn test_request_url() {
        let client = PageSpeedClient::new("https://api.example.com/run", "k3y")
            .with_category(PERFORMANCE_CATEGORY);
        let url = client
            .request_url("https://example.com/?a=1", Strategy::Desktop)
            .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("url".to_string(), "https://example.com/?a=1".to_string()),
                ("key".to_string(), "k3y".to_string()),
                ("strategy".to_string(), "desktop".to_string()),
                ("category".to_string(), "performance".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let client = PageSpeedClient::new("not a url", "k");
        let err = client
            .request_url("https://example.com", Strategy::Mobile)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_analyze_both_strategies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/run"))
            .and(query_param("strategy", "mobile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload(0.42)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/run"))
            .and(query_param("strategy", "desktop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload(0.91)))
            .expect(1)
            .mount(&server)
            .await;

        let client = PageSpeedClient::new(format!("{}/run", server.uri()), "k");
        let extractor = Extractor::new(ExtractorOptions::full());
        let report = client.analyze("https://example.com", &extractor).await.unwrap();

        assert_eq!(report.mobile.score, 42);
        assert_eq!(report.desktop.score, 91);
        assert_eq!(report.mobile.metrics.lcp, "3.1 s");
        assert_eq!(report.desktop.recommendations[0].savings_ms, Some(850.0));
    }

    #[tokio::test]
    async fn test_one_failing_strategy_fails_analysis() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("strategy", "mobile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload(0.5)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("strategy", "desktop"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "code": 429, "message": "Quota exceeded" }
            })))
            .mount(&server)
            .await;

        let client = PageSpeedClient::new(server.uri(), "k");
        let err = client
            .analyze("https://example.com", &Extractor::default())
            .await
            .unwrap_err();

        match err {
            Error::UpstreamFetch { strategy, detail } => {
                assert_eq!(strategy, "desktop");
                assert!(detail.contains("429"));
                assert!(detail.contains("Quota exceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = PageSpeedClient::new(server.uri(), "k");
        let err = client
            .fetch("https://example.com", Strategy::Mobile)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamFetch { ref strategy, .. } if strategy == "mobile"));
    }
}
