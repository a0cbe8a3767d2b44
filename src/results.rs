use serde::{Deserialize, Serialize};

/// Placeholder shown when a metric audit is missing from the payload
pub const MISSING_METRIC: &str = "--";

/// The four headline timing metrics, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// First Contentful Paint
    pub fcp: String,

    /// Largest Contentful Paint
    pub lcp: String,

    /// Total Blocking Time
    pub tbt: String,

    /// Cumulative Layout Shift
    pub cls: String,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            fcp: MISSING_METRIC.to_string(),
            lcp: MISSING_METRIC.to_string(),
            tbt: MISSING_METRIC.to_string(),
            cls: MISSING_METRIC.to_string(),
        }
    }
}

/// One improvement suggestion derived from an audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    /// Audit title, used as the dedup key when merging
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Human-readable savings, e.g. "1.2 s" or "300 ms"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,

    /// Savings in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_ms: Option<f64>,
}

impl RecommendationItem {
    /// Create an item with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            savings: None,
            savings_ms: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_savings(mut self, savings: impl Into<String>) -> Self {
        self.savings = Some(savings.into());
        self
    }

    pub fn with_savings_ms(mut self, savings_ms: f64) -> Self {
        self.savings_ms = Some(savings_ms);
        self
    }
}

/// Normalized analysis of one device strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Performance score between 0 and 100
    pub score: u8,

    pub metrics: Metrics,

    pub recommendations: Vec<RecommendationItem>,
}

/// Response body returned for a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mobile: StrategyResult,
    pub desktop: StrategyResult,
}

impl AnalysisReport {
    /// Top recommendations across both strategies
    pub fn top_recommendations(&self) -> Vec<RecommendationItem> {
        crate::merge::merge_recommendations(
            &self.mobile.recommendations,
            &self.desktop.recommendations,
        )
    }
}
