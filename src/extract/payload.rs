//! Typed view of the PageSpeed Insights `runPagespeed` response.
//!
//! Only the fields the extractor reads are modelled; everything else in the
//! payload is ignored. Every level is optional so that partial reports still
//! deserialize.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResponse {
    #[serde(default)]
    pub lighthouse_result: LighthouseResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default)]
    pub categories: Categories,

    /// Audit details keyed by audit id
    #[serde(default)]
    pub audits: HashMap<String, Audit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub performance: Option<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Fractional score between 0 and 1
    #[serde(default)]
    pub score: Option<f64>,

    /// Ordered references to the audits that make up the category
    #[serde(default)]
    pub audit_refs: Vec<AuditRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditRef {
    pub id: String,

    #[serde(default)]
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub display_value: Option<String>,

    #[serde(default)]
    pub details: Option<AuditDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    #[serde(default)]
    pub overall_savings_ms: Option<f64>,
}

impl Audit {
    /// Estimated savings reported for this audit, in milliseconds
    pub fn savings_ms(&self) -> Option<f64> {
        self.details
            .as_ref()
            .and_then(|d| d.overall_savings_ms)
            .filter(|ms| ms.is_finite())
    }

    /// Whether the audit has room for improvement
    ///
    /// Audits without a score (informative or not applicable) never qualify.
    /// This is stricter than a plain `score < 1` comparison that would let a
    /// null score through as if it were zero.
    pub fn needs_improvement(&self) -> bool {
        matches!(self.score, Some(score) if score < 1.0)
    }
}

impl PageSpeedResponse {
    pub fn performance(&self) -> Option<&Category> {
        self.lighthouse_result.categories.performance.as_ref()
    }

    pub fn audit(&self, id: &str) -> Option<&Audit> {
        self.lighthouse_result.audits.get(id)
    }
}
