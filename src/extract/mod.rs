pub mod payload;

#[cfg(test)]
mod tests;

use crate::results::{MISSING_METRIC, Metrics, RecommendationItem, StrategyResult};
use crate::savings::format_savings;
pub use payload::PageSpeedResponse;

/// Audit id of First Contentful Paint
pub const FCP_AUDIT: &str = "first-contentful-paint";
/// Audit id of Largest Contentful Paint
pub const LCP_AUDIT: &str = "largest-contentful-paint";
/// Audit id of Total Blocking Time
pub const TBT_AUDIT: &str = "total-blocking-time";
/// Audit id of Cumulative Layout Shift
pub const CLS_AUDIT: &str = "cumulative-layout-shift";

/// Default number of recommendations kept per strategy
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

/// Minimum savings, in milliseconds, a recommendation needs on the full path
pub const DEFAULT_MIN_SAVINGS_MS: f64 = 100.0;

/// Which fields a recommendation carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationDetail {
    /// Title and description only
    Summary,
    /// Title, description and the savings estimate
    WithSavings,
}

/// Options controlling how recommendations are selected and projected
#[derive(Debug, Clone, Copy)]
pub struct ExtractorOptions {
    pub detail: RecommendationDetail,

    /// Recommendations must save strictly more than this to be included
    pub min_savings_ms: Option<f64>,

    pub max_recommendations: usize,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self::basic()
    }
}

impl ExtractorOptions {
    /// `{title, description}` items, no savings threshold
    pub fn basic() -> Self {
        Self {
            detail: RecommendationDetail::Summary,
            min_savings_ms: None,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    /// Items with savings, only above [`DEFAULT_MIN_SAVINGS_MS`]
    pub fn full() -> Self {
        Self {
            detail: RecommendationDetail::WithSavings,
            min_savings_ms: Some(DEFAULT_MIN_SAVINGS_MS),
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

/// Normalizes raw PageSpeed payloads into [`StrategyResult`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    options: ExtractorOptions,
}

impl Extractor {
    pub fn new(options: ExtractorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Deserialize a raw JSON payload and extract it
    pub fn extract_json(&self, raw: &str) -> Result<StrategyResult, serde_json::Error> {
        let report: PageSpeedResponse = serde_json::from_str(raw)?;
        Ok(self.extract(&report))
    }

    /// Extract the score, metrics and top recommendations of one report
    pub fn extract(&self, report: &PageSpeedResponse) -> StrategyResult {
        StrategyResult {
            score: performance_score(report),
            metrics: metrics(report),
            recommendations: self.recommendations(report),
        }
    }

    fn recommendations(&self, report: &PageSpeedResponse) -> Vec<RecommendationItem> {
        let Some(category) = report.performance() else {
            return Vec::new();
        };

        let mut candidates: Vec<_> = category
            .audit_refs
            .iter()
            .filter_map(|audit_ref| report.audit(&audit_ref.id))
            .filter(|audit| !audit.title.is_empty() && audit.needs_improvement())
            .filter(|audit| match self.options.min_savings_ms {
                Some(min) => audit.savings_ms().unwrap_or(0.0) > min,
                None => true,
            })
            .collect();

        // Stable sort, so equal savings keep the category's audit order
        candidates.sort_by(|a, b| {
            let a = a.savings_ms().unwrap_or(0.0);
            let b = b.savings_ms().unwrap_or(0.0);
            b.total_cmp(&a)
        });

        ::log::debug!(
            "{} audits need improvement, keeping {}",
            candidates.len(),
            candidates.len().min(self.options.max_recommendations)
        );

        candidates
            .into_iter()
            .take(self.options.max_recommendations)
            .map(|audit| {
                let mut item = RecommendationItem::new(audit.title.clone());
                item.description = audit.description.clone();
                if self.options.detail == RecommendationDetail::WithSavings {
                    item.savings_ms = audit.savings_ms();
                    // The analyzer's own (possibly localized) text wins over our formatting
                    item.savings = audit
                        .display_value
                        .clone()
                        .or_else(|| item.savings_ms.map(format_savings));
                }
                item
            })
            .collect()
    }
}

/// Performance score as an integer between 0 and 100; missing scores are 0
pub fn performance_score(report: &PageSpeedResponse) -> u8 {
    let fraction = report
        .performance()
        .and_then(|category| category.score)
        .filter(|score| score.is_finite())
        .unwrap_or(0.0);

    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Display values of the four headline metrics
pub fn metrics(report: &PageSpeedResponse) -> Metrics {
    let display = |id: &str| {
        report
            .audit(id)
            .and_then(|audit| audit.display_value.clone())
            .unwrap_or_else(|| MISSING_METRIC.to_string())
    };

    Metrics {
        fcp: display(FCP_AUDIT),
        lcp: display(LCP_AUDIT),
        tbt: display(TBT_AUDIT),
        cls: display(CLS_AUDIT),
    }
}
