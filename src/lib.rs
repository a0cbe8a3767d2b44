pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod merge;
pub mod results;
pub mod savings;
pub mod server;
pub mod validate;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use extract::{Extractor, ExtractorOptions};
pub use merge::merge_recommendations;
pub use results::{AnalysisReport, Metrics, RecommendationItem, StrategyResult};
