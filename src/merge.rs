use crate::results::RecommendationItem;
use crate::savings::estimate_savings_ms;
use std::collections::HashMap;

/// Maximum number of recommendations kept after merging both strategies
pub const MAX_MERGED_RECOMMENDATIONS: usize = 5;

/// Merges mobile and desktop recommendations into one ranked list
///
/// Items are deduplicated by title. When a title appears twice the variant
/// with strictly greater estimated savings is kept, otherwise the first one
/// seen stays. The result is sorted by estimated savings, highest first, and
/// truncated to [`MAX_MERGED_RECOMMENDATIONS`].
pub fn merge_recommendations(
    mobile: &[RecommendationItem],
    desktop: &[RecommendationItem],
) -> Vec<RecommendationItem> {
    let mut by_title: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<(f64, RecommendationItem)> = Vec::new();

    for item in mobile.iter().chain(desktop) {
        let savings = estimate_savings_ms(item);
        match by_title.get(item.title.as_str()) {
            Some(&index) => {
                if savings > merged[index].0 {
                    ::log::trace!("Replacing recommendation '{}' ({} ms)", item.title, savings);
                    merged[index] = (savings, item.clone());
                }
            }
            None => {
                by_title.insert(item.title.as_str(), merged.len());
                merged.push((savings, item.clone()));
            }
        }
    }

    merged.sort_by(|a, b| b.0.total_cmp(&a.0));
    merged.truncate(MAX_MERGED_RECOMMENDATIONS);
    merged.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[RecommendationItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_merge_scenario() {
        let mobile = vec![
            RecommendationItem::new("A").with_savings_ms(2000.0),
            RecommendationItem::new("B").with_savings_ms(500.0),
        ];
        let desktop = vec![
            RecommendationItem::new("A").with_savings_ms(1000.0),
            RecommendationItem::new("C").with_savings_ms(1500.0),
        ];

        let merged = merge_recommendations(&mobile, &desktop);
        assert_eq!(titles(&merged), vec!["A", "C", "B"]);
        assert_eq!(merged[0].savings_ms, Some(2000.0));
    }

    #[test]
    fn test_higher_savings_variant_wins() {
        let mobile = vec![RecommendationItem::new("Defer images").with_savings_ms(500.0)];
        let desktop = vec![RecommendationItem::new("Defer images").with_savings("1.2 s")];

        let merged = merge_recommendations(&mobile, &desktop);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].savings.as_deref(), Some("1.2 s"));
        assert_eq!(merged[0].savings_ms, None);
    }

    #[test]
    fn test_equal_savings_keeps_first() {
        let mobile = vec![
            RecommendationItem::new("Minify CSS")
                .with_description("mobile")
                .with_savings("300 ms"),
        ];
        let desktop = vec![
            RecommendationItem::new("Minify CSS")
                .with_description("desktop")
                .with_savings_ms(300.0),
        ];

        let merged = merge_recommendations(&mobile, &desktop);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].description.as_deref(), Some("mobile"));
    }

    #[test]
    fn test_merge_with_itself() {
        let list = vec![
            RecommendationItem::new("A").with_savings_ms(100.0),
            RecommendationItem::new("B").with_savings("2 s"),
            RecommendationItem::new("C"),
        ];

        let merged = merge_recommendations(&list, &list);
        assert_eq!(titles(&merged), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_truncates_to_five() {
        let mobile: Vec<_> = (1..=4)
            .map(|i| RecommendationItem::new(format!("m{}", i)).with_savings_ms(i as f64 * 100.0))
            .collect();
        let desktop: Vec<_> = (1..=4)
            .map(|i| RecommendationItem::new(format!("d{}", i)).with_savings_ms(i as f64 * 160.0))
            .collect();

        let merged = merge_recommendations(&mobile, &desktop);
        assert_eq!(merged.len(), MAX_MERGED_RECOMMENDATIONS);
        assert_eq!(titles(&merged), vec!["d4", "d3", "m4", "d2", "m3"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_recommendations(&[], &[]).is_empty());
    }
}
