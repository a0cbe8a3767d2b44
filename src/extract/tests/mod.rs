
use crate::extract::PageSpeedResponse;
use serde_json::{Value, json};

/// Builds a report with a performance category over the given audits
///
/// Each audit is `(id, title, score, savings_ms)`.
pub(super) fn report_with_audits(
    score: Option<f64>,
    audits: &[(&str, &str, Option<f64>, Option<f64>)],
) -> PageSpeedResponse {
    let refs: Vec<Value> = audits
        .iter()
        .map(|(id, _, _, _)| json!({ "id": id, "weight": 0 }))
        .collect();

    let mut audit_map = serde_json::Map::new();
    for (id, title, audit_score, savings) in audits {
        let mut audit = json!({
            "title": title,
            "description": format!("How to fix {}", title),
            "score": audit_score,
        });
        if let Some(ms) = savings {
            audit["details"] = json!({ "overallSavingsMs": ms });
        }
        audit_map.insert(id.to_string(), audit);
    }

    serde_json::from_value(json!({
        "lighthouseResult": {
            "categories": { "performance": { "score": score, "auditRefs": refs } },
            "audits": audit_map,
        }
    }))
    .unwrap()
}
