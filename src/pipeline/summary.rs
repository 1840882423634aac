use std::collections::BTreeMap;

use super::format::{format_amount, format_bytes};
use crate::models::{total_amount, ResourceCategory, SummaryMetrics, SummaryPayload};

pub const DEFAULT_COST_UNIT: &str = "USD";

/// Headline metrics for a payload. Missing sections count as empty, so this
/// never fails on partial collector results.
pub fn reduce(payload: &SummaryPayload) -> SummaryMetrics {
    let counts: BTreeMap<ResourceCategory, usize> = ResourceCategory::ALL
        .into_iter()
        .map(|category| (category, payload.count(category)))
        .collect();

    let total_log_bytes = payload
        .cloud_watch_log_groups
        .iter()
        .fold(0u64, |acc, group| acc.saturating_add(group.stored_bytes_or_zero()));

    let results = payload.cost_results();
    let cost_unit = results
        .first()
        .and_then(|item| item.unit.as_deref())
        .filter(|unit| !unit.trim().is_empty())
        .unwrap_or(DEFAULT_COST_UNIT)
        .to_string();

    SummaryMetrics {
        counts,
        total_log_bytes,
        total_log_storage: format_bytes(total_log_bytes),
        total_cost: format_amount(total_amount(results)),
        cost_unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_empty_payload() {
        let payload: SummaryPayload = serde_json::from_str("{}").unwrap();
        let metrics = reduce(&payload);

        for category in ResourceCategory::ALL {
            assert_eq!(metrics.count(category), 0);
        }
        assert_eq!(metrics.total_log_bytes, 0);
        assert_eq!(metrics.total_log_storage, "0 Bytes");
        assert_eq!(metrics.total_cost, "0.00");
        assert_eq!(metrics.cost_unit, "USD");
    }

    #[test]
    fn test_reduce_partial_payload() {
        let payload: SummaryPayload = serde_json::from_value(serde_json::json!({
            "rdsInstances": [{"id": "db-1"}],
            "cloudWatchLogGroups": [
                {"name": "a", "storedBytes": 2048},
                {"name": "b"},
                {"name": "c", "storedBytes": -100},
                {"name": "d", "storedBytes": "512"}
            ],
            "costData": {"results": [
                {"service": "RDS", "amount": "1.005", "unit": "EUR"},
                {"service": "RDS", "amount": "bad"}
            ]}
        }))
        .unwrap();

        let metrics = reduce(&payload);
        assert_eq!(metrics.count(ResourceCategory::Database), 1);
        assert_eq!(metrics.count(ResourceCategory::LogGroup), 4);
        assert_eq!(metrics.total_log_bytes, 2560);
        assert_eq!(metrics.total_log_storage, "2.5 KB");
        assert_eq!(metrics.total_cost, "1.01");
        assert_eq!(metrics.cost_unit, "EUR");
    }

    #[test]
    fn test_blank_first_unit_falls_back_to_usd() {
        let payload: SummaryPayload = serde_json::from_value(serde_json::json!({
            "costData": {"results": [{"service": "S3", "amount": "2", "unit": ""}]}
        }))
        .unwrap();
        assert_eq!(reduce(&payload).cost_unit, "USD");
    }

    #[test]
    fn test_missing_results_in_cost_data() {
        let payload: SummaryPayload =
            serde_json::from_value(serde_json::json!({"costData": {"timeStart": "2024-01-01"}})).unwrap();
        let metrics = reduce(&payload);
        assert_eq!(metrics.total_cost, "0.00");
        assert_eq!(metrics.cost_unit, "USD");
    }
}
