use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cost::{CostData, CostLineItem};
use super::lenient;
use super::resource::{ComputeInstance, DatabaseInstance, LogGroup, ResourceCategory, Volume};

/// Payload returned by the upstream collector's summary endpoint.
///
/// Every section is optional on the wire; absent or `null` collections
/// decode as empty, malformed entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    #[serde(default, deserialize_with = "lenient::records")]
    pub ec2_instances: Vec<ComputeInstance>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub rds_instances: Vec<DatabaseInstance>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub ebs_volumes: Vec<Volume>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub cloud_watch_log_groups: Vec<LogGroup>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub cost_data: Option<CostData>,
}

impl SummaryPayload {
    pub fn cost_results(&self) -> &[CostLineItem] {
        self.cost_data
            .as_ref()
            .map(|c| c.results.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, category: ResourceCategory) -> usize {
        match category {
            ResourceCategory::Compute => self.ec2_instances.len(),
            ResourceCategory::Database => self.rds_instances.len(),
            ResourceCategory::Volume => self.ebs_volumes.len(),
            ResourceCategory::LogGroup => self.cloud_watch_log_groups.len(),
        }
    }
}

/// Headline numbers for the dashboard summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub counts: BTreeMap<ResourceCategory, usize>,
    pub total_log_bytes: u64,
    pub total_log_storage: String,
    pub total_cost: String,
    pub cost_unit: String,
}

impl SummaryMetrics {
    pub fn count(&self, category: ResourceCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_decodes_to_empty_payload() {
        let payload: SummaryPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, SummaryPayload::default());
        assert!(payload.cost_results().is_empty());
    }

    #[test]
    fn test_null_and_wrong_shapes_are_tolerated() {
        let payload: SummaryPayload = serde_json::from_value(serde_json::json!({
            "ec2Instances": null,
            "rdsInstances": {"unexpected": true},
            "ebsVolumes": [{"id": "vol-1", "size": "8"}, 7],
            "cloudWatchLogGroups": [{"name": "a", "storedBytes": "not-a-number"}],
            "costData": "broken"
        }))
        .unwrap();

        assert_eq!(payload.count(ResourceCategory::Compute), 0);
        assert_eq!(payload.count(ResourceCategory::Database), 0);
        assert_eq!(payload.ebs_volumes.len(), 1);
        assert_eq!(payload.ebs_volumes[0].size, Some(8));
        assert_eq!(payload.cloud_watch_log_groups[0].stored_bytes, None);
        assert!(payload.cost_data.is_none());
    }

    #[test]
    fn test_metrics_serialize_category_keys() {
        let mut counts = BTreeMap::new();
        counts.insert(ResourceCategory::Compute, 2);
        let metrics = SummaryMetrics {
            counts,
            total_log_bytes: 0,
            total_log_storage: "0 Bytes".into(),
            total_cost: "0.00".into(),
            cost_unit: "USD".into(),
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["counts"]["ec2"], 2);
        assert_eq!(json["totalCost"], "0.00");
    }
}
