use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// One billed line for one service over (part of) the reporting window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLineItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub service: Option<String>,
    /// Raw decimal string as reported by the billing API.
    #[serde(default, deserialize_with = "lenient::text")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
}

impl CostLineItem {
    pub fn service_name(&self) -> &str {
        self.service.as_deref().unwrap_or("")
    }

    /// Parsed amount; missing or non-numeric amounts count as zero.
    pub fn amount_value(&self) -> Decimal {
        self.amount
            .as_deref()
            .map(str::trim)
            .and_then(|s| Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok())
            .unwrap_or(Decimal::ZERO)
    }
}

/// Sum of all parsed amounts.
pub fn total_amount(items: &[CostLineItem]) -> Decimal {
    items.iter().map(CostLineItem::amount_value).sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub time_start: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub time_end: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub results: Vec<CostLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportingPeriod {
    pub start: String,
    pub end: String,
}

impl CostData {
    pub fn period(&self) -> Option<ReportingPeriod> {
        match (&self.time_start, &self.time_end) {
            (Some(start), Some(end)) => Some(ReportingPeriod {
                start: start.clone(),
                end: end.clone(),
            }),
            _ => None,
        }
    }
}

/// Ranked cost-by-service series; `labels[i]` pairs with `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl CostSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Chart-ready dataset derived from a [`CostSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
    pub border_width: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(amount: Option<&str>) -> CostLineItem {
        CostLineItem {
            service: Some("Compute".into()),
            amount: amount.map(Into::into),
            unit: Some("USD".into()),
            date: None,
        }
    }

    #[test]
    fn test_amount_value_parses_and_defaults() {
        assert_eq!(item(Some("10.50")).amount_value(), Decimal::new(1050, 2));
        assert_eq!(item(Some(" 3 ")).amount_value(), Decimal::new(3, 0));
        assert_eq!(item(Some("1.5E-2")).amount_value(), Decimal::new(15, 3));
        assert_eq!(item(Some("n/a")).amount_value(), Decimal::ZERO);
        assert_eq!(item(None).amount_value(), Decimal::ZERO);
    }

    #[test]
    fn test_numeric_amount_in_json_is_accepted() {
        let parsed: CostLineItem =
            serde_json::from_value(serde_json::json!({"service": "S3", "amount": 2.25})).unwrap();
        assert_eq!(parsed.amount_value(), Decimal::new(225, 2));
        assert_eq!(parsed.unit, None);
    }

    #[test]
    fn test_cost_data_skips_malformed_results() {
        let data: CostData = serde_json::from_value(serde_json::json!({
            "timeStart": "2024-01-01",
            "timeEnd": "2024-01-31",
            "results": [{"service": "EC2", "amount": "1"}, "garbage", null]
        }))
        .unwrap();
        assert_eq!(data.results.len(), 1);
        assert_eq!(
            data.period(),
            Some(ReportingPeriod { start: "2024-01-01".into(), end: "2024-01-31".into() })
        );
    }
}
