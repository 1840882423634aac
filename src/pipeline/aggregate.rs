//! Cost-by-service ranking for the chart widgets.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::palette::color_for;
use crate::models::{ChartDataset, CostLineItem, CostSeries};

/// Maximum number of services shown in a cost chart.
pub const TOP_N: usize = 10;

const DATASET_LABEL: &str = "Cost by Service";

/// Groups line items by service, sums their amounts and keeps the ten most
/// expensive services, highest first. Ties keep first-seen order.
pub fn aggregate(items: &[CostLineItem]) -> CostSeries {
    let mut groups: Vec<(&str, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let service = item.service_name();
        let amount = item.amount_value();
        match index.get(service) {
            Some(&i) => groups[i].1 += amount,
            None => {
                index.insert(service, groups.len());
                groups.push((service, amount));
            }
        }
    }

    // stable: equal totals stay in encounter order
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups.truncate(TOP_N);

    let (labels, values) = groups
        .into_iter()
        .map(|(service, total)| (service.to_string(), total.to_f64().unwrap_or(0.0)))
        .unzip();

    CostSeries { labels, values }
}

pub fn chart_dataset(series: &CostSeries) -> ChartDataset {
    let (background_color, border_color) = series
        .labels
        .iter()
        .map(|label| {
            let color = color_for(label);
            (color.background, color.border)
        })
        .unzip();

    ChartDataset {
        label: DATASET_LABEL.into(),
        labels: series.labels.clone(),
        data: series.values.clone(),
        background_color,
        border_color,
        border_width: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(service: &str, amount: &str) -> CostLineItem {
        CostLineItem {
            service: Some(service.into()),
            amount: Some(amount.into()),
            unit: Some("USD".into()),
            date: None,
        }
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        let series = aggregate(&[]);
        assert!(series.is_empty());
        assert!(series.values.is_empty());
    }

    #[test]
    fn test_groups_and_sorts_descending() {
        let items = vec![
            line("Storage", "5.25"),
            line("Compute", "4.00"),
            line("Compute", "6.50"),
            line("Network", "0.75"),
        ];
        let series = aggregate(&items);
        assert_eq!(series.labels, vec!["Compute", "Storage", "Network"]);
        assert_eq!(series.values, vec![10.5, 5.25, 0.75]);
    }

    #[test]
    fn test_malformed_amount_counts_as_zero() {
        let items = vec![line("Compute", "abc"), line("Storage", "1.00"), line("Compute", "2.00")];
        let series = aggregate(&items);
        assert_eq!(series.labels, vec!["Compute", "Storage"]);
        assert_eq!(series.values, vec![2.0, 1.0]);
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let items = vec![line("B", "1"), line("A", "1"), line("C", "2")];
        let series = aggregate(&items);
        assert_eq!(series.labels, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_top_n_bound_and_descending_invariant() {
        let items: Vec<CostLineItem> = (0..25)
            .map(|i| line(&format!("svc-{}", i % 15), &format!("{}.{:02}", i * 7 % 11, i)))
            .collect();
        let series = aggregate(&items);

        assert_eq!(series.len(), TOP_N);
        assert_eq!(series.labels.len(), series.values.len());
        assert!(series.values.windows(2).all(|w| w[0] >= w[1]));

        let few = aggregate(&items[..3]);
        assert_eq!(few.len(), 3);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let items = vec![line("X", "3"), line("Y", "3"), line("Z", "9"), line("X", "0.5")];
        let first = aggregate(&items);
        let second = aggregate(&items);
        assert_eq!(first, second);
        assert_eq!(chart_dataset(&first), chart_dataset(&second));
    }

    #[test]
    fn test_chart_dataset_is_index_aligned() {
        let series = aggregate(&[line("Compute", "10.50"), line("Storage", "5.25")]);
        let dataset = chart_dataset(&series);
        assert_eq!(dataset.label, "Cost by Service");
        assert_eq!(dataset.data, vec![10.5, 5.25]);
        assert_eq!(dataset.background_color.len(), 2);
        assert_eq!(dataset.border_color.len(), 2);
    }
}
