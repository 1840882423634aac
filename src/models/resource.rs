use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::pipeline::format::{format_bytes, format_retention, format_timestamp};

/// The four inventory classes shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceCategory {
    #[serde(rename = "ec2")]
    Compute,
    #[serde(rename = "rds")]
    Database,
    #[serde(rename = "ebs")]
    Volume,
    #[serde(rename = "logs")]
    LogGroup,
}

impl ResourceCategory {
    pub const ALL: [Self; 4] = [Self::Compute, Self::Database, Self::Volume, Self::LogGroup];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "ec2",
            Self::Database => "rds",
            Self::Volume => "ebs",
            Self::LogGroup => "logs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Compute => "EC2 Instances",
            Self::Database => "RDS Instances",
            Self::Volume => "EBS Volumes",
            Self::LogGroup => "Log Groups",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::Compute => "No EC2 instances found.",
            Self::Database => "No RDS instances found.",
            Self::Volume => "No EBS volumes found.",
            Self::LogGroup => "No CloudWatch Log Groups found.",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for ResourceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ec2" | "compute" => Ok(Self::Compute),
            "rds" | "database" => Ok(Self::Database),
            "ebs" | "volume" | "volumes" => Ok(Self::Volume),
            "logs" | "log_groups" | "loggroups" => Ok(Self::LogGroup),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A sortable cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    fn text(value: &Option<String>) -> Option<Self> {
        value.clone().map(Self::Text)
    }

    fn number(value: Option<i64>) -> Option<Self> {
        value.map(|v| Self::Number(v as f64))
    }

    fn timestamp(value: Option<DateTime<Utc>>) -> Option<Self> {
        value.map(Self::Timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
}

const fn column(key: &'static str, title: &'static str) -> Column {
    Column { key, title }
}

/// Common view of the inventory record types for the table engine.
pub trait Record {
    const CATEGORY: ResourceCategory;
    const COLUMNS: &'static [Column];

    /// Stable row key.
    fn identity(&self) -> &str;

    /// Value of the field named `key` (wire name), if present.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Display strings, one per entry in `COLUMNS`.
    fn cells(&self) -> Vec<String>;
}

fn or_dash(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".into(),
    }
}

fn or_blank(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number_or_blank(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn time_or_dash(value: Option<DateTime<Utc>>) -> String {
    value.map(|t| format_timestamp(&t)).unwrap_or_else(|| "-".into())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInstance {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub instance_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub launch_time: Option<DateTime<Utc>>,
}

impl Record for ComputeInstance {
    const CATEGORY: ResourceCategory = ResourceCategory::Compute;
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("id", "Instance ID"),
        column("type", "Type"),
        column("state", "State"),
        column("launchTime", "Launch Time"),
    ];

    fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => FieldValue::text(&self.id),
            "name" => FieldValue::text(&self.name),
            "type" => FieldValue::text(&self.instance_type),
            "state" => FieldValue::text(&self.state),
            "launchTime" => FieldValue::timestamp(self.launch_time),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(&self.name),
            or_blank(&self.id),
            or_blank(&self.instance_type),
            or_blank(&self.state),
            time_or_dash(self.launch_time),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInstance {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub engine: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub engine_version: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    /// GiB.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub allocated_storage: Option<i64>,
}

impl Record for DatabaseInstance {
    const CATEGORY: ResourceCategory = ResourceCategory::Database;
    const COLUMNS: &'static [Column] = &[
        column("id", "Identifier"),
        column("class", "Instance Class"),
        column("engine", "Engine"),
        column("engineVersion", "Version"),
        column("status", "Status"),
        column("allocatedStorage", "Storage (GB)"),
    ];

    fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => FieldValue::text(&self.id),
            "class" => FieldValue::text(&self.class),
            "engine" => FieldValue::text(&self.engine),
            "engineVersion" => FieldValue::text(&self.engine_version),
            "status" => FieldValue::text(&self.status),
            "allocatedStorage" => FieldValue::number(self.allocated_storage),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_blank(&self.id),
            or_blank(&self.class),
            or_blank(&self.engine),
            or_blank(&self.engine_version),
            or_blank(&self.status),
            number_or_blank(self.allocated_storage),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// GiB.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub size: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub volume_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub availability_zone: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub encrypted: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub attached_to: Option<String>,
}

impl Record for Volume {
    const CATEGORY: ResourceCategory = ResourceCategory::Volume;
    const COLUMNS: &'static [Column] = &[
        column("id", "Volume ID"),
        column("name", "Name"),
        column("size", "Size (GB)"),
        column("volumeType", "Type"),
        column("state", "State"),
        column("attachedTo", "Attached To"),
    ];

    fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => FieldValue::text(&self.id),
            "name" => FieldValue::text(&self.name),
            "size" => FieldValue::number(self.size),
            "volumeType" => FieldValue::text(&self.volume_type),
            "state" => FieldValue::text(&self.state),
            "creationTime" => FieldValue::timestamp(self.creation_time),
            "availabilityZone" => FieldValue::text(&self.availability_zone),
            "encrypted" => self.encrypted.map(|e| FieldValue::Text(e.to_string())),
            "attachedTo" => FieldValue::text(&self.attached_to),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        let attached = match self.attached_to.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => "Not attached".into(),
        };
        vec![
            or_blank(&self.id),
            or_dash(&self.name),
            number_or_blank(self.size),
            or_blank(&self.volume_type),
            or_blank(&self.state),
            attached,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroup {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub arn: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub stored_bytes: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub retention_days: Option<i64>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub metric_filter_count: Option<i64>,
}

impl LogGroup {
    /// Stored bytes with missing or negative values clamped to zero.
    pub fn stored_bytes_or_zero(&self) -> u64 {
        self.stored_bytes
            .and_then(|b| u64::try_from(b).ok())
            .unwrap_or(0)
    }
}

impl Record for LogGroup {
    const CATEGORY: ResourceCategory = ResourceCategory::LogGroup;
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("storedBytes", "Storage Used"),
        column("retentionDays", "Retention (Days)"),
        column("creationTime", "Created"),
        column("metricFilterCount", "Metric Filters"),
    ];

    fn identity(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "name" => FieldValue::text(&self.name),
            "arn" => FieldValue::text(&self.arn),
            "storedBytes" => FieldValue::number(self.stored_bytes),
            "retentionDays" => FieldValue::number(self.retention_days),
            "creationTime" => FieldValue::timestamp(self.creation_time),
            "metricFilterCount" => FieldValue::number(self.metric_filter_count),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_blank(&self.name),
            format_bytes(self.stored_bytes_or_zero()),
            format_retention(self.retention_days),
            time_or_dash(self.creation_time),
            self.metric_filter_count.unwrap_or(0).to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("ec2".parse::<ResourceCategory>(), Ok(ResourceCategory::Compute));
        assert_eq!(" LOGS ".parse::<ResourceCategory>(), Ok(ResourceCategory::LogGroup));
        let err = "s3".parse::<ResourceCategory>().unwrap_err();
        assert_eq!(err.to_string(), "unknown resource category 's3'");
        assert_eq!(ResourceCategory::Volume.to_string(), "ebs");
    }

    #[test]
    fn test_compute_instance_from_collector_json() {
        let instance: ComputeInstance = serde_json::from_value(serde_json::json!({
            "id": "i-0abc",
            "name": "web-1",
            "type": "t3.micro",
            "state": "running",
            "launchTime": "2024-05-01T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(instance.identity(), "i-0abc");
        assert_eq!(instance.field("type"), Some(FieldValue::Text("t3.micro".into())));
        assert!(matches!(instance.field("launchTime"), Some(FieldValue::Timestamp(_))));
        assert_eq!(instance.field("nonexistent"), None);
    }

    #[test]
    fn test_log_group_identity_and_cells() {
        let group = LogGroup {
            name: Some("/aws/lambda/api".into()),
            stored_bytes: Some(1536),
            retention_days: Some(0),
            metric_filter_count: None,
            ..Default::default()
        };

        assert_eq!(group.identity(), "/aws/lambda/api");
        let cells = group.cells();
        assert_eq!(cells.len(), LogGroup::COLUMNS.len());
        assert_eq!(cells[1], "1.5 KB");
        assert_eq!(cells[2], "Never expires");
        assert_eq!(cells[3], "-");
        assert_eq!(cells[4], "0");
    }

    #[test]
    fn test_negative_stored_bytes_clamp_to_zero() {
        let group = LogGroup { stored_bytes: Some(-5), ..Default::default() };
        assert_eq!(group.stored_bytes_or_zero(), 0);
    }

    #[test]
    fn test_volume_cells_defaults() {
        let volume = Volume { id: Some("vol-1".into()), ..Default::default() };
        let cells = volume.cells();
        assert_eq!(cells, vec!["vol-1", "-", "", "", "", "Not attached"]);
    }
}
