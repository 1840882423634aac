use std::future::Future;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::models::SummaryPayload;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("summary request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summary endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("summary payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Upstream collector that returns the whole inventory and cost summary in
/// one call.
pub trait SummarySource: Send + Sync {
    fn get_summary(&self) -> impl Future<Output = Result<SummaryPayload, SourceError>> + Send;
}

/// Fetches `GET {base_url}/summary` from the collector API.
#[derive(Debug, Clone)]
pub struct HttpSummarySource {
    client: reqwest::Client,
    summary_url: String,
}

impl HttpSummarySource {
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            summary_url: format!("{}/summary", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn summary_url(&self) -> &str {
        &self.summary_url
    }
}

impl SummarySource for HttpSummarySource {
    async fn get_summary(&self) -> Result<SummaryPayload, SourceError> {
        let resp = self
            .client
            .get(&self.summary_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status, "Collector summary request failed");
            return Err(SourceError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        decode_payload(&bytes)
    }
}

/// A literal `null` body is treated like an empty payload.
pub fn decode_payload(bytes: &[u8]) -> Result<SummaryPayload, SourceError> {
    let payload: Option<SummaryPayload> = serde_json::from_slice(bytes)?;
    Ok(payload.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_strips_trailing_slash() {
        let config = SourceConfig {
            base_url: "http://collector:8080/api/".into(),
            timeout_secs: 5,
        };
        let source = HttpSummarySource::new(&config).unwrap();
        assert_eq!(source.summary_url(), "http://collector:8080/api/summary");
    }

    #[test]
    fn test_decode_payload_variants() {
        assert_eq!(decode_payload(b"null").unwrap(), SummaryPayload::default());
        assert_eq!(decode_payload(b"{}").unwrap(), SummaryPayload::default());

        let payload = decode_payload(br#"{"ec2Instances":[{"id":"i-1"}]}"#).unwrap();
        assert_eq!(payload.ec2_instances.len(), 1);

        assert!(matches!(decode_payload(b"<html>"), Err(SourceError::Decode(_))));
    }
}
