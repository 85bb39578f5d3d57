//! Compute-unit client for reading the points process.
//!
//! Submissions live in an AO process. They are read with a dry run: a
//! message evaluated by the compute unit without being committed, whose
//! first reply carries the JSON-encoded record list.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the compute-unit client.
#[derive(Debug, Clone)]
pub struct ComputeUnitConfig {
    pub cu_url: String,
    pub process_id: String,
    pub action: String,
    pub timeout_seconds: u64,
}

/// Message tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Dry-run request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DryRunRequest {
    id: String,
    target: String,
    owner: String,
    anchor: String,
    data: String,
    tags: Vec<Tag>,
}

/// Dry-run response. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DryRunResponse {
    #[serde(default)]
    messages: Vec<OutboxMessage>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OutboxMessage {
    #[serde(default)]
    data: Option<Value>,
}

/// Client for one compute unit.
pub struct ComputeUnitClient {
    config: ComputeUnitConfig,
    http_client: reqwest::Client,
}

impl ComputeUnitClient {
    pub fn new(config: ComputeUnitConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Endpoint for a dry run against the configured process.
    pub fn dry_run_url(&self) -> String {
        format!(
            "{}/dry-run?process-id={}",
            self.config.cu_url.trim_end_matches('/'),
            self.config.process_id
        )
    }

    fn request_body(&self) -> DryRunRequest {
        DryRunRequest {
            id: "1234".to_string(),
            target: self.config.process_id.clone(),
            owner: "1234".to_string(),
            anchor: "0".to_string(),
            data: "1234".to_string(),
            tags: vec![
                Tag::new("Action", &self.config.action),
                Tag::new("Data-Protocol", "ao"),
                Tag::new("Type", "Message"),
                Tag::new("Variant", "ao.TN.1"),
            ],
        }
    }

    /// Fetch the raw record array from the process.
    pub async fn fetch_records(&self) -> Result<Value> {
        let url = self.dry_run_url();
        info!(
            "Requesting {} from process {}",
            self.config.action, self.config.process_id
        );

        let response = self
            .http_client
            .post(&url)
            .json(&self.request_body())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
                } else if e.is_connect() {
                    anyhow::anyhow!("Cannot connect to compute unit at {}", self.config.cu_url)
                } else {
                    anyhow::anyhow!("Failed to send request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Compute unit error {}: {}", status, body);
        }

        let dry_run: DryRunResponse = response
            .json()
            .await
            .context("Failed to parse dry-run response")?;

        extract_records(dry_run)
    }
}

/// Pull the record array out of the first reply message.
fn extract_records(response: DryRunResponse) -> Result<Value> {
    if let Some(error) = response.error.filter(|e| !e.is_null()) {
        bail!("Process returned an error: {}", error);
    }

    let Some(first) = response.messages.into_iter().next() else {
        bail!("Process sent no reply messages");
    };

    match first.data {
        Some(Value::String(data)) => {
            debug!("Reply data is {} bytes", data.len());
            serde_json::from_str(&data).context("Reply data is not valid JSON")
        }
        Some(value @ Value::Array(_)) => Ok(value),
        Some(other) => bail!("Unexpected reply data: {}", other),
        None => bail!("Reply message has no data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ComputeUnitClient {
        ComputeUnitClient::new(ComputeUnitConfig {
            cu_url: "https://cu.example.net/".to_string(),
            process_id: "PID".to_string(),
            action: "Get-Points".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    fn response(value: Value) -> DryRunResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_dry_run_url() {
        assert_eq!(
            client().dry_run_url(),
            "https://cu.example.net/dry-run?process-id=PID"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(client().request_body()).unwrap();

        assert_eq!(body["Target"], "PID");
        assert_eq!(body["Tags"][0], json!({"name": "Action", "value": "Get-Points"}));
        assert_eq!(body["Tags"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_extract_string_data() {
        let resp = response(json!({
            "Messages": [{"Data": "[{\"username\":\"alice\",\"points\":3}]"}],
            "Output": {},
            "Spawns": []
        }));

        let records = extract_records(resp).unwrap();
        assert_eq!(records[0]["username"], "alice");
    }

    #[test]
    fn test_extract_inline_array() {
        let resp = response(json!({"Messages": [{"Data": []}]}));
        assert_eq!(extract_records(resp).unwrap(), json!([]));
    }

    #[test]
    fn test_extract_errors() {
        assert!(extract_records(response(json!({"Messages": []}))).is_err());
        assert!(extract_records(response(json!({"Error": "boom", "Messages": []}))).is_err());
        assert!(extract_records(response(json!({"Messages": [{"Data": "not json"}]}))).is_err());
        assert!(extract_records(response(json!({"Messages": [{}]}))).is_err());
    }
}
