//! Sandbox executor behind the orchestrator backend
//!
//! Approved actions are posted to the orchestrator's restricted sandbox
//! endpoint; the sandbox decides how to run them and returns the captured
//! output.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::ActionProposal;

use super::{ActionExecutor, ExecutionOutput};

pub struct HttpExecutor {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    command: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    logs: String,
    #[serde(default)]
    generated_code: Option<String>,
}

impl HttpExecutor {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ActionExecutor for HttpExecutor {
    fn name(&self) -> &str {
        "sandbox"
    }

    async fn execute(&self, proposal: &ActionProposal) -> Result<ExecutionOutput> {
        let body: ExecuteResponse = self
            .client
            .post(format!("{}/api/agent/execute", self.base_url))
            .json(&ExecuteRequest {
                command: &proposal.command,
            })
            .send()
            .await
            .context("sandbox request failed")?
            .error_for_status()
            .context("sandbox returned an error status")?
            .json()
            .await
            .context("sandbox returned malformed JSON")?;

        Ok(ExecutionOutput {
            logs: body.logs,
            generated_code: body.generated_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sandbox_output() {
        let parsed: ExecuteResponse =
            serde_json::from_str(r#"{"logs":"deleted","generated_code":null}"#).unwrap();
        assert_eq!(parsed.logs, "deleted");
        assert!(parsed.generated_code.is_none());
    }
}
