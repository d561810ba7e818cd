//! HTTP client for the orchestrator backend
//!
//! The orchestrator owns the planner/coder pipeline and the sandbox; this
//! client only speaks its JSON surface: `POST /api/agent/invoke` for a
//! reply and `GET /` as the health probe.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{ActionProposal, Turn};

use super::{AgentBackend, AgentReply};

/// Agent backend speaking JSON to the orchestrator service
pub struct HttpAgentBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    prompt: &'a str,
}

/// Wire shape of one orchestrator reply
#[derive(Debug, Deserialize)]
struct InvokeResponse {
    summary: String,
    #[serde(default)]
    plan: Vec<String>,
    #[serde(default)]
    generated_code: Option<String>,
    #[serde(default)]
    proposal: Option<ProposalWire>,
}

#[derive(Debug, Deserialize)]
struct ProposalWire {
    risk_level: u8,
    description: String,
    command: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl HttpAgentBackend {
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

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AgentBackend for HttpAgentBackend {
    fn name(&self) -> &str {
        "orchestrator"
    }

    async fn invoke(&self, prompt: &str) -> Result<AgentReply> {
        let response = self
            .client
            .post(self.endpoint("/api/agent/invoke"))
            .json(&InvokeRequest { prompt })
            .send()
            .await
            .context("orchestrator request failed")?
            .error_for_status()
            .context("orchestrator returned an error status")?;

        let body: InvokeResponse = response
            .json()
            .await
            .context("orchestrator returned malformed JSON")?;

        let mut turn = Turn::agent(body.summary)?;
        if !body.plan.is_empty() {
            turn = turn.with_plan(body.plan)?;
        }
        if let Some(code) = body.generated_code {
            turn = turn.with_generated_code(code)?;
        }

        let proposal = body
            .proposal
            .map(|p| ActionProposal::new(p.risk_level, p.description, p.command));

        Ok(AgentReply { turn, proposal })
    }

    async fn health(&self) -> bool {
        match self.client.get(self.endpoint("/")).send().await {
            Ok(response) => response
                .json::<HealthResponse>()
                .await
                .map(|health| health.status == "ok")
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}
