//! Simulated executor for offline runs
//!
//! Pairs with the simulation backend: reports success without touching
//! the machine, so the full consent flow can be exercised anywhere.

use anyhow::Result;
use async_trait::async_trait;

use crate::core::ActionProposal;

use super::{ActionExecutor, ExecutionOutput};

pub struct SimExecutor;

impl SimExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionExecutor for SimExecutor {
    fn name(&self) -> &str {
        "sim"
    }

    async fn execute(&self, proposal: &ActionProposal) -> Result<ExecutionOutput> {
        Ok(ExecutionOutput {
            logs: format!("simulated run of `{}`: ok", proposal.command),
            generated_code: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_simulated_success() {
        let executor = SimExecutor::new();
        let output = executor
            .execute(&ActionProposal::new(3, "demo", "python agent_task_1.py"))
            .await
            .unwrap();
        assert!(output.logs.contains("agent_task_1.py"));
    }
}
