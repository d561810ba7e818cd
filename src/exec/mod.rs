//! Executor collaborator contract and implementations
//!
//! Executors only ever see proposals that passed the consent gate. Their
//! output becomes the enrichment turn's logs; a failure becomes an
//! execution-failure turn, never a silent drop.

mod http;
mod shell;
mod sim;

pub use http::HttpExecutor;
pub use shell::ShellExecutor;
pub use sim::SimExecutor;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::ActionProposal;

/// What an executor yields for one approved action
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    /// Combined execution output for the enrichment turn's logs
    pub logs: String,
    /// Updated source text, when the sandbox rewrites it
    pub generated_code: Option<String>,
}

/// Trait for action executors
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Executor name for logs
    fn name(&self) -> &str;

    /// Run an approved action and return its output
    async fn execute(&self, proposal: &ActionProposal) -> Result<ExecutionOutput>;
}
