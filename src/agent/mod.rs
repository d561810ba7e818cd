//! Agent collaborator contract and implementations
//!
//! The core depends only on this shape: given a user prompt, a backend
//! eventually yields an agent turn and, sometimes, an action proposal for
//! the consent gate.

mod http;
mod sim;

pub use http::HttpAgentBackend;
pub use sim::SimAgentBackend;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{ActionProposal, Turn};

/// What an agent backend yields for one prompt
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// The agent's turn for the log
    pub turn: Turn,
    /// An action the agent wants to run; must pass the consent gate
    pub proposal: Option<ActionProposal>,
}

/// Trait for agent backends
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Backend name for logs and the status line
    fn name(&self) -> &str;

    /// Produce the agent's reply to a user prompt
    async fn invoke(&self, prompt: &str) -> Result<AgentReply>;

    /// Whether the backend is reachable right now
    async fn health(&self) -> bool {
        true
    }
}
