//! Application events
//!
//! Sent from the controller to frontends over an unbounded channel so a
//! slow renderer can never block a state transition.

use crate::core::{ActionProposal, Decision, RiskBand, Turn};

/// Events emitted by the conversation controller
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A turn was appended to the log
    TurnAppended(Turn),

    /// A submission is in flight; the agent is working
    AgentThinking,

    /// An action proposal entered the consent gate
    ProposalOpened {
        proposal: ActionProposal,
        band: RiskBand,
    },

    /// The pending proposal was decided
    ProposalResolved { decision: Decision },

    /// An approved action started executing
    ExecutionStarted { command: String },

    /// Execution finished; the enrichment turn is in the log
    ExecutionCompleted,

    /// Execution failed; a failure turn is in the log
    ExecutionFailed { error: String },

    /// The agent or executor collaborator is unreachable; retry is allowed
    AgentUnavailable { error: String },
}
