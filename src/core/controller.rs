//! Conversation controller - owns the turn log and orchestrates the flow
//!
//! submit -> agent reply -> consent gate -> execution -> enrichment.
//! The controller is driven `&mut self` by a single task, so submit,
//! reply arrival, and decide are each atomic with respect to the shared
//! conversation state. The two suspension points (agent round trip, human
//! decision) wait indefinitely.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::agent::AgentBackend;
use crate::exec::ActionExecutor;
use crate::ui::AppEvent;

use super::consent::{ActionProposal, ConsentGate, Decision, GateState};
use super::errors::ConversationError;
use super::turn::Turn;

/// Shared conversation state, exclusively owned and mutated by the
/// controller. `pending_proposal` is non-empty exactly while the consent
/// gate is pending; new submissions are refused until it resolves.
#[derive(Debug)]
pub struct ConversationState {
    turns: Vec<Turn>,
    awaiting_response: bool,
    pending_proposal: Option<ActionProposal>,
    agent_online: bool,
}

impl ConversationState {
    fn new() -> Self {
        Self {
            turns: Vec::new(),
            awaiting_response: false,
            pending_proposal: None,
            agent_online: true,
        }
    }

    /// The turn log, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn pending_proposal(&self) -> Option<&ActionProposal> {
        self.pending_proposal.as_ref()
    }

    /// Whether the last collaborator exchange succeeded
    pub fn agent_online(&self) -> bool {
        self.agent_online
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrates the conversation between the user, the agent backend, and
/// the executor, routing every proposed action through the consent gate.
pub struct ConversationController {
    state: ConversationState,
    gate: ConsentGate,
    backend: Arc<dyn AgentBackend>,
    executor: Arc<dyn ActionExecutor>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ConversationController {
    pub fn new(
        backend: Arc<dyn AgentBackend>,
        executor: Arc<dyn ActionExecutor>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            state: ConversationState::new(),
            gate: ConsentGate::new(),
            backend,
            executor,
            event_tx,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn turns(&self) -> &[Turn] {
        self.state.turns()
    }

    pub fn awaiting_response(&self) -> bool {
        self.state.awaiting_response()
    }

    pub fn pending_proposal(&self) -> Option<&ActionProposal> {
        self.state.pending_proposal()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn agent_online(&self) -> bool {
        self.state.agent_online()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Probe the agent backend and refresh the online status
    pub async fn check_backend(&mut self) -> bool {
        let online = self.backend.health().await;
        self.state.agent_online = online;
        online
    }

    /// Submit user text and drive the full round trip: append the user
    /// turn, await the agent backend, feed the reply into the log. A
    /// backend failure is surfaced as an outage turn plus a status flag,
    /// never a stuck conversation.
    pub async fn submit(&mut self, text: &str) -> Result<(), ConversationError> {
        let prompt = text.trim().to_string();
        self.begin_submit(&prompt)?;

        match self.backend.invoke(&prompt).await {
            Ok(reply) => {
                if let Err(err) = self.on_agent_response(reply.turn, reply.proposal) {
                    tracing::warn!(error = %err, "agent reply carried an unusable proposal");
                }
            }
            Err(err) => self.handle_agent_failure(&err),
        }
        Ok(())
    }

    /// Append the user turn and mark the conversation as awaiting.
    /// `submit` drives this plus the backend round trip; push-style
    /// integrations call it directly and deliver the reply through
    /// `on_agent_response` when their transport yields one.
    pub fn begin_submit(&mut self, text: &str) -> Result<(), ConversationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConversationError::EmptyPrompt);
        }
        if self.state.pending_proposal.is_some() {
            return Err(ConversationError::ProposalPending);
        }
        if self.state.awaiting_response {
            return Err(ConversationError::AlreadyAwaiting);
        }

        let turn = Turn::user(trimmed)?;
        self.append_turn(turn);
        self.state.awaiting_response = true;
        self.emit(AppEvent::AgentThinking);
        tracing::debug!(backend = self.backend.name(), "prompt submitted");
        Ok(())
    }

    /// Feed an agent reply into the log. If it carries a proposal, the
    /// consent gate opens and the conversation blocks until a decision.
    /// A malformed proposal is rejected and recorded in the log; the gate
    /// stays idle.
    pub fn on_agent_response(
        &mut self,
        turn: Turn,
        proposal: Option<ActionProposal>,
    ) -> Result<(), ConversationError> {
        self.state.awaiting_response = false;
        self.state.agent_online = true;
        self.append_turn(turn);

        if let Some(proposal) = proposal {
            match self.gate.open(proposal.clone()) {
                Ok(band) => {
                    self.state.pending_proposal = Some(proposal.clone());
                    self.emit(AppEvent::ProposalOpened { proposal, band });
                }
                Err(err) => {
                    self.append_turn(Turn::agent_note(format!(
                        "The agent proposed an action that was rejected before review: {err}."
                    )));
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// Resolve the pending proposal. Approval hands the action to the
    /// executor and appends an enrichment turn with the execution logs;
    /// denial appends a turn recording the declined action. The pending
    /// proposal is cleared on every path.
    pub async fn decide_proposal(&mut self, approve: bool) -> Result<(), ConversationError> {
        if approve {
            let proposal = self.gate.decide(Decision::Approved)?;
            self.state.pending_proposal = None;
            self.emit(AppEvent::ProposalResolved {
                decision: Decision::Approved,
            });
            self.emit(AppEvent::ExecutionStarted {
                command: proposal.command.clone(),
            });

            match self.executor.execute(&proposal).await {
                Ok(output) => {
                    self.state.agent_online = true;
                    let mut turn =
                        Turn::agent_note(format!("Executed `{}`.", proposal.command));
                    if let Some(code) = output.generated_code {
                        turn = turn.with_generated_code(code)?;
                    }
                    let turn = turn.with_logs(output.logs)?;
                    self.append_turn(turn);
                    self.emit(AppEvent::ExecutionCompleted);
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        command = %proposal.command,
                        executor = self.executor.name(),
                        "execution failed"
                    );
                    self.state.agent_online = false;
                    self.append_turn(Turn::agent_note(format!(
                        "Execution of `{}` failed: {err:#}.",
                        proposal.command
                    )));
                    self.emit(AppEvent::ExecutionFailed {
                        error: err.to_string(),
                    });
                }
            }
        } else {
            let proposal = self.gate.decide(Decision::Denied)?;
            self.state.pending_proposal = None;
            self.emit(AppEvent::ProposalResolved {
                decision: Decision::Denied,
            });
            self.append_turn(Turn::agent_note(format!(
                "Action declined: `{}` was not executed.",
                proposal.command
            )));
        }
        Ok(())
    }

    fn handle_agent_failure(&mut self, err: &anyhow::Error) {
        tracing::warn!(
            error = %err,
            backend = self.backend.name(),
            "agent backend unavailable"
        );
        self.state.awaiting_response = false;
        self.state.agent_online = false;
        self.append_turn(Turn::agent_note(format!(
            "The agent backend did not respond ({err:#}). Your message was logged; try again once it is back."
        )));
        self.emit(AppEvent::AgentUnavailable {
            error: err.to_string(),
        });
    }

    fn append_turn(&mut self, turn: Turn) {
        self.emit(AppEvent::TurnAppended(turn.clone()));
        self.state.turns.push(turn);
    }

    fn emit(&self, event: AppEvent) {
        // Fire and forget: a slow frontend must never block a transition
        let _ = self.event_tx.send(event);
    }
}
