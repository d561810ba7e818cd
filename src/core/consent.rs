//! Consent gate - no agent action runs without an explicit human decision
//!
//! State machine: Idle -> Pending -> (approved | denied) -> Idle. The
//! decision outcomes are transient and land in a bounded transition
//! history. There is deliberately no timeout path: an action with
//! real-world side effects must never proceed on a default.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::errors::GateError;

/// Highest value on the risk scale
pub const MAX_RISK_LEVEL: u8 = 10;

/// A pending agent-requested action awaiting a human decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionProposal {
    /// 0-10, higher = more dangerous
    pub risk_level: u8,
    /// Human-readable rationale for the risk classification
    pub description: String,
    /// The literal command the agent intends to run
    pub command: String,
}

impl ActionProposal {
    pub fn new(
        risk_level: u8,
        description: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            risk_level,
            description: description.into(),
            command: command.into(),
        }
    }

    /// Presentation band for this proposal's risk level
    pub fn band(&self) -> RiskBand {
        RiskBand::from_level(self.risk_level)
    }
}

/// Presentation weighting for a risk level. Every band requires the same
/// explicit approval; the band only drives labels, icons, and colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    /// Levels 0-4
    Low,
    /// Levels 5-7
    Medium,
    /// Levels 8-10
    High,
}

impl RiskBand {
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=4 => Self::Low,
            5..=7 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Short label for this band
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Color name for frontends
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "yellow",
            Self::High => "red",
        }
    }

    /// Icon for this band
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Low => "•",
            Self::Medium => "⚠",
            Self::High => "⛔",
        }
    }
}

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No proposal outstanding
    Idle,
    /// A proposal awaits a decision
    Pending,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
        }
    }
}

/// The two ways a pending proposal can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

/// Blocks agent-proposed actions until a human approves or denies them
#[derive(Debug)]
pub struct ConsentGate {
    state: GateState,
    proposal: Option<ActionProposal>,
    /// Last few transitions, for diagnostics
    transitions: Vec<(Instant, &'static str)>,
}

impl ConsentGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
            proposal: None,
            transitions: Vec::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// The proposal awaiting a decision, if any
    pub fn pending(&self) -> Option<&ActionProposal> {
        self.proposal.as_ref()
    }

    /// Accept a proposal and block until a decision. Fails with
    /// `RiskOutOfRange` for levels beyond the scale and `AlreadyPending`
    /// while a proposal is unresolved; the gate is untouched on either
    /// failure.
    pub fn open(&mut self, proposal: ActionProposal) -> Result<RiskBand, GateError> {
        if proposal.risk_level > MAX_RISK_LEVEL {
            return Err(GateError::RiskOutOfRange(proposal.risk_level));
        }
        if self.state == GateState::Pending {
            return Err(GateError::AlreadyPending);
        }

        let band = proposal.band();
        tracing::debug!(
            risk = proposal.risk_level,
            band = band.label(),
            command = %proposal.command,
            "proposal opened"
        );
        self.proposal = Some(proposal);
        self.transition(GateState::Pending);
        Ok(band)
    }

    /// Approve the pending proposal, releasing it for execution
    pub fn approve(&mut self) -> Result<ActionProposal, GateError> {
        self.decide(Decision::Approved)
    }

    /// Deny the pending proposal, discarding it
    pub fn deny(&mut self) -> Result<ActionProposal, GateError> {
        self.decide(Decision::Denied)
    }

    /// Resolve the pending proposal with an explicit decision. Exactly one
    /// decision fires per opened proposal; a second call fails with
    /// `NotPending`.
    pub fn decide(&mut self, decision: Decision) -> Result<ActionProposal, GateError> {
        if self.state != GateState::Pending {
            return Err(GateError::NotPending);
        }
        let proposal = self.proposal.take().ok_or(GateError::NotPending)?;

        tracing::info!(
            command = %proposal.command,
            outcome = decision.label(),
            "proposal resolved"
        );
        self.record(decision.label());
        self.transition(GateState::Idle);
        Ok(proposal)
    }

    fn transition(&mut self, next: GateState) {
        self.record(next.as_str());
        self.state = next;
    }

    fn record(&mut self, label: &'static str) {
        self.transitions.push((Instant::now(), label));
        // Keep only the recent tail
        if self.transitions.len() > 16 {
            self.transitions.drain(0..1);
        }
    }
}

impl Default for ConsentGate {
    fn default() -> Self {
        Self::new()
    }
}
