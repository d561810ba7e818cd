//! Simulation backend - deterministic agent for offline use and tests
//!
//! Mirrors what the orchestrator produces for common requests without any
//! network: a summary, a short plan, generated code for actionable
//! prompts, and an action proposal whenever the prompt asks warden to
//! touch the machine. Risk scales with how destructive the request looks.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{ActionProposal, RiskBand, Turn};

use super::{AgentBackend, AgentReply};

/// Verbs that make the sim raise an action proposal
const ACTION_VERBS: &[&str] = &[
    "run", "execute", "delete", "remove", "write", "save", "fetch", "download", "install", "list",
];

/// Wording that pushes a simulated action into the high band
const DESTRUCTIVE_HINTS: &[&str] = &["delete", "remove", "rm ", "drop", "overwrite", "uninstall"];

/// Wording that implies writes, the middle band
const WRITE_HINTS: &[&str] = &["write", "save", "install", "download"];

pub struct SimAgentBackend {
    /// Conversation turn counter, so successive scripts stay distinct
    turn_counter: AtomicUsize,
}

impl SimAgentBackend {
    pub fn new() -> Self {
        Self {
            turn_counter: AtomicUsize::new(0),
        }
    }

    fn wants_action(prompt: &str) -> bool {
        let lower = prompt.to_lowercase();
        ACTION_VERBS.iter().any(|verb| lower.contains(verb))
    }

    fn risk_for(prompt: &str) -> u8 {
        let lower = prompt.to_lowercase();
        if DESTRUCTIVE_HINTS.iter().any(|hint| lower.contains(hint)) {
            9
        } else if WRITE_HINTS.iter().any(|hint| lower.contains(hint)) {
            6
        } else {
            3
        }
    }

    fn rationale_for(risk: u8) -> &'static str {
        match RiskBand::from_level(risk) {
            RiskBand::Low => "Runs a read-only script in the working directory",
            RiskBand::Medium => "Writes files in the working directory",
            RiskBand::High => "Deletes or overwrites data; review carefully",
        }
    }

    fn script_for(prompt: &str) -> String {
        format!(
            "# generated by the agent\nprint(\"task: {}\")\n",
            prompt.replace('"', "'")
        )
    }
}

impl Default for SimAgentBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentBackend for SimAgentBackend {
    fn name(&self) -> &str {
        "sim"
    }

    async fn invoke(&self, prompt: &str) -> Result<AgentReply> {
        let n = self.turn_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let trimmed = prompt.trim();

        if !Self::wants_action(trimmed) {
            let turn = Turn::agent(format!(
                "I can help with that. Ask me to run, fetch, or write something and I \
                 will propose the exact action first. (sim reply {n})"
            ))?;
            return Ok(AgentReply {
                turn,
                proposal: None,
            });
        }

        let script = format!("agent_task_{n}.py");
        let plan = vec![
            format!("Interpret the request: {trimmed}"),
            format!("Generate {script} implementing it"),
            "Run the script once the action is approved".to_string(),
        ];

        let turn = Turn::agent(format!("I prepared a script for: {trimmed}"))?
            .with_plan(plan)?
            .with_generated_code(Self::script_for(trimmed))?;

        let risk = Self::risk_for(trimmed);
        let proposal = ActionProposal::new(
            risk,
            Self::rationale_for(risk),
            format!("python {script}"),
        );

        Ok(AgentReply {
            turn,
            proposal: Some(proposal),
        })
    }
}
