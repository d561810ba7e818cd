//! Line-oriented console frontend
//!
//! The reference rendering collaborator: prints each turn with a role
//! badge, lists the panes a turn offers, and blocks on the consent prompt
//! until the user types an explicit decision. Only input and rendering
//! live here; every decision goes through the controller.

use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

use crate::core::{
    ConversationController, Decision, ErrorKind, PaneBody, RiskBand, Turn, TurnRole,
};

use super::AppEvent;

pub struct ConsoleFrontend {
    controller: ConversationController,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleFrontend {
    pub fn new(
        controller: ConversationController,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            controller,
            event_rx,
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Run the chat loop until EOF or `/quit`
    pub async fn run(&mut self, initial_message: Option<String>) -> Result<()> {
        self.print_banner();

        if let Some(message) = initial_message {
            if !self.handle_submission(&message).await? {
                return Ok(());
            }
        }

        loop {
            self.prompt();
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line == "/quit" || line == "/exit" {
                break;
            }
            if !self.handle_submission(&line).await? {
                break;
            }
        }
        Ok(())
    }

    /// Returns false when stdin closed mid-consent
    async fn handle_submission(&mut self, text: &str) -> Result<bool> {
        if let Err(err) = self.controller.submit(text).await {
            let prefix = match err.kind() {
                ErrorKind::Validation => "invalid input",
                ErrorKind::InvalidState => "hold on",
            };
            println!("{} {}", prefix.red(), err);
            return Ok(true);
        }
        self.drain_events();

        while self.controller.pending_proposal().is_some() {
            if !self.resolve_consent().await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Blocking approve/deny prompt for the pending proposal. Returns
    /// false when stdin closed; the proposal is denied first so nothing
    /// ever runs on a default path.
    async fn resolve_consent(&mut self) -> Result<bool> {
        let Some(proposal) = self.controller.pending_proposal().cloned() else {
            return Ok(true);
        };
        let band = proposal.band();

        println!();
        println!("{}", "Agent action required".bold());
        println!("  {} {}", band_tag(band), proposal.description);
        println!("  {} {}", "command:".dimmed(), proposal.command.yellow());

        loop {
            print!("{} ", "approve? [y/n]".bold());
            let _ = std::io::stdout().flush();

            let Some(line) = self.lines.next_line().await? else {
                self.controller.decide_proposal(false).await?;
                self.drain_events();
                return Ok(false);
            };
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" | "approve" => {
                    self.controller.decide_proposal(true).await?;
                    break;
                }
                "n" | "no" | "deny" => {
                    self.controller.decide_proposal(false).await?;
                    break;
                }
                _ => println!("{}", "answer y (approve) or n (deny)".dimmed()),
            }
        }
        self.drain_events();
        Ok(true)
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::TurnAppended(turn) => self.render_turn(&turn),
                AppEvent::AgentThinking => {
                    println!("{}", "agent is thinking...".dimmed());
                }
                // rendered by the consent prompt
                AppEvent::ProposalOpened { .. } => {}
                AppEvent::ProposalResolved { decision } => {
                    let line = match decision {
                        Decision::Approved => "action approved".green(),
                        Decision::Denied => "action denied".yellow(),
                    };
                    println!("{line}");
                }
                AppEvent::ExecutionStarted { command } => {
                    println!("{} {}", "running".dimmed(), command.yellow());
                }
                AppEvent::ExecutionCompleted => {}
                // the failure turn carries the details
                AppEvent::ExecutionFailed { .. } => {}
                AppEvent::AgentUnavailable { .. } => {
                    println!("{}", "agent offline - message kept, try again".red());
                }
            }
        }
    }

    fn render_turn(&self, turn: &Turn) {
        let badge = match turn.role() {
            TurnRole::User => format!(" {} ", turn.role().label()).on_blue().bold(),
            TurnRole::Agent => format!(" {} ", turn.role().label()).on_green().bold(),
        };

        let view = turn.panes();
        println!();
        println!("{} {}", badge, view.summary());

        if view.is_single_pane() {
            return;
        }
        for pane in view.panes().iter().skip(1) {
            println!("  {}", pane.kind.label().underline());
            match &pane.body {
                PaneBody::Text(text) => {
                    for line in text.lines() {
                        println!("    {line}");
                    }
                }
                PaneBody::Steps(steps) => {
                    for (i, step) in steps.iter().enumerate() {
                        println!("    {}. {}", i + 1, step);
                    }
                }
            }
        }
    }

    fn print_banner(&self) {
        let dot = if self.controller.agent_online() {
            "●".green()
        } else {
            "●".red()
        };
        println!(
            "{} {} {}",
            "warden".bold(),
            dot,
            format!("agent backend: {}", self.controller.backend_name()).dimmed()
        );
        println!(
            "{}",
            "The agent may propose actions; nothing runs until you approve it. /quit to exit."
                .dimmed()
        );
    }

    fn prompt(&self) {
        print!("{} ", ">".bold());
        let _ = std::io::stdout().flush();
    }
}

fn band_tag(band: RiskBand) -> colored::ColoredString {
    let label = format!("{} {} risk", band.icon(), band.label().to_lowercase());
    match band {
        RiskBand::Low => label.green(),
        RiskBand::Medium => label.yellow(),
        RiskBand::High => label.red().bold(),
    }
}
