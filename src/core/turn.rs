//! Turn model - one entry in the conversation log
//!
//! A turn is immutable once appended, with one exception: the append-only
//! log enrichment rule. `append_logs` may extend `logs` after an approved
//! action executes, but the id, role, and content already shown to the
//! user can never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::TurnError;
use super::panes::{pane_view, PaneView};

/// Stable identifier assigned at construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(String);

impl TurnId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Agent,
}

impl TurnRole {
    /// Display label for transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Agent => "agent",
        }
    }
}

impl std::str::FromStr for TurnRole {
    type Err = TurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            other => Err(TurnError::UnknownRole(other.to_string())),
        }
    }
}

/// One message in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    role: TurnRole,
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    plan: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logs: Option<String>,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a user turn. User turns never carry structured sections.
    pub fn user(content: impl Into<String>) -> Result<Self, TurnError> {
        Self::new(TurnRole::User, content.into())
    }

    /// Create a bare agent turn; sections attach via the `with_*` builders.
    pub fn agent(content: impl Into<String>) -> Result<Self, TurnError> {
        Self::new(TurnRole::Agent, content.into())
    }

    /// Create from raw role and content strings (wire input)
    pub fn from_parts(role: &str, content: &str) -> Result<Self, TurnError> {
        let role: TurnRole = role.parse()?;
        Self::new(role, content.to_string())
    }

    /// Controller-authored status note; callers pass non-empty text
    pub(crate) fn agent_note(content: impl Into<String>) -> Self {
        let content = content.into();
        let content = if content.trim().is_empty() {
            "(no details)".to_string()
        } else {
            content.trim().to_string()
        };
        Self::build(TurnRole::Agent, content)
    }

    fn new(role: TurnRole, content: String) -> Result<Self, TurnError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(TurnError::EmptyContent);
        }
        Ok(Self::build(role, trimmed.to_string()))
    }

    fn build(role: TurnRole, content: String) -> Self {
        Self {
            id: TurnId::generate(),
            role,
            content,
            plan: Vec::new(),
            generated_code: None,
            logs: None,
            created_at: Utc::now(),
        }
    }

    /// Attach an ordered plan (agent turns only)
    pub fn with_plan(mut self, plan: Vec<String>) -> Result<Self, TurnError> {
        self.ensure_agent()?;
        self.plan = plan;
        Ok(self)
    }

    /// Attach generated source text (agent turns only)
    pub fn with_generated_code(mut self, code: impl Into<String>) -> Result<Self, TurnError> {
        self.ensure_agent()?;
        self.generated_code = Some(code.into());
        Ok(self)
    }

    /// Attach execution output (agent turns only)
    pub fn with_logs(mut self, logs: impl Into<String>) -> Result<Self, TurnError> {
        self.ensure_agent()?;
        self.logs = Some(logs.into());
        Ok(self)
    }

    /// Append-only enrichment: extends `logs`, preserves id/role/content
    pub fn append_logs(&mut self, text: &str) -> Result<(), TurnError> {
        self.ensure_agent()?;
        match &mut self.logs {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => self.logs = Some(text.to_string()),
        }
        Ok(())
    }

    fn ensure_agent(&self) -> Result<(), TurnError> {
        match self.role {
            TurnRole::Agent => Ok(()),
            TurnRole::User => Err(TurnError::SectionsOnUserTurn),
        }
    }

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn plan(&self) -> &[String] {
        &self.plan
    }

    pub fn generated_code(&self) -> Option<&str> {
        self.generated_code.as_deref()
    }

    pub fn logs(&self) -> Option<&str> {
        self.logs.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Ordered pane list for rendering this turn
    pub fn panes(&self) -> PaneView {
        pane_view(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_content() {
        assert_eq!(Turn::user("").unwrap_err(), TurnError::EmptyContent);
        assert_eq!(Turn::agent("   \n\t ").unwrap_err(), TurnError::EmptyContent);
    }

    #[test]
    fn trims_content() {
        let turn = Turn::user("  list files  ").unwrap();
        assert_eq!(turn.content(), "list files");
    }

    #[test]
    fn rejects_unknown_role() {
        let err = Turn::from_parts("system", "hello").unwrap_err();
        assert_eq!(err, TurnError::UnknownRole("system".to_string()));
    }

    #[test]
    fn parses_known_roles() {
        assert_eq!(Turn::from_parts("user", "hi").unwrap().role(), TurnRole::User);
        assert_eq!(
            Turn::from_parts("Agent", "hi").unwrap().role(),
            TurnRole::Agent
        );
    }

    #[test]
    fn user_turns_cannot_carry_sections() {
        let err = Turn::user("hi")
            .unwrap()
            .with_plan(vec!["step".to_string()])
            .unwrap_err();
        assert_eq!(err, TurnError::SectionsOnUserTurn);

        let mut turn = Turn::user("hi").unwrap();
        assert_eq!(
            turn.append_logs("out").unwrap_err(),
            TurnError::SectionsOnUserTurn
        );
    }

    #[test]
    fn agent_turns_carry_sections() {
        let turn = Turn::agent("summary")
            .unwrap()
            .with_plan(vec!["a".to_string(), "b".to_string()])
            .unwrap()
            .with_generated_code("print('hi')")
            .unwrap()
            .with_logs("done")
            .unwrap();
        assert_eq!(turn.plan().len(), 2);
        assert_eq!(turn.generated_code(), Some("print('hi')"));
        assert_eq!(turn.logs(), Some("done"));
    }

    #[test]
    fn enrichment_preserves_identity() {
        let mut turn = Turn::agent("ran the script").unwrap();
        let id = turn.id().clone();

        turn.append_logs("first line").unwrap();
        turn.append_logs("second line").unwrap();

        assert_eq!(turn.id(), &id);
        assert_eq!(turn.role(), TurnRole::Agent);
        assert_eq!(turn.content(), "ran the script");
        assert_eq!(turn.logs(), Some("first line\nsecond line"));
    }

    #[test]
    fn ids_are_unique() {
        let a = Turn::user("one").unwrap();
        let b = Turn::user("one").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
