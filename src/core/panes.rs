//! Content selector - which panes a turn presents
//!
//! The pane order is a contract: Summary, Plan, Code, Logs. Downstream
//! consumers rely on stable indices, so the order never depends on which
//! sections happen to be populated.

use serde::{Deserialize, Serialize};

use super::turn::Turn;

/// Pane identity, in contract order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaneKind {
    Summary,
    Plan,
    Code,
    Logs,
}

impl PaneKind {
    /// Tab label for this pane
    pub fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Plan => "Plan",
            Self::Code => "Code",
            Self::Logs => "Logs",
        }
    }
}

/// Pane body: free text for Summary/Code/Logs, ordered steps for Plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaneBody {
    Text(String),
    Steps(Vec<String>),
}

/// One labeled pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pane {
    pub kind: PaneKind,
    pub body: PaneBody,
}

/// Ordered pane list for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneView {
    panes: Vec<Pane>,
}

impl PaneView {
    /// Panes in contract order; index 0 is always Summary
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// True when only the summary resulted. The renderer may then drop the
    /// pane-switching chrome and show the content directly; the summary
    /// text itself is identical either way.
    pub fn is_single_pane(&self) -> bool {
        self.panes.len() == 1
    }

    /// The summary text (pane 0)
    pub fn summary(&self) -> &str {
        match &self.panes[0].body {
            PaneBody::Text(text) => text.as_str(),
            PaneBody::Steps(_) => "",
        }
    }
}

/// Build the ordered pane list for a turn. Pure: the same turn always
/// yields the same view.
pub fn pane_view(turn: &Turn) -> PaneView {
    let mut panes = vec![Pane {
        kind: PaneKind::Summary,
        body: PaneBody::Text(turn.content().to_string()),
    }];

    if !turn.plan().is_empty() {
        panes.push(Pane {
            kind: PaneKind::Plan,
            body: PaneBody::Steps(turn.plan().to_vec()),
        });
    }
    if let Some(code) = turn.generated_code() {
        if !code.is_empty() {
            panes.push(Pane {
                kind: PaneKind::Code,
                body: PaneBody::Text(code.to_string()),
            });
        }
    }
    if let Some(logs) = turn.logs() {
        if !logs.is_empty() {
            panes.push(Pane {
                kind: PaneKind::Logs,
                body: PaneBody::Text(logs.to_string()),
            });
        }
    }

    PaneView { panes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_turn() -> Turn {
        Turn::agent("the summary")
            .unwrap()
            .with_plan(vec!["step one".to_string()])
            .unwrap()
            .with_generated_code("print('x')")
            .unwrap()
            .with_logs("ran fine")
            .unwrap()
    }

    #[test]
    fn full_turn_yields_contract_order() {
        let view = pane_view(&full_turn());
        let kinds: Vec<PaneKind> = view.panes().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PaneKind::Summary, PaneKind::Plan, PaneKind::Code, PaneKind::Logs]
        );
        assert!(!view.is_single_pane());
    }

    #[test]
    fn summary_only_turn_is_single_pane() {
        let turn = Turn::agent("just text").unwrap();
        let view = pane_view(&turn);
        assert!(view.is_single_pane());
        assert_eq!(view.panes().len(), 1);
        assert_eq!(view.panes()[0].kind, PaneKind::Summary);
    }

    #[test]
    fn summary_text_identical_single_and_multi() {
        let single = pane_view(&Turn::agent("same words").unwrap());
        let multi = pane_view(
            &Turn::agent("same words")
                .unwrap()
                .with_logs("output")
                .unwrap(),
        );
        assert_eq!(single.summary(), multi.summary());
        assert_eq!(single.summary(), "same words");
    }

    #[test]
    fn empty_code_section_gets_no_pane() {
        let turn = Turn::agent("summary")
            .unwrap()
            .with_generated_code("")
            .unwrap();
        let view = pane_view(&turn);
        assert!(view.is_single_pane());
    }

    #[test]
    fn plan_pane_keeps_step_order() {
        let steps = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let turn = Turn::agent("summary")
            .unwrap()
            .with_plan(steps.clone())
            .unwrap();
        let view = pane_view(&turn);
        assert_eq!(view.panes()[1].body, PaneBody::Steps(steps));
    }

    #[test]
    fn user_turns_render_as_single_pane() {
        let view = pane_view(&Turn::user("hello there").unwrap());
        assert!(view.is_single_pane());
        assert_eq!(view.summary(), "hello there");
    }
}
