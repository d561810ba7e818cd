//! Headless conversation core
//!
//! The interaction model behind the chat surface: the turn log, the pane
//! selector, the consent gate, and the controller that ties them to the
//! agent and executor collaborators. Nothing in here renders or touches
//! the network.

pub mod consent;
pub mod controller;
pub mod errors;
pub mod panes;
pub mod turn;

pub use consent::{ActionProposal, ConsentGate, Decision, GateState, RiskBand, MAX_RISK_LEVEL};
pub use controller::{ConversationController, ConversationState};
pub use errors::{ConversationError, ErrorKind, GateError, TurnError};
pub use panes::{pane_view, Pane, PaneBody, PaneKind, PaneView};
pub use turn::{Turn, TurnId, TurnRole};
