//! Rendering collaborator seam
//!
//! The core emits `AppEvent`s; frontends render them and feed decisions
//! back through the controller. The console frontend is the reference
//! implementation; richer frontends plug in at the same seam.

mod console;
mod events;

pub use console::ConsoleFrontend;
pub use events::AppEvent;
