//! Terminal user interface for the register.
//!
//! A thin collaborator around the core: it maps key presses to edit
//! operations (see [`crate::input`]) and renders the display buffer plus the
//! connection status. It receives no other data from the core.

pub mod state;
pub mod terminal;

pub use state::RegisterView;
pub use terminal::TerminalUI;
