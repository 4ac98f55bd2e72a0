//! View state snapshot handed to the renderer each frame.

use crate::connection::ConnectionStatus;
use crate::identity::RegisterIdentity;

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct RegisterView {
    pub identity: RegisterIdentity,
    pub display: String,
    pub status: ConnectionStatus,
}

impl RegisterView {
    pub fn new(identity: RegisterIdentity) -> Self {
        Self {
            identity,
            display: "0".to_string(),
            status: ConnectionStatus::initial(),
        }
    }

    /// Header text: "Register #<suffix>".
    pub fn header(&self) -> String {
        format!("Register #{}", self.identity.display_suffix())
    }

    /// The display line shown to the operator.
    pub fn display_line(&self) -> String {
        format!("${}", self.display)
    }

    /// Connection indicator glyph plus status text.
    pub fn status_line(&self) -> String {
        let glyph = if self.status.is_connected() { "●" } else { "○" };
        format!("{glyph} {}", self.status.status_text())
    }
}
