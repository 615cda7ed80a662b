//! Error types for the editing engine
//!
//! The engine performs no I/O itself, so the taxonomy is narrow. None of these
//! errors end the editing session; the user can always keep typing.

/// Errors that can occur while editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The caret is not a collapsed point inside a text node, or it refers
    /// to a node that no longer exists
    InvalidCursorState,
    /// Two shortcut entries normalize to the same key and the table's
    /// conflict policy rejects duplicates
    AmbiguousShortcut { shortcut: String },
    /// A collaborator's asynchronous insertion (upload, dictation, AI rewrite)
    /// failed to resolve
    HostCallbackFailure { source: String },
}

impl EditorError {
    /// Get a user-friendly error message (for host toasts)
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCursorState => "The cursor position could not be used".to_string(),
            Self::AmbiguousShortcut { shortcut } => {
                format!("Shortcut \"{}\" is defined more than once", shortcut)
            }
            Self::HostCallbackFailure { source } => format!("Could not insert text: {}", source),
        }
    }
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCursorState => write!(f, "invalid cursor state"),
            Self::AmbiguousShortcut { shortcut } => write!(f, "ambiguous shortcut: {}", shortcut),
            Self::HostCallbackFailure { source } => write!(f, "host callback failed: {}", source),
        }
    }
}

impl std::error::Error for EditorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            EditorError::InvalidCursorState.to_string(),
            "invalid cursor state"
        );
        assert_eq!(
            EditorError::AmbiguousShortcut {
                shortcut: "sob".into()
            }
            .to_string(),
            "ambiguous shortcut: sob"
        );
    }

    #[test]
    fn test_user_message_mentions_source() {
        let err = EditorError::HostCallbackFailure {
            source: "upload timed out".into(),
        };
        assert!(err.user_message().contains("upload timed out"));
    }
}
