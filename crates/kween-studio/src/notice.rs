//! User notifications

/// A message for the host to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Transient confirmation
    Toast(String),
    /// Blocking, dismissible error
    Alert(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Toast(message) | Self::Alert(message) => message,
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert(_))
    }
}
