use thiserror::Error;

/// Failure kinds surfaced by the roster and its collaborators.
///
/// Every variant means the operation did not apply. Roster state is never
/// left half-changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Bad input from the user: empty lists, colliding times, bad indexes
    #[error("{0}")]
    Validation(String),
    /// Nothing stored yet for the tenant
    #[error("not found: {0}")]
    NotFound(String),
    /// Network, server, or local storage failure
    #[error("persistence failed: {0}")]
    Persistence(String),
    /// Caller's role does not allow the operation
    #[error("permission denied: {0}")]
    Permission(String),
}

impl RosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(msg: impl std::fmt::Display) -> Self {
        Self::Persistence(msg.to_string())
    }
}

impl From<rusqlite::Error> for RosterError {
    fn from(e: rusqlite::Error) -> Self {
        Self::persistence(e)
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(e: serde_json::Error) -> Self {
        Self::persistence(e)
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        Self::persistence(e)
    }
}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        Self::persistence(e)
    }
}

pub type Result<T, E = RosterError> = std::result::Result<T, E>;
