use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Display enumeration failed: {0}")]
    Enumeration(String),
    #[error("Display reconfiguration rejected: {0}")]
    Reconfigure(String),
    #[error("Window query failed: {0}")]
    WindowQuery(String),
    #[error("Process identity unavailable: {0}")]
    ProcessIdentity(String),
    #[error("Window move rejected: {0}")]
    MoveRejected(String),
}
