use thiserror::Error;

/// Why a single rotation attempt failed.
///
/// None of these stop the daemon loop; they are logged and the next attempt
/// happens at the next scheduled instant.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("no nicknames available")]
    NoNicknamesAvailable,

    #[error("could not find {0}")]
    TargetNotFound(String),

    #[error("missing permissions for name change (status: {status})")]
    PermissionDenied { status: u16 },

    #[error("failed to change name (status: {}, {detail})", display_status(.status))]
    MutationFailed { status: Option<u16>, detail: String },

    #[error("failed to read nickname pool: {0}")]
    Storage(String),
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

impl SwitchError {
    /// Short text for an interactive caller; the full detail only goes to the log.
    pub fn summary(&self) -> String {
        match self {
            SwitchError::NoNicknamesAvailable => "No nicknames available".to_string(),
            SwitchError::TargetNotFound(_) => "Could not find the target member".to_string(),
            SwitchError::PermissionDenied { status } => {
                format!("Missing permissions for name change (status {})", status)
            }
            SwitchError::MutationFailed { status: Some(status), .. } => {
                format!("Failed to change name (status {})", status)
            }
            SwitchError::MutationFailed { status: None, .. } => "Failed to change name".to_string(),
            SwitchError::Storage(_) => "Could not read the nickname pool".to_string(),
        }
    }
}

/// Misuse of the daemon controls. These are user input errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("daemon is already running")]
    AlreadyRunning,

    #[error("daemon is not running")]
    NotRunning,
}
