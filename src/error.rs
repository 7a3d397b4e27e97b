//! Error handling module for the launcher
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the application should use these types for consistency.
//!
//! Expected, routinely-handled failures (a guest command exiting non-zero, a
//! best-effort cleanup command failing) are expressed as return values by the
//! callers, not as variants here. These variants cover the genuinely
//! exceptional paths that abort the current operation.

use thiserror::Error;

/// Main error type for the launcher
#[derive(Error, Debug)]
pub enum LauncherError {
    /// The WSL optional component is not installed on this host.
    #[error("The Windows Subsystem for Linux optional component is not installed")]
    FeatureUnavailable,

    /// Registration attempted against an existing distribution name.
    #[error("The distribution is already installed")]
    AlreadyRegistered,

    /// A subsystem-level failure surfaced after the initial feature probe.
    #[error("The Windows Subsystem for Linux is not present")]
    SubsystemNotPresent,

    /// Malformed arguments, or a UID lookup that found no user.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Distribution registration failed.
    #[error("Failed to register the distribution (error code {code})")]
    Registration { code: i32 },

    /// Distribution unregistration failed.
    #[error("Failed to unregister the distribution (error code {code})")]
    Unregistration { code: i32 },

    /// Default-user configuration failed.
    #[error("Failed to configure the distribution (error code {code})")]
    Configure { code: i32 },

    /// Launching a command inside the guest failed.
    #[error("Failed to launch {command:?} (error code {code})")]
    Launch { command: String, code: i32 },

    /// IO errors (pipes, stdin, process spawning)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure from the external subsystem, with its raw code.
    #[error("Subsystem error (code {code}): {message}")]
    Subsystem { code: i32, message: String },
}

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LauncherError>;

// Convenient error constructors
impl LauncherError {
    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a registration error carrying the underlying error code
    pub fn registration(code: i32) -> Self {
        Self::Registration { code }
    }

    /// Create an unregistration error carrying the underlying error code
    pub fn unregistration(code: i32) -> Self {
        Self::Unregistration { code }
    }

    /// Create a configuration error carrying the underlying error code
    pub fn configure(code: i32) -> Self {
        Self::Configure { code }
    }

    /// Create a launch error for a specific guest command
    pub fn launch(command: impl Into<String>, code: i32) -> Self {
        Self::Launch {
            command: command.into(),
            code,
        }
    }

    /// Create a generic subsystem error
    pub fn subsystem(code: i32, message: impl Into<String>) -> Self {
        Self::Subsystem {
            code,
            message: message.into(),
        }
    }

    /// The raw error code carried by this error, if any.
    ///
    /// Used by the CLI boundary to report unclassified failures the way the
    /// subsystem reported them.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Registration { code }
            | Self::Unregistration { code }
            | Self::Configure { code }
            | Self::Launch { code, .. }
            | Self::Subsystem { code, .. } => Some(*code),
            _ => None,
        }
    }
}
