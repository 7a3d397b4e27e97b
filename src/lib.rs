//! WSL distribution launcher library
//!
//! Installs, configures, and runs a Linux distribution under the Windows
//! Subsystem for Linux, and manages the distribution's default user account.

pub mod cli;
pub mod console;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod runner;
pub mod subsystem;

// Re-export main types for convenience
pub use cli::{dispatch, user_message, Cli, Commands};
pub use error::{LauncherError, Result};
pub use identity::{parse_uid, IdentityResolver, USER_GROUPS};
pub use lifecycle::{Distribution, DISTRIBUTION_NAME, MAX_USERNAME_LEN, ROOTFS_IMAGE};
pub use runner::GuestRunner;
pub use subsystem::{DistributionFlags, GuestProcess, StdioRouting, Subsystem, WslCli};
