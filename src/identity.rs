//! User identity resolver.
//!
//! Orchestrates guest commands to create the default user account, add it to
//! the required groups, and resolve its numeric UID from `id -u` output.

use crate::error::{LauncherError, Result};
use crate::runner::GuestRunner;
use crate::subsystem::{DistributionFlags, Subsystem};
use tracing::{debug, info};

/// Groups every created user is added to. Membership here is what makes the
/// account usable (sudo in particular), so user creation is atomic with it.
pub const USER_GROUPS: &str = "adm,cdrom,sudo,dip,plugdev";

/// UID text from `id -u` is one short line; 63 bytes leaves room to spare and
/// the producer has already exited before the read, so one read suffices.
const UID_BUFFER_LEN: usize = 63;

/// Resolves and configures the default user for one distribution.
pub struct IdentityResolver<'a, S: Subsystem> {
    subsystem: &'a S,
    distribution: &'a str,
    runner: GuestRunner<'a, S>,
}

impl<'a, S: Subsystem> IdentityResolver<'a, S> {
    pub fn new(subsystem: &'a S, distribution: &'a str) -> Self {
        Self {
            subsystem,
            distribution,
            runner: GuestRunner::new(subsystem, distribution),
        }
    }

    /// Create `name` with a home directory and the required group membership.
    ///
    /// Either both steps succeed or the user is removed again: a failed
    /// `usermod` triggers a best-effort `userdel -r` so no half-configured
    /// account survives. Returns true only when both steps succeeded, which
    /// makes retrying safe for the caller.
    pub fn create_user(&self, name: &str) -> bool {
        let command = format!("/usr/sbin/useradd -m {name}");
        if !self.runner.run_unchecked(&command, true) {
            return false;
        }

        let command = format!("/usr/sbin/usermod -aG {USER_GROUPS} {name}");
        if !self.runner.run_unchecked(&command, true) {
            // Delete the user if the group add command failed.
            let command = format!("/usr/sbin/userdel -r {name}");
            self.runner.run_unchecked(&command, true);
            return false;
        }

        info!(user = name, "created user account");
        true
    }

    /// Resolve the numeric UID of `name` via `id -u` inside the guest.
    ///
    /// Returns `Ok(None)` only when stdout could not be captured; a non-zero
    /// exit (the user likely does not exist) is an [`InvalidArgument`]
    /// error. UID 0 is a legitimate result, never a sentinel.
    ///
    /// [`InvalidArgument`]: LauncherError::InvalidArgument
    pub fn query_uid(&self, name: &str) -> Result<Option<u32>> {
        let command = format!("/usr/bin/id -u {name}");
        let mut child = self.runner.run_captured(&command, true)?;
        if !child.stdout_captured() {
            return Ok(None);
        }

        // Wait for the child to exit and ensure it exited successfully.
        let exit_code = child.wait()?;
        if exit_code != 0 {
            return Err(LauncherError::invalid_argument(format!(
                "no UID for user {name:?} (id -u exited with {exit_code})"
            )));
        }

        let mut buffer = [0u8; UID_BUFFER_LEN];
        let bytes_read = child.read_stdout(&mut buffer)?;
        let uid = parse_uid(&buffer[..bytes_read]);
        debug!(user = name, uid, "resolved UID");
        Ok(Some(uid))
    }

    /// Configure `name` as the distribution's default user.
    pub fn set_default_user(&self, name: &str) -> Result<()> {
        let uid = self.query_uid(name)?.ok_or_else(|| {
            LauncherError::invalid_argument(format!("could not capture UID for user {name:?}"))
        })?;
        self.subsystem
            .configure_distribution(self.distribution, uid, DistributionFlags::DefaultUser)
    }
}

/// Parse the leading decimal integer from raw `id -u` output.
///
/// `strtoul` semantics: leading ASCII whitespace is skipped, digits are
/// consumed until the first non-digit (the trailing newline, in practice),
/// no digits parse as 0, and overflow saturates.
pub fn parse_uid(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}
