//! External subsystem contract.
//!
//! Every lifecycle operation goes through the `Subsystem` trait so the rest of
//! the crate never touches the host's WSL integration directly. The concrete
//! backend lives in [`wsl`]; tests substitute a recording mock.
//!
//! # Contract
//!
//! - All operations are keyed by the distribution name; no state is cached on
//!   this side of the boundary.
//! - `launch_interactive` blocks and returns the guest exit code.
//! - `launch` spawns without waiting and hands back a [`GuestProcess`] the
//!   caller must wait on; the handle must not outlive the operation that
//!   created it.

pub mod wsl;

pub use wsl::WslCli;

use crate::error::Result;

/// Configuration flags accepted by [`Subsystem::configure_distribution`].
///
/// The launcher only ever sets the default-user marker, but the flags travel
/// as a distinct type so the call sites read as what they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionFlags {
    /// Mark the supplied UID as the default user for interactive launches.
    DefaultUser,
}

/// How a non-interactive guest process gets its standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioRouting {
    /// Inherit all three streams from the invoking process.
    Inherit,
    /// Inherit stdin/stderr, capture stdout through a pipe.
    CaptureStdout,
}

/// A spawned guest process the caller must wait on.
pub trait GuestProcess {
    /// Block until the process exits and return its exit code.
    fn wait(&mut self) -> Result<u32>;

    /// Read captured standard output into `buf`, returning the byte count.
    ///
    /// Only meaningful after [`wait`](Self::wait) when the process was
    /// spawned with [`StdioRouting::CaptureStdout`]; the producer has already
    /// exited, so a single read observes everything it wrote (up to `buf`'s
    /// length).
    fn read_stdout(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Whether a capture pipe was actually attached to stdout. False means
    /// the output is unobtainable and callers fall back to their
    /// absent-value path.
    fn stdout_captured(&self) -> bool;
}

/// Host subsystem operations consumed by the launcher.
///
/// Modeled as a constructor-injected capability rather than a process-wide
/// global so the lifecycle manager and identity resolver can be exercised
/// against a fake in tests.
pub trait Subsystem {
    /// Probe whether the WSL optional component is installed. No failure mode.
    fn is_optional_component_installed(&self) -> bool;

    /// Point-in-time query; registration can change out-of-band, so callers
    /// must not cache the answer.
    fn is_distribution_registered(&self, name: &str) -> bool;

    /// Register `name` from the given root filesystem image reference.
    fn register_distribution(&self, name: &str, image: &str) -> Result<()>;

    /// Unregister `name`, removing all of its on-disk guest state.
    fn unregister_distribution(&self, name: &str) -> Result<()>;

    /// Configure the distribution; `flags` selects what `uid` means.
    fn configure_distribution(&self, name: &str, uid: u32, flags: DistributionFlags)
        -> Result<()>;

    /// Run `command` in the guest with inherited streams, blocking until it
    /// exits. An empty command launches the distribution's default shell.
    fn launch_interactive(&self, name: &str, command: &str, use_cwd: bool) -> Result<u32>;

    /// Spawn `command` in the guest with the given stream routing and return
    /// a waitable handle.
    fn launch(
        &self,
        name: &str,
        command: &str,
        use_cwd: bool,
        routing: StdioRouting,
    ) -> Result<Box<dyn GuestProcess>>;
}
