//! Guest command runner.
//!
//! All guest-side configuration work is expressed as shell command strings:
//! the only integration point with the guest OS is "run a command and observe
//! its exit status/stdout", so this is the whole execution surface.

use crate::error::Result;
use crate::subsystem::{GuestProcess, StdioRouting, Subsystem};
use tracing::{debug, warn};

/// Issues single commands to one distribution through the subsystem.
pub struct GuestRunner<'a, S: Subsystem> {
    subsystem: &'a S,
    distribution: &'a str,
}

impl<'a, S: Subsystem> GuestRunner<'a, S> {
    pub fn new(subsystem: &'a S, distribution: &'a str) -> Self {
        Self {
            subsystem,
            distribution,
        }
    }

    /// Run `command` with inherited streams and block until it exits.
    ///
    /// Returns the guest process's exit code; subsystem-level failures
    /// propagate.
    pub fn run_interactive(&self, command: &str, use_cwd: bool) -> Result<u32> {
        debug!(command, use_cwd, "launching interactive guest command");
        self.subsystem
            .launch_interactive(self.distribution, command, use_cwd)
            .inspect_err(|e| warn!(command, error = %e, "interactive launch failed"))
    }

    /// Spawn `command` with stdout captured and return the waitable handle.
    pub fn run_captured(&self, command: &str, use_cwd: bool) -> Result<Box<dyn GuestProcess>> {
        debug!(command, use_cwd, "launching guest command with captured stdout");
        self.subsystem
            .launch(
                self.distribution,
                command,
                use_cwd,
                StdioRouting::CaptureStdout,
            )
            .inspect_err(|e| warn!(command, error = %e, "launch failed"))
    }

    /// Run interactively and collapse every failure mode to `false`.
    ///
    /// Used for commands whose failure triggers compensating action rather
    /// than propagation. True only on a clean zero exit.
    pub fn run_unchecked(&self, command: &str, use_cwd: bool) -> bool {
        match self.run_interactive(command, use_cwd) {
            Ok(0) => true,
            Ok(code) => {
                debug!(command, code, "guest command exited non-zero");
                false
            }
            Err(_) => false,
        }
    }
}
