//! `wsl.exe` backend for the [`Subsystem`](super::Subsystem) trait.
//!
//! Drives the host's WSL command-line interface with `std::process::Command`.
//! All failures carry the raw exit code reported by `wsl.exe`; stderr text is
//! used only to classify the well-known "already exists" registration
//! collision.

use crate::error::{LauncherError, Result};
use crate::subsystem::{DistributionFlags, GuestProcess, StdioRouting, Subsystem};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::debug;

/// Exit code reported when `wsl.exe` terminates without one (signal on the
/// host side). Matches the shell convention for an abnormal exit.
const NO_EXIT_CODE: i32 = 1;

/// Concrete subsystem backend invoking `wsl.exe`.
pub struct WslCli {
    /// Directory the distribution's filesystem is imported into.
    install_dir: PathBuf,
}

impl WslCli {
    /// Create a backend that imports distributions under `install_dir`.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    /// Backend rooted at the launcher's own directory, the layout the rootfs
    /// archive ships in.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Run `wsl.exe` with the given arguments, capturing output.
    fn run_wsl(&self, args: &[&str]) -> Result<std::process::Output> {
        debug!(?args, "invoking wsl.exe");
        Command::new("wsl.exe")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LauncherError::SubsystemNotPresent,
                _ => LauncherError::Io(e),
            })
    }

    /// Build the `wsl.exe` invocation for running `command` in the guest.
    ///
    /// An empty command launches the default shell. `use_cwd` is the
    /// subsystem's native behavior; home is selected explicitly otherwise.
    fn launch_command(&self, name: &str, command: &str, use_cwd: bool) -> Command {
        let mut cmd = Command::new("wsl.exe");
        cmd.arg("-d").arg(name);
        if !use_cwd {
            cmd.arg("--cd").arg("~");
        }
        if !command.is_empty() {
            cmd.arg("--").arg("sh").arg("-c").arg(command);
        }
        cmd
    }
}

impl Subsystem for WslCli {
    fn is_optional_component_installed(&self) -> bool {
        which::which("wsl.exe").is_ok()
    }

    fn is_distribution_registered(&self, name: &str) -> bool {
        match self.run_wsl(&["--list", "--quiet"]) {
            Ok(output) if output.status.success() => {
                let listing = decode_console_output(&output.stdout);
                listing
                    .lines()
                    .any(|line| line.trim_end_matches('\r').trim() == name)
            }
            _ => false,
        }
    }

    fn register_distribution(&self, name: &str, image: &str) -> Result<()> {
        let install_dir = self.install_dir.join(name);
        let output = self.run_wsl(&[
            "--import",
            name,
            &install_dir.to_string_lossy(),
            image,
        ])?;
        if output.status.success() {
            return Ok(());
        }

        let code = output.status.code().unwrap_or(NO_EXIT_CODE);
        let stderr = decode_console_output(&output.stderr);
        debug!(code, %stderr, "wsl.exe --import failed");
        if stderr.to_lowercase().contains("already exists") {
            Err(LauncherError::AlreadyRegistered)
        } else {
            Err(LauncherError::registration(code))
        }
    }

    fn unregister_distribution(&self, name: &str) -> Result<()> {
        let output = self.run_wsl(&["--unregister", name])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(LauncherError::unregistration(
                output.status.code().unwrap_or(NO_EXIT_CODE),
            ))
        }
    }

    fn configure_distribution(
        &self,
        name: &str,
        uid: u32,
        flags: DistributionFlags,
    ) -> Result<()> {
        // The CLI has no UID-based configuration call, so the default user is
        // recorded in the guest's /etc/wsl.conf by name, resolved from the UID.
        let DistributionFlags::DefaultUser = flags;
        let script = format!(
            "printf '[user]\\ndefault=%s\\n' \"$(id -nu {uid})\" > /etc/wsl.conf"
        );
        let output = self.run_wsl(&["-d", name, "-u", "root", "--", "sh", "-c", &script])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(LauncherError::configure(
                output.status.code().unwrap_or(NO_EXIT_CODE),
            ))
        }
    }

    fn launch_interactive(&self, name: &str, command: &str, use_cwd: bool) -> Result<u32> {
        let status = self
            .launch_command(name, command, use_cwd)
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LauncherError::SubsystemNotPresent,
                _ => LauncherError::Io(e),
            })?;
        Ok(status.code().unwrap_or(NO_EXIT_CODE) as u32)
    }

    fn launch(
        &self,
        name: &str,
        command: &str,
        use_cwd: bool,
        routing: StdioRouting,
    ) -> Result<Box<dyn GuestProcess>> {
        let mut cmd = self.launch_command(name, command, use_cwd);
        if routing == StdioRouting::CaptureStdout {
            cmd.stdout(Stdio::piped());
        }
        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LauncherError::SubsystemNotPresent,
            _ => LauncherError::Io(e),
        })?;
        let stdout = child.stdout.take();
        Ok(Box::new(WslProcess { child, stdout }))
    }
}

/// Handle for a spawned `wsl.exe` child.
struct WslProcess {
    child: Child,
    stdout: Option<ChildStdout>,
}

impl GuestProcess for WslProcess {
    fn wait(&mut self) -> Result<u32> {
        let status = self.child.wait()?;
        Ok(status.code().unwrap_or(NO_EXIT_CODE) as u32)
    }

    fn read_stdout(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.stdout.as_mut() {
            Some(stdout) => stdout.read(buf),
            None => Ok(0),
        }
    }

    fn stdout_captured(&self) -> bool {
        self.stdout.is_some()
    }
}

/// Decode console output from `wsl.exe`.
///
/// On Windows hosts the tool emits UTF-16LE; elsewhere (or through wrappers)
/// plain UTF-8 arrives. Interior NULs in even positions are the tell.
fn decode_console_output(bytes: &[u8]) -> String {
    let looks_utf16 = bytes.len() >= 2 && bytes.iter().skip(1).step_by(2).any(|&b| b == 0);
    if looks_utf16 {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
