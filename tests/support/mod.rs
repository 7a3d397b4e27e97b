//! Shared test double: a scriptable, recording subsystem.
//!
//! Records every call so scenario tests can assert on ordering and payloads,
//! and lets individual tests script failures per guest command prefix.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use wsl_launcher::error::{LauncherError, Result};
use wsl_launcher::subsystem::{DistributionFlags, GuestProcess, StdioRouting, Subsystem};

/// One recorded subsystem call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register { name: String, image: String },
    Unregister { name: String },
    Configure { uid: u32, flags: DistributionFlags },
    LaunchInteractive { command: String, use_cwd: bool },
    Launch { command: String, use_cwd: bool },
}

/// Scripted result for an interactive guest command.
#[derive(Debug, Clone)]
pub enum Outcome {
    Exit(u32),
    Fail(i32),
}

struct Scripted {
    prefix: String,
    outcome: Outcome,
    used: Cell<bool>,
}

/// Behavior of the next captured-output launch.
pub struct Captured {
    pub exit_code: u32,
    pub stdout: Vec<u8>,
    pub pipe_available: bool,
}

impl Default for Captured {
    fn default() -> Self {
        Self {
            exit_code: 0,
            stdout: b"1000\n".to_vec(),
            pipe_available: true,
        }
    }
}

pub struct MockSubsystem {
    pub calls: RefCell<Vec<Call>>,
    registered: Cell<bool>,
    register_error: RefCell<Option<LauncherError>>,
    unregister_error: RefCell<Option<LauncherError>>,
    configure_error: RefCell<Option<LauncherError>>,
    scripted: RefCell<Vec<Scripted>>,
    pub captured: RefCell<Captured>,
}

impl MockSubsystem {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            registered: Cell::new(false),
            register_error: RefCell::new(None),
            unregister_error: RefCell::new(None),
            configure_error: RefCell::new(None),
            scripted: RefCell::new(Vec::new()),
            captured: RefCell::new(Captured::default()),
        }
    }

    pub fn registered(self, value: bool) -> Self {
        self.registered.set(value);
        self
    }

    pub fn fail_register(self, err: LauncherError) -> Self {
        *self.register_error.borrow_mut() = Some(err);
        self
    }

    pub fn fail_unregister(self, err: LauncherError) -> Self {
        *self.unregister_error.borrow_mut() = Some(err);
        self
    }

    pub fn fail_configure(self, err: LauncherError) -> Self {
        *self.configure_error.borrow_mut() = Some(err);
        self
    }

    /// Script the outcome of the next interactive command starting with
    /// `prefix`. Entries are consumed in order; unscripted commands exit 0.
    pub fn on_interactive(self, prefix: &str, outcome: Outcome) -> Self {
        self.scripted.borrow_mut().push(Scripted {
            prefix: prefix.to_string(),
            outcome,
            used: Cell::new(false),
        });
        self
    }

    pub fn is_registered_now(&self) -> bool {
        self.registered.get()
    }

    /// Commands of recorded interactive launches, in order.
    pub fn interactive_commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::LaunchInteractive { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count_interactive(&self, prefix: &str) -> usize {
        self.interactive_commands()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn configure_calls(&self) -> Vec<(u32, DistributionFlags)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Configure { uid, flags } => Some((*uid, *flags)),
                _ => None,
            })
            .collect()
    }

    fn scripted_outcome(&self, command: &str) -> Option<Outcome> {
        let scripted = self.scripted.borrow();
        for entry in scripted.iter() {
            if !entry.used.get() && command.starts_with(entry.prefix.as_str()) {
                entry.used.set(true);
                return Some(entry.outcome.clone());
            }
        }
        None
    }
}

impl Subsystem for MockSubsystem {
    fn is_optional_component_installed(&self) -> bool {
        true
    }

    fn is_distribution_registered(&self, _name: &str) -> bool {
        self.registered.get()
    }

    fn register_distribution(&self, name: &str, image: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Register {
            name: name.to_string(),
            image: image.to_string(),
        });
        if let Some(err) = self.register_error.borrow_mut().take() {
            return Err(err);
        }
        self.registered.set(true);
        Ok(())
    }

    fn unregister_distribution(&self, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Unregister {
            name: name.to_string(),
        });
        if let Some(err) = self.unregister_error.borrow_mut().take() {
            return Err(err);
        }
        self.registered.set(false);
        Ok(())
    }

    fn configure_distribution(
        &self,
        _name: &str,
        uid: u32,
        flags: DistributionFlags,
    ) -> Result<()> {
        self.calls.borrow_mut().push(Call::Configure { uid, flags });
        if let Some(err) = self.configure_error.borrow_mut().take() {
            return Err(err);
        }
        Ok(())
    }

    fn launch_interactive(&self, _name: &str, command: &str, use_cwd: bool) -> Result<u32> {
        self.calls.borrow_mut().push(Call::LaunchInteractive {
            command: command.to_string(),
            use_cwd,
        });
        match self.scripted_outcome(command) {
            Some(Outcome::Exit(code)) => Ok(code),
            Some(Outcome::Fail(code)) => Err(LauncherError::launch(command, code)),
            None => Ok(0),
        }
    }

    fn launch(
        &self,
        _name: &str,
        command: &str,
        use_cwd: bool,
        _routing: StdioRouting,
    ) -> Result<Box<dyn GuestProcess>> {
        self.calls.borrow_mut().push(Call::Launch {
            command: command.to_string(),
            use_cwd,
        });
        let captured = self.captured.borrow();
        Ok(Box::new(MockProcess {
            exit_code: captured.exit_code,
            stdout: captured.stdout.clone(),
            pipe_available: captured.pipe_available,
            offset: 0,
        }))
    }
}

struct MockProcess {
    exit_code: u32,
    stdout: Vec<u8>,
    pipe_available: bool,
    offset: usize,
}

impl GuestProcess for MockProcess {
    fn wait(&mut self) -> Result<u32> {
        Ok(self.exit_code)
    }

    fn read_stdout(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = &self.stdout[self.offset.min(self.stdout.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.offset += n;
        Ok(n)
    }

    fn stdout_captured(&self) -> bool {
        self.pipe_available
    }
}
