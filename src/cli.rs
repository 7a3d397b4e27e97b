//! Command grammar and dispatch.
//!
//! The launcher recognizes a small fixed set of subcommands. Anything it does
//! not recognize prints the usage text and exits 0; only a malformed `config`
//! invocation is treated as an error. Dispatch is separated from `main` and
//! returns the process exit code so scenario tests can drive it end to end
//! with a fake subsystem.

use crate::error::{LauncherError, Result};
use crate::lifecycle::{Distribution, DISTRIBUTION_NAME};
use crate::subsystem::Subsystem;
use clap::{Parser, Subcommand};
use std::io::BufRead;

/// Fixed usage text for unrecognized input.
pub const USAGE: &str = "\
Launches or configures a Linux distribution.

Usage:
    <no args>
        Launches the distribution's default shell.
    install [--root]
        Installs the distribution. --root skips creating a user account.
    run <command line>
    -c <command line>
        Runs the given command line in the distribution, using the current
        working directory.
    config --default-user <username>
        Sets the default user to <username>.
    uninstall
        Uninstalls the distribution, removing all of its data.";

/// WSL distribution launcher
#[derive(Parser)]
#[command(name = "wsl-launcher")]
#[command(about = "Installs, configures, and runs a Linux distribution under WSL")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install the distribution
    Install {
        /// Do not create a user account; keep root as the default user
        #[arg(long)]
        root: bool,
    },
    /// Run a command line inside the distribution
    Run {
        /// Command words, re-joined with single spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Configure the distribution
    Config {
        /// Username to set as the default user
        #[arg(long = "default-user")]
        default_user: String,
    },
    /// Uninstall the distribution, removing all of its data
    Uninstall,
}

/// Join command words into the single guest command string.
///
/// Every word gets a leading space, matching the original launcher's
/// concatenation starting at argument index 1: `["-la", "/tmp"]` becomes
/// `" -la /tmp"`. An empty word list yields the empty command (default
/// shell).
pub fn join_words(words: &[String]) -> String {
    words.iter().map(|w| format!(" {w}")).collect()
}

/// Parse raw process arguments, treating a leading `-c` as `run`.
fn parse(args: &[String]) -> std::result::Result<Cli, clap::Error> {
    let mut normalized: Vec<&str> = args.iter().map(String::as_str).collect();
    if normalized.first() == Some(&"-c") {
        normalized[0] = "run";
    }
    Cli::try_parse_from(std::iter::once("wsl-launcher").chain(normalized))
}

/// Process one invocation against the given subsystem.
///
/// Returns the exit code for the process: the guest command's own code for
/// interactive launches, 0 otherwise. Errors propagate to the caller for
/// message mapping.
///
/// The distribution is installed first if it is not registered yet,
/// regardless of the subcommand; `install --root` suppresses user creation.
pub fn dispatch<S: Subsystem>(
    args: &[String],
    subsystem: &S,
    input: &mut impl BufRead,
) -> Result<i32> {
    let distro = Distribution::new(subsystem, DISTRIBUTION_NAME);

    // Install the distribution if it is not already.
    let install_only = args.first().map(String::as_str) == Some("install");
    if !distro.is_registered() {
        // If the "--root" option is specified, do not create a user account.
        let use_root =
            install_only && args.get(1).map(String::as_str) == Some("--root");
        distro.install(!use_root, input)?;
        println!("Installation successful!");
        if install_only {
            return Ok(0);
        }
    }

    let cli = match parse(args) {
        Ok(cli) => cli,
        Err(_) if args.first().map(String::as_str) == Some("config") => {
            return Err(LauncherError::invalid_argument(
                "config requires --default-user <username>",
            ));
        }
        Err(_) => {
            println!("{USAGE}");
            return Ok(0);
        }
    };

    match cli.command {
        None => {
            let exit_code = distro.launch_interactive("", false)?;
            Ok(exit_code as i32)
        }
        Some(Commands::Run { words }) => {
            let command = join_words(&words);
            let exit_code = distro.launch_interactive(&command, true)?;
            Ok(exit_code as i32)
        }
        Some(Commands::Config { default_user }) => {
            distro.set_default_user(&default_user)?;
            Ok(0)
        }
        Some(Commands::Uninstall) => {
            distro.uninstall()?;
            Ok(0)
        }
        // Reachable only when the distribution was already registered.
        Some(Commands::Install { .. }) => {
            println!("{USAGE}");
            Ok(0)
        }
    }
}

/// User-facing message for a failed invocation.
///
/// Pure function from error kind and payload to text; the core never needs
/// to know message text exists.
pub fn user_message(err: &LauncherError) -> String {
    match err {
        LauncherError::AlreadyRegistered => {
            "The distribution is already installed.".to_string()
        }
        LauncherError::FeatureUnavailable | LauncherError::SubsystemNotPresent => {
            "The Windows Subsystem for Linux optional component is not installed.\n\
             Please enable it and try again. See https://aka.ms/wslinstall for details."
                .to_string()
        }
        LauncherError::InvalidArgument(detail) => format!("Invalid argument: {detail}"),
        other => match other.code() {
            Some(code) => format!("Error: {other} (0x{code:x})"),
            None => format!("Error: {other}"),
        },
    }
}
