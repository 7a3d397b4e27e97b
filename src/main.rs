//! WSL distribution launcher - main entry point

use std::io;
use std::process::ExitCode;

use wsl_launcher::subsystem::{Subsystem, WslCli};
use wsl_launcher::{cli, console, LauncherError};

/// Initialize the logger with appropriate settings
fn init_logger() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let subsystem = match WslCli::from_current_dir() {
        Ok(subsystem) => subsystem,
        Err(e) => {
            eprintln!("{}", cli::user_message(&LauncherError::Io(e)));
            return ExitCode::from(1);
        }
    };

    // Ensure that the optional component is installed before anything else.
    if !subsystem.is_optional_component_installed() {
        eprintln!("{}", cli::user_message(&LauncherError::FeatureUnavailable));
        // Invoked by double-click: keep the console open until a keypress.
        if args.is_empty() {
            console::wait_for_keypress(&mut io::stdin().lock());
        }
        return ExitCode::from(1);
    }

    let result = {
        let mut input = io::stdin().lock();
        cli::dispatch(&args, &subsystem, &mut input)
    };

    match result {
        Ok(exit_code) => ExitCode::from(exit_code.clamp(0, 255) as u8),
        Err(e) => {
            eprintln!("{}", cli::user_message(&e));
            if args.is_empty() {
                console::wait_for_keypress(&mut io::stdin().lock());
            }
            ExitCode::from(1)
        }
    }
}
