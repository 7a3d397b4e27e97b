//! Distribution lifecycle manager.
//!
//! Owns the install/uninstall workflow and the interactive launch
//! pass-through. Registration state is observed from the subsystem on every
//! query, never cached: another tool instance can change it out-of-band.

use crate::console;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::runner::GuestRunner;
use crate::subsystem::Subsystem;
use std::io::{BufRead, Write};
use tracing::info;

/// The name of the distribution. This is the persistent key for every
/// subsystem operation and is displayed to the user by host tooling. It must
/// match `^[A-Za-z0-9._-]+$`.
///
/// WARNING: This value must not change between versions of the launcher,
/// otherwise users upgrading from older versions will see launch failures.
pub const DISTRIBUTION_NAME: &str = "Gentoo";

/// Root filesystem archive the distribution is registered from, shipped
/// alongside the launcher binary.
pub const ROOTFS_IMAGE: &str = "rootfs.tar.gz";

/// Input cap for the username prompt; excess input is discarded.
pub const MAX_USERNAME_LEN: usize = 32;

/// One installed (or installable) distribution.
pub struct Distribution<'a, S: Subsystem> {
    subsystem: &'a S,
    name: &'a str,
    runner: GuestRunner<'a, S>,
    resolver: IdentityResolver<'a, S>,
}

impl<'a, S: Subsystem> Distribution<'a, S> {
    pub fn new(subsystem: &'a S, name: &'a str) -> Self {
        Self {
            subsystem,
            name,
            runner: GuestRunner::new(subsystem, name),
            resolver: IdentityResolver::new(subsystem, name),
        }
    }

    /// Point-in-time registration query.
    pub fn is_registered(&self) -> bool {
        self.subsystem.is_distribution_registered(self.name)
    }

    /// Register the distribution and provision its default user.
    ///
    /// Steps run in order, each depending on the previous: register the
    /// rootfs image, reset the guest resolver config (best-effort), then
    /// optionally create a user account and make it the default. A successful
    /// registration is not reverted when a later step fails; the error
    /// propagates and the distribution stays registered.
    ///
    /// `input` feeds the username prompt; the prompt loops until
    /// [`IdentityResolver::create_user`] succeeds, and an empty or cancelled
    /// entry is simply another failed attempt.
    pub fn install(&self, create_user: bool, input: &mut impl BufRead) -> Result<()> {
        println!("Installing, this may take a few minutes...");
        self.subsystem
            .register_distribution(self.name, ROOTFS_IMAGE)?;
        info!(distribution = self.name, "registered distribution");

        // Delete /etc/resolv.conf to allow the subsystem to generate a
        // version based on host networking information.
        self.runner.run_unchecked("/bin/rm /etc/resolv.conf", true);

        if create_user {
            println!("Please create a default UNIX user account. The username does not need to match your host username.");
            println!("For more information visit: https://aka.ms/wslusers");
            let username = loop {
                print!("Enter new UNIX username: ");
                std::io::stdout().flush()?;
                let candidate = console::read_bounded_line(input, MAX_USERNAME_LEN)?;
                if self.resolver.create_user(&candidate) {
                    break candidate;
                }
            };

            // Set this user account as the default.
            self.resolver.set_default_user(&username)?;
        }

        Ok(())
    }

    /// Unregister the distribution, removing all of its guest state.
    pub fn uninstall(&self) -> Result<()> {
        self.subsystem.unregister_distribution(self.name)?;
        info!(distribution = self.name, "unregistered distribution");
        Ok(())
    }

    /// Run `command` interactively; an empty command launches the default
    /// shell. Returns the guest exit code.
    pub fn launch_interactive(&self, command: &str, use_cwd: bool) -> Result<u32> {
        self.runner.run_interactive(command, use_cwd)
    }

    /// Configure `name` as the default user for interactive launches.
    pub fn set_default_user(&self, name: &str) -> Result<()> {
        self.resolver.set_default_user(name)
    }
}
