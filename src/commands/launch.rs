use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::{self, ConfigSource, ConfigStore};
use crate::descriptor::{self, Descriptor};
use crate::error::{KvmError, ResolveError};
use crate::launcher::{self, LaunchOptions};
use crate::logging::Logger;
use crate::resolve::{self, PasswordPrompt, Profile, TerminalPrompt};
use crate::vendor::VendorRegistry;

/// Run the launch command against `~/.drackvmrc` with a terminal prompt.
///
/// # Errors
///
/// Returns an error if the config file is broken, the profile cannot be
/// resolved, no descriptor matches it, or the viewer fails to start.
pub fn run(cli: &Cli, registry: &VendorRegistry, log: &Logger) -> Result<()> {
    let config_path = config::default_path();
    if config_path.is_none() {
        log.warn("home directory not found; using built-in defaults only");
    }
    execute(
        cli,
        config_path.as_deref(),
        registry,
        &TerminalPrompt::default(),
        log,
    )
}

/// Load config, resolve, render, and launch.
///
/// A missing host fails before the config file or `javaws` is looked at.
/// `config_path` of `None` behaves like a missing file.
///
/// # Errors
///
/// See [`run`].
pub fn execute(
    cli: &Cli,
    config_path: Option<&Path>,
    registry: &VendorRegistry,
    prompt: &dyn PasswordPrompt,
    log: &Logger,
) -> Result<()> {
    let version = option_env!("DRAC_KVM_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("drac-kvm {version}"));

    if cli.host.as_deref().is_none_or(str::is_empty) {
        return Err(KvmError::from(ResolveError::MissingHost).into());
    }

    log.stage("Loading configuration");
    let config = match config_path {
        Some(path) => ConfigStore::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigStore::empty(),
    };

    let javaws = launcher::javaws_path(&config, cli.javaws.as_deref());
    log.debug(&format!("javaws: {}", javaws.display()));
    launcher::ensure_javaws(&javaws)?;

    log.stage("Resolving connection profile");
    let (profile, descriptor) = prepare(cli, &config, registry, prompt)?;
    log.info(&format!(
        "{} ({}) as {}",
        profile.host, profile.vendor, profile.username
    ));
    if let Some(v) = profile.version {
        log.info(&format!("version {v}"));
    }

    log.stage("Launching console");
    let options = LaunchOptions {
        javaws,
        delay: Duration::from_secs(cli.delay),
        wait: cli.wait,
        keep_jnlp: cli.keep_jnlp,
    };
    launcher::launch(&descriptor, &options)?;
    Ok(())
}

/// Resolve the connection profile and render its descriptor.
///
/// # Errors
///
/// Returns [`KvmError::Resolve`] if the profile cannot be resolved,
/// [`KvmError::Vendor`] if its vendor is not registered, and
/// [`KvmError::Render`] if no descriptor matches it.
pub fn prepare(
    cli: &Cli,
    config: &dyn ConfigSource,
    registry: &VendorRegistry,
    prompt: &dyn PasswordPrompt,
) -> Result<(Profile, Descriptor), KvmError> {
    let profile = resolve::resolve(&cli.connection(), config, registry, prompt)?;
    let vendor = registry.lookup(&profile.vendor)?;
    let descriptor = descriptor::generate(&profile, vendor, &cli.extra)?;
    Ok((profile, descriptor))
}
