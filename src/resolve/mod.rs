//! Connection profile resolution.
//!
//! Each field is resolved independently through its own [`Fallback`] chain,
//! so a value given on the command line never stops another field from
//! falling through to the config file:
//!
//! | field    | order                                                            |
//! |----------|------------------------------------------------------------------|
//! | host     | `--host` (required), optionally renamed by `[host].host`          |
//! | vendor   | `--vendor` if not the default, `[host].vendor`, `dell`            |
//! | username | `--username`, `[host]`, `[defaults]`, vendor default              |
//! | password | prompt if `--password`, else `[host]`, `[defaults]`, vendor default |
//! | version  | only if the vendor needs one: `--version`, `[host]`, `[defaults]` |
pub mod fallback;
pub mod prompt;

use std::fmt;

use crate::config::{ConfigSource, DEFAULTS_SECTION};
use crate::error::ResolveError;
use crate::vendor::{DEFAULT_VENDOR, VendorRegistry};

use fallback::{Fallback, Resolved, Source};
pub use prompt::{PasswordPrompt, TerminalPrompt};

/// `--version` value meaning "not given".
pub const VERSION_UNSET: i32 = -1;

/// Raw connection input from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliInput {
    /// Host name or address; also the config section to consult.
    pub host: String,
    /// Vendor id; [`DEFAULT_VENDOR`] counts as "not given".
    pub vendor: String,
    /// Username; empty counts as "not given".
    pub username: String,
    /// Whether to prompt for the password.
    pub prompt_password: bool,
    /// Version selector; [`VERSION_UNSET`] counts as "not given".
    pub version: i32,
}

impl Default for CliInput {
    fn default() -> Self {
        Self {
            host: String::new(),
            vendor: DEFAULT_VENDOR.to_string(),
            username: String::new(),
            prompt_password: false,
            version: VERSION_UNSET,
        }
    }
}

/// Fully resolved connection parameters for one launch.
#[derive(Clone, PartialEq, Eq)]
pub struct Profile {
    /// Address the console connects to.
    pub host: String,
    /// Registered vendor id.
    pub vendor: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Version selector; `None` when unset or not used by the vendor.
    pub version: Option<i32>,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("host", &self.host)
            .field("vendor", &self.vendor)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}

/// Resolve a [`Profile`] from command-line input and configuration.
///
/// # Errors
///
/// - [`ResolveError::MissingHost`] if `cli.host` is empty; nothing else is
///   looked up in that case.
/// - [`ResolveError::UnknownVendor`] if the resolved vendor is not registered.
/// - [`ResolveError::Prompt`] if the password prompt fails.
pub fn resolve(
    cli: &CliInput,
    config: &dyn ConfigSource,
    registry: &VendorRegistry,
    prompt: &dyn PasswordPrompt,
) -> Result<Profile, ResolveError> {
    if cli.host.is_empty() {
        return Err(ResolveError::MissingHost);
    }
    let section = cli.host.as_str();

    let host = Fallback::new()
        .or(Source::HostSection, || configured(config, section, "host"))
        .resolve_or(Source::Cli, cli.host.clone());
    trace_source("host", &host);

    let vendor = Fallback::new()
        .or(Source::Cli, || {
            (!cli.vendor.is_empty() && cli.vendor != DEFAULT_VENDOR).then(|| cli.vendor.clone())
        })
        .or(Source::HostSection, || config.get_string(section, "vendor"))
        .resolve_or(Source::Builtin, DEFAULT_VENDOR.to_string());
    trace_source("vendor", &vendor);

    let descriptor = registry
        .lookup(&vendor.value)
        .map_err(|_| ResolveError::UnknownVendor {
            vendor: vendor.value.clone(),
            available: registry.ids().join(", "),
        })?;

    let username = Fallback::new()
        .or(Source::Cli, || {
            (!cli.username.is_empty()).then(|| cli.username.clone())
        })
        .or(Source::HostSection, || configured(config, section, "username"))
        .or(Source::DefaultsSection, || {
            configured(config, DEFAULTS_SECTION, "username")
        })
        .resolve_or(
            Source::VendorDefault,
            descriptor.default_username.to_string(),
        );
    trace_source("username", &username);

    let password = if cli.prompt_password {
        Resolved {
            value: prompt.read_password().map_err(ResolveError::Prompt)?,
            source: Source::Prompt,
        }
    } else {
        Fallback::new()
            .or(Source::HostSection, || configured(config, section, "password"))
            .or(Source::DefaultsSection, || {
                configured(config, DEFAULTS_SECTION, "password")
            })
            .resolve_or(
                Source::VendorDefault,
                descriptor.default_password.to_string(),
            )
    };
    tracing::debug!("password: from {}", password.source);

    let version = if descriptor.requires_version {
        let version = Fallback::new()
            .or(Source::Cli, || {
                (cli.version != VERSION_UNSET).then_some(cli.version)
            })
            .or(Source::HostSection, || config.get_int(section, "version"))
            .or(Source::DefaultsSection, || {
                config.get_int(DEFAULTS_SECTION, "version")
            })
            .resolve();
        match &version {
            Some(v) => trace_source("version", v),
            None => tracing::debug!("version: unset"),
        }
        version.map(|v| v.value)
    } else {
        tracing::debug!("version: not used by {}", descriptor.id);
        None
    };

    Ok(Profile {
        host: host.value,
        vendor: vendor.value,
        username: username.value,
        password: password.value,
        version,
    })
}

/// A config string, treating an empty value as unset.
fn configured(config: &dyn ConfigSource, section: &str, key: &str) -> Option<String> {
    config.get_string(section, key).filter(|v| !v.is_empty())
}

fn trace_source<T: fmt::Display>(field: &str, resolved: &Resolved<T>) {
    tracing::debug!("{field}: {} (from {})", resolved.value, resolved.source);
}
