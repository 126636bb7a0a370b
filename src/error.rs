//! Domain-specific error types for the KVM launcher.
//!
//! Core modules return typed errors (e.g., [`ResolveError`], [`RenderError`])
//! while the command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! KvmError
//! ├── Config(ConfigError)     : malformed config file
//! ├── Vendor(VendorError)     : registry lookups
//! ├── Resolve(ResolveError)   : missing host, unknown vendor, prompt failure
//! ├── Render(RenderError)     : no template variant for vendor/version
//! └── Launch(LaunchError)     : javaws discovery and process failures
//! ```
//!
//! A missing or unreadable config file is absent from this list: it behaves
//! as an empty store.

use thiserror::Error;

/// Top-level error type for the launcher.
#[derive(Error, Debug)]
pub enum KvmError {
    /// Configuration file syntax error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vendor registry error.
    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// Connection parameter resolution error.
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Descriptor rendering error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Viewer launch error.
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),
}

/// Errors that arise from loading the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The INI file contains a syntax error that prevents parsing.
    #[error("Invalid INI syntax in {file} at line {line}: {message}")]
    InvalidSyntax {
        /// File (or `<string>`) being parsed.
        file: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
}

/// Errors that arise from vendor registry lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendorError {
    /// The vendor id is not registered.
    #[error("Unknown vendor '{vendor}' (supported: {available})")]
    NotFound {
        /// The id that was looked up.
        vendor: String,
        /// Comma-separated list of registered ids.
        available: String,
    },
}

/// Fatal input errors raised while resolving a connection profile.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No host was given on the command line.
    #[error("Host parameter is required (--host)")]
    MissingHost,

    /// The resolved vendor is not in the registry.
    #[error(
        "Provided vendor '{vendor}' is not supported (supported: {available}); consider adding support"
    )]
    UnknownVendor {
        /// The vendor id after precedence was applied.
        vendor: String,
        /// Comma-separated list of registered ids.
        available: String,
    },

    /// The interactive password prompt could not be read.
    #[error("Failed to read password: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Errors that arise while rendering a launch descriptor.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No template variant exists for the vendor/version combination.
    #[error("No descriptor template for vendor '{vendor}' version {version}")]
    UnsupportedVersion {
        /// Vendor id.
        vendor: String,
        /// Version attempted (`-1` when unset).
        version: i32,
    },

    /// The template engine failed to render.
    #[error("Failed to render {vendor} descriptor: {source}")]
    Template {
        /// Vendor id.
        vendor: String,
        /// Underlying template error.
        source: askama::Error,
    },
}

/// Errors that arise while handing the descriptor to the viewer.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The javaws binary does not exist at the resolved path.
    #[error("No javaws binary found at {0}")]
    JavawsNotFound(String),

    /// Running javaws without arguments to read its flags failed.
    #[error("javaws at {path} did not print its usage: {reason}")]
    Usage {
        /// javaws path.
        path: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The descriptor could not be written to a temporary file.
    #[error("Failed to write descriptor file: {0}")]
    WriteDescriptor(#[source] std::io::Error),

    /// javaws could not be started or exited unsuccessfully.
    #[error("Unable to launch console from {file}: {reason}")]
    ViewerFailed {
        /// Descriptor file handed to javaws.
        file: String,
        /// Human-readable failure reason.
        reason: String,
    },
}
