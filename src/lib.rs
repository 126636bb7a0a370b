//! Remote KVM console launcher.
//!
//! Resolves connection parameters for a DRAC/iLO/IPMI-style management
//! controller from the command line, `~/.drackvmrc`, and vendor defaults,
//! renders a JNLP launch descriptor for the vendor's Java console, and hands
//! it to `javaws`.
//!
//! - **[`config`]**: INI settings keyed by host section
//! - **[`vendor`]**: the closed set of supported vendors and their defaults
//! - **[`resolve`]**: ordered fallback from CLI to config to vendor defaults
//! - **[`descriptor`]**: per-vendor JNLP templates
//! - **[`launcher`]**: temp file handling and the `javaws` invocation
//! - **[`commands`]**: orchestration of the above for the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod exec;
pub mod launcher;
pub mod logging;
pub mod platform;
pub mod resolve;
pub mod vendor;
