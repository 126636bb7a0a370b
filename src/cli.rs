use std::path::PathBuf;

use clap::{CommandFactory as _, FromArgMatches as _, Parser};

use crate::resolve::{CliInput, VERSION_UNSET};
use crate::vendor::{DEFAULT_VENDOR, VendorRegistry};

/// Command-line entry point for the KVM console launcher.
///
/// `-h` selects the host, so help is only available as `--help`; `-v`
/// selects the vendor version, so there is no `--version` flag for the
/// program itself (the banner above the help text shows it instead).
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "drac-kvm",
    about = "Launch a DRAC/iLO/IPMI KVM console through javaws",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// The DRAC host (or IP)
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// The KVM vendor
    #[arg(short = 'V', long, default_value = DEFAULT_VENDOR)]
    pub vendor: String,

    /// The KVM username
    #[arg(short, long, default_value = "")]
    pub username: String,

    /// Prompt for password (optional, will use default vendor if not present)
    #[arg(short, long)]
    pub password: bool,

    /// KVM vendor specific version
    #[arg(
        short = 'v',
        long,
        default_value_t = VERSION_UNSET,
        allow_negative_numbers = true
    )]
    pub version: i32,

    /// Number of seconds to delay for javaws to start up & read jnlp before deleting it
    #[arg(short, long, default_value_t = 10)]
    pub delay: u64,

    /// The path to javaws binary
    #[arg(short, long)]
    pub javaws: Option<PathBuf>,

    /// Wait for java console process end
    #[arg(short, long)]
    pub wait: bool,

    /// Keep JNLP files and do not clean them after failed start
    #[arg(short, long = "keep-jnlp")]
    pub keep_jnlp: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    pub help: Option<bool>,

    /// Extra arguments appended to the console's argument list
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl Cli {
    /// Build the clap command with vendor-specific help filled in from `registry`.
    #[must_use]
    pub fn command_for(registry: &VendorRegistry) -> clap::Command {
        let version = option_env!("DRAC_KVM_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        let vendors = registry.ids().join("/");
        let versions = registry.version_help();
        Self::command()
            .before_help(format!("drac-kvm version: {version}"))
            .mut_arg("vendor", |a| {
                a.help(format!("The KVM vendor, one of ({vendors})"))
            })
            .mut_arg("version", |a| {
                a.help(format!("KVM vendor specific version for {versions}"))
            })
    }

    /// Parse process arguments, exiting with usage on error.
    #[must_use]
    pub fn parse_for(registry: &VendorRegistry) -> Self {
        let matches = Self::command_for(registry).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Connection fields consumed by the resolver.
    #[must_use]
    pub fn connection(&self) -> CliInput {
        CliInput {
            host: self.host.clone().unwrap_or_default(),
            vendor: self.vendor.clone(),
            username: self.username.clone(),
            prompt_password: self.password,
            version: self.version,
        }
    }
}
