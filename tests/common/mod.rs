// Shared helpers for integration tests.
//
// Provides a temporary directory standing in for the user's home, with an
// optional `.drackvmrc` and a fake `javaws`, plus helpers for parsing CLI
// arguments the way the binary does.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};

use clap::FromArgMatches as _;
use drac_kvm::cli::Cli;
use drac_kvm::config::{CONFIG_FILE_NAME, ConfigStore};
use drac_kvm::resolve::PasswordPrompt;
use drac_kvm::vendor::VendorRegistry;

/// An isolated home directory backed by a [`tempfile::TempDir`].
pub struct TestHome {
    /// Temporary directory removed on drop.
    pub root: tempfile::TempDir,
}

impl TestHome {
    /// Path to `.drackvmrc` inside the home (it may not exist).
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join(CONFIG_FILE_NAME)
    }

    /// Load the home's config file the way the launch command does.
    pub fn load_config(&self) -> ConfigStore {
        ConfigStore::load(&self.config_path()).expect("load config")
    }

    /// Path of the fake `javaws` script.
    pub fn javaws_path(&self) -> PathBuf {
        self.root.path().join("javaws")
    }

    /// Arguments recorded by the fake `javaws` on its last launch.
    pub fn recorded_args(&self) -> String {
        std::fs::read_to_string(self.root.path().join("javaws-args.txt"))
            .expect("fake javaws should have recorded its arguments")
    }

    /// Descriptor content captured by the fake `javaws`.
    pub fn recorded_descriptor(&self) -> String {
        std::fs::read_to_string(self.root.path().join("javaws-descriptor.jnlp"))
            .expect("fake javaws should have captured the descriptor")
    }
}

/// Fluent builder for [`TestHome`].
pub struct TestHomeBuilder {
    home: TestHome,
}

impl TestHomeBuilder {
    /// Begin building an empty home.
    pub fn new() -> Self {
        Self {
            home: TestHome {
                root: tempfile::tempdir().expect("create temp dir"),
            },
        }
    }

    /// Write `content` to `.drackvmrc`.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.home.config_path(), content).expect("write .drackvmrc");
        self
    }

    /// Install a fake `javaws` that prints usage and exits 255 when run
    /// without arguments; otherwise records its arguments and a copy of the
    /// descriptor (the first argument ending in `.jnlp`) and exits with
    /// `launch_exit`.
    #[cfg(unix)]
    pub fn with_fake_javaws(self, launch_exit: i32) -> Self {
        use std::os::unix::fs::PermissionsExt as _;
        let dir = self.home.root.path();
        let script = format!(
            "#!/bin/sh\n\
             if [ $# -eq 0 ]; then echo 'usage: javaws <file>'; exit 255; fi\n\
             echo \"$@\" > '{args}'\n\
             for a in \"$@\"; do case \"$a\" in *.jnlp) cp \"$a\" '{copy}';; esac; done\n\
             exit {launch_exit}\n",
            args = dir.join("javaws-args.txt").display(),
            copy = dir.join("javaws-descriptor.jnlp").display(),
        );
        let path = self.home.javaws_path();
        std::fs::write(&path, script).expect("write fake javaws");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod fake javaws");
        self
    }

    /// Finish building and return the home.
    pub fn build(self) -> TestHome {
        self.home
    }
}

/// Parse `args` (without the program name) into a [`Cli`].
pub fn cli(args: &[&str]) -> Cli {
    let matches = Cli::command_for(&VendorRegistry::builtin())
        .try_get_matches_from(std::iter::once("drac-kvm").chain(args.iter().copied()))
        .expect("arguments should parse");
    Cli::from_arg_matches(&matches).expect("matches should convert")
}

/// A prompt that always answers with a fixed password.
pub struct FixedPrompt(pub &'static str);

impl PasswordPrompt for FixedPrompt {
    fn read_password(&self) -> io::Result<String> {
        Ok(self.0.to_string())
    }
}

/// A prompt that fails if it is ever consulted.
pub struct NoPrompt;

impl PasswordPrompt for NoPrompt {
    fn read_password(&self) -> io::Result<String> {
        Err(io::Error::other("password prompt should not be used"))
    }
}

/// Byte offset of `needle` in `haystack`, failing the test when absent.
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle} not found in:\n{haystack}"))
}

/// Whether `path` still exists.
pub fn exists(path: &str) -> bool {
    Path::new(path).exists()
}
