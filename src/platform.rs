//! Operating-system specifics for locating the viewer.
use std::fmt;
use std::path::PathBuf;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux and other Unix-likes without a dedicated entry.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl Os {
    /// Detect the current operating system.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Conventional install location of `javaws`.
    #[must_use]
    pub fn default_javaws_path(self) -> PathBuf {
        match self {
            Self::Linux | Self::MacOs => PathBuf::from("/usr/bin/javaws"),
            Self::Windows => PathBuf::from(r"C:\Program Files\Java\jre\bin\javaws.exe"),
        }
    }
}

/// Platform default for `javaws`, or the first `javaws` on `PATH` when the
/// conventional location is empty.
#[must_use]
pub fn default_javaws() -> PathBuf {
    let conventional = Os::detect().default_javaws_path();
    if conventional.exists() {
        return conventional;
    }
    which::which("javaws").unwrap_or(conventional)
}
