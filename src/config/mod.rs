//! Read-only connection settings keyed by section and key.
//!
//! The backing file (`~/.drackvmrc`) is INI: one `[defaults]` section plus
//! one section per host. A missing file is a normal first-run state and
//! behaves exactly like an empty store.
pub mod ini;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Name of the section consulted after a host's own section.
pub const DEFAULTS_SECTION: &str = "defaults";

/// File name of the per-user config file in the home directory.
pub const CONFIG_FILE_NAME: &str = ".drackvmrc";

/// Lookup interface used by the resolver.
///
/// Implemented by [`ConfigStore`]; tests substitute a mock to observe which
/// lookups happen.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource {
    /// Return the string value of `key` in `section`, if present.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Return the value of `key` in `section` parsed as an integer.
    ///
    /// A value that does not parse is treated as absent.
    fn get_int(&self, section: &str, key: &str) -> Option<i32>;
}

/// In-memory config store built from parsed INI sections.
///
/// Later duplicates of a section or key override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    sections: HashMap<String, HashMap<String, String>>,
}

impl ConfigStore {
    /// A store with no sections. Every lookup returns `None`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from already-parsed sections.
    #[must_use]
    pub fn from_sections(sections: Vec<ini::KvSection>) -> Self {
        let mut map: HashMap<String, HashMap<String, String>> = HashMap::new();
        for section in sections {
            map.entry(section.header)
                .or_default()
                .extend(section.entries);
        }
        Self { sections: map }
    }

    /// Parse a store from INI text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid INI.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_sections(ini::parse_kv_sections_from_str(content)?))
    }

    /// Load a store from `path`; a missing or unreadable file yields an empty
    /// store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file was read but is not valid INI.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let sections = ini::parse_kv_sections(path)?;
        if sections.is_empty() {
            tracing::debug!("no config sections loaded from {}", path.display());
        } else {
            tracing::debug!(
                "loaded {} config sections from {}",
                sections.len(),
                path.display()
            );
        }
        Ok(Self::from_sections(sections))
    }

    /// Whether `section` exists in the store.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }
}

impl ConfigSource for ConfigStore {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn get_int(&self, section: &str, key: &str) -> Option<i32> {
        let raw = self.get_string(section, key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring non-integer value '{raw}' for [{section}].{key}");
                None
            }
        }
    }
}

/// Default config file path: `~/.drackvmrc`.
///
/// Returns `None` when the home directory cannot be determined.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}
