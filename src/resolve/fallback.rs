//! Ordered first-hit-wins lookup over lazily evaluated providers.
use std::fmt;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A command-line flag.
    Cli,
    /// The interactive password prompt.
    Prompt,
    /// The host's own config section.
    HostSection,
    /// The `[defaults]` config section.
    DefaultsSection,
    /// The vendor's factory default.
    VendorDefault,
    /// A fixed value built into the launcher.
    Builtin,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "command line"),
            Self::Prompt => write!(f, "prompt"),
            Self::HostSection => write!(f, "host section"),
            Self::DefaultsSection => write!(f, "defaults section"),
            Self::VendorDefault => write!(f, "vendor default"),
            Self::Builtin => write!(f, "built-in default"),
        }
    }
}

/// A value together with the source that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The winning value.
    pub value: T,
    /// Which provider supplied it.
    pub source: Source,
}

type Provider<'a, T> = Box<dyn FnOnce() -> Option<T> + 'a>;

/// Ordered chain of optional-value providers.
///
/// Providers run in insertion order and evaluation stops at the first one
/// that yields `Some`, so later providers have no side effects when an
/// earlier one wins.
///
/// ```
/// use drac_kvm::resolve::fallback::{Fallback, Source};
///
/// let username = Fallback::new()
///     .or(Source::Cli, || None)
///     .or(Source::HostSection, || Some("admin".to_string()))
///     .or(Source::DefaultsSection, || unreachable!())
///     .resolve_or(Source::VendorDefault, "root".to_string());
///
/// assert_eq!(username.value, "admin");
/// assert_eq!(username.source, Source::HostSection);
/// ```
pub struct Fallback<'a, T> {
    providers: Vec<(Source, Provider<'a, T>)>,
}

impl<T> fmt::Debug for Fallback<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<Source> = self.providers.iter().map(|(s, _)| *s).collect();
        f.debug_struct("Fallback").field("sources", &sources).finish()
    }
}

impl<T> Default for Fallback<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> Fallback<'a, T> {
    /// An empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append a provider.
    #[must_use]
    pub fn or(mut self, source: Source, provider: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.providers.push((source, Box::new(provider)));
        self
    }

    /// Run providers in order and return the first hit.
    pub fn resolve(self) -> Option<Resolved<T>> {
        self.providers
            .into_iter()
            .find_map(|(source, provider)| provider().map(|value| Resolved { value, source }))
    }

    /// Like [`resolve`](Self::resolve), with a final value that always hits.
    pub fn resolve_or(self, source: Source, value: T) -> Resolved<T> {
        self.resolve().unwrap_or(Resolved { value, source })
    }
}
