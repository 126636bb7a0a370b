//! Hand a rendered descriptor to `javaws`.
//!
//! The descriptor is written to a temporary `.jnlp` file, `javaws` usage text
//! is read once for the flags it understands, and then run on the file. The file is
//! removed after a short delay so the viewer has time to read it.
use std::ffi::OsStr;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::config::{ConfigSource, DEFAULTS_SECTION};
use crate::descriptor::Descriptor;
use crate::error::LaunchError;
use crate::exec;
use crate::platform;

/// Exit code `javaws` returns when run without arguments.
const USAGE_EXIT_CODE: i32 = 255;

/// Arguments that follow the descriptor path on every launch.
const TRAILING_ARGS: [&str; 3] = ["-nosecurity", "-noupdate", "-Xnofork"];

/// How to run the viewer.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// `javaws` binary.
    pub javaws: PathBuf,
    /// Time to wait after a successful launch before removing the file.
    pub delay: Duration,
    /// Ask `javaws` to block until the console exits.
    pub wait: bool,
    /// Keep the descriptor file when launching fails.
    pub keep_jnlp: bool,
}

/// Pick the `javaws` binary: `[defaults].javaws_path`, then `cli`, then the
/// platform default.
#[must_use]
pub fn javaws_path(config: &dyn ConfigSource, cli: Option<&Path>) -> PathBuf {
    if let Some(path) = config
        .get_string(DEFAULTS_SECTION, "javaws_path")
        .filter(|p| !p.is_empty())
    {
        return PathBuf::from(path);
    }
    cli.map_or_else(platform::default_javaws, Path::to_path_buf)
}

/// Fail unless `path` exists.
///
/// # Errors
///
/// Returns [`LaunchError::JavawsNotFound`] when nothing is at `path`.
pub fn ensure_javaws(path: &Path) -> Result<(), LaunchError> {
    if path.exists() {
        Ok(())
    } else {
        Err(LaunchError::JavawsNotFound(path.display().to_string()))
    }
}

/// Choose the flag that precedes the descriptor path from `javaws` usage
/// text. `-jnlp` wins over `-wait`; `-wait` is only used when requested.
#[must_use]
pub fn launch_flag(usage: &str, wait: bool) -> Option<&'static str> {
    if usage.contains("-jnlp") {
        Some("-jnlp")
    } else if wait && usage.contains("-wait") {
        Some("-wait")
    } else {
        None
    }
}

/// Run `javaws` without arguments and read its usage text.
fn detect_launch_flag(javaws: &Path, wait: bool) -> Result<Option<&'static str>, LaunchError> {
    let usage_error = |reason: String| LaunchError::Usage {
        path: javaws.display().to_string(),
        reason,
    };
    let result = exec::run_unchecked(javaws, std::iter::empty::<&str>())
        .map_err(|e| usage_error(format!("{e:#}")))?;
    if !result.success && result.code != Some(USAGE_EXIT_CODE) {
        return Err(usage_error(result.failure_reason()));
    }
    let usage = format!("{}{}", result.stdout, result.stderr);
    let argument = launch_flag(&usage, wait);
    tracing::debug!("javaws launch flag: {argument:?}");
    Ok(argument)
}

/// Write `descriptor` to a fresh temporary `.jnlp` file.
///
/// The file is removed when the returned handle is dropped.
///
/// # Errors
///
/// Returns [`LaunchError::WriteDescriptor`] if the file cannot be created or
/// written.
pub fn write_descriptor(descriptor: &Descriptor) -> Result<NamedTempFile, LaunchError> {
    let mut file = tempfile::Builder::new()
        .prefix("drac-kvm-")
        .suffix(".jnlp")
        .tempfile()
        .map_err(LaunchError::WriteDescriptor)?;
    file.write_all(descriptor.document.as_bytes())
        .and_then(|()| file.flush())
        .map_err(LaunchError::WriteDescriptor)?;
    Ok(file)
}

/// Launch the viewer on `descriptor` and wait out the configured delay.
///
/// # Errors
///
/// Returns a [`LaunchError`] if `javaws` is missing, does not print its usage, the
/// descriptor cannot be written, or the viewer exits unsuccessfully.
pub fn launch(descriptor: &Descriptor, options: &LaunchOptions) -> Result<(), LaunchError> {
    ensure_javaws(&options.javaws)?;
    let argument = detect_launch_flag(&options.javaws, options.wait)?;
    let file = write_descriptor(descriptor)?;

    tracing::info!("Launching KVM session with {}", file.path().display());
    let args = argument
        .into_iter()
        .map(OsStr::new)
        .chain(std::iter::once(file.path().as_os_str()))
        .chain(TRAILING_ARGS.into_iter().map(OsStr::new));

    let failure = match exec::run_unchecked(&options.javaws, args) {
        Ok(result) if result.success => None,
        Ok(result) => Some(result.failure_reason()),
        Err(e) => Some(format!("{e:#}")),
    };

    if let Some(reason) = failure {
        let path = file.path().display().to_string();
        if options.keep_jnlp
            && let Err(e) = file.keep()
        {
            tracing::warn!("could not keep {path}: {}", e.error);
        }
        return Err(LaunchError::ViewerFailed { file: path, reason });
    }

    tracing::debug!(
        "waiting {}s for javaws to read the descriptor",
        options.delay.as_secs()
    );
    thread::sleep(options.delay);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MockConfigSource;
    use crate::vendor::VendorKind;
    use mockall::predicate::eq;

    fn descriptor() -> Descriptor {
        Descriptor {
            document: "<jnlp/>".to_string(),
            kind: VendorKind::Hp,
            version: None,
            jar_version: None,
            native_lib_version: None,
        }
    }

    #[test]
    fn launch_flag_prefers_jnlp() {
        let usage = "usage: javaws [-wait] [-jnlp] <file>";
        assert_eq!(launch_flag(usage, true), Some("-jnlp"));
        assert_eq!(launch_flag(usage, false), Some("-jnlp"));
    }

    #[test]
    fn launch_flag_uses_wait_only_when_requested() {
        let usage = "usage: javaws [-wait] <file>";
        assert_eq!(launch_flag(usage, true), Some("-wait"));
        assert_eq!(launch_flag(usage, false), None);
    }

    #[test]
    fn launch_flag_without_known_flags() {
        assert_eq!(launch_flag("usage: javaws <file>", true), None);
    }

    #[test]
    fn javaws_path_prefers_defaults_section() {
        let mut config = MockConfigSource::new();
        config
            .expect_get_string()
            .with(eq(DEFAULTS_SECTION), eq("javaws_path"))
            .returning(|_, _| Some("/opt/java/bin/javaws".to_string()));
        let path = javaws_path(&config, Some(Path::new("/usr/local/bin/javaws")));
        assert_eq!(path, PathBuf::from("/opt/java/bin/javaws"));
    }

    #[test]
    fn javaws_path_falls_back_to_cli() {
        let mut config = MockConfigSource::new();
        config.expect_get_string().returning(|_, _| None);
        let path = javaws_path(&config, Some(Path::new("/usr/local/bin/javaws")));
        assert_eq!(path, PathBuf::from("/usr/local/bin/javaws"));
    }

    #[test]
    fn javaws_path_ignores_empty_config_value() {
        let mut config = MockConfigSource::new();
        config.expect_get_string().returning(|_, _| Some(String::new()));
        let path = javaws_path(&config, Some(Path::new("/x/javaws")));
        assert_eq!(path, PathBuf::from("/x/javaws"));
    }

    #[test]
    fn missing_javaws_is_reported() {
        let err = ensure_javaws(Path::new("/nonexistent/javaws")).unwrap_err();
        assert_eq!(err.to_string(), "No javaws binary found at /nonexistent/javaws");
    }

    #[test]
    fn descriptor_file_has_jnlp_suffix_and_content() {
        let file = write_descriptor(&descriptor()).unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jnlp"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<jnlp/>");
        drop(file);
        assert!(!path.exists());
    }

    #[cfg(unix)]
    mod fake_javaws {
        use super::*;
        use std::os::unix::fs::PermissionsExt as _;

        /// Write an executable script that prints usage (exit 255) with no
        /// arguments and otherwise records its arguments and the descriptor (its second argument,
        /// after `-wait`) to `args.txt`.
        fn script(dir: &Path, launch_exit: i32) -> PathBuf {
            let record = dir.join("args.txt");
            let body = format!(
                "#!/bin/sh\n\
                 if [ $# -eq 0 ]; then echo 'usage: javaws [-wait] <file>'; exit 255; fi\n\
                 echo \"$@\" > '{record}'\n\
                 cat \"$2\" >> '{record}'\n\
                 exit {launch_exit}\n",
                record = record.display(),
            );
            let path = dir.join("javaws");
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn options(javaws: PathBuf, keep_jnlp: bool) -> LaunchOptions {
            LaunchOptions {
                javaws,
                delay: Duration::ZERO,
                wait: true,
                keep_jnlp,
            }
        }

        #[test]
        fn launch_passes_flag_file_and_trailing_args() {
            let dir = tempfile::tempdir().unwrap();
            let javaws = script(dir.path(), 0);
            launch(&descriptor(), &options(javaws, false)).unwrap();

            let recorded = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
            let first = recorded.lines().next().unwrap();
            assert!(first.starts_with("-wait "));
            assert!(first.contains(".jnlp -nosecurity -noupdate -Xnofork"));
            assert!(recorded.contains("<jnlp/>"));
        }

        #[test]
        fn failed_launch_removes_file_by_default() {
            let dir = tempfile::tempdir().unwrap();
            let javaws = script(dir.path(), 3);
            let err = launch(&descriptor(), &options(javaws, false)).unwrap_err();
            let LaunchError::ViewerFailed { file, reason } = err else {
                unreachable!("expected ViewerFailed");
            };
            assert!(reason.contains("exit 3"));
            assert!(!Path::new(&file).exists());
        }

        #[test]
        fn failed_launch_keeps_file_when_asked() {
            let dir = tempfile::tempdir().unwrap();
            let javaws = script(dir.path(), 3);
            let err = launch(&descriptor(), &options(javaws, true)).unwrap_err();
            let LaunchError::ViewerFailed { file, .. } = err else {
                unreachable!("expected ViewerFailed");
            };
            assert!(Path::new(&file).exists());
            std::fs::remove_file(file).unwrap();
        }

        #[test]
        fn usage_failure_other_than_exit_255_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("javaws");
            std::fs::write(&path, "#!/bin/sh\nexit 2\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            let err = launch(&descriptor(), &options(path, false)).unwrap_err();
            assert!(matches!(err, LaunchError::Usage { .. }));
        }
    }
}
