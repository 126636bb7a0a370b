//! Launch descriptor (JNLP) generation.
//!
//! The vendor's [`VendorKind`] picks the schema, and for vendors with several
//! schema generations the resolved version picks the variant. Output is kept
//! in memory; writing it to disk is the launcher's job.
mod templates;

use askama::Template;

use crate::error::RenderError;
use crate::resolve::{Profile, VERSION_UNSET};
use crate::vendor::{VendorDescriptor, VendorKind, dell, supermicro};

/// A rendered launch descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// The JNLP document.
    pub document: String,
    /// Schema family it was rendered with.
    pub kind: VendorKind,
    /// Version selector used, if any.
    pub version: Option<i32>,
    /// Viewer JAR version derived from the selector (supermicro only).
    pub jar_version: Option<String>,
    /// Native library version derived from the selector (supermicro only).
    pub native_lib_version: Option<String>,
}

/// Render the launch descriptor for `profile`.
///
/// `extra_args` are appended, in order, after the vendor's own arguments.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedVersion`] when the vendor needs a version
/// and the profile has none, or when no template variant matches it, and
/// [`RenderError::Template`] if rendering itself fails.
pub fn generate(
    profile: &Profile,
    vendor: &VendorDescriptor,
    extra_args: &[String],
) -> Result<Descriptor, RenderError> {
    let unsupported = |version: Option<i32>| RenderError::UnsupportedVersion {
        vendor: vendor.id.to_string(),
        version: version.unwrap_or(VERSION_UNSET),
    };
    let template_error = |source: askama::Error| RenderError::Template {
        vendor: vendor.id.to_string(),
        source,
    };

    let host = profile.host.as_str();
    let username = profile.username.as_str();
    let password = profile.password.as_str();

    let rendered = match vendor.kind {
        VendorKind::Dell => {
            let version = profile.version.ok_or_else(|| unsupported(None))?;
            if !vendor.accepts_version(version) {
                return Err(unsupported(Some(version)));
            }
            let arguments = with_extra(dell::fixed_arguments(version), extra_args);
            let document = match version {
                6 => templates::Idrac6 {
                    host,
                    username,
                    password,
                    arguments,
                }
                .render(),
                7 => templates::Idrac7 {
                    host,
                    username,
                    password,
                    arguments,
                }
                .render(),
                8 => templates::Idrac8 {
                    host,
                    username,
                    password,
                    arguments,
                }
                .render(),
                other => return Err(unsupported(Some(other))),
            }
            .map_err(template_error)?;
            Descriptor {
                document,
                kind: vendor.kind,
                version: Some(version),
                jar_version: None,
                native_lib_version: None,
            }
        }
        VendorKind::Hp => {
            let document = templates::Ilo {
                host,
                username,
                password,
                arguments: with_extra(&[], extra_args),
            }
            .render()
            .map_err(template_error)?;
            Descriptor {
                document,
                kind: vendor.kind,
                version: None,
                jar_version: None,
                native_lib_version: None,
            }
        }
        VendorKind::Supermicro => {
            let version = profile.version.ok_or_else(|| unsupported(None))?;
            let sub = supermicro::sub_versions(version);
            if !sub.known {
                tracing::warn!(
                    "unknown supermicro version {version}; using it as both jar and native lib version"
                );
            }
            tracing::debug!(
                "supermicro {version}: jar {}, native lib {}",
                sub.jar,
                sub.native_lib
            );
            let document = templates::Ikvm {
                host,
                username,
                password,
                jar_version: &sub.jar,
                native_lib_version: &sub.native_lib,
                arguments: with_extra(supermicro::FIXED_ARGUMENTS, extra_args),
            }
            .render()
            .map_err(template_error)?;
            Descriptor {
                document,
                kind: vendor.kind,
                version: Some(version),
                jar_version: Some(sub.jar),
                native_lib_version: Some(sub.native_lib),
            }
        }
    };

    tracing::debug!(
        "rendered {} descriptor ({} bytes)",
        vendor.id,
        rendered.document.len()
    );
    Ok(rendered)
}

/// Vendor arguments followed by caller-supplied ones.
fn with_extra<'a>(fixed: &'a [&'a str], extra: &'a [String]) -> Vec<&'a str> {
    fixed
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .collect()
}
