use std::path::Path;

use crate::error::ConfigError;

/// A key-value section of the config file.
///
/// Headers preserve original case since they name hosts
/// (e.g., `[idrac-01.example.com]`) or the reserved `defaults` section.
///
/// # Examples
///
/// ```
/// use drac_kvm::config::ini::KvSection;
///
/// let section = KvSection {
///     header: "defaults".to_string(),
///     entries: vec![("username".to_string(), "root".to_string())],
/// };
/// assert_eq!(section.header, "defaults");
/// assert_eq!(section.entries[0].0, "username");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvSection {
    /// The raw section header.
    pub header: String,
    /// Key-value entries within this section, in file order.
    pub entries: Vec<(String, String)>,
}

/// Parse an INI file into key-value sections.
///
/// A file that is missing or unreadable parses as zero sections.
///
/// # Errors
///
/// Returns an error if the file was read but has a syntax error.
pub fn parse_kv_sections(path: &Path) -> Result<Vec<KvSection>, ConfigError> {
    let Some(content) = read_file(path) else {
        return Ok(Vec::new());
    };
    parse_kv_sections_from_str(&content).map_err(|e| match e {
        ConfigError::InvalidSyntax { line, message, .. } => ConfigError::InvalidSyntax {
            file: path.display().to_string(),
            line,
            message,
        },
        other => other,
    })
}

/// Parse key-value INI content from a string.
///
/// Comment lines start with `#` or `;`. Inline comments (` #` or ` ;`) are
/// stripped from values, and a value wrapped in matching single or double
/// quotes is unquoted (quoting keeps a literal ` #` in a password).
///
/// # Examples
///
/// ```
/// use drac_kvm::config::ini::parse_kv_sections_from_str;
///
/// let sections = parse_kv_sections_from_str(
///     "[defaults]\nusername = root\n; comment\npassword = \"s3cr #t\"\n"
/// ).unwrap();
/// assert_eq!(sections[0].header, "defaults");
/// assert_eq!(sections[0].entries[1].1, "s3cr #t");
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A line is neither a header nor a `key = value` pair
/// - A key is empty
/// - An entry appears outside of a section header
pub fn parse_kv_sections_from_str(content: &str) -> Result<Vec<KvSection>, ConfigError> {
    let mut sections = Vec::new();
    let mut current: Option<KvSection> = None;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let syntax_error = |message: String| ConfigError::InvalidSyntax {
            file: "<string>".to_string(),
            line: line_num + 1,
            message,
        };

        if trimmed.starts_with('[') {
            let header = parse_raw_header(trimmed)
                .ok_or_else(|| syntax_error(format!("invalid section header: {trimmed}")))?;
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(KvSection {
                header,
                entries: Vec::new(),
            });
        } else if let Some(ref mut section) = current {
            let (key, value) = parse_kv_line(trimmed)
                .ok_or_else(|| syntax_error(format!("invalid key-value pair: {trimmed}")))?;
            if key.is_empty() {
                return Err(syntax_error(format!("empty key: {trimmed}")));
            }
            section.entries.push((key, value));
        } else {
            return Err(syntax_error(format!("entry outside of section: {trimmed}")));
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    Ok(sections)
}

/// Parse a `[header]` line preserving original case.
fn parse_raw_header(line: &str) -> Option<String> {
    let inner = line.trim().strip_prefix('[')?.strip_suffix(']')?;
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Parse a `key = value` line, stripping inline comments and quotes from the value.
///
/// # Examples
///
/// - `"username = root # comment"` → `("username", "root")`
/// - `"password = 'a b'"` → `("password", "a b")`
fn parse_kv_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    let value = unquote(value).unwrap_or_else(|| strip_inline_comment(value));
    Some((key.trim().to_string(), value.to_string()))
}

/// Return the inner text of a value wrapped in matching quotes.
fn unquote(value: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
}

/// Strip inline comments (`#` or `;` preceded by whitespace) from a value.
fn strip_inline_comment(value: &str) -> &str {
    [" #", "\t#", " ;", "\t;"]
        .iter()
        .filter_map(|marker| value.find(marker))
        .min()
        .map_or(value, |idx| value.get(..idx).unwrap_or(value).trim_end())
}

/// Read the file, mapping any read failure to `None`.
///
/// A file that is missing is silent; one that exists but cannot be read is
/// logged and then treated the same way.
fn read_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("ignoring unreadable config file {}: {e}", path.display());
            None
        }
    }
}
