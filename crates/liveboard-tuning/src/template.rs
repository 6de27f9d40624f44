//! `{field}` template expansion with percent-encoding.
//!
//! Templates substitute values from an entity's fields. The plain
//! `{name}` form percent-encodes the value when expanding into a URL
//! context, so arbitrary team names are safe to embed in media URLs;
//! the `{!name}` form always substitutes the raw value.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// What to do when a template references a name with no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderPolicy {
    /// Leave the `{name}` literal in place
    Keep,
    /// Substitute an empty string
    Empty,
    /// Fail the whole rule application
    Error,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        PlaceholderPolicy::Keep
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(!?[a-zA-Z0-9_.\-]*)\}").expect("placeholder regex"))
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => {
                out.push('%');
                out.push_str(&format!("{other:02X}"));
            }
        }
    }
    out
}

/// Names referenced by a template, with any `!` prefix stripped.
pub fn placeholder_names(template: &str) -> Vec<String> {
    placeholder_re()
        .captures_iter(template)
        .map(|caps| caps[1].trim_start_matches('!').to_string())
        .collect()
}

/// Expands every `{name}` / `{!name}` placeholder in `template` using
/// `lookup`. With `encode` set, plain placeholders are percent-encoded;
/// `{!name}` is substituted raw either way.
pub fn expand<F>(
    template: &str,
    policy: PlaceholderPolicy,
    encode: bool,
    lookup: F,
) -> Result<String, TuningError>
where
    F: Fn(&str) -> Option<String>,
{
    let re = placeholder_re();
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in re.captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = &caps[1];
        let (name, raw) = match name.strip_prefix('!') {
            Some(stripped) => (stripped, true),
            None => (name, false),
        };
        out.push_str(&template[last..whole.start()]);
        match lookup(name) {
            Some(value) if encode && !raw => out.push_str(&percent_encode(&value)),
            Some(value) => out.push_str(&value),
            None => match policy {
                PlaceholderPolicy::Keep => out.push_str(whole.as_str()),
                PlaceholderPolicy::Empty => {}
                PlaceholderPolicy::Error => {
                    return Err(TuningError::UnresolvedPlaceholder(name.to_string()))
                }
            },
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}
