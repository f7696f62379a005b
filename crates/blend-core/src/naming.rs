//! Name transforms and component name validation

use crate::diagnostics::Diagnostic;
use regex::Regex;
use std::sync::LazyLock;

/// Names every host reserves for its own composition primitives
const BUILTIN_NAMES: &[&str] = &["slot", "component"];

static HYPHEN_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([A-Za-z0-9_])").unwrap());

// A letter first, then letters, digits, '-', '.', '_' or characters from the
// unicode ranges allowed in custom element names.
static COMPONENT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[a-zA-Z][\-\.0-9_a-zA-Z",
        r"\u{00B7}\u{00C0}-\u{00D6}\u{00D8}-\u{00F6}\u{00F8}-\u{037D}\u{037F}-\u{1FFF}",
        r"\u{200C}-\u{200D}\u{203F}-\u{2040}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}",
        r"\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}",
        r"]*$"
    ))
    .unwrap()
});

/// Canonical case: `my-widget` becomes `myWidget`
pub fn camelize(name: &str) -> String {
    HYPHEN_WORD_REGEX
        .replace_all(name, |caps: &regex::Captures<'_>| caps[1].to_uppercase())
        .into_owned()
}

/// Upper-case the first character: `myWidget` becomes `MyWidget`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validate a component name against the naming rule and the blacklist
///
/// `reserved` holds host-specific reserved names; the comparison against both
/// built-in and reserved names ignores case.
pub fn validate_component_name(name: &str, reserved: &[String]) -> Result<(), Diagnostic> {
    if !COMPONENT_NAME_REGEX.is_match(name) {
        return Err(Diagnostic::InvalidComponentName {
            name: name.to_string(),
        });
    }

    let lowered = name.to_lowercase();
    let is_builtin = BUILTIN_NAMES.contains(&lowered.as_str());
    let is_reserved = reserved.iter().any(|r| r.eq_ignore_ascii_case(name));
    if is_builtin || is_reserved {
        return Err(Diagnostic::ReservedComponentName {
            name: name.to_string(),
        });
    }

    Ok(())
}
