//! core::properties
//!
//! Property scope resolution for `${...}` placeholders.
//!
//! # Lookup Order
//!
//! A placeholder `${name}` is looked up in:
//! 1. Built-in project fields (`project.version`, `project.groupId`,
//!    `project.artifactId`, `project.name`, `project.packaging`, the
//!    `project.parent.*` fields and their legacy `pom.*` aliases)
//! 2. The project's effective property map (ancestors overlaid with the
//!    project's own declarations, see [`crate::core::forest`])
//!
//! Anything not found is left verbatim.
//!
//! # Nesting
//!
//! Placeholders are scanned with balanced braces, so a name may itself
//! contain a placeholder (`${project.${kind}.version}`). The inner
//! placeholder is resolved first; if the resulting name is still unknown the
//! whole original placeholder is kept, never a half-substituted name.
//!
//! # Termination
//!
//! Expansion depth is capped at [`MAX_DEPTH`] and names currently being
//! expanded are tracked, so cyclic definitions (`a=${b}`, `b=${a}`)
//! terminate. A placeholder whose expansion runs into a cycle or the cap is
//! kept as its original text, which keeps resolution idempotent. Resolution
//! never fails; callers treat a result containing `${` as unresolved.
//!
//! # Example
//!
//! ```
//! use pomlens::core::properties::resolve;
//! use pomlens::core::types::Project;
//!
//! let mut project = Project::new(Some("com.example"), "app", Some("1.0.0"));
//! project
//!     .effective_properties
//!     .insert("spring.version".into(), "5.3.10".into());
//!
//! assert_eq!(resolve("${spring.version}", &project), "5.3.10");
//! assert_eq!(resolve("v${project.version}-${x}", &project), "v1.0.0-${x}");
//! ```

use std::borrow::Cow;

use super::types::Project;

/// Maximum nesting of recursive expansions before giving up.
pub const MAX_DEPTH: usize = 10;

/// Resolve every placeholder in `raw` against `project`.
///
/// Shorthand for `PropertyScope::new(project).resolve(raw)`.
pub fn resolve(raw: &str, project: &Project) -> String {
    PropertyScope::new(project).resolve(raw)
}

/// Whether a value still contains a placeholder after resolution.
pub fn is_unresolved(value: &str) -> bool {
    value.contains("${")
}

/// Resolution scope for a single project.
#[derive(Debug, Clone, Copy)]
pub struct PropertyScope<'a> {
    project: &'a Project,
}

impl<'a> PropertyScope<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Resolve all placeholders in `raw`.
    ///
    /// Values without a placeholder are returned unchanged.
    pub fn resolve(&self, raw: &str) -> String {
        let mut expanding = Vec::new();
        self.resolve_at(raw, 0, &mut expanding).text
    }

    /// Resolve an optional value, as found on dependency versions.
    pub fn resolve_opt(&self, raw: Option<&str>) -> Option<String> {
        raw.map(|v| self.resolve(v))
    }

    fn resolve_at(&self, raw: &str, depth: usize, expanding: &mut Vec<String>) -> Expansion {
        if !is_unresolved(raw) {
            return Expansion::done(raw);
        }
        if depth > MAX_DEPTH {
            log::debug!("property expansion depth exceeded for '{}'", raw);
            return Expansion::degraded(raw);
        }

        let mut out = String::with_capacity(raw.len());
        let mut degraded = false;
        for segment in scan(raw) {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { raw, name } => {
                    let expansion = self.expand(raw, name, depth, expanding);
                    degraded |= expansion.degraded;
                    out.push_str(&expansion.text);
                }
            }
        }
        Expansion {
            text: out,
            degraded,
        }
    }

    /// Expand one placeholder, returning `raw` when it cannot be resolved.
    ///
    /// A cycle or the depth cap anywhere below this placeholder degrades the
    /// whole placeholder to `raw`, and the flag travels up so that every
    /// enclosing placeholder is kept verbatim too.
    fn expand(&self, raw: &str, name: &str, depth: usize, expanding: &mut Vec<String>) -> Expansion {
        let name: Cow<'_, str> = if is_unresolved(name) {
            let inner = self.resolve_at(name, depth + 1, expanding);
            if inner.degraded {
                return Expansion::degraded(raw);
            }
            if is_unresolved(&inner.text) {
                return Expansion::done(raw);
            }
            Cow::Owned(inner.text)
        } else {
            Cow::Borrowed(name)
        };

        if expanding.iter().any(|n| *n == *name) {
            log::debug!("property cycle detected at '{}'", name);
            return Expansion::degraded(raw);
        }

        let Some(value) = self.lookup(&name) else {
            log::trace!("property '{}' not found", name);
            return Expansion::done(raw);
        };

        expanding.push(name.into_owned());
        let resolved = self.resolve_at(value, depth + 1, expanding);
        expanding.pop();

        if resolved.degraded {
            Expansion::degraded(raw)
        } else {
            resolved
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a str> {
        let project = self.project;
        self.builtin(name)
            .or_else(|| project.effective_properties.get(name).map(String::as_str))
    }

    fn builtin(&self, name: &str) -> Option<&'a str> {
        let project = self.project;
        let field = name
            .strip_prefix("project.")
            .or_else(|| name.strip_prefix("pom."))?;

        match field {
            "version" => project.version.as_deref(),
            "groupId" => project.group_id.as_deref(),
            "artifactId" => project.artifact_id.as_deref(),
            "name" => project.name.as_deref(),
            "packaging" => project.packaging.as_deref(),
            "parent.version" => parent_field(project, |id| &id.version),
            "parent.groupId" => parent_field(project, |id| &id.group_id),
            "parent.artifactId" => parent_field(project, |id| &id.artifact_id),
            _ => None,
        }
    }
}

fn parent_field<'a>(
    project: &'a Project,
    field: impl Fn(&'a crate::core::types::ProjectId) -> &'a String,
) -> Option<&'a str> {
    project
        .parent
        .as_ref()
        .map(|link| field(&link.id).as_str())
        .filter(|v| !v.is_empty())
}

/// Text produced by an expansion.
///
/// `degraded` is set when a cycle or the depth cap cut the expansion short.
struct Expansion {
    text: String,
    degraded: bool,
}

impl Expansion {
    fn done(text: &str) -> Self {
        Self {
            text: text.to_string(),
            degraded: false,
        }
    }

    fn degraded(text: &str) -> Self {
        Self {
            text: text.to_string(),
            degraded: true,
        }
    }
}

/// A piece of a scanned string.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'s> {
    Literal(&'s str),
    /// `raw` is the full `${...}` text, `name` what is between the braces.
    Placeholder { raw: &'s str, name: &'s str },
}

/// Split a string into literals and balanced `${...}` placeholders.
///
/// An unterminated `${` is kept as literal text.
fn scan(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] != b'$' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }

        let Some(end) = matching_brace(bytes, i + 2) else {
            break;
        };

        if literal_start < i {
            segments.push(Segment::Literal(&input[literal_start..i]));
        }
        segments.push(Segment::Placeholder {
            raw: &input[i..=end],
            name: &input[i + 2..end],
        });
        i = end + 1;
        literal_start = i;
    }

    if literal_start < input.len() {
        segments.push(Segment::Literal(&input[literal_start..]));
    }
    segments
}

/// Index of the `}` closing a placeholder whose name starts at `start`.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut j = start;
    while j < bytes.len() {
        if bytes[j] == b'$' && bytes.get(j + 1) == Some(&b'{') {
            depth += 1;
            j += 2;
            continue;
        }
        if bytes[j] == b'}' {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        }
        j += 1;
    }
    None
}
