//! Placeholder templating.
//!
//! Templates carry two kinds of placeholders:
//!
//! - positional `?0`, `?1`, … resolved against an ordered list
//! - named `:userName` resolved against a string-keyed map
//!
//! A placeholder preceded by a backslash is escaped and kept verbatim (backslash
//! included), and a `::type` cast is never mistaken for a named placeholder.
//!
//! # Example
//! ```ignore
//! use sqlcraft::template;
//! use std::collections::HashMap;
//!
//! assert_eq!(template::format("a = ?0 and b = ?1", &["x", "y"]), "a = x and b = y");
//!
//! let args = HashMap::from([("userName", "admin"), ("password", "123456")]);
//! assert_eq!(template::format(":userName/:password", &args), "admin/123456");
//! ```
//!
//! Unresolved placeholders (index out of range, missing key) become the literal
//! text `null`. [`try_format`] is the strict counterpart that reports them instead.

use crate::error::{CraftError, CraftResult};
use crate::value::Value;
use regex::Regex;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE.get_or_init(|| {
        Regex::new(r"\?(\d+)|:([A-Za-z_][A-Za-z0-9_]*)")
            .expect("invalid built-in placeholder regex")
    })
}

/// A source of placeholder values.
///
/// A source answers positional placeholders, named placeholders, or both; the
/// kinds it does not answer are left untouched in the output.
pub trait TemplateArgs {
    /// Whether `?n` placeholders are resolved against this source.
    const POSITIONAL: bool = false;
    /// Whether `:name` placeholders are resolved against this source.
    const NAMED: bool = false;

    fn by_index(&self, _index: usize) -> Option<String> {
        None
    }

    fn by_name(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A single scalar argument: answers `?0` and every `:name`.
#[derive(Debug, Clone, Copy)]
pub struct Single<T>(pub T);

impl<T: Display> TemplateArgs for Single<T> {
    const POSITIONAL: bool = true;
    const NAMED: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        (index == 0).then(|| self.0.to_string())
    }

    fn by_name(&self, _name: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

impl TemplateArgs for Value {
    const POSITIONAL: bool = true;
    const NAMED: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        (index == 0).then(|| self.to_string())
    }

    fn by_name(&self, _name: &str) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: Display> TemplateArgs for [T] {
    const POSITIONAL: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        self.get(index).map(ToString::to_string)
    }
}

impl<T: Display, const N: usize> TemplateArgs for [T; N] {
    const POSITIONAL: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        self.get(index).map(ToString::to_string)
    }
}

impl<T: Display> TemplateArgs for Vec<T> {
    const POSITIONAL: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        self.get(index).map(ToString::to_string)
    }
}

impl<K, V, S> TemplateArgs for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    S: BuildHasher,
{
    const NAMED: bool = true;

    fn by_name(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }
}

impl<K, V> TemplateArgs for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    const NAMED: bool = true;

    fn by_name(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }
}

/// A placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder<'t> {
    Index(usize),
    Name(&'t str),
}

/// Iterate the unescaped placeholders of `template` with their byte ranges.
pub fn placeholders(template: &str) -> impl Iterator<Item = (std::ops::Range<usize>, Placeholder<'_>)> {
    placeholder_regex()
        .captures_iter(template)
        .filter_map(move |caps| {
            let whole = caps.get(0)?;
            let before = &template[..whole.start()];
            if before.ends_with('\\') {
                return None;
            }
            if let Some(idx) = caps.get(1) {
                // Indices too large for usize can never resolve; keep them as out-of-range.
                let index = idx.as_str().parse::<usize>().unwrap_or(usize::MAX);
                return Some((whole.range(), Placeholder::Index(index)));
            }
            let name = caps.get(2)?;
            if before.ends_with(':') {
                return None;
            }
            Some((whole.range(), Placeholder::Name(name.as_str())))
        })
}

/// Whether `template` contains at least one unescaped placeholder.
pub fn has_placeholders(template: &str) -> bool {
    placeholders(template).next().is_some()
}

/// Fill `template` from `args`, substituting `null` for unresolved placeholders.
pub fn format<A: TemplateArgs + ?Sized>(template: &str, args: &A) -> String {
    match render(template, args, false) {
        Ok(out) => out,
        // Lenient rendering never reports unresolved placeholders.
        Err(_) => template.to_string(),
    }
}

/// Fill `template` from `args`, failing on the first unresolved placeholder.
pub fn try_format<A: TemplateArgs + ?Sized>(template: &str, args: &A) -> CraftResult<String> {
    render(template, args, true)
}

pub(crate) fn render<A: TemplateArgs + ?Sized>(
    template: &str,
    args: &A,
    strict: bool,
) -> CraftResult<String> {
    if !placeholder_regex().is_match(template) {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len() + 16);
    let mut last = 0;
    for (range, placeholder) in placeholders(template) {
        let resolved = match placeholder {
            Placeholder::Index(_) if !A::POSITIONAL => continue,
            Placeholder::Name(_) if !A::NAMED => continue,
            Placeholder::Index(index) => args.by_index(index),
            Placeholder::Name(name) => args.by_name(name),
        };

        let text = &template[range.clone()];
        let value = match resolved {
            Some(v) => v,
            None if strict => {
                return Err(CraftError::Template(format!(
                    "unresolved placeholder '{text}' in '{template}'"
                )));
            }
            None => {
                tracing::debug!(
                    target: "sqlcraft.template",
                    placeholder = text,
                    "unresolved placeholder replaced with null"
                );
                "null".to_string()
            }
        };

        out.push_str(&template[last..range.start]);
        out.push_str(&value);
        last = range.end;
    }
    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_list() {
        assert_eq!(format("a = ?0 and b = ?1", &["x", "y"]), "a = x and b = y");
    }

    #[test]
    fn escaped_positional_is_kept_verbatim() {
        assert_eq!(format("c = \\?2", &["x", "y", "z"]), "c = \\?2");
        assert_eq!(
            format("a = ?0 and c = \\?0", &["x"]),
            "a = x and c = \\?0"
        );
    }

    #[test]
    fn named_map() {
        let args = HashMap::from([("userName", "admin"), ("password", "123456")]);
        assert_eq!(format(":userName/:password", &args), "admin/123456");
    }

    #[test]
    fn escaped_named_is_kept_verbatim() {
        let args = BTreeMap::from([("a".to_string(), 1)]);
        assert_eq!(format(":a and \\:a", &args), "1 and \\:a");
    }

    #[test]
    fn out_of_range_and_missing_resolve_to_null() {
        assert_eq!(format("x = ?3", &["a"]), "x = null");
        let args: HashMap<&str, i32> = HashMap::new();
        assert_eq!(format("x = :missing", &args), "x = null");
    }

    #[test]
    fn strict_mode_reports_unresolved() {
        let err = try_format("x = ?3", &["a"]).unwrap_err();
        assert!(matches!(err, CraftError::Template(_)));
        assert_eq!(try_format("x = ?0", &["a"]).unwrap(), "x = a");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(format("SELECT 1", &["a"]), "SELECT 1");
        assert!(!has_placeholders("a = \\?0"));
        assert!(has_placeholders("a = ?0"));
    }

    #[test]
    fn sources_ignore_the_other_placeholder_kind() {
        assert_eq!(format("?0 and :name", &["x"]), "x and :name");
        let args = HashMap::from([("name", "y")]);
        assert_eq!(format("?0 and :name", &args), "?0 and y");
    }

    #[test]
    fn casts_are_not_named_placeholders() {
        let args = HashMap::from([("v", "'1'")]);
        assert_eq!(format(":v::int", &args), "'1'::int");
    }

    #[test]
    fn single_scalar_answers_index_zero_and_names() {
        assert_eq!(format("id = ?0", &Single(42)), "id = 42");
        assert_eq!(format("id = :id", &Single(42)), "id = 42");
        assert_eq!(format("id = ?1", &Single(42)), "id = null");
        assert_eq!(format("id = ?0", &Value::Null), "id = null");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        assert_eq!(format("a = ?0 and b = ?1", &["?1", "z"]), "a = ?1 and b = z");
    }

    #[test]
    fn multi_digit_indices() {
        let args: Vec<String> = (0..12).map(|i| format!("v{i}")).collect();
        assert_eq!(format("?11,?1", &args), "v11,v1");
    }
}
