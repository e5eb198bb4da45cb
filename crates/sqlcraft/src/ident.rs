//! SQL identifier validation for table, column and alias names.
//!
//! The composer never quotes or escapes identifiers on its own. Everything that
//! reaches the SQL text as an identifier is validated here first, when metadata
//! is registered or an alias is assigned.
//!
//! - Unquoted parts: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts: any character except NUL, `"` escaped as `""`
//!
//! ```ignore
//! use sqlcraft::Ident;
//!
//! assert_eq!(Ident::parse("public.users")?.to_sql(), "public.users");
//! assert!(Ident::parse("users; drop table x").is_err());
//! # Ok::<(), sqlcraft::CraftError>(())
//! ```

use crate::error::{CraftError, CraftResult};
use std::fmt;

/// One dot-separated part of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    Unquoted(String),
    Quoted(String),
}

/// A validated SQL identifier, possibly dotted (`schema.table`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse and validate an identifier.
    pub fn parse(s: &str) -> CraftResult<Self> {
        if s.is_empty() {
            return Err(CraftError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(CraftError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut rest = s;
        loop {
            let (part, tail) = if let Some(quoted) = rest.strip_prefix('"') {
                parse_quoted(quoted)?
            } else {
                parse_unquoted(rest)?
            };
            parts.push(part);

            match tail.strip_prefix('.') {
                Some("") => return Err(CraftError::validation("Trailing '.' in identifier")),
                Some(next) => rest = next,
                None if tail.is_empty() => break,
                None => {
                    return Err(CraftError::validation(format!(
                        "Unexpected '{tail}' after identifier part in '{s}'"
                    )));
                }
            }
        }

        Ok(Self { parts })
    }

    /// The unqualified (last) part, e.g. `users` for `public.users`.
    pub fn name(&self) -> &str {
        match self.parts.last() {
            Some(IdentPart::Unquoted(s)) | Some(IdentPart::Quoted(s)) => s,
            None => "",
        }
    }

    /// Number of dot-separated parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) => out.push_str(s),
                IdentPart::Quoted(s) => {
                    out.push('"');
                    out.push_str(&s.replace('"', "\"\""));
                    out.push('"');
                }
            }
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

fn parse_quoted(input: &str) -> CraftResult<(IdentPart, &str)> {
    let mut name = String::new();
    let mut chars = input.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            name.push(c);
            continue;
        }
        if matches!(chars.peek(), Some((_, '"'))) {
            chars.next();
            name.push('"');
            continue;
        }
        if name.is_empty() {
            return Err(CraftError::validation("Empty quoted identifier"));
        }
        return Ok((IdentPart::Quoted(name), &input[i + 1..]));
    }
    Err(CraftError::validation("Unclosed quoted identifier"))
}

fn parse_unquoted(input: &str) -> CraftResult<(IdentPart, &str)> {
    let end = input.find('.').unwrap_or(input.len());
    let name = &input[..end];
    let mut chars = name.chars();
    match chars.next() {
        None => return Err(CraftError::validation("Empty identifier segment")),
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        Some(c) => {
            return Err(CraftError::validation(format!(
                "Invalid identifier start character: '{c}'"
            )));
        }
    }
    if let Some(c) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
        return Err(CraftError::validation(format!(
            "Invalid character in identifier: '{c}'"
        )));
    }
    Ok((IdentPart::Unquoted(name.to_string()), &input[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_and_dotted() {
        assert_eq!(Ident::parse("users").unwrap().to_sql(), "users");
        let ident = Ident::parse("public.users").unwrap();
        assert_eq!(ident.to_sql(), "public.users");
        assert_eq!(ident.name(), "users");
        assert_eq!(ident.len(), 2);
    }

    #[test]
    fn quoted_with_escape() {
        let ident = Ident::parse(r#""has""quote""#).unwrap();
        assert_eq!(ident.to_sql(), r#""has""quote""#);
        assert_eq!(ident.name(), r#"has"quote"#);
    }

    #[test]
    fn mixed_quoted_unquoted() {
        let ident = Ident::parse(r#"public."UserTable".id"#).unwrap();
        assert_eq!(ident.to_sql(), r#"public."UserTable".id"#);
    }

    #[test]
    fn dollar_allowed_after_first_char() {
        assert!(Ident::parse("my_var$1").is_ok());
        assert!(Ident::parse("$var").is_err());
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "",
            "1table",
            "my table",
            "schema..table",
            "schema.",
            r#""unclosed"#,
            r#""""#,
            "users;drop",
            r#""a"b"#,
        ] {
            assert!(Ident::parse(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }
}
