//! Identifier naming strategies.
//!
//! [`NamingStrategy`] converts identifiers between naming conventions, e.g.
//! `user_name` (lower underscore) ⇄ `UserName` (upper camel). It is used by the
//! metadata layer to derive table and column names from entity and property names.
//!
//! ```ignore
//! use sqlcraft::NamingStrategy;
//!
//! assert_eq!(NamingStrategy::LowerUnderscore.to(NamingStrategy::UpperCamel, "user_name"), "UserName");
//! assert_eq!(NamingStrategy::UpperCamel.to(NamingStrategy::LowerUnderscore, "UserName"), "user_name");
//! ```
//!
//! Case folding is ASCII-only: letters are flipped with a `0x20` XOR mask and any
//! non-ASCII character is copied through untouched.

use serde::{Deserialize, Serialize};

const CASE_MASK: u8 = 0x20;

/// An identifier naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// Identity: names are used exactly as written.
    #[default]
    Normal,
    /// `username`
    Lower,
    /// `USERNAME`
    Upper,
    /// `userName`
    LowerCamel,
    /// `UserName`
    UpperCamel,
    /// `user_name`
    LowerUnderscore,
    /// `USER_NAME`
    UpperUnderscore,
}

impl NamingStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [NamingStrategy; 7] = [
        NamingStrategy::Normal,
        NamingStrategy::Lower,
        NamingStrategy::Upper,
        NamingStrategy::LowerCamel,
        NamingStrategy::UpperCamel,
        NamingStrategy::LowerUnderscore,
        NamingStrategy::UpperUnderscore,
    ];

    /// Convert `source`, written in `self`'s convention, into `target`'s convention.
    pub fn to(self, target: NamingStrategy, source: &str) -> String {
        if source.trim().is_empty() || self == target || target == NamingStrategy::Normal {
            return source.to_string();
        }

        match target {
            NamingStrategy::Lower => return source.chars().map(ascii_lower).collect(),
            NamingStrategy::Upper => return source.chars().map(ascii_upper).collect(),
            _ => {}
        }

        let consumed = self.boundary_width();
        let separator = target.separator();
        let mut out = String::with_capacity(source.len() + 4 * separator.len());
        let mut word_start = 0;
        let mut first = true;

        for (idx, ch) in source.char_indices() {
            // A boundary on the very first character never closes a word.
            if idx == 0 || !self.is_boundary(ch) {
                continue;
            }
            target.push_word(&mut out, &source[word_start..idx], first);
            out.push_str(separator);
            first = false;
            word_start = idx + consumed;
        }
        target.push_word(&mut out, &source[word_start..], first);
        out
    }

    /// Whether `ch` marks the start of a new word in this convention.
    fn is_boundary(self, ch: char) -> bool {
        match self {
            NamingStrategy::LowerCamel | NamingStrategy::UpperCamel => ch.is_ascii_uppercase(),
            NamingStrategy::LowerUnderscore | NamingStrategy::UpperUnderscore => ch == '_',
            NamingStrategy::Normal | NamingStrategy::Lower | NamingStrategy::Upper => false,
        }
    }

    /// Number of bytes a boundary consumes (the `_` is dropped, a camel hump is kept).
    fn boundary_width(self) -> usize {
        match self {
            NamingStrategy::LowerUnderscore | NamingStrategy::UpperUnderscore => 1,
            _ => 0,
        }
    }

    fn separator(self) -> &'static str {
        match self {
            NamingStrategy::LowerUnderscore | NamingStrategy::UpperUnderscore => "_",
            _ => "",
        }
    }

    fn push_word(self, out: &mut String, word: &str, first: bool) {
        match self {
            NamingStrategy::Normal => out.push_str(word),
            NamingStrategy::Lower | NamingStrategy::LowerUnderscore => {
                out.extend(word.chars().map(ascii_lower));
            }
            NamingStrategy::Upper | NamingStrategy::UpperUnderscore => {
                out.extend(word.chars().map(ascii_upper));
            }
            NamingStrategy::LowerCamel if first => out.extend(word.chars().map(ascii_lower)),
            NamingStrategy::LowerCamel | NamingStrategy::UpperCamel => {
                let mut chars = word.chars();
                if let Some(head) = chars.next() {
                    out.push(ascii_upper(head));
                    out.extend(chars.map(ascii_lower));
                }
            }
        }
    }
}

#[inline]
fn ascii_lower(ch: char) -> char {
    if ch.is_ascii_uppercase() {
        ((ch as u8) ^ CASE_MASK) as char
    } else {
        ch
    }
}

#[inline]
fn ascii_upper(ch: char) -> char {
    if ch.is_ascii_lowercase() {
        ((ch as u8) ^ CASE_MASK) as char
    } else {
        ch
    }
}

#[cfg(test)]
mod tests {
    use super::NamingStrategy::*;
    use super::*;

    #[test]
    fn underscore_to_upper_camel() {
        assert_eq!(LowerUnderscore.to(UpperCamel, "user_name"), "UserName");
    }

    #[test]
    fn upper_camel_to_underscore() {
        assert_eq!(UpperCamel.to(LowerUnderscore, "UserName"), "user_name");
    }

    #[test]
    fn lower_camel_lowers_first_word_only() {
        assert_eq!(UpperUnderscore.to(LowerCamel, "USER_NAME"), "userName");
        assert_eq!(LowerUnderscore.to(LowerCamel, "created_at_utc"), "createdAtUtc");
    }

    #[test]
    fn camel_to_upper_underscore() {
        assert_eq!(LowerCamel.to(UpperUnderscore, "orderLineId"), "ORDER_LINE_ID");
    }

    #[test]
    fn consecutive_capitals_split_per_letter() {
        assert_eq!(LowerCamel.to(LowerUnderscore, "userID"), "user_i_d");
    }

    #[test]
    fn lower_and_upper_fold_whole_string() {
        assert_eq!(LowerCamel.to(Upper, "userName"), "USERNAME");
        assert_eq!(UpperUnderscore.to(Lower, "USER_NAME"), "user_name");
    }

    #[test]
    fn no_boundary_yields_single_word() {
        assert_eq!(LowerUnderscore.to(UpperCamel, "name"), "Name");
        assert_eq!(Normal.to(UpperUnderscore, "userName"), "USERNAME");
    }

    #[test]
    fn blank_source_is_returned_unchanged() {
        assert_eq!(LowerUnderscore.to(UpperCamel, ""), "");
        assert_eq!(LowerUnderscore.to(UpperCamel, "   "), "   ");
    }

    #[test]
    fn normal_target_and_same_format_are_identity() {
        let samples = ["user_name", "UserName", "userName", "USER_NAME", "a_b_c", "x"];
        for source in NamingStrategy::ALL {
            for s in samples {
                assert_eq!(source.to(Normal, s), s);
                assert_eq!(source.to(source, s), s);
                let once = source.to(source, s);
                assert_eq!(source.to(source, &once), once);
            }
        }
    }

    #[test]
    fn non_ascii_is_not_folded() {
        assert_eq!(LowerUnderscore.to(UpperUnderscore, "größe_x"), "GRößE_X");
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let parsed: NamingStrategy = serde_json::from_str("\"lower_underscore\"").unwrap();
        assert_eq!(parsed, LowerUnderscore);
        assert_eq!(serde_json::to_string(&UpperCamel).unwrap(), "\"upper_camel\"");
    }
}
