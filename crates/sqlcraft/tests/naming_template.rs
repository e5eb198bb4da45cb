//! Naming conversions and placeholder filling through the public API.

use sqlcraft::NamingStrategy;
use sqlcraft::template::{self, Single};
use std::collections::HashMap;

const WORDS: &[&[&str]] = &[
    &["user"],
    &["user", "name"],
    &["created", "at", "utc"],
    &["x", "y"],
    &["order", "line", "id"],
];

fn spell(strategy: NamingStrategy, words: &[&str]) -> String {
    let lower: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
    let capitalized = |w: &str| {
        let mut chars = w.chars();
        match chars.next() {
            Some(head) => head.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    };
    match strategy {
        NamingStrategy::Normal | NamingStrategy::Lower => lower.concat(),
        NamingStrategy::Upper => lower.concat().to_ascii_uppercase(),
        NamingStrategy::LowerCamel => lower
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.clone() } else { capitalized(w) })
            .collect(),
        NamingStrategy::UpperCamel => lower.iter().map(|w| capitalized(w)).collect(),
        NamingStrategy::LowerUnderscore => lower.join("_"),
        NamingStrategy::UpperUnderscore => lower.join("_").to_ascii_uppercase(),
    }
}

const WORD_AWARE: [NamingStrategy; 4] = [
    NamingStrategy::LowerCamel,
    NamingStrategy::UpperCamel,
    NamingStrategy::LowerUnderscore,
    NamingStrategy::UpperUnderscore,
];

#[test]
fn test_word_aware_conventions_convert_losslessly() {
    for words in WORDS {
        for source in WORD_AWARE {
            for target in WORD_AWARE {
                let input = spell(source, words);
                assert_eq!(
                    source.to(target, &input),
                    spell(target, words),
                    "{source:?} -> {target:?} for {input}"
                );
            }
        }
    }
}

#[test]
fn test_case_only_targets_fold_everything() {
    for source in NamingStrategy::ALL {
        if source != NamingStrategy::Upper {
            assert_eq!(source.to(NamingStrategy::Upper, "user_Name"), "USER_NAME");
        }
        if source != NamingStrategy::Lower {
            assert_eq!(source.to(NamingStrategy::Lower, "user_Name"), "user_name");
        }
    }
}

#[test]
fn test_normal_and_blank_are_identity() {
    for strategy in NamingStrategy::ALL {
        assert_eq!(strategy.to(NamingStrategy::Normal, "MixedCase_x"), "MixedCase_x");
        assert_eq!(NamingStrategy::UpperCamel.to(strategy, "  "), "  ");
    }
}

#[test]
fn test_template_values_are_not_rescanned() {
    let filled = template::format("a = ?0 AND b = ?1", &["?1", ":x"]);
    assert_eq!(filled, "a = ?1 AND b = :x");

    let named = HashMap::from([("x", ":y"), ("y", "never")]);
    assert_eq!(template::format(":x", &named), ":y");
}

#[test]
fn test_template_escapes_and_casts() {
    let args = HashMap::from([("id", "7")]);
    assert_eq!(
        template::format(r"\:id = :id AND t::text = '\?0'", &args),
        r"\:id = 7 AND t::text = '\?0'"
    );
}

#[test]
fn test_template_unresolved_lenient_and_strict() {
    assert_eq!(template::format("?0, ?3", &["a"]), "a, null");
    assert!(template::try_format("?0, ?3", &["a"]).is_err());
    assert_eq!(template::format(":a = ?0", &Single(1)), "1 = 1");
    // Positional sources leave named placeholders alone.
    assert_eq!(template::format(":a = ?0", &[1]), ":a = 1");
}
