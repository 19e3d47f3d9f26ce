//! Canonical text normalization and lexical variation generation for
//! Vietnamese and Latin-script ingredient names.

use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Qualifier words stripped (in normalized form) when deriving the cleaned
/// variation of a name. Leading entries are food-class prefixes, trailing
/// entries are freshness/state suffixes.
const LEADING_QUALIFIERS: &[&str] = &["thit"];
const TRAILING_QUALIFIERS: &[&str] = &["tuoi", "kho", "say", "dong lanh"];

/// Produce the canonical comparable form of a string: lower-cased, trimmed,
/// diacritics stripped via NFD decomposition, `đ` mapped to `d`, internal
/// whitespace collapsed.
///
/// Idempotent, and treats precomposed and decomposed encodings of the same
/// visual string identically.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        // đ keeps its bar under NFD, it is not a combining-mark case
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip leading food-class qualifiers and trailing freshness qualifiers
/// from a name, comparing words in normalized form but keeping the original
/// spelling of whatever remains.
fn clean_qualifiers(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();

    while words.len() > 1 && LEADING_QUALIFIERS.contains(&normalize(words[0]).as_str()) {
        words.remove(0);
    }
    loop {
        if words.len() > 2 {
            let tail = normalize(&words[words.len() - 2..].join(" "));
            if TRAILING_QUALIFIERS.contains(&tail.as_str()) {
                words.truncate(words.len() - 2);
                continue;
            }
        }
        if words.len() > 1 && TRAILING_QUALIFIERS.contains(&normalize(words[words.len() - 1]).as_str()) {
            words.pop();
            continue;
        }
        break;
    }
    words.join(" ")
}

/// Derive the lexical variants of a name used to widen exact/alias recall:
/// the original, the qualifier-cleaned form, normalized forms of both, and
/// for multi-word names each word longer than 2 characters plus its
/// normalized form. Empty strings are excluded.
pub fn variations(name: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let name = name.trim();

    let cleaned = clean_qualifiers(name);
    for v in [
        name.to_string(),
        normalize(name),
        cleaned.clone(),
        normalize(&cleaned),
    ] {
        if !v.is_empty() {
            out.insert(v);
        }
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 1 {
        for w in words {
            if w.chars().count() > 2 {
                out.insert(w.to_string());
                let n = normalize(w);
                if !n.is_empty() {
                    out.insert(n);
                }
            }
        }
    }

    out
}
