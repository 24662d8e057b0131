//! Text normalization and the singular/plural heuristic.
//!
//! Every comparison in the engine happens on [`CanonicalText`]: lowercase,
//! NFD-decomposed, with combining marks removed ("Categorías" → "categorias",
//! "muñeca" → "muneca").

use std::fmt;
use std::ops::Deref;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Minimum token length considered meaningful for search and category words
pub const MIN_TOKEN_LEN: usize = 3;

/// Lowercase and strip diacritics.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// A message or term in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CanonicalText(String);

impl CanonicalText {
    pub fn new(raw: &str) -> Self {
        CanonicalText(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split on non-alphanumeric boundaries, dropping empty pieces.
    pub fn tokens(&self) -> Vec<&str> {
        tokenize(&self.0)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl Deref for CanonicalText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split already-normalized text into alphanumeric tokens.
pub fn tokenize(canonical: &str) -> Vec<&str> {
    canonical
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

// ============================================================================
// Morphological heuristic
// ============================================================================
//
// Suffix rules only. Irregular forms come out wrong ("remeras" pluralizes to
// "remerases", "lapiz" to "lapizes"); synonym and category matching depend on
// these exact outputs, so they stay as they are.

/// "pantalones" → "pantalon", "remeras" → "remera", "buzo" → "buzo"
pub fn to_singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("es") {
        stem.to_string()
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

/// "remera" → "remeras", "pantalon" → "pantalones"
pub fn to_plural(word: &str) -> String {
    match word.chars().last() {
        Some(c) if is_vowel(c) => format!("{}s", word),
        _ => format!("{}es", word),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
