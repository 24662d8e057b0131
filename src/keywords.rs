//! Keyword matching against curated, per-domain term lists.

use crate::text::{normalize, CanonicalText};

/// Named, ordered list of canonical terms for one intent domain
#[derive(Debug, Clone)]
pub struct KeywordSet {
    name: &'static str,
    terms: Vec<String>,
}

impl KeywordSet {
    /// Build a set, normalizing every term. Blank terms and duplicates are skipped.
    pub fn new(name: &'static str, terms: &[&str]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(terms.len());
        for term in terms {
            let term = normalize(term.trim());
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        Self {
            name,
            terms: normalized,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms appearing anywhere in the message, in list order.
    ///
    /// Plain substring test: "oferta" also matches inside "ofertas".
    pub fn find_in(&self, message: &CanonicalText) -> Vec<&str> {
        self.terms
            .iter()
            .filter(|term| message.contains(term.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn any_in(&self, message: &CanonicalText) -> bool {
        self.terms.iter().any(|term| message.contains(term.as_str()))
    }
}

/// Match a raw message against a keyword set.
pub fn match_keywords<'a>(message: &str, set: &'a KeywordSet) -> Vec<&'a str> {
    set.find_in(&CanonicalText::new(message))
}
