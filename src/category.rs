//! Resolve a message to at most one catalog category.
//!
//! Strategies run in order and the first one that finds anything wins:
//! exact name substring, name-word substring, category synonym, and finally
//! singular/plural token equality.

use crate::catalog::CategoryRecord;
use crate::lexicon::is_stopword;
use crate::synonyms::category_for_token;
use crate::text::{normalize, to_plural, to_singular, tokenize, CanonicalText, MIN_TOKEN_LEN};
use tracing::debug;

/// Which strategy produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    ExactName,
    NameWord,
    Synonym,
    Morphology,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCategory {
    pub record: CategoryRecord,
    /// Canonical form of the category name
    pub canonical_name: String,
    pub strategy: MatchStrategy,
}

impl ResolvedCategory {
    /// Significant words of the canonical name.
    pub fn name_words(&self) -> Vec<&str> {
        significant_words(&self.canonical_name)
    }
}

/// Words of a category name that can identify it: at least 3 characters and
/// not a connector ("para", "con"). Domain words like "articulos" count.
pub fn significant_words(canonical_name: &str) -> Vec<&str> {
    tokenize(canonical_name)
        .into_iter()
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN && !is_stopword(w))
        .collect()
}

pub fn resolve_category(message: &CanonicalText, categories: &[CategoryRecord]) -> Option<ResolvedCategory> {
    let named: Vec<(String, &CategoryRecord)> = categories
        .iter()
        .map(|c| (normalize(c.name.trim()), c))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let resolved = by_exact_name(message, &named)
        .map(|(name, c)| (name, c, MatchStrategy::ExactName))
        .or_else(|| by_name_word(message, &named).map(|(name, c)| (name, c, MatchStrategy::NameWord)))
        .or_else(|| by_synonym(message, &named).map(|(name, c)| (name, c, MatchStrategy::Synonym)))
        .or_else(|| by_morphology(message, &named).map(|(name, c)| (name, c, MatchStrategy::Morphology)));

    resolved.map(|(canonical_name, record, strategy)| {
        debug!("Resolved category '{}' via {:?}", record.name, strategy);
        ResolvedCategory {
            record: record.clone(),
            canonical_name: canonical_name.to_string(),
            strategy,
        }
    })
}

/// Longest name contained in the message, so "juegos y coleccionables" beats "juegos".
fn by_exact_name<'a>(
    message: &CanonicalText,
    named: &'a [(String, &'a CategoryRecord)],
) -> Option<(&'a str, &'a CategoryRecord)> {
    let mut best: Option<(&str, &CategoryRecord)> = None;
    for (name, record) in named {
        if message.contains(name.as_str()) && best.map_or(true, |(b, _)| name.len() > b.len()) {
            best = Some((name.as_str(), *record));
        }
    }
    best
}

/// Category with the most name words found in the message; earlier categories win ties.
fn by_name_word<'a>(
    message: &CanonicalText,
    named: &'a [(String, &'a CategoryRecord)],
) -> Option<(&'a str, &'a CategoryRecord)> {
    let mut best: Option<(usize, &str, &CategoryRecord)> = None;
    for (name, record) in named {
        let hits = significant_words(name)
            .iter()
            .filter(|w| message.contains(w))
            .count();
        if hits > 0 && best.map_or(true, |(b, _, _)| hits > b) {
            best = Some((hits, name.as_str(), *record));
        }
    }
    best.map(|(_, name, record)| (name, record))
}

fn by_synonym<'a>(
    message: &CanonicalText,
    named: &'a [(String, &'a CategoryRecord)],
) -> Option<(&'a str, &'a CategoryRecord)> {
    message.tokens().into_iter().find_map(|token| {
        let target = category_for_token(token)?;
        named
            .iter()
            .find(|(name, _)| name == target)
            .map(|(name, record)| (name.as_str(), *record))
    })
}

fn by_morphology<'a>(
    message: &CanonicalText,
    named: &'a [(String, &'a CategoryRecord)],
) -> Option<(&'a str, &'a CategoryRecord)> {
    message.tokens().into_iter().find_map(|token| {
        let singular = to_singular(token);
        let plural = to_plural(token);
        named
            .iter()
            .find(|(name, _)| *name == singular || *name == plural || to_singular(name) == token)
            .map(|(name, record)| (name.as_str(), *record))
    })
}
