//! Turn a shopper message into catalog search criteria.
//!
//! Each meaningful word becomes one [`SearchConcept`] holding the word, its
//! singular and plural, and the same three forms of every product-type synonym.
//! Concepts are ANDed by the adapter; variants inside a concept are ORed.

use crate::catalog::{CategoryRecord, SearchConcept, SearchCriteria};
use crate::category::{significant_words, ResolvedCategory};
use crate::lexicon::{is_ignore_word, is_stopword, OFFER_MARKERS, STOCK_MARKERS};
use crate::synonyms::{category_for_token, product_alternates};
use crate::text::{normalize, to_plural, to_singular, CanonicalText, MIN_TOKEN_LEN};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Words excluded from search because they name a category.
struct CategoryFilter<'a> {
    full_names: HashSet<String>,
    /// Significant words of every category name, with their singulars
    name_words: HashSet<String>,
    resolved: Option<&'a ResolvedCategory>,
}

impl<'a> CategoryFilter<'a> {
    fn new(categories: &[CategoryRecord], resolved: Option<&'a ResolvedCategory>) -> Self {
        let full_names: HashSet<String> = categories.iter().map(|c| normalize(c.name.trim())).collect();
        let mut name_words: HashSet<String> = HashSet::new();
        for name in &full_names {
            for word in significant_words(name) {
                name_words.insert(to_singular(word));
                name_words.insert(word.to_string());
            }
        }
        Self {
            full_names,
            name_words,
            resolved,
        }
    }

    /// A full category name or a word of one, in any number.
    fn is_category_word(&self, word: &str) -> bool {
        self.full_names.contains(word)
            || self.name_words.contains(word)
            || self.name_words.contains(&to_singular(word))
    }

    /// Informal word already expressed by the resolved category filter.
    fn covered_by_resolved(&self, token: &str) -> bool {
        let Some(resolved) = self.resolved else {
            return false;
        };
        category_for_token(token) == Some(resolved.canonical_name.as_str())
    }
}

fn long_enough(word: &str) -> bool {
    word.chars().count() >= MIN_TOKEN_LEN
}

/// Tokens that carry search meaning, in message order, without repeats.
pub fn search_tokens<'m>(
    message: &'m CanonicalText,
    categories: &[CategoryRecord],
    resolved: Option<&ResolvedCategory>,
) -> Vec<&'m str> {
    let filter = CategoryFilter::new(categories, resolved);
    let mut seen = HashSet::new();
    message
        .tokens()
        .into_iter()
        .filter(|t| long_enough(t))
        .filter(|t| !is_stopword(t) && !is_ignore_word(t))
        .filter(|t| !filter.is_category_word(t) && !filter.covered_by_resolved(t))
        .filter(|t| seen.insert(*t))
        .collect()
}

/// Variant set for one retained token. The token itself is always present.
fn variants_for(token: &str, categories: &CategoryFilter<'_>) -> BTreeSet<String> {
    let mut forms: Vec<String> = vec![token.to_string(), to_singular(token), to_plural(token)];
    for alternate in product_alternates(token) {
        forms.push(alternate.clone());
        forms.push(to_singular(alternate));
        forms.push(to_plural(alternate));
    }

    let mut variants: BTreeSet<String> = forms
        .into_iter()
        .filter(|v| long_enough(v) && !is_stopword(v) && !categories.is_category_word(v))
        .collect();
    variants.insert(token.to_string());
    variants
}

/// Search concepts for every retained token of the message.
pub fn expand_terms(
    message: &CanonicalText,
    categories: &[CategoryRecord],
    resolved: Option<&ResolvedCategory>,
) -> Vec<SearchConcept> {
    let filter = CategoryFilter::new(categories, resolved);
    let mut concepts: Vec<SearchConcept> = Vec::new();
    for token in search_tokens(message, categories, resolved) {
        let variants = variants_for(token, &filter);
        if concepts.iter().any(|c| c.variants == variants) {
            continue;
        }
        concepts.push(SearchConcept {
            source: token.to_string(),
            variants,
        });
    }
    concepts
}

/// Full criteria for a products-intent message.
pub fn build_criteria(
    message: &CanonicalText,
    categories: &[CategoryRecord],
    resolved: Option<&ResolvedCategory>,
) -> SearchCriteria {
    let mut criteria = SearchCriteria {
        category_id: resolved.map(|r| r.record.id),
        require_stock: STOCK_MARKERS.any_in(message),
        require_offer: OFFER_MARKERS.any_in(message),
        ..Default::default()
    };
    for concept in expand_terms(message, categories, resolved) {
        criteria.add_concept(concept);
    }
    debug!(
        "Search criteria: category={:?} stock={} offer={} terms={:?}",
        criteria.category_id, criteria.require_stock, criteria.require_offer, criteria.expanded_terms
    );
    criteria
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::resolve_category;

    fn categories() -> Vec<CategoryRecord> {
        vec![
            CategoryRecord::new(1, "Indumentaria"),
            CategoryRecord::new(2, "Juegos y Coleccionables"),
            CategoryRecord::new(3, "Calzado"),
            CategoryRecord::new(4, "Hogar y Deco"),
        ]
    }

    fn criteria_for(message: &str) -> SearchCriteria {
        let text = CanonicalText::new(message);
        let cats = categories();
        let resolved = resolve_category(&text, &cats);
        build_criteria(&text, &cats, resolved.as_ref())
    }

    #[test]
    fn test_remeras_en_oferta() {
        let criteria = criteria_for("Hola, buscando remeras en oferta");
        for term in ["remera", "remeras", "camiseta", "playera", "camisetas", "t-shirt"] {
            assert!(criteria.expanded_terms.contains(term), "missing {}", term);
        }
        // the plural rule applied to an already-plural word
        assert!(criteria.expanded_terms.contains("remerases"));
        assert!(criteria.require_offer);
        assert!(!criteria.require_stock);
        assert_eq!(criteria.concepts.len(), 1);
        assert_eq!(criteria.concepts[0].source, "remeras");
    }

    #[test]
    fn test_invariants_on_expanded_terms() {
        let messages = [
            "tienen gas de la indumentaria?",
            "busco pantalones y zapatillas en stock",
            "hay juegos y coleccionables de mesa?",
            "calzado para mi",
            "juegos para el hogar",
            "algo de deco y calzados",
        ];
        let names: HashSet<String> = categories().iter().map(|c| normalize(&c.name)).collect();
        let words: HashSet<String> = names
            .iter()
            .flat_map(|n| significant_words(n).into_iter().map(str::to_string))
            .collect();
        for message in messages {
            let criteria = criteria_for(message);
            for term in &criteria.expanded_terms {
                assert!(term.chars().count() >= MIN_TOKEN_LEN, "{} in {}", term, message);
                assert!(!is_stopword(term), "{} in {}", term, message);
                assert!(!names.contains(term), "{} in {}", term, message);
                assert!(!words.contains(term), "{} in {}", term, message);
            }
        }
    }

    #[test]
    fn test_retained_tokens_are_kept() {
        let text = CanonicalText::new("busco pantalones negros y zapatillas");
        let cats = categories();
        let tokens = search_tokens(&text, &cats, None);
        assert_eq!(tokens, vec!["pantalones", "negros", "zapatillas"]);
        let criteria = build_criteria(&text, &cats, None);
        for token in tokens {
            assert!(criteria.expanded_terms.contains(token));
        }
    }

    #[test]
    fn test_short_singular_is_dropped_but_token_kept() {
        let criteria = criteria_for("gas");
        assert!(criteria.expanded_terms.contains("gas"));
        assert!(!criteria.expanded_terms.contains("ga"));
    }

    #[test]
    fn test_resolved_category_words_are_not_search_terms() {
        let criteria = criteria_for("calzados en stock");
        assert_eq!(criteria.category_id, Some(3));
        assert!(criteria.require_stock);
        assert!(criteria.concepts.is_empty());

        let criteria = criteria_for("hay juegos y coleccionables de mesa?");
        assert_eq!(criteria.category_id, Some(2));
        assert_eq!(criteria.concepts.len(), 1);
        assert_eq!(criteria.concepts[0].source, "mesa");
    }

    #[test]
    fn test_words_of_other_categories_are_not_search_terms() {
        let criteria = criteria_for("juegos para el hogar");
        assert_eq!(criteria.category_id, Some(2));
        assert!(criteria.concepts.is_empty());
        assert!(!criteria.expanded_terms.contains("hogar"));

        let text = CanonicalText::new("mesa de deco");
        assert_eq!(search_tokens(&text, &categories(), None), vec!["mesa"]);
    }

    #[test]
    fn test_category_synonym_token_dropped_when_category_resolved() {
        let criteria = criteria_for("tienen juguetes?");
        assert_eq!(criteria.category_id, Some(2));
        assert!(criteria.expanded_terms.is_empty());
        assert!(criteria.has_search_signal());
    }

    #[test]
    fn test_nothing_to_search() {
        let criteria = criteria_for("hola, qué tal?");
        assert!(criteria.is_unconstrained());
        assert!(!criteria.has_search_signal());
    }
}
