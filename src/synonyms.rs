//! Synonym lookups over the static tables in [`crate::lexicon`].
//!
//! Both lookups try the token as given and then its singular form, so
//! "juguetes" and "juguete" resolve the same way.

use crate::lexicon::{CATEGORY_SYNONYM_TABLE, PRODUCT_SYNONYM_TABLE};
use crate::text::to_singular;

/// Canonical category name an informal token points at, if any.
pub fn category_for_token(token: &str) -> Option<&'static str> {
    CATEGORY_SYNONYM_TABLE
        .get(token)
        .or_else(|| CATEGORY_SYNONYM_TABLE.get(&to_singular(token)))
        .map(String::as_str)
}

/// Alternate surface forms of a product-type token; empty when unknown.
pub fn product_alternates(token: &str) -> &'static [String] {
    PRODUCT_SYNONYM_TABLE
        .get(token)
        .or_else(|| PRODUCT_SYNONYM_TABLE.get(&to_singular(token)))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
