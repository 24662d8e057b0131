//! Intent classification by keyword counts with a greeting/product-noun override.

use crate::keywords::KeywordSet;
use crate::lexicon::{is_product_noun, GREETINGS, PAYMENT_KEYWORDS, PRODUCT_KEYWORDS, SHIPPING_KEYWORDS};
use crate::text::CanonicalText;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Total signal at which confidence saturates
const CONFIDENCE_SATURATION: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Products,
    Payments,
    Shipping,
    Categories,
    Invalid,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Products => "products",
            Intent::Payments => "payments",
            Intent::Shipping => "shipping",
            Intent::Categories => "categories",
            Intent::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntentScores {
    pub products: u32,
    pub payments: u32,
    pub shipping: u32,
}

impl IntentScores {
    pub fn total(&self) -> u32 {
        self.products + self.payments + self.shipping
    }

    pub fn max(&self) -> u32 {
        self.products.max(self.payments).max(self.shipping)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: Intent,
    pub matched_keywords: BTreeSet<String>,
    pub confidence: f64,
    pub scores: IntentScores,
}

impl ClassificationResult {
    fn new(category: Intent, matched_keywords: BTreeSet<String>, scores: IntentScores) -> Self {
        let confidence = (scores.total() as f64 / CONFIDENCE_SATURATION).min(1.0);
        Self {
            category,
            matched_keywords,
            confidence,
            scores,
        }
    }
}

fn count(set: &KeywordSet, message: &CanonicalText, matched: &mut BTreeSet<String>) -> u32 {
    let hits = set.find_in(message);
    matched.extend(hits.iter().map(|h| h.to_string()));
    hits.len() as u32
}

/// Highest score wins; ties go products, then shipping, then payments.
fn pick(scores: &IntentScores) -> Intent {
    let max = scores.max();
    if max == 0 {
        Intent::Invalid
    } else if scores.products == max {
        Intent::Products
    } else if scores.shipping == max {
        Intent::Shipping
    } else {
        Intent::Payments
    }
}

/// Greeting or a product word, the signal short messages like "hola, tienen remeras?" rely on.
fn looks_like_shopping(message: &CanonicalText) -> bool {
    GREETINGS.any_in(message) || message.tokens().iter().any(|t| is_product_noun(t))
}

pub fn classify(message: &CanonicalText) -> ClassificationResult {
    let mut matched = BTreeSet::new();
    let mut scores = IntentScores {
        products: count(&PRODUCT_KEYWORDS, message, &mut matched),
        payments: count(&PAYMENT_KEYWORDS, message, &mut matched),
        shipping: count(&SHIPPING_KEYWORDS, message, &mut matched),
    };

    let mut category = pick(&scores);
    if category == Intent::Invalid && looks_like_shopping(message) {
        category = Intent::Products;
        scores.products += 1;
    }

    let result = ClassificationResult::new(category, matched, scores);
    debug!(
        "Classified as {} (confidence {:.2}, scores {:?})",
        result.category, result.confidence, result.scores
    );
    result
}
