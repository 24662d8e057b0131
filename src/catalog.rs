//! Catalog boundary: record types, search criteria and the query adapter trait.
//!
//! The engine never owns catalog data. It reads categories and items through
//! [`CatalogQueryAdapter`]; [`InMemoryCatalog`] is the JSON-backed adapter
//! used by the CLI and the tests.

use crate::error::AssistantError;
use crate::text::normalize;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

pub type RecordId = u64;

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: RecordId,
    pub name: String,

    /// Inactive categories are hidden from shoppers
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CategoryRecord {
    pub fn new(id: RecordId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            active: true,
        }
    }

    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Category as embedded in an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: RecordId,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: f64,

    /// Discount percentage, 0 when none
    #[serde(default)]
    pub discount: f64,

    #[serde(default)]
    pub is_offer: bool,

    #[serde(default)]
    pub stock: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

impl CatalogItem {
    /// Flagged as an offer or carrying a positive discount.
    pub fn on_sale(&self) -> bool {
        self.is_offer || self.discount > 0.0
    }
}

// ============================================================================
// Search criteria
// ============================================================================

/// Variants standing in for one word of the shopper's message.
///
/// An item satisfies the concept when its name or description contains any variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchConcept {
    pub source: String,
    pub variants: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
    pub require_stock: bool,
    pub require_offer: bool,
    /// Union of every concept's variants
    pub expanded_terms: BTreeSet<String>,
    #[serde(skip)]
    pub concepts: Vec<SearchConcept>,
}

impl SearchCriteria {
    pub fn add_concept(&mut self, concept: SearchConcept) {
        self.expanded_terms.extend(concept.variants.iter().cloned());
        self.concepts.push(concept);
    }

    /// No category, no terms and no filters.
    pub fn is_unconstrained(&self) -> bool {
        self.category_id.is_none()
            && self.concepts.is_empty()
            && !self.require_stock
            && !self.require_offer
    }

    /// Carries something the shopper actually asked for: a category or search terms.
    pub fn has_search_signal(&self) -> bool {
        self.category_id.is_some() || !self.concepts.is_empty()
    }

    /// Evaluate the criteria against one item, as a store adapter would.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(category_id) = self.category_id {
            if item.category.as_ref().map(|c| c.id) != Some(category_id) {
                return false;
            }
        }
        if self.require_stock && item.stock == 0 {
            return false;
        }
        if self.require_offer && !item.is_offer {
            return false;
        }
        if self.concepts.is_empty() {
            return true;
        }
        let haystack = format!("{} {}", normalize(&item.name), normalize(&item.description));
        self.concepts
            .iter()
            .all(|concept| concept.variants.iter().any(|v| haystack.contains(v.as_str())))
    }
}

/// Sort keys understood by adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    OfferDesc,
    DiscountDesc,
    PriceAsc,
}

/// Ordering used for every item search: offers first, then biggest discount, then cheapest.
pub const DEFAULT_ORDER: &[OrderBy] = &[OrderBy::OfferDesc, OrderBy::DiscountDesc, OrderBy::PriceAsc];

/// Compare two items under a list of sort keys.
pub fn compare_items(a: &CatalogItem, b: &CatalogItem, order: &[OrderBy]) -> Ordering {
    for key in order {
        let ord = match key {
            OrderBy::OfferDesc => b.is_offer.cmp(&a.is_offer),
            OrderBy::DiscountDesc => b.discount.total_cmp(&a.discount),
            OrderBy::PriceAsc => a.price.total_cmp(&b.price),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

// ============================================================================
// Adapter trait
// ============================================================================

#[async_trait]
pub trait CatalogQueryAdapter: Send + Sync {
    async fn list_categories(&self, active_only: bool) -> Result<Vec<CategoryRecord>, AssistantError>;

    async fn search_items(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        order: &[OrderBy],
    ) -> Result<Vec<CatalogItem>, AssistantError>;
}

// ============================================================================
// In-memory adapter
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new(categories: Vec<CategoryRecord>, items: Vec<CatalogItem>) -> Self {
        Self { categories, items }
    }

    /// Load a `{categories, items}` JSON document.
    pub fn from_file(path: &Path) -> Result<Self, AssistantError> {
        if !path.exists() {
            return Err(AssistantError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| AssistantError::FileRead {
            kind: "catalog",
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AssistantError> {
        serde_json::from_str(content).map_err(|e| AssistantError::FileParse {
            kind: "catalog",
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogQueryAdapter for InMemoryCatalog {
    async fn list_categories(&self, active_only: bool) -> Result<Vec<CategoryRecord>, AssistantError> {
        Ok(self
            .categories
            .iter()
            .filter(|c| !active_only || c.active)
            .cloned()
            .collect())
    }

    async fn search_items(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        order: &[OrderBy],
    ) -> Result<Vec<CatalogItem>, AssistantError> {
        let mut found: Vec<CatalogItem> = self
            .items
            .iter()
            .filter(|item| criteria.matches(item))
            .cloned()
            .collect();
        found.sort_by(|a, b| compare_items(a, b, order));
        found.truncate(limit);
        debug!("In-memory search matched {} items", found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: RecordId, name: &str, price: f64, discount: f64, is_offer: bool, stock: u32) -> CatalogItem {
        CatalogItem {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            discount,
            is_offer,
            stock,
            image_path: None,
            category: Some(CategoryRef { id: 1, name: "Indumentaria".into() }),
        }
    }

    fn concept(source: &str, variants: &[&str]) -> SearchConcept {
        SearchConcept {
            source: source.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_ordering_offer_discount_price() {
        let mut items = vec![
            item(1, "a", 50.0, 0.0, false, 1),
            item(2, "b", 90.0, 10.0, true, 1),
            item(3, "c", 10.0, 30.0, true, 1),
            item(4, "d", 5.0, 30.0, true, 1),
        ];
        items.sort_by(|a, b| compare_items(a, b, DEFAULT_ORDER));
        let ids: Vec<RecordId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_concepts_are_and_of_ors() {
        let mut criteria = SearchCriteria::default();
        criteria.add_concept(concept("remeras", &["remera", "camiseta"]));
        criteria.add_concept(concept("negras", &["negra", "negro"]));

        assert!(criteria.matches(&item(1, "Camiseta Negra Básica", 10.0, 0.0, false, 1)));
        assert!(!criteria.matches(&item(2, "Remera Blanca", 10.0, 0.0, false, 1)));
        assert_eq!(criteria.expanded_terms.len(), 4);
    }

    #[test]
    fn test_filters() {
        let criteria = SearchCriteria {
            category_id: Some(1),
            require_stock: true,
            require_offer: true,
            ..Default::default()
        };
        assert!(criteria.matches(&item(1, "x", 1.0, 0.0, true, 3)));
        assert!(!criteria.matches(&item(2, "x", 1.0, 20.0, false, 3)));
        assert!(!criteria.matches(&item(3, "x", 1.0, 0.0, true, 0)));

        let other = SearchCriteria { category_id: Some(9), ..Default::default() };
        assert!(!other.matches(&item(4, "x", 1.0, 0.0, true, 3)));
    }

    #[test]
    fn test_on_sale() {
        assert!(item(1, "x", 1.0, 0.0, true, 1).on_sale());
        assert!(item(2, "x", 1.0, 15.0, false, 1).on_sale());
        assert!(!item(3, "x", 1.0, 0.0, false, 1).on_sale());
    }

    #[tokio::test]
    async fn test_in_memory_catalog_from_json() {
        let catalog = InMemoryCatalog::from_json(
            r#"{
                "categories": [
                    {"id": 1, "name": "Indumentaria"},
                    {"id": 2, "name": "Archivo", "active": false}
                ],
                "items": [
                    {"id": 10, "name": "Remera lisa", "price": 100.0, "stock": 2,
                     "category": {"id": 1, "name": "Indumentaria"}},
                    {"id": 11, "name": "Remera estampada", "price": 80.0, "isOffer": true,
                     "discount": 10.0, "stock": 0, "category": {"id": 1, "name": "Indumentaria"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.list_categories(true).await.unwrap().len(), 1);
        assert_eq!(catalog.list_categories(false).await.unwrap().len(), 2);

        let found = catalog
            .search_items(&SearchCriteria::default(), 10, DEFAULT_ORDER)
            .await
            .unwrap();
        assert_eq!(found[0].id, 11);

        let in_stock = SearchCriteria { require_stock: true, ..Default::default() };
        let found = catalog.search_items(&in_stock, 1, DEFAULT_ORDER).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 10);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            InMemoryCatalog::from_json("not json"),
            Err(AssistantError::FileParse { kind: "catalog", .. })
        ));
    }
}
