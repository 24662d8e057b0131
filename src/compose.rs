//! Deterministic reply texts.
//!
//! Every reply the assistant can give has a fixed-template version here. The
//! catalog-backed ones double as the fallback when phrasing is unavailable.

use crate::catalog::{CatalogItem, CategoryRecord};
use crate::config::AssistantConfig;
use crate::lexicon::{is_brand, is_stopword};
use crate::render::{RenderInput, ReplyRenderer, ReplySubject};
use crate::text::{to_singular, CanonicalText, MIN_TOKEN_LEN};
use async_trait::async_trait;
use std::collections::HashMap;

pub const CLARIFY_REPLY: &str = "No estoy seguro de haber entendido tu consulta. \
Podés preguntarme por productos, categorías, medios de pago o envíos.";

pub const INTERNAL_ERROR_REPLY: &str =
    "Ocurrió un error interno al procesar tu consulta. Por favor, intentá de nuevo en unos minutos.";

const NO_PRODUCTS_REPLY: &str = "No encontré productos que coincidan con tu búsqueda. \
Probá con otras palabras o preguntame qué categorías tenemos.";

/// Most frequent product nouns in item names, singular, most common first.
///
/// Ties keep the order in which the nouns first appear.
pub fn frequent_nouns(items: &[CatalogItem], limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next_index = 0;
    for item in items {
        let name = CanonicalText::new(&item.name);
        for token in name.tokens() {
            if token.chars().count() < MIN_TOKEN_LEN
                || token.chars().all(|c| c.is_ascii_digit())
                || is_stopword(token)
                || is_brand(token)
            {
                continue;
            }
            let entry = counts.entry(to_singular(token)).or_insert_with(|| {
                next_index += 1;
                (0, next_index)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (ca, ia)), (_, (cb, ib))| cb.cmp(ca).then(ia.cmp(ib)));
    ranked.into_iter().take(limit).map(|(noun, _)| noun).collect()
}

/// Fixed-template replies built from configuration and catalog results.
#[derive(Debug, Clone, Default)]
pub struct DeterministicComposer {
    config: AssistantConfig,
}

impl DeterministicComposer {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }

    pub fn products(&self, items: &[CatalogItem]) -> String {
        if items.is_empty() {
            return NO_PRODUCTS_REPLY.to_string();
        }
        let mut text = format!("Encontré {} productos.", items.len());
        let on_sale = items.iter().filter(|i| i.on_sale()).count();
        if on_sale > 0 {
            text.push_str(&format!(" Hay {} en oferta.", on_sale));
        }
        text
    }

    pub fn category_types(&self, category: &CategoryRecord, items: &[CatalogItem]) -> String {
        if items.is_empty() {
            return format!("No encontré productos en la categoría {} por el momento.", category.name);
        }
        let nouns = frequent_nouns(items, self.config.type_summary_size);
        if nouns.is_empty() {
            format!("En {} tenemos varios tipos de productos.", category.name)
        } else {
            format!("En {} tenemos: {}.", category.name, nouns.join(", "))
        }
    }

    pub fn categories(&self, categories: &[CategoryRecord]) -> String {
        if categories.is_empty() {
            return "Por el momento no hay categorías disponibles.".to_string();
        }
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        format!("Estas son nuestras categorías: {}.", names.join(", "))
    }

    pub fn payments(&self) -> String {
        let methods = &self.config.payment_methods;
        if methods.is_empty() {
            return "Consultanos por los medios de pago disponibles.".to_string();
        }
        let labels: Vec<&str> = methods.iter().map(|m| m.label.as_str()).collect();
        let mut text = format!("Aceptamos estos medios de pago: {}.", labels.join(", "));
        if self.config.offers_installments() {
            let with_installments: Vec<&str> = methods
                .iter()
                .filter(|m| m.installments)
                .map(|m| m.label.as_str())
                .collect();
            text.push_str(&format!(
                " Con {} podés pagar en cuotas.",
                with_installments.join(" o ")
            ));
        }
        text
    }

    pub fn shipping(&self) -> String {
        let mut text = "Por el momento no realizamos envíos directos.".to_string();
        if !self.config.shipping_alternatives.is_empty() {
            text.push_str(&format!(
                " Como alternativa podés optar por: {}.",
                self.config.shipping_alternatives.join(", ")
            ));
        }
        text
    }
}

#[async_trait]
impl ReplyRenderer for DeterministicComposer {
    fn name(&self) -> &'static str {
        "deterministic"
    }

    async fn render(&self, input: &RenderInput<'_>) -> Option<String> {
        Some(match input.subject {
            ReplySubject::Products { items } => self.products(items),
            ReplySubject::CategoryTypes { category, items } => self.category_types(category, items),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaymentMethod;

    fn item(name: &str, is_offer: bool, discount: f64) -> CatalogItem {
        CatalogItem {
            id: 1,
            name: name.to_string(),
            description: String::new(),
            price: 10.0,
            discount,
            is_offer,
            stock: 1,
            image_path: None,
            category: None,
        }
    }

    #[test]
    fn test_products_summary() {
        let composer = DeterministicComposer::default();
        let items = vec![
            item("Remera lisa", false, 0.0),
            item("Remera estampada", true, 0.0),
            item("Buzo", false, 15.0),
        ];
        assert_eq!(composer.products(&items), "Encontré 3 productos. Hay 2 en oferta.");
        assert_eq!(composer.products(&items[..1]), "Encontré 1 productos.");
        assert_eq!(composer.products(&[]), NO_PRODUCTS_REPLY);
    }

    #[test]
    fn test_frequent_nouns() {
        let items = vec![
            item("Remera Nike 2024", false, 0.0),
            item("Remeras lisas", false, 0.0),
            item("Buzo con capucha", false, 0.0),
            item("Buzo Adidas", false, 0.0),
            item("Remera de algodón", false, 0.0),
            item("Gorra", false, 0.0),
        ];
        let nouns = frequent_nouns(&items, 3);
        assert_eq!(nouns, vec!["remera", "buzo", "lisa"]);
        assert!(frequent_nouns(&items, 20).iter().all(|n| n != "nike" && n != "2024"));
    }

    #[test]
    fn test_category_types_summary() {
        let composer = DeterministicComposer::default();
        let category = CategoryRecord::new(1, "Indumentaria");
        let items = vec![item("Remera", false, 0.0), item("Buzo", false, 0.0)];
        assert_eq!(
            composer.category_types(&category, &items),
            "En Indumentaria tenemos: remera, buzo."
        );
        assert_eq!(
            composer.category_types(&category, &[item("Nike 90", false, 0.0)]),
            "En Indumentaria tenemos varios tipos de productos."
        );
        assert!(composer.category_types(&category, &[]).starts_with("No encontré productos"));
    }

    #[test]
    fn test_payments_with_and_without_installments() {
        let composer = DeterministicComposer::default();
        let text = composer.payments();
        assert!(text.contains("Efectivo"));
        assert!(text.contains("Mercado Pago"));
        assert!(text.contains("cuotas"));

        let config = AssistantConfig {
            payment_methods: vec![PaymentMethod::new("Efectivo", false)],
            ..Default::default()
        };
        let text = DeterministicComposer::new(config).payments();
        assert_eq!(text, "Aceptamos estos medios de pago: Efectivo.");
    }

    #[test]
    fn test_shipping_lists_alternatives() {
        let text = DeterministicComposer::default().shipping();
        assert!(text.starts_with("Por el momento no realizamos envíos directos."));
        assert!(text.contains("retiro en nuestro local"));
        assert!(text.contains("cadete"));
    }

    #[test]
    fn test_categories_list() {
        let composer = DeterministicComposer::default();
        let categories = vec![CategoryRecord::new(1, "Indumentaria"), CategoryRecord::new(2, "Calzado")];
        assert_eq!(
            composer.categories(&categories),
            "Estas son nuestras categorías: Indumentaria, Calzado."
        );
        assert!(composer.categories(&[]).contains("no hay categorías"));
    }
}
