//! Conversation orchestrator: the single entry point for shopper messages.
//!
//! A message is classified once, then walked through the ordered route table
//! for its intent. Each route has a cheap predicate and a handler; a handler
//! may still decline (for example a fallback search that finds nothing), in
//! which case the next route is tried. Every table ends in a route that
//! always answers.

use crate::catalog::{CatalogQueryAdapter, CategoryRecord, SearchCriteria, DEFAULT_ORDER};
use crate::category::{resolve_category, ResolvedCategory};
use crate::classifier::{classify, ClassificationResult, Intent, IntentScores};
use crate::compose::{frequent_nouns, DeterministicComposer, CLARIFY_REPLY, INTERNAL_ERROR_REPLY};
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::expand::build_criteria;
use crate::lexicon::SHIPPING_HINTS;
use crate::render::{render_first, PhrasedRenderer, PhrasingCollaborator, RenderInput, ReplyRenderer, ReplySubject};
use crate::text::CanonicalText;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

// ============================================================================
// Sub-intent phrase patterns (matched on canonical text)
// ============================================================================

lazy_static! {
    static ref LIST_CATEGORIES_PATTERNS: Vec<Regex> = [
        r"\bque categorias\b",
        r"\bcategorias (hay|tienen|manejan|venden)\b",
        r"\b(cuales son|ver|mostrar|mostrame|listar|lista de|todas) (las )?categorias\b",
        r"\bque (tipos?|clases?) de productos (hay|tienen|venden|manejan)[\s?!.]*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref CATEGORY_TYPES_PATTERNS: Vec<Regex> = [
        r"\bque (tipos?|clases?) de \w+ (hay|tienen|venden|manejan)\b",
        r"\bque (hay|tienen|venden|manejan) (en|de)\b",
        r"\bque (productos|cosas|articulos) (hay|tienen|venden|manejan) (en|de)\b",
        r"\b(tipos?|clases?) de (productos )?(en|de)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

fn any_pattern(patterns: &[Regex], text: &CanonicalText) -> bool {
    patterns.iter().any(|p| p.is_match(text.as_str()))
}

pub fn asks_for_categories(text: &CanonicalText) -> bool {
    any_pattern(&LIST_CATEGORIES_PATTERNS, text)
}

pub fn asks_for_category_types(text: &CanonicalText) -> bool {
    any_pattern(&CATEGORY_TYPES_PATTERNS, text)
}

// ============================================================================
// Reply types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMeta {
    /// Intent reported for this reply; sub-intents report `categories`
    pub category: Intent,
    pub matched_keywords: BTreeSet<String>,
    pub confidence: f64,
    pub scores: IntentScores,
    pub elapsed_ms: u64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Set when a collaborator failed and the generic error reply was returned
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub internal_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub reply_text: String,
    pub payload: Value,
    pub meta: ReplyMeta,
}

impl AssistantReply {
    pub fn has_payload(&self) -> bool {
        match &self.payload {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}

/// What a route produced
#[derive(Debug)]
struct Handled {
    category: Intent,
    reply_text: String,
    payload: Value,
}

impl Handled {
    fn new(category: Intent, reply_text: String, payload: Value) -> Self {
        Self {
            category,
            reply_text,
            payload,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// "qué categorías hay?"
    ListCategories,
    /// "qué tipos de productos hay en X?"
    CategoryTypes,
    /// General product search; always answers
    ProductSearch,
    Payments,
    Shipping,
    /// Product search that only answers when it finds items
    FallbackSearch,
    /// Loose shipping wording on an otherwise unclassified message
    ShippingHint,
    /// Generic clarifying reply; always answers
    Clarify,
}

const PRODUCT_ROUTES: &[Route] = &[Route::ListCategories, Route::CategoryTypes, Route::ProductSearch];
const PAYMENT_ROUTES: &[Route] = &[Route::Payments];
const SHIPPING_ROUTES: &[Route] = &[Route::Shipping];
const FALLBACK_ROUTES: &[Route] = &[
    Route::ListCategories,
    Route::CategoryTypes,
    Route::FallbackSearch,
    Route::ShippingHint,
    Route::Clarify,
];

/// Ordered routes tried for a classified intent.
pub fn routes_for(intent: Intent) -> &'static [Route] {
    match intent {
        Intent::Products | Intent::Categories => PRODUCT_ROUTES,
        Intent::Payments => PAYMENT_ROUTES,
        Intent::Shipping => SHIPPING_ROUTES,
        Intent::Invalid => FALLBACK_ROUTES,
    }
}

impl Route {
    /// Cheap, message-only precondition.
    pub fn applies(&self, text: &CanonicalText) -> bool {
        match self {
            Route::ListCategories => asks_for_categories(text),
            Route::CategoryTypes => asks_for_category_types(text),
            Route::ShippingHint => SHIPPING_HINTS.any_in(text),
            Route::ProductSearch
            | Route::Payments
            | Route::Shipping
            | Route::FallbackSearch
            | Route::Clarify => true,
        }
    }
}

/// Per-message state; categories are fetched at most once.
struct Turn<'a> {
    message: &'a str,
    text: CanonicalText,
    categories: OnceCell<Vec<CategoryRecord>>,
}

impl<'a> Turn<'a> {
    fn new(message: &'a str) -> Self {
        Self {
            message,
            text: CanonicalText::new(message),
            categories: OnceCell::new(),
        }
    }

    async fn categories(&self, catalog: &dyn CatalogQueryAdapter) -> Result<&[CategoryRecord], AssistantError> {
        let categories = self
            .categories
            .get_or_try_init(|| catalog.list_categories(true))
            .await?;
        Ok(categories.as_slice())
    }

    async fn resolved_category(
        &self,
        catalog: &dyn CatalogQueryAdapter,
    ) -> Result<Option<ResolvedCategory>, AssistantError> {
        let categories = self.categories(catalog).await?;
        Ok(resolve_category(&self.text, categories))
    }
}

// ============================================================================
// Assistant
// ============================================================================

pub struct Assistant {
    catalog: Arc<dyn CatalogQueryAdapter>,
    config: AssistantConfig,
    composer: DeterministicComposer,
    renderers: Vec<Box<dyn ReplyRenderer>>,
}

impl Assistant {
    pub fn new(catalog: Arc<dyn CatalogQueryAdapter>, config: AssistantConfig) -> Self {
        let composer = DeterministicComposer::new(config.clone());
        Self {
            catalog,
            renderers: vec![Box::new(composer.clone())],
            composer,
            config,
        }
    }

    /// Let an external collaborator word catalog replies, ahead of the fixed templates.
    pub fn with_phrasing(mut self, collaborator: Arc<dyn PhrasingCollaborator>) -> Self {
        let phrased = PhrasedRenderer::new(
            collaborator,
            self.config.phrasing_sample_size,
            self.config.phrasing_timeout(),
        );
        self.renderers.insert(0, Box::new(phrased));
        self
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Answer one shopper message. Never fails: collaborator errors become the
    /// generic error reply.
    pub async fn handle_message(
        &self,
        message: &str,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> AssistantReply {
        let started = Instant::now();
        let turn = Turn::new(message);
        let classification = classify(&turn.text);

        let (handled, internal_error) = match self.dispatch(&turn, &classification).await {
            Ok(handled) => (handled, false),
            Err(e) => {
                error!(
                    "Failed to handle {} message (collaborator failure: {}): {}",
                    classification.category,
                    e.is_collaborator_failure(),
                    e
                );
                let handled = Handled::new(
                    classification.category,
                    INTERNAL_ERROR_REPLY.to_string(),
                    empty_payload(),
                );
                (handled, true)
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Replied as {} (classified {}, confidence {:.2}) in {}ms",
            handled.category, classification.category, classification.confidence, elapsed_ms
        );

        AssistantReply {
            reply_text: handled.reply_text,
            payload: handled.payload,
            meta: ReplyMeta {
                category: handled.category,
                matched_keywords: classification.matched_keywords,
                confidence: classification.confidence,
                scores: classification.scores,
                elapsed_ms,
                user_id: user_id.map(str::to_string),
                session_id: session_id.map(str::to_string),
                timestamp: Utc::now(),
                internal_error,
            },
        }
    }

    async fn dispatch(
        &self,
        turn: &Turn<'_>,
        classification: &ClassificationResult,
    ) -> Result<Handled, AssistantError> {
        for route in routes_for(classification.category) {
            if !route.applies(&turn.text) {
                continue;
            }
            if let Some(handled) = self.run(*route, turn).await? {
                debug!("Route {:?} handled the message", route);
                return Ok(handled);
            }
            debug!("Route {:?} declined", route);
        }
        Ok(Handled::new(Intent::Invalid, CLARIFY_REPLY.to_string(), empty_payload()))
    }

    async fn run(&self, route: Route, turn: &Turn<'_>) -> Result<Option<Handled>, AssistantError> {
        match route {
            Route::ListCategories => self.list_categories(turn).await.map(Some),
            Route::CategoryTypes => self.category_types(turn).await,
            Route::ProductSearch => self.product_search(turn, false).await,
            Route::FallbackSearch => self.product_search(turn, true).await,
            Route::Payments => Ok(Some(self.payments())),
            Route::Shipping | Route::ShippingHint => Ok(Some(self.shipping())),
            Route::Clarify => Ok(Some(Handled::new(
                Intent::Invalid,
                CLARIFY_REPLY.to_string(),
                empty_payload(),
            ))),
        }
    }

    // ------------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------------

    async fn list_categories(&self, turn: &Turn<'_>) -> Result<Handled, AssistantError> {
        let categories = turn.categories(self.catalog.as_ref()).await?;
        let payload = if categories.is_empty() {
            empty_payload()
        } else {
            let listed: Vec<_> = categories.iter().map(CategoryRecord::to_ref).collect();
            json!({ "categories": listed })
        };
        Ok(Handled::new(
            Intent::Categories,
            self.composer.categories(categories),
            payload,
        ))
    }

    /// Declines when no category can be resolved from the message.
    async fn category_types(&self, turn: &Turn<'_>) -> Result<Option<Handled>, AssistantError> {
        let Some(resolved) = turn.resolved_category(self.catalog.as_ref()).await? else {
            debug!("Category types asked but no category resolved");
            return Ok(None);
        };
        let criteria = SearchCriteria {
            category_id: Some(resolved.record.id),
            ..Default::default()
        };
        let items = self
            .catalog
            .search_items(&criteria, self.config.category_scan_limit, DEFAULT_ORDER)
            .await?;

        let input = RenderInput {
            message: turn.message,
            subject: ReplySubject::CategoryTypes {
                category: &resolved.record,
                items: &items,
            },
        };
        let reply_text = render_first(&self.renderers, &input).await;
        let sample = &items[..items.len().min(self.config.category_sample_size)];
        let payload = if items.is_empty() {
            empty_payload()
        } else {
            json!({
                "category": resolved.record.to_ref(),
                "types": frequent_nouns(&items, self.config.type_summary_size),
                "items": sample,
            })
        };
        Ok(Some(Handled::new(Intent::Categories, reply_text, payload)))
    }

    /// General search. As a fallback it declines unless the message named
    /// something and the catalog returned items.
    async fn product_search(&self, turn: &Turn<'_>, fallback: bool) -> Result<Option<Handled>, AssistantError> {
        let categories = turn.categories(self.catalog.as_ref()).await?;
        let resolved = resolve_category(&turn.text, categories);
        let criteria = build_criteria(&turn.text, categories, resolved.as_ref());
        if fallback && !criteria.has_search_signal() {
            return Ok(None);
        }

        let items = self
            .catalog
            .search_items(&criteria, self.config.search_limit, DEFAULT_ORDER)
            .await?;
        if fallback && items.is_empty() {
            return Ok(None);
        }

        let input = RenderInput {
            message: turn.message,
            subject: ReplySubject::Products { items: &items },
        };
        let reply_text = render_first(&self.renderers, &input).await;
        let payload = if items.is_empty() {
            empty_payload()
        } else {
            json!({
                "items": items,
                "total": items.len(),
                "category": resolved.map(|r| r.record.to_ref()),
                "criteria": criteria,
            })
        };
        Ok(Some(Handled::new(Intent::Products, reply_text, payload)))
    }

    fn payments(&self) -> Handled {
        Handled::new(
            Intent::Payments,
            self.composer.payments(),
            json!({ "paymentMethods": self.config.payment_methods }),
        )
    }

    fn shipping(&self) -> Handled {
        Handled::new(
            Intent::Shipping,
            self.composer.shipping(),
            json!({
                "directShipping": false,
                "alternatives": self.config.shipping_alternatives,
            }),
        )
    }
}
