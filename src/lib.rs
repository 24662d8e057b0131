//! Storefront Assistant - intent classification and query expansion for shopper messages
//!
//! Takes a free-text message from a shopper ("hola, tienen remeras en oferta?")
//! and produces:
//! - an intent: products, payments, shipping, categories or invalid
//! - an expanded catalog search (singular/plural and synonym variants)
//! - a reply, worded by fixed templates or by an optional phrasing collaborator
//!
//! # Pipeline
//! message → [`text`] normalization → [`classifier`] → route table in
//! [`assistant`] → [`category`] resolution and [`expand`] → catalog adapter →
//! [`render`] / [`compose`] → [`AssistantReply`]
//!
//! Everything is keyword and heuristic based; the vocabulary lives in [`lexicon`].

pub mod assistant;
pub mod catalog;
pub mod category;
pub mod classifier;
pub mod compose;
pub mod config;
pub mod error;
pub mod expand;
pub mod keywords;
pub mod lexicon;
pub mod render;
pub mod synonyms;
pub mod text;

pub use assistant::{Assistant, AssistantReply, ReplyMeta, Route};
pub use catalog::{
    CatalogItem, CatalogQueryAdapter, CategoryRecord, CategoryRef, InMemoryCatalog, OrderBy, RecordId,
    SearchConcept, SearchCriteria,
};
pub use classifier::{classify, ClassificationResult, Intent, IntentScores};
pub use config::{AssistantConfig, PaymentMethod};
pub use error::AssistantError;
pub use render::{PhrasingCollaborator, PhrasingContext, ReplyRenderer};
pub use text::{normalize, to_plural, to_singular, CanonicalText};
