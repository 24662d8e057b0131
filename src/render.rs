//! Reply rendering for catalog results.
//!
//! Two renderers implement [`ReplyRenderer`]: the [`crate::compose::DeterministicComposer`]
//! and [`PhrasedRenderer`], which wraps an optional external phrasing
//! collaborator. The orchestrator tries renderers in order and uses the first
//! text it gets back.

use crate::catalog::{CatalogItem, CategoryRecord};
use crate::error::AssistantError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// What a catalog reply is about
#[derive(Debug, Clone, Copy)]
pub enum ReplySubject<'a> {
    /// General product search results
    Products { items: &'a [CatalogItem] },
    /// Kinds of products found inside one category
    CategoryTypes {
        category: &'a CategoryRecord,
        items: &'a [CatalogItem],
    },
}

impl<'a> ReplySubject<'a> {
    pub fn items(&self) -> &'a [CatalogItem] {
        match *self {
            ReplySubject::Products { items } => items,
            ReplySubject::CategoryTypes { items, .. } => items,
        }
    }

    pub fn category_name(&self) -> Option<&'a str> {
        match *self {
            ReplySubject::Products { .. } => None,
            ReplySubject::CategoryTypes { category, .. } => Some(category.name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// The shopper's message as typed
    pub message: &'a str,
    pub subject: ReplySubject<'a>,
}

#[async_trait]
pub trait ReplyRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reply text, or `None` to let the next renderer try.
    async fn render(&self, input: &RenderInput<'_>) -> Option<String>;
}

/// Context handed to the phrasing collaborator alongside the item sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhrasingContext {
    pub category_name: Option<String>,
}

/// External component that rewords results into natural prose.
///
/// Only the sample it receives may be described; it is never a source of facts.
#[async_trait]
pub trait PhrasingCollaborator: Send + Sync {
    async fn summarize(
        &self,
        message: &str,
        sample: &[CatalogItem],
        context: &PhrasingContext,
    ) -> Result<Option<String>, AssistantError>;
}

/// Renderer backed by a [`PhrasingCollaborator`], bounded by a timeout.
pub struct PhrasedRenderer {
    collaborator: Arc<dyn PhrasingCollaborator>,
    sample_size: usize,
    timeout: Duration,
}

impl PhrasedRenderer {
    pub fn new(collaborator: Arc<dyn PhrasingCollaborator>, sample_size: usize, timeout: Duration) -> Self {
        Self {
            collaborator,
            sample_size,
            timeout,
        }
    }

    async fn phrase(&self, input: &RenderInput<'_>) -> Result<Option<String>, AssistantError> {
        let items = input.subject.items();
        let sample = &items[..items.len().min(self.sample_size)];
        let context = PhrasingContext {
            category_name: input.subject.category_name().map(str::to_string),
        };
        tokio::time::timeout(self.timeout, self.collaborator.summarize(input.message, sample, &context))
            .await
            .map_err(|_| AssistantError::PhrasingTimeout(self.timeout.as_millis() as u64))?
    }
}

#[async_trait]
impl ReplyRenderer for PhrasedRenderer {
    fn name(&self) -> &'static str {
        "phrasing"
    }

    async fn render(&self, input: &RenderInput<'_>) -> Option<String> {
        // Empty results are always worded by the deterministic composer.
        if input.subject.items().is_empty() {
            return None;
        }
        match self.phrase(input).await {
            Ok(Some(text)) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                debug!("Phrasing collaborator returned no text, using fallback");
                None
            }
            Err(e) => {
                warn!("Phrasing failed, using deterministic reply: {}", e);
                None
            }
        }
    }
}

/// Try each renderer in order; the last one is expected to always answer.
pub async fn render_first(renderers: &[Box<dyn ReplyRenderer>], input: &RenderInput<'_>) -> String {
    for renderer in renderers {
        if let Some(text) = renderer.render(input).await {
            debug!("Reply rendered by {}", renderer.name());
            return text;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryRef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn items(n: usize) -> Vec<CatalogItem> {
        (0..n)
            .map(|i| CatalogItem {
                id: i as u64,
                name: format!("Remera {}", i),
                description: String::new(),
                price: 100.0,
                discount: 0.0,
                is_offer: false,
                stock: 1,
                image_path: None,
                category: Some(CategoryRef { id: 1, name: "Indumentaria".into() }),
            })
            .collect()
    }

    struct Scripted {
        reply: Result<Option<String>, ()>,
        delay: Duration,
        seen_sample: AtomicUsize,
    }

    impl Scripted {
        fn new(reply: Result<Option<String>, ()>) -> Self {
            Self {
                reply,
                delay: Duration::ZERO,
                seen_sample: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PhrasingCollaborator for Scripted {
        async fn summarize(
            &self,
            _message: &str,
            sample: &[CatalogItem],
            _context: &PhrasingContext,
        ) -> Result<Option<String>, AssistantError> {
            self.seen_sample.store(sample.len(), Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply
                .clone()
                .map_err(|_| AssistantError::Phrasing("model unavailable".into()))
        }
    }

    fn renderer(scripted: Arc<Scripted>) -> PhrasedRenderer {
        PhrasedRenderer::new(scripted, 3, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_uses_collaborator_text_and_truncates_sample() {
        let scripted = Arc::new(Scripted::new(Ok(Some("¡Tenemos remeras!".into()))));
        let items = items(10);
        let input = RenderInput {
            message: "remeras",
            subject: ReplySubject::Products { items: &items },
        };
        let text = renderer(scripted.clone()).render(&input).await;
        assert_eq!(text.as_deref(), Some("¡Tenemos remeras!"));
        assert_eq!(scripted.seen_sample.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_declines_on_empty_failure_or_blank() {
        let items = items(2);
        let input = RenderInput {
            message: "remeras",
            subject: ReplySubject::Products { items: &items },
        };
        for reply in [Ok(None), Ok(Some("   ".to_string())), Err(())] {
            let scripted = Arc::new(Scripted::new(reply));
            assert!(renderer(scripted).render(&input).await.is_none());
        }

        let empty: Vec<CatalogItem> = Vec::new();
        let input = RenderInput {
            message: "remeras",
            subject: ReplySubject::Products { items: &empty },
        };
        let scripted = Arc::new(Scripted::new(Ok(Some("inventado".into()))));
        assert!(renderer(scripted).render(&input).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_declines() {
        let mut scripted = Scripted::new(Ok(Some("tarde".into())));
        scripted.delay = Duration::from_secs(5);
        let items = items(1);
        let input = RenderInput {
            message: "remeras",
            subject: ReplySubject::Products { items: &items },
        };
        assert!(renderer(Arc::new(scripted)).render(&input).await.is_none());
    }

    #[test]
    fn test_subject_category_name() {
        let category = CategoryRecord::new(1, "Indumentaria");
        let items = items(1);
        let subject = ReplySubject::CategoryTypes { category: &category, items: &items };
        assert_eq!(subject.category_name(), Some("Indumentaria"));
        assert_eq!(subject.items().len(), 1);
    }
}
