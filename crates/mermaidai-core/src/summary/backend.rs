//! SummaryBackend trait and its object-safe wrapper.
//!
//! Follows the same blanket-impl pattern used for every dynamically
//! selected port in this crate:
//! 1. Define an object-safe `SummaryBackendDyn` trait with boxed futures
//! 2. Blanket-impl `SummaryBackendDyn` for all `T: SummaryBackend`
//! 3. `BoxSummaryBackend` wraps `Box<dyn SummaryBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use mermaidai_types::error::SummarizeError;
use mermaidai_types::llm::{ChatCompletion, ChatRequest};

/// A text-completion service able to answer summarization prompts.
///
/// Implementations live in mermaidai-infra (the `/summarize` HTTP endpoint
/// and the direct OpenAI client).
pub trait SummaryBackend: Send + Sync {
    /// Send a chat-completion request and return the raw completion.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatCompletion, SummarizeError>> + Send;
}

/// Object-safe version of [`SummaryBackend`] with boxed futures.
pub trait SummaryBackendDyn: Send + Sync {
    fn complete_boxed<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChatCompletion, SummarizeError>> + Send + 'a>>;
}

impl<T: SummaryBackend> SummaryBackendDyn for T {
    fn complete_boxed<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChatCompletion, SummarizeError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased summary backend for runtime backend selection.
pub struct BoxSummaryBackend {
    inner: Box<dyn SummaryBackendDyn + Send + Sync>,
}

impl BoxSummaryBackend {
    /// Wrap a concrete `SummaryBackend` in a type-erased box.
    pub fn new<T: SummaryBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Send a chat-completion request and return the raw completion.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, SummarizeError> {
        self.inner.complete_boxed(request).await
    }
}

impl std::fmt::Debug for BoxSummaryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxSummaryBackend").finish_non_exhaustive()
    }
}
