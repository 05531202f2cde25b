// file: src/pipeline/testing.rs
// description: provider fakes that count calls and force failures
// reference: internal test support

use crate::error::{CompletionServiceError, EmbeddingServiceError, ProviderErrorKind};
use crate::providers::{
    CompletionProvider, CompletionRequest, EmbeddingProvider, ExtractiveCompleter, HashingEmbedder,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) struct FakeEmbedder {
    inner: HashingEmbedder,
    failure: Option<ProviderErrorKind>,
    texts_embedded: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl FakeEmbedder {
    pub(crate) fn working() -> Self {
        Self {
            inner: HashingEmbedder::new(128),
            failure: None,
            texts_embedded: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(kind: ProviderErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::working()
        }
    }

    pub(crate) fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }

    pub(crate) fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    fn name(&self) -> &str {
        "fake"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
        if let Some(kind) = self.failure {
            return Err(EmbeddingServiceError::new(kind, "forced failure"));
        }
        self.texts_embedded.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingServiceError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

enum Reply {
    Fixed(String),
    Extractive(ExtractiveCompleter),
    Fail(ProviderErrorKind),
}

pub(crate) struct FakeCompleter {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl FakeCompleter {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn replying(answer: &str) -> Self {
        Self::with_reply(Reply::Fixed(answer.to_string()))
    }

    pub(crate) fn extractive() -> Self {
        Self::with_reply(Reply::Extractive(ExtractiveCompleter::new()))
    }

    pub(crate) fn failing(kind: ProviderErrorKind) -> Self {
        Self::with_reply(Reply::Fail(kind))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompleter {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.reply {
            Reply::Fixed(answer) => Ok(answer.clone()),
            Reply::Extractive(completer) => completer.complete(request).await,
            Reply::Fail(kind) => Err(CompletionServiceError::new(*kind, "forced failure")),
        }
    }
}
