//! Deterministic test doubles for clocks and embedding models, used by unit,
//! behaviour and property tests across the workspace.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::{Clock, EmbeddingError, EmbeddingModel, EmbeddingVector};

/// [`Clock`] that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Start the clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += step;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now
            .lock()
            .map_or_else(|poisoned| *poisoned.into_inner(), |now| *now)
    }
}

/// Model that returns pre-registered vectors keyed by input text.
///
/// Unknown texts receive `fallback`, so tests only register the texts whose
/// geometry matters.
#[derive(Debug, Clone)]
pub struct LookupModel {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl LookupModel {
    /// Create a model answering unknown texts with `fallback`.
    #[must_use]
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
        }
    }

    /// Register a vector for `text` while returning `self`.
    #[must_use]
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }
}

impl EmbeddingModel for LookupModel {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let values = self.vectors.get(*text).unwrap_or(&self.fallback);
                EmbeddingVector::new(values.clone())
            })
            .collect())
    }
}

/// Model that always reports itself unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingModel;

impl EmbeddingModel for FailingModel {
    fn embed(&self, _texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Err(EmbeddingError::unavailable("model not loaded"))
    }
}

/// Wrapper recording how often, and with how many texts, a model is called.
#[derive(Debug, Default)]
pub struct CountingModel<M> {
    inner: M,
    calls: AtomicUsize,
    texts: AtomicUsize,
    last_batch: Mutex<Vec<String>>,
}

impl<M> CountingModel<M> {
    /// Wrap `inner`.
    #[must_use]
    pub const fn new(inner: M) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
            last_batch: Mutex::new(Vec::new()),
        }
    }

    /// Number of `embed` calls observed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total number of texts embedded across calls.
    #[must_use]
    pub fn texts(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }

    /// Texts sent in the most recent call.
    #[must_use]
    pub fn last_batch(&self) -> Vec<String> {
        self.last_batch
            .lock()
            .map(|batch| batch.clone())
            .unwrap_or_default()
    }
}

impl<M: EmbeddingModel> EmbeddingModel for CountingModel<M> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        if let Ok(mut batch) = self.last_batch.lock() {
            *batch = texts.iter().map(|text| (*text).to_owned()).collect();
        }
        self.inner.embed(texts)
    }
}
