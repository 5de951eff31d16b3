//! Process-wide memo of course embeddings with coarse time-based expiry.
//!
//! The whole cache is dropped once the TTL has elapsed since the previous
//! purge; entries are not expired individually. Embeddings are deterministic
//! for a given model, so a purge only costs recomputation.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use coursewise_core::{
    Clock, Course, CourseId, EmbeddingError, EmbeddingModel, EmbeddingVector, SystemClock,
};
use log::{debug, info};

/// Default time-to-live for the whole cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Text embedded in place of an empty description.
pub const EMPTY_DESCRIPTION_PLACEHOLDER: &str = "No description available";

/// Counters describing cache behaviour since construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that required the model.
    pub misses: u64,
    /// Whole-cache purges triggered by the TTL.
    pub purges: u64,
}

#[derive(Debug)]
struct CacheState {
    entries: HashMap<CourseId, EmbeddingVector>,
    last_clear: Instant,
    stats: CacheStats,
}

/// Memoised course embeddings keyed by course identifier.
///
/// Lookup and insertion each run under one mutex, so a TTL purge is atomic
/// with respect to concurrent readers. The model runs outside the lock; two
/// requests missing the same course may both compute it and the last insert
/// wins, which is harmless because the values are identical.
///
/// # Examples
/// ```
/// use coursewise_core::{Course, CourseId};
/// use coursewise_core::test_support::LookupModel;
/// use coursewise_scorer::EmbeddingCache;
///
/// let cache = EmbeddingCache::new();
/// let model = LookupModel::new(vec![1.0, 0.0]);
/// let course = Course::new(CourseId::new("1").unwrap(), "Python", "Basics", 3);
/// let embeddings = cache.embeddings_for(&model, &[&course]).unwrap();
/// assert_eq!(embeddings.len(), 1);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug)]
pub struct EmbeddingCache<C = SystemClock> {
    clock: C,
    ttl: Duration,
    placeholder: String,
    state: Mutex<CacheState>,
}

impl EmbeddingCache<SystemClock> {
    /// Create an empty cache on the system clock with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for EmbeddingCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EmbeddingCache<C> {
    /// Create an empty cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            ttl: DEFAULT_CACHE_TTL,
            placeholder: EMPTY_DESCRIPTION_PLACEHOLDER.to_owned(),
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                last_clear: now,
                stats: CacheStats::default(),
            }),
        }
    }

    /// Override the time-to-live while returning `self`.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the text embedded for empty descriptions.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Return embeddings for exactly the requested courses.
    ///
    /// Cached vectors are reused; every missing course is embedded in a
    /// single model call and cached. Duplicate identifiers are embedded once.
    ///
    /// # Errors
    /// Propagates [`EmbeddingError`] from the model, and returns
    /// [`EmbeddingError::BatchSizeMismatch`] when the model answers with the
    /// wrong number of vectors. Nothing is cached from a failed call.
    pub fn embeddings_for<M>(
        &self,
        model: &M,
        courses: &[&Course],
    ) -> Result<HashMap<CourseId, EmbeddingVector>, EmbeddingError>
    where
        M: EmbeddingModel + ?Sized,
    {
        let mut found = HashMap::with_capacity(courses.len());
        let mut missing: Vec<&Course> = Vec::new();
        {
            let mut guard = self.lock();
            let state = &mut *guard;
            self.purge_if_stale(state);
            let mut seen = HashSet::with_capacity(courses.len());
            for &course in courses {
                if !seen.insert(&course.id) {
                    continue;
                }
                if let Some(vector) = state.entries.get(&course.id) {
                    found.insert(course.id.clone(), vector.clone());
                    state.stats.hits += 1;
                } else {
                    missing.push(course);
                    state.stats.misses += 1;
                }
            }
        }
        debug!(
            "embedding cache: {} hits, {} misses",
            found.len(),
            missing.len()
        );
        if missing.is_empty() {
            return Ok(found);
        }

        let texts: Vec<&str> = missing
            .iter()
            .map(|course| self.embedding_text(course))
            .collect();
        let vectors = model.embed(&texts)?;
        if vectors.len() != missing.len() {
            return Err(EmbeddingError::BatchSizeMismatch {
                expected: missing.len(),
                actual: vectors.len(),
            });
        }

        let mut state = self.lock();
        for (course, vector) in missing.into_iter().zip(vectors) {
            state.entries.insert(course.id.clone(), vector.clone());
            found.insert(course.id.clone(), vector);
        }
        Ok(found)
    }

    /// Number of cached embeddings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Report whether the cache holds no embeddings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Snapshot of the hit, miss and purge counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Drop every cached embedding and restart the TTL window.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.last_clear = self.clock.now();
    }

    fn embedding_text<'a>(&'a self, course: &'a Course) -> &'a str {
        if course.description.trim().is_empty() {
            &self.placeholder
        } else {
            &course.description
        }
    }

    fn purge_if_stale(&self, state: &mut CacheState) {
        let now = self.clock.now();
        if now.saturating_duration_since(state.last_clear) <= self.ttl {
            return;
        }
        info!(
            "embedding cache TTL of {}s elapsed; purging {} entries",
            self.ttl.as_secs(),
            state.entries.len()
        );
        state.entries.clear();
        state.last_clear = now;
        state.stats.purges += 1;
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
