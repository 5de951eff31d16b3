//! Concrete embedding models.
//!
//! [`HashingEmbedder`] is a dependency-free stand-in for a transformer
//! encoder: it hashes word tokens into a fixed number of signed buckets, so
//! courses sharing vocabulary land close together. [`DeadlineModel`] bounds
//! the latency of any model and [`UnavailableModel`] forces the fallback
//! path.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use coursewise_core::{EmbeddingError, EmbeddingModel, EmbeddingVector};
use log::debug;

/// Output dimension of [`HashingEmbedder::default`].
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Feature-hashing bag-of-words embedder.
///
/// Tokens are maximal runs of alphanumeric characters, lower-cased. Each
/// token adds `+1` or `-1` to one bucket chosen by its FNV-1a hash; the
/// vector is then L2-normalised. Text without tokens embeds to the zero
/// vector, which has zero similarity to everything.
///
/// # Examples
/// ```
/// use coursewise_core::EmbeddingModel;
/// use coursewise_scorer::HashingEmbedder;
///
/// let vectors = HashingEmbedder::default().embed(&["Intro to Rust", "intro TO rust!"])?;
/// assert_eq!(vectors[0], vectors[1]);
/// # Ok::<(), coursewise_core::EmbeddingError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dimension` buckets.
    ///
    /// A zero dimension is raised to one.
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension: if dimension == 0 { 1 } else { dimension },
        }
    }

    /// Output dimension.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "bucket accumulation and L2 normalisation are floating point"
    )]
    fn embed_one(&self, text: &str) -> EmbeddingVector {
        let mut buckets = vec![0.0_f32; self.dimension];
        let width = u64::try_from(self.dimension).unwrap_or(u64::MAX);
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            let hash = fnv1a(&token.to_lowercase());
            let slot = hash
                .checked_rem(width)
                .and_then(|slot| usize::try_from(slot).ok())
                .and_then(|slot| buckets.get_mut(slot));
            if let Some(bucket) = slot {
                *bucket += if hash >> 63 == 0 { 1.0_f32 } else { -1.0_f32 };
            }
        }
        let norm = buckets.iter().map(|value| value * value).sum::<f32>().sqrt();
        if norm > 0.0_f32 {
            for value in &mut buckets {
                *value /= norm;
            }
        }
        EmbeddingVector::new(buckets)
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMENSION)
    }
}

impl EmbeddingModel for HashingEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

/// Model that is never loaded. Every request is served by the fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnavailableModel {
    reason: String,
}

impl UnavailableModel {
    /// Create a model reporting `reason` on every call.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl EmbeddingModel for UnavailableModel {
    fn embed(&self, _texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        let reason = if self.reason.is_empty() {
            "embedding model disabled"
        } else {
            self.reason.as_str()
        };
        Err(EmbeddingError::unavailable(reason))
    }
}

type EmbedResult = Result<Vec<EmbeddingVector>, EmbeddingError>;

/// A batch queued for the worker, with the instant its caller stops waiting.
struct EmbedJob {
    texts: Vec<String>,
    deadline: Option<Instant>,
    reply: mpsc::Sender<EmbedResult>,
}

/// Wraps a model so a batch that takes longer than `timeout` fails with
/// [`EmbeddingError::ModelUnavailable`].
///
/// Batches run one at a time on a single long-lived worker thread, started on
/// first use and restarted if it dies. A hung model therefore pins at most
/// one thread: later batches queue behind it and time out. Queued batches
/// whose deadline has already passed are skipped rather than embedded, and a
/// result that arrives after its caller gave up is dropped, not cached.
#[derive(Debug)]
pub struct DeadlineModel<M> {
    inner: Arc<M>,
    timeout: Duration,
    worker: Mutex<Option<mpsc::Sender<EmbedJob>>>,
}

impl<M> DeadlineModel<M> {
    /// Wrap `inner` with a per-batch `timeout`.
    #[must_use]
    pub fn new(inner: M, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
            worker: Mutex::new(None),
        }
    }

    /// Configured per-batch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<M> DeadlineModel<M>
where
    M: EmbeddingModel + 'static,
{
    fn submit(&self, job: EmbedJob) -> Result<(), EmbeddingError> {
        let mut slot = self
            .worker
            .lock()
            .map_err(|_| EmbeddingError::unavailable("embedding worker lock poisoned"))?;
        let pending = match slot.as_ref() {
            Some(sender) => match sender.send(job) {
                Ok(()) => return Ok(()),
                Err(mpsc::SendError(returned)) => returned,
            },
            None => job,
        };
        let sender = spawn_worker(Arc::clone(&self.inner))?;
        sender
            .send(pending)
            .map_err(|_| EmbeddingError::unavailable("embedding worker exited on start"))?;
        *slot = Some(sender);
        Ok(())
    }
}

fn spawn_worker<M>(model: Arc<M>) -> Result<mpsc::Sender<EmbedJob>, EmbeddingError>
where
    M: EmbeddingModel + 'static,
{
    let (jobs, queue) = mpsc::channel::<EmbedJob>();
    thread::Builder::new()
        .name("coursewise-embed".to_owned())
        .spawn(move || {
            for job in queue {
                if job.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    debug!("skipping an embedding batch whose caller already gave up");
                    continue;
                }
                let refs: Vec<&str> = job.texts.iter().map(String::as_str).collect();
                if job.reply.send(model.embed(&refs)).is_err() {
                    debug!("embedding finished after the caller gave up; result dropped");
                }
            }
        })
        .map_err(|err| EmbeddingError::unavailable(format!("cannot start worker: {err}")))?;
    Ok(jobs)
}

impl<M> EmbeddingModel for DeadlineModel<M>
where
    M: EmbeddingModel + 'static,
{
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        let (reply, response) = mpsc::channel();
        self.submit(EmbedJob {
            texts: texts.iter().map(|text| (*text).to_owned()).collect(),
            deadline: Instant::now().checked_add(self.timeout),
            reply,
        })?;

        match response.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(EmbeddingError::unavailable(format!(
                "embedding timed out after {} ms",
                self.timeout.as_millis()
            ))),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EmbeddingError::unavailable(
                "embedding worker exited without a result",
            )),
        }
    }
}
