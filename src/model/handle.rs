//! Lazily-initialized, concurrency-safe ownership of the inference model.
//!
//! The handle owns at most one loaded model instance per process and
//! guarantees the expensive load executes exactly once under concurrent
//! first use. It is an explicitly constructed, dependency-injected service
//! object: callers hold a handle, there is no ambient global.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::Tensor4D;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

/// A loaded model serving synchronous forward passes.
///
/// Implementations must be immutable once constructed; `predict` holds no
/// per-call state in the handle.
pub trait InferenceModel: Send + Sync {
    /// Computes the softmax probability vector for a single-image batch.
    fn predict(&self, batch: &Tensor4D) -> ClassifyResult<Vec<f32>>;
}

/// Produces a model instance on demand.
///
/// The loader is the seam between the handle's lifecycle logic and the
/// actual artifact: production code plugs in the ONNX-backed loader, tests
/// plug in counting or stub doubles.
pub trait ModelLoader: Send + Sync {
    /// The model type this loader produces.
    type Model: InferenceModel + 'static;

    /// Loads the model. Called at most once per successful initialization.
    fn load(&self) -> ClassifyResult<Self::Model>;
}

/// Shared, lazily-initialized slot for the loaded model.
///
/// Lifecycle: `Uninitialized -> Loading -> Ready`. `Ready` is terminal for
/// the process lifetime unless [`ModelHandle::clear`] is called. A failed
/// load leaves the slot `Uninitialized` so the next caller retries; failures
/// are surfaced to the triggering caller and never cached.
pub struct ModelHandle<L: ModelLoader> {
    loader: L,
    slot: RwLock<Option<Arc<L::Model>>>,
}

impl<L: ModelLoader> std::fmt::Debug for ModelHandle<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl<L: ModelLoader> ModelHandle<L> {
    /// Creates an empty handle around the given loader. No load happens
    /// until the first [`ModelHandle::get`] call.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slot: RwLock::new(None),
        }
    }

    /// Gets the loaded model, loading it on first use.
    ///
    /// Under N simultaneous first callers exactly one performs the load;
    /// the rest block on the write lock and then observe the same instance
    /// via the re-check. Once `Ready`, calls take the read-lock fast path
    /// only.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error to the caller that triggered loading;
    /// the handle stays empty so a later call can retry.
    pub fn get(&self) -> ClassifyResult<Arc<L::Model>> {
        // Fast path: model already loaded.
        {
            let slot = self.slot.read().map_err(Self::poisoned)?;
            if let Some(model) = slot.as_ref() {
                return Ok(Arc::clone(model));
            }
        }

        // Slow path: take the write lock and re-check before loading, so
        // concurrent first callers load at most once.
        let mut slot = self.slot.write().map_err(Self::poisoned)?;
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        info!("model not loaded yet, loading now");
        let model = self.loader.load().map_err(|e| {
            error!("model load failed: {e}");
            e
        })?;
        info!("model loaded and cached for the process lifetime");

        let model = Arc::new(model);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Whether the handle currently holds a loaded model.
    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Administrative reset: drops the cached model, returning the handle
    /// to `Uninitialized`. The next `get` call loads again.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            if slot.take().is_some() {
                debug!("cached model cleared");
            }
        }
    }

    fn poisoned<G>(_: std::sync::PoisonError<G>) -> ClassifyError {
        ClassifyError::config("model handle lock poisoned")
    }
}
