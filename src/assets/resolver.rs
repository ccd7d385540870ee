use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::assets::fallback::{FallbackRenderer, OmitOverlay};
use crate::assets::store::{AssetStore, PreparedImage};
use crate::foundation::error::AssetLoadFailure;

/// Asset name of the full-bleed frame overlay.
pub const FRAME_ASSET: &str = "frame";
/// Asset name of the logo overlay.
pub const LOGO_ASSET: &str = "logo";

/// Lifecycle of one named overlay asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetState {
    /// Never requested, or invalidated.
    Idle,
    /// A load is in flight; further requests share it.
    Loading,
    /// Decoded and cached.
    Loaded,
    /// Load failed; the fallback is used on every request.
    Failed(String),
}

/// What the compositor draws for an overlay.
#[derive(Clone, Debug)]
pub enum ResolvedOverlay {
    /// The decoded asset.
    Image(PreparedImage),
    /// The asset is unavailable; draw `renderer` instead.
    Fallback {
        /// Why the asset is unavailable.
        reason: String,
        /// Procedural stand-in.
        renderer: Arc<dyn FallbackRenderer>,
    },
}

type PendingLoad = Shared<BoxFuture<'static, Result<PreparedImage, AssetLoadFailure>>>;

enum Slot {
    Loading { generation: u64, load: PendingLoad },
    Loaded(PreparedImage),
    Failed(AssetLoadFailure),
}

#[derive(Default)]
struct Slots {
    entries: HashMap<String, Slot>,
    next_generation: u64,
}

/// Resolves named overlay assets to decoded images or procedural fallbacks.
///
/// Each name moves `Idle -> Loading -> Loaded | Failed` at most once until invalidated.
/// Concurrent requests for a name that is loading await the same pending load, so the store is
/// hit once per name.
pub struct OverlayResolver {
    store: Arc<dyn AssetStore>,
    timeout: Duration,
    slots: Mutex<Slots>,
    fallbacks: HashMap<String, Arc<dyn FallbackRenderer>>,
}

impl std::fmt::Debug for OverlayResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayResolver")
            .field("timeout", &self.timeout)
            .field("fallbacks", &self.fallbacks.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl OverlayResolver {
    /// Resolver over `store`; every load is bounded by `timeout`.
    pub fn new(store: Arc<dyn AssetStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            slots: Mutex::new(Slots::default()),
            fallbacks: HashMap::new(),
        }
    }

    /// Use `renderer` when `name` is unavailable. Names without one are omitted.
    pub fn with_fallback(
        mut self,
        name: impl Into<String>,
        renderer: Arc<dyn FallbackRenderer>,
    ) -> Self {
        self.fallbacks.insert(name.into(), renderer);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state of `name`.
    pub fn state(&self, name: &str) -> AssetState {
        match self.lock().entries.get(name) {
            None => AssetState::Idle,
            Some(Slot::Loading { .. }) => AssetState::Loading,
            Some(Slot::Loaded(_)) => AssetState::Loaded,
            Some(Slot::Failed(f)) => AssetState::Failed(f.reason.clone()),
        }
    }

    /// Return `name` to `Idle` so the next request loads it again.
    ///
    /// A load still in flight for the old entry completes for its waiters but is not cached.
    pub fn invalidate(&self, name: &str) {
        if self.lock().entries.remove(name).is_some() {
            tracing::debug!(asset = name, "overlay invalidated");
        }
    }

    /// Resolve `name`, loading it on first use. Never fails: unavailable assets resolve to their
    /// fallback renderer.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> ResolvedOverlay {
        let (generation, load) = {
            let mut slots = self.lock();
            match slots.entries.get(name) {
                Some(Slot::Loaded(image)) => {
                    tracing::debug!("overlay cache hit");
                    return ResolvedOverlay::Image(image.clone());
                }
                Some(Slot::Failed(failure)) => return self.fallback(name, failure),
                Some(Slot::Loading { generation, load }) => (*generation, load.clone()),
                None => {
                    tracing::debug!(timeout = ?self.timeout, "overlay load start");
                    let generation = slots.next_generation;
                    slots.next_generation += 1;
                    let load = self.start_load(name);
                    slots.entries.insert(
                        name.to_owned(),
                        Slot::Loading {
                            generation,
                            load: load.clone(),
                        },
                    );
                    (generation, load)
                }
            }
        };

        let outcome = load.await;
        self.settle(name, generation, &outcome);
        match outcome {
            Ok(image) => ResolvedOverlay::Image(image),
            Err(failure) => self.fallback(name, &failure),
        }
    }

    fn start_load(&self, name: &str) -> PendingLoad {
        let load = self.store.load(name);
        let timeout = self.timeout;
        async move {
            match tokio::time::timeout(timeout, load).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AssetLoadFailure::new(format!(
                    "timed out after {} ms",
                    timeout.as_millis()
                ))),
            }
        }
        .boxed()
        .shared()
    }

    // Records the terminal state unless the entry was invalidated or replaced meanwhile.
    fn settle(
        &self,
        name: &str,
        generation: u64,
        outcome: &Result<PreparedImage, AssetLoadFailure>,
    ) {
        let mut slots = self.lock();
        let current = matches!(
            slots.entries.get(name),
            Some(Slot::Loading { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        let slot = match outcome {
            Ok(image) => Slot::Loaded(image.clone()),
            Err(failure) => Slot::Failed(failure.clone()),
        };
        slots.entries.insert(name.to_owned(), slot);
    }

    fn fallback(&self, name: &str, failure: &AssetLoadFailure) -> ResolvedOverlay {
        tracing::warn!(
            asset = name,
            reason = %failure.reason,
            "overlay unavailable, using fallback"
        );
        let renderer = self
            .fallbacks
            .get(name)
            .cloned()
            .unwrap_or_else(|| Arc::new(OmitOverlay) as Arc<dyn FallbackRenderer>);
        ResolvedOverlay::Fallback {
            reason: failure.reason.clone(),
            renderer,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
