//! Coverage tracker and sample store wired together.

use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::coverage::{CoverageSummary, CoverageTracker, EdgeMembership, NoveltyKey};
use crate::feature::FeatureVector;
use crate::store::SampleStore;

/// Outcome of offering one feature vector to a [`SampleCollector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The vector touched at least one envelope edge and was stored.
    Accepted {
        key: NoveltyKey,
        /// An earlier sample with the same key was replaced.
        replaced: bool,
    },
    /// The vector lies inside the envelope on every dimension.
    Redundant,
}

impl Observation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Observation::Accepted { .. })
    }

    pub fn key(&self) -> Option<NoveltyKey> {
        match self {
            Observation::Accepted { key, .. } => Some(*key),
            Observation::Redundant => None,
        }
    }
}

/// Online sample selection for one camera setup.
///
/// The tracker is the single source of truth for coverage; the store only
/// holds the exemplars.
#[derive(Clone, Debug)]
pub struct SampleCollector<P> {
    tracker: CoverageTracker,
    store: SampleStore<P>,
}

impl<P> Default for SampleCollector<P> {
    fn default() -> Self {
        Self::new(CoverageTracker::new())
    }
}

impl<P> SampleCollector<P> {
    pub fn new(tracker: CoverageTracker) -> Self {
        Self {
            tracker,
            store: SampleStore::new(),
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self::new(CoverageTracker::with_tolerance(tolerance))
    }

    #[inline]
    pub fn tracker(&self) -> &CoverageTracker {
        &self.tracker
    }

    #[inline]
    pub fn store(&self) -> &SampleStore<P> {
        &self.store
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn coverage(&self) -> Option<CoverageSummary> {
        self.tracker.summary()
    }

    /// Update the envelope with `features` and store the payload if it is novel.
    ///
    /// `payload` is only invoked for accepted observations.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "trace",
            skip_all,
            fields(x = features.x, y = features.y, size = features.size)
        )
    )]
    pub fn observe_with(
        &mut self,
        features: FeatureVector,
        payload: impl FnOnce() -> P,
    ) -> Observation {
        let membership: EdgeMembership = self.tracker.update(features);
        if !membership.is_novel() {
            return Observation::Redundant;
        }
        let key = membership.key();
        let replaced = self.store.insert(key, features, payload()).is_some();
        debug!(
            "accepted sample {key} ({:.3}, {:.3}, {:.3}); replaced={replaced}, stored={}",
            features.x,
            features.y,
            features.size,
            self.store.len()
        );
        Observation::Accepted { key, replaced }
    }

    pub fn observe(&mut self, features: FeatureVector, payload: P) -> Observation {
        self.observe_with(features, || payload)
    }

    /// Drop all stored samples; the envelope is kept.
    pub fn discard_samples(&mut self) {
        self.store.clear();
    }
}
