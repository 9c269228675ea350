//! Keyed store of accepted calibration samples.
//!
//! The store holds at most one exemplar per [`NoveltyKey`]: a later sample
//! touching the same envelope edges replaces the earlier one. It is therefore a
//! bounded, lossy cache of "interesting" frames rather than a full sample log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coverage::{Envelope, NoveltyKey};
use crate::feature::FeatureVector;

/// One accepted frame together with its feature vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sample<P> {
    pub features: FeatureVector,
    pub payload: P,
}

/// Errors returned by [`SampleStore::payloads`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStoreError {
    #[error("sample store is empty")]
    Empty,
}

#[derive(Clone, Debug)]
pub struct SampleStore<P> {
    samples: BTreeMap<NoveltyKey, Sample<P>>,
}

impl<P> Default for SampleStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SampleStore<P> {
    pub fn new() -> Self {
        Self {
            samples: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Insert a sample, replacing and returning any sample stored under the same key.
    pub fn insert(
        &mut self,
        key: NoveltyKey,
        features: FeatureVector,
        payload: P,
    ) -> Option<Sample<P>> {
        self.samples.insert(key, Sample { features, payload })
    }

    pub fn get(&self, key: NoveltyKey) -> Option<&Sample<P>> {
        self.samples.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoveltyKey, &Sample<P>)> + '_ {
        self.samples.iter().map(|(k, s)| (*k, s))
    }

    /// Feature vectors of the stored samples, in key order.
    ///
    /// Each call starts a fresh pass over the store.
    pub fn all_feature_vectors(&self) -> impl Iterator<Item = FeatureVector> + '_ {
        self.samples.values().map(|s| s.features)
    }

    /// Envelope re-derived from the stored feature vectors.
    ///
    /// Because colliding samples overwrite each other this can be slightly
    /// tighter than the live tracker envelope, but every edge stays within the
    /// tracker tolerance of it.
    pub fn coverage(&self) -> Option<Envelope> {
        Envelope::from_points(self.all_feature_vectors())
    }

    /// Stored payloads in key order, for handing to a solver.
    pub fn payloads(&self) -> Result<Vec<&P>, SampleStoreError> {
        if self.samples.is_empty() {
            return Err(SampleStoreError::Empty);
        }
        Ok(self.samples.values().map(|s| &s.payload).collect())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::EdgeMembership;

    fn key(is_min: [bool; 3], is_max: [bool; 3]) -> NoveltyKey {
        EdgeMembership { is_min, is_max }.key()
    }

    #[test]
    fn colliding_key_overwrites() {
        let mut store = SampleStore::new();
        let k = key([true, false, false], [false; 3]);
        assert!(store
            .insert(k, FeatureVector::new(0.1, 0.5, 0.2), "first")
            .is_none());
        let prev = store
            .insert(k, FeatureVector::new(0.15, 0.5, 0.2), "second")
            .expect("replaced");
        assert_eq!(prev.payload, "first");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(k).map(|s| s.payload), Some("second"));
    }

    #[test]
    fn feature_vectors_are_restartable() {
        let mut store = SampleStore::new();
        store.insert(key([true; 3], [false; 3]), FeatureVector::new(0.1, 0.1, 0.1), ());
        store.insert(key([false; 3], [true; 3]), FeatureVector::new(0.9, 0.9, 0.3), ());
        let first: Vec<_> = store.all_feature_vectors().collect();
        let second: Vec<_> = store.all_feature_vectors().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);

        let env = store.coverage().expect("coverage");
        assert_eq!(env.mins, FeatureVector::new(0.1, 0.1, 0.1));
        assert_eq!(env.maxs, FeatureVector::new(0.9, 0.9, 0.3));
    }

    #[test]
    fn payloads_require_samples() {
        let mut store = SampleStore::new();
        assert_eq!(store.payloads(), Err(SampleStoreError::Empty));
        store.insert(key([true; 3], [true; 3]), FeatureVector::new(0.5, 0.5, 0.2), 7u32);
        assert_eq!(store.payloads(), Ok(vec![&7]));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn empty_store_has_no_coverage() {
        let store: SampleStore<()> = SampleStore::new();
        assert!(store.coverage().is_none());
        assert_eq!(store.all_feature_vectors().count(), 0);
    }
}
