//! Running min/max envelope over accepted feature vectors and the edge-membership
//! novelty test built on top of it.
//!
//! A frame is novel when, after the envelope has been updated with it, it lies
//! within `tolerance` of the current minimum or maximum on at least one
//! dimension. The set of touched edges is encoded as a [`NoveltyKey`], which is
//! what the sample store is keyed by.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feature::{FeatureVector, AXIS_LABELS, FEATURE_DIMS};

/// Default edge tolerance in normalized image units.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Which envelope edges an observation touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeMembership {
    pub is_min: [bool; FEATURE_DIMS],
    pub is_max: [bool; FEATURE_DIMS],
}

impl EdgeMembership {
    /// True when at least one edge is touched.
    pub fn is_novel(&self) -> bool {
        self.is_min.iter().chain(self.is_max.iter()).any(|&b| b)
    }

    pub fn key(&self) -> NoveltyKey {
        NoveltyKey::from(*self)
    }
}

/// Compact encoding of an [`EdgeMembership`].
///
/// Bit `i` is the minimum flag of dimension `i`, bit `FEATURE_DIMS + i` the
/// maximum flag. Two observations touching the same edges share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoveltyKey(u8);

impl NoveltyKey {
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn membership(self) -> EdgeMembership {
        let mut m = EdgeMembership::default();
        for i in 0..FEATURE_DIMS {
            m.is_min[i] = self.0 & (1 << i) != 0;
            m.is_max[i] = self.0 & (1 << (FEATURE_DIMS + i)) != 0;
        }
        m
    }
}

impl From<EdgeMembership> for NoveltyKey {
    fn from(m: EdgeMembership) -> Self {
        let mut bits = 0u8;
        for i in 0..FEATURE_DIMS {
            if m.is_min[i] {
                bits |= 1 << i;
            }
            if m.is_max[i] {
                bits |= 1 << (FEATURE_DIMS + i);
            }
        }
        Self(bits)
    }
}

impl fmt::Display for NoveltyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.membership();
        let flags = |v: [bool; FEATURE_DIMS]| -> String {
            v.iter().map(|&b| if b { '1' } else { '0' }).collect()
        };
        write!(f, "min={} max={}", flags(m.is_min), flags(m.is_max))
    }
}

/// Component-wise bounding box over feature vectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub mins: FeatureVector,
    pub maxs: FeatureVector,
}

impl Envelope {
    pub fn from_point(v: FeatureVector) -> Self {
        Self { mins: v, maxs: v }
    }

    /// Bounding box of a sequence, `None` when it is empty.
    pub fn from_points(points: impl IntoIterator<Item = FeatureVector>) -> Option<Self> {
        points.into_iter().fold(None, |env, v| {
            Some(match env {
                None => Envelope::from_point(v),
                Some(mut e) => {
                    e.expand(v);
                    e
                }
            })
        })
    }

    pub fn expand(&mut self, v: FeatureVector) {
        self.mins = self.mins.component_min(v);
        self.maxs = self.maxs.component_max(v);
    }

    /// Edge membership of `v` against this envelope.
    pub fn classify(&self, v: FeatureVector, tolerance: f64) -> EdgeMembership {
        let (lo, hi, p) = (self.mins.to_array(), self.maxs.to_array(), v.to_array());
        let mut m = EdgeMembership::default();
        for i in 0..FEATURE_DIMS {
            m.is_min[i] = (p[i] - lo[i]).abs() < tolerance;
            m.is_max[i] = (p[i] - hi[i]).abs() < tolerance;
        }
        m
    }

    pub fn summary(&self) -> CoverageSummary {
        let (lo, hi) = (self.mins.to_array(), self.maxs.to_array());
        CoverageSummary {
            axes: std::array::from_fn(|i| AxisRange {
                label: AXIS_LABELS[i].to_string(),
                min: lo[i],
                max: hi[i],
            }),
        }
    }
}

/// Observed range of one feature dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-dimension coverage shown to the operator while collecting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub axes: [AxisRange; FEATURE_DIMS],
}

impl CoverageSummary {
    pub fn ranges(&self) -> [f64; FEATURE_DIMS] {
        std::array::from_fn(|i| self.axes[i].span())
    }
}

/// Incremental envelope tracker.
///
/// The envelope only ever grows: `mins` never increase and `maxs` never
/// decrease over the tracker's lifetime.
#[derive(Clone, Debug)]
pub struct CoverageTracker {
    tolerance: f64,
    envelope: Option<Envelope>,
}

impl Default for CoverageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverageTracker {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            envelope: None,
        }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[inline]
    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// Grow the envelope with `v`, then classify `v` against the grown envelope.
    ///
    /// The first vector initializes the envelope and therefore touches every edge.
    pub fn update(&mut self, v: FeatureVector) -> EdgeMembership {
        let envelope = self.envelope.get_or_insert(Envelope::from_point(v));
        envelope.expand(v);
        envelope.classify(v, self.tolerance)
    }

    pub fn summary(&self) -> Option<CoverageSummary> {
        self.envelope.map(|e| e.summary())
    }
}
