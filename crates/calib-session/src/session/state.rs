//! Phase bookkeeping shared by the mono and stereo sessions.

use calib_session_core::{
    extract_features, CoverageSummary, FeatureVector, ImageSize, Observation, SampleCollector,
};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::view::FrameView;
use super::SessionMode;
use crate::config::SessionConfig;
use crate::error::{DetectError, SessionError};

/// Collecting until an operator-triggered calibration succeeds, then
/// calibrated for the rest of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Collecting,
    Calibrated,
}

/// Operator-facing status of a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionStatus {
    pub mode: SessionMode,
    pub state: SessionState,
    pub samples: usize,
    pub coverage: Option<CoverageSummary>,
    pub alpha: Option<f64>,
    /// Last insufficient-samples, solver, or upload error, cleared by a
    /// successful calibration.
    pub last_error: Option<String>,
}

impl SessionStatus {
    pub fn message(&self) -> String {
        let base = match self.state {
            SessionState::Collecting => format!("collecting ({} samples)", self.samples),
            SessionState::Calibrated => "calibrated".to_string(),
        };
        match &self.last_error {
            Some(err) => format!("{base}: {err}"),
            None => base,
        }
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<(), SessionError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(SessionError::InvalidAlpha(alpha))
    }
}

/// Features of a detection, normalized by `normalizer`'s dimensions.
pub(crate) fn detection_features<I: ImageSize>(
    corners: &[nalgebra::Point2<f32>],
    normalizer: &I,
) -> Option<FeatureVector> {
    match extract_features(corners, normalizer.width(), normalizer.height()) {
        Ok(features) => Some(features),
        Err(err) => {
            debug!("detection dropped: {err}");
            None
        }
    }
}

pub(crate) fn log_detection_failure(err: &DetectError) {
    trace!("no usable target in frame: {err}");
}

/// Sample collection plus the collecting -> calibrated transition.
///
/// `S` is the stored sample payload, `P` the calibration result.
#[derive(Debug)]
pub(crate) struct SessionCore<S, P> {
    pub(crate) config: SessionConfig,
    pub(crate) collector: SampleCollector<S>,
    pub(crate) calibration: Option<P>,
    pub(crate) alpha: Option<f64>,
    pub(crate) last_error: Option<String>,
}

impl<S, P> SessionCore<S, P> {
    pub(crate) fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let collector = SampleCollector::with_tolerance(config.tolerance);
        Ok(Self {
            config,
            collector,
            calibration: None,
            alpha: None,
            last_error: None,
        })
    }

    #[inline]
    pub(crate) fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    pub(crate) fn state(&self) -> SessionState {
        if self.is_calibrated() {
            SessionState::Calibrated
        } else {
            SessionState::Collecting
        }
    }

    pub(crate) fn status(&self, mode: SessionMode) -> SessionStatus {
        SessionStatus {
            mode,
            state: self.state(),
            samples: self.collector.len(),
            coverage: self.collector.coverage(),
            alpha: self.alpha,
            last_error: self.last_error.clone(),
        }
    }

    pub(crate) fn record_error(&mut self, err: SessionError) -> SessionError {
        warn!("{err}");
        self.last_error = Some(err.to_string());
        err
    }

    /// Fails unless collecting with at least one stored sample.
    pub(crate) fn ensure_ready_to_calibrate(&mut self) -> Result<(), SessionError> {
        let err = if self.is_calibrated() {
            SessionError::AlreadyCalibrated
        } else if self.collector.is_empty() {
            SessionError::InsufficientSamples
        } else {
            return Ok(());
        };
        Err(self.record_error(err))
    }

    /// Enter the calibrated state; stored samples are no longer needed.
    pub(crate) fn finish_calibration(&mut self, params: P) -> &P {
        self.collector.discard_samples();
        self.last_error = None;
        self.calibration.insert(params)
    }

    /// Offer one detection to the collector and build the collecting view.
    pub(crate) fn collect<F, C>(
        &mut self,
        frame: F,
        corners: Option<C>,
        features: Option<FeatureVector>,
        payload: impl FnOnce(&F) -> S,
    ) -> FrameView<F, C> {
        let accepted = features
            .map(|features| self.collector.observe_with(features, || payload(&frame)))
            .and_then(|obs: Observation| obs.key());
        FrameView::Collecting {
            frame,
            corners,
            accepted,
            coverage: self.collector.coverage(),
            samples: self.collector.len(),
        }
    }
}
