use calib_session_core::{CalibrationParameters, ImageSize, StereoPair, StereoParameters};
use log::{debug, info};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::state::{
    detection_features, log_detection_failure, validate_alpha, SessionCore, SessionState,
    SessionStatus,
};
use super::view::{FrameView, StereoFrameView};
use super::SessionMode;
use crate::collaborators::{
    CalibrationPublisher, CalibrationUpload, Corners, StereoSolver, TargetDetector,
};
use crate::config::SessionConfig;
use crate::error::{DetectError, SessionError};

/// Stereo-pair calibration session.
///
/// Pairs must arrive already time-synchronized. Coverage is tracked on the
/// left camera only: features come from the left corners normalized by the
/// left image size.
pub struct StereoSession<I> {
    core: SessionCore<StereoPair<I>, StereoParameters>,
    detector: Box<dyn TargetDetector<I>>,
    solver: Box<dyn StereoSolver<I>>,
}

impl<I: Clone + ImageSize> StereoSession<I> {
    pub fn new(
        config: SessionConfig,
        detector: impl TargetDetector<I> + 'static,
        solver: impl StereoSolver<I> + 'static,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            core: SessionCore::new(config)?,
            detector: Box::new(detector),
            solver: Box::new(solver),
        })
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.core.config
    }

    pub fn state(&self) -> SessionState {
        self.core.state()
    }

    pub fn status(&self) -> SessionStatus {
        self.core.status(SessionMode::Stereo)
    }

    pub fn sample_count(&self) -> usize {
        self.core.collector.len()
    }

    pub fn calibration(&self) -> Option<&StereoParameters> {
        self.core.calibration.as_ref()
    }

    /// Detect the target in both frames (right only if found in left) and
    /// process the result.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn ingest(&mut self, pair: StereoPair<I>) -> StereoFrameView<I> {
        if self.core.is_calibrated() {
            return self.calibrated_view(pair);
        }
        let detection = self.detector.detect(&pair.left).and_then(|left| {
            let right = self.detector.detect(&pair.right)?;
            Ok(StereoPair::new(left, right))
        });
        self.ingest_detected(pair, detection)
    }

    /// Process a pair whose target detection was done by the caller.
    pub fn ingest_detected(
        &mut self,
        pair: StereoPair<I>,
        detection: Result<StereoPair<Corners>, DetectError>,
    ) -> StereoFrameView<I> {
        if self.core.is_calibrated() {
            return self.calibrated_view(pair);
        }
        let corners = detection.map_err(|e| log_detection_failure(&e)).ok();
        let features = corners
            .as_ref()
            .and_then(|c| detection_features(&c.left, &pair.left));
        self.core.collect(pair, corners, features, StereoPair::clone)
    }

    fn calibrated_view(&self, pair: StereoPair<I>) -> StereoFrameView<I> {
        let epipolar_error = self.solver.epipolar_error(&pair);
        let board_dimension = match epipolar_error {
            Some(err) => {
                debug!("epipolar error: {err:.3}");
                self.solver.board_dimension(&pair)
            }
            None => {
                debug!("target not visible in both frames");
                None
            }
        };
        let rectified = self.solver.rectify(&pair);
        FrameView::Calibrated {
            raw: pair,
            rectified,
            epipolar_error,
            board_dimension,
        }
    }

    /// Calibrate from the stored pairs.
    ///
    /// On solver failure the session stays collecting with its samples intact.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn trigger_calibration(&mut self) -> Result<&StereoParameters, SessionError> {
        self.core.ensure_ready_to_calibrate()?;
        let result = {
            let pairs = self
                .core
                .collector
                .store()
                .payloads()
                .map_err(|_| SessionError::InsufficientSamples)?;
            info!("calibrating from {} stereo samples", pairs.len());
            self.solver.calibrate(&pairs)
        };
        match result {
            Ok(params) => {
                if let Some(alpha) = self.core.config.alpha {
                    self.solver.set_alpha(alpha);
                    self.core.alpha = Some(alpha);
                }
                info!(
                    "stereo calibration done (baseline {:.4})\n{}",
                    params.baseline(),
                    self.solver.report()
                );
                Ok(self.core.finish_calibration(params))
            }
            Err(err) => Err(self.core.record_error(err.into())),
        }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn trigger_upload(
        &mut self,
        publisher: &mut dyn CalibrationPublisher,
    ) -> Result<(), SessionError> {
        let Some(params) = self.core.calibration.clone() else {
            return Err(self.core.record_error(SessionError::NotCalibrated));
        };
        let upload =
            CalibrationUpload::new(CalibrationParameters::Stereo(params), self.solver.report())?;
        publisher
            .publish(&upload)
            .map_err(|e| self.core.record_error(e.into()))?;
        info!("{} calibration published", upload.parameters.mode_name());
        Ok(())
    }

    /// Forward a rectification scale to the solver; ignored while collecting.
    pub fn set_rectification_scale(&mut self, alpha: f64) -> Result<(), SessionError> {
        validate_alpha(alpha)?;
        if !self.core.is_calibrated() {
            debug!("rectification scale {alpha} ignored while collecting");
            return Ok(());
        }
        self.solver.set_alpha(alpha);
        self.core.alpha = Some(alpha);
        Ok(())
    }
}
