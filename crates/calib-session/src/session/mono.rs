use calib_session_core::{CalibrationParameters, CameraParameters, ImageSize};
use log::{debug, info};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::state::{
    detection_features, log_detection_failure, validate_alpha, SessionCore, SessionState,
    SessionStatus,
};
use super::view::{FrameView, MonoFrameView};
use super::SessionMode;
use crate::collaborators::{
    CalibrationPublisher, CalibrationUpload, Corners, MonoSolver, TargetDetector,
};
use crate::config::SessionConfig;
use crate::error::{DetectError, SessionError};

/// Single-camera calibration session.
pub struct MonoSession<I> {
    core: SessionCore<I, CameraParameters>,
    detector: Box<dyn TargetDetector<I>>,
    solver: Box<dyn MonoSolver<I>>,
}

impl<I: Clone + ImageSize> MonoSession<I> {
    pub fn new(
        config: SessionConfig,
        detector: impl TargetDetector<I> + 'static,
        solver: impl MonoSolver<I> + 'static,
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
        self.core.status(SessionMode::Mono)
    }

    pub fn sample_count(&self) -> usize {
        self.core.collector.len()
    }

    pub fn calibration(&self) -> Option<&CameraParameters> {
        self.core.calibration.as_ref()
    }

    /// Run the detector on `frame` (while collecting) and process the result.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn ingest(&mut self, frame: I) -> MonoFrameView<I> {
        if self.core.is_calibrated() {
            return self.calibrated_view(frame);
        }
        let detection = self.detector.detect(&frame);
        self.ingest_detected(frame, detection)
    }

    /// Process a frame whose target detection was done by the caller.
    pub fn ingest_detected(
        &mut self,
        frame: I,
        detection: Result<Corners, DetectError>,
    ) -> MonoFrameView<I> {
        if self.core.is_calibrated() {
            return self.calibrated_view(frame);
        }
        let corners = detection.map_err(|e| log_detection_failure(&e)).ok();
        let features = corners
            .as_deref()
            .and_then(|c| detection_features(c, &frame));
        self.core.collect(frame, corners, features, I::clone)
    }

    fn calibrated_view(&self, frame: I) -> MonoFrameView<I> {
        let rectified = self.solver.rectify(&frame);
        FrameView::Calibrated {
            raw: frame,
            rectified,
            epipolar_error: None,
            board_dimension: None,
        }
    }

    /// Calibrate from the stored samples.
    ///
    /// On solver failure the session stays collecting with its samples intact.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn trigger_calibration(&mut self) -> Result<&CameraParameters, SessionError> {
        self.core.ensure_ready_to_calibrate()?;
        let result = {
            let images = self
                .core
                .collector
                .store()
                .payloads()
                .map_err(|_| SessionError::InsufficientSamples)?;
            info!("calibrating from {} mono samples", images.len());
            self.solver.calibrate(&images)
        };
        match result {
            Ok(params) => {
                if let Some(alpha) = self.core.config.alpha {
                    self.solver.set_alpha(alpha);
                    self.core.alpha = Some(alpha);
                }
                let [fx, fy] = params.focal_lengths();
                let [cx, cy] = params.principal_point();
                info!(
                    "mono calibration done (f {fx:.1}/{fy:.1}, c {cx:.1}/{cy:.1})\n{}",
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
            CalibrationUpload::new(CalibrationParameters::Mono(params), self.solver.report())?;
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
