//! Interfaces of the external collaborators driven by a session.
//!
//! Detection, the calibration math, and publishing of results live outside
//! this crate; a session only talks to them through these traits.

use calib_session_core::{CalibrationParameters, CameraParameters, StereoPair, StereoParameters};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{DetectError, PublishError, SolverError};

/// Ordered target corners in image pixels.
pub type Corners = Vec<Point2<f32>>;

/// Finds the calibration target in one image.
pub trait TargetDetector<I> {
    fn detect(&self, image: &I) -> Result<Corners, DetectError>;
}

impl<I, F> TargetDetector<I> for F
where
    F: Fn(&I) -> Result<Corners, DetectError>,
{
    fn detect(&self, image: &I) -> Result<Corners, DetectError> {
        self(image)
    }
}

/// Single-camera calibration backend.
pub trait MonoSolver<I> {
    fn calibrate(&mut self, images: &[&I]) -> Result<CameraParameters, SolverError>;

    /// Undistort and rectify a live frame with the current calibration.
    fn rectify(&self, image: &I) -> I;

    /// Human-readable residual/accuracy report.
    fn report(&self) -> String;

    fn set_alpha(&mut self, alpha: f64);
}

/// Stereo-pair calibration backend.
pub trait StereoSolver<I> {
    fn calibrate(&mut self, pairs: &[&StereoPair<I>]) -> Result<StereoParameters, SolverError>;

    fn rectify(&self, pair: &StereoPair<I>) -> StereoPair<I>;

    /// Mean epipolar error of the target seen in both frames, `None` if the
    /// target is not visible.
    fn epipolar_error(&self, pair: &StereoPair<I>) -> Option<f64>;

    /// Triangulated target dimension, `None` if the target is not visible.
    fn board_dimension(&self, pair: &StereoPair<I>) -> Option<f64>;

    fn report(&self) -> String;

    fn set_alpha(&mut self, alpha: f64);
}

/// Calibration result handed to a publisher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationUpload {
    pub parameters: CalibrationParameters,
    pub report: String,
    /// Pretty JSON rendering of `parameters`.
    pub body: String,
}

impl CalibrationUpload {
    pub fn new(
        parameters: CalibrationParameters,
        report: String,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string_pretty(&parameters)?;
        Ok(Self {
            parameters,
            report,
            body,
        })
    }
}

/// Receives calibration results on explicit operator request.
pub trait CalibrationPublisher {
    fn publish(&mut self, upload: &CalibrationUpload) -> Result<(), PublishError>;
}
