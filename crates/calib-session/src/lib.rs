//! Interactive camera calibration session.
//!
//! This crate decides which frames of a live mono or stereo stream are worth
//! keeping for calibration and when the session switches from collecting
//! samples to being calibrated. Target detection, the calibration solver and
//! result publishing are external collaborators, plugged in through the traits
//! in [`collaborators`].
//!
//! ## Quickstart
//!
//! ```
//! use calib_session::{
//!     CalibrationSession, Corners, DetectError, GrayImage, MonoSolver, SessionConfig,
//!     SessionState, SolverError,
//! };
//! use calib_session::core::CameraParameters;
//! use nalgebra::Point2;
//!
//! struct Pinhole;
//!
//! impl MonoSolver<GrayImage> for Pinhole {
//!     fn calibrate(&mut self, images: &[&GrayImage]) -> Result<CameraParameters, SolverError> {
//!         let img = images[0];
//!         let (w, h) = (img.width as u32, img.height as u32);
//!         Ok(CameraParameters::pinhole(w, h, 500.0, 500.0, w as f64 / 2.0, h as f64 / 2.0))
//!     }
//!     fn rectify(&self, image: &GrayImage) -> GrayImage {
//!         image.clone()
//!     }
//!     fn report(&self) -> String {
//!         "pinhole".into()
//!     }
//!     fn set_alpha(&mut self, _alpha: f64) {}
//! }
//!
//! let detector = |_: &GrayImage| -> Result<Corners, DetectError> {
//!     Ok(vec![Point2::new(100.0, 100.0), Point2::new(300.0, 200.0)])
//! };
//! let mut session =
//!     CalibrationSession::mono(SessionConfig::default(), detector, Pinhole).expect("config");
//!
//! let view = session.ingest_mono(GrayImage::new(640, 480)).expect("mono frame");
//! assert!(view.accepted().is_some());
//!
//! session.trigger_calibration().expect("calibrated");
//! assert_eq!(session.state(), SessionState::Calibrated);
//! ```
//!
//! ## API map
//! - `calib_session::core`: feature extraction, coverage tracking, sample store.
//! - [`CalibrationSession`], [`MonoSession`], [`StereoSession`]: the state machine.
//! - [`SessionConfig`]: JSON configuration.
//! - [`SelectionReport`]: frames chosen from a recorded sequence.
//! - `calib_session::detect` (feature `detect`): chessboard detector adapter.

pub mod collaborators;
mod config;
mod error;
mod report;
mod session;

#[cfg(feature = "detect")]
pub mod detect;

pub use calib_session_core as core;

pub use calib_session_core::{GrayImage, ImageSize, StereoPair};
pub use collaborators::{
    CalibrationPublisher, CalibrationUpload, Corners, MonoSolver, StereoSolver, TargetDetector,
};
pub use config::{ConfigError, PatternSize, SessionConfig, SessionIoError};
pub use error::{DetectError, PublishError, SessionError, SolverError};
pub use report::{SelectedFrame, SelectionReport};
pub use session::{
    CalibrationSession, FrameView, MonoFrameView, MonoSession, SessionMode, SessionState,
    SessionStatus, StereoFrameView, StereoSession,
};
