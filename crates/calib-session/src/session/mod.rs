//! Calibration session state machine.
//!
//! A session starts `Collecting`: every frame with a detected target is
//! reduced to a feature vector and kept if it touches the coverage envelope.
//! An operator-triggered calibration that succeeds moves it, once and for
//! good, to `Calibrated`, after which frames are only rectified for display.
//!
//! The camera setup is fixed when the session is built: [`CalibrationSession::Mono`]
//! stores single frames, [`CalibrationSession::Stereo`] stores synchronized pairs.

mod mono;
mod state;
mod stereo;
mod view;

pub use mono::MonoSession;
pub use state::{SessionState, SessionStatus};
pub use stereo::StereoSession;
pub use view::{FrameView, MonoFrameView, StereoFrameView};

use calib_session_core::{CalibrationParameters, CoverageSummary, ImageSize, StereoPair};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::collaborators::{CalibrationPublisher, MonoSolver, StereoSolver, TargetDetector};
use crate::config::SessionConfig;
use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Mono,
    Stereo,
}

fn mode_mismatch(session: SessionMode, frame: SessionMode) -> SessionError {
    let err = SessionError::ModeMismatch { session, frame };
    warn!("{err}");
    err
}

/// A mono or stereo calibration session, chosen at construction.
pub enum CalibrationSession<I> {
    Mono(MonoSession<I>),
    Stereo(StereoSession<I>),
}

impl<I: Clone + ImageSize> CalibrationSession<I> {
    pub fn mono(
        config: SessionConfig,
        detector: impl TargetDetector<I> + 'static,
        solver: impl MonoSolver<I> + 'static,
    ) -> Result<Self, SessionError> {
        Ok(Self::Mono(MonoSession::new(config, detector, solver)?))
    }

    pub fn stereo(
        config: SessionConfig,
        detector: impl TargetDetector<I> + 'static,
        solver: impl StereoSolver<I> + 'static,
    ) -> Result<Self, SessionError> {
        Ok(Self::Stereo(StereoSession::new(config, detector, solver)?))
    }

    pub fn mode(&self) -> SessionMode {
        match self {
            Self::Mono(_) => SessionMode::Mono,
            Self::Stereo(_) => SessionMode::Stereo,
        }
    }

    pub fn state(&self) -> SessionState {
        match self {
            Self::Mono(s) => s.state(),
            Self::Stereo(s) => s.state(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Mono(s) => s.status(),
            Self::Stereo(s) => s.status(),
        }
    }

    pub fn sample_count(&self) -> usize {
        match self {
            Self::Mono(s) => s.sample_count(),
            Self::Stereo(s) => s.sample_count(),
        }
    }

    pub fn coverage(&self) -> Option<CoverageSummary> {
        self.status().coverage
    }

    pub fn calibration(&self) -> Option<CalibrationParameters> {
        match self {
            Self::Mono(s) => s.calibration().cloned().map(CalibrationParameters::Mono),
            Self::Stereo(s) => s.calibration().cloned().map(CalibrationParameters::Stereo),
        }
    }

    /// Feed a single frame; only valid for mono sessions.
    pub fn ingest_mono(&mut self, frame: I) -> Result<MonoFrameView<I>, SessionError> {
        match self {
            Self::Mono(s) => Ok(s.ingest(frame)),
            Self::Stereo(_) => Err(mode_mismatch(SessionMode::Stereo, SessionMode::Mono)),
        }
    }

    /// Feed a synchronized pair; only valid for stereo sessions.
    pub fn ingest_stereo(
        &mut self,
        pair: StereoPair<I>,
    ) -> Result<StereoFrameView<I>, SessionError> {
        match self {
            Self::Stereo(s) => Ok(s.ingest(pair)),
            Self::Mono(_) => Err(mode_mismatch(SessionMode::Mono, SessionMode::Stereo)),
        }
    }

    pub fn trigger_calibration(&mut self) -> Result<CalibrationParameters, SessionError> {
        match self {
            Self::Mono(s) => s
                .trigger_calibration()
                .map(|p| CalibrationParameters::Mono(p.clone())),
            Self::Stereo(s) => s
                .trigger_calibration()
                .map(|p| CalibrationParameters::Stereo(p.clone())),
        }
    }

    pub fn trigger_upload(
        &mut self,
        publisher: &mut dyn CalibrationPublisher,
    ) -> Result<(), SessionError> {
        match self {
            Self::Mono(s) => s.trigger_upload(publisher),
            Self::Stereo(s) => s.trigger_upload(publisher),
        }
    }

    pub fn set_rectification_scale(&mut self, alpha: f64) -> Result<(), SessionError> {
        match self {
            Self::Mono(s) => s.set_rectification_scale(alpha),
            Self::Stereo(s) => s.set_rectification_scale(alpha),
        }
    }
}
