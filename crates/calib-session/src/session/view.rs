use calib_session_core::{CoverageSummary, NoveltyKey, StereoPair};

use crate::collaborators::Corners;

/// What a front-end needs to draw for one processed frame.
#[derive(Clone, Debug)]
pub enum FrameView<F, C> {
    Collecting {
        frame: F,
        /// Detected target corners, `None` when detection failed.
        corners: Option<C>,
        /// Store slot written by this frame, `None` if it was not accepted.
        accepted: Option<NoveltyKey>,
        coverage: Option<CoverageSummary>,
        samples: usize,
    },
    Calibrated {
        raw: F,
        rectified: F,
        epipolar_error: Option<f64>,
        board_dimension: Option<f64>,
    },
}

pub type MonoFrameView<I> = FrameView<I, Corners>;
pub type StereoFrameView<I> = FrameView<StereoPair<I>, StereoPair<Corners>>;

impl<F, C> FrameView<F, C> {
    pub fn is_calibrated(&self) -> bool {
        matches!(self, FrameView::Calibrated { .. })
    }

    pub fn coverage(&self) -> Option<&CoverageSummary> {
        match self {
            FrameView::Collecting { coverage, .. } => coverage.as_ref(),
            FrameView::Calibrated { .. } => None,
        }
    }

    pub fn accepted(&self) -> Option<NoveltyKey> {
        match self {
            FrameView::Collecting { accepted, .. } => *accepted,
            FrameView::Calibrated { .. } => None,
        }
    }

    /// Image to display: the raw frame while collecting, the rectified one after.
    pub fn display_frame(&self) -> &F {
        match self {
            FrameView::Collecting { frame, .. } => frame,
            FrameView::Calibrated { rectified, .. } => rectified,
        }
    }

    /// Side-panel text shown once calibrated.
    pub fn accuracy_text(&self) -> Option<String> {
        let FrameView::Calibrated {
            epipolar_error,
            board_dimension,
            ..
        } = self
        else {
            return None;
        };
        let mut text = match epipolar_error {
            Some(err) => format!("acc. {err:.2}"),
            None => "acc. ?".to_string(),
        };
        if let Some(dim) = board_dimension {
            text.push_str(&format!(" dim {dim:.3}"));
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_text_formats_stereo_metrics() {
        let view: FrameView<(), ()> = FrameView::Calibrated {
            raw: (),
            rectified: (),
            epipolar_error: Some(0.4242),
            board_dimension: Some(0.10849),
        };
        assert_eq!(view.accuracy_text().as_deref(), Some("acc. 0.42 dim 0.108"));

        let view: FrameView<(), ()> = FrameView::Calibrated {
            raw: (),
            rectified: (),
            epipolar_error: None,
            board_dimension: None,
        };
        assert_eq!(view.accuracy_text().as_deref(), Some("acc. ?"));
    }

    #[test]
    fn collecting_view_has_no_accuracy_text() {
        let view: FrameView<u8, ()> = FrameView::Collecting {
            frame: 3,
            corners: None,
            accepted: None,
            coverage: None,
            samples: 0,
        };
        assert!(view.accuracy_text().is_none());
        assert_eq!(*view.display_frame(), 3);
    }
}
