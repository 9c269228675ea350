//! Chessboard target detection through `calib-targets` (feature `detect`).

use calib_targets::chessboard::ChessboardParams;
use calib_targets::detect::{default_chess_config, detect_chessboard};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::collaborators::{Corners, TargetDetector};
use crate::config::PatternSize;
use crate::error::DetectError;

/// Detects a full chessboard of the configured inner-corner size.
///
/// Partial grids are reported as [`DetectError::Incomplete`]; a calibration
/// sample needs every corner.
#[derive(Clone, Debug)]
pub struct ChessboardTargetDetector {
    pattern: PatternSize,
    params: ChessboardParams,
}

impl ChessboardTargetDetector {
    pub fn new(pattern: PatternSize) -> Self {
        let params = ChessboardParams {
            expected_rows: Some(pattern.rows),
            expected_cols: Some(pattern.cols),
            ..ChessboardParams::default()
        };
        Self { pattern, params }
    }

    pub fn with_params(pattern: PatternSize, params: ChessboardParams) -> Self {
        Self { pattern, params }
    }

    pub fn pattern(&self) -> PatternSize {
        self.pattern
    }
}

impl TargetDetector<image::GrayImage> for ChessboardTargetDetector {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(width = image.width(), height = image.height()))
    )]
    fn detect(&self, image: &image::GrayImage) -> Result<Corners, DetectError> {
        let result = detect_chessboard(image, &default_chess_config(), self.params.clone())
            .ok_or(DetectError::NotFound)?;
        let corners: Corners = result
            .detection
            .corners
            .iter()
            .map(|c| c.position)
            .collect();
        let expected = self.pattern.corner_count();
        if corners.len() < expected {
            return Err(DetectError::Incomplete {
                found: corners.len(),
                expected,
            });
        }
        Ok(corners)
    }
}
