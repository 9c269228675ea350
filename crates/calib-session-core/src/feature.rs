//! Reduction of one detected target pose into a normalized feature vector.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Number of feature dimensions tracked per observation.
pub const FEATURE_DIMS: usize = 3;

/// Display labels of the feature dimensions, in `FeatureVector::to_array` order.
pub const AXIS_LABELS: [&str; FEATURE_DIMS] = ["X", "Y", "Size"];

/// Position and apparent size of a detected target, normalized to image dimensions.
///
/// `x` and `y` are the corner centroid divided by image width and height;
/// `size` is the horizontal corner span divided by image width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl FeatureVector {
    pub const fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    pub const fn to_array(self) -> [f64; FEATURE_DIMS] {
        [self.x, self.y, self.size]
    }

    /// Component-wise minimum.
    pub fn component_min(self, other: Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            size: self.size.min(other.size),
        }
    }

    /// Component-wise maximum.
    pub fn component_max(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            size: self.size.max(other.size),
        }
    }
}

/// Errors returned by [`extract_features`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no target corners to extract features from")]
    NoCorners,
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidImageSize { width: u32, height: u32 },
    #[error("corner {index} has a non-finite coordinate")]
    NonFiniteCorner { index: usize },
}

/// Compute the feature vector of one detection.
///
/// In stereo mode this is called with the left corners and the left image
/// dimensions only.
pub fn extract_features(
    corners: &[Point2<f32>],
    image_width: u32,
    image_height: u32,
) -> Result<FeatureVector, ExtractError> {
    if corners.is_empty() {
        return Err(ExtractError::NoCorners);
    }
    if image_width == 0 || image_height == 0 {
        return Err(ExtractError::InvalidImageSize {
            width: image_width,
            height: image_height,
        });
    }
    if let Some(index) = corners
        .iter()
        .position(|c| !(c.x.is_finite() && c.y.is_finite()))
    {
        return Err(ExtractError::NonFiniteCorner { index });
    }

    let n = corners.len() as f64;
    let (mut sum_x, mut sum_y) = (0.0_f64, 0.0_f64);
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    for c in corners {
        let (x, y) = (f64::from(c.x), f64::from(c.y));
        sum_x += x;
        sum_y += y;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }

    let w = f64::from(image_width);
    let h = f64::from(image_height);
    Ok(FeatureVector {
        x: sum_x / n / w,
        y: sum_y / n / h,
        size: (max_x - min_x) / w,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centroid_and_span_are_normalized() {
        let corners = [
            Point2::new(64.0_f32, 48.0),
            Point2::new(192.0, 48.0),
            Point2::new(64.0, 144.0),
            Point2::new(192.0, 144.0),
        ];
        let v = extract_features(&corners, 640, 480).expect("features");
        assert_relative_eq!(v.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(v.y, 0.2, epsilon = 1e-12);
        assert_relative_eq!(v.size, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn size_uses_width_even_for_tall_images() {
        let corners = [Point2::new(0.0_f32, 0.0), Point2::new(100.0, 300.0)];
        let v = extract_features(&corners, 200, 400).expect("features");
        assert_relative_eq!(v.size, 0.5, epsilon = 1e-12);
        assert_relative_eq!(v.y, 150.0 / 400.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_corners_fail() {
        assert_eq!(extract_features(&[], 640, 480), Err(ExtractError::NoCorners));
    }

    #[test]
    fn zero_sized_image_fails() {
        let corners = [Point2::new(1.0_f32, 1.0)];
        assert_eq!(
            extract_features(&corners, 0, 480),
            Err(ExtractError::InvalidImageSize {
                width: 0,
                height: 480
            })
        );
    }

    #[test]
    fn non_finite_corner_is_rejected() {
        let corners = [
            Point2::new(10.0_f32, 10.0),
            Point2::new(f32::NAN, 12.0),
            Point2::new(30.0, f32::INFINITY),
        ];
        assert_eq!(
            extract_features(&corners, 640, 480),
            Err(ExtractError::NonFiniteCorner { index: 1 })
        );
    }
}
