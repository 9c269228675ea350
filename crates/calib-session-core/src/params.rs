//! Calibration results as produced by the external solvers.

use nalgebra::{Matrix3, Matrix3x4, Vector3};
use serde::{Deserialize, Serialize};

/// Intrinsics of one camera plus its rectification and projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParameters {
    pub width: u32,
    pub height: u32,
    pub camera_matrix: Matrix3<f64>,
    /// Distortion coefficients in solver order (e.g. `k1, k2, p1, p2, k3`).
    pub distortion: Vec<f64>,
    pub rectification: Matrix3<f64>,
    pub projection: Matrix3x4<f64>,
}

impl CameraParameters {
    /// Distortion-free pinhole camera with identity rectification.
    pub fn pinhole(width: u32, height: u32, fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        let camera_matrix = Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0);
        let mut projection = Matrix3x4::zeros();
        projection
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&camera_matrix);
        Self {
            width,
            height,
            camera_matrix,
            distortion: vec![0.0; 5],
            rectification: Matrix3::identity(),
            projection,
        }
    }

    pub fn focal_lengths(&self) -> [f64; 2] {
        [self.camera_matrix[(0, 0)], self.camera_matrix[(1, 1)]]
    }

    pub fn principal_point(&self) -> [f64; 2] {
        [self.camera_matrix[(0, 2)], self.camera_matrix[(1, 2)]]
    }
}

/// Two calibrated cameras and the pose of the right camera relative to the left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StereoParameters {
    pub left: CameraParameters,
    pub right: CameraParameters,
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl StereoParameters {
    /// Distance between the two camera centers, in target units.
    pub fn baseline(&self) -> f64 {
        self.translation.norm()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrationParameters {
    Mono(CameraParameters),
    Stereo(StereoParameters),
}

impl CalibrationParameters {
    pub fn mode_name(&self) -> &'static str {
        match self {
            CalibrationParameters::Mono(_) => "mono",
            CalibrationParameters::Stereo(_) => "stereo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pinhole_projection_embeds_camera_matrix() {
        let cam = CameraParameters::pinhole(640, 480, 500.0, 510.0, 320.0, 240.0);
        assert_eq!(cam.focal_lengths(), [500.0, 510.0]);
        assert_eq!(cam.principal_point(), [320.0, 240.0]);
        assert_eq!(cam.projection[(0, 2)], 320.0);
        assert_eq!(cam.projection[(2, 3)], 0.0);
    }

    #[test]
    fn baseline_is_translation_norm() {
        let cam = CameraParameters::pinhole(640, 480, 500.0, 500.0, 320.0, 240.0);
        let stereo = StereoParameters {
            left: cam.clone(),
            right: cam,
            rotation: Matrix3::identity(),
            translation: Vector3::new(-0.06, 0.0, 0.08),
        };
        assert_relative_eq!(stereo.baseline(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn parameters_serialize_with_mode_tag() {
        let params = CalibrationParameters::Mono(CameraParameters::pinhole(
            640, 480, 500.0, 500.0, 320.0, 240.0,
        ));
        let json = serde_json::to_value(&params).expect("serialize");
        assert_eq!(json["mode"], params.mode_name());
        let back: CalibrationParameters = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, params);
    }
}
