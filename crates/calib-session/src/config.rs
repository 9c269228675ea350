//! JSON configuration of a calibration session.

use std::{fs, path::Path};

use calib_session_core::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum SessionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tolerance must be finite and > 0, got {0}")]
    InvalidTolerance(f64),
    #[error("initial alpha must be in [0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("pattern needs at least 2x2 inner corners, got {cols}x{rows}")]
    InvalidPattern { cols: u32, rows: u32 },
}

/// Inner-corner grid of the chessboard target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSize {
    pub cols: u32,
    pub rows: u32,
}

impl Default for PatternSize {
    fn default() -> Self {
        Self { cols: 8, rows: 6 }
    }
}

impl PatternSize {
    pub fn corner_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Edge tolerance in normalized image units.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub pattern: PatternSize,
    /// Rectification scale applied right after a successful calibration.
    #[serde(default)]
    pub alpha: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            pattern: PatternSize::default(),
            alpha: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ConfigError::InvalidAlpha(alpha));
            }
        }
        if self.pattern.cols < 2 || self.pattern.rows < 2 {
            return Err(ConfigError::InvalidPattern {
                cols: self.pattern.cols,
                rows: self.pattern.rows,
            });
        }
        Ok(())
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg: SessionConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg, SessionConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = SessionConfig {
            tolerance: 0.0,
            ..SessionConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidTolerance(0.0)));

        let cfg = SessionConfig {
            alpha: Some(1.5),
            ..SessionConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidAlpha(1.5)));

        let cfg = SessionConfig {
            pattern: PatternSize { cols: 1, rows: 6 },
            ..SessionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidPattern { cols: 1, rows: 6 })
        ));
    }

    #[test]
    fn json_round_trip_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        let cfg = SessionConfig {
            tolerance: 0.05,
            pattern: PatternSize { cols: 9, rows: 7 },
            alpha: Some(0.0),
        };
        cfg.write_json(&path).expect("write");
        assert_eq!(SessionConfig::load_json(&path).expect("load"), cfg);
    }
}
