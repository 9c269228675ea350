//! JSON report of the frames selected from a recorded sequence.

use std::{fs, path::Path};

use calib_session_core::{CoverageSummary, FeatureVector, NoveltyKey, SampleCollector};
use serde::{Deserialize, Serialize};

use crate::config::SessionIoError;
use crate::session::SessionMode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedFrame {
    pub key: NoveltyKey,
    /// Human-readable form of `key`.
    pub edges: String,
    pub features: FeatureVector,
    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub mode: SessionMode,
    pub tolerance: f64,
    pub frames_seen: usize,
    pub frames_detected: usize,
    pub selected: Vec<SelectedFrame>,
    #[serde(default)]
    pub coverage: Option<CoverageSummary>,
}

impl SelectionReport {
    /// Snapshot a collector whose payloads are frame source labels.
    pub fn from_collector(
        mode: SessionMode,
        frames_seen: usize,
        frames_detected: usize,
        collector: &SampleCollector<String>,
    ) -> Self {
        let selected = collector
            .store()
            .iter()
            .map(|(key, sample)| SelectedFrame {
                key,
                edges: key.to_string(),
                features: sample.features,
                source: sample.payload.clone(),
            })
            .collect();
        Self {
            mode,
            tolerance: collector.tracker().tolerance(),
            frames_seen,
            frames_detected,
            selected,
            coverage: collector.coverage(),
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
