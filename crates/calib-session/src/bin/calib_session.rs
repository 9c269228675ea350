//! Pick calibration frames from a recorded mono or stereo image sequence.
//!
//! Every image is run through the chessboard detector and the coverage-based
//! sample selection; the selected frames are written as a JSON report.

use std::fs;
use std::path::{Path, PathBuf};

use calib_session::core::{extract_features, SampleCollector};
use calib_session::detect::ChessboardTargetDetector;
use calib_session::{SelectionReport, SessionConfig, SessionMode, TargetDetector};
use clap::{Parser, Subcommand};
use image::ImageReader;

use log::LevelFilter;
#[cfg(not(feature = "tracing"))]
use log::{debug, info, warn};
#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "calib-session", version, about)]
struct Cli {
    /// Session configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the selection report.
    #[arg(long, default_value = "calib_session_report.json")]
    output: PathBuf,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Emit JSON-formatted events (requires the `tracing` feature).
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Single camera: one directory of frames.
    Mono { dir: PathBuf },
    /// Stereo pair: left and right directories, paired by sorted file name.
    Stereo { left: PathBuf, right: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    {
        calib_session::core::init_with_level(cli.log_level)?;
        if cli.json_logs {
            warn!("--json-logs needs the `tracing` feature; using plain logs");
        }
    }

    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        log::set_max_level(cli.log_level);
        calib_session::core::init_tracing(cli.json_logs);
    }

    run(cli)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => SessionConfig::load_json(path)?,
        None => SessionConfig::default(),
    };
    config.validate()?;

    let detector = ChessboardTargetDetector::new(config.pattern);
    let mut collector: SampleCollector<String> = SampleCollector::with_tolerance(config.tolerance);

    let (mode, seen, detected) = match &cli.command {
        Command::Mono { dir } => {
            let frames = list_images(dir)?;
            let mut detected = 0;
            for path in &frames {
                let img = load_gray(path)?;
                let corners = match detector.detect(&img) {
                    Ok(c) => c,
                    Err(err) => {
                        debug!("{}: {err}", path.display());
                        continue;
                    }
                };
                detected += 1;
                let features = extract_features(&corners, img.width(), img.height())?;
                let obs = collector.observe(features, path.display().to_string());
                debug!("{}: {:?}", path.display(), obs);
            }
            (SessionMode::Mono, frames.len(), detected)
        }
        Command::Stereo { left, right } => {
            let lefts = list_images(left)?;
            let rights = list_images(right)?;
            if lefts.len() != rights.len() {
                warn!(
                    "left/right frame counts differ ({} vs {}); extra frames are ignored",
                    lefts.len(),
                    rights.len()
                );
            }
            let mut detected = 0;
            let mut seen = 0;
            for (lpath, rpath) in lefts.iter().zip(rights.iter()) {
                seen += 1;
                let limg = load_gray(lpath)?;
                let Ok(lcorners) = detector.detect(&limg) else {
                    continue;
                };
                let rimg = load_gray(rpath)?;
                if detector.detect(&rimg).is_err() {
                    continue;
                }
                detected += 1;
                let features = extract_features(&lcorners, limg.width(), limg.height())?;
                let label = format!("{} | {}", lpath.display(), rpath.display());
                collector.observe(features, label);
            }
            (SessionMode::Stereo, seen, detected)
        }
    };

    let report = SelectionReport::from_collector(mode, seen, detected, &collector);
    report.write_json(&cli.output)?;
    info!(
        "selected {} of {} frames ({} with a full target); report: {}",
        report.selected.len(),
        seen,
        detected,
        cli.output.display()
    );
    Ok(())
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .is_some_and(|e| matches!(e.as_str(), "png" | "jpg" | "jpeg" | "bmp"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn load_gray(path: &Path) -> Result<image::GrayImage, Box<dyn std::error::Error>> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}
