//! Nail-biting detection library for real-time webcam monitoring.
//!
//! This library provides a Rust implementation of nail-biting gesture
//! detection using:
//! - ONNX Runtime for hand and face landmark inference
//! - `OpenCV` for video capture, drawing and display
//! - A pixel-distance proximity check between fingertips and the mouth
//!
//! The detection pipeline per frame:
//! 1. Face detection to locate faces in the image
//! 2. Face mesh inference to find the mouth reference point
//! 3. Palm detection followed by 21-point hand landmark inference
//! 4. Euclidean distance from each fingertip to the mouth point; any
//!    distance under the threshold raises a warning
//! 5. A temporal debounce turns sustained warnings into logged events
//!
//! # Examples
//!
//! ## Checking fingertip proximity
//!
//! ```
//! use nailguard::geometry::{FingerTip, PixelPoint};
//! use nailguard::proximity::ProximityChecker;
//!
//! let checker = ProximityChecker::new(50.0);
//! let fingertips = [(FingerTip::Index, PixelPoint::new(130.0, 100.0))];
//! let mouth = PixelPoint::new(100.0, 100.0);
//!
//! let report = checker.check(&fingertips, mouth, false);
//! assert!(report.triggered); // 30px < 50px
//! ```
//!
//! ## Complete pipeline
//!
//! ```no_run
//! use nailguard::app::{AppConfig, GuiMode, NailGuardApp, VideoSource};
//! use nailguard::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = NailGuardApp::new(AppConfig {
//!     video_source: VideoSource::Camera(0),
//!     gui_mode: GuiMode::Full,
//!     config: Config::default(),
//! })?;
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Face detection module for finding faces in frames
pub mod face_detection;

/// Dense face mesh landmark detection
pub mod face_mesh;

/// Palm detection module for finding hands in frames
pub mod palm_detection;

/// Hand landmark detection (21-point skeleton and handedness)
pub mod hand_landmark;

/// SSD anchor grids and box decoding shared by the detectors
pub mod anchors;

/// Landmark coordinate types and distance math
pub mod geometry;

/// The fingertip-to-mouth proximity check
pub mod proximity;

/// Detection events, debouncing, and session statistics
pub mod events;

/// Frame annotation (skeletons, warning banner, HUD)
pub mod overlay;

/// Utility functions for image preparation and coordinate handling
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
