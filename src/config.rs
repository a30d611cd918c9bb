//! Configuration management for the nail-biting detector

use crate::constants::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_HANDS, DEFAULT_PROXIMITY_THRESHOLD, FACE_ROI_EXPANSION,
    HAND_ROI_EXPANSION,
};
use crate::geometry::MouthAnchor;
use crate::proximity::MouthFallback;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model file paths
    pub models: ModelConfig,

    /// Detector thresholds and limits
    pub detection: DetectionConfig,

    /// Proximity check parameters
    pub proximity: ProximityConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Event tracking configuration
    pub events: EventConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the face detection ONNX model
    pub face_detector: PathBuf,

    /// Path to the face mesh ONNX model
    pub face_mesh: PathBuf,

    /// Path to the palm detection ONNX model
    pub palm_detector: PathBuf,

    /// Path to the hand landmark ONNX model
    pub hand_landmarks: PathBuf,
}

/// Detector parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Confidence threshold for face detection (0.0-1.0)
    pub face_confidence: f32,

    /// IOU threshold for face non-maximum suppression (0.0-1.0)
    pub face_iou: f32,

    /// Confidence threshold for palm detection (0.0-1.0)
    pub palm_confidence: f32,

    /// IOU threshold for palm non-maximum suppression (0.0-1.0)
    pub palm_iou: f32,

    /// Maximum number of hands processed per frame
    pub max_hands: usize,

    /// Face box expansion before mesh inference
    pub face_roi_expansion: f32,

    /// Palm box expansion to cover the whole hand
    pub hand_roi_expansion: f32,
}

/// Proximity check parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Fingertip-to-mouth trigger distance in pixels.
    ///
    /// Resolution-dependent: the default of 50 assumes a 640×480 feed.
    pub threshold_px: f32,

    /// Mouth anchor mode: "lower-lip" or "center"
    pub mouth_anchor: String,

    /// Policy for frames without a detected face: "skip" or "carry"
    pub fallback: String,

    /// Hold time in milliseconds before a detection becomes an event
    pub debounce_ms: u64,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Video window title
    pub window_title: String,

    /// Mirror the image horizontally
    pub flip: bool,

    /// Draw the face mesh point cloud
    pub draw_mesh: bool,

    /// Draw hand skeletons
    pub draw_skeleton: bool,

    /// Face mesh subsampling step for drawing
    pub mesh_draw_step: usize,
}

/// Event tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Statistics window in minutes
    pub window_minutes: u64,

    /// Rolling frame-history length for the hit rate
    pub history_frames: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            detection: DetectionConfig::default(),
            proximity: ProximityConfig::default(),
            display: DisplayConfig::default(),
            events: EventConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from("assets/face_detector.onnx"),
            face_mesh: PathBuf::from("assets/face_mesh.onnx"),
            palm_detector: PathBuf::from("assets/palm_detector.onnx"),
            hand_landmarks: PathBuf::from("assets/hand_landmarks.onnx"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            face_confidence: 0.7,
            face_iou: 0.4,
            palm_confidence: 0.7,
            palm_iou: 0.3,
            max_hands: DEFAULT_MAX_HANDS,
            face_roi_expansion: FACE_ROI_EXPANSION,
            hand_roi_expansion: HAND_ROI_EXPANSION,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_PROXIMITY_THRESHOLD,
            mouth_anchor: "lower-lip".to_string(),
            fallback: "skip".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: "Webcam Feed".to_string(),
            flip: false,
            draw_mesh: true,
            draw_skeleton: true,
            mesh_draw_step: 4,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            window_minutes: 5,
            history_frames: 300,
        }
    }
}

impl ProximityConfig {
    /// Parse the mouth anchor mode
    ///
    /// # Errors
    ///
    /// Returns an error for unknown anchor names
    pub fn anchor(&self) -> Result<MouthAnchor> {
        match self.mouth_anchor.as_str() {
            "lower-lip" | "lower_lip" => Ok(MouthAnchor::LowerLip),
            "center" => Ok(MouthAnchor::Center),
            other => Err(Error::ConfigError(format!("Unknown mouth anchor: {other}"))),
        }
    }

    /// Parse the missing-face fallback policy
    ///
    /// # Errors
    ///
    /// Returns an error for unknown policy names
    pub fn fallback_policy(&self) -> Result<MouthFallback> {
        match self.fallback.as_str() {
            "skip" => Ok(MouthFallback::Skip),
            "carry" | "carry-over" | "carry_over" => Ok(MouthFallback::CarryOver),
            other => Err(Error::ConfigError(format!("Unknown mouth fallback policy: {other}"))),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("face_confidence", self.detection.face_confidence),
            ("face_iou", self.detection.face_iou),
            ("palm_confidence", self.detection.palm_confidence),
            ("palm_iou", self.detection.palm_iou),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0")));
            }
        }

        if self.detection.max_hands == 0 {
            return Err(Error::ConfigError("max_hands must be greater than 0".to_string()));
        }

        if !self.proximity.threshold_px.is_finite() || self.proximity.threshold_px <= 0.0 {
            return Err(Error::ConfigError(
                "Proximity threshold must be a positive number of pixels".to_string(),
            ));
        }
        self.proximity.anchor()?;
        self.proximity.fallback_policy()?;

        if self.events.window_minutes == 0 {
            return Err(Error::ConfigError("Event window must be at least one minute".to_string()));
        }

        // Model paths must exist before the detectors try to load them
        for (name, path) in [
            ("Face detector", &self.models.face_detector),
            ("Face mesh", &self.models.face_mesh),
            ("Palm detector", &self.models.palm_detector),
            ("Hand landmark", &self.models.hand_landmarks),
        ] {
            if !path.exists() {
                return Err(Error::ConfigError(format!("{name} model not found: {}", path.display())));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Nailguard Configuration

# Model paths
models:
  face_detector: "assets/face_detector.onnx"
  face_mesh: "assets/face_mesh.onnx"
  palm_detector: "assets/palm_detector.onnx"
  hand_landmarks: "assets/hand_landmarks.onnx"

# Detector parameters
detection:
  face_confidence: 0.7
  face_iou: 0.4
  palm_confidence: 0.7
  palm_iou: 0.3
  max_hands: 2
  face_roi_expansion: 0.25
  hand_roi_expansion: 0.5

# Proximity check
proximity:
  threshold_px: 50.0
  mouth_anchor: "lower-lip"
  fallback: "skip"
  debounce_ms: 300

# Display settings
display:
  window_title: "Webcam Feed"
  flip: false
  draw_mesh: true
  draw_skeleton: true
  mesh_draw_step: 4

# Event tracking
events:
  window_minutes: 5
  history_frames: 300
"#;
