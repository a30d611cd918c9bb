//! Hand landmark detection using ONNX Runtime.
//!
//! Runs on a square hand crop and reports the 21-point hand skeleton
//! normalized to the crop, a hand-presence score, and which hand it is.

use crate::constants::{HAND_LANDMARK_INPUT_SIZE, NUM_HAND_LANDMARKS};
use crate::events::Handedness;
use crate::geometry::{FingerTip, Landmark};
use crate::utils::tensor::{image_tensor, TensorLayout};
use crate::Result;
use ndarray::CowArray;
use opencv::core::Mat;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Coordinates per hand landmark in the raw model output (x, y, z)
const COORDS_PER_LANDMARK: usize = 3;

/// Handedness decision boundary on the sigmoid output
const HANDEDNESS_MIDPOINT: f32 = 0.5;

/// A detected hand skeleton
#[derive(Debug, Clone)]
pub struct HandLandmarks {
    /// 21 landmarks normalized to `[0, 1]` of the hand crop
    pub landmarks: Vec<Landmark>,
    /// Hand-presence confidence
    pub presence: f32,
    /// Which hand the detector believes this is (image-frame convention)
    pub handedness: Handedness,
    /// Raw handedness confidence for the reported side
    pub handedness_score: f32,
}

impl HandLandmarks {
    /// The five fingertip landmarks in thumb-to-pinky order
    #[must_use]
    pub fn fingertips(&self) -> Vec<(FingerTip, Landmark)> {
        FingerTip::ALL
            .iter()
            .filter_map(|&tip| self.landmarks.get(tip.landmark_index()).map(|&lm| (tip, lm)))
            .collect()
    }
}

/// Hand landmark detector
pub struct HandLandmarkDetector {
    session: Session,
    input_size: i32,
}

impl HandLandmarkDetector {
    /// Create a new hand landmark detector from an ONNX model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has an unexpected
    /// structure.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!(
            "Initializing HandLandmarkDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("hand_landmarks")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.outputs.len() < 3 {
            return Err(crate::error::Error::ModelOutputError(
                "Hand landmark model must output landmarks, presence and handedness".to_string(),
            ));
        }

        Ok(Self {
            session,
            input_size: HAND_LANDMARK_INPUT_SIZE,
        })
    }

    /// Detect hand landmarks in a square hand crop
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference, or output extraction
    /// fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn detect(&self, hand_roi: &Mat) -> Result<HandLandmarks> {
        let inputs = image_tensor(hand_roi, self.input_size, 0.0, 255.0, TensorLayout::Nhwc)?;

        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let marks_output = outputs[0].try_extract::<f32>()?;
        let marks_view = marks_output.view();
        let marks = marks_view
            .as_slice()
            .ok_or_else(|| crate::error::Error::ModelOutputError("Landmark output not contiguous".to_string()))?;

        let expected = NUM_HAND_LANDMARKS * COORDS_PER_LANDMARK;
        if marks.len() < expected {
            return Err(crate::error::Error::ModelDataFormatError(format!(
                "Expected {expected} landmark values, model produced {}",
                marks.len()
            )));
        }

        let presence = Self::scalar_output(&outputs, 1, "hand presence score")?;
        let handedness_prob = crate::anchors::score_sigmoid(Self::scalar_output(&outputs, 2, "handedness score")?);

        let (handedness, handedness_score) = if handedness_prob > HANDEDNESS_MIDPOINT {
            (Handedness::Right, handedness_prob)
        } else {
            (Handedness::Left, 1.0 - handedness_prob)
        };

        let scale = self.input_size as f32;
        let landmarks = (0..NUM_HAND_LANDMARKS)
            .map(|i| {
                let base = i * COORDS_PER_LANDMARK;
                Landmark::new(marks[base] / scale, marks[base + 1] / scale)
            })
            .collect();

        Ok(HandLandmarks {
            landmarks,
            presence: crate::anchors::score_sigmoid(presence),
            handedness,
            handedness_score,
        })
    }

    fn scalar_output(outputs: &[Value], index: usize, what: &str) -> Result<f32> {
        let tensor = outputs[index].try_extract::<f32>()?;
        let view = tensor.view();
        view.as_slice()
            .and_then(<[f32]>::first)
            .copied()
            .ok_or_else(|| crate::error::Error::ModelOutputError(format!("Missing {what}")))
    }
}
