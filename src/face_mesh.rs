//! Dense face mesh detection using ONNX Runtime.
//!
//! Runs on a square face crop and reports 468 landmarks normalized to the
//! crop, plus a face-presence score. The mouth reference point used by the
//! proximity check is read from this mesh.

use crate::constants::{FACE_MESH_INPUT_SIZE, NUM_FACE_MESH_LANDMARKS};
use crate::geometry::Landmark;
use crate::utils::tensor::{image_tensor, TensorLayout};
use crate::Result;
use ndarray::CowArray;
use opencv::core::Mat;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Coordinates per mesh landmark in the raw model output (x, y, z)
const COORDS_PER_LANDMARK: usize = 3;

/// A detected face mesh
#[derive(Debug, Clone)]
pub struct FaceMesh {
    /// 468 landmarks normalized to `[0, 1]` of the face crop
    pub landmarks: Vec<Landmark>,
    /// Face-presence confidence
    pub score: f32,
}

/// Face mesh landmark detector
pub struct FaceMeshDetector {
    session: Session,
    input_size: i32,
}

impl FaceMeshDetector {
    /// Create a new face mesh detector from an ONNX model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has an unexpected
    /// structure.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!(
            "Initializing FaceMeshDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("face_mesh")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.outputs.len() < 2 {
            return Err(crate::error::Error::ModelOutputError(
                "Face mesh model must output landmarks and a presence score".to_string(),
            ));
        }

        Ok(Self {
            session,
            input_size: FACE_MESH_INPUT_SIZE,
        })
    }

    /// Detect the face mesh in a square face crop
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference, or output extraction
    /// fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn detect(&self, face_roi: &Mat) -> Result<FaceMesh> {
        let inputs = image_tensor(face_roi, self.input_size, 0.0, 255.0, TensorLayout::Nhwc)?;

        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let marks_output = outputs[0].try_extract::<f32>()?;
        let marks_view = marks_output.view();
        let marks = marks_view
            .as_slice()
            .ok_or_else(|| crate::error::Error::ModelOutputError("Landmark output not contiguous".to_string()))?;

        let expected = NUM_FACE_MESH_LANDMARKS * COORDS_PER_LANDMARK;
        if marks.len() < expected {
            return Err(crate::error::Error::ModelDataFormatError(format!(
                "Expected {expected} mesh values, model produced {}",
                marks.len()
            )));
        }

        let score_output = outputs[1].try_extract::<f32>()?;
        let score_view = score_output.view();
        let score = score_view
            .as_slice()
            .and_then(<[f32]>::first)
            .copied()
            .map(crate::anchors::score_sigmoid)
            .ok_or_else(|| crate::error::Error::ModelOutputError("Missing face presence score".to_string()))?;

        // Raw coordinates are in input-pixel units; normalize to the crop
        let scale = self.input_size as f32;
        let landmarks = (0..NUM_FACE_MESH_LANDMARKS)
            .map(|i| {
                let base = i * COORDS_PER_LANDMARK;
                Landmark::new(marks[base] / scale, marks[base + 1] / scale)
            })
            .collect();

        Ok(FaceMesh { landmarks, score })
    }
}
