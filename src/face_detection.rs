//! Face detection using a BlazeFace short-range ONNX model.
//!
//! The detector runs on the full frame and produces pixel-space bounding
//! boxes; the face mesh model then runs on a square crop of each box.

use crate::anchors::{decode_boxes, non_max_suppression, score_sigmoid, AnchorGrid};
use crate::constants::{
    DETECTOR_NORMALIZATION_OFFSET, DETECTOR_NORMALIZATION_SCALE, FACE_DETECTOR_INPUT_SIZE,
};
use crate::utils::letterbox;
use crate::utils::tensor::{image_tensor, TensorLayout};
use crate::Result;
use ndarray::CowArray;
use opencv::core::{Mat, Rect};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Anchor layout of the short-range model: 128×128 input, a dense stride-8
/// grid with two anchors per cell and a stride-16 grid with six.
const STRIDES: [i32; 2] = [8, 16];
const ANCHORS_PER_CELL: [usize; 2] = [2, 6];

/// Regressor values per anchor (box + six keypoints, unused here)
const VALUES_PER_ANCHOR: usize = 16;

/// Face detection result
#[derive(Debug, Clone)]
pub struct FaceDetection {
    /// Bounding box of the detected face in frame pixels
    pub bbox: Rect,
    /// Confidence score of the detection
    pub score: f32,
}

/// BlazeFace face detector backed by ONNX Runtime
pub struct FaceDetector {
    session: Session,
    input_size: i32,
    conf_threshold: f32,
    nms_threshold: f32,
    anchor_grid: AnchorGrid,
}

impl FaceDetector {
    /// Create a new face detector from an ONNX model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or the ONNX runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P, conf_threshold: f32, nms_threshold: f32) -> Result<Self> {
        log::info!(
            "Initializing FaceDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("face_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(crate::error::Error::ModelInputError("Model has no inputs".to_string()));
        }
        if session.outputs.len() < 2 {
            return Err(crate::error::Error::ModelOutputError(
                "Face detector must output regressors and scores".to_string(),
            ));
        }

        Ok(Self {
            session,
            input_size: FACE_DETECTOR_INPUT_SIZE,
            conf_threshold,
            nms_threshold,
            anchor_grid: AnchorGrid::new(),
        })
    }

    /// Detect faces in a frame
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or model inference fails.
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn detect(&mut self, image: &Mat) -> Result<Vec<FaceDetection>> {
        let img_width = image.cols();
        let img_height = image.rows();

        let (padded, det_scale) = letterbox(image, self.input_size)?;
        let inputs = image_tensor(
            &padded,
            self.input_size,
            DETECTOR_NORMALIZATION_OFFSET,
            DETECTOR_NORMALIZATION_SCALE,
            TensorLayout::Nchw,
        )?;

        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let regressors = outputs[0].try_extract::<f32>()?;
        let regressors_view = regressors.view();
        let raw_boxes = regressors_view
            .as_slice()
            .ok_or_else(|| crate::error::Error::ModelOutputError("Regressor output not contiguous".to_string()))?;

        let scores_output = outputs[1].try_extract::<f32>()?;
        let scores_view = scores_output.view();
        let raw_scores = scores_view
            .as_slice()
            .ok_or_else(|| crate::error::Error::ModelOutputError("Score output not contiguous".to_string()))?;

        let anchors = self
            .anchor_grid
            .centers(self.input_size, &STRIDES, &ANCHORS_PER_CELL)
            .clone();

        if raw_scores.len() < anchors.shape()[0] {
            return Err(crate::error::Error::ModelDataFormatError(format!(
                "Expected {} anchor scores, model produced {}",
                anchors.shape()[0],
                raw_scores.len()
            )));
        }

        let boxes = decode_boxes(raw_boxes, VALUES_PER_ANCHOR, &anchors, self.input_size as f32);

        // Threshold, then sort survivors by descending score for NMS
        let scores: Vec<f32> = raw_scores.iter().map(|&logit| score_sigmoid(logit)).collect();
        let mut candidates: Vec<usize> = (0..anchors.shape()[0])
            .filter(|&i| scores[i] >= self.conf_threshold)
            .collect();
        candidates.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));

        let keep = non_max_suppression(&boxes, &candidates, self.nms_threshold);

        // Map normalized boxes back through the letterbox to frame pixels
        let to_frame = self.input_size as f32 / det_scale;
        let mut detections = Vec::with_capacity(keep.len());
        for idx in keep {
            let x1 = (boxes[[idx, 0]] * to_frame).max(0.0);
            let y1 = (boxes[[idx, 1]] * to_frame).max(0.0);
            let x2 = (boxes[[idx, 2]] * to_frame).min(img_width as f32);
            let y2 = (boxes[[idx, 3]] * to_frame).min(img_height as f32);

            let width = (x2 - x1) as i32;
            let height = (y2 - y1) as i32;
            if width <= 0 || height <= 0 {
                continue;
            }

            detections.push(FaceDetection {
                bbox: Rect::new(x1 as i32, y1 as i32, width, height),
                score: scores[idx],
            });
        }

        Ok(detections)
    }
}
