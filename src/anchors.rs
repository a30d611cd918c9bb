//! SSD anchor grids and box decoding shared by the face and palm detectors.
//!
//! Both detector models predict box offsets relative to a fixed grid of
//! anchor centers. The grid depends only on the model input size and its
//! stride layout, so grids are generated once and cached per configuration,
//! keyed the same way across detectors.

use ndarray::Array2;
use std::collections::HashMap;

use crate::constants::SCORE_CLIPPING_THRESHOLD;

/// Cached generator for SSD anchor-center grids
#[derive(Default)]
pub struct AnchorGrid {
    cache: HashMap<(i32, Vec<i32>, Vec<usize>), Array2<f32>>,
}

impl AnchorGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor centers for the given input size and stride layout, normalized
    /// to `[0, 1]`. Each stride contributes a `(input/stride)²` cell grid
    /// with `anchors_per_cell[i]` anchors at each cell center.
    pub fn centers(&mut self, input_size: i32, strides: &[i32], anchors_per_cell: &[usize]) -> &Array2<f32> {
        let key = (input_size, strides.to_vec(), anchors_per_cell.to_vec());
        self.cache
            .entry(key)
            .or_insert_with(|| generate_centers(input_size, strides, anchors_per_cell))
    }
}

#[allow(clippy::cast_precision_loss)] // grid coordinates are small integers
fn generate_centers(input_size: i32, strides: &[i32], anchors_per_cell: &[usize]) -> Array2<f32> {
    let mut centers = Vec::new();

    for (&stride, &per_cell) in strides.iter().zip(anchors_per_cell) {
        let cells = input_size / stride;
        for y in 0..cells {
            for x in 0..cells {
                // Cell-center convention: offset by half a stride
                let cx = (x as f32 + 0.5) * stride as f32 / input_size as f32;
                let cy = (y as f32 + 0.5) * stride as f32 / input_size as f32;
                for _ in 0..per_cell {
                    centers.push(cx);
                    centers.push(cy);
                }
            }
        }
    }

    let n = centers.len() / 2;
    Array2::from_shape_vec((n, 2), centers).expect("anchor center grid shape mismatch")
}

/// Decode raw SSD regressor output into normalized `[x1, y1, x2, y2]` boxes.
///
/// `raw` is laid out as `values_per_anchor` floats per anchor, the first four
/// being center-x, center-y, width, height offsets in input-pixel units.
#[must_use]
pub fn decode_boxes(
    raw: &[f32],
    values_per_anchor: usize,
    anchors: &Array2<f32>,
    input_size: f32,
) -> Array2<f32> {
    let n = anchors.shape()[0];
    let mut boxes = Array2::zeros((n, 4));

    for i in 0..n {
        let base = i * values_per_anchor;
        if base + 3 >= raw.len() {
            break;
        }

        let cx = anchors[[i, 0]] + raw[base] / input_size;
        let cy = anchors[[i, 1]] + raw[base + 1] / input_size;
        let w = raw[base + 2] / input_size;
        let h = raw[base + 3] / input_size;

        boxes[[i, 0]] = cx - w / 2.0;
        boxes[[i, 1]] = cy - h / 2.0;
        boxes[[i, 2]] = cx + w / 2.0;
        boxes[[i, 3]] = cy + h / 2.0;
    }

    boxes
}

/// Sigmoid with logit clamping, applied to raw detector scores
#[must_use]
pub fn score_sigmoid(logit: f32) -> f32 {
    let clipped = logit.clamp(-SCORE_CLIPPING_THRESHOLD, SCORE_CLIPPING_THRESHOLD);
    1.0 / (1.0 + (-clipped).exp())
}

/// Non-maximum suppression over normalized boxes.
///
/// `order` must list candidate indices sorted by descending score. Returns
/// the indices (into `boxes`) that survive.
#[must_use]
pub fn non_max_suppression(boxes: &Array2<f32>, order: &[usize], iou_threshold: f32) -> Vec<usize> {
    let mut keep = Vec::new();
    let mut order = order.to_vec();

    while let Some(&i) = order.first() {
        keep.push(i);
        if order.len() == 1 {
            break;
        }

        let area_i = box_area(boxes, i);
        order = order
            .iter()
            .skip(1)
            .copied()
            .filter(|&j| {
                let x1 = boxes[[i, 0]].max(boxes[[j, 0]]);
                let y1 = boxes[[i, 1]].max(boxes[[j, 1]]);
                let x2 = boxes[[i, 2]].min(boxes[[j, 2]]);
                let y2 = boxes[[i, 3]].min(boxes[[j, 3]]);

                let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
                let union = area_i + box_area(boxes, j) - inter;
                let iou = if union > 0.0 { inter / union } else { 0.0 };

                iou <= iou_threshold
            })
            .collect();
    }

    keep
}

fn box_area(boxes: &Array2<f32>, i: usize) -> f32 {
    (boxes[[i, 2]] - boxes[[i, 0]]).max(0.0) * (boxes[[i, 3]] - boxes[[i, 1]]).max(0.0)
}
