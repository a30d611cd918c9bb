//! Helper functions and utilities for tests
#![allow(dead_code)]

use nailguard::Result;
use opencv::{core::Mat, prelude::*};

/// Create a black test image with the specified dimensions and type
pub fn create_test_image(height: i32, width: i32, cv_type: i32) -> Result<Mat> {
    Mat::zeros(height, width, cv_type)?.to_mat().map_err(Into::into)
}

/// Fingertip positions laid out at fixed distances from a mouth point
pub fn fingertip_row(
    start_x: f32,
    y: f32,
    spacing: f32,
) -> Vec<(nailguard::geometry::FingerTip, nailguard::geometry::PixelPoint)> {
    nailguard::geometry::FingerTip::ALL
        .iter()
        .enumerate()
        .map(|(i, &tip)| {
            (
                tip,
                nailguard::geometry::PixelPoint::new(start_x + spacing * i as f32, y),
            )
        })
        .collect()
}
