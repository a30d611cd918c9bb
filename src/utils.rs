//! Utility functions for image preparation and coordinate handling.

pub mod safe_cast;
pub mod tensor;

use crate::Result;
use opencv::core::{Mat, Rect, Scalar, Size};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use safe_cast::f32_to_i32_clamp;

/// Expand a detection box by `shift` of its size on every side, square it,
/// and clamp it to the image bounds.
///
/// Landmark models are trained on square crops with margin around the
/// detection, so every box goes through this before ROI extraction.
#[must_use]
#[allow(clippy::cast_precision_loss)] // box dimensions are small
pub fn expand_to_square(bbox: Rect, max_width: i32, max_height: i32, shift: f32) -> Rect {
    let x_shift = f32_to_i32_clamp(bbox.width as f32 * shift, 0, max_width);
    let y_shift = f32_to_i32_clamp(bbox.height as f32 * shift, 0, max_height);

    let mut out = bbox;
    out.x = (out.x - x_shift).max(0);
    out.y = (out.y - y_shift).max(0);
    out.width = (out.width + 2 * x_shift).min(max_width - out.x);
    out.height = (out.height + 2 * y_shift).min(max_height - out.y);

    // Square it on the longer side
    let side = out.width.max(out.height).min(max_width).min(max_height);
    out.width = side;
    out.height = side;

    if out.x + out.width > max_width {
        out.x = max_width - out.width;
    }
    if out.y + out.height > max_height {
        out.y = max_height - out.height;
    }

    out
}

/// Resize an image into a square model input, preserving aspect ratio and
/// padding the remainder with black.
///
/// Returns the padded image and the scale factor from original pixels to
/// model-input pixels (`input_px = original_px * scale`).
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
pub fn letterbox(image: &Mat, input_size: i32) -> Result<(Mat, f32)> {
    let img_width = image.cols();
    let img_height = image.rows();

    let (new_width, new_height) = if img_height > img_width {
        let h = input_size;
        let w = (h as f32 * img_width as f32 / img_height as f32) as i32;
        (w.max(1), h)
    } else {
        let w = input_size;
        let h = (w as f32 * img_height as f32 / img_width as f32) as i32;
        (w, h.max(1))
    };

    let scale = new_height as f32 / img_height as f32;

    let mut resized = Mat::default();
    imgproc::resize(
        image,
        &mut resized,
        Size::new(new_width, new_height),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut padded = Mat::new_rows_cols_with_default(
        input_size,
        input_size,
        opencv::core::CV_8UC3,
        Scalar::all(0.0),
    )?;
    let mut roi = padded.roi_mut(Rect::new(0, 0, new_width, new_height))?;
    resized.copy_to(&mut roi)?;

    Ok((padded, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_to_square_is_square() {
        let out = expand_to_square(Rect::new(10, 10, 50, 40), 200, 200, 0.1);
        assert_eq!(out.width, out.height);
        assert!(out.width > 50);
    }

    #[test]
    fn test_expand_to_square_stays_in_bounds() {
        let cases = [
            Rect::new(190, 190, 20, 20),
            Rect::new(0, 0, 10, 10),
            Rect::new(50, 180, 60, 60),
        ];
        for bbox in cases {
            let out = expand_to_square(bbox, 200, 200, 0.5);
            assert!(out.x >= 0);
            assert!(out.y >= 0);
            assert!(out.x + out.width <= 200);
            assert!(out.y + out.height <= 200);
            assert_eq!(out.width, out.height);
        }
    }

    #[test]
    fn test_expand_to_square_zero_shift_squares_only() {
        let out = expand_to_square(Rect::new(20, 20, 30, 50), 200, 200, 0.0);
        assert_eq!(out.width, 50);
        assert_eq!(out.height, 50);
    }
}
