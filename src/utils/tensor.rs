//! OpenCV Mat to ndarray tensor conversion for model input.

use crate::utils::safe_cast::usize_to_i32;
use crate::Result;
use ndarray::Array4;
use opencv::core::{Mat, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Memory layout of the produced input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// Batch, channels, height, width
    Nchw,
    /// Batch, height, width, channels
    Nhwc,
}

/// Convert a BGR image into a single-batch float input tensor.
///
/// The image is resized to `size`×`size`, converted to RGB and normalized as
/// `(pixel - offset) / scale`.
///
/// # Errors
///
/// Returns an error if any OpenCV conversion fails or the image dimensions
/// do not fit the tensor shape.
#[allow(clippy::cast_sign_loss)] // model input sizes are positive
pub fn image_tensor(image: &Mat, size: i32, offset: f32, scale: f32, layout: TensorLayout) -> Result<Array4<f32>> {
    let mut resized = Mat::default();
    imgproc::resize(
        image,
        &mut resized,
        Size::new(size, size),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut rgb = Mat::default();
    imgproc::cvt_color(&resized, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let mut float_image = Mat::default();
    rgb.convert_to(&mut float_image, CV_32F, 1.0, 0.0)?;

    let side = size as usize;
    let channels = 3;
    let mut data = vec![0.0f32; side * side * channels];

    for row in 0..side {
        for col in 0..side {
            let pixel = float_image.at_2d::<opencv::core::Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
            for ch in 0..channels {
                let idx = (row * side + col) * channels + ch;
                data[idx] = (pixel[ch] - offset) / scale;
            }
        }
    }

    let mut array = Array4::from_shape_vec((1, side, side, channels), data)
        .map_err(|e| crate::error::Error::ModelDataFormatError(format!("Failed to create input tensor: {e}")))?;

    if layout == TensorLayout::Nchw {
        array = array.permuted_axes([0, 3, 1, 2]);
    }

    Ok(array)
}
