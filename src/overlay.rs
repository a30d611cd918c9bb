//! Frame annotation: skeletons, mesh points, warning banner, HUD.

use crate::constants::HAND_CONNECTIONS;
use crate::geometry::PixelPoint;
use crate::utils::safe_cast::f32_to_i32_clamp;
use crate::Result;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8};
use opencv::prelude::*;

fn clamp_to_frame(p: PixelPoint, cols: i32, rows: i32) -> Point {
    Point::new(f32_to_i32_clamp(p.x, 0, cols), f32_to_i32_clamp(p.y, 0, rows))
}

/// Green fingertip/landmark color
fn skeleton_color() -> Scalar {
    Scalar::new(100.0, 255.0, 0.0, 0.0)
}

/// Draw the 21-point hand skeleton: bones as lines, joints as dots
pub fn draw_hand_skeleton(frame: &mut Mat, points: &[PixelPoint]) -> Result<()> {
    let cols = frame.cols();
    let rows = frame.rows();

    for &(a, b) in &HAND_CONNECTIONS {
        if let (Some(&pa), Some(&pb)) = (points.get(a), points.get(b)) {
            let pa = clamp_to_frame(pa, cols, rows);
            let pb = clamp_to_frame(pb, cols, rows);
            imgproc::line(frame, pa, pb, skeleton_color(), 1, LINE_8, 0)?;
        }
    }

    for &point in points {
        let center = clamp_to_frame(point, cols, rows);
        imgproc::circle(frame, center, 3, skeleton_color(), -1, LINE_8, 0)?;
    }

    Ok(())
}

/// Draw a subsampled face mesh point cloud.
///
/// Drawing all 468 points every frame is visual noise; `step` controls the
/// subsampling (1 draws everything).
pub fn draw_face_mesh(frame: &mut Mat, points: &[PixelPoint], step: usize) -> Result<()> {
    let cols = frame.cols();
    let rows = frame.rows();
    let color = Scalar::new(200.0, 200.0, 200.0, 0.0);

    for &point in points.iter().step_by(step.max(1)) {
        let center = clamp_to_frame(point, cols, rows);
        imgproc::circle(frame, center, 1, color, -1, LINE_8, 0)?;
    }
    Ok(())
}

/// Draw the mouth reference marker; stale carried-over points are amber
pub fn draw_mouth_marker(frame: &mut Mat, mouth: PixelPoint, stale: bool) -> Result<()> {
    let color = if stale {
        Scalar::new(0.0, 180.0, 255.0, 0.0)
    } else {
        Scalar::new(255.0, 100.0, 0.0, 0.0)
    };
    let center = clamp_to_frame(mouth, frame.cols(), frame.rows());
    imgproc::circle(frame, center, 6, color, -1, LINE_8, 0)?;
    Ok(())
}

/// Highlight a fingertip that is inside the proximity threshold
pub fn draw_fingertip_alert(frame: &mut Mat, tip: PixelPoint) -> Result<()> {
    let center = clamp_to_frame(tip, frame.cols(), frame.rows());
    imgproc::circle(frame, center, 8, Scalar::new(0.0, 0.0, 255.0, 0.0), 2, LINE_8, 0)?;
    Ok(())
}

/// Fixed-position warning banner shown while any fingertip is triggering
pub fn draw_warning(frame: &mut Mat) -> Result<()> {
    imgproc::put_text(
        frame,
        "Nail Biting Detected!",
        Point::new(50, 50),
        FONT_HERSHEY_SIMPLEX,
        1.0,
        Scalar::new(0.0, 0.0, 255.0, 0.0),
        2,
        LINE_8,
        false,
    )?;
    Ok(())
}

/// FPS, attempt counter and hit rate in the lower-left corner
pub fn draw_hud(frame: &mut Mat, fps: f64, attempts: usize, hit_rate: f64) -> Result<()> {
    let rows = frame.rows();
    let hud = format!(
        "FPS: {fps:.1}  attempts: {attempts}  hit rate: {:.0}%",
        hit_rate * 100.0
    );
    imgproc::put_text(
        frame,
        &hud,
        Point::new(10, rows - 15),
        FONT_HERSHEY_SIMPLEX,
        0.5,
        Scalar::new(0.0, 255.0, 0.0, 0.0),
        1,
        LINE_8,
        false,
    )?;
    Ok(())
}
