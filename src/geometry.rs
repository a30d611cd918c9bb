//! Landmark coordinate types and the fingertip-to-mouth distance math.
//!
//! Detectors report landmarks normalized to `[0, 1]` of whatever image they
//! ran on (a full frame or a cropped region). Everything downstream works in
//! frame pixels, so this module owns the conversions and the one distance
//! formula the whole application turns on.

use opencv::core::Rect;

use crate::constants::{
    INDEX_FINGER_TIP, MIDDLE_FINGER_TIP, MOUTH_LEFT_CORNER, MOUTH_LOWER_LIP, MOUTH_RIGHT_CORNER,
    MOUTH_UPPER_LIP, PINKY_TIP, RING_FINGER_TIP, THUMB_TIP,
};

/// A detector-reported keypoint, normalized to `[0, 1]` of its source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert to pixel coordinates by multiplying by the image dimensions
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // frame dimensions fit f32 exactly
    pub fn to_pixel(self, width: i32, height: i32) -> PixelPoint {
        PixelPoint {
            x: self.x * width as f32,
            y: self.y * height as f32,
        }
    }

    /// Re-express a landmark normalized to a region of interest as a landmark
    /// normalized to the full frame containing that region.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reframe(self, roi: Rect, frame_width: i32, frame_height: i32) -> Self {
        let px = roi.x as f32 + self.x * roi.width as f32;
        let py = roi.y as f32 + self.y * roi.height as f32;
        Self {
            x: px / frame_width as f32,
            y: py / frame_height as f32,
        }
    }
}

/// A point in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two pixel points.
///
/// Exact `sqrt(dx² + dy²)`, no normalization.
#[must_use]
pub fn euclidean_distance(a: PixelPoint, b: PixelPoint) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// The five tracked fingertips of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerTip {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerTip {
    /// All fingertips in thumb-to-pinky order
    pub const ALL: [FingerTip; 5] = [
        FingerTip::Thumb,
        FingerTip::Index,
        FingerTip::Middle,
        FingerTip::Ring,
        FingerTip::Pinky,
    ];

    /// Index of this fingertip in the 21-point hand landmark set
    #[must_use]
    pub fn landmark_index(self) -> usize {
        match self {
            FingerTip::Thumb => THUMB_TIP,
            FingerTip::Index => INDEX_FINGER_TIP,
            FingerTip::Middle => MIDDLE_FINGER_TIP,
            FingerTip::Ring => RING_FINGER_TIP,
            FingerTip::Pinky => PINKY_TIP,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FingerTip::Thumb => "thumb",
            FingerTip::Index => "index",
            FingerTip::Middle => "middle",
            FingerTip::Ring => "ring",
            FingerTip::Pinky => "pinky",
        }
    }
}

/// Which facial landmark(s) stand in for the mouth position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthAnchor {
    /// Single lower-lip landmark (index 13)
    LowerLip,
    /// Average of the four inner-lip landmarks
    Center,
}

/// Compute the mouth reference point from a frame-normalized face mesh.
///
/// Returns `None` when the mesh does not carry the required landmarks.
#[must_use]
pub fn mouth_reference(
    landmarks: &[Landmark],
    anchor: MouthAnchor,
    frame_width: i32,
    frame_height: i32,
) -> Option<PixelPoint> {
    match anchor {
        MouthAnchor::LowerLip => landmarks
            .get(MOUTH_LOWER_LIP)
            .map(|lm| lm.to_pixel(frame_width, frame_height)),
        MouthAnchor::Center => {
            let indices = [
                MOUTH_LOWER_LIP,
                MOUTH_UPPER_LIP,
                MOUTH_RIGHT_CORNER,
                MOUTH_LEFT_CORNER,
            ];
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for idx in indices {
                let lm = landmarks.get(idx)?;
                sum_x += lm.x;
                sum_y += lm.y;
            }
            let center = Landmark::new(sum_x / 4.0, sum_y / 4.0);
            Some(center.to_pixel(frame_width, frame_height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_scales_by_frame_dimensions() {
        let lm = Landmark::new(0.5, 0.25);
        let px = lm.to_pixel(640, 480);
        assert_eq!(px.x, 320.0);
        assert_eq!(px.y, 120.0);
    }

    #[test]
    fn test_euclidean_distance_exact() {
        let mouth = PixelPoint::new(100.0, 100.0);
        assert_eq!(euclidean_distance(PixelPoint::new(130.0, 100.0), mouth), 30.0);
        assert_eq!(euclidean_distance(PixelPoint::new(160.0, 100.0), mouth), 60.0);
        assert_eq!(euclidean_distance(PixelPoint::new(103.0, 104.0), mouth), 5.0);
    }

    #[test]
    fn test_reframe_maps_roi_into_frame() {
        let lm = Landmark::new(0.5, 0.5);
        let roi = Rect::new(100, 100, 200, 200);
        let framed = lm.reframe(roi, 400, 400);
        assert_eq!(framed.x, 0.5);
        assert_eq!(framed.y, 0.5);

        let corner = Landmark::new(0.0, 0.0).reframe(roi, 400, 400);
        assert_eq!(corner.x, 0.25);
        assert_eq!(corner.y, 0.25);
    }

    #[test]
    fn test_fingertip_landmark_indices() {
        assert_eq!(FingerTip::Thumb.landmark_index(), 4);
        assert_eq!(FingerTip::Index.landmark_index(), 8);
        assert_eq!(FingerTip::Middle.landmark_index(), 12);
        assert_eq!(FingerTip::Ring.landmark_index(), 16);
        assert_eq!(FingerTip::Pinky.landmark_index(), 20);
    }

    #[test]
    fn test_mouth_reference_lower_lip() {
        let mut landmarks = vec![Landmark::new(0.0, 0.0); 468];
        landmarks[13] = Landmark::new(0.5, 0.6);

        let mouth = mouth_reference(&landmarks, MouthAnchor::LowerLip, 100, 100).unwrap();
        assert_eq!(mouth.x, 50.0);
        assert_eq!(mouth.y, 60.0);
    }

    #[test]
    fn test_mouth_reference_center_averages_four_points() {
        let mut landmarks = vec![Landmark::new(0.0, 0.0); 468];
        landmarks[13] = Landmark::new(0.4, 0.6);
        landmarks[14] = Landmark::new(0.4, 0.5);
        landmarks[78] = Landmark::new(0.3, 0.55);
        landmarks[308] = Landmark::new(0.5, 0.55);

        let mouth = mouth_reference(&landmarks, MouthAnchor::Center, 100, 100).unwrap();
        assert!((mouth.x - 40.0).abs() < 1e-4);
        assert!((mouth.y - 55.0).abs() < 1e-4);
    }

    #[test]
    fn test_mouth_reference_missing_landmarks() {
        let landmarks = vec![Landmark::new(0.0, 0.0); 10];
        assert!(mouth_reference(&landmarks, MouthAnchor::LowerLip, 100, 100).is_none());
        assert!(mouth_reference(&landmarks, MouthAnchor::Center, 100, 100).is_none());
    }
}
