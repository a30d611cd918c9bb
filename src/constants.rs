//! Constants used throughout the application

/// Number of landmarks reported per detected hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Number of landmarks in the full face mesh
pub const NUM_FACE_MESH_LANDMARKS: usize = 468;

/// Landmark index of the thumb tip
pub const THUMB_TIP: usize = 4;
/// Landmark index of the index finger tip
pub const INDEX_FINGER_TIP: usize = 8;
/// Landmark index of the middle finger tip
pub const MIDDLE_FINGER_TIP: usize = 12;
/// Landmark index of the ring finger tip
pub const RING_FINGER_TIP: usize = 16;
/// Landmark index of the pinky tip
pub const PINKY_TIP: usize = 20;

/// Face mesh landmark used as the mouth reference point (lower inner lip)
pub const MOUTH_LOWER_LIP: usize = 13;
/// Face mesh landmark for the upper inner lip
pub const MOUTH_UPPER_LIP: usize = 14;
/// Face mesh landmark for the right mouth corner
pub const MOUTH_RIGHT_CORNER: usize = 78;
/// Face mesh landmark for the left mouth corner
pub const MOUTH_LEFT_CORNER: usize = 308;

/// Default fingertip-to-mouth distance threshold in pixels
pub const DEFAULT_PROXIMITY_THRESHOLD: f32 = 50.0;

/// Default hold time before a raw detection becomes an event (milliseconds)
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Model input sizes
pub const FACE_DETECTOR_INPUT_SIZE: i32 = 128;
pub const FACE_MESH_INPUT_SIZE: i32 = 192;
pub const PALM_DETECTOR_INPUT_SIZE: i32 = 192;
pub const HAND_LANDMARK_INPUT_SIZE: i32 = 224;

/// Image normalization constants for the SSD detectors ([-1, 1] range)
pub const DETECTOR_NORMALIZATION_OFFSET: f32 = 127.5;
pub const DETECTOR_NORMALIZATION_SCALE: f32 = 127.5;

/// ROI expansion applied to detected face boxes before mesh inference
pub const FACE_ROI_EXPANSION: f32 = 0.25;
/// ROI expansion applied to detected palm boxes to cover the whole hand
pub const HAND_ROI_EXPANSION: f32 = 0.5;

/// Default number of hands tracked simultaneously
pub const DEFAULT_MAX_HANDS: usize = 2;

/// Hand skeleton connectivity for overlay drawing.
/// Pairs of landmark indices, one entry per bone.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (0, 17),
];

/// Logit clamp applied before sigmoid on detector score outputs
pub const SCORE_CLIPPING_THRESHOLD: f32 = 100.0;
