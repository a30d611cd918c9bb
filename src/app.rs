//! Main application module: capture loop, per-frame pipeline, display.

use crate::{
    config::Config,
    error::{Error, Result},
    events::{DebounceGate, DetectionEvent, EventLog},
    face_detection::FaceDetector,
    face_mesh::FaceMeshDetector,
    geometry::{mouth_reference, MouthAnchor, PixelPoint},
    hand_landmark::{HandLandmarkDetector, HandLandmarks},
    overlay,
    palm_detection::PalmDetector,
    proximity::{MouthReference, ProximityChecker, ProximityReport},
    utils::expand_to_square,
};
use log::{info, warn};
use opencv::{
    core::Mat,
    highgui::{self, WINDOW_AUTOSIZE},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::time::{Duration, Instant};

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// GUI display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    /// Window with full overlays (mesh, skeletons, HUD)
    Full,
    /// Window with warning banner and HUD only
    Minimal,
    /// No window (headless)
    None,
}

/// Top-level application configuration assembled by `main`
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// GUI display mode
    pub gui_mode: GuiMode,
    /// File/default configuration
    pub config: Config,
}

/// The nail-biting detector application
pub struct NailGuardApp {
    app_config: AppConfig,
    face_detector: FaceDetector,
    face_mesh: FaceMeshDetector,
    palm_detector: PalmDetector,
    hand_landmarks: HandLandmarkDetector,
    video_capture: VideoCapture,
    mouth: MouthReference,
    mouth_anchor: MouthAnchor,
    checker: ProximityChecker,
    debounce: DebounceGate,
    event_log: EventLog,
    started: Instant,
}

impl NailGuardApp {
    /// Create the application: open the capture device and load all models.
    ///
    /// Detector sessions are created once here and reused for every frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture device cannot be opened or any model
    /// fails to load.
    pub fn new(app_config: AppConfig) -> Result<Self> {
        info!("Initializing nail-biting detector");
        let config = &app_config.config;

        let video_capture = match &app_config.video_source {
            VideoSource::Camera(index) => {
                info!("Opening camera {index}");
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                if !cap.is_opened()? {
                    return Err(Error::VideoCapture(format!("Could not open webcam {index}")));
                }
                // Small buffer keeps the displayed frame close to real time
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {path}");
                let cap = VideoCapture::from_file(path, videoio::CAP_ANY)?;
                if !cap.is_opened()? {
                    return Err(Error::VideoCapture(format!("Could not open video file {path}")));
                }
                cap
            }
        };

        let face_detector = FaceDetector::new(
            &config.models.face_detector,
            config.detection.face_confidence,
            config.detection.face_iou,
        )?;
        let face_mesh = FaceMeshDetector::new(&config.models.face_mesh)?;
        let palm_detector = PalmDetector::new(
            &config.models.palm_detector,
            config.detection.palm_confidence,
            config.detection.palm_iou,
        )?;
        let hand_landmarks = HandLandmarkDetector::new(&config.models.hand_landmarks)?;

        let mouth_anchor = config.proximity.anchor()?;
        let mouth = MouthReference::new(config.proximity.fallback_policy()?);
        let checker = ProximityChecker::new(config.proximity.threshold_px);
        let debounce = DebounceGate::new(Duration::from_millis(config.proximity.debounce_ms));
        let event_log = EventLog::new(config.events.history_frames);

        if app_config.gui_mode != GuiMode::None {
            highgui::named_window(&config.display.window_title, WINDOW_AUTOSIZE)?;
        }

        Ok(Self {
            app_config,
            face_detector,
            face_mesh,
            palm_detector,
            hand_landmarks,
            video_capture,
            mouth,
            mouth_anchor,
            checker,
            debounce,
            event_log,
            started: Instant::now(),
        })
    }

    /// Run the capture loop until the quit key is pressed or the stream ends
    ///
    /// # Errors
    ///
    /// Returns an error on OpenCV or inference failures; a failed frame read
    /// is not an error and ends the loop cleanly.
    #[allow(clippy::cast_precision_loss)]
    pub fn run(&mut self) -> Result<()> {
        info!("Entering frame processing loop");
        self.started = Instant::now();

        let mut frame = Mat::default();
        let mut frame_count: u64 = 0;
        let mut fps = 0.0;
        let mut fps_window_start = Instant::now();
        let mut fps_window_frames: u64 = 0;

        loop {
            if !self.video_capture.read(&mut frame)? || frame.empty() {
                // Device disconnected or end of stream
                warn!("No frame from capture device, stopping");
                break;
            }

            if self.app_config.config.display.flip {
                let original = frame.clone();
                opencv::core::flip(&original, &mut frame, 1)?;
            }

            let triggered = self.process_frame(&mut frame)?;
            self.event_log.record_frame(triggered);

            frame_count += 1;
            fps_window_frames += 1;
            if fps_window_start.elapsed() >= Duration::from_secs(1) {
                fps = fps_window_frames as f64 / fps_window_start.elapsed().as_secs_f64();
                fps_window_start = Instant::now();
                fps_window_frames = 0;
            }

            if self.app_config.gui_mode != GuiMode::None {
                let now = self.started.elapsed();
                let window = Duration::from_secs(self.app_config.config.events.window_minutes * 60);
                let attempts = self.event_log.attempts_within(window, now);
                overlay::draw_hud(&mut frame, fps, attempts, self.event_log.hit_rate())?;

                highgui::imshow(&self.app_config.config.display.window_title, &frame)?;

                let key = highgui::wait_key(1)?;
                if key == i32::from(b'q') || key == 27 {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        info!("Processed {frame_count} frames");
        self.event_log.log_summary(self.started.elapsed());
        Ok(())
    }

    /// Process one frame in place: run both detector pipelines, draw
    /// overlays, and return whether any fingertip triggered.
    fn process_frame(&mut self, frame: &mut Mat) -> Result<bool> {
        let now = self.started.elapsed();

        let mouth_point = self.update_mouth(frame)?;
        self.mouth.observe(mouth_point);

        let hands = self.detect_hands(frame)?;

        let mut triggered = false;
        let mut strongest: Option<(ProximityReport, &HandLandmarks)> = None;

        if let Some((mouth, stale)) = self.mouth.active() {
            overlay::draw_mouth_marker(frame, mouth, stale)?;

            let frame_width = frame.cols();
            let frame_height = frame.rows();

            for hand in &hands {
                let fingertips: Vec<_> = hand
                    .fingertips()
                    .into_iter()
                    .map(|(tip, lm)| (tip, lm.to_pixel(frame_width, frame_height)))
                    .collect();

                let report = self.checker.check(&fingertips, mouth, stale);

                if report.triggered {
                    triggered = true;
                    for fd in &report.distances {
                        if fd.distance < self.checker.threshold() {
                            if let Some(&(_, point)) =
                                fingertips.iter().find(|(tip, _)| *tip == fd.finger)
                            {
                                overlay::draw_fingertip_alert(frame, point)?;
                            }
                        }
                    }
                }

                let stronger = strongest
                    .as_ref()
                    .map_or(true, |(best, _)| report.confidence > best.confidence);
                if report.triggered && stronger {
                    strongest = Some((report, hand));
                }
            }
        }

        if triggered {
            overlay::draw_warning(frame)?;
        }

        // One debounced event per sustained gesture, attributed to the
        // closest triggering hand
        if self.debounce.update(triggered, now) {
            if let Some((report, hand)) = strongest {
                if let Some(nearest) = report.nearest {
                    self.event_log.push(DetectionEvent {
                        at: now,
                        hand: hand.handedness,
                        finger: nearest.finger,
                        distance: nearest.distance,
                        confidence: report.confidence,
                    });
                }
            }
        }

        Ok(triggered)
    }

    /// Run the face pipeline and extract this frame's mouth point.
    ///
    /// All detected faces are processed (and drawn); the last one's mouth
    /// reference wins.
    fn update_mouth(&mut self, frame: &mut Mat) -> Result<Option<PixelPoint>> {
        let faces = self.face_detector.detect(frame)?;
        if faces.is_empty() {
            return Ok(None);
        }

        let frame_width = frame.cols();
        let frame_height = frame.rows();
        let expansion = self.app_config.config.detection.face_roi_expansion;
        let draw_mesh =
            self.app_config.gui_mode == GuiMode::Full && self.app_config.config.display.draw_mesh;

        let mut mouth_point = None;
        for face in &faces {
            let roi_rect = expand_to_square(face.bbox, frame_width, frame_height, expansion);
            if roi_rect.width <= 0 || roi_rect.height <= 0 {
                continue;
            }

            let roi = Mat::roi(frame, roi_rect)?.try_clone()?;
            let mesh = self.face_mesh.detect(&roi)?;
            if mesh.score < self.app_config.config.detection.face_confidence {
                continue;
            }

            let framed: Vec<_> = mesh
                .landmarks
                .iter()
                .map(|lm| lm.reframe(roi_rect, frame_width, frame_height))
                .collect();

            if draw_mesh {
                let points: Vec<_> = framed
                    .iter()
                    .map(|lm| lm.to_pixel(frame_width, frame_height))
                    .collect();
                overlay::draw_face_mesh(frame, &points, self.app_config.config.display.mesh_draw_step)?;
            }

            if let Some(point) = mouth_reference(&framed, self.mouth_anchor, frame_width, frame_height) {
                mouth_point = Some(point);
            }
        }

        Ok(mouth_point)
    }

    /// Run the hand pipeline: palm detection, landmark inference per palm,
    /// skeleton drawing. Landmarks come back frame-normalized.
    fn detect_hands(&mut self, frame: &mut Mat) -> Result<Vec<HandLandmarks>> {
        let palms = self.palm_detector.detect(frame)?;
        if palms.is_empty() {
            return Ok(Vec::new());
        }

        let frame_width = frame.cols();
        let frame_height = frame.rows();
        let expansion = self.app_config.config.detection.hand_roi_expansion;
        let max_hands = self.app_config.config.detection.max_hands;
        let draw_skeleton =
            self.app_config.gui_mode == GuiMode::Full && self.app_config.config.display.draw_skeleton;

        let mut hands = Vec::new();
        for palm in palms.iter().take(max_hands) {
            let roi_rect = expand_to_square(palm.bbox, frame_width, frame_height, expansion);
            if roi_rect.width <= 0 || roi_rect.height <= 0 {
                continue;
            }

            let roi = Mat::roi(frame, roi_rect)?.try_clone()?;
            let mut hand = self.hand_landmarks.detect(&roi)?;
            if hand.presence < self.app_config.config.detection.palm_confidence {
                continue;
            }

            hand.landmarks = hand
                .landmarks
                .iter()
                .map(|lm| lm.reframe(roi_rect, frame_width, frame_height))
                .collect();

            if draw_skeleton {
                let points: Vec<_> = hand
                    .landmarks
                    .iter()
                    .map(|lm| lm.to_pixel(frame_width, frame_height))
                    .collect();
                overlay::draw_hand_skeleton(frame, &points)?;
            }

            hands.push(hand);
        }

        Ok(hands)
    }
}
