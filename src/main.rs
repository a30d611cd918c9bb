//! Nail-biting detection application for real-time webcam monitoring.

use anyhow::Result;
use clap::Parser;
use log::info;
use nailguard::app::{AppConfig, GuiMode, NailGuardApp, VideoSource};
use nailguard::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process instead of the camera
    #[arg(short, long)]
    video: Option<String>,

    /// Fingertip-to-mouth trigger distance in pixels
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Maximum number of hands tracked per frame
    #[arg(long)]
    max_hands: Option<usize>,

    /// GUI display mode (full, minimal, none)
    #[arg(short, long, default_value = "full")]
    gui: String,

    /// Mirror the image horizontally
    #[arg(long)]
    flip: bool,

    /// Mouth anchor mode (lower-lip, center)
    #[arg(long)]
    mouth: Option<String>,

    /// Policy when no face is visible (skip, carry)
    #[arg(long)]
    fallback: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Nailguard - webcam nail-biting detector");

    // Load configuration if provided, then apply CLI overrides
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(threshold) = args.threshold {
        config.proximity.threshold_px = threshold;
    }
    if let Some(max_hands) = args.max_hands {
        config.detection.max_hands = max_hands;
    }
    if let Some(mouth) = args.mouth {
        config.proximity.mouth_anchor = mouth;
    }
    if let Some(fallback) = args.fallback {
        config.proximity.fallback = fallback;
    }
    if args.flip {
        config.display.flip = true;
    }

    config.validate()?;

    let app_config = AppConfig {
        video_source: if let Some(video_path) = args.video {
            VideoSource::File(video_path)
        } else {
            VideoSource::Camera(args.cam)
        },
        gui_mode: match args.gui.as_str() {
            "minimal" => GuiMode::Minimal,
            "none" => GuiMode::None,
            _ => GuiMode::Full,
        },
        config,
    };

    let mut app = NailGuardApp::new(app_config)?;
    app.run()?;

    Ok(())
}
