use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use opencv::core::Point;
use opencv::highgui;
use opencv::prelude::*;
use tracing::{debug, info, warn};

use plate_dwell::config::DetectorConfig;
use plate_dwell::error::PlateDwellError;
use plate_dwell::plate_detection::camera::FrameSource;
use plate_dwell::plate_detection::locator::PlateLocator;
use plate_dwell::plate_detection::overlay;
use plate_dwell::plate_detection::reader::{OcrOutcome, PlateReader};
use plate_dwell::plate_detection::region;
use plate_dwell::plate_detection::tracker::{PresenceTracker, TrackerEvent};

const WINDOW_NAME: &str = "License Plate Detection";
const QUIT_KEY: i32 = 'q' as i32;

#[derive(Parser, Debug)]
#[command(name = "dwell_watch", about = "License plate dwell-time watcher")]
struct Args {
    /// Camera device index
    #[arg(long, default_value_t = 0, conflicts_with = "file")]
    camera: i32,
    /// Read frames from a video file instead of a camera
    #[arg(long, value_name = "PATH")]
    file: Option<String>,
    /// Run without a display window
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let config = DetectorConfig::default();

    info!("starting capture");
    let mut source = match &args.file {
        Some(path) => FrameSource::file(path).context("could not open video file")?,
        None => FrameSource::camera(args.camera, &config).context("could not open camera")?,
    };
    let locator = PlateLocator::new(&config);
    let mut reader = PlateReader::new(&config).context("could not initialize the ocr engine")?;
    let mut tracker = PresenceTracker::new(&config);

    let mut display_enabled = !args.headless;
    if display_enabled {
        if let Err(err) = highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE) {
            warn!("no display window available ({err}), running headless");
            display_enabled = false;
        }
    }
    info!("capture ready, press 'q' to quit");

    let clock = Instant::now();
    loop {
        let frame = match source.read_frame() {
            Ok(frame) => frame,
            Err(PlateDwellError::EndOfStream) => {
                info!("frame source ended");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        let now = clock.elapsed().as_secs_f64();

        let mut display = frame.try_clone()?;
        let zone = region::detection_region(frame.cols(), frame.rows());
        overlay::draw_region(&mut display, zone)?;

        if let Some(remaining) = tracker.cooldown_remaining(now) {
            overlay::draw_cooldown(&mut display, remaining)?;
        } else {
            let scan = Mat::roi(&frame, zone)?.try_clone()?;
            let candidates = locator.locate(&scan)?;

            // Single-plate policy: the first candidate (largest contour
            // first) with a confident reading wins the frame.
            let mut winner: Option<(usize, String)> = None;
            for (index, candidate) in candidates.iter().enumerate() {
                match reader.read(&candidate.enhanced) {
                    OcrOutcome::Recognized { text, confidence } => {
                        debug!("candidate {index} read as {text:?} (confidence {confidence})");
                        winner = Some((index, text));
                        break;
                    }
                    OcrOutcome::NoReading => {}
                }
            }

            let reading = winner.as_ref().map(|(_, text)| text.as_str());
            match tracker.observe(now, reading) {
                Some(TrackerEvent::PlateDetected { text }) => {
                    info!("license plate detected: {text}");
                }
                Some(TrackerEvent::PlateExited {
                    text,
                    dwell_secs,
                    exit_time,
                }) => {
                    info!("plate {text} left detection zone, final time {dwell_secs}s, exit time {exit_time}");
                }
                None => {}
            }

            if let Some((index, text)) = &winner {
                overlay::draw_plate(
                    &mut display,
                    Point::new(zone.x, zone.y),
                    candidates[*index].bbox,
                    text,
                )?;
            }
            if let Some(elapsed) = tracker.dwell_elapsed(now) {
                overlay::draw_dwell_timer(&mut display, elapsed)?;
            }
        }

        if let Some(summary) = tracker.exit_summary(now) {
            overlay::draw_exit_summary(&mut display, &summary)?;
        }

        if display_enabled {
            highgui::imshow(WINDOW_NAME, &display)?;
            if highgui::wait_key(1)? == QUIT_KEY {
                break;
            }
        }
    }

    info!("closing");
    Ok(())
}
