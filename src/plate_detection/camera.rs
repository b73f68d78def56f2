use opencv::prelude::*;
use opencv::videoio;
use opencv::videoio::VideoCapture;
use tracing::warn;

use crate::config::DetectorConfig;
use crate::error::{PlateDwellError, Result};

/// Frame source: a live camera or a video file. Acquired once, held for the
/// lifetime of the loop, released on drop.
pub struct FrameSource {
    capture: VideoCapture,
}

impl FrameSource {
    /// Opens a camera device and applies the configured capture geometry.
    /// Failure here is fatal at startup.
    pub fn camera(index: i32, config: &DetectorConfig) -> Result<Self> {
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(PlateDwellError::CaptureUnavailable(format!(
                "camera {index}"
            )));
        }
        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.frame_width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.frame_height as f64)?;
        capture.set(videoio::CAP_PROP_FPS, config.fps)?;
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;
        Ok(Self { capture })
    }

    pub fn file(path: &str) -> Result<Self> {
        let capture = VideoCapture::from_file(path, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(PlateDwellError::CaptureUnavailable(path.to_string()));
        }
        Ok(Self { capture })
    }

    /// Blocks for the next frame. A failed or empty read ends the stream;
    /// there are no retries.
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let grabbed = self.capture.read(&mut frame)?;
        if !grabbed || frame.empty() {
            return Err(PlateDwellError::EndOfStream);
        }
        Ok(frame)
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        if let Err(err) = self.capture.release() {
            warn!("failed to release capture: {err}");
        }
    }
}
