/// Build-time tunables for the whole pipeline. There is no configuration
/// file; callers construct this once and hand it to each stage.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Seconds to suppress all detection work after a completed exit event.
    pub cooldown_secs: f64,
    /// Seconds a plate may go undetected before its session is finalized.
    pub exit_grace_secs: f64,
    /// Seconds the exit summary overlay stays on screen.
    pub exit_display_secs: f64,
    /// Minimum Tesseract confidence for a token to count as a reading.
    pub min_confidence: i32,
    /// Accepted plate length after alphanumeric filtering.
    pub min_plate_chars: usize,
    pub max_plate_chars: usize,
    /// Accepted bounding-box aspect ratio (width / height).
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Minimum bounding-box area in pixels.
    pub min_plate_area: i32,
    /// Candidates narrower than this are upscaled before OCR.
    pub min_ocr_width: i32,
    /// Contours considered per frame, largest first.
    pub max_contours: usize,
    /// Capture geometry.
    pub frame_width: i32,
    pub frame_height: i32,
    pub fps: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 60.0,
            exit_grace_secs: 2.0,
            exit_display_secs: 60.0,
            min_confidence: 30,
            min_plate_chars: 4,
            max_plate_chars: 10,
            min_aspect_ratio: 2.0,
            max_aspect_ratio: 5.5,
            min_plate_area: 1000,
            min_ocr_width: 150,
            max_contours: 10,
            frame_width: 640,
            frame_height: 480,
            fps: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuning() {
        let config = DetectorConfig::default();
        assert_eq!(config.cooldown_secs, 60.0);
        assert_eq!(config.exit_grace_secs, 2.0);
        assert_eq!(config.min_confidence, 30);
        assert_eq!(config.min_plate_chars, 4);
        assert_eq!(config.max_plate_chars, 10);
        assert_eq!(config.min_aspect_ratio, 2.0);
        assert_eq!(config.max_aspect_ratio, 5.5);
        assert_eq!(config.min_plate_area, 1000);
        assert_eq!(config.max_contours, 10);
    }
}
