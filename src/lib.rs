//! License-plate dwell-time watcher.
//!
//! Scans a fixed zone of a camera feed for plate-shaped regions, OCRs them
//! with Tesseract, and tracks how long a plate stays in the zone before
//! leaving, emitting detected/exited events along the way.

pub mod config;
pub mod error;
pub mod plate_detection;
