use opencv::core::{Point, Rect, Scalar};
use opencv::imgproc;
use opencv::imgproc::{FONT_HERSHEY_SIMPLEX, LINE_8};
use opencv::prelude::*;

use crate::error::Result;
use crate::plate_detection::tracker::ExitSummary;

const THICKNESS_PX: i32 = 2;
const FONT_SCALE: f64 = 0.7;

fn green() -> Scalar {
    Scalar::from((0.0, 255.0, 0.0))
}

fn blue() -> Scalar {
    Scalar::from((255.0, 0.0, 0.0))
}

fn red() -> Scalar {
    Scalar::from((0.0, 0.0, 255.0))
}

fn yellow() -> Scalar {
    Scalar::from((0.0, 255.0, 255.0))
}

/// Outlines the fixed detection zone.
pub fn draw_region(frame: &mut Mat, region: Rect) -> Result<()> {
    imgproc::rectangle(frame, region, green(), THICKNESS_PX, LINE_8, 0)?;
    Ok(())
}

/// Boxes the winning candidate and prints its text below the box. `origin`
/// is the detection zone's top-left corner in frame coordinates; `bbox` is
/// zone-local.
pub fn draw_plate(frame: &mut Mat, origin: Point, bbox: Rect, text: &str) -> Result<()> {
    let absolute = Rect::new(origin.x + bbox.x, origin.y + bbox.y, bbox.width, bbox.height);
    imgproc::rectangle(frame, absolute, blue(), THICKNESS_PX, LINE_8, 0)?;
    imgproc::put_text(
        frame,
        text,
        Point::new(absolute.x, absolute.y + absolute.height + 25),
        FONT_HERSHEY_SIMPLEX,
        FONT_SCALE,
        blue(),
        THICKNESS_PX,
        LINE_8,
        false,
    )?;
    Ok(())
}

/// Running dwell timer as MM:SS, top right.
pub fn draw_dwell_timer(frame: &mut Mat, elapsed_secs: u64) -> Result<()> {
    let text = format_clock(elapsed_secs);
    let x = frame.cols() - 200;
    imgproc::put_text(
        frame,
        &text,
        Point::new(x, 30),
        FONT_HERSHEY_SIMPLEX,
        FONT_SCALE,
        yellow(),
        THICKNESS_PX,
        LINE_8,
        false,
    )?;
    Ok(())
}

/// Remaining cooldown, drawn where the dwell timer normally sits.
pub fn draw_cooldown(frame: &mut Mat, remaining_secs: u64) -> Result<()> {
    let text = format!("Cooldown: {remaining_secs}s");
    let x = frame.cols() - 200;
    imgproc::put_text(
        frame,
        &text,
        Point::new(x, 30),
        FONT_HERSHEY_SIMPLEX,
        FONT_SCALE,
        red(),
        THICKNESS_PX,
        LINE_8,
        false,
    )?;
    Ok(())
}

/// Two-line exit summary: final dwell and exit timestamp.
pub fn draw_exit_summary(frame: &mut Mat, summary: &ExitSummary<'_>) -> Result<()> {
    let dwell_line = format!("Plate {}: {}s in zone", summary.text, summary.dwell_secs);
    let exit_line = format!("Exit Time: {}", summary.exit_time);
    let x = frame.cols() - 350;
    imgproc::put_text(
        frame,
        &dwell_line,
        Point::new(x, 60),
        FONT_HERSHEY_SIMPLEX,
        FONT_SCALE,
        red(),
        THICKNESS_PX,
        LINE_8,
        false,
    )?;
    imgproc::put_text(
        frame,
        &exit_line,
        Point::new(x, 90),
        FONT_HERSHEY_SIMPLEX,
        FONT_SCALE,
        red(),
        THICKNESS_PX,
        LINE_8,
        false,
    )?;
    Ok(())
}

fn format_clock(elapsed_secs: u64) -> String {
    format!("Time: {:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "Time: 00:00");
        assert_eq!(format_clock(7), "Time: 00:07");
        assert_eq!(format_clock(65), "Time: 01:05");
        assert_eq!(format_clock(600), "Time: 10:00");
    }
}
