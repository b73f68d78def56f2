use opencv::core::Rect;

/// Bottom margin kept clear of the frame edge, in pixels.
const BOTTOM_MARGIN: i32 = 20;

/// Fixed scan window for a frame of the given dimensions: the horizontal
/// middle third, covering the bottom quarter minus the bottom margin.
/// Pure function of the dimensions; recomputed every frame.
pub fn detection_region(width: i32, height: i32) -> Rect {
    let zone_width = width / 3;
    let x1 = (width - zone_width) / 2;
    let y1 = height * 3 / 4;
    let y2 = height - BOTTOM_MARGIN;
    Rect::new(x1, y1, zone_width, y2 - y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_middle_third_and_bottom_band() {
        let region = detection_region(640, 480);
        assert_eq!(region.width, 640 / 3);
        assert_eq!(region.x, (640 - 640 / 3) / 2);
        assert_eq!(region.y, 360);
        assert_eq!(region.height, 480 / 4 - 20);
        assert_eq!(region.y + region.height, 480 - 20);
    }

    #[test]
    fn holds_for_arbitrary_dimensions() {
        for (w, h) in [(320, 240), (640, 480), (1280, 720), (1920, 1080), (641, 481)] {
            let region = detection_region(w, h);
            assert_eq!(region.width, w / 3);
            // Centered horizontally, within integer division slack.
            let right_gap = w - (region.x + region.width);
            assert!((region.x - right_gap).abs() <= 1);
            // Flush to the bottom minus the margin.
            assert_eq!(region.y + region.height, h - 20);
            assert_eq!(region.y, h * 3 / 4);
        }
    }

    #[test]
    fn is_idempotent() {
        let first = detection_region(1280, 720);
        for _ in 0..3 {
            assert_eq!(detection_region(1280, 720), first);
        }
    }
}
