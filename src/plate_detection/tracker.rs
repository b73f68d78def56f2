use chrono::Local;

use crate::config::DetectorConfig;

/// Events produced by the tracker. `PlateDetected` fires on text changes
/// only, never once per frame; `PlateExited` fires once per completed
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    PlateDetected {
        text: String,
    },
    PlateExited {
        text: String,
        dwell_secs: u64,
        exit_time: String,
    },
}

/// Final dwell summary shown while the exit-overlay window is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSummary<'a> {
    pub text: &'a str,
    pub dwell_secs: u64,
    pub exit_time: &'a str,
}

/// Per-frame state machine over plate presence: idle, tracking, exit grace,
/// cooldown. One instance owned by the main loop; all time arrives as an
/// injected `now` in seconds so tests control the clock.
///
/// `dwell_start` is set only while a valid plate is being tracked. Once
/// `cooldown_end` is set, every observation is ignored until it expires.
pub struct PresenceTracker {
    cooldown_secs: f64,
    exit_grace_secs: f64,
    exit_display_secs: f64,
    current_plate: Option<String>,
    last_plate: Option<String>,
    plate_present: bool,
    valid_plate_detected: bool,
    dwell_start: Option<f64>,
    last_seen: Option<f64>,
    cooldown_end: Option<f64>,
    exit_display_start: Option<f64>,
    final_dwell_secs: Option<u64>,
    exit_time: Option<String>,
}

impl PresenceTracker {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            cooldown_secs: config.cooldown_secs,
            exit_grace_secs: config.exit_grace_secs,
            exit_display_secs: config.exit_display_secs,
            current_plate: None,
            last_plate: None,
            plate_present: false,
            valid_plate_detected: false,
            dwell_start: None,
            last_seen: None,
            cooldown_end: None,
            exit_display_start: None,
            final_dwell_secs: None,
            exit_time: None,
        }
    }

    /// Remaining cooldown in whole seconds, while detections are suppressed
    /// at `now`.
    pub fn cooldown_remaining(&self, now: f64) -> Option<u64> {
        match self.cooldown_end {
            Some(end) if now < end => Some((end - now) as u64),
            _ => None,
        }
    }

    /// Advances the state machine by one frame. `reading` is the first
    /// confident OCR text of the frame, if any. During cooldown the frame
    /// is ignored entirely.
    pub fn observe(&mut self, now: f64, reading: Option<&str>) -> Option<TrackerEvent> {
        if self.cooldown_remaining(now).is_some() {
            return None;
        }
        match reading {
            Some(text) => self.observe_present(now, text),
            None => self.observe_absent(now),
        }
    }

    fn observe_present(&mut self, now: f64, text: &str) -> Option<TrackerEvent> {
        self.last_seen = Some(now);
        if !self.plate_present {
            self.plate_present = true;
            self.current_plate = None;
        }
        if !self.valid_plate_detected {
            self.valid_plate_detected = true;
            self.dwell_start = Some(now);
        }
        if self.current_plate.as_deref() != Some(text) {
            self.current_plate = Some(text.to_string());
            self.last_plate = Some(text.to_string());
            return Some(TrackerEvent::PlateDetected {
                text: text.to_string(),
            });
        }
        None
    }

    fn observe_absent(&mut self, now: f64) -> Option<TrackerEvent> {
        if !(self.plate_present && self.valid_plate_detected) {
            return None;
        }
        let (Some(last_seen), Some(dwell_start), Some(text)) =
            (self.last_seen, self.dwell_start, self.last_plate.clone())
        else {
            return None;
        };
        if now - last_seen < self.exit_grace_secs {
            // Still inside the grace window; the session continues.
            return None;
        }

        // The final dwell is anchored once, at this instant. The exit
        // overlay reuses the stored value instead of recomputing it on
        // every render tick.
        let dwell_secs = (now - dwell_start).floor().max(0.0) as u64;
        let exit_time = Local::now().format("%H:%M:%S").to_string();

        self.plate_present = false;
        self.valid_plate_detected = false;
        self.current_plate = None;
        self.dwell_start = None;
        self.final_dwell_secs = Some(dwell_secs);
        self.exit_time = Some(exit_time.clone());
        self.cooldown_end = Some(now + self.cooldown_secs);
        self.exit_display_start = Some(now);

        Some(TrackerEvent::PlateExited {
            text,
            dwell_secs,
            exit_time,
        })
    }

    /// Whole seconds on the dwell timer while a plate is actively tracked.
    pub fn dwell_elapsed(&self, now: f64) -> Option<u64> {
        if !self.valid_plate_detected {
            return None;
        }
        self.dwell_start
            .map(|start| (now - start).floor().max(0.0) as u64)
    }

    /// The stored exit summary while the overlay window is still open.
    pub fn exit_summary(&self, now: f64) -> Option<ExitSummary<'_>> {
        let start = self.exit_display_start?;
        if now - start > self.exit_display_secs {
            return None;
        }
        Some(ExitSummary {
            text: self.last_plate.as_deref()?,
            dwell_secs: self.final_dwell_secs?,
            exit_time: self.exit_time.as_deref()?,
        })
    }

    pub fn current_plate(&self) -> Option<&str> {
        self.current_plate.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PresenceTracker {
        PresenceTracker::new(&DetectorConfig::default())
    }

    fn exited(event: Option<TrackerEvent>) -> (String, u64) {
        match event {
            Some(TrackerEvent::PlateExited {
                text, dwell_secs, ..
            }) => (text, dwell_secs),
            other => panic!("expected an exit event, got {other:?}"),
        }
    }

    #[test]
    fn detection_event_fires_on_text_change_only() {
        let mut tracker = tracker();
        assert_eq!(
            tracker.observe(0.0, Some("ABC123")),
            Some(TrackerEvent::PlateDetected {
                text: "ABC123".to_string()
            })
        );
        assert_eq!(tracker.observe(0.5, Some("ABC123")), None);
        assert_eq!(tracker.observe(1.0, Some("ABC123")), None);
        assert_eq!(
            tracker.observe(1.5, Some("XYZ789")),
            Some(TrackerEvent::PlateDetected {
                text: "XYZ789".to_string()
            })
        );
    }

    #[test]
    fn exit_fires_only_after_grace_elapses() {
        let mut tracker = tracker();
        let mut t = 0.0;
        while t <= 5.0 {
            tracker.observe(t, Some("ABC123"));
            t += 0.5;
        }
        // Absent frames inside the grace window fire nothing.
        assert_eq!(tracker.observe(5.5, None), None);
        assert_eq!(tracker.observe(6.5, None), None);
        assert_eq!(tracker.observe(6.9, None), None);
        // At last_seen + 2.0 the session finalizes, dwell anchored here.
        let (text, dwell) = exited(tracker.observe(7.0, None));
        assert_eq!(text, "ABC123");
        assert_eq!(dwell, 7);
        // Cooldown runs until t = 67.0.
        assert_eq!(tracker.cooldown_remaining(7.0), Some(60));
        assert_eq!(tracker.cooldown_remaining(66.9), Some(0));
        assert_eq!(tracker.cooldown_remaining(67.0), None);
    }

    #[test]
    fn flicker_inside_grace_keeps_the_session() {
        let mut tracker = tracker();
        tracker.observe(0.0, Some("ABC123"));
        assert_eq!(tracker.observe(0.5, None), None);
        assert_eq!(tracker.observe(1.0, Some("ABC123")), None);
        // Dwell still counts from the original start.
        assert_eq!(tracker.dwell_elapsed(4.0), Some(4));
        assert_eq!(tracker.dwell_elapsed(4.9), Some(4));
    }

    #[test]
    fn cooldown_suppresses_all_events() {
        let mut tracker = tracker();
        tracker.observe(0.0, Some("ABC123"));
        tracker.observe(5.0, Some("ABC123"));
        exited(tracker.observe(7.0, None));
        // New plates inside the cooldown are ignored outright.
        assert_eq!(tracker.observe(10.0, Some("NEW111")), None);
        assert_eq!(tracker.dwell_elapsed(10.0), None);
        assert_eq!(tracker.observe(66.9, Some("NEW111")), None);
        // First frame past the cooldown starts a fresh session.
        assert_eq!(
            tracker.observe(67.0, Some("NEW111")),
            Some(TrackerEvent::PlateDetected {
                text: "NEW111".to_string()
            })
        );
        assert_eq!(tracker.dwell_elapsed(68.0), Some(1));
    }

    #[test]
    fn absent_frames_without_presence_do_nothing() {
        let mut tracker = tracker();
        for i in 0..10 {
            assert_eq!(tracker.observe(i as f64, None), None);
        }
        assert_eq!(tracker.dwell_elapsed(10.0), None);
        assert_eq!(tracker.exit_summary(10.0), None);
    }

    #[test]
    fn exit_summary_reuses_the_anchored_dwell() {
        let mut tracker = tracker();
        tracker.observe(0.0, Some("ABC123"));
        tracker.observe(5.0, Some("ABC123"));
        let (_, dwell) = exited(tracker.observe(7.0, None));
        assert_eq!(dwell, 7);

        let summary = tracker.exit_summary(8.0).unwrap();
        assert_eq!(summary.text, "ABC123");
        assert_eq!(summary.dwell_secs, 7);
        // Same value much later in the window: never recomputed.
        assert_eq!(tracker.exit_summary(66.0).unwrap().dwell_secs, 7);
        // Window closes 60 s after the exit.
        assert!(tracker.exit_summary(67.0).is_some());
        assert_eq!(tracker.exit_summary(67.5), None);
    }

    #[test]
    fn reappearance_after_cooldown_redetects_the_same_plate() {
        let mut tracker = tracker();
        tracker.observe(0.0, Some("ABC123"));
        tracker.observe(5.0, Some("ABC123"));
        exited(tracker.observe(7.0, None));
        assert_eq!(
            tracker.observe(70.0, Some("ABC123")),
            Some(TrackerEvent::PlateDetected {
                text: "ABC123".to_string()
            })
        );
    }
}
