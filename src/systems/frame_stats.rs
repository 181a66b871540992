//! Frame statistics for the on-screen overlay
//!
//! Frames are counted over one-second windows; the FPS figure updates once
//! per window so the overlay stays readable. Frame time is measured between
//! [`FrameStats::begin`] and [`FrameStats::end`].

use std::time::{Duration, Instant};

const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Rolling FPS and frame-time counters
#[derive(Debug, Clone)]
pub struct FrameStats {
    window_start: Instant,
    frames_in_window: u32,
    frame_start: Option<Instant>,

    fps: f32,
    frame_ms: f32,
    min_fps: Option<f32>,
    max_fps: Option<f32>,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            frame_start: None,
            fps: 0.0,
            frame_ms: 0.0,
            min_fps: None,
            max_fps: None,
            total_frames: 0,
        }
    }

    /// Mark the start of a frame's work
    pub fn begin(&mut self, now: Instant) {
        self.frame_start = Some(now);
    }

    /// Mark the end of a frame's work
    ///
    /// Returns true when the FPS figure was refreshed.
    pub fn end(&mut self, now: Instant) -> bool {
        if let Some(start) = self.frame_start.take() {
            self.frame_ms = now.saturating_duration_since(start).as_secs_f32() * 1000.0;
        }
        self.frames_in_window += 1;
        self.total_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < SAMPLE_WINDOW {
            return false;
        }

        self.fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
        self.min_fps = Some(self.min_fps.map_or(self.fps, |m| m.min(self.fps)));
        self.max_fps = Some(self.max_fps.map_or(self.fps, |m| m.max(self.fps)));
        self.window_start = now;
        self.frames_in_window = 0;
        true
    }

    /// Frames per second over the last full window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Duration of the last frame's work in milliseconds
    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    /// Lowest and highest FPS seen so far
    pub fn fps_range(&self) -> Option<(f32, f32)> {
        self.min_fps.zip(self.max_fps)
    }

    /// Frames recorded since start-up
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// One-line summary for the overlay
    pub fn summary(&self) -> String {
        match self.fps_range() {
            Some((min, max)) => format!(
                "{:.0} FPS ({:.0}-{:.0})  {:.2} ms",
                self.fps, min, max, self.frame_ms
            ),
            None => format!("-- FPS  {:.2} ms", self.frame_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frames(
        stats: &mut FrameStats,
        start: Instant,
        count: u32,
        spacing: Duration,
    ) -> Instant {
        let mut now = start;
        for _ in 0..count {
            stats.begin(now);
            now += spacing;
            stats.end(now);
        }
        now
    }

    #[test]
    fn test_no_fps_before_first_window() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        run_frames(&mut stats, start, 10, Duration::from_millis(10));
        assert_eq!(stats.fps(), 0.0);
        assert!(stats.fps_range().is_none());
        assert_eq!(stats.total_frames(), 10);
    }

    #[test]
    fn test_fps_after_one_second() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        run_frames(&mut stats, start, 50, Duration::from_millis(20));
        assert!((stats.fps() - 50.0).abs() < 0.5, "fps {}", stats.fps());
        assert!((stats.frame_ms() - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_fps_range_tracks_extremes() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        let now = run_frames(&mut stats, start, 50, Duration::from_millis(20));
        run_frames(&mut stats, now, 25, Duration::from_millis(40));

        let (min, max) = stats.fps_range().unwrap();
        assert!((min - 25.0).abs() < 0.5);
        assert!((max - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_summary_format() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        assert!(stats.summary().starts_with("-- FPS"));
        run_frames(&mut stats, start, 60, Duration::from_micros(16_667));
        assert!(stats.summary().contains("FPS"));
        assert!(stats.summary().contains("ms"));
    }
}
