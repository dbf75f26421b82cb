/// Frame timing and FPS measurement
use std::time::{Duration, Instant};

/// Counts frames and publishes a rate once per measurement window.
pub struct FrameTimer {
    window: Duration,
    window_start: Instant,
    last_frame: Instant,
    frames: u32,
    fps: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_window(Instant::now(), Duration::from_secs(1))
    }

    pub fn with_window(now: Instant, window: Duration) -> Self {
        Self {
            window,
            window_start: now,
            last_frame: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Record a finished frame at `now` and return the time since the
    /// previous one.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.window {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        delta
    }

    /// Frames per second over the last complete window.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn ms_per_frame(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_published_after_window() {
        let start = Instant::now();
        let mut timer = FrameTimer::with_window(start, Duration::from_secs(1));
        for i in 1..=9 {
            timer.tick(start + Duration::from_millis(100 * i));
        }
        assert_eq!(timer.fps(), 0.0);

        let delta = timer.tick(start + Duration::from_millis(1000));
        assert_eq!(delta, Duration::from_millis(100));
        assert!((timer.fps() - 10.0).abs() < 1e-3);
        assert!((timer.ms_per_frame() - 100.0).abs() < 1e-2);
    }
}
