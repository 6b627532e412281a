use std::thread;
use std::time::{Duration, Instant};

/// Caps the frame rate by sleeping out the rest of each frame's budget.
#[derive(Debug)]
pub struct FramePacer {
    budget: Option<Duration>,
    started: Instant,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(target_fps: Option<u32>) -> Self {
        let now = Instant::now();
        Self {
            budget: target_fps
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            started: now,
            frame_start: now,
        }
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Seconds since the pacer was created.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleeps until the frame budget is used up and returns how long the
    /// frame took, sleep included.
    pub fn end_frame(&self) -> Duration {
        let spent = self.frame_start.elapsed();
        if let Some(budget) = self.budget {
            if spent < budget {
                thread::sleep(budget - spent);
            }
        }
        self.frame_start.elapsed()
    }
}
