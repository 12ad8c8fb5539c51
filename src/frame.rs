use std::time::{Duration, Instant};

/// Frame metadata supplied by the host on every displayed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub number: u64,
    /// Total time since the host started its clock
    pub elapsed: Duration,
    pub delta: Duration,
}

impl FrameInfo {
    pub fn new(number: u64, elapsed: Duration, delta: Duration) -> Self {
        Self {
            number,
            elapsed,
            delta,
        }
    }
}

enum Pacing {
    RealTime { start: Instant, last: Instant },
    Fixed { step: Duration },
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in frames.take(n) { ... }`
pub struct FrameIterator {
    frame_number: u64,
    elapsed: Duration,
    pacing: Pacing,
}

impl FrameIterator {
    /// Frames timed by the wall clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            elapsed: Duration::ZERO,
            pacing: Pacing::RealTime {
                start: now,
                last: now,
            },
        }
    }

    /// Frames advancing by exactly `1 / fps` each, for headless hosts and tests
    pub fn fixed(fps: f32) -> Self {
        Self {
            frame_number: 0,
            elapsed: Duration::ZERO,
            pacing: Pacing::Fixed {
                step: Duration::from_secs_f64(1.0 / f64::from(fps.max(1.0))),
            },
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let (elapsed, delta) = match &mut self.pacing {
            Pacing::RealTime { start, last } => {
                let now = Instant::now();
                let delta = now.duration_since(*last);
                *last = now;
                (now.duration_since(*start), delta)
            }
            // First frame sits at zero so the motion starts from rest
            Pacing::Fixed { .. } if self.frame_number == 0 => (Duration::ZERO, Duration::ZERO),
            Pacing::Fixed { step } => (self.elapsed + *step, *step),
        };

        let info = FrameInfo::new(self.frame_number, elapsed, delta);

        self.frame_number += 1;
        self.elapsed = elapsed;

        Some(info)
    }
}
