//! Frame timing over a rolling window

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    frame_start: Instant,
    frame_times: RingBuffer<Duration>,
}

impl FrameTimer {
    /// Track the most recent `window` frames.
    pub fn new(window: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frame_times: RingBuffer::new(window),
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    pub fn end(&mut self) {
        self.frame_times.push(self.frame_start.elapsed());
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_times.average();
        if avg.as_secs_f64() > 0.0 {
            1.0 / avg.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_times.average().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_a_frame() {
        let mut timer = FrameTimer::new(4);
        timer.begin();
        timer.end();
        assert!(timer.frame_time_ms() >= 0.0);
    }
}
