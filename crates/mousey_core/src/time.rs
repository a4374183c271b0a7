use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame delta the clock accepts. Anything above is dropped so a
/// stall (breakpoint, suspend, window drag) costs at most 15 fixed steps.
pub const DEFAULT_MAX_FRAME_DT: f64 = 0.25;

/// Fixed-timestep accumulator.
///
/// Each frame the measured wall-clock delta is fed in once through
/// [`FrameClock::advance`]; [`FrameClock::should_step`] then hands out
/// `fixed_dt` slices until less than one slice remains. The remainder is
/// carried into the next frame, so after draining `0 <= accumulator < fixed_dt`.
pub struct FrameClock {
    pub fixed_dt: f64,
    pub max_frame_dt: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_fixed_dt(DEFAULT_FIXED_DT)
    }

    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Reset the wall-clock origin without touching the accumulator.
    pub fn restart(&mut self, now: Instant) {
        self.last_instant = now;
    }

    /// Measure the time since the previous tick and feed it to the accumulator.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let dt = now.saturating_duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(dt)
    }

    /// Feed `dt` seconds into the accumulator and return the accepted delta.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let mut dt = dt.max(0.0);

        // Spiral-of-death cap
        if dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.1}ms",
                dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            dt = self.max_frame_dt;
        }

        self.real_dt = dt;
        self.accumulator += dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
