//! Frame scheduler
//!
//! Splits the display-refresh callback into continuous frame time (for
//! effects) and discrete simulation ticks every `1000 / speed` ms.

/// Maximum catch-up ticks per frame under `FixedStep`
pub const MAX_CATCH_UP_TICKS: u32 = 8;

/// How the tick clock moves when a tick fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Snap the tick clock to the frame timestamp. At most one tick per
    /// frame; a slow frame never double-ticks, and the effective rate drifts
    /// slightly below nominal under jittery frame times.
    #[default]
    ResetToFrame,
    /// Advance the tick clock by exactly one interval, catching up missed
    /// ticks (capped by `MAX_CATCH_UP_TICKS`).
    FixedStep,
}

/// Timestamps (ms) for frame and tick bookkeeping
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    policy: TickPolicy,
    last_frame: Option<f64>,
    last_tick: f64,
}

impl FrameScheduler {
    pub fn new(policy: TickPolicy) -> Self {
        Self {
            policy,
            last_frame: None,
            last_tick: 0.0,
        }
    }

    /// Record a frame and return the real time since the previous one.
    /// The first frame reports zero.
    pub fn begin_frame(&mut self, now: f64) -> f32 {
        let dt = match self.last_frame {
            Some(prev) => (now - prev).max(0.0),
            None => 0.0,
        };
        self.last_frame = Some(now);
        dt as f32
    }

    /// Restart the tick clock (on entering `Playing`)
    pub fn reset_tick_clock(&mut self, now: f64) {
        self.last_tick = now;
    }

    /// Consume one tick if at least `interval` ms have passed since the last
    pub fn take_tick(&mut self, now: f64, interval: f64) -> bool {
        if now - self.last_tick < interval {
            return false;
        }
        match self.policy {
            TickPolicy::ResetToFrame => self.last_tick = now,
            TickPolicy::FixedStep => self.last_tick += interval,
        }
        true
    }

    /// Drop any backlog left after the catch-up cap
    pub fn settle(&mut self, now: f64, interval: f64) {
        if now - self.last_tick >= interval {
            log::debug!(
                "Dropping {:.0} ms of tick backlog",
                now - self.last_tick
            );
            self.last_tick = now;
        }
    }
}
