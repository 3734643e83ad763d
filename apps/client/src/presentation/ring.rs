use std::f64::consts::PI;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

pub const RING_RADIUS: f64 = 70.0;
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1500);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}

/// Value shown `elapsed` into the fill animation: whole numbers while easing,
/// then exactly `target` once the duration has passed.
pub fn displayed_score(target: f64, elapsed: Duration) -> f64 {
    if elapsed >= ANIMATION_DURATION {
        return target;
    }
    let progress = elapsed.as_secs_f64() / ANIMATION_DURATION.as_secs_f64();
    (target * ease_out_quart(progress)).floor()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub radius: f64,
    pub circumference: f64,
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::with_radius(RING_RADIUS)
    }
}

impl RingGeometry {
    pub fn with_radius(radius: f64) -> Self {
        Self {
            radius,
            circumference: 2.0 * PI * radius,
        }
    }

    /// Stroke dash offset for a displayed score; 0 means a full ring.
    pub fn dash_offset(&self, display: f64) -> f64 {
        let fraction = (display / 100.0).clamp(0.0, 1.0);
        self.circumference - fraction * self.circumference
    }

    pub fn filled_fraction(&self, display: f64) -> f64 {
        1.0 - self.dash_offset(display) / self.circumference
    }
}

/// A running score-ring fill. Frames are published on a watch channel;
/// dropping the handle cancels the animation.
pub struct ScoreRingAnimation {
    frames: watch::Receiver<f64>,
    task: JoinHandle<()>,
}

impl ScoreRingAnimation {
    pub fn play(target: f64) -> Self {
        let (tx, rx) = watch::channel(0.0);
        let task = tokio::spawn(run_frames(target, tx));
        Self { frames: rx, task }
    }

    /// Restarts from zero toward a new score.
    pub fn replay(&mut self, target: f64) {
        *self = Self::play(target);
    }

    #[cfg(test)]
    pub fn current(&self) -> f64 {
        *self.frames.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.frames.clone()
    }
}

impl Drop for ScoreRingAnimation {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_frames(target: f64, tx: watch::Sender<f64>) {
    let started = Instant::now();
    let mut ticker = interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let elapsed = started.elapsed();
        let value = displayed_score(target, elapsed);
        if tx.send(value).is_err() {
            return; // nobody is watching any more
        }
        if elapsed >= ANIMATION_DURATION {
            return;
        }
    }
}
