use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::debug;

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One second of countdown output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Remaining { hours: u64, minutes: u64, seconds: u64 },
    Eligible,
}

impl Tick {
    pub fn label(&self) -> String {
        match self {
            Tick::Remaining {
                hours,
                minutes,
                seconds,
            } => format!("{}h {}m {}s", hours, minutes, seconds),
            Tick::Eligible => "Ready!".to_string(),
        }
    }
}

/// Splits the distance from `now` to `target` into h/m/s, `None` once the
/// target has been reached.
pub fn remaining(now: u64, target: u64) -> Option<(u64, u64, u64)> {
    if now >= target {
        return None;
    }
    let distance = target - now;
    Some((distance / 3_600, distance % 3_600 / 60, distance % 60))
}

/// Owned countdown ticker. At most one task runs at a time: `start` cancels
/// any previous instance before spawning, `stop` cancels outright. The task
/// stops itself after emitting [`Tick::Eligible`].
pub struct CooldownClock {
    task: Option<JoinHandle<()>>,
}

impl CooldownClock {
    pub fn new() -> Self {
        Self { task: None }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Starts ticking toward `target` (unix seconds), sending one tick per
    /// second on `ticks`. The first tick is emitted immediately.
    pub fn start(&mut self, target: u64, ticks: mpsc::UnboundedSender<Tick>) {
        self.stop();
        debug!("starting cooldown clock toward {}", target);
        let handle = tokio::spawn(async move {
            let mut timer = interval(Duration::from_secs(1));
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                match remaining(unix_now(), target) {
                    Some((hours, minutes, seconds)) => {
                        if ticks
                            .send(Tick::Remaining {
                                hours,
                                minutes,
                                seconds,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                    None => {
                        let _ = ticks.send(Tick::Eligible);
                        break;
                    }
                }
            }
        });
        self.task = Some(handle);
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for CooldownClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CooldownClock {
    fn drop(&mut self) {
        self.stop();
    }
}
