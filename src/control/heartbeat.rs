use super::dispatch::{TaskOutcome, handle_session_task};
use crate::service::ServiceError;
use crate::session::SessionManager;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Default pause between two heartbeats
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(10);

/// Summary of one heartbeat round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeatReport {
    pub alive_sessions: usize,
    pub completed: usize,
    pub failed: usize,
    pub ignored: usize,
}

/// Periodic poller reporting live sessions and dispatching returned tasks
pub struct Heartbeat {
    manager: SessionManager,
    interval: Duration,
}

/// Handle to a running heartbeat loop.
///
/// Dropping it detaches the loop, which then beats until the runtime shuts down.
#[must_use = "dropping the handle detaches the heartbeat loop"]
pub struct HeartbeatHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl Heartbeat {
    pub fn new(manager: SessionManager, interval: Duration) -> Self {
        Self {
            manager,
            interval: interval.max(MIN_HEARTBEAT_INTERVAL),
        }
    }

    /// Run a single heartbeat round
    pub async fn beat(&self) -> Result<BeatReport, ServiceError> {
        let alive = self.manager.alive_sessions().await;
        let tasks = self.manager.control_plane().heartbeat(&alive).await?;

        let mut report = BeatReport {
            alive_sessions: alive.len(),
            ..Default::default()
        };

        for task in &tasks {
            match handle_session_task(&self.manager, task).await {
                TaskOutcome::Completed => report.completed += 1,
                TaskOutcome::Failed => report.failed += 1,
                TaskOutcome::Ignored => report.ignored += 1,
            }
        }

        debug!("Heartbeat done: {:?}", report);
        Ok(report)
    }

    /// Start the loop on its own task. The first beat happens after one interval.
    pub fn spawn(self) -> HeartbeatHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            info!("Heartbeat started, interval {:?}", self.interval);
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            timer.tick().await;

            let mut detached = false;
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if let Err(e) = self.beat().await {
                            warn!("Heartbeat to core server failed: {}", e);
                        }
                    }
                    changed = shutdown_rx.changed(), if !detached => match changed {
                        Ok(()) if *shutdown_rx.borrow_and_update() => break,
                        Ok(()) => {}
                        Err(_) => {
                            debug!("Heartbeat handle dropped, loop detached");
                            detached = true;
                        }
                    },
                }
            }

            info!("Heartbeat stopped");
        });

        HeartbeatHandle { shutdown, join }
    }
}

impl HeartbeatHandle {
    /// Stop the loop and wait for it to exit
    pub async fn shutdown(self) {
        self.shutdown.send_replace(true);
        if let Err(e) = self.join.await {
            warn!("Heartbeat task ended abnormally: {}", e);
        }
    }
}
