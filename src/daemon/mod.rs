//! Daily nickname rotation.
//!
//! [`NicknameDaemon`] owns a single background task that sleeps until the
//! next fire of its [`Schedule`], runs one [`Rotation`], optionally announces
//! the result, and loops. Failed rotations are logged and retried at the next
//! scheduled instant; they never stop the loop.
//!
//! The task is cancelled through a [`CancellationToken`]. Cancellation
//! interrupts the sleep, but a rotation that is already running completes on
//! its own terms before the task exits.

pub mod error;
pub mod rotation;
pub mod schedule;
#[cfg(test)]
pub(crate) mod testing;

pub use error::{ControlError, SwitchError};
pub use rotation::{MemberDirectory, NicknameStore, Rotation, Switch};
pub use schedule::{DailySchedule, Schedule};

use crate::utils::format::format_nickname_change;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Where successful scheduled rotations are announced.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, content: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    Running { remaining: Duration },
    Stopped,
}

struct Shared {
    rotation: Rotation,
    schedule: Arc<dyn Schedule>,
    announcer: Arc<dyn Announcer>,
    announce: AtomicBool,
}

type NextFire = Arc<parking_lot::Mutex<Option<Instant>>>;

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    next_fire: NextFire,
}

impl Worker {
    fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

pub struct NicknameDaemon {
    shared: Arc<Shared>,
    // Held across every control operation so start/stop decisions never race
    worker: Mutex<Option<Worker>>,
}

impl NicknameDaemon {
    /// Create a stopped daemon. Call [`NicknameDaemon::start`] to run it.
    pub fn new(
        rotation: Rotation,
        schedule: Arc<dyn Schedule>,
        announcer: Arc<dyn Announcer>,
        announce: bool,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                rotation,
                schedule,
                announcer,
                announce: AtomicBool::new(announce),
            }),
            worker: Mutex::new(None),
        }
    }

    pub async fn start(&self) -> Result<(), ControlError> {
        let mut worker = self.worker.lock().await;

        if worker.as_ref().is_some_and(Worker::is_live) {
            return Err(ControlError::AlreadyRunning);
        }

        // A stopped worker may still be finishing a rotation; let it wind down first
        if let Some(previous) = worker.take() {
            if let Err(e) = previous.handle.await {
                warn!("Previous daemon task ended abnormally: {:?}", e);
            }
        }

        let cancel = CancellationToken::new();
        let next_fire = NextFire::default();
        let handle = tokio::spawn(run(self.shared.clone(), cancel.clone(), next_fire.clone()));
        *worker = Some(Worker {
            cancel,
            handle,
            next_fire,
        });

        Ok(())
    }

    pub async fn stop(&self) -> Result<(), ControlError> {
        let worker = self.worker.lock().await;

        match worker.as_ref() {
            Some(w) if w.is_live() => {
                w.cancel.cancel();
                Ok(())
            }
            _ => Err(ControlError::NotRunning),
        }
    }

    pub async fn status(&self) -> DaemonStatus {
        let worker = self.worker.lock().await;

        let Some(live) = worker.as_ref().filter(|w| w.is_live()) else {
            return DaemonStatus::Stopped;
        };

        let remaining = match *live.next_fire.lock() {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            // Spawned but not yet polled
            None => self.shared.schedule.until_next(),
        };

        DaemonStatus::Running { remaining }
    }

    /// Run one rotation right away, independently of the schedule.
    pub async fn trigger_now(&self) -> Result<Switch, SwitchError> {
        let result = self.shared.rotation.switch().await;

        match &result {
            Ok(switch) => info!(
                old_name = %switch.old_name,
                new_name = %switch.new_name,
                "Manual switch successful"
            ),
            Err(e) => error!("Manual switch failed: {}", e),
        }

        result
    }

    pub fn announces(&self) -> bool {
        self.shared.announce.load(Ordering::Relaxed)
    }

    pub fn set_announce(&self, value: bool) {
        self.shared.announce.store(value, Ordering::Relaxed);
    }
}

impl Drop for NicknameDaemon {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.cancel.cancel();
        }
    }
}

async fn run(shared: Arc<Shared>, cancel: CancellationToken, next_fire: NextFire) {
    info!("Daemon started");

    loop {
        let delay = shared.schedule.until_next();
        *next_fire.lock() = Some(Instant::now() + delay);
        debug!(secs = delay.as_secs(), "Daemon sleeping until next rotation");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        match shared.rotation.switch().await {
            Ok(switch) => {
                info!(
                    old_name = %switch.old_name,
                    new_name = %switch.new_name,
                    "Daily switch successful"
                );

                if shared.announce.load(Ordering::Relaxed) {
                    let content = format!(
                        "Daily nickname switch for <@{}> complete!\n\n{}",
                        shared.rotation.target_id(),
                        format_nickname_change(&switch.old_name, &switch.new_name)
                    );
                    if let Err(e) = shared.announcer.announce(&content).await {
                        warn!("Failed to announce daily switch: {:?}", e);
                    }
                }
            }
            Err(e) => error!("Daily switch failed: {}", e),
        }
    }

    info!("Daemon stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::testing::{
        FakeAnnouncer, FakeDirectory, FakeStore, FixedSchedule, GUILD, TARGET,
    };

    const DAY: Duration = Duration::from_secs(86_400);

    fn daemon(
        store: &Arc<FakeStore>,
        directory: &Arc<FakeDirectory>,
        announcer: &Arc<FakeAnnouncer>,
        schedule: Arc<dyn Schedule>,
    ) -> NicknameDaemon {
        let rotation = Rotation::new(store.clone(), directory.clone(), GUILD, TARGET);
        NicknameDaemon::new(rotation, schedule, announcer.clone(), true)
    }

    fn daily(store: &Arc<FakeStore>, directory: &Arc<FakeDirectory>) -> NicknameDaemon {
        daemon(
            store,
            directory,
            &Arc::new(FakeAnnouncer::default()),
            Arc::new(FixedSchedule(DAY)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn starting_twice_reports_already_running() {
        let d = daily(&FakeStore::with(&["Pickle"]), &FakeDirectory::named("Steve"));

        d.start().await.unwrap();
        assert_eq!(d.start().await, Err(ControlError::AlreadyRunning));
        assert!(matches!(d.status().await, DaemonStatus::Running { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_a_stopped_daemon_reports_not_running() {
        let d = daily(&FakeStore::with(&["Pickle"]), &FakeDirectory::named("Steve"));

        assert_eq!(d.stop().await, Err(ControlError::NotRunning));
        assert_eq!(d.status().await, DaemonStatus::Stopped);

        d.start().await.unwrap();
        d.stop().await.unwrap();
        assert_eq!(d.stop().await, Err(ControlError::NotRunning));
        assert_eq!(d.status().await, DaemonStatus::Stopped);
    }

    #[tokio::test]
    async fn restart_reports_remaining_time_within_a_day() {
        let d = daemon(
            &FakeStore::with(&["Pickle"]),
            &FakeDirectory::named("Steve"),
            &Arc::new(FakeAnnouncer::default()),
            Arc::new(DailySchedule),
        );

        d.start().await.unwrap();
        d.stop().await.unwrap();
        d.start().await.unwrap();

        match d.status().await {
            DaemonStatus::Running { remaining } => {
                assert!(remaining <= Duration::from_secs(86_405))
            }
            DaemonStatus::Stopped => panic!("daemon should be running"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_time_counts_down() {
        let d = daily(&FakeStore::with(&["Pickle"]), &FakeDirectory::named("Steve"));
        d.start().await.unwrap();

        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert_eq!(
            d.status().await,
            DaemonStatus::Running {
                remaining: DAY - Duration::from_secs(3600)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_pool_is_retried_the_next_day() {
        let store = FakeStore::with(&[]);
        let d = daily(&store, &FakeDirectory::named("Steve"));
        d.start().await.unwrap();

        tokio::time::sleep(DAY + Duration::from_secs(1)).await;
        assert_eq!(store.reads(), 1);
        assert!(matches!(d.status().await, DaemonStatus::Running { .. }));

        tokio::time::sleep(DAY).await;
        assert_eq!(store.reads(), 2);
        assert!(matches!(d.status().await, DaemonStatus::Running { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_success_is_announced() {
        let store = FakeStore::with(&["Pickle"]);
        let directory = FakeDirectory::named("🔥Steve🔥");
        let announcer = Arc::new(FakeAnnouncer::default());
        let d = daemon(&store, &directory, &announcer, Arc::new(FixedSchedule(DAY)));
        d.start().await.unwrap();

        tokio::time::sleep(DAY + Duration::from_secs(1)).await;

        let sent = announcer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("`🔥Steve🔥` -> `🔥Pickle🔥`"));
        assert!(sent[0].contains(&TARGET.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_and_muted_successes_are_not_announced() {
        let store = FakeStore::with(&["Pickle"]);
        let directory = FakeDirectory::named("Steve");
        let announcer = Arc::new(FakeAnnouncer::default());
        let d = daemon(&store, &directory, &announcer, Arc::new(FixedSchedule(DAY)));

        directory.fail_next(SwitchError::PermissionDenied { status: 403 });
        d.start().await.unwrap();
        tokio::time::sleep(DAY + Duration::from_secs(1)).await;
        assert!(announcer.sent().is_empty());

        d.set_announce(false);
        tokio::time::sleep(DAY).await;
        assert_eq!(directory.applied(), vec!["Pickle".to_string()]);
        assert!(announcer.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_interrupts_the_sleep() {
        let store = FakeStore::with(&["Pickle"]);
        let d = daily(&store, &FakeDirectory::named("Steve"));

        d.start().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        d.stop().await.unwrap();

        tokio::time::sleep(DAY * 3).await;
        assert_eq!(store.reads(), 0);
        assert_eq!(d.status().await, DaemonStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_lets_an_ongoing_rename_finish() {
        let store = FakeStore::with(&["Pickle"]);
        let (directory, gate) = FakeDirectory::gated("Steve");
        let d = daily(&store, &directory);
        d.start().await.unwrap();

        // The rotation is now parked inside the rename call
        tokio::time::sleep(DAY + Duration::from_secs(1)).await;
        assert_eq!(store.reads(), 1);
        assert_eq!(directory.current().as_deref(), Some("Steve"));

        d.stop().await.unwrap();
        assert_eq!(d.status().await, DaemonStatus::Stopped);

        gate.notify_one();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(directory.applied(), vec!["Pickle".to_string()]);
        assert_eq!(d.status().await, DaemonStatus::Stopped);

        d.start().await.unwrap();
        assert_eq!(d.status().await, DaemonStatus::Running { remaining: DAY });
    }

    #[tokio::test(start_paused = true)]
    async fn manual_trigger_works_while_stopped() {
        let store = FakeStore::with(&["Noodle"]);
        let directory = FakeDirectory::named("Steve");
        let d = daily(&store, &directory);

        let switch = d.trigger_now().await.unwrap();

        assert_eq!(switch.old_name, "Steve");
        assert_eq!(switch.new_name, "Noodle");
        assert_eq!(d.status().await, DaemonStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_trigger_reports_failure() {
        let d = daily(&FakeStore::with(&[]), &FakeDirectory::named("Steve"));

        let err = d.trigger_now().await.unwrap_err();
        assert!(matches!(err, SwitchError::NoNicknamesAvailable));
    }
}
