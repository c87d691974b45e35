//! Timer side of the consent banner
//!
//! [`BannerDriver`] runs a [`BannerController`] on a tokio task: it waits one
//! frame interval to flip `Entering -> Visible`, waits the close delay to
//! flip `Closing -> Hidden`, and publishes every phase on a watch channel
//! the view renders from. Dropping the driver aborts the task, which cancels
//! any pending timer, so a torn-down view never triggers a late write.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::banner::{BannerController, BannerPhase, Wakeup};

#[derive(Debug)]
enum DriverCommand {
    Accept,
}

/// Live banner bound to one mounted view
#[derive(Debug)]
pub struct BannerDriver {
    commands: mpsc::UnboundedSender<DriverCommand>,
    phase: watch::Receiver<BannerPhase>,
    task: JoinHandle<()>,
}

impl BannerDriver {
    /// Mount the banner: run the controller's entry logic and start timing
    ///
    /// Must be called from within a tokio runtime. Mounting again over the
    /// same controller resumes it instead of replaying the entry.
    pub fn spawn(controller: Arc<Mutex<BannerController>>) -> Self {
        let initial = controller
            .lock()
            .map(|c| c.phase())
            .unwrap_or(BannerPhase::Hidden);
        let (phase_tx, phase_rx) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(controller, command_rx, phase_tx));

        Self {
            commands: command_tx,
            phase: phase_rx,
            task,
        }
    }

    /// Current phase
    pub fn phase(&self) -> BannerPhase {
        *self.phase.borrow()
    }

    /// Phase updates for the view
    pub fn subscribe(&self) -> watch::Receiver<BannerPhase> {
        self.phase.clone()
    }

    /// Forward the visitor's accept click
    pub fn accept(&self) {
        if self.commands.send(DriverCommand::Accept).is_err() {
            debug!("Accept after banner task ended");
        }
    }

    /// Unmount the view, cancelling pending timers
    pub fn teardown(self) {
        self.task.abort();
    }
}

impl Drop for BannerDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    controller: Arc<Mutex<BannerController>>,
    mut commands: mpsc::UnboundedReceiver<DriverCommand>,
    phase_tx: watch::Sender<BannerPhase>,
) {
    let Some((wakeup, frame_interval)) = with_controller(&controller, &phase_tx, |c| {
        (c.start(), c.timing().frame_interval)
    }) else {
        return;
    };

    let mut pending = schedule(wakeup, frame_interval);

    loop {
        let deadline = pending.map(|(at, _)| at);

        tokio::select! {
            _ = sleep_until(deadline) => {
                let Some((_, due)) = pending.take() else {
                    continue;
                };
                let next = with_controller(&controller, &phase_tx, |c| match due {
                    Wakeup::NextFrame => c.on_animation_frame(),
                    Wakeup::CloseAfter(_) => c.on_close_timer(),
                });
                match next {
                    Some(wakeup) => pending = schedule(wakeup, frame_interval),
                    None => return,
                }
            }
            command = commands.recv() => {
                let Some(DriverCommand::Accept) = command else {
                    return;
                };
                match with_controller(&controller, &phase_tx, |c| c.accept()) {
                    Some(Some(wakeup)) => pending = schedule(Some(wakeup), frame_interval),
                    Some(None) => {}
                    None => return,
                }
            }
        }
    }
}

/// Run `f` under the controller lock and publish the resulting phase
///
/// Returns `None` if the lock is poisoned, which ends the driver.
fn with_controller<T>(
    controller: &Mutex<BannerController>,
    phase_tx: &watch::Sender<BannerPhase>,
    f: impl FnOnce(&mut BannerController) -> T,
) -> Option<T> {
    let mut guard = match controller.lock() {
        Ok(guard) => guard,
        Err(_) => {
            warn!("Banner controller lock poisoned, stopping driver");
            return None;
        }
    };
    let result = f(&mut guard);
    phase_tx.send_if_modified(|phase| {
        let changed = *phase != guard.phase();
        *phase = guard.phase();
        changed
    });
    Some(result)
}

fn schedule(
    wakeup: Option<Wakeup>,
    frame_interval: std::time::Duration,
) -> Option<(Instant, Wakeup)> {
    wakeup.map(|w| {
        let delay = match w {
            Wakeup::NextFrame => frame_interval,
            Wakeup::CloseAfter(delay) => delay,
        };
        (Instant::now() + delay, w)
    })
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::GestureGatedAudio;
    use crate::consent::{BannerTiming, ConsentStore, CONSENT_KEY};
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::time::Duration;

    fn setup(durable: Arc<MemoryStore>) -> Arc<Mutex<BannerController>> {
        let consent = ConsentStore::dual(durable, Arc::new(MemoryStore::new()));
        Arc::new(Mutex::new(BannerController::new(
            consent,
            Arc::new(GestureGatedAudio::silent()),
            BannerTiming::default(),
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_runs_full_lifecycle() {
        let durable = Arc::new(MemoryStore::new());
        let driver = BannerDriver::spawn(setup(durable.clone()));
        let mut phases = driver.subscribe();

        phases.wait_for(|p| *p == BannerPhase::Visible).await.unwrap();
        driver.accept();
        phases.wait_for(|p| *p == BannerPhase::Closing).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(driver.phase(), BannerPhase::Closing);
        assert_eq!(durable.get(CONSENT_KEY).unwrap(), None);

        phases.wait_for(|p| *p == BannerPhase::Hidden).await.unwrap();
        assert_eq!(durable.get(CONSENT_KEY).unwrap().as_deref(), Some("true"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_accept_does_not_extend_close() {
        let durable = Arc::new(MemoryStore::new());
        let driver = BannerDriver::spawn(setup(durable.clone()));
        let mut phases = driver.subscribe();

        phases.wait_for(|p| *p == BannerPhase::Visible).await.unwrap();
        let clicked = Instant::now();
        driver.accept();
        tokio::time::sleep(Duration::from_millis(150)).await;
        driver.accept();

        phases.wait_for(|p| *p == BannerPhase::Hidden).await.unwrap();
        assert!(clicked.elapsed() < Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_accepted_never_shows() {
        let durable = Arc::new(MemoryStore::with_entries([(CONSENT_KEY, "true")]));
        let driver = BannerDriver::spawn(setup(durable));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(driver.phase(), BannerPhase::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_mid_close_skips_write() {
        let durable = Arc::new(MemoryStore::new());
        let controller = setup(durable.clone());

        let driver = BannerDriver::spawn(controller.clone());
        let mut phases = driver.subscribe();
        phases.wait_for(|p| *p == BannerPhase::Visible).await.unwrap();
        driver.accept();
        phases.wait_for(|p| *p == BannerPhase::Closing).await.unwrap();
        driver.teardown();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(durable.get(CONSENT_KEY).unwrap(), None);
        assert_eq!(controller.lock().unwrap().phase(), BannerPhase::Closing);

        // Remounting finishes the close without replaying the entry
        let driver = BannerDriver::spawn(controller.clone());
        let mut phases = driver.subscribe();
        assert_eq!(driver.phase(), BannerPhase::Closing);
        phases.wait_for(|p| *p == BannerPhase::Hidden).await.unwrap();
        assert_eq!(durable.get(CONSENT_KEY).unwrap().as_deref(), Some("true"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remount_after_close_stays_hidden() {
        let durable = Arc::new(MemoryStore::new());
        let controller = setup(durable);

        let driver = BannerDriver::spawn(controller.clone());
        let mut phases = driver.subscribe();
        phases.wait_for(|p| *p == BannerPhase::Visible).await.unwrap();
        driver.accept();
        phases.wait_for(|p| *p == BannerPhase::Closing).await.unwrap();
        phases.wait_for(|p| *p == BannerPhase::Hidden).await.unwrap();
        drop(driver);

        let driver = BannerDriver::spawn(controller);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(driver.phase(), BannerPhase::Hidden);
    }
}
