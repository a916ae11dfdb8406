//! Periodic background save.
//!
//! # Responsibility
//! - Decide when a fixed-period save is due.
//! - Run saves on a background thread against a shared registry.
//!
//! # Invariants
//! - The snapshot is taken while holding the registry lock, so it never
//!   interleaves with a structural mutation done under the same lock.
//! - Stopping the handle joins the thread; no save runs after `stop`.

use crate::persistence::export::render_project_text;
use crate::persistence::gateway::{to_json, write_atomically, PersistenceGateway};
use crate::persistence::SnapshotError;
use crate::service::registry::ProjectRegistry;
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Registry shared between the editing thread and the auto-saver.
pub type SharedRegistry = Arc<Mutex<ProjectRegistry>>;

/// Fixed-period trigger with an injected clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveSchedule {
    period: Duration,
    next_due: Instant,
}

impl AutoSaveSchedule {
    /// First save becomes due one `period` after `start`.
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` once per elapsed period; missed periods collapse into
    /// a single save.
    pub fn is_due(&mut self, now: Instant) -> bool {
        if now < self.next_due || self.period.is_zero() {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

/// Where an auto-save writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSaveTarget {
    pub gateway: PersistenceGateway,
    /// When set, the active project is also exported as text here.
    pub export_dir: Option<PathBuf>,
}

/// Performs one save of the shared registry.
pub fn run_autosave_once(
    shared: &SharedRegistry,
    target: &AutoSaveTarget,
) -> Result<(), SnapshotError> {
    let (payload, export) = {
        let registry = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let payload = to_json(&registry)?;
        let export = match (&target.export_dir, registry.active_project()) {
            (Some(dir), Ok(project)) => Some((
                dir.join(export_file_name(&project.name)),
                render_project_text(project),
            )),
            _ => None,
        };
        (payload, export)
    };

    write_atomically(target.gateway.data_file(), payload.as_bytes())?;
    if let Some((path, text)) = export {
        write_atomically(&path, text.as_bytes())?;
    }
    info!(
        "event=autosave module=autosave status=ok bytes={}",
        payload.len()
    );
    Ok(())
}

/// Handle to a running auto-save thread.
#[derive(Debug)]
pub struct AutoSaveHandle {
    stop_tx: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl AutoSaveHandle {
    /// Signals the thread and waits for it to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for AutoSaveHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns a thread saving `shared` every `period` until stopped.
///
/// # Errors
/// - `InvalidInput` when `period` is zero.
/// - Any error from spawning the thread.
pub fn spawn_autosave(
    shared: SharedRegistry,
    target: AutoSaveTarget,
    period: Duration,
) -> std::io::Result<AutoSaveHandle> {
    if period.is_zero() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "auto-save period must be positive",
        ));
    }
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let join = std::thread::Builder::new()
        .name("novelist-autosave".to_string())
        .spawn(move || {
            let mut schedule = AutoSaveSchedule::new(period, Instant::now());
            loop {
                match stop_rx.recv_timeout(schedule.time_until_due(Instant::now())) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !schedule.is_due(Instant::now()) {
                            continue;
                        }
                        if let Err(err) = run_autosave_once(&shared, &target) {
                            error!("event=autosave module=autosave status=error error={err}");
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("event=autosave_stop module=autosave status=ok");
        })?;

    Ok(AutoSaveHandle {
        stop_tx,
        join: Some(join),
    })
}

/// File name for a project's text export.
pub fn export_file_name(project_name: &str) -> String {
    let stem: String = project_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "untitled.txt".to_string()
    } else {
        format!("{stem}.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, AutoSaveSchedule};
    use std::time::{Duration, Instant};

    #[test]
    fn schedule_fires_once_per_period() {
        let start = Instant::now();
        let mut schedule = AutoSaveSchedule::new(Duration::from_secs(60), start);

        assert!(!schedule.is_due(start + Duration::from_secs(59)));
        assert!(schedule.is_due(start + Duration::from_secs(60)));
        assert!(!schedule.is_due(start + Duration::from_secs(61)));
        assert!(schedule.is_due(start + Duration::from_secs(121)));
    }

    #[test]
    fn missed_periods_collapse() {
        let start = Instant::now();
        let mut schedule = AutoSaveSchedule::new(Duration::from_secs(10), start);

        assert!(schedule.is_due(start + Duration::from_secs(95)));
        assert!(!schedule.is_due(start + Duration::from_secs(99)));
        assert_eq!(
            schedule.time_until_due(start + Duration::from_secs(99)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn export_file_name_replaces_path_characters() {
        assert_eq!(export_file_name("a/b:c"), "a_b_c.txt");
        assert_eq!(export_file_name("   "), "untitled.txt");
        assert_eq!(export_file_name("星の海"), "星の海.txt");
    }
}
