//! Save-on-termination background task
//!
//! The listener waits for a trigger (by default SIGINT or SIGTERM) and then
//! saves the configuration exactly once. It is owned by the manager and is
//! cancelled when the manager shuts down or is dropped.

use std::future::Future;
use std::io;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::ManagerCore;

/// Registered SIGINT and SIGTERM (CTRL-C on windows) handlers
///
/// Handlers are installed by [`TerminationSignal::register`], not when the
/// future is first polled, so a signal arriving right after registration
/// is still observed. From then on the process no longer terminates on
/// these signals by default; the host decides when to exit.
pub struct TerminationSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl TerminationSignal {
    /// Install the handlers; must be called inside a tokio runtime
    pub fn register() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(windows)]
        {
            Ok(Self {
                ctrl_c: tokio::signal::windows::ctrl_c()?,
            })
        }

        #[cfg(not(any(unix, windows)))]
        {
            Ok(Self {})
        }
    }

    /// Resolves on the first signal received after registration
    pub async fn recv(mut self) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => debug!("Received SIGINT"),
                _ = self.terminate.recv() => debug!("Received SIGTERM"),
            }
        }

        #[cfg(windows)]
        {
            self.ctrl_c.recv().await;
        }

        #[cfg(not(any(unix, windows)))]
        {
            std::future::pending::<()>().await;
        }
    }
}

/// Handle to the running autosave task
pub struct AutosaveListener {
    cancel: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutosaveListener {
    pub(crate) fn spawn(core: Arc<ManagerCore>, trigger: BoxFuture<'static, ()>) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = trigger => {
                    info!("Termination requested, saving configuration to {}", core.path().display());
                    // Nobody is left to report to at shutdown
                    if let Err(e) = core.save().await {
                        warn!("Autosave failed: {}", e);
                    }
                }
                _ = cancel_rx => {
                    debug!("Autosave listener cancelled");
                }
            }
        });

        Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    /// Whether the task has ended, after saving or being cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait until the task ends on its own
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Stop listening and wait for the task to end
    ///
    /// A save already in progress is allowed to finish.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AutosaveListener {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Box a trigger future for the listener
pub(crate) fn boxed_trigger<F>(trigger: F) -> BoxFuture<'static, ()>
where
    F: Future<Output = ()> + Send + 'static,
{
    trigger.boxed()
}
