//! Cooperative cancellation for in-flight searches.
//!
//! A [`CancellationHandle`] trips every clone of its [`CancellationSignal`].
//! The executor races the signal against the transport, so a tripped signal
//! aborts the send and surfaces as an ambiguous timeout.

use std::time::Duration;

use tokio::sync::watch;

/// Create a linked handle and signal.
pub fn cancellation() -> (CancellationHandle, CancellationSignal) {
    let (tx, rx) = watch::channel(false);
    (CancellationHandle { tx }, CancellationSignal { rx: Some(rx) })
}

/// The cancelling side.
#[derive(Debug)]
pub struct CancellationHandle {
    tx: watch::Sender<bool>,
}

impl CancellationHandle {
    /// Trip the signal. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Trip the signal once `delay` has elapsed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn cancel_after(self, delay: Duration) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            self.cancel();
        });
    }

    /// Whether the signal has been tripped.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// The observing side, passed to each search.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancellationSignal {
    /// A signal that never fires.
    pub fn none() -> Self {
        Self { rx: None }
    }

    /// Whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once the signal fires.
    ///
    /// Never resolves if the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = self.rx.as_ref() else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::none()
    }
}
