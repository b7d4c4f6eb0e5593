use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;

use anyhow::Context;
use tracing::trace;

/// What the renderer has to do once it wakes up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repaint {
    /// Paint the latest snapshot over the current screen
    Tiles,
    /// Clear the screen first (restart, resize)
    Full,
}

/// Sending half of the "render needed" wakeup. Never blocks.
#[derive(Clone)]
pub struct RenderSignal {
    tx: SyncSender<()>,
    full: Arc<AtomicBool>,
}

pub struct RenderWaiter {
    rx: Receiver<()>,
    full: Arc<AtomicBool>,
}

pub fn render_signal() -> (RenderSignal, RenderWaiter) {
    // One slot: any number of notifications between two paints collapse into one
    let (tx, rx) = mpsc::sync_channel(1);
    let full = Arc::new(AtomicBool::new(false));

    (RenderSignal { tx, full: full.clone() }, RenderWaiter { rx, full })
}

impl RenderSignal {
    pub fn notify(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {},
            Err(TrySendError::Disconnected(())) => trace!("renderer is gone, dropping wakeup"),
        }
    }

    pub fn request_full(&self) {
        self.full.store(true, Ordering::SeqCst);
        self.notify();
    }
}

impl RenderWaiter {
    /// Blocks until the next notification.
    pub fn wait(&self) -> anyhow::Result<Repaint> {
        self.rx.recv().context("Every render signal was dropped")?;
        Ok(self.take_repaint())
    }

    #[cfg(test)]
    pub fn poll(&self) -> Option<Repaint> {
        self.rx.try_recv().ok().map(|_| self.take_repaint())
    }

    fn take_repaint(&self) -> Repaint {
        if self.full.swap(false, Ordering::SeqCst) {
            Repaint::Full
        } else {
            Repaint::Tiles
        }
    }
}
