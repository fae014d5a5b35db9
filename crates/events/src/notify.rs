//! Best-effort notifications for user-facing side effects.
//!
//! The engine announces what it just did (a sale, an undo, an import) through a
//! [`Notifier`]. Delivery is fire-and-forget:
//!
//! - `notify` never blocks on the consumer and never returns a result
//! - a notice carries copied values only, never a handle into the store
//! - consumer failures are swallowed (at most logged at `debug`)
//!
//! A desktop front end would hang a click sound or a status-bar message off
//! this seam; nothing about stock correctness depends on it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use warehouse_core::{ProductName, Quantity};

/// Something the engine did, described by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ProductCreated { name: ProductName, quantity: Quantity },
    ProductReplaced { name: ProductName, previous: Quantity, quantity: Quantity },
    StockAdded { name: ProductName, delta: Quantity, quantity: Quantity },
    StockSold { name: ProductName, delta: Quantity, quantity: Quantity },
    ProductRemoved { name: ProductName },
    Undone { command: &'static str },
    Redone { command: &'static str },
    Imported { created: usize, replaced: usize },
    Cleared,
    Reloaded { products: usize },
}

impl Notice {
    /// Stable notice name (e.g. "stock.sold").
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::ProductCreated { .. } => "product.created",
            Notice::ProductReplaced { .. } => "product.replaced",
            Notice::StockAdded { .. } => "stock.added",
            Notice::StockSold { .. } => "stock.sold",
            Notice::ProductRemoved { .. } => "product.removed",
            Notice::Undone { .. } => "history.undone",
            Notice::Redone { .. } => "history.redone",
            Notice::Imported { .. } => "import.completed",
            Notice::Cleared => "store.cleared",
            Notice::Reloaded { .. } => "store.reloaded",
        }
    }
}

/// Fire-and-forget sink for [`Notice`]s.
///
/// Implementations must return promptly and must not panic into the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Discards every notice.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// A subscription to a [`ChannelNotifier`].
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Notice>,
}

impl Subscription {
    fn new(receiver: Receiver<Notice>) -> Self {
        Self { receiver }
    }

    /// Block until the next notice is available.
    pub fn recv(&self) -> Result<Notice, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a notice without blocking.
    pub fn try_recv(&self) -> Result<Notice, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a notice.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Notice, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything delivered so far, without blocking.
    pub fn drain(&self) -> Vec<Notice> {
        self.receiver.try_iter().collect()
    }
}

/// In-process fan-out over `mpsc` channels.
///
/// - No IO
/// - Each subscriber gets a copy of every notice
/// - Dropped subscribers are pruned on the next send
#[derive(Debug, Default)]
pub struct ChannelNotifier {
    subscribers: Mutex<Vec<mpsc::Sender<Notice>>>,
}

impl ChannelNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just stays silent.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        let Ok(mut subs) = self.subscribers.lock() else {
            tracing::debug!(notice = notice.kind(), "notifier lock poisoned; notice dropped");
            return;
        };
        subs.retain(|tx| tx.send(notice.clone()).is_ok());
    }
}

type Handler = dyn Fn(&Notice) + Send + Sync;

/// Runs a handler for each notice on a detached thread.
///
/// The caller never waits for the handler. A handler that panics is caught
/// and logged; a thread that cannot be spawned drops the notice.
#[derive(Clone)]
pub struct BackgroundNotifier {
    handler: Arc<Handler>,
}

impl BackgroundNotifier {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Notice) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl core::fmt::Debug for BackgroundNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BackgroundNotifier").finish_non_exhaustive()
    }
}

impl Notifier for BackgroundNotifier {
    fn notify(&self, notice: Notice) {
        let handler = Arc::clone(&self.handler);
        let kind = notice.kind();
        let spawned = thread::Builder::new()
            .name("warehouse-notify".to_string())
            .spawn(move || {
                if panic::catch_unwind(AssertUnwindSafe(|| handler(&notice))).is_err() {
                    tracing::debug!(notice = kind, "notification handler panicked");
                }
            });
        if let Err(err) = spawned {
            tracing::debug!(notice = kind, error = %err, "failed to spawn notification thread");
        }
    }
}
