//! Stock transaction events and best-effort notifications.
//!
//! - [`Transaction`] is one immutable entry of a product's audit log.
//! - [`RunningStock`] folds a log into the stock level after each entry.
//! - [`Notifier`] is the fire-and-forget seam for user-facing side effects
//!   (click sounds, toasts); it never feeds anything back into the engine.

pub mod event;
pub mod fold;
pub mod notify;

pub use event::{Event, Transaction, TransactionKind};
pub use fold::{Projection, RunningStock};
pub use notify::{
    BackgroundNotifier, ChannelNotifier, NoopNotifier, Notice, Notifier, Subscription,
};
