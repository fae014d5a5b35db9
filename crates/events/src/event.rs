use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use warehouse_core::Quantity;

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "sell").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (local wall-clock time).
    fn occurred_at(&self) -> NaiveDateTime;
}

/// Kind of quantity-affecting entry in a product's log.
///
/// Serialized names are part of the on-disk format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Stock level at creation.
    Initial,
    /// Units received.
    Add,
    /// Units sold.
    Sell,
    /// Stock level overwritten (corrections, and undo/redo of replacements).
    InitialReplace,
    /// An `add` was undone; carries the undone delta.
    UndoAdd,
    /// A `sell` was undone; carries the undone delta.
    UndoSell,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Initial => "initial",
            TransactionKind::Add => "add",
            TransactionKind::Sell => "sell",
            TransactionKind::InitialReplace => "initial_replace",
            TransactionKind::UndoAdd => "undo_add",
            TransactionKind::UndoSell => "undo_sell",
        }
    }

    /// Whether this entry sets the stock level outright rather than moving it.
    pub fn is_absolute(self) -> bool {
        matches!(self, TransactionKind::Initial | TransactionKind::InitialReplace)
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a product's append-only audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub action: TransactionKind,
    /// Delta for relative kinds, new level for absolute kinds.
    pub quantity: Quantity,
    #[serde(with = "timestamp")]
    pub datetime: NaiveDateTime,
}

impl Transaction {
    pub fn new(action: TransactionKind, quantity: Quantity, datetime: NaiveDateTime) -> Self {
        Self {
            action,
            quantity,
            datetime: datetime.trunc_subsecs(0),
        }
    }

    /// Current local time at the log's one-second resolution.
    pub fn now() -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

impl Event for Transaction {
    fn event_type(&self) -> &'static str {
        self.action.as_str()
    }

    fn occurred_at(&self) -> NaiveDateTime {
        self.datetime
    }
}

/// ISO-8601 local timestamps with second precision (`2024-05-01T09:30:00`).
///
/// Parsing also accepts a fractional-second suffix.
pub mod timestamp {
    use chrono::{NaiveDateTime, SubsecRound};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    const READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn format(value: &NaiveDateTime) -> String {
        value.format(WRITE_FORMAT).to_string()
    }

    /// Fractional seconds are accepted and dropped, so a parsed value always
    /// formats back to the same text.
    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw.trim(), READ_FORMAT).map(|dt| dt.trunc_subsecs(0))
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
