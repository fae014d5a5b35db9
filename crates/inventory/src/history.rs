use std::collections::VecDeque;

use chrono::NaiveDateTime;

use warehouse_core::{DomainError, DomainResult};

use crate::book::StockBook;
use crate::command::CommandRecord;

/// Linear undo/redo history.
///
/// - Recording a new command clears the redo stack (no branching history).
/// - A record lives on at most one stack at a time.
/// - With a depth limit, the oldest undo record is dropped first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLog {
    undo_stack: VecDeque<CommandRecord>,
    redo_stack: Vec<CommandRecord>,
    max_depth: Option<usize>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Push a freshly executed command.
    pub fn record(&mut self, record: CommandRecord) {
        self.push_undo(record);
        self.redo_stack.clear();
    }

    /// Pop the latest command and apply its inverse to `book`.
    ///
    /// On success the record moves to the redo stack and is returned. If the
    /// inverse cannot be applied the book is untouched and the record is
    /// discarded.
    pub fn undo(&mut self, book: &mut StockBook, at: NaiveDateTime) -> DomainResult<CommandRecord> {
        let record = self.undo_stack.pop_back().ok_or(DomainError::NothingToUndo)?;
        record.undo(book, at)?;
        self.redo_stack.push(record.clone());
        Ok(record)
    }

    /// Pop the latest undone command and apply it again.
    pub fn redo(&mut self, book: &mut StockBook, at: NaiveDateTime) -> DomainResult<CommandRecord> {
        let record = self.redo_stack.pop().ok_or(DomainError::NothingToRedo)?;
        record.redo(book, at)?;
        self.push_undo(record.clone());
        Ok(record)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn peek_undo(&self) -> Option<&CommandRecord> {
        self.undo_stack.back()
    }

    pub fn peek_redo(&self) -> Option<&CommandRecord> {
        self.redo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, record: CommandRecord) {
        self.undo_stack.push_back(record);
        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                self.undo_stack.pop_front();
            }
        }
    }
}
