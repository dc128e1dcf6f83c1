//! Transaction assembly: groups physical lines into logical rows.
//!
//! A row opens with a `DD/MM` line and collects continuation lines until the
//! next row, a sentinel, a footer line, or end of input. Everything outside
//! the column-header sentinel (account header, address, disclaimer, the next
//! page's header block) is skipped without needing to know its content.

use tracing::debug;

use crate::calendar::{YearTracker, leading_day_month};
use crate::classify::{LineClass, classify_line, clean_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Before the first sentinel of the document
    SeekingSentinel,
    /// Between a page-break notice and the next page's sentinel
    InPageHeader,
    InTransactions,
    /// After the footer; only a new sentinel reopens collection
    InSummary,
}

/// What the assembler does with the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    Flush,
    /// Flush the pending row, then start a new one with this line
    FlushAndStart,
    Append,
    /// Append the text before the offset, flush, start a new row at the offset
    Split(usize),
    /// Nothing to append to: drop the text before the offset, start a row there
    StartAt(usize),
}

/// Single transition function for the assembler.
///
/// `pending` tells whether a row is currently buffered. Continuation lines
/// that arrive with nothing buffered are dropped, unless they carry a merged
/// row start.
pub fn transition(state: AssemblerState, class: LineClass, pending: bool) -> (AssemblerState, Action) {
    use AssemblerState::*;

    match (state, class) {
        (_, LineClass::Sentinel) => (InTransactions, Action::Flush),
        (_, LineClass::PageBreakHeader) => (InPageHeader, Action::Skip),
        (SeekingSentinel | InPageHeader | InSummary, _) => (state, Action::Skip),

        (InTransactions, LineClass::SummaryFooter) => (InSummary, Action::Flush),
        (InTransactions, LineClass::PageNumber) => (InTransactions, Action::Skip),
        (InTransactions, LineClass::TransactionStart) => (InTransactions, Action::FlushAndStart),
        (InTransactions, LineClass::Continuation { embedded_date_at: Some(at) }) if !pending => {
            (InTransactions, Action::StartAt(at))
        }
        (InTransactions, LineClass::Continuation { .. }) if !pending => (InTransactions, Action::Skip),
        (InTransactions, LineClass::Continuation { embedded_date_at: Some(at) }) => {
            (InTransactions, Action::Split(at))
        }
        (InTransactions, LineClass::Continuation { embedded_date_at: None }) => {
            (InTransactions, Action::Append)
        }
    }
}

/// Buffering state machine. Completed rows are handed to a sink together
/// with the year they resolve to.
#[derive(Debug)]
pub struct Assembler {
    state: AssemblerState,
    buffer: Vec<String>,
    tracker: YearTracker,
}

impl Assembler {
    pub fn new(start_year: i32) -> Self {
        Self {
            state: AssemblerState::SeekingSentinel,
            buffer: Vec::with_capacity(8),
            tracker: YearTracker::new(start_year),
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Feed one raw input line.
    pub fn push_line<F>(&mut self, raw: &str, sink: &mut F)
    where
        F: FnMut(&[String], i32),
    {
        let Some(line) = clean_line(raw) else {
            return;
        };

        let class = classify_line(&line);
        let (next, action) = transition(self.state, class, !self.buffer.is_empty());
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "assembler state change");
        }
        self.state = next;

        match action {
            Action::Skip => {}
            Action::Flush => self.flush(sink),
            Action::FlushAndStart => {
                self.flush(sink);
                self.buffer.push(line);
            }
            Action::Append => self.buffer.push(line),
            Action::Split(at) => {
                let (head, tail) = line.split_at(at);
                let head = head.trim();
                if !head.is_empty() {
                    self.buffer.push(head.to_string());
                }
                debug!(head, "splitting merged row");
                self.flush(sink);
                self.buffer.push(tail.trim().to_string());
            }
            Action::StartAt(at) => {
                debug!(dropped = line[..at].trim(), "merged row start with nothing pending");
                self.buffer.push(line[at..].trim().to_string());
            }
        }
    }

    /// Flush whatever is pending at end of input.
    pub fn finish<F>(&mut self, sink: &mut F)
    where
        F: FnMut(&[String], i32),
    {
        self.flush(sink);
    }

    fn flush<F>(&mut self, sink: &mut F)
    where
        F: FnMut(&[String], i32),
    {
        let Some(first) = self.buffer.first() else {
            return;
        };

        let year = match leading_day_month(first) {
            Some((_, month)) => self.tracker.observe(month),
            None => self.tracker.year(),
        };

        sink(&self.buffer, year);
        self.buffer.clear();
    }
}
