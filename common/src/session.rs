//! Per-session state shared between the file-selection path and the run path.
//!
//! Both asynchronous operations of a session (reading the selected file and
//! running the engine) can be overtaken by a newer user action. Each start hands
//! out a `Ticket`; only the ticket of the latest start is current, so late
//! results of superseded operations are recognised and dropped.

use crate::error::QueryError;
use crate::model::workbook::SelectedWorkbook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Starts a new operation, superseding every ticket handed out before.
    pub fn advance(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}

/// The workbook currently selected in a session.
#[derive(Debug, Default)]
pub struct WorkbookSlot {
    reads: Generation,
    pending: bool,
    current: Option<SelectedWorkbook>,
    failure: Option<QueryError>,
}

impl WorkbookSlot {
    /// Called when the user picks a file. The previous workbook is dropped
    /// right away so a run started while the read is pending can't use it.
    pub fn begin_read(&mut self) -> Ticket {
        self.pending = true;
        self.current = None;
        self.failure = None;
        self.reads.advance()
    }

    /// Stores the outcome of the read started with `ticket`.
    ///
    /// Returns `false`, leaving the slot untouched, when a newer read has been
    /// started in the meantime.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<SelectedWorkbook, QueryError>) -> bool {
        if !self.reads.is_current(ticket) {
            return false;
        }
        self.pending = false;
        match result {
            Ok(workbook) => {
                self.current = Some(workbook);
                self.failure = None;
            }
            Err(err) => {
                self.current = None;
                self.failure = Some(err);
            }
        }
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn current(&self) -> Option<&SelectedWorkbook> {
        self.current.as_ref()
    }

    pub fn failure(&self) -> Option<&QueryError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::workbook::{transcode, XLSX_MIME};

    fn wb(name: &str) -> SelectedWorkbook {
        transcode(name, XLSX_MIME, name.as_bytes()).unwrap()
    }

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut runs = Generation::default();
        let first = runs.advance();
        assert!(runs.is_current(first));
        let second = runs.advance();
        assert!(!runs.is_current(first));
        assert!(runs.is_current(second));
    }

    #[test]
    fn read_resolves_into_the_slot() {
        let mut slot = WorkbookSlot::default();
        assert!(slot.current().is_none());
        let t = slot.begin_read();
        assert!(slot.is_pending());
        assert!(slot.resolve(t, Ok(wb("a.xlsx"))));
        assert!(!slot.is_pending());
        assert_eq!(slot.current().map(|w| w.name.as_str()), Some("a.xlsx"));
    }

    #[test]
    fn late_result_of_a_superseded_read_is_discarded() {
        let mut slot = WorkbookSlot::default();
        let old = slot.begin_read();
        let new = slot.begin_read();
        assert!(slot.resolve(new, Ok(wb("new.xlsx"))));
        assert!(!slot.resolve(old, Ok(wb("old.xlsx"))));
        assert_eq!(slot.current().map(|w| w.name.as_str()), Some("new.xlsx"));
    }

    #[test]
    fn new_selection_drops_the_previous_workbook() {
        let mut slot = WorkbookSlot::default();
        let t = slot.begin_read();
        slot.resolve(t, Ok(wb("a.xlsx")));
        slot.begin_read();
        assert!(slot.current().is_none());
        assert!(slot.is_pending());
    }

    #[test]
    fn read_failure_is_kept_for_reporting() {
        let mut slot = WorkbookSlot::default();
        let t = slot.begin_read();
        let err = QueryError::ReadFailure {
            name: "a.xlsx".to_string(),
            reason: "NotReadableError".to_string(),
        };
        assert!(slot.resolve(t, Err(err.clone())));
        assert!(slot.current().is_none());
        assert_eq!(slot.failure(), Some(&err));
    }
}
