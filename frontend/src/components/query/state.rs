//! Component state for the query form.
//!
//! Besides the raw field values, the state owns the session's `WorkbookSlot`
//! (the file picked by the user, once transcoded) and the `Generation` of runs,
//! so results of superseded reads or runs can be told apart and dropped.

use common::model::query::QueryFields;
use common::model::run::RunOutcome;
use common::session::{Generation, WorkbookSlot};

pub struct QueryComponent {
    /// Current content of the form fields.
    pub fields: QueryFields,

    /// The selected workbook, a pending read, or the read failure.
    pub workbook: WorkbookSlot,

    pub runs: Generation,

    /// `true` while the engine call of the latest run is in flight.
    pub running: bool,

    /// What the result area shows; `None` before the first run.
    pub outcome: Option<RunOutcome>,

    /// Set by the first run attempt; field hints stay hidden until then.
    pub attempted: bool,

    /// Server version, from the defaults response.
    pub version: Option<String>,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl QueryComponent {
    pub fn new() -> Self {
        Self {
            fields: QueryFields::default(),
            workbook: WorkbookSlot::default(),
            runs: Generation::default(),
            running: false,
            outcome: None,
            attempted: false,
            version: None,
            loaded: false,
        }
    }
}
