//! Engine adapters available to the query service.

mod command;

use std::sync::Arc;

use common::engine::QueryEngine;

pub use command::CommandEngine;

/// The engine shared by all workers. Runs happen on blocking threads, so the
/// adapter must be `Send + Sync`.
pub type SharedEngine = Arc<dyn QueryEngine + Send + Sync>;
