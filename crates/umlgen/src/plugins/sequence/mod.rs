//! Sequence plugin
//!
//! Collects `@SendMessage` facts and builds the collaboration holding the
//! sequence diagram.

mod database;
mod renderer;

pub use database::{MessageRecord, Participant, SequenceDatabase};
pub use renderer::SequenceRenderer;
