//! State machine plugin
//!
//! Collects `@Trigger` facts and builds the state machine from them.
//!
//! ```text
//! @Trigger(from = "InitState", to = "Idle")   void boot()
//! @Trigger(from = "Idle", to = "FinalState")  void halt()
//!
//! (●) ──boot()──▶ [Idle] ──halt()──▶ (◉)
//! ```

mod database;
mod renderer;

pub use database::{StateDatabase, StateVertex, TriggerRecord, VertexKind, FINAL_STATE, INITIAL_STATE};
pub use renderer::StateMachineRenderer;
