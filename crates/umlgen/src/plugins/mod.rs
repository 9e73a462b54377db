//! Plugin implementations for each part of the model
//!
//! Each plugin pairs a record store with the renderer that turns its
//! records into document nodes; the assembler runs them in order.

pub mod assembler;
pub mod class;
pub mod sequence;
pub mod state;

pub use assembler::*;
pub use class::*;
pub use sequence::*;
pub use state::*;
