//! Core building blocks of model assembly
//!
//! Identifiers, name tables, the document arena and its node vocabulary,
//! the declaration records it is built from, and the traits every plugin
//! implements.

mod annotation;
mod bindings;
mod config;
mod database;
mod declaration;
mod document;
mod error;
mod ids;
pub mod logging;
mod renderer;
mod type_ref;
mod types;

pub use annotation::*;
pub use bindings::*;
pub use config::*;
pub use database::*;
pub use declaration::*;
pub use document::*;
pub use error::*;
pub use ids::*;
pub use logging::*;
pub use renderer::*;
pub use type_ref::*;
pub use types::*;
