//! Core renderer trait
//!
//! A renderer turns the records of one store into nodes of the document.

use anyhow::Result;

use super::{Database, Document};

/// Builds document nodes from a record store
pub trait Renderer<D: Database> {
    /// What the renderer reports back, e.g. the root of the subtree it built
    type Output;

    /// Add the nodes for `database` to `document`
    fn render(&self, database: &D, document: &mut Document) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;
}
