//! Core record store trait
//!
//! Each plugin collects the facts it needs during the mapping pass in its
//! own store before anything is built from them.

use anyhow::Result;

/// Core trait for record stores
///
/// A store holds named entities (classes, states, participants) and the
/// edge records that connect them by name. Edges may name entities that
/// were never added; resolving them is the renderer's job.
pub trait Database: Send + Sync {
    /// The entity type for this store
    type Node: Clone + Send + Sync;

    /// The edge record type for this store
    type Edge: Clone + Send + Sync;

    /// Add an entity to the store
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge record to the store
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get an entity by name
    fn get_node(&self, name: &str) -> Option<&Self::Node>;

    /// Iterate over all entities in discovery order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edge records in discovery order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the store
    fn clear(&mut self);

    /// Get the number of entities
    fn node_count(&self) -> usize;

    /// Get the number of edge records
    fn edge_count(&self) -> usize;

    /// Returns true if no edge records were collected
    fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }
}
