//! Symbolic name resolution
//!
//! A [`NameTable`] maps a declared name (class, interface, state or
//! participant) to the identifier of the node that represents it.

use std::collections::HashMap;

use super::NodeId;

/// Name to node identifier table
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: HashMap<String, NodeId>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `id`, returning the binding it replaced
    ///
    /// Last writer wins: a second declaration with the same name takes
    /// over the binding.
    pub fn bind(&mut self, name: impl Into<String>, id: NodeId) -> Option<NodeId> {
        self.entries.insert(name.into(), id)
    }

    /// Look up the node bound to `name`
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    /// Resolve both ends of a pair; `None` if either is unbound
    pub fn resolve_pair(&self, source: &str, target: &str) -> Option<(NodeId, NodeId)> {
        Some((self.resolve(source)?, self.resolve(target)?))
    }

    /// Return the existing binding for `name`, or create one with `create`
    ///
    /// First occurrence wins; `create` only runs for unseen names, and a
    /// failed `create` leaves the table unchanged.
    pub fn get_or_bind<E>(
        &mut self,
        name: &str,
        create: impl FnOnce() -> Result<NodeId, E>,
    ) -> Result<NodeId, E> {
        if let Some(id) = self.resolve(name) {
            return Ok(id);
        }
        let id = create()?;
        self.entries.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
