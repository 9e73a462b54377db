//! Identifier allocation
//!
//! Every document node gets an opaque identifier from an [`IdAllocator`]
//! owned by a single assembly run. Identifiers are handed out in strictly
//! increasing order from a fixed seed, so identical input yields identical
//! output.

use std::fmt;

use serde::{Serialize, Serializer};

use super::ModelError;

/// Seed used when no other is configured (`0x11111111`)
pub const DEFAULT_ID_SEED: u64 = 0x1111_1111;

/// Identifier of a node in the assembled document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identifier value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer behind this identifier
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sequential identifier source
///
/// Not shared between runs: a fresh run needs a fresh allocator.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    seed: u64,
    /// `None` once `u64::MAX` has been handed out
    next: Option<u64>,
}

impl IdAllocator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            next: Some(seed),
        }
    }

    /// Return the next identifier, strictly greater than every previous one
    ///
    /// Fails once the identifier space above the seed is used up.
    pub fn next_id(&mut self) -> Result<NodeId, ModelError> {
        let raw = self
            .next
            .ok_or(ModelError::IdsExhausted { seed: self.seed })?;
        self.next = raw.checked_add(1);
        Ok(NodeId(raw))
    }

    /// The first identifier this allocator hands out
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of identifiers issued so far
    pub fn issued(&self) -> u64 {
        match self.next {
            Some(next) => next - self.seed,
            None => (u64::MAX - self.seed).saturating_add(1),
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_SEED)
    }
}
