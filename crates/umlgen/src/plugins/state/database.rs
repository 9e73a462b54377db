//! State record store
//!
//! Stores the states and trigger records decoded from `@Trigger`
//! annotations.

use std::collections::HashMap;

use anyhow::Result;

use crate::core::{Database, DecodedEdge};

/// Name that marks the initial pseudostate
pub const INITIAL_STATE: &str = "InitState";

/// Name that marks the final state
pub const FINAL_STATE: &str = "FinalState";

/// Vertex kind, derived from the state name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    Initial,
    Final,
    State,
}

impl VertexKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            INITIAL_STATE => VertexKind::Initial,
            FINAL_STATE => VertexKind::Final,
            _ => VertexKind::State,
        }
    }
}

/// A distinct state name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVertex {
    pub name: String,
    pub kind: VertexKind,
}

impl StateVertex {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = VertexKind::from_name(&name);
        Self { name, kind }
    }
}

/// A `(from, to, label)` transition fact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRecord {
    pub from: String,
    pub to: String,
    pub label: String,
}

impl TriggerRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }
}

impl From<DecodedEdge> for TriggerRecord {
    fn from(edge: DecodedEdge) -> Self {
        Self::new(edge.from, edge.to, edge.label)
    }
}

/// State record store
///
/// The vertex registry of a state machine: one entry per distinct name,
/// kept in first-seen order.
#[derive(Debug, Default)]
pub struct StateDatabase {
    /// States indexed by name
    states: HashMap<String, StateVertex>,
    /// State names in first-seen order
    state_order: Vec<String>,
    transitions: Vec<TriggerRecord>,
}

impl StateDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state; a name already present keeps its first entry
    pub fn add_state(&mut self, state: StateVertex) {
        if !self.states.contains_key(&state.name) {
            self.state_order.push(state.name.clone());
            self.states.insert(state.name.clone(), state);
        }
    }

    /// Ensure a state exists
    pub fn ensure_state(&mut self, name: &str) {
        self.add_state(StateVertex::new(name));
    }

    /// Add a trigger record
    ///
    /// Identical records are all kept; each one becomes its own transition.
    pub fn add_transition(&mut self, transition: TriggerRecord) {
        self.ensure_state(&transition.from);
        self.ensure_state(&transition.to);
        self.transitions.push(transition);
    }

    /// States in first-seen order
    pub fn states(&self) -> impl Iterator<Item = &StateVertex> {
        self.state_order.iter().filter_map(|name| self.states.get(name))
    }

    pub fn transitions(&self) -> &[TriggerRecord] {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

impl Database for StateDatabase {
    type Node = StateVertex;
    type Edge = TriggerRecord;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.add_state(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_transition(edge);
        Ok(())
    }

    fn get_node(&self, name: &str) -> Option<&Self::Node> {
        self.states.get(name)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.states()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.transitions.iter()
    }

    fn clear(&mut self) {
        self.states.clear();
        self.state_order.clear();
        self.transitions.clear();
    }

    fn node_count(&self) -> usize {
        self.state_count()
    }

    fn edge_count(&self) -> usize {
        self.transition_count()
    }
}
