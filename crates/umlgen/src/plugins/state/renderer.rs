//! State machine builder
//!
//! Builds `StateMachine → Region → {vertices, transitions}` under the
//! document root. Vertices are created the first time a name is seen;
//! every trigger record gets its own transition.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use super::database::{StateDatabase, StateVertex, VertexKind};
use crate::core::{
    Database, Document, ModelError, NameTable, NodeId, NodeKind, PseudostateKind, Renderer, Slot,
    Value,
};

/// Builds the state machine subtree
#[derive(Debug, Clone)]
pub struct StateMachineRenderer {
    name: String,
}

impl StateMachineRenderer {
    pub fn new() -> Self {
        Self::with_name("StateMachine")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build the subtree, or nothing when there are no trigger records
    ///
    /// Returns the state machine node.
    pub fn render(&self, database: &StateDatabase, document: &mut Document) -> Result<Option<NodeId>> {
        if database.is_empty() {
            trace!("No trigger records, skipping state machine");
            return Ok(None);
        }

        let render_span = span!(
            Level::DEBUG,
            "build_state_machine",
            transitions = database.transition_count()
        );
        let _enter = render_span.enter();

        let root = document.root();
        let machine = document.add_child(
            root,
            Slot::OwnedElements,
            NodeKind::StateMachine,
            Some(self.name.clone()),
        )?;
        let region = document.add_child(machine, Slot::Regions, NodeKind::Region, None)?;
        document.declare_slot(region, Slot::Vertices)?;
        document.declare_slot(region, Slot::Transitions)?;

        let mut vertices = NameTable::new();
        for record in database.transitions() {
            let source = vertices.get_or_bind(&record.from, || {
                vertex(document, region, registered(database, &record.from)?)
            })?;
            let target = vertices.get_or_bind(&record.to, || {
                vertex(document, region, registered(database, &record.to)?)
            })?;

            let transition = document.add_child(
                region,
                Slot::Transitions,
                NodeKind::Transition,
                Some(record.label.clone()),
            )?;
            document.set_field(transition, "source", Value::Ref(source))?;
            document.set_field(transition, "target", Value::Ref(target))?;
            document.add_child(
                transition,
                Slot::Triggers,
                NodeKind::Event,
                Some(record.label.clone()),
            )?;
            trace!(%transition, from = %record.from, to = %record.to, label = %record.label, "Built transition");
        }

        debug!(
            vertices = vertices.len(),
            registered = database.state_count(),
            "State vertices built"
        );
        info!(%machine, transitions = database.transition_count(), "State machine built");
        Ok(Some(machine))
    }
}

impl Default for StateMachineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry entry for a state named by a trigger record
fn registered<'a>(database: &'a StateDatabase, name: &str) -> Result<&'a StateVertex> {
    database.get_node(name).ok_or_else(|| {
        ModelError::integrity(format!("state '{}' is not in the registry", name)).into()
    })
}

fn vertex(document: &mut Document, region: NodeId, state: &StateVertex) -> Result<NodeId> {
    let kind = match state.kind {
        VertexKind::Initial => NodeKind::Pseudostate,
        VertexKind::Final => NodeKind::FinalState,
        VertexKind::State => NodeKind::State,
    };
    let id = document.add_child(region, Slot::Vertices, kind, Some(state.name.clone()))?;
    if kind == NodeKind::Pseudostate {
        document.set_field(id, "kind", Value::text(PseudostateKind::Initial.to_string()))?;
    }
    Ok(id)
}

impl Renderer<StateDatabase> for StateMachineRenderer {
    type Output = Option<NodeId>;

    fn render(&self, database: &StateDatabase, document: &mut Document) -> Result<Self::Output> {
        self.render(database, document)
    }

    fn name(&self) -> &'static str {
        "state-machine"
    }
}
