//! Sequence builder
//!
//! Builds `Collaboration → Interaction → {diagram, participants, messages}`
//! under the document root, one lifeline per distinct participant name.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use super::database::{Participant, SequenceDatabase};
use crate::core::{
    Database, Document, ModelError, NameTable, NodeId, NodeKind, Renderer, Slot, Value,
};

/// Builds the collaboration subtree
#[derive(Debug, Clone)]
pub struct SequenceRenderer {
    collaboration_name: String,
    interaction_name: String,
    diagram_name: String,
}

impl SequenceRenderer {
    pub fn new() -> Self {
        Self::with_names("Collaboration", "Interaction", "SequenceDiagram")
    }

    pub fn with_names(
        collaboration: impl Into<String>,
        interaction: impl Into<String>,
        diagram: impl Into<String>,
    ) -> Self {
        Self {
            collaboration_name: collaboration.into(),
            interaction_name: interaction.into(),
            diagram_name: diagram.into(),
        }
    }

    /// Build the subtree, or nothing when there are no message records
    ///
    /// Returns the collaboration node.
    pub fn render(&self, database: &SequenceDatabase, document: &mut Document) -> Result<Option<NodeId>> {
        if database.is_empty() {
            trace!("No message records, skipping collaboration");
            return Ok(None);
        }

        let render_span = span!(
            Level::DEBUG,
            "build_sequence",
            messages = database.message_count()
        );
        let _enter = render_span.enter();

        let root = document.root();
        let collaboration = document.add_child(
            root,
            Slot::OwnedElements,
            NodeKind::Collaboration,
            Some(self.collaboration_name.clone()),
        )?;
        let interaction = document.add_child(
            collaboration,
            Slot::OwnedElements,
            NodeKind::Interaction,
            Some(self.interaction_name.clone()),
        )?;
        document.add_child(
            interaction,
            Slot::OwnedElements,
            NodeKind::SequenceDiagram,
            Some(self.diagram_name.clone()),
        )?;
        document.declare_slot(interaction, Slot::Participants)?;
        document.declare_slot(interaction, Slot::Messages)?;

        let mut lifelines = NameTable::new();
        for record in database.messages() {
            let source = lifelines.get_or_bind(&record.from, || {
                lifeline(document, interaction, registered(database, &record.from)?)
            })?;
            let target = lifelines.get_or_bind(&record.to, || {
                lifeline(document, interaction, registered(database, &record.to)?)
            })?;

            let message = document.add_child(
                interaction,
                Slot::Messages,
                NodeKind::Message,
                Some(record.label.clone()),
            )?;
            document.set_field(message, "source", Value::Ref(source))?;
            document.set_field(message, "target", Value::Ref(target))?;
            trace!(%message, from = %record.from, to = %record.to, label = %record.label, "Built message");
        }

        debug!(
            lifelines = lifelines.len(),
            registered = database.participant_count(),
            "Lifelines built"
        );
        info!(%collaboration, messages = database.message_count(), "Sequence built");
        Ok(Some(collaboration))
    }
}

impl Default for SequenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry entry for a participant named by a message record
fn registered<'a>(database: &'a SequenceDatabase, name: &str) -> Result<&'a Participant> {
    database.get_node(name).ok_or_else(|| {
        ModelError::integrity(format!("participant '{}' is not in the registry", name)).into()
    })
}

fn lifeline(document: &mut Document, interaction: NodeId, participant: &Participant) -> Result<NodeId> {
    Ok(document.add_child(
        interaction,
        Slot::Participants,
        NodeKind::Lifeline,
        Some(participant.name.clone()),
    )?)
}

impl Renderer<SequenceDatabase> for SequenceRenderer {
    type Output = Option<NodeId>;

    fn render(&self, database: &SequenceDatabase, document: &mut Document) -> Result<Self::Output> {
        self.render(database, document)
    }

    fn name(&self) -> &'static str {
        "sequence"
    }
}
