//! Document assembler
//!
//! Runs one assembly pass: project and model scaffolding, declaration
//! mapping, relationship building, the optional state machine and
//! collaboration, then the symbol resolution sweep over the model.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use crate::core::{
    AssemblyConfig, Channel, Declaration, Document, IdAllocator, NodeId, NodeKind, Slot, Value,
};
use crate::plugins::class::{
    ClassDatabase, DeclarationMapper, RelationshipRenderer, UnresolvedRelationship,
};
use crate::plugins::sequence::{SequenceDatabase, SequenceRenderer};
use crate::plugins::state::{StateDatabase, StateMachineRenderer};

/// Result of one assembly run
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: Document,
    pub model: NodeId,
    pub state_machine: Option<NodeId>,
    pub collaboration: Option<NodeId>,
    /// Relationship records dropped for naming unknown classes; only
    /// filled when `report_unresolved` is enabled
    pub diagnostics: Vec<UnresolvedRelationship>,
    /// Number of symbolic type names rewritten into references
    pub resolved_symbols: usize,
}

/// Assembles declaration records into one document
///
/// Holds configuration only; every call to [`Assembler::assemble`] starts
/// from a fresh allocator and fresh registries.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: AssemblyConfig,
}

impl Assembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Run the whole pipeline over `declarations`, in order
    pub fn assemble(&self, declarations: &[Declaration]) -> Result<Assembly> {
        let assemble_span = span!(
            Level::INFO,
            "assemble",
            declarations = declarations.len(),
            seed = self.config.id_seed
        );
        let _enter = assemble_span.enter();

        info!("Starting model assembly");

        let mut document = Document::new(
            IdAllocator::new(self.config.id_seed),
            NodeKind::Project,
            self.config.project_name.clone(),
        )?;
        let root = document.root();
        let model = document.add_child(
            root,
            Slot::OwnedElements,
            NodeKind::Model,
            Some(self.config.model_name.clone()),
        )?;
        let diagram = document.add_child(
            model,
            Slot::OwnedElements,
            NodeKind::ClassDiagram,
            Some(self.config.class_diagram_name.clone()),
        )?;
        document.set_field(diagram, "defaultDiagram", Value::Bool(true))?;

        // Step 1: map declarations, routing annotation facts by channel
        let map_span = span!(Level::DEBUG, "pipeline_map");
        let map_enter = map_span.enter();
        let mapper = DeclarationMapper::new();
        let mut classes = ClassDatabase::new();
        let mut states = StateDatabase::new();
        let mut messages = SequenceDatabase::new();
        for declaration in declarations {
            let mapped = mapper.map(declaration, &mut document, model, &mut classes)?;
            for edge in mapped.edges {
                match edge.channel {
                    Channel::Trigger => states.add_transition(edge.into()),
                    Channel::Message => messages.add_message(edge.into()),
                }
            }
        }
        debug!(
            classes = classes.class_count(),
            relationships = classes.relationship_count(),
            triggers = states.transition_count(),
            messages = messages.message_count(),
            "Mapping completed"
        );
        drop(map_enter);

        // Step 2: relationships
        let report = RelationshipRenderer::new()
            .with_report_unresolved(self.config.report_unresolved)
            .render(&classes, &mut document)?;

        // Step 3: optional diagrams
        let state_machine = StateMachineRenderer::with_name(self.config.state_machine_name.clone())
            .render(&states, &mut document)?;
        let collaboration = SequenceRenderer::with_names(
            self.config.collaboration_name.clone(),
            self.config.interaction_name.clone(),
            self.config.sequence_diagram_name.clone(),
        )
        .render(&messages, &mut document)?;

        // Step 4: resolution sweep
        let sweep_span = span!(Level::DEBUG, "pipeline_resolve");
        let sweep_enter = sweep_span.enter();
        let resolved_symbols = document.resolve_symbols(model, classes.bindings());
        trace!(resolved_symbols, "Resolution sweep completed");
        drop(sweep_enter);

        info!(
            nodes = document.len(),
            relationships = report.emitted,
            dropped = report.dropped,
            state_machine = state_machine.is_some(),
            collaboration = collaboration.is_some(),
            "Model assembly completed"
        );

        Ok(Assembly {
            document,
            model,
            state_machine,
            collaboration,
            diagnostics: report.unresolved,
            resolved_symbols,
        })
    }
}
