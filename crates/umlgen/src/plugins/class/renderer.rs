//! Relationship builder
//!
//! Turns the relationship records of a [`ClassDatabase`] into
//! generalization, realization and association nodes. Records naming a
//! class that was never declared are dropped.

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::database::{ClassDatabase, Relationship, RelationshipKind};
use crate::core::{AggregationKind, Document, NodeId, NodeKind, Renderer, Slot, Value};

/// A relationship record that named an unknown class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRelationship {
    pub relationship: Relationship,
    /// The names that did not resolve
    pub missing: Vec<String>,
}

impl std::fmt::Display for UnresolvedRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dropped {} {} -> {}: unknown {}",
            self.relationship.kind.as_str(),
            self.relationship.source,
            self.relationship.target,
            self.missing.join(", ")
        )
    }
}

/// Outcome of building relationships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipReport {
    /// Number of relationship nodes created
    pub emitted: usize,
    /// Number of records dropped
    pub dropped: usize,
    /// Dropped records, collected only when reporting is enabled
    pub unresolved: Vec<UnresolvedRelationship>,
}

/// Builds relationship nodes from class records
#[derive(Debug, Default, Clone)]
pub struct RelationshipRenderer {
    report_unresolved: bool,
}

impl RelationshipRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep dropped records in the report
    pub fn with_report_unresolved(mut self, enabled: bool) -> Self {
        self.report_unresolved = enabled;
        self
    }

    /// Build one node per resolvable record, in record order
    pub fn render(&self, database: &ClassDatabase, document: &mut Document) -> Result<RelationshipReport> {
        let render_span = span!(
            Level::DEBUG,
            "build_relationships",
            records = database.relationship_count()
        );
        let _enter = render_span.enter();

        let mut report = RelationshipReport::default();
        for relationship in database.relationships() {
            let Some((source, target)) = database
                .bindings()
                .resolve_pair(&relationship.source, &relationship.target)
            else {
                let missing: Vec<String> = [&relationship.source, &relationship.target]
                    .into_iter()
                    .filter(|name| database.resolve(name).is_none())
                    .cloned()
                    .collect();
                debug!(
                    kind = relationship.kind.as_str(),
                    source = %relationship.source,
                    target = %relationship.target,
                    "Dropping unresolved relationship"
                );
                report.dropped += 1;
                if self.report_unresolved {
                    report.unresolved.push(UnresolvedRelationship {
                        relationship: relationship.clone(),
                        missing,
                    });
                }
                continue;
            };

            let id = match relationship.kind {
                RelationshipKind::Generalization => {
                    directed(document, NodeKind::Generalization, source, target)?
                }
                RelationshipKind::Realization => {
                    directed(document, NodeKind::InterfaceRealization, source, target)?
                }
                RelationshipKind::Aggregation => association(document, source, target)?,
            };
            trace!(%id, kind = relationship.kind.as_str(), %source, %target, "Built relationship");
            report.emitted += 1;
        }

        debug!(emitted = report.emitted, dropped = report.dropped, "Relationships built");
        Ok(report)
    }
}

/// Generalization or realization, owned by its source class
fn directed(document: &mut Document, kind: NodeKind, source: NodeId, target: NodeId) -> Result<NodeId> {
    let id = document.add_child(source, Slot::OwnedElements, kind, None)?;
    document.set_field(id, "source", Value::Ref(source))?;
    document.set_field(id, "target", Value::Ref(target))?;
    Ok(id)
}

/// Association owned by the aggregated type, with the shared end on the owner
fn association(document: &mut Document, aggregated: NodeId, owner: NodeId) -> Result<NodeId> {
    let id = document.add_child(aggregated, Slot::OwnedElements, NodeKind::Association, None)?;

    let end1 = document.add_child(id, Slot::End1, NodeKind::AssociationEnd, None)?;
    document.set_field(end1, "reference", Value::Ref(aggregated))?;

    let end2 = document.add_child(id, Slot::End2, NodeKind::AssociationEnd, None)?;
    document.set_field(end2, "reference", Value::Ref(owner))?;
    document.set_field(
        end2,
        "aggregation",
        Value::text(AggregationKind::Shared.to_string()),
    )?;
    Ok(id)
}

impl Renderer<ClassDatabase> for RelationshipRenderer {
    type Output = RelationshipReport;

    fn render(&self, database: &ClassDatabase, document: &mut Document) -> Result<Self::Output> {
        self.render(database, document)
    }

    fn name(&self) -> &'static str {
        "relationships"
    }
}
