//! Class record store
//!
//! Holds the class nodes created by the mapper, the name bindings that
//! point at them, and the relationship records discovered along the way.

use anyhow::Result;

use crate::core::{Database, DeclarationKind, NameTable, NodeId};

/// A class or interface already present in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: String,
    pub kind: DeclarationKind,
    pub id: NodeId,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, id: NodeId) -> Self {
        Self {
            name: name.into(),
            kind,
            id,
        }
    }
}

/// Relationship type between classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// `extends`
    Generalization,
    /// `implements`
    Realization,
    /// A field whose type refers to another classifier
    Aggregation,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::Generalization => "generalization",
            RelationshipKind::Realization => "realization",
            RelationshipKind::Aggregation => "aggregation",
        }
    }
}

/// A relationship between two classes, by name
///
/// For generalizations and realizations `source` is the declaring class
/// and `target` the named supertype. For aggregations `source` is the
/// aggregated type and `target` the class owning the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub source: String,
    pub target: String,
}

impl Relationship {
    pub fn new(kind: RelationshipKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn generalization(class: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(RelationshipKind::Generalization, class, parent)
    }

    pub fn realization(class: impl Into<String>, interface: impl Into<String>) -> Self {
        Self::new(RelationshipKind::Realization, class, interface)
    }

    pub fn aggregation(aggregated: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::new(RelationshipKind::Aggregation, aggregated, owner)
    }
}

/// Class record store
#[derive(Debug, Default)]
pub struct ClassDatabase {
    classes: Vec<ClassEntry>,
    bindings: NameTable,
    relationships: Vec<Relationship>,
}

impl ClassDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a class and bind its name
    ///
    /// Returns the node previously bound to the same name, which the new
    /// class now shadows.
    pub fn add_class(&mut self, class: ClassEntry) -> Option<NodeId> {
        let replaced = self.bindings.bind(class.name.clone(), class.id);
        self.classes.push(class);
        replaced
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Classes in discovery order, shadowed duplicates included
    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// The name binding table
    pub fn bindings(&self) -> &NameTable {
        &self.bindings
    }

    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.bindings.resolve(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// The class currently bound to `name`
    pub fn get_class(&self, name: &str) -> Option<&ClassEntry> {
        let id = self.bindings.resolve(name)?;
        self.classes.iter().find(|c| c.id == id)
    }
}

impl Database for ClassDatabase {
    type Node = ClassEntry;
    type Edge = Relationship;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.add_class(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_relationship(edge);
        Ok(())
    }

    fn get_node(&self, name: &str) -> Option<&Self::Node> {
        self.get_class(name)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.classes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.relationships.iter()
    }

    fn clear(&mut self) {
        self.classes.clear();
        self.bindings = NameTable::new();
        self.relationships.clear();
    }

    fn node_count(&self) -> usize {
        self.class_count()
    }

    fn edge_count(&self) -> usize {
        self.relationship_count()
    }
}
