//! Core type definitions for the model document
//!
//! This module contains the closed set of node type tags, the named child
//! collections a node can own, and the small enums carried as node fields.

use std::fmt;

/// Type tag of a document node
///
/// Serialized with the `UML` prefix StarUML expects, except `Project`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Project,
    Model,
    ClassDiagram,
    Class,
    Interface,
    Attribute,
    Operation,
    Parameter,
    Generalization,
    InterfaceRealization,
    Association,
    AssociationEnd,
    StateMachine,
    Region,
    State,
    Pseudostate,
    FinalState,
    Transition,
    Event,
    Collaboration,
    Interaction,
    SequenceDiagram,
    Lifeline,
    Message,
}

impl NodeKind {
    /// The `_type` string written to the document
    pub fn type_tag(self) -> &'static str {
        match self {
            NodeKind::Project => "Project",
            NodeKind::Model => "UMLModel",
            NodeKind::ClassDiagram => "UMLClassDiagram",
            NodeKind::Class => "UMLClass",
            NodeKind::Interface => "UMLInterface",
            NodeKind::Attribute => "UMLAttribute",
            NodeKind::Operation => "UMLOperation",
            NodeKind::Parameter => "UMLParameter",
            NodeKind::Generalization => "UMLGeneralization",
            NodeKind::InterfaceRealization => "UMLInterfaceRealization",
            NodeKind::Association => "UMLAssociation",
            NodeKind::AssociationEnd => "UMLAssociationEnd",
            NodeKind::StateMachine => "UMLStateMachine",
            NodeKind::Region => "UMLRegion",
            NodeKind::State => "UMLState",
            NodeKind::Pseudostate => "UMLPseudostate",
            NodeKind::FinalState => "UMLFinalState",
            NodeKind::Transition => "UMLTransition",
            NodeKind::Event => "UMLEvent",
            NodeKind::Collaboration => "UMLCollaboration",
            NodeKind::Interaction => "UMLInteraction",
            NodeKind::SequenceDiagram => "UMLSequenceDiagram",
            NodeKind::Lifeline => "UMLLifeline",
            NodeKind::Message => "UMLMessage",
        }
    }

    /// Returns true for class-like nodes that can be the target of a binding
    pub fn is_classifier(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Interface)
    }

    /// Returns true for relationship nodes with `source`/`target` fields
    pub fn is_directed_relationship(self) -> bool {
        matches!(
            self,
            NodeKind::Generalization | NodeKind::InterfaceRealization
        )
    }

    /// Returns true for state machine vertices
    pub fn is_vertex(self) -> bool {
        matches!(
            self,
            NodeKind::State | NodeKind::Pseudostate | NodeKind::FinalState
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Named collection in which a child sits inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    OwnedElements,
    Attributes,
    Operations,
    Parameters,
    Regions,
    Vertices,
    Transitions,
    Triggers,
    Participants,
    Messages,
    End1,
    End2,
}

impl Slot {
    /// Key under which the collection is written
    pub fn key(self) -> &'static str {
        match self {
            Slot::OwnedElements => "ownedElements",
            Slot::Attributes => "attributes",
            Slot::Operations => "operations",
            Slot::Parameters => "parameters",
            Slot::Regions => "regions",
            Slot::Vertices => "vertices",
            Slot::Transitions => "transitions",
            Slot::Triggers => "triggers",
            Slot::Participants => "participants",
            Slot::Messages => "messages",
            Slot::End1 => "end1",
            Slot::End2 => "end2",
        }
    }

    /// Singular slots hold one embedded object instead of an array
    pub fn is_singular(self) -> bool {
        matches!(self, Slot::End1 | Slot::End2)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Member visibility derived from source modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Parse a single modifier keyword
    pub fn from_modifier(modifier: &str) -> Option<Self> {
        match modifier.trim() {
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }

    /// First recognized visibility modifier in declaration order
    pub fn from_modifiers<S: AsRef<str>>(modifiers: &[S]) -> Option<Self> {
        modifiers
            .iter()
            .find_map(|m| Visibility::from_modifier(m.as_ref()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation marker on an association end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    None,
    Shared,
    Composite,
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationKind::None => write!(f, "none"),
            AggregationKind::Shared => write!(f, "shared"),
            AggregationKind::Composite => write!(f, "composite"),
        }
    }
}

/// Direction of an operation parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterDirection {
    In,
    Return,
}

impl fmt::Display for ParameterDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDirection::In => write!(f, "in"),
            ParameterDirection::Return => write!(f, "return"),
        }
    }
}

/// Kind of a pseudostate vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudostateKind {
    Initial,
}

impl fmt::Display for PseudostateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudostateKind::Initial => write!(f, "initial"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(NodeKind::Project.to_string(), "Project");
        assert_eq!(NodeKind::Model.to_string(), "UMLModel");
        assert_eq!(NodeKind::Class.to_string(), "UMLClass");
        assert_eq!(
            NodeKind::InterfaceRealization.to_string(),
            "UMLInterfaceRealization"
        );
        assert_eq!(NodeKind::Pseudostate.to_string(), "UMLPseudostate");
        assert_eq!(NodeKind::Lifeline.to_string(), "UMLLifeline");
    }

    #[test]
    fn test_node_kind_groups() {
        assert!(NodeKind::Class.is_classifier());
        assert!(NodeKind::Interface.is_classifier());
        assert!(!NodeKind::Attribute.is_classifier());

        assert!(NodeKind::Generalization.is_directed_relationship());
        assert!(!NodeKind::Association.is_directed_relationship());

        assert!(NodeKind::FinalState.is_vertex());
        assert!(!NodeKind::Transition.is_vertex());
    }

    #[test]
    fn test_slot_keys() {
        assert_eq!(Slot::OwnedElements.key(), "ownedElements");
        assert_eq!(Slot::End2.key(), "end2");
        assert!(Slot::End1.is_singular());
        assert!(!Slot::Parameters.is_singular());
    }

    #[test]
    fn test_visibility_first_match_wins() {
        assert_eq!(
            Visibility::from_modifiers(&["static", "private", "public"]),
            Some(Visibility::Private)
        );
        assert_eq!(
            Visibility::from_modifiers(&["protected", "final"]),
            Some(Visibility::Protected)
        );
        assert_eq!(Visibility::from_modifiers(&["static", "final"]), None);
        assert_eq!(Visibility::from_modifiers::<&str>(&[]), None);
    }

    #[test]
    fn test_field_enum_display() {
        assert_eq!(Visibility::Protected.to_string(), "protected");
        assert_eq!(AggregationKind::Shared.to_string(), "shared");
        assert_eq!(ParameterDirection::Return.to_string(), "return");
        assert_eq!(PseudostateKind::Initial.to_string(), "initial");
    }
}
