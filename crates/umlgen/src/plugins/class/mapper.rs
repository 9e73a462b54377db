//! Declaration mapper
//!
//! Turns one class or interface declaration into its document subtree:
//! the classifier node, one attribute per field and one operation per
//! method. Relationship facts go to the [`ClassDatabase`]; annotation facts
//! are decoded and handed back to the caller for routing.

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};

use super::database::{ClassDatabase, ClassEntry, Relationship};
use crate::core::{
    DecodedEdge, Declaration, DeclarationKind, Document, Field, Member, Method, NodeId, NodeKind,
    ParameterDirection, Slot, Value, Visibility,
};

/// What mapping one declaration produced
#[derive(Debug, Clone)]
pub struct MappedDeclaration {
    /// The class or interface node
    pub id: NodeId,
    /// Decoded trigger and message facts, in method order
    pub edges: Vec<DecodedEdge>,
}

/// Maps declaration records onto document nodes
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationMapper;

impl DeclarationMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map `declaration` into a classifier node owned by `owner`
    pub fn map(
        &self,
        declaration: &Declaration,
        document: &mut Document,
        owner: NodeId,
        classes: &mut ClassDatabase,
    ) -> Result<MappedDeclaration> {
        let map_span = span!(
            Level::DEBUG,
            "map_declaration",
            name = %declaration.name,
            members = declaration.members.len()
        );
        let _enter = map_span.enter();

        let kind = match declaration.kind {
            DeclarationKind::Class => NodeKind::Class,
            DeclarationKind::Interface => NodeKind::Interface,
        };
        let id = document.add_child(owner, Slot::OwnedElements, kind, Some(declaration.name.clone()))?;
        // Interfaces are implicitly abstract; only declared class flags are kept
        if kind == NodeKind::Class && declaration.modifiers.iter().any(|m| m == "abstract") {
            document.set_field(id, "isAbstract", Value::Bool(true))?;
        }
        document.declare_slot(id, Slot::Attributes)?;
        document.declare_slot(id, Slot::Operations)?;

        if let Some(shadowed) = classes.add_class(ClassEntry::new(&declaration.name, declaration.kind, id)) {
            warn!(
                name = %declaration.name,
                %shadowed,
                replacement = %id,
                "Duplicate class name, later declaration takes over the binding"
            );
        }

        for parent in &declaration.extends {
            classes.add_relationship(Relationship::generalization(&declaration.name, parent));
        }
        for interface in &declaration.implements {
            classes.add_relationship(Relationship::realization(&declaration.name, interface));
        }

        let mut edges = Vec::new();
        for member in &declaration.members {
            match member {
                Member::Field(field) => {
                    self.map_field(field, &declaration.name, document, id, classes)?;
                }
                Member::Method(method) => {
                    self.map_method(method, document, id)?;
                    for annotation in &method.annotations {
                        edges.extend(annotation.decode(&method.name)?);
                    }
                }
                Member::Other => trace!("Skipping unmodeled member"),
            }
        }

        debug!(
            %id,
            fields = declaration.fields().count(),
            methods = declaration.methods().count(),
            annotation_edges = edges.len(),
            "Mapped declaration"
        );
        Ok(MappedDeclaration { id, edges })
    }

    fn map_field(
        &self,
        field: &Field,
        class_name: &str,
        document: &mut Document,
        class: NodeId,
        classes: &mut ClassDatabase,
    ) -> Result<NodeId> {
        let id = document.add_child(class, Slot::Attributes, NodeKind::Attribute, Some(field.name.clone()))?;
        set_modifier_flags(document, id, &field.modifiers, false)?;
        document.set_field(id, "type", Value::symbol(field.ty.to_string()))?;

        // Outer type first, then nested arguments left to right
        for name in field.ty.reference_names() {
            trace!(field = %field.name, aggregated = name, "Aggregation record");
            classes.add_relationship(Relationship::aggregation(name, class_name));
        }
        Ok(id)
    }

    fn map_method(&self, method: &Method, document: &mut Document, class: NodeId) -> Result<NodeId> {
        let id = document.add_child(class, Slot::Operations, NodeKind::Operation, Some(method.name.clone()))?;
        set_modifier_flags(document, id, &method.modifiers, true)?;
        document.declare_slot(id, Slot::Parameters)?;

        let returns = document.add_child(id, Slot::Parameters, NodeKind::Parameter, None)?;
        document.set_field(returns, "type", Value::symbol(method.return_type.to_string()))?;
        document.set_field(
            returns,
            "direction",
            Value::text(ParameterDirection::Return.to_string()),
        )?;

        for parameter in &method.parameters {
            let param = document.add_child(
                id,
                Slot::Parameters,
                NodeKind::Parameter,
                Some(parameter.name.clone()),
            )?;
            document.set_field(param, "type", Value::symbol(parameter.ty.to_string()))?;
        }
        Ok(id)
    }
}

/// Visibility plus the boolean flags, each written only when present
fn set_modifier_flags(
    document: &mut Document,
    id: NodeId,
    modifiers: &[String],
    allow_abstract: bool,
) -> Result<()> {
    if let Some(visibility) = Visibility::from_modifiers(modifiers) {
        document.set_field(id, "visibility", Value::text(visibility.as_str()))?;
    }
    if modifiers.iter().any(|m| m == "static") {
        document.set_field(id, "isStatic", Value::Bool(true))?;
    }
    if allow_abstract && modifiers.iter().any(|m| m == "abstract") {
        document.set_field(id, "isAbstract", Value::Bool(true))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Annotation, Channel, Endpoints, IdAllocator, TypeRef};

    fn setup() -> (Document, NodeId, ClassDatabase) {
        let mut document = Document::new(IdAllocator::new(1), NodeKind::Project, "p").unwrap();
        let root = document.root();
        let model = document
            .add_child(root, Slot::OwnedElements, NodeKind::Model, Some("Model".into()))
            .unwrap();
        (document, model, ClassDatabase::new())
    }

    #[test]
    fn test_attributes_and_operations() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("Order")
            .with_member(Field::new("id", TypeRef::named("long")).with_modifiers(&["private", "final"]))
            .with_member(
                Method::new("total", TypeRef::named("double"))
                    .with_modifiers(&["public", "static"])
                    .with_parameter("rate", TypeRef::named("float")),
            );

        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();

        let attrs: Vec<_> = document.children_in(mapped.id, Slot::Attributes).collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].field("visibility"), Some(&Value::text("private")));
        assert_eq!(attrs[0].field("type"), Some(&Value::symbol("long")));
        assert!(attrs[0].field("isStatic").is_none());

        let ops: Vec<_> = document.children_in(mapped.id, Slot::Operations).collect();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].field("isStatic"), Some(&Value::Bool(true)));

        let params: Vec<_> = document.children_of(ops[0].id()).collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name(), None);
        assert_eq!(params[0].field("direction"), Some(&Value::text("return")));
        assert_eq!(params[0].field("type"), Some(&Value::symbol("double")));
        assert_eq!(params[1].name(), Some("rate"));
        assert!(params[1].field("direction").is_none());
    }

    #[test]
    fn test_visibility_first_match_wins() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("A").with_member(
            Method::new("m", TypeRef::named("void")).with_modifiers(&["static", "protected", "public"]),
        );
        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();
        let op = document.children_in(mapped.id, Slot::Operations).next().unwrap();
        assert_eq!(op.field("visibility"), Some(&Value::text("protected")));
    }

    #[test]
    fn test_no_visibility_modifier() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("A").with_member(Field::new("x", TypeRef::named("int")));
        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();
        let attr = document.children_in(mapped.id, Slot::Attributes).next().unwrap();
        assert!(attr.field("visibility").is_none());
    }

    #[test]
    fn test_relationship_records() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("A")
            .extending("Base")
            .implementing("B")
            .with_member(Field::new("count", TypeRef::named("int")))
            .with_member(Field::new(
                "index",
                TypeRef::parse("Map<String, List<B>>").unwrap(),
            ));
        DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();

        let records: Vec<_> = classes
            .relationships()
            .iter()
            .map(|r| (r.kind.as_str(), r.source.as_str(), r.target.as_str()))
            .collect();
        assert_eq!(
            records,
            vec![
                ("generalization", "A", "Base"),
                ("realization", "A", "B"),
                ("aggregation", "Map", "A"),
                ("aggregation", "String", "A"),
                ("aggregation", "List", "A"),
                ("aggregation", "B", "A"),
            ]
        );
        assert_eq!(classes.resolve("A"), Some(document.children_of(model).last().unwrap().id()));
    }

    #[test]
    fn test_other_members_skipped() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::interface("I").with_member(Member::Other);
        let before = document.len();
        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();
        assert_eq!(document.len(), before + 1);
        assert_eq!(document.get(mapped.id).unwrap().kind(), NodeKind::Interface);
    }

    #[test]
    fn test_abstract_class_flag() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("Shape").with_modifier("public").with_modifier("abstract");
        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();
        assert_eq!(
            document.get(mapped.id).unwrap().field("isAbstract"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_interface_never_flagged_abstract() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::interface("Shape")
            .with_modifier("public")
            .with_modifier("abstract")
            .with_member(Method::new("area", TypeRef::named("double")));
        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();
        assert_eq!(document.get(mapped.id).unwrap().field("isAbstract"), None);

        // Operations carry declared modifiers only
        let operation = document.children_in(mapped.id, Slot::Operations).next().unwrap();
        assert_eq!(operation.field("isAbstract"), None);
        assert_eq!(operation.field("visibility"), None);
    }

    #[test]
    fn test_annotations_decoded_in_method_order() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("Door")
            .with_member(
                Method::new("open", TypeRef::named("void"))
                    .with_modifiers(&["private"])
                    .with_annotation(Annotation::Trigger(Endpoints::new("Closed", "Opened")))
                    .with_annotation(Annotation::SendMessage(Endpoints::new("Door", "Alarm"))),
            )
            .with_member(
                Method::new("close", TypeRef::named("void")).with_annotation(Annotation::Triggers {
                    value: vec![Endpoints::new("Opened", vec!["Closed", "FinalState"])],
                }),
            );
        let mapped = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap();

        let summary: Vec<_> = mapped
            .edges
            .iter()
            .map(|e| (e.channel, e.to.as_str(), e.label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Channel::Trigger, "Opened", "open()"),
                (Channel::Message, "Alarm", "open()"),
                (Channel::Trigger, "Closed", "close()"),
                (Channel::Trigger, "FinalState", "close()"),
            ]
        );
    }

    #[test]
    fn test_malformed_annotation_fails() {
        let (mut document, model, mut classes) = setup();
        let decl = Declaration::class("A").with_member(
            Method::new("m", TypeRef::named("void"))
                .with_annotation(Annotation::Trigger(Endpoints::new("", "B"))),
        );
        let err = DeclarationMapper::new()
            .map(&decl, &mut document, model, &mut classes)
            .unwrap_err();
        assert!(err.to_string().contains("@Trigger"));
    }
}
