//! Tests for core error types and failure paths

use umlgen::prelude::*;
use umlgen::{Annotation, Endpoints};

#[test]
fn test_malformed_annotation_message() {
    let error = ModelError::malformed_annotation("Triggers", "reset", "`from` is blank");
    let msg = error.to_string();
    assert!(msg.contains("@Triggers"));
    assert!(msg.contains("reset()"));
    assert!(msg.contains("`from` is blank"));
}

#[test]
fn test_assembly_fails_fast_on_blank_target() {
    let declarations = vec![Declaration::class("A").with_member(
        Method::new("send", TypeRef::named("void"))
            .with_annotation(Annotation::SendMessage(Endpoints::new("A", vec!["B", " "]))),
    )];
    let err = Assembler::default().assemble(&declarations).unwrap_err();
    let model_error = err.downcast_ref::<ModelError>().unwrap();
    assert!(matches!(model_error, ModelError::MalformedAnnotation { .. }));
}

#[test]
fn test_invalid_declaration_json() {
    let err = umlgen::render_json(r#"[{"kind": "enum", "name": "E"}]"#).unwrap_err();
    assert!(err.to_string().contains("Invalid declaration input"));
}

#[test]
fn test_invalid_type_text_in_json() {
    let input = r#"[{
        "kind": "class",
        "name": "A",
        "members": [{"kind": "field", "name": "x", "type": "Map<String"}]
    }]"#;
    assert!(umlgen::render_json(input).is_err());
}

#[test]
fn test_invalid_type_parse_error() {
    let err = TypeRef::parse("List<>").unwrap_err();
    assert!(matches!(err, ModelError::InvalidType { .. }));
    assert!(err.to_string().contains("List<>"));
}

#[test]
fn test_unresolved_names_are_not_errors() {
    let declarations = vec![Declaration::class("A")
        .extending("Object")
        .implementing("Serializable")
        .with_member(Field::new("name", TypeRef::named("String")))];
    let assembly = Assembler::default().assemble(&declarations).unwrap();
    assert!(assembly.diagnostics.is_empty());

    let class = assembly.document.children_of(assembly.model).nth(1).unwrap();
    assert!(assembly
        .document
        .children_in(class.id(), Slot::OwnedElements)
        .next()
        .is_none());
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: ModelError = io_err.into();
    assert!(error.to_string().contains("read-only"));
}

#[test]
fn test_seed_without_headroom_is_an_error() {
    let assembler = Assembler::new(AssemblyConfig::default().with_id_seed(u64::MAX));
    let err = assembler.assemble(&[Declaration::class("A")]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ModelError>(),
        Some(ModelError::IdsExhausted { seed }) if *seed == u64::MAX
    ));

    // Enough room for every node is fine, right up to the last id
    let tight = Assembler::new(AssemblyConfig::default().with_id_seed(u64::MAX - 3))
        .assemble(&[Declaration::class("A")])
        .unwrap();
    assert_eq!(tight.document.len(), 4);
    assert_eq!(tight.document.nodes().last().unwrap().id().raw(), u64::MAX);
}
