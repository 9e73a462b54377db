//! umlgen - Assemble UML model documents from declaration records
//!
//! Takes the classes, interfaces, fields and methods of a codebase, plus
//! the `@Trigger`/`@SendMessage` annotations on its methods, and assembles
//! one StarUML-style document: a class diagram, an optional state machine
//! and an optional sequence diagram, linked by `{"$ref": id}` references.
//!
//! # Quick Start
//!
//! ```rust
//! use umlgen::prelude::*;
//!
//! let declarations = vec![
//!     Declaration::class("A")
//!         .implementing("B")
//!         .with_member(Field::new("x", TypeRef::named("B")).with_modifiers(&["private"])),
//!     Declaration::interface("B"),
//! ];
//!
//! let json = umlgen::to_json(&declarations).unwrap();
//! assert!(json.contains("UMLInterfaceRealization"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use umlgen::prelude::*;
//!
//! let config = AssemblyConfig::default()
//!     .with_project_name("shop")
//!     .with_report_unresolved(true);
//! let declarations = vec![Declaration::class("Order").extending("Entity")];
//!
//! let assembly = Assembler::new(config).assemble(&declarations).unwrap();
//! assert_eq!(assembly.diagnostics.len(), 1);
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Annotation, AssemblyConfig, Database, Declaration, DeclarationKind, Document, Endpoints,
        Field, Member, Method, ModelError, NodeId, NodeKind, Renderer, Slot, Target, TypeRef,
        Value,
    };
    pub use crate::plugins::{
        Assembler, Assembly, ClassDatabase, DeclarationMapper, RelationshipRenderer,
        SequenceDatabase, SequenceRenderer, StateDatabase, StateMachineRenderer,
    };
}

/// Assemble declarations with the default configuration
///
/// # Example
/// ```rust
/// use umlgen::prelude::*;
///
/// let document = umlgen::assemble(&[Declaration::class("A")]).unwrap();
/// assert_eq!(document.len(), 4);
/// ```
pub fn assemble(declarations: &[Declaration]) -> anyhow::Result<Document> {
    use crate::plugins::assembler::Assembler;

    Ok(Assembler::default().assemble(declarations)?.document)
}

/// Assemble declarations and serialize the document as indented JSON
pub fn to_json(declarations: &[Declaration]) -> anyhow::Result<String> {
    Ok(assemble(declarations)?.to_json_pretty()?)
}

/// Assemble a JSON array of declaration records into a JSON document
///
/// # Example
/// ```rust
/// let input = r#"[{"kind": "class", "name": "A"}]"#;
/// let output = umlgen::render_json(input).unwrap();
/// assert!(output.contains("\"_type\": \"UMLClass\""));
/// ```
pub fn render_json(input: &str) -> anyhow::Result<String> {
    let declarations = Declaration::list_from_json(input)?;
    to_json(&declarations)
}
