//! Class plugin
//!
//! Maps declarations onto classifier nodes and builds the relationships
//! between them.
//!
//! ```text
//! class A implements B { private B x; }
//!
//! A ──realizes──▶ B
//! B ◇──────────── A   (association owned by B, shared end on A)
//! ```

mod database;
mod mapper;
mod renderer;

pub use database::{ClassDatabase, ClassEntry, Relationship, RelationshipKind};
pub use mapper::{DeclarationMapper, MappedDeclaration};
pub use renderer::{RelationshipRenderer, RelationshipReport, UnresolvedRelationship};
