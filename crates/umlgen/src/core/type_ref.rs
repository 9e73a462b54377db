//! Declared type descriptors
//!
//! A [`TypeRef`] is the structured form of a declared type such as
//! `Map<String, List<Order>>`. Descriptors can be built directly, parsed from
//! their textual form, or deserialized from either shape.

use std::fmt;
use std::str::FromStr;

use chumsky::prelude::*;
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Names that denote primitive (non-reference) types
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Bound of a wildcard type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WildcardBound {
    /// `? extends T`
    Extends,
    /// `? super T`
    Super,
}

/// A declared type: a name plus nested type arguments
///
/// A bounded wildcard `? extends T` is stored as `T` with `wildcard` set;
/// an unbounded wildcard is the bare name `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TypeDescriptor")]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub dimensions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<WildcardBound>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl TypeRef {
    /// A plain type with no arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            dimensions: 0,
            wildcard: None,
        }
    }

    /// A generic type with the given arguments
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            arguments,
            ..Self::named(name)
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_wildcard(mut self, bound: WildcardBound) -> Self {
        self.wildcard = Some(bound);
        self
    }

    /// Parse the textual form, e.g. `List<? extends Shape>[]`
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        type_parser()
            .then_ignore(end())
            .parse(input)
            .into_result()
            .map_err(|errors| {
                let message = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                ModelError::invalid_type(input, message)
            })
    }

    /// Returns true for primitive types (arrays of primitives included)
    pub fn is_primitive(&self) -> bool {
        self.wildcard.is_none() && PRIMITIVE_TYPES.contains(&self.name.as_str())
    }

    /// Returns true if values of this type refer to another classifier
    ///
    /// Arrays count through their element type; an unbounded wildcard
    /// refers to nothing.
    pub fn is_reference(&self) -> bool {
        !self.is_primitive() && self.name != "?"
    }

    /// Names of every reference type reachable from this descriptor
    ///
    /// Pre-order: the outer type first, then each argument left to right.
    pub fn reference_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_reference_names(&mut names);
        names
    }

    fn collect_reference_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        if !self.is_reference() {
            return;
        }
        names.push(&self.name);
        for argument in &self.arguments {
            argument.collect_reference_names(names);
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wildcard {
            Some(WildcardBound::Extends) => write!(f, "? extends ")?,
            Some(WildcardBound::Super) => write!(f, "? super ")?,
            None => {}
        }
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", argument)?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

/// Either accepted input shape of a type descriptor
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeDescriptor {
    Text(String),
    Structured {
        name: String,
        #[serde(default)]
        arguments: Vec<TypeRef>,
        #[serde(default)]
        dimensions: usize,
        #[serde(default)]
        wildcard: Option<WildcardBound>,
    },
}

impl TryFrom<TypeDescriptor> for TypeRef {
    type Error = ModelError;

    fn try_from(value: TypeDescriptor) -> Result<Self, Self::Error> {
        match value {
            TypeDescriptor::Text(text) => TypeRef::parse(&text),
            TypeDescriptor::Structured {
                name,
                arguments,
                dimensions,
                wildcard,
            } => Ok(TypeRef {
                name,
                arguments,
                dimensions,
                wildcard,
            }),
        }
    }
}

/// Grammar for textual type descriptors
fn type_parser<'src>() -> impl Parser<'src, &'src str, TypeRef, extra::Err<Rich<'src, char>>> {
    recursive(|ty| {
        let ident = any()
            .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '$')
            .repeated()
            .at_least(1);

        // Qualified names keep their dots: `java.util.List`
        let name = ident
            .clone()
            .then(just('.').then(ident).repeated())
            .to_slice()
            .map(|s: &str| s.to_string());

        let arguments = ty
            .clone()
            .separated_by(just(','))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just('<'), just('>'))
            .or_not()
            .map(Option::unwrap_or_default);

        let brackets = just('[')
            .then(text::whitespace())
            .then(just(']'))
            .padded()
            .repeated()
            .collect::<Vec<_>>()
            .map(|pairs| pairs.len());

        // Varargs `T...` behave like one more array dimension
        let varargs = just("...").padded().or_not().map(|v| v.is_some() as usize);

        let class_type = name
            .then(arguments)
            .then(brackets)
            .then(varargs)
            .map(|(((name, arguments), dims), extra)| TypeRef {
                name,
                arguments,
                dimensions: dims + extra,
                wildcard: None,
            });

        let bound = text::keyword("extends")
            .to(WildcardBound::Extends)
            .or(text::keyword("super").to(WildcardBound::Super));

        let wildcard = just('?')
            .ignore_then(bound.padded().then(ty).or_not())
            .map(|bounded| match bounded {
                Some((kind, inner)) => TypeRef {
                    wildcard: Some(kind),
                    ..inner
                },
                None => TypeRef::named("?"),
            });

        wildcard.or(class_type).padded()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(TypeRef::parse("int").unwrap(), TypeRef::named("int"));
        assert_eq!(TypeRef::parse(" Order ").unwrap(), TypeRef::named("Order"));
    }

    #[test]
    fn test_parse_nested_generics() {
        let parsed = TypeRef::parse("Map<String, List<Order>>").unwrap();
        assert_eq!(
            parsed,
            TypeRef::generic(
                "Map",
                vec![
                    TypeRef::named("String"),
                    TypeRef::generic("List", vec![TypeRef::named("Order")]),
                ]
            )
        );
        assert_eq!(parsed.to_string(), "Map<String, List<Order>>");
    }

    #[test]
    fn test_parse_arrays_and_varargs() {
        assert_eq!(TypeRef::parse("int[]").unwrap().dimensions, 1);
        assert_eq!(TypeRef::parse("Order[][]").unwrap().dimensions, 2);
        let varargs = TypeRef::parse("String...").unwrap();
        assert_eq!(varargs.dimensions, 1);
        assert_eq!(varargs.to_string(), "String[]");
    }

    #[test]
    fn test_parse_wildcards() {
        let bounded = TypeRef::parse("List<? extends Shape>").unwrap();
        let argument = &bounded.arguments[0];
        assert_eq!(argument.name, "Shape");
        assert_eq!(argument.wildcard, Some(WildcardBound::Extends));
        assert_eq!(bounded.to_string(), "List<? extends Shape>");

        let open = TypeRef::parse("Set<?>").unwrap();
        assert_eq!(open.arguments[0].name, "?");
        assert_eq!(open.to_string(), "Set<?>");
    }

    #[test]
    fn test_parse_qualified_name() {
        let parsed = TypeRef::parse("java.util.List<Item>").unwrap();
        assert_eq!(parsed.name, "java.util.List");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TypeRef::parse("List<").is_err());
        assert!(TypeRef::parse("List<>").is_err());
        assert!(TypeRef::parse("").is_err());
        assert!(TypeRef::parse("@NonNull String").is_err());
    }

    #[test]
    fn test_primitive_and_reference() {
        assert!(TypeRef::named("int").is_primitive());
        assert!(TypeRef::named("int").with_dimensions(1).is_primitive());
        assert!(!TypeRef::named("Integer").is_primitive());
        assert!(TypeRef::named("Order").with_dimensions(1).is_reference());
        assert!(!TypeRef::named("?").is_reference());
    }

    #[test]
    fn test_reference_names_preorder() {
        let parsed = TypeRef::parse("Map<String, List<Order>>").unwrap();
        assert_eq!(
            parsed.reference_names(),
            vec!["Map", "String", "List", "Order"]
        );
        assert!(TypeRef::named("double").reference_names().is_empty());
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let text: TypeRef = serde_json::from_str("\"List<Order>\"").unwrap();
        let structured: TypeRef = serde_json::from_str(
            r#"{"name": "List", "arguments": [{"name": "Order"}]}"#,
        )
        .unwrap();
        assert_eq!(text, structured);

        let nested_text: TypeRef =
            serde_json::from_str(r#"{"name": "Map", "arguments": ["String", "Order"]}"#).unwrap();
        assert_eq!(nested_text.to_string(), "Map<String, Order>");
    }

    #[test]
    fn test_deserialize_rejects_bad_text() {
        assert!(serde_json::from_str::<TypeRef>("\"List<\"").is_err());
    }
}
