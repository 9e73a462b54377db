//! Java source scanner
//!
//! Walks a source tree, parses every `.java` file with tree-sitter and
//! extracts the declaration records the assembler consumes. Only top-level
//! classes and interfaces are modeled.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, span, trace, warn, Level};
use tree_sitter::{Node, Parser};
use walkdir::WalkDir;

use umlgen::{Annotation, Declaration, Endpoints, Field, Member, Method, ModelError, Target, TypeRef};

/// Parses Java sources into declaration records
pub struct JavaScanner {
    parser: Parser,
}

impl JavaScanner {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .map_err(|e| anyhow!("Failed to load Java grammar: {}", e))?;
        Ok(Self { parser })
    }

    /// Scan every `.java` file under `root`, in file name order
    ///
    /// Files that cannot be read or do not parse are skipped with a
    /// warning. A malformed trigger or message annotation is an error.
    pub fn scan_dir(&mut self, root: &Path) -> Result<Vec<Declaration>> {
        let scan_span = span!(Level::INFO, "scan_sources", root = %root.display());
        let _enter = scan_span.enter();

        if !root.exists() {
            bail!("Source path does not exist: {}", root.display());
        }

        let files = discover_java_files(root);
        let mut declarations = Vec::new();
        let mut skipped = 0;
        for path in &files {
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                    skipped += 1;
                    continue;
                }
            };
            let scanned = self
                .scan_source(&source)
                .with_context(|| format!("Failed to scan {}", path.display()))?;
            match scanned {
                Some(found) => {
                    debug!(path = %path.display(), declarations = found.len(), "Scanned file");
                    declarations.extend(found);
                }
                None => {
                    warn!(path = %path.display(), "Skipping file with syntax errors");
                    skipped += 1;
                }
            }
        }

        info!(
            files = files.len(),
            declarations = declarations.len(),
            skipped,
            "Scan completed"
        );
        Ok(declarations)
    }

    /// Extract the top-level declarations of one compilation unit
    ///
    /// Returns `None` when the source has syntax errors.
    pub fn scan_source(&mut self, source: &str) -> Result<Option<Vec<Declaration>>> {
        let Some(tree) = self.parser.parse(source, None) else {
            return Ok(None);
        };
        let root = tree.root_node();
        if root.has_error() {
            return Ok(None);
        }

        let src = source.as_bytes();
        let mut declarations = Vec::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if let Some(declaration) = declaration(node, src)? {
                declarations.push(declaration);
            }
        }
        Ok(Some(declarations))
    }
}

/// All `.java` files under `root`, hidden directories excluded
pub fn discover_java_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "java") {
            files.push(path.to_path_buf());
        }
    }
    files
}

fn text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or_default()
}

fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn is_annotation(node: Node) -> bool {
    matches!(node.kind(), "annotation" | "marker_annotation")
}

fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

/// Keyword modifiers such as `public` or `static`, in source order
fn modifiers(node: Node, src: &[u8]) -> Vec<String> {
    let Some(modifiers) = child_of_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    let keywords = modifiers
        .children(&mut cursor)
        .filter(|child| !is_annotation(*child) && !is_comment(*child))
        .map(|child| text(child, src).to_string())
        .collect();
    keywords
}

fn annotations<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let Some(modifiers) = child_of_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    let found = modifiers
        .children(&mut cursor)
        .filter(|child| is_annotation(*child))
        .collect();
    found
}

/// Build a descriptor from type text, adding `extra` array dimensions
fn type_ref(node: Node, src: &[u8], extra: usize) -> TypeRef {
    let collapsed = text(node, src).split_whitespace().collect::<Vec<_>>().join(" ");
    let mut ty = TypeRef::parse(&collapsed).unwrap_or_else(|_| {
        trace!(text = %collapsed, "Keeping unparsed type text");
        TypeRef::named(collapsed.clone())
    });
    ty.dimensions += extra;
    ty
}

fn dimensions(node: Node, src: &[u8]) -> usize {
    node.child_by_field_name("dimensions")
        .map(|d| text(d, src).matches('[').count())
        .unwrap_or(0)
}

/// Type names of a `superclass`, `super_interfaces` or `extends_interfaces`
/// clause, generic arguments stripped
fn type_names(node: Node, src: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "type_list" => names.extend(type_names(child, src)),
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                let raw = text(child, src);
                let base = raw.split('<').next().unwrap_or(raw);
                names.push(base.split_whitespace().collect());
            }
            _ => {}
        }
    }
    names
}

fn declaration(node: Node, src: &[u8]) -> Result<Option<Declaration>> {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src))
        .unwrap_or_default();
    let mut declaration = match node.kind() {
        "class_declaration" => Declaration::class(name),
        "interface_declaration" => Declaration::interface(name),
        _ => return Ok(None),
    };
    declaration.modifiers = modifiers(node, src);

    if let Some(superclass) = node.child_by_field_name("superclass") {
        declaration.extends.extend(type_names(superclass, src));
    }
    if let Some(interfaces) = node.child_by_field_name("interfaces") {
        declaration.implements.extend(type_names(interfaces, src));
    }
    if let Some(extends) = child_of_kind(node, "extends_interfaces") {
        declaration.extends.extend(type_names(extends, src));
    }
    if let Some(body) = node.child_by_field_name("body") {
        declaration.members = members(body, src)?;
    }

    trace!(name = %declaration.name, members = declaration.members.len(), "Extracted declaration");
    Ok(Some(declaration))
}

fn members(body: Node, src: &[u8]) -> Result<Vec<Member>> {
    let mut members = Vec::new();
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "field_declaration" | "constant_declaration" => members.extend(fields(child, src)),
            "method_declaration" => members.push(Member::Method(method(child, src)?)),
            _ if is_comment(child) => {}
            _ => members.push(Member::Other),
        }
    }
    Ok(members)
}

/// One field member per variable declarator: `int a, b[];` yields two
fn fields(node: Node, src: &[u8]) -> Vec<Member> {
    let modifiers = modifiers(node, src);
    let Some(type_node) = node.child_by_field_name("type") else {
        return Vec::new();
    };
    let mut cursor = node.walk();
    let declarators: Vec<_> = node.children_by_field_name("declarator", &mut cursor).collect();

    declarators
        .into_iter()
        .filter_map(|declarator| {
            let name = text(declarator.child_by_field_name("name")?, src);
            let ty = type_ref(type_node, src, dimensions(declarator, src));
            let mut field = Field::new(name, ty);
            field.modifiers = modifiers.clone();
            Some(Member::Field(field))
        })
        .collect()
}

fn method(node: Node, src: &[u8]) -> Result<Method> {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src))
        .unwrap_or_default();
    let return_type = match node.child_by_field_name("type") {
        Some(ty) => type_ref(ty, src, dimensions(node, src)),
        None => TypeRef::named("void"),
    };
    let mut method = Method::new(name, return_type);
    method.modifiers = modifiers(node, src);

    if let Some(parameters) = node.child_by_field_name("parameters") {
        let mut cursor = parameters.walk();
        for parameter in parameters.named_children(&mut cursor) {
            match parameter.kind() {
                "formal_parameter" => {
                    let (Some(ty), Some(param_name)) = (
                        parameter.child_by_field_name("type"),
                        parameter.child_by_field_name("name"),
                    ) else {
                        continue;
                    };
                    let ty = type_ref(ty, src, dimensions(parameter, src));
                    method = method.with_parameter(text(param_name, src), ty);
                }
                "spread_parameter" => {
                    if let Some((param_name, ty)) = spread_parameter(parameter, src) {
                        method = method.with_parameter(param_name, ty);
                    }
                }
                _ => {}
            }
        }
    }

    for node in annotations(node) {
        if let Some(annotation) = method_annotation(node, src, &method.name)? {
            method.annotations.push(annotation);
        }
    }
    Ok(method)
}

/// `T... xs` becomes `xs: T[]`
fn spread_parameter(node: Node, src: &[u8]) -> Option<(String, TypeRef)> {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    let ty = children
        .iter()
        .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator") && !is_annotation(**c))?;
    let declarator = children.iter().find(|c| c.kind() == "variable_declarator")?;
    let name = text(declarator.child_by_field_name("name")?, src);
    Some((name.to_string(), type_ref(*ty, src, 1)))
}

/// Decode a trigger or message annotation; other annotations yield `None`
fn method_annotation(node: Node, src: &[u8], method: &str) -> Result<Option<Annotation>> {
    let Some(name) = node.child_by_field_name("name").map(|n| text(n, src)) else {
        return Ok(None);
    };
    let family = name.rsplit('.').next().unwrap_or(name);
    let annotation = match family {
        "Trigger" => Annotation::Trigger(endpoints(node, src, family, method)?),
        "SendMessage" => Annotation::SendMessage(endpoints(node, src, family, method)?),
        "Triggers" => Annotation::Triggers {
            value: grouped(node, src, family, method)?,
        },
        "SendMessages" => Annotation::SendMessages {
            value: grouped(node, src, family, method)?,
        },
        _ => return Ok(None),
    };
    Ok(Some(annotation))
}

fn endpoints(node: Node, src: &[u8], family: &str, method: &str) -> Result<Endpoints> {
    let malformed = |reason: &str| ModelError::malformed_annotation(family, method, reason);
    let arguments = node
        .child_by_field_name("arguments")
        .ok_or_else(|| malformed("missing `from` and `to`"))?;

    let mut from = None;
    let mut to = None;
    let mut cursor = arguments.walk();
    for pair in arguments.named_children(&mut cursor) {
        if pair.kind() != "element_value_pair" {
            continue;
        }
        let (Some(key), Some(value)) = (
            pair.child_by_field_name("key"),
            pair.child_by_field_name("value"),
        ) else {
            continue;
        };
        match text(key, src) {
            "from" => {
                from = Some(
                    string_value(value, src).ok_or_else(|| malformed("`from` is not a string literal"))?,
                )
            }
            "to" => {
                to = Some(target(value, src).ok_or_else(|| {
                    malformed("`to` is neither a string literal nor an array of string literals")
                })?)
            }
            _ => {}
        }
    }

    match (from, to) {
        (Some(from), Some(to)) => Ok(Endpoints { from, to }),
        (None, _) => Err(malformed("missing `from`").into()),
        (_, None) => Err(malformed("missing `to`").into()),
    }
}

/// Entries of `@Triggers({...})` or `@Triggers(value = {...})`
fn grouped(node: Node, src: &[u8], family: &str, method: &str) -> Result<Vec<Endpoints>> {
    let malformed = |reason: &str| ModelError::malformed_annotation(family, method, reason);
    let arguments = node
        .child_by_field_name("arguments")
        .ok_or_else(|| malformed("missing annotation list"))?;

    let mut cursor = arguments.walk();
    let children: Vec<_> = arguments
        .named_children(&mut cursor)
        .filter(|c| !is_comment(*c))
        .collect();
    let value = children
        .iter()
        .find(|c| {
            c.kind() == "element_value_pair"
                && c.child_by_field_name("key").map(|k| text(k, src)) == Some("value")
        })
        .and_then(|pair| pair.child_by_field_name("value"))
        .or_else(|| children.first().copied().filter(|c| c.kind() != "element_value_pair"))
        .ok_or_else(|| malformed("missing annotation list"))?;

    let entries: Vec<Node> = match value.kind() {
        "element_value_array_initializer" => {
            let mut cursor = value.walk();
            let entries = value
                .named_children(&mut cursor)
                .filter(|c| !is_comment(*c))
                .collect();
            entries
        }
        "annotation" => vec![value],
        _ => return Err(malformed("value is not a list of annotations").into()),
    };

    entries
        .into_iter()
        .map(|entry| {
            if entry.kind() != "annotation" {
                return Err(malformed("list entry is not an annotation").into());
            }
            endpoints(entry, src, family, method)
        })
        .collect()
}

fn string_value(node: Node, src: &[u8]) -> Option<String> {
    if node.kind() != "string_literal" {
        return None;
    }
    let raw = text(node, src);
    if raw.starts_with("\"\"\"") {
        return None;
    }
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    unescape(inner)
}

/// Decode the escape sequences of a Java string literal body
///
/// Returns `None` for an invalid escape.
fn unescape(literal: &str) -> Option<String> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            's' => ' ',
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            digit @ '0'..='7' => {
                // Octal escapes go up to \377
                let max_len = if digit <= '3' { 3 } else { 2 };
                let mut value = digit.to_digit(8)?;
                for _ in 1..max_len {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

fn target(node: Node, src: &[u8]) -> Option<Target> {
    match node.kind() {
        "string_literal" => string_value(node, src).map(Target::One),
        "element_value_array_initializer" => {
            let mut cursor = node.walk();
            let names = node
                .named_children(&mut cursor)
                .filter(|c| !is_comment(*c))
                .map(|c| string_value(c, src))
                .collect::<Option<Vec<_>>>()?;
            Some(Target::Many(names))
        }
        _ => None,
    }
}
