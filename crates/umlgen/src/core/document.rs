//! The assembled model document
//!
//! A [`Document`] is an arena of [`DocumentNode`]s forming a single tree.
//! Nodes are appended in identifier order and never removed. Every node
//! except the root has exactly one parent, fixed at creation, and appears
//! exactly once among that parent's children.
//!
//! Fields that name another node start out as [`Value::Symbol`] and are
//! rewritten into [`Value::Ref`] by [`Document::resolve_symbols`] once all
//! class nodes exist.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::{IdAllocator, ModelError, NameTable, NodeId, NodeKind, Slot};

/// A type-specific field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain text, written as a JSON string
    Text(String),
    /// Boolean flag
    Bool(bool),
    /// Structural reference, written as `{"$ref": "<id>"}`
    Ref(NodeId),
    /// Symbolic name awaiting resolution; written as text if it never resolves
    Symbol(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// The referenced node, if this is a structural reference
    pub fn as_ref_id(&self) -> Option<NodeId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// The textual content of `Text` and `Symbol` values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// One node of the document tree
#[derive(Debug, Clone)]
pub struct DocumentNode {
    id: NodeId,
    kind: NodeKind,
    name: Option<String>,
    parent: Option<NodeId>,
    slot: Option<Slot>,
    slots: Vec<Slot>,
    children: Vec<NodeId>,
    fields: Vec<(&'static str, Value)>,
}

impl DocumentNode {
    fn new(id: NodeId, kind: NodeKind, name: Option<String>) -> Self {
        Self {
            id,
            kind,
            name,
            parent: None,
            slot: None,
            slots: Vec::new(),
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The collection of the parent this node sits in
    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }

    /// Owned children in creation order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Look up a type-specific field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Type-specific fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    fn set_field(&mut self, key: &'static str, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    fn declare_slot(&mut self, slot: Slot) {
        if !self.slots.contains(&slot) {
            self.slots.push(slot);
        }
    }
}

/// Arena holding the whole model tree
#[derive(Debug, Clone)]
pub struct Document {
    ids: IdAllocator,
    nodes: Vec<DocumentNode>,
}

impl Document {
    /// Create a document whose root node takes the allocator's first id
    pub fn new(
        mut ids: IdAllocator,
        kind: NodeKind,
        name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let root = DocumentNode::new(ids.next_id()?, kind, Some(name.into()));
        Ok(Self {
            ids,
            nodes: vec![root],
        })
    }

    pub fn root(&self) -> NodeId {
        self.nodes[0].id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in creation (and identifier) order
    pub fn nodes(&self) -> impl Iterator<Item = &DocumentNode> {
        self.nodes.iter()
    }

    pub fn get(&self, id: NodeId) -> Option<&DocumentNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        let base = self.nodes[0].id.raw();
        let index = id.raw().checked_sub(base)? as usize;
        (index < self.nodes.len()).then_some(index)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DocumentNode, ModelError> {
        let index = self.index_of(id).ok_or(ModelError::UnknownNode { id })?;
        Ok(&mut self.nodes[index])
    }

    /// Create a node owned by `parent` in the given collection
    pub fn add_child(
        &mut self,
        parent: NodeId,
        slot: Slot,
        kind: NodeKind,
        name: Option<String>,
    ) -> Result<NodeId, ModelError> {
        // Validate before allocating so a bad parent does not burn an id.
        self.node_mut(parent)?;
        let id = self.ids.next_id()?;
        let mut node = DocumentNode::new(id, kind, name);
        node.parent = Some(parent);
        node.slot = Some(slot);
        self.nodes.push(node);

        let owner = self.node_mut(parent)?;
        owner.declare_slot(slot);
        owner.children.push(id);
        tracing::trace!(%id, %kind, %parent, slot = slot.key(), "Created node");
        Ok(id)
    }

    /// Make `slot` appear on `id` even while it has no children
    pub fn declare_slot(&mut self, id: NodeId, slot: Slot) -> Result<(), ModelError> {
        self.node_mut(id)?.declare_slot(slot);
        Ok(())
    }

    /// Set (or overwrite) a type-specific field
    pub fn set_field(
        &mut self,
        id: NodeId,
        key: &'static str,
        value: Value,
    ) -> Result<(), ModelError> {
        self.node_mut(id)?.set_field(key, value);
        Ok(())
    }

    /// Children of `id` in creation order
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &DocumentNode> {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(*child))
    }

    /// Children of `id` sitting in `slot`
    pub fn children_in(&self, id: NodeId, slot: Slot) -> impl Iterator<Item = &DocumentNode> {
        self.children_of(id)
            .filter(move |child| child.slot == Some(slot))
    }

    /// Pre-order walk of the subtree rooted at `id`
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev());
        }
        order
    }

    /// Rewrite symbolic names under `root` into structural references
    ///
    /// Names missing from `table` stay as plain text. Returns how many
    /// fields were resolved.
    pub fn resolve_symbols(&mut self, root: NodeId, table: &NameTable) -> usize {
        let mut resolved = 0;
        for id in self.subtree(root) {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            for (key, value) in self.nodes[index].fields.iter_mut() {
                if let Value::Symbol(name) = value {
                    if let Some(target) = table.resolve(name) {
                        tracing::trace!(%id, field = *key, name = %name, %target, "Resolved symbol");
                        *value = Value::Ref(target);
                        resolved += 1;
                    }
                }
            }
        }
        resolved
    }

    /// Check the parent/children invariants over the whole arena
    pub fn check_integrity(&self) -> Result<(), ModelError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if index > 0 && node.id <= self.nodes[index - 1].id {
                return Err(ModelError::integrity(format!(
                    "node {} is out of identifier order",
                    node.id
                )));
            }
            match node.parent {
                None if index != 0 => {
                    return Err(ModelError::integrity(format!(
                        "node {} has no parent",
                        node.id
                    )))
                }
                None => {}
                Some(parent) => {
                    let owner = self
                        .get(parent)
                        .ok_or(ModelError::UnknownNode { id: parent })?;
                    let occurrences = owner.children.iter().filter(|c| **c == node.id).count();
                    if occurrences != 1 {
                        return Err(ModelError::integrity(format!(
                            "node {} appears {} times under {}",
                            node.id, occurrences, parent
                        )));
                    }
                }
            }
            for child in &node.children {
                let owned = self.get(*child).ok_or(ModelError::UnknownNode { id: *child })?;
                if owned.parent != Some(node.id) {
                    return Err(ModelError::integrity(format!(
                        "node {} lists {} but is not its parent",
                        node.id, child
                    )));
                }
            }
        }
        Ok(())
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(|e| ModelError::serialization(e.to_string()))
    }

    /// Serialize to JSON indented by two spaces
    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::serialization(e.to_string()))
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView {
            document: self,
            node: &self.nodes[0],
        }
        .serialize(serializer)
    }
}

/// `{"$ref": id}`
struct Reference(NodeId);

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$ref", &self.0)?;
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Ref(id) => Reference(*id).serialize(serializer),
        }
    }
}

struct NodeView<'a> {
    document: &'a Document,
    node: &'a DocumentNode,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("_type", node.kind.type_tag())?;
        map.serialize_entry("_id", &node.id)?;
        if let Some(parent) = node.parent {
            map.serialize_entry("_parent", &Reference(parent))?;
        }
        if let Some(name) = &node.name {
            map.serialize_entry("name", name)?;
        }
        for (key, value) in &node.fields {
            map.serialize_entry(key, value)?;
        }
        for slot in &node.slots {
            let members = SlotView {
                document: self.document,
                node,
                slot: *slot,
            };
            if slot.is_singular() {
                if let Some(first) = members.members().next() {
                    map.serialize_entry(slot.key(), &first)?;
                }
            } else {
                map.serialize_entry(slot.key(), &members)?;
            }
        }
        map.end()
    }
}

struct SlotView<'a> {
    document: &'a Document,
    node: &'a DocumentNode,
    slot: Slot,
}

impl<'a> SlotView<'a> {
    fn members(&self) -> impl Iterator<Item = NodeView<'a>> + '_ {
        let document = self.document;
        self.node
            .children
            .iter()
            .filter_map(move |id| document.get(*id))
            .filter(move |child| child.slot == Some(self.slot))
            .map(move |child| NodeView {
                document,
                node: child,
            })
    }
}

impl Serialize for SlotView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for member in self.members() {
            seq.serialize_element(&member)?;
        }
        seq.end()
    }
}
