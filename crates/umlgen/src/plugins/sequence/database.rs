//! Sequence record store
//!
//! Stores participants and messages decoded from `@SendMessage`
//! annotations.

use std::collections::HashMap;

use anyhow::Result;

use crate::core::{Database, DecodedEdge};

/// A participant in the sequence diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A message between participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub from: String,
    pub to: String,
    pub label: String,
}

impl MessageRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }
}

impl From<DecodedEdge> for MessageRecord {
    fn from(edge: DecodedEdge) -> Self {
        Self::new(edge.from, edge.to, edge.label)
    }
}

/// Sequence record store
///
/// The lifeline registry of a sequence diagram: one participant per
/// distinct name, kept in first-seen order.
#[derive(Debug, Default)]
pub struct SequenceDatabase {
    /// Participants indexed by name
    participants: HashMap<String, Participant>,
    /// Participant names in first-seen order
    participant_order: Vec<String>,
    messages: Vec<MessageRecord>,
}

impl SequenceDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant if not already present
    pub fn add_participant(&mut self, participant: Participant) {
        if !self.participants.contains_key(&participant.name) {
            self.participant_order.push(participant.name.clone());
            self.participants
                .insert(participant.name.clone(), participant);
        }
    }

    pub fn ensure_participant(&mut self, name: &str) {
        self.add_participant(Participant::new(name));
    }

    /// Add a message, registering both participants
    pub fn add_message(&mut self, message: MessageRecord) {
        self.ensure_participant(&message.from);
        self.ensure_participant(&message.to);
        self.messages.push(message);
    }

    /// Participants in first-seen order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participant_order
            .iter()
            .filter_map(|name| self.participants.get(name))
    }

    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Database for SequenceDatabase {
    type Node = Participant;
    type Edge = MessageRecord;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.add_participant(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_message(edge);
        Ok(())
    }

    fn get_node(&self, name: &str) -> Option<&Self::Node> {
        self.participants.get(name)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.participants()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.messages.iter()
    }

    fn clear(&mut self) {
        self.participants.clear();
        self.participant_order.clear();
        self.messages.clear();
    }

    fn node_count(&self) -> usize {
        self.participant_count()
    }

    fn edge_count(&self) -> usize {
        self.message_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_message_registers_participants() {
        let mut db = SequenceDatabase::new();
        db.add_message(MessageRecord::new("Client", "Server", "request()"));
        db.add_message(MessageRecord::new("Server", "Client", "reply()"));

        assert_eq!(db.participant_count(), 2);
        assert_eq!(db.message_count(), 2);
        let names: Vec<_> = db.participants().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Client", "Server"]);
    }

    #[test]
    fn test_no_duplicate_participants() {
        let mut db = SequenceDatabase::new();
        db.add_node(Participant::new("A")).unwrap();
        db.add_node(Participant::new("A")).unwrap();
        assert_eq!(db.node_count(), 1);
        assert!(db.is_empty());
    }

    #[test]
    fn test_from_decoded_edge() {
        let edge = DecodedEdge {
            channel: crate::core::Channel::Message,
            from: "A".into(),
            to: "B".into(),
            label: "m()".into(),
        };
        assert_eq!(MessageRecord::from(edge), MessageRecord::new("A", "B", "m()"));
    }
}
