//! Trigger and message annotations
//!
//! Methods can carry four annotation families. `Trigger`/`Triggers` declare
//! state transitions; `SendMessage`/`SendMessages` declare messages between
//! participants. The grouped forms wrap a list of single entries. Each
//! family decodes into [`DecodedEdge`]s routed to one [`Channel`].

use std::slice;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Where a decoded annotation edge belongs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// State machine transition
    Trigger,
    /// Sequence diagram message
    Message,
}

/// The `to` value of an annotation: one name or a list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    One(String),
    Many(Vec<String>),
}

impl Target {
    pub fn names(&self) -> &[String] {
        match self {
            Target::One(name) => slice::from_ref(name),
            Target::Many(names) => names,
        }
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::One(value.to_string())
    }
}

impl From<Vec<&str>> for Target {
    fn from(value: Vec<&str>) -> Self {
        Target::Many(value.into_iter().map(str::to_string).collect())
    }
}

/// One `from`/`to` entry of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub from: String,
    pub to: Target,
}

impl Endpoints {
    pub fn new(from: impl Into<String>, to: impl Into<Target>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A decoded annotation instance attached to a method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family")]
pub enum Annotation {
    Trigger(Endpoints),
    Triggers { value: Vec<Endpoints> },
    SendMessage(Endpoints),
    SendMessages { value: Vec<Endpoints> },
}

/// A `(from, to, label)` fact produced by decoding an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEdge {
    pub channel: Channel,
    pub from: String,
    pub to: String,
    pub label: String,
}

impl Annotation {
    /// Source-level name of the annotation family
    pub fn family(&self) -> &'static str {
        match self {
            Annotation::Trigger(_) => "Trigger",
            Annotation::Triggers { .. } => "Triggers",
            Annotation::SendMessage(_) => "SendMessage",
            Annotation::SendMessages { .. } => "SendMessages",
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Annotation::Trigger(_) | Annotation::Triggers { .. } => Channel::Trigger,
            Annotation::SendMessage(_) | Annotation::SendMessages { .. } => Channel::Message,
        }
    }

    /// The single entries this annotation stands for
    pub fn entries(&self) -> &[Endpoints] {
        match self {
            Annotation::Trigger(entry) | Annotation::SendMessage(entry) => slice::from_ref(entry),
            Annotation::Triggers { value } | Annotation::SendMessages { value } => value,
        }
    }

    /// Decode into one edge per target name, labelled `method()`
    ///
    /// Fails on a blank `from` or target name.
    pub fn decode(&self, method: &str) -> Result<Vec<DecodedEdge>, ModelError> {
        let channel = self.channel();
        let label = format!("{}()", method);
        let mut edges = Vec::new();

        for entry in self.entries() {
            if entry.from.trim().is_empty() {
                return Err(ModelError::malformed_annotation(
                    self.family(),
                    method,
                    "`from` is blank",
                ));
            }
            for to in entry.to.names() {
                if to.trim().is_empty() {
                    return Err(ModelError::malformed_annotation(
                        self.family(),
                        method,
                        "`to` contains a blank name",
                    ));
                }
                edges.push(DecodedEdge {
                    channel,
                    from: entry.from.clone(),
                    to: to.clone(),
                    label: label.clone(),
                });
            }
        }
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_target() {
        let annotation = Annotation::Trigger(Endpoints::new("Idle", "Busy"));
        let edges = annotation.decode("start").unwrap();
        assert_eq!(
            edges,
            vec![DecodedEdge {
                channel: Channel::Trigger,
                from: "Idle".into(),
                to: "Busy".into(),
                label: "start()".into(),
            }]
        );
    }

    #[test]
    fn test_list_target_fans_out() {
        let annotation = Annotation::Trigger(Endpoints::new("InitState", vec!["state1", "state2"]));
        let edges = annotation.decode("setTrue").unwrap();
        let targets: Vec<_> = edges.iter().map(|e| e.to.as_str()).collect();
        assert_eq!(targets, vec!["state1", "state2"]);
        assert!(edges.iter().all(|e| e.label == "setTrue()"));
    }

    #[test]
    fn test_grouped_form_unwraps_entries() {
        let annotation = Annotation::SendMessages {
            value: vec![
                Endpoints::new("Client", "Server"),
                Endpoints::new("Server", vec!["Db", "Cache"]),
            ],
        };
        let edges = annotation.decode("query").unwrap();
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.channel == Channel::Message));
        assert_eq!(edges[2].from, "Server");
        assert_eq!(edges[2].to, "Cache");
    }

    #[test]
    fn test_empty_target_list_yields_nothing() {
        let annotation = Annotation::Trigger(Endpoints {
            from: "A".into(),
            to: Target::Many(Vec::new()),
        });
        assert!(annotation.decode("noop").unwrap().is_empty());
    }

    #[test]
    fn test_blank_names_fail_fast() {
        let blank_from = Annotation::Trigger(Endpoints::new(" ", "B"));
        assert!(matches!(
            blank_from.decode("m"),
            Err(ModelError::MalformedAnnotation { .. })
        ));

        let blank_to = Annotation::SendMessage(Endpoints::new("A", vec!["B", ""]));
        let err = blank_to.decode("m").unwrap_err();
        assert!(err.to_string().contains("@SendMessage"));
    }

    #[test]
    fn test_deserialize_tagged_families() {
        let single: Annotation =
            serde_json::from_str(r#"{"family": "Trigger", "from": "A", "to": ["B", "C"]}"#)
                .unwrap();
        assert_eq!(single.entries()[0].to.names().len(), 2);

        let grouped: Annotation = serde_json::from_str(
            r#"{"family": "Triggers", "value": [{"from": "A", "to": "B"}]}"#,
        )
        .unwrap();
        assert_eq!(grouped.family(), "Triggers");
    }

    #[test]
    fn test_deserialize_rejects_malformed_target() {
        let result =
            serde_json::from_str::<Annotation>(r#"{"family": "Trigger", "from": "A", "to": 3}"#);
        assert!(result.is_err());
    }
}
