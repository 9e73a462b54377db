//! Assembly configuration

use super::DEFAULT_ID_SEED;

/// Names and switches for one assembly run
///
/// `Default` reproduces the fixed values of the document format: ids from
/// `0x11111111`, a project called `projectName` holding `Model` and its
/// `Main` class diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    pub id_seed: u64,
    pub project_name: String,
    pub model_name: String,
    pub class_diagram_name: String,
    pub state_machine_name: String,
    pub collaboration_name: String,
    pub interaction_name: String,
    pub sequence_diagram_name: String,
    /// Collect dropped relationships as diagnostics instead of only logging them
    pub report_unresolved: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            id_seed: DEFAULT_ID_SEED,
            project_name: "projectName".to_string(),
            model_name: "Model".to_string(),
            class_diagram_name: "Main".to_string(),
            state_machine_name: "StateMachine".to_string(),
            collaboration_name: "Collaboration".to_string(),
            interaction_name: "Interaction".to_string(),
            sequence_diagram_name: "SequenceDiagram".to_string(),
            report_unresolved: false,
        }
    }
}

impl AssemblyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = seed;
        self
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    pub fn with_class_diagram_name(mut self, name: impl Into<String>) -> Self {
        self.class_diagram_name = name.into();
        self
    }

    pub fn with_state_machine_name(mut self, name: impl Into<String>) -> Self {
        self.state_machine_name = name.into();
        self
    }

    pub fn with_collaboration_name(mut self, name: impl Into<String>) -> Self {
        self.collaboration_name = name.into();
        self
    }

    pub fn with_interaction_name(mut self, name: impl Into<String>) -> Self {
        self.interaction_name = name.into();
        self
    }

    pub fn with_sequence_diagram_name(mut self, name: impl Into<String>) -> Self {
        self.sequence_diagram_name = name.into();
        self
    }

    pub fn with_report_unresolved(mut self, enabled: bool) -> Self {
        self.report_unresolved = enabled;
        self
    }
}
