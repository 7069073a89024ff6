//! Capabilities the assistant may invoke.
//!
//! The set is closed: adding a capability means adding a variant here, its
//! schema, and its typed arguments.

use serde::Deserialize;
use serde_json::json;

use mermaidai_types::realtime::ToolDefinition;

/// A locally implemented function exposed to the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    UpdateMermaidDefinition,
}

impl Capability {
    pub const ALL: [Capability; 1] = [Capability::UpdateMermaidDefinition];

    /// Wire name used by the assistant protocol.
    pub fn name(self) -> &'static str {
        match self {
            Capability::UpdateMermaidDefinition => "updateMermaidDefinition",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            Capability::UpdateMermaidDefinition => {
                "Updates and re-renders the Mermaid diagram with a new definition"
            }
        }
    }

    fn parameters(self) -> serde_json::Value {
        match self {
            Capability::UpdateMermaidDefinition => json!({
                "type": "object",
                "properties": {
                    "definition": {
                        "type": "string",
                        "description": "The mermaid definition text to set"
                    }
                },
                "required": ["definition"]
            }),
        }
    }

    pub fn tool_definition(self) -> ToolDefinition {
        ToolDefinition {
            kind: "function".to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }

    /// Tool manifest advertised in the session configuration.
    pub fn manifest() -> Vec<ToolDefinition> {
        Self::ALL.into_iter().map(Self::tool_definition).collect()
    }

    /// Decode the JSON-encoded argument object for this capability.
    pub fn parse_call(self, arguments: &str) -> Result<ToolCall, serde_json::Error> {
        match self {
            Capability::UpdateMermaidDefinition => {
                serde_json::from_str(arguments).map(ToolCall::UpdateMermaidDefinition)
            }
        }
    }
}

/// A capability invocation with typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    UpdateMermaidDefinition(UpdateDefinitionArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateDefinitionArgs {
    pub definition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_wire_name() {
        assert_eq!(
            Capability::from_name("updateMermaidDefinition"),
            Some(Capability::UpdateMermaidDefinition)
        );
        assert_eq!(Capability::from_name("deleteEverything"), None);
    }

    #[test]
    fn test_manifest_describes_definition_parameter() {
        let manifest = Capability::manifest();
        assert_eq!(manifest.len(), 1);
        let tool = &manifest[0];
        assert_eq!(tool.kind, "function");
        assert_eq!(tool.parameters["required"], json!(["definition"]));
        assert_eq!(tool.parameters["properties"]["definition"]["type"], "string");
    }

    #[test]
    fn test_parse_call_requires_definition() {
        let call = Capability::UpdateMermaidDefinition
            .parse_call(r#"{"definition": "graph TD"}"#)
            .unwrap();
        assert_eq!(
            call,
            ToolCall::UpdateMermaidDefinition(UpdateDefinitionArgs {
                definition: "graph TD".to_string()
            })
        );

        assert!(Capability::UpdateMermaidDefinition.parse_call("{}").is_err());
        assert!(Capability::UpdateMermaidDefinition.parse_call("").is_err());
    }
}
