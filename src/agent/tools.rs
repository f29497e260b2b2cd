//! Tool definitions, schema rendering and dispatch for the agent system.

use crate::error::{Result, ScribeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

/// A single named tool parameter.
#[derive(Debug, Clone)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
}

impl ToolParameter {
    pub fn new(name: &str, kind: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
        }
    }
}

/// Name, description and flat parameter list of a tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ToolParameter>,
}

impl ToolSpec {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter. Every parameter is required.
    pub fn param(mut self, name: &str, kind: ParamType, description: &str) -> Self {
        self.parameters.push(ToolParameter::new(name, kind, description));
        self
    }

    /// Render the request-ready function schema.
    ///
    /// All parameters are listed in `required` and extra properties are rejected,
    /// which keeps the schema valid for strict function calling.
    pub fn schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.kind, "description": p.description }),
                )
            })
            .collect();

        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();

        json!({
            "type": "function",
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "additionalProperties": false,
                "required": required,
            }
        })
    }
}

/// A locally executed operation the completion service may request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Describe the tool.
    fn spec(&self) -> ToolSpec;

    /// Execute the tool with JSON-encoded arguments and return its output.
    async fn execute(&self, arguments: &str) -> Result<String>;
}

/// Name-indexed set of tools.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let spec = tool.spec();
        if self.tools.contains_key(&spec.name) {
            return Err(ScribeError::Agent(format!(
                "Tool {} is already registered",
                spec.name
            )));
        }
        self.tools.insert(spec.name.clone(), tool);
        self.specs.push(spec);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Schemas of all registered tools, in registration order.
    pub fn schemas(&self) -> Vec<Value> {
        self.specs.iter().map(ToolSpec::schema).collect()
    }

    /// Execute a tool by name.
    ///
    /// Never fails: unknown names and execution errors come back as the tool output
    /// so the conversation can carry on.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> String {
        let Some(tool) = self.tools.get(name) else {
            warn!("Model requested unknown tool: {}", name);
            return format!("Tool {} not found.", name);
        };

        info!("Calling tool: {} with args: {}", name, arguments);

        match tool.execute(arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                format!("Error executing tool {}: {}", name, e)
            }
        }
    }
}

/// Parse JSON tool arguments into a typed struct.
pub fn parse_arguments<T: for<'de> Deserialize<'de>>(arguments: &str) -> Result<T> {
    // Parameterless tools may be called with an empty string.
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(arguments)
        .map_err(|e| ScribeError::Agent(format!("Invalid tool arguments: {}", e)))
}
