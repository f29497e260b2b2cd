//! Agent runner with tool calling loop.

use super::model::{ChatModel, ChatReply, ChatRequest, Message, OutputSchema};
use super::tools::ToolRegistry;
use crate::error::{Result, ScribeError};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// A conversation transcript plus the tools the model may call.
pub struct Agent {
    name: String,
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    transcript: Vec<Message>,
    max_iterations: Option<usize>,
}

impl Agent {
    /// Create a new agent seeded with a system prompt.
    pub fn new(name: &str, system_prompt: &str, model: Arc<dyn ChatModel>) -> Self {
        Self {
            name: name.to_string(),
            model,
            tools: ToolRegistry::new(),
            transcript: vec![Message::System(system_prompt.to_string())],
            max_iterations: None,
        }
    }

    /// Set the tools available to this agent.
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Cap the number of completion requests per user turn.
    pub fn with_max_iterations(mut self, max: Option<usize>) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Text of the most recent assistant reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript.iter().rev().find_map(|m| match m {
            Message::Assistant {
                content: Some(content),
                tool_calls,
            } if tool_calls.is_empty() => Some(content.as_str()),
            _ => None,
        })
    }

    /// Send user input and return the model's final text reply.
    pub async fn send(&mut self, input: &str) -> Result<String> {
        self.transcript.push(Message::User(input.to_string()));
        self.run_turn(None).await
    }

    /// Send user input and parse the reply against a JSON schema.
    pub async fn send_structured<T: DeserializeOwned>(
        &mut self,
        input: &str,
        output: &OutputSchema,
    ) -> Result<T> {
        self.transcript.push(Message::User(input.to_string()));
        let text = self.run_turn(Some(output)).await?;

        serde_json::from_str(&text).map_err(|e| {
            ScribeError::Agent(format!(
                "{} returned output that does not match {}: {}",
                self.name, output.name, e
            ))
        })
    }

    /// Exchange requests with the model until it answers with text.
    async fn run_turn(&mut self, output: Option<&OutputSchema>) -> Result<String> {
        let schemas = self.tools.schemas();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if let Some(max) = self.max_iterations {
                if iterations > max {
                    return Err(ScribeError::Agent(format!(
                        "{} exceeded maximum iterations ({})",
                        self.name, max
                    )));
                }
            }

            debug!("{} iteration {}", self.name, iterations);

            let reply = self
                .model
                .complete(ChatRequest {
                    messages: &self.transcript,
                    tools: &schemas,
                    output_schema: output,
                })
                .await?;

            match reply {
                ChatReply::Text(content) => {
                    self.transcript.push(Message::Assistant {
                        content: Some(content.clone()),
                        tool_calls: Vec::new(),
                    });
                    return Ok(content);
                }
                ChatReply::ToolCalls(calls) => {
                    self.transcript.push(Message::Assistant {
                        content: None,
                        tool_calls: calls.clone(),
                    });

                    for call in calls {
                        info!("{} calling tool: {}", self.name, call.name);
                        let result = self.tools.dispatch(&call.name, &call.arguments).await;
                        self.transcript.push(Message::Tool {
                            call_id: call.call_id,
                            output: result,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::model::FunctionCall;
    use crate::agent::tools::{parse_arguments, ParamType, Tool, ToolSpec};
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed script of replies and records what it was sent.
    pub(crate) struct ScriptedModel {
        replies: Mutex<VecDeque<ChatReply>>,
        pub(crate) requests: Mutex<Vec<RecordedRequest>>,
    }

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub(crate) messages: Vec<Message>,
        pub(crate) tool_count: usize,
        pub(crate) output_schema: Option<String>,
    }

    impl ScriptedModel {
        pub(crate) fn new(replies: Vec<ChatReply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, request: ChatRequest<'_>) -> Result<ChatReply> {
            self.requests.lock().unwrap().push(RecordedRequest {
                messages: request.messages.to_vec(),
                tool_count: request.tools.len(),
                output_schema: request.output_schema.map(|s| s.name.clone()),
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ScribeError::Agent("script exhausted".to_string()))
        }
    }

    pub(crate) fn tool_call(id: &str, name: &str, arguments: &str) -> FunctionCall {
        FunctionCall {
            call_id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    struct Double;

    #[derive(Deserialize)]
    struct DoubleArgs {
        value: i64,
    }

    #[async_trait]
    impl Tool for Double {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("double", "Double a number").param(
                "value",
                ParamType::Integer,
                "Number to double",
            )
        }

        async fn execute(&self, arguments: &str) -> Result<String> {
            let args: DoubleArgs = parse_arguments(arguments)?;
            Ok(format!("2 * {} = {}", args.value, 2 * args.value))
        }
    }

    #[tokio::test]
    async fn test_agent_runs_tool_then_returns_text() {
        let model = ScriptedModel::new(vec![
            ChatReply::ToolCalls(vec![tool_call("call1", "double", r#"{"value":123}"#)]),
            ChatReply::Text("done".to_string()),
        ]);

        let tools = ToolRegistry::new().with(Arc::new(Double)).unwrap();
        let mut agent = Agent::new("tester", "be helpful", model.clone()).with_tools(tools);

        let reply = agent.send("do stuff").await.unwrap();
        assert_eq!(reply, "done");

        let transcript = agent.transcript();
        assert_eq!(transcript.len(), 5);
        assert!(matches!(&transcript[0], Message::System(p) if p == "be helpful"));
        assert!(matches!(&transcript[1], Message::User(c) if c == "do stuff"));
        assert!(
            matches!(&transcript[2], Message::Assistant { content: None, tool_calls } if tool_calls.len() == 1)
        );
        assert_eq!(
            transcript[3],
            Message::Tool {
                call_id: "call1".to_string(),
                output: "2 * 123 = 246".to_string(),
            }
        );
        assert_eq!(agent.last_reply(), Some("done"));

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tool_count, 1);
        // The full transcript is sent on every request.
        assert_eq!(requests[1].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_tool_does_not_fail_turn() {
        let model = ScriptedModel::new(vec![
            ChatReply::ToolCalls(vec![tool_call("c", "nope", "{}")]),
            ChatReply::Text("recovered".to_string()),
        ]);

        let mut agent = Agent::new("tester", "sys", model);
        assert_eq!(agent.send("hi").await.unwrap(), "recovered");
        assert!(matches!(
            &agent.transcript()[3],
            Message::Tool { output, .. } if output == "Tool nope not found."
        ));
    }

    #[tokio::test]
    async fn test_max_iterations_guard() {
        let model = ScriptedModel::new(vec![
            ChatReply::ToolCalls(vec![tool_call("a", "nope", "{}")]),
            ChatReply::ToolCalls(vec![tool_call("b", "nope", "{}")]),
            ChatReply::Text("never reached".to_string()),
        ]);

        let mut agent = Agent::new("tester", "sys", model).with_max_iterations(Some(2));
        let err = agent.send("loop").await.unwrap_err();
        assert!(err.to_string().contains("exceeded maximum iterations (2)"));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        ok: bool,
    }

    #[tokio::test]
    async fn test_structured_reply_is_parsed() {
        let model = ScriptedModel::new(vec![ChatReply::Text(r#"{"ok": true}"#.to_string())]);
        let schema = OutputSchema::new("verdict", serde_json::json!({ "type": "object" }));

        let mut agent = Agent::new("judge", "sys", model.clone());
        let verdict: Verdict = agent.send_structured("judge this", &schema).await.unwrap();
        assert_eq!(verdict, Verdict { ok: true });
        assert_eq!(model.requests()[0].output_schema.as_deref(), Some("verdict"));
    }

    #[tokio::test]
    async fn test_structured_reply_mismatch_is_an_error() {
        let model = ScriptedModel::new(vec![ChatReply::Text("not json".to_string())]);
        let schema = OutputSchema::new("verdict", serde_json::json!({ "type": "object" }));

        let mut agent = Agent::new("judge", "sys", model);
        let result: Result<Verdict> = agent.send_structured("judge this", &schema).await;
        assert!(result.is_err());
    }
}
