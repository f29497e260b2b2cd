//! Chat model abstraction and the OpenAI-backed implementation.

use crate::error::{Result, ScribeError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall as OpenAIFunctionCall,
    FunctionObject, ResponseFormat, ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Opaque identifier echoed back with the tool output.
    pub call_id: String,
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

/// One turn of an agent transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(String),
    User(String),
    Assistant {
        content: Option<String>,
        tool_calls: Vec<FunctionCall>,
    },
    Tool {
        call_id: String,
        output: String,
    },
}

/// JSON schema the reply text must conform to.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: &str, schema: Value) -> Self {
        Self {
            name: name.to_string(),
            schema,
        }
    }
}

/// A single completion request.
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
    /// Rendered tool schemas (see [`crate::agent::ToolSpec::schema`]).
    pub tools: &'a [Value],
    pub output_schema: Option<&'a OutputSchema>,
}

/// The model either answers with text or asks for tools to be run.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Text(String),
    ToolCalls(Vec<FunctionCall>),
}

/// Hosted chat completion service.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ChatReply>;
}

/// OpenAI chat completions.
pub struct OpenAIChat {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChat {
    pub fn new(model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TryFrom<&Message> for ChatCompletionRequestMessage {
    type Error = ScribeError;

    fn try_from(message: &Message) -> Result<Self> {
        let message = match message {
            Message::System(content) => ChatCompletionRequestSystemMessageArgs::default()
                .content(content.clone())
                .build()
                .map_err(|e| ScribeError::Agent(e.to_string()))?
                .into(),
            Message::User(content) => ChatCompletionRequestUserMessageArgs::default()
                .content(content.clone())
                .build()
                .map_err(|e| ScribeError::Agent(e.to_string()))?
                .into(),
            Message::Assistant {
                content,
                tool_calls,
            } => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if let Some(content) = content {
                    args.content(content.clone());
                }
                if !tool_calls.is_empty() {
                    args.tool_calls(
                        tool_calls
                            .iter()
                            .map(|call| ChatCompletionMessageToolCall {
                                id: call.call_id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: OpenAIFunctionCall {
                                    name: call.name.clone(),
                                    arguments: call.arguments.clone(),
                                },
                            })
                            .collect::<Vec<_>>(),
                    );
                }
                args.build()
                    .map_err(|e| ScribeError::Agent(e.to_string()))?
                    .into()
            }
            Message::Tool { call_id, output } => ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(call_id.clone())
                .content(output.clone())
                .build()
                .map_err(|e| ScribeError::Agent(e.to_string()))?
                .into(),
        };
        Ok(message)
    }
}

/// Convert a rendered tool schema into the chat completions tool format.
fn chat_tool(schema: &Value) -> Result<ChatCompletionTool> {
    let name = schema["name"]
        .as_str()
        .ok_or_else(|| ScribeError::Agent("Tool schema is missing a name".to_string()))?;

    Ok(ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: name.to_string(),
            description: schema["description"].as_str().map(|s| s.to_string()),
            parameters: Some(schema["parameters"].clone()),
            strict: Some(true),
        },
    })
}

#[async_trait]
impl ChatModel for OpenAIChat {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ChatReply> {
        let messages = request
            .messages
            .iter()
            .map(ChatCompletionRequestMessage::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);

        if !request.tools.is_empty() {
            let tools = request
                .tools
                .iter()
                .map(chat_tool)
                .collect::<Result<Vec<_>>>()?;
            args.tools(tools);
        }

        if let Some(output) = request.output_schema {
            args.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: output.name.clone(),
                    schema: Some(output.schema.clone()),
                    strict: Some(true),
                },
            });
        }

        let completion = args
            .build()
            .map_err(|e| ScribeError::Agent(e.to_string()))?;

        debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            request.messages.len()
        );

        let response = self
            .client
            .chat()
            .create(completion)
            .await
            .map_err(|e| ScribeError::OpenAI(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScribeError::Agent("No response from model".to_string()))?;

        match choice.message.tool_calls {
            Some(calls) if !calls.is_empty() => Ok(ChatReply::ToolCalls(
                calls
                    .into_iter()
                    .map(|call| FunctionCall {
                        call_id: call.id,
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect(),
            )),
            _ => Ok(ChatReply::Text(choice.message.content.unwrap_or_default())),
        }
    }
}
