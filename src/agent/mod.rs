//! Agent system for LLM conversations with tool calling.
//!
//! An [`Agent`] owns an append-only transcript and a [`ToolRegistry`]. Each user turn
//! sends the whole transcript plus the tool schemas to a [`ChatModel`]; requested tool
//! calls are executed locally and fed back until the model answers with text.

mod model;
mod runner;
mod tools;

pub use model::{
    ChatModel, ChatReply, ChatRequest, FunctionCall, Message, OpenAIChat, OutputSchema,
};
pub use runner::Agent;
pub use tools::{parse_arguments, ParamType, Tool, ToolParameter, ToolRegistry, ToolSpec};

#[cfg(test)]
pub(crate) use runner::tests::{tool_call, ScriptedModel};
