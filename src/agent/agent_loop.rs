//! Core agent loop implementation.

use async_trait::async_trait;

use crate::llm::{ChatMessage, Role, ToolCall};
use crate::tools::ToolRegistry;

use super::provider::BoundModel;

/// Messages produced by one agent run, input turn included.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    pub messages: Vec<ChatMessage>,
}

/// An agent ready to run a conversation turn.
#[async_trait]
pub trait RunnableAgent: Send + Sync {
    /// Run once. `None` means the run produced no state at all.
    async fn invoke(&self, messages: Vec<ChatMessage>) -> anyhow::Result<Option<AgentState>>;
}

/// Turns a model and a tool set into a runnable agent.
pub trait Orchestrator: Send + Sync {
    fn create_agent(
        &self,
        model: BoundModel,
        tools: ToolRegistry,
    ) -> anyhow::Result<Box<dyn RunnableAgent>>;
}

/// Builds [`ReactAgent`]s.
#[derive(Debug, Clone)]
pub struct ReactOrchestrator {
    max_iterations: usize,
}

impl ReactOrchestrator {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }
}

impl Orchestrator for ReactOrchestrator {
    fn create_agent(
        &self,
        model: BoundModel,
        tools: ToolRegistry,
    ) -> anyhow::Result<Box<dyn RunnableAgent>> {
        Ok(Box::new(ReactAgent {
            model,
            tools,
            max_iterations: self.max_iterations,
        }))
    }
}

/// Reason-and-act agent: call the model, run any requested tools, feed the
/// results back, and stop at the first plain answer.
pub struct ReactAgent {
    model: BoundModel,
    tools: ToolRegistry,
    max_iterations: usize,
}

#[async_trait]
impl RunnableAgent for ReactAgent {
    async fn invoke(&self, mut messages: Vec<ChatMessage>) -> anyhow::Result<Option<AgentState>> {
        let tool_schemas = self.tools.get_tool_schemas();
        let tools = (!tool_schemas.is_empty()).then_some(tool_schemas.as_slice());

        for iteration in 0..self.max_iterations {
            tracing::debug!(
                model = %self.model.model,
                provider = %self.model.provider,
                "Agent iteration {}",
                iteration + 1
            );

            let response = self.model.complete(&messages, tools).await?;

            if let Some(tool_calls) = response.tool_calls.filter(|calls| !calls.is_empty()) {
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content,
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    tracing::info!(
                        tool = %tool_call.function.name,
                        args = %truncate_for_log(&tool_call.function.arguments, 200),
                        "Calling tool"
                    );

                    let result_str = match self.execute_tool_call(tool_call).await {
                        Ok(output) => output,
                        Err(e) => {
                            tracing::warn!(tool = %tool_call.function.name, "Tool failed: {}", e);
                            format!("Error: {}", e)
                        }
                    };

                    tracing::debug!(
                        "Tool result: {}",
                        truncate_for_log(&result_str, 1000)
                    );

                    messages.push(ChatMessage::tool_result(tool_call.id.clone(), result_str));
                }

                continue;
            }

            messages.push(ChatMessage {
                role: Role::Assistant,
                content: response.content,
                tool_calls: None,
                tool_call_id: None,
            });
            return Ok(Some(AgentState { messages }));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.max_iterations
        ))
    }
}

impl ReactAgent {
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}... [truncated]", &s[..idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use crate::agent::Provider;
    use crate::llm::{ChatResponse, FunctionCall, LlmClient, LlmError, ToolSchema};
    use crate::tools::Tool;

    /// Replays scripted responses and records what it was sent.
    struct Scripted {
        replies: Mutex<Vec<ChatResponse>>,
        seen: Mutex<Vec<(usize, usize)>>,
    }

    impl Scripted {
        fn new(mut replies: Vec<ChatResponse>) -> Arc<Self> {
            replies.reverse();
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for Scripted {
        async fn chat_completion(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            tools: Option<&[ToolSchema]>,
        ) -> Result<ChatResponse, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((messages.len(), tools.map_or(0, |t| t.len())));
            Ok(self.replies.lock().unwrap().pop().unwrap_or_default())
        }
    }

    struct Lookup;

    #[async_trait]
    impl Tool for Lookup {
        fn name(&self) -> &str {
            "duckduckgo_search"
        }

        fn description(&self) -> &str {
            "fake search"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            Ok(format!("results for {}", args["query"].as_str().unwrap_or("?")))
        }
    }

    fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn agent(llm: Arc<Scripted>, tools: ToolRegistry, max_iterations: usize) -> Box<dyn RunnableAgent> {
        let model = BoundModel::new(Provider::OpenAi, "gpt-4o-mini", llm);
        ReactOrchestrator::new(max_iterations)
            .create_agent(model, tools)
            .unwrap()
    }

    #[tokio::test]
    async fn plain_answer_ends_the_run() {
        let llm = Scripted::new(vec![ChatResponse {
            content: Some("hi there".to_string()),
            tool_calls: None,
        }]);
        let state = agent(llm.clone(), ToolRegistry::new(), 5)
            .invoke(vec![ChatMessage::user("hello")])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].content.as_deref(), Some("hi there"));
        assert_eq!(*llm.seen.lock().unwrap(), vec![(1, 0)]);
    }

    #[tokio::test]
    async fn tool_results_are_fed_back() {
        let llm = Scripted::new(vec![
            ChatResponse {
                content: None,
                tool_calls: Some(vec![tool_call("c1", "duckduckgo_search", r#"{"query":"rust 2024"}"#)]),
            },
            ChatResponse {
                content: Some("Rust 2024 shipped.".to_string()),
                tool_calls: None,
            },
        ]);
        let tools: ToolRegistry = [Arc::new(Lookup) as Arc<dyn Tool>].into_iter().collect();
        let state = agent(llm.clone(), tools, 5)
            .invoke(vec![ChatMessage::user("news?")])
            .await
            .unwrap()
            .unwrap();

        let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]);
        assert_eq!(state.messages[2].content.as_deref(), Some("results for rust 2024"));
        assert_eq!(state.messages[2].tool_call_id.as_deref(), Some("c1"));
        assert_eq!(*llm.seen.lock().unwrap(), vec![(1, 1), (3, 1)]);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_message() {
        let llm = Scripted::new(vec![
            ChatResponse {
                content: None,
                tool_calls: Some(vec![tool_call("c1", "shell", "{}")]),
            },
            ChatResponse {
                content: Some("done".to_string()),
                tool_calls: None,
            },
        ]);
        let state = agent(llm, ToolRegistry::new(), 5)
            .invoke(vec![ChatMessage::user("run ls")])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(state.messages[2].content.as_deref(), Some("Error: Unknown tool: shell"));
    }

    #[tokio::test]
    async fn stops_at_max_iterations() {
        let looping = (0..3)
            .map(|i| ChatResponse {
                content: None,
                tool_calls: Some(vec![tool_call(&format!("c{}", i), "duckduckgo_search", "{}")]),
            })
            .collect();
        let tools: ToolRegistry = [Arc::new(Lookup) as Arc<dyn Tool>].into_iter().collect();
        let err = agent(Scripted::new(looping), tools, 2)
            .invoke(vec![ChatMessage::user("loop")])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Max iterations (2) reached without completion");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("héllo wörld", 4), "héll... [truncated]");
    }
}
