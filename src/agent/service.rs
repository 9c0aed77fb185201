//! Agent invocation: one request in, one reply string out.

use std::sync::Arc;

use crate::config::Config;
use crate::tools::{SearchCapability, ToolRegistry};

use super::agent_loop::{AgentState, Orchestrator, ReactOrchestrator};
use super::conversation::{build_conversation, Query};
use super::error::{AgentFailure, NO_RESPONSE_MESSAGE};
use super::provider::{HostedModels, InvalidProviderError, ModelFactory, Provider};

/// Runs chat requests against the configured capabilities.
///
/// Cheap to clone; clones share the search capability.
#[derive(Clone)]
pub struct AgentService {
    models: Arc<dyn ModelFactory>,
    orchestrator: Arc<dyn Orchestrator>,
    search: Arc<SearchCapability>,
}

impl AgentService {
    pub fn new(
        models: Arc<dyn ModelFactory>,
        orchestrator: Arc<dyn Orchestrator>,
        search: Arc<SearchCapability>,
    ) -> Self {
        Self {
            models,
            orchestrator,
            search,
        }
    }

    /// Hosted providers, the ReAct loop and DuckDuckGo search.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HostedModels::new(config.clone())),
            Arc::new(ReactOrchestrator::new(config.max_iterations)),
            Arc::new(SearchCapability::duckduckgo(config.search_max_results)),
        )
    }

    pub fn search(&self) -> &SearchCapability {
        &self.search
    }

    /// Run one conversation turn and return the reply.
    ///
    /// Only an unsupported `provider` is returned as an error, and it is
    /// detected before any network call. Every other failure is folded into
    /// the returned string (see [`AgentFailure`]).
    pub async fn invoke(
        &self,
        model_name: &str,
        query: impl Into<Query>,
        allow_search: bool,
        system_prompt: &str,
        provider: &str,
    ) -> Result<String, InvalidProviderError> {
        let provider: Provider = provider.parse()?;
        let query = query.into();

        tracing::info!(
            provider = %provider,
            model = model_name,
            allow_search,
            "Invoking agent"
        );

        let reply = match self
            .run(provider, model_name, &query, allow_search, system_prompt)
            .await
        {
            Ok(state) => final_reply(state),
            Err(e) => {
                let failure = AgentFailure::classify(&e);
                tracing::warn!(provider = %provider, model = model_name, "Agent run failed: {:#}", e);
                failure.to_string()
            }
        };

        Ok(reply)
    }

    async fn run(
        &self,
        provider: Provider,
        model_name: &str,
        query: &Query,
        allow_search: bool,
        system_prompt: &str,
    ) -> anyhow::Result<Option<AgentState>> {
        let model = self.models.build(provider, model_name).await?;

        let mut tools = ToolRegistry::new();
        if allow_search {
            match self.search.get() {
                Some(search) => tools.register(search),
                None => tracing::debug!("Search requested but unavailable; running without tools"),
            }
        }

        let turn = build_conversation(system_prompt, query);
        let agent = self.orchestrator.create_agent(model, tools)?;
        agent.invoke(turn).await
    }
}

/// Content of the last message, or the no-response sentinel.
fn final_reply(state: Option<AgentState>) -> String {
    match state.and_then(|s| s.messages.into_iter().last()) {
        Some(message) => message.content.unwrap_or_default(),
        None => NO_RESPONSE_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::agent::{BoundModel, RunnableAgent};
    use crate::llm::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolSchema};

    /// Replies with the text of the last user message.
    struct Echo;

    #[async_trait]
    impl LlmClient for Echo {
        async fn chat_completion(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            _tools: Option<&[ToolSchema]>,
        ) -> Result<ChatResponse, LlmError> {
            Ok(ChatResponse {
                content: messages.last().and_then(|m| m.content.clone()),
                tool_calls: None,
            })
        }
    }

    struct Failing(String);

    #[async_trait]
    impl LlmClient for Failing {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: Option<&[ToolSchema]>,
        ) -> Result<ChatResponse, LlmError> {
            Err(LlmError::Decode {
                provider: "OpenAI".to_string(),
                detail: self.0.clone(),
            })
        }
    }

    struct StubModels {
        llm: Arc<dyn LlmClient>,
        built: AtomicUsize,
        providers: Mutex<Vec<Provider>>,
    }

    impl StubModels {
        fn new(llm: Arc<dyn LlmClient>) -> Arc<Self> {
            Arc::new(Self {
                llm,
                built: AtomicUsize::new(0),
                providers: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelFactory for StubModels {
        async fn build(&self, provider: Provider, model_name: &str) -> anyhow::Result<BoundModel> {
            self.built.fetch_add(1, Ordering::SeqCst);
            self.providers.lock().unwrap().push(provider);
            Ok(BoundModel::new(provider, model_name, self.llm.clone()))
        }
    }

    /// Records the tool count and returns a fixed state.
    struct Recording {
        tool_counts: Arc<Mutex<Vec<usize>>>,
        state: Option<AgentState>,
    }

    struct RecordedAgent(Option<AgentState>);

    #[async_trait]
    impl RunnableAgent for RecordedAgent {
        async fn invoke(&self, _messages: Vec<ChatMessage>) -> anyhow::Result<Option<AgentState>> {
            Ok(self.0.clone())
        }
    }

    impl Orchestrator for Recording {
        fn create_agent(
            &self,
            _model: BoundModel,
            tools: ToolRegistry,
        ) -> anyhow::Result<Box<dyn RunnableAgent>> {
            self.tool_counts.lock().unwrap().push(tools.len());
            Ok(Box::new(RecordedAgent(self.state.clone())))
        }
    }

    fn service_with(llm: Arc<dyn LlmClient>) -> (AgentService, Arc<StubModels>) {
        let models = StubModels::new(llm);
        let service = AgentService::new(
            models.clone(),
            Arc::new(ReactOrchestrator::new(3)),
            Arc::new(SearchCapability::unavailable()),
        );
        (service, models)
    }

    #[tokio::test]
    async fn echoes_joined_messages() {
        let (service, _) = service_with(Arc::new(Echo));
        let reply = service
            .invoke("gpt-4o-mini", vec!["a".to_string(), "b".to_string()], false, "", "openai")
            .await
            .unwrap();
        assert_eq!(reply, "a b");
    }

    #[tokio::test]
    async fn resolves_provider_case_insensitively() {
        let (service, models) = service_with(Arc::new(Echo));
        service.invoke("gpt-4o-mini", "x", false, "", "OpenAI").await.unwrap();
        service.invoke("mixtral-8x7b-32768", "x", false, "", "GROQ").await.unwrap();
        assert_eq!(
            *models.providers.lock().unwrap(),
            vec![Provider::OpenAi, Provider::Groq]
        );
    }

    #[tokio::test]
    async fn invalid_provider_fails_before_any_call() {
        let (service, models) = service_with(Arc::new(Echo));
        let err = service
            .invoke("gpt-4o-mini", "hello", false, "", "anthropic")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid provider! Please choose 'OpenAI' or 'Groq'.");
        assert_eq!(models.built.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_become_classified_strings() {
        let (service, _) = service_with(Arc::new(Failing("missing API key".to_string())));
        let reply = service.invoke("gpt-4o-mini", "hi", false, "", "openai").await.unwrap();
        assert_eq!(reply, "⚠️ API key error. Please check your environment variables.");

        let (service, _) = service_with(Arc::new(Failing("unexpected EOF".to_string())));
        let reply = service.invoke("gpt-4o-mini", "hi", false, "", "openai").await.unwrap();
        assert_eq!(
            reply,
            "⚠️ Agent Error: failed to decode OpenAI response: unexpected EOF"
        );
    }

    #[tokio::test]
    async fn search_failure_runs_without_tools() {
        let tool_counts = Arc::new(Mutex::new(Vec::new()));
        let service = AgentService::new(
            StubModels::new(Arc::new(Echo)),
            Arc::new(Recording {
                tool_counts: tool_counts.clone(),
                state: Some(AgentState {
                    messages: vec![ChatMessage::assistant("answered")],
                }),
            }),
            Arc::new(SearchCapability::new(|| Err(anyhow::anyhow!("no network")))),
        );

        let reply = service.invoke("gpt-4o-mini", "q", true, "", "openai").await.unwrap();
        assert_eq!(reply, "answered");
        assert_eq!(*tool_counts.lock().unwrap(), vec![0]);
        assert!(service.search().is_initialized());
    }

    #[tokio::test]
    async fn empty_run_returns_sentinel() {
        for state in [None, Some(AgentState::default())] {
            let service = AgentService::new(
                StubModels::new(Arc::new(Echo)),
                Arc::new(Recording {
                    tool_counts: Arc::new(Mutex::new(Vec::new())),
                    state,
                }),
                Arc::new(SearchCapability::unavailable()),
            );
            let reply = service.invoke("gpt-4o-mini", "q", false, "", "groq").await.unwrap();
            assert_eq!(reply, "⚠️ No response received from the agent");
        }
    }

    #[tokio::test]
    async fn search_not_touched_when_disallowed() {
        let (service, _) = service_with(Arc::new(Echo));
        service.invoke("gpt-4o-mini", "q", false, "", "openai").await.unwrap();
        assert!(!service.search().is_initialized());
    }
}
