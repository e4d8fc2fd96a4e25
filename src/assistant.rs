//! Wiring of the supervisor, its two agents and their tools.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::agents::{AgentError, AgentUpdate, Supervisor, ToolAgent, Transcript};
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiClient};
use crate::places::{PlacesClient, PlacesLookup};
use crate::prompts::{
    LOCATOR_AGENT_NAME, LOCATOR_AGENT_PROMPT, RESEARCH_AGENT_NAME, RESEARCH_AGENT_PROMPT,
    SUPERVISOR_PROMPT,
};
use crate::tools::{FindPlaces, Tool, ToolRegistry, WebSearch};

const LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the supervisor: a research agent with web search and a locator
/// agent with `get_places`, all on the same model.
pub fn build_supervisor(
    model: &str,
    places: Arc<dyn PlacesLookup>,
    web_search: Arc<dyn Tool>,
    max_iterations: usize,
) -> Supervisor {
    let research = ToolAgent::new(
        RESEARCH_AGENT_NAME,
        model,
        RESEARCH_AGENT_PROMPT,
        ToolRegistry::empty().with(web_search),
    )
    .with_max_iterations(max_iterations);

    let locator = ToolAgent::new(
        LOCATOR_AGENT_NAME,
        model,
        LOCATOR_AGENT_PROMPT,
        ToolRegistry::empty().with(Arc::new(FindPlaces::new(places))),
    )
    .with_max_iterations(max_iterations);

    Supervisor::new(model, SUPERVISOR_PROMPT, vec![research, locator])
        .with_max_iterations(max_iterations)
}

/// A ready-to-use supervisor bound to an LLM client.
pub struct Assistant {
    llm: Arc<dyn LlmClient>,
    supervisor: Supervisor,
}

impl Assistant {
    pub fn new(llm: Arc<dyn LlmClient>, supervisor: Supervisor) -> Self {
        Self { llm, supervisor }
    }

    /// Build the real clients from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm = OpenAiClient::with_base_url(
            config.openai_api_key.clone(),
            config.llm_base_url.clone(),
            LLM_TIMEOUT,
        )?;
        let places = PlacesClient::new(config.places.clone())?;
        let web_search = WebSearch::new(config.web_search.clone())?;

        let supervisor = build_supervisor(
            &config.default_model,
            Arc::new(places),
            Arc::new(web_search),
            config.max_iterations,
        );
        tracing::info!(
            "assistant ready: model={}, agents={}",
            config.default_model,
            supervisor.agents().len()
        );
        Ok(Self::new(Arc::new(llm), supervisor))
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Ask the supervisor a question, streaming node updates to `updates`.
    pub async fn ask(
        &self,
        question: &str,
        updates: Option<&UnboundedSender<AgentUpdate>>,
    ) -> Result<Transcript, AgentError> {
        self.supervisor.run(self.llm.as_ref(), question, updates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    use crate::llm::scripted::ScriptedLlm;
    use crate::llm::{Role, ToolCall};
    use crate::places::{LookupRequest, LookupResult, PlaceRecord, PlacesError};
    use crate::prompts::DEFAULT_QUESTION;

    struct FakePlaces {
        calls: Mutex<Vec<(String, f64, f64)>>,
    }

    #[async_trait]
    impl PlacesLookup for FakePlaces {
        async fn find_places(
            &self,
            query: &str,
            latitude: f64,
            longitude: f64,
        ) -> Result<LookupResult, PlacesError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), latitude, longitude));
            let request = LookupRequest::new(query, latitude, longitude)?;
            Ok(LookupResult::new(
                request,
                vec![PlaceRecord {
                    name: "North Central Animal Shelter".to_string(),
                    address: "3201 Lacy St, Los Angeles, CA 90031".to_string(),
                }],
            ))
        }
    }

    struct FakeSearch;

    #[async_trait]
    impl Tool for FakeSearch {
        fn name(&self) -> &str {
            "web_search"
        }

        fn description(&self) -> &str {
            "Search the web"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            Ok("### 1. Dead animal removal\nCall 3-1-1. Dumping fines up to $1,000.".to_string())
        }
    }

    #[tokio::test]
    async fn test_research_then_locate_flow() {
        let places = Arc::new(FakePlaces {
            calls: Mutex::new(Vec::new()),
        });
        let supervisor = build_supervisor("gpt-4.1-mini", places.clone(), Arc::new(FakeSearch), 10);

        let llm = Arc::new(
            ScriptedLlm::new()
                .reply_calls(vec![ToolCall::function("s1", "transfer_to_research_agent", "")])
                .reply_calls(vec![ToolCall::function(
                    "r1",
                    "web_search",
                    r#"{"query":"Los Angeles dead animal on street"}"#,
                )])
                .reply_text("Call 3-1-1; do not dump the animal. Fines up to $1,000.")
                .reply_calls(vec![ToolCall::function("s2", "transfer_to_locater_agent", "{}")])
                .reply_calls(vec![ToolCall::function(
                    "l1",
                    "get_places",
                    r#"{"query":"animal shelter","latitude":34.0617,"longitude":-118.3004}"#,
                )])
                .reply_text("North Central Animal Shelter, 3201 Lacy St")
                .reply_text("Call 3-1-1. Nearby: North Central Animal Shelter. Fines up to $1,000."),
        );
        let assistant = Assistant::new(llm.clone(), supervisor);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let transcript = assistant.ask(DEFAULT_QUESTION, Some(&tx)).await.unwrap();
        drop(tx);

        assert_eq!(
            transcript.final_answer(),
            Some("Call 3-1-1. Nearby: North Central Animal Shelter. Fines up to $1,000.")
        );
        assert_eq!(llm.remaining(), 0);

        let calls = places.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("animal shelter".to_string(), 34.0617, -118.3004)]);

        let places_output = transcript
            .messages
            .iter()
            .find(|m| m.role == Role::Tool && m.tool_call_id.as_deref() == Some("l1"))
            .and_then(|m| m.text_content())
            .unwrap();
        let parsed: Value = serde_json::from_str(places_output).unwrap();
        assert_eq!(parsed["latitude_used"], 34.0617);
        assert_eq!(parsed["results"][0]["name"], "North Central Animal Shelter");

        let mut nodes = Vec::new();
        while let Some(update) = rx.recv().await {
            nodes.push(update.node);
        }
        assert_eq!(
            nodes,
            vec![
                "supervisor",
                "research_agent",
                "supervisor",
                "locater_agent",
                "supervisor"
            ]
        );

        let seen = llm.seen();
        assert_eq!(seen[1].tool_names, vec!["web_search"]);
        assert_eq!(seen[4].tool_names, vec!["get_places"]);
        assert!(seen.iter().all(|r| r.model == "gpt-4.1-mini"));
    }

    #[tokio::test]
    async fn test_from_config_builds_both_agents() {
        let config = Config::from_vars(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "GOOGLE_API_KEY" => Some("g-test".to_string()),
            "TAVILY_API_KEY" => Some("tvly-test".to_string()),
            _ => None,
        })
        .unwrap();
        let assistant = Assistant::from_config(&config).unwrap();
        let names: Vec<&str> = assistant
            .supervisor()
            .agents()
            .iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(names, vec!["research_agent", "locater_agent"]);
    }
}
