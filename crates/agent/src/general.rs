//! General assistant agent
//!
//! Wraps a [`LanguageModel`] with instructions describing the registered
//! tools. The model requests a tool by answering with a single JSON object:
//!
//! ```text
//! {"tool": "calculator", "arguments": {"expression": "2 + 3 * 4"}}
//! ```
//!
//! The registry's [`InvocationResult`](voice_dispatch_core::InvocationResult)
//! is fed back as a tool message and the model is asked again, up to
//! `max_tool_rounds` times. Any other reply is final. Once the rounds are used
//! up the model gets one more turn to answer in text; a tool request at that
//! point is replaced by a fixed apology.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use voice_dispatch_config::AgentConfig;
use voice_dispatch_core::{
    Agent, AgentReply, InvocationRequest, LanguageModel, Message, Result, ToolDescriptor,
};
use voice_dispatch_tools::ToolExecutor;

pub const GENERAL_AGENT_NAME: &str = "generalAgent";

const GUIDELINES: &str = "\
You are a general-purpose assistant that helps with everyday tasks.

Guidelines:
- Understand the request and pick the tool that fits it.
- To call a tool, reply with only a JSON object of the form \
{\"tool\": \"<tool id>\", \"arguments\": {...}} and nothing else.
- After a tool result arrives, explain it plainly in the user's language.
- If a tool fails, say why and suggest an alternative.
- If the request is vague, describe what you can do.";

const ANSWER_WITHOUT_TOOLS: &str =
    "The tool budget for this request is used up. Answer the user now in plain text using the results above; do not request another tool.";

const TOOL_LIMIT_REPLY: &str =
    "Sorry, I could not finish that request. Please try asking in a simpler way.";

/// Parse a tool request, either the whole reply or a fenced code block
pub fn parse_tool_call(text: &str) -> Option<InvocationRequest> {
    let trimmed = text.trim();
    if let Some(call) = parse_object(trimmed) {
        return Some(call);
    }

    let (_, after_fence) = trimmed.split_once("```")?;
    let body = after_fence
        .strip_prefix("json")
        .unwrap_or(after_fence);
    let (block, _) = body.split_once("```")?;
    parse_object(block.trim())
}

fn parse_object(candidate: &str) -> Option<InvocationRequest> {
    if !candidate.starts_with('{') {
        return None;
    }
    serde_json::from_str::<InvocationRequest>(candidate)
        .ok()
        .filter(|call| !call.tool_id.trim().is_empty())
}

pub struct GeneralAgent {
    llm: Arc<dyn LanguageModel>,
    tools: Arc<dyn ToolExecutor>,
    system_prompt: String,
    max_tool_rounds: usize,
}

impl GeneralAgent {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        tools: Arc<dyn ToolExecutor>,
        config: &AgentConfig,
    ) -> Self {
        let system_prompt = match &config.system_prompt {
            Some(prompt) => prompt.clone(),
            None => build_system_prompt(&tools.list_tools()),
        };

        Self {
            llm,
            tools,
            system_prompt,
            max_tool_rounds: config.max_tool_rounds,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

fn build_system_prompt(tools: &[ToolDescriptor]) -> String {
    let mut prompt = String::from(GUIDELINES);
    if tools.is_empty() {
        return prompt;
    }

    prompt.push_str("\n\nAvailable tools:");
    for tool in tools {
        prompt.push_str(&format!(
            "\n- {}: {}\n  arguments schema: {}",
            tool.id,
            tool.description,
            tool.input_schema.to_json()
        ));
    }
    prompt
}

#[async_trait]
impl Agent for GeneralAgent {
    fn name(&self) -> &str {
        GENERAL_AGENT_NAME
    }

    fn description(&self) -> &str {
        "General assistant with calculator, date/time, text and search tools"
    }

    async fn generate(&self, messages: &[Message]) -> Result<AgentReply> {
        let mut conversation = Vec::with_capacity(messages.len() + 1 + 2 * self.max_tool_rounds);
        conversation.push(Message::system(self.system_prompt.as_str()));
        conversation.extend_from_slice(messages);

        let mut tool_calls = Vec::new();
        loop {
            let response = self.llm.generate(&conversation).await?;
            tracing::debug!(
                model = self.llm.model_name(),
                elapsed_ms = response.total_time_ms,
                round = tool_calls.len(),
                "Model replied"
            );

            let Some(call) = parse_tool_call(&response.text) else {
                return Ok(AgentReply {
                    text: response.text,
                    tool_calls,
                });
            };

            if tool_calls.len() >= self.max_tool_rounds {
                tracing::warn!(
                    tool = %call.tool_id,
                    max_tool_rounds = self.max_tool_rounds,
                    "Tool round limit reached, asking for a final answer"
                );
                conversation.push(Message::assistant(response.text));
                conversation.push(Message::system(ANSWER_WITHOUT_TOOLS));
                let last = self.llm.generate(&conversation).await?;
                let text = if parse_tool_call(&last.text).is_some() {
                    TOOL_LIMIT_REPLY.to_string()
                } else {
                    last.text
                };
                return Ok(AgentReply { text, tool_calls });
            }

            tracing::info!(tool = %call.tool_id, "Model requested tool");
            let result = self.tools.invoke(&call.tool_id, call.arguments).await;
            if !result.is_success() {
                tracing::debug!(
                    tool = %call.tool_id,
                    kind = ?result.failure_kind(),
                    "Tool call failed, reporting back to model"
                );
            }

            let feedback = json!({ "tool": call.tool_id, "result": result }).to_string();
            conversation.push(Message::assistant(response.text));
            conversation.push(Message::tool(feedback));
            tool_calls.push(call.tool_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use serde_json::Value;
    use std::sync::Mutex;
    use voice_dispatch_config::ToolsConfig;
    use voice_dispatch_core::{Error, GenerateResponse, Role};
    use voice_dispatch_tools::create_default_registry;

    /// Replies from a fixed script and records every prompt it saw
    struct ScriptedModel {
        replies: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, messages: &[Message]) -> Result<GenerateResponse> {
            self.prompts.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .map(GenerateResponse::text)
                .ok_or_else(|| Error::Llm("script exhausted".to_string()))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn agent(model: Arc<ScriptedModel>, max_tool_rounds: usize) -> GeneralAgent {
        let registry = create_default_registry(&ToolsConfig::default()).unwrap();
        GeneralAgent::new(
            model,
            Arc::new(registry),
            &AgentConfig {
                max_tool_rounds,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_parse_tool_call() {
        let call = parse_tool_call(r#"{"tool": "calculator", "arguments": {"expression": "1+1"}}"#)
            .unwrap();
        assert_eq!(call.tool_id, "calculator");
        assert_eq!(call.arguments["expression"], "1+1");

        let fenced = "Let me check.\n```json\n{\"tool\": \"web-search\", \"arguments\": {\"query\": \"rust\"}}\n```";
        assert_eq!(parse_tool_call(fenced).unwrap().tool_id, "web-search");

        let bare = parse_tool_call(r#"{"tool": "datetime-tool"}"#).unwrap();
        assert_eq!(bare.arguments, json!({}));
    }

    #[test]
    fn test_plain_text_is_not_a_tool_call() {
        assert!(parse_tool_call("The answer is 14.").is_none());
        assert!(parse_tool_call(r#"{"answer": 14}"#).is_none());
        assert!(parse_tool_call(r#"{"tool": "  "}"#).is_none());
        assert!(parse_tool_call("Use {braces} carefully").is_none());
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        let agent = agent(ScriptedModel::new(&[]), 3);
        let prompt = agent.system_prompt();
        for id in ["calculator", "datetime-tool", "text-processor", "web-search"] {
            assert!(prompt.contains(id), "missing {}", id);
        }
    }

    #[test]
    fn test_system_prompt_override() {
        let registry = create_default_registry(&ToolsConfig::default()).unwrap();
        let agent = GeneralAgent::new(
            ScriptedModel::new(&[]),
            Arc::new(registry),
            &AgentConfig {
                system_prompt: Some("Answer in one word.".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(agent.system_prompt(), "Answer in one word.");
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let model = ScriptedModel::new(&["Hello there."]);
        let reply = agent(model.clone(), 3)
            .generate(&[Message::user("hi")])
            .await
            .unwrap();

        assert_eq!(reply, AgentReply::text("Hello there."));
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts[0][0].role, Role::System);
        assert_eq!(prompts[0][1], Message::user("hi"));
    }

    #[tokio::test]
    async fn test_tool_result_fed_back() {
        let model = ScriptedModel::new(&[
            r#"{"tool": "calculator", "arguments": {"expression": "2 + 3 * 4"}}"#,
            "2 + 3 * 4 is 14.",
        ]);
        let reply = agent(model.clone(), 3)
            .generate(&[Message::user("what is 2 + 3 * 4")])
            .await
            .unwrap();

        assert_eq!(reply.text, "2 + 3 * 4 is 14.");
        assert_eq!(reply.tool_calls, vec!["calculator".to_string()]);

        let prompts = model.prompts.lock().unwrap();
        let feedback = prompts[1].last().unwrap();
        assert_eq!(feedback.role, Role::Tool);
        let payload: Value = serde_json::from_str(&feedback.content).unwrap();
        assert_eq!(payload["tool"], "calculator");
        assert_eq!(payload["result"]["status"], "success");
        assert_eq!(payload["result"]["output"]["result"], 14.0);
    }

    #[tokio::test]
    async fn test_failed_tool_reported_to_model() {
        let model = ScriptedModel::new(&[
            r#"{"tool": "teleporter", "arguments": {}}"#,
            "I can't do that.",
        ]);
        let reply = agent(model.clone(), 3)
            .generate(&[Message::user("beam me up")])
            .await
            .unwrap();

        assert_eq!(reply.text, "I can't do that.");
        let prompts = model.prompts.lock().unwrap();
        let payload: Value = serde_json::from_str(&prompts[1].last().unwrap().content).unwrap();
        assert_eq!(payload["result"]["status"], "failure");
        assert_eq!(payload["result"]["kind"], "unknown_tool");
    }

    #[tokio::test]
    async fn test_round_limit_asks_for_plain_answer() {
        let call = r#"{"tool": "calculator", "arguments": {"expression": "1"}}"#;
        let model = ScriptedModel::new(&[call, call, "It is 1."]);
        let reply = agent(model.clone(), 1)
            .generate(&[Message::user("loop forever")])
            .await
            .unwrap();

        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.text, "It is 1.");
        assert_eq!(model.calls(), 3);

        let prompts = model.prompts.lock().unwrap();
        let last = prompts[2].last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.content, ANSWER_WITHOUT_TOOLS);
    }

    #[tokio::test]
    async fn test_round_limit_never_returns_tool_json() {
        let call = r#"{"tool": "calculator", "arguments": {"expression": "1"}}"#;
        let model = ScriptedModel::new(&[call, call, call]);
        let reply = agent(model.clone(), 1)
            .generate(&[Message::user("loop forever")])
            .await
            .unwrap();

        assert_eq!(reply.text, TOOL_LIMIT_REPLY);
        assert!(parse_tool_call(&reply.text).is_none());
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let err = agent(ScriptedModel::new(&[]), 3)
            .generate(&[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }
}
