use crate::prompts::MASTER_PROMPT;

/// Externally meaningful knobs of the verification core. Everything else
/// (endpoints, keys, article path) belongs to the caller wiring.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Chat model used for sentence classification.
    pub model: String,
    /// Chat model used for the verdict reasoning step.
    pub reasoning_model: String,
    /// Embedding model used for guideline queries.
    pub embed_model: String,
    /// System framing prepended to each sentence's conversation.
    pub system_prompt: String,
    /// Passages requested per guideline search.
    pub top_k: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            reasoning_model: "deepseek-chat".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            system_prompt: MASTER_PROMPT.to_string(),
            top_k: 3,
        }
    }
}
