pub mod chat;
pub mod classify;
pub mod config;
pub mod embeddings;
pub mod parse;
pub mod prompts;
pub mod reason;
pub mod retrieve;
pub mod walk;

#[cfg(test)]
mod tests {
    use super::chat::{ChatMessage, Conversation};
    use super::config::AgentConfig;

    #[test]
    fn conversation_is_append_only() {
        let mut c = Conversation::new();
        c.push(ChatMessage::system("framing"));
        c.push(ChatMessage::user("sentence"));
        assert_eq!(c.len(), 2);
        assert_eq!(c.messages()[0].content, "framing");
        assert_eq!(c.messages()[1].content, "sentence");
    }

    #[test]
    fn default_config_requests_three_passages() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.top_k, 3);
        assert!(!cfg.system_prompt.is_empty());
    }
}
