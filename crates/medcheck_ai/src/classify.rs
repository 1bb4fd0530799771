use medcheck_core::article::ArticleSentence;
use serde::Deserialize;
use tracing::warn;

use crate::chat::{ChatMessage, ChatModel};
use crate::parse::{strip_code_fences, ParseError};
use crate::prompts::analysis_prompt;

/// Per-sentence classification decision. Ephemeral; consumed immediately
/// by the walker to route the sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Self-contained guideline search query; `None` when no verification
    /// is needed.
    pub query: Option<String>,
    pub reasoning: String,
    pub needs_verification: bool,
}

impl ClassificationResult {
    /// The documented soft-fail value: the walker always advances.
    pub fn skip() -> Self {
        Self {
            query: None,
            reasoning: String::new(),
            needs_verification: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    query: Option<String>,
    reasoning: Option<String>,
    needs_verification: bool,
}

/// Parse the classifier's JSON contract out of raw model output. The
/// soft-fail value is NOT applied here; failure is explicit so the
/// recovery branch stays testable.
pub fn parse_classification(raw: &str) -> Result<ClassificationResult, ParseError> {
    let body = strip_code_fences(raw);
    let parsed: RawClassification = serde_json::from_str(body)
        .map_err(|e| ParseError::new(format!("invalid classification JSON: {e}")))?;

    let query = parsed.query.filter(|q| !q.trim().is_empty());
    if parsed.needs_verification && query.is_none() {
        return Err(ParseError::new(
            "needs_verification=true but no query was produced",
        ));
    }

    Ok(ClassificationResult {
        query: if parsed.needs_verification { query } else { None },
        reasoning: parsed.reasoning.unwrap_or_default(),
        needs_verification: parsed.needs_verification,
    })
}

/// Sentence classifier: one chat call per sentence, soft-failing to
/// "no verification needed" so the article walk never stalls.
pub struct Classifier<'a> {
    chat: &'a dyn ChatModel,
    model: &'a str,
}

impl<'a> Classifier<'a> {
    pub fn new(chat: &'a dyn ChatModel, model: &'a str) -> Self {
        Self { chat, model }
    }

    pub fn classify(&self, sentence: &ArticleSentence) -> ClassificationResult {
        let prompt = analysis_prompt(sentence);
        let messages = [ChatMessage::system(prompt)];

        let raw = match self.chat.complete(self.model, &messages) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(sentence_id = %sentence.id, error = %e, "classification call failed; skipping sentence");
                return ClassificationResult::skip();
            }
        };

        match parse_classification(&raw) {
            Ok(result) => result,
            Err(e) => {
                warn!(sentence_id = %sentence.id, error = %e, "classification output unparseable; skipping sentence");
                ClassificationResult::skip()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_claim_with_query() {
        let raw = r#"{"query": "Insulin is standard therapy for diabetes", "reasoning": "specific treatment claim", "needs_verification": true}"#;
        let r = parse_classification(raw).expect("parse");
        assert!(r.needs_verification);
        assert_eq!(
            r.query.as_deref(),
            Some("Insulin is standard therapy for diabetes")
        );
        assert_eq!(r.reasoning, "specific treatment claim");
    }

    #[test]
    fn parses_non_claim_with_null_query() {
        let raw = r#"{"query": null, "reasoning": "background prose", "needs_verification": false}"#;
        let r = parse_classification(raw).expect("parse");
        assert!(!r.needs_verification);
        assert_eq!(r.query, None);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"query\": \"q\", \"reasoning\": \"r\", \"needs_verification\": true}\n```";
        let r = parse_classification(raw).expect("parse");
        assert_eq!(r.query.as_deref(), Some("q"));
    }

    #[test]
    fn rejects_claim_without_query() {
        let raw = r#"{"query": null, "reasoning": "r", "needs_verification": true}"#;
        assert!(parse_classification(raw).is_err());

        let raw = r#"{"query": "   ", "reasoning": "r", "needs_verification": true}"#;
        assert!(parse_classification(raw).is_err());
    }

    #[test]
    fn rejects_prose_output() {
        assert!(parse_classification("I think this needs verification.").is_err());
    }

    #[test]
    fn query_is_dropped_when_no_verification_needed() {
        // Models sometimes fill the query anyway; a skip must carry none.
        let raw = r#"{"query": "stray", "reasoning": "heading", "needs_verification": false}"#;
        let r = parse_classification(raw).expect("parse");
        assert_eq!(r.query, None);
    }
}
