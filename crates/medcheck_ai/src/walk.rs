use medcheck_core::article::{ArticleSentence, ProcessedArticle};
use medcheck_core::transcript::{Transcript, Verdict, VerdictStatus};
use tracing::{debug, info};

use crate::chat::{ChatMessage, ChatModel, Conversation};
use crate::classify::Classifier;
use crate::config::AgentConfig;
use crate::reason::Reasoner;
use crate::retrieve::{format_passages, GuidelineIndex, Passage};

/// Recorded when two distinct searches found nothing for a claim.
pub const NO_MATCH_SENTINEL: &str = "No relevant information found in the guidelines.";
/// Recorded when the guideline search itself failed.
pub const SEARCH_ERROR_SENTINEL: &str = "Error searching the guidelines.";

/// Routing decision for one sentence. Closed union consumed by an explicit
/// `match`; there is no name-keyed dispatch anywhere in the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SkipToNext { reasoning: String },
    NeedsRetrieval { query: String, reasoning: String },
}

/// Outcome of guideline retrieval for one claim.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Passages(Vec<Passage>),
    /// Both the classifier query and the rephrased retry found nothing.
    NoMatch,
    SearchError(String),
}

/// Mutable state of one article walk: the read cursor and the append-only
/// transcript. Owned by `Walker::run`, never shared.
#[derive(Debug, Default)]
pub struct WalkState {
    pub cursor: usize,
    pub transcript: Transcript,
}

/// The verification orchestrator. Walks the article strictly sequentially:
/// sentence N+1 is never touched before sentence N's entry is recorded.
/// External failures degrade to documented fallbacks; the walk is total.
pub struct Walker<'a> {
    article: &'a ProcessedArticle,
    chat: &'a dyn ChatModel,
    index: &'a dyn GuidelineIndex,
    config: &'a AgentConfig,
}

impl<'a> Walker<'a> {
    pub fn new(
        article: &'a ProcessedArticle,
        chat: &'a dyn ChatModel,
        index: &'a dyn GuidelineIndex,
        config: &'a AgentConfig,
    ) -> Self {
        Self {
            article,
            chat,
            index,
            config,
        }
    }

    /// Run the walk to completion. Every sentence is visited exactly once
    /// in document order; the transcript always ends with the
    /// end-of-article marker.
    pub fn run(&self) -> Transcript {
        let mut state = WalkState::default();

        while let Some(sentence) = self.article.sentence(state.cursor) {
            debug!(cursor = state.cursor, sentence_id = %sentence.id, "scanning");

            match self.classifying(sentence) {
                Transition::SkipToNext { reasoning } => {
                    debug!(sentence_id = %sentence.id, "no checkable claim; skipping");
                    state.transcript.record_skip(&sentence.id, reasoning);
                }
                Transition::NeedsRetrieval { query, reasoning } => {
                    let retrieval = self.retrieving(sentence, &query);
                    let verdict = self.reasoning(sentence, state.cursor, &query, &reasoning, retrieval);
                    info!(sentence_id = %sentence.id, status = ?verdict.status, "verdict recorded");
                    state.transcript.record_verdict(&sentence.id, verdict);
                }
            }
            // Per-sentence scratch (query, conversation, passages) is
            // dropped here; only cursor and transcript survive the cycle.
            state.cursor += 1;
        }

        info!(sentences = self.article.len(), "end of article");
        state.transcript.finish();
        state.transcript
    }

    fn classifying(&self, sentence: &ArticleSentence) -> Transition {
        // Headings are known from metadata; no model call needed.
        if sentence.metadata.is_heading {
            return Transition::SkipToNext {
                reasoning: "heading".to_string(),
            };
        }

        let result = Classifier::new(self.chat, &self.config.model).classify(sentence);
        match (result.needs_verification, result.query) {
            (true, Some(query)) => Transition::NeedsRetrieval {
                query,
                reasoning: result.reasoning,
            },
            _ => Transition::SkipToNext {
                reasoning: result.reasoning,
            },
        }
    }

    fn retrieving(&self, sentence: &ArticleSentence, query: &str) -> Retrieval {
        match self.index.search(query, self.config.top_k) {
            Ok(passages) if !passages.is_empty() => Retrieval::Passages(passages),
            Ok(_) => self.retry_with_sentence(sentence, query),
            Err(e) => Retrieval::SearchError(e.to_string()),
        }
    }

    /// One retry with the raw sentence text. The classifier's query is
    /// rephrased to be self-contained, so the two phrasings are distinct;
    /// when they happen to coincide, a retry would be identical and is
    /// skipped.
    fn retry_with_sentence(&self, sentence: &ArticleSentence, query: &str) -> Retrieval {
        if sentence.text.trim() == query.trim() {
            return Retrieval::NoMatch;
        }
        debug!(sentence_id = %sentence.id, "no match; retrying with sentence text");
        match self.index.search(&sentence.text, self.config.top_k) {
            Ok(passages) if !passages.is_empty() => Retrieval::Passages(passages),
            Ok(_) => Retrieval::NoMatch,
            Err(e) => Retrieval::SearchError(e.to_string()),
        }
    }

    fn reasoning(
        &self,
        sentence: &ArticleSentence,
        cursor: usize,
        query: &str,
        rationale: &str,
        retrieval: Retrieval,
    ) -> Verdict {
        match retrieval {
            Retrieval::Passages(passages) => {
                let mut conversation = Conversation::new();
                conversation.push(ChatMessage::system(self.config.system_prompt.clone()));
                conversation.push(ChatMessage::user(format!(
                    "Sentence {}/{} (section: {}):\n{}",
                    cursor + 1,
                    self.article.len(),
                    sentence.context.section,
                    sentence.text,
                )));
                conversation.push(ChatMessage::assistant(format!(
                    "Analysis: {rationale}\n\nSearch query: {query}"
                )));
                conversation.push(ChatMessage::tool(format_passages(&passages)));

                Reasoner::new(self.chat, &self.config.reasoning_model).reason(query, &conversation)
            }
            // Two distinct searches found nothing: the corpus does not
            // cover the claim. No model call; support is never fabricated.
            Retrieval::NoMatch => Verdict {
                claim: query.to_string(),
                justification: format!(
                    "{NO_MATCH_SENTINEL} Two distinct searches returned no passages for this claim."
                ),
                excerpt: String::new(),
                status: VerdictStatus::NoDataFound,
            },
            Retrieval::SearchError(detail) => Verdict {
                claim: query.to_string(),
                justification: format!("{SEARCH_ERROR_SENTINEL} {detail}"),
                excerpt: String::new(),
                status: VerdictStatus::NoDataFound,
            },
        }
    }
}
