use medcheck_core::transcript::{Verdict, VerdictStatus};
use tracing::warn;

use crate::chat::{ChatMessage, ChatModel, Conversation};
use crate::parse::ParseError;
use crate::prompts::reasoning_prompt;

/// Map the verdict token of the labeled output onto the closed status set.
/// Boolean spellings are accepted because models drift toward them.
fn parse_status(token: &str) -> Result<VerdictStatus, ParseError> {
    let t = token.trim().trim_matches(|c| c == '[' || c == ']' || c == '.');
    match t.to_ascii_lowercase().as_str() {
        "validated" | "true" => Ok(VerdictStatus::Validated),
        "not_validated" | "notvalidated" | "false" => Ok(VerdictStatus::NotValidated),
        "no_data_found" | "nodatafound" => Ok(VerdictStatus::NoDataFound),
        other => Err(ParseError::new(format!("unknown verdict token: {other:?}"))),
    }
}

/// Parse the reasoning step's labeled-line contract:
///
/// ```text
/// Claim: ...
/// Justification: ...
/// Guideline excerpt: ...
/// Verdict: validated | not_validated | no_data_found
/// ```
///
/// Unlabeled lines continue the field above them. A missing or
/// unrecognized verdict line is a `ParseError`.
pub fn parse_verdict(raw: &str) -> Result<Verdict, ParseError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        None,
        Claim,
        Justification,
        Excerpt,
    }

    let mut claim = String::new();
    let mut justification = String::new();
    let mut excerpt = String::new();
    let mut status: Option<VerdictStatus> = None;
    let mut current = Field::None;

    /// Case-insensitive label match; returns the value after the label.
    fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
        let head = line.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        Some(line.get(label.len()..).unwrap_or("").trim())
    }

    fn append(buf: &mut String, piece: &str) {
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(piece);
    }

    for line in raw.lines() {
        let trimmed = line.trim();

        if let Some(v) = strip_label(trimmed, "claim:") {
            append(&mut claim, v);
            current = Field::Claim;
        } else if let Some(v) = strip_label(trimmed, "justification:") {
            append(&mut justification, v);
            current = Field::Justification;
        } else if let Some(v) = strip_label(trimmed, "guideline excerpt:") {
            append(&mut excerpt, v);
            current = Field::Excerpt;
        } else if let Some(v) = strip_label(trimmed, "verdict:") {
            status = Some(parse_status(v)?);
            current = Field::None;
        } else if !trimmed.is_empty() {
            match current {
                Field::Claim => append(&mut claim, trimmed),
                Field::Justification => append(&mut justification, trimmed),
                Field::Excerpt => append(&mut excerpt, trimmed),
                Field::None => {}
            }
        }
    }

    let status = status.ok_or_else(|| ParseError::new("no verdict line in output"))?;
    Ok(Verdict {
        claim,
        justification,
        excerpt,
        status,
    })
}

/// Reasoning step over one sentence's conversation. Never errors to the
/// caller: any transport or parse failure becomes a `NoDataFound` verdict
/// with a diagnostic justification.
pub struct Reasoner<'a> {
    chat: &'a dyn ChatModel,
    model: &'a str,
}

impl<'a> Reasoner<'a> {
    pub fn new(chat: &'a dyn ChatModel, model: &'a str) -> Self {
        Self { chat, model }
    }

    pub fn reason(&self, claim: &str, conversation: &Conversation) -> Verdict {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(reasoning_prompt()));
        messages.extend_from_slice(conversation.messages());

        let raw = match self.chat.complete(self.model, &messages) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "reasoning call failed; recording no_data_found");
                return self.diagnostic(claim, format!("Reasoning step failed: {e}"));
            }
        };

        match parse_verdict(&raw) {
            Ok(mut verdict) => {
                if verdict.claim.is_empty() {
                    verdict.claim = claim.to_string();
                }
                verdict
            }
            Err(e) => {
                warn!(error = %e, "reasoning output unparseable; recording no_data_found");
                self.diagnostic(claim, format!("Reasoning output could not be parsed: {e}"))
            }
        }
    }

    fn diagnostic(&self, claim: &str, justification: String) -> Verdict {
        Verdict {
            claim: claim.to_string(),
            justification,
            excerpt: String::new(),
            status: VerdictStatus::NoDataFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_labeled_output() {
        let raw = "Claim: Insulin is standard therapy for diabetes.\n\
                   Justification: The guideline names intensified insulin therapy\n\
                   as the standard of care.\n\
                   Guideline excerpt: \"Die intensivierte Insulintherapie ist Standard.\"\n\
                   Verdict: validated\n";
        let v = parse_verdict(raw).expect("parse");
        assert_eq!(v.status, VerdictStatus::Validated);
        assert_eq!(v.claim, "Insulin is standard therapy for diabetes.");
        assert!(v.justification.contains("standard of care"));
        assert!(v.excerpt.contains("Insulintherapie"));
    }

    #[test]
    fn accepts_boolean_and_camel_case_status_tokens() {
        assert_eq!(parse_status("true").unwrap(), VerdictStatus::Validated);
        assert_eq!(parse_status("FALSE").unwrap(), VerdictStatus::NotValidated);
        assert_eq!(parse_status("noDataFound").unwrap(), VerdictStatus::NoDataFound);
        assert_eq!(parse_status("no_data_found").unwrap(), VerdictStatus::NoDataFound);
        assert!(parse_status("maybe").is_err());
    }

    #[test]
    fn empty_excerpt_is_allowed() {
        let raw = "Claim: c\nJustification: j\nGuideline excerpt:\nVerdict: no_data_found";
        let v = parse_verdict(raw).expect("parse");
        assert_eq!(v.excerpt, "");
        assert_eq!(v.status, VerdictStatus::NoDataFound);
    }

    #[test]
    fn missing_verdict_line_is_an_error() {
        let raw = "Claim: c\nJustification: j";
        assert!(parse_verdict(raw).is_err());
    }

    #[test]
    fn prose_output_is_an_error() {
        assert!(parse_verdict("The claim seems fine to me.").is_err());
    }
}
