use serde::{Deserialize, Serialize};

/// Final judgment on one claim. Closed set; there is no "unknown".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Validated,
    NotValidated,
    NoDataFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    /// The checkable claim, as phrased for verification.
    pub claim: String,
    pub justification: String,
    /// Verbatim guideline excerpt supporting the judgment; empty if none.
    pub excerpt: String,
    pub status: VerdictStatus,
}

/// One record in the walk transcript, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// Sentence did not state a checkable claim; no verdict for it.
    Skip { sentence_id: String, reasoning: String },
    Verdict { sentence_id: String, verdict: Verdict },
    /// Terminal marker, present exactly once, always last.
    EndOfArticle,
}

/// Append-only record of one article walk. Entries are never mutated or
/// removed; `finish` seals the transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// No-op once the transcript is sealed: nothing follows the
    /// end-of-article marker.
    pub fn record_skip(&mut self, sentence_id: impl Into<String>, reasoning: impl Into<String>) {
        if self.is_finished() {
            return;
        }
        self.entries.push(TranscriptEntry::Skip {
            sentence_id: sentence_id.into(),
            reasoning: reasoning.into(),
        });
    }

    /// No-op once the transcript is sealed.
    pub fn record_verdict(&mut self, sentence_id: impl Into<String>, verdict: Verdict) {
        if self.is_finished() {
            return;
        }
        self.entries.push(TranscriptEntry::Verdict {
            sentence_id: sentence_id.into(),
            verdict,
        });
    }

    /// Seal the transcript with the end-of-article marker. Idempotent.
    pub fn finish(&mut self) {
        if !self.is_finished() {
            self.entries.push(TranscriptEntry::EndOfArticle);
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.entries.last(), Some(TranscriptEntry::EndOfArticle))
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn verdicts(&self) -> impl Iterator<Item = (&str, &Verdict)> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::Verdict { sentence_id, verdict } => {
                Some((sentence_id.as_str(), verdict))
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_is_idempotent_and_terminal() {
        let mut t = Transcript::new();
        t.record_skip("s1", "heading");
        t.finish();
        t.finish();
        assert_eq!(t.entries().len(), 2);
        assert!(t.is_finished());
        assert_eq!(t.entries().last(), Some(&TranscriptEntry::EndOfArticle));
    }

    #[test]
    fn sealed_transcript_ignores_late_records() {
        let mut t = Transcript::new();
        t.record_skip("s1", "heading");
        t.finish();

        t.record_skip("s2", "late skip");
        t.record_verdict(
            "s3",
            Verdict {
                claim: "late claim".to_string(),
                justification: String::new(),
                excerpt: String::new(),
                status: VerdictStatus::NoDataFound,
            },
        );

        assert_eq!(t.entries().len(), 2);
        assert_eq!(t.entries().last(), Some(&TranscriptEntry::EndOfArticle));
    }

    #[test]
    fn verdict_status_serializes_snake_case() {
        let v = serde_json::to_string(&VerdictStatus::NoDataFound).expect("json");
        assert_eq!(v, "\"no_data_found\"");
    }
}
