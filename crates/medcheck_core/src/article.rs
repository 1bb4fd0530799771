use serde::{Deserialize, Serialize};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{codes, AppError};

/// Where a sentence sits within the article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleContext {
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    pub paragraph: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SentenceMetadata {
    pub is_bullet_point: bool,
    pub is_heading: bool,
}

/// One pre-segmented sentence. Produced by the external preprocessing step
/// and immutable afterwards; identity is `id`, ordering is array position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleSentence {
    pub id: String,
    pub text: String,
    pub context: ArticleContext,
    pub metadata: SentenceMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    pub title: String,
    pub language: String,
    /// RFC3339 timestamp written by preprocessing. Kept as the raw string;
    /// see [`ArticleMetadata::processing_date_parsed`].
    pub processing_date: String,
}

impl ArticleMetadata {
    pub fn processing_date_parsed(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.processing_date, &Rfc3339).ok()
    }
}

/// The entire processed article, read once at walk start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessedArticle {
    pub metadata: ArticleMetadata,
    pub sentences: Vec<ArticleSentence>,
}

impl ProcessedArticle {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentence(&self, index: usize) -> Option<&ArticleSentence> {
        self.sentences.get(index)
    }
}

/// Load a processed article from disk. This is the only fatal failure in
/// the system: a missing or corrupt article aborts before the walk starts,
/// there is no partial run.
pub fn load_article(path: &Path) -> Result<ProcessedArticle, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(codes::ARTICLE_NOT_FOUND, "Failed to read processed article")
            .with_details(format!("path={}; {e}", path.display()))
    })?;
    let article: ProcessedArticle = serde_json::from_str(&raw).map_err(|e| {
        AppError::new(codes::ARTICLE_INVALID, "Processed article is not valid JSON")
            .with_details(e.to_string())
    })?;
    Ok(article)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_json_round_trips_camel_case_metadata() {
        let raw = r#"{
            "id": "s1",
            "text": "Insulin is standard therapy for diabetes.",
            "context": {"section": "Treatment", "paragraph": "p1"},
            "metadata": {"isBulletPoint": false, "isHeading": false}
        }"#;
        let s: ArticleSentence = serde_json::from_str(raw).expect("parse");
        assert_eq!(s.id, "s1");
        assert_eq!(s.context.subsection, None);
        assert!(!s.metadata.is_heading);
    }

    #[test]
    fn processing_date_parses_rfc3339_only() {
        let meta = ArticleMetadata {
            title: "t".to_string(),
            language: "de".to_string(),
            processing_date: "2026-01-05T10:00:00Z".to_string(),
        };
        assert!(meta.processing_date_parsed().is_some());

        let bad = ArticleMetadata {
            processing_date: "last tuesday".to_string(),
            ..meta
        };
        assert!(bad.processing_date_parsed().is_none());
    }
}
