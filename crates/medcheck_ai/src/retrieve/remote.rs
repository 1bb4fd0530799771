use medcheck_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use crate::embeddings::Embedder;
use super::{GuidelineIndex, Passage};

/// Guideline index backed by a hosted vector database. Embeds the query
/// with the configured model, then issues a namespace-scoped top-k query
/// against the index host.
pub struct RemoteGuidelineIndex {
    host: String,
    api_key: String,
    namespace: String,
    embed_model: String,
    embedder: Box<dyn Embedder>,
}

impl RemoteGuidelineIndex {
    pub fn new(
        host: &str,
        api_key: impl Into<String>,
        namespace: impl Into<String>,
        embed_model: impl Into<String>,
        embedder: Box<dyn Embedder>,
    ) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            namespace: namespace.into(),
            embed_model: embed_model.into(),
            embedder,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexQueryRequest<'a> {
    vector: &'a [f32],
    top_k: u32,
    include_metadata: bool,
    namespace: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexQueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexMatch {
    #[serde(default)]
    score: f32,
    metadata: Option<IndexMatchMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexMatchMetadata {
    text: Option<String>,
    heading: Option<String>,
}

impl GuidelineIndex for RemoteGuidelineIndex {
    fn search(&self, query: &str, top_k: u32) -> Result<Vec<Passage>, AppError> {
        let q = query.trim();
        if q.is_empty() {
            return Err(AppError::new(
                codes::GUIDELINE_SEARCH_FAILED,
                "Query must not be empty",
            ));
        }
        let top_k = top_k.clamp(1, 50);

        let vector = self.embedder.embed(&self.embed_model, q)?;

        let url = format!("{}/query", self.host);
        let req = IndexQueryRequest {
            vector: &vector,
            top_k,
            include_metadata: true,
            namespace: &self.namespace,
        };
        let resp = ureq::post(&url)
            .set("Api-Key", &self.api_key)
            .timeout(std::time::Duration::from_secs(10))
            .send_json(serde_json::to_value(req).map_err(|e| {
                AppError::new(codes::GUIDELINE_SEARCH_FAILED, "Failed to encode index query")
                    .with_details(e.to_string())
            })?);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: IndexQueryResponse = r.into_json().map_err(|e| {
                    AppError::new(codes::GUIDELINE_SEARCH_FAILED, "Failed to decode index response")
                        .with_details(e.to_string())
                })?;
                let mut passages: Vec<Passage> = Vec::new();
                for m in v.matches {
                    let Some(meta) = m.metadata else { continue };
                    let Some(text) = meta.text else { continue };
                    if text.trim().is_empty() {
                        continue;
                    }
                    passages.push(Passage {
                        text,
                        score: m.score,
                        heading: meta.heading,
                    });
                }
                Ok(passages)
            }
            Ok(r) => Err(
                AppError::new(codes::GUIDELINE_SEARCH_FAILED, "Index query failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(e) => Err(
                AppError::new(codes::GUIDELINE_SEARCH_FAILED, "Failed to call index endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}
