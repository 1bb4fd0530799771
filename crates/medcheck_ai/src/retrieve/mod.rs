use medcheck_core::error::AppError;
use serde::{Deserialize, Serialize};

pub mod remote;

pub use remote::RemoteGuidelineIndex;

/// One guideline passage scored by semantic similarity to a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    pub text: String,
    pub score: f32,
    pub heading: Option<String>,
}

/// Namespace-scoped semantic search over the indexed guideline corpus.
/// Embedding generation is the adapter's responsibility; callers supply
/// raw query text only. Results come back in descending score order.
pub trait GuidelineIndex {
    fn search(&self, query: &str, top_k: u32) -> Result<Vec<Passage>, AppError>;
}

/// Concatenate passages for the reasoning prompt, keeping index order and
/// prefixing the heading label where the corpus carries one.
pub fn format_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| match &p.heading {
            Some(h) => format!("[{h}] {}", p.text),
            None => p.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_passages_with_optional_heading_prefix() {
        let passages = vec![
            Passage {
                text: "ICS are first-line controller therapy.".to_string(),
                score: 0.91,
                heading: Some("Langzeittherapie".to_string()),
            },
            Passage {
                text: "Reassess after 3 months.".to_string(),
                score: 0.74,
                heading: None,
            },
        ];
        let out = format_passages(&passages);
        assert_eq!(
            out,
            "[Langzeittherapie] ICS are first-line controller therapy.\n\nReassess after 3 months."
        );
    }

    #[test]
    fn formats_empty_passage_list_to_empty_string() {
        assert_eq!(format_passages(&[]), "");
    }
}
