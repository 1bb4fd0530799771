use medcheck_core::article::ArticleSentence;

/// System framing for the per-sentence conversation. The article under
/// review is a few years old; claims are checked against the current
/// guideline corpus.
pub const MASTER_PROMPT: &str = "\
You are reviewing a medical article against the current clinical guidelines.
The article may be several years old; each checkable claim is verified
against passages retrieved from the indexed guideline corpus. Judge claims
strictly on the retrieved passages. Never fabricate guideline support: if
the passages do not cover a claim, say so.";

/// Prompt for deciding whether one sentence states a checkable medical
/// claim, and if so, producing a self-contained search query for it.
pub fn analysis_prompt(sentence: &ArticleSentence) -> String {
    let subsection = sentence.context.subsection.as_deref().unwrap_or("");
    format!(
        r#"You are reviewing a partially outdated medical article. Given one
sentence and its context, decide whether it states a checkable medical claim.

A checkable medical claim typically contains:
- concrete statements about treatments, diagnoses, or outcomes
- specific medical recommendations or guideline references
- references to specific conditions, drugs, or procedures

Not checkable:
- headings, general background information
- definitions or explanations
- personal experiences or anecdotes

When a claim is checkable, produce a search query for the guideline corpus.
The query must be self-contained: spell out any referent (drug, disease,
population) that the bare sentence leaves implicit from its context. Often
the sentence itself works; rephrase when context is needed.

Example: in a section on treating Alzheimer's in women, the sentence
"This group is more likely to lower its mortality through the therapy."
needs the rephrased query "Women are more likely to lower their mortality
through cholinesterase-inhibitor therapy."

<Context>
Section: {section}
Subsection: {subsection}
Paragraph: {paragraph}
</Context>

<SentenceToValidate> {text} </SentenceToValidate>

Return a single JSON object, nothing else:
{{"query": <string or null>, "reasoning": <string>, "needs_verification": <bool>}}

Write the query and reasoning in the language of the article.
"#,
        section = sentence.context.section,
        subsection = subsection,
        paragraph = sentence.context.paragraph,
        text = sentence.text,
    )
}

/// Prompt for judging whether the retrieved passages support the claim.
/// The labeled-line output contract is parsed by `reason::parse_verdict`.
pub fn reasoning_prompt() -> String {
    r#"Earlier in this conversation a sentence was drawn from the article and
relevant passages were retrieved from the guideline corpus. Judge whether
the claim is supported by those passages.

Rules (non-negotiable):
1) Judge ONLY on the retrieved passages. Do not use outside knowledge.
2) Quote supporting excerpts verbatim from the passages; leave the excerpt
   empty if nothing applies.
3) If the passages do not cover the claim, the verdict is no_data_found.
   Never fabricate support.

Return exactly this labeled format, in the language of the article:
Claim: <the claim under verification>
Justification: <why the passages do or do not support the claim>
Guideline excerpt: <verbatim excerpt(s), or empty>
Verdict: <validated | not_validated | no_data_found>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::article::{ArticleContext, ArticleSentence, SentenceMetadata};

    #[test]
    fn analysis_prompt_embeds_sentence_and_context() {
        let s = ArticleSentence {
            id: "s7".to_string(),
            text: "Insulin is standard therapy for diabetes.".to_string(),
            context: ArticleContext {
                section: "Treatment".to_string(),
                subsection: None,
                paragraph: "p3".to_string(),
            },
            metadata: SentenceMetadata {
                is_bullet_point: false,
                is_heading: false,
            },
        };
        let p = analysis_prompt(&s);
        assert!(p.contains("Insulin is standard therapy"));
        assert!(p.contains("Section: Treatment"));
        assert!(p.contains("needs_verification"));
    }
}
