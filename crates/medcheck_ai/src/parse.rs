use std::fmt;

/// Failure to extract the expected structure from free-text model output.
/// Callers own the recovery policy; this type only names what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model output parse error: {}", self.reason)
    }
}

impl std::error::Error for ParseError {}

/// Strip a surrounding Markdown code fence, with or without a language tag.
/// Models frequently wrap JSON output in one despite instructions.
pub fn strip_code_fences(raw: &str) -> &str {
    let t = raw.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return t;
    };
    // Drop the language tag on the opening fence line, if any.
    match body.split_once('\n') {
        Some((first, tail)) if !first.trim().is_empty() && !first.trim().starts_with('{') => {
            tail.trim()
        }
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences(" {\"a\":1} "), "{\"a\":1}");
    }
}
