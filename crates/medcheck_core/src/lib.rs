pub mod article;
pub mod error;
pub mod transcript;

#[cfg(test)]
mod tests {
    use super::error::{codes, AppError};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new(codes::ARTICLE_INVALID, "bad article").with_retryable(false);
        assert_eq!(err.code, codes::ARTICLE_INVALID);
        assert_eq!(err.message, "bad article");
        assert_eq!(err.retryable, false);
    }
}
