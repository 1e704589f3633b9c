//! Result type alias for Folio

use super::errors::FolioError;

/// Result type alias for Folio operations
///
/// # Examples
///
/// ```
/// use folio::domain::result::Result;
/// use folio::domain::errors::FolioError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FolioError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FolioError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(FolioError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
