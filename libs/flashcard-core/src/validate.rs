//! Validation of user-supplied card text and deck names.

use crate::error::{CoreError, Result};

/// Trim `text` and make sure something meaningful is left.
///
/// Whitespace-only and symbol-only input is rejected: at least one
/// alphanumeric character must remain after trimming.
pub fn validate_text(field: &str, text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(format!("{field} is empty")));
    }
    if !trimmed.chars().any(char::is_alphanumeric) {
        return Err(CoreError::validation(format!(
            "{field} must contain a letter or digit"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_valid_text() {
        assert_eq!(validate_text("front", "  2+2 \n").unwrap(), "2+2");
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(matches!(
            validate_text("front", ""),
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            validate_text("front", " \t\n "),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_rejects_symbol_only() {
        let err = validate_text("back", "?!- ...").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid text: back must contain a letter or digit"
        );
    }

    #[test]
    fn test_accepts_accented_letters() {
        assert_eq!(validate_text("deck", "Ações").unwrap(), "Ações");
        assert_eq!(validate_text("deck", "é").unwrap(), "é");
    }
}
