//! Parse errors for the instruction grammar.

use strata_core::FieldSpecError;
use thiserror::Error;

/// Errors produced while resolving an instruction to an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// No grammar rule matched. Carries the original text so the caller
    /// can correct or rephrase; nothing was executed.
    #[error("unrecognized instruction: {instruction}")]
    Unrecognized { instruction: String },

    /// A table-shaping rule matched but its field list was unusable.
    #[error("instruction needs a field list: {0}")]
    MissingFields(#[from] FieldSpecError),
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_carries_original_text() {
        let err = ParseError::Unrecognized {
            instruction: "make me a sandwich".to_string(),
        };
        assert!(format!("{}", err).contains("make me a sandwich"));
    }
}
