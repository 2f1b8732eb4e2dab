//! Error shaping for the tool surface.

use strata_core::StrataError;
use strata_dsl::ParseError;
use thiserror::Error;

/// Errors surfaced to tool callers.
///
/// Not-found is never represented here: absent records come back as
/// `None`/empty results from the operations themselves.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToolError {
    #[error("{0}")]
    Core(#[from] StrataError),

    #[error("{0}")]
    Instruction(#[from] ParseError),

    #[error("no questions found in text")]
    NoQuestions,
}

impl ToolError {
    /// Stable taxonomy code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Core(StrataError::Identifier(_)) => "invalid_identifier",
            ToolError::Core(StrataError::FieldSpec(_)) => "invalid_field_spec",
            ToolError::Core(StrataError::Schema(_)) => "schema_conflict",
            ToolError::Core(StrataError::Storage(_)) => "storage_failure",
            ToolError::Instruction(ParseError::Unrecognized { .. }) => "unrecognized_instruction",
            ToolError::Instruction(ParseError::MissingFields(_)) => "invalid_field_spec",
            ToolError::NoQuestions => "invalid_input",
        }
    }
}

impl From<strata_core::FieldSpecError> for ToolError {
    fn from(e: strata_core::FieldSpecError) -> Self {
        ToolError::Core(e.into())
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

// ============================================================================
// TESTS
// ============================================================================
