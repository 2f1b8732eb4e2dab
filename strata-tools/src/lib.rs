//! STRATA Tools - The Externally Callable Operation Set
//!
//! Wraps the record store and the instruction dispatcher with input
//! normalization and uniform result/error shaping. This is the contract
//! callers rely on; the operation names here never change. Transport is
//! someone else's problem — an agent layer or RPC server calls these
//! functions and serializes whatever they return.

pub mod error;
pub mod fields;
pub mod surface;
pub mod survey;

pub use error::{ToolError, ToolResult};
pub use fields::FieldsInput;
pub use surface::{
    DeleteOutcome, InstructionOutcome, InstructionResult, SurveyOutcome, TableSchema, ToolSurface,
    SURVEY_TABLE,
};
pub use survey::split_questions;
