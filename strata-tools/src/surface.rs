//! The tool surface: one method per externally callable operation.

use crate::error::{ToolError, ToolResult};
use crate::fields::FieldsInput;
use crate::survey::split_questions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strata_core::{FieldSpec, Record, RecordData, RecordId, Value};
use strata_dsl::{parse_instruction, Action};
use strata_store::{DropAck, RecordStore, SchemaAck};
use tracing::info;

/// Logical table receiving bulk survey questions.
pub const SURVEY_TABLE: &str = "survey_questions";

// ============================================================================
// RESULT SHAPES
// ============================================================================

/// Outcome of `delete_record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
    pub table_name: String,
    pub record_id: RecordId,
}

/// Outcome of `get_table_schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub fields: Vec<FieldSpec>,
}

/// Outcome of `add_survey_questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyOutcome {
    pub created: usize,
    pub records: Vec<Record>,
}

/// The result of whichever operation an instruction resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InstructionResult {
    Record(Record),
    MaybeRecord(Option<Record>),
    Records(Vec<Record>),
    Deleted(DeleteOutcome),
    Schema(SchemaAck),
    Dropped(DropAck),
    Survey(SurveyOutcome),
}

/// Outcome of `execute_instruction`: the resolved action's name plus its
/// result, so callers can tell what actually ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionOutcome {
    pub action: &'static str,
    pub result: InstructionResult,
}

// ============================================================================
// TOOL SURFACE
// ============================================================================

/// The externally callable operation set over one store handle.
#[derive(Debug)]
pub struct ToolSurface {
    store: RecordStore,
}

impl ToolSurface {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Access the underlying store, e.g. for test assertions.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Close the surface and its backing store.
    pub fn close(self) -> ToolResult<()> {
        Ok(self.store.close()?)
    }

    // === Record operations ===

    /// Create a record; the table is implicitly created in generic mode
    /// on first insert when no schema was ever declared for it.
    pub fn create_record(&self, table_name: &str, data: RecordData) -> ToolResult<Record> {
        Ok(self.store.create(table_name, data)?)
    }

    pub fn get_record(&self, table_name: &str, id: RecordId) -> ToolResult<Option<Record>> {
        Ok(self.store.get(table_name, id)?)
    }

    pub fn list_records(
        &self,
        table_name: &str,
        limit: Option<usize>,
    ) -> ToolResult<Vec<Record>> {
        Ok(self.store.list(table_name, limit)?)
    }

    pub fn find_records_by_field(
        &self,
        table_name: &str,
        field: &str,
        value: Value,
    ) -> ToolResult<Vec<Record>> {
        Ok(self.store.find_by_field(table_name, field, &value)?)
    }

    pub fn update_record(
        &self,
        table_name: &str,
        id: RecordId,
        data: RecordData,
    ) -> ToolResult<Option<Record>> {
        Ok(self.store.update(table_name, id, data)?)
    }

    pub fn find_update_and_get_record(
        &self,
        table_name: &str,
        field: &str,
        value: Value,
        data: RecordData,
    ) -> ToolResult<Option<Record>> {
        Ok(self
            .store
            .find_update_and_get(table_name, field, &value, data)?)
    }

    pub fn delete_record(&self, table_name: &str, id: RecordId) -> ToolResult<DeleteOutcome> {
        let deleted = self.store.delete(table_name, id)?;
        Ok(DeleteOutcome {
            deleted,
            table_name: table_name.to_string(),
            record_id: id,
        })
    }

    pub fn list_tables(&self) -> ToolResult<BTreeSet<String>> {
        Ok(self.store.list_tables()?)
    }

    // === Table operations ===

    pub fn create_table(&self, table_name: &str, fields: FieldsInput) -> ToolResult<SchemaAck> {
        let fields = fields.normalize()?;
        Ok(self.store.create_schema(table_name.trim(), fields)?)
    }

    pub fn alter_table(&self, table_name: &str, fields: FieldsInput) -> ToolResult<SchemaAck> {
        let fields = fields.normalize()?;
        Ok(self.store.alter_schema(table_name.trim(), fields)?)
    }

    pub fn drop_table(&self, table_name: &str) -> ToolResult<DropAck> {
        Ok(self.store.drop_table(table_name.trim())?)
    }

    pub fn get_table_schema(&self, table_name: &str) -> ToolResult<Option<TableSchema>> {
        let table_name = table_name.trim();
        Ok(self.store.get_schema(table_name)?.map(|fields| TableSchema {
            table_name: table_name.to_string(),
            fields,
        }))
    }

    // === Bulk convenience ===

    /// Store each question in `questions_text` as one record in the
    /// `survey_questions` table.
    pub fn add_survey_questions(&self, questions_text: &str) -> ToolResult<SurveyOutcome> {
        let questions = split_questions(questions_text);
        if questions.is_empty() {
            return Err(ToolError::NoQuestions);
        }
        let mut records = Vec::with_capacity(questions.len());
        for question in questions {
            let data: RecordData =
                [("text".to_string(), Value::Text(question))].into_iter().collect();
            records.push(self.store.create(SURVEY_TABLE, data)?);
        }
        Ok(SurveyOutcome {
            created: records.len(),
            records,
        })
    }

    // === Instruction path ===

    /// Resolve a free-text instruction to exactly one operation and run
    /// it. Parse failures are typed and nothing executes on them.
    pub fn execute_instruction(&self, instruction: &str) -> ToolResult<InstructionOutcome> {
        let action = parse_instruction(instruction)?;
        let kind = action.kind();
        info!(action = kind, "instruction resolved");
        let result = match action {
            Action::AddSurveyQuestions { content } => {
                InstructionResult::Survey(self.add_survey_questions(&content)?)
            }
            Action::CreateRecord { table_name, data } => {
                InstructionResult::Record(self.create_record(&table_name, data)?)
            }
            Action::ListRecords { table_name } => {
                InstructionResult::Records(self.list_records(&table_name, None)?)
            }
            Action::GetRecord { table_name, id } => {
                InstructionResult::MaybeRecord(self.get_record(&table_name, id)?)
            }
            Action::UpdateRecord {
                table_name,
                id,
                data,
            } => InstructionResult::MaybeRecord(self.update_record(&table_name, id, data)?),
            Action::FindUpdateGetRecord {
                table_name,
                field,
                value,
                data,
            } => InstructionResult::MaybeRecord(self.find_update_and_get_record(
                &table_name,
                &field,
                Value::Text(value),
                data,
            )?),
            Action::DeleteRecord { table_name, id } => {
                InstructionResult::Deleted(self.delete_record(&table_name, id)?)
            }
            Action::CreateTable { table_name, fields } => InstructionResult::Schema(
                self.create_table(&table_name, FieldsInput::Specs(fields))?,
            ),
            Action::AlterTable { table_name, fields } => InstructionResult::Schema(
                self.alter_table(&table_name, FieldsInput::Specs(fields))?,
            ),
            Action::DropTable { table_name } => {
                InstructionResult::Dropped(self.drop_table(&table_name)?)
            }
        };
        Ok(InstructionOutcome {
            action: kind,
            result,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
