//! Typed actions produced by the dispatcher.

use serde::{Deserialize, Serialize};
use strata_core::{FieldSpec, RecordData, RecordId};

/// One resolved database operation.
///
/// Consumed by the record store and evolution engine; the dispatcher only
/// constructs these, it never executes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Bulk convenience form: split `content` into survey questions and
    /// store each as one record.
    AddSurveyQuestions { content: String },

    CreateRecord {
        table_name: String,
        data: RecordData,
    },

    ListRecords { table_name: String },

    GetRecord {
        table_name: String,
        id: RecordId,
    },

    UpdateRecord {
        table_name: String,
        id: RecordId,
        data: RecordData,
    },

    /// Find the first record where `field` equals `value`, patch it, and
    /// return the refreshed record.
    FindUpdateGetRecord {
        table_name: String,
        field: String,
        value: String,
        data: RecordData,
    },

    DeleteRecord {
        table_name: String,
        id: RecordId,
    },

    CreateTable {
        table_name: String,
        fields: Vec<FieldSpec>,
    },

    AlterTable {
        table_name: String,
        fields: Vec<FieldSpec>,
    },

    DropTable { table_name: String },
}

impl Action {
    /// Stable name used in instruction outcomes and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddSurveyQuestions { .. } => "add_survey_questions",
            Action::CreateRecord { .. } => "create_record",
            Action::ListRecords { .. } => "list_records",
            Action::GetRecord { .. } => "get_record",
            Action::UpdateRecord { .. } => "update_record",
            Action::FindUpdateGetRecord { .. } => "find_update_and_get_record",
            Action::DeleteRecord { .. } => "delete_record",
            Action::CreateTable { .. } => "create_table",
            Action::AlterTable { .. } => "alter_table",
            Action::DropTable { .. } => "drop_table",
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde_tagging() {
        let action = Action::DropTable {
            table_name: "users".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "drop_table");
        assert_eq!(json["table_name"], "users");
    }
}
