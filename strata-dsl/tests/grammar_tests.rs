//! Integration tests for the instruction grammar.
//!
//! Tests verify:
//! - Each supported phrasing resolves to the expected action
//! - Priority order (specific rules win over general ones)
//! - Unrecognized instructions fail with the original text, never guess

use strata_core::{FieldSpec, FieldType, Value};
use strata_dsl::{parse_instruction, Action, ParseError};

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

// ============================================================================
// RECORD OPERATIONS
// ============================================================================

#[test]
fn create_record_with_inline_data() {
    let action = parse_instruction("add a record in users with name: John, age: 30").unwrap();
    match action {
        Action::CreateRecord { table_name, data } => {
            assert_eq!(table_name, "users");
            assert_eq!(data["name"], text("John"));
            assert_eq!(data["age"], text("30"));
        }
        other => panic!("expected CreateRecord, got {other:?}"),
    }
}

#[test]
fn insert_into_phrasing() {
    let action = parse_instruction("insert into orders item: book, qty: 2").unwrap();
    match action {
        Action::CreateRecord { table_name, data } => {
            assert_eq!(table_name, "orders");
            assert_eq!(data["qty"], text("2"));
        }
        other => panic!("expected CreateRecord, got {other:?}"),
    }
}

#[test]
fn create_record_without_data_is_empty() {
    let action = parse_instruction("add a record in users").unwrap();
    match action {
        Action::CreateRecord { table_name, data } => {
            assert_eq!(table_name, "users");
            assert!(data.is_empty());
        }
        other => panic!("expected CreateRecord, got {other:?}"),
    }
}

#[test]
fn list_records_phrasings() {
    for instruction in [
        "list from users",
        "list records from users",
        "show users",
        "get all users",
        "fetch all records from table users",
    ] {
        let action = parse_instruction(instruction).unwrap();
        assert_eq!(
            action,
            Action::ListRecords {
                table_name: "users".to_string()
            },
            "instruction: {instruction}"
        );
    }
}

#[test]
fn get_record_by_id() {
    let action = parse_instruction("get record 5 from users").unwrap();
    assert_eq!(
        action,
        Action::GetRecord {
            table_name: "users".to_string(),
            id: 5
        }
    );
}

#[test]
fn get_with_digits_wins_over_list() {
    // `show 7 from users` is a by-id read, not a listing of table `7`.
    let action = parse_instruction("show 7 from users").unwrap();
    assert!(matches!(action, Action::GetRecord { id: 7, .. }));
}

#[test]
fn update_record_by_id() {
    let action = parse_instruction("update record 3 in users set status: inactive").unwrap();
    match action {
        Action::UpdateRecord {
            table_name,
            id,
            data,
        } => {
            assert_eq!(table_name, "users");
            assert_eq!(id, 3);
            assert_eq!(data["status"], text("inactive"));
        }
        other => panic!("expected UpdateRecord, got {other:?}"),
    }
}

#[test]
fn delete_record_phrasings() {
    for instruction in ["delete record 9 from users", "remove 9 from users"] {
        let action = parse_instruction(instruction).unwrap();
        assert_eq!(
            action,
            Action::DeleteRecord {
                table_name: "users".to_string(),
                id: 9
            },
            "instruction: {instruction}"
        );
    }
}

// ============================================================================
// FIND-UPDATE-AND-GET PRIORITY
// ============================================================================

#[test]
fn update_where_resolves_to_find_update_get() {
    let action = parse_instruction(
        "update users where name is lakshmana set status: inactive and get",
    )
    .unwrap();
    match action {
        Action::FindUpdateGetRecord {
            table_name,
            field,
            value,
            data,
        } => {
            assert_eq!(table_name, "users");
            assert_eq!(field, "name");
            assert_eq!(value, "lakshmana");
            assert_eq!(data["status"], text("inactive"));
        }
        other => panic!("expected FindUpdateGetRecord, got {other:?}"),
    }
}

#[test]
fn update_where_without_and_get_still_matches() {
    let action =
        parse_instruction("update users where email = a@b.c set verified: yes").unwrap();
    assert!(matches!(action, Action::FindUpdateGetRecord { .. }));
}

#[test]
fn update_by_id_does_not_shadow_update_where() {
    // The find-update form has no numeric id and must never fall through
    // to the by-id rule, and the by-id form must never read as a find.
    let by_field = parse_instruction("update users where name: Sam set age: 31").unwrap();
    assert!(matches!(by_field, Action::FindUpdateGetRecord { .. }));
    let by_id = parse_instruction("update 4 in users set age: 31").unwrap();
    assert!(matches!(by_id, Action::UpdateRecord { id: 4, .. }));
}

// ============================================================================
// TABLE OPERATIONS
// ============================================================================

#[test]
fn create_table_with_bare_fields() {
    let action = parse_instruction("create a table users with fields name, email, age").unwrap();
    assert_eq!(
        action,
        Action::CreateTable {
            table_name: "users".to_string(),
            fields: vec![
                FieldSpec::text("name"),
                FieldSpec::text("email"),
                FieldSpec::text("age"),
            ],
        }
    );
}

#[test]
fn create_table_with_typed_fields() {
    let action = parse_instruction("create table users with name text, age integer").unwrap();
    match action {
        Action::CreateTable { fields, .. } => {
            assert_eq!(fields[1], FieldSpec::new("age", FieldType::Integer));
        }
        other => panic!("expected CreateTable, got {other:?}"),
    }
}

#[test]
fn create_table_beats_create_record() {
    // Without priority ordering this would read as inserting a record
    // into a table literally named `table`.
    let action = parse_instruction("create table invoices with amount, due").unwrap();
    assert!(matches!(action, Action::CreateTable { .. }));
}

#[test]
fn create_table_without_fields_is_a_typed_failure() {
    let err = parse_instruction("create a table users").unwrap_err();
    assert!(matches!(err, ParseError::MissingFields(_)));
}

#[test]
fn alter_table_replaces_field_list() {
    let action = parse_instruction("alter table users set fields name, email, phone").unwrap();
    assert_eq!(
        action,
        Action::AlterTable {
            table_name: "users".to_string(),
            fields: vec![
                FieldSpec::text("name"),
                FieldSpec::text("email"),
                FieldSpec::text("phone"),
            ],
        }
    );
}

#[test]
fn drop_table_phrasings() {
    for instruction in ["drop table users", "delete the table users", "remove table users"] {
        let action = parse_instruction(instruction).unwrap();
        assert_eq!(
            action,
            Action::DropTable {
                table_name: "users".to_string()
            },
            "instruction: {instruction}"
        );
    }
}

#[test]
fn drop_table_beats_delete_record() {
    let action = parse_instruction("delete table users").unwrap();
    assert!(matches!(action, Action::DropTable { .. }));
}

// ============================================================================
// SURVEY QUESTIONS
// ============================================================================

#[test]
fn add_survey_questions_with_colon() {
    let action =
        parse_instruction("add survey questions: 1. How old are you?\n2. What is your role?")
            .unwrap();
    match action {
        Action::AddSurveyQuestions { content } => {
            assert!(content.starts_with("1. How old are you?"));
        }
        other => panic!("expected AddSurveyQuestions, got {other:?}"),
    }
}

#[test]
fn add_questions_to_db_phrasing() {
    let action = parse_instruction("save questions to the database: What is your name?").unwrap();
    assert_eq!(
        action,
        Action::AddSurveyQuestions {
            content: "What is your name?".to_string()
        }
    );
}

#[test]
fn save_to_db_phrasing() {
    let action = parse_instruction("save to db: Do you like surveys?").unwrap();
    assert!(matches!(action, Action::AddSurveyQuestions { .. }));
}

#[test]
fn empty_survey_content_falls_through() {
    // `add questions` with nothing to store must not commit to the survey
    // rule; the general record-create rule claims it instead.
    let action = parse_instruction("add questions").unwrap();
    match action {
        Action::CreateRecord { table_name, data } => {
            assert_eq!(table_name, "questions");
            assert!(data.is_empty());
        }
        other => panic!("expected CreateRecord fall-through, got {other:?}"),
    }
}

// ============================================================================
// FAILURE MODE
// ============================================================================

#[test]
fn unrecognized_instruction_carries_original_text() {
    let err = parse_instruction("please make the data better").unwrap_err();
    assert_eq!(
        err,
        ParseError::Unrecognized {
            instruction: "please make the data better".to_string()
        }
    );
}

#[test]
fn matching_is_case_insensitive() {
    let action = parse_instruction("LIST FROM Users").unwrap();
    assert_eq!(
        action,
        Action::ListRecords {
            table_name: "Users".to_string()
        }
    );
}
