//! STRATA Store - Dual-Mode Record Store
//!
//! The CRUD engine behind the tool surface. A logical table lives in
//! exactly one of two representations at any time:
//!
//! - *Generic*: rows in the shared `records` table, the record body
//!   serialized as one JSON document column.
//! - *Native*: a dedicated SQLite table with one column per declared
//!   field plus the system columns `id`, `created_at`, `updated_at`.
//!
//! The physical existence of a native table is the single source of truth
//! for which code path an operation takes; the schema registry is pure
//! metadata and never decides the mode on its own.

pub mod config;
pub mod evolution;
pub mod registry;
mod row;
pub mod store;

pub use config::StoreConfig;
pub use evolution::{DropAck, SchemaAck};
pub use store::{RecordStore, DEFAULT_LIST_LIMIT, FIND_SCAN_LIMIT};
