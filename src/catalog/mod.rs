pub mod db;
pub mod models;
pub mod queries;
pub mod schema;

pub use db::{RecordStore, SqliteRecordStore};
pub use models::{NewStudent, RecordId, StoreError, StudentRecord};
