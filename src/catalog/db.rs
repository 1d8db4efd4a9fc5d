use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{ffi, Connection, ErrorCode};

use crate::catalog::models::{NewStudent, RecordId, StoreError, StudentRecord};
use crate::catalog::queries;
use crate::catalog::schema::{PRAGMAS, SCHEMA};

/// Persistence boundary for student records. Records are only ever created
/// and listed.
pub trait RecordStore {
    fn initialize(&self) -> Result<(), StoreError>;

    fn add_record(&self, student: &NewStudent<'_>) -> Result<RecordId, StoreError>;

    fn list_records(&self) -> Result<Vec<StudentRecord>, StoreError>;

    fn close(self: Box<Self>) -> Result<(), StoreError>;
}

/// SQLite-backed store holding the one connection used for the whole process.
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteRecordStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(StoreError::StorageFailure(
                "database path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| {
                    StoreError::StorageFailure(format!(
                        "failed to create database directory: {error}"
                    ))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|error| {
            StoreError::StorageFailure(format!("failed to open sqlite connection: {error}"))
        })?;
        info!("opened student database at {}", path.display());

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }
}

impl RecordStore for SqliteRecordStore {
    fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(PRAGMAS).map_err(|error| {
            StoreError::StorageFailure(format!("failed to initialize pragmas: {error}"))
        })?;

        for statement in SCHEMA {
            self.conn.execute_batch(statement).map_err(|error| {
                StoreError::StorageFailure(format!("failed to create schema: {error}"))
            })?;
        }

        Ok(())
    }

    fn add_record(&self, student: &NewStudent<'_>) -> Result<RecordId, StoreError> {
        let row_id = queries::insert_student(&self.conn, student)
            .map_err(|error| map_insert_error(error, student.student_id))?;
        let id = RecordId::new(row_id)?;
        debug!("stored student {} as record {id}", student.student_id);
        Ok(id)
    }

    fn list_records(&self) -> Result<Vec<StudentRecord>, StoreError> {
        queries::list_students(&self.conn)
            .map_err(|error| StoreError::StorageFailure(format!("failed to list students: {error}")))?
            .into_iter()
            .map(|row| {
                Ok(StudentRecord {
                    id: RecordId::new(row.id)?,
                    name: row.name,
                    student_id: row.student_id,
                    semester: row.semester,
                    picture_path: row.picture_path,
                })
            })
            .collect()
    }

    fn close(self: Box<Self>) -> Result<(), StoreError> {
        let path = self.path.clone();
        self.conn.close().map_err(|(_conn, error)| {
            StoreError::StorageFailure(format!("failed to close sqlite connection: {error}"))
        })?;
        if let Some(path) = path {
            info!("closed student database at {}", path.display());
        }
        Ok(())
    }
}

/// Only a unique-constraint violation counts as a duplicate; NOT NULL and
/// other constraint failures are plain storage failures.
fn map_insert_error(error: rusqlite::Error, student_id: &str) -> StoreError {
    match &error {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateKey(student_id.to_string())
        }
        _ => StoreError::StorageFailure(format!("failed to insert student: {error}")),
    }
}
