use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Result<Self, StoreError> {
        if value <= 0 {
            return Err(StoreError::StorageFailure(format!(
                "record id must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    #[cfg(test)]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: RecordId,
    pub name: String,
    pub student_id: String,
    pub semester: String,
    pub picture_path: String,
}

/// Field values for a record that has not been stored yet.
#[derive(Debug, Clone, Copy)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub student_id: &'a str,
    pub semester: &'a str,
    pub picture_path: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a student with id {0} already exists")]
    DuplicateKey(String),
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageFailure(value.to_string())
    }
}
