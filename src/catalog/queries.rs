use rusqlite::{params, Connection, Result};

use crate::catalog::models::NewStudent;

/// Raw `students` row as read from SQLite, before the id is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: i64,
    pub name: String,
    pub student_id: String,
    pub semester: String,
    pub picture_path: String,
}

pub fn insert_student(conn: &Connection, student: &NewStudent<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO students (name, student_id, semester, picture_path)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            student.name,
            student.student_id,
            student.semester,
            student.picture_path
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn list_students(conn: &Connection) -> Result<Vec<StudentRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, student_id, semester, picture_path
         FROM students
         ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(StudentRow {
            id: row.get(0)?,
            name: row.get(1)?,
            student_id: row.get(2)?,
            semester: row.get(3)?,
            picture_path: row.get(4)?,
        })
    })?;

    rows.collect()
}
