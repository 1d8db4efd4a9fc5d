use std::path::Path;

use log::warn;
use thiserror::Error;

use crate::catalog::{RecordId, StudentRecord};
use crate::imaging::{ImageError, ImageResolver, RenderedImage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub record_id: RecordId,
    pub name: String,
    pub student_id: String,
    pub semester: String,
    /// `None` when the thumbnail could not be produced; the row still renders.
    pub thumbnail: Option<RenderedImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullView {
    pub record_id: RecordId,
    pub picture_path: String,
    pub image: RenderedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    #[error("no table row at index {0}")]
    NoSuchRow(usize),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Rows currently on screen plus the row -> picture path table used by the
/// image cells. Nothing here outlives the next `render`.
#[derive(Debug, Default)]
pub struct TablePresenter {
    rows: Vec<TableRow>,
    picture_paths: Vec<String>,
    viewer: Option<FullView>,
    generation: u64,
    viewer_generation: u64,
}

impl TablePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, records: &[StudentRecord], resolver: &dyn ImageResolver) {
        self.rows.clear();
        self.picture_paths.clear();

        for record in records {
            let thumbnail = match resolver.load_thumbnail(Path::new(&record.picture_path)) {
                Ok(image) => Some(image),
                Err(error) => {
                    warn!("thumbnail unavailable for record {}: {error}", record.id);
                    None
                }
            };

            self.rows.push(TableRow {
                record_id: record.id,
                name: record.name.clone(),
                student_id: record.student_id.clone(),
                semester: record.semester.clone(),
                thumbnail,
            });
            self.picture_paths.push(record.picture_path.clone());
        }

        self.generation += 1;
    }

    /// Decodes the row's picture afresh and makes it the open full view.
    pub fn activate_image(
        &mut self,
        row: usize,
        resolver: &dyn ImageResolver,
    ) -> Result<&FullView, PresenterError> {
        let (Some(path), Some(table_row)) = (self.picture_paths.get(row), self.rows.get(row))
        else {
            return Err(PresenterError::NoSuchRow(row));
        };
        let record_id = table_row.record_id;
        let picture_path = path.clone();

        let image = resolver.load_full_view(Path::new(&picture_path))?;
        self.viewer_generation += 1;
        Ok(self.viewer.insert(FullView {
            record_id,
            picture_path,
            image,
        }))
    }

    pub fn close_viewer(&mut self) {
        if self.viewer.take().is_some() {
            self.viewer_generation += 1;
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn picture_path(&self, row: usize) -> Option<&str> {
        self.picture_paths.get(row).map(String::as_str)
    }

    pub fn viewer(&self) -> Option<&FullView> {
        self.viewer.as_ref()
    }

    /// Bumped on every `render`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped whenever the open full view changes.
    pub fn viewer_generation(&self) -> u64 {
        self.viewer_generation
    }
}
