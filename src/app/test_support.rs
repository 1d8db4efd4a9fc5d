use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::catalog::{NewStudent, RecordId, StoreError, StudentRecord};
use crate::imaging::{ImageError, ImageResolver, RenderedImage};

/// Resolver that never touches the disk and remembers every path it was asked for.
#[derive(Debug, Default)]
pub struct RecordingResolver {
    failing_path: Option<PathBuf>,
    thumbnails: RefCell<Vec<String>>,
    full_views: RefCell<Vec<String>>,
}

impl RecordingResolver {
    pub fn failing_on(path: &str) -> Self {
        Self {
            failing_path: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    pub fn thumbnail_calls(&self) -> Vec<String> {
        self.thumbnails.borrow().clone()
    }

    pub fn full_view_calls(&self) -> Vec<String> {
        self.full_views.borrow().clone()
    }

    fn image_for(&self, path: &Path, size: u32) -> Result<RenderedImage, ImageError> {
        if self.failing_path.as_deref() == Some(path) {
            return Err(ImageError::NotFound(path.to_path_buf()));
        }
        Ok(RenderedImage {
            width: size,
            height: size,
            pixels: vec![0; (size * size * 4) as usize],
        })
    }
}

impl ImageResolver for RecordingResolver {
    fn load_thumbnail(&self, path: &Path) -> Result<RenderedImage, ImageError> {
        self.thumbnails
            .borrow_mut()
            .push(path.to_string_lossy().to_string());
        self.image_for(path, 25)
    }

    fn load_full_view(&self, path: &Path) -> Result<RenderedImage, ImageError> {
        self.full_views
            .borrow_mut()
            .push(path.to_string_lossy().to_string());
        self.image_for(path, 300)
    }
}

/// Store whose every operation fails with a storage error.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl crate::catalog::RecordStore for BrokenStore {
    fn initialize(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn add_record(&self, _student: &NewStudent<'_>) -> Result<RecordId, StoreError> {
        Err(StoreError::StorageFailure("disk I/O error".to_string()))
    }

    fn list_records(&self) -> Result<Vec<StudentRecord>, StoreError> {
        Err(StoreError::StorageFailure("disk I/O error".to_string()))
    }

    fn close(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
