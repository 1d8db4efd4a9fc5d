use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;

/// File extensions offered by the picture picker.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to decode {}: {reason}", path.display())]
    DecodeFailure { path: PathBuf, reason: String },
}

impl ImageError {
    fn decode(path: &Path, reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Decoded, scaled image in tightly packed RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RenderedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

pub trait ImageResolver {
    fn load_thumbnail(&self, path: &Path) -> Result<RenderedImage, ImageError>;

    fn load_full_view(&self, path: &Path) -> Result<RenderedImage, ImageError>;
}

/// Reads images straight from disk on every call. Nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct FsImageResolver {
    thumbnail_size: u32,
    full_view_size: u32,
}

impl FsImageResolver {
    pub fn new(thumbnail_size: u32, full_view_size: u32) -> Self {
        Self {
            thumbnail_size: thumbnail_size.max(1),
            full_view_size: full_view_size.max(1),
        }
    }

    fn render(&self, path: &Path, size: u32) -> Result<RenderedImage, ImageError> {
        let image = decode(path)?;
        let scaled = image.resize_exact(size, size, FilterType::Triangle).to_rgba8();
        Ok(RenderedImage {
            width: scaled.width(),
            height: scaled.height(),
            pixels: scaled.into_raw(),
        })
    }
}

impl Default for FsImageResolver {
    fn default() -> Self {
        Self::new(25, 300)
    }
}

impl ImageResolver for FsImageResolver {
    fn load_thumbnail(&self, path: &Path) -> Result<RenderedImage, ImageError> {
        self.render(path, self.thumbnail_size)
    }

    fn load_full_view(&self, path: &Path) -> Result<RenderedImage, ImageError> {
        self.render(path, self.full_view_size)
    }
}

pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn decode(path: &Path) -> Result<DynamicImage, ImageError> {
    let reader = ImageReader::open(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => ImageError::NotFound(path.to_path_buf()),
        _ => ImageError::decode(path, error.to_string()),
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|error| ImageError::decode(path, error.to_string()))?;

    match reader.format() {
        Some(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::Bmp) => {}
        Some(other) => {
            return Err(ImageError::decode(
                path,
                format!("unsupported image format {other:?}"),
            ))
        }
        None => return Err(ImageError::decode(path, "unrecognized image format")),
    }

    reader
        .decode()
        .map_err(|error| ImageError::decode(path, error.to_string()))
}
