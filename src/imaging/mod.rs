pub mod resolver;

pub use resolver::{
    is_supported_extension, FsImageResolver, ImageError, ImageResolver, RenderedImage,
    SUPPORTED_EXTENSIONS,
};
