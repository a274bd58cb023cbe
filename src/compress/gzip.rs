use super::{FileCompressor, compress_with};
use crate::error::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct GzipFileCompressor {
    min_index: u32,
}

impl GzipFileCompressor {
    #[must_use]
    pub const fn new(min_index: u32) -> Self {
        Self { min_index }
    }
}

impl FileCompressor for GzipFileCompressor {
    fn min_index(&self) -> u32 {
        self.min_index
    }

    fn extension(&self) -> &'static str {
        "gz"
    }

    fn compress(&self, path: &Path) -> Result<PathBuf> {
        compress_with(path, self.extension(), |writer| {
            GzEncoder::new(writer, Compression::default())
        })
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
