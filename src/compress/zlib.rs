use super::{FileCompressor, compress_with};
use crate::error::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ZlibFileCompressor {
    min_index: u32,
}

impl ZlibFileCompressor {
    #[must_use]
    pub const fn new(min_index: u32) -> Self {
        Self { min_index }
    }
}

impl FileCompressor for ZlibFileCompressor {
    fn min_index(&self) -> u32 {
        self.min_index
    }

    fn extension(&self) -> &'static str {
        "zz"
    }

    fn compress(&self, path: &Path) -> Result<PathBuf> {
        compress_with(path, self.extension(), |writer| {
            ZlibEncoder::new(writer, Compression::best())
        })
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
