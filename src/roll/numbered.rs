//! `app.log` -> `app.log.1` -> `app.log.2` ... up to `max_index`, oldest dropped.

use super::FileRoller;
use crate::compress::{FileCompressor, compressed_path};
use crate::error::Result;
use crate::internal;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NumberedFileRoller {
    min_index: u32,
    max_index: u32,
    compressor: Option<Arc<dyn FileCompressor>>,
}

impl NumberedFileRoller {
    #[must_use]
    pub fn new(min_index: u32, max_index: u32, compressor: Option<Arc<dyn FileCompressor>>) -> Self {
        Self {
            min_index,
            max_index,
            compressor,
        }
    }

    #[must_use]
    pub const fn min_index(&self) -> u32 {
        self.min_index
    }

    #[must_use]
    pub const fn max_index(&self) -> u32 {
        self.max_index
    }

    #[must_use]
    pub fn compressor(&self) -> Option<&Arc<dyn FileCompressor>> {
        self.compressor.as_ref()
    }

    fn indexed(active: &Path, index: u32) -> PathBuf {
        PathBuf::from(format!("{}.{index}", active.display()))
    }

    /// A rolled file exists either plain or, once it passed the compressor's threshold, compressed.
    fn existing(&self, active: &Path, index: u32) -> Option<(PathBuf, bool)> {
        let plain = Self::indexed(active, index);
        if plain.exists() {
            return Some((plain, false));
        }
        let compressor = self.compressor.as_ref()?;
        let packed = compressed_path(&plain, compressor.extension());
        packed.exists().then_some((packed, true))
    }
}

impl FileRoller for NumberedFileRoller {
    fn roll(&self, active: &Path) -> Result<()> {
        if let Some((oldest, _)) = self.existing(active, self.max_index) {
            fs::remove_file(&oldest)?;
        }

        for index in (self.min_index..self.max_index).rev() {
            if let Some((from, packed)) = self.existing(active, index) {
                let mut to = Self::indexed(active, index + 1);
                if packed && let Some(compressor) = &self.compressor {
                    to = compressed_path(&to, compressor.extension());
                }
                fs::rename(&from, &to)?;
            }
        }

        if active.exists() {
            fs::rename(active, Self::indexed(active, self.min_index))?;
        }

        // The file that just reached the compressor's threshold is the only plain one past it
        if let Some(compressor) = &self.compressor {
            let target = self.min_index + compressor.min_index().max(1) - 1;
            let candidate = Self::indexed(active, target);
            if target <= self.max_index && candidate.exists() {
                let packed = compressor.compress(&candidate)?;
                internal::debug("ROLL", &format!("Compressed {}", packed.display()));
            }
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
