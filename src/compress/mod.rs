//! Rolled log files are compressed in place: the compressed copy is written next to
//! the original, then the original is removed.

mod gzip;
mod zlib;

pub use gzip::GzipFileCompressor;
pub use zlib::ZlibFileCompressor;

use crate::error::Result;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Shared between rollers (`Arc`), so implementations hold no per-writer state.
pub trait FileCompressor: Send + Sync + std::fmt::Debug {
    /// Rolled files count from 1; those at or beyond this index get compressed.
    fn min_index(&self) -> u32;

    /// Appended to the compressed file's name, without the dot.
    fn extension(&self) -> &'static str;

    /// Compresses `path` into `path.<extension>` and removes `path`.
    ///
    /// # Errors
    /// I/O errors reading the source or writing the compressed copy.
    fn compress(&self, path: &Path) -> Result<PathBuf>;

    fn type_name(&self) -> &'static str;
}

#[must_use]
pub fn compressed_path(path: &Path, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{extension}", path.display()))
}

/// Streams `path` through the encoder built by `wrap`, then swaps the original for the result.
pub(crate) fn compress_with<E, F>(path: &Path, extension: &str, wrap: F) -> Result<PathBuf>
where
    E: Write,
    F: FnOnce(BufWriter<File>) -> E,
    E: Finish,
{
    let mut reader = BufReader::new(File::open(path)?);
    let target = compressed_path(path, extension);
    let mut encoder = wrap(BufWriter::new(File::create(&target)?));
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish_stream()?.flush()?;

    // The compressed copy holds all content, so the original can go
    fs::remove_file(path)?;
    Ok(target)
}

/// `flate2` encoders all end with `finish`, but share no trait for it.
pub(crate) trait Finish {
    fn finish_stream(self) -> io::Result<BufWriter<File>>;
}

impl Finish for flate2::write::GzEncoder<BufWriter<File>> {
    fn finish_stream(self) -> io::Result<BufWriter<File>> {
        self.finish()
    }
}

impl Finish for flate2::write::ZlibEncoder<BufWriter<File>> {
    fn finish_stream(self) -> io::Result<BufWriter<File>> {
        self.finish()
    }
}
