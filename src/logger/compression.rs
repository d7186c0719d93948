//! Gzip compression of rotated log files

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::logger::LoggerError;

/// Compresses `file_path` into `<file_path>.gz` and removes the original.
pub fn compress_file(file_path: &Path) -> Result<PathBuf, LoggerError> {
    let mut compressed = file_path.as_os_str().to_owned();
    compressed.push(".gz");
    let compressed_path = PathBuf::from(compressed);

    let mut input = BufReader::new(File::open(file_path)?);
    let output = BufWriter::new(File::create(&compressed_path)?);
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(file_path)?;
    Ok(compressed_path)
}
