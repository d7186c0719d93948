//! Size-based rotation of the active log file

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Zoned;

use crate::logger::compression::compress_file;
use crate::logger::config::RotationConfig;
use crate::logger::LoggerError;

/// Decides when to rotate and moves the active file out of the way.
///
/// Rotated files are named `<stem>.<YYYYmmdd_HHMMSS>[_N].<ext>[.gz]` so that
/// lexical order is chronological order.
pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// True when appending `incoming` bytes would push the file past `max_size`.
    pub fn should_rotate(&self, current_size: u64, incoming: usize) -> bool {
        current_size > 0 && current_size + incoming as u64 > self.config.max_size
    }

    /// Renames the active file, compresses it when configured and prunes old files.
    pub fn rotate(&self, active: &Path) -> Result<Option<PathBuf>, LoggerError> {
        if !active.exists() {
            return Ok(None);
        }

        let rotated = self.next_rotated_path(active)?;
        fs::rename(active, &rotated)?;

        let rotated = if self.config.compress {
            compress_file(&rotated)?
        } else {
            rotated
        };

        self.prune(active)?;
        Ok(Some(rotated))
    }

    fn next_rotated_path(&self, active: &Path) -> Result<PathBuf, LoggerError> {
        let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
        let (stem, ext) = split_name(active);
        let prefix = format!("{}.{}", stem, timestamp);

        // Same-second rotations get a zero-padded counter above any existing one.
        let next = self
            .rotated_files(active)?
            .iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                let rest = name.strip_prefix(&prefix)?.to_string();
                match rest.strip_prefix('_') {
                    Some(counter) => counter.split('.').next()?.parse::<u32>().ok(),
                    None => Some(0),
                }
            })
            .max()
            .map(|n| n + 1);

        let suffix = match next {
            Some(n) => format!("{}_{:03}", timestamp, n),
            None => timestamp,
        };
        let name = match ext {
            Some(ext) => format!("{}.{}.{}", stem, suffix, ext),
            None => format!("{}.{}", stem, suffix),
        };
        Ok(active.with_file_name(name))
    }

    /// Lists rotated siblings of `active`, oldest first.
    pub fn rotated_files(&self, active: &Path) -> Result<Vec<PathBuf>, LoggerError> {
        let parent = match active.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let (stem, _) = split_name(active);
        let prefix = format!("{}.", stem);

        let mut files: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
                    && path.file_name() != active.file_name()
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn prune(&self, active: &Path) -> Result<(), LoggerError> {
        let files = self.rotated_files(active)?;
        let excess = files.len().saturating_sub(self.config.max_files);
        for old in files.iter().take(excess) {
            fs::remove_file(old).map_err(|e| {
                LoggerError::rotation(format!("failed to remove {}: {}", old.display(), e))
            })?;
        }
        Ok(())
    }
}

fn split_name(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager(max_files: usize, compress: bool) -> RotationManager {
        RotationManager::new(RotationConfig {
            max_size: 100,
            max_files,
            compress,
        })
    }

    #[test]
    fn test_should_rotate_only_when_limit_exceeded() {
        let m = manager(3, false);
        assert!(!m.should_rotate(0, 500));
        assert!(!m.should_rotate(50, 50));
        assert!(m.should_rotate(90, 20));
    }

    #[test]
    fn test_rotate_moves_active_file() {
        let dir = tempdir().unwrap();
        let active = dir.path().join("app.log");
        fs::write(&active, "hello").unwrap();

        let rotated = manager(3, false).rotate(&active).unwrap().unwrap();

        assert!(!active.exists());
        assert_eq!(fs::read_to_string(&rotated).unwrap(), "hello");
        let name = rotated.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("app.") && name.ends_with(".log"));
    }

    #[test]
    fn test_rotate_with_compression() {
        let dir = tempdir().unwrap();
        let active = dir.path().join("app.log");
        fs::write(&active, "hello").unwrap();

        let rotated = manager(3, true).rotate(&active).unwrap().unwrap();
        assert!(rotated.to_string_lossy().ends_with(".log.gz"));
    }

    #[test]
    fn test_prune_keeps_newest_files() {
        let dir = tempdir().unwrap();
        let active = dir.path().join("app.log");
        let m = manager(2, false);

        for _ in 0..4 {
            fs::write(&active, "x").unwrap();
            m.rotate(&active).unwrap();
        }

        let remaining = m.rotated_files(&active).unwrap();
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_rotate_without_active_file_is_noop() {
        let dir = tempdir().unwrap();
        let active = dir.path().join("app.log");
        assert!(manager(2, false).rotate(&active).unwrap().is_none());
    }
}
