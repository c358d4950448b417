use crate::error::Result;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a whole file through a sibling temporary file renamed over `path`.
///
/// Readers of `path` see either the old contents or the new ones.
pub fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(&mut temp);
        fill(&mut writer)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replaces_existing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "old")?;

        write_atomically(&path, |w| {
            w.write_all(b"new")?;
            Ok(())
        })?;

        assert_eq!(fs::read_to_string(&path)?, "new");
        Ok(())
    }

    #[test]
    fn test_failed_fill_leaves_file_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "old")?;

        let result = write_atomically(&path, |_| {
            Err(crate::error::ProcessingError::InvalidFormat("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path)?, "old");
        Ok(())
    }
}
