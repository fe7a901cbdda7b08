use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Creates output directories. Passed in by callers so that creating directories is an explicit
/// capability rather than a side effect of writing.
pub trait DirCreator {
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;
}

/// Creates directories on the local file system.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsDirCreator;

impl DirCreator for FsDirCreator {
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Writes to `path` through a temporary file in the same directory, which is only moved into
/// place once `write` has succeeded. The parent directory is created through `dirs` first.
///
/// If `write` fails, nothing is left at `path` and the temporary file is removed.
pub fn write_atomically(
    path: &Path,
    dirs: &impl DirCreator,
    write: impl FnOnce(&mut BufWriter<&mut File>) -> std::io::Result<()>,
) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    dirs.create_dir_all(dir)
        .with_context(|| format!("Unable to create output directory {}", dir.display()))?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Unable to create a temporary file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }

    temp_file
        .persist(path)
        .with_context(|| format!("Unable to write {}", path.display()))?;

    Ok(())
}
