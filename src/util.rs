//! Small filesystem helpers shared by the pipeline stages.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Opens `path`, annotating failures with the kind of file being opened.
pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Recursively removes `dir`. A directory that doesn't exist is not an error.
pub fn remove_dir_if_exists(dir: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Copies the tree rooted at `src` into `dst`, creating directories as
/// needed. Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for result in WalkDir::new(src).sort_by_file_name() {
        let entry = result.map_err(io::Error::from)?;
        // strip_prefix shouldn't fail since `src` is always an ancestor of
        // the entries WalkDir yields for it
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copies a single file, creating the destination's parent directory.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_remove_missing_dir_is_ok() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        remove_dir_if_exists(&root.path().join("missing"))
    }

    #[test]
    fn test_copy_dir_nested() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let src = root.path().join("assets");
        fs::create_dir_all(src.join("img"))?;
        fs::write(src.join("a.txt"), "a")?;
        fs::write(src.join("img").join("b.txt"), "b")?;

        let dst = root.path().join("out").join("assets");
        assert_eq!(2, copy_dir(&src, &dst)?);
        assert_eq!("a", fs::read_to_string(dst.join("a.txt"))?);
        assert_eq!("b", fs::read_to_string(dst.join("img").join("b.txt"))?);
        Ok(())
    }

    #[test]
    fn test_copy_dir_missing_source_fails() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        assert!(copy_dir(&root.path().join("nope"), &root.path().join("out")).is_err());
        Ok(())
    }
}
