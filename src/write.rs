//! Writes serialized pages and other generated files under an output
//! directory.

use crate::html::Document;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Writes files relative to [`Writer::output_directory`], creating parent
/// directories on demand.
pub struct Writer<'a> {
    /// The directory every relative path is resolved against. For a build
    /// this is the staging directory.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Serializes `document` and writes it to `relative`.
    pub fn write_page<P: AsRef<Path>>(&self, relative: P, document: &Document) -> Result<PathBuf> {
        self.write_file(relative, document.to_html())
    }

    /// Writes `contents` to `relative`, replacing any existing file.
    pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(&self, relative: P, contents: C) -> Result<PathBuf> {
        let path = self.output_directory.join(relative);
        let annotate = |err: io::Error| Error {
            path: path.clone(),
            err,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(annotate)?;
        }
        std::fs::write(&path, contents).map_err(annotate)?;
        Ok(path)
    }

    /// Opens `relative` for writing, for serializers that stream into a
    /// [`std::io::Write`].
    pub fn create<P: AsRef<Path>>(&self, relative: P) -> Result<std::fs::File> {
        let path = self.output_directory.join(relative);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|err| Error {
                path: dir.to_owned(),
                err,
            })?;
        }
        std::fs::File::create(&path).map_err(|err| Error { path, err })
    }
}

/// The result of a fallible write operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure writing an output file.
#[derive(Debug)]
pub struct Error {
    pub path: PathBuf,
    pub err: io::Error,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "writing {}: {}", self.path.display(), self.err)
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::el;

    #[test]
    fn test_write_page_creates_directories() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let writer = Writer {
            output_directory: root.path(),
        };
        let path = writer.write_page(
            "blog/post/index.html",
            &Document::new(el("html").child(el("body").text("hi"))),
        )?;
        assert_eq!(root.path().join("blog/post/index.html"), path);
        assert_eq!(
            "<!doctype html>\n<html>\n  <body>hi</body>\n</html>\n",
            std::fs::read_to_string(path)?
        );
        Ok(())
    }

    #[test]
    fn test_write_failure_names_path() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        std::fs::write(root.path().join("blocker"), "file, not dir")?;
        let writer = Writer {
            output_directory: root.path(),
        };
        let err = writer.write_file("blocker/index.html", "x").unwrap_err();
        assert!(err.path.starts_with(root.path().join("blocker")));
        Ok(())
    }
}
