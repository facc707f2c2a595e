use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

const TEMP_PREFIX: &str = ".microcms-export-";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output path {path:?} exists but is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("cannot inspect output path {path:?}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output directory {path:?} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Make sure `dir` is a writable directory, creating it and its parents if absent.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Err(source) => {
            return Err(PersistError::Inspect {
                path: dir.to_path_buf(),
                source,
            });
        }
    }

    // Dropped immediately; only its creation matters.
    temp_in(dir).map_err(|source| PersistError::NotWritable {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn temp_in(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().prefix(TEMP_PREFIX).suffix(".tmp").tempfile_in(dir)
}

/// Writes documents into the output directory through a sibling temp file and
/// a rename, so `<id>.md` is either the old content or the new, never a mix.
///
/// The directory must already exist; see [`ensure_output_dir`].
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write `content` to `{dir}/{filename}`, replacing any existing file.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let wrap = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };

        let mut tmp = temp_in(&self.dir).map_err(wrap)?;
        tmp.write_all(content.as_bytes()).map_err(wrap)?;
        tmp.as_file_mut().sync_all().map_err(wrap)?;
        tmp.persist(&target).map_err(|err| wrap(err.error))?;
        Ok(target)
    }
}
