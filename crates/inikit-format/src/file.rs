use std::io::{self, Write};
use std::path::{Path, PathBuf};

use inikit_model::{Document, NameMatch};
use thiserror::Error;

use crate::parser::parse_with;
use crate::writer::render;

/// Failures of the profile engine: I/O on the file itself, plus rejection
/// of input the format cannot round-trip. Parsing never fails — these arise
/// on the way in, not the way out.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write profile {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to resolve default profile path: {source}")]
    Resolve {
        #[source]
        source: io::Error,
    },
    #[error("section name {name:?} cannot be stored: {reason}")]
    InvalidSection { name: String, reason: &'static str },
    #[error("key {key:?} cannot be stored: {reason}")]
    InvalidKey { key: String, reason: &'static str },
    #[error("value {value:?} cannot be stored: {reason}")]
    InvalidValue { value: String, reason: &'static str },
}

/// The in-memory form of one on-disk profile file.
#[derive(Debug)]
pub struct ProfileFile {
    path: PathBuf,
    pub doc: Document,
}

impl ProfileFile {
    /// Load with the default name-comparison rule. A missing file is an
    /// empty document, not an error; an existing-but-unreadable file is.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        Self::load_with(path, NameMatch::default())
    }

    pub fn load_with(path: impl Into<PathBuf>, rule: NameMatch) -> Result<Self, ProfileError> {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(text) => parse_with(&text, rule),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Document::default(),
            Err(source) => return Err(ProfileError::Read { path, source }),
        };
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and persist. Writes to a sibling temp file and renames it
    /// over the target, so a failed save leaves any previously-readable file
    /// untouched.
    pub fn save(&self) -> Result<(), ProfileError> {
        let text = render(&self.doc);
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let result = (|| -> io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            tmp.write_all(text.as_bytes())?;
            tmp.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        })();
        result.map_err(|source| ProfileError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
