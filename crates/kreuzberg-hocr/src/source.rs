//! Document sources.
//!
//! hOCR can be handed over as a file path, an open reader, or bytes already in
//! memory. [`DocumentSource`] covers the three shapes and [`load`] turns any of them
//! into one contiguous buffer.

use crate::{HocrError, Result};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const INVALID_INPUT_MESSAGE: &str = "Invalid input for parse: expected a file path, a readable stream, or a byte buffer";

/// Input accepted by [`crate::parse`].
pub enum DocumentSource<'a> {
    /// File on disk. Opened, read and closed by the parser.
    Path(PathBuf),
    /// Reader owned or borrowed by the caller. Read to the end; borrowed handles stay open.
    Stream(Box<dyn Read + 'a>),
    /// In-memory document. Borrowed buffers are not copied.
    Bytes(Cow<'a, [u8]>),
}

impl<'a> DocumentSource<'a> {
    /// Wrap any reader, e.g. `&mut File` or `&mut Stdin`.
    pub fn stream<R: Read + 'a>(reader: R) -> Self {
        Self::Stream(Box::new(reader))
    }

    /// Classify a dynamically typed value.
    ///
    /// Accepts `String`, `&'static str` and `PathBuf` as paths, `File` as a stream,
    /// and `Vec<u8>` or `&'static [u8]` as bytes. Anything else is rejected with
    /// `HocrError::Validation` without performing I/O.
    pub fn from_any(value: Box<dyn Any>) -> Result<DocumentSource<'static>> {
        let value = match value.downcast::<String>() {
            Ok(path) => return Ok(DocumentSource::Path(PathBuf::from(*path))),
            Err(other) => other,
        };
        let value = match value.downcast::<&'static str>() {
            Ok(path) => return Ok(DocumentSource::Path(PathBuf::from(*path))),
            Err(other) => other,
        };
        let value = match value.downcast::<PathBuf>() {
            Ok(path) => return Ok(DocumentSource::Path(*path)),
            Err(other) => other,
        };
        let value = match value.downcast::<File>() {
            Ok(file) => return Ok(DocumentSource::Stream(file)),
            Err(other) => other,
        };
        let value = match value.downcast::<Vec<u8>>() {
            Ok(bytes) => return Ok(DocumentSource::Bytes(Cow::Owned(*bytes))),
            Err(other) => other,
        };
        match value.downcast::<&'static [u8]>() {
            Ok(bytes) => Ok(DocumentSource::Bytes(Cow::Borrowed(*bytes))),
            Err(_) => Err(HocrError::validation(INVALID_INPUT_MESSAGE)),
        }
    }

    /// Short name of the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Stream(_) => "stream",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Debug for DocumentSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish_non_exhaustive(),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// Read the whole document into memory.
///
/// # Errors
///
/// Returns `HocrError::Io` if the file cannot be opened or a read fails.
pub fn load(source: DocumentSource<'_>) -> Result<Cow<'_, [u8]>> {
    match source {
        DocumentSource::Path(path) => {
            // Dropped, and therefore closed, on every return path.
            let mut file = File::open(&path)?;
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Ok(Cow::Owned(bytes))
        }
        DocumentSource::Stream(mut reader) => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Ok(Cow::Owned(bytes))
        }
        DocumentSource::Bytes(bytes) => Ok(bytes),
    }
}

impl<'a> From<&'a str> for DocumentSource<'a> {
    fn from(path: &'a str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for DocumentSource<'_> {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl<'a> From<&'a Path> for DocumentSource<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for DocumentSource<'_> {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a [u8]> for DocumentSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for DocumentSource<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes.as_slice()))
    }
}

impl<'a> From<&'a Vec<u8>> for DocumentSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(Cow::Borrowed(bytes.as_slice()))
    }
}

impl From<Vec<u8>> for DocumentSource<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Cow::Owned(bytes))
    }
}

impl<'a> From<&'a mut File> for DocumentSource<'a> {
    fn from(file: &'a mut File) -> Self {
        Self::Stream(Box::new(file))
    }
}

impl From<File> for DocumentSource<'_> {
    fn from(file: File) -> Self {
        Self::Stream(Box::new(file))
    }
}
