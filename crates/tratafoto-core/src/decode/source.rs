//! Image sources and the readers opened over them.
//!
//! A source is opened fresh for every pass (bounds probe, pixel decode,
//! metadata read). Each pass owns its [`SourceReader`] and drops it on return,
//! so file descriptors never outlive the call that opened them.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use url::Url;

use super::DecodeError;

/// Host hook for URIs the filesystem cannot serve (e.g. content providers).
pub trait ContentResolver {
    /// Open a readable stream for `uri`.
    fn open(&self, uri: &str) -> io::Result<Box<dyn Read + Send>>;
}

/// Handle to an encoded image.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on disk.
    Path(PathBuf),
    /// An encoded image already in memory.
    Memory(Vec<u8>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ImageSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) => write!(f, "{}", path.display()),
            ImageSource::Memory(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}

impl ImageSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageSource::Path(path.into())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ImageSource::Memory(bytes.into())
    }

    /// Parse a `file://` URI or a bare path.
    ///
    /// File URIs are percent-decoded and may name `localhost` as their host.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::UnsupportedScheme` for any other scheme; use
    /// [`ImageSource::resolve`] with a host resolver for those.
    /// `DecodeError::InvalidSource` covers empty input, a file URI with no
    /// path, and one that names a remote host.
    pub fn from_uri(uri: &str) -> Result<Self, DecodeError> {
        match uri.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("file") => {
                if rest.is_empty() {
                    return Err(DecodeError::InvalidSource("empty file URI".to_string()));
                }
                file_uri_path(uri).map(ImageSource::Path)
            }
            Some((scheme, _)) => Err(DecodeError::UnsupportedScheme(scheme.to_string())),
            None if uri.is_empty() => Err(DecodeError::InvalidSource("empty path".to_string())),
            None => Ok(ImageSource::Path(PathBuf::from(uri))),
        }
    }

    /// Resolve any URI, delegating non-file schemes to `resolver`.
    ///
    /// Non-file content is read fully into memory so later passes can seek.
    pub fn resolve(uri: &str, resolver: &dyn ContentResolver) -> Result<Self, DecodeError> {
        match Self::from_uri(uri) {
            Err(DecodeError::UnsupportedScheme(_)) => {
                let mut stream = resolver
                    .open(uri)
                    .map_err(|e| DecodeError::InvalidSource(format!("{}: {}", uri, e)))?;
                let mut bytes = Vec::new();
                stream
                    .read_to_end(&mut bytes)
                    .map_err(|e| DecodeError::InvalidSource(format!("{}: {}", uri, e)))?;
                Ok(ImageSource::Memory(bytes))
            }
            other => other,
        }
    }

    /// Filesystem path, if this source lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageSource::Path(path) => Some(path),
            ImageSource::Memory(_) => None,
        }
    }

    /// Open a buffered, seekable reader over the encoded bytes.
    pub fn open(&self) -> Result<SourceReader<'_>, DecodeError> {
        match self {
            ImageSource::Path(path) => {
                let file = File::open(path)
                    .map_err(|e| DecodeError::InvalidSource(format!("{}: {}", path.display(), e)))?;
                Ok(SourceReader::File(BufReader::new(file)))
            }
            ImageSource::Memory(bytes) => Ok(SourceReader::Memory(Cursor::new(bytes.as_slice()))),
        }
    }
}

fn file_uri_path(uri: &str) -> Result<PathBuf, DecodeError> {
    let url = Url::parse(uri).map_err(|e| DecodeError::InvalidSource(format!("{}: {}", uri, e)))?;
    url.to_file_path()
        .map_err(|()| DecodeError::InvalidSource(format!("{}: not a local file", uri)))
}

/// Reader over an [`ImageSource`].
pub enum SourceReader<'a> {
    File(BufReader<File>),
    Memory(Cursor<&'a [u8]>),
}

impl Read for SourceReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SourceReader::File(r) => r.read(buf),
            SourceReader::Memory(r) => r.read(buf),
        }
    }
}

impl BufRead for SourceReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SourceReader::File(r) => r.fill_buf(),
            SourceReader::Memory(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SourceReader::File(r) => r.consume(amt),
            SourceReader::Memory(r) => r.consume(amt),
        }
    }
}

impl Seek for SourceReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            SourceReader::File(r) => r.seek(pos),
            SourceReader::Memory(r) => r.seek(pos),
        }
    }
}
