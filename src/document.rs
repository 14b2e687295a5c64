use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A transcription document read into memory
#[derive(Debug, Clone)]
pub struct Document {
    /// Path to the file as given
    pub path: String,
    /// File name without directory components
    pub name: String,
    /// File content as valid UTF-8 text
    pub content: String,
}

impl Document {
    /// The document's lines, each keeping its original terminator
    ///
    /// Splitting inclusively means concatenating the lines reproduces the
    /// content byte-for-byte, which the renumbering output relies on.
    pub fn lines(&self) -> Vec<&str> {
        self.content.split_inclusive('\n').collect()
    }
}

/// Error types for document I/O
#[derive(Debug)]
pub enum DocumentError {
    NotFound(String),
    Empty(String),
    InvalidUtf8(String),
    IoError(String),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::NotFound(p) => write!(f, "Input file not found: {}", p),
            DocumentError::Empty(p) => write!(f, "Empty input file: {}", p),
            DocumentError::InvalidUtf8(p) => write!(f, "Invalid UTF-8 in file: {}", p),
            DocumentError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<io::Error> for DocumentError {
    fn from(err: io::Error) -> Self {
        DocumentError::IoError(err.to_string())
    }
}

/// Read a transcription document from disk
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(Document)` - Document content with metadata
/// * `Err(DocumentError)` - Missing file, empty file, I/O error, or invalid UTF-8
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document, DocumentError> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Err(DocumentError::NotFound(path_ref.display().to_string()));
    }

    let bytes = fs::read(path_ref)?;

    if bytes.is_empty() {
        return Err(DocumentError::Empty(path_ref.display().to_string()));
    }

    let content = String::from_utf8(bytes)
        .map_err(|_| DocumentError::InvalidUtf8(path_ref.display().to_string()))?;

    let name = path_ref
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_ref.display().to_string());

    Ok(Document {
        path: path_ref.display().to_string(),
        name,
        content,
    })
}

/// Write a document's full content, replacing any existing file
pub fn write_document<P: AsRef<Path>>(path: P, content: &str) -> Result<(), DocumentError> {
    fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Append a report block to a count log, creating the file if needed
pub fn append_report<P: AsRef<Path>>(path: P, report: &str) -> Result<(), DocumentError> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path.as_ref())?;
    file.write_all(report.as_bytes())?;
    Ok(())
}

/// List the XML documents in a directory, in sorted order
///
/// Used for batch mode when no input path is given: every regular file
/// with an `.xml` extension (case-insensitive) is a candidate document.
pub fn list_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, DocumentError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}
