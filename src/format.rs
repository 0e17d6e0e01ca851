//! Document format handling and the path-level load/save entry points.

use std::path::Path;

use tracing::debug;

use crate::error::LiftError;
use crate::model::Dictionary;
use crate::parser::LiftParser;
use crate::writer::LiftWriter;

/// Trait for lexicon document formats.
///
/// Implementations serialize and deserialize between the in-memory
/// [`Dictionary`] and external file formats.
pub trait DocumentFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    /// MIME type for this format.
    fn mime_type(&self) -> &'static str;

    /// Read a dictionary from bytes.
    fn read(&self, input: &[u8]) -> Result<Dictionary, LiftError>;

    /// Write a dictionary to bytes.
    fn write(&self, dict: &Dictionary) -> Result<Vec<u8>, LiftError>;

    /// Validate that the input looks like this format.
    ///
    /// This is a quick marker check that doesn't fully parse the content.
    fn validate(&self, input: &[u8]) -> Result<(), LiftError> {
        let _ = input;
        Ok(())
    }
}

/// LIFT format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lift;

impl DocumentFormat for Lift {
    fn name(&self) -> &'static str {
        "LIFT"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["lift"]
    }

    fn mime_type(&self) -> &'static str {
        "application/x-lift+xml"
    }

    fn read(&self, input: &[u8]) -> Result<Dictionary, LiftError> {
        LiftParser::parse(input)
    }

    fn write(&self, dict: &Dictionary) -> Result<Vec<u8>, LiftError> {
        LiftWriter::write(dict)
    }

    fn validate(&self, input: &[u8]) -> Result<(), LiftError> {
        let content = std::str::from_utf8(input)
            .map_err(|e| LiftError::xml(format!("Invalid UTF-8: {e}")))?;
        if !content.contains("<lift") {
            return Err(LiftError::xml("Missing lift root element"));
        }
        Ok(())
    }
}

/// Detect a format handler from a file extension.
pub fn detect_format(path: &Path) -> Option<Box<dyn DocumentFormat>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "lift" => Some(Box::new(Lift)),
        _ => None,
    }
}

/// Load a dictionary from a LIFT file.
pub fn load(path: impl AsRef<Path>) -> Result<Dictionary, LiftError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "loading LIFT document");
    load_bytes(&bytes)
}

/// Load a dictionary from in-memory LIFT bytes.
pub fn load_bytes(input: &[u8]) -> Result<Dictionary, LiftError> {
    Lift.read(input)
}

/// Save a dictionary to a LIFT file.
///
/// The bytes are fully serialized before the file is touched, so a
/// serialization failure leaves the destination unchanged; callers that
/// need atomic replacement should write to a temporary path and rename.
pub fn save(dict: &Dictionary, path: impl AsRef<Path>) -> Result<(), LiftError> {
    let path = path.as_ref();
    let bytes = save_bytes(dict)?;
    debug!(path = %path.display(), bytes = bytes.len(), "saving LIFT document");
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a dictionary to in-memory LIFT bytes.
pub fn save_bytes(dict: &Dictionary) -> Result<Vec<u8>, LiftError> {
    Lift.write(dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_metadata() {
        assert_eq!(Lift.name(), "LIFT");
        assert_eq!(Lift.extensions(), &["lift"]);
        assert_eq!(Lift.mime_type(), "application/x-lift+xml");
    }

    #[test]
    fn validate_checks_the_root_marker() {
        assert!(Lift.validate(br#"<lift version="0.13"/>"#).is_ok());
        assert!(Lift.validate(b"<root>not lift</root>").is_err());
    }

    #[test]
    fn detect_by_extension() {
        assert!(detect_format(Path::new("lexicon.lift")).is_some());
        assert!(detect_format(Path::new("lexicon.xml")).is_none());
    }
}
