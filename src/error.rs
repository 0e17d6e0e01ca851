//! Error types for LIFT load and save operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a LIFT document.
#[derive(Debug, Error)]
pub enum LiftError {
    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Duplicate identifier on an entry or sense.
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// A MultiText already contains a form for this language.
    #[error("Duplicate language '{lang}' in {context}")]
    DuplicateLanguage { lang: String, context: String },

    /// Duplicate uniqueness key: field name, note type, or translation type.
    #[error("Duplicate {kind} '{key}' on {context}")]
    DuplicateType {
        kind: &'static str,
        key: String,
        context: String,
    },

    /// A refid attribute names an entry that does not exist in the document.
    #[error("Unresolved reference '{refid}' from {context}")]
    UnresolvedReference { refid: String, context: String },

    /// An element appeared in a context with no defined handler.
    #[error("Unexpected element <{tag}> in {context}")]
    UnexpectedElement { tag: String, context: String },

    /// Missing required element or attribute.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// Malformed text-span construction (leaf vs. parent violation).
    #[error("Span error: {0}")]
    Span(String),
}

impl LiftError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a duplicate-language error.
    pub fn duplicate_language(lang: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicateLanguage {
            lang: lang.into(),
            context: context.into(),
        }
    }

    /// Create a duplicate-key error for a field name.
    pub fn duplicate_field(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicateType {
            kind: "field",
            key: key.into(),
            context: context.into(),
        }
    }

    /// Create a duplicate-key error for a note type.
    pub fn duplicate_note(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicateType {
            kind: "note type",
            key: key.into(),
            context: context.into(),
        }
    }

    /// Create a duplicate-key error for a translation type.
    pub fn duplicate_translation(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicateType {
            kind: "translation type",
            key: key.into(),
            context: context.into(),
        }
    }

    /// Create an unexpected-element error naming the tag and its context.
    pub fn unexpected(tag: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnexpectedElement {
            tag: tag.into(),
            context: context.into(),
        }
    }

    /// Create an unresolved-reference error.
    pub fn unresolved(refid: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            refid: refid.into(),
            context: context.into(),
        }
    }

    /// Create a missing-attribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "attribute",
            name: name.into(),
        }
    }

    /// Create a missing-element error.
    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "element",
            name: name.into(),
        }
    }

    /// Create a span-construction error.
    pub fn span(message: impl Into<String>) -> Self {
        Self::Span(message.into())
    }
}
