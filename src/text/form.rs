//! A single language's content: a span tree plus form-level annotations.

use smol_str::SmolStr;

use crate::model::Annotation;
use crate::text::span::Span;

/// One language's textual content within a [`MultiText`](crate::text::MultiText).
///
/// The body is a span tree whose root is an attribute-less interior node;
/// annotations attach to the form as a whole, not to individual spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    lang: SmolStr,
    root: Span,
    annotations: Vec<Annotation>,
}

impl Form {
    /// Create an empty form for the given language.
    pub fn new(lang: impl Into<SmolStr>) -> Self {
        Self {
            lang: lang.into(),
            root: Span::node(),
            annotations: Vec::new(),
        }
    }

    /// Create a form whose body is a single text leaf.
    pub fn with_text(lang: impl Into<SmolStr>, text: impl Into<String>) -> Self {
        let mut form = Self::new(lang);
        // The root is a fresh interior node, so this cannot fail.
        let _ = form.root.push_child(Span::text(text));
        form
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// The root of the span tree (an interior node).
    pub fn root(&self) -> &Span {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Span {
        &mut self.root
    }

    pub(crate) fn from_parts(lang: SmolStr, root: Span, annotations: Vec<Annotation>) -> Self {
        Self {
            lang,
            root,
            annotations,
        }
    }

    /// True if the form has no text content at all.
    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// Plain text rendering: all span markup stripped.
    pub fn text(&self) -> String {
        self.root.to_plain()
    }

    /// Markup rendering: nested spans reconstructed, XML-escaped.
    pub fn markup(&self) -> String {
        self.root.inner_markup()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_text_round_trips() {
        let form = Form::with_text("en", "cat");
        assert_eq!(form.lang(), "en");
        assert_eq!(form.text(), "cat");
        assert_eq!(form.markup(), "cat");
        assert!(!form.is_empty());
    }

    #[test]
    fn empty_form() {
        let form = Form::new("seh");
        assert!(form.is_empty());
        assert_eq!(form.text(), "");
    }
}
