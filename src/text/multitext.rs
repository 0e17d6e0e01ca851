//! Multilingual text: parallel forms keyed by language tag.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::LiftError;
use crate::text::form::Form;

/// A collection of [`Form`]s, at most one per language tag.
///
/// Insertion order is preserved so a loaded document writes its languages
/// back in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiText {
    forms: IndexMap<SmolStr, Form>,
}

impl MultiText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Add a form; fails if the language is already present.
    pub fn add_form(&mut self, form: Form) -> Result<(), LiftError> {
        if self.forms.contains_key(form.lang()) {
            return Err(LiftError::duplicate_language(form.lang(), "multitext"));
        }
        self.forms.insert(SmolStr::new(form.lang()), form);
        Ok(())
    }

    /// Add a form, replacing any existing form for the same language.
    ///
    /// This is the editing-path mutation; the parser only ever uses
    /// [`MultiText::add_form`].
    pub fn add_or_replace_form(&mut self, form: Form) {
        self.forms.insert(SmolStr::new(form.lang()), form);
    }

    pub fn remove_form(&mut self, lang: &str) -> Option<Form> {
        self.forms.shift_remove(lang)
    }

    pub fn get(&self, lang: &str) -> Option<&Form> {
        self.forms.get(lang)
    }

    pub fn get_mut(&mut self, lang: &str) -> Option<&mut Form> {
        self.forms.get_mut(lang)
    }

    /// Plain-text content for a language, if present.
    pub fn text(&self, lang: &str) -> Option<String> {
        self.forms.get(lang).map(Form::text)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(SmolStr::as_str)
    }

    pub fn forms(&self) -> impl Iterator<Item = &Form> {
        self.forms.values()
    }

    pub fn forms_mut(&mut self) -> impl Iterator<Item = &mut Form> {
        self.forms.values_mut()
    }

    /// The first form in insertion order, if any.
    pub fn first_form(&self) -> Option<&Form> {
        self.forms.values().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_form_per_language() {
        let mut mt = MultiText::new();
        mt.add_form(Form::with_text("en", "cat")).unwrap();
        let err = mt.add_form(Form::with_text("en", "feline")).unwrap_err();
        assert!(matches!(err, LiftError::DuplicateLanguage { .. }));
        assert_eq!(mt.len(), 1);
        assert_eq!(mt.text("en").as_deref(), Some("cat"));
    }

    #[test]
    fn replace_is_explicit() {
        let mut mt = MultiText::new();
        mt.add_form(Form::with_text("en", "cat")).unwrap();
        mt.add_or_replace_form(Form::with_text("en", "feline"));
        assert_eq!(mt.text("en").as_deref(), Some("feline"));
    }

    #[test]
    fn preserves_insertion_order() {
        let mut mt = MultiText::new();
        mt.add_form(Form::with_text("seh", "nyoka")).unwrap();
        mt.add_form(Form::with_text("en", "snake")).unwrap();
        mt.add_form(Form::with_text("pt", "cobra")).unwrap();
        let langs: Vec<_> = mt.languages().collect();
        assert_eq!(langs, ["seh", "en", "pt"]);
    }
}
