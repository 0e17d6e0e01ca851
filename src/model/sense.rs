//! Sense and its children: examples, reversals, and illustrations.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::LiftError;
use crate::model::entry::Relation;
use crate::model::extensible::{
    Annotation, Dated, Described, Field, HasAnnotations, HasFields, HasNotes, HasRelations,
    HasTraits, Identified, Note, Trait,
};
use crate::text::MultiText;

/// A grammatical category value with its qualifying traits.
///
/// This is the one place where trait children do not attach to the
/// innermost open entity: traits inside a `grammatical-info` element
/// belong to the category value, not to the enclosing sense.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammaticalInfo {
    pub value: String,
    pub traits: Vec<Trait>,
}

impl GrammaticalInfo {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            traits: Vec::new(),
        }
    }
}

impl HasTraits for GrammaticalInfo {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

/// One meaning of an entry. Senses nest recursively: a subsense is a full
/// sense whose parent is another sense instead of an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sense {
    pub id: Option<String>,
    pub guid: Option<String>,
    pub order: Option<u32>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
    pub grammatical_info: Option<GrammaticalInfo>,
    pub gloss: MultiText,
    pub definition: MultiText,
    pub examples: Vec<Example>,
    pub relations: Vec<Relation>,
    pub illustrations: Vec<Illustration>,
    pub reversals: Vec<Reversal>,
    pub subsenses: Vec<Sense>,
    pub notes: Vec<Note>,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
}

impl Sense {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Described for Sense {
    fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("sense '{id}'"),
            None => "sense".to_string(),
        }
    }
}

impl Identified for Sense {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }
    fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }
    fn set_guid(&mut self, guid: impl Into<String>) {
        self.guid = Some(guid.into());
    }
}

impl Dated for Sense {
    fn date_created(&self) -> Option<&str> {
        self.date_created.as_deref()
    }
    fn set_date_created(&mut self, date: impl Into<String>) {
        self.date_created = Some(date.into());
    }
    fn date_modified(&self) -> Option<&str> {
        self.date_modified.as_deref()
    }
    fn set_date_modified(&mut self, date: impl Into<String>) {
        self.date_modified = Some(date.into());
    }
}

impl HasNotes for Sense {
    fn notes(&self) -> &[Note] {
        &self.notes
    }
    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }
}

impl HasFields for Sense {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Sense {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Sense {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

impl HasRelations for Sense {
    fn relations(&self) -> &[Relation] {
        &self.relations
    }
    fn relations_mut(&mut self) -> &mut Vec<Relation> {
        &mut self.relations
    }
}

/// A usage example for a sense, with typed translations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    pub source: Option<String>,
    pub content: MultiText,
    translations: IndexMap<SmolStr, MultiText>,
    pub notes: Vec<Note>,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
}

impl Example {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation keyed by type; the default type is the empty
    /// string. A second translation of the same type is a construction
    /// error.
    pub fn add_translation(
        &mut self,
        translation_type: impl Into<SmolStr>,
        text: MultiText,
    ) -> Result<(), LiftError> {
        let key = translation_type.into();
        if self.translations.contains_key(&key) {
            return Err(LiftError::duplicate_translation(key, self.describe()));
        }
        self.translations.insert(key, text);
        Ok(())
    }

    pub fn translation(&self, translation_type: &str) -> Option<&MultiText> {
        self.translations.get(translation_type)
    }

    pub fn translations(&self) -> impl Iterator<Item = (&str, &MultiText)> {
        self.translations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Described for Example {
    fn describe(&self) -> String {
        "example".to_string()
    }
}

impl Dated for Example {
    fn date_created(&self) -> Option<&str> {
        self.date_created.as_deref()
    }
    fn set_date_created(&mut self, date: impl Into<String>) {
        self.date_created = Some(date.into());
    }
    fn date_modified(&self) -> Option<&str> {
        self.date_modified.as_deref()
    }
    fn set_date_modified(&mut self, date: impl Into<String>) {
        self.date_modified = Some(date.into());
    }
}

impl HasNotes for Example {
    fn notes(&self) -> &[Note] {
        &self.notes
    }
    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }
}

impl HasFields for Example {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Example {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Example {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

/// A reverse-index form attached to a sense, optionally chained to a
/// broader "main" reversal of the same shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reversal {
    pub rev_type: Option<SmolStr>,
    pub forms: MultiText,
    pub main: Option<Box<Reversal>>,
    pub grammatical_info: Option<GrammaticalInfo>,
}

impl Reversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the main chain, this reversal included.
    pub fn chain_depth(&self) -> usize {
        1 + self.main.as_deref().map_or(0, Reversal::chain_depth)
    }
}

/// A picture reference attached to a sense.
#[derive(Debug, Clone, PartialEq)]
pub struct Illustration {
    pub href: String,
    pub label: MultiText,
}

impl Illustration {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: MultiText::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Form;

    #[test]
    fn translation_types_are_unique() {
        let mut ex = Example::new();
        let mut free = MultiText::new();
        free.add_form(Form::with_text("en", "The cat sat.")).unwrap();
        ex.add_translation("", free).unwrap();
        ex.add_translation("back", MultiText::new()).unwrap();
        let err = ex.add_translation("", MultiText::new()).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
        assert_eq!(ex.translations().count(), 2);
    }

    #[test]
    fn reversal_chain_depth() {
        let mut rev = Reversal::new();
        let mut mid = Reversal::new();
        mid.main = Some(Box::new(Reversal::new()));
        rev.main = Some(Box::new(mid));
        assert_eq!(rev.chain_depth(), 3);
    }
}
