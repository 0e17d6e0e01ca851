//! Shared capability traits and the extensible building blocks.
//!
//! The entity graph is not a deep inheritance hierarchy: each concrete
//! entity composes a handful of small capabilities (identifiable, has-notes,
//! has-fields, ...). The builder and writer work against these traits so
//! that every extensible entity enforces and serializes its inherited
//! properties identically.

use smol_str::SmolStr;

use crate::error::LiftError;
use crate::text::MultiText;

// ============================================================================
// CAPABILITY TRAITS
// ============================================================================

/// Human-readable label for error messages ("entry 'cat'", "note").
pub trait Described {
    fn describe(&self) -> String;
}

/// Entities carrying an optional id plus an optional globally-unique id.
///
/// The guid is backfilled by the finalize pass when absent; the id is left
/// exactly as authored.
pub trait Identified {
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: impl Into<String>);
    fn guid(&self) -> Option<&str>;
    fn set_guid(&mut self, guid: impl Into<String>);
}

/// Entities carrying creation/modification timestamps (kept verbatim as the
/// document's date strings; the core does not interpret them).
pub trait Dated {
    fn date_created(&self) -> Option<&str>;
    fn set_date_created(&mut self, date: impl Into<String>);
    fn date_modified(&self) -> Option<&str>;
    fn set_date_modified(&mut self, date: impl Into<String>);
}

/// Entities owning notes, keyed by note type (at most one note per type).
pub trait HasNotes: Described {
    fn notes(&self) -> &[Note];
    fn notes_mut(&mut self) -> &mut Vec<Note>;

    fn add_note(&mut self, note: Note) -> Result<(), LiftError> {
        if self.notes().iter().any(|n| n.note_type() == note.note_type()) {
            return Err(LiftError::duplicate_note(note.note_type(), self.describe()));
        }
        self.notes_mut().push(note);
        Ok(())
    }
}

/// Entities owning uniquely-named fields.
pub trait HasFields: Described {
    fn fields(&self) -> &[Field];
    fn fields_mut(&mut self) -> &mut Vec<Field>;

    fn add_field(&mut self, field: Field) -> Result<(), LiftError> {
        if self.fields().iter().any(|f| f.name() == field.name()) {
            return Err(LiftError::duplicate_field(field.name(), self.describe()));
        }
        self.fields_mut().push(field);
        Ok(())
    }
}

/// Entities owning traits. Trait names are not unique keys: a holder may
/// carry several traits with the same name.
pub trait HasTraits {
    fn traits(&self) -> &[Trait];
    fn traits_mut(&mut self) -> &mut Vec<Trait>;

    fn add_trait(&mut self, t: Trait) {
        self.traits_mut().push(t);
    }
}

/// Entities owning annotations.
pub trait HasAnnotations {
    fn annotations(&self) -> &[Annotation];
    fn annotations_mut(&mut self) -> &mut Vec<Annotation>;

    fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations_mut().push(annotation);
    }
}

/// Entities owning relations to other entries.
pub trait HasRelations {
    fn relations(&self) -> &[crate::model::Relation];
    fn relations_mut(&mut self) -> &mut Vec<crate::model::Relation>;

    fn add_relation(&mut self, relation: crate::model::Relation) {
        self.relations_mut().push(relation);
    }
}

/// Entities owning pronunciations.
pub trait HasPronunciations {
    fn pronunciations(&self) -> &[crate::model::Pronunciation];
    fn pronunciations_mut(&mut self) -> &mut Vec<crate::model::Pronunciation>;

    fn add_pronunciation(&mut self, pronunciation: crate::model::Pronunciation) {
        self.pronunciations_mut().push(pronunciation);
    }
}

// ============================================================================
// EXTENSIBLE BUILDING BLOCKS
// ============================================================================

/// A typed text block attached to an entity. The type is a uniqueness key
/// among the owner's notes; the empty string is a valid type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    note_type: SmolStr,
    pub content: MultiText,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
}

impl Note {
    pub fn new(note_type: impl Into<SmolStr>) -> Self {
        Self {
            note_type: note_type.into(),
            ..Self::default()
        }
    }

    pub fn note_type(&self) -> &str {
        &self.note_type
    }
}

impl Described for Note {
    fn describe(&self) -> String {
        if self.note_type.is_empty() {
            "note".to_string()
        } else {
            format!("note '{}'", self.note_type)
        }
    }
}

impl Dated for Note {
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

impl HasFields for Note {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Note {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Note {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

/// A uniquely-named, text-bearing extension slot. Fields cannot own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    name: SmolStr,
    pub content: MultiText,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Described for Field {
    fn describe(&self) -> String {
        format!("field '{}'", self.name)
    }
}

impl Dated for Field {
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

impl HasTraits for Field {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Field {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

/// A name/value annotation. Names are not unique: a holder may carry
/// several traits with the same name and different values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trait {
    name: SmolStr,
    value: String,
    pub annotations: Vec<Annotation>,
}

impl Trait {
    pub fn new(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            annotations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl HasAnnotations for Trait {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

/// An attributed remark on an entity or on a single form. The content is a
/// multitext whose forms may themselves carry further annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    name: SmolStr,
    pub value: Option<String>,
    pub who: Option<String>,
    pub when: Option<String>,
    pub content: MultiText,
}

impl Annotation {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Form;

    #[test]
    fn note_types_are_unique_per_holder() {
        let mut note_holder = crate::model::Entry::default();
        note_holder.add_note(Note::new("usage")).unwrap();
        note_holder.add_note(Note::new("")).unwrap();
        let err = note_holder.add_note(Note::new("usage")).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
        // A second empty-typed note collides too: "" is a real type.
        assert!(note_holder.add_note(Note::new("")).is_err());
    }

    #[test]
    fn field_names_are_unique_per_holder() {
        let mut entry = crate::model::Entry::default();
        entry.add_field(Field::new("literal-meaning")).unwrap();
        assert!(entry.add_field(Field::new("summary")).is_ok());
        assert!(entry.add_field(Field::new("literal-meaning")).is_err());
    }

    #[test]
    fn trait_names_may_repeat() {
        let mut entry = crate::model::Entry::default();
        entry.add_trait(Trait::new("morph-type", "stem"));
        entry.add_trait(Trait::new("morph-type", "root"));
        assert_eq!(entry.traits.len(), 2);
    }

    #[test]
    fn annotation_content_is_multitext() {
        let mut ann = Annotation::new("reviewed");
        ann.content.add_form(Form::with_text("en", "yes")).unwrap();
        assert_eq!(ann.content.text("en").as_deref(), Some("yes"));
    }
}
