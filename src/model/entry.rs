//! Entry and its direct children: variants, pronunciations, etymologies,
//! and relations.

use smol_str::SmolStr;

use crate::model::extensible::{
    Annotation, Dated, Described, Field, HasAnnotations, HasFields, HasNotes, HasPronunciations,
    HasRelations, HasTraits, Identified, Note, Trait,
};
use crate::model::sense::Sense;
use crate::text::MultiText;

/// A dictionary entry: the root unit of the lexicon.
///
/// Ids must be unique dictionary-wide; the guid is backfilled at finalize
/// when the document did not supply one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub id: Option<String>,
    pub guid: Option<String>,
    pub order: Option<u32>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
    /// Deletion marker: a tombstone entry retains its id but no content.
    pub date_deleted: Option<String>,
    /// The headword forms, in the object language(s).
    pub lexical_unit: MultiText,
    /// The citation forms, in the meta language(s).
    pub citations: MultiText,
    pub senses: Vec<Sense>,
    pub variants: Vec<Variant>,
    pub pronunciations: Vec<Pronunciation>,
    pub relations: Vec<Relation>,
    pub etymologies: Vec<Etymology>,
    pub notes: Vec<Note>,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The headword in the first object language, for display and logging.
    pub fn headword(&self) -> Option<String> {
        self.lexical_unit.first_form().map(|f| f.text())
    }
}

impl Described for Entry {
    fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("entry '{id}'"),
            None => "entry".to_string(),
        }
    }
}

impl Identified for Entry {
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

impl Dated for Entry {
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

impl HasNotes for Entry {
    fn notes(&self) -> &[Note] {
        &self.notes
    }
    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }
}

impl HasFields for Entry {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Entry {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Entry {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

impl HasRelations for Entry {
    fn relations(&self) -> &[Relation] {
        &self.relations
    }
    fn relations_mut(&mut self) -> &mut Vec<Relation> {
        &mut self.relations
    }
}

impl HasPronunciations for Entry {
    fn pronunciations(&self) -> &[Pronunciation] {
        &self.pronunciations
    }
    fn pronunciations_mut(&mut self) -> &mut Vec<Pronunciation> {
        &mut self.pronunciations
    }
}

/// A variant form of an entry, optionally cross-referencing another entry
/// by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    /// Reference to another entry's id, validated at finalize.
    pub ref_id: Option<String>,
    pub forms: MultiText,
    pub pronunciations: Vec<Pronunciation>,
    pub relations: Vec<Relation>,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
}

impl Variant {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Described for Variant {
    fn describe(&self) -> String {
        "variant".to_string()
    }
}

impl HasFields for Variant {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Variant {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Variant {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

impl HasRelations for Variant {
    fn relations(&self) -> &[Relation] {
        &self.relations
    }
    fn relations_mut(&mut self) -> &mut Vec<Relation> {
        &mut self.relations
    }
}

impl HasPronunciations for Variant {
    fn pronunciations(&self) -> &[Pronunciation] {
        &self.pronunciations
    }
    fn pronunciations_mut(&mut self) -> &mut Vec<Pronunciation> {
        &mut self.pronunciations
    }
}

/// A pronunciation: per-writing-system forms plus media references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pronunciation {
    pub forms: MultiText,
    pub media: Vec<Media>,
}

impl Pronunciation {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A media reference attached to a pronunciation.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub href: String,
    pub label: MultiText,
}

impl Media {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: MultiText::new(),
        }
    }
}

/// An etymology: where the word came from. Type and source are mandatory
/// on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Etymology {
    pub etym_type: String,
    pub source: String,
    pub forms: MultiText,
    pub glosses: MultiText,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
}

impl Etymology {
    pub fn new(etym_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            etym_type: etym_type.into(),
            source: source.into(),
            forms: MultiText::new(),
            glosses: MultiText::new(),
            fields: Vec::new(),
            traits: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl Described for Etymology {
    fn describe(&self) -> String {
        format!("etymology '{}'", self.etym_type)
    }
}

impl HasFields for Etymology {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Etymology {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Etymology {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

/// A typed link to another entry (synonym, antonym, component, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub rel_type: SmolStr,
    /// Reference to another entry's id, validated at finalize.
    pub ref_id: Option<String>,
    pub order: Option<u32>,
    pub usage: MultiText,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
}

impl Relation {
    pub fn new(rel_type: impl Into<SmolStr>) -> Self {
        Self {
            rel_type: rel_type.into(),
            ref_id: None,
            order: None,
            usage: MultiText::new(),
            fields: Vec::new(),
            traits: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl Described for Relation {
    fn describe(&self) -> String {
        format!("relation '{}'", self.rel_type)
    }
}

impl HasFields for Relation {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for Relation {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for Relation {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}
