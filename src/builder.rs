//! The builder/factory: the sole constructor of entities during a load.
//!
//! Every "create" applies the shared structural attributes its entity
//! supports (id, guid, dates) through the capability traits, registers the
//! entity for uniqueness and cross-reference validation, and leaves
//! attachment to [`Builder::attach`], which routes a finished child into
//! its parent via the matching add-operation. The finalize pass backfills
//! generated identifiers and validates every collected cross-reference
//! once the whole document has been read — forward references are legal,
//! so they cannot be checked earlier.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::LiftError;
use crate::model::{
    Annotation, Dated, Dictionary, Entry, Etymology, Example, Field, FieldDefinition, FieldKind,
    FieldTarget, FieldType, HasAnnotations, HasFields, HasNotes, HasPronunciations, HasRelations,
    HasTraits, Header, Identified, Illustration, Media, Note, Pronunciation, Range, RangeElement,
    Relation, Reversal, Sense, Trait, Variant,
};
use crate::parser::event::Attrs;
use crate::parser::state::Node;

/// A cross-reference collected during attribute population, resolved at
/// finalize.
#[derive(Debug)]
struct PendingRef {
    refid: String,
    context: String,
}

#[derive(Debug, Default)]
struct Counters {
    entries: usize,
    senses: usize,
    examples: usize,
    variants: usize,
    relations: usize,
    etymologies: usize,
    notes: usize,
    fields: usize,
    traits: usize,
}

/// Factory and invariant keeper for the entity graph.
#[derive(Debug, Default)]
pub struct Builder {
    seen_entry_ids: FxHashSet<String>,
    seen_sense_ids: FxHashSet<String>,
    seen_range_ids: FxHashSet<String>,
    pending_refs: Vec<PendingRef>,
    counters: Counters,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Shared attribute application
    // ------------------------------------------------------------------

    fn apply_guid<T: Identified>(obj: &mut T, attrs: &mut Attrs) {
        if let Some(guid) = attrs.take("guid") {
            obj.set_guid(guid);
        }
    }

    fn apply_dates<T: Dated>(obj: &mut T, attrs: &mut Attrs) {
        if let Some(date) = attrs.take("dateCreated") {
            obj.set_date_created(date);
        }
        if let Some(date) = attrs.take("dateModified") {
            obj.set_date_modified(date);
        }
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    pub fn create_entry(&mut self, attrs: &mut Attrs) -> Result<Entry, LiftError> {
        let mut entry = Entry::new();
        if let Some(id) = attrs.take("id") {
            if !self.seen_entry_ids.insert(id.clone()) {
                return Err(LiftError::DuplicateId(format!("entry '{id}'")));
            }
            entry.set_id(id);
        }
        Self::apply_guid(&mut entry, attrs);
        Self::apply_dates(&mut entry, attrs);
        entry.order = attrs.take_u32("order", "entry");
        entry.date_deleted = attrs.take("dateDeleted");
        self.counters.entries += 1;
        Ok(entry)
    }

    pub fn create_sense(&mut self, attrs: &mut Attrs) -> Result<Sense, LiftError> {
        let mut sense = Sense::new();
        if let Some(id) = attrs.take("id") {
            if !self.seen_sense_ids.insert(id.clone()) {
                return Err(LiftError::DuplicateId(format!("sense '{id}'")));
            }
            sense.set_id(id);
        }
        Self::apply_guid(&mut sense, attrs);
        Self::apply_dates(&mut sense, attrs);
        sense.order = attrs.take_u32("order", "sense");
        self.counters.senses += 1;
        Ok(sense)
    }

    pub fn create_example(&mut self, attrs: &mut Attrs) -> Example {
        let mut example = Example::new();
        example.source = attrs.take("source");
        Self::apply_dates(&mut example, attrs);
        self.counters.examples += 1;
        example
    }

    pub fn create_variant(&mut self, attrs: &mut Attrs, parent: &str) -> Variant {
        let mut variant = Variant::new();
        if let Some(refid) = attrs.take("ref") {
            self.pending_refs.push(PendingRef {
                refid: refid.clone(),
                context: format!("variant of {parent}"),
            });
            variant.ref_id = Some(refid);
        }
        self.counters.variants += 1;
        variant
    }

    pub fn create_pronunciation(&mut self, _attrs: &mut Attrs) -> Pronunciation {
        Pronunciation::new()
    }

    pub fn create_media(&mut self, attrs: &mut Attrs) -> Result<Media, LiftError> {
        Ok(Media::new(attrs.require("href", "media")?))
    }

    pub fn create_illustration(&mut self, attrs: &mut Attrs) -> Result<Illustration, LiftError> {
        Ok(Illustration::new(attrs.require("href", "illustration")?))
    }

    pub fn create_etymology(&mut self, attrs: &mut Attrs) -> Result<Etymology, LiftError> {
        let etym_type = attrs.require("type", "etymology")?;
        let source = attrs.require("source", "etymology")?;
        self.counters.etymologies += 1;
        Ok(Etymology::new(etym_type, source))
    }

    pub fn create_relation(&mut self, attrs: &mut Attrs, parent: &str) -> Result<Relation, LiftError> {
        let mut relation = Relation::new(attrs.require("type", "relation")?);
        if let Some(refid) = attrs.take("ref") {
            self.pending_refs.push(PendingRef {
                refid: refid.clone(),
                context: format!("relation '{}' on {parent}", relation.rel_type),
            });
            relation.ref_id = Some(refid);
        }
        relation.order = attrs.take_u32("order", "relation");
        self.counters.relations += 1;
        Ok(relation)
    }

    pub fn create_note(&mut self, attrs: &mut Attrs) -> Note {
        let mut note = Note::new(attrs.take("type").unwrap_or_default());
        Self::apply_dates(&mut note, attrs);
        self.counters.notes += 1;
        note
    }

    pub fn create_field(&mut self, attrs: &mut Attrs) -> Result<Field, LiftError> {
        // Older producers wrote the field name in a `type` attribute.
        let name = match attrs.take("name").or_else(|| attrs.take("type")) {
            Some(name) => name,
            None => return Err(LiftError::missing_attribute("'name' on <field>")),
        };
        let mut field = Field::new(name);
        Self::apply_dates(&mut field, attrs);
        self.counters.fields += 1;
        Ok(field)
    }

    pub fn create_trait(&mut self, attrs: &mut Attrs) -> Result<Trait, LiftError> {
        let name = attrs.require("name", "trait")?;
        let value = attrs.require("value", "trait")?;
        self.counters.traits += 1;
        Ok(Trait::new(name, value))
    }

    pub fn create_annotation(&mut self, attrs: &mut Attrs) -> Result<Annotation, LiftError> {
        let mut annotation = Annotation::new(attrs.require("name", "annotation")?);
        annotation.value = attrs.take("value");
        annotation.who = attrs.take("who");
        annotation.when = attrs.take("when");
        Ok(annotation)
    }

    pub fn create_reversal(&mut self, attrs: &mut Attrs) -> Reversal {
        let mut reversal = Reversal::new();
        reversal.rev_type = attrs.take("type").map(Into::into);
        reversal
    }

    pub fn create_header(&mut self) -> Header {
        Header::new()
    }

    pub fn create_range(&mut self, attrs: &mut Attrs) -> Result<Range, LiftError> {
        let id = attrs.require("id", "range")?;
        if !self.seen_range_ids.insert(id.clone()) {
            return Err(LiftError::DuplicateId(format!("range '{id}'")));
        }
        let mut range = Range::new(id);
        range.href = attrs.take("href");
        range.guid = attrs.take("guid");
        Ok(range)
    }

    pub fn create_range_element(&mut self, attrs: &mut Attrs) -> Result<RangeElement, LiftError> {
        let mut element = RangeElement::new(attrs.require("id", "range-element")?);
        element.parent = attrs.take("parent");
        Ok(element)
    }

    pub fn create_field_definition(
        &mut self,
        attrs: &mut Attrs,
    ) -> Result<FieldDefinition, LiftError> {
        // Older producers used `tag` instead of `name` here.
        let name = match attrs.take("name").or_else(|| attrs.take("tag")) {
            Some(name) => name,
            None => return Err(LiftError::missing_attribute("'name' on <field-definition>")),
        };
        let mut def = FieldDefinition::new(name);
        if let Some(raw) = attrs.take("type") {
            match FieldType::from_keyword(&raw) {
                Some(ty) => def.set_value_type(ty),
                None => warn!(name = %def.name, value_type = %raw, "unknown field-definition type"),
            }
        }
        if let Some(class) = attrs.take("class") {
            for keyword in class.split_whitespace() {
                match FieldTarget::from_keyword(keyword) {
                    Some(target) => def.applies_to.push(target),
                    None => warn!(name = %def.name, target = keyword, "unknown field-definition target"),
                }
            }
        }
        def.option_range = attrs.take("option-range");
        Ok(def)
    }

    // ------------------------------------------------------------------
    // Attachment
    // ------------------------------------------------------------------

    /// Attach a finished child to its parent via the matching add-operation.
    ///
    /// `tag` is the element that just closed; it disambiguates the reversal
    /// chain case (`main` attaches to the enclosing reversal, `reversal` to
    /// the sense). Parent-type validity was already checked when the child's
    /// opening tag was dispatched, so a mismatch here means the event
    /// sequence itself is inconsistent.
    pub(crate) fn attach(
        &mut self,
        child: Node,
        parent: Option<&mut Node>,
        dict: &mut Dictionary,
        tag: &str,
    ) -> Result<(), LiftError> {
        let context = parent
            .as_deref()
            .map_or_else(|| "document root".to_string(), |p| p.describe());
        match (child, parent) {
            (Node::Entry(entry), None) => dict.entries.push(entry),
            (Node::Header(header), None) => dict.header = header,
            (Node::Sense(sense), Some(Node::Entry(e))) => e.senses.push(sense),
            (Node::Sense(sense), Some(Node::Sense(s))) => s.subsenses.push(sense),
            (Node::Example(example), Some(Node::Sense(s))) => s.examples.push(example),
            (Node::Variant(variant), Some(Node::Entry(e))) => e.variants.push(variant),
            (Node::Pronunciation(p), Some(Node::Entry(e))) => e.add_pronunciation(p),
            (Node::Pronunciation(p), Some(Node::Variant(v))) => v.add_pronunciation(p),
            (Node::Media(media), Some(Node::Pronunciation(p))) => p.media.push(media),
            (Node::Etymology(etymology), Some(Node::Entry(e))) => e.etymologies.push(etymology),
            (Node::Relation(r), Some(Node::Entry(e))) => e.add_relation(r),
            (Node::Relation(r), Some(Node::Sense(s))) => s.add_relation(r),
            (Node::Relation(r), Some(Node::Variant(v))) => v.add_relation(r),
            (Node::Note(n), Some(Node::Entry(e))) => e.add_note(n)?,
            (Node::Note(n), Some(Node::Sense(s))) => s.add_note(n)?,
            (Node::Note(n), Some(Node::Example(x))) => x.add_note(n)?,
            (Node::Field(f), Some(Node::Entry(e))) => e.add_field(f)?,
            (Node::Field(f), Some(Node::Sense(s))) => s.add_field(f)?,
            (Node::Field(f), Some(Node::Example(x))) => x.add_field(f)?,
            (Node::Field(f), Some(Node::Variant(v))) => v.add_field(f)?,
            (Node::Field(f), Some(Node::Etymology(e))) => e.add_field(f)?,
            (Node::Field(f), Some(Node::Relation(r))) => r.add_field(f)?,
            (Node::Field(f), Some(Node::Note(n))) => n.add_field(f)?,
            (Node::Field(f), Some(Node::RangeElement(el))) => el.add_field(f)?,
            (Node::Trait(t), Some(Node::Entry(e))) => e.add_trait(t),
            (Node::Trait(t), Some(Node::Sense(s))) => s.add_trait(t),
            (Node::Trait(t), Some(Node::Example(x))) => x.add_trait(t),
            (Node::Trait(t), Some(Node::Variant(v))) => v.add_trait(t),
            (Node::Trait(t), Some(Node::Etymology(e))) => e.add_trait(t),
            (Node::Trait(t), Some(Node::Relation(r))) => r.add_trait(t),
            (Node::Trait(t), Some(Node::Note(n))) => n.add_trait(t),
            (Node::Trait(t), Some(Node::Field(f))) => f.add_trait(t),
            (Node::Trait(t), Some(Node::RangeElement(el))) => el.add_trait(t),
            (Node::Annotation(a), Some(Node::Entry(e))) => e.add_annotation(a),
            (Node::Annotation(a), Some(Node::Sense(s))) => s.add_annotation(a),
            (Node::Annotation(a), Some(Node::Example(x))) => x.add_annotation(a),
            (Node::Annotation(a), Some(Node::Variant(v))) => v.add_annotation(a),
            (Node::Annotation(a), Some(Node::Etymology(e))) => e.add_annotation(a),
            (Node::Annotation(a), Some(Node::Relation(r))) => r.add_annotation(a),
            (Node::Annotation(a), Some(Node::Note(n))) => n.add_annotation(a),
            (Node::Annotation(a), Some(Node::Field(f))) => f.add_annotation(a),
            (Node::Annotation(a), Some(Node::Trait(t))) => t.add_annotation(a),
            (Node::Annotation(a), Some(Node::RangeElement(el))) => el.add_annotation(a),
            (Node::Reversal(r), Some(Node::Reversal(outer))) if tag == "main" => {
                outer.main = Some(Box::new(r));
            }
            (Node::Reversal(r), Some(Node::Sense(s))) => s.reversals.push(r),
            (Node::Illustration(i), Some(Node::Sense(s))) => s.illustrations.push(i),
            (Node::Range(range), Some(Node::Header(h))) => h.ranges.push(range),
            (Node::RangeElement(el), Some(Node::Range(r))) => r.elements.push(el),
            (Node::FieldDefinition(def), Some(Node::Header(h))) => h.field_definitions.push(def),
            _ => return Err(LiftError::unexpected(tag, context)),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Finalize
    // ------------------------------------------------------------------

    /// The post-parse pass: id backfill, reference resolution, and
    /// field-definition classification.
    pub fn finalize(self, dict: &mut Dictionary) -> Result<(), LiftError> {
        fn backfill(sense: &mut Sense) {
            if sense.guid.is_none() {
                sense.guid = Some(Uuid::new_v4().to_string());
            }
            for sub in &mut sense.subsenses {
                backfill(sub);
            }
        }
        for entry in &mut dict.entries {
            if entry.guid.is_none() {
                entry.guid = Some(Uuid::new_v4().to_string());
            }
            for sense in &mut entry.senses {
                backfill(sense);
            }
        }

        for pending in &self.pending_refs {
            if !self.seen_entry_ids.contains(&pending.refid) {
                return Err(LiftError::unresolved(&pending.refid, &pending.context));
            }
        }

        // Classify field definitions that declared no value type by scanning
        // the trait and field names the document actually uses.
        let trait_names = dict.trait_names();
        let field_names = dict.field_names();
        for def in &mut dict.header.field_definitions {
            if def.kind != FieldKind::Unknown {
                continue;
            }
            if trait_names.contains(def.name.as_str()) {
                def.kind = FieldKind::Trait;
            } else if field_names.contains(def.name.as_str()) {
                def.kind = FieldKind::Field;
            } else {
                warn!(name = %def.name, "field-definition matches no used trait or field");
            }
        }

        for def in &dict.header.field_definitions {
            if let Some(range_id) = &def.option_range {
                if dict.range(range_id).is_none() {
                    warn!(
                        name = %def.name,
                        range = %range_id,
                        "field-definition names a range not declared in this document"
                    );
                }
            }
        }

        debug!(
            entries = self.counters.entries,
            senses = self.counters.senses,
            examples = self.counters.examples,
            variants = self.counters.variants,
            relations = self.counters.relations,
            etymologies = self.counters.etymologies,
            notes = self.counters.notes,
            fields = self.counters.fields,
            traits = self.counters.traits,
            "finalized LIFT document"
        );
        Ok(())
    }
}
