//! LIFT document writer.
//!
//! A fixed depth-first walk of the dictionary, one element per entity,
//! attributes before children, in a stable order so that load → save →
//! load preserves every field the model understands. The shared
//! note/field/trait/annotation helpers are reused by every extensible
//! entity, so inherited properties serialize identically everywhere.
//!
//! Span trees are emitted through the tree's markup rendering as the raw
//! body of the `text` element: the markup is pre-escaped by the span
//! renderer, and writing it as a single text event keeps the indenting
//! writer from injecting whitespace into mixed content.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::error::LiftError;
use crate::model::{
    Annotation, Dictionary, Entry, Etymology, Example, Field, FieldDefinition, GrammaticalInfo,
    Header, Illustration, Media, Note, Pronunciation, Range, RangeElement, Relation, Reversal,
    Sense, Trait, Variant,
};
use crate::text::{Form, MultiText};

/// Default version attribute written when a dictionary was built in memory
/// rather than loaded.
const DEFAULT_VERSION: &str = "0.13";

type XmlWriter<'a> = Writer<&'a mut Cursor<Vec<u8>>>;

/// LIFT document writer.
pub struct LiftWriter;

impl LiftWriter {
    /// Serialize a dictionary to UTF-8 LIFT bytes.
    pub fn write(dict: &Dictionary) -> Result<Vec<u8>, LiftError> {
        let mut buffer = Cursor::new(Vec::new());
        let mut w = Writer::new_with_indent(&mut buffer, b' ', 2);

        emit(
            &mut w,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut lift = BytesStart::new("lift");
        lift.push_attribute((
            "version",
            dict.version.as_deref().unwrap_or(DEFAULT_VERSION),
        ));
        if let Some(producer) = &dict.producer {
            lift.push_attribute(("producer", producer.as_str()));
        }
        emit(&mut w, Event::Start(lift))?;

        if !dict.header.is_empty() {
            write_header(&mut w, &dict.header)?;
        }
        for entry in &dict.entries {
            write_entry(&mut w, entry)?;
        }

        emit(&mut w, Event::End(BytesEnd::new("lift")))?;

        let mut output = buffer.into_inner();
        output.push(b'\n');
        debug!(
            bytes = output.len(),
            entries = dict.entry_count(),
            "serialized LIFT document"
        );
        Ok(output)
    }
}

fn emit(w: &mut XmlWriter<'_>, event: Event<'_>) -> Result<(), LiftError> {
    w.write_event(event)
        .map_err(|e| LiftError::xml(format!("Write error: {e}")))
}

fn push_opt(elem: &mut BytesStart<'_>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        elem.push_attribute((name, value));
    }
}

fn push_opt_u32(elem: &mut BytesStart<'_>, name: &str, value: Option<u32>) {
    if let Some(value) = value {
        elem.push_attribute((name, value.to_string().as_str()));
    }
}

// ----------------------------------------------------------------------
// Text subsystem
// ----------------------------------------------------------------------

fn write_form(w: &mut XmlWriter<'_>, tag: &str, form: &Form) -> Result<(), LiftError> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("lang", form.lang()));

    if form.is_empty() && form.annotations().is_empty() {
        emit(w, Event::Start(start))?;
        emit(w, Event::Empty(BytesStart::new("text")))?;
        emit(w, Event::End(BytesEnd::new(tag)))?;
        return Ok(());
    }

    emit(w, Event::Start(start))?;
    if form.is_empty() {
        emit(w, Event::Empty(BytesStart::new("text")))?;
    } else {
        emit(w, Event::Start(BytesStart::new("text")))?;
        // The markup rendering is already escaped; pass it through raw.
        emit(w, Event::Text(BytesText::from_escaped(form.markup())))?;
        emit(w, Event::End(BytesEnd::new("text")))?;
    }
    for annotation in form.annotations() {
        write_annotation(w, annotation)?;
    }
    emit(w, Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// One `form` child per language, directly inside the current element.
fn write_forms(w: &mut XmlWriter<'_>, mt: &MultiText) -> Result<(), LiftError> {
    for form in mt.forms() {
        write_form(w, "form", form)?;
    }
    Ok(())
}

/// A wrapper element holding one `form` per language; skipped entirely
/// when the multitext is empty.
fn write_multitext(w: &mut XmlWriter<'_>, tag: &str, mt: &MultiText) -> Result<(), LiftError> {
    if mt.is_empty() {
        return Ok(());
    }
    emit(w, Event::Start(BytesStart::new(tag)))?;
    write_forms(w, mt)?;
    emit(w, Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// One `gloss` element per language (glosses are form-shaped, unwrapped).
fn write_glosses(w: &mut XmlWriter<'_>, mt: &MultiText) -> Result<(), LiftError> {
    for form in mt.forms() {
        write_form(w, "gloss", form)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Shared extensible block
// ----------------------------------------------------------------------

fn write_annotation(w: &mut XmlWriter<'_>, annotation: &Annotation) -> Result<(), LiftError> {
    let mut start = BytesStart::new("annotation");
    start.push_attribute(("name", annotation.name()));
    push_opt(&mut start, "value", annotation.value.as_deref());
    push_opt(&mut start, "who", annotation.who.as_deref());
    push_opt(&mut start, "when", annotation.when.as_deref());
    if annotation.content.is_empty() {
        emit(w, Event::Empty(start))?;
    } else {
        emit(w, Event::Start(start))?;
        write_forms(w, &annotation.content)?;
        emit(w, Event::End(BytesEnd::new("annotation")))?;
    }
    Ok(())
}

fn write_annotations(w: &mut XmlWriter<'_>, annotations: &[Annotation]) -> Result<(), LiftError> {
    for annotation in annotations {
        write_annotation(w, annotation)?;
    }
    Ok(())
}

fn write_trait(w: &mut XmlWriter<'_>, t: &Trait) -> Result<(), LiftError> {
    let mut start = BytesStart::new("trait");
    start.push_attribute(("name", t.name()));
    start.push_attribute(("value", t.value()));
    if t.annotations.is_empty() {
        emit(w, Event::Empty(start))?;
    } else {
        emit(w, Event::Start(start))?;
        write_annotations(w, &t.annotations)?;
        emit(w, Event::End(BytesEnd::new("trait")))?;
    }
    Ok(())
}

fn write_traits(w: &mut XmlWriter<'_>, traits: &[Trait]) -> Result<(), LiftError> {
    for t in traits {
        write_trait(w, t)?;
    }
    Ok(())
}

fn write_field(w: &mut XmlWriter<'_>, field: &Field) -> Result<(), LiftError> {
    let mut start = BytesStart::new("field");
    start.push_attribute(("name", field.name()));
    push_opt(&mut start, "dateCreated", field.date_created.as_deref());
    push_opt(&mut start, "dateModified", field.date_modified.as_deref());
    emit(w, Event::Start(start))?;
    write_forms(w, &field.content)?;
    write_traits(w, &field.traits)?;
    write_annotations(w, &field.annotations)?;
    emit(w, Event::End(BytesEnd::new("field")))?;
    Ok(())
}

fn write_fields(w: &mut XmlWriter<'_>, fields: &[Field]) -> Result<(), LiftError> {
    for field in fields {
        write_field(w, field)?;
    }
    Ok(())
}

fn write_note(w: &mut XmlWriter<'_>, note: &Note) -> Result<(), LiftError> {
    let mut start = BytesStart::new("note");
    if !note.note_type().is_empty() {
        start.push_attribute(("type", note.note_type()));
    }
    push_opt(&mut start, "dateCreated", note.date_created.as_deref());
    push_opt(&mut start, "dateModified", note.date_modified.as_deref());
    emit(w, Event::Start(start))?;
    write_forms(w, &note.content)?;
    write_fields(w, &note.fields)?;
    write_traits(w, &note.traits)?;
    write_annotations(w, &note.annotations)?;
    emit(w, Event::End(BytesEnd::new("note")))?;
    Ok(())
}

fn write_notes(w: &mut XmlWriter<'_>, notes: &[Note]) -> Result<(), LiftError> {
    for note in notes {
        write_note(w, note)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Entities
// ----------------------------------------------------------------------

fn write_entry(w: &mut XmlWriter<'_>, entry: &Entry) -> Result<(), LiftError> {
    let mut start = BytesStart::new("entry");
    push_opt(&mut start, "id", entry.id.as_deref());
    push_opt(&mut start, "guid", entry.guid.as_deref());
    push_opt_u32(&mut start, "order", entry.order);
    push_opt(&mut start, "dateCreated", entry.date_created.as_deref());
    push_opt(&mut start, "dateModified", entry.date_modified.as_deref());
    push_opt(&mut start, "dateDeleted", entry.date_deleted.as_deref());
    emit(w, Event::Start(start))?;

    write_multitext(w, "lexical-unit", &entry.lexical_unit)?;
    write_multitext(w, "citation", &entry.citations)?;
    for pronunciation in &entry.pronunciations {
        write_pronunciation(w, pronunciation)?;
    }
    for variant in &entry.variants {
        write_variant(w, variant)?;
    }
    for sense in &entry.senses {
        write_sense(w, "sense", sense)?;
    }
    for relation in &entry.relations {
        write_relation(w, relation)?;
    }
    for etymology in &entry.etymologies {
        write_etymology(w, etymology)?;
    }
    write_notes(w, &entry.notes)?;
    write_fields(w, &entry.fields)?;
    write_traits(w, &entry.traits)?;
    write_annotations(w, &entry.annotations)?;

    emit(w, Event::End(BytesEnd::new("entry")))?;
    Ok(())
}

fn write_grammatical_info(w: &mut XmlWriter<'_>, gi: &GrammaticalInfo) -> Result<(), LiftError> {
    let mut start = BytesStart::new("grammatical-info");
    start.push_attribute(("value", gi.value.as_str()));
    if gi.traits.is_empty() {
        emit(w, Event::Empty(start))?;
    } else {
        emit(w, Event::Start(start))?;
        write_traits(w, &gi.traits)?;
        emit(w, Event::End(BytesEnd::new("grammatical-info")))?;
    }
    Ok(())
}

fn write_sense(w: &mut XmlWriter<'_>, tag: &str, sense: &Sense) -> Result<(), LiftError> {
    let mut start = BytesStart::new(tag);
    push_opt(&mut start, "id", sense.id.as_deref());
    push_opt(&mut start, "guid", sense.guid.as_deref());
    push_opt_u32(&mut start, "order", sense.order);
    push_opt(&mut start, "dateCreated", sense.date_created.as_deref());
    push_opt(&mut start, "dateModified", sense.date_modified.as_deref());
    emit(w, Event::Start(start))?;

    if let Some(gi) = &sense.grammatical_info {
        write_grammatical_info(w, gi)?;
    }
    write_glosses(w, &sense.gloss)?;
    write_multitext(w, "definition", &sense.definition)?;
    for relation in &sense.relations {
        write_relation(w, relation)?;
    }
    for example in &sense.examples {
        write_example(w, example)?;
    }
    for reversal in &sense.reversals {
        write_reversal(w, "reversal", reversal)?;
    }
    for illustration in &sense.illustrations {
        write_illustration(w, illustration)?;
    }
    for subsense in &sense.subsenses {
        write_sense(w, "subsense", subsense)?;
    }
    write_notes(w, &sense.notes)?;
    write_fields(w, &sense.fields)?;
    write_traits(w, &sense.traits)?;
    write_annotations(w, &sense.annotations)?;

    emit(w, Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_example(w: &mut XmlWriter<'_>, example: &Example) -> Result<(), LiftError> {
    let mut start = BytesStart::new("example");
    push_opt(&mut start, "source", example.source.as_deref());
    push_opt(&mut start, "dateCreated", example.date_created.as_deref());
    push_opt(&mut start, "dateModified", example.date_modified.as_deref());
    emit(w, Event::Start(start))?;

    write_forms(w, &example.content)?;
    for (ty, mt) in example.translations() {
        let mut translation = BytesStart::new("translation");
        if !ty.is_empty() {
            translation.push_attribute(("type", ty));
        }
        emit(w, Event::Start(translation))?;
        write_forms(w, mt)?;
        emit(w, Event::End(BytesEnd::new("translation")))?;
    }
    write_notes(w, &example.notes)?;
    write_fields(w, &example.fields)?;
    write_traits(w, &example.traits)?;
    write_annotations(w, &example.annotations)?;

    emit(w, Event::End(BytesEnd::new("example")))?;
    Ok(())
}

fn write_variant(w: &mut XmlWriter<'_>, variant: &Variant) -> Result<(), LiftError> {
    let mut start = BytesStart::new("variant");
    push_opt(&mut start, "ref", variant.ref_id.as_deref());
    emit(w, Event::Start(start))?;

    write_forms(w, &variant.forms)?;
    for pronunciation in &variant.pronunciations {
        write_pronunciation(w, pronunciation)?;
    }
    for relation in &variant.relations {
        write_relation(w, relation)?;
    }
    write_fields(w, &variant.fields)?;
    write_traits(w, &variant.traits)?;
    write_annotations(w, &variant.annotations)?;

    emit(w, Event::End(BytesEnd::new("variant")))?;
    Ok(())
}

fn write_pronunciation(w: &mut XmlWriter<'_>, p: &Pronunciation) -> Result<(), LiftError> {
    emit(w, Event::Start(BytesStart::new("pronunciation")))?;
    write_forms(w, &p.forms)?;
    for media in &p.media {
        write_media(w, media)?;
    }
    emit(w, Event::End(BytesEnd::new("pronunciation")))?;
    Ok(())
}

fn write_media(w: &mut XmlWriter<'_>, media: &Media) -> Result<(), LiftError> {
    let mut start = BytesStart::new("media");
    start.push_attribute(("href", media.href.as_str()));
    if media.label.is_empty() {
        emit(w, Event::Empty(start))?;
    } else {
        emit(w, Event::Start(start))?;
        write_multitext(w, "label", &media.label)?;
        emit(w, Event::End(BytesEnd::new("media")))?;
    }
    Ok(())
}

fn write_illustration(w: &mut XmlWriter<'_>, illustration: &Illustration) -> Result<(), LiftError> {
    let mut start = BytesStart::new("illustration");
    start.push_attribute(("href", illustration.href.as_str()));
    if illustration.label.is_empty() {
        emit(w, Event::Empty(start))?;
    } else {
        emit(w, Event::Start(start))?;
        write_multitext(w, "label", &illustration.label)?;
        emit(w, Event::End(BytesEnd::new("illustration")))?;
    }
    Ok(())
}

fn write_etymology(w: &mut XmlWriter<'_>, etymology: &Etymology) -> Result<(), LiftError> {
    let mut start = BytesStart::new("etymology");
    start.push_attribute(("type", etymology.etym_type.as_str()));
    start.push_attribute(("source", etymology.source.as_str()));
    emit(w, Event::Start(start))?;

    write_forms(w, &etymology.forms)?;
    write_glosses(w, &etymology.glosses)?;
    write_fields(w, &etymology.fields)?;
    write_traits(w, &etymology.traits)?;
    write_annotations(w, &etymology.annotations)?;

    emit(w, Event::End(BytesEnd::new("etymology")))?;
    Ok(())
}

fn write_relation(w: &mut XmlWriter<'_>, relation: &Relation) -> Result<(), LiftError> {
    let mut start = BytesStart::new("relation");
    start.push_attribute(("type", relation.rel_type.as_str()));
    push_opt(&mut start, "ref", relation.ref_id.as_deref());
    push_opt_u32(&mut start, "order", relation.order);

    let bare = relation.usage.is_empty()
        && relation.fields.is_empty()
        && relation.traits.is_empty()
        && relation.annotations.is_empty();
    if bare {
        emit(w, Event::Empty(start))?;
        return Ok(());
    }

    emit(w, Event::Start(start))?;
    write_multitext(w, "usage", &relation.usage)?;
    write_fields(w, &relation.fields)?;
    write_traits(w, &relation.traits)?;
    write_annotations(w, &relation.annotations)?;
    emit(w, Event::End(BytesEnd::new("relation")))?;
    Ok(())
}

fn write_reversal(w: &mut XmlWriter<'_>, tag: &str, reversal: &Reversal) -> Result<(), LiftError> {
    let mut start = BytesStart::new(tag);
    push_opt(&mut start, "type", reversal.rev_type.as_deref());
    emit(w, Event::Start(start))?;

    write_forms(w, &reversal.forms)?;
    if let Some(main) = &reversal.main {
        write_reversal(w, "main", main)?;
    }
    if let Some(gi) = &reversal.grammatical_info {
        write_grammatical_info(w, gi)?;
    }

    emit(w, Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

// ----------------------------------------------------------------------
// Header
// ----------------------------------------------------------------------

fn write_header(w: &mut XmlWriter<'_>, header: &Header) -> Result<(), LiftError> {
    emit(w, Event::Start(BytesStart::new("header")))?;

    write_multitext(w, "description", &header.description)?;
    if !header.ranges.is_empty() {
        emit(w, Event::Start(BytesStart::new("ranges")))?;
        for range in &header.ranges {
            write_range(w, range)?;
        }
        emit(w, Event::End(BytesEnd::new("ranges")))?;
    }
    if !header.field_definitions.is_empty() {
        emit(w, Event::Start(BytesStart::new("fields")))?;
        for def in &header.field_definitions {
            write_field_definition(w, def)?;
        }
        emit(w, Event::End(BytesEnd::new("fields")))?;
    }

    emit(w, Event::End(BytesEnd::new("header")))?;
    Ok(())
}

fn write_range(w: &mut XmlWriter<'_>, range: &Range) -> Result<(), LiftError> {
    let mut start = BytesStart::new("range");
    start.push_attribute(("id", range.id.as_str()));
    push_opt(&mut start, "href", range.href.as_deref());
    push_opt(&mut start, "guid", range.guid.as_deref());

    let bare = range.label.is_empty()
        && range.abbreviation.is_empty()
        && range.description.is_empty()
        && range.elements.is_empty();
    if bare {
        emit(w, Event::Empty(start))?;
        return Ok(());
    }

    emit(w, Event::Start(start))?;
    write_multitext(w, "label", &range.label)?;
    write_multitext(w, "abbrev", &range.abbreviation)?;
    write_multitext(w, "description", &range.description)?;
    for element in &range.elements {
        write_range_element(w, element)?;
    }
    emit(w, Event::End(BytesEnd::new("range")))?;
    Ok(())
}

fn write_range_element(w: &mut XmlWriter<'_>, element: &RangeElement) -> Result<(), LiftError> {
    let mut start = BytesStart::new("range-element");
    start.push_attribute(("id", element.id.as_str()));
    push_opt(&mut start, "parent", element.parent.as_deref());
    emit(w, Event::Start(start))?;

    write_multitext(w, "label", &element.label)?;
    write_multitext(w, "abbrev", &element.abbreviation)?;
    write_multitext(w, "description", &element.description)?;
    write_fields(w, &element.fields)?;
    write_traits(w, &element.traits)?;
    write_annotations(w, &element.annotations)?;

    emit(w, Event::End(BytesEnd::new("range-element")))?;
    Ok(())
}

fn write_field_definition(w: &mut XmlWriter<'_>, def: &FieldDefinition) -> Result<(), LiftError> {
    let mut start = BytesStart::new("field-definition");
    start.push_attribute(("name", def.name.as_str()));
    if let Some(ty) = def.value_type {
        start.push_attribute(("type", ty.as_keyword()));
    }
    if !def.applies_to.is_empty() {
        let class = def
            .applies_to
            .iter()
            .map(|t| t.as_keyword())
            .collect::<Vec<_>>()
            .join(" ");
        start.push_attribute(("class", class.as_str()));
    }
    push_opt(&mut start, "option-range", def.option_range.as_deref());
    emit(w, Event::Empty(start))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Form;

    fn text_of(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn empty_dictionary_has_root_and_version() {
        let out = LiftWriter::write(&Dictionary::new()).unwrap();
        let text = text_of(&out);
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<lift version=\"0.13\""));
        assert!(text.ends_with("</lift>\n"));
    }

    #[test]
    fn span_markup_is_inline_in_text_body() {
        let mut dict = Dictionary::new();
        let mut entry = Entry::new();
        let mut form = Form::new("fr");
        let _ = form
            .root_mut()
            .push_child(crate::text::Span::text("Bonjour "));
        let mut inner = crate::text::Span::node();
        inner.set_lang("en");
        let _ = inner.push_child(crate::text::Span::text("Hello"));
        let _ = form.root_mut().push_child(inner);
        entry.lexical_unit.add_form(form).unwrap();
        dict.entries.push(entry);

        let text = text_of(&LiftWriter::write(&dict).unwrap());
        assert!(text.contains(r#"<text>Bonjour <span lang="en">Hello</span></text>"#));
    }

    #[test]
    fn note_with_empty_type_omits_the_attribute() {
        let mut dict = Dictionary::new();
        let mut entry = Entry::new();
        entry.notes.push(Note::new(""));
        dict.entries.push(entry);
        let text = text_of(&LiftWriter::write(&dict).unwrap());
        assert!(text.contains("<note>"));
        assert!(!text.contains("<note type"));
    }

    #[test]
    fn relation_without_children_is_self_closing() {
        let mut dict = Dictionary::new();
        let mut entry = Entry::new();
        let mut relation = Relation::new("synonym");
        relation.ref_id = Some("other".into());
        entry.relations.push(relation);
        dict.entries.push(entry);
        let text = text_of(&LiftWriter::write(&dict).unwrap());
        assert!(text.contains(r#"<relation type="synonym" ref="other"/>"#));
    }
}
