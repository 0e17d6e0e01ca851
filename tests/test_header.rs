//! Header catalogs: ranges, field definitions, and kind inference.

use liftlex::{FieldKind, FieldTarget, FieldType, load_bytes, save_bytes};

const HEADER_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lift version="0.13" producer="liftlex tests">
  <header>
    <description>
      <form lang="en"><text>Catalog test</text></form>
    </description>
    <ranges>
      <range id="semantic-domain-ddp4" href="file://sena.lift-ranges" guid="7bb51a4e-9d14-4a14-a9cd-b1a225ce0e0a">
        <label><form lang="en"><text>Semantic domains</text></form></label>
      </range>
      <range id="morph-type">
        <range-element id="stem">
          <label><form lang="en"><text>stem</text></form></label>
          <abbrev><form lang="en"><text>st</text></form></abbrev>
          <trait name="leading-symbol" value=""/>
        </range-element>
        <range-element id="prefix" parent="stem">
          <label><form lang="en"><text>prefix</text></form></label>
        </range-element>
      </range>
    </ranges>
    <fields>
      <field-definition name="from-part-of-speech" type="option-collection" option-range="morph-type"/>
      <field-definition name="literal-meaning" type="multitext" class="entry sense"/>
      <field-definition name="morph-type"/>
      <field-definition name="summary"/>
      <field-definition name="orphan"/>
    </fields>
  </header>
  <entry id="e1">
    <trait name="morph-type" value="stem"/>
    <field name="summary"><form lang="en"><text>short</text></form></field>
  </entry>
</lift>
"#;

#[test]
fn declared_types_classify_immediately() {
    let dict = load_bytes(HEADER_DOC.as_bytes()).unwrap();
    let defs = &dict.header.field_definitions;
    assert_eq!(defs.len(), 5);

    let collection = dict.header.field_definition("from-part-of-speech").unwrap();
    assert_eq!(collection.value_type, Some(FieldType::OptionCollection));
    assert_eq!(collection.kind, FieldKind::Trait);
    assert_eq!(collection.option_range.as_deref(), Some("morph-type"));

    let multitext = dict.header.field_definition("literal-meaning").unwrap();
    assert_eq!(multitext.value_type, Some(FieldType::Multitext));
    assert_eq!(multitext.kind, FieldKind::Field);
    assert_eq!(
        multitext.applies_to,
        vec![FieldTarget::Entry, FieldTarget::Sense]
    );
}

#[test]
fn undeclared_types_resolve_from_document_usage() {
    let dict = load_bytes(HEADER_DOC.as_bytes()).unwrap();

    // "morph-type" is used as a trait in the document body.
    let as_trait = dict.header.field_definition("morph-type").unwrap();
    assert_eq!(as_trait.value_type, None);
    assert_eq!(as_trait.kind, FieldKind::Trait);

    // "summary" is used as a field.
    let as_field = dict.header.field_definition("summary").unwrap();
    assert_eq!(as_field.kind, FieldKind::Field);

    // "orphan" matches nothing and stays unknown.
    let orphan = dict.header.field_definition("orphan").unwrap();
    assert_eq!(orphan.kind, FieldKind::Unknown);
}

#[test]
fn ranges_round_trip() {
    let first = load_bytes(HEADER_DOC.as_bytes()).unwrap();
    let second = load_bytes(&save_bytes(&first).unwrap()).unwrap();

    let range = second.range("morph-type").unwrap();
    assert_eq!(range.elements.len(), 2);
    assert_eq!(range.elements[0].id, "stem");
    assert_eq!(range.elements[0].label.text("en").as_deref(), Some("stem"));
    assert_eq!(
        range.elements[0].abbreviation.text("en").as_deref(),
        Some("st")
    );
    assert_eq!(range.elements[1].parent.as_deref(), Some("stem"));

    let external = second.range("semantic-domain-ddp4").unwrap();
    assert_eq!(external.href.as_deref(), Some("file://sena.lift-ranges"));
    assert!(external.guid.is_some());

    assert_eq!(first, second);
}

#[test]
fn duplicate_range_id_fails() {
    let doc = r#"<?xml version="1.0"?>
<lift version="0.13">
  <header>
    <ranges><range id="r1"/><range id="r1"/></ranges>
  </header>
</lift>"#;
    let err = load_bytes(doc.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("Duplicate"));
}

#[test]
fn dangling_option_range_is_tolerated() {
    let doc = r#"<?xml version="1.0"?>
<lift version="0.13">
  <header>
    <fields>
      <field-definition name="status" type="option" option-range="not-declared-here"/>
    </fields>
  </header>
</lift>"#;
    // Range catalogs often live in external files; a dangling link keeps
    // the id and loads fine.
    let dict = load_bytes(doc.as_bytes()).unwrap();
    let def = dict.header.field_definition("status").unwrap();
    assert_eq!(def.option_range.as_deref(), Some("not-declared-here"));
    assert_eq!(def.kind, FieldKind::Trait);
}

#[test]
fn legacy_header_field_spelling_is_accepted() {
    // Older producers declared definitions as <field tag="..."> inside the
    // header's fields block.
    let doc = r#"<?xml version="1.0"?>
<lift version="0.13">
  <header>
    <fields>
      <field tag="cv-pattern"/>
    </fields>
  </header>
</lift>"#;
    let dict = load_bytes(doc.as_bytes()).unwrap();
    assert!(dict.header.field_definition("cv-pattern").is_some());
}
