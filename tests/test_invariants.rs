//! Structural, grammar, and reference-integrity violations must fail the
//! whole load with a typed, descriptive error.

use liftlex::{LiftError, load_bytes};
use rstest::rstest;

fn doc(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<lift version=\"0.13\">\n{body}\n</lift>\n"
    )
}

#[test]
fn duplicate_entry_id_fails_with_duplicate_error() {
    let input = doc(r#"<entry id="e1"/><entry id="e1"/>"#);
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::DuplicateId(_)));
    assert!(err.to_string().contains("Duplicate"));
    assert!(err.to_string().contains("e1"));
}

#[test]
fn duplicate_sense_id_fails_like_entry_ids() {
    let input = doc(
        r#"<entry id="e1"><sense id="s1"/><sense id="s1"/></entry>"#,
    );
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::DuplicateId(_)));
}

#[test]
fn duplicate_language_in_one_multitext_fails() {
    let input = doc(
        r#"<entry id="e1">
  <lexical-unit>
    <form lang="en"><text>cat</text></form>
    <form lang="en"><text>feline</text></form>
  </lexical-unit>
</entry>"#,
    );
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::DuplicateLanguage { .. }));
}

#[test]
fn duplicate_note_type_fails() {
    let input = doc(
        r#"<entry id="e1">
  <note type="usage"><form lang="en"><text>a</text></form></note>
  <note type="usage"><form lang="en"><text>b</text></form></note>
</entry>"#,
    );
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::DuplicateType { .. }));
}

#[test]
fn duplicate_field_name_fails() {
    let input = doc(
        r#"<entry id="e1">
  <field name="summary"><form lang="en"><text>a</text></form></field>
  <field name="summary"><form lang="en"><text>b</text></form></field>
</entry>"#,
    );
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::DuplicateType { .. }));
    assert!(err.to_string().contains("summary"));
}

#[test]
fn duplicate_translation_type_fails() {
    let input = doc(
        r#"<entry id="e1"><sense>
  <example>
    <form lang="seh"><text>x</text></form>
    <translation><form lang="en"><text>a</text></form></translation>
    <translation><form lang="en"><text>b</text></form></translation>
  </example>
</sense></entry>"#,
    );
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::DuplicateType { .. }));
}

#[test]
fn unresolved_variant_ref_fails_at_finalize() {
    let input = doc(r#"<entry id="e1"><variant ref="nowhere"/></entry>"#);
    let err = load_bytes(input.as_bytes()).unwrap_err();
    match err {
        LiftError::UnresolvedReference { refid, .. } => assert_eq!(refid, "nowhere"),
        other => panic!("expected UnresolvedReference, got {other}"),
    }
}

#[test]
fn unresolved_relation_ref_fails_at_finalize() {
    let input = doc(
        r#"<entry id="e1"><sense><relation type="synonym" ref="ghost"/></sense></entry>"#,
    );
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::UnresolvedReference { .. }));
}

#[test]
fn forward_and_backward_references_resolve() {
    let input = doc(
        r#"<entry id="a"><relation type="see" ref="b"/></entry>
<entry id="b"><variant ref="a"/></entry>"#,
    );
    assert!(load_bytes(input.as_bytes()).is_ok());
}

#[rstest]
#[case::relation_type(r#"<entry id="e1"><relation ref="e1"/></entry>"#)]
#[case::etymology_type(r#"<entry id="e1"><etymology source="latin"/></entry>"#)]
#[case::etymology_source(r#"<entry id="e1"><etymology type="borrowed"/></entry>"#)]
#[case::trait_value(r#"<entry id="e1"><trait name="morph-type"/></entry>"#)]
#[case::annotation_name(r#"<entry id="e1"><annotation value="x"/></entry>"#)]
#[case::media_href(r#"<entry id="e1"><pronunciation><media/></pronunciation></entry>"#)]
fn missing_required_attribute_fails(#[case] body: &str) {
    let input = doc(body);
    let err = load_bytes(input.as_bytes()).unwrap_err();
    assert!(matches!(err, LiftError::Missing { .. }), "got {err}");
}

#[rstest]
#[case::etymology_in_sense(
    r#"<entry id="e1"><sense><etymology type="t" source="s"/></sense></entry>"#,
    "etymology"
)]
#[case::relation_in_example(
    r#"<entry id="e1"><sense><example><relation type="syn"/></example></sense></entry>"#,
    "relation"
)]
#[case::sense_in_header(r#"<header><sense/></header>"#, "sense")]
#[case::unknown_element(r#"<entry id="e1"><wibble/></entry>"#, "wibble")]
fn element_in_unsupported_context_fails(#[case] body: &str, #[case] tag: &str) {
    let input = doc(body);
    let err = load_bytes(input.as_bytes()).unwrap_err();
    match err {
        LiftError::UnexpectedElement { tag: t, context } => {
            assert_eq!(t, tag);
            assert!(!context.is_empty());
        }
        other => panic!("expected UnexpectedElement, got {other}"),
    }
}

#[test]
fn error_names_the_offending_tag_and_parent() {
    let input = doc(r#"<entry id="cat_1"><sense><variant/></sense></entry>"#);
    let err = load_bytes(input.as_bytes()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("<variant>"));
    assert!(message.contains("sense"));
}

#[test]
fn truncated_document_fails() {
    let input = r#"<?xml version="1.0"?><lift version="0.13"><entry id="e1">"#;
    assert!(load_bytes(input.as_bytes()).is_err());
}

#[test]
fn non_xml_input_fails() {
    assert!(load_bytes(b"not xml at all").is_err());
}
