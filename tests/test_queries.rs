//! Read-only analytic queries over a loaded dictionary.

use liftlex::load_bytes;

const QUERY_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lift version="0.13" producer="liftlex tests">
  <entry id="nyoka_1">
    <lexical-unit>
      <form lang="seh"><text>nyoka</text></form>
    </lexical-unit>
    <trait name="morph-type" value="stem"/>
    <sense id="nyoka_1-s1">
      <grammatical-info value="Noun"/>
      <gloss lang="en"><text>snake</text></gloss>
      <example>
        <form lang="seh"><text>Nyoka <span lang="la">serpens</span> yathawa.</text></form>
        <translation type="Free translation">
          <form lang="en"><text>The snake fled.</text></form>
        </translation>
        <translation type="Back translation">
          <form lang="pt"><text>A cobra fugiu.</text></form>
        </translation>
      </example>
      <trait name="status" value="confirmed"/>
    </sense>
  </entry>
  <entry id="mango_1">
    <lexical-unit>
      <form lang="seh"><text>mango</text></form>
      <form lang="seh-fonipa"><text>mangɔ</text></form>
    </lexical-unit>
    <field name="summary"><form lang="en"><text>fruit</text></form></field>
    <trait name="morph-type" value="stem"/>
    <sense>
      <grammatical-info value="Noun"/>
      <gloss lang="en"><text>mango</text></gloss>
      <subsense>
        <grammatical-info value="Verb"/>
        <gloss lang="en"><text>to mango</text></gloss>
      </subsense>
    </sense>
  </entry>
  <entry id="kufamba_1">
    <lexical-unit>
      <form lang="seh"><text>kufamba</text></form>
    </lexical-unit>
    <trait name="morph-type" value="phrase"/>
  </entry>
</lift>
"#;

#[test]
fn entry_count() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    assert_eq!(dict.entry_count(), 3);
}

#[test]
fn lexical_languages_cover_lexical_unit_forms_only() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let langs = dict.lexical_languages();
    assert_eq!(langs.len(), 2);
    assert!(langs.contains("seh"));
    assert!(langs.contains("seh-fonipa"));
    // English appears only in glosses/translations.
    assert!(!langs.contains("en"));
}

#[test]
fn grammatical_info_counts_include_subsenses() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let counts = dict.grammatical_info_counts();
    assert_eq!(counts.get("Noun"), Some(&2));
    assert_eq!(counts.get("Verb"), Some(&1));
}

#[test]
fn trait_names_and_value_histogram() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let names = dict.trait_names();
    assert!(names.contains("morph-type"));
    assert!(names.contains("status"));

    let histogram = dict.trait_value_counts("morph-type");
    assert_eq!(histogram.get("stem"), Some(&2));
    assert_eq!(histogram.get("phrase"), Some(&1));
    assert!(dict.trait_value_counts("no-such-trait").is_empty());
}

#[test]
fn field_names() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let names = dict.field_names();
    assert_eq!(names.len(), 1);
    assert!(names.contains("summary"));
}

#[test]
fn translation_types_in_use() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let types = dict.translation_types();
    assert_eq!(types.len(), 2);
    assert!(types.contains("Free translation"));
    assert!(types.contains("Back translation"));
}

#[test]
fn all_languages_include_span_languages() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let langs = dict.all_languages();
    for lang in ["seh", "seh-fonipa", "en", "pt", "la"] {
        assert!(langs.contains(lang), "missing {lang}");
    }
}

#[test]
fn senses_flatten_subsenses_in_document_order() {
    let dict = load_bytes(QUERY_DOC.as_bytes()).unwrap();
    let senses = dict.senses();
    assert_eq!(senses.len(), 3);
    assert_eq!(senses[0].id.as_deref(), Some("nyoka_1-s1"));
    assert_eq!(senses[2].gloss.text("en").as_deref(), Some("to mango"));
    assert!(dict.sense_by_id("nyoka_1-s1").is_some());
    assert!(dict.sense_by_id("missing").is_none());
}
