//! Round-trip tests: load → save → load must preserve everything the
//! model understands.

use liftlex::model::{HasFields, HasNotes, HasTraits};
use liftlex::{Dictionary, Entry, Form, GrammaticalInfo, Sense, Trait, load_bytes, save_bytes};

const FULL_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lift version="0.13" producer="liftlex tests">
  <header>
    <description>
      <form lang="en"><text>Sena test lexicon</text></form>
    </description>
    <ranges>
      <range id="grammatical-info">
        <label><form lang="en"><text>Part of speech</text></form></label>
        <range-element id="Noun">
          <label><form lang="en"><text>Noun</text></form></label>
          <abbrev><form lang="en"><text>n</text></form></abbrev>
        </range-element>
        <range-element id="Verb" parent="Noun">
          <label><form lang="en"><text>Verb</text></form></label>
        </range-element>
      </range>
    </ranges>
    <fields>
      <field-definition name="literal-meaning" type="multitext" class="entry sense"/>
      <field-definition name="from-part-of-speech" type="option-collection" option-range="grammatical-info"/>
    </fields>
  </header>
  <entry id="nyoka_1" guid="0ae89610-0c8a-4a54-9d23-7a3a1bcb6f4e" order="1" dateCreated="2004-08-10T10:31:33Z" dateModified="2006-10-13T08:29:05Z">
    <lexical-unit>
      <form lang="seh"><text>nyoka</text></form>
    </lexical-unit>
    <citation>
      <form lang="seh"><text>nyoka</text></form>
    </citation>
    <pronunciation>
      <form lang="seh-fonipa"><text>ɲoka</text></form>
      <media href="audio/nyoka.wav">
        <label><form lang="en"><text>recording</text></form></label>
      </media>
    </pronunciation>
    <variant ref="nyokera_1">
      <form lang="seh"><text>nyokera</text></form>
      <trait name="morph-type" value="stem"/>
    </variant>
    <sense id="nyoka_1-s1" order="1">
      <grammatical-info value="Noun">
        <trait name="inflection-class" value="9/10"/>
      </grammatical-info>
      <gloss lang="en"><text>snake</text></gloss>
      <gloss lang="pt"><text>cobra</text></gloss>
      <definition>
        <form lang="en"><text>long legless reptile</text></form>
      </definition>
      <relation type="synonym" ref="nyokera_1"/>
      <example source="corpus">
        <form lang="seh"><text>Nyoka yathawa.</text></form>
        <translation type="Free translation">
          <form lang="en"><text>The snake fled.</text></form>
        </translation>
        <translation>
          <form lang="en"><text>Snake fled.</text></form>
        </translation>
      </example>
      <reversal type="en">
        <form lang="en"><text>snake</text></form>
        <main>
          <form lang="en"><text>reptile</text></form>
        </main>
      </reversal>
      <illustration href="pictures/nyoka.png">
        <label><form lang="en"><text>a snake</text></form></label>
      </illustration>
      <subsense id="nyoka_1-s1-b">
        <gloss lang="en"><text>treacherous person</text></gloss>
      </subsense>
      <note type="usage">
        <form lang="en"><text>common in rural speech</text></form>
      </note>
      <field name="literal-meaning">
        <form lang="en"><text>crawler</text></form>
      </field>
      <trait name="semantic-domain" value="1.6.1.3.4"/>
      <annotation name="reviewed" value="yes" who="ts" when="2006-10-13"/>
    </sense>
    <etymology type="proto" source="Proto-Bantu">
      <form lang="bnt"><text>*nyoka</text></form>
      <gloss lang="en"><text>snake</text></gloss>
    </etymology>
    <note>
      <form lang="en"><text>most common reptile word</text></form>
    </note>
  </entry>
  <entry id="nyokera_1">
    <lexical-unit>
      <form lang="seh"><text>nyokera</text></form>
    </lexical-unit>
  </entry>
</lift>
"#;

#[test]
fn full_document_survives_a_round_trip() {
    let first = load_bytes(FULL_DOC.as_bytes()).expect("first load");
    let bytes = save_bytes(&first).expect("save");
    let second = load_bytes(&bytes).expect("second load");

    // Spot checks with readable failures first.
    assert_eq!(second.entry_count(), first.entry_count());
    let e1 = second.entry_by_id("nyoka_1").expect("entry kept its id");
    assert_eq!(e1.lexical_unit.text("seh").as_deref(), Some("nyoka"));
    assert_eq!(e1.citations.text("seh").as_deref(), Some("nyoka"));
    assert_eq!(e1.pronunciations.len(), 1);
    assert_eq!(e1.pronunciations[0].media[0].href, "audio/nyoka.wav");
    assert_eq!(e1.variants[0].ref_id.as_deref(), Some("nyokera_1"));
    assert_eq!(e1.etymologies[0].etym_type, "proto");
    assert_eq!(e1.etymologies[0].glosses.text("en").as_deref(), Some("snake"));
    assert_eq!(e1.notes().len(), 1);

    let s1 = second.sense_by_id("nyoka_1-s1").expect("sense kept its id");
    assert_eq!(s1.gloss.text("en").as_deref(), Some("snake"));
    assert_eq!(s1.gloss.text("pt").as_deref(), Some("cobra"));
    assert_eq!(
        s1.grammatical_info.as_ref().map(|g| g.value.as_str()),
        Some("Noun")
    );
    assert_eq!(s1.examples[0].translations().count(), 2);
    assert_eq!(s1.reversals[0].chain_depth(), 2);
    assert_eq!(s1.subsenses[0].gloss.text("en").as_deref(), Some("treacherous person"));
    assert_eq!(s1.traits()[0].name(), "semantic-domain");
    assert_eq!(s1.fields()[0].name(), "literal-meaning");
    assert_eq!(s1.annotations[0].name(), "reviewed");

    // Then the strong form: the two loaded graphs are identical. The first
    // load backfilled guids; the save persisted them, so the second load
    // reproduces the graph exactly.
    assert_eq!(first, second);
}

#[test]
fn guid_backfill_is_stable_across_save_and_load() {
    let first = load_bytes(FULL_DOC.as_bytes()).unwrap();
    let e2 = first.entry_by_id("nyokera_1").unwrap();
    let generated = e2.guid.clone().expect("guid was backfilled");

    let bytes = save_bytes(&first).unwrap();
    let second = load_bytes(&bytes).unwrap();
    assert_eq!(
        second.entry_by_id("nyokera_1").unwrap().guid.as_deref(),
        Some(generated.as_str())
    );
}

#[test]
fn built_dictionary_round_trips() {
    // One entry "cat" with one sense glossed "cat" carrying a pos trait.
    let mut dict = Dictionary::new();
    let mut entry = Entry::new();
    entry.id = Some("e1".to_string());
    entry
        .lexical_unit
        .add_form(Form::with_text("en", "cat"))
        .unwrap();
    let mut sense = Sense::new();
    sense.gloss.add_form(Form::with_text("en", "cat")).unwrap();
    sense.add_trait(Trait::new("pos", "noun"));
    sense.grammatical_info = Some(GrammaticalInfo::new("Noun"));
    entry.senses.push(sense);
    dict.entries.push(entry);

    let bytes = save_bytes(&dict).unwrap();
    let loaded = load_bytes(&bytes).unwrap();

    let entry = loaded.entry_by_id("e1").expect("same id after round trip");
    assert_eq!(entry.lexical_unit.text("en").as_deref(), Some("cat"));
    let sense = &entry.senses[0];
    assert_eq!(sense.gloss.text("en").as_deref(), Some("cat"));
    assert_eq!(sense.traits().len(), 1);
    assert_eq!(
        (sense.traits()[0].name(), sense.traits()[0].value()),
        ("pos", "noun")
    );
}

#[test]
fn save_and_load_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.lift");

    let dict = load_bytes(FULL_DOC.as_bytes()).unwrap();
    liftlex::save(&dict, &path).unwrap();
    let loaded = liftlex::load(&path).unwrap();
    assert_eq!(dict, loaded);
}

#[test]
fn version_and_producer_are_preserved() {
    let dict = load_bytes(FULL_DOC.as_bytes()).unwrap();
    assert_eq!(dict.version.as_deref(), Some("0.13"));
    assert_eq!(dict.producer.as_deref(), Some("liftlex tests"));
    let again = load_bytes(&save_bytes(&dict).unwrap()).unwrap();
    assert_eq!(again.version, dict.version);
    assert_eq!(again.producer, dict.producer);
}
