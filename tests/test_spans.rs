//! Rich-text span handling through the full parse/serialize path.

use liftlex::{Span, load_bytes, save_bytes};

const SPAN_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lift version="0.13">
  <entry id="greeting_1">
    <lexical-unit>
      <form lang="fr"><text>Bonjour <span lang="en">Hello <span class="em">world</span></span> !</text></form>
    </lexical-unit>
  </entry>
</lift>
"#;

#[test]
fn nested_spans_parse_into_a_seven_node_tree() {
    let dict = load_bytes(SPAN_DOC.as_bytes()).unwrap();
    let form = dict.entries[0].lexical_unit.get("fr").unwrap();

    let root = form.root();
    assert_eq!(root.node_count(), 7);
    assert_eq!(root.iter_depth_first().count(), 7);

    // Depth-first order: root, "Bonjour ", en span, "Hello ", em span,
    // "world", " !".
    let nodes: Vec<&Span> = root.iter_depth_first().collect();
    assert!(nodes[0].children().len() == 3);
    assert_eq!(nodes[1].leaf_text(), Some("Bonjour "));
    assert_eq!(nodes[2].lang(), Some("en"));
    assert_eq!(nodes[3].leaf_text(), Some("Hello "));
    assert_eq!(nodes[4].class(), Some("em"));
    assert_eq!(nodes[5].leaf_text(), Some("world"));
    assert_eq!(nodes[6].leaf_text(), Some(" !"));
}

#[test]
fn markup_rendering_reproduces_the_original_text() {
    let dict = load_bytes(SPAN_DOC.as_bytes()).unwrap();
    let form = dict.entries[0].lexical_unit.get("fr").unwrap();
    assert_eq!(
        form.markup(),
        r#"Bonjour <span lang="en">Hello <span class="em">world</span></span> !"#
    );
}

#[test]
fn plain_rendering_strips_all_markup() {
    let dict = load_bytes(SPAN_DOC.as_bytes()).unwrap();
    let form = dict.entries[0].lexical_unit.get("fr").unwrap();
    assert_eq!(form.text(), "Bonjour Hello world !");
}

#[test]
fn spans_survive_save_and_reload() {
    let first = load_bytes(SPAN_DOC.as_bytes()).unwrap();
    let bytes = save_bytes(&first).unwrap();

    let serialized = String::from_utf8(bytes.clone()).unwrap();
    assert!(serialized
        .contains(r#"Bonjour <span lang="en">Hello <span class="em">world</span></span> !"#));

    let second = load_bytes(&bytes).unwrap();
    let form = second.entries[0].lexical_unit.get("fr").unwrap();
    assert_eq!(form.root().node_count(), 7);
    assert_eq!(first, second);
}

#[test]
fn span_href_and_escaped_characters_round_trip() {
    let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<lift version="0.13">
  <entry id="e1">
    <lexical-unit>
      <form lang="en"><text>see <span href="entry://fish &amp; chips">fish &amp; chips</span></text></form>
    </lexical-unit>
  </entry>
</lift>
"#;
    let first = load_bytes(doc.as_bytes()).unwrap();
    let form = first.entries[0].lexical_unit.get("en").unwrap();
    assert_eq!(form.text(), "see fish & chips");
    let link = &form.root().children()[1];
    assert_eq!(link.href(), Some("entry://fish & chips"));

    let second = load_bytes(&save_bytes(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}
