//! The dictionary container and its derived read-only queries.
//!
//! Everything exposed here is computed from the entity graph on demand —
//! there is no cached index that could drift from the graph after an edit.

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

use crate::model::entry::{Entry, Etymology, Pronunciation, Relation, Variant};
use crate::model::extensible::{Annotation, Field, Note, Trait};
use crate::model::header::Header;
use crate::model::sense::{Example, Reversal, Sense};
use crate::text::MultiText;

/// The root of a loaded LIFT document: a header plus the ordered entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    pub version: Option<String>,
    pub producer: Option<String>,
    pub header: Header,
    pub entries: Vec<Entry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id.as_deref() == Some(id))
    }

    /// All senses in document order, subsenses flattened depth-first.
    pub fn senses(&self) -> Vec<&Sense> {
        let mut out = Vec::new();
        self.for_each_sense(&mut |s| out.push(s));
        out
    }

    pub fn sense_by_id(&self, id: &str) -> Option<&Sense> {
        fn find<'a>(senses: &'a [Sense], id: &str) -> Option<&'a Sense> {
            for s in senses {
                if s.id.as_deref() == Some(id) {
                    return Some(s);
                }
                if let Some(found) = find(&s.subsenses, id) {
                    return Some(found);
                }
            }
            None
        }
        self.entries.iter().find_map(|e| find(&e.senses, id))
    }

    pub fn range(&self, id: &str) -> Option<&crate::model::Range> {
        self.header.range(id)
    }

    // ------------------------------------------------------------------
    // Analytic queries
    // ------------------------------------------------------------------

    /// Object languages used in lexical-unit forms.
    pub fn lexical_languages(&self) -> IndexSet<SmolStr> {
        let mut out = IndexSet::new();
        for entry in &self.entries {
            for lang in entry.lexical_unit.languages() {
                out.insert(SmolStr::new(lang));
            }
        }
        out
    }

    /// Occurrence counts of grammatical-info values across all senses.
    pub fn grammatical_info_counts(&self) -> IndexMap<String, usize> {
        let mut out = IndexMap::new();
        self.visit(&mut CountGrammaticalInfo(&mut out));
        out
    }

    /// Every trait name used anywhere in the document.
    pub fn trait_names(&self) -> IndexSet<SmolStr> {
        let mut out = IndexSet::new();
        self.visit(&mut CollectTraits(&mut |t: &Trait| {
            out.insert(SmolStr::new(t.name()));
        }));
        out
    }

    /// Value → occurrence count for one trait name.
    pub fn trait_value_counts(&self, name: &str) -> IndexMap<String, usize> {
        let mut out = IndexMap::new();
        self.visit(&mut CollectTraits(&mut |t: &Trait| {
            if t.name() == name {
                *out.entry(t.value().to_string()).or_insert(0) += 1;
            }
        }));
        out
    }

    /// Every field name used anywhere in the document.
    pub fn field_names(&self) -> IndexSet<SmolStr> {
        let mut out = IndexSet::new();
        self.visit(&mut CollectFields(&mut out));
        out
    }

    /// Every translation type in use across all examples.
    pub fn translation_types(&self) -> IndexSet<SmolStr> {
        let mut out = IndexSet::new();
        self.visit(&mut CollectTranslationTypes(&mut out));
        out
    }

    /// Every language tag appearing in any multitext or nested text span.
    pub fn all_languages(&self) -> IndexSet<SmolStr> {
        let mut out = IndexSet::new();
        self.visit(&mut CollectLanguages(&mut out));
        out
    }

    // ------------------------------------------------------------------
    // Graph traversal
    // ------------------------------------------------------------------

    pub(crate) fn for_each_sense<'a>(&'a self, f: &mut dyn FnMut(&'a Sense)) {
        fn rec<'a>(senses: &'a [Sense], f: &mut dyn FnMut(&'a Sense)) {
            for s in senses {
                f(s);
                rec(&s.subsenses, f);
            }
        }
        for entry in &self.entries {
            rec(&entry.senses, f);
        }
    }

    fn visit(&self, v: &mut dyn Visit) {
        walk_header(&self.header, v);
        for entry in &self.entries {
            walk_entry(entry, v);
        }
    }
}

/// Graph visitor: each hook fires once per reachable node of that kind,
/// including nodes nested inside annotations and reversal chains.
trait Visit {
    fn multitext(&mut self, _mt: &MultiText) {}
    fn trait_node(&mut self, _t: &Trait) {}
    fn field_node(&mut self, _f: &Field) {}
    fn sense_node(&mut self, _s: &Sense) {}
    fn example_node(&mut self, _e: &Example) {}
}

fn walk_multitext(mt: &MultiText, v: &mut dyn Visit) {
    v.multitext(mt);
    for form in mt.forms() {
        for ann in form.annotations() {
            walk_annotation(ann, v);
        }
    }
}

fn walk_annotation(ann: &Annotation, v: &mut dyn Visit) {
    walk_multitext(&ann.content, v);
}

fn walk_trait(t: &Trait, v: &mut dyn Visit) {
    v.trait_node(t);
    for ann in &t.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_field(f: &Field, v: &mut dyn Visit) {
    v.field_node(f);
    walk_multitext(&f.content, v);
    for t in &f.traits {
        walk_trait(t, v);
    }
    for ann in &f.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_note(n: &Note, v: &mut dyn Visit) {
    walk_multitext(&n.content, v);
    for f in &n.fields {
        walk_field(f, v);
    }
    for t in &n.traits {
        walk_trait(t, v);
    }
    for ann in &n.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_relation(r: &Relation, v: &mut dyn Visit) {
    walk_multitext(&r.usage, v);
    for f in &r.fields {
        walk_field(f, v);
    }
    for t in &r.traits {
        walk_trait(t, v);
    }
    for ann in &r.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_pronunciation(p: &Pronunciation, v: &mut dyn Visit) {
    walk_multitext(&p.forms, v);
    for media in &p.media {
        walk_multitext(&media.label, v);
    }
}

fn walk_variant(var: &Variant, v: &mut dyn Visit) {
    walk_multitext(&var.forms, v);
    for p in &var.pronunciations {
        walk_pronunciation(p, v);
    }
    for r in &var.relations {
        walk_relation(r, v);
    }
    for f in &var.fields {
        walk_field(f, v);
    }
    for t in &var.traits {
        walk_trait(t, v);
    }
    for ann in &var.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_etymology(e: &Etymology, v: &mut dyn Visit) {
    walk_multitext(&e.forms, v);
    walk_multitext(&e.glosses, v);
    for f in &e.fields {
        walk_field(f, v);
    }
    for t in &e.traits {
        walk_trait(t, v);
    }
    for ann in &e.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_example(ex: &Example, v: &mut dyn Visit) {
    v.example_node(ex);
    walk_multitext(&ex.content, v);
    for (_, mt) in ex.translations() {
        walk_multitext(mt, v);
    }
    for n in &ex.notes {
        walk_note(n, v);
    }
    for f in &ex.fields {
        walk_field(f, v);
    }
    for t in &ex.traits {
        walk_trait(t, v);
    }
    for ann in &ex.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_reversal(rev: &Reversal, v: &mut dyn Visit) {
    walk_multitext(&rev.forms, v);
    if let Some(gi) = &rev.grammatical_info {
        for t in &gi.traits {
            walk_trait(t, v);
        }
    }
    if let Some(main) = &rev.main {
        walk_reversal(main, v);
    }
}

fn walk_sense(s: &Sense, v: &mut dyn Visit) {
    v.sense_node(s);
    walk_multitext(&s.gloss, v);
    walk_multitext(&s.definition, v);
    if let Some(gi) = &s.grammatical_info {
        for t in &gi.traits {
            walk_trait(t, v);
        }
    }
    for ex in &s.examples {
        walk_example(ex, v);
    }
    for r in &s.relations {
        walk_relation(r, v);
    }
    for ill in &s.illustrations {
        walk_multitext(&ill.label, v);
    }
    for rev in &s.reversals {
        walk_reversal(rev, v);
    }
    for sub in &s.subsenses {
        walk_sense(sub, v);
    }
    for n in &s.notes {
        walk_note(n, v);
    }
    for f in &s.fields {
        walk_field(f, v);
    }
    for t in &s.traits {
        walk_trait(t, v);
    }
    for ann in &s.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_entry(entry: &Entry, v: &mut dyn Visit) {
    walk_multitext(&entry.lexical_unit, v);
    walk_multitext(&entry.citations, v);
    for p in &entry.pronunciations {
        walk_pronunciation(p, v);
    }
    for var in &entry.variants {
        walk_variant(var, v);
    }
    for s in &entry.senses {
        walk_sense(s, v);
    }
    for r in &entry.relations {
        walk_relation(r, v);
    }
    for e in &entry.etymologies {
        walk_etymology(e, v);
    }
    for n in &entry.notes {
        walk_note(n, v);
    }
    for f in &entry.fields {
        walk_field(f, v);
    }
    for t in &entry.traits {
        walk_trait(t, v);
    }
    for ann in &entry.annotations {
        walk_annotation(ann, v);
    }
}

fn walk_header(header: &Header, v: &mut dyn Visit) {
    walk_multitext(&header.description, v);
    for range in &header.ranges {
        walk_multitext(&range.label, v);
        walk_multitext(&range.abbreviation, v);
        walk_multitext(&range.description, v);
        for el in &range.elements {
            walk_multitext(&el.label, v);
            walk_multitext(&el.abbreviation, v);
            walk_multitext(&el.description, v);
            for f in &el.fields {
                walk_field(f, v);
            }
            for t in &el.traits {
                walk_trait(t, v);
            }
            for ann in &el.annotations {
                walk_annotation(ann, v);
            }
        }
    }
}

// ------------------------------------------------------------------
// Query visitors
// ------------------------------------------------------------------

struct CountGrammaticalInfo<'a>(&'a mut IndexMap<String, usize>);

impl Visit for CountGrammaticalInfo<'_> {
    fn sense_node(&mut self, s: &Sense) {
        if let Some(gi) = &s.grammatical_info {
            *self.0.entry(gi.value.clone()).or_insert(0) += 1;
        }
    }
}

struct CollectTraits<'a>(&'a mut dyn FnMut(&Trait));

impl Visit for CollectTraits<'_> {
    fn trait_node(&mut self, t: &Trait) {
        (self.0)(t);
    }
}

struct CollectFields<'a>(&'a mut IndexSet<SmolStr>);

impl Visit for CollectFields<'_> {
    fn field_node(&mut self, f: &Field) {
        self.0.insert(SmolStr::new(f.name()));
    }
}

struct CollectTranslationTypes<'a>(&'a mut IndexSet<SmolStr>);

impl Visit for CollectTranslationTypes<'_> {
    fn example_node(&mut self, ex: &Example) {
        for (ty, _) in ex.translations() {
            self.0.insert(SmolStr::new(ty));
        }
    }
}

struct CollectLanguages<'a>(&'a mut IndexSet<SmolStr>);

impl Visit for CollectLanguages<'_> {
    fn multitext(&mut self, mt: &MultiText) {
        for form in mt.forms() {
            self.0.insert(SmolStr::new(form.lang()));
            form.root().collect_languages(self.0);
        }
    }
}
