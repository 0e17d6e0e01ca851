//! The event-driven parse state machine.
//!
//! Two cooperating stacks resolve which in-progress object receives each
//! event:
//!
//! - the **object stack** holds the innermost open domain entities
//!   ([`Node`]); wrapper tags like `lexical-unit` or `definition` never
//!   push here,
//! - the **multitext stack** holds the multitext that the next `form`
//!   child must be appended into; the correct target is pushed when a
//!   wrapper opens (dispatched against the entity on top of the object
//!   stack) and written back when the wrapper closes.
//!
//! Rich text is tracked separately: each open `form`/`gloss` gets a
//! [`FormCtx`] with its own span sub-stack and pending text buffer,
//! because a form body may nest spans to unbounded depth and may carry
//! form-level annotations after its text. A `grammatical-info` element
//! sets a redirect so that its trait children attach to the category
//! value instead of the enclosing sense — the only context where the
//! trait target differs from the top of the object stack.
//!
//! The machine consumes owned [`XmlEvent`]s only, so tests can drive it
//! with synthetic sequences and no XML source.

use smol_str::SmolStr;
use tracing::{trace, warn};

use crate::builder::Builder;
use crate::error::LiftError;
use crate::model::{
    Annotation, Described, Dictionary, Entry, Etymology, Example, Field, FieldDefinition,
    GrammaticalInfo, Header, Illustration, Media, Note, Pronunciation, Range, RangeElement,
    Relation, Reversal, Sense, Trait, Variant,
};
use crate::parser::event::{Attrs, XmlEvent};
use crate::text::{Form, MultiText, Span};

/// An in-progress domain entity on the object stack.
#[derive(Debug)]
pub(crate) enum Node {
    Entry(Entry),
    Sense(Sense),
    Example(Example),
    Variant(Variant),
    Pronunciation(Pronunciation),
    Media(Media),
    Etymology(Etymology),
    Relation(Relation),
    Note(Note),
    Field(Field),
    Trait(Trait),
    Annotation(Annotation),
    Header(Header),
    Range(Range),
    RangeElement(RangeElement),
    FieldDefinition(FieldDefinition),
    Reversal(Reversal),
    Illustration(Illustration),
}

impl Node {
    pub(crate) fn describe(&self) -> String {
        match self {
            Node::Entry(e) => e.describe(),
            Node::Sense(s) => s.describe(),
            Node::Example(x) => x.describe(),
            Node::Variant(v) => v.describe(),
            Node::Pronunciation(_) => "pronunciation".to_string(),
            Node::Media(_) => "media".to_string(),
            Node::Etymology(e) => e.describe(),
            Node::Relation(r) => r.describe(),
            Node::Note(n) => n.describe(),
            Node::Field(f) => f.describe(),
            Node::Trait(t) => format!("trait '{}'", t.name()),
            Node::Annotation(a) => format!("annotation '{}'", a.name()),
            Node::Header(_) => "header".to_string(),
            Node::Range(r) => r.describe(),
            Node::RangeElement(el) => el.describe(),
            Node::FieldDefinition(d) => format!("field-definition '{}'", d.name),
            Node::Reversal(_) => "reversal".to_string(),
            Node::Illustration(_) => "illustration".to_string(),
        }
    }
}

/// Destination of the multitext currently on top of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MtSlot {
    LexicalUnit,
    Citation,
    Definition,
    Usage,
    Label,
    Abbrev,
    Description,
    Translation(SmolStr),
    /// The owning entity's own text body (note, field, annotation,
    /// pronunciation, variant, example, etymology, reversal).
    Body,
}

#[derive(Debug)]
struct MtFrame {
    slot: MtSlot,
    mt: MultiText,
}

/// An open `form` or `gloss` element: span sub-stack, pending character
/// buffer, and form-level annotations.
#[derive(Debug)]
struct FormCtx {
    gloss: bool,
    lang: SmolStr,
    /// Bottom is the form root; one extra entry per open `span`.
    spans: Vec<Span>,
    buf: String,
    in_text: bool,
    /// Annotations opened directly under this form. While one is open,
    /// events route to the object stack again (its content is a multitext
    /// of its own).
    open_annotations: usize,
    annotations: Vec<Annotation>,
}

impl FormCtx {
    fn new(gloss: bool, lang: SmolStr) -> Self {
        Self {
            gloss,
            lang,
            spans: vec![Span::node()],
            buf: String::new(),
            in_text: false,
            open_annotations: 0,
            annotations: Vec::new(),
        }
    }

    /// Flush buffered character data into the innermost open span.
    fn flush(&mut self) -> Result<(), LiftError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.buf);
        self.spans
            .last_mut()
            .ok_or_else(|| LiftError::xml("form has no open span"))?
            .push_child(Span::text(text))
    }
}

struct GramCtx {
    info: GrammaticalInfo,
    /// Object-stack depth at which the element opened; trait children at
    /// this depth belong to the grammatical info.
    depth: usize,
}

/// The streaming parser's whole mutable state, threaded through the event
/// loop.
pub struct ParseState {
    builder: Builder,
    dict: Dictionary,
    nodes: Vec<Node>,
    frames: Vec<MtFrame>,
    forms: Vec<FormCtx>,
    gram: Option<GramCtx>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseState {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
            dict: Dictionary::new(),
            nodes: Vec::new(),
            frames: Vec::new(),
            forms: Vec::new(),
            gram: None,
        }
    }

    /// Feed one event. Any structural or grammar violation aborts with a
    /// descriptive error; the state must then be discarded.
    pub fn on_event(&mut self, event: XmlEvent) -> Result<(), LiftError> {
        match event {
            XmlEvent::Start { tag, attrs } => {
                trace!(tag = %tag, "open");
                self.on_start(&tag, attrs)
            }
            XmlEvent::Text(text) => self.on_text(text),
            XmlEvent::End { tag } => {
                trace!(tag = %tag, "close");
                self.on_end(&tag)
            }
        }
    }

    /// Consume the state after the last event: verifies everything closed,
    /// then runs the builder's finalize pass.
    pub fn finish(self) -> Result<Dictionary, LiftError> {
        let ParseState {
            builder,
            mut dict,
            nodes,
            frames,
            forms,
            gram,
        } = self;
        if !nodes.is_empty() || !frames.is_empty() || !forms.is_empty() || gram.is_some() {
            return Err(LiftError::xml("document ended with unclosed elements"));
        }
        builder.finalize(&mut dict)?;
        Ok(dict)
    }

    fn context(&self) -> String {
        match self.nodes.last() {
            Some(node) => node.describe(),
            None => "document root".to_string(),
        }
    }

    fn unexpected(&self, tag: &str) -> LiftError {
        LiftError::unexpected(tag, self.context())
    }

    // ------------------------------------------------------------------
    // Start tags
    // ------------------------------------------------------------------

    fn on_start(&mut self, tag: &str, mut attrs: Attrs) -> Result<(), LiftError> {
        // Inside an open form (and not inside one of its annotations) the
        // only children are the text body, nested spans, and form-level
        // annotations.
        if let Some(fc) = self.forms.last_mut() {
            if fc.open_annotations == 0 {
                match tag {
                    "text" => {
                        fc.in_text = true;
                        return Ok(());
                    }
                    "span" if fc.in_text => {
                        fc.flush()?;
                        let mut span = Span::node();
                        if let Some(lang) = attrs.take("lang") {
                            span.set_lang(lang);
                        }
                        if let Some(href) = attrs.take("href") {
                            span.set_href(href);
                        }
                        if let Some(class) = attrs.take("class") {
                            span.set_class(class);
                        }
                        fc.spans.push(span);
                        return Ok(());
                    }
                    "annotation" if !fc.in_text => {
                        fc.open_annotations += 1;
                        let annotation = self.builder.create_annotation(&mut attrs)?;
                        self.nodes.push(Node::Annotation(annotation));
                        self.frames.push(MtFrame {
                            slot: MtSlot::Body,
                            mt: MultiText::new(),
                        });
                        return Ok(());
                    }
                    _ => return Err(LiftError::unexpected(tag, "form")),
                }
            }
        }

        // Directly inside grammatical-info only trait children are legal.
        if let Some(g) = &self.gram {
            if self.nodes.len() == g.depth && tag != "trait" {
                return Err(LiftError::unexpected(tag, "grammatical-info"));
            }
        }

        match tag {
            "lift" => {
                if !self.nodes.is_empty() {
                    return Err(self.unexpected(tag));
                }
                self.dict.version = attrs.take("version");
                self.dict.producer = attrs.take("producer");
                Ok(())
            }
            "header" => {
                if !self.nodes.is_empty() {
                    return Err(self.unexpected(tag));
                }
                let header = self.builder.create_header();
                self.nodes.push(Node::Header(header));
                Ok(())
            }
            "entry" => {
                if !self.nodes.is_empty() {
                    return Err(self.unexpected(tag));
                }
                let entry = self.builder.create_entry(&mut attrs)?;
                self.nodes.push(Node::Entry(entry));
                Ok(())
            }
            "sense" => match self.nodes.last() {
                Some(Node::Entry(_) | Node::Sense(_)) => {
                    let sense = self.builder.create_sense(&mut attrs)?;
                    self.nodes.push(Node::Sense(sense));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "subsense" => match self.nodes.last() {
                Some(Node::Sense(_)) => {
                    let sense = self.builder.create_sense(&mut attrs)?;
                    self.nodes.push(Node::Sense(sense));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "example" => match self.nodes.last() {
                Some(Node::Sense(_)) => {
                    let example = self.builder.create_example(&mut attrs);
                    self.nodes.push(Node::Example(example));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "variant" => match self.nodes.last() {
                Some(Node::Entry(_)) => {
                    let parent = self.context();
                    let variant = self.builder.create_variant(&mut attrs, &parent);
                    self.nodes.push(Node::Variant(variant));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "pronunciation" => match self.nodes.last() {
                Some(Node::Entry(_) | Node::Variant(_)) => {
                    let pronunciation = self.builder.create_pronunciation(&mut attrs);
                    self.nodes.push(Node::Pronunciation(pronunciation));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "media" => match self.nodes.last() {
                Some(Node::Pronunciation(_)) => {
                    let media = self.builder.create_media(&mut attrs)?;
                    self.nodes.push(Node::Media(media));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "etymology" => match self.nodes.last() {
                Some(Node::Entry(_)) => {
                    let etymology = self.builder.create_etymology(&mut attrs)?;
                    self.nodes.push(Node::Etymology(etymology));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "relation" => match self.nodes.last() {
                Some(Node::Entry(_) | Node::Sense(_) | Node::Variant(_)) => {
                    let parent = self.context();
                    let relation = self.builder.create_relation(&mut attrs, &parent)?;
                    self.nodes.push(Node::Relation(relation));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "note" => match self.nodes.last() {
                Some(Node::Entry(_) | Node::Sense(_) | Node::Example(_)) => {
                    let note = self.builder.create_note(&mut attrs);
                    self.nodes.push(Node::Note(note));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            // `field` is reused across contexts: in the header it declares
            // a field definition, elsewhere it is a field instance.
            "field" => match self.nodes.last() {
                Some(Node::Header(_)) => {
                    let def = self.builder.create_field_definition(&mut attrs)?;
                    self.nodes.push(Node::FieldDefinition(def));
                    Ok(())
                }
                Some(
                    Node::Entry(_)
                    | Node::Sense(_)
                    | Node::Example(_)
                    | Node::Variant(_)
                    | Node::Etymology(_)
                    | Node::Relation(_)
                    | Node::Note(_)
                    | Node::RangeElement(_),
                ) => {
                    let field = self.builder.create_field(&mut attrs)?;
                    self.nodes.push(Node::Field(field));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "field-definition" => match self.nodes.last() {
                Some(Node::Header(_)) => {
                    let def = self.builder.create_field_definition(&mut attrs)?;
                    self.nodes.push(Node::FieldDefinition(def));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "trait" => {
                let in_gram = self
                    .gram
                    .as_ref()
                    .is_some_and(|g| self.nodes.len() == g.depth);
                let ok = in_gram
                    || matches!(
                        self.nodes.last(),
                        Some(
                            Node::Entry(_)
                                | Node::Sense(_)
                                | Node::Example(_)
                                | Node::Variant(_)
                                | Node::Etymology(_)
                                | Node::Relation(_)
                                | Node::Note(_)
                                | Node::Field(_)
                                | Node::RangeElement(_)
                        )
                    );
                if !ok {
                    return Err(self.unexpected(tag));
                }
                let t = self.builder.create_trait(&mut attrs)?;
                self.nodes.push(Node::Trait(t));
                Ok(())
            }
            "annotation" => match self.nodes.last() {
                Some(
                    Node::Entry(_)
                    | Node::Sense(_)
                    | Node::Example(_)
                    | Node::Variant(_)
                    | Node::Etymology(_)
                    | Node::Relation(_)
                    | Node::Note(_)
                    | Node::Field(_)
                    | Node::Trait(_)
                    | Node::RangeElement(_),
                ) => {
                    let annotation = self.builder.create_annotation(&mut attrs)?;
                    self.nodes.push(Node::Annotation(annotation));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "form" => {
                if self.frames.is_empty() {
                    return Err(self.unexpected(tag));
                }
                let lang = attrs.require("lang", "form")?;
                self.forms.push(FormCtx::new(false, lang.into()));
                Ok(())
            }
            "gloss" => match self.nodes.last() {
                Some(Node::Sense(_) | Node::Etymology(_)) => {
                    let lang = attrs.require("lang", "gloss")?;
                    self.forms.push(FormCtx::new(true, lang.into()));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "grammatical-info" => match self.nodes.last() {
                Some(Node::Sense(_) | Node::Reversal(_)) if self.gram.is_none() => {
                    let value = attrs.require("value", "grammatical-info")?;
                    self.gram = Some(GramCtx {
                        info: GrammaticalInfo::new(value),
                        depth: self.nodes.len(),
                    });
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "lexical-unit" => match self.nodes.last_mut() {
                Some(Node::Entry(e)) => {
                    let mt = std::mem::take(&mut e.lexical_unit);
                    self.frames.push(MtFrame {
                        slot: MtSlot::LexicalUnit,
                        mt,
                    });
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "citation" => match self.nodes.last_mut() {
                Some(Node::Entry(e)) => {
                    let mt = std::mem::take(&mut e.citations);
                    self.frames.push(MtFrame {
                        slot: MtSlot::Citation,
                        mt,
                    });
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "definition" => match self.nodes.last_mut() {
                Some(Node::Sense(s)) => {
                    let mt = std::mem::take(&mut s.definition);
                    self.frames.push(MtFrame {
                        slot: MtSlot::Definition,
                        mt,
                    });
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "usage" => match self.nodes.last_mut() {
                Some(Node::Relation(r)) => {
                    let mt = std::mem::take(&mut r.usage);
                    self.frames.push(MtFrame {
                        slot: MtSlot::Usage,
                        mt,
                    });
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "label" => {
                let mt = match self.nodes.last_mut() {
                    Some(Node::Media(m)) => std::mem::take(&mut m.label),
                    Some(Node::Illustration(i)) => std::mem::take(&mut i.label),
                    Some(Node::Range(r)) => std::mem::take(&mut r.label),
                    Some(Node::RangeElement(el)) => std::mem::take(&mut el.label),
                    _ => return Err(self.unexpected(tag)),
                };
                self.frames.push(MtFrame {
                    slot: MtSlot::Label,
                    mt,
                });
                Ok(())
            }
            "abbrev" | "abbreviation" => {
                let mt = match self.nodes.last_mut() {
                    Some(Node::Range(r)) => std::mem::take(&mut r.abbreviation),
                    Some(Node::RangeElement(el)) => std::mem::take(&mut el.abbreviation),
                    _ => return Err(self.unexpected(tag)),
                };
                self.frames.push(MtFrame {
                    slot: MtSlot::Abbrev,
                    mt,
                });
                Ok(())
            }
            "description" => {
                let mt = match self.nodes.last_mut() {
                    Some(Node::Header(h)) => std::mem::take(&mut h.description),
                    Some(Node::Range(r)) => std::mem::take(&mut r.description),
                    Some(Node::RangeElement(el)) => std::mem::take(&mut el.description),
                    _ => return Err(self.unexpected(tag)),
                };
                self.frames.push(MtFrame {
                    slot: MtSlot::Description,
                    mt,
                });
                Ok(())
            }
            "translation" => match self.nodes.last() {
                Some(Node::Example(_)) => {
                    let ty = attrs.take("type").unwrap_or_default();
                    self.frames.push(MtFrame {
                        slot: MtSlot::Translation(ty.into()),
                        mt: MultiText::new(),
                    });
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "reversal" => match self.nodes.last() {
                Some(Node::Sense(_)) => {
                    let reversal = self.builder.create_reversal(&mut attrs);
                    self.nodes.push(Node::Reversal(reversal));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "main" => match self.nodes.last() {
                Some(Node::Reversal(_)) => {
                    let reversal = self.builder.create_reversal(&mut attrs);
                    self.nodes.push(Node::Reversal(reversal));
                    self.push_body_frame();
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "illustration" => match self.nodes.last() {
                Some(Node::Sense(_)) => {
                    let illustration = self.builder.create_illustration(&mut attrs)?;
                    self.nodes.push(Node::Illustration(illustration));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "range" => match self.nodes.last() {
                Some(Node::Header(_)) => {
                    let range = self.builder.create_range(&mut attrs)?;
                    self.nodes.push(Node::Range(range));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            "range-element" => match self.nodes.last() {
                Some(Node::Range(_)) => {
                    let element = self.builder.create_range_element(&mut attrs)?;
                    self.nodes.push(Node::RangeElement(element));
                    Ok(())
                }
                _ => Err(self.unexpected(tag)),
            },
            // Pure structure inside the header; nothing to track.
            "ranges" | "fields" => match self.nodes.last() {
                Some(Node::Header(_)) => Ok(()),
                _ => Err(self.unexpected(tag)),
            },
            _ => Err(self.unexpected(tag)),
        }
    }

    // ------------------------------------------------------------------
    // Character data
    // ------------------------------------------------------------------

    fn on_text(&mut self, text: String) -> Result<(), LiftError> {
        if let Some(fc) = self.forms.last_mut() {
            if fc.in_text && fc.open_annotations == 0 {
                fc.buf.push_str(&text);
                return Ok(());
            }
        }
        // Inter-element whitespace from pretty-printed documents is dropped;
        // anything else has no place to go.
        if !text.trim().is_empty() {
            return Err(LiftError::xml(format!(
                "unexpected character data in {}",
                self.context()
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // End tags
    // ------------------------------------------------------------------

    fn on_end(&mut self, tag: &str) -> Result<(), LiftError> {
        if let Some(fc) = self.forms.last_mut() {
            if fc.open_annotations == 0 {
                match tag {
                    "span" => {
                        fc.flush()?;
                        if fc.spans.len() < 2 {
                            return Err(LiftError::xml("unmatched </span>"));
                        }
                        let child = fc
                            .spans
                            .pop()
                            .ok_or_else(|| LiftError::xml("unmatched </span>"))?;
                        return fc
                            .spans
                            .last_mut()
                            .ok_or_else(|| LiftError::xml("form has no open span"))?
                            .push_child(child);
                    }
                    "text" => {
                        fc.flush()?;
                        fc.in_text = false;
                        return Ok(());
                    }
                    "form" => return self.close_form(false),
                    "gloss" => return self.close_form(true),
                    other => {
                        return Err(LiftError::xml(format!("unexpected </{other}> inside form")));
                    }
                }
            }
        }

        match tag {
            "lift" | "ranges" | "fields" => Ok(()),
            "grammatical-info" => {
                let Some(g) = self.gram.take() else {
                    return Err(LiftError::xml("unmatched </grammatical-info>"));
                };
                match self.nodes.last_mut() {
                    Some(Node::Sense(s)) => {
                        if s.grammatical_info.is_some() {
                            warn!(context = %s.describe(), "replacing earlier grammatical-info");
                        }
                        s.grammatical_info = Some(g.info);
                        Ok(())
                    }
                    Some(Node::Reversal(r)) => {
                        r.grammatical_info = Some(g.info);
                        Ok(())
                    }
                    _ => Err(LiftError::xml("unmatched </grammatical-info>")),
                }
            }
            "trait" => {
                let Some(Node::Trait(t)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </trait>"));
                };
                if let Some(g) = &mut self.gram {
                    if self.nodes.len() == g.depth {
                        g.info.traits.push(t);
                        return Ok(());
                    }
                }
                self.attach(Node::Trait(t), tag)
            }
            "annotation" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Annotation(mut annotation)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </annotation>"));
                };
                annotation.content = mt;
                if let Some(fc) = self.forms.last_mut() {
                    if fc.open_annotations > 0 {
                        fc.open_annotations -= 1;
                        fc.annotations.push(annotation);
                        return Ok(());
                    }
                }
                self.attach(Node::Annotation(annotation), tag)
            }
            "lexical-unit" => {
                let mt = self.pop_slot_frame(MtSlot::LexicalUnit, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Entry(e)) => {
                        e.lexical_unit = mt;
                        Ok(())
                    }
                    _ => Err(LiftError::xml("unmatched </lexical-unit>")),
                }
            }
            "citation" => {
                let mt = self.pop_slot_frame(MtSlot::Citation, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Entry(e)) => {
                        e.citations = mt;
                        Ok(())
                    }
                    _ => Err(LiftError::xml("unmatched </citation>")),
                }
            }
            "definition" => {
                let mt = self.pop_slot_frame(MtSlot::Definition, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Sense(s)) => {
                        s.definition = mt;
                        Ok(())
                    }
                    _ => Err(LiftError::xml("unmatched </definition>")),
                }
            }
            "usage" => {
                let mt = self.pop_slot_frame(MtSlot::Usage, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Relation(r)) => {
                        r.usage = mt;
                        Ok(())
                    }
                    _ => Err(LiftError::xml("unmatched </usage>")),
                }
            }
            "label" => {
                let mt = self.pop_slot_frame(MtSlot::Label, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Media(m)) => m.label = mt,
                    Some(Node::Illustration(i)) => i.label = mt,
                    Some(Node::Range(r)) => r.label = mt,
                    Some(Node::RangeElement(el)) => el.label = mt,
                    _ => return Err(LiftError::xml("unmatched </label>")),
                }
                Ok(())
            }
            "abbrev" | "abbreviation" => {
                let mt = self.pop_slot_frame(MtSlot::Abbrev, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Range(r)) => r.abbreviation = mt,
                    Some(Node::RangeElement(el)) => el.abbreviation = mt,
                    _ => return Err(LiftError::xml("unmatched </abbrev>")),
                }
                Ok(())
            }
            "description" => {
                let mt = self.pop_slot_frame(MtSlot::Description, tag)?;
                match self.nodes.last_mut() {
                    Some(Node::Header(h)) => h.description = mt,
                    Some(Node::Range(r)) => r.description = mt,
                    Some(Node::RangeElement(el)) => el.description = mt,
                    _ => return Err(LiftError::xml("unmatched </description>")),
                }
                Ok(())
            }
            "translation" => {
                let frame = self
                    .frames
                    .pop()
                    .ok_or_else(|| LiftError::xml("unmatched </translation>"))?;
                let MtSlot::Translation(ty) = frame.slot else {
                    return Err(LiftError::xml("unmatched </translation>"));
                };
                match self.nodes.last_mut() {
                    Some(Node::Example(x)) => x.add_translation(ty, frame.mt),
                    _ => Err(LiftError::xml("unmatched </translation>")),
                }
            }
            "note" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Note(mut note)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </note>"));
                };
                note.content = mt;
                self.attach(Node::Note(note), tag)
            }
            "field" => match self.nodes.pop() {
                Some(Node::Field(mut field)) => {
                    field.content = self.pop_body_frame(tag)?;
                    self.attach(Node::Field(field), tag)
                }
                // Header-context `field` declares a definition and carries
                // no text body of its own.
                Some(Node::FieldDefinition(def)) => self.attach(Node::FieldDefinition(def), tag),
                _ => Err(LiftError::xml("unmatched </field>")),
            },
            "field-definition" => {
                let Some(Node::FieldDefinition(def)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </field-definition>"));
                };
                self.attach(Node::FieldDefinition(def), tag)
            }
            "pronunciation" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Pronunciation(mut p)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </pronunciation>"));
                };
                p.forms = mt;
                self.attach(Node::Pronunciation(p), tag)
            }
            "variant" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Variant(mut v)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </variant>"));
                };
                v.forms = mt;
                self.attach(Node::Variant(v), tag)
            }
            "example" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Example(mut x)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </example>"));
                };
                x.content = mt;
                self.attach(Node::Example(x), tag)
            }
            "etymology" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Etymology(mut e)) = self.nodes.pop() else {
                    return Err(LiftError::xml("unmatched </etymology>"));
                };
                e.forms = mt;
                self.attach(Node::Etymology(e), tag)
            }
            "reversal" | "main" => {
                let mt = self.pop_body_frame(tag)?;
                let Some(Node::Reversal(mut r)) = self.nodes.pop() else {
                    return Err(LiftError::xml(format!("unmatched </{tag}>")));
                };
                r.forms = mt;
                self.attach(Node::Reversal(r), tag)
            }
            "entry" | "sense" | "subsense" | "media" | "illustration" | "relation" | "header"
            | "range" | "range-element" => {
                let node = self
                    .nodes
                    .pop()
                    .ok_or_else(|| LiftError::xml(format!("unmatched </{tag}>")))?;
                self.attach(node, tag)
            }
            other => Err(LiftError::xml(format!("unmatched </{other}>"))),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn push_body_frame(&mut self) {
        self.frames.push(MtFrame {
            slot: MtSlot::Body,
            mt: MultiText::new(),
        });
    }

    fn pop_body_frame(&mut self, tag: &str) -> Result<MultiText, LiftError> {
        match self.frames.pop() {
            Some(MtFrame {
                slot: MtSlot::Body,
                mt,
            }) => Ok(mt),
            _ => Err(LiftError::xml(format!("unbalanced content in <{tag}>"))),
        }
    }

    fn pop_slot_frame(&mut self, expected: MtSlot, tag: &str) -> Result<MultiText, LiftError> {
        match self.frames.pop() {
            Some(frame) if frame.slot == expected => Ok(frame.mt),
            _ => Err(LiftError::xml(format!("unbalanced content in <{tag}>"))),
        }
    }

    fn attach(&mut self, child: Node, tag: &str) -> Result<(), LiftError> {
        self.builder
            .attach(child, self.nodes.last_mut(), &mut self.dict, tag)
    }

    fn close_form(&mut self, gloss: bool) -> Result<(), LiftError> {
        let Some(mut fc) = self.forms.pop() else {
            return Err(LiftError::xml("unmatched </form>"));
        };
        if fc.gloss != gloss {
            return Err(LiftError::xml("mismatched form/gloss close"));
        }
        fc.flush()?;
        if fc.spans.len() != 1 {
            return Err(LiftError::xml("form closed with an open span"));
        }
        let root = fc
            .spans
            .pop()
            .ok_or_else(|| LiftError::xml("form has no open span"))?;
        let form = Form::from_parts(fc.lang, root, fc.annotations);
        if gloss {
            match self.nodes.last_mut() {
                Some(Node::Sense(s)) => s.gloss.add_form(form),
                Some(Node::Etymology(e)) => e.glosses.add_form(form),
                _ => Err(LiftError::xml("unmatched </gloss>")),
            }
        } else {
            match self.frames.last_mut() {
                Some(frame) => frame.mt.add_form(form),
                None => Err(LiftError::xml("unmatched </form>")),
            }
        }
    }
}
