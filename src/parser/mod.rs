//! Streaming LIFT parser: a single forward pass over XML events.
//!
//! [`LiftParser`] owns the quick-xml event loop and converts each borrowed
//! event into an owned [`event::XmlEvent`] before handing it to
//! [`state::ParseState`]. All grammar knowledge lives in the state machine;
//! this module only does transport and error positioning.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smol_str::SmolStr;
use tracing::debug;

use crate::error::LiftError;
use crate::model::Dictionary;

pub mod event;
pub mod state;

pub use event::{Attrs, XmlEvent};
pub use state::ParseState;

/// LIFT document reader.
pub struct LiftParser;

impl LiftParser {
    /// Parse a complete document from bytes.
    ///
    /// The input is consumed in full before the dictionary is returned; on
    /// any error the whole load fails and no partial dictionary escapes.
    pub fn parse(input: &[u8]) -> Result<Dictionary, LiftError> {
        let mut reader = Reader::from_reader(input);
        // Text is NOT trimmed here: whitespace inside a <text> body is
        // significant (mixed span content); the state machine drops
        // inter-element whitespace itself.
        let mut state = ParseState::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    state.on_event(start_event(e)?)?;
                }
                Ok(Event::Empty(ref e)) => {
                    // Self-closing element: handle as start + end.
                    let XmlEvent::Start { tag, attrs } = start_event(e)? else {
                        return Err(LiftError::xml("empty element did not decode"));
                    };
                    let end = XmlEvent::End { tag: tag.clone() };
                    state.on_event(XmlEvent::Start { tag, attrs })?;
                    state.on_event(end)?;
                }
                Ok(Event::Text(ref t)) => {
                    let text = t
                        .decode()
                        .map_err(|e| LiftError::xml(format!("Text decode error: {e}")))?;
                    state.on_event(XmlEvent::Text(text.into_owned()))?;
                }
                Ok(Event::CData(ref c)) => {
                    let text = String::from_utf8(c.to_vec())
                        .map_err(|e| LiftError::xml(format!("Invalid UTF-8 in CDATA: {e}")))?;
                    state.on_event(XmlEvent::Text(text))?;
                }
                // Text events are split around general references; resolve
                // the predefined and numeric ones back into character data.
                Ok(Event::GeneralRef(ref r)) => {
                    state.on_event(XmlEvent::Text(resolve_reference(r.as_ref())?))?;
                }
                Ok(Event::End(ref e)) => {
                    let tag = tag_name(e.name().as_ref())?;
                    state.on_event(XmlEvent::End { tag })?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // declaration, comments, processing instructions
                Err(e) => {
                    return Err(LiftError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
            }
            buf.clear();
        }

        let dict = state.finish()?;
        debug!(
            bytes = input.len(),
            entries = dict.entry_count(),
            "parsed LIFT document"
        );
        Ok(dict)
    }
}

/// Resolve a general reference body (the part between `&` and `;`).
fn resolve_reference(raw: &[u8]) -> Result<String, LiftError> {
    let name = std::str::from_utf8(raw)
        .map_err(|e| LiftError::xml(format!("Invalid entity reference: {e}")))?;
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
                .ok_or_else(|| LiftError::xml(format!("unresolved entity reference '&{name};'")))?
        }
    };
    Ok(resolved.to_string())
}

fn tag_name(raw: &[u8]) -> Result<SmolStr, LiftError> {
    std::str::from_utf8(raw)
        .map(SmolStr::new)
        .map_err(|e| LiftError::xml(format!("Invalid tag name: {e}")))
}

fn start_event(e: &BytesStart<'_>) -> Result<XmlEvent, LiftError> {
    let tag = tag_name(e.name().as_ref())?;
    let mut attrs = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| LiftError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| LiftError::xml(format!("Attribute key error: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| LiftError::xml(format!("Attribute value error: {e}")))?
            .to_string();
        attrs.push((SmolStr::new(key), value));
    }
    Ok(XmlEvent::Start {
        tag,
        attrs: Attrs::new(attrs),
    })
}
