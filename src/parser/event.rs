//! Owned XML events and attribute access.
//!
//! The state machine consumes these instead of quick-xml's borrowed events
//! so it can be driven by synthetic sequences in tests, with no XML source
//! behind them.

use smol_str::SmolStr;
use tracing::warn;

use crate::error::LiftError;

/// One parse event in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    Start { tag: SmolStr, attrs: Attrs },
    Text(String),
    End { tag: SmolStr },
}

impl XmlEvent {
    /// Convenience constructor for tests and synthetic drivers.
    pub fn start<const N: usize>(tag: &str, attrs: [(&str, &str); N]) -> Self {
        Self::Start {
            tag: SmolStr::new(tag),
            attrs: Attrs::new(
                attrs
                    .iter()
                    .map(|(k, v)| (SmolStr::new(*k), (*v).to_string()))
                    .collect(),
            ),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn end(tag: &str) -> Self {
        Self::End {
            tag: SmolStr::new(tag),
        }
    }
}

/// The attributes of one start tag.
///
/// Values are taken out as they are consumed so required-attribute checks
/// and leftovers stay cheap to express.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(Vec<(SmolStr, String)>);

impl Attrs {
    pub fn new(attrs: Vec<(SmolStr, String)>) -> Self {
        Self(attrs)
    }

    /// Remove and return an attribute value, if present.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == name)?;
        Some(self.0.remove(idx).1)
    }

    /// Remove and return a required attribute, or fail naming it.
    pub fn require(&mut self, name: &str, tag: &str) -> Result<String, LiftError> {
        self.take(name)
            .ok_or_else(|| LiftError::missing_attribute(format!("'{name}' on <{tag}>")))
    }

    /// Remove and parse an integer attribute. A malformed value is
    /// tolerated and dropped with a warning.
    pub fn take_u32(&mut self, name: &str, tag: &str) -> Option<u32> {
        let raw = self.take(name)?;
        match raw.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!(tag, attribute = name, value = %raw, "ignoring non-numeric attribute");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes() {
        let XmlEvent::Start { mut attrs, .. } =
            XmlEvent::start("entry", [("id", "e1"), ("order", "2")])
        else {
            unreachable!()
        };
        assert_eq!(attrs.take("id").as_deref(), Some("e1"));
        assert_eq!(attrs.take("id"), None);
        assert_eq!(attrs.take_u32("order", "entry"), Some(2));
    }

    #[test]
    fn require_names_the_attribute_and_tag() {
        let mut attrs = Attrs::default();
        let err = attrs.require("type", "relation").unwrap_err();
        assert!(err.to_string().contains("'type' on <relation>"));
    }

    #[test]
    fn bad_number_is_dropped() {
        let mut attrs = Attrs::new(vec![(SmolStr::new("order"), "two".into())]);
        assert_eq!(attrs.take_u32("order", "sense"), None);
    }
}
