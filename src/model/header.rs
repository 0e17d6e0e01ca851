//! Header declarations: ranges (named value spaces) and field definitions.

use smol_str::SmolStr;

use crate::model::extensible::{
    Annotation, Described, Field, HasAnnotations, HasFields, HasTraits, Trait,
};
use crate::text::MultiText;

/// The document header: a description plus the range and field-definition
/// catalogs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub description: MultiText,
    pub ranges: Vec<Range>,
    pub field_definitions: Vec<FieldDefinition>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.ranges.is_empty() && self.field_definitions.is_empty()
    }

    pub fn range(&self, id: &str) -> Option<&Range> {
        self.ranges.iter().find(|r| r.id == id)
    }

    pub fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_definitions.iter().find(|f| f.name == name)
    }
}

/// A named value space declared in the header and referenced by
/// field definitions. Range ids are unique within a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub id: String,
    /// Set when the range content lives in an external catalog file.
    pub href: Option<String>,
    pub guid: Option<String>,
    pub label: MultiText,
    pub abbreviation: MultiText,
    pub description: MultiText,
    pub elements: Vec<RangeElement>,
}

impl Range {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: None,
            guid: None,
            label: MultiText::new(),
            abbreviation: MultiText::new(),
            description: MultiText::new(),
            elements: Vec::new(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&RangeElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}

impl Described for Range {
    fn describe(&self) -> String {
        format!("range '{}'", self.id)
    }
}

/// One member of a range, optionally parented to another member of the
/// same range (forming a hierarchy of values).
#[derive(Debug, Clone, PartialEq)]
pub struct RangeElement {
    pub id: String,
    pub parent: Option<String>,
    pub label: MultiText,
    pub abbreviation: MultiText,
    pub description: MultiText,
    pub fields: Vec<Field>,
    pub traits: Vec<Trait>,
    pub annotations: Vec<Annotation>,
}

impl RangeElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            label: MultiText::new(),
            abbreviation: MultiText::new(),
            description: MultiText::new(),
            fields: Vec::new(),
            traits: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl Described for RangeElement {
    fn describe(&self) -> String {
        format!("range-element '{}'", self.id)
    }
}

impl HasFields for RangeElement {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl HasTraits for RangeElement {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
    fn traits_mut(&mut self) -> &mut Vec<Trait> {
        &mut self.traits
    }
}

impl HasAnnotations for RangeElement {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }
}

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// The declared value shape of a field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Datetime,
    Integer,
    Option,
    OptionCollection,
    OptionSequence,
    Multistring,
    Multitext,
}

impl FieldType {
    /// Parse a declared type keyword; unknown keywords yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "datetime" => Some(Self::Datetime),
            "integer" => Some(Self::Integer),
            "option" => Some(Self::Option),
            "option-collection" => Some(Self::OptionCollection),
            "option-sequence" => Some(Self::OptionSequence),
            "multistring" => Some(Self::Multistring),
            "multitext" => Some(Self::Multitext),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Datetime => "datetime",
            Self::Integer => "integer",
            Self::Option => "option",
            Self::OptionCollection => "option-collection",
            Self::OptionSequence => "option-sequence",
            Self::Multistring => "multistring",
            Self::Multitext => "multitext",
        }
    }

    /// The definition shape this value type implies.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Datetime
            | Self::Integer
            | Self::Option
            | Self::OptionCollection
            | Self::OptionSequence => FieldKind::Trait,
            Self::Multistring | Self::Multitext => FieldKind::Field,
        }
    }
}

/// Whether a field definition describes a trait, a field, or could not be
/// classified yet.
///
/// Definitions without a declared type stay `Unknown` until the finalize
/// pass resolves them against the trait and field names actually used in
/// the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldKind {
    Field,
    Trait,
    #[default]
    Unknown,
}

/// An entity kind a field definition may apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Entry,
    Sense,
    Example,
    Variant,
    Pronunciation,
    Note,
    Etymology,
    Relation,
    Reversal,
    Range,
    RangeElement,
}

impl FieldTarget {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "entry" => Some(Self::Entry),
            "sense" => Some(Self::Sense),
            "example" => Some(Self::Example),
            "variant" => Some(Self::Variant),
            "pronunciation" => Some(Self::Pronunciation),
            "note" => Some(Self::Note),
            "etymology" => Some(Self::Etymology),
            "relation" => Some(Self::Relation),
            "reversal" => Some(Self::Reversal),
            "range" => Some(Self::Range),
            "range-element" => Some(Self::RangeElement),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Sense => "sense",
            Self::Example => "example",
            Self::Variant => "variant",
            Self::Pronunciation => "pronunciation",
            Self::Note => "note",
            Self::Etymology => "etymology",
            Self::Relation => "relation",
            Self::Reversal => "reversal",
            Self::Range => "range",
            Self::RangeElement => "range-element",
        }
    }
}

/// A header-level declaration of a trait's or field's expected shape and
/// applicable targets.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: SmolStr,
    pub value_type: Option<FieldType>,
    pub applies_to: Vec<FieldTarget>,
    /// Id of the range supplying this definition's value space.
    pub option_range: Option<String>,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
            applies_to: Vec::new(),
            option_range: None,
            kind: FieldKind::Unknown,
        }
    }

    /// Set the declared value type, deriving the kind from it.
    pub fn set_value_type(&mut self, value_type: FieldType) {
        self.kind = value_type.kind();
        self.value_type = Some(value_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("datetime", FieldKind::Trait)]
    #[case("integer", FieldKind::Trait)]
    #[case("option", FieldKind::Trait)]
    #[case("option-collection", FieldKind::Trait)]
    #[case("option-sequence", FieldKind::Trait)]
    #[case("multistring", FieldKind::Field)]
    #[case("multitext", FieldKind::Field)]
    fn declared_type_implies_kind(#[case] keyword: &str, #[case] expected: FieldKind) {
        let ty = FieldType::from_keyword(keyword).unwrap();
        assert_eq!(ty.kind(), expected);
        assert_eq!(ty.as_keyword(), keyword);
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        assert_eq!(FieldType::from_keyword("blob"), None);
    }

    #[test]
    fn undeclared_type_stays_unknown() {
        let def = FieldDefinition::new("cv-pattern");
        assert_eq!(def.kind, FieldKind::Unknown);
    }

    #[test]
    fn set_value_type_updates_kind() {
        let mut def = FieldDefinition::new("from-part-of-speech");
        def.set_value_type(FieldType::OptionCollection);
        assert_eq!(def.kind, FieldKind::Trait);
    }
}
