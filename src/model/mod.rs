//! The domain entity graph: a tree of mutually-referencing typed nodes
//! built on a small set of shared capability traits.
//!
//! Ownership is strictly tree-shaped. Entry, Sense, and Range
//! cross-reference each other by id string, never by pointer, so the graph
//! has no reference cycles; "find my parent" queries go through the
//! [`Dictionary`] lookups instead of back-pointers.

mod dictionary;
mod entry;
mod extensible;
mod header;
mod sense;

pub use dictionary::Dictionary;
pub use entry::{Entry, Etymology, Media, Pronunciation, Relation, Variant};
pub use extensible::{
    Annotation, Dated, Described, Field, HasAnnotations, HasFields, HasNotes, HasPronunciations,
    HasRelations, HasTraits, Identified, Note, Trait,
};
pub use header::{
    FieldDefinition, FieldKind, FieldTarget, FieldType, Header, Range, RangeElement,
};
pub use sense::{Example, GrammaticalInfo, Illustration, Reversal, Sense};
