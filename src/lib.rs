//! # liftlex
//!
//! Core library for LIFT lexicon parsing, typed dictionary model, and
//! serialization.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! format    → load/save entry points, format handler trait
//!   ↓
//! writer    → fixed-order serialization back to LIFT markup
//!   ↓
//! parser    → streaming event state machine over two stacks
//!   ↓
//! builder   → entity factory, invariants, finalize pass
//!   ↓
//! model     → the typed entity graph (Dictionary, Entry, Sense, ...)
//!   ↓
//! text      → MultiText / Form / span-tree subsystem
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let dict = liftlex::load("lexicon.lift")?;
//! println!("{} entries", dict.entry_count());
//! liftlex::save(&dict, "lexicon.out.lift")?;
//! ```

// ============================================================================
// MODULES (dependency order: text → model → builder → parser → writer → format)
// ============================================================================

/// Error types shared across the crate
pub mod error;

/// Multilingual text: span trees, forms, multitexts
pub mod text;

/// The typed entity graph
pub mod model;

/// Entity factory, uniqueness invariants, finalize pass
pub mod builder;

/// Streaming event parser
pub mod parser;

/// Serialization back to LIFT markup
pub mod writer;

/// Format handler and load/save entry points
pub mod format;

// Re-export the public surface
pub use builder::Builder;
pub use error::LiftError;
pub use format::{DocumentFormat, Lift, detect_format, load, load_bytes, save, save_bytes};
pub use model::{
    Annotation, Dictionary, Entry, Etymology, Example, Field, FieldDefinition, FieldKind,
    FieldTarget, FieldType, GrammaticalInfo, Header, Illustration, Media, Note, Pronunciation,
    Range, RangeElement, Relation, Reversal, Sense, Trait, Variant,
};
pub use parser::LiftParser;
pub use text::{Form, MultiText, Span, SpanContent};
pub use writer::LiftWriter;
