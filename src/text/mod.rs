//! The multilingual-text subsystem: span trees, forms, and multitexts.
//!
//! Layered bottom-up:
//!
//! ```text
//! MultiText   one Form per language tag, order-preserving
//!   ↓
//! Form        a language tag + a span tree + form-level annotations
//!   ↓
//! Span        literal text leaf, or ordered attributed child spans
//! ```
//!
//! Markup and plain renderings are pure functions of the tree; callers that
//! mutate a form after parse recompute them on demand.

mod form;
mod multitext;
mod span;

pub use form::Form;
pub use multitext::MultiText;
pub use span::{DepthFirst, Span, SpanContent};
