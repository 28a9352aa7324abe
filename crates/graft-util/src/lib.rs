//! graft-util - shared foundation types for the Graft workspace.
//!
//! Keeps the pieces that `graft-lex`, `graft-par`, and `graft-eval` all
//! need without pulling any one of those crates in as a dependency of
//! another: source spans for diagnostics, and the 2-D point type shared
//! by the evaluator and (eventually) a renderer.

mod span;

pub use span::Span;

/// A point in the 2-D plane a turtle moves across.
///
/// Plain data: Graft's evaluator never distinguishes points by
/// identity, only by value.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Pt {
    pub x: f64,
    pub y: f64,
}

impl Pt {
    pub const fn new(x: f64, y: f64) -> Self {
        Pt { x, y }
    }
}
