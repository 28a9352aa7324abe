//! Stroke batch format consumed by renderers (`spec.md` §6).

use graft_util::Pt;
use serde::Serialize;

pub type Color = (f64, f64, f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Stroke {
    Line {
        start: Pt,
        end: Pt,
        color: Color,
        size: f64,
    },
    Dot {
        pos: Pt,
        color: Color,
        size: f64,
    },
}
