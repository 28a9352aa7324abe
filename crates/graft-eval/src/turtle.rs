//! A single scheduled agent (`spec.md` §3 "Turtle").

use std::collections::VecDeque;

use crate::env::Env;
use crate::stroke::Stroke;

pub struct Turtle {
    pub env: Env,
    pub pc: usize,
    pub restart_pc: usize,
    pub fork_id: i64,
    /// Consecutive raw ticks this turtle has produced no stroke.
    /// Bookkeeping for `graftrun`'s natural-pause early exit
    /// (`spec.md` §4.5) — irrelevant to `graftrun_debug`, which always
    /// yields exactly the ticks it's asked for.
    pub ticks_without_stroke: usize,
    /// Strokes a repeating construct (`T`, `For`) produced on the tick
    /// it ran but hasn't delivered yet. The scheduler drains one per
    /// tick and holds the program counter on this statement until the
    /// queue empties, so a three-iteration `T(3,S)` yields three ticks
    /// instead of one.
    pub pending_strokes: VecDeque<Stroke>,
}

impl Turtle {
    pub fn primordial() -> Turtle {
        Turtle {
            env: Env::root(),
            pc: 0,
            restart_pc: 0,
            fork_id: 0,
            ticks_without_stroke: 0,
            pending_strokes: VecDeque::new(),
        }
    }
}
