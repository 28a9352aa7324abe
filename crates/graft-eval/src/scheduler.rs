//! Parallel time-step scheduler (`spec.md` §4.5, "the crux").
//!
//! One raw tick advances every live turtle by at most one stroke.
//! Evaluating a top-level statement is still fully synchronous — a
//! `T`/`For` construct runs every one of its iterations in a single
//! `eval` call, same as any other expression — but a statement that
//! produces more than one stroke only *delivers* its first stroke this
//! tick. The rest sit in the
//! turtle's `pending_strokes` queue and come out one per subsequent
//! tick, with the program counter held on that statement until the
//! queue drains (`DESIGN.md` grounds this in `test_repeating_commands`
//! and `test_For_over_array`). Forks requested during a tick are
//! queued and only join the live list once the tick's statements have
//! all run. `graftrun_debug` is this raw sequence; `graftrun` filters
//! it down to non-empty batches and knows when to give up early so it
//! never spins forever on a program that can no longer stroke.

use std::collections::VecDeque;

use graft_par::Ast;

use crate::env::{Bindings, Env};
use crate::error::EvalError;
use crate::interp::{eval, EvalCtx};
use crate::stroke::Stroke;
use crate::turtle::Turtle;

/// One turtle's contribution to a raw tick: the stroke it emitted, if
/// any, and a snapshot of its own leaf scope.
pub type TickEntry = (Option<Stroke>, Bindings);

struct PendingFork {
    parent_fork_id: i64,
    parent_env: Env,
    pc: usize,
    restart_pc: usize,
}

pub struct Scheduler<'a> {
    program: Vec<Ast>,
    turtles: Vec<Turtle>,
    next_fork_id: i64,
    max_forks: usize,
    rand: &'a dyn Fn(i64, i64) -> i64,
}

impl<'a> Scheduler<'a> {
    pub fn new(program: Vec<Ast>, max_forks: usize, rand: &'a dyn Fn(i64, i64) -> i64) -> Self {
        assert!(max_forks >= 1, "max_forks must be at least 1 (spec.md §4.5)");
        Scheduler {
            program,
            turtles: vec![Turtle::primordial()],
            next_fork_id: 1,
            max_forks,
            rand,
        }
    }

    /// Advance every live turtle by one stroke (or by one statement, if
    /// that statement strokes zero or once) and return this tick's
    /// per-turtle results.
    pub fn tick(&mut self) -> Result<Vec<TickEntry>, EvalError> {
        let live_count = self.turtles.len();
        let mut results = Vec::with_capacity(live_count);
        let mut pending_forks: Vec<PendingFork> = Vec::new();

        for i in 0..live_count {
            let entry = self.step_turtle(i, &mut pending_forks)?;
            self.turtles[i].ticks_without_stroke = if entry.0.is_none() {
                self.turtles[i].ticks_without_stroke + 1
            } else {
                0
            };
            results.push(entry);
        }

        self.apply_forks(pending_forks);
        tracing::debug!(tick_live = live_count, turtles_after = self.turtles.len(), "scheduler tick");

        Ok(results)
    }

    fn step_turtle(&mut self, i: usize, pending_forks: &mut Vec<PendingFork>) -> Result<TickEntry, EvalError> {
        if self.program.is_empty() {
            return Ok((None, self.turtles[i].env.local_items()));
        }

        // Drain a backlog left by a repeating construct before doing
        // anything else: the statement already ran, this just delivers
        // its next stroke.
        if let Some(stroke) = self.turtles[i].pending_strokes.pop_front() {
            if self.turtles[i].pending_strokes.is_empty() {
                self.turtles[i].pc = self.next_pc(i);
            }
            return Ok((Some(stroke), self.turtles[i].env.local_items()));
        }

        let pc = self.turtles[i].pc;
        let stmt = self.program[pc].clone();
        let env = self.turtles[i].env.clone();

        let (mut strokes, forks) = if let Ast::Label(_) = stmt {
            self.turtles[i].restart_pc = pc + 1;
            (Vec::new(), Vec::new())
        } else {
            let mut ctx = EvalCtx {
                strokes: Vec::new(),
                forks: Vec::new(),
                rand: self.rand,
            };
            eval(&stmt, &env, &mut ctx)?;
            tracing::trace!(pc, strokes = ctx.strokes.len(), "statement evaluated");
            (ctx.strokes, ctx.forks)
        };

        // Forks start where this turtle itself will resume next, so a
        // fork never re-executes the `F()` call that created it
        // (grounded in the fork-id progression across repeated forks
        // of the same lineage; see `DESIGN.md`).
        let next_pc = self.next_pc(i);

        for fr in forks {
            tracing::trace!(parent_fork_id = self.turtles[i].fork_id, "fork queued");
            pending_forks.push(PendingFork {
                parent_fork_id: self.turtles[i].fork_id,
                parent_env: fr.env,
                pc: next_pc,
                restart_pc: self.turtles[i].restart_pc,
            });
        }

        let delivered = if strokes.is_empty() {
            None
        } else {
            Some(strokes.remove(0))
        };

        if strokes.is_empty() {
            self.turtles[i].pc = next_pc;
        } else {
            // More strokes from this statement (a `T`/`For` iteration
            // still mid-flight) — hold the PC and drip the rest out
            // over the next ticks.
            self.turtles[i].pending_strokes = strokes.into();
        }

        Ok((delivered, env.local_items()))
    }

    fn next_pc(&self, i: usize) -> usize {
        let pc = self.turtles[i].pc;
        if pc + 1 >= self.program.len() {
            self.turtles[i].restart_pc
        } else {
            pc + 1
        }
    }

    /// New forks are appended to the end of the live list in the order
    /// their requests were generated (grounded in the fork-id ordering
    /// observed across multiple forks from the same parent in one
    /// tick; see `DESIGN.md`), then the list is trimmed from the front
    /// (oldest lineage first) to fit `max_forks`.
    fn apply_forks(&mut self, pending_forks: Vec<PendingFork>) {
        for pf in pending_forks {
            let id = self.next_fork_id;
            self.next_fork_id += 1;
            tracing::debug!(parent_fork_id = pf.parent_fork_id, new_fork_id = id, "fork applied");
            let child_env = Env::fork_child(&pf.parent_env, id);
            self.turtles.push(Turtle {
                env: child_env,
                pc: pf.pc,
                restart_pc: pf.restart_pc,
                fork_id: id,
                ticks_without_stroke: 0,
                pending_strokes: VecDeque::new(),
            });
        }

        if self.turtles.len() > self.max_forks {
            let excess = self.turtles.len() - self.max_forks;
            let dropped: Vec<i64> = self.turtles[..excess].iter().map(|t| t.fork_id).collect();
            tracing::warn!(?dropped, "dropped oldest turtles to fit max_forks");
            self.turtles.drain(0..excess);
        }
    }

    /// True once every live turtle has gone a full pass over the
    /// program without emitting a stroke — proof (for deterministic
    /// programs) that no further tick will ever stroke either
    /// (`spec.md` §4.5 "natural pause").
    fn all_turtles_exhausted(&self) -> bool {
        let lap = self.program.len().max(1);
        self.turtles.iter().all(|t| t.ticks_without_stroke >= lap)
    }
}

/// Raw per-tick sequence: every entry, including empty ones.
/// `graftrun_debug(ast, n, rand_fn, max_forks)` (`spec.md` §6).
pub struct GraftRunDebug<'a> {
    scheduler: Scheduler<'a>,
    remaining: usize,
    errored: bool,
}

impl<'a> Iterator for GraftRunDebug<'a> {
    type Item = Result<Vec<TickEntry>, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.errored || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.scheduler.tick() {
            Ok(entries) => Some(Ok(entries)),
            Err(e) => {
                self.errored = true;
                Some(Err(e))
            }
        }
    }
}

/// Filtered sequence of non-empty stroke batches.
/// `graftrun(ast, n, rand_fn, max_forks)` (`spec.md` §6).
pub struct GraftRun<'a> {
    scheduler: Scheduler<'a>,
    remaining_outputs: usize,
    done: bool,
}

impl<'a> Iterator for GraftRun<'a> {
    type Item = Result<Vec<Stroke>, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining_outputs == 0 {
            return None;
        }
        loop {
            match self.scheduler.tick() {
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Ok(batch) => {
                    let strokes: Vec<Stroke> = batch.into_iter().flat_map(|(s, _)| s).collect();
                    if !strokes.is_empty() {
                        self.remaining_outputs -= 1;
                        return Some(Ok(strokes));
                    }
                    if self.scheduler.all_turtles_exhausted() {
                        self.done = true;
                        return None;
                    }
                }
            }
        }
    }
}

pub fn graftrun_debug(
    program: Vec<Ast>,
    n: usize,
    rand: &dyn Fn(i64, i64) -> i64,
    max_forks: usize,
) -> GraftRunDebug<'_> {
    GraftRunDebug {
        scheduler: Scheduler::new(program, max_forks, rand),
        remaining: n,
        errored: false,
    }
}

pub fn graftrun(program: Vec<Ast>, n: usize, rand: &dyn Fn(i64, i64) -> i64, max_forks: usize) -> GraftRun<'_> {
    GraftRun {
        scheduler: Scheduler::new(program, max_forks, rand),
        remaining_outputs: n,
        done: n == 0,
    }
}
