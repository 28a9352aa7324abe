//! graft-eval - environment, value model, expression evaluator, and
//! parallel scheduler for Graft (`spec.md` §4.3-§4.6).

mod env;
mod error;
mod interp;
mod native;
mod scheduler;
mod stroke;
mod turtle;
mod value;

pub use env::{Bindings, Env};
pub use error::{EvalError, EvalResult};
pub use native::NativeFn;
pub use scheduler::{graftrun, graftrun_debug, GraftRun, GraftRunDebug, TickEntry};
pub use stroke::{Color, Stroke};
pub use value::{UserFunction, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use graft_util::Pt;

    fn no_rand(_lo: i64, _hi: i64) -> i64 {
        0
    }

    fn run(src: &str, n: usize) -> Vec<Vec<Stroke>> {
        let ast = graft_par::parse(src).unwrap();
        graftrun(ast, n, &no_rand, 64).map(|r| r.unwrap()).collect()
    }

    fn run_debug(src: &str, n: usize, max_forks: usize) -> Vec<Vec<TickEntry>> {
        let ast = graft_par::parse(src).unwrap();
        graftrun_debug(ast, n, &no_rand, max_forks).map(|r| r.unwrap()).collect()
    }

    fn line(sx: f64, sy: f64, ex: f64, ey: f64) -> Stroke {
        Stroke::Line {
            start: Pt::new(sx, sy),
            end: Pt::new(ex, ey),
            color: (0.0, 0.0, 0.0, 100.0),
            size: 5.0,
        }
    }

    fn dot(x: f64, y: f64) -> Stroke {
        Stroke::Dot {
            pos: Pt::new(x, y),
            color: (0.0, 0.0, 0.0, 100.0),
            size: 5.0,
        }
    }

    /// Scenario 1 (`spec.md` §8).
    #[test]
    fn two_steps_draw_two_lines() {
        let batches = run("S() S()", 2);
        assert_eq!(batches, vec![vec![line(0.0, 0.0, 0.0, 10.0)], vec![line(0.0, 10.0, 0.0, 20.0)]]);
    }

    /// Scenario 2 (`spec.md` §8): three non-stroking raw ticks, then a line.
    #[test]
    fn turn_right_then_jump_then_step() {
        let ticks = run_debug("d+=90 s=25 J() S()", 4, 64);
        assert!(ticks[0][0].0.is_none());
        assert!(ticks[1][0].0.is_none());
        assert!(ticks[2][0].0.is_none());
        assert_eq!(ticks[3][0].0, Some(line(25.0, 0.0, 50.0, 0.0)));
    }

    /// Scenario 3 (`spec.md` §8): the fork created in tick 0 draws
    /// alongside the primordial in tick 1, the first non-empty output.
    #[test]
    fn fork_then_step_draws_in_parallel() {
        let batches = run("F() S()", 1);
        assert_eq!(batches, vec![vec![line(0.0, 0.0, 0.0, 10.0), line(0.0, 0.0, 0.0, 10.0)]]);
    }

    /// Scenario 4 (`spec.md` §8): `T(5,F)` forks five times in one
    /// tick; trimming to `max_forks=1` keeps only the newest.
    #[test]
    fn repeated_fork_past_limit_keeps_newest() {
        let ticks = run_debug("T(5, F) d+=10", 2, 1);
        assert_eq!(ticks[1].len(), 1);
    }

    /// Scenario 6 (`spec.md` §8): the loop resumes after `^`.
    #[test]
    fn label_resumes_the_loop() {
        let batches = run("d=90 ^ d+=90 S()", 2);
        assert_eq!(
            batches,
            vec![vec![line(0.0, 0.0, 0.0, -10.0)], vec![line(0.0, -10.0, -10.0, -10.0)]]
        );
    }

    #[test]
    fn magic_xy_shadow_into_prev() {
        let ast = graft_par::parse("x=5 y=7").unwrap();
        let mut ticks = graftrun_debug(ast, 2, &no_rand, 64);
        let first = ticks.next().unwrap().unwrap();
        let snapshot = &first[0].1;
        assert_eq!(snapshot.get("x"), Some(&Value::Number(5.0)));
        assert_eq!(snapshot.get("xprev"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn dot_and_get_and_array() {
        let batches = run("arr=[3,4] D() S()", 3);
        assert_eq!(batches[0], vec![dot(0.0, 0.0)]);
    }

    #[test]
    fn name_error_on_unbound_symbol() {
        let ast = graft_par::parse("nope").unwrap();
        let mut it = graftrun_debug(ast, 1, &no_rand, 64);
        assert!(matches!(it.next(), Some(Err(EvalError::Name(_)))));
    }

    #[test]
    fn calling_a_number_is_a_type_error() {
        let ast = graft_par::parse("x=5 x()").unwrap();
        let mut it = graftrun_debug(ast, 2, &no_rand, 64);
        assert!(it.next().unwrap().is_ok());
        assert!(matches!(it.next(), Some(Err(EvalError::Type(_)))));
    }

    #[test]
    fn does_not_lock_on_a_program_that_never_strokes() {
        let batches = run("d+=10", 100);
        assert!(batches.is_empty());
    }

    #[test]
    fn user_function_can_emit_a_stroke() {
        let batches = run("P={S()} P()", 1);
        assert_eq!(batches, vec![vec![line(0.0, 0.0, 0.0, 10.0)]]);
    }

    #[test]
    fn for_over_iterator_function_reads_endofloop() {
        let src = "i=0 next={:() If(i<2, {:() j=i i+=1 j}, {:() endofloop})} For(next, {:(v) D() x=v}) S()";
        let batches = run(src, 3);
        assert_eq!(
            batches,
            vec![vec![dot(0.0, 0.0)], vec![dot(0.0, 0.0)], vec![line(1.0, 0.0, 1.0, 10.0)]]
        );
    }

    /// Scenario 5 (`spec.md` §8): `For` suspends after each
    /// stroke-emitting iteration instead of running the whole array to
    /// completion in one tick (grounded in `test_For_over_array`,
    /// `examples/original_source/tests/test_eval_cell.py`).
    #[test]
    fn for_over_array_suspends_per_iteration() {
        let batches = run("arr=[7,2] For(arr,{:(it)x=it D()}) S()", 3);
        assert_eq!(
            batches,
            vec![vec![dot(7.0, 0.0)], vec![dot(2.0, 0.0)], vec![line(2.0, 0.0, 2.0, 10.0)]]
        );
    }

    /// `test_repeating_commands` (`examples/original_source/tests/test_eval_cell.py`):
    /// a stroke-emitting `T` delivers one stroke per tick, not all of
    /// them in the tick it starts.
    #[test]
    fn repeat_count_suspends_per_stroke() {
        let batches = run("T(3,S)", 3);
        assert_eq!(
            batches,
            vec![
                vec![line(0.0, 0.0, 0.0, 10.0)],
                vec![line(0.0, 10.0, 0.0, 20.0)],
                vec![line(0.0, 20.0, 0.0, 30.0)],
            ]
        );
    }
}
