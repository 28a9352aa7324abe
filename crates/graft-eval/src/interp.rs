//! Single-tick expression evaluator (`spec.md` §4.3, §4.4).
//!
//! `eval` evaluates one AST node to completion, synchronously: nested
//! calls, `T`/`For`/`If` repetitions, and user function bodies all run
//! to exhaustion within this one call. Strokes emitted anywhere in that
//! traversal bubble up into `ctx.strokes`; the turtle-level suspension
//! point is between whole top-level statements, not inside this call
//! (`spec.md` §5's "exactly one suspension point").

use std::f64::consts::PI;
use std::rc::Rc;

use graft_lex::Op;
use graft_par::Ast;
use graft_util::Pt;

use crate::env::Env;
use crate::error::{EvalError, EvalResult};
use crate::native::NativeFn;
use crate::stroke::Stroke;
use crate::value::{UserFunction, Value};

/// A queued fork request: `F()` cannot splice into the live list
/// mid-tick (`spec.md` §4.5), so it records just enough for the
/// scheduler to build the new turtle once this tick's stepping is
/// done.
pub struct ForkRequest {
    pub env: Env,
}

pub struct EvalCtx<'a> {
    pub strokes: Vec<Stroke>,
    pub forks: Vec<ForkRequest>,
    pub rand: &'a dyn Fn(i64, i64) -> i64,
}

pub fn eval(ast: &Ast, env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    match ast {
        Ast::Number(text, _) => {
            let n: f64 = text.parse().expect("lexer only produces valid number literals");
            Ok(Value::Number(n))
        }
        Ast::String(text, _) => Ok(Value::Str(Rc::from(text.as_str()))),
        Ast::Symbol(name, _) => env.get(name).ok_or_else(|| EvalError::Name(name.clone())),
        Ast::Negative(inner, _) => {
            let v = eval(inner, env, ctx)?;
            Ok(Value::Number(-as_number(&v)?))
        }
        Ast::Operation(op, l, r, _) => {
            let lv = eval(l, env, ctx)?;
            let rv = eval(r, env, ctx)?;
            eval_operation(*op, &lv, &rv)
        }
        Ast::Assignment(name, value, _) => {
            let v = eval(value, env, ctx)?;
            env.set_variable(name, v);
            Ok(Value::None)
        }
        Ast::Modify(op, name, value, _) => {
            let current = env.get(name).ok_or_else(|| EvalError::Name(name.clone()))?;
            let rhs = eval(value, env, ctx)?;
            let updated = eval_operation(*op, &current, &rhs)?;
            env.set_variable(name, updated);
            Ok(Value::None)
        }
        Ast::Array(items, _) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval(item, env, ctx)?);
            }
            Ok(Value::Array(Rc::from(values)))
        }
        Ast::FunctionDef(params, body, _) => Ok(Value::Function(Rc::new(UserFunction {
            params: params.clone(),
            body: Rc::clone(body),
            captured: env.clone(),
        }))),
        Ast::FunctionCall(callee, args, _) => {
            let callee_v = eval(callee, env, ctx)?;
            let mut arg_values = Vec::with_capacity(args.len());
            for a in args {
                arg_values.push(eval(a, env, ctx)?);
            }
            invoke(&callee_v, arg_values, env, ctx)
        }
        // Nested labels are a no-op; only the top-level scheduler loop
        // treats `^` as a restart marker (`spec.md` §9).
        Ast::Label(_) => Ok(Value::None),
    }
}

fn as_number(v: &Value) -> EvalResult<f64> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::Type(format!(
            "Expected a number, found {}.",
            other.type_name()
        ))),
    }
}

fn eval_operation(op: Op, l: &Value, r: &Value) -> EvalResult<Value> {
    let a = as_number(l)?;
    let b = as_number(r)?;
    let result = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Lt => bool_num(a < b),
        Op::Gt => bool_num(a > b),
        Op::Le => bool_num(a <= b),
        Op::Ge => bool_num(a >= b),
        Op::Eq => bool_num(a == b),
    };
    Ok(Value::Number(result))
}

fn bool_num(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Invoke a callable `Value` with already-evaluated arguments.
/// `call_site_env` is the env the call happens in — needed by natives
/// like `F()`/`S()` that read and mutate turtle state directly; a user
/// function's own body instead runs in a fresh child of its *captured*
/// env, per `spec.md` §4.4.
pub fn invoke(callee: &Value, args: Vec<Value>, call_site_env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    match callee {
        Value::Function(f) => invoke_user_function(f, args, ctx),
        Value::Native(nf) => invoke_native(*nf, args, call_site_env, ctx),
        other => Err(EvalError::Type(format!("{} is not callable.", other.type_name()))),
    }
}

fn invoke_user_function(f: &Rc<UserFunction>, args: Vec<Value>, ctx: &mut EvalCtx) -> EvalResult<Value> {
    let call_env = Env::new_child(&f.captured);
    for (i, param) in f.params.iter().enumerate() {
        let v = args.get(i).cloned().unwrap_or(Value::None);
        call_env.define_local(param, v);
    }
    let mut last = Value::None;
    for stmt in f.body.iter() {
        last = eval(stmt, &call_env, ctx)?;
    }
    Ok(last)
}

/// Evaluate a `T`/`If`/`For` branch argument (a block or any other
/// callable value) with no arguments, in the calling turtle's env.
fn invoke_zero_arg(value: &Value, env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    invoke(value, Vec::new(), env, ctx)
}

fn invoke_native(nf: NativeFn, args: Vec<Value>, env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    let expected = nf.arity();
    if args.len() != expected {
        return Err(EvalError::Arity(nf.name().to_string(), expected, args.len()));
    }

    match nf {
        NativeFn::S => native_s(env, ctx),
        NativeFn::D => native_d(env, ctx),
        NativeFn::J => native_j(env),
        NativeFn::L => native_l(env, ctx),
        NativeFn::F => {
            ctx.forks.push(ForkRequest { env: env.clone() });
            Ok(Value::None)
        }
        NativeFn::R => Ok(Value::Number((ctx.rand)(-10, 10) as f64)),
        NativeFn::T => native_t(&args[0], &args[1], env, ctx),
        NativeFn::If => native_if(&args[0], &args[1], &args[2], env, ctx),
        NativeFn::For => native_for(&args[0], &args[1], env, ctx),
        NativeFn::Get => native_get(&args[0], &args[1]),
    }
}

// -- turtle primitives (`spec.md` §4.3) -------------------------------

fn num(env: &Env, name: &str) -> f64 {
    match env.get(name) {
        Some(Value::Number(n)) => n,
        _ => panic!("turtle-state variable '{name}' missing or non-numeric; root env always defines it"),
    }
}

fn theta(env: &Env) -> f64 {
    2.0 * PI * num(env, "d") / 360.0
}

fn pos(env: &Env) -> Pt {
    Pt::new(num(env, "x"), num(env, "y"))
}

fn prev_pos(env: &Env) -> Pt {
    Pt::new(num(env, "xprev"), num(env, "yprev"))
}

fn color(env: &Env) -> (f64, f64, f64, f64) {
    (num(env, "r"), num(env, "g"), num(env, "b"), num(env, "a"))
}

fn size(env: &Env) -> f64 {
    num(env, "z")
}

fn stepped_pos(env: &Env) -> Pt {
    let th = theta(env);
    let s = num(env, "s");
    let old = pos(env);
    Pt::new(old.x + s * th.sin(), old.y + s * th.cos())
}

fn native_s(env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    let old = pos(env);
    let new = stepped_pos(env);
    let (c, z) = (color(env), size(env));
    env.set_variable("x", Value::Number(new.x));
    env.set_variable("y", Value::Number(new.y));
    ctx.strokes.push(Stroke::Line {
        start: old,
        end: new,
        color: c,
        size: z,
    });
    Ok(Value::None)
}

fn native_j(env: &Env) -> EvalResult<Value> {
    let new = stepped_pos(env);
    env.set_variable("x", Value::Number(new.x));
    env.set_variable("y", Value::Number(new.y));
    Ok(Value::None)
}

fn native_d(env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    ctx.strokes.push(Stroke::Dot {
        pos: pos(env),
        color: color(env),
        size: size(env),
    });
    Ok(Value::None)
}

fn native_l(env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    ctx.strokes.push(Stroke::Line {
        start: prev_pos(env),
        end: pos(env),
        color: color(env),
        size: size(env),
    });
    Ok(Value::None)
}

fn native_t(n: &Value, f: &Value, env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    let count = as_number(n)?;
    if count < 0.0 {
        return Err(EvalError::Type("T's repeat count must not be negative.".to_string()));
    }
    for _ in 0..count as u64 {
        invoke_zero_arg(f, env, ctx)?;
    }
    Ok(Value::None)
}

fn native_if(cond: &Value, then: &Value, else_: &Value, env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    if cond.truthy() {
        invoke_zero_arg(then, env, ctx)
    } else {
        invoke_zero_arg(else_, env, ctx)
    }
}

/// Iterates either an array value, or a zero-arg iterator callable
/// that yields `EndOfLoop` to signal exhaustion (`spec.md` §4.6).
fn native_for(source: &Value, f: &Value, env: &Env, ctx: &mut EvalCtx) -> EvalResult<Value> {
    match source {
        Value::Array(items) => {
            for item in items.iter() {
                invoke(f, vec![item.clone()], env, ctx)?;
            }
        }
        iterator => loop {
            let next = invoke_zero_arg(iterator, env, ctx)?;
            if matches!(next, Value::EndOfLoop) {
                break;
            }
            invoke(f, vec![next], env, ctx)?;
        },
    }
    Ok(Value::None)
}

fn native_get(array: &Value, index: &Value) -> EvalResult<Value> {
    let items = match array {
        Value::Array(items) => items,
        other => {
            return Err(EvalError::Type(format!(
                "Get's first argument must be an array, found {}.",
                other.type_name()
            )))
        }
    };
    let i = as_number(index)?;
    if i < 0.0 || i.fract() != 0.0 {
        return Err(EvalError::Type("Get's index must be a non-negative whole number.".to_string()));
    }
    items
        .get(i as usize)
        .cloned()
        .ok_or_else(|| EvalError::Type(format!("Get index {} is out of bounds.", i as usize)))
}
