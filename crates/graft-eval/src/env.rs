//! Parent-linked scope chain (`spec.md` §3, §9).
//!
//! Each scope is a flat map behind `Rc<RefCell<_>>` so closures and
//! forked turtles can cheaply share ancestor scopes while owning a
//! private leaf. `local_items` only ever looks at the leaf map, per
//! `spec.md` §9's design note.

use std::hash::BuildHasherDefault;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::native::NativeFn;
use crate::value::Value;

/// Insertion-ordered map so `local_items` snapshots (used by
/// `graftrun_debug`) are reproducible across runs.
pub type Bindings = IndexMap<String, Value, BuildHasherDefault<FxHasher>>;

struct Scope {
    bindings: Bindings,
    parent: Option<Env>,
}

/// A reference-counted, mutable scope. Cloning an `Env` is cheap and
/// shares the same underlying scope (the usual closure-capture case);
/// `new_child` is the only way to get a distinct scope.
#[derive(Clone)]
pub struct Env(Rc<std::cell::RefCell<Scope>>);

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env").field("ptr", &Rc::as_ptr(&self.0)).finish()
    }
}

/// Turtle-state variables every fresh turtle env carries, per
/// `spec.md` §4.3's derived conventions and §4.4's magic `x`/`y`.
pub const TURTLE_STATE_VARS: &[&str] = &[
    "x", "y", "xprev", "yprev", "d", "s", "z", "r", "g", "b", "a", "f",
];

impl Env {
    fn new_scope(parent: Option<Env>) -> Env {
        Env(Rc::new(std::cell::RefCell::new(Scope {
            bindings: Bindings::default(),
            parent,
        })))
    }

    pub fn new_child(parent: &Env) -> Env {
        Env::new_scope(Some(parent.clone()))
    }

    pub fn ptr_eq(a: &Env, b: &Env) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Walk the chain looking up `name`, cloning the value found.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut cur = Some(self.clone());
        while let Some(scope) = cur {
            let borrowed = scope.0.borrow();
            if let Some(v) = borrowed.bindings.get(name) {
                return Some(v.clone());
            }
            cur = borrowed.parent.clone();
        }
        None
    }

    fn find_defining_scope(&self, name: &str) -> Option<Env> {
        let mut cur = Some(self.clone());
        while let Some(scope) = cur {
            if scope.0.borrow().bindings.contains_key(name) {
                return Some(scope);
            }
            let parent = scope.0.borrow().parent.clone();
            cur = parent;
        }
        None
    }

    /// Mutate the innermost scope that already defines `name`, else
    /// insert into this (the caller's current) scope.
    pub fn set(&self, name: &str, value: Value) {
        match self.find_defining_scope(name) {
            Some(scope) => {
                scope.0.borrow_mut().bindings.insert(name.to_string(), value);
            }
            None => {
                self.0.borrow_mut().bindings.insert(name.to_string(), value);
            }
        }
    }

    /// Define `name` directly in this scope, regardless of ancestors.
    /// Used for root init, parameter binding, and fork seeding.
    pub fn define_local(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(name.to_string(), value);
    }

    /// `x`/`y` writes shadow the previous value into `xprev`/`yprev`
    /// before the new value lands (`spec.md` §4.4).
    pub fn set_variable(&self, name: &str, value: Value) {
        if name == "x" {
            if let Some(old) = self.get("x") {
                self.set("xprev", old);
            }
        } else if name == "y" {
            if let Some(old) = self.get("y") {
                self.set("yprev", old);
            }
        }
        self.set(name, value);
    }

    /// Snapshot of this scope's own bindings only (not ancestors).
    pub fn local_items(&self) -> Bindings {
        self.0.borrow().bindings.clone()
    }

    /// The root env every program starts with: default turtle state
    /// plus native function bindings (`spec.md` §3, §4.6).
    pub fn root() -> Env {
        let root = Env::new_scope(None);
        for (name, value) in [
            ("d", 0.0),
            ("s", 10.0),
            ("x", 0.0),
            ("y", 0.0),
            ("xprev", 0.0),
            ("yprev", 0.0),
            ("z", 5.0),
            ("r", 0.0),
            ("g", 0.0),
            ("b", 0.0),
            ("a", 100.0),
            ("f", 0.0),
        ] {
            root.define_local(name, Value::Number(value));
        }
        for (name, nf) in [
            ("S", NativeFn::S),
            ("D", NativeFn::D),
            ("J", NativeFn::J),
            ("L", NativeFn::L),
            ("F", NativeFn::F),
            ("R", NativeFn::R),
            ("T", NativeFn::T),
            ("If", NativeFn::If),
            ("For", NativeFn::For),
            ("Get", NativeFn::Get),
        ] {
            root.define_local(name, Value::Native(nf));
        }
        root.define_local("endofloop", Value::EndOfLoop);
        root
    }

    /// A fresh leaf scope for a newly forked turtle: parented on
    /// `parent`, pre-seeded with copies of the current turtle-state
    /// variables so that later writes land in the fork's own scope
    /// rather than mutating the shared ancestor (`spec.md` §4.5's
    /// copy-on-write invariant; see `DESIGN.md` for why this crate
    /// seeds values up front rather than literally reparenting past
    /// the leaf).
    pub fn fork_child(parent: &Env, new_fork_id: i64) -> Env {
        let child = Env::new_child(parent);
        for name in TURTLE_STATE_VARS {
            if let Some(v) = parent.get(name) {
                child.define_local(name, v);
            }
        }
        child.define_local("f", Value::Number(new_fork_id as f64));
        child
    }
}
