//! `DepVar`: the dependent variable that owns a graph and triggers sweeps.

use tracing::debug;

use crate::arena::{VertexId, NONE};
use crate::error::ZhadError;
use crate::graph::{self, GraphHandle};
use crate::sweep;
use crate::value::{IndepVar, Value};

/// The output of an expression. Owns the graph all the `IndepVar`s bound to
/// it via `depend_on` and all `Value`s derived from them ultimately share.
///
/// Assigning a freshly computed `Value` into a `DepVar` runs the reverse
/// sweep, after which `derivative1`/`derivative2` read the adjoints and
/// Hessian entries it left behind.
pub struct DepVar {
    graph: GraphHandle,
    value: f64,
    id: VertexId,
}

impl DepVar {
    /// A `DepVar` with no graph yet; call `depend_on` before assigning.
    pub fn new() -> Self {
        DepVar {
            graph: graph::new_handle(),
            value: 0.0,
            id: NONE,
        }
    }

    /// Binds `vars` as this `DepVar`'s independent variables, clearing any
    /// prior graph and arena contents.
    ///
    /// Variables are attached in reverse order: the native library this is
    /// modeled on assigns leaf ids through a recursive `dependOn(first,
    /// rest...)` that binds `rest` before `first`, so the last argument gets
    /// the lowest id and the first argument the highest. Iterating `vars` in
    /// reverse here reproduces that id assignment exactly.
    pub fn depend_on(&mut self, vars: &mut [IndepVar]) {
        self.graph = graph::new_handle();
        {
            let mut state = self.graph.borrow_mut();
            state.arena.clear();
            state.num_indep_vars = vars.len();
        }
        for v in vars.iter_mut().rev() {
            let id = self.graph.borrow_mut().arena.create_leaf();
            v.attach(self.graph.clone(), id);
        }
        debug!(count = vars.len(), "depend_on: bound independent variables");
    }

    /// Assigns `result` as this `DepVar`'s value and runs the reverse sweep
    /// seeded from it. `result` must belong to the same graph this `DepVar`
    /// was bound to via `depend_on` -- checked with `debug_assert!` here; use
    /// `try_assign` for a checked alternative.
    pub fn assign(&mut self, result: Value) {
        debug_assert!(
            std::rc::Rc::ptr_eq(&self.graph, result.graph()),
            "assigned a Value from a different graph than this DepVar's depend_on"
        );
        self.value = result.value();
        self.id = result.id();
        let mut state = self.graph.borrow_mut();
        let num_indep_vars = state.num_indep_vars;
        sweep::propagate(&mut state.arena, num_indep_vars, self.id, 1.0);
    }

    /// Checked form of [`assign`](Self::assign): returns
    /// [`ZhadError::GraphMismatch`] instead of panicking (in debug builds) or
    /// silently misbehaving (in release builds) when `result` belongs to a
    /// different graph.
    pub fn try_assign(&mut self, result: Value) -> Result<(), ZhadError> {
        if !std::rc::Rc::ptr_eq(&self.graph, result.graph()) {
            return Err(ZhadError::GraphMismatch);
        }
        self.assign(result);
        Ok(())
    }

    /// The value most recently assigned.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// `d(self)/d(x)`, read from the adjoint the last `assign` left on `x`'s
    /// vertex. `0.0` if `x` was never bound via `depend_on`.
    pub fn derivative1(&self, x: &IndepVar) -> f64 {
        if x.id() == NONE {
            return 0.0;
        }
        let state = self.graph.borrow();
        if x.id() >= state.arena.len() {
            return 0.0;
        }
        state.arena.index(x.id()).weight
    }

    /// `d2(self)/d(x)d(y)`, read from the Hessian's sparse lower-triangular
    /// store left by the last `assign`. `0.0` if either variable was never
    /// bound via `depend_on`.
    pub fn derivative2(&self, x: &IndepVar, y: &IndepVar) -> f64 {
        if x.id() == NONE || y.id() == NONE {
            return 0.0;
        }
        let state = self.graph.borrow();
        if x.id() >= state.arena.len() || y.id() >= state.arena.len() {
            return 0.0;
        }
        if x.id() == y.id() {
            return state.arena.index(x.id()).self_ord2_weight;
        }
        let hi = x.id().max(y.id());
        let lo = x.id().min(y.id());
        state
            .arena
            .index(hi)
            .ord2_edges
            .iter()
            .find(|e| e.other == lo)
            .map(|e| e.weight)
            .unwrap_or(0.0)
    }
}

impl Default for DepVar {
    fn default() -> Self {
        DepVar::new()
    }
}
