//! `Value`: a numeric result tagged with the vertex that produced it.
//!
//! `Value` is the type every arithmetic operator and math function in
//! `ops.rs` consumes and produces. `IndepVar` is the leaf-shaped variant
//! users construct directly and bind to a `DepVar` via `depend_on`.

use std::fmt;

use crate::arena::VertexId;
use crate::graph::{self, GraphHandle};

/// One intermediate (or leaf) value in a computation: a number plus the
/// vertex that records how it was derived.
///
/// Cheap to clone: cloning shares the underlying graph via `Rc`, it does not
/// duplicate any arena storage.
#[derive(Clone)]
pub struct Value {
    value: f64,
    id: VertexId,
    graph: GraphHandle,
}

impl Value {
    pub(crate) fn new(value: f64, id: VertexId, graph: GraphHandle) -> Self {
        Value { value, id, graph }
    }

    /// The numeric value this `Value` carries.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn id(&self) -> VertexId {
        self.id
    }

    pub(crate) fn graph(&self) -> &GraphHandle {
        &self.graph
    }

    /// Whether `self` and `other` were built against the same graph. Combining
    /// values from two different graphs (two different `DepVar`s, or a stray
    /// `IndepVar` that was never `depend_on`-ed) is a programming error: the
    /// vertex ids would be meaningless outside their own arena.
    pub(crate) fn same_graph(&self, other: &Value) -> bool {
        std::rc::Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// Builds the result of a one-fanin operation: allocates a vertex in the
    /// same graph as `a`, wired with local partial `w` and second partial
    /// `w2`, and wraps `result` around it.
    pub(crate) fn from_unary(a: &Value, result: f64, w: f64, w2: f64) -> Value {
        let id = {
            let mut state = a.graph.borrow_mut();
            state.arena.create_unary(a.id, w, w2)
        };
        Value::new(result, id, a.graph.clone())
    }

    /// Builds the result of a two-fanin operation. `a` and `b` must share a
    /// graph; debug builds assert this, release builds trust the caller (the
    /// public operators always call this through code paths that hold the
    /// invariant by construction).
    pub(crate) fn from_binary(a: &Value, wa: f64, b: &Value, wb: f64, w2: f64, result: f64) -> Value {
        debug_assert!(
            a.same_graph(b),
            "combined two Values that belong to different graphs"
        );
        let id = {
            let mut state = a.graph.borrow_mut();
            state.arena.create_binary(a.id, wa, b.id, wb, w2)
        };
        Value::new(result, id, a.graph.clone())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("id", &self.id)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id: {}; value: {}", self.id, self.value)
    }
}

/// An independent variable: a leaf `Value` that does not exist in any graph
/// until it is bound to one via `DepVar::depend_on`.
///
/// Before binding, `set` only ever touches the numeric value -- arithmetic
/// performed on an unbound `IndepVar` (through `.v()`) will simply never
/// share a graph with anything, and any attempt to combine it into an
/// expression trips the same-graph check. Each unbound `IndepVar` owns a
/// private placeholder graph of its own, so two never-bound `IndepVar`s are
/// never mistaken for belonging to the same graph either.
pub struct IndepVar(Value);

impl IndepVar {
    /// A fresh, unattached independent variable with value `0.0`.
    pub fn new() -> Self {
        IndepVar(Value::new(0.0, 0, graph::new_handle()))
    }

    /// Borrows the underlying `Value`, for use in arithmetic expressions.
    pub fn v(&self) -> &Value {
        &self.0
    }

    /// Updates the numeric value this variable holds. Does not touch the
    /// graph or vertex id; the next `DepVar::assign` reads this value in
    /// place of re-deriving the expression.
    pub fn set(&mut self, value: f64) {
        self.0.value = value;
    }

    pub fn value(&self) -> f64 {
        self.0.value
    }

    pub(crate) fn id(&self) -> VertexId {
        self.0.id
    }

    /// Binds this variable to `graph` at leaf vertex `id`, called exactly
    /// once per variable by `DepVar::depend_on`.
    pub(crate) fn attach(&mut self, graph: GraphHandle, id: VertexId) {
        self.0.graph = graph;
        self.0.id = id;
    }
}

impl Default for IndepVar {
    fn default() -> Self {
        IndepVar::new()
    }
}

impl fmt::Debug for IndepVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IndepVar").field(&self.0).finish()
    }
}

impl fmt::Display for IndepVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_fresh_indep_vars_do_not_share_a_graph() {
        let a = IndepVar::new();
        let b = IndepVar::new();
        assert!(!a.v().same_graph(b.v()));
    }

    #[test]
    fn set_only_touches_the_numeric_value() {
        let mut a = IndepVar::new();
        let id_before = a.id();
        a.set(4.5);
        assert_eq!(a.value(), 4.5);
        assert_eq!(a.id(), id_before);
    }

    #[test]
    fn display_matches_the_original_debug_format() {
        let a = IndepVar::new();
        let mut s = String::new();
        a.set(2.0);
        // can't call set then format through Display without touching value;
        // format! uses Display which reads the same fields as Debug here.
        s.push_str(&format!("{a}"));
        assert!(s.starts_with("id: "));
        assert!(s.contains("value: 2"));
    }
}
