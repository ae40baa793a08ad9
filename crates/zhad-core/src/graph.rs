//! The shared graph state behind every `Value`/`IndepVar`/`DepVar`.
//!
//! A `DepVar` owns exactly one graph (an arena plus the count of independent
//! variables currently bound to it). `Value` and `IndepVar` hold a
//! reference-counted, interior-mutable handle to that same state rather than
//! a raw back-pointer: the native implementation this crate is modeled on
//! hands out raw pointers into a growable vector, which is exactly the kind
//! of thing safe Rust cannot do once that vector might reallocate. `Rc` +
//! `RefCell` is the standard safe-Rust translation of that ownership shape --
//! a graph stays alive as long as anything still points at it, and mutation
//! through a shared handle is checked at runtime instead of left undefined.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::arena::Arena;

/// Arena plus the bookkeeping a `DepVar` needs to run a sweep over it.
#[derive(Debug, Default)]
pub(crate) struct GraphState {
    pub(crate) arena: Arena,
    pub(crate) num_indep_vars: usize,
}

/// Shared, reference-counted handle to one graph's state.
pub(crate) type GraphHandle = Rc<RefCell<GraphState>>;

pub(crate) fn new_handle() -> GraphHandle {
    Rc::new(RefCell::new(GraphState::default()))
}

impl fmt::Display for GraphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "graph: independent vars: {}; vertices: {}",
            self.num_indep_vars,
            self.arena.len()
        )?;
        for id in 0..self.arena.len() {
            let v = self.arena.index(id);
            write!(
                f,
                "  vertex {id}: edge L id={}, weight={}; edge R id={}, weight={}; weight={}; ord2_weight={}",
                v.edges[0].id, v.edges[0].weight, v.edges[1].id, v.edges[1].weight, v.weight, v.ord2_weight
            )?;
            write!(f, "\n    ord2_edges: ")?;
            let mut sep = "";
            for e in v.ord2_edges.iter() {
                write!(f, "{sep}{}: {}", e.other, e.weight)?;
                sep = ", ";
            }
            writeln!(f, "\n    self_ord2_weight: {}", v.self_ord2_weight)?;
        }
        Ok(())
    }
}
