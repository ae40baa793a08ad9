//! Reverse sweep (edge-pushing): the single backward pass that propagates
//! first-order adjoints and builds the Hessian's sparse, lower-triangular
//! store in one walk over the arena.
//!
//! Implements the algorithm of Gower & Mello, "Hessian Matrices via
//! Automatic Differentiation" (2010): each vertex is visited exactly once,
//! in strictly decreasing id order, so every accumulation below targets a
//! vertex that has not been visited yet -- no read-after-write hazard can
//! arise even in a plain serial loop.

use tracing::{debug, trace};

use crate::arena::{Arena, Ord2Edge, VertexId, NONE};

/// `insert_edge(a, b, delta)`: the Hessian accumulator.
///
/// `a == b` contributes `2 * delta` to the diagonal -- a mixed edge at
/// `(a, a)` from a two-fanin vertex aliases both off-diagonal positions that
/// collapse onto d2/da^2. Otherwise the entry lives on
/// `vertices[max(a,b)].ord2_edges`, keyed by `min(a,b)`; a prior entry for
/// the same key accumulates in place rather than duplicating.
fn insert_edge(arena: &mut Arena, a: VertexId, b: VertexId, delta: f64) {
    if a == b {
        arena.index_mut(a).self_ord2_weight += 2.0 * delta;
        return;
    }
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    let vertex = arena.index_mut(hi);
    for i in 0..vertex.ord2_edges.len() {
        let entry = vertex.ord2_edges.get_mut(i);
        if entry.other == lo {
            entry.weight += delta;
            trace!(hi, lo, delta, "insert_edge: accumulated into existing entry");
            return;
        }
    }
    vertex.ord2_edges.push(Ord2Edge {
        other: lo,
        weight: delta,
    });
    trace!(hi, lo, delta, "insert_edge: appended new entry");
}

/// Runs the reverse sweep seeded at `root` with adjoint `seed`, leaving
/// first- and second-order weights queryable by vertex id. Rewinds the
/// arena's logical length to `num_indep_vars` and marks it `once`, so the
/// next evaluation reuses physical capacity instead of reallocating.
pub(crate) fn propagate(arena: &mut Arena, num_indep_vars: usize, root: VertexId, seed: f64) {
    if arena.len() == 0 {
        return;
    }
    // `root` is the true top of the graph being propagated, not `arena.len()
    // - 1`: a repeat `assign` of the same `Value` (without rebuilding the
    // expression) enters here with the arena already rewound to
    // `num_indep_vars` by the previous sweep, so `len() - 1` would be below
    // `root` and the main pass below would iterate an empty range.
    let last = root;
    debug!(
        root,
        seed,
        vertices = arena.len(),
        num_indep_vars,
        "reverse sweep: start"
    );

    // Pre-sweep reset: walk from the top down, clearing per-evaluation
    // accumulators. Leaves additionally drop their first/second-order state
    // here, since (unlike intermediate vertices) they persist physically
    // across evaluations and are never touched by `create_*`.
    for id in (0..=last).rev() {
        let v = arena.index_mut(id);
        v.ord2_edges.clear_logical();
        v.self_ord2_weight = 0.0;
        if id < num_indep_vars {
            v.weight = 0.0;
            v.ord2_weight = 0.0;
        }
    }
    arena.index_mut(root).weight = seed;
    arena.rewind_to(num_indep_vars);
    arena.set_once(true);

    // Main pass: strictly decreasing id order, down to and including
    // `num_indep_vars` -- leaves below that only receive contributions, they
    // never emit any (both edge slots are NONE).
    for id in (num_indep_vars..=last).rev() {
        let v = arena.index(id);
        let edge_l = v.edges[0];
        let edge_r = v.edges[1];
        let has_two = edge_r.id != NONE;
        let ord2 = v.ord2_weight;
        let weight = v.weight;
        let ord2_edges: Vec<Ord2Edge> = v.ord2_edges.iter().copied().collect();

        // 1. Pushing: propagate every mixed second-partial this vertex
        // carries down onto its fanins, weighted by their local partials.
        for entry in &ord2_edges {
            insert_edge(arena, edge_l.id, entry.other, edge_l.weight * entry.weight);
            if has_two {
                insert_edge(arena, edge_r.id, entry.other, edge_r.weight * entry.weight);
            }
        }

        // 2. Self-second propagation.
        let self_ord2 = arena.index(id).self_ord2_weight;
        if self_ord2 != 0.0 {
            arena.index_mut(edge_l.id).self_ord2_weight += edge_l.weight * edge_l.weight * self_ord2;
            if has_two {
                let mult_r = edge_r.weight * self_ord2;
                arena.index_mut(edge_r.id).self_ord2_weight += edge_r.weight * mult_r;
                insert_edge(arena, edge_l.id, edge_r.id, edge_l.weight * mult_r);
            }
        }

        if weight != 0.0 {
            // 3. Creation: a nonzero incoming adjoint times this vertex's
            // own second-order weight seeds a fresh Hessian contribution.
            if ord2 != 0.0 {
                if has_two {
                    insert_edge(arena, edge_l.id, edge_r.id, weight * ord2);
                } else {
                    arena.index_mut(edge_l.id).self_ord2_weight += weight * ord2;
                }
            }

            // 4. Adjoint: push this vertex's accumulated adjoint onto its
            // fanins and consume it.
            arena.index_mut(id).weight = 0.0;
            arena.index_mut(edge_l.id).weight += weight * edge_l.weight;
            if has_two {
                arena.index_mut(edge_r.id).weight += weight * edge_r.weight;
            }
        }
    }

    debug!("reverse sweep: done");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    /// y = x0 * x0, at x0 = 3: dy/dx0 = 2*x0 = 6, d2y/dx0^2 = 2.
    #[test]
    fn square_of_a_single_leaf() {
        let mut arena = Arena::default();
        let x0 = arena.create_leaf();
        // square(a): edges (a, 2a), ord2_weight = 0 (matches the source
        // library's own square() overload, which passes 0.0 here).
        let y = arena.create_unary(x0, 6.0, 0.0);
        propagate(&mut arena, 1, y, 1.0);
        assert_eq!(arena.index(x0).weight, 6.0);
    }

    /// y = x0 + x1, at any point: dy/dx0 = dy/dx1 = 1, all second partials 0.
    #[test]
    fn sum_of_two_leaves_has_zero_hessian() {
        let mut arena = Arena::default();
        let x0 = arena.create_leaf();
        let x1 = arena.create_leaf();
        let y = arena.create_binary(x0, 1.0, x1, 1.0, 0.0);
        propagate(&mut arena, 2, y, 1.0);
        assert_eq!(arena.index(x0).weight, 1.0);
        assert_eq!(arena.index(x1).weight, 1.0);
        assert_eq!(arena.index(x0).self_ord2_weight, 0.0);
        assert_eq!(arena.index(x1).self_ord2_weight, 0.0);
    }

    /// y = x0 * x1: d2y/dx0 dx1 = 1, read back from the lower-triangular
    /// store keyed by the larger id.
    #[test]
    fn product_of_two_leaves_has_mixed_second_partial() {
        let mut arena = Arena::default();
        let x0 = arena.create_leaf();
        let x1 = arena.create_leaf();
        // a*b: edges (a, bv), (b, av), ord2_weight = 1.0
        let y = arena.create_binary(x0, 2.0, x1, 3.0, 1.0);
        propagate(&mut arena, 2, y, 1.0);
        assert_eq!(arena.index(x0).weight, 2.0);
        assert_eq!(arena.index(x1).weight, 3.0);
        let hi = x0.max(x1);
        let lo = x0.min(x1);
        let found = arena
            .index(hi)
            .ord2_edges
            .iter()
            .find(|e| e.other == lo)
            .map(|e| e.weight);
        assert_eq!(found, Some(1.0));
    }
}
