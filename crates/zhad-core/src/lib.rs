//! Reverse-mode automatic differentiation with first- and second-order
//! (Hessian) derivatives, via operator overloading and the edge-pushing
//! algorithm of Gower & Mello (2010).
//!
//! ```
//! use zhad_core::{DepVar, IndepVar};
//!
//! let mut xs = [IndepVar::new(), IndepVar::new()];
//! xs[0].set(2.0);
//! xs[1].set(3.0);
//!
//! let mut y = DepVar::new();
//! y.depend_on(&mut xs);
//! y.assign(xs[0].v() * xs[1].v());
//!
//! assert_eq!(y.value(), 6.0);
//! assert_eq!(y.derivative1(&xs[0]), 3.0);
//! assert_eq!(y.derivative1(&xs[1]), 2.0);
//! assert_eq!(y.derivative2(&xs[0], &xs[1]), 1.0);
//! ```
//!
//! None of `Value`, `IndepVar`, or `DepVar` are `Send`/`Sync`: a graph is an
//! `Rc<RefCell<_>>`, so sharing one across threads is a compile error rather
//! than a runtime one.

mod arena;
mod depvar;
mod error;
mod graph;
mod ops;
mod sweep;
mod value;

pub use depvar::DepVar;
pub use error::ZhadError;
pub use ops::{acos, asin, cos, exp, inv, log, pow, sin, sqrt, square, tan};
pub use value::{IndepVar, Value};
