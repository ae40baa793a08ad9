//! Operator overloads and elementary math functions.
//!
//! Every entry below mirrors the partial-derivative table of the native
//! expression-template library this crate is modeled on: each operation
//! records `(fanin, local partial)` pairs plus a mixed/self second partial
//! on the vertex it allocates, then the reverse sweep in `sweep.rs` turns
//! those local partials into full adjoints and Hessian entries.
//!
//! All arithmetic is implemented on `&Value`/`f64` combinations; `IndepVar`
//! participates in expressions through its `.v()` accessor. Owned-`Value`
//! and mixed reference combinations are generated by `forward_binop!` so
//! that expressions like `xs[0].v() + xs[1].v() + 3.0` type-check without
//! forcing every call site to juggle references by hand.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::value::Value;

impl<'a> Add<&'a Value> for &'a Value {
    type Output = Value;
    fn add(self, rhs: &'a Value) -> Value {
        Value::from_binary(self, 1.0, rhs, 1.0, 0.0, self.value() + rhs.value())
    }
}

impl<'a> Sub<&'a Value> for &'a Value {
    type Output = Value;
    fn sub(self, rhs: &'a Value) -> Value {
        Value::from_binary(self, 1.0, rhs, -1.0, 0.0, self.value() - rhs.value())
    }
}

impl<'a> Mul<&'a Value> for &'a Value {
    type Output = Value;
    fn mul(self, rhs: &'a Value) -> Value {
        Value::from_binary(
            self,
            rhs.value(),
            rhs,
            self.value(),
            1.0,
            self.value() * rhs.value(),
        )
    }
}

impl<'a> Div<&'a Value> for &'a Value {
    type Output = Value;
    fn div(self, rhs: &'a Value) -> Value {
        self * &inv(rhs)
    }
}

impl<'a> Add<f64> for &'a Value {
    type Output = Value;
    fn add(self, rhs: f64) -> Value {
        Value::from_unary(self, self.value() + rhs, 1.0, 0.0)
    }
}

impl<'a> Sub<f64> for &'a Value {
    type Output = Value;
    fn sub(self, rhs: f64) -> Value {
        Value::from_unary(self, self.value() - rhs, 1.0, 0.0)
    }
}

impl<'a> Mul<f64> for &'a Value {
    type Output = Value;
    fn mul(self, rhs: f64) -> Value {
        Value::from_unary(self, self.value() * rhs, rhs, 0.0)
    }
}

impl<'a> Div<f64> for &'a Value {
    type Output = Value;
    fn div(self, rhs: f64) -> Value {
        Value::from_unary(self, self.value() / rhs, 1.0 / rhs, 0.0)
    }
}

impl<'a> Add<&'a Value> for f64 {
    type Output = Value;
    fn add(self, rhs: &'a Value) -> Value {
        rhs + self
    }
}

impl<'a> Sub<&'a Value> for f64 {
    type Output = Value;
    fn sub(self, rhs: &'a Value) -> Value {
        Value::from_unary(rhs, self - rhs.value(), -1.0, 0.0)
    }
}

impl<'a> Mul<&'a Value> for f64 {
    type Output = Value;
    fn mul(self, rhs: &'a Value) -> Value {
        rhs * self
    }
}

impl<'a> Neg for &'a Value {
    type Output = Value;
    fn neg(self) -> Value {
        Value::from_unary(self, -self.value(), -1.0, 0.0)
    }
}

/// Forwards the four owned/reference combinations of a binary operator to
/// the canonical `&Value op &Value` (or `&Value op f64` / `f64 op &Value`)
/// impl above, so callers can chain `a + b + c` without threading references
/// through every intermediate.
macro_rules! forward_binop {
    ($trait:ident, $method:ident, Value, Value) => {
        impl $trait<Value> for Value {
            type Output = Value;
            fn $method(self, rhs: Value) -> Value {
                (&self).$method(&rhs)
            }
        }
        impl<'a> $trait<&'a Value> for Value {
            type Output = Value;
            fn $method(self, rhs: &'a Value) -> Value {
                (&self).$method(rhs)
            }
        }
        impl<'a> $trait<Value> for &'a Value {
            type Output = Value;
            fn $method(self, rhs: Value) -> Value {
                self.$method(&rhs)
            }
        }
    };
    ($trait:ident, $method:ident, Value, f64) => {
        impl $trait<f64> for Value {
            type Output = Value;
            fn $method(self, rhs: f64) -> Value {
                (&self).$method(rhs)
            }
        }
    };
    ($trait:ident, $method:ident, f64, Value) => {
        impl $trait<Value> for f64 {
            type Output = Value;
            fn $method(self, rhs: Value) -> Value {
                self.$method(&rhs)
            }
        }
    };
}

forward_binop!(Add, add, Value, Value);
forward_binop!(Sub, sub, Value, Value);
forward_binop!(Mul, mul, Value, Value);
forward_binop!(Div, div, Value, Value);
forward_binop!(Add, add, Value, f64);
forward_binop!(Sub, sub, Value, f64);
forward_binop!(Mul, mul, Value, f64);
forward_binop!(Div, div, Value, f64);
forward_binop!(Add, add, f64, Value);
forward_binop!(Sub, sub, f64, Value);
forward_binop!(Mul, mul, f64, Value);

impl Neg for Value {
    type Output = Value;
    fn neg(self) -> Value {
        -&self
    }
}

/// `1 / a`. Used internally to implement `/` as `a * inv(b)`.
pub fn inv(a: &Value) -> Value {
    let av = a.value();
    Value::from_unary(a, 1.0 / av, -1.0 / (av * av), 2.0 / (av * av * av))
}

/// `a * a`.
///
/// The second partial recorded here is `0.0`, matching the native library's
/// own `square()` overload: `square` is implemented there as a dedicated
/// unary op rather than as `a * a`, and its second-partial slot is left at
/// zero rather than the mathematically exact `2.0`. Preserved as-is.
pub fn square(a: &Value) -> Value {
    let av = a.value();
    Value::from_unary(a, av * av, 2.0 * av, 0.0)
}

/// `sqrt(a)`.
pub fn sqrt(a: &Value) -> Value {
    let av = a.value();
    let r = av.sqrt();
    Value::from_unary(a, r, 0.5 / r, -0.25 / (av * r))
}

/// `a.powf(k)`, `k` a compile-time-unknown but constant exponent (not itself
/// differentiated against).
pub fn pow(a: &Value, k: f64) -> Value {
    let av = a.value();
    Value::from_unary(
        a,
        av.powf(k),
        k * av.powf(k - 1.0),
        k * (k - 1.0) * av.powf(k - 2.0),
    )
}

/// `e^a`.
pub fn exp(a: &Value) -> Value {
    let r = a.value().exp();
    Value::from_unary(a, r, r, r)
}

/// `ln(a)`.
pub fn log(a: &Value) -> Value {
    let av = a.value();
    Value::from_unary(a, av.ln(), 1.0 / av, -1.0 / (av * av))
}

/// `sin(a)`.
pub fn sin(a: &Value) -> Value {
    let av = a.value();
    Value::from_unary(a, av.sin(), av.cos(), -av.sin())
}

/// `cos(a)`.
pub fn cos(a: &Value) -> Value {
    let av = a.value();
    Value::from_unary(a, av.cos(), -av.sin(), -av.cos())
}

/// `tan(a)`.
pub fn tan(a: &Value) -> Value {
    let av = a.value();
    let sec2 = 1.0 / (av.cos() * av.cos());
    Value::from_unary(a, av.tan(), sec2, 2.0 * av.tan() * sec2)
}

/// `asin(a)`.
pub fn asin(a: &Value) -> Value {
    let av = a.value();
    let denom = 1.0 - av * av;
    Value::from_unary(a, av.asin(), 1.0 / denom.sqrt(), av / denom.powf(1.5))
}

/// `acos(a)`.
pub fn acos(a: &Value) -> Value {
    let av = a.value();
    let denom = 1.0 - av * av;
    Value::from_unary(a, av.acos(), -1.0 / denom.sqrt(), -av / denom.powf(1.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depvar::DepVar;
    use crate::value::IndepVar;

    fn near(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn product_of_squares_matches_hand_derivatives() {
        let mut xs = [IndepVar::new(), IndepVar::new()];
        xs[0].set(2.0);
        xs[1].set(3.0);
        let mut y = DepVar::new();
        y.depend_on(&mut xs);

        let a = square(xs[0].v());
        let b = square(xs[1].v());
        let out = &a * &b;
        y.assign(out);

        near(y.value(), 4.0 * 9.0);
        // dy/dx0 = 2*x0*x1^2 = 2*2*9 = 36
        near(y.derivative1(&xs[0]), 36.0);
        // dy/dx1 = 2*x1*x0^2 = 2*3*4 = 24
        near(y.derivative1(&xs[1]), 24.0);
    }

    #[test]
    fn sqrt_matches_hand_derivative() {
        let mut xs = [IndepVar::new()];
        xs[0].set(4.0);
        let mut y = DepVar::new();
        y.depend_on(&mut xs);
        y.assign(sqrt(xs[0].v()));
        near(y.value(), 2.0);
        // d/dx sqrt(x) = 1/(2 sqrt(x)) = 0.25
        near(y.derivative1(&xs[0]), 0.25);
    }
}
