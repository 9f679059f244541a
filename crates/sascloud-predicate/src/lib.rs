#![warn(missing_docs)]

//! Restricted boolean-expression predicates for analytic solids.
//!
//! A [`Predicate`] describes a solid as a boolean condition over the
//! coordinates `x`, `y`, `z`, e.g. a hollow sphere:
//!
//! ```
//! use sascloud_predicate::Predicate;
//! use sascloud_math::Point3;
//!
//! let shell: Predicate = "x**2+y**2+z**2 >= 9 and x**2+y**2+z**2 <= 25"
//!     .parse()
//!     .unwrap();
//! assert!(shell.eval(&Point3::new(4.0, 0.0, 0.0)));
//! assert!(!shell.eval(&Point3::new(0.0, 0.0, 0.0)));
//! ```
//!
//! The grammar is deliberately closed: arithmetic, comparisons, boolean
//! connectives, the constants `pi` and `e`, and a small whitelist of
//! single-argument functions. Anything else is rejected when the
//! expression is parsed, never during per-point evaluation, so a built
//! predicate evaluates infallibly.

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{PredicateError, Result};

use std::str::FromStr;

use sascloud_math::Point3;

use parser::{ArithOp, Ast, CmpOp};

/// One of the three free coordinate variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Var {
    X,
    Y,
    Z,
}

/// Whitelisted single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Self::Sqrt),
            "abs" => Some(Self::Abs),
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "exp" => Some(Self::Exp),
            "ln" => Some(Self::Ln),
            _ => None,
        }
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            Self::Sqrt => v.sqrt(),
            Self::Abs => v.abs(),
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
            Self::Tan => v.tan(),
            Self::Exp => v.exp(),
            Self::Ln => v.ln(),
        }
    }
}

/// Numeric-valued expression, fully resolved.
#[derive(Debug, Clone)]
enum NumExpr {
    Const(f64),
    Var(Var),
    Neg(Box<NumExpr>),
    Arith(ArithOp, Box<NumExpr>, Box<NumExpr>),
    Call(Func, Box<NumExpr>),
}

impl NumExpr {
    fn eval(&self, x: f64, y: f64, z: f64) -> f64 {
        match self {
            Self::Const(v) => *v,
            Self::Var(Var::X) => x,
            Self::Var(Var::Y) => y,
            Self::Var(Var::Z) => z,
            Self::Neg(inner) => -inner.eval(x, y, z),
            Self::Arith(op, a, b) => {
                let (a, b) = (a.eval(x, y, z), b.eval(x, y, z));
                match op {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div => a / b,
                    ArithOp::Pow => a.powf(b),
                }
            }
            Self::Call(f, arg) => f.apply(arg.eval(x, y, z)),
        }
    }
}

/// Boolean-valued expression, fully resolved.
#[derive(Debug, Clone)]
enum BoolExpr {
    Cmp(CmpOp, NumExpr, NumExpr),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
    Not(Box<BoolExpr>),
}

impl BoolExpr {
    fn eval(&self, x: f64, y: f64, z: f64) -> bool {
        match self {
            Self::Cmp(op, a, b) => {
                let (a, b) = (a.eval(x, y, z), b.eval(x, y, z));
                match op {
                    CmpOp::Lt => a < b,
                    CmpOp::Le => a <= b,
                    CmpOp::Gt => a > b,
                    CmpOp::Ge => a >= b,
                    CmpOp::Eq => a == b,
                    CmpOp::Ne => a != b,
                }
            }
            Self::And(a, b) => a.eval(x, y, z) && b.eval(x, y, z),
            Self::Or(a, b) => a.eval(x, y, z) || b.eval(x, y, z),
            Self::Not(inner) => !inner.eval(x, y, z),
        }
    }
}

/// A compiled boolean predicate over `(x, y, z)`.
///
/// Built once from source text; evaluation is pure and infallible.
#[derive(Debug, Clone)]
pub struct Predicate {
    root: BoolExpr,
    source: String,
}

impl Predicate {
    /// Parse and type-check an expression.
    ///
    /// The top level must be boolean-valued; a purely arithmetic
    /// expression fails with [`PredicateError::NotBoolean`].
    pub fn parse(source: &str) -> Result<Self> {
        let ast = parser::parse(source)?;
        let root = lower_bool(&ast)?;
        Ok(Self {
            root,
            source: source.to_string(),
        })
    }

    /// Evaluate the predicate at a point.
    pub fn eval(&self, p: &Point3) -> bool {
        self.root.eval(p.x, p.y, p.z)
    }

    /// The source text the predicate was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl FromStr for Predicate {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn lower_bool(ast: &Ast) -> Result<BoolExpr> {
    match ast {
        Ast::Cmp(op, a, b) => Ok(BoolExpr::Cmp(*op, lower_num(a)?, lower_num(b)?)),
        Ast::And(a, b) => Ok(BoolExpr::And(
            Box::new(lower_bool(a)?),
            Box::new(lower_bool(b)?),
        )),
        Ast::Or(a, b) => Ok(BoolExpr::Or(
            Box::new(lower_bool(a)?),
            Box::new(lower_bool(b)?),
        )),
        Ast::Not(inner) => Ok(BoolExpr::Not(Box::new(lower_bool(inner)?))),
        other => Err(PredicateError::NotBoolean(describe(other))),
    }
}

fn lower_num(ast: &Ast) -> Result<NumExpr> {
    match ast {
        Ast::Number(v) => Ok(NumExpr::Const(*v)),
        Ast::Ident(name) => match name.as_str() {
            "x" => Ok(NumExpr::Var(Var::X)),
            "y" => Ok(NumExpr::Var(Var::Y)),
            "z" => Ok(NumExpr::Var(Var::Z)),
            "pi" => Ok(NumExpr::Const(std::f64::consts::PI)),
            "e" => Ok(NumExpr::Const(std::f64::consts::E)),
            _ => Err(PredicateError::UnknownIdentifier(name.clone())),
        },
        Ast::Neg(inner) => Ok(NumExpr::Neg(Box::new(lower_num(inner)?))),
        Ast::Arith(op, a, b) => Ok(NumExpr::Arith(
            *op,
            Box::new(lower_num(a)?),
            Box::new(lower_num(b)?),
        )),
        Ast::Call(name, arg) => {
            let func = Func::from_name(name)
                .ok_or_else(|| PredicateError::UnknownFunction(name.clone()))?;
            Ok(NumExpr::Call(func, Box::new(lower_num(arg)?)))
        }
        other => Err(PredicateError::NotNumeric(describe(other))),
    }
}

fn describe(ast: &Ast) -> String {
    match ast {
        Ast::Number(v) => format!("the number {}", v),
        Ast::Ident(name) => format!("'{}'", name),
        Ast::Neg(_) | Ast::Arith(..) | Ast::Call(..) => "an arithmetic expression".into(),
        Ast::Cmp(..) => "a comparison".into(),
        Ast::And(..) | Ast::Or(..) | Ast::Not(_) => "a boolean expression".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_sphere() {
        let sphere = Predicate::parse("x**2+y**2+z**2 <= 25").unwrap();
        assert!(sphere.eval(&p(0.0, 0.0, 0.0)));
        assert!(sphere.eval(&p(3.0, 4.0, 0.0))); // on the surface, inclusive
        assert!(!sphere.eval(&p(5.0, 1.0, 0.0)));
    }

    #[test]
    fn test_hollow_sphere() {
        let shell = Predicate::parse("x**2+y**2+z**2 >= 9 and x**2+y**2+z**2 <= 25").unwrap();
        assert!(!shell.eval(&p(0.0, 0.0, 0.0)));
        assert!(shell.eval(&p(0.0, 4.0, 0.0)));
        assert!(!shell.eval(&p(6.0, 0.0, 0.0)));
    }

    #[test]
    fn test_constants_and_functions() {
        let pred = Predicate::parse("sqrt(x**2+y**2) < pi and abs(z) <= e").unwrap();
        assert!(pred.eval(&p(1.0, 1.0, -2.0)));
        assert!(!pred.eval(&p(3.0, 3.0, 0.0)));
    }

    #[test]
    fn test_not_and_comparison_forms() {
        let pred = Predicate::parse("not (x != 0) or y == 1").unwrap();
        assert!(pred.eval(&p(0.0, 5.0, 0.0)));
        assert!(pred.eval(&p(2.0, 1.0, 0.0)));
        assert!(!pred.eval(&p(2.0, 5.0, 0.0)));
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        assert!(matches!(
            Predicate::parse("r**2 < 25"),
            Err(PredicateError::UnknownIdentifier(name)) if name == "r"
        ));
    }

    #[test]
    fn test_unknown_function_rejected() {
        assert!(matches!(
            Predicate::parse("eval(x) < 1"),
            Err(PredicateError::UnknownFunction(name)) if name == "eval"
        ));
    }

    #[test]
    fn test_non_boolean_top_level_rejected() {
        assert!(matches!(
            Predicate::parse("x + y + z"),
            Err(PredicateError::NotBoolean(_))
        ));
    }

    #[test]
    fn test_boolean_operand_of_arithmetic_rejected() {
        assert!(matches!(
            Predicate::parse("(x < 1) + 2 < 3"),
            Err(PredicateError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_numeric_operand_of_and_rejected() {
        assert!(matches!(
            Predicate::parse("x and y < 1"),
            Err(PredicateError::NotBoolean(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let pred: Predicate = "z >= 0".parse().unwrap();
        assert!(pred.eval(&p(0.0, 0.0, 0.5)));
        assert_eq!(pred.source(), "z >= 0");
    }
}
