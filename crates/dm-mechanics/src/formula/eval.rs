use std::collections::{BTreeMap, HashMap};

use super::FormulaError;
use super::ast::{BinaryOp, Expr, Spanned, UnaryOp};

/// Variable bindings a formula is evaluated against.
pub trait Scope {
    /// The value bound to `name`, if any.
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl Scope for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Scope for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

fn truthy(value: f64) -> bool {
    value != 0.0
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Evaluate an expression tree.
pub fn evaluate(expr: &Spanned<Expr>, scope: &dyn Scope) -> Result<f64, FormulaError> {
    match &expr.node {
        Expr::Number(n) => Ok(*n),
        Expr::Bool(b) => Ok(flag(*b)),
        Expr::Var(name) => scope.lookup(name).ok_or_else(|| FormulaError::UndefinedVariable {
            name: name.clone(),
            span: expr.span.clone(),
        }),
        Expr::Unary(op, inner) => {
            let value = evaluate(inner, scope)?;
            Ok(match op {
                UnaryOp::Neg => -value,
                UnaryOp::Plus => value,
                UnaryOp::Not => flag(!truthy(value)),
            })
        }
        Expr::Binary(op, lhs, rhs) => binary(*op, lhs, rhs, expr, scope),
        Expr::Ternary(cond, then, otherwise) => {
            if truthy(evaluate(cond, scope)?) {
                evaluate(then, scope)
            } else {
                evaluate(otherwise, scope)
            }
        }
        Expr::Call(name, args) => call(name, args, expr, scope),
    }
}

fn binary(
    op: BinaryOp,
    lhs: &Spanned<Expr>,
    rhs: &Spanned<Expr>,
    expr: &Spanned<Expr>,
    scope: &dyn Scope,
) -> Result<f64, FormulaError> {
    let l = evaluate(lhs, scope)?;
    // `and`/`or` skip the right side when the left decides the result.
    match op {
        BinaryOp::And if !truthy(l) => return Ok(0.0),
        BinaryOp::Or if truthy(l) => return Ok(1.0),
        _ => {}
    }
    let r = evaluate(rhs, scope)?;
    match op {
        BinaryOp::Add => Ok(l + r),
        BinaryOp::Sub => Ok(l - r),
        BinaryOp::Mul => Ok(l * r),
        BinaryOp::Div | BinaryOp::Rem if r == 0.0 => Err(FormulaError::DivisionByZero {
            span: expr.span.clone(),
        }),
        BinaryOp::Div => Ok(l / r),
        BinaryOp::Rem => Ok(l % r),
        BinaryOp::Lt => Ok(flag(l < r)),
        BinaryOp::Le => Ok(flag(l <= r)),
        BinaryOp::Gt => Ok(flag(l > r)),
        BinaryOp::Ge => Ok(flag(l >= r)),
        BinaryOp::Eq => Ok(flag(l == r)),
        BinaryOp::Ne => Ok(flag(l != r)),
        BinaryOp::And | BinaryOp::Or => Ok(flag(truthy(r))),
    }
}

fn call(name: &str, args: &[Spanned<Expr>], expr: &Spanned<Expr>, scope: &dyn Scope) -> Result<f64, FormulaError> {
    let arity = |expected: &'static str| FormulaError::Arity {
        name: name.to_string(),
        expected,
        found: args.len(),
        span: expr.span.clone(),
    };
    let values = args
        .iter()
        .map(|arg| evaluate(arg, scope))
        .collect::<Result<Vec<_>, _>>()?;

    match name {
        "abs" | "floor" | "ceil" | "round" => {
            let [x] = values[..] else {
                return Err(arity("1"));
            };
            Ok(match name {
                "abs" => x.abs(),
                "floor" => x.floor(),
                "ceil" => x.ceil(),
                _ => x.round(),
            })
        }
        "min" | "max" => {
            let first = *values.first().ok_or_else(|| arity("at least 1"))?;
            Ok(values[1..].iter().fold(first, |acc, &x| {
                if name == "min" { acc.min(x) } else { acc.max(x) }
            }))
        }
        _ => Err(FormulaError::UnknownFunction {
            name: name.to_string(),
            span: expr.span.clone(),
        }),
    }
}
