//! Derived-stat formulas.
//!
//! A formula is a small arithmetic expression over named variables:
//!
//! ```text
//! base + str_mod
//! max(int_mod, wis_mod) + (level >= 4 ? 2 : 0)
//! ```
//!
//! Numbers are `f64`. Comparisons and logic yield 1 or 0, and any non-zero
//! value is true. Built-in functions are `abs`, `floor`, `ceil`, `round`,
//! `min` and `max`.

/// Expression tree.
pub mod ast;
/// Tree-walking evaluator.
pub mod eval;
/// Tokenizer built on logos.
pub mod lexer;
/// Expression parser built on chumsky.
pub mod parser;

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};

pub use ast::{Expr, Span, Spanned};
pub use eval::Scope;

/// Why a formula could not be parsed or evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
    /// A character that is not part of the formula language.
    #[error("{message}")]
    Lex {
        /// Offending input.
        span: Span,
        /// Description.
        message: String,
    },

    /// The tokens do not form an expression.
    #[error("syntax error: {message}")]
    Syntax {
        /// Where parsing stopped.
        span: Span,
        /// Description.
        message: String,
    },

    /// A variable with no binding in the scope.
    #[error("undefined variable '{name}'")]
    UndefinedVariable {
        /// Variable name.
        name: String,
        /// The reference.
        span: Span,
    },

    /// A call to a function that does not exist.
    #[error("unknown function '{name}'")]
    UnknownFunction {
        /// Function name.
        name: String,
        /// The call.
        span: Span,
    },

    /// A built-in called with the wrong number of arguments.
    #[error("'{name}' takes {expected} argument(s), got {found}")]
    Arity {
        /// Function name.
        name: String,
        /// Accepted argument count.
        expected: &'static str,
        /// Supplied argument count.
        found: usize,
        /// The call.
        span: Span,
    },

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero {
        /// The division.
        span: Span,
    },
}

impl FormulaError {
    /// The source range this error points at.
    pub fn span(&self) -> Span {
        match self {
            Self::Lex { span, .. }
            | Self::Syntax { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::UnknownFunction { span, .. }
            | Self::Arity { span, .. }
            | Self::DivisionByZero { span } => span.clone(),
        }
    }
}

/// A parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Spanned<Expr>,
}

impl Formula {
    /// Parse a formula, returning the first problem found.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        Self::parse_all(source).map_err(|errors| {
            errors.into_iter().next().unwrap_or_else(|| FormulaError::Syntax {
                span: 0..source.len(),
                message: "invalid formula".to_string(),
            })
        })
    }

    /// Parse a formula, returning every lexing or syntax problem found.
    ///
    /// The error list is never empty.
    pub fn parse_all(source: &str) -> Result<Self, Vec<FormulaError>> {
        let (tokens, lex_errors) = lexer::lex(source);
        if !lex_errors.is_empty() {
            return Err(lex_errors
                .into_iter()
                .map(|e| FormulaError::Lex {
                    span: e.span,
                    message: e.message,
                })
                .collect());
        }
        match parser::parse(&tokens, source.len()) {
            Ok(expr) => Ok(Self {
                source: source.to_string(),
                expr,
            }),
            Err(errors) if errors.is_empty() => Err(vec![FormulaError::Syntax {
                span: 0..source.len(),
                message: "invalid formula".to_string(),
            }]),
            Err(errors) => Err(errors
                .into_iter()
                .map(|e| FormulaError::Syntax {
                    span: e.span,
                    message: e.message,
                })
                .collect()),
        }
    }

    /// The formula text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression.
    pub fn expr(&self) -> &Spanned<Expr> {
        &self.expr
    }

    /// Names of the variables the formula references, first use first.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.expr.for_each_var(&mut |name, _| {
            if !names.contains(&name) {
                names.push(name);
            }
        });
        names
    }

    /// Evaluate against a scope.
    pub fn evaluate(&self, scope: &dyn Scope) -> Result<f64, FormulaError> {
        eval::evaluate(&self.expr, scope)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and evaluate in one step.
pub fn evaluate(source: &str, scope: &dyn Scope) -> Result<f64, FormulaError> {
    Formula::parse(source)?.evaluate(scope)
}

/// Render formula errors as annotated source snippets.
///
/// `name` labels the snippet, typically the derived stat id.
pub fn render_errors(source: &str, name: &str, errors: &[FormulaError]) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();
        let message = error.to_string();
        Report::build(ReportKind::Error, (name, span.clone()))
            .with_message(&message)
            .with_label(
                Label::new((name, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((name, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}
