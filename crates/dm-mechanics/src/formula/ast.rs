/// Byte range in the formula source.
pub type Span = std::ops::Range<usize>;

/// A node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The node.
    pub node: T,
    /// Where it came from.
    pub span: Span,
}

/// A formula expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// `true` or `false`, evaluated as 1 or 0.
    Bool(bool),
    /// A variable reference.
    Var(String),
    /// A prefix operator.
    Unary(UnaryOp, Box<Spanned<Expr>>),
    /// An infix operator.
    Binary(BinaryOp, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// `cond ? then : otherwise`.
    Ternary(Box<Spanned<Expr>>, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// A built-in function call.
    Call(String, Vec<Spanned<Expr>>),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `!x` / `not x`
    Not,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `and`, short-circuiting
    And,
    /// `or`, short-circuiting
    Or,
}

impl Spanned<Expr> {
    /// Visit every variable reference in source order.
    pub fn for_each_var<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a Span)) {
        match &self.node {
            Expr::Number(_) | Expr::Bool(_) => {}
            Expr::Var(name) => f(name, &self.span),
            Expr::Unary(_, inner) => inner.for_each_var(f),
            Expr::Binary(_, lhs, rhs) => {
                lhs.for_each_var(f);
                rhs.for_each_var(f);
            }
            Expr::Ternary(cond, then, otherwise) => {
                cond.for_each_var(f);
                then.for_each_var(f);
                otherwise.for_each_var(f);
            }
            Expr::Call(_, args) => {
                for arg in args {
                    arg.for_each_var(f);
                }
            }
        }
    }
}
