use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::{BinaryOp, Expr, Span as AstSpan, Spanned, UnaryOp};
use super::lexer::Token;

type Span = SimpleSpan;

/// Parse error with source span.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Byte range the error points at.
    pub span: AstSpan,
    /// Human-readable description.
    pub message: String,
}

fn spanned(node: Expr, span: Span) -> Spanned<Expr> {
    Spanned {
        node,
        span: span.into_range(),
    }
}

fn binary(lhs: Spanned<Expr>, (op, rhs): (BinaryOp, Spanned<Expr>)) -> Spanned<Expr> {
    let span = lhs.span.start..rhs.span.end;
    Spanned {
        node: Expr::Binary(op, Box::new(lhs), Box::new(rhs)),
        span,
    }
}

/// Build the expression parser.
///
/// Precedence from loosest to tightest: ternary, `or`, `and`, equality,
/// comparison, additive, multiplicative, prefix, atoms.
fn expr_parser<'a, I>() -> impl Parser<'a, I, Spanned<Expr>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    recursive(|expr| {
        let ident = select! { Token::Ident(name) => name }.labelled("identifier");

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let atom = choice((
            select! { Token::Number(n) => Expr::Number(n) },
            select! {
                Token::True => Expr::Bool(true),
                Token::False => Expr::Bool(false),
            },
            ident.clone().then(args).map(|(name, args)| Expr::Call(name, args)),
            ident.map(Expr::Var),
        ))
        .map_with(|node, e| spanned(node, e.span()))
        .or(expr
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen)))
        .labelled("value");

        let prefix = choice((
            just(Token::Minus).to(UnaryOp::Neg),
            just(Token::Plus).to(UnaryOp::Plus),
            just(Token::Not).to(UnaryOp::Not),
        ))
        .map_with(|op, e| (op, e.span()));

        let unary = prefix.repeated().foldr(atom, |(op, span): (UnaryOp, Span), rhs: Spanned<Expr>| {
            let span = span.start..rhs.span.end;
            Spanned {
                node: Expr::Unary(op, Box::new(rhs)),
                span,
            }
        });

        let product = unary.clone().foldl(
            choice((
                just(Token::Star).to(BinaryOp::Mul),
                just(Token::Slash).to(BinaryOp::Div),
                just(Token::Percent).to(BinaryOp::Rem),
            ))
            .then(unary)
            .repeated(),
            binary,
        );

        let sum = product.clone().foldl(
            choice((
                just(Token::Plus).to(BinaryOp::Add),
                just(Token::Minus).to(BinaryOp::Sub),
            ))
            .then(product)
            .repeated(),
            binary,
        );

        let comparison = sum.clone().foldl(
            choice((
                just(Token::Le).to(BinaryOp::Le),
                just(Token::Ge).to(BinaryOp::Ge),
                just(Token::Lt).to(BinaryOp::Lt),
                just(Token::Gt).to(BinaryOp::Gt),
            ))
            .then(sum)
            .repeated(),
            binary,
        );

        let equality = comparison.clone().foldl(
            choice((
                just(Token::EqEq).to(BinaryOp::Eq),
                just(Token::Ne).to(BinaryOp::Ne),
            ))
            .then(comparison)
            .repeated(),
            binary,
        );

        let and = equality.clone().foldl(
            just(Token::And).to(BinaryOp::And).then(equality).repeated(),
            binary,
        );

        let or = and
            .clone()
            .foldl(just(Token::Or).to(BinaryOp::Or).then(and).repeated(), binary);

        or.then(
            just(Token::Question)
                .ignore_then(expr.clone())
                .then_ignore(just(Token::Colon))
                .then(expr)
                .or_not(),
        )
        .map(|(cond, branches)| match branches {
            None => cond,
            Some((then, otherwise)) => {
                let span = cond.span.start..otherwise.span.end;
                Spanned {
                    node: Expr::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise)),
                    span,
                }
            }
        })
    })
}

/// Parse a token stream into an expression.
pub fn parse(tokens: &[(Token, AstSpan)], source_len: usize) -> Result<Spanned<Expr>, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let eoi: Span = (source_len..source_len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = expr_parser()
        .then_ignore(end())
        .parse(stream)
        .into_output_errors();

    match output {
        Some(expr) if errors.is_empty() => Ok(expr),
        _ => Err(errors
            .into_iter()
            .map(|e| ParseError {
                span: e.span().into_range(),
                message: e.to_string(),
            })
            .collect()),
    }
}
