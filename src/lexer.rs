use super::ast::{BinOp, Expr};
use combine::error::{ParseError, StreamError};
use combine::parser::char::{char, digit, spaces, string};
use combine::parser::Parser;
use combine::stream::{Stream, StreamErrorFor};
use combine::{any, attempt, between, choice, many, many1, none_of, optional, satisfy};

/// Skips leading whitespace, then runs `p`.
pub(crate) fn lex<Input, P>(p: P) -> impl Parser<Input, Output = P::Output>
where
    P: Parser<Input>,
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    spaces().with(p)
}

/// Matches the literal `lit` after optional whitespace.
pub(crate) fn token<Input>(lit: &'static str) -> impl Parser<Input, Output = &'static str>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    lex(attempt(string(lit)))
}

pub(crate) fn name<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    lex((
        satisfy(|c: char| c.is_ascii_alphabetic()),
        many::<String, _, _>(satisfy(|c: char| c.is_ascii_alphanumeric())),
    ))
    .map(|(first, rest)| {
        let mut id = String::with_capacity(rest.len() + 1);
        id.push(first);
        id.push_str(&rest);
        id
    })
}

fn sign<Input>() -> impl Parser<Input, Output = &'static str>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    optional(char('-')).map(|s| if s.is_some() { "-" } else { "" })
}

pub(crate) fn integer<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    lex((sign(), many1::<String, _, _>(digit())))
        .and_then(|(sign, digits)| {
            format!("{}{}", sign, digits)
                .parse::<i64>()
                .map_err(StreamErrorFor::<Input>::other)
        })
        .map(Expr::Integer)
}

/// `-?digits.digits`; a trailing dot without digits is not a float.
pub(crate) fn float<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    lex((
        sign(),
        many1::<String, _, _>(digit()),
        char('.'),
        many1::<String, _, _>(digit()),
    ))
    .and_then(|(sign, whole, _, frac)| {
        format!("{}{}.{}", sign, whole, frac)
            .parse::<f64>()
            .map_err(StreamErrorFor::<Input>::other)
    })
    .map(Expr::Float)
}

pub(crate) fn string_literal<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let escaped = char('\\').with(any()).map(|c| match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        c => c,
    });
    let body = many::<String, _, _>(choice((escaped, none_of("\"\\".chars()))));

    lex(between(char('"'), char('"'), body)).map(Expr::String)
}

pub(crate) fn boolean<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    name().and_then(|word| match word.as_str() {
        "true" => Ok(Expr::Boolean(true)),
        "false" => Ok(Expr::Boolean(false)),
        _ => Err(StreamErrorFor::<Input>::expected_static_message("boolean")),
    })
}

/// Operator symbols, longest first so `>=` is never read as `>`.
pub(crate) fn operator<Input>() -> impl Parser<Input, Output = BinOp>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    lex(choice((
        attempt(string("==")).map(|_| BinOp::Eq),
        attempt(string("!=")).map(|_| BinOp::Ne),
        attempt(string(">=")).map(|_| BinOp::Ge),
        attempt(string("<=")).map(|_| BinOp::Le),
        attempt(string("&&")).map(|_| BinOp::And),
        attempt(string("||")).map(|_| BinOp::Or),
        char('+').map(|_| BinOp::Add),
        char('-').map(|_| BinOp::Sub),
        char('*').map(|_| BinOp::Mul),
        char('/').map(|_| BinOp::Div),
        char('>').map(|_| BinOp::Gt),
        char('<').map(|_| BinOp::Lt),
    )))
}
