use super::ast::{Block, Expr};
use super::error::{Error, ErrorKind};
use super::lexer::{boolean, float, integer, name, operator, string_literal, token};
use combine::error::ParseError;
use combine::parser::char::spaces;
use combine::parser::Parser;
use combine::stream::position;
use combine::stream::Stream;
use combine::{attempt, between, choice, many, optional, parser, EasyParser};

fn parenthesized<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    between(token("("), token(")"), expression())
}

/// `name ( [expr] )`, at most one argument.
fn call<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (
        name(),
        between(token("("), token(")"), optional(attempt(expression()))),
    )
        .map(|(id, arg)| Expr::FunctionCall(id, Box::new(arg.unwrap_or(Expr::Nop))))
}

fn read_var<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    name().map(Expr::ReadVar)
}

fn primary<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    // float has to come before integer or `4.2` stops at the dot
    choice((
        attempt(parenthesized()),
        attempt(string_literal()),
        attempt(float()),
        attempt(integer()),
        attempt(call()),
        attempt(boolean()),
        attempt(read_var()),
    ))
}

/// A primary, optionally followed by one operator and a second primary. The
/// right side is a primary, so `a + b + c` is not an expression.
fn expr_<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    // the left primary is parsed once; backtracking over it would double
    // the work at every level of parentheses
    (primary(), optional(attempt((operator(), primary())))).map(|(l, tail)| match tail {
        Some((op, r)) => Expr::Operator(op, Box::new(l), Box::new(r)),
        None => l,
    })
}

parser! {
    pub(crate) fn expression[Input]()(Input) -> Expr
        where [Input: Stream<Token = char>]
    {
        expr_()
    }
}

fn write_var<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (name(), token("="), expression()).map(|(id, _, e)| Expr::WriteVar(id, Box::new(e)))
}

fn body<Input>() -> impl Parser<Input, Output = Block>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    between(token("{"), token("}"), block())
}

fn parse_if<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (
        token("if"),
        between(token("("), token(")"), expression()),
        body(),
    )
        .map(|(_, c, b)| Expr::If(Box::new(c), b))
}

/// An optional `for` header clause; a missing one becomes `Nop`.
fn clause<Input, P>(p: P) -> impl Parser<Input, Output = Box<Expr>>
where
    P: Parser<Input, Output = Expr>,
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    optional(attempt(p)).map(|e| Box::new(e.unwrap_or(Expr::Nop)))
}

fn parse_for<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let header = (
        clause(write_var()),
        token(";"),
        clause(expression()),
        token(";"),
        clause(write_var()),
    );

    (token("for"), between(token("("), token(")"), header), body())
        .map(|(_, (init, _, cond, _, advance), b)| Expr::For(init, cond, advance, b))
}

fn statement<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    choice((
        attempt(write_var().skip(token(";"))),
        attempt(call().skip(token(";"))),
        attempt(parse_if()),
        attempt(parse_for()),
    ))
}

fn block_<Input>() -> impl Parser<Input, Output = Block>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many(statement()).map(Block::new)
}

parser! {
    pub(crate) fn block[Input]()(Input) -> Block
        where [Input: Stream<Token = char>]
    {
        block_()
    }
}

/// Parses a whole program. Everything after the last statement must be
/// whitespace.
pub fn parse_program(source: &str) -> Result<Block, Error> {
    let stream = position::Stream::new(source);
    let (program, rest) = block()
        .skip(spaces())
        .easy_parse(stream)
        .map_err(|e| ErrorKind::Syntax {
            line: e.position.line,
            column: e.position.column,
            message: e.errors.iter().map(|err| err.to_string()).collect::<Vec<_>>().join("; "),
        })?;

    if !rest.input.is_empty() {
        let snippet = rest.input.lines().next().unwrap_or_default();
        warn!(
            "parsing stopped at line {}, column {}",
            rest.positioner.line, rest.positioner.column
        );
        return Err(Error::from(ErrorKind::Syntax {
            line: rest.positioner.line,
            column: rest.positioner.column,
            message: format!("couldn't continue parsing after: `{}`", snippet),
        }));
    }

    debug!("parsed {} top-level statements", program.statements.len());
    Ok(program)
}

#[cfg(test)]
mod test {
    use super::super::ast::BinOp;
    use super::*;
    use pretty_assertions::assert_eq;

    fn var(id: &str) -> Box<Expr> {
        Box::new(Expr::ReadVar(id.to_owned()))
    }

    fn int(n: i64) -> Box<Expr> {
        Box::new(Expr::Integer(n))
    }

    #[test]
    fn test_primary() {
        assert_eq!(
            primary().easy_parse("4.2").map(|x| x.0),
            Ok(Expr::Float(4.2))
        );
        assert_eq!(primary().easy_parse("42").map(|x| x.0), Ok(Expr::Integer(42)));
        assert_eq!(
            primary().easy_parse(" y").map(|x| x.0),
            Ok(Expr::ReadVar("y".to_owned()))
        );
        assert_eq!(
            primary().easy_parse("(((7)))").map(|x| x.0),
            Ok(Expr::Integer(7))
        );
    }

    #[test]
    fn test_expr() {
        assert_eq!(
            expression().easy_parse("1 + 2").map(|x| x.0),
            Ok(Expr::Operator(BinOp::Add, int(1), int(2)))
        );
        assert_eq!(
            expression().easy_parse("a>=b").map(|x| x.0),
            Ok(Expr::Operator(BinOp::Ge, var("a"), var("b")))
        );
        assert_eq!(
            expression().easy_parse("(1 - 2) * x").map(|x| x.0),
            Ok(Expr::Operator(
                BinOp::Mul,
                Box::new(Expr::Operator(BinOp::Sub, int(1), int(2))),
                var("x")
            ))
        );
        assert_eq!(
            expression().easy_parse("i - -1").map(|x| x.0),
            Ok(Expr::Operator(BinOp::Sub, var("i"), int(-1)))
        );
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 30;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(expression().easy_parse(source.as_str()).map(|x| x.0), Ok(Expr::Integer(1)));

        let source = format!("x = {}a + 1{};", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            parse_program(&source).unwrap(),
            Block::new(vec![Expr::WriteVar(
                "x".to_owned(),
                Box::new(Expr::Operator(BinOp::Add, var("a"), int(1)))
            )])
        );

        let source = format!("println({}\"a\"{});", "(".repeat(depth), ")".repeat(depth));
        assert!(parse_program(&source).is_ok());
    }

    #[test]
    fn test_operators_do_not_chain() {
        assert_eq!(
            expression().easy_parse("a + b + c"),
            Ok((Expr::Operator(BinOp::Add, var("a"), var("b")), " + c"))
        );
    }

    #[test]
    fn test_call() {
        assert_eq!(
            call().easy_parse("readln()").map(|x| x.0),
            Ok(Expr::FunctionCall("readln".to_owned(), Box::new(Expr::Nop)))
        );
        assert_eq!(
            call().easy_parse("println(b + \"1\")").map(|x| x.0),
            Ok(Expr::FunctionCall(
                "println".to_owned(),
                Box::new(Expr::Operator(
                    BinOp::Add,
                    var("b"),
                    Box::new(Expr::String("1".to_owned()))
                ))
            ))
        );
        assert!(call().easy_parse("f(a, b)").is_err());
    }

    #[test]
    fn test_for() {
        assert_eq!(
            parse_for().easy_parse("for (;;) {}").map(|x| x.0),
            Ok(Expr::For(
                Box::new(Expr::Nop),
                Box::new(Expr::Nop),
                Box::new(Expr::Nop),
                Block::default()
            ))
        );
        assert_eq!(
            parse_for()
                .easy_parse("for (i = 0; i < 3; i = i + 1) { println(\"*\"); }")
                .map(|x| x.0),
            Ok(Expr::For(
                Box::new(Expr::WriteVar("i".to_owned(), int(0))),
                Box::new(Expr::Operator(BinOp::Lt, var("i"), int(3))),
                Box::new(Expr::WriteVar(
                    "i".to_owned(),
                    Box::new(Expr::Operator(BinOp::Add, var("i"), int(1)))
                )),
                Block::new(vec![Expr::FunctionCall(
                    "println".to_owned(),
                    Box::new(Expr::String("*".to_owned()))
                )])
            ))
        );
    }

    #[test]
    fn test_block_stops_quietly() {
        let (b, rest) = block().easy_parse("a = 1; b = ; c = 2;").unwrap();
        assert_eq!(b.statements.len(), 1);
        assert_eq!(rest, " b = ; c = 2;");
    }

    #[test]
    fn test_program() {
        let program = parse_program("a = 1; b = 2; if (a < b) { c = a + b; }").unwrap();
        assert_eq!(
            program,
            Block::new(vec![
                Expr::WriteVar("a".to_owned(), int(1)),
                Expr::WriteVar("b".to_owned(), int(2)),
                Expr::If(
                    Box::new(Expr::Operator(BinOp::Lt, var("a"), var("b"))),
                    Block::new(vec![Expr::WriteVar(
                        "c".to_owned(),
                        Box::new(Expr::Operator(BinOp::Add, var("a"), var("b")))
                    )])
                ),
            ])
        );
    }

    #[test]
    fn test_program_leftover() {
        let err = parse_program("a = 1;\n  a = a+++1;\n").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::Syntax {
                line: 2,
                column: 3,
                message: "couldn't continue parsing after: `a = a+++1;`".to_owned(),
            }
        );
    }

    #[test]
    fn test_program_round_trip() {
        let source = r#"
            a = 123;
            b = "a \"quoted\"\tstring";
            d = -4.5;
            if ((a == 123) && true) {
                println(b + "!");
                for (i = 0; i <= (a / 2); i = i + 1) {
                    e = readln();
                }
            }
            for (; ; ) {
            }
        "#;
        let program = parse_program(source).unwrap();
        let printed = program.to_string();
        assert_eq!(parse_program(&printed).unwrap(), program);
    }
}
