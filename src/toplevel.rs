use super::ast::Block;
use super::error::Error;
use super::eval::Interpreter;
use super::parser;
use super::typeck::Checker;
use std::io::{BufRead, Write};

/// Parses and type checks `source` without running it.
pub fn check(source: &str) -> Result<Block, Error> {
    let program = parser::parse_program(source)?;
    if let Err(e) = Checker::new().check_program(&program) {
        warn!("program rejected: {}", e);
        return Err(e);
    }
    Ok(program)
}

/// Parses, checks and evaluates `source`. Each call gets its own type
/// environment and variable store.
pub fn run<R, W>(source: &str, input: R, output: W) -> Result<W, Error>
where
    R: BufRead,
    W: Write,
{
    let program = check(source)?;
    let mut interp = Interpreter::new(input, output);
    debug!("evaluating {} statements", program.statements.len());
    interp.run(&program)?;
    Ok(interp.into_output())
}

#[cfg(test)]
mod test {
    use super::super::error::ErrorKind;
    use super::*;

    #[test]
    fn test_rejected_program_never_runs() {
        let err = run("println(\"side effect\"); x = \"a\" + 1;", &b""[..], Vec::new())
            .unwrap_err();
        match err.kind() {
            ErrorKind::Type(msg) => assert!(msg.contains("\"a\" + 1")),
            k => panic!("unexpected {:?}", k),
        }
    }

    #[test]
    fn test_echo() {
        let out = run("println(readln());", &b"hi"[..], Vec::new()).unwrap();
        assert_eq!(out, b"hi\n");
    }
}
