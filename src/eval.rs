use super::ast::{Block, Expr};
use super::error::{Error, ErrorKind};
use super::scope::Scopes;
use super::value::Value;
use std::io::{BufRead, Write};

/// Tree-walking evaluator for programs accepted by the type checker.
///
/// `input` feeds `readln`, `output` receives `println`.
pub struct Interpreter<R, W> {
    vars: Scopes<Value>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Interpreter {
            vars: Scopes::new(),
            input,
            output,
        }
    }

    /// Value bound to `name` in the current frame stack.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the top-level statements in the root frame.
    pub fn run(&mut self, program: &Block) -> Result<(), Error> {
        self.exec_statements(program)?;
        self.output.flush()?;
        Ok(())
    }

    /// Runs a nested body in a fresh frame that is dropped afterwards.
    pub fn exec_block(&mut self, block: &Block) -> Result<(), Error> {
        self.vars.push();
        let result = self.exec_statements(block);
        self.vars.pop();
        result
    }

    fn exec_statements(&mut self, block: &Block) -> Result<(), Error> {
        for stmt in &block.statements {
            trace!("exec {}", stmt);
            self.eval(stmt)?;
        }
        Ok(())
    }

    fn condition(&mut self, cond: &Expr) -> Result<bool, Error> {
        match cond {
            Expr::Nop => Ok(true),
            e => self.eval(e)?.as_bool(),
        }
    }

    pub fn eval(&mut self, e: &Expr) -> Result<Value, Error> {
        let v = match e {
            Expr::Boolean(b) => Value::Boolean(*b),
            Expr::Integer(n) => Value::Integer(*n),
            Expr::Float(n) => Value::Float(*n),
            Expr::String(s) => Value::String(s.clone()),
            Expr::ReadVar(name) => self.vars.get(name).cloned().unwrap_or(Value::Absent),
            Expr::WriteVar(name, value) => {
                let v = self.eval(value)?;
                self.vars.set(name, v);
                Value::Absent
            }
            Expr::Operator(op, l, r) => {
                let l = self.eval(l)?;
                let r = self.eval(r)?;
                Value::binary(*op, l, r)?
            }
            Expr::FunctionCall(name, arg) => self.call(name, arg)?,
            Expr::If(cond, body) => {
                if self.eval(cond)?.as_bool()? {
                    self.exec_block(body)?;
                }
                Value::Absent
            }
            Expr::For(init, cond, advance, body) => {
                self.eval(init)?;
                while self.condition(cond)? {
                    self.exec_block(body)?;
                    self.eval(advance)?;
                }
                Value::Absent
            }
            Expr::Nop => Value::Absent,
        };
        Ok(v)
    }

    fn call(&mut self, name: &str, arg: &Expr) -> Result<Value, Error> {
        match name {
            "println" => {
                let text = self.eval(arg)?.into_string()?;
                writeln!(self.output, "{}", text)?;
                Ok(Value::Absent)
            }
            "readln" => self.read_token().map(Value::String),
            _ => Err(Error::from(ErrorKind::UnknownFunction(name.to_owned()))),
        }
    }

    /// Reads one whitespace-delimited token, blocking until it is complete.
    fn read_token(&mut self) -> Result<String, Error> {
        let mut token = Vec::new();
        loop {
            let (used, done) = {
                let buf = self.input.fill_buf()?;
                if buf.is_empty() {
                    break;
                }
                let mut used = 0;
                let mut done = false;
                for &b in buf {
                    if b.is_ascii_whitespace() {
                        if !token.is_empty() {
                            done = true;
                            break;
                        }
                    } else {
                        token.push(b);
                    }
                    used += 1;
                }
                (used, done)
            };
            self.input.consume(used);
            if done {
                break;
            }
        }

        if token.is_empty() {
            return Err(Error::from(ErrorKind::InputExhausted));
        }
        Ok(String::from_utf8_lossy(&token).into_owned())
    }
}

#[cfg(test)]
mod test {
    use super::super::ast::BinOp;
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn interpreter(input: &str) -> Interpreter<Cursor<Vec<u8>>, Vec<u8>> {
        Interpreter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn write(id: &str, e: Expr) -> Expr {
        Expr::WriteVar(id.to_owned(), Box::new(e))
    }

    fn var(id: &str) -> Box<Expr> {
        Box::new(Expr::ReadVar(id.to_owned()))
    }

    fn println(e: Expr) -> Expr {
        Expr::FunctionCall("println".to_owned(), Box::new(e))
    }

    fn readln() -> Expr {
        Expr::FunctionCall("readln".to_owned(), Box::new(Expr::Nop))
    }

    #[test]
    fn test_block_undoes_writes() {
        let mut interp = interpreter("");
        let program = Block::new(vec![
            write("a", Expr::Integer(1)),
            write("b", Expr::Integer(2)),
            Expr::If(
                Box::new(Expr::Operator(BinOp::Lt, var("a"), var("b"))),
                Block::new(vec![
                    write("c", Expr::Operator(BinOp::Add, var("a"), var("b"))),
                    write("a", Expr::String("shadow".to_owned())),
                ]),
            ),
        ]);
        interp.run(&program).unwrap();
        assert_eq!(interp.variable("a"), Some(&Value::Integer(1)));
        assert_eq!(interp.variable("b"), Some(&Value::Integer(2)));
        assert_eq!(interp.variable("c"), None);
        assert!(interp.into_output().is_empty());
    }

    #[test]
    fn test_for_loop() {
        let mut interp = interpreter("");
        let program = Block::new(vec![Expr::For(
            Box::new(write("e", Expr::Integer(0))),
            Box::new(Expr::Operator(BinOp::Lt, var("e"), Box::new(Expr::Integer(10)))),
            Box::new(write(
                "e",
                Expr::Operator(BinOp::Add, var("e"), Box::new(Expr::Integer(2))),
            )),
            Block::new(vec![println(Expr::String("*".to_owned()))]),
        )]);
        interp.run(&program).unwrap();
        assert_eq!(interp.variable("e"), Some(&Value::Integer(10)));
        assert_eq!(
            String::from_utf8(interp.into_output()).unwrap(),
            "*\n*\n*\n*\n*\n"
        );
    }

    #[test]
    fn test_readln_tokens() {
        let mut interp = interpreter("  hello\n world  ");
        let program = Block::new(vec![
            write("x", readln()),
            write("y", readln()),
            println(Expr::Operator(BinOp::Add, var("y"), var("x"))),
        ]);
        interp.run(&program).unwrap();
        assert_eq!(String::from_utf8(interp.into_output()).unwrap(), "worldhello\n");
    }

    #[test]
    fn test_readln_exhausted() {
        let mut interp = interpreter(" \n");
        let err = interp.eval(&readln()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InputExhausted);
    }

    #[test]
    fn test_faults() {
        let mut interp = interpreter("");
        let div = Expr::Operator(
            BinOp::Div,
            Box::new(Expr::Integer(1)),
            Box::new(Expr::Integer(0)),
        );
        assert_eq!(interp.eval(&div).unwrap_err().kind(), &ErrorKind::DivisionByZero);

        let bad_if = Expr::If(Box::new(Expr::Integer(1)), Block::default());
        assert!(interp.eval(&bad_if).unwrap_err().kind().is_runtime_fault());

        let unknown = Expr::FunctionCall("launch".to_owned(), Box::new(Expr::Nop));
        assert_eq!(
            interp.eval(&unknown).unwrap_err().kind(),
            &ErrorKind::UnknownFunction("launch".to_owned())
        );
    }

    #[test]
    fn test_unbound_read_is_absent() {
        let mut interp = interpreter("");
        assert_eq!(interp.eval(&Expr::ReadVar("ghost".to_owned())).ok(), Some(Value::Absent));
    }
}
