use super::ast::{Block, Expr};
use super::error::{Error, ErrorKind};
use super::scope::Scopes;
use super::value::Type;

fn reject(e: &Expr, reason: &str) -> Error {
    Error::from(ErrorKind::Type(format!("`{}`: {}", e, reason)))
}

/// Static checker run over a parsed program before it is evaluated.
///
/// Variable types are tracked with the same frame discipline the evaluator
/// uses for values: a nested body's bindings disappear when it ends.
#[derive(Debug, Default)]
pub struct Checker {
    vars: Scopes<Type>,
}

impl Checker {
    pub fn new() -> Self {
        Checker {
            vars: Scopes::new(),
        }
    }

    /// Type recorded for `name` in the current frame stack.
    pub fn type_of(&self, name: &str) -> Option<Type> {
        self.vars.get(name).cloned()
    }

    /// Checks the top-level statements in the root frame.
    pub fn check_program(&mut self, program: &Block) -> Result<(), Error> {
        self.check_statements(program)?;
        debug!("type check accepted {} statements", program.statements.len());
        Ok(())
    }

    /// Checks a nested body in a fresh frame.
    pub fn check_block(&mut self, block: &Block) -> Result<(), Error> {
        self.vars.push();
        let result = self.check_statements(block);
        self.vars.pop();
        result
    }

    fn check_statements(&mut self, block: &Block) -> Result<(), Error> {
        for stmt in &block.statements {
            self.check_statement(stmt)?;
        }
        Ok(())
    }

    pub fn check_statement(&mut self, stmt: &Expr) -> Result<(), Error> {
        match stmt {
            Expr::WriteVar(name, value) => self.check_write(name, value),
            Expr::FunctionCall(..) => self.expr_type(stmt).map(|_| ()),
            Expr::If(cond, body) => {
                self.check_condition(cond)?;
                self.check_block(body)
            }
            Expr::For(init, cond, advance, body) => {
                self.check_clause(init)?;
                if **cond != Expr::Nop {
                    self.check_condition(cond)?;
                }
                self.check_clause(advance)?;
                self.check_block(body)
            }
            e => Err(reject(e, "not a statement")),
        }
    }

    fn check_write(&mut self, name: &str, value: &Expr) -> Result<(), Error> {
        let ty = self.value_type(value)?;
        self.vars.set(name, ty);
        Ok(())
    }

    /// `for` init and advance clauses: an assignment or nothing.
    fn check_clause(&mut self, clause: &Expr) -> Result<(), Error> {
        match clause {
            Expr::Nop => Ok(()),
            Expr::WriteVar(name, value) => self.check_write(name, value),
            e => Err(reject(e, "expected an assignment")),
        }
    }

    fn check_condition(&mut self, cond: &Expr) -> Result<(), Error> {
        match self.value_type(cond)? {
            Type::Boolean => Ok(()),
            ty => Err(reject(cond, &format!("condition has type {}, expected Boolean", ty))),
        }
    }

    fn value_type(&mut self, e: &Expr) -> Result<Type, Error> {
        self.expr_type(e)?
            .ok_or_else(|| reject(e, "expression produces no value"))
    }

    /// Type of an expression; `Ok(None)` for calls that produce nothing.
    pub fn expr_type(&mut self, e: &Expr) -> Result<Option<Type>, Error> {
        let ty = match e {
            Expr::Boolean(_) => Type::Boolean,
            Expr::Integer(_) => Type::Integer,
            Expr::Float(_) => Type::Float,
            Expr::String(_) => Type::String,
            Expr::ReadVar(name) => match self.vars.get(name) {
                Some(ty) => *ty,
                None => return Err(reject(e, "variable is not defined")),
            },
            Expr::Operator(op, l, r) => {
                let lt = self.value_type(l)?;
                let rt = self.value_type(r)?;
                match Type::binary(*op, lt, rt) {
                    Some(ty) => ty,
                    None => {
                        return Err(reject(
                            e,
                            &format!("'{}' is not defined for {} and {}", op, lt, rt),
                        ))
                    }
                }
            }
            Expr::FunctionCall(name, arg) => return self.call_type(e, name, arg),
            Expr::WriteVar(..) | Expr::If(..) | Expr::For(..) | Expr::Nop => {
                return Err(reject(e, "not a value expression"))
            }
        };
        Ok(Some(ty))
    }

    fn call_type(&mut self, call: &Expr, name: &str, arg: &Expr) -> Result<Option<Type>, Error> {
        match (name, arg) {
            ("println", Expr::Nop) => Err(reject(call, "println takes one String argument")),
            ("println", arg) => match self.value_type(arg)? {
                Type::String => Ok(None),
                ty => Err(reject(
                    call,
                    &format!("println takes a String, got {}", ty),
                )),
            },
            ("readln", Expr::Nop) => Ok(Some(Type::String)),
            ("readln", _) => Err(reject(call, "readln takes no arguments")),
            _ => Err(reject(call, "unknown function")),
        }
    }
}
