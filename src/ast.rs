use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Lt,
    Eq,
    Ne,
    Ge,
    Le,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A node of the syntax tree.
///
/// Statements and expressions share one type; which variants may appear where
/// is decided by the grammar and enforced again by the type checker.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    ReadVar(String),
    WriteVar(String, Box<Expr>),
    Operator(BinOp, Box<Expr>, Box<Expr>),
    /// Builtin call with at most one argument; a missing argument is `Nop`.
    FunctionCall(String, Box<Expr>),
    If(Box<Expr>, Block),
    /// `init`, `condition`, `advance`, body. Absent header clauses are `Nop`.
    For(Box<Expr>, Box<Expr>, Box<Expr>, Block),
    Nop,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// An ordered sequence of statements forming one scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Expr>,
}

impl Block {
    pub fn new(statements: Vec<Expr>) -> Self {
        Block { statements }
    }
}

fn write_escaped(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

fn write_operand(f: &mut fmt::Formatter, e: &Expr) -> fmt::Result {
    match e {
        // operators don't chain, a nested one only survives a re-parse in parens
        Expr::Operator(..) => write!(f, "({})", e),
        _ => write!(f, "{}", e),
    }
}

fn write_block(f: &mut fmt::Formatter, block: &Block, depth: usize) -> fmt::Result {
    for stmt in &block.statements {
        write_statement(f, stmt, depth)?;
    }
    Ok(())
}

fn write_statement(f: &mut fmt::Formatter, stmt: &Expr, depth: usize) -> fmt::Result {
    let indent = "    ".repeat(depth);
    match stmt {
        Expr::If(cond, body) => {
            writeln!(f, "{}if ({}) {{", indent, cond)?;
            write_block(f, body, depth + 1)?;
            writeln!(f, "{}}}", indent)
        }
        Expr::For(init, cond, advance, body) => {
            writeln!(f, "{}for ({}; {}; {}) {{", indent, init, cond, advance)?;
            write_block(f, body, depth + 1)?;
            writeln!(f, "{}}}", indent)
        }
        e => writeln!(f, "{}{};", indent, e),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::ReadVar(name) => f.write_str(name),
            Expr::WriteVar(name, value) => write!(f, "{} = {}", name, value),
            Expr::Operator(op, l, r) => {
                write_operand(f, l)?;
                write!(f, " {} ", op)?;
                write_operand(f, r)
            }
            Expr::FunctionCall(name, arg) => write!(f, "{}({})", name, arg),
            Expr::If(..) | Expr::For(..) => write_statement(f, self, 0),
            Expr::Nop => Ok(()),
            Expr::Boolean(b) => write!(f, "{}", b),
            Expr::Integer(n) => write!(f, "{}", n),
            Expr::Float(n) => {
                let s = n.to_string();
                if s.contains('.') {
                    f.write_str(&s)
                } else {
                    write!(f, "{}.0", s)
                }
            }
            Expr::String(s) => write_escaped(f, s),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_block(f, self, 0)
    }
}
